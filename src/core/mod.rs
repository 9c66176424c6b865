pub mod checker;
pub mod engine;
pub mod generator;
pub mod state;

pub use crate::domain::model::{CheckOutcome, FixedDigit, FixedPositions, RetryPolicy, ScanSummary};
pub use crate::domain::ports::{ConfigProvider, ResultSink};
pub use crate::utils::error::Result;
