use crate::domain::model::{FixedDigit, RetryPolicy};
use crate::utils::error::Result;

/// Append-only destination for confirmed-available numbers.
pub trait ResultSink: Send + Sync {
    fn record(&self, number: &str) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Where the results end up, for the summary.
    fn location(&self) -> std::path::PathBuf;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn brand(&self) -> &str;
    fn sim_category(&self) -> &str;
    fn base_prefix(&self) -> &str;
    fn fixed_digits(&self) -> &[FixedDigit];
    fn output_path(&self) -> &str;
    fn workers(&self) -> usize;
    fn retry_policy(&self) -> RetryPolicy;
}
