// Adapters layer: concrete implementations for external systems (availability API, output file).

pub mod http;
pub mod storage;

pub use http::AvailabilityClient;
pub use storage::{output_file_name, FileRecorder};
