pub mod error;
pub mod executor;
pub mod pipeline;
pub mod transport;

// Re-export commonly used types
pub use error::{ExchangeError, PipelineError};
pub use executor::Executor;
pub use pipeline::{ExchangeTask, Pipeline, PipelineConfig, PipelineReport};
pub use transport::{HttpTransport, Transport, TransportError};
