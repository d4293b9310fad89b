pub mod infer;
pub mod schema;
pub mod types;

// Re-export commonly used types
pub use infer::infer_schema;
pub use schema::{SchemaExpectation, SchemaViolation};
pub use types::{
    ExchangeContract, ExchangeResult, Expectation, Method, TransportRequest, TransportResponse,
};
