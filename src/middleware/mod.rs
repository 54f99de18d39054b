//! HTTP middleware.

pub mod error_details;
pub mod request_logger;

pub use error_details::error_details;
pub use request_logger::RequestLogger;
