pub mod error;

pub use error::{to_error_response, validation_error_response};
