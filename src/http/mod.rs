//! HTTP protocol layer module
//!
//! Response construction shared by the router and the handlers.

pub mod response;

// Re-export commonly used types
pub use response::{
    build_500_response, build_redirect_response_with_code, build_rejection_response,
    json_response,
};
