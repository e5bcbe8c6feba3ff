//! Request handler module
//!
//! Request context and reply types, the demo endpoints, and the entry point
//! connections hand each parsed request to.

mod context;
pub mod demo;
mod entry;

pub use context::{Handler, HandlerResult, Reply, RequestContext};
pub use entry::handle_request;
