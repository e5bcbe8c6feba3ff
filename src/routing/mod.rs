//! Routing module
//!
//! Provides the dispatch side of the server:
//! - Path patterns with named `:param` segments
//! - A route table keyed by method and pattern
//! - Most-specific-match selection and trailing-slash redirects

mod pattern;
mod router;

pub use router::Router;
