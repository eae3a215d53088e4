//! Auth provider adapters.

mod http_session_resolver;

pub use http_session_resolver::HttpSessionResolver;
