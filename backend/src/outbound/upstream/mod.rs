//! Processing webhook adapters.

mod dto;
mod http_forwarder;

pub use http_forwarder::HttpProcessingUpstream;
