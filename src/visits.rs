mod http;
mod service;

pub(crate) use http::router;

/// The one counter this service maintains.
pub(crate) const KEY: &str = "visits";
