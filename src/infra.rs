pub(crate) mod config;
pub(crate) mod os;
pub(crate) mod store;
pub(crate) mod telemetry;
