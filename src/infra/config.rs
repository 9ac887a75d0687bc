use std::{env, net::SocketAddr};

use anyhow::{Context, Result};
use tracing::info;

const DEFAULT_REDIS_ADDR: &str = "localhost:6379";
const DEFAULT_LISTEN_ADDR: &str = ":8002";

/// Runtime configuration, built once in `main` and passed by reference into
/// the pieces that need it.
pub(crate) struct Config {
    listen_addr: String,
    redis_addr: String,
}

impl Config {
    pub(crate) fn from_env() -> Self {
        let config = Config {
            listen_addr: env_or("LISTEN_ADDR", DEFAULT_LISTEN_ADDR),
            redis_addr: env_or("REDIS_ADDR", DEFAULT_REDIS_ADDR),
        };

        info!(
            listen_addr = config.listen_addr,
            redis_addr = config.redis_addr,
            "initialized config"
        );

        config
    }

    pub(crate) fn listen_address(&self) -> Result<SocketAddr> {
        parse_listen_addr(&self.listen_addr)
    }

    pub(crate) fn redis_url(&self) -> String {
        format!("redis://{}", self.redis_addr)
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_owned())
}

// The bare `:port` form binds all interfaces.
fn parse_listen_addr(addr: &str) -> Result<SocketAddr> {
    let addr = if addr.starts_with(':') {
        format!("0.0.0.0{addr}")
    } else {
        addr.to_owned()
    };
    addr.parse()
        .with_context(|| format!("invalid listen address {addr:?}"))
}
