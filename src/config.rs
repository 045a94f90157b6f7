use anyhow::Context;
use std::env;
use std::net::SocketAddr;

pub struct Config {
    pub bind_addr: SocketAddr,
    pub database_path: String,
    pub max_workers: usize,
    pub seed_demo_data: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            bind_addr: var_or("BIND_ADDR", "127.0.0.1:3000")
                .parse()
                .context("BIND_ADDR must be host:port")?,
            database_path: var_or("DATABASE_PATH", "campus_rentals.sqlite3"),
            max_workers: var_or("MAX_WORKERS", "8")
                .parse()
                .context("MAX_WORKERS must be a positive integer")?,
            seed_demo_data: parse_flag(&var_or("SEED_DEMO_DATA", "true"))
                .context("SEED_DEMO_DATA must be true or false")?,
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_flag(raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("unrecognised flag value {other:?}"),
    }
}
