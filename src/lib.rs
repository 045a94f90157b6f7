pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod explorer;
pub mod handlers;
pub mod responses;
pub mod router;
pub mod templates;

pub use db::{init_db, Database};
pub use router::handle;

#[cfg(test)]
mod tests;
