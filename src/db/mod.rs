pub mod connection;
pub mod favorites;
pub mod images;
pub mod listings;
pub mod seed;
pub mod universities;
pub mod users;

pub use connection::{init_db, Database};
