pub mod filter;
pub mod geo;
pub mod listing;
pub mod university;
pub mod wire;
