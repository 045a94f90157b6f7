pub mod explorer;
pub mod favorites;
pub mod images;
pub mod listings;
pub mod universities;
