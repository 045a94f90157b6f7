pub mod error;
pub mod filter_form;
pub mod listing_card;

pub use error::html_error_response;
pub use filter_form::{filter_form, university_select};
pub use listing_card::{card_list, listing_card};
