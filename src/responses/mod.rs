pub mod errors;
pub mod html;
pub mod json;

pub use crate::errors::ResultResp;
pub use errors::error_response;

pub use html::{css_response, html_response};
pub use json::{empty_response, json_response};
