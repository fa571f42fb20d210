pub mod html;
pub mod plain;

pub use crate::errors::ResultResp;

pub use html::{html_response, html_response_with_status};
pub use plain::{css_response, redirect, text_response};
