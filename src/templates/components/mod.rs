use maud::{html, Markup};

pub mod error;
pub mod form;

pub use error::html_error_response;
pub use form::{general_errors, text_field, FormErrors};

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}
