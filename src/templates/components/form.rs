// templates/components/form.rs
use maud::{html, Markup};

/// Validation feedback for a re-shown form.
#[derive(Debug, Default, Clone)]
pub struct FormErrors {
    pub fields: Vec<(&'static str, String)>,
    pub general: Vec<String>,
}

impl FormErrors {
    pub fn field(field: &'static str, msg: impl Into<String>) -> Self {
        Self {
            fields: vec![(field, msg.into())],
            general: Vec::new(),
        }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self {
            fields: Vec::new(),
            general: vec![msg.into()],
        }
    }

    pub fn for_field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(f, _)| *f == name)
            .map(|(_, m)| m.as_str())
    }
}

pub fn text_field(
    name: &str,
    label: &str,
    value: &str,
    placeholder: &str,
    errors: &FormErrors,
) -> Markup {
    let error = errors.for_field(name);
    html! {
        div.field.has-error[error.is_some()] {
            label for=(name) { (label) }
            input type="text" id=(name) name=(name) value=(value) placeholder=(placeholder);
            @if let Some(msg) = error {
                p class="field-error" { (msg) }
            }
        }
    }
}

pub fn general_errors(errors: &FormErrors) -> Markup {
    html! {
        @if !errors.general.is_empty() {
            div class="form-errors" role="alert" {
                @for msg in &errors.general {
                    p { (msg) }
                }
            }
        }
    }
}
