//! Form pieces shared by the sign-up and profile forms.

use dioxus::prelude::*;

use clubboard_core::AccountError;
use clubboard_core::validation::error_field;
use clubboard_types::LabelDomain;

/// An error shown inline, next to `field` when one is known, otherwise at
/// the top of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormError {
    pub field: Option<&'static str>,
    pub message: String,
}

impl FormError {
    pub fn for_field(&self, field: &str) -> Option<&str> {
        (self.field == Some(field)).then_some(self.message.as_str())
    }

    pub fn general(&self) -> Option<&str> {
        self.field.is_none().then_some(self.message.as_str())
    }
}

impl From<&AccountError> for FormError {
    fn from(err: &AccountError) -> Self {
        let field = match err {
            AccountError::Validation(v) => Some(error_field(v)),
            _ => None,
        };
        Self {
            field,
            message: err.to_string(),
        }
    }
}

#[component]
pub fn FieldError(error: Signal<Option<FormError>>, field: &'static str) -> Element {
    let message = error
        .read()
        .as_ref()
        .and_then(|e| e.for_field(field).map(str::to_string));
    rsx! {
        if let Some(message) = message {
            p { class: "field-error", "{message}" }
        }
    }
}

#[component]
pub fn GeneralError(error: Signal<Option<FormError>>) -> Element {
    let message = error
        .read()
        .as_ref()
        .and_then(|e| e.general().map(str::to_string));
    rsx! {
        if let Some(message) = message {
            p { class: "form-error", "{message}" }
        }
    }
}

/// Dropdown over one code/label table. `value` holds the selected code.
#[component]
pub fn CodeSelect(domain: LabelDomain, mut value: Signal<String>) -> Element {
    let title = domain.title();
    rsx! {
        label { class: "form-field",
            span { "{title}" }
            select {
                value: "{value}",
                onchange: move |evt| value.set(evt.value()),
                option { value: "", disabled: true, selected: value.read().is_empty(), "Select {title}" }
                for (code, name) in domain.table().iter().copied() {
                    option { key: "{code}", value: code, selected: *value.read() == code, "{name}" }
                }
            }
        }
    }
}
