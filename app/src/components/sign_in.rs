//! Sign-in page.

use dioxus::prelude::*;

use clubboard_core::SignInForm;

use crate::api::use_backend;
use crate::components::fields::{FieldError, FormError, GeneralError};
use crate::components::use_toast;
use crate::{Page, use_page};

#[component]
pub fn SignIn() -> Element {
    let backend = use_backend();
    let mut page = use_page();
    let mut toast = use_toast();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<FormError>);
    let mut busy = use_signal(|| false);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        if *busy.peek() {
            return;
        }
        let form = SignInForm {
            email: email.peek().clone(),
            password: password.peek().clone(),
        };
        let accounts = backend.accounts.clone();
        busy.set(true);
        spawn(async move {
            match accounts.sign_in(&form).await {
                Ok(_) => {
                    error.set(None);
                    toast.success("Signed in");
                    page.set(Page::Leaderboard);
                }
                Err(e) => error.set(Some(FormError::from(&e))),
            }
            busy.set(false);
        });
    };

    rsx! {
        div { class: "auth-page",
            h2 { "Sign In" }
            form { class: "auth-form", onsubmit: submit,
                GeneralError { error }
                label { class: "form-field",
                    span { "Email" }
                    input {
                        r#type: "email",
                        value: "{email}",
                        oninput: move |evt| email.set(evt.value()),
                    }
                }
                FieldError { error, field: "Email" }
                label { class: "form-field",
                    span { "Password" }
                    input {
                        r#type: "password",
                        value: "{password}",
                        oninput: move |evt| password.set(evt.value()),
                    }
                }
                FieldError { error, field: "Password" }
                button { r#type: "submit", disabled: *busy.read(),
                    if *busy.read() { "Signing in..." } else { "Sign In" }
                }
            }
            p { class: "auth-switch",
                "No account yet? "
                button { class: "btn-link", onclick: move |_| page.set(Page::SignUp), "Sign Up" }
            }
        }
    }
}
