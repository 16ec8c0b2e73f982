//! Sign-up page.

use dioxus::prelude::*;

use clubboard_core::{AccountError, SignUpForm, SignUpResult};
use clubboard_types::LabelDomain;

use crate::api::use_backend;
use crate::components::fields::{CodeSelect, FieldError, FormError, GeneralError};
use crate::components::use_toast;
use crate::{Page, use_page};

#[component]
pub fn SignUp() -> Element {
    let backend = use_backend();
    let mut page = use_page();
    let mut toast = use_toast();

    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut email = use_signal(String::new);
    let year = use_signal(String::new);
    let major = use_signal(String::new);
    let main_club = use_signal(String::new);

    let mut error = use_signal(|| None::<FormError>);
    let mut busy = use_signal(|| false);
    let mut pending_email = use_signal(|| None::<String>);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        if *busy.peek() {
            return;
        }
        let form = SignUpForm {
            username: username.peek().clone(),
            password: password.peek().clone(),
            email: email.peek().clone(),
            year: year.peek().clone(),
            major: major.peek().clone(),
            main_club: main_club.peek().clone(),
        };
        let accounts = backend.accounts.clone();
        busy.set(true);
        spawn(async move {
            match accounts.sign_up(&form).await {
                Ok(SignUpResult::SignedIn(profile)) => {
                    error.set(None);
                    toast.success(format!("Welcome, {}!", profile.username));
                    page.set(Page::Leaderboard);
                }
                Ok(SignUpResult::ConfirmationPending { email }) => {
                    error.set(None);
                    pending_email.set(Some(email));
                }
                // Signed in without a row; the profile page creates it
                Err(e @ AccountError::ProfileNotCreated(_)) => {
                    error.set(None);
                    toast.error(e.to_string());
                    page.set(Page::Profile);
                }
                Err(e) => error.set(Some(FormError::from(&e))),
            }
            busy.set(false);
        });
    };

    if let Some(address) = pending_email.read().clone() {
        return rsx! {
            div { class: "auth-page",
                h2 { "Check your email" }
                p { "We sent a confirmation link to {address}. Follow it, then sign in." }
                button { onclick: move |_| page.set(Page::SignIn), "Go to Sign In" }
            }
        };
    }

    rsx! {
        div { class: "auth-page",
            h2 { "Sign Up" }
            form { class: "auth-form", onsubmit: submit,
                GeneralError { error }
                label { class: "form-field",
                    span { "Username" }
                    input { value: "{username}", oninput: move |evt| username.set(evt.value()) }
                }
                FieldError { error, field: "Username" }
                label { class: "form-field",
                    span { "Password" }
                    input {
                        r#type: "password",
                        value: "{password}",
                        oninput: move |evt| password.set(evt.value()),
                    }
                }
                FieldError { error, field: "Password" }
                label { class: "form-field",
                    span { "Email" }
                    input {
                        r#type: "email",
                        value: "{email}",
                        oninput: move |evt| email.set(evt.value()),
                    }
                }
                FieldError { error, field: "Email" }
                CodeSelect { domain: LabelDomain::Year, value: year }
                FieldError { error, field: LabelDomain::Year.title() }
                CodeSelect { domain: LabelDomain::Major, value: major }
                FieldError { error, field: LabelDomain::Major.title() }
                CodeSelect { domain: LabelDomain::Club, value: main_club }
                FieldError { error, field: LabelDomain::Club.title() }
                button { r#type: "submit", disabled: *busy.read(),
                    if *busy.read() { "Creating account..." } else { "Sign Up" }
                }
            }
            p { class: "auth-switch",
                "Already have an account? "
                button { class: "btn-link", onclick: move |_| page.set(Page::SignIn), "Sign In" }
            }
        }
    }
}
