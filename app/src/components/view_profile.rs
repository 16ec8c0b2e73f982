//! Signed-in member's profile with an edit modal.

use dioxus::prelude::*;

use clubboard_core::{AccountError, AuthError, StoreError};
use clubboard_types::{LabelDomain, ProfileUpdate, UserProfile};

use crate::api::{use_backend, use_session};
use crate::components::fields::{CodeSelect, FieldError, FormError, GeneralError};
use crate::components::use_toast;
use crate::{Page, use_page};

/// What the page shows in place of the profile when loading fails.
fn load_error_message(err: &AccountError) -> String {
    match err {
        AccountError::Auth(AuthError::NotSignedIn) => "Sign in to view your profile.".to_string(),
        AccountError::Store(StoreError::ProfileNotFound(_)) => {
            "No profile exists for this account yet.".to_string()
        }
        other => format!("Could not load your profile: {other}"),
    }
}

#[component]
pub fn ViewProfile() -> Element {
    let backend = use_backend();
    let session = use_session();
    let mut page = use_page();

    let mut profile = use_signal(|| None::<UserProfile>);
    let mut load_error = use_signal(|| None::<String>);
    let mut editing = use_signal(|| false);

    // Reload whenever the signed-in user changes
    use_effect(move || {
        let user_id = session.read().as_ref().map(|s| s.user.id.clone());
        profile.set(None);
        load_error.set(None);
        if user_id.is_none() {
            load_error.set(Some(load_error_message(&AuthError::NotSignedIn.into())));
            return;
        }
        let accounts = backend.accounts.clone();
        spawn(async move {
            match accounts.load_profile().await {
                Ok(p) => profile.set(Some(p)),
                Err(e) => load_error.set(Some(load_error_message(&e))),
            }
        });
    });

    if let Some(message) = load_error.read().clone() {
        let signed_out = session.read().is_none();
        return rsx! {
            div { class: "profile-page",
                p { class: "form-error", "{message}" }
                if signed_out {
                    button { onclick: move |_| page.set(Page::SignIn), "Sign In" }
                }
            }
        };
    }

    let Some(current) = profile.read().clone() else {
        return rsx! {
            div { class: "profile-page", p { "Loading..." } }
        };
    };

    rsx! {
        div { class: "profile-page",
            h2 { "{current.username}" }
            dl { class: "profile-details",
                dt { "Events attended" }
                dd { "{current.num_events_attended}" }
                dt { "{LabelDomain::Year.title()}" }
                dd { "{LabelDomain::Year.label(&current.year)}" }
                dt { "{LabelDomain::Major.title()}" }
                dd { "{LabelDomain::Major.label(&current.major)}" }
                dt { "{LabelDomain::Club.title()}" }
                dd { "{LabelDomain::Club.label(&current.main_club)}" }
            }
            button { onclick: move |_| editing.set(true), "Edit" }
            if *editing.read() {
                EditProfileModal { profile: current.clone(), editing, saved: profile }
            }
        }
    }
}

#[component]
fn EditProfileModal(
    profile: UserProfile,
    mut editing: Signal<bool>,
    mut saved: Signal<Option<UserProfile>>,
) -> Element {
    let backend = use_backend();
    let mut toast = use_toast();

    let mut username = use_signal(|| profile.username.clone());
    let year = use_signal(|| profile.year.clone());
    let major = use_signal(|| profile.major.clone());
    let main_club = use_signal(|| profile.main_club.clone());
    let mut error = use_signal(|| None::<FormError>);
    let mut busy = use_signal(|| false);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        if *busy.peek() {
            return;
        }
        let update = ProfileUpdate {
            username: username.peek().clone(),
            year: year.peek().clone(),
            major: major.peek().clone(),
            main_club: main_club.peek().clone(),
        };
        let accounts = backend.accounts.clone();
        busy.set(true);
        spawn(async move {
            match accounts.save_profile(&update).await {
                Ok(updated) => {
                    saved.set(Some(updated));
                    editing.set(false);
                    toast.success("Profile saved");
                }
                Err(e) => error.set(Some(FormError::from(&e))),
            }
            busy.set(false);
        });
    };

    rsx! {
        div { class: "modal-backdrop",
            div { class: "modal", role: "dialog",
                h3 { "Edit Profile" }
                form { class: "auth-form", onsubmit: submit,
                    GeneralError { error }
                    label { class: "form-field",
                        span { "Username" }
                        input { value: "{username}", oninput: move |evt| username.set(evt.value()) }
                    }
                    FieldError { error, field: "Username" }
                    CodeSelect { domain: LabelDomain::Year, value: year }
                    FieldError { error, field: LabelDomain::Year.title() }
                    CodeSelect { domain: LabelDomain::Major, value: major }
                    FieldError { error, field: LabelDomain::Major.title() }
                    CodeSelect { domain: LabelDomain::Club, value: main_club }
                    FieldError { error, field: LabelDomain::Club.title() }
                    div { class: "modal-actions",
                        button { r#type: "button", onclick: move |_| editing.set(false), "Cancel" }
                        button { r#type: "submit", disabled: *busy.read(),
                            if *busy.read() { "Saving..." } else { "Save" }
                        }
                    }
                }
            }
        }
    }
}
