//! Top bar with the account menu.

use dioxus::prelude::*;

use crate::api::{use_backend, use_session};
use crate::components::use_toast;
use crate::{Page, use_page};

#[component]
pub fn SiteHeader() -> Element {
    let backend = use_backend();
    let session = use_session();
    let mut page = use_page();
    let mut toast = use_toast();
    let mut menu_open = use_signal(|| false);

    let signed_in = session.read().is_some();
    let email = session
        .read()
        .as_ref()
        .and_then(|s| s.user.email.clone())
        .unwrap_or_default();

    let mut go = move |target: Page| {
        menu_open.set(false);
        page.set(target);
    };

    let logout = move |_| {
        menu_open.set(false);
        let accounts = backend.accounts.clone();
        spawn(async move {
            accounts.sign_out().await;
            toast.success("Signed out");
            page.set(Page::Leaderboard);
        });
    };

    rsx! {
        header { class: "site-header",
            button { class: "site-title", onclick: move |_| go(Page::Leaderboard), "Club Leaderboard" }
            div { class: "account-menu",
                button {
                    class: "account-button",
                    onclick: move |_| menu_open.toggle(),
                    if signed_in { "{email}" } else { "Account" }
                }
                if *menu_open.read() {
                    div { class: "account-dropdown",
                        if signed_in {
                            button { onclick: move |_| go(Page::Profile), "View Profile" }
                            button { onclick: logout, "Logout" }
                        } else {
                            button { onclick: move |_| go(Page::SignIn), "Sign In" }
                            button { onclick: move |_| go(Page::SignUp), "Sign Up" }
                        }
                    }
                }
            }
        }
    }
}
