mod api;
mod components;

use dioxus::prelude::*;

use api::Backend;
use components::{
    Leaderboard, SignIn, SignUp, SiteHeader, ToastFrame, ViewProfile, use_toast_provider,
};

static STYLES: Asset = asset!("/assets/styles.css");

/// Which view fills the main area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Leaderboard,
    SignIn,
    SignUp,
    Profile,
}

pub fn use_page() -> Signal<Page> {
    use_context::<Signal<Page>>()
}

fn main() {
    if let Err(e) = dioxus_logger::init(tracing::Level::INFO) {
        web_sys::console::warn_1(&format!("logger init failed: {e}").into());
    }
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    use_toast_provider();
    let backend = use_hook(Backend::connect);

    rsx! {
        document::Stylesheet { href: STYLES }
        match backend {
            Ok(backend) => rsx! { Shell { backend } },
            Err(e) => rsx! {
                div { class: "config-error",
                    h2 { "Leaderboard is not configured" }
                    p { "{e}" }
                }
            },
        }
        ToastFrame {}
    }
}

#[component]
fn Shell(backend: Backend) -> Element {
    use_context_provider(|| backend.clone());
    let page = use_context_provider(|| Signal::new(Page::Leaderboard));
    api::use_session_provider(&backend);

    // Pick up a session saved by an earlier visit
    use_hook(move || {
        if let Some(saved) = api::load_session() {
            let accounts = backend.accounts.clone();
            spawn(async move {
                if let Err(e) = accounts.restore(saved).await {
                    tracing::info!(error = %e, "saved session is no longer valid");
                }
            });
        }
    });

    rsx! {
        SiteHeader {}
        main { class: "page",
            match *page.read() {
                Page::Leaderboard => rsx! { Leaderboard {} },
                Page::SignIn => rsx! { SignIn {} },
                Page::SignUp => rsx! { SignUp {} },
                Page::Profile => rsx! { ViewProfile {} },
            }
        }
    }
}
