//! Leaderboard page: filter sidebar, sortable table and pagination.

use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;

use clubboard_core::{LeaderboardController, LoadState, ProfileStore};
use clubboard_types::{LabelDomain, LeaderboardEntry, SortColumn};

use crate::api::use_backend;
use crate::components::use_toast;

const COLUMN_COUNT: &str = "5";

fn cell(entry: &LeaderboardEntry, column: SortColumn) -> String {
    match column {
        SortColumn::Username => entry.username.clone(),
        SortColumn::Year => entry.year_label().to_string(),
        SortColumn::Major => entry.major_label().to_string(),
        SortColumn::MainClub => entry.club_label().to_string(),
        SortColumn::NumEventsAttended => entry.num_events_attended.to_string(),
    }
}

#[component]
pub fn Leaderboard() -> Element {
    let backend = use_backend();
    let mut toast = use_toast();
    let page_size = backend.config.leaderboard.page_size;
    let debounce_ms = backend.config.leaderboard.search_debounce_ms;

    let mut board = use_signal(|| LeaderboardController::new(page_size));
    let mut search_text = use_signal(String::new);
    let mut search_debounce = use_signal(String::new);

    // Debounce search input
    use_effect(move || {
        let text = search_text.read().clone();
        spawn(async move {
            TimeoutFuture::new(debounce_ms).await;
            if *search_text.read() == text {
                search_debounce.set(text);
            }
        });
    });

    use_effect(move || {
        let text = search_debounce.read().clone();
        board.write().set_search(&text);
    });

    // Only changes to filters, search, sort or page produce a new request
    let request = use_memo(move || board.read().current_request());

    use_effect(move || {
        let _ = request.read();
        let ticket = board.write().request();
        let accounts = backend.accounts.clone();
        spawn(async move {
            let result = accounts.store().select_leaderboard(&ticket.query()).await;
            let applied = board.write().apply(ticket, result);
            if applied && let Some(msg) = board.read().load_state().error() {
                toast.error(format!("Could not load the leaderboard: {msg}"));
            }
        });
    });

    let state = board.read();
    let active = state.active_column();
    let sort = state.sort();

    rsx! {
        div { class: "leaderboard-layout",
            aside { class: "leaderboard-sidebar",
                input {
                    class: "search-input",
                    r#type: "search",
                    placeholder: "Search username",
                    value: "{search_text}",
                    oninput: move |evt| search_text.set(evt.value()),
                }
                for domain in LabelDomain::ALL {
                    fieldset { key: "{domain.title()}", class: "filter-group",
                        legend { "{domain.title()}" }
                        for name in domain.labels() {
                            label { key: "{name}", class: "filter-option",
                                input {
                                    r#type: "checkbox",
                                    checked: state.filters().is_selected(domain, name),
                                    onchange: move |_| {
                                        board.write().toggle_filter(domain, name);
                                    },
                                }
                                "{name}"
                            }
                        }
                    }
                }
                if !state.filters().is_empty() {
                    button {
                        class: "btn-link",
                        onclick: move |_| board.write().clear_filters(),
                        "Clear filters"
                    }
                }
            }

            section { class: "leaderboard-main",
                table { class: "leaderboard-table",
                    thead {
                        tr {
                            for column in SortColumn::ALL {
                                th {
                                    key: "{column}",
                                    class: if active == Some(column) { "sortable active" } else { "sortable" },
                                    onclick: move |_| board.write().click_column(column),
                                    "{column.title()}"
                                    if active == Some(column) {
                                        span { class: "sort-arrow",
                                            if sort.ascending { " \u{25B2}" } else { " \u{25BC}" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                    tbody {
                        match state.load_state() {
                            LoadState::Idle | LoadState::Loading => rsx! {
                                tr { td { class: "table-message", colspan: COLUMN_COUNT, "Loading..." } }
                            },
                            LoadState::Failed(msg) => rsx! {
                                tr { td { class: "table-message table-error", colspan: COLUMN_COUNT,
                                    "Failed to load leaderboard: {msg}"
                                } }
                            },
                            LoadState::Loaded if state.rows().is_empty() => rsx! {
                                tr { td { class: "table-message", colspan: COLUMN_COUNT, "No data available" } }
                            },
                            LoadState::Loaded => rsx! {
                                for (i, entry) in state.rows().iter().enumerate() {
                                    tr { key: "{i}-{entry.username}",
                                        for column in SortColumn::ALL {
                                            td { key: "{column}", "{cell(entry, column)}" }
                                        }
                                    }
                                }
                            },
                        }
                    }
                }

                div { class: "pagination",
                    button {
                        disabled: state.page() <= 1,
                        onclick: move |_| {
                            board.write().prev_page();
                        },
                        "<"
                    }
                    span { class: "page-number", "Page {state.page()}" }
                    button {
                        disabled: !state.has_next_page(),
                        onclick: move |_| {
                            board.write().next_page();
                        },
                        ">"
                    }
                }
            }
        }
    }
}
