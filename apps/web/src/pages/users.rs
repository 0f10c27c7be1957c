//! Users page: user-management view.

use leptos::either::{Either, EitherOf3};
use leptos::prelude::*;

use expenses_client::use_request;
use expenses_types::ListUsers;

/// Users view.
///
/// Same fetch-and-render binding as the home view, pointed at the
/// user-management service.
#[component]
pub fn UsersView() -> impl IntoView {
    let (fetch_users, users) = use_request::<ListUsers>();

    // Track if we've issued the fetch
    let (has_loaded, set_has_loaded) = signal(false);

    // Fetch on mount (only once)
    {
        let fetch_users = fetch_users.clone();
        Effect::new(move |_| {
            if !has_loaded.get() {
                set_has_loaded.set(true);
                fetch_users(ListUsers::default());
            }
        });
    }

    // Log every completed fetch, success or failure.
    Effect::new(move |_| {
        let state = users.get();
        if let Some(data) = state.data.as_ref() {
            leptos::logging::log!("data {:?}", data.users);
        } else if let Some(error) = state.error.as_ref() {
            leptos::logging::warn!("list users failed: {}", error);
        }
    });

    view! {
        <div class="p-2">
            <h3 class="text-[13px] font-semibold mb-2">"Welcome Home!"</h3>
            {move || {
                let state = users.get();
                if state.is_loading() {
                    EitherOf3::A(view! {
                        <p class="text-[11px] text-[#888888]">"Loading users..."</p>
                    })
                } else if let Some(error) = state.error.clone() {
                    EitherOf3::B(view! {
                        <div class="p-2 rounded border border-[#ff5f5640] bg-[#ff5f5610] text-[11px]">
                            <p class="font-medium">"Could not load users"</p>
                            <p class="text-[#888888]">{error}</p>
                        </div>
                    })
                } else {
                    let rows = state.data.map(|d| d.users).unwrap_or_default();
                    EitherOf3::C(if rows.is_empty() {
                        Either::Left(view! {
                            <p class="text-[11px] text-[#555555]">"No users yet"</p>
                        })
                    } else {
                        Either::Right(view! {
                            <ul class="space-y-1 text-[11px]">
                                {rows
                                    .into_iter()
                                    .map(|user| {
                                        view! {
                                            <li>
                                                <span class="font-medium">{user.name}</span>
                                                <span class="text-[#888888]">" · "{user.email}</span>
                                            </li>
                                        }
                                    })
                                    .collect_view()}
                            </ul>
                        })
                    })
                }
            }}
        </div>
    }
}
