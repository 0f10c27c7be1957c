//! Home page: instrument catalog view.

use leptos::either::{Either, EitherOf3};
use leptos::prelude::*;

use expenses_client::use_request;
use expenses_types::ListInstruments;

/// Home view.
///
/// Fetches the instrument list once on mount and logs the outcome; the
/// placeholder heading renders in every fetch state.
#[component]
pub fn HomeView() -> impl IntoView {
    let (fetch_instruments, instruments) = use_request::<ListInstruments>();

    // Track if we've issued the fetch
    let (has_loaded, set_has_loaded) = signal(false);

    // Fetch on mount (only once)
    {
        let fetch_instruments = fetch_instruments.clone();
        Effect::new(move |_| {
            if !has_loaded.get() {
                set_has_loaded.set(true);
                fetch_instruments(ListInstruments::default());
            }
        });
    }

    // Log every completed fetch, success or failure.
    Effect::new(move |_| {
        let state = instruments.get();
        if let Some(data) = state.data.as_ref() {
            leptos::logging::log!("data {:?}", data.instruments);
        } else if let Some(error) = state.error.as_ref() {
            leptos::logging::warn!("list instruments failed: {}", error);
        }
    });

    view! {
        <div class="p-2">
            <h3 class="text-[13px] font-semibold mb-2">"Welcome Home!"</h3>
            {move || {
                let state = instruments.get();
                if state.is_loading() {
                    EitherOf3::A(view! {
                        <p class="text-[11px] text-[#888888]">"Loading instruments..."</p>
                    })
                } else if let Some(error) = state.error.clone() {
                    EitherOf3::B(view! {
                        <div class="p-2 rounded border border-[#ff5f5640] bg-[#ff5f5610] text-[11px]">
                            <p class="font-medium">"Could not load instruments"</p>
                            <p class="text-[#888888]">{error}</p>
                        </div>
                    })
                } else {
                    let rows = state.data.map(|d| d.instruments).unwrap_or_default();
                    EitherOf3::C(if rows.is_empty() {
                        Either::Left(view! {
                            <p class="text-[11px] text-[#555555]">"No instruments yet"</p>
                        })
                    } else {
                        Either::Right(view! {
                            <ul class="space-y-1 text-[11px]">
                                {rows
                                    .into_iter()
                                    .map(|instrument| {
                                        view! { <li>{instrument.name}</li> }
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
