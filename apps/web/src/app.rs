//! Application root component.

use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes, A};
use leptos_router::path;

use expenses_client::{use_connection, ApiProvider, ConnectionReadyState};

use crate::pages::{HomeView, UsersView};

/// Backend RPC endpoint.
// TODO: Make this configurable
const SERVER_URL: &str = "ws://127.0.0.1:8080/rpc";

/// Root application component.
///
/// Mounts the one `ApiProvider` for the whole app; every page below shares
/// its connection.
#[component]
pub fn App() -> impl IntoView {
    view! {
        <ApiProvider url=SERVER_URL.to_string() auto_connect=true>
            <Router>
                <SiteHeader/>
                <main class="flex-1 overflow-y-auto">
                    <Routes fallback=|| "Not Found">
                        <Route path=path!("/") view=HomeView />
                        <Route path=path!("/users") view=UsersView />
                    </Routes>
                </main>
            </Router>
        </ApiProvider>
    }
}

/// Top navigation bar with a connection status readout.
#[component]
fn SiteHeader() -> impl IntoView {
    let ready_state = use_connection().ready_state;

    let status_text = move || match ready_state.get() {
        ConnectionReadyState::Connecting => "connecting...",
        ConnectionReadyState::Open => "connected",
        ConnectionReadyState::Closing => "closing...",
        ConnectionReadyState::Closed => "disconnected",
    };

    let status_class = move || {
        if ready_state.get() == ConnectionReadyState::Open {
            "text-[10px] text-[#27c93f]"
        } else {
            "text-[10px] text-[#888888]"
        }
    };

    view! {
        <header class="h-8 flex items-center justify-between px-3 border-b border-[#ffffff08]">
            <nav class="flex items-center gap-3 text-[11px]">
                <A href="/">"Home"</A>
                <A href="/users">"Users"</A>
            </nav>
            <span class=status_class>{status_text}</span>
        </header>
    }
}
