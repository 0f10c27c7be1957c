//! # Expenses Client
//!
//! Reactive RPC client for the expenses services with Leptos integration.
//!
//! One [`ApiProvider`] owns the WebSocket transport; typed service clients
//! and request hooks below it all share that connection.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use leptos::prelude::*;
//! use expenses_client::{ApiProvider, use_request};
//! use expenses_types::ListUsers;
//!
//! #[component]
//! fn App() -> impl IntoView {
//!     view! {
//!         <ApiProvider url="ws://127.0.0.1:8080/rpc".to_string()>
//!             <UserList/>
//!         </ApiProvider>
//!     }
//! }
//!
//! #[component]
//! fn UserList() -> impl IntoView {
//!     let (fetch, state) = use_request::<ListUsers>();
//!
//!     Effect::new(move |_| fetch(ListUsers::default()));
//!
//!     view! {
//!         {move || state.get().data.map(|r| {
//!             r.users.into_iter().map(|u| view! { <p>{u.name}</p> }).collect::<Vec<_>>()
//!         })}
//!     }
//! }
//! ```

// Module declarations
mod clients;
mod context;
mod error;
mod hooks;
mod provider;

// Re-exports
pub use clients::{InstrumentsClient, UsersClient};
pub use context::{ApiConnection, ApiContext, RequestState, RequestStatus};
pub use error::ClientError;
pub use hooks::{
    use_api_context, use_connection, use_instruments_client, use_request, use_request_state,
    use_users_client, UseRequestState,
};
pub use provider::ApiProvider;

// Re-export ConnectionReadyState for convenience
pub use leptos_use::core::ConnectionReadyState;
