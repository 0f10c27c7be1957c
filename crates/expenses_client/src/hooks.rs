use std::collections::HashMap;

use leptos::prelude::*;

use expenses_common::ServiceRequest;

use crate::clients::{InstrumentsClient, UsersClient};
use crate::context::{ApiConnection, ApiContext, RequestState, RequestStatus};

/// Hook to access the ApiContext directly.
///
/// Most components should use the more specific hooks below.
///
/// # Panics
///
/// Panics if called outside of an `ApiProvider` context.
pub fn use_api_context() -> ApiContext {
    expect_context::<ApiContext>()
}

/// Hook to access the connection control interface.
///
/// # Panics
///
/// Panics if called outside of an `ApiProvider` context.
pub fn use_connection() -> ApiConnection {
    expect_context::<ApiContext>().connection()
}

/// Hook to get the typed user-management service client.
///
/// Every call returns a handle bound to the provider's shared transport.
///
/// # Panics
///
/// Panics if called outside of an `ApiProvider` context.
pub fn use_users_client() -> UsersClient {
    expect_context::<ApiContext>().users()
}

/// Hook to get the typed instrument-catalog service client.
///
/// # Panics
///
/// Panics if called outside of an `ApiProvider` context.
pub fn use_instruments_client() -> InstrumentsClient {
    expect_context::<ApiContext>().instruments()
}

/// Hook to send a service request and get a reactive signal for the
/// response.
///
/// Returns a tuple of:
/// - A function to trigger the request
/// - A reactive signal with the current state (loading, data, error)
///
/// The request goes through `Idle → Fetching → Resolved | Failed`, and the
/// returned state reflects each step so views can render loading and
/// fallback content.
///
/// # Panics
///
/// Panics if called outside of an `ApiProvider` context.
///
/// # Example
///
/// ```rust,ignore
/// use expenses_client::use_request;
/// use expenses_types::ListInstruments;
///
/// #[component]
/// fn InstrumentList() -> impl IntoView {
///     let (fetch, state) = use_request::<ListInstruments>();
///
///     Effect::new(move |_| {
///         // Fetch on mount
///         fetch(ListInstruments::default());
///     });
///
///     view! {
///         <Show when=move || state.get().is_loading()>
///             <p>"Loading..."</p>
///         </Show>
///         <Show when=move || state.get().is_success()>
///             <ul>
///                 {move || state.get().data.unwrap_or_default().instruments.iter().map(|i| view! {
///                     <li>{i.name.clone()}</li>
///                 }).collect::<Vec<_>>()}
///             </ul>
///         </Show>
///     }
/// }
/// ```
pub fn use_request<R>() -> (
    impl Fn(R) + Clone,
    Signal<UseRequestState<R::Response>>,
)
where
    R: ServiceRequest,
{
    let ctx = expect_context::<ApiContext>();

    // Track the current request ID
    let current_request_id = RwSignal::new(None::<u64>);

    // Derive state from the context's request tracking
    let state = {
        let ctx = ctx.clone();
        Signal::derive(move || {
            let request_id = current_request_id.get();

            match request_id {
                None => UseRequestState {
                    is_loading: false,
                    data: None,
                    error: None,
                },
                Some(id) => {
                    let requests = ctx.requests.get();
                    match requests.get(&id) {
                        None => UseRequestState {
                            is_loading: false,
                            data: None,
                            error: Some("request not found".to_string()),
                        },
                        Some(req_state) => match &req_state.status {
                            RequestStatus::Pending => UseRequestState {
                                is_loading: true,
                                data: None,
                                error: None,
                            },
                            RequestStatus::Success => UseRequestState {
                                is_loading: false,
                                data: ctx.get_response::<R>(id),
                                error: None,
                            },
                            RequestStatus::Error(e) => UseRequestState {
                                is_loading: false,
                                data: None,
                                error: Some(e.clone()),
                            },
                        },
                    }
                }
            }
        })
    };

    // Create the fetch function
    let fetch = move |request: R| {
        let id = ctx.request(request);
        #[cfg(target_arch = "wasm32")]
        leptos::logging::log!(
            "[use_request] '{}' sent with id {}",
            R::request_name(),
            id
        );
        current_request_id.set(Some(id));
    };

    (fetch, state)
}

/// State for a request/response cycle.
#[derive(Clone, Debug)]
pub struct UseRequestState<T> {
    /// Whether the request is currently in flight
    pub is_loading: bool,
    /// The response data (if successful)
    pub data: Option<T>,
    /// Error message (if failed)
    pub error: Option<String>,
}

impl<T> UseRequestState<T> {
    /// Returns true if the request is currently loading.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Returns true if the request completed successfully.
    pub fn is_success(&self) -> bool {
        self.data.is_some()
    }

    /// Returns true if the request failed.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Hook to access request state tracking directly.
///
/// Returns a read-only signal containing all request states. Use this if
/// you need more control than `use_request` provides.
///
/// # Panics
///
/// Panics if called outside of an `ApiProvider` context.
pub fn use_request_state() -> ReadSignal<HashMap<u64, RequestState>> {
    expect_context::<ApiContext>().requests()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_state_helpers() {
        let idle = UseRequestState::<u32> {
            is_loading: false,
            data: None,
            error: None,
        };
        assert!(!idle.is_loading() && !idle.is_success() && !idle.is_error());

        let fetching = UseRequestState::<u32> {
            is_loading: true,
            data: None,
            error: None,
        };
        assert!(fetching.is_loading());

        let resolved = UseRequestState {
            is_loading: false,
            data: Some(5u32),
            error: None,
        };
        assert!(resolved.is_success() && !resolved.is_error());

        let failed = UseRequestState::<u32> {
            is_loading: false,
            data: None,
            error: Some("boom".to_string()),
        };
        assert!(failed.is_error() && !failed.is_success());
    }
}
