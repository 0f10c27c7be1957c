use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use leptos::prelude::*;
use leptos_use::core::ConnectionReadyState;

use expenses_common::{
    request_envelope_name, response_envelope_name, RequestEnvelope, ServiceRequest, WireMessage,
    WirePacket,
};

use crate::clients::{InstrumentsClient, UsersClient};
use crate::error::ClientError;

/// Connection control interface exposed to components.
///
/// Allows components to observe and manually control the WebSocket
/// connection.
#[derive(Clone)]
pub struct ApiConnection {
    /// Current connection state
    pub ready_state: Signal<ConnectionReadyState>,
    /// Open the WebSocket connection
    pub open: Arc<dyn Fn() + Send + Sync>,
    /// Close the WebSocket connection
    pub close: Arc<dyn Fn() + Send + Sync>,
}

/// State tracking for a single request/response cycle.
#[derive(Clone, Debug)]
pub struct RequestState {
    /// The unique request ID
    pub request_id: u64,
    /// Wire type name of the expected response envelope
    pub response_type: String,
    /// Current status of the request
    pub status: RequestStatus,
    /// Raw response bytes (if received)
    pub response_bytes: Option<Vec<u8>>,
}

/// Status of a request.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestStatus {
    /// Request is pending (sent, waiting for response)
    Pending,
    /// Response received successfully
    Success,
    /// Request failed (serialization, transport error, etc.)
    Error(String),
}

/// Context providing access to the shared transport and the typed service
/// clients bound to it.
///
/// This context is provided by `ApiProvider` and consumed by hooks like
/// `use_request`. It owns request-id allocation, the request table, and
/// response routing. All service clients created from one context share
/// its transport.
#[derive(Clone)]
pub struct ApiContext {
    /// Current connection state
    pub ready_state: Signal<ConnectionReadyState>,
    /// Last transport-level error that occurred
    pub last_error: Signal<Option<ClientError>>,
    /// Function to send packets to the server
    send: Arc<dyn Fn(&WirePacket) + Send + Sync>,
    /// Function to open the connection
    open: Arc<dyn Fn() + Send + Sync>,
    /// Function to close the connection
    close: Arc<dyn Fn() + Send + Sync>,
    /// Request state tracking: request_id -> RequestState
    pub(crate) requests: RwSignal<HashMap<u64, RequestState>>,
    /// Next request ID
    next_request_id: Arc<Mutex<u64>>,
}

impl ApiContext {
    /// Create a new ApiContext.
    ///
    /// This is typically called by `ApiProvider`, not by user code.
    pub fn new(
        ready_state: Signal<ConnectionReadyState>,
        last_error: Signal<Option<ClientError>>,
        send: Arc<dyn Fn(&WirePacket) + Send + Sync>,
        open: Arc<dyn Fn() + Send + Sync>,
        close: Arc<dyn Fn() + Send + Sync>,
    ) -> Self {
        Self {
            ready_state,
            last_error,
            send,
            open,
            close,
            requests: RwSignal::new(HashMap::new()),
            next_request_id: Arc::new(Mutex::new(0)),
        }
    }

    /// Get connection control interface.
    pub fn connection(&self) -> ApiConnection {
        ApiConnection {
            ready_state: self.ready_state,
            open: self.open.clone(),
            close: self.close.clone(),
        }
    }

    /// Typed handle for the user-management service, bound to this
    /// context's transport.
    pub fn users(&self) -> UsersClient {
        UsersClient::new(self.clone())
    }

    /// Typed handle for the instrument-catalog service, bound to this
    /// context's transport.
    pub fn instruments(&self) -> InstrumentsClient {
        InstrumentsClient::new(self.clone())
    }

    /// Send a service request and track its state.
    ///
    /// The request is wrapped in a correlation envelope so the response can
    /// be matched back by id. Returns the request id; watch it through
    /// [`ApiContext::requests`] or the `use_request` hook.
    ///
    /// The address and connection are not validated here: a request issued
    /// while disconnected stays `Pending` until the transport reports an
    /// error, which fails it explicitly.
    pub fn request<R>(&self, request: R) -> u64
    where
        R: ServiceRequest,
    {
        let request_id = {
            let mut next_id = self.next_request_id.lock().unwrap();
            *next_id += 1;
            *next_id
        };

        self.requests.update(|map| {
            map.insert(
                request_id,
                RequestState {
                    request_id,
                    response_type: response_envelope_name::<R::Response>(),
                    status: RequestStatus::Pending,
                    response_bytes: None,
                },
            );
        });

        let envelope = RequestEnvelope {
            id: request_id,
            request,
        };

        let data = match bincode::serde::encode_to_vec(&envelope, bincode::config::standard()) {
            Ok(bytes) => bytes,
            Err(e) => {
                #[cfg(target_arch = "wasm32")]
                leptos::logging::error!(
                    "[ApiContext::request] failed to serialize '{}': {:?}",
                    R::request_name(),
                    e
                );
                self.requests.update(|map| {
                    if let Some(state) = map.get_mut(&request_id) {
                        state.status = RequestStatus::Error(format!("serialization failed: {e}"));
                    }
                });
                return request_id;
            }
        };

        let packet = WirePacket {
            type_name: request_envelope_name::<R>(),
            schema_hash: R::schema_hash(),
            data,
        };

        #[cfg(target_arch = "wasm32")]
        leptos::logging::log!(
            "[ApiContext::request] sending '{}' with id {} ({} bytes)",
            R::request_name(),
            request_id,
            packet.data.len()
        );

        (self.send)(&packet);
        request_id
    }

    /// Handle a response routed back from the server.
    ///
    /// Called by the provider when a response envelope is received. A
    /// response for an id that is no longer (or never was) tracked is a
    /// no-op; this covers a view unmounting while its fetch is in flight.
    pub(crate) fn handle_response(&self, response_id: u64, response_bytes: Vec<u8>) {
        self.requests.update(|map| {
            if let Some(state) = map.get_mut(&response_id) {
                state.status = RequestStatus::Success;
                state.response_bytes = Some(response_bytes);
            }
        });

        #[cfg(target_arch = "wasm32")]
        leptos::logging::log!("[ApiContext] request {} received response", response_id);
    }

    /// Mark a single request as failed.
    pub(crate) fn fail_request(&self, request_id: u64, message: &str) {
        self.requests.update(|map| {
            if let Some(state) = map.get_mut(&request_id) {
                state.status = RequestStatus::Error(message.to_string());
            }
        });
    }

    /// Mark every pending request as failed.
    ///
    /// Called by the provider when the transport errors; pending callers
    /// see the failure instead of waiting forever.
    pub(crate) fn fail_pending(&self, message: &str) {
        self.requests.update(|map| {
            for state in map.values_mut() {
                if state.status == RequestStatus::Pending {
                    state.status = RequestStatus::Error(message.to_string());
                }
            }
        });
    }

    /// Get a read-only signal for tracking request states.
    pub fn requests(&self) -> ReadSignal<HashMap<u64, RequestState>> {
        self.requests.read_only()
    }

    /// Get the response for a completed request, deserialized to the
    /// request's response type.
    ///
    /// Returns None while the request is pending or after it failed.
    pub fn get_response<R>(&self, request_id: u64) -> Option<R::Response>
    where
        R: ServiceRequest,
    {
        let requests = self.requests.get();
        let state = requests.get(&request_id)?;

        if state.status != RequestStatus::Success {
            return None;
        }

        let bytes = state.response_bytes.as_ref()?;

        match bincode::serde::decode_from_slice::<R::Response, _>(
            bytes,
            bincode::config::standard(),
        ) {
            Ok((response, _)) => Some(response),
            Err(_e) => {
                #[cfg(target_arch = "wasm32")]
                leptos::logging::error!(
                    "[ApiContext::get_response] failed to deserialize response: {:?}",
                    _e
                );
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Context wired to a capturing send closure instead of a WebSocket.
    pub(crate) fn stub_context() -> (ApiContext, Arc<Mutex<Vec<WirePacket>>>) {
        let sent: Arc<Mutex<Vec<WirePacket>>> = Arc::new(Mutex::new(Vec::new()));
        let send = {
            let sent = sent.clone();
            Arc::new(move |packet: &WirePacket| {
                sent.lock().unwrap().push(packet.clone());
            }) as Arc<dyn Fn(&WirePacket) + Send + Sync>
        };

        let ready_state = RwSignal::new(ConnectionReadyState::Open);
        let last_error = RwSignal::new(None::<ClientError>);
        let ctx = ApiContext::new(
            ready_state.into(),
            last_error.into(),
            send,
            Arc::new(|| {}),
            Arc::new(|| {}),
        );
        (ctx, sent)
    }
}

#[cfg(test)]
mod tests {
    use super::testing::stub_context;
    use super::*;
    use expenses_common::{decode_response_envelope, encode_response_envelope, WireMessage};
    use expenses_types::{InstrumentDto, ListInstruments, ListInstrumentsResponse};
    use expenses_types::{ListUsers, ListUsersResponse, PageInfo, UserDto};

    fn alice() -> UserDto {
        UserDto {
            id: 1,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            created_at_ms: 1_700_000_000_000,
            updated_at_ms: 1_700_000_000_000,
        }
    }

    fn encode<T: WireMessage>(value: &T) -> Vec<u8> {
        bincode::serde::encode_to_vec(value, bincode::config::standard()).unwrap()
    }

    #[test]
    fn test_request_is_tracked_and_sent() {
        let (ctx, sent) = stub_context();

        let id = ctx.request(ListUsers::default());

        let requests = ctx.requests().get_untracked();
        let state = requests.get(&id).unwrap();
        assert_eq!(state.status, RequestStatus::Pending);
        assert!(state.response_bytes.is_none());

        let packets = sent.lock().unwrap();
        assert_eq!(packets.len(), 1);
        assert!(packets[0].type_name.contains("ListUsers"));
        assert_eq!(packets[0].schema_hash, ListUsers::schema_hash());

        // The envelope carries the same correlation id the table tracks.
        let (envelope_id, _) = decode_response_envelope(&packets[0].data).unwrap();
        assert_eq!(envelope_id, id);
    }

    #[test]
    fn test_successful_response_roundtrip() {
        let (ctx, _sent) = stub_context();

        let id = ctx.request(ListUsers::default());
        assert_eq!(ctx.get_response::<ListUsers>(id), None);

        let response = ListUsersResponse {
            users: vec![alice()],
            page: PageInfo::default(),
        };
        ctx.handle_response(id, encode(&response));

        let decoded = ctx.get_response::<ListUsers>(id).unwrap();
        assert_eq!(decoded, response);
        assert_eq!(decoded.users[0].name, "Alice");
    }

    #[test]
    fn test_empty_list_response() {
        let (ctx, _sent) = stub_context();

        let id = ctx.request(ListInstruments::default());
        ctx.handle_response(id, encode(&ListInstrumentsResponse::default()));

        let decoded = ctx.get_response::<ListInstruments>(id).unwrap();
        assert_eq!(decoded.instruments, Vec::<InstrumentDto>::new());
    }

    #[test]
    fn test_failed_request_has_no_response() {
        let (ctx, _sent) = stub_context();

        let id = ctx.request(ListUsers::default());
        ctx.fail_request(id, "connection reset");

        let requests = ctx.requests().get_untracked();
        assert_eq!(
            requests.get(&id).unwrap().status,
            RequestStatus::Error("connection reset".to_string())
        );
        assert_eq!(ctx.get_response::<ListUsers>(id), None);
    }

    #[test]
    fn test_response_for_unknown_id_is_ignored() {
        let (ctx, _sent) = stub_context();

        let id = ctx.request(ListUsers::default());

        // A late response for a request nobody tracks anymore (or that never
        // existed) must not disturb the table or panic.
        ctx.handle_response(id + 1000, encode(&ListUsersResponse::default()));

        let requests = ctx.requests().get_untracked();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests.get(&id).unwrap().status, RequestStatus::Pending);
    }

    #[test]
    fn test_fail_pending_spares_completed_requests() {
        let (ctx, _sent) = stub_context();

        let done = ctx.request(ListUsers::default());
        ctx.handle_response(done, encode(&ListUsersResponse::default()));
        let pending = ctx.request(ListInstruments::default());

        ctx.fail_pending("socket closed");

        let requests = ctx.requests().get_untracked();
        assert_eq!(requests.get(&done).unwrap().status, RequestStatus::Success);
        assert_eq!(
            requests.get(&pending).unwrap().status,
            RequestStatus::Error("socket closed".to_string())
        );
    }

    #[test]
    fn test_request_ids_are_unique() {
        let (ctx, _sent) = stub_context();

        let a = ctx.request(ListUsers::default());
        let b = ctx.request(ListUsers::default());
        let c = ctx.request(ListInstruments::default());

        assert_ne!(a, b);
        assert_ne!(b, c);
    }

    #[test]
    fn test_encode_response_envelope_matches_provider_framing() {
        // What a peer (or test double) encodes, decode_response_envelope
        // splits back into the id and payload handle_response expects.
        let body = encode_response_envelope(7, &ListUsersResponse::default()).unwrap();
        let (id, payload) = decode_response_envelope(&body).unwrap();
        assert_eq!(id, 7);

        let (ctx, _sent) = stub_context();
        let request_id = ctx.request(ListUsers::default());
        assert_eq!(request_id, 1);
        ctx.handle_response(request_id, payload);
        assert_eq!(
            ctx.get_response::<ListUsers>(request_id),
            Some(ListUsersResponse::default())
        );
    }
}
