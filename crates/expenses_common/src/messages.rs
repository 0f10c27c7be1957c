use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Mutex, OnceLock};

use crate::error::WireError;

/// Look up a cached `&'static str` for a type, computing and leaking it once.
///
/// Type names are requested on every send, so the format/leak cost is paid a
/// single time per type per cache.
fn cached_name(
    cache: &'static OnceLock<Mutex<HashMap<TypeId, &'static str>>>,
    type_id: TypeId,
    make: impl FnOnce() -> String,
) -> &'static str {
    let cache = cache.get_or_init(|| Mutex::new(HashMap::new()));

    {
        let guard = cache.lock().unwrap();
        if let Some(&name) = guard.get(&type_id) {
            return name;
        }
    }

    let name: &'static str = Box::leak(make().into_boxed_str());
    cache.lock().unwrap().insert(type_id, name);
    name
}

/// Network message with automatic type name generation and schema hashing.
///
/// This trait is automatically implemented for all types that are
/// `Serialize + DeserializeOwned + Send + Sync + 'static`.
///
/// The schema hash is computed from the short type name (without module
/// path) so it survives module refactoring on either end of the wire.
///
/// ## Example
///
/// ```rust
/// use serde::{Serialize, Deserialize};
/// use expenses_common::WireMessage;
///
/// #[derive(Serialize, Deserialize, Clone)]
/// struct ListUsers;
///
/// // No trait implementation needed.
/// assert_eq!(ListUsers::short_name(), "ListUsers");
/// ```
pub trait WireMessage: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Full type name for this message type, including module path.
    ///
    /// Example: `"expenses_types::ListUsers"`
    fn type_name() -> &'static str {
        static CACHE: OnceLock<Mutex<HashMap<TypeId, &'static str>>> = OnceLock::new();
        cached_name(&CACHE, TypeId::of::<Self>(), || {
            std::any::type_name::<Self>().to_string()
        })
    }

    /// Short type name (just the struct name, no module path).
    ///
    /// Example: `"ListUsers"`
    fn short_name() -> &'static str {
        static CACHE: OnceLock<Mutex<HashMap<TypeId, &'static str>>> = OnceLock::new();
        cached_name(&CACHE, TypeId::of::<Self>(), || {
            let full = Self::type_name();
            full.rsplit("::").next().unwrap_or(full).to_string()
        })
    }

    /// Hash of the message schema, computed from the short type name.
    ///
    /// Two types with the same short name (e.g. `foo::Message` and
    /// `bar::Message`) hash identically; that collision is caught when both
    /// are routed in the same process, not here.
    fn schema_hash() -> u64 {
        use std::hash::{Hash, Hasher};

        static CACHE: OnceLock<Mutex<HashMap<TypeId, u64>>> = OnceLock::new();
        let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));

        let type_id = TypeId::of::<Self>();
        {
            let guard = cache.lock().unwrap();
            if let Some(&hash) = guard.get(&type_id) {
                return hash;
            }
        }

        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        Self::short_name().hash(&mut hasher);
        let hash = hasher.finish();
        cache.lock().unwrap().insert(type_id, hash);
        hash
    }
}

// Blanket implementation for all serializable types
impl<T> WireMessage for T where T: Serialize + DeserializeOwned + Send + Sync + 'static {}

/// Marks a type as a service request with an associated response type.
///
/// This is the typed-stub contract: one `ServiceRequest` impl per remote
/// operation, pairing the request message with its response message.
///
/// # Example
///
/// ```rust
/// use serde::{Serialize, Deserialize};
/// use expenses_common::ServiceRequest;
///
/// #[derive(Clone, Debug, Serialize, Deserialize)]
/// struct ListUsers;
///
/// #[derive(Clone, Debug, Serialize, Deserialize)]
/// struct ListUsersResponse {
///     users: Vec<String>,
/// }
///
/// impl ServiceRequest for ListUsers {
///     type Response = ListUsersResponse;
/// }
///
/// assert_eq!(ListUsers::request_name(), "ListUsers");
/// ```
pub trait ServiceRequest: WireMessage + Clone + Debug {
    /// The response type for the request.
    type Response: WireMessage + Clone + Debug;

    /// Request name, derived from the short type name.
    fn request_name() -> &'static str {
        Self::short_name()
    }
}

/// Correlation wrapper carrying a request over the wire.
///
/// The peer echoes `id` back in the matching response envelope so the
/// client can route the response to the caller that issued the request.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(bound = "T: WireMessage")]
pub struct RequestEnvelope<T: WireMessage> {
    pub id: u64,
    pub request: T,
}

/// Wire type name for a request envelope around `R`.
pub fn request_envelope_name<R: WireMessage>() -> String {
    format!("RequestEnvelope<{}>", R::type_name())
}

/// Wire type name for a response envelope around `T`.
pub fn response_envelope_name<T: WireMessage>() -> String {
    format!("ResponseEnvelope<{}>", T::type_name())
}

/// Whether a packet's type name denotes a response envelope.
pub fn is_response_envelope(type_name: &str) -> bool {
    type_name.starts_with("ResponseEnvelope<")
}

/// Split a response envelope body into its correlation id and payload bytes.
///
/// The envelope is `{ id: u64, response: T }` under bincode's standard
/// config, so the body is a varint-encoded id followed by the payload.
pub fn decode_response_envelope(data: &[u8]) -> Result<(u64, Vec<u8>), WireError> {
    let (id, bytes_read) =
        bincode::serde::decode_from_slice::<u64, _>(data, bincode::config::standard())
            .map_err(|_| WireError::Serialization)?;
    Ok((id, data[bytes_read..].to_vec()))
}

/// Encode a response envelope body: correlation id followed by the payload.
///
/// Counterpart of [`decode_response_envelope`]; used by peers and by test
/// doubles standing in for one.
pub fn encode_response_envelope<T: WireMessage>(id: u64, response: &T) -> Result<Vec<u8>, WireError> {
    let config = bincode::config::standard();
    let mut body =
        bincode::serde::encode_to_vec(id, config).map_err(|_| WireError::Serialization)?;
    let payload =
        bincode::serde::encode_to_vec(response, config).map_err(|_| WireError::Serialization)?;
    body.extend_from_slice(&payload);
    Ok(body)
}
