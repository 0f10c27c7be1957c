use thiserror::Error;

/// Errors that can occur when using the expenses client library.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The WebSocket is not connected to the server.
    #[error("not connected to server")]
    NotConnected,

    /// A request failed to serialize before sending.
    #[error("failed to serialize request '{type_name}': {message}")]
    Serialization {
        /// Request type name that failed to serialize
        type_name: String,
        /// Error message from the serializer
        message: String,
    },

    /// A response body failed to deserialize.
    #[error("failed to deserialize response '{type_name}': {message}")]
    Deserialization {
        /// Response type name that failed to deserialize
        type_name: String,
        /// Error message from the deserializer
        message: String,
    },

    /// The transport reported an error.
    #[error("transport error: {message}")]
    Transport { message: String },
}
