use thiserror::Error;

/// Errors produced by the wire codec layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    /// A packet or message body failed to serialize or deserialize.
    #[error("failed to encode or decode wire data")]
    Serialization,

    /// A frame was shorter than its length prefix requires.
    #[error("wire frame truncated: need {needed} bytes, have {have}")]
    Truncated { needed: usize, have: usize },
}
