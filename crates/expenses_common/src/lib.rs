pub mod messages;
pub use messages::*;

pub mod codec;
pub mod error;

use serde::{Deserialize, Serialize};

use std::fmt::Debug;

#[derive(Serialize, Deserialize, Clone)]
/// [`WirePacket`]s are untyped packets to be sent over the wire.
///
/// The packet carries a human-readable type name (for routing and debugging)
/// and a schema hash computed from the short type name, which stays stable
/// when a type moves between modules.
pub struct WirePacket {
    /// Full type name including module path
    /// Example: "expenses_types::ListUsers"
    pub type_name: String,
    /// Schema hash computed from the short type name
    pub schema_hash: u64,
    /// The bincode-serialized message body
    pub data: Vec<u8>,
}

impl Debug for WirePacket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WirePacket")
            .field("type_name", &self.type_name)
            .field("schema_hash", &format_args!("0x{:016x}", self.schema_hash))
            .field("data_len", &self.data.len())
            .finish()
    }
}
