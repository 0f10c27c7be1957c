use codee::{Decoder, Encoder};

use crate::error::WireError;
use crate::WirePacket;

/// Codec for the expenses WebSocket protocol.
///
/// Frames are an 8-byte little-endian length prefix followed by a
/// bincode-serialized [`WirePacket`]. The application layer wraps messages
/// in `WirePacket` before sending and routes received packets by
/// `type_name`.
///
/// ## Usage
///
/// ```rust,ignore
/// use expenses_common::codec::ExpensesBincodeCodec;
/// use expenses_common::WirePacket;
///
/// let ws = use_websocket_with_options::<WirePacket, WirePacket, ExpensesBincodeCodec, _, _>(
///     "ws://127.0.0.1:8080/rpc",
///     options,
/// );
/// ```
pub struct ExpensesBincodeCodec;

impl Encoder<WirePacket> for ExpensesBincodeCodec {
    type Error = WireError;
    type Encoded = Vec<u8>;

    fn encode(val: &WirePacket) -> Result<Self::Encoded, Self::Error> {
        let body = bincode::serde::encode_to_vec(val, bincode::config::standard())
            .map_err(|_| WireError::Serialization)?;

        let len = body.len() as u64;
        let mut buffer = Vec::with_capacity(8 + body.len());
        buffer.extend_from_slice(&len.to_le_bytes());
        buffer.extend_from_slice(&body);

        Ok(buffer)
    }
}

impl Decoder<WirePacket> for ExpensesBincodeCodec {
    type Error = WireError;
    type Encoded = [u8];

    fn decode(val: &Self::Encoded) -> Result<WirePacket, Self::Error> {
        if val.len() < 8 {
            return Err(WireError::Truncated {
                needed: 8,
                have: val.len(),
            });
        }

        let length_bytes: [u8; 8] = val[..8].try_into().map_err(|_| WireError::Serialization)?;
        let length = u64::from_le_bytes(length_bytes) as usize;
        if val.len() - 8 < length {
            #[cfg(target_arch = "wasm32")]
            web_sys::console::warn_1(
                &format!(
                    "[ExpensesBincodeCodec] truncated frame: need {} bytes, have {}",
                    length,
                    val.len() - 8
                )
                .into(),
            );
            return Err(WireError::Truncated {
                needed: length,
                have: val.len() - 8,
            });
        }

        bincode::serde::decode_from_slice(&val[8..8 + length], bincode::config::standard())
            .map(|(packet, _)| packet)
            .map_err(|_| WireError::Serialization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_roundtrip() {
        let packet = WirePacket {
            type_name: "TestMessage".to_string(),
            schema_hash: 0x1234567890abcdef,
            data: vec![1, 2, 3, 4, 5],
        };

        let enc = ExpensesBincodeCodec::encode(&packet).unwrap();

        // 8-byte length prefix + encoded packet
        assert!(enc.len() > 8);
        let length_bytes: [u8; 8] = enc[..8].try_into().unwrap();
        let length = u64::from_le_bytes(length_bytes);
        assert_eq!(length as usize, enc.len() - 8);

        let dec: WirePacket = ExpensesBincodeCodec::decode(&enc).unwrap();
        assert_eq!(dec.type_name, packet.type_name);
        assert_eq!(dec.schema_hash, packet.schema_hash);
        assert_eq!(dec.data, packet.data);
    }

    #[test]
    fn test_codec_rejects_short_frame() {
        let err = ExpensesBincodeCodec::decode(&[0u8; 4]).unwrap_err();
        assert_eq!(err, WireError::Truncated { needed: 8, have: 4 });
    }

    #[test]
    fn test_codec_rejects_truncated_body() {
        let packet = WirePacket {
            type_name: "TestMessage".to_string(),
            schema_hash: 1,
            data: vec![9; 32],
        };
        let mut enc = ExpensesBincodeCodec::encode(&packet).unwrap();
        enc.truncate(enc.len() - 10);

        assert!(matches!(
            ExpensesBincodeCodec::decode(&enc),
            Err(WireError::Truncated { .. })
        ));
    }
}
