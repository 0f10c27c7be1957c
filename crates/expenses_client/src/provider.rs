use std::sync::Arc;

use leptos::prelude::*;
use leptos_use::{
    use_websocket_with_options, DummyEncoder, UseWebSocketOptions, UseWebSocketReturn,
};
use leptos_use::core::ConnectionReadyState;

use expenses_common::codec::ExpensesBincodeCodec;
use expenses_common::{decode_response_envelope, is_response_envelope, WirePacket};

use crate::context::ApiContext;
use crate::error::ClientError;

/// Decode all length-prefixed WirePackets from a byte buffer.
/// The peer may batch multiple packets into a single WebSocket frame.
/// Each packet is prefixed with an 8-byte little-endian length.
fn decode_all_packets(data: &[u8]) -> Vec<WirePacket> {
    let mut packets = Vec::new();
    let mut offset = 0;

    while offset + 8 <= data.len() {
        let length_bytes: [u8; 8] = match data[offset..offset + 8].try_into() {
            Ok(b) => b,
            Err(_) => break,
        };
        let length = u64::from_le_bytes(length_bytes) as usize;
        offset += 8;

        if offset + length > data.len() {
            #[cfg(target_arch = "wasm32")]
            leptos::logging::warn!(
                "[ApiProvider] incomplete frame: need {} bytes, have {}",
                length,
                data.len() - offset
            );
            break;
        }

        match bincode::serde::decode_from_slice::<WirePacket, _>(
            &data[offset..offset + length],
            bincode::config::standard(),
        ) {
            Ok((packet, _)) => packets.push(packet),
            Err(_e) => {
                #[cfg(target_arch = "wasm32")]
                leptos::logging::warn!(
                    "[ApiProvider] failed to decode packet at offset {}: {:?}",
                    offset,
                    _e
                );
                break;
            }
        }

        offset += length;
    }

    packets
}

/// Route a single packet to the context.
///
/// Only response envelopes are expected from the peer; anything else is
/// logged and dropped.
fn route_packet(ctx: &ApiContext, packet: &WirePacket) {
    if is_response_envelope(&packet.type_name) {
        match decode_response_envelope(&packet.data) {
            Ok((response_id, response_bytes)) => {
                ctx.handle_response(response_id, response_bytes);
            }
            Err(_e) => {
                #[cfg(target_arch = "wasm32")]
                leptos::logging::warn!(
                    "[ApiProvider] failed to decode response envelope '{}': {:?}",
                    packet.type_name,
                    _e
                );
            }
        }
    } else {
        #[cfg(target_arch = "wasm32")]
        leptos::logging::log!(
            "[ApiProvider] ignoring unrecognized message type '{}'",
            packet.type_name
        );
    }
}

/// Provider component that owns the WebSocket transport and provides
/// [`ApiContext`] to its children.
///
/// Mount exactly one per application; every service client below it shares
/// the one connection. The url is taken as-is and not validated; a bad
/// address shows up as a transport error on first use, not at mount.
///
/// # Example
///
/// ```rust,ignore
/// use expenses_client::ApiProvider;
///
/// #[component]
/// pub fn App() -> impl IntoView {
///     view! {
///         <ApiProvider url="ws://127.0.0.1:8080/rpc".to_string()>
///             <MyAppUI />
///         </ApiProvider>
///     }
/// }
/// ```
#[component]
pub fn ApiProvider(
    /// WebSocket URL to connect to
    url: String,
    /// Whether to automatically connect on mount (default: true)
    #[prop(optional)]
    auto_connect: Option<bool>,
    /// Child components
    children: Children,
) -> impl IntoView {
    let auto_connect = auto_connect.unwrap_or(true);

    let last_error = RwSignal::new(None::<ClientError>);

    // The context must exist before use_websocket returns its send/open/close
    // functions, so those are stored behind StoredValues and filled in below.
    let send_fn: StoredValue<Option<Arc<dyn Fn(&WirePacket) + Send + Sync>>> =
        StoredValue::new(None);
    let open_fn: StoredValue<Option<Arc<dyn Fn() + Send + Sync>>> = StoredValue::new(None);
    let close_fn: StoredValue<Option<Arc<dyn Fn() + Send + Sync>>> = StoredValue::new(None);

    let send_arc = Arc::new({
        let send_fn = send_fn.clone();
        move |packet: &WirePacket| {
            if let Some(send) = send_fn.get_value() {
                send(packet);
            }
        }
    });

    let open_arc = Arc::new({
        let open_fn = open_fn.clone();
        move || {
            if let Some(open) = open_fn.get_value() {
                open();
            }
        }
    });

    let close_arc = Arc::new({
        let close_fn = close_fn.clone();
        move || {
            if let Some(close) = close_fn.get_value() {
                close();
            }
        }
    });

    let ready_state_signal = RwSignal::new(ConnectionReadyState::Closed);

    let ctx = ApiContext::new(
        ready_state_signal.into(),
        last_error.into(),
        send_arc,
        open_arc,
        close_arc,
    );

    // Provide context to children early so closures can use it
    provide_context(ctx.clone());

    let ctx_for_messages = ctx.clone();
    let ctx_for_errors = ctx.clone();
    let UseWebSocketReturn {
        ready_state,
        send: raw_send,
        open,
        close,
        ..
    } = use_websocket_with_options::<WirePacket, WirePacket, ExpensesBincodeCodec, (), DummyEncoder>(
        &url,
        UseWebSocketOptions::default()
            .immediate(auto_connect)
            .on_open(move |_| {
                #[cfg(target_arch = "wasm32")]
                leptos::logging::log!("[ApiProvider] WebSocket opened");
            })
            .on_error(move |e| {
                #[cfg(target_arch = "wasm32")]
                leptos::logging::warn!("[ApiProvider] WebSocket error: {:?}", e);

                let message = format!("{e:?}");
                last_error.try_update_untracked(|err| {
                    *err = Some(ClientError::Transport {
                        message: message.clone(),
                    })
                });
                last_error.notify();

                // Pending callers see the failure instead of waiting forever.
                ctx_for_errors.fail_pending(&message);
            })
            .on_message_raw_bytes(Arc::new(move |data: &[u8]| {
                for packet in decode_all_packets(data) {
                    route_packet(&ctx_for_messages, &packet);
                }
            })),
    );

    // Store the actual send/open/close functions
    send_fn.set_value(Some(Arc::new(move |packet: &WirePacket| {
        raw_send(packet);
    })));
    open_fn.set_value(Some(Arc::new(move || {
        open();
    })));
    close_fn.set_value(Some(Arc::new(move || {
        close();
    })));

    // Sync the ready_state from the WebSocket to the context's signal
    Effect::new(move || {
        let state = ready_state.get();
        ready_state_signal.set(state);
    });

    children()
}

#[cfg(test)]
mod tests {
    use super::*;
    use codee::Encoder;

    fn frame(packet: &WirePacket) -> Vec<u8> {
        ExpensesBincodeCodec::encode(packet).unwrap()
    }

    fn packet(type_name: &str, data: Vec<u8>) -> WirePacket {
        WirePacket {
            type_name: type_name.to_string(),
            schema_hash: 0xfeed,
            data,
        }
    }

    #[test]
    fn test_decode_single_packet() {
        let buffer = frame(&packet("ResponseEnvelope<A>", vec![1, 2, 3]));

        let decoded = decode_all_packets(&buffer);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].type_name, "ResponseEnvelope<A>");
        assert_eq!(decoded[0].data, vec![1, 2, 3]);
    }

    #[test]
    fn test_decode_batched_packets() {
        let mut buffer = frame(&packet("ResponseEnvelope<A>", vec![1]));
        buffer.extend(frame(&packet("ResponseEnvelope<B>", vec![2, 2])));

        let decoded = decode_all_packets(&buffer);
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].data, vec![1]);
        assert_eq!(decoded[1].data, vec![2, 2]);
    }

    #[test]
    fn test_decode_stops_at_truncated_tail() {
        let mut buffer = frame(&packet("ResponseEnvelope<A>", vec![1]));
        let second = frame(&packet("ResponseEnvelope<B>", vec![2; 16]));
        buffer.extend_from_slice(&second[..second.len() - 4]);

        let decoded = decode_all_packets(&buffer);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].type_name, "ResponseEnvelope<A>");
    }

    #[test]
    fn test_decode_garbage_yields_nothing() {
        assert!(decode_all_packets(&[0xff; 6]).is_empty());
    }
}
