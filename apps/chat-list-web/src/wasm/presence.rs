use super::*;

pub(super) struct PresenceSocket {
    generation: u64,
    sink: SplitSink<WebSocket, WsMessage>,
}

/// Opens the presence websocket and forwards its events to the mounted view.
pub(super) struct WebSocketConnector;

impl PresenceConnector for WebSocketConnector {
    fn connect(&self, url: &str) -> Result<(), ChannelError> {
        let socket = WebSocket::open(url).map_err(|error| ChannelError::Connect(error.to_string()))?;
        let (sink, mut stream) = socket.split();
        let generation = PRESENCE_GENERATION.with(|counter| {
            let next = counter.get().saturating_add(1);
            counter.set(next);
            next
        });
        PRESENCE_SOCKET.with(|slot| *slot.borrow_mut() = Some(PresenceSocket { generation, sink }));

        spawn_local(async move {
            let mut close_reported = false;
            while let Some(frame) = stream.next().await {
                let event = match frame {
                    Ok(message) => frame_event(message),
                    Err(WebSocketError::ConnectionClose(close)) => {
                        close_reported = true;
                        ChannelEvent::Closed {
                            code: Some(close.code),
                            reason: close.reason,
                        }
                    }
                    Err(error) => ChannelEvent::TransportError(error.to_string()),
                };
                dispatch_channel_event(generation, event);
                if close_reported {
                    break;
                }
            }
            if !close_reported {
                dispatch_channel_event(
                    generation,
                    ChannelEvent::Closed {
                        code: None,
                        reason: "stream ended".to_string(),
                    },
                );
            }
        });
        Ok(())
    }

    fn disconnect(&self) {
        let socket = PRESENCE_SOCKET.with(|slot| slot.borrow_mut().take());
        let Some(mut socket) = socket else {
            return;
        };
        debug!(generation = socket.generation, "closing presence socket");
        spawn_local(async move {
            if let Err(error) = socket.sink.close().await {
                warn!(%error, "presence socket close failed");
            }
        });
    }
}

// Frames from a socket that has since been replaced or torn down are dropped.
fn dispatch_channel_event(generation: u64, event: ChannelEvent) {
    let is_current = PRESENCE_SOCKET.with(|slot| {
        slot.borrow()
            .as_ref()
            .is_some_and(|socket| socket.generation == generation)
    });
    if !is_current {
        return;
    }
    if matches!(event, ChannelEvent::Closed { .. }) {
        let _ = PRESENCE_SOCKET.with(|slot| slot.borrow_mut().take());
    }
    if let Some(view) = current_view() {
        view.handle_channel_event(event);
    }
}

// Binary frames are decoded strictly by the channel.
fn frame_event(message: WsMessage) -> ChannelEvent {
    match message {
        WsMessage::Text(text) => ChannelEvent::Message(text),
        WsMessage::Bytes(bytes) => ChannelEvent::Binary(bytes),
    }
}
