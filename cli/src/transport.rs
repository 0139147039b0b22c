//! `tokio-tungstenite` transport for native hosts.
//!
//! Each connect spawns one task that owns the socket: it forwards outbound
//! text from an unbounded channel and pushes inbound text into the session's
//! sink. Closing the transport ends the outbound channel; the task flushes
//! what is queued, sends a websocket close frame, and exits.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::time::Duration;

use arena_lobby::{ChannelError, Connector, Transport, TransportEvent, TransportSink};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

/// How long the close handshake may take before the socket is dropped anyway.
const CLOSE_GRACE: Duration = Duration::from_secs(2);

#[derive(Clone, Copy, Debug, Default)]
pub struct TungsteniteConnector;

pub struct TungsteniteTransport {
    outbound: Option<UnboundedSender<String>>,
}

impl Connector for TungsteniteConnector {
    type Transport = TungsteniteTransport;

    fn connect(&mut self, url: &str, sink: TransportSink) -> Result<TungsteniteTransport, ChannelError> {
        let url = url.to_owned();
        let (outbound, mut outbound_rx) = unbounded_channel::<String>();

        tokio::spawn(async move {
            let stream = match connect_async(url.as_str()).await {
                Ok((stream, _)) => stream,
                Err(error) => {
                    warn!(%error, %url, "lobby socket connect failed");
                    sink.push(TransportEvent::Closed);
                    return;
                }
            };
            sink.push(TransportEvent::Opened);
            let (mut write, mut read) = stream.split();

            loop {
                tokio::select! {
                    out = outbound_rx.recv() => {
                        let Some(text) = out else {
                            let goodbye = write.send(Message::Close(None));
                            if tokio::time::timeout(CLOSE_GRACE, goodbye).await.is_err() {
                                debug!("lobby socket close frame timed out");
                            }
                            break;
                        };
                        if let Err(error) = write.send(Message::Text(text.into())).await {
                            warn!(%error, "lobby socket send failed");
                            break;
                        }
                    }
                    incoming = read.next() => {
                        match incoming {
                            Some(Ok(Message::Text(text))) => {
                                if !sink.push(TransportEvent::Text(text.as_str().to_owned())) {
                                    break;
                                }
                            }
                            Some(Ok(Message::Close(_))) | None => break,
                            Some(Ok(_)) => {}
                            Some(Err(error)) => {
                                warn!(%error, "lobby socket receive failed");
                                break;
                            }
                        }
                    }
                }
            }

            debug!("lobby socket finished");
            sink.push(TransportEvent::Closed);
        });

        Ok(TungsteniteTransport { outbound: Some(outbound) })
    }
}

impl Transport for TungsteniteTransport {
    fn send_text(&mut self, text: String) -> Result<(), ChannelError> {
        let Some(outbound) = self.outbound.as_ref() else {
            return Err(ChannelError::TransportClosed);
        };
        outbound.send(text).map_err(|_| ChannelError::TransportClosed)
    }

    fn close(&mut self) {
        self.outbound = None;
    }
}
