//! Instrument notification channel (Socket.IO)
//!
//! Callbacks run on the Socket.IO client's tasks; they only decode and
//! enqueue. All processing happens on the receiving side of the queue, in
//! arrival order.

use crate::event::SampleEvent;
use futures::FutureExt;
use rust_socketio::asynchronous::{Client, ClientBuilder};
use rust_socketio::Payload;
use sph_common::{Error, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Decode a Socket.IO `message` payload into notifications
///
/// Binary payloads carry no notification and are dropped.
pub fn events_from_payload(payload: &Payload) -> Vec<SampleEvent> {
    match payload {
        Payload::Text(values) => values.iter().map(SampleEvent::from_json).collect(),
        _ => {
            debug!("Ignoring non-text notification payload");
            Vec::new()
        }
    }
}

/// Connect to the instrument's notification channel
///
/// Returns the live client (keep it alive for as long as events are wanted)
/// and the queue of decoded notifications.
pub async fn subscribe(notify_url: &str) -> Result<(Client, mpsc::UnboundedReceiver<SampleEvent>)> {
    let (tx, rx) = mpsc::unbounded_channel();

    let client = ClientBuilder::new(notify_url)
        .on("open", |_payload, _client| {
            async move { info!("Connected to instrument notification channel") }.boxed()
        })
        .on("close", |_payload, _client| {
            async move { warn!("Disconnected from instrument notification channel") }.boxed()
        })
        .on("error", |payload, _client| {
            async move { warn!(?payload, "Notification channel error") }.boxed()
        })
        .on("message", move |payload, _client| {
            let tx = tx.clone();
            async move {
                debug!(?payload, "Message received");
                for event in events_from_payload(&payload) {
                    if tx.send(event).is_err() {
                        debug!("Notification queue closed, dropping message");
                    }
                }
            }
            .boxed()
        })
        .connect()
        .await
        .map_err(|e| Error::Instrument(format!("Failed to connect to {}: {}", notify_url, e)))?;

    info!(url = notify_url, "Subscribed to sample notifications");
    Ok((client, rx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_payload_decoded() {
        let payload = Payload::Text(vec![json!({"ready": "sample"}), json!({"ready": "idle"})]);
        let events = events_from_payload(&payload);

        assert_eq!(events.len(), 2);
        assert!(events[0].is_sample_ready());
        assert!(!events[1].is_sample_ready());
    }

    #[test]
    fn test_binary_payload_dropped() {
        let payload = Payload::Binary(vec![1u8, 2, 3].into());
        assert!(events_from_payload(&payload).is_empty());
    }
}
