use std::convert::Infallible;

use axum::response::sse::Event;
use futures::stream::{self, Stream};
use shared::ItemChange;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

/// Fan-out of item changes to every open view.
#[derive(Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ItemChange>,
}

impl ChangeFeed {
    /// A capacity of zero is raised to one; the channel cannot be empty.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishing with nobody listening is not an error.
    pub fn publish(&self, change: ItemChange) {
        match self.sender.send(change) {
            Ok(listeners) => debug!("Change delivered to {} listener(s)", listeners),
            Err(_) => debug!("No listeners for item change"),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ItemChange> {
        self.sender.subscribe()
    }
}

/// Turns a feed subscription into server-sent events.
///
/// A subscriber that falls behind skips what it missed and keeps going;
/// views re-fetch on every event anyway.
pub fn event_stream(
    receiver: broadcast::Receiver<ItemChange>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(change) => match Event::default().event(change.event_name()).json_data(&change) {
                    Ok(event) => return Some((Ok(event), receiver)),
                    Err(e) => warn!("Failed to encode change event: {}", e),
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Change stream lagged, skipped {} event(s)", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    })
}
