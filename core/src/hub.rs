//! The event hub (C4): fans out [`Event`]s to every connection subscribed
//! to a game. One `broadcast` channel per game; a
//! subscriber that falls behind the channel's buffer sees `Lagged` and
//! should resync via a full-state fetch rather than trust the stream.

use diplomacy_protocol::{Event, GameId};
use std::collections::HashMap;
use tokio::sync::{broadcast, RwLock};
use tracing::trace;

const CHANNEL_CAPACITY: usize = 256;

/// The hub contract.
#[async_trait::async_trait]
pub trait EventHub: Send + Sync {
    /// Publishes an event to every current subscriber of `event.game`.
    /// A game with no subscribers simply drops it — the hub is not durable;
    /// clients reconstruct state from the log on reconnect.
    async fn publish(&self, event: Event);

    /// Subscribes to a game's event stream, creating its channel if this
    /// is the first subscriber.
    async fn subscribe(&self, game: GameId) -> broadcast::Receiver<Event>;

    /// Drops a game's channel once no more subscribers remain. Harmless
    /// to skip — idle channels cost one empty map entry — but keeps long
    /// server uptimes from accumulating memory for finished games.
    async fn retire(&self, game: GameId);
}

/// An in-memory [`EventHub`] backed by `tokio::sync::broadcast`.
#[derive(Default)]
pub struct BroadcastHub {
    channels: RwLock<HashMap<GameId, broadcast::Sender<Event>>>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self::default()
    }

    async fn sender_for(&self, game: GameId) -> broadcast::Sender<Event> {
        if let Some(tx) = self.channels.read().await.get(&game) {
            return tx.clone();
        }
        let mut channels = self.channels.write().await;
        channels.entry(game).or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0).clone()
    }
}

#[async_trait::async_trait]
impl EventHub for BroadcastHub {
    async fn publish(&self, event: Event) {
        let tx = self.sender_for(event.game).await;
        // No receivers is not an error: a game with nobody watching still resolves phases.
        let _ = tx.send(event);
        trace!(game = ?tx.receiver_count(), "published event");
    }

    async fn subscribe(&self, game: GameId) -> broadcast::Receiver<Event> {
        self.sender_for(game).await.subscribe()
    }

    async fn retire(&self, game: GameId) {
        let mut channels = self.channels.write().await;
        if let Some(tx) = channels.get(&game) {
            if tx.receiver_count() == 0 {
                channels.remove(&game);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diplomacy_protocol::EventKind;

    #[tokio::test]
    async fn every_subscriber_receives_a_published_event() {
        let hub = BroadcastHub::new();
        let game = GameId::new();
        let mut a = hub.subscribe(game).await;
        let mut b = hub.subscribe(game).await;

        hub.publish(Event::new(game, EventKind::GameStarted)).await;

        let ea = a.recv().await.unwrap();
        let eb = b.recv().await.unwrap();
        assert_eq!(ea.game, game);
        assert_eq!(eb.game, game);
    }

    #[tokio::test]
    async fn publishing_with_no_subscribers_does_not_panic() {
        let hub = BroadcastHub::new();
        let game = GameId::new();
        hub.publish(Event::new(game, EventKind::GameStarted)).await;
    }
}
