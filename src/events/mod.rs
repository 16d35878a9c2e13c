use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Handle for publishing domain events to the background processor.
#[derive(Clone, Debug)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Publishes without ever failing the caller; a full or closed channel is logged.
    pub fn send_or_log(&self, event: Event) {
        if let Err(err) = self.sender.try_send(event) {
            warn!(error = %err, "dropping domain event");
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    ProductCreated { factory_id: i32, article: String },
    ProductUpdated { factory_id: i32, article: String },
    ProductDeleted { factory_id: i32, article: String },
    ThemeSaved { theme_id: i32, is_default: bool, is_active: bool },
    ThemeDeleted(i32),
    FavoriteToggled { user_id: i32, product_id: i32, is_favorite: bool },
}

/// Drains the event channel until every sender is dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::ProductCreated { factory_id, article } => {
                info!(factory_id, article = %article, "product created");
            }
            Event::ProductUpdated { factory_id, article } => {
                debug!(factory_id, article = %article, "product updated");
            }
            Event::ProductDeleted { factory_id, article } => {
                info!(factory_id, article = %article, "product deleted");
            }
            Event::ThemeSaved {
                theme_id,
                is_default,
                is_active,
            } => {
                info!(theme_id, is_default, is_active, "theme saved");
            }
            Event::ThemeDeleted(theme_id) => info!(theme_id, "theme deleted"),
            Event::FavoriteToggled {
                user_id,
                product_id,
                is_favorite,
            } => {
                debug!(user_id, product_id, is_favorite, "favorite toggled");
            }
        }
    }

    info!("Event processing loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_or_log_drops_when_channel_is_full() {
        let (tx, mut rx) = mpsc::channel(1);
        let sender = EventSender::new(tx);

        sender.send_or_log(Event::ThemeDeleted(1));
        sender.send_or_log(Event::ThemeDeleted(2));

        assert_eq!(rx.recv().await, Some(Event::ThemeDeleted(1)));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn processor_exits_when_senders_are_dropped() {
        let (tx, rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);
        sender
            .send(Event::ProductCreated {
                factory_id: 7,
                article: "7-000001".into(),
            })
            .await
            .unwrap();
        drop(sender);

        tokio::time::timeout(std::time::Duration::from_secs(1), process_events(rx))
            .await
            .unwrap();
    }
}
