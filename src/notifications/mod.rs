use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error};

use crate::models::ProfileSnapshot;
use crate::traits::event_handler::ProfileEventHandler;

/// Notification types
#[derive(Debug, Clone)]
pub enum Notification {
    ProfileChange(Box<ProfileSnapshot>),
    Error(String),
    Shutdown,
}

/// Notification queue for async processing
pub struct NotificationQueue {
    sender: UnboundedSender<Notification>,
}

impl NotificationQueue {
    /// Create a new notification queue. Must be called from within a Tokio runtime.
    pub fn new(handler: Arc<dyn ProfileEventHandler>) -> Self {
        let (sender, receiver) = unbounded_channel();

        // Handlers may be slow; keep them off the aggregator's path
        tokio::spawn(Self::process_notifications(receiver, handler));

        Self { sender }
    }

    async fn process_notifications(
        mut receiver: UnboundedReceiver<Notification>,
        handler: Arc<dyn ProfileEventHandler>,
    ) {
        while let Some(notification) = receiver.recv().await {
            match notification {
                Notification::ProfileChange(snapshot) => {
                    handler.handle_profile_change(*snapshot).await;
                }
                Notification::Error(err_msg) => {
                    let err = anyhow::anyhow!("{}", err_msg);
                    handler.handle_error(&err).await;
                }
                Notification::Shutdown => {
                    debug!("Notification processor shutting down");
                    break;
                }
            }
        }
    }

    /// Queue a snapshot notification (non-blocking)
    pub fn notify_profile_change(&self, snapshot: ProfileSnapshot) {
        if let Err(e) = self.sender.send(Notification::ProfileChange(Box::new(snapshot))) {
            error!("Failed to queue profile change notification: {}", e);
        }
    }

    /// Queue an error notification (non-blocking)
    pub fn notify_error(&self, error: &anyhow::Error) {
        if let Err(e) = self.sender.send(Notification::Error(format!("{:#}", error))) {
            error!("Failed to queue error notification: {}", e);
        }
    }

    /// Stop the processing task after queued notifications are handled
    pub fn shutdown(&self) {
        // The processor may already be gone
        let _ = self.sender.send(Notification::Shutdown);
    }
}

impl Clone for NotificationQueue {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}
