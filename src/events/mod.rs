use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::notification::NotificationKind;
use crate::services::notifications::{NewNotification, NotificationService};

#[derive(Debug, Clone)]
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
}

/// Domain events published by the services after a successful write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    OrderCreated {
        order_id: Uuid,
        order_number: String,
    },
    OrderUpdated(Uuid),
    OrderDeleted(Uuid),
    OrderStatusChanged {
        order_id: Uuid,
        order_number: String,
        old_status: String,
        new_status: String,
        assigned_user_id: Option<Uuid>,
    },
    TotalsReconciled {
        orders_scanned: u64,
        orders_repaired: u64,
        items_repaired: u64,
    },
    CompanyCreated(Uuid),
    CompanyDeleted(Uuid),
    LeadConverted {
        lead_id: Uuid,
        company_id: Uuid,
        contact_id: Uuid,
    },
    ArtworkCardMoved {
        card_id: Uuid,
        title: String,
        from_column: Uuid,
        to_column: Uuid,
        to_column_name: String,
        assigned_user_id: Option<Uuid>,
    },
    SequenceEnrollmentCompleted {
        enrollment_id: Uuid,
        sequence_id: Uuid,
    },
}

/// Creates the channel pair used between services and [`process_events`].
pub fn channel(capacity: usize) -> (Arc<EventSender>, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (Arc::new(EventSender::new(tx)), rx)
}

/// Consumes events until every sender is dropped. Events that concern a
/// user turn into notifications; everything else is logged.
pub async fn process_events(mut rx: mpsc::Receiver<Event>, db: Arc<DbPool>) {
    info!("Starting event processing loop");
    let notifications = NotificationService::new(db);

    while let Some(event) = rx.recv().await {
        debug!(?event, "Received event");

        log_event(&event);

        if let Some(notification) = notification_for(&event) {
            if let Err(e) = notifications.create(notification).await {
                error!(error = %e, ?event, "Failed to write notification for event");
            }
        }
    }

    info!("Event channel closed; event processing stopped");
}

fn log_event(event: &Event) {
    match event {
        Event::OrderCreated {
            order_id,
            order_number,
        } => info!(order_id = %order_id, order_number = %order_number, "order created"),
        Event::OrderUpdated(id) => info!(order_id = %id, "order updated"),
        Event::OrderDeleted(id) => info!(order_id = %id, "order deleted"),
        Event::OrderStatusChanged {
            order_id,
            old_status,
            new_status,
            ..
        } => info!(order_id = %order_id, old_status = %old_status, new_status = %new_status, "order status changed"),
        Event::TotalsReconciled {
            orders_scanned,
            orders_repaired,
            items_repaired,
        } => {
            if *orders_repaired > 0 || *items_repaired > 0 {
                warn!(orders_scanned, orders_repaired, items_repaired, "order totals repaired");
            } else {
                info!(orders_scanned, "order totals consistent");
            }
        }
        Event::CompanyCreated(id) => info!(company_id = %id, "company created"),
        Event::CompanyDeleted(id) => info!(company_id = %id, "company deleted"),
        Event::LeadConverted {
            lead_id,
            company_id,
            ..
        } => info!(lead_id = %lead_id, company_id = %company_id, "lead converted"),
        Event::ArtworkCardMoved {
            card_id,
            from_column,
            to_column,
            ..
        } => info!(card_id = %card_id, from = %from_column, to = %to_column, "artwork card moved"),
        Event::SequenceEnrollmentCompleted {
            enrollment_id,
            sequence_id,
        } => info!(enrollment_id = %enrollment_id, sequence_id = %sequence_id, "sequence enrollment completed"),
    }
}

fn notification_for(event: &Event) -> Option<NewNotification> {
    match event {
        Event::OrderStatusChanged {
            order_id,
            order_number,
            new_status,
            assigned_user_id: Some(user_id),
            ..
        } => Some(NewNotification {
            user_id: *user_id,
            title: format!("Order {} updated", order_number),
            message: format!("Order {} is now {}", order_number, new_status.replace('_', " ")),
            kind: if new_status == "cancelled" {
                NotificationKind::Warning
            } else {
                NotificationKind::Info
            },
            entity_type: Some("order".to_string()),
            entity_id: Some(*order_id),
        }),
        Event::ArtworkCardMoved {
            card_id,
            title,
            from_column,
            to_column,
            to_column_name,
            assigned_user_id: Some(user_id),
        } if from_column != to_column => Some(NewNotification {
            user_id: *user_id,
            title: "Artwork card moved".to_string(),
            message: format!("\"{}\" moved to {}", title, to_column_name),
            kind: NotificationKind::Info,
            entity_type: Some("artwork_card".to_string()),
            entity_id: Some(*card_id),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_change_without_assignee_is_not_notified() {
        let event = Event::OrderStatusChanged {
            order_id: Uuid::new_v4(),
            order_number: "ORD-1".into(),
            old_status: "quote".into(),
            new_status: "approved".into(),
            assigned_user_id: None,
        };
        assert!(notification_for(&event).is_none());
    }

    #[test]
    fn cancellation_is_a_warning() {
        let user = Uuid::new_v4();
        let event = Event::OrderStatusChanged {
            order_id: Uuid::new_v4(),
            order_number: "ORD-7".into(),
            old_status: "approved".into(),
            new_status: "cancelled".into(),
            assigned_user_id: Some(user),
        };
        let n = notification_for(&event).unwrap();
        assert_eq!(n.user_id, user);
        assert_eq!(n.kind, NotificationKind::Warning);
        assert_eq!(n.message, "Order ORD-7 is now cancelled");
    }

    #[test]
    fn card_moved_within_column_is_not_notified() {
        let column = Uuid::new_v4();
        let event = Event::ArtworkCardMoved {
            card_id: Uuid::new_v4(),
            title: "Logo v2".into(),
            from_column: column,
            to_column: column,
            to_column_name: "In Progress".into(),
            assigned_user_id: Some(Uuid::new_v4()),
        };
        assert!(notification_for(&event).is_none());
    }
}
