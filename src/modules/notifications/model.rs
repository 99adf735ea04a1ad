//! Notification event shapes.

use serde::Serialize;

use slateboard_models::exchange::ExchangeType;
use slateboard_models::ids::{ClassId, ExchangeRequestId, UserId};

/// Who a notification is addressed to.
#[derive(Debug, Clone)]
pub enum ReceiverScope {
    Users(Vec<UserId>),
    Class(ClassId),
    School,
}

/// Link back to the record a notification is about.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RelatedObject {
    pub id: ExchangeRequestId,
    pub request_type: ExchangeType,
}

/// A notification to be persisted by the notify capability.
#[derive(Debug, Clone)]
pub struct NotifyEvent {
    pub notification_type: &'static str,
    pub title: String,
    pub content: String,
    pub sender_id: Option<UserId>,
    pub receivers: ReceiverScope,
    pub related: Option<RelatedObject>,
}
