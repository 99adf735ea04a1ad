use sqlx::PgPool;
use tracing::instrument;

use slateboard_core::AppError;
use slateboard_models::users::User;

use crate::modules::notifications::model::{NotifyEvent, ReceiverScope};

pub struct NotificationService;

impl NotificationService {
    /// Persist notification records for the event's receiver scope.
    ///
    /// User scopes fan out to one row per user; class and school scopes are
    /// stored as a single row that the delivery service expands.
    #[instrument(skip(db, event), fields(notification_type = event.notification_type))]
    pub async fn notify(db: &PgPool, event: NotifyEvent) -> Result<(), AppError> {
        let (related_id, related_type) = match event.related {
            Some(related) => (Some(related.id), Some(related.request_type.as_str())),
            None => (None, None),
        };

        match &event.receivers {
            ReceiverScope::Users(ids) => {
                for user_id in ids {
                    sqlx::query(
                        r#"INSERT INTO notifications
                               (notification_type, title, content, sender_id,
                                receiver_type, receiver_id, related_id, related_type)
                           VALUES ($1, $2, $3, $4, 'user', $5, $6, $7)"#,
                    )
                    .bind(event.notification_type)
                    .bind(&event.title)
                    .bind(&event.content)
                    .bind(event.sender_id)
                    .bind(user_id)
                    .bind(related_id)
                    .bind(related_type)
                    .execute(db)
                    .await?;
                }
            }
            ReceiverScope::Class(class_id) => {
                sqlx::query(
                    r#"INSERT INTO notifications
                           (notification_type, title, content, sender_id,
                            receiver_type, receiver_id, related_id, related_type)
                       VALUES ($1, $2, $3, $4, 'class', $5, $6, $7)"#,
                )
                .bind(event.notification_type)
                .bind(&event.title)
                .bind(&event.content)
                .bind(event.sender_id)
                .bind(class_id)
                .bind(related_id)
                .bind(related_type)
                .execute(db)
                .await?;
            }
            ReceiverScope::School => {
                sqlx::query(
                    r#"INSERT INTO notifications
                           (notification_type, title, content, sender_id,
                            receiver_type, receiver_id, related_id, related_type)
                       VALUES ($1, $2, $3, $4, 'school', NULL, $5, $6)"#,
                )
                .bind(event.notification_type)
                .bind(&event.title)
                .bind(&event.content)
                .bind(event.sender_id)
                .bind(related_id)
                .bind(related_type)
                .execute(db)
                .await?;
            }
        }

        Ok(())
    }
}

/// Explicit approver lookup, instead of ad-hoc "all managers" queries
/// scattered through the request services.
pub struct ApproverDirectory;

impl ApproverDirectory {
    /// All managers who may decide exchange requests.
    #[instrument(skip(db))]
    pub async fn managers(db: &PgPool) -> Result<Vec<User>, AppError> {
        let managers = sqlx::query_as::<_, User>(
            "SELECT id, name, email, role, class_id FROM users WHERE role = 'manager'",
        )
        .fetch_all(db)
        .await?;

        Ok(managers)
    }
}
