use chrono::{Datelike, NaiveTime};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use slateboard_core::{AppError, PaginationMeta};
use slateboard_models::ids::{ExchangeRequestId, LessonId, UserId};
use slateboard_models::lessons::{Lesson, LessonKind, LessonStatus};
use slateboard_models::users::User;

use crate::middleware::actor::Actor;
use crate::modules::exchange::model::{
    CreateExchangeRequestDto, ExchangeFilterParams, ExchangeRequest, ExchangeStatus, ExchangeType,
};
use crate::modules::exchange::registry::{LessonTarget, SwapContext};
use crate::modules::exchange::swap;
use crate::modules::lessons::service::{LESSON_COLUMNS, LessonService};
use crate::modules::notifications::model::{NotifyEvent, ReceiverScope, RelatedObject};
use crate::modules::notifications::service::{ApproverDirectory, NotificationService};
use crate::state::AppState;
use crate::utils::email::EmailService;

/// Column list shared by every request query so `query_as` rows always
/// match the `ExchangeRequest` struct.
pub(crate) const REQUEST_COLUMNS: &str = "id, request_type, original_lesson_id, \
     replacement_lesson_id, requesting_teacher_id, replacement_teacher_id, reason, \
     status, teacher_approved, manager_approved, decided_by, decided_at, \
     created_at, updated_at";

#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct PaginatedExchangeRequestsResponse {
    pub data: Vec<ExchangeRequest>,
    pub meta: PaginationMeta,
}

pub struct ExchangeService;

impl ExchangeService {
    /// Submit an exchange request after the full eligibility chain.
    ///
    /// Checks run in a fixed order so the client always gets the most
    /// specific error: existence, ownership, original-state, replacement
    /// shape, then the single-pending-request rule.
    #[instrument(skip(state, dto), fields(request_type = dto.request_type.as_str()))]
    pub async fn create_request(
        state: &AppState,
        actor: UserId,
        dto: CreateExchangeRequestDto,
    ) -> Result<ExchangeRequest, AppError> {
        let db = &state.db;

        if dto.original_lesson_id == dto.replacement_lesson_id {
            return Err(AppError::validation(anyhow::anyhow!(
                "Original and replacement must be different lessons"
            )));
        }

        let original = Self::load_lesson(db, dto.original_lesson_id).await?;
        let replacement = Self::load_lesson(db, dto.replacement_lesson_id).await?;

        if original.teacher_id != Some(actor) {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "Only the lesson's own teacher can request an exchange for it"
            )));
        }

        // The original is the occupied slot being given up; an empty slot
        // has nothing to give up and would collide with other requests'
        // pointers once a swap around it is applied.
        if original.kind == LessonKind::Empty {
            return Err(AppError::validation(anyhow::anyhow!(
                "An empty slot cannot be the original of an exchange"
            )));
        }

        match dto.request_type {
            ExchangeType::Swap => {
                if original.status != LessonStatus::Scheduled {
                    return Err(AppError::invalid_state(anyhow::anyhow!(
                        "A swap needs a scheduled original lesson (current status: {:?})",
                        original.status
                    )));
                }
            }
            ExchangeType::Makeup => {
                if original.status != LessonStatus::Absent {
                    return Err(AppError::invalid_state(anyhow::anyhow!(
                        "A makeup needs an absent original lesson (current status: {:?})",
                        original.status
                    )));
                }
            }
        }

        if replacement.kind != LessonKind::Empty || replacement.status != LessonStatus::Scheduled {
            return Err(AppError::validation(anyhow::anyhow!(
                "The replacement slot must be empty and scheduled"
            )));
        }

        if replacement.class_id != original.class_id {
            return Err(AppError::validation(anyhow::anyhow!(
                "Both lessons must belong to the same class"
            )));
        }

        if replacement.scheduled_date.iso_week() != original.scheduled_date.iso_week() {
            return Err(AppError::validation(anyhow::anyhow!(
                "Both lessons must fall in the same week"
            )));
        }

        // The requesting teacher will end up teaching at the replacement
        // slot's time; they must not already have a lesson there (in any
        // class). The replacement slot itself is excluded: for a swap its
        // owner may be the requester's colleague or, in principle, the
        // requester themselves.
        if LessonService::find_conflict(
            db,
            actor,
            replacement.scheduled_date,
            replacement.time_slot_id,
            Some(replacement.id),
        )
        .await?
        {
            return Err(AppError::conflict(anyhow::anyhow!(
                "You already teach another lesson at the replacement slot's time"
            )));
        }

        // Swaps need a stage-1 approver: the replacement slot's owner.
        let replacement_teacher_id = match dto.request_type {
            ExchangeType::Swap => Some(replacement.teacher_id.ok_or_else(|| {
                AppError::validation(anyhow::anyhow!(
                    "The replacement slot has no owning teacher to approve a swap"
                ))
            })?),
            ExchangeType::Makeup => None,
        };

        let pending_exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(
                   SELECT 1 FROM exchange_requests
                   WHERE original_lesson_id = $1 AND status = 'pending'
               )"#,
        )
        .bind(original.id)
        .fetch_one(db)
        .await?;

        if pending_exists {
            return Err(AppError::conflict(anyhow::anyhow!(
                "This lesson already has a pending exchange request"
            )));
        }

        let query = format!(
            r#"INSERT INTO exchange_requests
                   (request_type, original_lesson_id, replacement_lesson_id,
                    requesting_teacher_id, replacement_teacher_id, reason)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {REQUEST_COLUMNS}"#
        );

        let request = sqlx::query_as::<_, ExchangeRequest>(&query)
            .bind(dto.request_type)
            .bind(original.id)
            .bind(replacement.id)
            .bind(actor)
            .bind(replacement_teacher_id)
            .bind(&dto.reason)
            .fetch_one(db)
            .await
            .map_err(|e| {
                // The partial unique index backstops the existence check
                // against a concurrent submission.
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_unique_violation()
                {
                    return AppError::conflict(anyhow::anyhow!(
                        "This lesson already has a pending exchange request"
                    ));
                }
                AppError::from(e)
            })?;

        tracing::info!(request_id = %request.id, "exchange request submitted");

        Self::notify_submitted(state, &request, &original, &replacement).await;

        Ok(request)
    }

    /// Fetch a request by id.
    #[instrument(skip(db))]
    pub async fn get_request(
        db: &PgPool,
        id: ExchangeRequestId,
    ) -> Result<ExchangeRequest, AppError> {
        let query = format!("SELECT {REQUEST_COLUMNS} FROM exchange_requests WHERE id = $1");

        sqlx::query_as::<_, ExchangeRequest>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Exchange request not found")))
    }

    /// Paginated request listing with optional status/type/teacher filters.
    #[instrument(skip(db))]
    pub async fn list_requests(
        db: &PgPool,
        filters: ExchangeFilterParams,
    ) -> Result<PaginatedExchangeRequestsResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let where_clause = r#"($1::exchange_status IS NULL OR status = $1)
               AND ($2::exchange_type IS NULL OR request_type = $2)
               AND ($3::uuid IS NULL OR requesting_teacher_id = $3)"#;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM exchange_requests WHERE {where_clause}"
        ))
        .bind(filters.status)
        .bind(filters.request_type)
        .bind(filters.requesting_teacher_id)
        .fetch_one(db)
        .await?;

        let requests = sqlx::query_as::<_, ExchangeRequest>(&format!(
            r#"SELECT {REQUEST_COLUMNS} FROM exchange_requests
               WHERE {where_clause}
               ORDER BY created_at DESC
               LIMIT $4 OFFSET $5"#
        ))
        .bind(filters.status)
        .bind(filters.request_type)
        .bind(filters.requesting_teacher_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        Ok(PaginatedExchangeRequestsResponse {
            data: requests,
            meta: PaginationMeta {
                total,
                limit,
                offset: Some(offset),
                page: None,
                has_more: offset + limit < total,
            },
        })
    }

    /// Record an approval on a pending request.
    ///
    /// Swaps take two approvals: the replacement slot's teacher first, then
    /// a manager. Makeups take a single manager approval. The final
    /// approval runs the reference and content swap in the same transaction
    /// that flips the status, so either everything applies or nothing does.
    #[instrument(skip(state, actor), fields(actor_id = %actor.id))]
    pub async fn approve(
        state: &AppState,
        id: ExchangeRequestId,
        actor: Actor,
    ) -> Result<ExchangeRequest, AppError> {
        let mut tx = state.db.begin().await?;

        let request = Self::lock_request(&mut tx, id).await?;

        if request.status != ExchangeStatus::Pending {
            return Err(AppError::invalid_state(anyhow::anyhow!(
                "Request is already {:?}",
                request.status
            )));
        }

        if request.request_type == ExchangeType::Swap && !request.teacher_approved {
            // Stage 1: only the replacement slot's teacher.
            if request.replacement_teacher_id != Some(actor.id) {
                return Err(AppError::invalid_state(anyhow::anyhow!(
                    "This request is awaiting the replacement slot's teacher"
                )));
            }

            let updated = sqlx::query_as::<_, ExchangeRequest>(&format!(
                r#"UPDATE exchange_requests
                   SET teacher_approved = TRUE, updated_at = now()
                   WHERE id = $1 AND status = 'pending' AND teacher_approved = FALSE
                   RETURNING {REQUEST_COLUMNS}"#
            ))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                AppError::invalid_state(anyhow::anyhow!("Request was decided concurrently"))
            })?;

            tx.commit().await?;

            tracing::info!(request_id = %id, "swap passed teacher approval");

            Self::notify_stage_one(state, &updated).await;

            return Ok(updated);
        }

        // Final stage: manager only.
        if !actor.is_manager() {
            return Err(AppError::invalid_state(anyhow::anyhow!(
                "This request is awaiting a manager's decision"
            )));
        }

        let (original, replacement) =
            Self::lock_lessons(&mut tx, request.original_lesson_id, request.replacement_lesson_id)
                .await?;

        Self::check_still_eligible(&request, &original, &replacement)?;

        let a = Self::target(&mut tx, &original).await?;
        let b = Self::target(&mut tx, &replacement).await?;
        let ctx = SwapContext {
            actor: actor.id,
            exclude_request: Some(request.id),
        };

        let summary = swap::swap_references(&mut tx, &a, &b, &ctx).await?;
        swap::swap_lesson_content(&mut tx, &original, &replacement, request.request_type).await?;

        // Compare-and-set so a concurrently decided request can never be
        // applied twice.
        let updated = sqlx::query_as::<_, ExchangeRequest>(&format!(
            r#"UPDATE exchange_requests
               SET manager_approved = TRUE, status = 'approved',
                   decided_by = $2, decided_at = now(), updated_at = now()
               WHERE id = $1 AND status = 'pending'
               RETURNING {REQUEST_COLUMNS}"#
        ))
        .bind(id)
        .bind(actor.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::invalid_state(anyhow::anyhow!("Request was decided concurrently"))
        })?;

        tx.commit().await?;

        tracing::info!(
            request_id = %id,
            repointed = summary.repointed,
            reminders_recomputed = summary.reminders_recomputed,
            "exchange request approved and applied"
        );

        Self::notify_approved(state, &updated, &original).await;

        Ok(updated)
    }

    /// Reject a pending request.
    ///
    /// A manager can reject at any pending stage; the replacement slot's
    /// teacher only while the swap still awaits their approval.
    #[instrument(skip(state, actor), fields(actor_id = %actor.id))]
    pub async fn reject(
        state: &AppState,
        id: ExchangeRequestId,
        actor: Actor,
    ) -> Result<ExchangeRequest, AppError> {
        let mut tx = state.db.begin().await?;

        let request = Self::lock_request(&mut tx, id).await?;

        if request.status != ExchangeStatus::Pending {
            return Err(AppError::invalid_state(anyhow::anyhow!(
                "Request is already {:?}",
                request.status
            )));
        }

        let stage_one_teacher = request.request_type == ExchangeType::Swap
            && !request.teacher_approved
            && request.replacement_teacher_id == Some(actor.id);

        if !actor.is_manager() && !stage_one_teacher {
            return Err(AppError::invalid_state(anyhow::anyhow!(
                "You are not an approver for this request's current stage"
            )));
        }

        let updated = sqlx::query_as::<_, ExchangeRequest>(&format!(
            r#"UPDATE exchange_requests
               SET status = 'rejected', decided_by = $2, decided_at = now(),
                   updated_at = now()
               WHERE id = $1 AND status = 'pending'
               RETURNING {REQUEST_COLUMNS}"#
        ))
        .bind(id)
        .bind(actor.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::invalid_state(anyhow::anyhow!("Request was decided concurrently"))
        })?;

        tx.commit().await?;

        tracing::info!(request_id = %id, "exchange request rejected");

        Self::notify_decided(state, &updated, "rejected").await;

        Ok(updated)
    }

    /// Withdraw a pending request. Only its requesting teacher may cancel.
    #[instrument(skip(state, actor), fields(actor_id = %actor.id))]
    pub async fn cancel(
        state: &AppState,
        id: ExchangeRequestId,
        actor: Actor,
    ) -> Result<ExchangeRequest, AppError> {
        let mut tx = state.db.begin().await?;

        let request = Self::lock_request(&mut tx, id).await?;

        if request.requesting_teacher_id != actor.id {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "Only the requesting teacher can cancel this request"
            )));
        }

        if request.status != ExchangeStatus::Pending {
            return Err(AppError::invalid_state(anyhow::anyhow!(
                "Request is already {:?}",
                request.status
            )));
        }

        let updated = sqlx::query_as::<_, ExchangeRequest>(&format!(
            r#"UPDATE exchange_requests
               SET status = 'cancelled', updated_at = now()
               WHERE id = $1 AND status = 'pending'
               RETURNING {REQUEST_COLUMNS}"#
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::invalid_state(anyhow::anyhow!("Request was decided concurrently"))
        })?;

        tx.commit().await?;

        tracing::info!(request_id = %id, "exchange request cancelled");

        Ok(updated)
    }

    async fn load_lesson(db: &PgPool, id: LessonId) -> Result<Lesson, AppError> {
        let query = format!("SELECT {LESSON_COLUMNS} FROM lessons WHERE id = $1");

        sqlx::query_as::<_, Lesson>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Lesson not found")))
    }

    async fn lock_request(
        tx: &mut Transaction<'_, Postgres>,
        id: ExchangeRequestId,
    ) -> Result<ExchangeRequest, AppError> {
        let query =
            format!("SELECT {REQUEST_COLUMNS} FROM exchange_requests WHERE id = $1 FOR UPDATE");

        sqlx::query_as::<_, ExchangeRequest>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Exchange request not found")))
    }

    /// Lock both lessons in a stable order so two concurrent approvals over
    /// the same pair cannot deadlock.
    async fn lock_lessons(
        tx: &mut Transaction<'_, Postgres>,
        original_id: LessonId,
        replacement_id: LessonId,
    ) -> Result<(Lesson, Lesson), AppError> {
        let (first, second) = if original_id.into_inner() <= replacement_id.into_inner() {
            (original_id, replacement_id)
        } else {
            (replacement_id, original_id)
        };

        let first_row = Self::lock_lesson(tx, first).await?;
        let second_row = Self::lock_lesson(tx, second).await?;

        if first == original_id {
            Ok((first_row, second_row))
        } else {
            Ok((second_row, first_row))
        }
    }

    async fn lock_lesson(
        tx: &mut Transaction<'_, Postgres>,
        id: LessonId,
    ) -> Result<Lesson, AppError> {
        let query = format!("SELECT {LESSON_COLUMNS} FROM lessons WHERE id = $1 FOR UPDATE");

        sqlx::query_as::<_, Lesson>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Lesson not found")))
    }

    /// Re-validate eligibility on the locked rows. The lessons may have
    /// changed between submission and approval.
    fn check_still_eligible(
        request: &ExchangeRequest,
        original: &Lesson,
        replacement: &Lesson,
    ) -> Result<(), AppError> {
        if original.kind == LessonKind::Empty {
            return Err(AppError::invalid_state(anyhow::anyhow!(
                "The original lesson is now an empty slot"
            )));
        }

        let original_ok = match request.request_type {
            ExchangeType::Swap => original.status == LessonStatus::Scheduled,
            ExchangeType::Makeup => original.status == LessonStatus::Absent,
        };

        if !original_ok {
            return Err(AppError::invalid_state(anyhow::anyhow!(
                "The original lesson is no longer eligible (current status: {:?})",
                original.status
            )));
        }

        if replacement.kind != LessonKind::Empty || replacement.status != LessonStatus::Scheduled {
            return Err(AppError::invalid_state(anyhow::anyhow!(
                "The replacement slot is no longer empty and scheduled"
            )));
        }

        Ok(())
    }

    async fn target(
        tx: &mut Transaction<'_, Postgres>,
        lesson: &Lesson,
    ) -> Result<LessonTarget, AppError> {
        let start = sqlx::query_scalar::<_, Option<NaiveTime>>(
            "SELECT start_time FROM time_slots WHERE id = $1",
        )
        .bind(lesson.time_slot_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(LessonTarget {
            id: lesson.id,
            starts_at: start.map(|t| lesson.scheduled_date.and_time(t)),
        })
    }

    fn describe(request: &ExchangeRequest, original: &Lesson) -> String {
        format!(
            "{} of {} on {}",
            request.request_type.as_str(),
            original.subject.as_deref().unwrap_or("a lesson"),
            original.scheduled_date
        )
    }

    /// Notify and email the approvers of a freshly submitted request.
    /// Notification failures are logged, never propagated.
    async fn notify_submitted(
        state: &AppState,
        request: &ExchangeRequest,
        original: &Lesson,
        replacement: &Lesson,
    ) {
        let summary = Self::describe(request, original);

        let mut approvers: Vec<UserId> = match ApproverDirectory::managers(&state.db).await {
            Ok(managers) => managers.into_iter().map(|m| m.id).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load managers for notification");
                Vec::new()
            }
        };
        if let Some(teacher_id) = request.replacement_teacher_id {
            approvers.insert(0, teacher_id);
        }

        let content = format!(
            "A {} was requested, targeting the slot on {}. Reason: {}",
            summary, replacement.scheduled_date, request.reason
        );

        Self::dispatch(
            state,
            request,
            NotifyEvent {
                notification_type: "exchange_submitted",
                title: "New lesson exchange request".into(),
                content,
                sender_id: Some(request.requesting_teacher_id),
                receivers: ReceiverScope::Users(approvers.clone()),
                related: Some(Self::related(request)),
            },
        )
        .await;

        Self::email_approvers(state, request.requesting_teacher_id, approvers, summary);
    }

    /// Tell the requester and the managers that a swap cleared stage 1.
    async fn notify_stage_one(state: &AppState, request: &ExchangeRequest) {
        let mut receivers = vec![request.requesting_teacher_id];
        match ApproverDirectory::managers(&state.db).await {
            Ok(managers) => receivers.extend(managers.into_iter().map(|m| m.id)),
            Err(e) => tracing::warn!(error = %e, "failed to load managers for notification"),
        }

        Self::dispatch(
            state,
            request,
            NotifyEvent {
                notification_type: "exchange_teacher_approved",
                title: "Exchange request awaiting manager approval".into(),
                content: "The replacement slot's teacher approved; a manager decision is next."
                    .into(),
                sender_id: request.replacement_teacher_id,
                receivers: ReceiverScope::Users(receivers),
                related: Some(Self::related(request)),
            },
        )
        .await;
    }

    /// Tell the involved teachers and the class that the schedule changed.
    async fn notify_approved(state: &AppState, request: &ExchangeRequest, original: &Lesson) {
        let summary = Self::describe(request, original);

        let mut teachers = vec![request.requesting_teacher_id];
        if let Some(teacher_id) = request.replacement_teacher_id {
            teachers.push(teacher_id);
        }

        Self::dispatch(
            state,
            request,
            NotifyEvent {
                notification_type: "exchange_approved",
                title: "Exchange request approved".into(),
                content: format!("The {summary} was approved and applied."),
                sender_id: request.decided_by,
                receivers: ReceiverScope::Users(teachers),
                related: Some(Self::related(request)),
            },
        )
        .await;

        Self::dispatch(
            state,
            request,
            NotifyEvent {
                notification_type: "schedule_changed",
                title: "Lesson schedule changed".into(),
                content: format!("The timetable changed: {summary}."),
                sender_id: request.decided_by,
                receivers: ReceiverScope::Class(original.class_id),
                related: Some(Self::related(request)),
            },
        )
        .await;

        Self::email_requester(state, request, "approved");
    }

    /// Tell the requester about a terminal decision on their request.
    async fn notify_decided(state: &AppState, request: &ExchangeRequest, decision: &str) {
        Self::dispatch(
            state,
            request,
            NotifyEvent {
                notification_type: "exchange_rejected",
                title: format!("Exchange request {decision}"),
                content: format!(
                    "Your {} request was {decision}.",
                    request.request_type.as_str()
                ),
                sender_id: request.decided_by,
                receivers: ReceiverScope::Users(vec![request.requesting_teacher_id]),
                related: Some(Self::related(request)),
            },
        )
        .await;

        Self::email_requester(state, request, decision);
    }

    fn related(request: &ExchangeRequest) -> RelatedObject {
        RelatedObject {
            id: request.id,
            request_type: request.request_type,
        }
    }

    async fn dispatch(state: &AppState, request: &ExchangeRequest, event: NotifyEvent) {
        if let Err(e) = NotificationService::notify(&state.db, event).await {
            tracing::warn!(error = %e, request_id = %request.id, "failed to record notification");
        }
    }

    /// Fire-and-forget approval-request emails.
    fn email_approvers(
        state: &AppState,
        requester_id: UserId,
        approver_ids: Vec<UserId>,
        summary: String,
    ) {
        let db = state.db.clone();
        let config = state.email_config.clone();

        tokio::spawn(async move {
            let requester = match Self::load_user(&db, requester_id).await {
                Ok(user) => user,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to load requester for email");
                    return;
                }
            };

            let approvers = match sqlx::query_as::<_, User>(
                "SELECT id, name, email, role, class_id FROM users WHERE id = ANY($1)",
            )
            .bind(approver_ids)
            .fetch_all(&db)
            .await
            {
                Ok(users) => users,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to load approvers for email");
                    return;
                }
            };

            let email = EmailService::new(config);
            for approver in approvers {
                if let Err(e) = email
                    .send_approval_request(&approver.email, &approver.name, &requester.name, &summary)
                    .await
                {
                    tracing::warn!(error = %e, to = %approver.email, "failed to send approval email");
                }
            }
        });
    }

    /// Fire-and-forget decision email to the requester.
    fn email_requester(state: &AppState, request: &ExchangeRequest, decision: &str) {
        let db = state.db.clone();
        let config = state.email_config.clone();
        let requester_id = request.requesting_teacher_id;
        let request_type = request.request_type;
        let decision = decision.to_string();

        tokio::spawn(async move {
            let requester = match Self::load_user(&db, requester_id).await {
                Ok(user) => user,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to load requester for email");
                    return;
                }
            };

            let email = EmailService::new(config);
            let summary = format!("your {} request", request_type.as_str());
            if let Err(e) = email
                .send_decision(&requester.email, &requester.name, &decision, &summary)
                .await
            {
                tracing::warn!(error = %e, to = %requester.email, "failed to send decision email");
            }
        });
    }

    async fn load_user(db: &PgPool, id: UserId) -> Result<User, AppError> {
        sqlx::query_as::<_, User>("SELECT id, name, email, role, class_id FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))
    }
}
