use chrono::{DateTime, Utc};
use sea_orm::{entity::*, query::*, ConnectionTrait, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::{
        contact,
        sequence::{self, SequenceStatus},
        sequence_enrollment::{self, EnrollmentStatus},
        sequence_step::{self, StepType},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    models::sequence_schedule::{due_at, total_duration, StepDelay},
};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct StepInput {
    #[schema(example = "email")]
    pub step_type: String,
    #[validate(length(max = 255))]
    pub subject: Option<String>,
    pub content: Option<String>,
    #[validate(range(min = 0, max = 365))]
    #[serde(default)]
    pub delay_days: i32,
    #[validate(range(min = 0, max = 23))]
    #[serde(default)]
    pub delay_hours: i32,
    #[validate(range(min = 0, max = 59))]
    #[serde(default)]
    pub delay_minutes: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSequenceRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    /// Defaults to `draft`.
    pub status: Option<String>,
    #[serde(default)]
    pub steps: Vec<StepInput>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSequenceRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReplaceStepsRequest {
    pub steps: Vec<StepInput>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EnrollRequest {
    pub contact_id: Uuid,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SequenceDetails {
    #[serde(flatten)]
    pub sequence: sequence::Model,
    pub steps: Vec<sequence_step::Model>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct EnrollmentCounts {
    pub active: u64,
    pub completed: u64,
    pub stopped: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SequenceAnalytics {
    pub sequence_id: Uuid,
    pub step_count: u64,
    /// Time from enrollment to the last step.
    pub total_duration_minutes: i64,
    pub enrollments: EnrollmentCounts,
}

fn parse_sequence_status(raw: &str) -> Result<SequenceStatus, ServiceError> {
    SequenceStatus::from_str(raw.trim())
        .map_err(|_| ServiceError::InvalidStatus(format!("unknown sequence status '{}'", raw)))
}

fn parse_step_type(raw: &str) -> Result<StepType, ServiceError> {
    StepType::from_str(raw.trim())
        .map_err(|_| ServiceError::InvalidInput(format!("unknown step type '{}'", raw)))
}

fn delays_of(steps: &[sequence_step::Model]) -> Vec<StepDelay> {
    steps
        .iter()
        .map(|s| StepDelay::new(s.delay_days, s.delay_hours, s.delay_minutes))
        .collect()
}

/// Validates step inputs up front so a bad step never leaves a half-written
/// step list behind.
fn check_steps(steps: &[StepInput]) -> Result<Vec<StepType>, ServiceError> {
    steps
        .iter()
        .map(|step| {
            step.validate()?;
            parse_step_type(&step.step_type)
        })
        .collect()
}

async fn insert_steps<C: ConnectionTrait>(
    conn: &C,
    sequence_id: Uuid,
    steps: Vec<StepInput>,
    types: Vec<StepType>,
) -> Result<Vec<sequence_step::Model>, ServiceError> {
    let mut stored = Vec::with_capacity(steps.len());
    for (position, (step, step_type)) in steps.into_iter().zip(types).enumerate() {
        let model = sequence_step::ActiveModel {
            id: Set(Uuid::new_v4()),
            sequence_id: Set(sequence_id),
            position: Set(position as i32),
            step_type: Set(step_type),
            subject: Set(step.subject),
            content: Set(step.content),
            delay_days: Set(step.delay_days),
            delay_hours: Set(step.delay_hours),
            delay_minutes: Set(step.delay_minutes),
        }
        .insert(conn)
        .await?;
        stored.push(model);
    }
    Ok(stored)
}

async fn steps_of<C: ConnectionTrait>(
    conn: &C,
    sequence_id: Uuid,
) -> Result<Vec<sequence_step::Model>, ServiceError> {
    Ok(sequence_step::Entity::find()
        .filter(sequence_step::Column::SequenceId.eq(sequence_id))
        .order_by_asc(sequence_step::Column::Position)
        .all(conn)
        .await?)
}

/// Multi-step outreach sequences. Nothing is sent from here; the service
/// only tracks where each enrolled contact is and when the next step is due.
#[derive(Clone)]
pub struct SequenceService {
    db: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl SequenceService {
    pub fn new(db: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        status: Option<&str>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<sequence::Model>, u64), ServiceError> {
        let mut query = sequence::Entity::find().order_by_desc(sequence::Column::CreatedAt);
        if let Some(raw) = status {
            query = query.filter(sequence::Column::Status.eq(parse_sequence_status(raw)?));
        }
        let paginator = query.paginate(&*self.db, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    async fn find(&self, id: Uuid) -> Result<sequence::Model, ServiceError> {
        sequence::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Sequence", id))
    }

    pub async fn get(&self, id: Uuid) -> Result<SequenceDetails, ServiceError> {
        let sequence = self.find(id).await?;
        let steps = steps_of(&*self.db, id).await?;
        Ok(SequenceDetails { sequence, steps })
    }

    #[instrument(skip(self, request), fields(name = %request.name, steps = request.steps.len()))]
    pub async fn create(
        &self,
        request: CreateSequenceRequest,
        created_by: Option<Uuid>,
    ) -> Result<SequenceDetails, ServiceError> {
        request.validate()?;
        let status = match request.status.as_deref() {
            Some(raw) => parse_sequence_status(raw)?,
            None => SequenceStatus::default(),
        };
        let types = check_steps(&request.steps)?;

        let now = Utc::now();
        let txn = self.db.begin().await?;
        let sequence = sequence::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name),
            description: Set(request.description),
            status: Set(status),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;
        let steps = insert_steps(&txn, sequence.id, request.steps, types).await?;
        txn.commit().await?;

        info!(sequence_id = %sequence.id, steps = steps.len(), "Sequence created");
        Ok(SequenceDetails { sequence, steps })
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateSequenceRequest,
    ) -> Result<SequenceDetails, ServiceError> {
        request.validate()?;
        let mut active: sequence::ActiveModel = self.find(id).await?.into();
        if let Some(v) = request.name {
            active.name = Set(v);
        }
        if let Some(v) = request.description {
            active.description = Set(Some(v));
        }
        if let Some(raw) = request.status.as_deref() {
            active.status = Set(parse_sequence_status(raw)?);
        }
        active.updated_at = Set(Utc::now());
        active.update(&*self.db).await?;
        self.get(id).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        self.find(id).await?;
        let txn = self.db.begin().await?;
        sequence_enrollment::Entity::delete_many()
            .filter(sequence_enrollment::Column::SequenceId.eq(id))
            .exec(&txn)
            .await?;
        sequence_step::Entity::delete_many()
            .filter(sequence_step::Column::SequenceId.eq(id))
            .exec(&txn)
            .await?;
        sequence::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        info!(sequence_id = %id, "Sequence deleted");
        Ok(())
    }

    /// Replaces the whole step list. Active enrollments are rescheduled
    /// against the new delays; those already past the new last step complete.
    #[instrument(skip(self, request), fields(steps = request.steps.len()))]
    pub async fn replace_steps(
        &self,
        id: Uuid,
        request: ReplaceStepsRequest,
    ) -> Result<SequenceDetails, ServiceError> {
        let types = check_steps(&request.steps)?;
        let sequence = self.find(id).await?;
        let enrollments = sequence_enrollment::Entity::find()
            .filter(sequence_enrollment::Column::SequenceId.eq(id))
            .filter(sequence_enrollment::Column::Status.eq(EnrollmentStatus::Active))
            .all(&*self.db)
            .await?;

        let txn = self.db.begin().await?;
        sequence_step::Entity::delete_many()
            .filter(sequence_step::Column::SequenceId.eq(id))
            .exec(&txn)
            .await?;
        let steps = insert_steps(&txn, id, request.steps, types).await?;
        let delays = delays_of(&steps);

        let now = Utc::now();
        for enrollment in enrollments {
            let next = due_at(enrollment.enrolled_at, &delays, enrollment.current_step.max(0) as usize);
            let mut active: sequence_enrollment::ActiveModel = enrollment.into();
            match next {
                Some(at) => active.next_step_at = Set(Some(at)),
                None => {
                    active.status = Set(EnrollmentStatus::Completed);
                    active.next_step_at = Set(None);
                }
            }
            active.updated_at = Set(now);
            active.update(&txn).await?;
        }

        let mut seq: sequence::ActiveModel = sequence.into();
        seq.updated_at = Set(now);
        let sequence = seq.update(&txn).await?;
        txn.commit().await?;
        Ok(SequenceDetails { sequence, steps })
    }

    /// Enrolls a contact in an active sequence with at least one step. A
    /// contact can hold one active enrollment per sequence.
    #[instrument(skip(self))]
    pub async fn enroll(
        &self,
        sequence_id: Uuid,
        contact_id: Uuid,
    ) -> Result<sequence_enrollment::Model, ServiceError> {
        let sequence = self.find(sequence_id).await?;
        if sequence.status != SequenceStatus::Active {
            return Err(ServiceError::BadRequest(format!(
                "Sequence {} is {}; only active sequences accept enrollments",
                sequence.name, sequence.status
            )));
        }
        contact::Entity::find_by_id(contact_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Contact", contact_id))?;

        let steps = steps_of(&*self.db, sequence_id).await?;
        if steps.is_empty() {
            return Err(ServiceError::BadRequest(format!(
                "Sequence {} has no steps",
                sequence.name
            )));
        }
        let already = sequence_enrollment::Entity::find()
            .filter(sequence_enrollment::Column::SequenceId.eq(sequence_id))
            .filter(sequence_enrollment::Column::ContactId.eq(contact_id))
            .filter(sequence_enrollment::Column::Status.eq(EnrollmentStatus::Active))
            .count(&*self.db)
            .await?;
        if already > 0 {
            return Err(ServiceError::Conflict(format!(
                "Contact {} is already enrolled in {}",
                contact_id, sequence.name
            )));
        }

        let now = Utc::now();
        let enrollment = sequence_enrollment::ActiveModel {
            id: Set(Uuid::new_v4()),
            sequence_id: Set(sequence_id),
            contact_id: Set(contact_id),
            status: Set(EnrollmentStatus::Active),
            current_step: Set(0),
            enrolled_at: Set(now),
            next_step_at: Set(due_at(now, &delays_of(&steps), 0)),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await?;
        info!(enrollment_id = %enrollment.id, sequence_id = %sequence_id, "Contact enrolled");
        Ok(enrollment)
    }

    async fn find_enrollment(&self, id: Uuid) -> Result<sequence_enrollment::Model, ServiceError> {
        sequence_enrollment::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Enrollment", id))
    }

    /// Marks the current step done. The enrollment either moves on to the
    /// next step or completes.
    #[instrument(skip(self))]
    pub async fn advance(&self, enrollment_id: Uuid) -> Result<sequence_enrollment::Model, ServiceError> {
        let enrollment = self.find_enrollment(enrollment_id).await?;
        if enrollment.status != EnrollmentStatus::Active {
            return Err(ServiceError::BadRequest(format!(
                "Enrollment is {}",
                enrollment.status
            )));
        }
        let steps = steps_of(&*self.db, enrollment.sequence_id).await?;
        let next_index = enrollment.current_step.max(0) as usize + 1;
        let sequence_id = enrollment.sequence_id;
        let next_at = due_at(enrollment.enrolled_at, &delays_of(&steps), next_index);

        let mut active: sequence_enrollment::ActiveModel = enrollment.into();
        active.updated_at = Set(Utc::now());
        let completed = next_at.is_none();
        if completed {
            active.status = Set(EnrollmentStatus::Completed);
            active.current_step = Set(steps.len() as i32);
            active.next_step_at = Set(None);
        } else {
            active.current_step = Set(next_index as i32);
            active.next_step_at = Set(next_at);
        }
        let updated = active.update(&*self.db).await?;

        if completed {
            info!(enrollment_id = %enrollment_id, "Enrollment completed");
            if let Some(sender) = &self.event_sender {
                let event = Event::SequenceEnrollmentCompleted {
                    enrollment_id,
                    sequence_id,
                };
                if let Err(e) = sender.send(event).await {
                    warn!(error = %e, "Failed to send enrollment event");
                }
            }
        }
        Ok(updated)
    }

    /// Stops an active enrollment. Stopping twice is allowed; a completed
    /// enrollment cannot be stopped.
    #[instrument(skip(self))]
    pub async fn stop(&self, enrollment_id: Uuid) -> Result<sequence_enrollment::Model, ServiceError> {
        let enrollment = self.find_enrollment(enrollment_id).await?;
        match enrollment.status {
            EnrollmentStatus::Stopped => return Ok(enrollment),
            EnrollmentStatus::Completed => {
                return Err(ServiceError::BadRequest(
                    "Enrollment already completed".to_string(),
                ))
            }
            EnrollmentStatus::Active => {}
        }
        let mut active: sequence_enrollment::ActiveModel = enrollment.into();
        active.status = Set(EnrollmentStatus::Stopped);
        active.next_step_at = Set(None);
        active.updated_at = Set(Utc::now());
        Ok(active.update(&*self.db).await?)
    }

    /// Active enrollments whose next step is due at or before `now`.
    #[instrument(skip(self))]
    pub async fn due(&self, now: DateTime<Utc>) -> Result<Vec<sequence_enrollment::Model>, ServiceError> {
        Ok(sequence_enrollment::Entity::find()
            .filter(sequence_enrollment::Column::Status.eq(EnrollmentStatus::Active))
            .filter(sequence_enrollment::Column::NextStepAt.lte(now))
            .order_by_asc(sequence_enrollment::Column::NextStepAt)
            .all(&*self.db)
            .await?)
    }

    pub async fn list_enrollments(
        &self,
        sequence_id: Uuid,
    ) -> Result<Vec<sequence_enrollment::Model>, ServiceError> {
        self.find(sequence_id).await?;
        Ok(sequence_enrollment::Entity::find()
            .filter(sequence_enrollment::Column::SequenceId.eq(sequence_id))
            .order_by_desc(sequence_enrollment::Column::EnrolledAt)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn analytics(&self, sequence_id: Uuid) -> Result<SequenceAnalytics, ServiceError> {
        self.find(sequence_id).await?;
        let steps = steps_of(&*self.db, sequence_id).await?;
        let statuses: Vec<EnrollmentStatus> = sequence_enrollment::Entity::find()
            .select_only()
            .column(sequence_enrollment::Column::Status)
            .filter(sequence_enrollment::Column::SequenceId.eq(sequence_id))
            .into_tuple()
            .all(&*self.db)
            .await?;

        let mut counts = EnrollmentCounts::default();
        for status in statuses {
            counts.total += 1;
            match status {
                EnrollmentStatus::Active => counts.active += 1,
                EnrollmentStatus::Completed => counts.completed += 1,
                EnrollmentStatus::Stopped => counts.stopped += 1,
            }
        }

        Ok(SequenceAnalytics {
            sequence_id,
            step_count: steps.len() as u64,
            total_duration_minutes: total_duration(&delays_of(&steps)).num_minutes(),
            enrollments: counts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(step_type: &str, days: i32) -> StepInput {
        StepInput {
            step_type: step_type.to_string(),
            subject: None,
            content: None,
            delay_days: days,
            delay_hours: 0,
            delay_minutes: 0,
        }
    }

    #[test]
    fn step_types_are_checked_before_writing() {
        let types = check_steps(&[step("email", 0), step("linkedin_message", 2)]).unwrap();
        assert_eq!(types, vec![StepType::Email, StepType::LinkedinMessage]);
        assert!(check_steps(&[step("email", 0), step("fax", 1)]).is_err());
    }

    #[test]
    fn out_of_range_delays_are_rejected() {
        let mut bad = step("call", 0);
        bad.delay_hours = 30;
        assert!(matches!(
            check_steps(&[bad]),
            Err(ServiceError::ValidationError(_))
        ));
    }
}
