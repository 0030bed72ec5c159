use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    entity::*,
    query::*,
    sea_query::{Expr, OnConflict},
    ConnectionTrait, TransactionTrait,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::{
        artwork_card::{self, CardPriority},
        artwork_column,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    models::{
        board::{
            default_column_id, move_between, move_within, positions, reorder, BoardError,
            DEFAULT_COLUMNS,
        },
        mockup::is_hex_color,
    },
    services::activities::{ActivityService, NewActivity},
};

const DEFAULT_COLUMN_COLOR: &str = "#6b7280";

/// Board card with its JSON list columns decoded.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(as = ArtworkCard)]
pub struct CardResponse {
    pub id: Uuid,
    pub column_id: Uuid,
    pub order_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub position: i32,
    pub priority: CardPriority,
    pub due_date: Option<NaiveDate>,
    pub assigned_user_id: Option<Uuid>,
    pub labels: Vec<String>,
    pub attachments: Vec<Value>,
    pub comments: Vec<Value>,
    pub checklist: Vec<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Unreadable stored JSON decodes as an empty list rather than failing the
/// whole board.
fn decode_json<T: DeserializeOwned>(raw: &str) -> Vec<T> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!(error = %e, "Ignoring malformed card list column");
        Vec::new()
    })
}

fn encode_json<T: Serialize>(values: &[T]) -> Result<String, ServiceError> {
    Ok(serde_json::to_string(values)?)
}

impl From<artwork_card::Model> for CardResponse {
    fn from(card: artwork_card::Model) -> Self {
        Self {
            labels: decode_json(&card.labels),
            attachments: decode_json(&card.attachments),
            comments: decode_json(&card.comments),
            checklist: decode_json(&card.checklist),
            id: card.id,
            column_id: card.column_id,
            order_id: card.order_id,
            company_id: card.company_id,
            title: card.title,
            description: card.description,
            position: card.position,
            priority: card.priority,
            due_date: card.due_date,
            assigned_user_id: card.assigned_user_id,
            created_at: card.created_at,
            updated_at: card.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BoardColumn {
    #[serde(flatten)]
    pub column: artwork_column::Model,
    pub cards: Vec<CardResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Board {
    pub columns: Vec<BoardColumn>,
}

fn validate_color(color: &str) -> Result<(), ServiceError> {
    if is_hex_color(color) {
        Ok(())
    } else {
        Err(ServiceError::ValidationError(format!(
            "color must be in #RRGGBB form, got {:?}",
            color
        )))
    }
}

fn parse_priority(raw: &str) -> Result<CardPriority, ServiceError> {
    CardPriority::from_str(raw.trim())
        .map_err(|_| ServiceError::InvalidStatus(format!("unknown card priority '{}'", raw)))
}

impl From<BoardError> for ServiceError {
    fn from(err: BoardError) -> Self {
        ServiceError::BadRequest(err.to_string())
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateColumnRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[schema(example = "#3b82f6")]
    pub color: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateColumnRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Desired order of ids. Ids left out keep their relative order at the end.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReorderRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCardRequest {
    pub column_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub description: Option<String>,
    pub order_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    #[schema(example = "medium")]
    pub priority: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub assigned_user_id: Option<Uuid>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<Value>,
    #[serde(default)]
    pub comments: Vec<Value>,
    #[serde(default)]
    pub checklist: Vec<Value>,
}

/// Content changes only; use the move operation to change column or position.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCardRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub order_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub priority: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub assigned_user_id: Option<Uuid>,
    pub labels: Option<Vec<String>>,
    pub attachments: Option<Vec<Value>>,
    pub comments: Option<Vec<Value>>,
    pub checklist: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MoveCardRequest {
    pub column_id: Uuid,
    /// Zero-based target index; values past the end append.
    pub position: u32,
}

/// Kanban board for artwork production. Positions inside a column are kept
/// contiguous from 0 after every structural change.
#[derive(Clone)]
pub struct ArtworkBoardService {
    db: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl ArtworkBoardService {
    pub fn new(db: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self { db, event_sender }
    }

    /// Returns every column with its cards, creating the default columns the
    /// first time the board is opened.
    #[instrument(skip(self))]
    pub async fn board(&self) -> Result<Board, ServiceError> {
        let column_count = artwork_column::Entity::find().count(&*self.db).await?;
        if column_count == 0 {
            self.seed_default_columns().await?;
        }

        let columns = artwork_column::Entity::find()
            .order_by_asc(artwork_column::Column::Position)
            .all(&*self.db)
            .await?;
        let cards = artwork_card::Entity::find()
            .order_by_asc(artwork_card::Column::Position)
            .all(&*self.db)
            .await?;

        let mut by_column: HashMap<Uuid, Vec<CardResponse>> = HashMap::new();
        for card in cards {
            by_column
                .entry(card.column_id)
                .or_default()
                .push(card.into());
        }

        Ok(Board {
            columns: columns
                .into_iter()
                .map(|column| BoardColumn {
                    cards: by_column.remove(&column.id).unwrap_or_default(),
                    column,
                })
                .collect(),
        })
    }

    async fn seed_default_columns(&self) -> Result<(), ServiceError> {
        let now = Utc::now();
        let txn = self.db.begin().await?;
        if artwork_column::Entity::find().count(&txn).await? > 0 {
            return Ok(());
        }
        let columns = DEFAULT_COLUMNS
            .iter()
            .enumerate()
            .map(|(index, (name, color))| artwork_column::ActiveModel {
                id: Set(default_column_id(index)),
                name: Set(name.to_string()),
                position: Set(index as i32),
                color: Set(color.to_string()),
                is_default: Set(true),
                created_at: Set(now),
            });
        let inserted = artwork_column::Entity::insert_many(columns)
            .on_conflict(
                OnConflict::column(artwork_column::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;
        txn.commit().await?;
        if inserted > 0 {
            info!(columns = inserted, "Seeded default artwork columns");
        }
        Ok(())
    }

    async fn find_column(&self, id: Uuid) -> Result<artwork_column::Model, ServiceError> {
        artwork_column::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Column", id))
    }

    async fn column_ids(&self) -> Result<Vec<Uuid>, ServiceError> {
        Ok(artwork_column::Entity::find()
            .order_by_asc(artwork_column::Column::Position)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect())
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_column(
        &self,
        request: CreateColumnRequest,
    ) -> Result<artwork_column::Model, ServiceError> {
        request.validate()?;
        let color = request.color.unwrap_or_else(|| DEFAULT_COLUMN_COLOR.to_string());
        validate_color(&color)?;
        let position = artwork_column::Entity::find().count(&*self.db).await? as i32;

        Ok(artwork_column::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name),
            position: Set(position),
            color: Set(color.to_ascii_lowercase()),
            is_default: Set(false),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db)
        .await?)
    }

    #[instrument(skip(self, request))]
    pub async fn update_column(
        &self,
        id: Uuid,
        request: UpdateColumnRequest,
    ) -> Result<artwork_column::Model, ServiceError> {
        request.validate()?;
        let mut active: artwork_column::ActiveModel = self.find_column(id).await?.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(color) = request.color {
            validate_color(&color)?;
            active.color = Set(color.to_ascii_lowercase());
        }
        Ok(active.update(&*self.db).await?)
    }

    /// Refused while the column still holds cards.
    #[instrument(skip(self))]
    pub async fn delete_column(&self, id: Uuid) -> Result<(), ServiceError> {
        self.find_column(id).await?;
        let card_count = artwork_card::Entity::find()
            .filter(artwork_card::Column::ColumnId.eq(id))
            .count(&*self.db)
            .await?;
        if card_count > 0 {
            return Err(ServiceError::Conflict(format!(
                "Column still holds {} card(s)",
                card_count
            )));
        }

        let remaining: Vec<Uuid> = self
            .column_ids()
            .await?
            .into_iter()
            .filter(|c| *c != id)
            .collect();
        let txn = self.db.begin().await?;
        artwork_column::Entity::delete_by_id(id).exec(&txn).await?;
        write_column_positions(&txn, &remaining).await?;
        txn.commit().await?;
        info!(column_id = %id, "Artwork column deleted");
        Ok(())
    }

    #[instrument(skip(self, request))]
    pub async fn reorder_columns(
        &self,
        request: ReorderRequest,
    ) -> Result<Vec<artwork_column::Model>, ServiceError> {
        let current = self.column_ids().await?;
        let ordered = reorder(&current, &request.ids)?;

        let txn = self.db.begin().await?;
        write_column_positions(&txn, &ordered).await?;
        txn.commit().await?;

        Ok(artwork_column::Entity::find()
            .order_by_asc(artwork_column::Column::Position)
            .all(&*self.db)
            .await?)
    }

    async fn find_card(&self, id: Uuid) -> Result<artwork_card::Model, ServiceError> {
        artwork_card::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Card", id))
    }

    async fn card_ids(&self, column_id: Uuid) -> Result<Vec<Uuid>, ServiceError> {
        Ok(artwork_card::Entity::find()
            .filter(artwork_card::Column::ColumnId.eq(column_id))
            .order_by_asc(artwork_card::Column::Position)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect())
    }

    pub async fn get_card(&self, id: Uuid) -> Result<CardResponse, ServiceError> {
        self.find_card(id).await.map(CardResponse::from)
    }

    /// Creates a card at the end of its column.
    #[instrument(skip(self, request), fields(column_id = %request.column_id))]
    pub async fn create_card(
        &self,
        request: CreateCardRequest,
        acting_user: Option<Uuid>,
    ) -> Result<CardResponse, ServiceError> {
        request.validate()?;
        let priority = match request.priority.as_deref() {
            Some(raw) => parse_priority(raw)?,
            None => CardPriority::default(),
        };
        self.find_column(request.column_id).await?;
        let position = self.card_ids(request.column_id).await?.len() as i32;

        let now = Utc::now();
        let txn = self.db.begin().await?;
        let card = artwork_card::ActiveModel {
            id: Set(Uuid::new_v4()),
            column_id: Set(request.column_id),
            order_id: Set(request.order_id),
            company_id: Set(request.company_id),
            title: Set(request.title),
            description: Set(request.description),
            position: Set(position),
            priority: Set(priority),
            due_date: Set(request.due_date),
            assigned_user_id: Set(request.assigned_user_id),
            labels: Set(encode_json(&request.labels)?),
            attachments: Set(encode_json(&request.attachments)?),
            comments: Set(encode_json(&request.comments)?),
            checklist: Set(encode_json(&request.checklist)?),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;
        ActivityService::record(
            &txn,
            NewActivity::new(
                "artwork_card",
                card.id,
                "created",
                format!("Card \"{}\" created", card.title),
            )
            .by(acting_user),
        )
        .await?;
        txn.commit().await?;
        Ok(card.into())
    }

    #[instrument(skip(self, request))]
    pub async fn update_card(
        &self,
        id: Uuid,
        request: UpdateCardRequest,
    ) -> Result<CardResponse, ServiceError> {
        request.validate()?;
        let mut active: artwork_card::ActiveModel = self.find_card(id).await?.into();
        if let Some(v) = request.title {
            active.title = Set(v);
        }
        if let Some(v) = request.description {
            active.description = Set(Some(v));
        }
        if let Some(v) = request.order_id {
            active.order_id = Set(Some(v));
        }
        if let Some(v) = request.company_id {
            active.company_id = Set(Some(v));
        }
        if let Some(raw) = request.priority.as_deref() {
            active.priority = Set(parse_priority(raw)?);
        }
        if let Some(v) = request.due_date {
            active.due_date = Set(Some(v));
        }
        if let Some(v) = request.assigned_user_id {
            active.assigned_user_id = Set(Some(v));
        }
        if let Some(v) = request.labels {
            active.labels = Set(encode_json(&v)?);
        }
        if let Some(v) = request.attachments {
            active.attachments = Set(encode_json(&v)?);
        }
        if let Some(v) = request.comments {
            active.comments = Set(encode_json(&v)?);
        }
        if let Some(v) = request.checklist {
            active.checklist = Set(encode_json(&v)?);
        }
        active.updated_at = Set(Utc::now());
        Ok(active.update(&*self.db).await?.into())
    }

    /// Moves a card to `position` in the target column. Source and target
    /// are renumbered in the same transaction.
    #[instrument(skip(self, request), fields(to_column = %request.column_id, position = request.position))]
    pub async fn move_card(
        &self,
        id: Uuid,
        request: MoveCardRequest,
        acting_user: Option<Uuid>,
    ) -> Result<CardResponse, ServiceError> {
        let card = self.find_card(id).await?;
        let target = self.find_column(request.column_id).await?;
        let from_column = card.column_id;
        let index = request.position as usize;

        let mut source_ids = self.card_ids(from_column).await?;
        let txn = self.db.begin().await?;
        if from_column == target.id {
            move_within(&mut source_ids, id, index);
            write_card_positions(&txn, &source_ids).await?;
        } else {
            let mut target_ids = card_ids_on(&txn, target.id).await?;
            move_between(&mut source_ids, &mut target_ids, id, index);
            artwork_card::Entity::update_many()
                .col_expr(artwork_card::Column::ColumnId, Expr::value(target.id))
                .col_expr(artwork_card::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(artwork_card::Column::Id.eq(id))
                .exec(&txn)
                .await?;
            write_card_positions(&txn, &source_ids).await?;
            write_card_positions(&txn, &target_ids).await?;
        }
        ActivityService::record(
            &txn,
            NewActivity::new(
                "artwork_card",
                id,
                "moved",
                format!("Card \"{}\" moved to {}", card.title, target.name),
            )
            .by(acting_user)
            .with_metadata(serde_json::json!({
                "from_column": from_column,
                "to_column": target.id,
                "position": request.position,
            })),
        )
        .await?;
        txn.commit().await?;

        if let Some(sender) = &self.event_sender {
            let event = Event::ArtworkCardMoved {
                card_id: id,
                title: card.title.clone(),
                from_column,
                to_column: target.id,
                to_column_name: target.name.clone(),
                assigned_user_id: card.assigned_user_id,
            };
            if let Err(e) = sender.send(event).await {
                warn!(error = %e, "Failed to send card moved event");
            }
        }
        self.get_card(id).await
    }

    #[instrument(skip(self))]
    pub async fn delete_card(&self, id: Uuid) -> Result<(), ServiceError> {
        let card = self.find_card(id).await?;
        let remaining: Vec<Uuid> = self
            .card_ids(card.column_id)
            .await?
            .into_iter()
            .filter(|c| *c != id)
            .collect();

        let txn = self.db.begin().await?;
        artwork_card::Entity::delete_by_id(id).exec(&txn).await?;
        write_card_positions(&txn, &remaining).await?;
        txn.commit().await?;
        info!(card_id = %id, "Artwork card deleted");
        Ok(())
    }
}

async fn card_ids_on<C: ConnectionTrait>(conn: &C, column_id: Uuid) -> Result<Vec<Uuid>, ServiceError> {
    Ok(artwork_card::Entity::find()
        .filter(artwork_card::Column::ColumnId.eq(column_id))
        .order_by_asc(artwork_card::Column::Position)
        .all(conn)
        .await?
        .into_iter()
        .map(|c| c.id)
        .collect())
}

async fn write_card_positions<C: ConnectionTrait>(conn: &C, ids: &[Uuid]) -> Result<(), ServiceError> {
    for (id, position) in positions(ids) {
        artwork_card::Entity::update_many()
            .col_expr(artwork_card::Column::Position, Expr::value(position))
            .filter(artwork_card::Column::Id.eq(id))
            .exec(conn)
            .await?;
    }
    Ok(())
}

async fn write_column_positions<C: ConnectionTrait>(conn: &C, ids: &[Uuid]) -> Result<(), ServiceError> {
    for (id, position) in positions(ids) {
        artwork_column::Entity::update_many()
            .col_expr(artwork_column::Column::Position, Expr::value(position))
            .filter(artwork_column::Column::Id.eq(id))
            .exec(conn)
            .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_card_json_decodes_as_empty() {
        let labels: Vec<String> = decode_json("not json");
        assert!(labels.is_empty());
        let labels: Vec<String> = decode_json(r#"["rush","vip"]"#);
        assert_eq!(labels, vec!["rush", "vip"]);
    }

    #[test]
    fn priority_rejects_unknown_values() {
        assert_eq!(parse_priority("high").unwrap(), CardPriority::High);
        assert!(parse_priority("critical").is_err());
    }
}
