use chrono::{NaiveDate, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use sea_orm::{entity::*, query::*, sea_query::Expr, ConnectionTrait, TransactionTrait};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::{
        activity, artwork_card, artwork_file, attachment, communication, company,
        order::{self, OrderStatus},
        order_item, product,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    models::order_totals::{
        default_tax, line_total, round_money, within_limit, OrderTotals, MAX_AMOUNT,
    },
    services::{
        activities::{ActivityService, NewActivity},
        companies::refresh_ytd_spend,
    },
};

const ORDER_NUMBER_ATTEMPTS: usize = 5;

/// Line item as submitted by clients. Any total sent along is ignored; the
/// line total is always `quantity * unit_price`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct OrderItemInput {
    pub product_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: i32,
    #[schema(value_type = String, example = "4.25")]
    pub unit_price: Decimal,
    pub color: Option<String>,
    pub size: Option<String>,
    pub imprint_location: Option<String>,
    pub imprint_method: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    /// Generated as `ORD-YYYYMMDD-NNNNNN` when omitted.
    #[validate(length(min = 1, max = 64))]
    pub order_number: Option<String>,
    pub company_id: Uuid,
    pub contact_id: Option<Uuid>,
    pub assigned_user_id: Option<Uuid>,
    /// Defaults to `quote`.
    pub status: Option<String>,
    /// Defaults to `subtotal * default_tax_rate`.
    #[schema(value_type = Option<String>)]
    pub tax: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub shipping: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub margin: Option<Decimal>,
    pub in_hands_date: Option<NaiveDate>,
    pub event_date: Option<NaiveDate>,
    pub customer_notes: Option<String>,
    pub internal_notes: Option<String>,
    pub supplier_notes: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItemInput>,
}

/// Header fields only; items go through the item operations.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderRequest {
    pub contact_id: Option<Uuid>,
    pub assigned_user_id: Option<Uuid>,
    #[schema(value_type = Option<String>)]
    pub tax: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub shipping: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub margin: Option<Decimal>,
    pub in_hands_date: Option<NaiveDate>,
    pub event_date: Option<NaiveDate>,
    pub customer_notes: Option<String>,
    pub internal_notes: Option<String>,
    pub supplier_notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    #[schema(example = "approved")]
    pub status: String,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderItemRequest {
    #[validate(range(min = 1))]
    pub quantity: Option<i32>,
    #[schema(value_type = Option<String>)]
    pub unit_price: Option<Decimal>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub imprint_location: Option<String>,
    pub imprint_method: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default)]
pub struct OrderFilter {
    pub status: Option<String>,
    pub company_id: Option<Uuid>,
    pub assigned_user_id: Option<Uuid>,
    /// Matches anywhere in the order number.
    pub search: Option<String>,
}

/// An order together with its line items.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: order::Model,
    pub items: Vec<order_item::Model>,
}

/// Parses a client supplied status, rejecting anything outside the enum.
pub fn parse_status(raw: &str) -> Result<OrderStatus, ServiceError> {
    OrderStatus::from_str(raw.trim())
        .map_err(|_| ServiceError::InvalidStatus(format!("unknown order status '{}'", raw)))
}

fn generate_order_number() -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("ORD-{}-{:06}", Utc::now().format("%Y%m%d"), suffix)
}

fn ensure_non_negative(field: &str, value: Decimal) -> Result<(), ServiceError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ServiceError::ValidationError(format!(
            "{} must not be negative",
            field
        )));
    }
    Ok(())
}

/// Client supplied money must be non-negative and fit a money column.
fn ensure_amount(field: &str, value: Decimal) -> Result<(), ServiceError> {
    ensure_non_negative(field, value)?;
    if !within_limit(value) {
        return Err(ServiceError::ValidationError(format!(
            "{} must not exceed {}",
            field, MAX_AMOUNT
        )));
    }
    Ok(())
}

fn checked_line_total(quantity: i32, unit_price: Decimal) -> Result<Decimal, ServiceError> {
    line_total(quantity, unit_price)
        .filter(|total| within_limit(*total))
        .ok_or_else(|| {
            ServiceError::ValidationError(format!(
                "line total for {} x {} exceeds {}",
                quantity, unit_price, MAX_AMOUNT
            ))
        })
}

fn checked_totals(totals: Option<OrderTotals>) -> Result<OrderTotals, ServiceError> {
    totals.filter(OrderTotals::within_limit).ok_or_else(|| {
        ServiceError::ValidationError(format!("order total must not exceed {}", MAX_AMOUNT))
    })
}

#[derive(Clone)]
pub struct OrderService {
    db: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
    tax_rate: Decimal,
}

impl OrderService {
    pub fn new(db: Arc<DbPool>, event_sender: Option<Arc<EventSender>>, tax_rate: Decimal) -> Self {
        Self {
            db,
            event_sender,
            tax_rate,
        }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: OrderFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<order::Model>, u64), ServiceError> {
        let mut query = order::Entity::find().order_by_desc(order::Column::CreatedAt);
        if let Some(status) = filter.status.as_deref() {
            query = query.filter(order::Column::Status.eq(parse_status(status)?));
        }
        if let Some(company_id) = filter.company_id {
            query = query.filter(order::Column::CompanyId.eq(company_id));
        }
        if let Some(user_id) = filter.assigned_user_id {
            query = query.filter(order::Column::AssignedUserId.eq(user_id));
        }
        if let Some(term) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(order::Column::OrderNumber.contains(term));
        }

        let paginator = query.paginate(&*self.db, limit);
        let total = paginator.num_items().await?;
        let orders = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((orders, total))
    }

    pub async fn find(&self, id: Uuid) -> Result<order::Model, ServiceError> {
        order::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Order", id))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<OrderDetails, ServiceError> {
        let order = self.find(id).await?;
        self.with_items(order).await
    }

    #[instrument(skip(self))]
    pub async fn get_by_number(&self, order_number: &str) -> Result<OrderDetails, ServiceError> {
        let order = order::Entity::find()
            .filter(order::Column::OrderNumber.eq(order_number))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Order", order_number))?;
        self.with_items(order).await
    }

    async fn with_items(&self, order: order::Model) -> Result<OrderDetails, ServiceError> {
        let items = order
            .find_related(order_item::Entity)
            .order_by_asc(order_item::Column::CreatedAt)
            .all(&*self.db)
            .await?;
        Ok(OrderDetails { order, items })
    }

    /// Creates an order and its items in one transaction. Totals are always
    /// computed here; the company's YTD spend is refreshed before commit.
    #[instrument(skip(self, request), fields(company_id = %request.company_id, items = request.items.len()))]
    pub async fn create(
        &self,
        request: CreateOrderRequest,
        acting_user: Option<Uuid>,
    ) -> Result<OrderDetails, ServiceError> {
        request.validate()?;
        for item in &request.items {
            item.validate()?;
            ensure_amount("unit_price", item.unit_price)?;
            checked_line_total(item.quantity, item.unit_price)?;
        }
        if let Some(tax) = request.tax {
            ensure_amount("tax", tax)?;
        }
        if let Some(shipping) = request.shipping {
            ensure_amount("shipping", shipping)?;
        }
        let status = match request.status.as_deref() {
            Some(raw) => parse_status(raw)?,
            None => OrderStatus::Quote,
        };

        company::Entity::find_by_id(request.company_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Company", request.company_id))?;
        for item in &request.items {
            self.ensure_product(item.product_id).await?;
        }
        let order_number = self.resolve_order_number(request.order_number.as_deref()).await?;

        let subtotal = checked_totals(OrderTotals::from_lines(
            request.items.iter().map(|i| (i.quantity, i.unit_price)),
            Decimal::ZERO,
            Decimal::ZERO,
        ))?
        .subtotal;
        let tax = request.tax.or_else(|| default_tax(subtotal, self.tax_rate));
        let totals = checked_totals(tax.and_then(|tax| {
            OrderTotals::from_subtotal(subtotal, tax, request.shipping.unwrap_or(Decimal::ZERO))
        }))?;

        let now = Utc::now();
        let order_id = Uuid::new_v4();
        let txn = self.db.begin().await?;

        let order = order::ActiveModel {
            id: Set(order_id),
            order_number: Set(order_number),
            company_id: Set(request.company_id),
            contact_id: Set(request.contact_id),
            assigned_user_id: Set(request.assigned_user_id),
            status: Set(status),
            subtotal: Set(totals.subtotal),
            tax: Set(totals.tax),
            shipping: Set(totals.shipping),
            total: Set(totals.total),
            margin: Set(request.margin),
            in_hands_date: Set(request.in_hands_date),
            event_date: Set(request.event_date),
            customer_notes: Set(request.customer_notes),
            internal_notes: Set(request.internal_notes),
            supplier_notes: Set(request.supplier_notes),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to insert order");
            ServiceError::from(e)
        })?;

        let mut items = Vec::with_capacity(request.items.len());
        for input in request.items {
            items.push(insert_item(&txn, order_id, input).await?);
        }

        refresh_ytd_spend(&txn, order.company_id).await?;
        ActivityService::record(
            &txn,
            NewActivity::new(
                "order",
                order_id,
                "created",
                format!("Order {} created", order.order_number),
            )
            .by(acting_user)
            .with_metadata(json!({ "status": order.status, "total": order.total })),
        )
        .await?;
        txn.commit().await?;

        info!(order_id = %order_id, order_number = %order.order_number, total = %order.total, "Order created");
        self.emit(Event::OrderCreated {
            order_id,
            order_number: order.order_number.clone(),
        })
        .await;
        Ok(OrderDetails { order, items })
    }

    async fn resolve_order_number(&self, requested: Option<&str>) -> Result<String, ServiceError> {
        if let Some(number) = requested.map(str::trim) {
            if number.is_empty() {
                return Err(ServiceError::ValidationError(
                    "order_number must not be blank".to_string(),
                ));
            }
            if self.order_number_taken(number).await? {
                return Err(ServiceError::Conflict(format!(
                    "Order number {} already exists",
                    number
                )));
            }
            return Ok(number.to_string());
        }
        for _ in 0..ORDER_NUMBER_ATTEMPTS {
            let candidate = generate_order_number();
            if !self.order_number_taken(&candidate).await? {
                return Ok(candidate);
            }
            warn!(order_number = %candidate, "Generated order number collided, retrying");
        }
        Err(ServiceError::Conflict(
            "Could not allocate a unique order number".to_string(),
        ))
    }

    async fn order_number_taken(&self, number: &str) -> Result<bool, ServiceError> {
        let count = order::Entity::find()
            .filter(order::Column::OrderNumber.eq(number))
            .count(&*self.db)
            .await?;
        Ok(count > 0)
    }

    async fn ensure_product(&self, product_id: Uuid) -> Result<(), ServiceError> {
        product::Entity::find_by_id(product_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", product_id))?;
        Ok(())
    }

    /// Updates header fields. Changing tax or shipping recomputes the total.
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateOrderRequest,
        acting_user: Option<Uuid>,
    ) -> Result<OrderDetails, ServiceError> {
        request.validate()?;
        let existing = self.find(id).await?;
        let tax = request.tax.unwrap_or(existing.tax);
        let shipping = request.shipping.unwrap_or(existing.shipping);
        ensure_amount("tax", tax)?;
        ensure_amount("shipping", shipping)?;
        let totals = checked_totals(OrderTotals::from_subtotal(existing.subtotal, tax, shipping))?;

        let company_id = existing.company_id;
        let order_number = existing.order_number.clone();
        let mut active: order::ActiveModel = existing.into();
        active.tax = Set(totals.tax);
        active.shipping = Set(totals.shipping);
        active.total = Set(totals.total);
        if let Some(v) = request.contact_id {
            active.contact_id = Set(Some(v));
        }
        if let Some(v) = request.assigned_user_id {
            active.assigned_user_id = Set(Some(v));
        }
        if let Some(v) = request.margin {
            active.margin = Set(Some(v));
        }
        if let Some(v) = request.in_hands_date {
            active.in_hands_date = Set(Some(v));
        }
        if let Some(v) = request.event_date {
            active.event_date = Set(Some(v));
        }
        if let Some(v) = request.customer_notes {
            active.customer_notes = Set(Some(v));
        }
        if let Some(v) = request.internal_notes {
            active.internal_notes = Set(Some(v));
        }
        if let Some(v) = request.supplier_notes {
            active.supplier_notes = Set(Some(v));
        }
        active.updated_at = Set(Utc::now());

        let txn = self.db.begin().await?;
        active.update(&txn).await?;
        refresh_ytd_spend(&txn, company_id).await?;
        ActivityService::record(
            &txn,
            NewActivity::new("order", id, "updated", format!("Order {} updated", order_number))
                .by(acting_user),
        )
        .await?;
        txn.commit().await?;

        self.emit(Event::OrderUpdated(id)).await;
        self.get(id).await
    }

    /// Sets any status from any other. Setting the current status again is a
    /// no-op and records nothing.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: Uuid,
        raw_status: &str,
        acting_user: Option<Uuid>,
    ) -> Result<order::Model, ServiceError> {
        let new_status = parse_status(raw_status)?;
        let existing = self.find(id).await?;
        let old_status = existing.status;
        if old_status == new_status {
            return Ok(existing);
        }

        let txn = self.db.begin().await?;
        let mut active: order::ActiveModel = existing.into();
        active.status = Set(new_status);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;
        refresh_ytd_spend(&txn, updated.company_id).await?;
        ActivityService::record(
            &txn,
            NewActivity::new(
                "order",
                id,
                "status_changed",
                format!(
                    "Order {} moved from {} to {}",
                    updated.order_number, old_status, new_status
                ),
            )
            .by(acting_user)
            .with_metadata(json!({
                "old_status": old_status.to_string(),
                "new_status": new_status.to_string(),
            })),
        )
        .await?;
        txn.commit().await?;

        info!(order_id = %id, old_status = %old_status, new_status = %new_status, "Order status changed");
        self.emit(Event::OrderStatusChanged {
            order_id: id,
            order_number: updated.order_number.clone(),
            old_status: old_status.to_string(),
            new_status: new_status.to_string(),
            assigned_user_id: updated.assigned_user_id,
        })
        .await;
        Ok(updated)
    }

    /// Deletes an order with its items, artwork files, attachments and
    /// communications. Board cards linked to it are kept and unlinked.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid, acting_user: Option<Uuid>) -> Result<(), ServiceError> {
        let existing = self.find(id).await?;
        let txn = self.db.begin().await?;

        order_item::Entity::delete_many()
            .filter(order_item::Column::OrderId.eq(id))
            .exec(&txn)
            .await?;
        artwork_file::Entity::delete_many()
            .filter(artwork_file::Column::OrderId.eq(id))
            .exec(&txn)
            .await?;
        attachment::Entity::delete_many()
            .filter(attachment::Column::OrderId.eq(id))
            .exec(&txn)
            .await?;
        communication::Entity::delete_many()
            .filter(communication::Column::OrderId.eq(id))
            .exec(&txn)
            .await?;
        artwork_card::Entity::update_many()
            .col_expr(artwork_card::Column::OrderId, Expr::value(Option::<Uuid>::None))
            .filter(artwork_card::Column::OrderId.eq(id))
            .exec(&txn)
            .await?;
        order::Entity::delete_by_id(id).exec(&txn).await?;

        refresh_ytd_spend(&txn, existing.company_id).await?;
        ActivityService::record(
            &txn,
            NewActivity::new(
                "order",
                id,
                "deleted",
                format!("Order {} deleted", existing.order_number),
            )
            .by(acting_user),
        )
        .await?;
        txn.commit().await?;

        info!(order_id = %id, "Order deleted");
        self.emit(Event::OrderDeleted(id)).await;
        Ok(())
    }

    #[instrument(skip(self, input))]
    pub async fn add_item(
        &self,
        order_id: Uuid,
        input: OrderItemInput,
        acting_user: Option<Uuid>,
    ) -> Result<OrderDetails, ServiceError> {
        input.validate()?;
        ensure_amount("unit_price", input.unit_price)?;
        checked_line_total(input.quantity, input.unit_price)?;
        let order = self.find(order_id).await?;
        self.ensure_product(input.product_id).await?;

        let txn = self.db.begin().await?;
        let item = insert_item(&txn, order_id, input).await?;
        recompute_order_totals(&txn, &order).await?;
        ActivityService::record(
            &txn,
            NewActivity::new(
                "order",
                order_id,
                "item_added",
                format!("Added {} x item to order {}", item.quantity, order.order_number),
            )
            .by(acting_user)
            .with_metadata(json!({ "item_id": item.id, "product_id": item.product_id })),
        )
        .await?;
        txn.commit().await?;

        self.emit(Event::OrderUpdated(order_id)).await;
        self.get(order_id).await
    }

    #[instrument(skip(self, request))]
    pub async fn update_item(
        &self,
        order_id: Uuid,
        item_id: Uuid,
        request: UpdateOrderItemRequest,
        acting_user: Option<Uuid>,
    ) -> Result<OrderDetails, ServiceError> {
        request.validate()?;
        let order = self.find(order_id).await?;
        let item = self.find_item(order_id, item_id).await?;

        let quantity = request.quantity.unwrap_or(item.quantity);
        let unit_price = request.unit_price.unwrap_or(item.unit_price);
        ensure_amount("unit_price", unit_price)?;
        let total_price = checked_line_total(quantity, unit_price)?;

        let mut active: order_item::ActiveModel = item.into();
        active.quantity = Set(quantity);
        active.unit_price = Set(round_money(unit_price));
        active.total_price = Set(total_price);
        if let Some(v) = request.color {
            active.color = Set(Some(v));
        }
        if let Some(v) = request.size {
            active.size = Set(Some(v));
        }
        if let Some(v) = request.imprint_location {
            active.imprint_location = Set(Some(v));
        }
        if let Some(v) = request.imprint_method {
            active.imprint_method = Set(Some(v));
        }
        if let Some(v) = request.notes {
            active.notes = Set(Some(v));
        }
        active.updated_at = Set(Utc::now());

        let txn = self.db.begin().await?;
        active.update(&txn).await?;
        recompute_order_totals(&txn, &order).await?;
        ActivityService::record(
            &txn,
            NewActivity::new(
                "order",
                order_id,
                "item_updated",
                format!("Updated item on order {}", order.order_number),
            )
            .by(acting_user)
            .with_metadata(json!({ "item_id": item_id })),
        )
        .await?;
        txn.commit().await?;

        self.emit(Event::OrderUpdated(order_id)).await;
        self.get(order_id).await
    }

    #[instrument(skip(self))]
    pub async fn remove_item(
        &self,
        order_id: Uuid,
        item_id: Uuid,
        acting_user: Option<Uuid>,
    ) -> Result<OrderDetails, ServiceError> {
        let order = self.find(order_id).await?;
        self.find_item(order_id, item_id).await?;

        let txn = self.db.begin().await?;
        order_item::Entity::delete_by_id(item_id).exec(&txn).await?;
        recompute_order_totals(&txn, &order).await?;
        ActivityService::record(
            &txn,
            NewActivity::new(
                "order",
                order_id,
                "item_removed",
                format!("Removed item from order {}", order.order_number),
            )
            .by(acting_user)
            .with_metadata(json!({ "item_id": item_id })),
        )
        .await?;
        txn.commit().await?;

        self.emit(Event::OrderUpdated(order_id)).await;
        self.get(order_id).await
    }

    async fn find_item(&self, order_id: Uuid, item_id: Uuid) -> Result<order_item::Model, ServiceError> {
        order_item::Entity::find_by_id(item_id)
            .filter(order_item::Column::OrderId.eq(order_id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Order item", item_id))
    }

    #[instrument(skip(self))]
    pub async fn list_activities(&self, order_id: Uuid) -> Result<Vec<activity::Model>, ServiceError> {
        self.find(order_id).await?;
        Ok(activity::Entity::find()
            .filter(activity::Column::EntityType.eq("order"))
            .filter(activity::Column::EntityId.eq(order_id))
            .order_by_desc(activity::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    async fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(event).await {
                warn!(error = %e, "Failed to send order event");
            }
        }
    }
}

async fn insert_item<C: ConnectionTrait>(
    conn: &C,
    order_id: Uuid,
    input: OrderItemInput,
) -> Result<order_item::Model, ServiceError> {
    let total_price = checked_line_total(input.quantity, input.unit_price)?;
    let now = Utc::now();
    Ok(order_item::ActiveModel {
        id: Set(Uuid::new_v4()),
        order_id: Set(order_id),
        product_id: Set(input.product_id),
        quantity: Set(input.quantity),
        unit_price: Set(round_money(input.unit_price)),
        total_price: Set(total_price),
        color: Set(input.color),
        size: Set(input.size),
        imprint_location: Set(input.imprint_location),
        imprint_method: Set(input.imprint_method),
        notes: Set(input.notes),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await?)
}

/// Recomputes subtotal and total from the stored item totals, keeping the
/// order's tax and shipping, then refreshes the company's YTD spend.
pub(crate) async fn recompute_order_totals<C: ConnectionTrait>(
    conn: &C,
    order: &order::Model,
) -> Result<order::Model, ServiceError> {
    let subtotal = order_item::Entity::find()
        .filter(order_item::Column::OrderId.eq(order.id))
        .all(conn)
        .await?
        .iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.total_price));
    let totals = checked_totals(
        subtotal.and_then(|subtotal| OrderTotals::from_subtotal(subtotal, order.tax, order.shipping)),
    )?;

    let mut active: order::ActiveModel = order.clone().into();
    active.subtotal = Set(totals.subtotal);
    active.total = Set(totals.total);
    active.updated_at = Set(Utc::now());
    let updated = active.update(conn).await?;
    refresh_ytd_spend(conn, updated.company_id).await?;
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn generated_numbers_follow_the_pattern() {
        let number = generate_order_number();
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ORD");
        assert_eq!(parts[1].len(), 8);
        assert_eq!(parts[2].len(), 6);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert_matches!(parse_status("on_hold"), Err(ServiceError::InvalidStatus(_)));
        assert_eq!(parse_status(" shipped ").unwrap(), OrderStatus::Shipped);
    }

    #[test]
    fn negative_amounts_are_rejected() {
        assert!(ensure_non_negative("tax", Decimal::new(-1, 2)).is_err());
        assert!(ensure_non_negative("tax", Decimal::ZERO).is_ok());
    }

    #[test]
    fn amounts_must_fit_a_money_column() {
        assert!(ensure_amount("shipping", MAX_AMOUNT).is_ok());
        assert_matches!(
            ensure_amount("shipping", MAX_AMOUNT + Decimal::new(1, 2)),
            Err(ServiceError::ValidationError(_))
        );
        assert_matches!(
            checked_line_total(2_000_000_000, MAX_AMOUNT),
            Err(ServiceError::ValidationError(_))
        );
        assert_matches!(
            checked_line_total(i32::MAX, Decimal::MAX),
            Err(ServiceError::ValidationError(_))
        );
        assert_eq!(checked_line_total(4, Decimal::new(250, 2)).unwrap(), Decimal::TEN);
    }
}
