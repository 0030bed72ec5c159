use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{entity::*, query::*, sea_query::Expr, TransactionTrait};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::{order, order_item},
    errors::ServiceError,
    events::{Event, EventSender},
    models::order_totals::{has_drift, line_total, OrderTotals},
    services::{
        activities::{ActivityService, NewActivity},
        companies::refresh_ytd_spend,
    },
};

/// Before/after amounts for one repaired order.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderRepair {
    pub order_id: Uuid,
    pub order_number: String,
    pub items_repaired: u64,
    #[schema(value_type = String)]
    pub subtotal_before: Decimal,
    #[schema(value_type = String)]
    pub subtotal_after: Decimal,
    #[schema(value_type = String)]
    pub total_before: Decimal,
    #[schema(value_type = String)]
    pub total_after: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct ReconcileReport {
    pub dry_run: bool,
    pub orders_scanned: u64,
    pub orders_repaired: u64,
    pub items_repaired: u64,
    pub repairs: Vec<OrderRepair>,
}

/// Changes needed to make one order consistent again.
#[derive(Debug, Clone, PartialEq)]
struct RepairPlan {
    /// `(item_id, corrected total_price)`
    items: Vec<(Uuid, Decimal)>,
    totals: OrderTotals,
}

/// Works out which item totals and which order amounts are off by more than
/// a cent. Returns `Ok(None)` when the order is consistent and an error when
/// its amounts cannot be recomputed within a money column.
fn plan_repair(
    order: &order::Model,
    items: &[order_item::Model],
) -> Result<Option<RepairPlan>, ServiceError> {
    let out_of_range = || {
        ServiceError::ValidationError(format!(
            "totals of order {} cannot be recomputed",
            order.order_number
        ))
    };
    let mut fixed_items = Vec::new();
    let mut subtotal = Decimal::ZERO;
    for item in items {
        let expected = line_total(item.quantity, item.unit_price).ok_or_else(out_of_range)?;
        let kept = if has_drift(item.total_price, expected) {
            fixed_items.push((item.id, expected));
            expected
        } else {
            item.total_price
        };
        subtotal = subtotal.checked_add(kept).ok_or_else(out_of_range)?;
    }

    let totals = OrderTotals::from_subtotal(subtotal, order.tax, order.shipping)
        .filter(OrderTotals::within_limit)
        .ok_or_else(out_of_range)?;
    let order_drift =
        has_drift(order.subtotal, totals.subtotal) || has_drift(order.total, totals.total);

    if fixed_items.is_empty() && !order_drift {
        return Ok(None);
    }
    Ok(Some(RepairPlan {
        items: fixed_items,
        totals,
    }))
}

/// Scans every order and repairs stored totals that drifted away from their
/// parts. Each order is repaired in its own transaction.
#[derive(Clone)]
pub struct ReconciliationService {
    db: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl ReconciliationService {
    pub fn new(db: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn reconcile(&self, dry_run: bool) -> Result<ReconcileReport, ServiceError> {
        let orders = order::Entity::find()
            .order_by_asc(order::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        let mut report = ReconcileReport {
            dry_run,
            ..Default::default()
        };

        for order in orders {
            report.orders_scanned += 1;
            let items = order
                .find_related(order_item::Entity)
                .all(&*self.db)
                .await?;
            let plan = match plan_repair(&order, &items) {
                Ok(Some(plan)) => plan,
                Ok(None) => continue,
                Err(e) => {
                    warn!(order_id = %order.id, error = %e, "Skipping order that cannot be reconciled");
                    continue;
                }
            };

            let repair = OrderRepair {
                order_id: order.id,
                order_number: order.order_number.clone(),
                items_repaired: plan.items.len() as u64,
                subtotal_before: order.subtotal,
                subtotal_after: plan.totals.subtotal,
                total_before: order.total,
                total_after: plan.totals.total,
            };
            warn!(
                order_id = %order.id,
                subtotal_before = %repair.subtotal_before,
                subtotal_after = %repair.subtotal_after,
                items = repair.items_repaired,
                dry_run,
                "Order totals drifted"
            );

            if !dry_run {
                self.apply(order, &plan).await?;
            }
            report.orders_repaired += 1;
            report.items_repaired += repair.items_repaired;
            report.repairs.push(repair);
        }

        info!(
            orders_scanned = report.orders_scanned,
            orders_repaired = report.orders_repaired,
            items_repaired = report.items_repaired,
            dry_run,
            "Reconciliation finished"
        );
        if !dry_run {
            if let Some(sender) = &self.event_sender {
                let event = Event::TotalsReconciled {
                    orders_scanned: report.orders_scanned,
                    orders_repaired: report.orders_repaired,
                    items_repaired: report.items_repaired,
                };
                if let Err(e) = sender.send(event).await {
                    warn!(error = %e, "Failed to send reconciliation event");
                }
            }
        }
        Ok(report)
    }

    async fn apply(&self, order: order::Model, plan: &RepairPlan) -> Result<(), ServiceError> {
        let now = Utc::now();
        let order_id = order.id;
        let company_id = order.company_id;
        let before = (order.subtotal, order.total);

        let txn = self.db.begin().await?;
        for (item_id, total_price) in &plan.items {
            order_item::Entity::update_many()
                .col_expr(order_item::Column::TotalPrice, Expr::value(*total_price))
                .col_expr(order_item::Column::UpdatedAt, Expr::value(now))
                .filter(order_item::Column::Id.eq(*item_id))
                .exec(&txn)
                .await?;
        }

        let mut active: order::ActiveModel = order.into();
        active.subtotal = Set(plan.totals.subtotal);
        active.total = Set(plan.totals.total);
        active.updated_at = Set(now);
        active.update(&txn).await?;

        refresh_ytd_spend(&txn, company_id).await?;
        ActivityService::record(
            &txn,
            NewActivity::new("order", order_id, "totals_reconciled", "Order totals repaired")
                .with_metadata(json!({
                    "subtotal_before": before.0,
                    "subtotal_after": plan.totals.subtotal,
                    "total_before": before.1,
                    "total_after": plan.totals.total,
                    "items_repaired": plan.items.len(),
                })),
        )
        .await?;
        txn.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::order::OrderStatus;
    use rust_decimal_macros::dec;

    fn sample_order(subtotal: Decimal, tax: Decimal, shipping: Decimal, total: Decimal) -> order::Model {
        let now = Utc::now();
        order::Model {
            id: Uuid::new_v4(),
            order_number: "ORD-20240101-000001".into(),
            company_id: Uuid::new_v4(),
            contact_id: None,
            assigned_user_id: None,
            status: OrderStatus::Quote,
            subtotal,
            tax,
            shipping,
            total,
            margin: None,
            in_hands_date: None,
            event_date: None,
            customer_notes: None,
            internal_notes: None,
            supplier_notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_item(order_id: Uuid, quantity: i32, unit_price: Decimal, total_price: Decimal) -> order_item::Model {
        let now = Utc::now();
        order_item::Model {
            id: Uuid::new_v4(),
            order_id,
            product_id: Uuid::new_v4(),
            quantity,
            unit_price,
            total_price,
            color: None,
            size: None,
            imprint_location: None,
            imprint_method: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn consistent_order_needs_no_repair() {
        let o = sample_order(dec!(25.00), dec!(2.00), dec!(5.00), dec!(32.00));
        let items = vec![sample_item(o.id, 10, dec!(2.50), dec!(25.00))];
        assert!(plan_repair(&o, &items).unwrap().is_none());
    }

    #[test]
    fn item_drift_propagates_to_order() {
        let o = sample_order(dec!(30.00), dec!(0), dec!(0), dec!(30.00));
        let items = vec![sample_item(o.id, 10, dec!(2.50), dec!(30.00))];
        let plan = plan_repair(&o, &items).unwrap().expect("drift expected");
        assert_eq!(plan.items, vec![(items[0].id, dec!(25.00))]);
        assert_eq!(plan.totals.subtotal, dec!(25.00));
        assert_eq!(plan.totals.total, dec!(25.00));
    }

    #[test]
    fn order_total_drift_alone_is_repaired() {
        let o = sample_order(dec!(25.00), dec!(2.00), dec!(5.00), dec!(40.00));
        let items = vec![sample_item(o.id, 10, dec!(2.50), dec!(25.00))];
        let plan = plan_repair(&o, &items).unwrap().expect("drift expected");
        assert!(plan.items.is_empty());
        assert_eq!(plan.totals.total, dec!(32.00));
    }

    #[test]
    fn one_cent_drift_is_tolerated() {
        let o = sample_order(dec!(25.01), dec!(0), dec!(0), dec!(25.01));
        let items = vec![sample_item(o.id, 10, dec!(2.50), dec!(25.01))];
        assert!(plan_repair(&o, &items).unwrap().is_none());
    }

    #[test]
    fn unrepresentable_totals_are_reported_not_repaired() {
        let o = sample_order(dec!(1), dec!(0), dec!(0), dec!(1));
        let items = vec![sample_item(o.id, i32::MAX, Decimal::MAX, dec!(1))];
        assert_matches::assert_matches!(
            plan_repair(&o, &items),
            Err(ServiceError::ValidationError(_))
        );
    }
}
