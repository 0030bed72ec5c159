use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{entity::*, query::*};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::{
        order::{self, OrderStatus},
        user,
    },
    errors::ServiceError,
    models::order_totals::round_money,
    services::companies::start_of_year,
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    /// Sum of order totals, cancelled orders excluded.
    #[schema(value_type = String)]
    pub total_revenue: Decimal,
    pub total_orders: u64,
    #[schema(value_type = String)]
    pub ytd_revenue: Decimal,
    #[schema(value_type = String)]
    pub average_order_value: Decimal,
    /// Quotes and quotes awaiting approval.
    pub open_quotes: u64,
    /// Approved, in production or shipped.
    pub active_orders: u64,
    pub orders_by_status: BTreeMap<String, u64>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeamMemberPerformance {
    pub user_id: Uuid,
    pub name: String,
    pub order_count: u64,
    #[schema(value_type = String)]
    pub revenue: Decimal,
    #[schema(value_type = String)]
    pub average_order_value: Decimal,
}

fn average(total: Decimal, count: u64) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        round_money(total / Decimal::from(count))
    }
}

/// Read-only figures for the dashboard, aggregated in SQL.
#[derive(Clone)]
pub struct DashboardService {
    db: Arc<DbPool>,
}

impl DashboardService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<DashboardStats, ServiceError> {
        let db = &*self.db;
        let rows: Vec<(OrderStatus, i64, Option<Decimal>)> = order::Entity::find()
            .select_only()
            .column(order::Column::Status)
            .column_as(order::Column::Id.count(), "order_count")
            .column_as(order::Column::Total.sum(), "revenue")
            .group_by(order::Column::Status)
            .into_tuple()
            .all(db)
            .await?;

        let mut orders_by_status = BTreeMap::new();
        let mut total_orders = 0u64;
        let mut total_revenue = Decimal::ZERO;
        let mut open_quotes = 0u64;
        let mut active_orders = 0u64;
        for (status, count, revenue) in rows {
            let count = count.max(0) as u64;
            orders_by_status.insert(status.to_string(), count);
            if !status.counts_as_revenue() {
                continue;
            }
            total_orders += count;
            total_revenue += revenue.unwrap_or(Decimal::ZERO);
            if matches!(status, OrderStatus::Quote | OrderStatus::PendingApproval) {
                open_quotes += count;
            }
            if status.is_active() {
                active_orders += count;
            }
        }

        let ytd_revenue: Option<Decimal> = order::Entity::find()
            .select_only()
            .column_as(order::Column::Total.sum(), "revenue")
            .filter(order::Column::Status.ne(OrderStatus::Cancelled))
            .filter(order::Column::CreatedAt.gte(start_of_year(Utc::now())?))
            .into_tuple::<Option<Decimal>>()
            .one(db)
            .await?
            .flatten();

        let total_revenue = round_money(total_revenue);
        info!(total_orders, %total_revenue, "Dashboard stats computed");
        Ok(DashboardStats {
            total_revenue,
            total_orders,
            ytd_revenue: round_money(ytd_revenue.unwrap_or(Decimal::ZERO)),
            average_order_value: average(total_revenue, total_orders),
            open_quotes,
            active_orders,
            orders_by_status,
            generated_at: Utc::now(),
        })
    }

    /// Per assigned user: order count and revenue of non-cancelled orders,
    /// highest revenue first. Unassigned orders are left out.
    #[instrument(skip(self))]
    pub async fn team_performance(&self) -> Result<Vec<TeamMemberPerformance>, ServiceError> {
        let db = &*self.db;
        let rows: Vec<(Option<Uuid>, i64, Option<Decimal>)> = order::Entity::find()
            .select_only()
            .column(order::Column::AssignedUserId)
            .column_as(order::Column::Id.count(), "order_count")
            .column_as(order::Column::Total.sum(), "revenue")
            .filter(order::Column::Status.ne(OrderStatus::Cancelled))
            .filter(order::Column::AssignedUserId.is_not_null())
            .group_by(order::Column::AssignedUserId)
            .into_tuple()
            .all(db)
            .await?;

        let user_ids: Vec<Uuid> = rows.iter().filter_map(|(id, _, _)| *id).collect();
        let names: HashMap<Uuid, String> = user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|u| (u.id, u.display_name()))
            .collect();

        let mut members: Vec<TeamMemberPerformance> = rows
            .into_iter()
            .filter_map(|(user_id, count, revenue)| {
                let user_id = user_id?;
                let order_count = count.max(0) as u64;
                let revenue = round_money(revenue.unwrap_or(Decimal::ZERO));
                Some(TeamMemberPerformance {
                    user_id,
                    name: names
                        .get(&user_id)
                        .cloned()
                        .unwrap_or_else(|| "Unknown user".to_string()),
                    order_count,
                    revenue,
                    average_order_value: average(revenue, order_count),
                })
            })
            .collect();
        members.sort_by(|a, b| b.revenue.cmp(&a.revenue).then(b.order_count.cmp(&a.order_count)));
        Ok(members)
    }

    pub async fn recent_orders(&self, limit: u64) -> Result<Vec<order::Model>, ServiceError> {
        Ok(order::Entity::find()
            .order_by_desc(order::Column::CreatedAt)
            .limit(limit)
            .all(&*self.db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn average_of_nothing_is_zero() {
        assert_eq!(average(dec!(100), 0), Decimal::ZERO);
        assert_eq!(average(dec!(100), 3), dec!(33.33));
    }
}
