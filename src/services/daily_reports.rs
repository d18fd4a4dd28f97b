use crate::{
    auth::AuthUser,
    entities::daily_report::{self, Entity as DailyReportEntity},
    entities::item::{self, Entity as ItemEntity},
    entities::order::{self, Entity as OrderEntity},
    entities::user::{self, Entity as UserEntity},
    errors::ServiceError,
    services::materials::{day_end_exclusive, day_start},
    services::orders::OrderResponse,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct DailyReportResponse {
    pub id: i32,
    pub report_date: NaiveDate,
    pub orders_count: i32,
    pub total_revenue: Decimal,
    pub cash_actual: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub user_id: i32,
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_json: Option<String>,
}

impl DailyReportResponse {
    fn from_model(model: daily_report::Model, user_name: Option<String>, with_snapshot: bool) -> Self {
        Self {
            id: model.id,
            report_date: model.report_date,
            orders_count: model.orders_count,
            total_revenue: model.total_revenue,
            cash_actual: model.cash_actual,
            created_at: model.created_at,
            updated_at: model.updated_at,
            user_id: model.user_id,
            user_name,
            snapshot_json: if with_snapshot { model.snapshot_json } else { None },
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDailyReportRequest {
    /// Must be the current date, YYYY-MM-DD
    pub report_date: String,
    pub user_id: Option<i32>,
    pub orders_count: Option<i32>,
    pub total_revenue: Option<Decimal>,
    pub cash_actual: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PatchDailyReportRequest {
    pub orders_count: Option<i32>,
    pub total_revenue: Option<Decimal>,
    pub cash_actual: Option<Decimal>,
    /// New owning user; honored for admin callers only
    pub user_id: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListReportsQuery {
    pub user_id: Option<i32>,
    pub current_user_id: Option<i32>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TargetUserQuery {
    pub user_id: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportMetadata {
    pub total_orders: usize,
    pub total_revenue: Decimal,
    pub orders_by_status: BTreeMap<String, u32>,
    pub revenue_by_status: BTreeMap<String, Decimal>,
    pub created_by: i32,
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FullReportResponse {
    #[serde(flatten)]
    pub report: DailyReportResponse,
    pub orders: Vec<OrderResponse>,
    pub report_metadata: ReportMetadata,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveFullReportRequest {
    pub report_date: NaiveDate,
    pub user_id: Option<i32>,
    /// Client-computed snapshot, persisted verbatim
    #[schema(value_type = Object)]
    pub orders: Option<Value>,
    pub report_metadata: Option<SaveFullReportMetadata>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveFullReportMetadata {
    pub total_orders: Option<i32>,
    pub total_revenue: Option<Decimal>,
}

/// Daily report lifecycle: one row per (date, user), created only for the
/// current date, updated in place, explicitly deleted.
#[derive(Clone)]
pub struct DailyReportService {
    db: Arc<DatabaseConnection>,
}

impl DailyReportService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Opens today's report for a user if absent. Used as a login side
    /// effect; an existing row (or a concurrent create) is not an error.
    #[instrument(skip(self))]
    pub async fn ensure_for_today(&self, user_id: i32) -> Result<(), ServiceError> {
        let today = Utc::now().date_naive();
        let exists = DailyReportEntity::find()
            .filter(daily_report::Column::ReportDate.eq(today))
            .filter(daily_report::Column::UserId.eq(user_id))
            .one(&*self.db)
            .await?
            .is_some();
        if exists {
            return Ok(());
        }

        let result = daily_report::ActiveModel {
            report_date: Set(today),
            user_id: Set(user_id),
            orders_count: Set(0),
            total_revenue: Set(Decimal::ZERO),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await;

        match result {
            Ok(_) => {
                info!(user_id, %today, "daily report opened at login");
                Ok(())
            }
            Err(e) => {
                // Lost the race to another login; the row exists either way.
                let err = ServiceError::conflict_on_unique(e, "report already exists");
                if matches!(err, ServiceError::Conflict(_)) {
                    Ok(())
                } else {
                    Err(err)
                }
            }
        }
    }

    /// Explicit creation. Restricted to the current date and to the
    /// caller's own identity regardless of role.
    #[instrument(skip(self, request))]
    pub async fn create(
        &self,
        auth: &AuthUser,
        request: CreateDailyReportRequest,
    ) -> Result<DailyReportResponse, ServiceError> {
        let report_date = NaiveDate::parse_from_str(&request.report_date, "%Y-%m-%d")
            .map_err(|_| ServiceError::ValidationError("report_date must be YYYY-MM-DD".into()))?;

        let today = Utc::now().date_naive();
        if report_date != today {
            return Err(ServiceError::ValidationError(
                "A report can only be created for the current date".to_string(),
            ));
        }

        let target_user_id = request.user_id.unwrap_or(auth.id);
        if target_user_id != auth.id {
            return Err(ServiceError::Forbidden(
                "A report can only be created for the current user".to_string(),
            ));
        }

        let inserted = daily_report::ActiveModel {
            report_date: Set(report_date),
            user_id: Set(target_user_id),
            orders_count: Set(request.orders_count.unwrap_or(0)),
            total_revenue: Set(request.total_revenue.unwrap_or_default()),
            cash_actual: Set(request.cash_actual),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .map_err(|e| ServiceError::conflict_on_unique(e, "Report already exists"))?;

        let user_name = self.user_name(target_user_id).await?;
        Ok(DailyReportResponse::from_model(inserted, user_name, true))
    }

    /// Reads one report. Admins may target another user via the query.
    #[instrument(skip(self))]
    pub async fn get(
        &self,
        auth: &AuthUser,
        date: NaiveDate,
        target: TargetUserQuery,
    ) -> Result<DailyReportResponse, ServiceError> {
        let target_user_id = self.resolve_target(auth, target.user_id)?;

        let row = DailyReportEntity::find()
            .filter(daily_report::Column::ReportDate.eq(date))
            .filter(daily_report::Column::UserId.eq(target_user_id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Report not found".to_string()))?;

        let user_name = self.user_name(row.user_id).await?;
        Ok(DailyReportResponse::from_model(row, user_name, true))
    }

    /// Lists reports, newest date first. Filtering by another user's id is
    /// admin-only; the default scope is the caller's own reports.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        auth: &AuthUser,
        query: ListReportsQuery,
    ) -> Result<Vec<DailyReportResponse>, ServiceError> {
        let scope_user = if let Some(user_id) = query.user_id {
            if !auth.is_admin() {
                return Err(ServiceError::Forbidden(
                    "Only admins may list other users' reports".to_string(),
                ));
            }
            user_id
        } else {
            query.current_user_id.unwrap_or(auth.id)
        };

        let mut finder =
            DailyReportEntity::find().filter(daily_report::Column::UserId.eq(scope_user));
        if let Some(from) = query.from {
            finder = finder.filter(daily_report::Column::ReportDate.gte(from));
        }
        if let Some(to) = query.to {
            finder = finder.filter(daily_report::Column::ReportDate.lte(to));
        }

        let rows = finder
            .order_by_desc(daily_report::Column::ReportDate)
            .all(&*self.db)
            .await?;

        let user_name = self.user_name(scope_user).await?;
        Ok(rows
            .into_iter()
            .map(|r| DailyReportResponse::from_model(r, user_name.clone(), false))
            .collect())
    }

    /// Patches the aggregates of one report. Reassigning the owner is
    /// honored for admins only; a collision with an existing row for the
    /// new owner conflicts.
    #[instrument(skip(self, request))]
    pub async fn patch(
        &self,
        auth: &AuthUser,
        date: NaiveDate,
        target: TargetUserQuery,
        request: PatchDailyReportRequest,
    ) -> Result<DailyReportResponse, ServiceError> {
        if request.orders_count.is_none()
            && request.total_revenue.is_none()
            && request.cash_actual.is_none()
            && request.user_id.is_none()
        {
            return Err(ServiceError::ValidationError(
                "Nothing to update".to_string(),
            ));
        }

        let target_user_id = self.resolve_target(auth, target.user_id)?;

        let existing = DailyReportEntity::find()
            .filter(daily_report::Column::ReportDate.eq(date))
            .filter(daily_report::Column::UserId.eq(target_user_id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Report not found".to_string()))?;

        let next_user_id = match request.user_id {
            Some(requested) if auth.is_admin() => requested,
            Some(_) => {
                warn!(caller = auth.id, "non-admin attempted report reassignment");
                target_user_id
            }
            None => target_user_id,
        };

        let mut active: daily_report::ActiveModel = existing.into();
        if let Some(orders_count) = request.orders_count {
            active.orders_count = Set(orders_count);
        }
        if let Some(total_revenue) = request.total_revenue {
            active.total_revenue = Set(total_revenue);
        }
        if let Some(cash_actual) = request.cash_actual {
            active.cash_actual = Set(Some(cash_actual));
        }
        if next_user_id != target_user_id {
            active.user_id = Set(next_user_id);
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(&*self.db).await.map_err(|e| {
            ServiceError::conflict_on_unique(e, "A report for this user and date already exists")
        })?;

        let user_name = self.user_name(updated.user_id).await?;
        Ok(DailyReportResponse::from_model(updated, user_name, true))
    }

    /// Permanent deletion by report id.
    #[instrument(skip(self))]
    pub async fn delete(&self, report_id: i32) -> Result<(), ServiceError> {
        let existing = DailyReportEntity::find_by_id(report_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Report not found".to_string()))?;

        DailyReportEntity::delete_by_id(existing.id)
            .exec(&*self.db)
            .await?;

        info!(report_id, "daily report deleted");
        Ok(())
    }

    /// Composes the stored report with that day's orders and computed
    /// metadata for display.
    #[instrument(skip(self))]
    pub async fn full_report(
        &self,
        auth: &AuthUser,
        date: NaiveDate,
        target: TargetUserQuery,
    ) -> Result<FullReportResponse, ServiceError> {
        let target_user_id = self.resolve_target(auth, target.user_id)?;

        let row = DailyReportEntity::find()
            .filter(daily_report::Column::ReportDate.eq(date))
            .filter(daily_report::Column::UserId.eq(target_user_id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Report not found".to_string()))?;

        let orders = OrderEntity::find()
            .filter(order::Column::CreatedAt.gte(day_start(date)))
            .filter(order::Column::CreatedAt.lt(day_end_exclusive(date)))
            .filter(order::Column::UserId.eq(target_user_id))
            .order_by_desc(order::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        let mut order_responses = Vec::with_capacity(orders.len());
        for order_model in orders {
            let items = ItemEntity::find()
                .filter(item::Column::OrderId.eq(order_model.id))
                .all(&*self.db)
                .await?;
            order_responses.push(OrderResponse::from_model(order_model, items));
        }

        let mut orders_by_status: BTreeMap<String, u32> = BTreeMap::new();
        let mut revenue_by_status: BTreeMap<String, Decimal> = BTreeMap::new();
        let mut total_revenue = Decimal::ZERO;
        for order_response in &order_responses {
            let status_key = order_response.status.to_string();
            let revenue: Decimal = order_response
                .items
                .iter()
                .map(|i| i.price * Decimal::from(i.quantity.max(1)))
                .sum();
            *orders_by_status.entry(status_key.clone()).or_insert(0) += 1;
            *revenue_by_status.entry(status_key).or_insert(Decimal::ZERO) += revenue;
            total_revenue += revenue;
        }

        let created_by = row.user_id;
        let user_name = self.user_name(row.user_id).await?;
        Ok(FullReportResponse {
            report: DailyReportResponse::from_model(row, user_name, true),
            report_metadata: ReportMetadata {
                total_orders: order_responses.len(),
                total_revenue,
                orders_by_status,
                revenue_by_status,
                created_by,
                last_modified: Utc::now(),
            },
            orders: order_responses,
        })
    }

    /// Persists a client-computed snapshot verbatim, plus the two scalar
    /// aggregates. The values are trusted as-is; this endpoint does not
    /// recompute them from order state. The row must already exist.
    #[instrument(skip(self, request))]
    pub async fn save_full(
        &self,
        auth: &AuthUser,
        request: SaveFullReportRequest,
    ) -> Result<(), ServiceError> {
        let target_user_id = self.resolve_target(auth, request.user_id)?;

        let existing = DailyReportEntity::find()
            .filter(daily_report::Column::ReportDate.eq(request.report_date))
            .filter(daily_report::Column::UserId.eq(target_user_id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(
                    "Report not found. Reports are opened by logging in on the report date."
                        .to_string(),
                )
            })?;

        let metadata = request.report_metadata.as_ref();
        let snapshot = serde_json::json!({ "orders": request.orders.unwrap_or(Value::Null) });

        let mut active: daily_report::ActiveModel = existing.into();
        active.orders_count = Set(metadata.and_then(|m| m.total_orders).unwrap_or(0));
        active.total_revenue = Set(metadata.and_then(|m| m.total_revenue).unwrap_or_default());
        active.snapshot_json = Set(Some(snapshot.to_string()));
        active.updated_at = Set(Some(Utc::now()));
        active.update(&*self.db).await?;

        info!(%request.report_date, user_id = target_user_id, "full report saved");
        Ok(())
    }

    /// Resolves which user's report the caller is addressing. Targeting
    /// another user requires the admin role.
    fn resolve_target(
        &self,
        auth: &AuthUser,
        requested: Option<i32>,
    ) -> Result<i32, ServiceError> {
        match requested {
            Some(user_id) if user_id != auth.id && !auth.is_admin() => Err(
                ServiceError::Forbidden("Only admins may access other users' reports".to_string()),
            ),
            Some(user_id) => Ok(user_id),
            None => Ok(auth.id),
        }
    }

    async fn user_name(&self, user_id: i32) -> Result<Option<String>, ServiceError> {
        Ok(UserEntity::find_by_id(user_id)
            .one(&*self.db)
            .await?
            .map(|u| u.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> AuthUser {
        AuthUser {
            id: 1,
            name: "Admin".into(),
            role: "admin".into(),
        }
    }

    fn manager() -> AuthUser {
        AuthUser {
            id: 2,
            name: "Manager".into(),
            role: "manager".into(),
        }
    }

    fn service() -> DailyReportService {
        DailyReportService::new(Arc::new(sea_orm::DatabaseConnection::Disconnected))
    }

    #[test]
    fn self_targeting_is_always_allowed() {
        assert_eq!(service().resolve_target(&manager(), None).unwrap(), 2);
        assert_eq!(service().resolve_target(&manager(), Some(2)).unwrap(), 2);
    }

    #[test]
    fn cross_user_targeting_is_admin_only() {
        assert!(service().resolve_target(&manager(), Some(9)).is_err());
        assert_eq!(service().resolve_target(&admin(), Some(9)).unwrap(), 9);
    }
}
