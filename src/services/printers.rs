use crate::{
    entities::printer::{self, Entity as PrinterEntity},
    entities::printer_counter::{self, Entity as PrinterCounterEntity},
    errors::ServiceError,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

/// One printer with its counter reading for a date and the latest earlier
/// reading, so the client can show the day's click delta.
#[derive(Debug, Serialize, ToSchema)]
pub struct PrinterCounterView {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub value: Option<i64>,
    pub prev_value: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitCounterRequest {
    pub counter_date: NaiveDate,
    pub value: i64,
}

#[derive(Clone)]
pub struct PrinterService {
    db: Arc<DatabaseConnection>,
}

impl PrinterService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<printer::Model>, ServiceError> {
        Ok(PrinterEntity::find()
            .order_by_asc(printer::Column::Name)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn counters_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<PrinterCounterView>, ServiceError> {
        let printers = self.list().await?;

        let mut views = Vec::with_capacity(printers.len());
        for p in printers {
            let current = PrinterCounterEntity::find()
                .filter(printer_counter::Column::PrinterId.eq(p.id))
                .filter(printer_counter::Column::CounterDate.eq(date))
                .one(&*self.db)
                .await?;
            let previous = PrinterCounterEntity::find()
                .filter(printer_counter::Column::PrinterId.eq(p.id))
                .filter(printer_counter::Column::CounterDate.lt(date))
                .order_by_desc(printer_counter::Column::CounterDate)
                .one(&*self.db)
                .await?;
            views.push(PrinterCounterView {
                id: p.id,
                code: p.code,
                name: p.name,
                value: current.map(|c| c.value),
                prev_value: previous.map(|c| c.value),
            });
        }
        Ok(views)
    }

    /// Upserts the (printer, date) counter reading.
    #[instrument(skip(self))]
    pub async fn submit_counter(
        &self,
        printer_id: i32,
        request: SubmitCounterRequest,
    ) -> Result<printer_counter::Model, ServiceError> {
        PrinterEntity::find_by_id(printer_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Printer not found".to_string()))?;

        let existing = PrinterCounterEntity::find()
            .filter(printer_counter::Column::PrinterId.eq(printer_id))
            .filter(printer_counter::Column::CounterDate.eq(request.counter_date))
            .one(&*self.db)
            .await?;

        let model = match existing {
            Some(row) => {
                let mut active: printer_counter::ActiveModel = row.into();
                active.value = Set(request.value);
                active.update(&*self.db).await?
            }
            None => {
                printer_counter::ActiveModel {
                    printer_id: Set(printer_id),
                    counter_date: Set(request.counter_date),
                    value: Set(request.value),
                    created_at: Set(Utc::now()),
                    ..Default::default()
                }
                .insert(&*self.db)
                .await?
            }
        };
        Ok(model)
    }
}
