pub mod auth;
pub mod calculators;
pub mod daily_reports;
pub mod files;
pub mod materials;
pub mod orders;
pub mod presets;
pub mod printers;
pub mod reports;
pub mod users;

use crate::services::{
    calculators::CalculatorService, daily_reports::DailyReportService, files::FileService,
    materials::MaterialService, order_items::OrderItemService, orders::OrderService,
    presets::PresetService, printers::PrinterService, reports::ReportService, users::UserService,
};
use sea_orm::DatabaseConnection;
use std::path::PathBuf;
use std::sync::Arc;

/// Aggregated services shared by the HTTP handlers through AppState.
#[derive(Clone)]
pub struct AppServices {
    pub orders: Arc<OrderService>,
    pub order_items: Arc<OrderItemService>,
    pub materials: Arc<MaterialService>,
    pub daily_reports: Arc<DailyReportService>,
    pub presets: Arc<PresetService>,
    pub files: Arc<FileService>,
    pub printers: Arc<PrinterService>,
    pub reports: Arc<ReportService>,
    pub calculators: Arc<CalculatorService>,
    pub users: Arc<UserService>,
}

impl AppServices {
    pub fn new(db: Arc<DatabaseConnection>, uploads_dir: PathBuf) -> Self {
        let presets = Arc::new(PresetService::new(db.clone()));
        Self {
            orders: Arc::new(OrderService::new(db.clone())),
            order_items: Arc::new(OrderItemService::new(db.clone())),
            materials: Arc::new(MaterialService::new(db.clone())),
            daily_reports: Arc::new(DailyReportService::new(db.clone())),
            files: Arc::new(FileService::new(db.clone(), uploads_dir)),
            printers: Arc::new(PrinterService::new(db.clone())),
            reports: Arc::new(ReportService::new(db.clone())),
            calculators: Arc::new(CalculatorService::new(db.clone(), presets.clone())),
            users: Arc::new(UserService::new(db)),
            presets,
        }
    }
}
