use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_orders_tables::Migration),
            Box::new(m20240101_000003_create_materials_tables::Migration),
            Box::new(m20240101_000004_create_daily_reports_table::Migration),
            Box::new(m20240101_000005_create_presets_tables::Migration),
            Box::new(m20240101_000006_create_files_table::Migration),
            Box::new(m20240101_000007_create_printers_tables::Migration),
            Box::new(m20240101_000008_create_pricing_tiers_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_users_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Users::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Users::Name).string().not_null().unique_key())
                        .col(ColumnDef::new(Users::Email).string().not_null())
                        .col(ColumnDef::new(Users::Phone).string().null())
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(
                            ColumnDef::new(Users::ApiToken)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Users::Role)
                                .string()
                                .not_null()
                                .default("manager"),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_users_email")
                        .table(Users::Table)
                        .col(Users::Email)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Users {
        Table,
        Id,
        Name,
        Email,
        Phone,
        PasswordHash,
        ApiToken,
        Role,
    }
}

mod m20240101_000002_create_orders_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_orders_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Orders::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Orders::Number).string().null().unique_key())
                        .col(ColumnDef::new(Orders::Status).integer().not_null())
                        .col(
                            ColumnDef::new(Orders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Orders::CustomerName).string().null())
                        .col(ColumnDef::new(Orders::CustomerPhone).string().null())
                        .col(ColumnDef::new(Orders::CustomerEmail).string().null())
                        .col(
                            ColumnDef::new(Orders::PrepaymentAmount)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Orders::PrepaymentStatus).string().null())
                        .col(ColumnDef::new(Orders::PaymentUrl).string().null())
                        .col(ColumnDef::new(Orders::PaymentId).string().null())
                        .col(ColumnDef::new(Orders::UserId).integer().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Items::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Items::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Items::OrderId).integer().not_null())
                        .col(ColumnDef::new(Items::Type).string().not_null())
                        .col(ColumnDef::new(Items::Params).text().not_null())
                        .col(ColumnDef::new(Items::Price).decimal_len(12, 2).not_null())
                        .col(
                            ColumnDef::new(Items::Quantity)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(ColumnDef::new(Items::PrinterId).integer().null())
                        .col(ColumnDef::new(Items::Sides).integer().not_null().default(1))
                        .col(ColumnDef::new(Items::Sheets).integer().not_null().default(0))
                        .col(ColumnDef::new(Items::Waste).integer().not_null().default(0))
                        .col(ColumnDef::new(Items::Clicks).integer().not_null().default(0))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_items_order_id")
                                .from(Items::Table, Items::OrderId)
                                .to(Orders::Table, Orders::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(OrderStatuses::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrderStatuses::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(OrderStatuses::Name).string().not_null())
                        .col(ColumnDef::new(OrderStatuses::Color).string().null())
                        .col(
                            ColumnDef::new(OrderStatuses::SortOrder)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_items_order_id")
                        .table(Items::Table)
                        .col(Items::OrderId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_created_at")
                        .table(Orders::Table)
                        .col(Orders::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Items::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(OrderStatuses::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Orders {
        Table,
        Id,
        Number,
        Status,
        CreatedAt,
        CustomerName,
        CustomerPhone,
        CustomerEmail,
        PrepaymentAmount,
        PrepaymentStatus,
        PaymentUrl,
        PaymentId,
        UserId,
    }

    #[derive(DeriveIden)]
    pub(super) enum Items {
        Table,
        Id,
        OrderId,
        Type,
        Params,
        Price,
        Quantity,
        PrinterId,
        Sides,
        Sheets,
        Waste,
        Clicks,
    }

    #[derive(DeriveIden)]
    pub(super) enum OrderStatuses {
        Table,
        Id,
        Name,
        Color,
        SortOrder,
    }
}

mod m20240101_000003_create_materials_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_materials_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Materials::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Materials::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Materials::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Materials::Unit).string().not_null())
                        .col(
                            ColumnDef::new(Materials::Quantity)
                                .double()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Materials::MinQuantity).double().null())
                        .col(
                            ColumnDef::new(Materials::SheetPriceSingle)
                                .decimal_len(12, 2)
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(MaterialMoves::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MaterialMoves::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(MaterialMoves::MaterialId).integer().not_null())
                        .col(ColumnDef::new(MaterialMoves::Delta).double().not_null())
                        .col(ColumnDef::new(MaterialMoves::Reason).string().null())
                        .col(ColumnDef::new(MaterialMoves::OrderId).integer().null())
                        .col(ColumnDef::new(MaterialMoves::UserId).integer().null())
                        .col(
                            ColumnDef::new(MaterialMoves::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_material_moves_material_id")
                                .from(MaterialMoves::Table, MaterialMoves::MaterialId)
                                .to(Materials::Table, Materials::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ProductMaterials::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductMaterials::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ProductMaterials::PresetCategory)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductMaterials::PresetDescription)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductMaterials::MaterialId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductMaterials::QtyPerItem)
                                .double()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_materials_material_id")
                                .from(ProductMaterials::Table, ProductMaterials::MaterialId)
                                .to(Materials::Table, Materials::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_material_moves_material_id")
                        .table(MaterialMoves::Table)
                        .col(MaterialMoves::MaterialId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_material_moves_created_at")
                        .table(MaterialMoves::Table)
                        .col(MaterialMoves::CreatedAt)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_product_materials_preset")
                        .table(ProductMaterials::Table)
                        .col(ProductMaterials::PresetCategory)
                        .col(ProductMaterials::PresetDescription)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ProductMaterials::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(MaterialMoves::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Materials::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Materials {
        Table,
        Id,
        Name,
        Unit,
        Quantity,
        MinQuantity,
        SheetPriceSingle,
    }

    #[derive(DeriveIden)]
    pub(super) enum MaterialMoves {
        Table,
        Id,
        MaterialId,
        Delta,
        Reason,
        OrderId,
        UserId,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum ProductMaterials {
        Table,
        Id,
        PresetCategory,
        PresetDescription,
        MaterialId,
        QtyPerItem,
    }
}

mod m20240101_000004_create_daily_reports_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_daily_reports_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(DailyReports::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DailyReports::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(DailyReports::ReportDate).date().not_null())
                        .col(ColumnDef::new(DailyReports::UserId).integer().not_null())
                        .col(
                            ColumnDef::new(DailyReports::OrdersCount)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(DailyReports::TotalRevenue)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(DailyReports::CashActual)
                                .decimal_len(12, 2)
                                .null(),
                        )
                        .col(ColumnDef::new(DailyReports::SnapshotJson).text().null())
                        .col(
                            ColumnDef::new(DailyReports::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DailyReports::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            // One report per user per day
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_daily_reports_date_user")
                        .table(DailyReports::Table)
                        .col(DailyReports::ReportDate)
                        .col(DailyReports::UserId)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(DailyReports::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum DailyReports {
        Table,
        Id,
        ReportDate,
        UserId,
        OrdersCount,
        TotalRevenue,
        CashActual,
        SnapshotJson,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000005_create_presets_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_presets_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PresetCategories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PresetCategories::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(PresetCategories::Category)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(PresetCategories::Color).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PresetItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PresetItems::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(PresetItems::CategoryId).integer().not_null())
                        .col(ColumnDef::new(PresetItems::Description).string().not_null())
                        .col(
                            ColumnDef::new(PresetItems::Price)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_preset_items_category_id")
                                .from(PresetItems::Table, PresetItems::CategoryId)
                                .to(PresetCategories::Table, PresetCategories::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PresetExtras::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PresetExtras::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(PresetExtras::CategoryId).integer().not_null())
                        .col(ColumnDef::new(PresetExtras::Name).string().not_null())
                        .col(
                            ColumnDef::new(PresetExtras::Price)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(PresetExtras::Type).string().not_null())
                        .col(ColumnDef::new(PresetExtras::Unit).string().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_preset_extras_category_id")
                                .from(PresetExtras::Table, PresetExtras::CategoryId)
                                .to(PresetCategories::Table, PresetCategories::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // One catalog entry per (category, description)
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_preset_items_category_description")
                        .table(PresetItems::Table)
                        .col(PresetItems::CategoryId)
                        .col(PresetItems::Description)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PresetExtras::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PresetItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PresetCategories::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum PresetCategories {
        Table,
        Id,
        Category,
        Color,
    }

    #[derive(DeriveIden)]
    pub(super) enum PresetItems {
        Table,
        Id,
        CategoryId,
        Description,
        Price,
    }

    #[derive(DeriveIden)]
    pub(super) enum PresetExtras {
        Table,
        Id,
        CategoryId,
        Name,
        Price,
        Type,
        Unit,
    }
}

mod m20240101_000006_create_files_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_files_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(OrderFiles::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrderFiles::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(OrderFiles::OrderId).integer().not_null())
                        .col(ColumnDef::new(OrderFiles::Filename).string().not_null())
                        .col(ColumnDef::new(OrderFiles::OriginalName).string().null())
                        .col(ColumnDef::new(OrderFiles::Mime).string().null())
                        .col(ColumnDef::new(OrderFiles::Size).big_integer().null())
                        .col(
                            ColumnDef::new(OrderFiles::UploadedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(OrderFiles::Approved)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(OrderFiles::ApprovedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(OrderFiles::ApprovedBy).integer().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_files_order_id")
                                .from(OrderFiles::Table, OrderFiles::OrderId)
                                .to(
                                    super::m20240101_000002_create_orders_tables::Orders::Table,
                                    super::m20240101_000002_create_orders_tables::Orders::Id,
                                )
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_files_order_id")
                        .table(OrderFiles::Table)
                        .col(OrderFiles::OrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OrderFiles::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum OrderFiles {
        Table,
        Id,
        OrderId,
        Filename,
        OriginalName,
        Mime,
        Size,
        UploadedAt,
        Approved,
        ApprovedAt,
        ApprovedBy,
    }
}

mod m20240101_000007_create_printers_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000007_create_printers_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Printers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Printers::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Printers::Code)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Printers::Name).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PrinterCounters::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PrinterCounters::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(PrinterCounters::PrinterId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PrinterCounters::CounterDate)
                                .date()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PrinterCounters::Value)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PrinterCounters::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_printer_counters_printer_id")
                                .from(PrinterCounters::Table, PrinterCounters::PrinterId)
                                .to(Printers::Table, Printers::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // One reading per printer per day
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_printer_counters_printer_date")
                        .table(PrinterCounters::Table)
                        .col(PrinterCounters::PrinterId)
                        .col(PrinterCounters::CounterDate)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PrinterCounters::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Printers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Printers {
        Table,
        Id,
        Code,
        Name,
    }

    #[derive(DeriveIden)]
    pub(super) enum PrinterCounters {
        Table,
        Id,
        PrinterId,
        CounterDate,
        Value,
        CreatedAt,
    }
}

mod m20240101_000008_create_pricing_tiers_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000008_create_pricing_tiers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PricingFlyersTiers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PricingFlyersTiers::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(PricingFlyersTiers::Format)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PricingFlyersTiers::PriceType)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PricingFlyersTiers::PaperDensity)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PricingFlyersTiers::MinQty)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PricingFlyersTiers::SheetPriceSingle)
                                .decimal_len(12, 4)
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_pricing_flyers_tiers_lookup")
                        .table(PricingFlyersTiers::Table)
                        .col(PricingFlyersTiers::Format)
                        .col(PricingFlyersTiers::PriceType)
                        .col(PricingFlyersTiers::PaperDensity)
                        .col(PricingFlyersTiers::MinQty)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PricingFlyersTiers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum PricingFlyersTiers {
        Table,
        Id,
        Format,
        PriceType,
        PaperDensity,
        MinQty,
        SheetPriceSingle,
    }
}
