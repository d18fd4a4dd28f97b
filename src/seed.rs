//! First-run seeding: default accounts, the order status catalog, the
//! preset price list, stock materials with recipes, printers and the
//! flyers pricing tiers. Every section is skipped when its table already
//! has rows, so restarts are safe.

use crate::{
    auth::{generate_api_token, hash_password},
    entities::{
        material, order_status, preset_category, preset_extra, preset_item, pricing_flyers_tier,
        printer, product_material, user,
    },
    errors::ServiceError,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use tracing::info;

pub async fn seed_if_empty(db: &DatabaseConnection) -> Result<(), ServiceError> {
    seed_users(db).await?;
    seed_order_statuses(db).await?;
    seed_presets(db).await?;
    seed_materials(db).await?;
    seed_printers(db).await?;
    seed_pricing_tiers(db).await?;
    Ok(())
}

async fn seed_users(db: &DatabaseConnection) -> Result<(), ServiceError> {
    if user::Entity::find().count(db).await? > 0 {
        return Ok(());
    }
    info!("seeding users");

    let accounts = [
        ("Administrator", "admin@printshop.local", "admin123", "admin"),
        ("Manager 1", "m1@printshop.local", "manager123", "manager"),
        ("Manager 2", "m2@printshop.local", "manager123", "manager"),
    ];
    for (name, email, password, role) in accounts {
        user::ActiveModel {
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            phone: Set(None),
            password_hash: Set(hash_password(password)),
            api_token: Set(generate_api_token()),
            role: Set(role.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

async fn seed_order_statuses(db: &DatabaseConnection) -> Result<(), ServiceError> {
    if order_status::Entity::find().count(db).await? > 0 {
        return Ok(());
    }
    info!("seeding order statuses");

    let statuses = [
        ("New", "#1976d2"),
        ("In progress", "#ef6c00"),
        ("Ready", "#43a047"),
        ("Issued", "#6d4c41"),
        ("Cancelled", "#9e9e9e"),
    ];
    for (sort_order, (name, color)) in statuses.into_iter().enumerate() {
        order_status::ActiveModel {
            name: Set(name.to_string()),
            color: Set(Some(color.to_string())),
            sort_order: Set(sort_order as i32 + 1),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

struct PresetSeed<'a> {
    category: &'a str,
    color: &'a str,
    items: &'a [(&'a str, Decimal)],
    extras: &'a [(&'a str, Decimal, &'a str)],
}

async fn seed_presets(db: &DatabaseConnection) -> Result<(), ServiceError> {
    if preset_category::Entity::find().count(db).await? > 0 {
        return Ok(());
    }
    info!("seeding print shop presets");

    let presets: &[PresetSeed] = &[
        PresetSeed {
            category: "Business cards",
            color: "#1976d2",
            items: &[
                ("Business cards 90x50, single-sided", dec!(30)),
                ("Business cards 90x50, double-sided", dec!(40)),
            ],
            extras: &[
                ("Matte lamination", dec!(10), "checkbox"),
                ("Glossy lamination", dec!(10), "checkbox"),
            ],
        },
        PresetSeed {
            category: "Flyers",
            color: "#43a047",
            items: &[
                ("Flyers A6, 4+0", dec!(25)),
                ("Flyers A5, 4+0", dec!(35)),
                ("Flyers A4, 4+0", dec!(55)),
            ],
            extras: &[],
        },
        PresetSeed {
            category: "Booklets",
            color: "#ef6c00",
            items: &[
                ("Booklet A4, 2 folds (euro)", dec!(80)),
                ("Booklet A3, 1 fold", dec!(95)),
            ],
            extras: &[],
        },
        PresetSeed {
            category: "Posters",
            color: "#6d4c41",
            items: &[
                ("Poster A3", dec!(15)),
                ("Poster A2", dec!(25)),
                ("Poster A1", dec!(45)),
            ],
            extras: &[],
        },
        PresetSeed {
            category: "Stickers",
            color: "#8e24aa",
            items: &[
                ("Die-cut stickers, small format", dec!(20)),
                ("Sheet stickers A4", dec!(12)),
            ],
            extras: &[],
        },
        PresetSeed {
            category: "Banners",
            color: "#0097a7",
            items: &[("Banner 1x1 m", dec!(30)), ("Banner 2x1 m", dec!(50))],
            extras: &[("Eyelets", dec!(10), "checkbox")],
        },
        PresetSeed {
            category: "Calendars",
            color: "#c2185b",
            items: &[
                ("Wall calendar (flip)", dec!(60)),
                ("Desk calendar", dec!(25)),
            ],
            extras: &[],
        },
    ];

    for preset in presets {
        let category = preset_category::ActiveModel {
            category: Set(preset.category.to_string()),
            color: Set(preset.color.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        for (description, price) in preset.items {
            preset_item::ActiveModel {
                category_id: Set(category.id),
                description: Set(description.to_string()),
                price: Set(*price),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
        for (name, price, extra_type) in preset.extras {
            preset_extra::ActiveModel {
                category_id: Set(category.id),
                name: Set(name.to_string()),
                price: Set(*price),
                extra_type: Set(extra_type.to_string()),
                unit: Set(None),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
    }
    Ok(())
}

async fn seed_materials(db: &DatabaseConnection) -> Result<(), ServiceError> {
    if material::Entity::find().count(db).await? > 0 {
        return Ok(());
    }
    info!("seeding materials and flyer recipes");

    let materials = [
        ("Coated paper 130 g/m2, SRA3", "sheet", 5000.0, Some(500.0)),
        ("Coated paper 150 g/m2, SRA3", "sheet", 3000.0, Some(300.0)),
        ("Matte lamination film 35 um, SRA3", "sheet", 1000.0, Some(100.0)),
        ("Glossy lamination film 35 um, SRA3", "sheet", 1000.0, Some(100.0)),
        ("Banner fabric 440 g/m2", "m2", 200.0, Some(20.0)),
    ];
    let mut ids = Vec::new();
    for (name, unit, quantity, min_quantity) in materials {
        let inserted = material::ActiveModel {
            name: Set(name.to_string()),
            unit: Set(unit.to_string()),
            quantity: Set(quantity),
            min_quantity: Set(min_quantity),
            sheet_price_single: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await?;
        ids.push(inserted.id);
    }

    // Default flyer recipes against the 130 g/m2 paper, including the 2%
    // setup waste.
    let paper_130 = ids[0];
    let recipes = [
        ("Flyers A6, 4+0", 1.0 / 8.0 * 1.02),
        ("Flyers A5, 4+0", 1.0 / 4.0 * 1.02),
        ("Flyers A4, 4+0", 1.0 / 2.0 * 1.02),
    ];
    for (description, qty_per_item) in recipes {
        product_material::ActiveModel {
            preset_category: Set("Flyers".to_string()),
            preset_description: Set(description.to_string()),
            material_id: Set(paper_130),
            qty_per_item: Set(qty_per_item),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

async fn seed_printers(db: &DatabaseConnection) -> Result<(), ServiceError> {
    if printer::Entity::find().count(db).await? > 0 {
        return Ok(());
    }
    info!("seeding printers");

    for (code, name) in [("C3080", "Konica Minolta C3080"), ("V180", "Xerox Versant 180")] {
        printer::ActiveModel {
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

async fn seed_pricing_tiers(db: &DatabaseConnection) -> Result<(), ServiceError> {
    if pricing_flyers_tier::Entity::find().count(db).await? > 0 {
        return Ok(());
    }
    info!("seeding flyers pricing tiers");

    // Per-sheet single-side base prices; rush carries the full rate, online
    // and promo are discounted, large runs step down.
    let price_types = [("rush", dec!(1.0)), ("online", dec!(0.86)), ("promo", dec!(0.55))];
    let densities = [(130, dec!(0.40)), (150, dec!(0.50))];
    let qty_steps = [(50, dec!(1.0)), (500, dec!(0.85)), (2000, dec!(0.7))];

    for format in ["A6", "A5", "A4"] {
        for (density, base) in densities {
            for (price_type, type_k) in price_types {
                for (min_qty, qty_k) in qty_steps {
                    pricing_flyers_tier::ActiveModel {
                        format: Set(format.to_string()),
                        price_type: Set(price_type.to_string()),
                        paper_density: Set(density),
                        min_qty: Set(min_qty),
                        sheet_price_single: Set((base * type_k * qty_k).round_dp(4)),
                        ..Default::default()
                    }
                    .insert(db)
                    .await?;
                }
            }
        }
    }
    Ok(())
}
