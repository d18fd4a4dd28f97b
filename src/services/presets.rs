use crate::{
    entities::material::{self, Entity as MaterialEntity},
    entities::preset_category::{self, Entity as PresetCategoryEntity},
    entities::preset_extra::{self, Entity as PresetExtraEntity},
    entities::preset_item::{self, Entity as PresetItemEntity},
    entities::product_material::{self, Entity as ProductMaterialEntity},
    errors::ServiceError,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct PresetItemView {
    pub description: String,
    pub price: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PresetExtraView {
    pub name: String,
    pub price: Decimal,
    #[serde(rename = "type")]
    pub extra_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PresetCategoryView {
    pub category: String,
    pub color: String,
    pub items: Vec<PresetItemView>,
    pub extras: Vec<PresetExtraView>,
}

/// Recipe row joined with the material's live stock, as the admin recipe
/// editor renders it.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecipeRow {
    #[serde(rename = "materialId")]
    pub material_id: i32,
    #[serde(rename = "qtyPerItem")]
    pub qty_per_item: f64,
    pub name: String,
    pub unit: String,
    pub quantity: f64,
    pub min_quantity: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeComponent {
    pub material_id: i32,
    pub qty_per_item: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetRecipeRequest {
    pub preset_category: String,
    pub preset_description: String,
    pub materials: Vec<RecipeComponent>,
}

/// Price catalog and per-item material recipes.
#[derive(Clone)]
pub struct PresetService {
    db: Arc<DatabaseConnection>,
}

impl PresetService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// The whole catalog: categories with their items and extras.
    #[instrument(skip(self))]
    pub async fn list_presets(&self) -> Result<Vec<PresetCategoryView>, ServiceError> {
        let db = &*self.db;

        let categories = PresetCategoryEntity::find()
            .order_by_asc(preset_category::Column::Category)
            .all(db)
            .await?;
        let items = PresetItemEntity::find().all(db).await?;
        let extras = PresetExtraEntity::find().all(db).await?;

        Ok(categories
            .into_iter()
            .map(|c| PresetCategoryView {
                items: items
                    .iter()
                    .filter(|i| i.category_id == c.id)
                    .map(|i| PresetItemView {
                        description: i.description.clone(),
                        price: i.price,
                    })
                    .collect(),
                extras: extras
                    .iter()
                    .filter(|e| e.category_id == c.id)
                    .map(|e| PresetExtraView {
                        name: e.name.clone(),
                        price: e.price,
                        extra_type: e.extra_type.clone(),
                        unit: e.unit.clone(),
                    })
                    .collect(),
                category: c.category,
                color: c.color,
            })
            .collect())
    }

    /// Recipe for one catalog entry, joined with material stock.
    #[instrument(skip(self))]
    pub async fn recipe(
        &self,
        category: &str,
        description: &str,
    ) -> Result<Vec<RecipeRow>, ServiceError> {
        let rows = ProductMaterialEntity::find()
            .filter(product_material::Column::PresetCategory.eq(category))
            .filter(product_material::Column::PresetDescription.eq(description))
            .all(&*self.db)
            .await?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            if let Some(mat) = MaterialEntity::find_by_id(row.material_id)
                .one(&*self.db)
                .await?
            {
                result.push(RecipeRow {
                    material_id: row.material_id,
                    qty_per_item: row.qty_per_item,
                    name: mat.name,
                    unit: mat.unit,
                    quantity: mat.quantity,
                    min_quantity: mat.min_quantity,
                });
            }
        }
        Ok(result)
    }

    /// Replaces the recipe for one catalog entry wholesale.
    #[instrument(skip(self, request))]
    pub async fn set_recipe(&self, request: SetRecipeRequest) -> Result<(), ServiceError> {
        for component in &request.materials {
            MaterialEntity::find_by_id(component.material_id)
                .one(&*self.db)
                .await?
                .ok_or_else(|| {
                    ServiceError::ValidationError(format!(
                        "unknown material {}",
                        component.material_id
                    ))
                })?;
        }

        let txn = self.db.begin().await?;

        ProductMaterialEntity::delete_many()
            .filter(product_material::Column::PresetCategory.eq(request.preset_category.clone()))
            .filter(
                product_material::Column::PresetDescription
                    .eq(request.preset_description.clone()),
            )
            .exec(&txn)
            .await?;

        for component in &request.materials {
            product_material::ActiveModel {
                preset_category: Set(request.preset_category.clone()),
                preset_description: Set(request.preset_description.clone()),
                material_id: Set(component.material_id),
                qty_per_item: Set(component.qty_per_item),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        info!(
            category = %request.preset_category,
            description = %request.preset_description,
            components = request.materials.len(),
            "recipe replaced"
        );
        Ok(())
    }

    /// Material id lookup by exact name; used by the calculators to map a
    /// paper choice onto a stock material.
    pub async fn material_id_by_name(&self, name: &str) -> Result<Option<i32>, ServiceError> {
        Ok(MaterialEntity::find()
            .filter(material::Column::Name.eq(name))
            .one(&*self.db)
            .await?
            .map(|m| m.id))
    }
}
