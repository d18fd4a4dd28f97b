use crate::{
    entities::order::Entity as OrderEntity,
    entities::order_file::{self, Entity as OrderFileEntity},
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Per-order upload storage and the approval workflow. Files live on disk
/// under a server-generated name; metadata lives in order_files.
#[derive(Clone)]
pub struct FileService {
    db: Arc<DatabaseConnection>,
    uploads_dir: PathBuf,
}

impl FileService {
    pub fn new(db: Arc<DatabaseConnection>, uploads_dir: PathBuf) -> Self {
        Self { db, uploads_dir }
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    #[instrument(skip(self))]
    pub async fn list(&self, order_id: i32) -> Result<Vec<order_file::Model>, ServiceError> {
        Ok(OrderFileEntity::find()
            .filter(order_file::Column::OrderId.eq(order_id))
            .order_by_desc(order_file::Column::Id)
            .all(&*self.db)
            .await?)
    }

    /// Stores an uploaded file under a collision-resistant generated name
    /// and records its metadata.
    #[instrument(skip(self, bytes))]
    pub async fn save(
        &self,
        order_id: i32,
        original_name: Option<String>,
        mime: Option<String>,
        bytes: Vec<u8>,
    ) -> Result<order_file::Model, ServiceError> {
        OrderEntity::find_by_id(order_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))?;

        let extension = original_name
            .as_deref()
            .and_then(|n| Path::new(n).extension())
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();
        let filename = format!("{}{}", Uuid::new_v4(), extension);

        tokio::fs::create_dir_all(&self.uploads_dir).await?;
        let size = bytes.len() as i64;
        tokio::fs::write(self.uploads_dir.join(&filename), bytes).await?;

        let inserted = order_file::ActiveModel {
            order_id: Set(order_id),
            filename: Set(filename.clone()),
            original_name: Set(original_name),
            mime: Set(mime),
            size: Set(Some(size)),
            uploaded_at: Set(Utc::now()),
            approved: Set(false),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(order_id, file_id = inserted.id, %filename, "file stored");
        Ok(inserted)
    }

    /// Removes the row and best-effort unlinks the file on disk.
    /// Idempotent: deleting an absent file succeeds.
    #[instrument(skip(self))]
    pub async fn delete(&self, order_id: i32, file_id: i32) -> Result<(), ServiceError> {
        let row = OrderFileEntity::find()
            .filter(order_file::Column::Id.eq(file_id))
            .filter(order_file::Column::OrderId.eq(order_id))
            .one(&*self.db)
            .await?;

        if let Some(row) = row {
            let path = self.uploads_dir.join(&row.filename);
            if let Err(e) = tokio::fs::remove_file(&path).await {
                warn!(file = %path.display(), error = %e, "could not unlink uploaded file");
            }
            OrderFileEntity::delete_by_id(row.id).exec(&*self.db).await?;
        }
        Ok(())
    }

    /// Marks a file approved by the given user.
    #[instrument(skip(self))]
    pub async fn approve(
        &self,
        order_id: i32,
        file_id: i32,
        approved_by: i32,
    ) -> Result<order_file::Model, ServiceError> {
        let row = OrderFileEntity::find()
            .filter(order_file::Column::Id.eq(file_id))
            .filter(order_file::Column::OrderId.eq(order_id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("File not found".to_string()))?;

        let mut active: order_file::ActiveModel = row.into();
        active.approved = Set(true);
        active.approved_at = Set(Some(Utc::now()));
        active.approved_by = Set(Some(approved_by));
        Ok(active.update(&*self.db).await?)
    }
}
