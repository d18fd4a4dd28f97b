use crate::{
    auth::hash_password,
    entities::user::{self, Entity as UserEntity},
    errors::ServiceError,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub name: String,
    pub role: String,
    pub user_id: i32,
    /// The date whose daily report was opened by this login
    pub session_date: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserView {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub id: i32,
    pub name: String,
    pub role: String,
}

#[derive(Clone)]
pub struct UserService {
    db: Arc<DatabaseConnection>,
}

impl UserService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Resolves credentials to a user. The stored hash is the sha256 hex
    /// digest of the password.
    #[instrument(skip(self, request))]
    pub async fn authenticate(&self, request: &LoginRequest) -> Result<user::Model, ServiceError> {
        request.validate()?;

        let hashed = hash_password(&request.password);
        let user = UserEntity::find()
            .filter(user::Column::Email.eq(request.email.clone()))
            .filter(user::Column::PasswordHash.eq(hashed))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("Invalid credentials".to_string()))?;

        info!(user_id = user.id, "login succeeded");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<UserView>, ServiceError> {
        Ok(UserEntity::find()
            .order_by_asc(user::Column::Name)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|u| UserView {
                id: u.id,
                name: u.name,
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, user_id: i32) -> Result<MeResponse, ServiceError> {
        let user = UserEntity::find_by_id(user_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("Unknown user".to_string()))?;
        Ok(MeResponse {
            id: user.id,
            name: user.name,
            role: user.role,
        })
    }
}
