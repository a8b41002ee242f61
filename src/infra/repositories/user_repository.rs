//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::config::ROLE_USER;
use crate::domain::{NewUser, ProfileUpdate, User};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Create a new customer account
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    /// Overwrite name, email and phone. `NotFound` for an unknown ID.
    async fn update_profile(&self, id: Uuid, changes: ProfileUpdate) -> AppResult<User>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            name: Set(new_user.name),
            role: Set(ROLE_USER.to_string()),
            phone: Set(new_user.phone),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(User::from(model))
    }
    async fn update_profile(&self, id: Uuid, changes: ProfileUpdate) -> AppResult<User> {
        let mut active_model: ActiveModel = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found()?
            .into();

        active_model.name = Set(changes.name);
        active_model.email = Set(changes.email);
        active_model.phone = Set(changes.phone);
        active_model.updated_at = Set(chrono::Utc::now());

        let model = active_model.update(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict("Email"),
            _ => AppError::from(e),
        })?;
        Ok(User::from(model))
    }
}
