//! Order history and account profile.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    MembershipLevel, OrderDetail, OrderSummary, ProfileUpdate, StatusCounts, StatusFilter,
    UserProfile,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

use super::parallel;

#[async_trait]
pub trait OrderService: Send + Sync {
    /// The user's orders, newest first
    async fn list_orders(&self, user_id: Uuid, filter: StatusFilter) -> AppResult<Vec<OrderSummary>>;

    /// One of the user's orders; someone else's order is `NotFound`
    async fn get_order(&self, user_id: Uuid, order_id: Uuid) -> AppResult<OrderDetail>;

    async fn status_counts(&self, user_id: Uuid) -> AppResult<StatusCounts>;

    /// Account page with purchase statistics and membership tier
    async fn profile(&self, user_id: Uuid) -> AppResult<UserProfile>;

    /// Change name, email and phone, then return the refreshed account page.
    /// `Conflict` when the email belongs to another account.
    async fn update_profile(&self, user_id: Uuid, changes: ProfileUpdate) -> AppResult<UserProfile>;
}

pub struct OrderManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> OrderManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> OrderService for OrderManager<U> {
    async fn list_orders(&self, user_id: Uuid, filter: StatusFilter) -> AppResult<Vec<OrderSummary>> {
        self.uow.orders().list_for_user(user_id, filter.status()).await
    }

    async fn get_order(&self, user_id: Uuid, order_id: Uuid) -> AppResult<OrderDetail> {
        self.uow
            .orders()
            .find_detail(user_id, order_id)
            .await?
            .ok_or_not_found()
    }

    async fn status_counts(&self, user_id: Uuid) -> AppResult<StatusCounts> {
        self.uow.orders().status_counts(user_id).await
    }

    async fn profile(&self, user_id: Uuid) -> AppResult<UserProfile> {
        let user = self.uow.users().find_by_id(user_id).await?.ok_or_not_found()?;
        let orders = self.uow.orders();
        let (total_orders, total_spent) = parallel::join2(
            orders.count_for_user(user_id),
            orders.total_spent(user_id),
        )
        .await?;

        Ok(UserProfile {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role.to_string(),
            joined_at: user.created_at,
            total_orders,
            total_spent,
            membership_level: MembershipLevel::for_total_spent(total_spent),
        })
    }
    async fn update_profile(&self, user_id: Uuid, changes: ProfileUpdate) -> AppResult<UserProfile> {
        let users = self.uow.users();
        if let Some(owner) = users.find_by_email(&changes.email).await? {
            if owner.id != user_id {
                tracing::warn!(%user_id, "Profile update rejected: email in use");
                return Err(AppError::conflict("Email"));
            }
        }

        users.update_profile(user_id, changes).await?;
        tracing::info!(%user_id, "Profile updated");
        self.profile(user_id).await
    }
}
