//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{
    MEMBERSHIP_DIAMOND_THRESHOLD, MEMBERSHIP_GOLD_THRESHOLD, MEMBERSHIP_PLATINUM_THRESHOLD,
    MEMBERSHIP_SILVER_THRESHOLD, ROLE_ADMIN, ROLE_USER,
};

/// User roles enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            ROLE_ADMIN => UserRole::Admin,
            _ => UserRole::User,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "{}", ROLE_ADMIN),
            UserRole::User => write!(f, "{}", ROLE_USER),
        }
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to create a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub phone: Option<String>,
}

/// Editable account fields. `new` trims every field, lowercases the email
/// and turns a blank phone into `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl ProfileUpdate {
    pub fn new(name: &str, email: &str, phone: Option<&str>) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_lowercase(),
            phone: phone.map(str::trim).filter(|p| !p.is_empty()).map(str::to_string),
        }
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    pub id: Uuid,
    /// User email address
    pub email: String,
    /// User display name
    pub name: String,
    /// User role
    pub role: String,
    /// Contact phone number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role.to_string(),
            phone: user.phone,
            created_at: user.created_at,
        }
    }
}

/// Loyalty tier derived from how much a customer has spent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum MembershipLevel {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

impl MembershipLevel {
    pub fn for_total_spent(total_spent: i64) -> Self {
        match total_spent {
            t if t >= MEMBERSHIP_DIAMOND_THRESHOLD => MembershipLevel::Diamond,
            t if t >= MEMBERSHIP_PLATINUM_THRESHOLD => MembershipLevel::Platinum,
            t if t >= MEMBERSHIP_GOLD_THRESHOLD => MembershipLevel::Gold,
            t if t >= MEMBERSHIP_SILVER_THRESHOLD => MembershipLevel::Silver,
            _ => MembershipLevel::Bronze,
        }
    }
}

/// Account page projection: the user plus purchase statistics
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    pub joined_at: DateTime<Utc>,
    pub total_orders: u64,
    /// Sum of non-cancelled order totals
    pub total_spent: i64,
    pub membership_level: MembershipLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing_defaults_to_user() {
        assert_eq!(UserRole::from("admin"), UserRole::Admin);
        assert_eq!(UserRole::from("Admin"), UserRole::Admin);
        assert_eq!(UserRole::from("User"), UserRole::User);
        assert_eq!(UserRole::from("whatever"), UserRole::User);
        assert_eq!(UserRole::Admin.to_string(), "admin");
    }

    #[test]
    fn test_profile_update_is_normalized() {
        let update = ProfileUpdate::new("  Le Van C ", " LeVanC@Example.COM", Some("  "));
        assert_eq!(update.name, "Le Van C");
        assert_eq!(update.email, "levanc@example.com");
        assert_eq!(update.phone, None);

        let update = ProfileUpdate::new("C", "c@example.com", Some(" 0912 "));
        assert_eq!(update.phone.as_deref(), Some("0912"));
    }

    #[test]
    fn test_membership_thresholds() {
        assert_eq!(MembershipLevel::for_total_spent(0), MembershipLevel::Bronze);
        assert_eq!(MembershipLevel::for_total_spent(499_999), MembershipLevel::Bronze);
        assert_eq!(MembershipLevel::for_total_spent(500_000), MembershipLevel::Silver);
        assert_eq!(MembershipLevel::for_total_spent(2_000_000), MembershipLevel::Gold);
        assert_eq!(MembershipLevel::for_total_spent(5_000_000), MembershipLevel::Platinum);
        assert_eq!(MembershipLevel::for_total_spent(10_000_000), MembershipLevel::Diamond);
    }
}
