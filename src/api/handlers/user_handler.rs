//! Account handlers.

use axum::{
    extract::{Extension, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{ProfileUpdate, UserProfile};
use crate::errors::AppResult;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    #[schema(example = "Tran Thi B")]
    pub name: String,
    /// Must not belong to another account
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "buyer@example.com")]
    pub email: String,
    /// Blank clears the stored number
    #[validate(length(max = 20, message = "Phone number is too long"))]
    #[schema(example = "0901234567")]
    pub phone: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        ProfileUpdate::new(&req.name, &req.email, req.phone.as_deref())
    }
}

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_profile).put(update_profile))
}

/// Current user's profile with purchase statistics
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_profile(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<UserProfile>> {
    let profile = state.order_service.profile(current_user.id).await?;
    Ok(Json(profile))
}

/// Edit name, email and phone
#[utoipa::path(
    put,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Email used by another account")
    )
)]
pub async fn update_profile(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<UserProfile>> {
    let profile = state
        .order_service
        .update_profile(current_user.id, payload.into())
        .await?;
    Ok(Json(profile))
}
