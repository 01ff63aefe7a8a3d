// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::Json;

use crate::auth::Auth;
use crate::models::UserResponse;

/// Get the current authenticated user.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = UserResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn get_current_user(Auth(user): Auth) -> Json<UserResponse> {
    Json(user.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::repository::StoredUser;
    use chrono::Utc;

    #[tokio::test]
    async fn returns_the_extracted_user() {
        let user = StoredUser {
            id: "u-1".to_string(),
            email: "a@x.com".to_string(),
            username: "a#cc71348b".to_string(),
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            created_at: Utc::now(),
            last_login: Some(Utc::now()),
        };

        let Json(response) = get_current_user(Auth(user)).await;
        assert_eq!(response.id, "u-1");
        assert_eq!(response.username, "a#cc71348b");
    }
}
