// Rentdesk
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! REST interface for the authentication features.

use crate::driver::AuthnDriver;
use axum::Router;

mod api_auth_post;
mod api_users_post;
mod httputils;
#[cfg(any(test, feature = "testutils"))]
pub mod testutils;

pub use api_auth_post::LoginResponse;
pub use api_users_post::UserResponse;
pub use httputils::{AUTH_TOKEN_HEADER, get_credential, require};

/// Creates the router for the authentication features.
pub fn app(driver: AuthnDriver) -> Router {
    use axum::routing::post;

    Router::new()
        .route("/auth", post(api_auth_post::handler))
        .route("/users", post(api_users_post::handler))
        .with_state(driver)
}

#[cfg(test)]
mod tests {
    use super::testutils::*;
    use crate::model::{EmailAddress, Password, Privilege};
    use http::{Method, StatusCode};
    use rentdesk_core::rest::testutils::OneShotBuilder;
    use serde_json::json;

    #[tokio::test]
    async fn test_e2e_login_flow() {
        let context = TestContext::setup().await;

        let user = context.create_user("clerk@example.com", "Clerk123", false).await;

        OneShotBuilder::new(context.app(), (Method::POST, "/api/auth"))
            .send_json(json!({"email": "clerk@example.com", "password": "clerk123"}))
            .await
            .expect_status(StatusCode::BAD_REQUEST)
            .expect_error("Invalid email or password")
            .await;

        let token1 = do_test_login(
            context.app(),
            "/api",
            &EmailAddress::from("clerk@example.com"),
            &Password::from("Clerk123"),
        )
        .await;
        let identity = context.driver().authenticate(Some(token1.as_str())).unwrap();
        assert_eq!(user.id(), identity.user_id());
        context.driver().authorize(&identity, Privilege::User).unwrap();
        context.driver().authorize(&identity, Privilege::Admin).unwrap_err();
    }
}
