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

//! Utilities to help testing services that integrate with the `authn` features.

use crate::model::{AccessToken, EmailAddress, Password};
use crate::rest::LoginResponse;
use axum::Router;
use rentdesk_core::rest::testutils::OneShotBuilder;
use serde_json::json;

#[cfg(test)]
use {
    crate::driver::AuthnDriver, crate::driver::testutils::TestContext as DriverTestContext,
    crate::model::User, crate::rest::app,
};

/// Logs the user identified by `email` in with `password` and returns its access token.
///
/// The `app` is a REST router serving the `authn` interface under the `base` prefix.
pub async fn do_test_login(
    app: Router,
    base: &str,
    email: &EmailAddress,
    password: &Password,
) -> AccessToken {
    let request = json!({"email": email.as_str(), "password": password.as_str()});
    let response = OneShotBuilder::new(app, (http::Method::POST, format!("{}/auth", base)))
        .send_json(request)
        .await
        .expect_json::<LoginResponse>()
        .await;
    response.token
}

/// State of a running test.
#[cfg(test)]
pub(crate) struct TestContext {
    /// Context of the underlying driver.
    inner: DriverTestContext,

    /// Router serving the `authn` interface under `/api`.
    app: Router,
}

#[cfg(test)]
impl TestContext {
    /// Initializes the REST app using an in-memory database and a settable clock.
    pub(crate) async fn setup() -> Self {
        let inner = DriverTestContext::setup().await;
        let app = Router::new().nest("/api", app(inner.driver()));
        Self { inner, app }
    }

    /// Gets a clone of the app router.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Returns a copy of the driver backing the app.
    pub(crate) fn driver(&self) -> AuthnDriver {
        self.inner.driver()
    }

    /// Creates a user by directly modifying the backing database.
    pub(crate) async fn create_user(
        &self,
        email: &'static str,
        password: &'static str,
        is_admin: bool,
    ) -> User {
        self.inner.create_user(email, password, is_admin).await
    }
}
