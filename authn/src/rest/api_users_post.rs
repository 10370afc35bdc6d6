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

//! API to register a new user.

use crate::driver::AuthnDriver;
use crate::model::{EmailAddress, Identity, Password};
use crate::rest::AUTH_TOKEN_HEADER;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use rentdesk_core::rest::RestError;
use serde::{Deserialize, Serialize};

/// Message sent to the server to register a user.
#[derive(Deserialize)]
pub(crate) struct UserRequest {
    /// Display name of the user.
    name: String,

    /// Email address to log in with.
    email: EmailAddress,

    /// Password to log in with, which must pass the complexity checks.
    password: Password,
}

/// Message returned by the server after registering a user.
///
/// The access token for the new user travels in the `x-auth-token` header.
#[derive(Debug, Deserialize, Serialize)]
pub struct UserResponse {
    /// Identifier assigned to the user.
    pub id: String,

    /// Display name of the user.
    pub name: String,

    /// Email address of the user.
    pub email: EmailAddress,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<AuthnDriver>,
    request: Result<Json<UserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, RestError> {
    let Json(request) = request?;

    let user =
        driver.clone().create_user(request.name, request.email, request.password, false).await?;
    let token = driver.issue_token(&Identity::new(*user.id(), user.is_admin()))?;

    let response = UserResponse {
        id: user.id().to_string(),
        name: user.name().to_owned(),
        email: user.email().clone(),
    };
    Ok(([(AUTH_TOKEN_HEADER, token.as_str().to_owned())], Json(response)))
}
