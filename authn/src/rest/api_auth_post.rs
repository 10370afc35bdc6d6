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

//! API to log an existing user in.

use crate::driver::AuthnDriver;
use crate::model::{AccessToken, EmailAddress, Password};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use rentdesk_core::rest::RestError;
use serde::{Deserialize, Serialize};

/// Message sent to the server to log a user in.
#[derive(Deserialize)]
pub(crate) struct LoginRequest {
    /// Email address the user registered with.
    email: EmailAddress,

    /// Password of the user.
    password: Password,
}

/// Message returned by the server after a successful login attempt.
#[derive(Debug, Deserialize, Serialize)]
pub struct LoginResponse {
    /// Access token for the user, to be sent back as a bearer credential.
    pub token: AccessToken,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<AuthnDriver>,
    request: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, RestError> {
    let Json(request) = request?;

    let token = driver.login(request.email, request.password).await?;

    Ok(Json(LoginResponse { token }))
}
