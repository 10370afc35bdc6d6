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

//! API to process the return of a rented movie.

use crate::driver::Driver;
use crate::model::ReturnRequest;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use rentdesk_authn::driver::AuthnDriver;
use rentdesk_authn::model::Privilege;
use rentdesk_authn::rest::require;
use rentdesk_core::rest::RestError;
use serde::{Deserialize, Serialize};

/// Message sent to the server to return a movie.
///
/// The identifiers are kept raw so that missing and malformed values can be reported
/// individually once the caller has been authenticated.
#[derive(Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReturnBody {
    /// Identifier of the customer returning the movie.
    pub(crate) customer_id: Option<String>,

    /// Identifier of the movie being returned.
    pub(crate) movie_id: Option<String>,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State((driver, authn)): State<(Driver, AuthnDriver)>,
    headers: HeaderMap,
    body: Result<Json<ReturnBody>, JsonRejection>,
) -> Result<impl IntoResponse, RestError> {
    let identity = require(&authn, &headers, Privilege::Admin)?;

    let Json(body) = body?;
    let request = ReturnRequest::new(body.customer_id.as_deref(), body.movie_id.as_deref())?;

    let rental = driver.process_return(&identity, request).await?;

    Ok(Json(rental))
}
