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

//! REST interface for the rentals service.

use crate::driver::Driver;
use axum::Router;
use rentdesk_authn::driver::AuthnDriver;

mod returns_post;
#[cfg(test)]
mod testutils;

/// Creates the router for the whole service, with all APIs under `/api`.
pub fn app(driver: Driver, authn: AuthnDriver) -> Router {
    use axum::routing::post;

    let returns = Router::new()
        .route("/returns", post(returns_post::handler))
        .with_state((driver, authn.clone()));

    Router::new().nest("/api", returns.merge(rentdesk_authn::rest::app(authn)))
}
