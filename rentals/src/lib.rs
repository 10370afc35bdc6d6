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

//! Rental returns service.
//!
//! Clerks with administrator privileges close the open rental of a movie when a customer brings
//! it back, which computes the rental fee and puts the copy back in stock.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use log::info;
use rentdesk_authn::driver::{AuthnDriver, AuthnOptions, JwtSigner};
use rentdesk_core::clocks::SystemClock;
use rentdesk_core::db::Db;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

pub mod db;
pub mod driver;
use driver::{Driver, RentalsOptions};
pub mod model;
pub mod rest;

/// Instantiates all services on top of `db` and serves them on `bind_addr` until interrupted.
///
/// The database schemas are created if they do not exist yet.  The database is closed once the
/// server stops.
pub async fn serve(
    bind_addr: impl Into<SocketAddr>,
    db: Arc<dyn Db + Send + Sync>,
    authn_opts: AuthnOptions,
    rentals_opts: RentalsOptions,
) -> Result<(), Box<dyn Error>> {
    rentdesk_authn::db::init_schema(&mut db.ex().await?).await?;
    db::init_schema(&mut db.ex().await?).await?;

    let clock = Arc::new(SystemClock::default());
    let signer = Arc::new(JwtSigner::new(&authn_opts.token_secret));
    let authn = AuthnDriver::new(db.clone(), clock.clone(), signer, authn_opts);
    let driver = Driver::new(db.clone(), clock, rentals_opts);
    let app = rest::app(driver, authn);

    let bind_addr = bind_addr.into();
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Listening on {}", bind_addr);
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await;

    db.close().await;
    Ok(result?)
}
