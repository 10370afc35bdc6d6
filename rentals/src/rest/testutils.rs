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

//! Test utilities for the REST API.

use crate::db;
use crate::driver::{Driver, RentalsOptions};
use crate::model::*;
use crate::rest::app;
use axum::Router;
use rentdesk_authn::driver::AuthnDriver;
use rentdesk_authn::driver::testutils::TestContext as AuthnTestContext;
use rentdesk_authn::model::{Identity, User, UserId};
use rentdesk_core::clocks::Clock;
use rentdesk_core::clocks::testutils::{SettableClock, utc_datetime};
use rentdesk_core::db::{Db, Executor};
use rust_decimal::Decimal;
use std::sync::Arc;
use time::{Duration, OffsetDateTime};

/// State of a running test.
pub(crate) struct TestContext {
    /// The database backing the app.
    db: Arc<dyn Db + Send + Sync>,

    /// The clock used by the app, which tests can adjust.
    clock: Arc<SettableClock>,

    /// Context of the authentication layer, sharing the database and clock above.
    authn: AuthnTestContext,

    /// The app under test.
    app: Router,
}

impl TestContext {
    /// Initializes the REST app using an in-memory database and a settable clock.
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> =
            Arc::new(rentdesk_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let clock = Arc::new(SettableClock::new(utc_datetime(2023, 10, 1, 12, 0, 0)));

        let authn = AuthnTestContext::setup_with(db.clone(), clock.clone()).await;
        let driver = Driver::new(db.clone(), clock.clone(), RentalsOptions::default());
        let app = app(driver, authn.driver());

        Self { db, clock, authn, app }
    }

    /// Gets a clone of the app router.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Returns the authentication driver used by the app.
    pub(crate) fn authn(&self) -> AuthnDriver {
        self.authn.driver()
    }

    /// Returns the current time as seen by the app.
    pub(crate) fn now(&self) -> OffsetDateTime {
        self.clock.now_utc()
    }

    /// Returns a direct executor against the database.
    async fn ex(&self) -> Executor {
        self.db.ex().await.unwrap()
    }

    /// Issues a token for a user that does not exist in the database.
    fn issue_token(&self, is_admin: bool) -> String {
        let identity = Identity::new(UserId::generate(), is_admin);
        self.authn().issue_token(&identity).unwrap().as_str().to_owned()
    }

    /// Issues a token for an administrator that does not exist in the database.
    pub(crate) fn admin_token(&self) -> String {
        self.issue_token(true)
    }

    /// Issues a token for a regular user that does not exist in the database.
    pub(crate) fn user_token(&self) -> String {
        self.issue_token(false)
    }

    /// Creates a user that can log into the app.
    pub(crate) async fn create_user(
        &self,
        email: &'static str,
        password: &'static str,
        is_admin: bool,
    ) -> User {
        self.authn.create_user(email, password, is_admin).await
    }

    /// Creates a movie with a whole `daily_rate` and `stock` copies.
    pub(crate) async fn create_movie(&self, title: &str, daily_rate: i64, stock: u32) -> Movie {
        let movie =
            Movie::new(MovieId::generate(), title, Decimal::from(daily_rate), stock).unwrap();
        db::put_movie(&mut self.ex().await, &movie).await.unwrap();
        movie
    }

    /// Creates an open rental of `movie` by `customer_id` that started at `date_out`.
    pub(crate) async fn create_rental(
        &self,
        customer_id: CustomerId,
        movie: &Movie,
        date_out: OffsetDateTime,
    ) -> Rental {
        let customer = CustomerSnapshot::new(customer_id, "Jack Sparrow", "1234567").unwrap();
        let rental = Rental::new(RentalId::generate(), customer, movie.snapshot(), date_out);
        db::put_rental(&mut self.ex().await, &rental).await.unwrap();
        rental
    }

    /// Creates a rental of `movie` by `customer_id` that started at `date_out` and that was
    /// returned two days later.
    pub(crate) async fn create_closed_rental(
        &self,
        customer_id: CustomerId,
        movie: &Movie,
        date_out: OffsetDateTime,
    ) -> Rental {
        let customer = CustomerSnapshot::new(customer_id, "Jack Sparrow", "1234567").unwrap();
        let fee = movie.daily_rate() * Decimal::from(2);
        let rental = Rental::new(RentalId::generate(), customer, movie.snapshot(), date_out)
            .close(date_out + Duration::days(2), fee)
            .unwrap();
        db::put_rental(&mut self.ex().await, &rental).await.unwrap();
        rental
    }

    /// Gets the current state of a movie straight from the database.
    pub(crate) async fn get_movie(&self, id: &MovieId) -> Movie {
        db::get_movie(&mut self.ex().await, id).await.unwrap()
    }

    /// Gets the current state of a rental straight from the database.
    pub(crate) async fn get_rental(&self, id: &RentalId) -> Rental {
        db::get_rental(&mut self.ex().await, id).await.unwrap()
    }
}
