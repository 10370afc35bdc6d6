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

//! Test utilities for the business layer.

use crate::db;
use crate::driver::{Driver, RentalsOptions};
use crate::model::*;
use rentdesk_authn::model::{Identity, UserId};
use rentdesk_core::clocks::testutils::{SettableClock, utc_datetime};
use rentdesk_core::db::{Db, Executor};
use rust_decimal::Decimal;
use std::sync::Arc;
use time::{Duration, OffsetDateTime};

/// State of a running test.
pub(crate) struct TestContext {
    /// The database backing the driver.
    db: Arc<dyn Db + Send + Sync>,

    /// The clock used by the driver, which tests can adjust.
    pub(crate) clock: Arc<SettableClock>,

    /// The driver under test.
    driver: Driver,
}

impl TestContext {
    /// Initializes the driver using an in-memory database and a settable clock.
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> =
            Arc::new(rentdesk_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let clock = Arc::new(SettableClock::new(utc_datetime(2023, 10, 1, 12, 0, 0)));
        let driver = Driver::new(db.clone(), clock.clone(), RentalsOptions::default());
        Self { db, clock, driver }
    }

    /// Returns the database backing the driver.
    pub(crate) fn db(&self) -> Arc<dyn Db + Send + Sync> {
        self.db.clone()
    }

    /// Returns a direct executor against the database.
    pub(crate) async fn ex(&self) -> Executor {
        self.db.ex().await.unwrap()
    }

    /// Returns a copy of the driver for a single operation.
    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }

    /// Returns the identity of an administrator.
    pub(crate) fn admin(&self) -> Identity {
        Identity::new(UserId::generate(), true)
    }

    /// Returns the identity of a regular user.
    pub(crate) fn user(&self) -> Identity {
        Identity::new(UserId::generate(), false)
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
    /// returned one day later.
    pub(crate) async fn create_closed_rental(
        &self,
        customer_id: CustomerId,
        movie: &Movie,
        date_out: OffsetDateTime,
    ) -> Rental {
        let customer = CustomerSnapshot::new(customer_id, "Jack Sparrow", "1234567").unwrap();
        let rental = Rental::new(RentalId::generate(), customer, movie.snapshot(), date_out)
            .close(date_out + Duration::days(1), movie.daily_rate())
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
