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

use crate::db;
use crate::driver::{AuthnDriver, AuthnOptions, JwtSigner};
use crate::model::{EmailAddress, Password, User, UserId, password_complexity};
use rentdesk_core::clocks::testutils::{SettableClock, utc_datetime};
use rentdesk_core::db::{Db, Executor};
use std::sync::Arc;

/// Secret used to sign tokens in tests.
pub const TEST_TOKEN_SECRET: &str = "test-token-secret";

/// State of a running test.
pub struct TestContext {
    /// The database backing the driver.
    db: Arc<dyn Db + Send + Sync>,

    /// The clock used by the driver, which tests can adjust.
    pub clock: Arc<SettableClock>,

    /// The driver to handle authentication flows.
    driver: AuthnDriver,
}

impl TestContext {
    /// Initializes the driver using an in-memory database and a settable clock.
    #[cfg(test)]
    pub(crate) async fn setup() -> Self {
        let db = Arc::new(rentdesk_core::db::sqlite::testutils::setup().await);
        let clock = Arc::new(SettableClock::new(utc_datetime(2023, 10, 1, 12, 0, 0)));
        Self::setup_with(db, clock).await
    }

    /// Initializes the test context using the given already-initialized objects.
    pub async fn setup_with(db: Arc<dyn Db + Send + Sync>, clock: Arc<SettableClock>) -> Self {
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let driver = AuthnDriver::new(
            db.clone(),
            clock.clone(),
            Arc::new(JwtSigner::new(TEST_TOKEN_SECRET)),
            AuthnOptions::new(TEST_TOKEN_SECRET),
        );
        Self { db, clock, driver }
    }

    /// Returns a direct executor against the database.
    pub async fn ex(&self) -> Executor {
        self.db.ex().await.unwrap()
    }

    /// Returns a copy of the driver for a single operation.
    pub fn driver(&self) -> AuthnDriver {
        self.driver.clone()
    }

    /// Syntactic sugar to create a user with the given credentials for testing purposes.
    pub async fn create_user(
        &self,
        email: &'static str,
        password: &'static str,
        is_admin: bool,
    ) -> User {
        let password = Password::from(password).validate_and_hash(password_complexity).unwrap();
        let user = User::new(UserId::generate(), "Test user", EmailAddress::from(email), password)
            .unwrap()
            .with_admin(is_admin);
        db::create_user(&mut self.ex().await, &user).await.unwrap();
        user
    }
}
