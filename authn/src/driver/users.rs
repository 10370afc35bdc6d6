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

//! Extends the driver with the `create_user` method.

use crate::db;
use crate::driver::AuthnDriver;
use crate::model::{EmailAddress, Password, User, UserId, password_complexity};
use log::info;
use rentdesk_core::db::DbError;
use rentdesk_core::driver::{DriverError, DriverResult};

impl AuthnDriver {
    /// Registers a new user with a `password` that must pass the complexity checks.
    pub async fn create_user(
        self,
        name: String,
        email: EmailAddress,
        password: Password,
        is_admin: bool,
    ) -> DriverResult<User> {
        let password = password.validate_and_hash(password_complexity)?;
        let user = User::new(UserId::generate(), name, email, password)?.with_admin(is_admin);

        let mut ex = self.db.ex().await?;
        match db::create_user(&mut ex, &user).await {
            Ok(()) => (),
            Err(DbError::AlreadyExists) => {
                return Err(DriverError::AlreadyExists("User already registered".to_owned()));
            }
            Err(e) => return Err(e.into()),
        }

        info!("Created user {}", user.id());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::testutils::*;

    #[tokio::test]
    async fn test_create_user_ok() {
        let context = TestContext::setup().await;

        let user = context
            .driver()
            .create_user(
                "Jane Doe".to_owned(),
                EmailAddress::from("jane@example.com"),
                Password::from("Jane1234"),
                true,
            )
            .await
            .unwrap();

        let stored =
            db::get_user_by_email(&mut context.ex().await, &EmailAddress::from("jane@example.com"))
                .await
                .unwrap();
        assert_eq!(user, stored);
        assert!(stored.is_admin());
        assert!(Password::from("Jane1234").verify(stored.password()).unwrap());
    }

    #[tokio::test]
    async fn test_create_user_weak_password() {
        let context = TestContext::setup().await;

        match context
            .driver()
            .create_user(
                "Jane Doe".to_owned(),
                EmailAddress::from("jane@example.com"),
                Password::from("jane1234"),
                false,
            )
            .await
        {
            Err(DriverError::InvalidInput(msg)) => assert!(msg.contains("Weak password")),
            e => panic!("{:?}", e),
        }
    }

    #[tokio::test]
    async fn test_create_user_duplicate() {
        let context = TestContext::setup().await;

        context.create_user("jane@example.com", "Jane1234", false).await;

        match context
            .driver()
            .create_user(
                "Other Jane".to_owned(),
                EmailAddress::from("jane@example.com"),
                Password::from("Other1234"),
                false,
            )
            .await
        {
            Err(DriverError::AlreadyExists(msg)) => assert!(msg.contains("already registered")),
            e => panic!("{:?}", e),
        }
    }
}
