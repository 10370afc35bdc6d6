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

//! Extends the driver with the `login` method.

use crate::db;
use crate::driver::AuthnDriver;
use crate::model::{AccessToken, EmailAddress, Identity, Password};
use log::info;
use rentdesk_core::db::DbError;
use rentdesk_core::driver::{DriverError, DriverResult};

/// Message returned for any kind of credentials mismatch so that callers cannot tell
/// which email addresses are registered.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

impl AuthnDriver {
    /// Logs a user with `email` and `password` in and returns a fresh access token.
    pub async fn login(self, email: EmailAddress, password: Password) -> DriverResult<AccessToken> {
        let mut ex = self.db.ex().await?;

        let user = match db::get_user_by_email(&mut ex, &email).await {
            Ok(user) => user,
            Err(DbError::NotFound) => {
                return Err(DriverError::InvalidInput(INVALID_CREDENTIALS.to_owned()));
            }
            Err(e) => return Err(e.into()),
        };
        drop(ex);

        if !password.verify(user.password())? {
            return Err(DriverError::InvalidInput(INVALID_CREDENTIALS.to_owned()));
        }

        let token = self.issue_token(&Identity::new(*user.id(), user.is_admin()))?;
        info!("User {} logged in", user.id());
        Ok(token)
    }
}
