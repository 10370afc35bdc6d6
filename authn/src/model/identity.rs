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

//! The `Identity`, `Privilege` and `Claims` data types.

use crate::model::UserId;
use serde::{Deserialize, Serialize};

/// Privilege levels that operations can require.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Privilege {
    /// Any authenticated user.
    User,

    /// Administrators only.
    Admin,
}

/// The authenticated caller of an operation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Identity {
    /// Identifier of the user.
    user_id: UserId,

    /// Whether the user holds administrative privileges.
    is_admin: bool,
}

impl Identity {
    /// Creates a new identity.
    pub fn new(user_id: UserId, is_admin: bool) -> Self {
        Self { user_id, is_admin }
    }

    /// Gets the identifier of the user.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns true if the user holds administrative privileges.
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Returns true if this identity satisfies `privilege`.
    pub fn has(&self, privilege: Privilege) -> bool {
        match privilege {
            Privilege::User => true,
            Privilege::Admin => self.is_admin,
        }
    }
}

/// Claims embedded in a signed access token.
///
/// Timestamps are seconds since the Unix epoch, as in any JSON Web Token.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Claims {
    /// Subject: the textual form of the user identifier.
    pub sub: String,

    /// Whether the subject holds administrative privileges.
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,

    /// Time at which the token was issued.
    pub iat: i64,

    /// Time at which the token stops being valid.
    pub exp: i64,
}
