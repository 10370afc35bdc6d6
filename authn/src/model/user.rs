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

//! The `User` data type.

use crate::model::{EmailAddress, HashedPassword};
use rentdesk_core::model::{ModelError, ModelResult, validate_text};
use std::fmt;
use uuid::Uuid;

/// Minimum length of a user's name.
const MIN_NAME_LENGTH: usize = 5;

/// Maximum length of a user's name per the schema.
const MAX_NAME_LENGTH: usize = 50;

/// Unique identifier of a user.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct UserId(Uuid);

impl UserId {
    /// Generates a new random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier from its untrusted textual form.
    pub fn parse(s: &str) -> ModelResult<Self> {
        Uuid::parse_str(s).map(Self).map_err(|_| ModelError("Invalid user id".to_owned()))
    }

    /// Returns the raw UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Representation of a user's information.
#[derive(Debug, PartialEq)]
pub struct User {
    /// Unique identifier of the user.
    id: UserId,

    /// Display name of the user.
    name: String,

    /// Email of the user, used as the login name.
    email: EmailAddress,

    /// Hashed password.
    password: HashedPassword,

    /// Whether the user holds administrative privileges.
    is_admin: bool,
}

impl User {
    /// Creates a new user with the given fields.
    pub fn new<S: AsRef<str>>(
        id: UserId,
        name: S,
        email: EmailAddress,
        password: HashedPassword,
    ) -> ModelResult<Self> {
        let name = validate_text("Name", name.as_ref(), MAX_NAME_LENGTH)?;
        if name.chars().count() < MIN_NAME_LENGTH {
            return Err(ModelError("Name is too short".to_owned()));
        }
        Ok(Self { id, name, email, password, is_admin: false })
    }

    /// Modifies a user to set or clear its administrative privileges.
    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    /// Gets the user's identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Gets the user's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the user's email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Gets the user's password as a hash.
    pub fn password(&self) -> &HashedPassword {
        &self.password
    }

    /// Returns true if the user holds administrative privileges.
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_userid_parse_and_display() {
        let id = UserId::parse("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert_eq!("67e55044-10b1-426f-9247-bb680e5fe0c8", id.to_string());

        assert_eq!("Invalid user id", UserId::parse("12345").unwrap_err().0);
    }

    #[test]
    fn test_user_getters() {
        let id = UserId::generate();
        let user = User::new(
            id,
            " Jane Doe ",
            EmailAddress::from("jane@example.com"),
            HashedPassword::new("password-hash"),
        )
        .unwrap();
        assert_eq!(&id, user.id());
        assert_eq!("Jane Doe", user.name());
        assert_eq!(&EmailAddress::from("jane@example.com"), user.email());
        assert_eq!(&HashedPassword::new("password-hash"), user.password());
        assert!(!user.is_admin());

        let user = user.with_admin(true);
        assert!(user.is_admin());
    }

    #[test]
    fn test_user_invalid_name() {
        let err = User::new(
            UserId::generate(),
            "x".repeat(MAX_NAME_LENGTH + 1),
            EmailAddress::from("jane@example.com"),
            HashedPassword::new("password-hash"),
        )
        .unwrap_err();
        assert_eq!("Name is too long", err.0);

        let err = User::new(
            UserId::generate(),
            " Jane ",
            EmailAddress::from("jane@example.com"),
            HashedPassword::new("password-hash"),
        )
        .unwrap_err();
        assert_eq!("Name is too short", err.0);
    }
}
