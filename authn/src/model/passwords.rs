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

//! The `Password` and `HashedPassword` data types.

use rentdesk_core::model::{ModelError, ModelResult};
use serde::Deserialize;
use std::fmt;

/// Minimum length of a password.
const MIN_PASSWORD_LENGTH: usize = 5;

/// Maximum length of a password.
const MAX_PASSWORD_LENGTH: usize = 255;

/// Cost factor for bcrypt hashes.
const BCRYPT_COST: u32 = 10;

/// An opaque type to hold a password, protecting it from leaking into logs.
#[derive(Deserialize, PartialEq)]
#[serde(try_from = "String")]
#[cfg_attr(any(test, feature = "testutils"), derive(Clone))]
pub struct Password(String);

impl Password {
    /// Creates a new password from a literal string.
    pub fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();
        if s.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ModelError("Password is too short".to_owned()));
        }
        if s.chars().count() > MAX_PASSWORD_LENGTH {
            return Err(ModelError("Password is too long".to_owned()));
        }
        Ok(Password(s))
    }

    /// Returns a string view of the password.
    #[cfg(any(test, feature = "testutils"))]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hashes the password after validating that it is sufficiently complex via the `validator`
    /// hook.  Consumes the password because there is no context in which keeping the password
    /// alive once we have generated its hash is correct.
    pub fn validate_and_hash(
        self,
        validator: fn(&str) -> Option<&'static str>,
    ) -> ModelResult<HashedPassword> {
        if let Some(error) = validator(&self.0) {
            return Err(ModelError(format!("Weak password: {}", error)));
        }
        let hashed = bcrypt::hash(self.0, BCRYPT_COST)
            .map_err(|e| ModelError(format!("Password error: {}", e)))?;
        Ok(HashedPassword::new(hashed))
    }

    /// Verifies if this password matches a given `hash`.
    pub fn verify(self, hash: &HashedPassword) -> ModelResult<bool> {
        bcrypt::verify(self.0, hash.as_str())
            .map_err(|e| ModelError(format!("Password error: {}", e)))
    }
}

impl TryFrom<String> for Password {
    type Error = ModelError;

    fn try_from(value: String) -> ModelResult<Self> {
        Password::new(value)
    }
}

#[cfg(any(test, feature = "testutils"))]
impl From<&'static str> for Password {
    /// Creates a new password from a hardcoded string, which must be valid.
    fn from(s: &'static str) -> Self {
        Password::new(s).expect("Hardcoded passwords must be valid")
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("scrubbed password")
    }
}

/// Password validator that requires at least one lowercase letter, one uppercase letter and
/// three digits.
pub fn password_complexity(s: &str) -> Option<&'static str> {
    if !s.chars().any(|c| c.is_lowercase()) {
        return Some("Must contain at least one lowercase letter");
    }
    if !s.chars().any(|c| c.is_uppercase()) {
        return Some("Must contain at least one uppercase letter");
    }
    if s.chars().filter(|c| c.is_ascii_digit()).count() < 3 {
        return Some("Must contain at least three digits");
    }
    None
}

/// An opaque type to hold a hashed password, protecting it from leaking into logs.
#[derive(PartialEq)]
#[cfg_attr(any(test, feature = "testutils"), derive(Clone))]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Creates a new hashed password from a literal string.
    pub fn new<S: Into<String>>(s: S) -> Self {
        HashedPassword(s.into())
    }

    /// Returns a string view of the hash.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("scrubbed hash")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_ok() {
        assert_eq!(Password::from("foo12"), Password::new("foo12").unwrap());
        assert_eq!("bar12", Password::new("bar12").unwrap().as_str());
    }

    #[test]
    fn test_password_length() {
        assert_eq!("Password is too short", Password::new("abcd").unwrap_err().0);
        Password::new("x".repeat(MAX_PASSWORD_LENGTH)).unwrap();
        assert_eq!(
            "Password is too long",
            Password::new("x".repeat(MAX_PASSWORD_LENGTH + 1)).unwrap_err().0
        );
    }

    #[test]
    fn test_password_debug_is_scrubbed() {
        assert_eq!("scrubbed password", format!("{:?}", Password::from("Secret123")));
        assert_eq!("scrubbed hash", format!("{:?}", HashedPassword::new("$2b$10$abc")));
    }

    #[test]
    fn test_password_complexity() {
        assert_eq!(None, password_complexity("Abc123"));
        assert_eq!(
            Some("Must contain at least one lowercase letter"),
            password_complexity("ABC123")
        );
        assert_eq!(
            Some("Must contain at least one uppercase letter"),
            password_complexity("abc123")
        );
        assert_eq!(Some("Must contain at least three digits"), password_complexity("Abcde12"));
    }

    #[test]
    fn test_password_validate_and_hash() {
        let password = Password::from("abcde");
        password.clone().validate_and_hash(|_| None).unwrap();
        match password.validate_and_hash(password_complexity) {
            Err(e) => {
                assert_eq!("Weak password: Must contain at least one uppercase letter", e.0)
            }
            e => panic!("{:?}", e),
        }
    }

    #[test]
    fn test_password_hash_and_verify() {
        let password1 = Password::from("First123");
        let password2 = Password::from("Second456");
        let hash1 = password1.clone().validate_and_hash(password_complexity).unwrap();
        let hash2 = password2.clone().validate_and_hash(password_complexity).unwrap();

        assert!(hash1.as_str().starts_with("$2b$10$"));
        assert!(hash2.as_str().starts_with("$2b$10$"));
        assert!(hash1 != hash2);

        assert!(password1.clone().verify(&hash1).unwrap());
        assert!(!password2.clone().verify(&hash1).unwrap());
        assert!(!password1.verify(&hash2).unwrap());
        assert!(password2.verify(&hash2).unwrap());
    }
}
