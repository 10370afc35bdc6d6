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

//! The `EmailAddress` data type.

use rentdesk_core::model::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};

/// Minimum length of email addresses.
const MIN_EMAIL_LENGTH: usize = 10;

/// Maximum length of email addresses per the schema.
pub(crate) const MAX_EMAIL_LENGTH: usize = 255;

/// Represents a correctly-formatted email address.
///
/// According to the standard, the local part of an email address may be case sensitive but the
/// domain part is case insensitive.  Email addresses are used as login names, so this treats them
/// as case sensitive overall and relies on users typing them consistently.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(into = "String", try_from = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a new email address from an untrusted string `s`, making sure it is valid.
    pub fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();

        if s.trim().is_empty() {
            return Err(ModelError("Email address cannot be empty".to_owned()));
        }
        if s.len() < MIN_EMAIL_LENGTH {
            return Err(ModelError("Email address is too short".to_owned()));
        }
        if s.len() > MAX_EMAIL_LENGTH {
            return Err(ModelError("Email address is too long".to_owned()));
        }

        // Email addresses can have many formats and attempting to validate them is futile.  We do
        // some tiny validation anyway to make sure we at least pass data around correctly.
        if !s.contains('@') || s.contains(' ') {
            return Err(ModelError(format!("Email does not look like a valid address '{}'", s)));
        }

        Ok(Self(s))
    }

    /// Creates a new email address from an untrusted string `s`, without validation.  Useful for
    /// testing purposes only.
    #[cfg(any(test, feature = "testutils"))]
    pub fn new_invalid<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    /// Returns a string view of the email address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = ModelError;

    fn try_from(value: String) -> ModelResult<Self> {
        EmailAddress::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

#[cfg(any(test, feature = "testutils"))]
impl From<&str> for EmailAddress {
    fn from(raw_email: &str) -> Self {
        Self::new(raw_email).expect("Hardcoded email addresses for testing must be valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_test::{Token, assert_de_tokens_error, assert_tokens};

    #[test]
    fn test_emailaddress_ok() {
        assert_eq!("simple@example.com", EmailAddress::new("simple@example.com").unwrap().as_str());
        assert_eq!("a!b@c.test", EmailAddress::new("a!b@c.test").unwrap().as_str());
    }

    #[test]
    fn test_emailaddress_error() {
        assert!(EmailAddress::new("").is_err());
        assert!(EmailAddress::new("a@b").is_err());
        assert_eq!(
            "Email address is too short",
            EmailAddress::new("a@b.test").unwrap_err().0
        );
        assert!(EmailAddress::new("foo-bar").is_err());
        assert!(EmailAddress::new("foo @example.com").is_err());

        let mut long_string = format!("a@{}", "b".repeat(MAX_EMAIL_LENGTH - 2));
        assert!(EmailAddress::new(&long_string).is_ok());
        long_string.push('x');
        assert!(EmailAddress::new(&long_string).is_err());
    }

    #[test]
    fn test_emailaddress_invalid() {
        assert!(EmailAddress::new(EmailAddress::new_invalid("a").as_str()).is_err());
    }

    #[test]
    fn test_emailaddress_case_sensitive() {
        assert_ne!(
            EmailAddress::new("foo@example.com").unwrap(),
            EmailAddress::new("Foo@example.com").unwrap()
        );
    }

    #[test]
    fn test_emailaddress_ser_de_ok() {
        let email = EmailAddress::new("HelloWorld@example.com").unwrap();
        assert_tokens(&email, &[Token::String("HelloWorld@example.com")]);
    }

    #[test]
    fn test_emailaddress_de_error() {
        assert_de_tokens_error::<EmailAddress>(
            &[Token::String("HelloWorld")],
            "Email does not look like a valid address 'HelloWorld'",
        );
    }
}
