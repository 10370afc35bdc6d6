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

//! The `AccessToken` data type.

use rentdesk_core::model::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of an access token.  Signed tokens carry a handful of claims only so anything
/// longer than this is garbage.
const MAX_TOKEN_LENGTH: usize = 4096;

/// An opaque type representing a user's access token.
///
/// Access tokens are signed JSON Web Tokens: three base64url-encoded segments separated by dots.
/// Holding an `AccessToken` does not imply that its signature is valid; it only means that the
/// token is well-formed enough to be handed to a verifier.
#[derive(Clone, Deserialize, Eq, PartialEq, Serialize)]
#[serde(into = "String", try_from = "String")]
pub struct AccessToken(String);

impl AccessToken {
    /// Creates a new access token from an untrusted string.
    pub fn new<S: Into<String>>(token: S) -> ModelResult<Self> {
        let token = token.into();
        if token.is_empty() || token.len() > MAX_TOKEN_LENGTH {
            return Err(ModelError("Invalid access token".to_owned()));
        }
        if token.split('.').count() != 3 {
            return Err(ModelError("Invalid access token".to_owned()));
        }
        for ch in token.chars() {
            if !(ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.') {
                return Err(ModelError("Invalid access token".to_owned()));
            }
        }
        Ok(Self(token))
    }

    /// Returns the string representation of the token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AccessToken {
    type Error = ModelError;

    fn try_from(value: String) -> ModelResult<Self> {
        AccessToken::new(value)
    }
}

impl From<AccessToken> for String {
    fn from(value: AccessToken) -> Self {
        value.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("scrubbed access token")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_test::{Token, assert_de_tokens_error, assert_tokens};

    #[test]
    fn test_accesstoken_ok() {
        let token = AccessToken::new("aGVhZGVy.Y2xhaW1z.c2ln-_0").unwrap();
        assert_eq!("aGVhZGVy.Y2xhaW1z.c2ln-_0", token.as_str());
    }

    #[test]
    fn test_accesstoken_errors() {
        AccessToken::new("").unwrap_err();
        AccessToken::new("no-dots").unwrap_err();
        AccessToken::new("a.b").unwrap_err();
        AccessToken::new("a.b.c.d").unwrap_err();
        AccessToken::new("a.b!.c").unwrap_err();
        AccessToken::new("a.b c.d").unwrap_err();
        AccessToken::new(format!("a.b.{}", "c".repeat(MAX_TOKEN_LENGTH))).unwrap_err();
    }

    #[test]
    fn test_accesstoken_debug_is_scrubbed() {
        let token = AccessToken::new("secret.secret.secret").unwrap();
        assert_eq!("scrubbed access token", format!("{:?}", token));
    }

    #[test]
    fn test_accesstoken_ser_de() {
        let token = AccessToken::new("a.b.c").unwrap();
        assert_tokens(&token, &[Token::String("a.b.c")]);

        assert_de_tokens_error::<AccessToken>(&[Token::String("a b")], "Invalid access token");
    }
}
