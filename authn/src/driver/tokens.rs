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

//! Signing and verification of access tokens.

use crate::model::{AccessToken, Claims};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::warn;
use rentdesk_core::driver::{DriverError, DriverResult};

/// Issues and verifies signed access tokens.
pub trait TokenSigner {
    /// Signs `claims` and returns the encoded token.
    fn issue(&self, claims: &Claims) -> DriverResult<AccessToken>;

    /// Verifies the signature of `token` and returns its claims.
    ///
    /// This does not check the validity period of the token: that is up to the caller, which owns
    /// the clock.
    fn verify(&self, token: &AccessToken) -> DriverResult<Claims>;
}

/// Token signer that produces HS256 JSON Web Tokens with a shared secret.
pub struct JwtSigner {
    /// Key to sign new tokens with.
    encoding_key: EncodingKey,

    /// Key to verify presented tokens with.
    decoding_key: DecodingKey,

    /// Verification settings.
    validation: Validation,
}

impl JwtSigner {
    /// Creates a new signer backed by the shared `secret`.
    pub fn new<S: AsRef<[u8]>>(secret: S) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            validation,
        }
    }
}

impl TokenSigner for JwtSigner {
    fn issue(&self, claims: &Claims) -> DriverResult<AccessToken> {
        let raw = jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| DriverError::BackendError(format!("Failed to sign token: {}", e)))?;
        AccessToken::new(raw).map_err(|e| DriverError::BackendError(e.to_string()))
    }

    fn verify(&self, token: &AccessToken) -> DriverResult<Claims> {
        match jsonwebtoken::decode::<Claims>(token.as_str(), &self.decoding_key, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => {
                warn!("Rejecting access token: {}", e);
                Err(DriverError::Unauthenticated("Invalid token".to_owned()))
            }
        }
    }
}
