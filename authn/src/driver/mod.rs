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

//! Business logic for user authentication.

use crate::model::{AccessToken, Claims, Identity, Privilege, UserId};
use derivative::Derivative;
use log::debug;
use rentdesk_core::clocks::Clock;
use rentdesk_core::db::Db;
use rentdesk_core::driver::{DriverError, DriverResult};
use rentdesk_core::env::{get_optional_var, get_required_var};
use std::sync::Arc;
use std::time::Duration;

mod login;
#[cfg(any(test, feature = "testutils"))]
pub mod testutils;
mod tokens;
pub use tokens::{JwtSigner, TokenSigner};
mod users;

/// Default value for the `TOKEN_MAX_AGE` setting when not specified.
const DEFAULT_TOKEN_MAX_AGE_SECONDS: u64 = 24 * 60 * 60;

/// Default value for the `TOKEN_MAX_SKEW` setting when not specified.
const DEFAULT_TOKEN_MAX_SKEW_SECONDS: u64 = 60 * 60;

/// Configuration options for the authentication driver.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
#[cfg_attr(test, derivative(PartialEq))]
pub struct AuthnOptions {
    /// Secret used to sign and verify access tokens.
    #[derivative(Debug = "ignore")]
    pub token_secret: String,

    /// The amount of time we consider tokens valid for.
    pub token_max_age: Duration,

    /// The amount of time we tolerate in clock skew when validating tokens.  We should never see
    /// this, except if we end up serving requests from different machines and their clocks aren't
    /// properly synchronized.
    pub token_max_skew: Duration,
}

impl AuthnOptions {
    /// Creates a new set of options with the given signing `token_secret` and default settings
    /// for everything else.
    pub fn new<S: Into<String>>(token_secret: S) -> Self {
        Self {
            token_secret: token_secret.into(),
            token_max_age: Duration::from_secs(DEFAULT_TOKEN_MAX_AGE_SECONDS),
            token_max_skew: Duration::from_secs(DEFAULT_TOKEN_MAX_SKEW_SECONDS),
        }
    }

    /// Creates a new set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use variables such as `<prefix>_TOKEN_SECRET`, `<prefix>_TOKEN_MAX_AGE` and
    /// `<prefix>_TOKEN_MAX_SKEW`.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        let token_secret = get_required_var::<String>(prefix, "TOKEN_SECRET")?;
        if token_secret.is_empty() {
            return Err(format!("{}_TOKEN_SECRET cannot be empty", prefix));
        }
        Ok(Self {
            token_secret,
            token_max_age: get_optional_var::<Duration>(prefix, "TOKEN_MAX_AGE")?
                .unwrap_or_else(|| Duration::from_secs(DEFAULT_TOKEN_MAX_AGE_SECONDS)),
            token_max_skew: get_optional_var::<Duration>(prefix, "TOKEN_MAX_SKEW")?
                .unwrap_or_else(|| Duration::from_secs(DEFAULT_TOKEN_MAX_SKEW_SECONDS)),
        })
    }
}

/// Business logic.
///
/// The public operations that touch the database are all "one shot" so they consume the driver
/// in an attempt to minimize the possibility of executing two operations.  Token checks are
/// purely computational and can be issued repeatedly on a borrowed driver.
#[derive(Derivative)]
#[derivative(Clone(bound = ""))]
pub struct AuthnDriver {
    /// The database that the driver uses for persistence.
    db: Arc<dyn Db + Send + Sync>,

    /// Clock instance to obtain the current time.
    clock: Arc<dyn Clock + Send + Sync>,

    /// Signer used to issue and verify access tokens.
    signer: Arc<dyn TokenSigner + Send + Sync>,

    /// Options for the authentication driver.
    opts: AuthnOptions,
}

impl AuthnDriver {
    /// Creates a new driver backed by the given dependencies.
    pub fn new(
        db: Arc<dyn Db + Send + Sync>,
        clock: Arc<dyn Clock + Send + Sync>,
        signer: Arc<dyn TokenSigner + Send + Sync>,
        opts: AuthnOptions,
    ) -> Self {
        Self { db, clock, signer, opts }
    }

    /// Issues a new access token for `identity`, valid from now until the configured maximum age.
    pub fn issue_token(&self, identity: &Identity) -> DriverResult<AccessToken> {
        let now = self.clock.now_utc().unix_timestamp();
        let max_age = i64::try_from(self.opts.token_max_age.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: identity.user_id().to_string(),
            is_admin: identity.is_admin(),
            iat: now,
            exp: now.saturating_add(max_age),
        };
        self.signer.issue(&claims)
    }

    /// Verifies the `raw` credential presented by a caller and returns who the caller is.
    ///
    /// The claims in the credential are only looked at once the signature has been verified.
    pub fn authenticate(&self, raw: Option<&str>) -> DriverResult<Identity> {
        let raw = match raw {
            Some(raw) if !raw.trim().is_empty() => raw.trim(),
            _ => {
                return Err(DriverError::Unauthenticated(
                    "Access denied; no token provided".to_owned(),
                ));
            }
        };

        let token = AccessToken::new(raw)
            .map_err(|_| DriverError::Unauthenticated("Invalid token".to_owned()))?;
        let claims = self.signer.verify(&token)?;

        let now = self.clock.now_utc().unix_timestamp();
        let max_skew = i64::try_from(self.opts.token_max_skew.as_secs()).unwrap_or(i64::MAX);
        let expired = claims.exp <= now;
        let skew = claims.iat > now.saturating_add(max_skew);
        if expired || skew {
            debug!(
                "Rejecting token for {}: iat={}, exp={}, now={}",
                claims.sub, claims.iat, claims.exp, now
            );
            return Err(DriverError::Unauthenticated(
                "Token expired; please log in again".to_owned(),
            ));
        }

        let user_id = UserId::parse(&claims.sub)
            .map_err(|_| DriverError::Unauthenticated("Invalid token".to_owned()))?;
        Ok(Identity::new(user_id, claims.is_admin))
    }

    /// Checks that an already-authenticated `identity` holds the `required` privilege.
    pub fn authorize(&self, identity: &Identity, required: Privilege) -> DriverResult<()> {
        if !identity.has(required) {
            return Err(DriverError::Unauthorized(
                "Access denied; administrator privileges required".to_owned(),
            ));
        }
        Ok(())
    }
}
