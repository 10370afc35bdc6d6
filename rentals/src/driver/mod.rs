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

//! Business logic for the rentals service.

use rentdesk_core::clocks::Clock;
use rentdesk_core::db::Db;
use rentdesk_core::env::get_optional_var;
use std::sync::Arc;

mod fees;
pub use fees::compute_fee;
mod inventory;
mod lookup;
mod returns;
#[cfg(test)]
pub(crate) mod testutils;

/// Default value for the `MAX_COMMIT_RETRIES` setting when not specified.
const DEFAULT_MAX_COMMIT_RETRIES: u16 = 5;

/// Configuration options for the rentals driver.
#[derive(Clone, Debug, PartialEq)]
pub struct RentalsOptions {
    /// Maximum number of times to retry a unit of work when the database reports itself as
    /// unavailable.
    pub max_commit_retries: u16,
}

impl Default for RentalsOptions {
    fn default() -> Self {
        Self { max_commit_retries: DEFAULT_MAX_COMMIT_RETRIES }
    }
}

impl RentalsOptions {
    /// Creates a new set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use variables such as `<prefix>_MAX_COMMIT_RETRIES`.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        Ok(Self {
            max_commit_retries: get_optional_var::<u16>(prefix, "MAX_COMMIT_RETRIES")?
                .unwrap_or(DEFAULT_MAX_COMMIT_RETRIES),
        })
    }
}

/// Business logic.
///
/// The public operations exposed by the driver are all "one shot": they start and commit a
/// transaction, so it's incorrect for the caller to use two separate calls.  For this reason,
/// these operations consume the driver in an attempt to minimize the possibility of executing
/// two operations.
#[derive(Clone)]
pub struct Driver {
    /// The database that the driver uses for persistence.
    db: Arc<dyn Db + Send + Sync>,

    /// Clock instance to obtain the current time.
    clock: Arc<dyn Clock + Send + Sync>,

    /// Options for the rentals driver.
    opts: RentalsOptions,
}

impl Driver {
    /// Creates a new driver backed by the given injected components.
    pub fn new(
        db: Arc<dyn Db + Send + Sync>,
        clock: Arc<dyn Clock + Send + Sync>,
        opts: RentalsOptions,
    ) -> Self {
        Self { db, clock, opts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_env_default() {
        temp_env::with_var_unset("RENTALS_MAX_COMMIT_RETRIES", || {
            assert_eq!(RentalsOptions::default(), RentalsOptions::from_env("RENTALS").unwrap());
        });
    }

    #[test]
    fn test_options_from_env_present() {
        temp_env::with_var("RENTALS_MAX_COMMIT_RETRIES", Some("12"), || {
            assert_eq!(
                RentalsOptions { max_commit_retries: 12 },
                RentalsOptions::from_env("RENTALS").unwrap()
            );
        });
    }

    #[test]
    fn test_options_from_env_invalid() {
        temp_env::with_var("RENTALS_MAX_COMMIT_RETRIES", Some("many"), || {
            let err = RentalsOptions::from_env("RENTALS").unwrap_err();
            assert!(err.contains("RENTALS_MAX_COMMIT_RETRIES"));
        });
    }
}
