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

//! Extends the driver with the `process_return` method.

use crate::db;
use crate::driver::Driver;
use crate::driver::fees::compute_fee;
use crate::driver::inventory::{movie_not_found, restock};
use crate::driver::lookup::{Resolution, resolve};
use crate::model::{Rental, ReturnRequest};
use log::{info, warn};
use rentdesk_authn::model::{Identity, Privilege};
use rentdesk_core::db::DbError;
use rentdesk_core::driver::{DriverError, DriverResult};
use rentdesk_core::model::ModelError;
use std::time::Duration;

/// Failure of a single attempt at processing a return.
#[derive(Debug)]
enum AttemptError {
    /// The database could not serve the attempt but a later one may succeed.
    Retriable,

    /// The attempt failed in a way that retrying will not fix.
    Fatal(DriverError),
}

impl From<DbError> for AttemptError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::Unavailable => AttemptError::Retriable,
            e => AttemptError::Fatal(e.into()),
        }
    }
}

impl From<DriverError> for AttemptError {
    fn from(e: DriverError) -> Self {
        AttemptError::Fatal(e)
    }
}

impl From<ModelError> for AttemptError {
    fn from(e: ModelError) -> Self {
        AttemptError::Fatal(e.into())
    }
}

/// Builds the error returned when the rental to close was already returned.
fn already_processed(rental: &Rental) -> AttemptError {
    AttemptError::Fatal(DriverError::AlreadyProcessed(format!(
        "Rental {} was already returned",
        rental.id()
    )))
}

impl Driver {
    /// Processes the return of the movie and customer pair described by `request` on behalf of
    /// the caller `identity`, which must hold administrative privileges.
    ///
    /// Closing the rental and putting the movie back in stock happen in a single transaction,
    /// which is retried from scratch while the database reports itself as unavailable.
    pub async fn process_return(
        self,
        identity: &Identity,
        request: ReturnRequest,
    ) -> DriverResult<Rental> {
        if !identity.has(Privilege::Admin) {
            return Err(DriverError::Unauthorized(
                "Access denied; administrator privileges required".to_owned(),
            ));
        }

        let mut retries = self.opts.max_commit_retries;
        let mut delay = Duration::from_millis(10 + u64::from(rand::random::<u16>() % 90));
        loop {
            match self.try_return(&request).await {
                Ok(rental) => {
                    info!(
                        "Customer {} returned movie {} from rental {}",
                        rental.customer().id(),
                        rental.movie().id(),
                        rental.id()
                    );
                    return Ok(rental);
                }
                Err(AttemptError::Retriable) if retries > 0 => {
                    retries -= 1;
                    warn!(
                        "Database is unavailable; retrying in {}ms with {} attempts left",
                        delay.as_millis(),
                        retries
                    );
                    self.clock.sleep(delay).await;
                    if delay < Duration::from_secs(1) {
                        delay += Duration::from_millis(u64::from(rand::random::<u16>() % 100));
                    }
                }
                Err(AttemptError::Retriable) => {
                    return Err(DriverError::BackendError(
                        "Database unavailable; please try again later".to_owned(),
                    ));
                }
                Err(AttemptError::Fatal(e)) => return Err(e),
            }
        }
    }

    /// Runs a single attempt at processing the return described by `request`.
    async fn try_return(&self, request: &ReturnRequest) -> Result<Rental, AttemptError> {
        let rental = {
            let mut ex = self.db.ex().await?;
            match resolve(&mut ex, request.customer_id(), request.movie_id()).await? {
                Resolution::Open(rental) => rental,
                Resolution::Closed(rental) => return Err(already_processed(&rental)),
                Resolution::Missing => {
                    return Err(AttemptError::Fatal(DriverError::NotFound(
                        "Rental not found".to_owned(),
                    )));
                }
            }
        };

        let now = self.clock.now_utc().max(rental.date_out());
        let fee = compute_fee(rental.date_out(), now, rental.movie().daily_rate())?;
        let rental = rental.close(now, fee)?;

        let mut tx = self.db.begin().await?;
        if !db::close_rental(tx.ex(), &rental).await? {
            warn!("Rental {} was returned concurrently by another request", rental.id());
            return Err(already_processed(&rental));
        }
        match restock(tx.ex(), rental.movie().id()).await {
            Ok(()) => (),
            Err(DbError::NotFound) => {
                return Err(AttemptError::Fatal(movie_not_found(rental.movie().id())));
            }
            Err(e) => return Err(e.into()),
        }
        tx.commit().await?;

        Ok(rental)
    }
}
