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

//! Resolution of the rental targeted by a return.

use crate::db;
use crate::driver::Driver;
use crate::model::{CustomerId, MovieId, Rental, RentalState};
use rentdesk_core::db::{DbResult, Executor};
use rentdesk_core::driver::DriverResult;

/// Outcome of looking for the rental of a customer/movie pair.
#[derive(Debug, PartialEq)]
pub(super) enum Resolution {
    /// The pair has an open rental, which is the most recent one if there are many.
    Open(Rental),

    /// The pair has no open rental but its latest rental was already returned.
    Closed(Rental),

    /// The pair has never been rented.
    Missing,
}

/// Finds the rental of `movie_id` by `customer_id` that a return should close.
///
/// Open rentals are always preferred.  The latest closed rental is only looked up when there is
/// no open one, so that replays of a return can be told apart from bogus requests.
pub(super) async fn resolve(
    ex: &mut Executor,
    customer_id: &CustomerId,
    movie_id: &MovieId,
) -> DbResult<Resolution> {
    if let Some(rental) = db::find_open_rental(ex, customer_id, movie_id).await? {
        return Ok(Resolution::Open(rental));
    }

    match db::find_latest_rental(ex, customer_id, movie_id).await? {
        Some(rental) => {
            debug_assert_eq!(RentalState::Closed, rental.state());
            Ok(Resolution::Closed(rental))
        }
        None => Ok(Resolution::Missing),
    }
}

impl Driver {
    /// Gets the most recent rental of `movie_id` by `customer_id` that is still open, if any.
    pub async fn find_open_rental(
        self,
        customer_id: &CustomerId,
        movie_id: &MovieId,
    ) -> DriverResult<Option<Rental>> {
        let mut ex = self.db.ex().await?;
        let rental = db::find_open_rental(&mut ex, customer_id, movie_id).await?;
        Ok(rental)
    }
}
