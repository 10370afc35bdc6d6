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

//! Inventory adjustments.

use crate::db;
use crate::driver::Driver;
use crate::model::{Movie, MovieId};
use rentdesk_core::db::{DbError, DbResult, Executor};
use rentdesk_core::driver::{DriverError, DriverResult};

/// Number of copies that a single return puts back on the shelves.
pub(super) const COPIES_PER_RETURN: u32 = 1;

/// Puts the copies of `movie_id` brought back by one return on the shelves.
pub(super) async fn restock(ex: &mut Executor, movie_id: &MovieId) -> DbResult<()> {
    db::increment_movie_stock(ex, movie_id, COPIES_PER_RETURN).await
}

/// Builds the error returned when the movie to adjust does not exist.
pub(super) fn movie_not_found(movie_id: &MovieId) -> DriverError {
    DriverError::NotFound(format!("Movie {} not found", movie_id))
}

impl Driver {
    /// Adds `amount` copies to the stock of `movie_id` and returns the updated movie.
    pub async fn increment_stock(self, movie_id: &MovieId, amount: u32) -> DriverResult<Movie> {
        let mut tx = self.db.begin().await?;
        match db::increment_movie_stock(tx.ex(), movie_id, amount).await {
            Ok(()) => (),
            Err(DbError::NotFound) => return Err(movie_not_found(movie_id)),
            Err(e) => return Err(e.into()),
        }
        let movie = db::get_movie(tx.ex(), movie_id).await?;
        tx.commit().await?;
        Ok(movie)
    }
}
