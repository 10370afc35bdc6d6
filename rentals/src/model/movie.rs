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

//! Movies and the snapshots of them kept in rentals.

use crate::model::MovieId;
use crate::model::money::{max_daily_rate, validate_amount};
use rentdesk_core::model::{ModelResult, validate_text};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Maximum length of a movie title.
const MAX_TITLE_LENGTH: usize = 255;

/// Ensures that a daily rental rate can be charged and stored.
fn validate_daily_rate(daily_rate: Decimal) -> ModelResult<Decimal> {
    validate_amount("Daily rate", daily_rate, max_daily_rate())
}

/// A movie in the catalog along with the number of copies available to rent.
#[derive(Clone, Debug, PartialEq)]
pub struct Movie {
    /// Identifier of the movie.
    id: MovieId,

    /// Title of the movie.
    title: String,

    /// Price charged per day of rental.
    daily_rate: Decimal,

    /// Number of copies on the shelves.
    stock: u32,
}

impl Movie {
    /// Creates a new movie after validating its fields.
    pub fn new<S: AsRef<str>>(
        id: MovieId,
        title: S,
        daily_rate: Decimal,
        stock: u32,
    ) -> ModelResult<Self> {
        let title = validate_text("Title", title.as_ref(), MAX_TITLE_LENGTH)?;
        let daily_rate = validate_daily_rate(daily_rate)?;
        Ok(Self { id, title, daily_rate, stock })
    }

    /// Gets the movie's identifier.
    pub fn id(&self) -> &MovieId {
        &self.id
    }

    /// Gets the movie's title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Gets the price charged per day of rental.
    pub fn daily_rate(&self) -> Decimal {
        self.daily_rate
    }

    /// Gets the number of copies available.
    pub fn stock(&self) -> u32 {
        self.stock
    }

    /// Takes a snapshot of the movie details that rentals record.
    pub fn snapshot(&self) -> MovieSnapshot {
        MovieSnapshot { id: self.id, title: self.title.clone(), daily_rate: self.daily_rate }
    }
}

/// Copy of the movie details at the time a rental was created.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieSnapshot {
    /// Identifier of the rented movie.
    id: MovieId,

    /// Title of the rented movie.
    title: String,

    /// Price per day agreed upon when the rental started.
    daily_rate: Decimal,
}

impl MovieSnapshot {
    /// Creates a new snapshot after validating its fields.
    pub fn new<S: AsRef<str>>(id: MovieId, title: S, daily_rate: Decimal) -> ModelResult<Self> {
        let title = validate_text("Title", title.as_ref(), MAX_TITLE_LENGTH)?;
        let daily_rate = validate_daily_rate(daily_rate)?;
        Ok(Self { id, title, daily_rate })
    }

    /// Gets the movie's identifier.
    pub fn id(&self) -> &MovieId {
        &self.id
    }

    /// Gets the movie's title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Gets the price per day agreed upon when the rental started.
    pub fn daily_rate(&self) -> Decimal {
        self.daily_rate
    }
}
