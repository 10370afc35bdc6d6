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

//! Requests to return a rented movie.

use crate::model::{CustomerId, MovieId};
use rentdesk_core::model::{ModelError, ModelResult};

/// Parses the mandatory identifier `raw` for the field `what` using `parse`.
fn require_id<T>(
    what: &str,
    raw: Option<&str>,
    parse: fn(&str) -> ModelResult<T>,
) -> ModelResult<T> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => parse(raw),
        _ => Err(ModelError(format!("{} not provided", what))),
    }
}

/// A validated request to return the movie `movie_id` rented by `customer_id`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReturnRequest {
    /// The customer returning the movie.
    customer_id: CustomerId,

    /// The movie being returned.
    movie_id: MovieId,
}

impl ReturnRequest {
    /// Creates a new request from untrusted identifiers, which must both be present and valid.
    pub fn new(customer_id: Option<&str>, movie_id: Option<&str>) -> ModelResult<Self> {
        let customer_id = require_id("Customer id", customer_id, CustomerId::parse)?;
        let movie_id = require_id("Movie id", movie_id, MovieId::parse)?;
        Ok(Self { customer_id, movie_id })
    }

    /// Creates a new request from already-valid identifiers.
    pub fn from_ids(customer_id: CustomerId, movie_id: MovieId) -> Self {
        Self { customer_id, movie_id }
    }

    /// Gets the customer returning the movie.
    pub fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    /// Gets the movie being returned.
    pub fn movie_id(&self) -> &MovieId {
        &self.movie_id
    }
}
