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

//! Rentals and the customer details they record.

use crate::model::money::{max_fee, validate_amount};
use crate::model::{CustomerId, MovieSnapshot, RentalId};
use rentdesk_core::model::{ModelError, ModelResult, validate_text};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Maximum length of a customer name.
const MAX_NAME_LENGTH: usize = 50;

/// Maximum length of a customer phone number.
const MAX_PHONE_LENGTH: usize = 50;

/// Copy of the customer details at the time a rental was created.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CustomerSnapshot {
    /// Identifier of the customer.
    id: CustomerId,

    /// Name of the customer.
    name: String,

    /// Contact phone of the customer.
    phone: String,
}

impl CustomerSnapshot {
    /// Creates a new snapshot after validating its fields.
    pub fn new<S1: AsRef<str>, S2: AsRef<str>>(
        id: CustomerId,
        name: S1,
        phone: S2,
    ) -> ModelResult<Self> {
        let name = validate_text("Name", name.as_ref(), MAX_NAME_LENGTH)?;
        let phone = validate_text("Phone", phone.as_ref(), MAX_PHONE_LENGTH)?;
        Ok(Self { id, name, phone })
    }

    /// Gets the customer's identifier.
    pub fn id(&self) -> &CustomerId {
        &self.id
    }

    /// Gets the customer's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the customer's phone.
    pub fn phone(&self) -> &str {
        &self.phone
    }
}

/// Lifecycle of a rental.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RentalState {
    /// The customer still holds the movie.
    Open,

    /// The movie was returned and the fee settled.  Terminal.
    Closed,
}

/// A customer holding a copy of a movie.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    /// Identifier of the rental.
    id: RentalId,

    /// Who rented the movie.
    customer: CustomerSnapshot,

    /// What movie was rented.
    movie: MovieSnapshot,

    /// When the movie left the store.
    #[serde(with = "time::serde::rfc3339")]
    date_out: OffsetDateTime,

    /// When the movie came back, if it did.
    #[serde(with = "time::serde::rfc3339::option")]
    date_returned: Option<OffsetDateTime>,

    /// Fee charged at return time, if returned.
    fee: Option<Decimal>,
}

impl Rental {
    /// Creates a new open rental.
    pub fn new(
        id: RentalId,
        customer: CustomerSnapshot,
        movie: MovieSnapshot,
        date_out: OffsetDateTime,
    ) -> Self {
        Self { id, customer, movie, date_out, date_returned: None, fee: None }
    }

    /// Closes the rental at `date_returned` charging `fee`.
    ///
    /// The return date and the fee are recorded together and only once: closing an already-closed
    /// rental is an error.
    pub fn close(mut self, date_returned: OffsetDateTime, fee: Decimal) -> ModelResult<Self> {
        if self.state() == RentalState::Closed {
            return Err(ModelError(format!("Rental {} already closed", self.id)));
        }
        if date_returned < self.date_out {
            return Err(ModelError(format!(
                "Rental {} cannot be returned before it went out",
                self.id
            )));
        }
        let fee = validate_amount("Fee", fee, max_fee())?;
        self.date_returned = Some(date_returned);
        self.fee = Some(fee);
        Ok(self)
    }

    /// Gets the rental's identifier.
    pub fn id(&self) -> &RentalId {
        &self.id
    }

    /// Gets the customer details recorded for the rental.
    pub fn customer(&self) -> &CustomerSnapshot {
        &self.customer
    }

    /// Gets the movie details recorded for the rental.
    pub fn movie(&self) -> &MovieSnapshot {
        &self.movie
    }

    /// Gets the time when the movie left the store.
    pub fn date_out(&self) -> OffsetDateTime {
        self.date_out
    }

    /// Gets the time when the movie was returned, if any.
    pub fn date_returned(&self) -> Option<OffsetDateTime> {
        self.date_returned
    }

    /// Gets the fee charged for the rental, if returned.
    pub fn fee(&self) -> Option<Decimal> {
        self.fee
    }

    /// Computes the current state of the rental.
    pub fn state(&self) -> RentalState {
        match self.date_returned {
            None => RentalState::Open,
            Some(_) => RentalState::Closed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MovieId;
    use time::macros::datetime;

    fn make_rental() -> Rental {
        Rental::new(
            RentalId::parse("00000000-0000-4000-8000-000000000001").unwrap(),
            CustomerSnapshot::new(
                CustomerId::parse("00000000-0000-4000-8000-000000000002").unwrap(),
                "Jack Sparrow",
                "1234567",
            )
            .unwrap(),
            MovieSnapshot::new(
                MovieId::parse("00000000-0000-4000-8000-000000000003").unwrap(),
                "Love story",
                Decimal::TWO,
            )
            .unwrap(),
            datetime!(2023-10-01 08:30:00 UTC),
        )
    }

    #[test]
    fn test_customer_snapshot_errors() {
        assert_eq!(
            ModelError("Name cannot be empty".to_owned()),
            CustomerSnapshot::new(CustomerId::generate(), "", "123").unwrap_err()
        );
        assert_eq!(
            ModelError("Phone is too long".to_owned()),
            CustomerSnapshot::new(CustomerId::generate(), "Name", "1".repeat(51)).unwrap_err()
        );
    }

    #[test]
    fn test_rental_close_ok() {
        let rental = make_rental();
        assert_eq!(RentalState::Open, rental.state());
        assert_eq!(None, rental.date_returned());
        assert_eq!(None, rental.fee());

        let returned = datetime!(2023-10-08 09:00:00 UTC);
        let rental = rental.close(returned, Decimal::from(14)).unwrap();
        assert_eq!(RentalState::Closed, rental.state());
        assert_eq!(Some(returned), rental.date_returned());
        assert_eq!(Some(Decimal::from(14)), rental.fee());
        assert_eq!(datetime!(2023-10-01 08:30:00 UTC), rental.date_out());
    }

    #[test]
    fn test_rental_close_only_once() {
        let returned = datetime!(2023-10-08 09:00:00 UTC);
        let rental = make_rental().close(returned, Decimal::from(14)).unwrap();
        assert_eq!(
            ModelError("Rental 00000000-0000-4000-8000-000000000001 already closed".to_owned()),
            rental.close(returned, Decimal::from(16)).unwrap_err()
        );
    }

    #[test]
    fn test_rental_close_errors() {
        make_rental().close(datetime!(2023-10-01 08:29:59 UTC), Decimal::ONE).unwrap_err();
        make_rental()
            .close(datetime!(2023-10-02 08:30:00 UTC), Decimal::NEGATIVE_ONE)
            .unwrap_err();
        assert_eq!(
            ModelError("Fee cannot have more than 2 decimal places: 14.005".to_owned()),
            make_rental()
                .close(datetime!(2023-10-02 08:30:00 UTC), Decimal::new(14005, 3))
                .unwrap_err()
        );
        assert_eq!(
            ModelError("Fee is too large: 1000000000000000".to_owned()),
            make_rental()
                .close(datetime!(2023-10-02 08:30:00 UTC), Decimal::from(1_000_000_000_000_000i64))
                .unwrap_err()
        );
    }

    #[test]
    fn test_rental_json() {
        let rental = make_rental()
            .close(datetime!(2023-10-08 09:00:00.5 UTC), Decimal::new(1450, 2))
            .unwrap();
        assert_eq!(
            serde_json::json!({
                "id": "00000000-0000-4000-8000-000000000001",
                "customer": {
                    "id": "00000000-0000-4000-8000-000000000002",
                    "name": "Jack Sparrow",
                    "phone": "1234567",
                },
                "movie": {
                    "id": "00000000-0000-4000-8000-000000000003",
                    "title": "Love story",
                    "dailyRate": 2.0,
                },
                "dateOut": "2023-10-01T08:30:00Z",
                "dateReturned": "2023-10-08T09:00:00.5Z",
                "fee": 14.5,
            }),
            serde_json::to_value(&rental).unwrap()
        );
    }

    #[test]
    fn test_open_rental_json() {
        let value = serde_json::to_value(make_rental()).unwrap();
        assert_eq!(serde_json::Value::Null, value["dateReturned"]);
        assert_eq!(serde_json::Value::Null, value["fee"]);
    }
}
