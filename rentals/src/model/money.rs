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

//! Validation of monetary amounts.
//!
//! Amounts are stored with two decimal places and a bounded number of digits, so anything that
//! does not fit is rejected here instead of being rounded or refused by the database.

use rentdesk_core::model::{ModelError, ModelResult};
use rust_decimal::Decimal;

/// Number of decimal places kept for any amount.
const MONEY_SCALE: u32 = 2;

/// Largest daily rate that a movie can have.
pub fn max_daily_rate() -> Decimal {
    Decimal::new(999_999_999_999, MONEY_SCALE)
}

/// Largest fee that a rental can be charged.
pub fn max_fee() -> Decimal {
    Decimal::new(99_999_999_999_999, MONEY_SCALE)
}

/// Ensures that the `amount` for the field named `what` is not negative, has at most two decimal
/// places and does not exceed `max`.
pub(crate) fn validate_amount(what: &str, amount: Decimal, max: Decimal) -> ModelResult<Decimal> {
    if amount < Decimal::ZERO {
        return Err(ModelError(format!("{} cannot be negative: {}", what, amount)));
    }
    if amount.normalize().scale() > MONEY_SCALE {
        return Err(ModelError(format!(
            "{} cannot have more than {} decimal places: {}",
            what, MONEY_SCALE, amount
        )));
    }
    if amount > max {
        return Err(ModelError(format!("{} is too large: {}", what, amount)));
    }
    Ok(amount)
}
