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

//! Rental fee computation.

use crate::model::max_fee;
use rentdesk_core::driver::{DriverError, DriverResult};
use rust_decimal::Decimal;
use time::OffsetDateTime;

/// Number of nanoseconds in a day.
const NANOS_PER_DAY: i128 = 24 * 60 * 60 * 1_000_000_000;

/// Computes the fee owed for a rental that went out at `date_out` and is returned at `now` when
/// the movie costs `daily_rate` per day.
///
/// Only whole elapsed days are charged and the minimum charge is one day, even if the movie comes
/// back on the same day or `now` precedes `date_out`.  Fees that cannot be stored are rejected.
pub fn compute_fee(
    date_out: OffsetDateTime,
    now: OffsetDateTime,
    daily_rate: Decimal,
) -> DriverResult<Decimal> {
    let days = ((now - date_out).whole_nanoseconds() / NANOS_PER_DAY).max(1);
    let days = Decimal::try_from_i128_with_scale(days, 0).map_err(|_| {
        DriverError::InvalidInput(format!("Rental period of {} days is too long", days))
    })?;
    match daily_rate.checked_mul(days) {
        Some(fee) if fee <= max_fee() => Ok(fee),
        _ => Err(DriverError::InvalidInput(format!(
            "Fee for {} days at a daily rate of {} is too large",
            days, daily_rate
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::max_daily_rate;
    use time::Duration;
    use time::macros::datetime;

    #[test]
    fn test_compute_fee_whole_days() {
        let out = datetime!(2023-10-01 08:30:00 UTC);
        assert_eq!(
            Decimal::from(14),
            compute_fee(out, out + Duration::days(7), Decimal::TWO).unwrap()
        );
        assert_eq!(
            Decimal::new(750, 2),
            compute_fee(out, out + Duration::days(3), Decimal::new(250, 2)).unwrap()
        );
    }

    #[test]
    fn test_compute_fee_minimum_one_day() {
        let out = datetime!(2023-10-01 08:30:00 UTC);
        assert_eq!(Decimal::TWO, compute_fee(out, out, Decimal::TWO).unwrap());
        assert_eq!(Decimal::TWO, compute_fee(out, out + Duration::hours(3), Decimal::TWO).unwrap());
        assert_eq!(Decimal::TWO, compute_fee(out, out - Duration::hours(3), Decimal::TWO).unwrap());
        assert_eq!(Decimal::TWO, compute_fee(out, out - Duration::days(3), Decimal::TWO).unwrap());
    }

    #[test]
    fn test_compute_fee_partial_days_not_charged() {
        let out = datetime!(2023-10-01 08:30:00 UTC);
        let now = out + Duration::days(7) + Duration::microseconds(1);
        assert_eq!(Decimal::from(14), compute_fee(out, now, Decimal::TWO).unwrap());

        let now = out + Duration::days(7) + Duration::hours(23);
        assert_eq!(Decimal::from(14), compute_fee(out, now, Decimal::TWO).unwrap());

        let now = out + Duration::days(2) - Duration::seconds(1);
        assert_eq!(Decimal::TWO, compute_fee(out, now, Decimal::TWO).unwrap());
    }

    #[test]
    fn test_compute_fee_free_movie() {
        let out = datetime!(2023-10-01 08:30:00 UTC);
        let fee = compute_fee(out, out + Duration::days(30), Decimal::ZERO).unwrap();
        assert_eq!(Decimal::ZERO, fee);
    }

    #[test]
    fn test_compute_fee_overflow() {
        let out = datetime!(2000-01-01 00:00:00 UTC);
        let now = datetime!(2023-01-01 00:00:00 UTC);
        match compute_fee(out, now, Decimal::MAX) {
            Err(DriverError::InvalidInput(msg)) => assert!(msg.contains("too large")),
            e => panic!("{:?}", e),
        }
    }

    #[test]
    fn test_compute_fee_exceeds_storable_amount() {
        let out = datetime!(2023-01-01 00:00:00 UTC);
        assert_eq!(
            Decimal::from(99) * max_daily_rate(),
            compute_fee(out, out + Duration::days(99), max_daily_rate()).unwrap()
        );
        match compute_fee(out, out + Duration::days(200), max_daily_rate()) {
            Err(DriverError::InvalidInput(msg)) => {
                assert_eq!("Fee for 200 days at a daily rate of 9999999999.99 is too large", msg)
            }
            e => panic!("{:?}", e),
        }
    }
}
