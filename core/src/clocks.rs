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

//! Clocks to obtain the current time.
//!
//! Business logic never queries the system time directly.  Instead, drivers receive a `Clock` at
//! construction time so that tests can pin "now" to a known value and compute expected fees and
//! expirations exactly.

use async_trait::async_trait;
use std::time::Duration;
use time::OffsetDateTime;

/// Generic definition of a clock.
#[async_trait]
pub trait Clock {
    /// Returns the current UTC time.
    fn now_utc(&self) -> OffsetDateTime;

    /// Pauses execution of the current task for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Truncates `ts` to microsecond resolution, which is the resolution of timestamps in the
/// PostgreSQL database.
fn truncate_to_micros(ts: OffsetDateTime) -> OffsetDateTime {
    let nanos = ts.unix_timestamp_nanos() / 1000 * 1000;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .expect("Truncating a valid timestamp must yield a valid timestamp")
}

/// Clock implementation that uses the system clock.
#[derive(Clone, Default)]
pub struct SystemClock {}

#[async_trait]
impl Clock for SystemClock {
    fn now_utc(&self) -> OffsetDateTime {
        // Values we hand out end up in the database and are later compared against what we read
        // back, so they must not carry more precision than the database can store.
        truncate_to_micros(OffsetDateTime::now_utc())
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await
    }
}

/// Test utilities.
#[cfg(any(test, feature = "testutils"))]
pub mod testutils {
    use super::*;
    use std::sync::Mutex;

    /// A clock that returns a preconfigured instant and that only moves when told to.
    ///
    /// Sleeping on this clock advances it by the requested amount without blocking, which keeps
    /// retry loops fast in tests.
    pub struct SettableClock {
        /// Current fake time.
        now: Mutex<OffsetDateTime>,
    }

    impl SettableClock {
        /// Creates a new clock that returns `now` until reconfigured.
        pub fn new(now: OffsetDateTime) -> Self {
            assert_eq!(now, truncate_to_micros(now), "Nanosecond precision not supported");
            Self { now: Mutex::new(now) }
        }

        /// Sets the new value of `now` that the clock returns.
        pub fn set(&self, now: OffsetDateTime) {
            assert_eq!(now, truncate_to_micros(now), "Nanosecond precision not supported");
            *self.now.lock().unwrap() = now;
        }

        /// Advances the current time by `delta`.
        pub fn advance(&self, delta: Duration) {
            assert_eq!(0, delta.as_nanos() % 1000, "Nanosecond precision not supported");
            let mut now = self.now.lock().unwrap();
            *now += delta;
        }
    }

    #[async_trait]
    impl Clock for SettableClock {
        fn now_utc(&self) -> OffsetDateTime {
            *self.now.lock().unwrap()
        }

        async fn sleep(&self, duration: Duration) {
            self.advance(duration);
            tokio::task::yield_now().await;
        }
    }

    /// Builds a UTC timestamp from its calendar components, for use in tests.
    pub fn utc_datetime(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> OffsetDateTime {
        let month = time::Month::try_from(month).unwrap();
        let date = time::Date::from_calendar_date(year, month, day).unwrap();
        let time = time::Time::from_hms(hour, minute, second).unwrap();
        date.with_time(time).assume_utc()
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::panic::catch_unwind;
        use time::macros::datetime;

        #[test]
        fn test_settableclock_set_and_advance() {
            let now = datetime!(2023-12-01 10:15:00.123456 UTC);
            let clock = SettableClock::new(now);
            assert_eq!(now, clock.now_utc());

            clock.set(datetime!(2023-12-01 10:15:00.987654 UTC));
            assert_eq!(datetime!(2023-12-01 10:15:00.987654 UTC), clock.now_utc());

            clock.advance(Duration::from_secs(7 * 24 * 60 * 60));
            assert_eq!(datetime!(2023-12-08 10:15:00.987654 UTC), clock.now_utc());
        }

        #[test]
        fn test_settableclock_nanosecond_precision_unsupported() {
            catch_unwind(|| {
                SettableClock::new(datetime!(2023-12-01 10:20:00.123456001 UTC));
            })
            .unwrap_err();

            catch_unwind(|| {
                let clock = SettableClock::new(datetime!(2023-12-01 10:20:00 UTC));
                clock.advance(Duration::from_nanos(1));
            })
            .unwrap_err();
        }

        #[tokio::test]
        async fn test_settableclock_sleep_advances_time() {
            let clock = SettableClock::new(datetime!(2023-12-01 10:40:00 UTC));
            // Sleep for an unreasonable period to ensure we don't block for long.
            clock.sleep(Duration::from_secs(3600)).await;
            assert_eq!(datetime!(2023-12-01 11:40:00 UTC), clock.now_utc());
        }

        #[test]
        fn test_utc_datetime() {
            assert_eq!(datetime!(2022-04-02 05:38:10 UTC), utc_datetime(2022, 4, 2, 5, 38, 10));
        }
    }
}
