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

//! Database abstraction to manipulate movies and rentals.

use crate::model::{
    CustomerId, CustomerSnapshot, Movie, MovieId, MovieSnapshot, Rental, RentalId,
};
#[cfg(feature = "postgres")]
use rentdesk_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use rentdesk_core::db::sqlite::{self, build_timestamp, unpack_timestamp};
use rentdesk_core::db::{DbError, DbResult, Executor};
use rust_decimal::Decimal;
use sqlx::Row;
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;
#[cfg(any(feature = "sqlite", test))]
use std::str::FromStr;
#[cfg(feature = "postgres")]
use time::OffsetDateTime;


/// Initializes the database schema.
pub async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => postgres::run_schema(ex, include_str!("postgres.sql")).await,

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Parses a decimal number stored as text in SQLite.
#[cfg(any(feature = "sqlite", test))]
fn parse_decimal(column: &str, raw: &str) -> DbResult<Decimal> {
    Decimal::from_str(raw).map_err(|e| {
        DbError::DataIntegrityError(format!("Invalid decimal '{}' in {}: {}", raw, column, e))
    })
}

/// Converts a stock count read from the database into its in-memory representation.
fn stock_from_db<T>(raw: T) -> DbResult<u32>
where
    T: Copy + std::fmt::Display + TryInto<u32>,
{
    raw.try_into()
        .map_err(|_| DbError::DataIntegrityError(format!("Invalid stock count {}", raw)))
}

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Movie {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: uuid::Uuid = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let title: String = row.try_get("title").map_err(postgres::map_sqlx_error)?;
        let daily_rate: Decimal = row.try_get("daily_rate").map_err(postgres::map_sqlx_error)?;
        let stock: i32 = row.try_get("stock").map_err(postgres::map_sqlx_error)?;

        Ok(Movie::new(MovieId::from(id), title, daily_rate, stock_from_db(stock)?)?)
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Movie {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: String = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let title: String = row.try_get("title").map_err(sqlite::map_sqlx_error)?;
        let daily_rate: String = row.try_get("daily_rate").map_err(sqlite::map_sqlx_error)?;
        let stock: i64 = row.try_get("stock").map_err(sqlite::map_sqlx_error)?;

        Ok(Movie::new(
            MovieId::parse(&id)?,
            title,
            parse_decimal("daily_rate", &daily_rate)?,
            stock_from_db(stock)?,
        )?)
    }
}

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Rental {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: uuid::Uuid = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let customer_id: uuid::Uuid =
            row.try_get("customer_id").map_err(postgres::map_sqlx_error)?;
        let customer_name: String =
            row.try_get("customer_name").map_err(postgres::map_sqlx_error)?;
        let customer_phone: String =
            row.try_get("customer_phone").map_err(postgres::map_sqlx_error)?;
        let movie_id: uuid::Uuid = row.try_get("movie_id").map_err(postgres::map_sqlx_error)?;
        let movie_title: String = row.try_get("movie_title").map_err(postgres::map_sqlx_error)?;
        let movie_daily_rate: Decimal =
            row.try_get("movie_daily_rate").map_err(postgres::map_sqlx_error)?;
        let date_out: OffsetDateTime =
            row.try_get("date_out").map_err(postgres::map_sqlx_error)?;
        let date_returned: Option<OffsetDateTime> =
            row.try_get("date_returned").map_err(postgres::map_sqlx_error)?;
        let fee: Option<Decimal> = row.try_get("fee").map_err(postgres::map_sqlx_error)?;

        let customer =
            CustomerSnapshot::new(CustomerId::from(customer_id), customer_name, customer_phone)?;
        let movie = MovieSnapshot::new(MovieId::from(movie_id), movie_title, movie_daily_rate)?;
        let rental = Rental::new(RentalId::from(id), customer, movie, date_out);
        match (date_returned, fee) {
            (None, None) => Ok(rental),
            (Some(date_returned), Some(fee)) => Ok(rental.close(date_returned, fee)?),
            _ => Err(DbError::DataIntegrityError(format!(
                "Rental {} has inconsistent return details",
                rental.id()
            ))),
        }
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Rental {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: String = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let customer_id: String = row.try_get("customer_id").map_err(sqlite::map_sqlx_error)?;
        let customer_name: String = row.try_get("customer_name").map_err(sqlite::map_sqlx_error)?;
        let customer_phone: String =
            row.try_get("customer_phone").map_err(sqlite::map_sqlx_error)?;
        let movie_id: String = row.try_get("movie_id").map_err(sqlite::map_sqlx_error)?;
        let movie_title: String = row.try_get("movie_title").map_err(sqlite::map_sqlx_error)?;
        let movie_daily_rate: String =
            row.try_get("movie_daily_rate").map_err(sqlite::map_sqlx_error)?;
        let date_out_sec: i64 = row.try_get("date_out_sec").map_err(sqlite::map_sqlx_error)?;
        let date_out_nsec: i64 = row.try_get("date_out_nsec").map_err(sqlite::map_sqlx_error)?;
        let date_returned_sec: Option<i64> =
            row.try_get("date_returned_sec").map_err(sqlite::map_sqlx_error)?;
        let date_returned_nsec: Option<i64> =
            row.try_get("date_returned_nsec").map_err(sqlite::map_sqlx_error)?;
        let fee: Option<String> = row.try_get("fee").map_err(sqlite::map_sqlx_error)?;

        let customer =
            CustomerSnapshot::new(CustomerId::parse(&customer_id)?, customer_name, customer_phone)?;
        let movie = MovieSnapshot::new(
            MovieId::parse(&movie_id)?,
            movie_title,
            parse_decimal("movie_daily_rate", &movie_daily_rate)?,
        )?;
        let date_out = build_timestamp(date_out_sec, date_out_nsec)?;
        let rental = Rental::new(RentalId::parse(&id)?, customer, movie, date_out);
        match (date_returned_sec, date_returned_nsec, fee) {
            (None, None, None) => Ok(rental),
            (Some(sec), Some(nsec), Some(fee)) => {
                let date_returned = build_timestamp(sec, nsec)?;
                let fee = parse_decimal("fee", &fee)?;
                Ok(rental.close(date_returned, fee)?)
            }
            _ => Err(DbError::DataIntegrityError(format!(
                "Rental {} has inconsistent return details",
                rental.id()
            ))),
        }
    }
}

/// Converts a stock count or delta into the integer type PostgreSQL expects.
#[cfg(feature = "postgres")]
fn stock_to_postgres(stock: u32) -> DbResult<i32> {
    i32::try_from(stock)
        .map_err(|_| DbError::BackendError(format!("Stock count {} is too large", stock)))
}

/// Creates a new `movie`.  Fails with `AlreadyExists` if a movie with the same id exists.
pub async fn put_movie(ex: &mut Executor, movie: &Movie) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO movies (id, title, daily_rate, stock)
                VALUES ($1, $2, $3, $4)";
            let done = sqlx::query(query_str)
                .bind(*movie.id().as_uuid())
                .bind(movie.title())
                .bind(movie.daily_rate())
                .bind(stock_to_postgres(movie.stock())?)
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                INSERT INTO movies (id, title, daily_rate, stock)
                VALUES (?, ?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(movie.id().to_string())
                .bind(movie.title())
                .bind(movie.daily_rate().to_string())
                .bind(i64::from(movie.stock()))
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    if rows_affected != 1 {
        return Err(DbError::BackendError("Insertion affected more than one row".to_owned()));
    }
    Ok(())
}

/// Gets the movie identified by `id`.
pub async fn get_movie(ex: &mut Executor, id: &MovieId) -> DbResult<Movie> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM movies WHERE id = $1";
            let row = sqlx::query(query_str)
                .bind(*id.as_uuid())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Movie::try_from(row)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM movies WHERE id = ?";
            let row = sqlx::query(query_str)
                .bind(id.to_string())
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Movie::try_from(row)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Adds `amount` copies to the stock of the movie identified by `id`.
///
/// The update is relative to whatever the database holds at the time it runs so that concurrent
/// adjustments never overwrite each other.  Fails with `NotFound` if the movie does not exist.
pub async fn increment_movie_stock(ex: &mut Executor, id: &MovieId, amount: u32) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "UPDATE movies SET stock = stock + $1 WHERE id = $2";
            let done = sqlx::query(query_str)
                .bind(stock_to_postgres(amount)?)
                .bind(*id.as_uuid())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "UPDATE movies SET stock = stock + ? WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(i64::from(amount))
                .bind(id.to_string())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError("Update affected more than one row".to_owned())),
    }
}

/// Creates a new `rental`.  Fails with `AlreadyExists` if a rental with the same id exists.
pub async fn put_rental(ex: &mut Executor, rental: &Rental) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO rentals (
                    id,
                    customer_id, customer_name, customer_phone,
                    movie_id, movie_title, movie_daily_rate,
                    date_out, date_returned, fee
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)";
            let done = sqlx::query(query_str)
                .bind(*rental.id().as_uuid())
                .bind(*rental.customer().id().as_uuid())
                .bind(rental.customer().name())
                .bind(rental.customer().phone())
                .bind(*rental.movie().id().as_uuid())
                .bind(rental.movie().title())
                .bind(rental.movie().daily_rate())
                .bind(rental.date_out())
                .bind(rental.date_returned())
                .bind(rental.fee())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let (date_out_sec, date_out_nsec) = unpack_timestamp(rental.date_out());
            let date_returned = rental.date_returned().map(unpack_timestamp);

            let query_str = "
                INSERT INTO rentals (
                    id,
                    customer_id, customer_name, customer_phone,
                    movie_id, movie_title, movie_daily_rate,
                    date_out_sec, date_out_nsec,
                    date_returned_sec, date_returned_nsec, fee
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(rental.id().to_string())
                .bind(rental.customer().id().to_string())
                .bind(rental.customer().name())
                .bind(rental.customer().phone())
                .bind(rental.movie().id().to_string())
                .bind(rental.movie().title())
                .bind(rental.movie().daily_rate().to_string())
                .bind(date_out_sec)
                .bind(date_out_nsec)
                .bind(date_returned.map(|(sec, _)| sec))
                .bind(date_returned.map(|(_, nsec)| nsec))
                .bind(rental.fee().map(|fee| fee.to_string()))
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    if rows_affected != 1 {
        return Err(DbError::BackendError("Insertion affected more than one row".to_owned()));
    }
    Ok(())
}

/// Gets the rental identified by `id`.
pub async fn get_rental(ex: &mut Executor, id: &RentalId) -> DbResult<Rental> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM rentals WHERE id = $1";
            let row = sqlx::query(query_str)
                .bind(*id.as_uuid())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Rental::try_from(row)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM rentals WHERE id = ?";
            let row = sqlx::query(query_str)
                .bind(id.to_string())
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Rental::try_from(row)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the most recent rental of `movie_id` by `customer_id`, restricted to rentals that have
/// not been returned yet if `only_open` is true.
async fn find_latest(
    ex: &mut Executor,
    customer_id: &CustomerId,
    movie_id: &MovieId,
    only_open: bool,
) -> DbResult<Option<Rental>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT * FROM rentals
                WHERE customer_id = $1 AND movie_id = $2
                    AND (NOT $3 OR date_returned IS NULL)
                ORDER BY date_out DESC
                LIMIT 1";
            let row = sqlx::query(query_str)
                .bind(*customer_id.as_uuid())
                .bind(*movie_id.as_uuid())
                .bind(only_open)
                .fetch_optional(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.map(Rental::try_from).transpose()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT * FROM rentals
                WHERE customer_id = ? AND movie_id = ?
                    AND (NOT ? OR date_returned_sec IS NULL)
                ORDER BY date_out_sec DESC, date_out_nsec DESC
                LIMIT 1";
            let row = sqlx::query(query_str)
                .bind(customer_id.to_string())
                .bind(movie_id.to_string())
                .bind(only_open)
                .fetch_optional(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.map(Rental::try_from).transpose()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the most recent rental of `movie_id` by `customer_id` that has not been returned yet.
pub async fn find_open_rental(
    ex: &mut Executor,
    customer_id: &CustomerId,
    movie_id: &MovieId,
) -> DbResult<Option<Rental>> {
    find_latest(ex, customer_id, movie_id, true).await
}

/// Gets the most recent rental of `movie_id` by `customer_id` regardless of its state.
pub async fn find_latest_rental(
    ex: &mut Executor,
    customer_id: &CustomerId,
    movie_id: &MovieId,
) -> DbResult<Option<Rental>> {
    find_latest(ex, customer_id, movie_id, false).await
}

/// Records the return details of the already-closed in-memory `rental`.
///
/// The update only applies if the stored rental is still open, which makes this safe against
/// concurrent returns: returns false if the rental had already been closed by someone else.
/// Fails with `NotFound` if the rental does not exist.
pub async fn close_rental(ex: &mut Executor, rental: &Rental) -> DbResult<bool> {
    let (date_returned, fee) = match (rental.date_returned(), rental.fee()) {
        (Some(date_returned), Some(fee)) => (date_returned, fee),
        _ => {
            return Err(DbError::BackendError(format!(
                "Rental {} must be closed before persisting its return",
                rental.id()
            )));
        }
    };

    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE rentals SET date_returned = $1, fee = $2
                WHERE id = $3 AND date_returned IS NULL";
            let done = sqlx::query(query_str)
                .bind(date_returned)
                .bind(fee)
                .bind(*rental.id().as_uuid())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let (sec, nsec) = unpack_timestamp(date_returned);
            let query_str = "
                UPDATE rentals SET date_returned_sec = ?, date_returned_nsec = ?, fee = ?
                WHERE id = ? AND date_returned_sec IS NULL";
            let done = sqlx::query(query_str)
                .bind(sec)
                .bind(nsec)
                .bind(fee.to_string())
                .bind(rental.id().to_string())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    match rows_affected {
        0 => {
            // Distinguish a lost race from a rental that never existed.
            get_rental(ex, rental.id()).await?;
            Ok(false)
        }
        1 => Ok(true),
        _ => Err(DbError::BackendError("Update affected more than one row".to_owned())),
    }
}
