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

//! High-level data types for the rentals service.

mod ids;
pub use ids::{CustomerId, MovieId, RentalId};
mod money;
pub use money::{max_daily_rate, max_fee};
mod movie;
pub use movie::{Movie, MovieSnapshot};
mod rental;
pub use rental::{CustomerSnapshot, Rental, RentalState};
mod request;
pub use request::ReturnRequest;
