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

//! Identifiers for the entities of the rentals domain.

use rentdesk_core::model::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Defines a newtype wrapping a UUID for the entity described by `what`.
macro_rules! uuid_id [
    ( $(#[$doc:meta])* $name:ident, $what:literal ) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
        #[serde(into = "String", try_from = "String")]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a new random identifier.
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            /// Parses an identifier from its textual form.
            pub fn parse(s: &str) -> ModelResult<Self> {
                match Uuid::try_parse(s.trim()) {
                    Ok(uuid) => Ok(Self(uuid)),
                    Err(_) => Err(ModelError(format!("Invalid {} '{}'", $what, s))),
                }
            }

            /// Returns the raw UUID behind this identifier.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.to_string()
            }
        }

        impl TryFrom<String> for $name {
            type Error = ModelError;

            fn try_from(s: String) -> ModelResult<Self> {
                Self::parse(&s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0.hyphenated())
            }
        }
    }
];

uuid_id!(
    /// Identifier of a customer.
    CustomerId,
    "customer id"
);

uuid_id!(
    /// Identifier of a movie.
    MovieId,
    "movie id"
);

uuid_id!(
    /// Identifier of a rental.
    RentalId,
    "rental id"
);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_test::{Token, assert_de_tokens_error, assert_tokens};

    #[test]
    fn test_parse_ok() {
        let id = MovieId::parse("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert_eq!("67e55044-10b1-426f-9247-bb680e5fe0c8", id.to_string());
        assert_eq!(id, MovieId::parse("  67E55044-10B1-426F-9247-BB680E5FE0C8 ").unwrap());
    }

    #[test]
    fn test_parse_error() {
        assert_eq!(
            ModelError("Invalid customer id 'abc'".to_owned()),
            CustomerId::parse("abc").unwrap_err()
        );
        assert_eq!(
            ModelError("Invalid rental id ''".to_owned()),
            RentalId::parse("").unwrap_err()
        );
    }

    #[test]
    fn test_generate_is_unique() {
        assert_ne!(RentalId::generate(), RentalId::generate());
    }

    #[test]
    fn test_ser_de_ok() {
        let id = CustomerId::parse("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert_tokens(&id, &[Token::String("67e55044-10b1-426f-9247-bb680e5fe0c8")]);
    }

    #[test]
    fn test_de_error() {
        assert_de_tokens_error::<MovieId>(
            &[Token::String("not-a-uuid")],
            "Invalid movie id 'not-a-uuid'",
        );
    }
}
