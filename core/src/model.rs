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

//! Generic data types shared by all services.
//!
//! Services define their own `model` module with the types that represent concepts in their
//! domain.  Those types must only be constructible via functions that validate their input and
//! return a `ModelResult`, so that holding an instance of a type is proof of its validity.

/// Model errors.  These represent malformed values, typically coming from untrusted input.
#[derive(Debug, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct ModelError(pub String);

/// Result type for this module.
pub type ModelResult<T> = Result<T, ModelError>;

/// Ensures that the untrusted string `s` for the field named `what` is not blank and fits within
/// `max_len` bytes.  Returns the string with surrounding whitespace removed.
pub fn validate_text(what: &str, s: &str, max_len: usize) -> ModelResult<String> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ModelError(format!("{} cannot be empty", what)));
    }
    if s.len() > max_len {
        return Err(ModelError(format!("{} is too long", what)));
    }
    Ok(s.to_owned())
}
