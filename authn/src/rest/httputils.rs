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

//! Helpers to extract and check credentials from HTTP requests.

use crate::driver::AuthnDriver;
use crate::model::{Identity, Privilege};
use http::header::HeaderMap;
use rentdesk_core::rest::{RestError, RestResult, get_unique_header};

/// Name of the legacy header that carries a raw access token.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Extracts the value of the unique header `name` as a string, if present.
fn get_header_str<'a>(headers: &'a HeaderMap, name: &'static str) -> RestResult<Option<&'a str>> {
    let value = match get_unique_header(headers, name) {
        Ok(Some(value)) => value,
        Ok(None) => return Ok(None),
        Err(e) => return Err(RestError::Unauthenticated(e.to_string())),
    };

    match value.to_str() {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            Err(RestError::Unauthenticated(format!("Bad encoding in {} header: {}", name, e)))
        }
    }
}

/// Extracts the raw credential sent with a request, if any.
///
/// The credential can come as a bearer token in the `Authorization` header or, for older
/// clients, as the raw token in the `x-auth-token` header.  The former takes precedence.
pub fn get_credential(headers: &HeaderMap) -> RestResult<Option<String>> {
    if let Some(authz) = get_header_str(headers, "Authorization")? {
        let mut fields = authz.splitn(2, ' ');
        let scheme = fields.next().unwrap_or("");
        if scheme != "Bearer" {
            return Err(RestError::Unauthenticated("Unsupported scheme".to_owned()));
        }
        return match fields.next() {
            Some(payload) => Ok(Some(payload.trim().to_owned())),
            None => Err(RestError::Unauthenticated(
                "Bad Authorization header: missing payload".to_owned(),
            )),
        };
    }

    Ok(get_header_str(headers, AUTH_TOKEN_HEADER)?.map(str::to_owned))
}

/// Authenticates the caller of a request and checks that it holds the `required` privilege.
///
/// Authentication always happens before authorization so that a missing or bad credential is
/// reported as such, even for operations that the caller could not perform anyway.
pub fn require(
    driver: &AuthnDriver,
    headers: &HeaderMap,
    required: Privilege,
) -> RestResult<Identity> {
    let credential = get_credential(headers)?;
    let identity = driver.authenticate(credential.as_deref())?;
    driver.authorize(&identity, required)?;
    Ok(identity)
}
