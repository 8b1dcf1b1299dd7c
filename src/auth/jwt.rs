// Bearer token inspection
// Tokens are opaque to the client except for the JWT payload segment

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use serde_json::{Map, Value};

/// Decode the payload segment of a JWT
///
/// Splits the token on `.`, base64url-decodes the middle segment and parses
/// it as a JSON object. Returns `None` for any malformed input: wrong segment
/// count, invalid base64, or a payload that is not a JSON object.
pub fn decode(token: &str) -> Option<Map<String, Value>> {
    let mut segments = token.split('.');
    let _header = segments.next()?;
    let payload = segments.next()?;

    // exactly three segments; the signature may be empty
    if segments.next().is_none() || segments.next().is_some() {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    match serde_json::from_slice(&bytes).ok()? {
        Value::Object(claims) => Some(claims),
        _ => None,
    }
}

/// Check whether a token's `exp` claim falls within `buffer_seconds` of now
///
/// Tokens that fail to decode or carry no `exp` claim are treated as not
/// expiring; the server remains the authority on rejecting them.
pub fn is_expiring_soon(token: &str, buffer_seconds: i64) -> bool {
    let Some(claims) = decode(token) else {
        return false;
    };
    let Some(exp) = claims.get("exp").and_then(Value::as_i64) else {
        return false;
    };

    exp - Utc::now().timestamp() <= buffer_seconds
}

#[cfg(test)]
pub(crate) mod test_tokens {
    use super::*;

    /// Build an unsigned JWT carrying the given claims
    pub fn with_claims(claims: &Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
        format!("{header}.{payload}.signature")
    }

    /// Build a token whose `exp` claim is `seconds_from_now` away
    pub fn expiring_in(seconds_from_now: i64) -> String {
        let exp = Utc::now().timestamp() + seconds_from_now;
        with_claims(&serde_json::json!({ "sub": 1, "exp": exp }))
    }
}
