use rand::Rng;
use time::{Duration, OffsetDateTime};

/// How long an issued code stays valid.
pub const CODE_TTL: Duration = Duration::minutes(10);

/// Issue a fresh 6-digit verification code and its expiry.
///
/// Delivery is the caller's job; this only produces the data.
pub fn issue() -> (String, OffsetDateTime) {
    let code = rand::thread_rng().gen_range(100_000..=999_999);
    (code.to_string(), OffsetDateTime::now_utc() + CODE_TTL)
}

/// Check a supplied code against the stored one.
///
/// A missing or expired stored code never matches, even on string equality.
pub fn is_valid(
    stored_code: Option<&str>,
    stored_expiry: Option<OffsetDateTime>,
    supplied: &str,
    now: OffsetDateTime,
) -> bool {
    match (stored_code, stored_expiry) {
        (Some(code), Some(expiry)) => code == supplied && now <= expiry,
        _ => false,
    }
}
