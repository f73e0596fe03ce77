//! Scannable label generation and parsing.
//!
//! Primary codes are `BASE-TIMESTAMP-RAND` (base-36, upper-cased). Box codes
//! are `{primary_code}-BOX-{box_number}`; the format is a contract because
//! downstream scanning parses it back for display.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Marker separating the primary code from the box number.
pub const BOX_MARKER: &str = "-BOX-";

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generate a primary code for one unit: `BASE-TIMESTAMP-RAND`, upper-cased.
///
/// `base` comes from the catalog (variant SKU / product code / fallback);
/// the timestamp is the base-36 encoding of epoch milliseconds; the random
/// tail is 3 base-36 characters, enough to keep codes generated within the
/// same millisecond distinct in practice.
pub fn generate_primary_code(base: &str, at: DateTime<Utc>) -> String {
    let millis = at.timestamp_millis().max(0) as u128;
    let ts = encode_base36(millis);
    let rand = random_suffix();
    format!("{base}-{ts}-{rand}").to_uppercase()
}

/// Derive the scannable code of box `box_number` (1-based) of a unit.
pub fn box_qr_code(primary_code: &str, box_number: u32) -> String {
    format!("{primary_code}{BOX_MARKER}{box_number}")
}

/// Parse a box code back into `(primary_code, box_number)`.
///
/// Returns `None` for anything that is not a well-formed box code, including
/// a box number of 0 (box numbers are 1-based).
pub fn parse_box_code(code: &str) -> Option<(&str, u32)> {
    let idx = code.rfind(BOX_MARKER)?;
    let (primary, rest) = code.split_at(idx);
    let number: u32 = rest[BOX_MARKER.len()..].parse().ok()?;
    if primary.is_empty() || number == 0 {
        return None;
    }
    Some((primary, number))
}

/// Scanner input normalization: trim surrounding whitespace and upper-case.
///
/// Generated labels are upper-case already; this keeps hand-typed and
/// padded scanner input comparable.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

fn encode_base36(mut n: u128) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    // BASE36 is ASCII, so this cannot fail.
    String::from_utf8(out).unwrap_or_default()
}

fn random_suffix() -> String {
    // The workspace already carries uuid; v4 gives us cheap random bits
    // without a separate rng dependency.
    let bits = Uuid::new_v4().as_u128() % (36 * 36 * 36);
    let encoded = encode_base36(bits);
    format!("{encoded:0>3}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn primary_code_is_upper_cased_and_prefixed_with_base() {
        let code = generate_primary_code("abc123", Utc::now());
        assert!(code.starts_with("ABC123-"));
        assert_eq!(code, code.to_uppercase());
    }

    #[test]
    fn primary_codes_are_distinct_within_a_batch() {
        let now = Utc::now();
        let codes: Vec<_> = (0..50).map(|_| generate_primary_code("SKU", now)).collect();
        let mut unique = codes.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), codes.len());
    }

    #[test]
    fn box_code_format_is_stable() {
        assert_eq!(box_qr_code("ABC123", 2), "ABC123-BOX-2");
    }

    #[test]
    fn parse_rejects_malformed_codes() {
        assert_eq!(parse_box_code("ABC123"), None);
        assert_eq!(parse_box_code("ABC123-BOX-"), None);
        assert_eq!(parse_box_code("ABC123-BOX-zero"), None);
        assert_eq!(parse_box_code("ABC123-BOX-0"), None);
        assert_eq!(parse_box_code("-BOX-3"), None);
    }

    #[test]
    fn parse_uses_the_last_marker_occurrence() {
        // A pathological base containing the marker still round-trips.
        assert_eq!(parse_box_code("A-BOX-1-BOX-2"), Some(("A-BOX-1", 2)));
    }

    #[test]
    fn normalization_trims_and_upper_cases() {
        assert_eq!(normalize_code("  abc123-box-1\n"), "ABC123-BOX-1");
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: `parse_box_code` inverts `box_qr_code` for any plausible
        /// primary code and any 1-based box number.
        #[test]
        fn parse_inverts_format(
            base in "[A-Z0-9]{1,12}(-[A-Z0-9]{1,8}){0,2}",
            n in 1u32..500u32
        ) {
            let code = box_qr_code(&base, n);
            prop_assert_eq!(parse_box_code(&code), Some((base.as_str(), n)));
        }

        /// Property: base-36 encoding only emits characters scanners accept.
        #[test]
        fn encoded_timestamps_are_alphanumeric(millis in 0u128..u64::MAX as u128) {
            let encoded = encode_base36(millis);
            prop_assert!(encoded.bytes().all(|b| b.is_ascii_alphanumeric()));
        }
    }
}
