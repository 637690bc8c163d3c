use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::base58;

/// Prefix carried by every share code
pub const SHARE_CODE_PREFIX: &str = "EK";

/// Fixed reference instant mixed into every code (2024-01-01T00:00:00Z, epoch millis).
///
/// Must stay constant: changing it changes every code already handed out.
pub const REFERENCE_TIMESTAMP_MS: i64 = 1_704_067_200_000;

const ID_MULTIPLIER: u64 = 1000;

const fn reference_offset() -> u64 {
    (REFERENCE_TIMESTAMP_MS % ID_MULTIPLIER as i64) as u64
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShareCodeError {
    /// Entity IDs start at 1
    #[error("entity id must be positive, got {0}")]
    NonPositiveId(i64),

    /// The combined value would not fit in 64 bits
    #[error("entity id {0} is too large to encode")]
    IdOutOfRange(i64),

    /// The string is not shaped like a share code
    #[error("malformed share code '{0}'")]
    Malformed(String),

    /// Well-formed, but no entity id could have produced it
    #[error("share code '{0}' was not issued by this service")]
    NotIssued(String),
}

/// Public identifier derived from an entity id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShareCode(String);

impl ShareCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Joins the code onto a base URL with a single separating slash
    pub fn url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }

    /// Recovers the entity id this code was generated from
    pub fn entity_id(&self) -> Result<i64, ShareCodeError> {
        decode_share_code(&self.0)
    }
}

impl fmt::Display for ShareCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShareCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ShareCode {
    type Err = ShareCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_valid_share_code(s) {
            Ok(ShareCode(s.to_string()))
        } else {
            Err(ShareCodeError::Malformed(s.to_string()))
        }
    }
}

impl TryFrom<String> for ShareCode {
    type Error = ShareCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if is_valid_share_code(&value) {
            Ok(ShareCode(value))
        } else {
            Err(ShareCodeError::Malformed(value))
        }
    }
}

impl From<ShareCode> for String {
    fn from(code: ShareCode) -> Self {
        code.0
    }
}

/// Derives the share code of an entity.
///
/// The encoded value is `entity_id * 1000 + REFERENCE_TIMESTAMP_MS % 1000`,
/// written in base58 after the `EK` prefix. The same id always yields the
/// same code and distinct ids never collide.
pub fn generate_share_code(entity_id: i64) -> Result<ShareCode, ShareCodeError> {
    if entity_id <= 0 {
        return Err(ShareCodeError::NonPositiveId(entity_id));
    }

    let combined = (entity_id as u64)
        .checked_mul(ID_MULTIPLIER)
        .and_then(|v| v.checked_add(reference_offset()))
        .ok_or(ShareCodeError::IdOutOfRange(entity_id))?;

    Ok(ShareCode(format!(
        "{}{}",
        SHARE_CODE_PREFIX,
        base58::encode(combined)
    )))
}

/// Cheap syntactic check run before any lookup.
///
/// Accepts exactly `^EK[1-9A-HJ-NP-Za-km-z]+$`. Says nothing about whether
/// an entity with this code exists.
pub fn is_valid_share_code(code: &str) -> bool {
    match code.strip_prefix(SHARE_CODE_PREFIX) {
        Some(suffix) => base58::is_base58(suffix),
        None => false,
    }
}

/// Inverse of [`generate_share_code`]
pub fn decode_share_code(code: &str) -> Result<i64, ShareCodeError> {
    if !is_valid_share_code(code) {
        return Err(ShareCodeError::Malformed(code.to_string()));
    }

    let not_issued = || ShareCodeError::NotIssued(code.to_string());

    let combined = base58::decode(&code[SHARE_CODE_PREFIX.len()..]).ok_or_else(not_issued)?;
    let scaled = combined
        .checked_sub(reference_offset())
        .filter(|v| v % ID_MULTIPLIER == 0)
        .ok_or_else(not_issued)?;

    // u64::MAX / 1000 always fits in an i64
    let id = (scaled / ID_MULTIPLIER) as i64;

    // Leading "1" symbols are zero digits, only the canonical spelling was issued
    match generate_share_code(id) {
        Ok(canonical) if canonical.as_str() == code => Ok(id),
        _ => Err(not_issued()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use fake::{Fake, Faker};

    use super::*;

    #[test]
    fn test_golden_codes() {
        assert_eq!(generate_share_code(9).unwrap().as_str(), "EK3gB");
        assert_eq!(generate_share_code(1).unwrap().as_str(), "EKJF");
        assert_eq!(generate_share_code(1000).unwrap().as_str(), "EK68GP");
    }

    #[test]
    fn test_reference_timestamp_is_2024_new_year() {
        let expected = chrono::DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .timestamp_millis();
        assert_eq!(REFERENCE_TIMESTAMP_MS, expected);
    }

    #[test]
    fn test_generation_is_deterministic() {
        for _ in 0..100 {
            let id: i64 = (1..i64::MAX / 1000).fake();
            assert_eq!(generate_share_code(id), generate_share_code(id));
        }
    }

    #[test]
    fn test_prefix_and_alphabet_closure() {
        for id in (1..2000).chain([i64::MAX / 1000, 58_i64.pow(5)]) {
            let code = generate_share_code(id).unwrap();
            let suffix = code.as_str().strip_prefix("EK").expect("missing prefix");
            assert!(!suffix.is_empty());
            assert!(suffix.bytes().all(|b| base58::ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_distinct_ids_give_distinct_codes() {
        let codes: HashSet<_> = (1..=10_000)
            .map(|id| generate_share_code(id).unwrap())
            .collect();
        assert_eq!(codes.len(), 10_000);
    }

    #[test]
    fn test_validator_accepts_generated_codes() {
        for _ in 0..200 {
            let id: i64 = (1..i64::MAX / 1000).fake();
            let code = generate_share_code(id).unwrap();
            assert!(is_valid_share_code(code.as_str()), "rejected {}", code);
        }
    }

    #[test]
    fn test_validator_rejects_malformed_input() {
        assert!(!is_valid_share_code(""));
        assert!(!is_valid_share_code("XK123"));
        assert!(!is_valid_share_code("EK"));
        assert!(!is_valid_share_code("EK0OIl"));
        assert!(!is_valid_share_code("ekAbc123"));
        assert!(!is_valid_share_code("EKAbc 123"));
        assert!(!is_valid_share_code(" EKAbc123"));
    }

    #[test]
    fn test_validator_accepts_in_alphabet_codes() {
        assert!(is_valid_share_code("EKAbc123"));
        assert!(is_valid_share_code("EK1"));
    }

    #[test]
    fn test_validator_never_panics_on_arbitrary_strings() {
        for _ in 0..500 {
            let s: String = Faker.fake();
            let _ = is_valid_share_code(&s);
            let _ = decode_share_code(&s);
        }
        let _ = is_valid_share_code("EKé日本");
    }

    #[test]
    fn test_non_positive_ids_are_rejected() {
        assert_eq!(generate_share_code(0), Err(ShareCodeError::NonPositiveId(0)));
        assert_eq!(
            generate_share_code(-7),
            Err(ShareCodeError::NonPositiveId(-7))
        );
    }

    #[test]
    fn test_oversized_ids_are_rejected() {
        assert_eq!(
            generate_share_code(i64::MAX),
            Err(ShareCodeError::IdOutOfRange(i64::MAX))
        );
        assert!(generate_share_code((u64::MAX / 1000) as i64).is_ok());
    }

    #[test]
    fn test_decode_recovers_entity_id() {
        for id in [1, 9, 42, 1000, 123_456_789, (u64::MAX / 1000) as i64] {
            let code = generate_share_code(id).unwrap();
            assert_eq!(decode_share_code(code.as_str()), Ok(id));
            assert_eq!(code.entity_id(), Ok(id));
        }
    }

    #[test]
    fn test_decode_rejects_codes_never_issued() {
        // zero-padded spelling of id 1, whose code is "EKJF"
        assert_eq!(decode_share_code("EKJF"), Ok(1));
        assert_eq!(
            decode_share_code("EK1JF"),
            Err(ShareCodeError::NotIssued("EK1JF".to_string()))
        );
        let padded: ShareCode = "EK113gB".parse().unwrap();
        assert!(matches!(
            padded.entity_id(),
            Err(ShareCodeError::NotIssued(_))
        ));

        // 9001 is not a multiple of 1000
        let stray = format!("EK{}", base58::encode(9001));
        assert_eq!(
            decode_share_code(&stray),
            Err(ShareCodeError::NotIssued(stray.clone()))
        );
        // zero id
        assert!(matches!(
            decode_share_code("EK1"),
            Err(ShareCodeError::NotIssued(_))
        ));
        assert!(matches!(
            decode_share_code("EK0"),
            Err(ShareCodeError::Malformed(_))
        ));
        let overflowing = format!("EK{}1", base58::encode(u64::MAX));
        assert!(matches!(
            decode_share_code(&overflowing),
            Err(ShareCodeError::NotIssued(_))
        ));
    }

    #[test]
    fn test_share_code_parsing_and_serde() {
        let code: ShareCode = "EK3gB".parse().unwrap();
        assert_eq!(code.to_string(), "EK3gB");
        assert!("XK3gB".parse::<ShareCode>().is_err());

        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"EK3gB\"");
        let back: ShareCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, code);
        assert!(serde_json::from_str::<ShareCode>("\"EK0\"").is_err());
    }

    #[test]
    fn test_share_url_joins_with_single_slash() {
        let code = generate_share_code(9).unwrap();
        assert_eq!(code.url("https://kb.example.com/s"), "https://kb.example.com/s/EK3gB");
        assert_eq!(code.url("https://kb.example.com/s/"), "https://kb.example.com/s/EK3gB");
    }
}
