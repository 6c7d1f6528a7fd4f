//! Human-shareable tracking identifier issued when a fee payment is confirmed.
//!
//! Format: `PRCL-<YYYYMMDD>-<6 uppercase hex>`, where the date is the UTC
//! confirmation date and the suffix encodes three random bytes.

use chrono::NaiveDate;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{Timestamp, ValidationError};

const PREFIX: &str = "PRCL";
const DATE_FORMAT: &str = "%Y%m%d";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TrackingId(String);

impl TrackingId {
    /// Generates a tracking id for today using the thread-local RNG.
    pub fn generate() -> Self {
        Self::generate_at(Timestamp::now().date(), &mut rand::thread_rng())
    }

    /// Generates a tracking id for `date` drawing the suffix from `rng`.
    pub fn generate_at<R: RngCore + ?Sized>(date: NaiveDate, rng: &mut R) -> Self {
        let mut suffix = [0u8; 3];
        rng.fill_bytes(&mut suffix);
        Self(format!(
            "{}-{}-{}",
            PREFIX,
            date.format(DATE_FORMAT),
            hex::encode_upper(suffix)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Calendar date embedded in the id.
    pub fn date(&self) -> Option<NaiveDate> {
        let date = self.0.split('-').nth(1)?;
        NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
    }
}

impl FromStr for TrackingId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::invalid_format("trackingId", reason);

        let mut parts = s.split('-');
        let (Some(prefix), Some(date), Some(suffix), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid("expected PRCL-YYYYMMDD-XXXXXX"));
        };

        if prefix != PREFIX {
            return Err(invalid("unknown prefix"));
        }
        if date.len() != 8 || NaiveDate::parse_from_str(date, DATE_FORMAT).is_err() {
            return Err(invalid("date segment is not YYYYMMDD"));
        }
        let upper_hex = |c: char| c.is_ascii_digit() || ('A'..='F').contains(&c);
        if suffix.len() != 6 || !suffix.chars().all(upper_hex) {
            return Err(invalid("suffix is not six uppercase hex digits"));
        }

        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for TrackingId {
    type Error = ValidationError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<TrackingId> for String {
    fn from(id: TrackingId) -> Self {
        id.0
    }
}

impl fmt::Display for TrackingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{any, prop_assert, prop_assert_eq, proptest};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    /// Repeats a fixed byte pattern.
    struct FixedBytes(Vec<u8>);

    impl RngCore for FixedBytes {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for (slot, byte) in dest.iter_mut().zip(self.0.iter().cycle()) {
                *slot = *byte;
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    fn new_year() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn generate_at_formats_date_and_suffix() {
        let id = TrackingId::generate_at(new_year(), &mut FixedBytes(vec![0xAB, 0xCD, 0xEF]));
        assert_eq!(id.as_str(), "PRCL-20240101-ABCDEF");
        assert_eq!(id.date(), Some(new_year()));
    }

    #[test]
    fn generated_ids_parse_back() {
        let id = TrackingId::generate();
        let parsed: TrackingId = id.as_str().parse().unwrap();
        assert_eq!(parsed, id);
        assert_eq!(id.date(), Some(Timestamp::now().date()));
    }

    #[test]
    fn generated_ids_are_distinct() {
        let mut rng = StdRng::seed_from_u64(7);
        let ids: HashSet<_> = (0..200)
            .map(|_| TrackingId::generate_at(new_year(), &mut rng))
            .collect();
        assert!(ids.len() > 195);
    }

    #[test]
    fn rejects_malformed_values() {
        for bad in [
            "",
            "PRCL-20240101",
            "PRCL-20240101-abcdef",
            "PRCL-20241301-ABCDEF",
            "PRCL-2024011-ABCDEF0",
            "TRK-20240101-ABCDEF",
            "PRCL-20240101-ABCDEF-1",
            "PRCL-20240101-ABCDEG",
        ] {
            assert!(bad.parse::<TrackingId>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn serde_validates_format() {
        let json = "\"PRCL-20240101-0A1B2C\"";
        let id: TrackingId = serde_json::from_str(json).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), json);
        assert!(serde_json::from_str::<TrackingId>("\"PRCL-x\"").is_err());
    }

    proptest! {
        #[test]
        fn any_seed_and_date_yield_valid_ids(seed in any::<u64>(), days in 0i64..40_000) {
            let date = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap() + chrono::Duration::days(days);
            let id = TrackingId::generate_at(date, &mut StdRng::seed_from_u64(seed));
            prop_assert!(id.as_str().parse::<TrackingId>().is_ok());
            prop_assert_eq!(id.as_str().len(), "PRCL-20240101-ABCDEF".len());
            prop_assert_eq!(id.date(), Some(date));
        }
    }
}
