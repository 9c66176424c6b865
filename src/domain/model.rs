use crate::utils::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Number of enumerated digits appended to the base prefix.
pub const SUFFIX_LEN: usize = 6;

/// A pinned suffix digit, written `index=digit` (e.g. `4=0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FixedDigit {
    pub index: usize,
    pub digit: u8,
}

impl FromStr for FixedDigit {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| ScanError::InvalidConfigValueError {
            field: "fixed_positions".to_string(),
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let (index, digit) = s
            .split_once('=')
            .ok_or_else(|| invalid("expected the form index=digit"))?;
        let index: usize = index
            .trim()
            .parse()
            .map_err(|_| invalid("index is not a number"))?;
        let digit: u8 = digit
            .trim()
            .parse()
            .map_err(|_| invalid("digit is not a number"))?;

        let fixed = Self { index, digit };
        fixed.check()?;
        Ok(fixed)
    }
}

impl FixedDigit {
    /// Index must address the suffix (0..=5), digit must be 0..=9.
    pub fn check(&self) -> Result<()> {
        let reason = if self.index >= SUFFIX_LEN {
            "index must be between 0 and 5"
        } else if self.digit > 9 {
            "digit must be between 0 and 9"
        } else {
            return Ok(());
        };
        Err(ScanError::InvalidConfigValueError {
            field: "fixed_positions".to_string(),
            value: self.to_string(),
            reason: reason.to_string(),
        })
    }
}

impl TryFrom<String> for FixedDigit {
    type Error = ScanError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<FixedDigit> for String {
    fn from(value: FixedDigit) -> Self {
        value.to_string()
    }
}

impl fmt::Display for FixedDigit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.index, self.digit)
    }
}

/// Suffix index -> pinned digit. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedPositions {
    pinned: BTreeMap<usize, u8>,
}

impl FixedPositions {
    /// Builds the map, rejecting out-of-range entries and an index pinned
    /// to two different digits.
    pub fn new(digits: &[FixedDigit]) -> Result<Self> {
        let mut pinned = BTreeMap::new();
        for fixed in digits {
            fixed.check()?;
            match pinned.insert(fixed.index, fixed.digit) {
                Some(previous) if previous != fixed.digit => {
                    return Err(ScanError::ConfigError {
                        message: format!(
                            "suffix position {} is pinned to both {} and {}",
                            fixed.index, previous, fixed.digit
                        ),
                    });
                }
                _ => {}
            }
        }
        Ok(Self { pinned })
    }

    pub fn get(&self, index: usize) -> Option<u8> {
        self.pinned.get(&index).copied()
    }

    pub fn len(&self) -> usize {
        self.pinned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pinned.is_empty()
    }

    /// Suffix indices left to enumerate, ascending.
    pub fn free_positions(&self) -> Vec<usize> {
        (0..SUFFIX_LEN)
            .filter(|i| !self.pinned.contains_key(i))
            .collect()
    }
}

impl fmt::Display for FixedPositions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .pinned
            .iter()
            .map(|(index, digit)| format!("{}={}", index, digit))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// Pacing and retry budget for one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub jitter_min: Duration,
    pub jitter_max: Duration,
    pub request_timeout: Duration,
    pub drain_passes: u32,
    pub drain_cooldown: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(1),
            jitter_min: Duration::from_millis(100),
            jitter_max: Duration::from_millis(500),
            request_timeout: Duration::from_secs(15),
            drain_passes: 3,
            drain_cooldown: Duration::from_secs(2),
        }
    }
}

/// JSON body sent to the availability endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MsisdnQuery {
    pub msisdn: String,
    pub brand: String,
    pub sim_category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Definitive response, number is free.
    Available,
    /// Definitive response, number is taken.
    Unavailable,
    /// Already in the checked set; no request was made.
    AlreadyKnown,
    /// Retry budget exhausted; the number sits in the retry queue.
    Deferred,
}

impl CheckOutcome {
    pub fn is_success(self) -> bool {
        !matches!(self, CheckOutcome::Deferred)
    }
}

#[derive(Debug, Clone)]
pub struct ScanSummary {
    pub total_candidates: u64,
    pub checked: usize,
    pub already_known: usize,
    pub available: Vec<String>,
    pub unresolved: Vec<String>,
    pub output_path: PathBuf,
    pub elapsed: Duration,
}

impl ScanSummary {
    pub fn found(&self) -> usize {
        self.available.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_digit_parse() {
        let fixed: FixedDigit = "4=0".parse().unwrap();
        assert_eq!(fixed, FixedDigit { index: 4, digit: 0 });
        assert_eq!(fixed.to_string(), "4=0");

        let spaced: FixedDigit = " 2 = 7 ".parse().unwrap();
        assert_eq!(spaced, FixedDigit { index: 2, digit: 7 });
    }

    #[test]
    fn test_fixed_digit_rejects_out_of_range() {
        assert!("6=0".parse::<FixedDigit>().is_err());
        assert!("0=10".parse::<FixedDigit>().is_err());
        assert!("0".parse::<FixedDigit>().is_err());
        assert!("a=1".parse::<FixedDigit>().is_err());
    }

    #[test]
    fn test_fixed_positions_conflict() {
        let digits = [
            FixedDigit { index: 4, digit: 0 },
            FixedDigit { index: 4, digit: 1 },
        ];
        assert!(FixedPositions::new(&digits).is_err());

        let repeated = [
            FixedDigit { index: 4, digit: 0 },
            FixedDigit { index: 4, digit: 0 },
        ];
        let positions = FixedPositions::new(&repeated).unwrap();
        assert_eq!(positions.len(), 1);
    }

    #[test]
    fn test_fixed_positions_rejects_out_of_range_fields() {
        let bad_index = [FixedDigit { index: 9, digit: 0 }];
        assert!(matches!(
            FixedPositions::new(&bad_index),
            Err(ScanError::InvalidConfigValueError { .. })
        ));

        let bad_digit = [FixedDigit { index: 2, digit: 12 }];
        assert!(FixedPositions::new(&bad_digit).is_err());

        let overflowing = [FixedDigit { index: 0, digit: 250 }];
        assert!(FixedPositions::new(&overflowing).is_err());

        // 最多只能釘住 6 個位置
        let seven: Vec<FixedDigit> = (0..7).map(|index| FixedDigit { index, digit: 1 }).collect();
        assert!(FixedPositions::new(&seven).is_err());
    }

    #[test]
    fn test_free_positions() {
        let digits = [
            FixedDigit { index: 5, digit: 0 },
            FixedDigit { index: 1, digit: 3 },
        ];
        let positions = FixedPositions::new(&digits).unwrap();
        assert_eq!(positions.free_positions(), vec![0, 2, 3, 4]);
        assert_eq!(positions.get(1), Some(3));
        assert_eq!(positions.get(0), None);
        assert_eq!(positions.to_string(), "{1=3, 5=0}");
    }

    #[test]
    fn test_query_serializes_camel_case() {
        let query = MsisdnQuery {
            msisdn: "8801886000000".to_string(),
            brand: "ROBI".to_string(),
            sim_category: "PREPAID".to_string(),
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "msisdn": "8801886000000",
                "brand": "ROBI",
                "simCategory": "PREPAID"
            })
        );
    }
}
