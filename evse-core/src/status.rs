//! Canonical charge status and the data-driven status mapper
//!
//! Devices report charge-point state as small integer codes whose meaning
//! varies per family. The mapping from raw code to canonical status is a
//! table, not control flow: a new device family only needs a new table.

use crate::error::{EvseError, EvseResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical charge status (IEC 61851 style)
///
/// - `A`: no vehicle connected
/// - `B`: vehicle connected, not charging
/// - `C`: charging
/// - `None`: not yet determined / error state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChargeStatus {
    #[default]
    None,
    A,
    B,
    C,
}

impl fmt::Display for ChargeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChargeStatus::None => write!(f, "-"),
            ChargeStatus::A => write!(f, "A"),
            ChargeStatus::B => write!(f, "B"),
            ChargeStatus::C => write!(f, "C"),
        }
    }
}

/// Table-driven mapper from device status codes to [`ChargeStatus`]
///
/// Multiple raw codes may alias to the same canonical status. Codes outside
/// the table fail with [`EvseError::InvalidStatus`]; the mapping is total on
/// its declared domain and closed otherwise.
#[derive(Debug, Clone, Copy)]
pub struct StatusTable {
    entries: &'static [(u16, ChargeStatus)],
}

impl StatusTable {
    /// Create a status table from static entries
    pub const fn new(entries: &'static [(u16, ChargeStatus)]) -> Self {
        Self { entries }
    }

    /// Map a raw status code to its canonical status
    ///
    /// # Errors
    /// Returns [`EvseError::InvalidStatus`] for codes not in the table.
    pub fn map(&self, code: u16) -> EvseResult<ChargeStatus> {
        self.entries
            .iter()
            .find(|(raw, _)| *raw == code)
            .map(|(_, status)| *status)
            .ok_or(EvseError::InvalidStatus(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: StatusTable = StatusTable::new(&[
        (1, ChargeStatus::A),
        (2, ChargeStatus::B),
        (3, ChargeStatus::C),
        (4, ChargeStatus::C),
    ]);

    #[test]
    fn test_known_codes() {
        assert_eq!(TABLE.map(1).unwrap(), ChargeStatus::A);
        assert_eq!(TABLE.map(2).unwrap(), ChargeStatus::B);
        assert_eq!(TABLE.map(3).unwrap(), ChargeStatus::C);
        assert_eq!(TABLE.map(4).unwrap(), ChargeStatus::C);
    }

    #[test]
    fn test_unknown_code_fails() {
        for code in [0u16, 5, 42, u16::MAX] {
            match TABLE.map(code) {
                Err(EvseError::InvalidStatus(c)) => assert_eq!(c, code),
                other => panic!("expected InvalidStatus, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(ChargeStatus::A.to_string(), "A");
        assert_eq!(ChargeStatus::None.to_string(), "-");
    }
}
