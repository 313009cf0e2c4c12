//! Register field descriptors and the wire-level field codec
//!
//! The binary device family stores every logical quantity as fixed-width
//! big-endian register fields. The encodings are not self-describing: the
//! same quantity lives at different addresses, widths, and scale factors
//! depending on hardware generation, and the all-ones bit pattern at a
//! field's width is the protocol's "no value" sentinel.
//!
//! Whether that sentinel means "zero" or "unsupported" is an explicit
//! per-field attribute ([`SentinelPolicy`]), never inferred from context:
//! a sentinel in a scalar headline field at probe time means the capability
//! is absent, while the same pattern in a per-phase field during normal
//! operation means that phase reads zero.

use crate::error::{EvseError, EvseResult};
use bytes::Buf;

/// Interpretation of the all-ones sentinel for one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentinelPolicy {
    /// The raw value is always data.
    None,
    /// The sentinel decodes to exactly zero (per-phase fields).
    TreatMaxAsZero,
    /// The sentinel marks the operation unsupported; the prober checks it
    /// via [`RegisterField::is_unsupported`], it is never returned as data.
    TreatMaxAsUnsupported,
}

/// Descriptor of one wire field: address, width, scale divisor, sentinel policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegisterField {
    /// Register address
    pub address: u16,
    /// Width in 16-bit registers
    pub words: u16,
    /// Scale divisor applied after integer decoding (floating-point division)
    pub divisor: f64,
    /// Sentinel interpretation for this field
    pub sentinel: SentinelPolicy,
}

impl RegisterField {
    /// Create a field descriptor
    pub const fn new(address: u16, words: u16, divisor: f64, sentinel: SentinelPolicy) -> Self {
        Self {
            address,
            words,
            divisor,
            sentinel,
        }
    }

    /// Expected payload length in bytes
    pub const fn byte_len(&self) -> usize {
        self.words as usize * 2
    }

    /// Maximum representable unsigned value at this field's width
    ///
    /// Only meaningful for scalar widths (1 or 2 registers).
    pub const fn max_raw(&self) -> u64 {
        match self.words {
            1 => u16::MAX as u64,
            _ => u32::MAX as u64,
        }
    }

    /// Whether a raw value is the unsupported-sentinel for this field
    pub fn is_unsupported(&self, raw: u64) -> bool {
        self.sentinel == SentinelPolicy::TreatMaxAsUnsupported && raw == self.max_raw()
    }

    /// Decode the raw unsigned integer for a scalar field (1 or 2 registers)
    pub fn raw(&self, data: &[u8]) -> EvseResult<u64> {
        match self.words {
            1 => Ok(be_u16(data)? as u64),
            2 => Ok(be_u32(data)? as u64),
            n => Err(EvseError::InvalidData(format!(
                "field at {} is {} registers wide, not a scalar",
                self.address, n
            ))),
        }
    }

    /// Decode a scalar field into a domain value
    ///
    /// Applies the scale divisor after integer decoding. With
    /// [`SentinelPolicy::TreatMaxAsZero`] the sentinel decodes to exactly
    /// `0`, not the sentinel's numeric magnitude.
    pub fn decode(&self, data: &[u8]) -> EvseResult<f64> {
        let raw = self.raw(data)?;
        if self.sentinel == SentinelPolicy::TreatMaxAsZero && raw == self.max_raw() {
            return Ok(0.0);
        }
        Ok(raw as f64 / self.divisor)
    }

    /// Decode a three-phase field (three consecutive 32-bit values)
    ///
    /// Each phase applies this field's divisor and sentinel policy
    /// independently.
    pub fn decode_triplet(&self, data: &[u8]) -> EvseResult<[f64; 3]> {
        if data.len() < 12 {
            return Err(EvseError::InvalidData(format!(
                "phase block at {} needs 12 bytes, got {}",
                self.address,
                data.len()
            )));
        }
        let mut values = [0.0; 3];
        for (phase, value) in values.iter_mut().enumerate() {
            let raw = be_u32(&data[4 * phase..])?;
            *value = if self.sentinel == SentinelPolicy::TreatMaxAsZero && raw == u32::MAX {
                0.0
            } else {
                raw as f64 / self.divisor
            };
        }
        Ok(values)
    }
}

/// Decode a big-endian u16 from the start of a buffer
pub fn be_u16(data: &[u8]) -> EvseResult<u16> {
    if data.len() < 2 {
        return Err(EvseError::InvalidData(format!(
            "short register block: {} bytes",
            data.len()
        )));
    }
    let mut buf = data;
    Ok(buf.get_u16())
}

/// Decode a big-endian u32 from the start of a buffer
pub fn be_u32(data: &[u8]) -> EvseResult<u32> {
    if data.len() < 4 {
        return Err(EvseError::InvalidData(format!(
            "short register block: {} bytes",
            data.len()
        )));
    }
    let mut buf = data;
    Ok(buf.get_u32())
}

/// Decode an ASCII identifier block into a trimmed string
///
/// Identifier registers are NUL-padded ASCII; trailing padding and
/// whitespace are stripped. An empty result is a valid "no identifier"
/// value, not an error.
pub fn block_string(data: &[u8]) -> String {
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    String::from_utf8_lossy(&data[..end]).trim().to_string()
}
