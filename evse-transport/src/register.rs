//! Register transport trait for the binary device family

use async_trait::async_trait;
use evse_core::EvseResult;

/// Block-oriented register access against one device
///
/// One connection serves one device; callers must not issue concurrent
/// operations against the same transport without external serialization
/// (the connection is not assumed reentrant).
#[async_trait]
pub trait RegisterTransport: Send + Sync {
    /// Read `words` consecutive 16-bit registers starting at `address`
    ///
    /// Returns the raw big-endian payload (`2 * words` bytes).
    async fn read_block(&mut self, address: u16, words: u16) -> EvseResult<Vec<u8>>;

    /// Write consecutive registers starting at `address`
    ///
    /// `data` is the raw big-endian payload; its length must be even.
    async fn write_block(&mut self, address: u16, data: &[u8]) -> EvseResult<()>;
}
