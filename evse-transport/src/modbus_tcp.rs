//! Modbus-TCP register transport
//!
//! Implements [`RegisterTransport`] over a TCP stream using the MBAP
//! framing and function codes 0x03 (Read Holding Registers) and 0x10
//! (Write Multiple Registers).
//!
//! # Frame layout
//!
//! ```text
//! | txn id (2) | protocol 0x0000 (2) | length (2) | unit id (1) | PDU |
//! ```
//!
//! The length field counts the unit id plus the PDU.

use crate::register::RegisterTransport;
use async_trait::async_trait;
use bytes::{Buf, BufMut, BytesMut};
use evse_core::{EvseError, EvseResult};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

const MBAP_HEADER_LEN: usize = 7;
const FN_READ_HOLDING: u8 = 0x03;
const FN_WRITE_MULTIPLE: u8 = 0x10;

/// Modbus-TCP transport settings
#[derive(Debug, Clone)]
pub struct ModbusTcpSettings {
    pub address: SocketAddr,
    pub unit_id: u8,
    pub timeout: Option<Duration>,
}

impl ModbusTcpSettings {
    /// Create settings with the default unit id (255) and a 10s timeout
    pub fn new(address: SocketAddr) -> Self {
        Self {
            address,
            unit_id: 255,
            timeout: Some(Duration::from_secs(10)),
        }
    }

    /// Set the unit (slave) id
    pub fn with_unit_id(mut self, unit_id: u8) -> Self {
        self.unit_id = unit_id;
        self
    }

    /// Set the per-operation timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Modbus-TCP transport implementation
#[derive(Debug)]
pub struct ModbusTcpTransport {
    stream: Option<TcpStream>,
    settings: ModbusTcpSettings,
    transaction: u16,
    closed: bool,
}

impl ModbusTcpTransport {
    /// Create a new, unopened transport
    pub fn new(settings: ModbusTcpSettings) -> Self {
        Self {
            stream: None,
            settings,
            transaction: 0,
            closed: true,
        }
    }

    /// Create a transport from an address string ("host:port")
    pub fn from_address(address: &str, unit_id: u8) -> EvseResult<Self> {
        let addr: SocketAddr = address
            .parse()
            .map_err(|e| EvseError::InvalidData(format!("Invalid TCP address: {}", e)))?;
        Ok(Self::new(ModbusTcpSettings::new(addr).with_unit_id(unit_id)))
    }

    /// Open the TCP connection
    pub async fn open(&mut self) -> EvseResult<()> {
        if !self.closed {
            return Err(EvseError::Connection(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Connection has already been opened",
            )));
        }

        let stream = if let Some(timeout) = self.settings.timeout {
            tokio::time::timeout(timeout, TcpStream::connect(self.settings.address))
                .await
                .map_err(|_| EvseError::Timeout)?
                .map_err(EvseError::Connection)?
        } else {
            TcpStream::connect(self.settings.address)
                .await
                .map_err(EvseError::Connection)?
        };

        log::debug!("modbus connected to {}", self.settings.address);
        self.stream = Some(stream);
        self.closed = false;
        Ok(())
    }

    /// Close the connection
    pub async fn close(&mut self) -> EvseResult<()> {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.shutdown().await;
        }
        self.closed = true;
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Issue one request PDU and return the response PDU (function byte on)
    async fn transact(&mut self, pdu: &[u8]) -> EvseResult<Vec<u8>> {
        let timeout = self.settings.timeout;
        let unit_id = self.settings.unit_id;
        self.transaction = self.transaction.wrapping_add(1);
        let txn = self.transaction;

        let stream = self.stream.as_mut().ok_or_else(|| {
            EvseError::Connection(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "Modbus stream not connected",
            ))
        })?;

        let frame = encode_frame(txn, unit_id, pdu);
        let result = Self::exchange(stream, timeout, &frame).await;
        match result {
            Ok((resp_txn, resp_unit, body)) => {
                if resp_txn != txn || resp_unit != unit_id {
                    self.closed = true;
                    return Err(EvseError::Protocol(format!(
                        "transaction mismatch: sent {}/{}, got {}/{}",
                        txn, unit_id, resp_txn, resp_unit
                    )));
                }
                check_exception(pdu[0], &body)?;
                Ok(body)
            }
            Err(e) => {
                self.closed = true;
                Err(e)
            }
        }
    }

    async fn exchange(
        stream: &mut TcpStream,
        timeout: Option<Duration>,
        frame: &[u8],
    ) -> EvseResult<(u16, u8, Vec<u8>)> {
        let io = async {
            stream.write_all(frame).await?;
            let mut header = [0u8; MBAP_HEADER_LEN];
            stream.read_exact(&mut header).await?;
            let (txn, unit, body_len) = parse_header(&header)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            let mut body = vec![0u8; body_len];
            stream.read_exact(&mut body).await?;
            Ok::<_, std::io::Error>((txn, unit, body))
        };

        if let Some(timeout) = timeout {
            tokio::time::timeout(timeout, io)
                .await
                .map_err(|_| EvseError::Timeout)?
                .map_err(EvseError::Connection)
        } else {
            io.await.map_err(EvseError::Connection)
        }
    }
}

#[async_trait]
impl RegisterTransport for ModbusTcpTransport {
    async fn read_block(&mut self, address: u16, words: u16) -> EvseResult<Vec<u8>> {
        let mut pdu = BytesMut::with_capacity(5);
        pdu.put_u8(FN_READ_HOLDING);
        pdu.put_u16(address);
        pdu.put_u16(words);

        let body = self.transact(&pdu).await?;
        parse_read_response(&body, words)
    }

    async fn write_block(&mut self, address: u16, data: &[u8]) -> EvseResult<()> {
        if data.is_empty() || data.len() % 2 != 0 {
            return Err(EvseError::InvalidData(format!(
                "write payload must be a whole number of registers, got {} bytes",
                data.len()
            )));
        }
        let words = (data.len() / 2) as u16;
        let mut pdu = BytesMut::with_capacity(6 + data.len());
        pdu.put_u8(FN_WRITE_MULTIPLE);
        pdu.put_u16(address);
        pdu.put_u16(words);
        pdu.put_u8(data.len() as u8);
        pdu.put_slice(data);

        let body = self.transact(&pdu).await?;
        parse_write_response(&body, address, words)
    }
}

fn encode_frame(txn: u16, unit_id: u8, pdu: &[u8]) -> Vec<u8> {
    let mut frame = BytesMut::with_capacity(MBAP_HEADER_LEN + pdu.len());
    frame.put_u16(txn);
    frame.put_u16(0); // protocol id
    frame.put_u16((pdu.len() + 1) as u16);
    frame.put_u8(unit_id);
    frame.put_slice(pdu);
    frame.to_vec()
}

/// Parse an MBAP header, returning (transaction, unit id, remaining body length)
fn parse_header(header: &[u8; MBAP_HEADER_LEN]) -> Result<(u16, u8, usize), String> {
    let mut buf = &header[..];
    let txn = buf.get_u16();
    let protocol = buf.get_u16();
    let length = buf.get_u16() as usize;
    let unit = buf.get_u8();
    if protocol != 0 {
        return Err(format!("unexpected protocol id {}", protocol));
    }
    if length < 2 {
        return Err(format!("frame length {} too short", length));
    }
    Ok((txn, unit, length - 1))
}

fn check_exception(request_fn: u8, body: &[u8]) -> EvseResult<()> {
    match body {
        [code, exception, ..] if *code == request_fn | 0x80 => Err(EvseError::Protocol(format!(
            "modbus exception {:#04x} for function {:#04x}",
            exception, request_fn
        ))),
        [code, ..] if *code != request_fn => Err(EvseError::Protocol(format!(
            "function code mismatch: sent {:#04x}, got {:#04x}",
            request_fn, code
        ))),
        [] => Err(EvseError::Protocol("empty response body".to_string())),
        _ => Ok(()),
    }
}

fn parse_read_response(body: &[u8], words: u16) -> EvseResult<Vec<u8>> {
    if body.len() < 2 {
        return Err(EvseError::Protocol("truncated read response".to_string()));
    }
    let byte_count = body[1] as usize;
    let payload = &body[2..];
    if payload.len() < byte_count || byte_count != words as usize * 2 {
        return Err(EvseError::Protocol(format!(
            "read response carries {} bytes, expected {}",
            byte_count,
            words * 2
        )));
    }
    Ok(payload[..byte_count].to_vec())
}

fn parse_write_response(body: &[u8], address: u16, words: u16) -> EvseResult<()> {
    if body.len() < 5 {
        return Err(EvseError::Protocol("truncated write response".to_string()));
    }
    let mut buf = &body[1..];
    let echo_address = buf.get_u16();
    let echo_words = buf.get_u16();
    if echo_address != address || echo_words != words {
        return Err(EvseError::Protocol(format!(
            "write echo mismatch: sent {}/{}, got {}/{}",
            address, words, echo_address, echo_words
        )));
    }
    Ok(())
}
