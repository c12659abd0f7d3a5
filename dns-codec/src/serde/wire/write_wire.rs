use std::{error::Error, fmt::Display};

use crate::types::domain_name::DomainName;

use super::read_wire::ReadWire;

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum WriteWireError {
    OverflowError(String),
    LongDomain { domain: String, octets: usize },
}

impl Error for WriteWireError {}
impl Display for WriteWireError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OverflowError(error) => write!(f, "Write Wire Overflow Error: {error}"),
            Self::LongDomain { domain, octets } => write!(
                f,
                "Write Wire Long Domain: '{domain}' needs {octets} wire-format octets, the maximum is {}",
                DomainName::MAX_OCTETS
            ),
        }
    }
}

/// A fixed-size output buffer. Writers append to it and it refuses to grow
/// past the slice it was given.
#[derive(PartialEq, Eq, Hash, Debug)]
pub struct WriteWire<'a> {
    wire: &'a mut [u8],
    offset: usize,
}

impl<'a> WriteWire<'a> {
    #[inline]
    pub fn from_bytes(wire: &'a mut [u8]) -> Self {
        Self { wire, offset: 0 }
    }

    #[inline]
    pub fn current_len(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn remaining_len(&self) -> usize {
        self.wire.len() - self.current_len()
    }

    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), WriteWireError> {
        if bytes.len() > self.remaining_len() {
            return Err(WriteWireError::OverflowError(format!(
                "tried to write {} bytes at offset {} past the end of the {} byte WriteWire buffer",
                bytes.len(), self.offset, self.wire.len(),
            )));
        }

        self.wire[self.offset..(self.offset + bytes.len())].copy_from_slice(bytes);
        self.offset += bytes.len();

        return Ok(());
    }

    #[inline]
    pub fn write_byte(&mut self, byte: u8) -> Result<(), WriteWireError> {
        self.write_bytes(&[byte])
    }

    #[inline]
    pub fn current(&self) -> &[u8] {
        &self.wire[..self.offset]
    }

    #[inline]
    pub fn as_read_wire(&self) -> ReadWire<'_> {
        ReadWire::from_bytes(&self.wire[..self.offset])
    }
}
