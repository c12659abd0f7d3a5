use std::{error::Error, fmt::Display};

use crate::types::{domain_name::DomainName, label::LabelError};

/// Every variant records the byte offset where the fault was detected.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum ReadWireError {
    Truncated { offset: usize, needed: usize, remaining: usize },
    OutOfBounds { offset: usize, wire_len: usize },
    LabelOverrun { offset: usize, length: u8, remaining: usize },
    ReservedLabelType { offset: usize, octet: u8 },
    ForwardPointer { offset: usize, pointer: u16, limit: usize },
    LongDomain { offset: usize, octets: usize },
    Label { offset: usize, error: LabelError },
}

impl ReadWireError {
    #[inline]
    pub fn offset(&self) -> usize {
        match self {
            Self::Truncated { offset, .. }
          | Self::OutOfBounds { offset, .. }
          | Self::LabelOverrun { offset, .. }
          | Self::ReservedLabelType { offset, .. }
          | Self::ForwardPointer { offset, .. }
          | Self::LongDomain { offset, .. }
          | Self::Label { offset, .. } => *offset,
        }
    }
}

impl Error for ReadWireError {}
impl Display for ReadWireError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Truncated { offset, needed, remaining } => write!(f, "Read Wire Truncated at offset {offset}: needed {needed} more byte(s) but only {remaining} remain"),
            Self::OutOfBounds { offset, wire_len } => write!(f, "Read Wire Out Of Bounds: offset {offset} is past the end of the {wire_len} byte wire"),
            Self::LabelOverrun { offset, length, remaining } => write!(f, "Read Wire Label Overrun at offset {offset}: length byte {length} exceeds the {remaining} byte(s) remaining"),
            Self::ReservedLabelType { offset, octet } => write!(f, "Read Wire Reserved Label Type at offset {offset}: length byte 0x{octet:02x} uses the reserved 0b01 or 0b10 prefix"),
            Self::ForwardPointer { offset, pointer, limit } => write!(f, "Read Wire Forward Pointer at offset {offset}: pointer to {pointer} must be below {limit}; pointers can only point backwards"),
            Self::LongDomain { offset, octets } => write!(f, "Read Wire Long Domain at offset {offset}: decoded name reached {octets} octets, the maximum is {}", DomainName::MAX_OCTETS),
            Self::Label { offset, error } => write!(f, "Read Wire Label Error at offset {offset}: {error}"),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ReadWire<'a> {
    wire: &'a [u8],
    offset: usize,
}

impl<'a> ReadWire<'a> {
    #[inline]
    pub fn from_bytes(wire: &'a [u8]) -> Self {
        Self {
            wire: wire,
            offset: 0,
        }
    }

    #[inline]
    pub fn current_state_len(&self) -> usize {
        self.wire.len() - self.offset
    }

    #[inline]
    pub fn current_offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn wire_len(&self) -> usize {
        self.wire.len()
    }

    #[inline]
    pub fn is_end_reached(&self) -> bool {
        self.offset >= self.wire.len()
    }

    #[inline]
    pub fn set_offset(&mut self, offset: usize) -> Result<(), ReadWireError> {
        if self.wire.len() < offset {
            return Err(ReadWireError::OutOfBounds { offset, wire_len: self.wire.len() });
        } else {
            self.offset = offset;
            return Ok(());
        }
    }

    #[inline]
    pub fn shift(&mut self, shift: usize) -> Result<(), ReadWireError> {
        if self.current_state_len() < shift {
            return Err(ReadWireError::Truncated { offset: self.offset, needed: shift, remaining: self.current_state_len() });
        } else {
            self.offset += shift;
            return Ok(());
        }
    }

    /// Consumes the next `length` bytes.
    #[inline]
    pub fn take(&mut self, length: usize) -> Result<&'a [u8], ReadWireError> {
        let start = self.offset;
        self.shift(length)?;
        Ok(&self.wire[start..self.offset])
    }
}
