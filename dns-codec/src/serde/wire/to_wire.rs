// https://www.rfc-editor.org/rfc/rfc1035#section-4.1.4
//
// When serializing and deserializing, recall that network order is defined to be Big Endian.
// Therefore, all data output by serialization must be Big Endian.

use std::net::Ipv4Addr;

use log::trace;
use ux::u14;

use crate::{serde::const_byte_counts::*, types::{domain_name::DomainName, label::Label}};

use super::{compression_map::CompressionMap, write_wire::{WriteWire, WriteWireError}};

pub trait ToWire {
    fn to_wire_format<'a, 'b>(&self, wire: &'b mut WriteWire<'a>, compression: &mut Option<CompressionMap>) -> Result<(), WriteWireError> where 'a: 'b;
    /// Uncompressed length of the serialized value.
    fn serial_length(&self) -> usize;
}

// #################### BUILT-IN PRIMITIVE TYPES ####################

macro_rules! int_to_wire_impl {
    ($int_type:ty, $byte_count:ident) => {
        impl ToWire for $int_type {
            #[inline]
            fn to_wire_format<'a, 'b>(&self, wire: &'b mut WriteWire<'a>, _compression: &mut Option<CompressionMap>) -> Result<(), WriteWireError> where 'a: 'b {
                wire.write_bytes(&self.to_be_bytes())
            }

            #[inline]
            fn serial_length(&self) -> usize {
                $byte_count
            }
        }
    }
}

int_to_wire_impl!(u8,  U8_BYTE_COUNT);
int_to_wire_impl!(u16, U16_BYTE_COUNT);

// #################### OTHER COMMON TYPES ####################

impl<T: ToWire> ToWire for Vec<T> {
    #[inline]
    fn to_wire_format<'a, 'b>(&self, wire: &'b mut WriteWire<'a>, compression: &mut Option<CompressionMap>) -> Result<(), WriteWireError> where 'a: 'b {
        for x in self {
            x.to_wire_format(wire, compression)?;
        }
        Ok(())
    }

    #[inline]
    fn serial_length(&self) -> usize {
        self.iter().map(|x| x.serial_length()).sum()
    }
}

impl ToWire for Ipv4Addr {
    #[inline]
    fn to_wire_format<'a, 'b>(&self, wire: &'b mut WriteWire<'a>, _compression: &mut Option<CompressionMap>) -> Result<(), WriteWireError> where 'a: 'b {
        wire.write_bytes(&self.octets())
    }

    #[inline]
    fn serial_length(&self) -> usize {
        IPV4_BYTE_COUNT
    }
}

// #################### DOMAIN NAMES ####################

/// Two octets with the top two bits set. The remaining 14 bits are the offset
/// of an earlier copy of the rest of the name.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct CompressionPointer(pub u14);

impl CompressionPointer {
    pub const MARKER: u16 = 0b1100_0000_0000_0000;

    #[inline]
    pub fn offset(&self) -> u16 {
        u16::from(self.0)
    }
}

impl ToWire for CompressionPointer {
    #[inline]
    fn to_wire_format<'a, 'b>(&self, wire: &'b mut WriteWire<'a>, compression: &mut Option<CompressionMap>) -> Result<(), WriteWireError> where 'a: 'b {
        (Self::MARKER | self.offset()).to_wire_format(wire, compression)
    }

    #[inline]
    fn serial_length(&self) -> usize {
        POINTER_BYTE_COUNT
    }
}

impl ToWire for Label {
    #[inline]
    fn to_wire_format<'a, 'b>(&self, wire: &'b mut WriteWire<'a>, compression: &mut Option<CompressionMap>) -> Result<(), WriteWireError> where 'a: 'b {
        // Labels are capped at 63 octets, so the length always fits with the top two bits clear.
        (self.len() as u8).to_wire_format(wire, compression)?;
        wire.write_bytes(self.octets())
    }

    #[inline]
    fn serial_length(&self) -> usize {
        self.wire_len()
    }
}

impl ToWire for DomainName {
    /// Without a compression map every label is written literally, followed by
    /// the root label.
    ///
    /// With a map, the suffixes of the name are tried longest first. At the
    /// first suffix that was already written, the labels before it are written
    /// literally and a pointer to the earlier copy ends the name. Every suffix
    /// written literally is recorded at its offset so later names can point
    /// at it.
    fn to_wire_format<'a, 'b>(&self, wire: &'b mut WriteWire<'a>, compression: &mut Option<CompressionMap>) -> Result<(), WriteWireError> where 'a: 'b {
        let octets = self.wire_len();
        if octets > Self::MAX_OCTETS {
            return Err(WriteWireError::LongDomain { domain: self.to_string(), octets });
        }

        let labels = self.labels();
        match compression {
            Some(compression_map) => {
                let (literal_labels, pointer) = match self.suffixes()
                    .enumerate()
                    .find_map(|(index, suffix)| Some((index, compression_map.find_from_slice_labels(suffix)?)))
                {
                    Some((index, pointer)) => (&labels[..index], Some(CompressionPointer(pointer))),
                    None => (labels, None),
                };

                for (index, label) in literal_labels.iter().enumerate() {
                    compression_map.insert_slice_labels(&labels[index..], wire.current_len());
                    label.to_wire_format(wire, &mut None)?;
                }

                match pointer {
                    Some(pointer) => {
                        trace!(offset = wire.current_len(), pointer = pointer.offset(); "Compressed suffix of '{self}'");
                        pointer.to_wire_format(wire, &mut None)
                    },
                    None => 0_u8.to_wire_format(wire, &mut None),
                }
            },
            None => {
                for label in labels {
                    label.to_wire_format(wire, &mut None)?;
                }
                0_u8.to_wire_format(wire, &mut None)
            },
        }
    }

    #[inline]
    fn serial_length(&self) -> usize {
        self.wire_len()
    }
}
