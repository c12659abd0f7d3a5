// https://www.rfc-editor.org/rfc/rfc1035#section-4.1.4
//
// When serializing and deserializing, recall that network order is defined to be Big Endian.
// All data input to a deserializer must be Big Endian.

use std::net::Ipv4Addr;

use log::debug;

use crate::{serde::const_byte_counts::*, types::{domain_name::DomainName, label::Label}};

use super::read_wire::{ReadWire, ReadWireError};

pub trait FromWire {
    fn from_wire_format<'a, 'b>(wire: &'b mut ReadWire<'a>) -> Result<Self, ReadWireError> where Self: Sized, 'a: 'b;
}

// #################### BUILT-IN PRIMITIVE TYPES ####################

macro_rules! int_from_wire_impl {
    ($int_type:ty, $byte_count:ident) => {
        impl FromWire for $int_type {
            #[inline]
            fn from_wire_format<'a, 'b>(wire: &'b mut ReadWire<'a>) -> Result<Self, ReadWireError> where Self: Sized, 'a: 'b {
                let mut bytes = [0_u8; $byte_count];
                bytes.copy_from_slice(wire.take($byte_count)?);
                Ok(Self::from_be_bytes(bytes))
            }
        }
    }
}

int_from_wire_impl!(u8,  U8_BYTE_COUNT);
int_from_wire_impl!(u16, U16_BYTE_COUNT);

// #################### OTHER COMMON TYPES ####################

impl<T: FromWire> FromWire for Vec<T> {
    /// Reads values until the wire is exhausted.
    #[inline]
    fn from_wire_format<'a, 'b>(wire: &'b mut ReadWire<'a>) -> Result<Self, ReadWireError> where Self: Sized, 'a: 'b {
        let mut values = Vec::new();
        while !wire.is_end_reached() {
            values.push(T::from_wire_format(wire)?);
        }
        Ok(values)
    }
}

impl FromWire for Ipv4Addr {
    #[inline]
    fn from_wire_format<'a, 'b>(wire: &'b mut ReadWire<'a>) -> Result<Self, ReadWireError> where Self: Sized, 'a: 'b {
        let mut octets = [0_u8; IPV4_BYTE_COUNT];
        octets.copy_from_slice(wire.take(IPV4_BYTE_COUNT)?);
        Ok(Ipv4Addr::from(octets))
    }
}

// #################### DOMAIN NAMES ####################

impl FromWire for DomainName {
    /// Reads one name starting at the current offset and leaves the wire
    /// positioned right after it. When the name ends in a pointer, that is the
    /// octet after the first pointer, regardless of how many pointers were
    /// followed.
    ///
    /// Every pointer has to land strictly below the lowest offset this name
    /// has reached so far (initially the offset the name starts at). The chain
    /// of targets is therefore strictly decreasing and cannot loop.
    fn from_wire_format<'a, 'b>(wire: &'b mut ReadWire<'a>) -> Result<Self, ReadWireError> where Self: Sized, 'a: 'b {
        let mut limit = wire.current_offset();
        let mut final_offset = None;
        let mut labels = Vec::new();
        // The root label's length octet.
        let mut octets = 1;

        loop {
            let offset = wire.current_offset();
            // Peek at the first byte. It is read differently depending on the value.
            let first_byte = u8::from_wire_format(&mut wire.clone())?;

            match first_byte & 0b1100_0000 {
                0b0000_0000 => {
                    let label_length = u8::from_wire_format(wire)?;
                    if label_length == 0 {
                        break;
                    }

                    if (label_length as usize) > wire.current_state_len() {
                        debug!(offset = offset; "Label length {label_length} runs past the end of the wire");
                        return Err(ReadWireError::LabelOverrun { offset, length: label_length, remaining: wire.current_state_len() });
                    }

                    octets += 1 + label_length as usize;
                    if octets > DomainName::MAX_OCTETS {
                        debug!(offset = offset; "Decoded name grew past {} octets", DomainName::MAX_OCTETS);
                        return Err(ReadWireError::LongDomain { offset, octets });
                    }

                    let label = Label::from_wire_octets(wire.take(label_length as usize)?)
                        .map_err(|error| ReadWireError::Label { offset, error })?;
                    labels.push(label);
                },
                0b1100_0000 => {
                    let pointer_bytes = u16::from_wire_format(wire)?;
                    let pointer = pointer_bytes & 0b0011_1111_1111_1111;

                    // The pointer must point backwards in the wire. Forward pointers, and
                    // pointers that do not get further back than the previous hop, are
                    // forbidden.
                    if (pointer as usize) >= limit {
                        debug!(offset = offset, pointer = pointer; "Rejected pointer that does not point backwards");
                        return Err(ReadWireError::ForwardPointer { offset, pointer, limit });
                    }

                    // The final offset will be determined by the position after the first pointer.
                    // Once all the redirects have been followed, this is where we want our buffer
                    // to return to.
                    final_offset.get_or_insert(wire.current_offset());
                    limit = pointer as usize;
                    wire.set_offset(pointer as usize)?;
                },
                _ => {
                    // 0x80 and 0x40 are reserved
                    debug!(offset = offset; "Length byte 0x{first_byte:02x} uses a reserved label type");
                    return Err(ReadWireError::ReservedLabelType { offset, octet: first_byte });
                },
            }
        }

        if let Some(final_offset) = final_offset {
            wire.set_offset(final_offset)?;
        }

        DomainName::from_labels(labels)
            .map_err(|_| ReadWireError::LongDomain { offset: wire.current_offset(), octets })
    }
}
