use std::net::Ipv4Addr;

// #################### BUILT-IN PRIMITIVE UNSIGNED ####################

pub const  U8_BYTE_COUNT: usize = ( u8::BITS / 8) as usize;
pub const U16_BYTE_COUNT: usize = (u16::BITS / 8) as usize;

// #################### ADDRESS TYPES ####################

pub const IPV4_BYTE_COUNT: usize = (Ipv4Addr::BITS / 8) as usize;

// #################### DOMAIN NAMES ####################

pub const POINTER_BYTE_COUNT: usize = U16_BYTE_COUNT;
