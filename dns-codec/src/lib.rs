//! Domain name wire-format codec.
//!
//! Names are validated and split into labels ([`types::domain_name`]),
//! serialized with RFC 1035 suffix compression ([`serde::wire`]), and shown to
//! people as hex ([`types::hex`]). [`codec`] ties those together into the
//! encode/decode operations used by the command line tool, and [`dhcp`] builds
//! typed DHCP options on top of them.

pub mod codec;
pub mod dhcp;
pub mod serde;
pub mod types;

pub use codec::{CodecError, DecodeError, DecodedDomains, EncodedDomains, EncodingError, decode_domains, decode_hex_domains, encode_domain_list, encode_domains, parse_domain_list};
pub use types::{domain_name::{DomainName, DomainNameError}, hex::{Hex, HexError}, label::{Label, LabelError}};
