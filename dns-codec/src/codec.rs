//! Batch encoding and decoding of domain name lists, and the text-facing
//! operations built on top of them.

use std::fmt::Display;

use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;
use thiserror::Error;

use crate::{serde::wire::{compression_map::CompressionMap, from_wire::FromWire, read_wire::{ReadWire, ReadWireError}, to_wire::ToWire, write_wire::{WriteWire, WriteWireError}}, types::{domain_name::{DomainName, DomainNameError}, hex::{Hex, HexError}}};

lazy_static! {
    static ref REGEX_LIST_SEPARATOR: Regex = Regex::new(r"[\s,;]+").unwrap();
}

/// A domain in a batch that could not be written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Domain #{} '{domain}' could not be encoded: {source}", .index + 1)]
pub struct EncodingError {
    pub index: usize,
    pub domain: String,
    pub source: WriteWireError,
}

/// Where and why decoding stopped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Domain #{} could not be decoded (byte offset {}): {source}", .index + 1, .source.offset())]
pub struct DecodeError {
    pub index: usize,
    pub source: ReadWireError,
}

impl DecodeError {
    #[inline]
    pub fn offset(&self) -> usize {
        self.source.offset()
    }
}

/// One entry of a domain list that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDomain {
    pub input: String,
    pub error: DomainNameError,
}

impl Display for InvalidDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}': {}", self.input, self.error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("{} invalid domain name(s)", .0.len())]
    Validation(Vec<InvalidDomain>),
    #[error("No domain names were supplied")]
    NoDomains,
    #[error("Invalid hex input: {0}")]
    Parse(#[from] HexError),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl CodecError {
    /// One human-readable line per problem, in input order.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Validation(invalid_domains) => invalid_domains.iter().map(InvalidDomain::to_string).collect(),
            _ => vec![self.to_string()],
        }
    }
}

/// The encoded form of a domain list, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedDomains {
    pub bytes: Vec<u8>,
    /// Lowercase hex, no separators.
    pub compact: String,
    /// Lowercase hex, one space between bytes.
    pub wire: String,
    pub byte_count: usize,
}

impl EncodedDomains {
    fn from_bytes(bytes: Vec<u8>) -> Self {
        let hex = Hex::from_bytes(&bytes);
        Self {
            compact: hex.to_compact(),
            wire: hex.to_wire_string(),
            byte_count: bytes.len(),
            bytes,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedDomains {
    pub domains: Vec<DomainName>,
    /// Bytes read from the start offset onwards. Bytes only reached through
    /// pointers are not counted.
    pub consumed: usize,
}

/// Writes every domain, in order, into one buffer.
///
/// With `compress` set, the suffix dictionary is shared across the whole list
/// so a later domain can point into any earlier one. The output is never
/// larger than the uncompressed encoding.
pub fn encode_domains(domains: &[DomainName], compress: bool) -> Result<Vec<u8>, EncodingError> {
    // Compression only ever removes bytes, so the uncompressed size is enough.
    let uncompressed_len = domains.iter().map(DomainName::serial_length).sum();
    let mut buffer = vec![0_u8; uncompressed_len];
    let mut wire = WriteWire::from_bytes(&mut buffer);
    let mut compression = compress.then(CompressionMap::new);

    for (index, domain) in domains.iter().enumerate() {
        domain.to_wire_format(&mut wire, &mut compression)
            .map_err(|source| EncodingError { index, domain: domain.to_string(), source })?;
    }

    let written = wire.current_len();
    debug!(domains = domains.len(), uncompressed = uncompressed_len, written = written; "Encoded domain list");
    buffer.truncate(written);
    Ok(buffer)
}

/// Reads domains from `start` until the end of `wire`.
///
/// Pointers may refer to any byte of `wire` before the name being read,
/// including bytes before `start`.
pub fn decode_domains(wire: &[u8], start: usize) -> Result<DecodedDomains, DecodeError> {
    let mut read_wire = ReadWire::from_bytes(wire);
    read_wire.set_offset(start)
        .map_err(|source| DecodeError { index: 0, source })?;

    let mut domains = Vec::new();
    while !read_wire.is_end_reached() {
        let domain = DomainName::from_wire_format(&mut read_wire)
            .map_err(|source| DecodeError { index: domains.len(), source })?;
        domains.push(domain);
    }

    Ok(DecodedDomains { domains, consumed: read_wire.current_offset() - start })
}

/// Splits free-form text on commas, semicolons, and whitespace, then validates
/// each entry. Every invalid entry is reported, not just the first.
pub fn parse_domain_list(text: &str) -> Result<Vec<DomainName>, CodecError> {
    let mut domains = Vec::new();
    let mut invalid_domains = Vec::new();

    for input in REGEX_LIST_SEPARATOR.split(text.trim()).filter(|input| !input.is_empty()) {
        match DomainName::from_utf8(input) {
            Ok(domain) => domains.push(domain),
            Err(error) => invalid_domains.push(InvalidDomain { input: input.to_string(), error }),
        }
    }

    if !invalid_domains.is_empty() {
        info!("Rejected {} of {} domain name(s)", invalid_domains.len(), invalid_domains.len() + domains.len());
        return Err(CodecError::Validation(invalid_domains));
    }
    if domains.is_empty() {
        return Err(CodecError::NoDomains);
    }
    Ok(domains)
}

/// Text in, display-ready hex out.
pub fn encode_domain_list(text: &str, compress: bool) -> Result<EncodedDomains, CodecError> {
    let domains = parse_domain_list(text)?;
    Ok(EncodedDomains::from_bytes(encode_domains(&domains, compress)?))
}

/// Hex text in, domain list out.
pub fn decode_hex_domains(text: &str, start: usize) -> Result<DecodedDomains, CodecError> {
    let hex = Hex::from_utf8(text)?;
    Ok(decode_domains(hex.as_bytes(), start)?)
}
