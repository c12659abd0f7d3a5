use std::{fmt::Display, net::Ipv4Addr};

use log::debug;
use thiserror::Error;

use crate::{codec::{CodecError, decode_domains, encode_domains, parse_domain_list}, serde::{const_byte_counts::IPV4_BYTE_COUNT, wire::{from_wire::FromWire, read_wire::ReadWire, to_wire::ToWire, write_wire::{WriteWire, WriteWireError}}}, types::domain_name::{DomainName, DomainNameError}};

pub const PAD: u8 = 0;
pub const DOMAIN_NAME: u8 = 15;
pub const TFTP_SERVER_NAME: u8 = 66;
pub const BOOTFILE_NAME: u8 = 67;
pub const DOMAIN_SEARCH: u8 = 119;
pub const SIP_SERVERS: u8 = 120;
pub const TFTP_SERVER_ADDRESSES: u8 = 150;
pub const END: u8 = 255;

/// Largest value a single option instance can carry.
pub const MAX_PAYLOAD_OCTETS: usize = u8::MAX as usize;

const SIP_ENCODING_DOMAINS: u8 = 0;
const SIP_ENCODING_ADDRESSES: u8 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DhcpOptionError {
    #[error("Option {0} is not supported")]
    UnsupportedCode(u8),
    #[error("Option {code} needs at least one value")]
    Empty { code: u8 },
    #[error("Option {code} text is invalid: {reason}")]
    BadText { code: u8, reason: String },
    #[error("Option {code} expects IPv4 addresses, got '{value}'")]
    BadAddress { code: u8, value: String },
    #[error("Option {code} payload of {length} bytes is not a whole number of IPv4 addresses")]
    BadAddressLength { code: u8, length: usize },
    #[error("Option 120 encoding byte {0} is neither 0 (domain names) nor 1 (IPv4 addresses)")]
    UnknownSipEncoding(u8),
    #[error("Option stream truncated at byte {offset}")]
    Truncated { offset: usize },
    #[error("Unknown DHCP server '{0}': expected isc, kea, or dnsmasq")]
    UnknownServer(String),
    #[error(transparent)]
    DomainName(#[from] DomainNameError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Write(#[from] WriteWireError),
}

/// RFC 3361 SIP servers are either all names or all addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SipServers {
    Domains(Vec<DomainName>),
    Addresses(Vec<Ipv4Addr>),
}

/// The DHCPv4 options whose values are built from domain names or closely
/// related text. Each variant only holds what its option carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DhcpOption {
    /// Option 15 (RFC 2132), the name as plain dotted text.
    DomainName(DomainName),
    /// Option 66 (RFC 2132).
    TftpServerName(String),
    /// Option 67 (RFC 2132).
    BootfileName(String),
    /// Option 119 (RFC 3397), compressed wire-format names.
    DomainSearch(Vec<DomainName>),
    /// Option 120 (RFC 3361).
    SipServers(SipServers),
    /// Option 150, the TFTP server address list used by Cisco phones.
    TftpServerAddresses(Vec<Ipv4Addr>),
}

impl DhcpOption {
    #[inline]
    pub fn code(&self) -> u8 {
        match self {
            Self::DomainName(_) => DOMAIN_NAME,
            Self::TftpServerName(_) => TFTP_SERVER_NAME,
            Self::BootfileName(_) => BOOTFILE_NAME,
            Self::DomainSearch(_) => DOMAIN_SEARCH,
            Self::SipServers(_) => SIP_SERVERS,
            Self::TftpServerAddresses(_) => TFTP_SERVER_ADDRESSES,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::DomainName(_) => "domain-name",
            Self::TftpServerName(_) => "tftp-server-name",
            Self::BootfileName(_) => "bootfile-name",
            Self::DomainSearch(_) => "domain-search",
            Self::SipServers(_) => "sip-server",
            Self::TftpServerAddresses(_) => "tftp-server-address",
        }
    }

    /// Builds an option from user-supplied values, one value per list entry.
    pub fn from_text(code: u8, values: &[&str]) -> Result<Self, DhcpOptionError> {
        let values = values.iter()
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .collect::<Vec<_>>();
        let single = || match values.as_slice() {
            [] => Err(DhcpOptionError::Empty { code }),
            [value] => Ok(*value),
            _ => Err(DhcpOptionError::BadText { code, reason: format!("expected one value, got {}", values.len()) }),
        };

        match code {
            DOMAIN_NAME => Ok(Self::DomainName(DomainName::from_utf8(single()?)?)),
            TFTP_SERVER_NAME => Ok(Self::TftpServerName(validate_text(code, single()?)?.to_string())),
            BOOTFILE_NAME => Ok(Self::BootfileName(validate_text(code, single()?)?.to_string())),
            DOMAIN_SEARCH => Ok(Self::DomainSearch(parse_domain_list(&values.join(" "))?)),
            SIP_SERVERS => {
                if values.is_empty() {
                    return Err(DhcpOptionError::Empty { code });
                }
                // RFC 3361 carries either names or addresses, never both.
                let (addresses, names): (Vec<_>, Vec<_>) = values.iter()
                    .map(|value| (*value, value.parse::<Ipv4Addr>()))
                    .partition(|(_, address)| address.is_ok());
                if let (Some((address, _)), Some((name, _))) = (addresses.first(), names.first()) {
                    return Err(DhcpOptionError::BadText {
                        code,
                        reason: format!("cannot mix IPv4 addresses and domain names ('{address}' and '{name}')"),
                    });
                }

                if names.is_empty() {
                    Ok(Self::SipServers(SipServers::Addresses(
                        addresses.into_iter().filter_map(|(_, address)| address.ok()).collect()
                    )))
                } else {
                    Ok(Self::SipServers(SipServers::Domains(parse_domain_list(&values.join(" "))?)))
                }
            },
            TFTP_SERVER_ADDRESSES => {
                if values.is_empty() {
                    return Err(DhcpOptionError::Empty { code });
                }
                let addresses = values.iter()
                    .map(|value| value.parse::<Ipv4Addr>().map_err(|_| DhcpOptionError::BadAddress { code, value: value.to_string() }))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::TftpServerAddresses(addresses))
            },
            _ => Err(DhcpOptionError::UnsupportedCode(code)),
        }
    }

    /// The option value, without code or length octets. May be longer than a
    /// single option instance can hold; see [`DhcpOption::to_tlv`].
    pub fn payload(&self) -> Result<Vec<u8>, DhcpOptionError> {
        let code = self.code();
        match self {
            Self::DomainName(domain) => Ok(domain.to_string().into_bytes()),
            Self::TftpServerName(text) | Self::BootfileName(text) => Ok(validate_text(code, text)?.as_bytes().to_vec()),
            Self::DomainSearch(domains) => encode_names(code, domains),
            Self::SipServers(SipServers::Domains(domains)) => {
                let mut payload = vec![SIP_ENCODING_DOMAINS];
                // Pointers are relative to the first name, not to the encoding byte.
                payload.extend(encode_names(code, domains)?);
                Ok(payload)
            },
            Self::SipServers(SipServers::Addresses(addresses)) => {
                let mut payload = vec![SIP_ENCODING_ADDRESSES];
                payload.extend(encode_addresses(code, addresses)?);
                Ok(payload)
            },
            Self::TftpServerAddresses(addresses) => encode_addresses(code, addresses),
        }
    }

    /// Code, length, and value octets. A value longer than 255 octets is split
    /// across consecutive instances of the same option (RFC 3396).
    pub fn to_tlv(&self) -> Result<Vec<u8>, DhcpOptionError> {
        let code = self.code();
        let payload = self.payload()?;
        let mut tlv = Vec::with_capacity(payload.len() + 2 * payload.len().div_ceil(MAX_PAYLOAD_OCTETS));

        for chunk in payload.chunks(MAX_PAYLOAD_OCTETS) {
            tlv.push(code);
            tlv.push(chunk.len() as u8);
            tlv.extend_from_slice(chunk);
        }

        Ok(tlv)
    }

    /// Decodes one option value. Split options must already be concatenated.
    pub fn from_payload(code: u8, payload: &[u8]) -> Result<Self, DhcpOptionError> {
        match code {
            DOMAIN_NAME => Ok(Self::DomainName(DomainName::from_utf8(decode_text(code, payload)?)?)),
            TFTP_SERVER_NAME => Ok(Self::TftpServerName(decode_text(code, payload)?.to_string())),
            BOOTFILE_NAME => Ok(Self::BootfileName(decode_text(code, payload)?.to_string())),
            DOMAIN_SEARCH => Ok(Self::DomainSearch(decode_names(code, payload)?)),
            SIP_SERVERS => match payload.split_first() {
                None => Err(DhcpOptionError::Empty { code }),
                Some((&SIP_ENCODING_DOMAINS, names)) => Ok(Self::SipServers(SipServers::Domains(decode_names(code, names)?))),
                Some((&SIP_ENCODING_ADDRESSES, addresses)) => Ok(Self::SipServers(SipServers::Addresses(decode_addresses(code, addresses)?))),
                Some((encoding, _)) => Err(DhcpOptionError::UnknownSipEncoding(*encoding)),
            },
            TFTP_SERVER_ADDRESSES => Ok(Self::TftpServerAddresses(decode_addresses(code, payload)?)),
            _ => Err(DhcpOptionError::UnsupportedCode(code)),
        }
    }
}

impl Display for DhcpOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Option {} ({}): ", self.code(), self.name())?;
        match self {
            Self::DomainName(domain) => write!(f, "{domain}"),
            Self::TftpServerName(text) | Self::BootfileName(text) => write!(f, "{text}"),
            Self::DomainSearch(domains) | Self::SipServers(SipServers::Domains(domains)) => write!(f, "{}", join(domains)),
            Self::SipServers(SipServers::Addresses(addresses)) | Self::TftpServerAddresses(addresses) => write!(f, "{}", join(addresses)),
        }
    }
}

pub(crate) fn join<T: Display>(values: &[T]) -> String {
    values.iter().map(T::to_string).collect::<Vec<_>>().join(", ")
}

/// Walks a TLV option stream. Pad octets are skipped and the end option stops
/// the walk. Repeated instances of one code are concatenated before decoding
/// (RFC 3396). Codes this crate does not model are skipped.
pub fn parse_tlv_options(bytes: &[u8]) -> Result<Vec<DhcpOption>, DhcpOptionError> {
    let mut read_wire = ReadWire::from_bytes(bytes);
    let mut payloads: Vec<(u8, Vec<u8>)> = Vec::new();

    while !read_wire.is_end_reached() {
        let offset = read_wire.current_offset();
        let code = u8::from_wire_format(&mut read_wire).map_err(|_| DhcpOptionError::Truncated { offset })?;
        match code {
            PAD => continue,
            END => break,
            _ => (),
        }

        let length = u8::from_wire_format(&mut read_wire).map_err(|_| DhcpOptionError::Truncated { offset })?;
        let data = read_wire.take(length as usize).map_err(|_| DhcpOptionError::Truncated { offset })?;

        match payloads.iter_mut().find(|(known_code, _)| *known_code == code) {
            Some((_, payload)) => payload.extend_from_slice(data),
            None => payloads.push((code, data.to_vec())),
        }
    }

    payloads.into_iter()
        .filter(|(code, _)| {
            let supported = matches!(*code, DOMAIN_NAME | TFTP_SERVER_NAME | BOOTFILE_NAME | DOMAIN_SEARCH | SIP_SERVERS | TFTP_SERVER_ADDRESSES);
            if !supported {
                debug!(code = *code; "Skipping unsupported option");
            }
            supported
        })
        .map(|(code, payload)| DhcpOption::from_payload(code, &payload))
        .collect()
}

/// Printable ASCII only, one to 255 characters.
fn validate_text(code: u8, text: &str) -> Result<&str, DhcpOptionError> {
    if text.is_empty() {
        return Err(DhcpOptionError::Empty { code });
    }
    if let Some((index, character)) = text.chars().enumerate().find(|(_, character)| !(' '..='~').contains(character)) {
        return Err(DhcpOptionError::BadText { code, reason: format!("'{}' at position {index} is not printable ASCII", character.escape_default()) });
    }
    if text.len() > MAX_PAYLOAD_OCTETS {
        return Err(DhcpOptionError::BadText { code, reason: format!("{} characters, the maximum is {MAX_PAYLOAD_OCTETS}", text.len()) });
    }
    Ok(text)
}

fn decode_text(code: u8, payload: &[u8]) -> Result<&str, DhcpOptionError> {
    // Some clients and servers NUL-terminate string options.
    let end = payload.iter().rposition(|octet| *octet != 0).map_or(0, |index| index + 1);
    let text = std::str::from_utf8(&payload[..end])
        .map_err(|error| DhcpOptionError::BadText { code, reason: error.to_string() })?;
    validate_text(code, text)
}

fn encode_names(code: u8, domains: &[DomainName]) -> Result<Vec<u8>, DhcpOptionError> {
    if domains.is_empty() {
        return Err(DhcpOptionError::Empty { code });
    }
    Ok(encode_domains(domains, true).map_err(CodecError::from)?)
}

fn decode_names(code: u8, payload: &[u8]) -> Result<Vec<DomainName>, DhcpOptionError> {
    let decoded = decode_domains(payload, 0).map_err(CodecError::from)?;
    if decoded.domains.is_empty() {
        return Err(DhcpOptionError::Empty { code });
    }
    Ok(decoded.domains)
}

fn encode_addresses(code: u8, addresses: &Vec<Ipv4Addr>) -> Result<Vec<u8>, DhcpOptionError> {
    if addresses.is_empty() {
        return Err(DhcpOptionError::Empty { code });
    }
    let mut buffer = vec![0_u8; addresses.serial_length()];
    addresses.to_wire_format(&mut WriteWire::from_bytes(&mut buffer), &mut None)?;
    Ok(buffer)
}

fn decode_addresses(code: u8, payload: &[u8]) -> Result<Vec<Ipv4Addr>, DhcpOptionError> {
    if payload.is_empty() {
        return Err(DhcpOptionError::Empty { code });
    }
    if payload.len() % IPV4_BYTE_COUNT != 0 {
        return Err(DhcpOptionError::BadAddressLength { code, length: payload.len() });
    }
    // The length check above guarantees whole addresses.
    Vec::<Ipv4Addr>::from_wire_format(&mut ReadWire::from_bytes(payload))
        .map_err(|_| DhcpOptionError::BadAddressLength { code, length: payload.len() })
}

#[cfg(test)]
mod dhcp_option_tests {
    use std::net::Ipv4Addr;

    use rstest::rstest;

    use crate::{codec::CodecError, types::domain_name::DomainName};

    use super::{DhcpOption, DhcpOptionError, SipServers, parse_tlv_options};

    fn domains(names: &[&str]) -> Vec<DomainName> {
        names.iter().map(|name| DomainName::from_utf8(name).unwrap()).collect()
    }

    #[test]
    fn domain_search_rfc3397_example() {
        // The example from RFC 3397 section 2.
        let option = DhcpOption::from_text(119, &["eng.apple.com", "marketing.apple.com"]).unwrap();
        let tlv = option.to_tlv().unwrap();

        let mut expected = vec![119, 27];
        expected.extend(b"\x03eng\x05apple\x03com\x00");
        expected.extend(b"\x09marketing\xC0\x04");
        assert_eq!(expected, tlv);
        assert_eq!(vec![option], parse_tlv_options(&tlv).unwrap());
    }

    #[rstest]
    #[case(15, &["example.com"], b"example.com".to_vec())]
    #[case(66, &["tftp.example.com"], b"tftp.example.com".to_vec())]
    #[case(67, &["pxelinux.0"], b"pxelinux.0".to_vec())]
    #[case(150, &["10.0.0.1", "10.0.0.2"], vec![10, 0, 0, 1, 10, 0, 0, 2])]
    #[case(120, &["192.0.2.5"], vec![1, 192, 0, 2, 5])]
    #[case(120, &["sip.example.com"], b"\x00\x03sip\x07example\x03com\x00".to_vec())]
    fn payloads(#[case] code: u8, #[case] values: &[&str], #[case] expected: Vec<u8>) {
        let option = DhcpOption::from_text(code, values).unwrap();
        assert_eq!(code, option.code());

        let payload = option.payload().unwrap();
        assert_eq!(expected, payload);
        assert_eq!(option, DhcpOption::from_payload(code, &payload).unwrap());
    }

    #[test]
    fn long_payloads_are_split() {
        let names = (0..40).map(|index| format!("host{index:02}.example{index:02}.net")).collect::<Vec<_>>();
        let values = names.iter().map(String::as_str).collect::<Vec<_>>();
        let option = DhcpOption::from_text(119, &values).unwrap();

        let payload = option.payload().unwrap();
        assert!(payload.len() > 255);
        let tlv = option.to_tlv().unwrap();
        assert_eq!(&[119, 255], &tlv[..2]);
        assert_eq!(119, tlv[257]);
        assert_eq!(payload.len() + 2 * payload.len().div_ceil(255), tlv.len());

        assert_eq!(vec![option], parse_tlv_options(&tlv).unwrap());
    }

    #[test]
    fn stream_skips_pad_unknown_and_stops_at_end() {
        let mut stream = vec![0, 0];
        // Option 3 (router) is not modelled here.
        stream.extend([3, 4, 192, 0, 2, 1]);
        stream.extend([150, 4, 10, 0, 0, 9]);
        stream.push(255);
        stream.extend([67, 2, b'x', b'y']);

        assert_eq!(
            vec![DhcpOption::TftpServerAddresses(vec![Ipv4Addr::new(10, 0, 0, 9)])],
            parse_tlv_options(&stream).unwrap()
        );
    }

    #[test]
    fn truncated_stream() {
        assert_eq!(Err(DhcpOptionError::Truncated { offset: 0 }), parse_tlv_options(&[119]));
        assert_eq!(Err(DhcpOptionError::Truncated { offset: 1 }), parse_tlv_options(&[0, 66, 5, b'a']));
    }

    #[test]
    fn nul_terminated_text_is_accepted() {
        assert_eq!(
            DhcpOption::BootfileName("boot.ipxe".to_string()),
            DhcpOption::from_payload(67, b"boot.ipxe\x00").unwrap()
        );
    }

    #[rstest]
    #[case(99, &["x"], DhcpOptionError::UnsupportedCode(99))]
    #[case(66, &[], DhcpOptionError::Empty { code: 66 })]
    #[case(150, &["10.0.0.1", "tftp"], DhcpOptionError::BadAddress { code: 150, value: "tftp".to_string() })]
    #[case(67, &["a", "b"], DhcpOptionError::BadText { code: 67, reason: "expected one value, got 2".to_string() })]
    #[case(120, &["sip.example.com", "10.0.0.1", "sip2.example.com"], DhcpOptionError::BadText { code: 120, reason: "cannot mix IPv4 addresses and domain names ('10.0.0.1' and 'sip.example.com')".to_string() })]
    #[case(120, &["192.0.2.5", "sip.example.com"], DhcpOptionError::BadText { code: 120, reason: "cannot mix IPv4 addresses and domain names ('192.0.2.5' and 'sip.example.com')".to_string() })]
    fn bad_text_values(#[case] code: u8, #[case] values: &[&str], #[case] expected: DhcpOptionError) {
        assert_eq!(Err(expected), DhcpOption::from_text(code, values));
    }

    #[test]
    fn bad_domain_search_entries_are_all_reported() {
        let error = DhcpOption::from_text(119, &["ok.example", "no_way", "-nope"]).unwrap_err();
        let DhcpOptionError::Codec(CodecError::Validation(invalid)) = error else {
            panic!("expected validation errors, got {error:?}");
        };
        assert_eq!(2, invalid.len());
    }

    #[rstest]
    #[case(150, &[10, 0, 0], DhcpOptionError::BadAddressLength { code: 150, length: 3 })]
    #[case(120, &[2, 1, 2, 3, 4], DhcpOptionError::UnknownSipEncoding(2))]
    #[case(120, &[], DhcpOptionError::Empty { code: 120 })]
    #[case(119, &[], DhcpOptionError::Empty { code: 119 })]
    #[case(66, b"tab\there", DhcpOptionError::BadText { code: 66, reason: "'\\t' at position 3 is not printable ASCII".to_string() })]
    fn bad_payloads(#[case] code: u8, #[case] payload: &[u8], #[case] expected: DhcpOptionError) {
        assert_eq!(Err(expected), DhcpOption::from_payload(code, payload));
    }

    #[test]
    fn sip_names_compress_from_their_own_start() {
        let option = DhcpOption::SipServers(SipServers::Domains(domains(&["sip1.example.com", "sip2.example.com"])));
        let payload = option.payload().unwrap();
        // The pointer targets offset 5 of the name data, which is offset 6 of the payload.
        assert_eq!(&[0xC0, 0x05], &payload[payload.len() - 2..]);
        assert_eq!(option, DhcpOption::from_payload(120, &payload).unwrap());
    }

    #[test]
    fn display_lists_values() {
        let option = DhcpOption::DomainSearch(domains(&["a.example.com", "example.com"]));
        assert_eq!("Option 119 (domain-search): a.example.com, example.com", option.to_string());
    }
}
