use std::{fmt::Display, net::Ipv4Addr, str::FromStr};

use crate::types::hex::Hex;

use super::option::{DhcpOption, DhcpOptionError, SipServers, join};

/// DHCP server software a configuration snippet can be written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Server {
    IscDhcpd,
    Kea,
    Dnsmasq,
}

impl FromStr for Server {
    type Err = DhcpOptionError;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        match string.to_ascii_lowercase().as_str() {
            "isc" | "dhcpd" | "isc-dhcpd" => Ok(Self::IscDhcpd),
            "kea" => Ok(Self::Kea),
            "dnsmasq" => Ok(Self::Dnsmasq),
            _ => Err(DhcpOptionError::UnknownServer(string.to_string())),
        }
    }
}

impl Display for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IscDhcpd => write!(f, "isc"),
            Self::Kea => write!(f, "kea"),
            Self::Dnsmasq => write!(f, "dnsmasq"),
        }
    }
}

/// Renders `option` as a configuration line for `server`.
///
/// Options the server has no built-in name for are written as raw payload
/// bytes under their option code.
pub fn render(option: &DhcpOption, server: Server) -> Result<String, DhcpOptionError> {
    match server {
        Server::IscDhcpd => render_isc(option),
        Server::Kea => render_kea(option),
        Server::Dnsmasq => render_dnsmasq(option),
    }
}

fn render_isc(option: &DhcpOption) -> Result<String, DhcpOptionError> {
    let name = option.name();
    match option {
        DhcpOption::DomainName(domain) => Ok(format!("option {name} {};", quoted(&domain.to_string()))),
        DhcpOption::TftpServerName(text) | DhcpOption::BootfileName(text) => Ok(format!("option {name} {};", quoted(text))),
        DhcpOption::DomainSearch(domains) => {
            let domains = domains.iter().map(|domain| quoted(&domain.to_string())).collect::<Vec<_>>();
            Ok(format!("option {name} {};", domains.join(", ")))
        },
        DhcpOption::TftpServerAddresses(addresses) => Ok(format!(
            "option {name} code {} = array of ip-address;\noption {name} {};",
            option.code(),
            join(addresses)
        )),
        DhcpOption::SipServers(_) => Ok(format!(
            "option {name} code {} = string;\noption {name} {};",
            option.code(),
            Hex::from_vec(option.payload()?).to_delimited(":")
        )),
    }
}

fn render_kea(option: &DhcpOption) -> Result<String, DhcpOptionError> {
    let data = match option {
        DhcpOption::DomainName(domain) => domain.to_string(),
        DhcpOption::TftpServerName(text) | DhcpOption::BootfileName(text) => text.clone(),
        DhcpOption::DomainSearch(domains) => join(domains),
        DhcpOption::SipServers(_) | DhcpOption::TftpServerAddresses(_) => {
            return Ok(format!(
                r#"{{ "code": {}, "csv-format": false, "data": {} }}"#,
                option.code(),
                quoted(&Hex::from_vec(option.payload()?).to_compact().to_ascii_uppercase())
            ));
        },
    };
    let name = match option {
        DhcpOption::BootfileName(_) => "boot-file-name",
        _ => option.name(),
    };
    Ok(format!(r#"{{ "name": "{name}", "data": {} }}"#, quoted(&data)))
}

fn render_dnsmasq(option: &DhcpOption) -> Result<String, DhcpOptionError> {
    let code = option.code();
    match option {
        DhcpOption::DomainName(domain) => Ok(format!("dhcp-option=option:domain-name,{domain}")),
        DhcpOption::TftpServerName(text) => Ok(format!("dhcp-option=option:tftp-server,{}", quoted(text))),
        DhcpOption::BootfileName(text) => Ok(format!("dhcp-option=option:bootfile-name,{}", quoted(text))),
        DhcpOption::DomainSearch(domains) => Ok(format!("dhcp-option=option:domain-search,{}", comma_list(domains))),
        DhcpOption::SipServers(SipServers::Domains(domains)) => Ok(format!("dhcp-option=option:sip-server,{}", comma_list(domains))),
        DhcpOption::SipServers(SipServers::Addresses(addresses)) => Ok(format!("dhcp-option=option:sip-server,{}", comma_list(addresses))),
        DhcpOption::TftpServerAddresses(addresses) => Ok(format!("dhcp-option={code},{}", comma_list::<Ipv4Addr>(addresses))),
    }
}

fn comma_list<T: Display>(values: &[T]) -> String {
    values.iter().map(T::to_string).collect::<Vec<_>>().join(",")
}

/// Double-quoted, with `"` and `\` escaped. Both ISC and Kea read this form.
fn quoted(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for character in text.chars() {
        if matches!(character, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(character);
    }
    quoted.push('"');
    quoted
}
