//! DHCPv4 options that carry domain names, and configuration snippets for
//! common DHCP servers.

pub mod option;
pub mod snippet;

pub use option::{DhcpOption, DhcpOptionError, SipServers, parse_tlv_options};
pub use snippet::{Server, render};
