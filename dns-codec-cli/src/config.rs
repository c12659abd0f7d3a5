use std::{error::Error, fmt::Display, str::FromStr};

use dns_codec::dhcp::{DhcpOptionError, Server};

pub const USAGE: &str = "\
usage: dns-codec [FLAGS] encode [DOMAIN...]
       dns-codec [FLAGS] decode [HEX...]
       dns-codec [FLAGS] option <15|66|67|119|120|150> [VALUE...]
       dns-codec [FLAGS] decode-options [HEX...]

When no values are given and stdin is not a terminal, values are read from stdin.
Decode prints the bytes read after the domains unless --format is compact or wire.

flags:
  -n, --no-compress          write every label literally
  -f, --format <FORMAT>      compact, wire, or both (default both)
  -o, --offset <N>           byte offset decoding starts at
  -s, --snippet <SERVER>     also print a config line for isc, kea, or dnsmasq";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Encode,
    Decode,
    Option(u8),
    DecodeOptions,
}

/// How encoded bytes are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    Compact,
    Wire,
    #[default]
    Both,
}

impl FromStr for Format {
    type Err = ConfigError;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        match string {
            "compact" => Ok(Self::Compact),
            "wire" => Ok(Self::Wire),
            "both" => Ok(Self::Both),
            _ => Err(ConfigError::BadFormat(string.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Help,
    MissingCommand,
    UnknownCommand(String),
    UnknownFlag(String),
    MissingValue(&'static str),
    BadFormat(String),
    BadOffset(String),
    BadOptionCode(String),
    Server(DhcpOptionError),
}
impl Error for ConfigError {}
impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Help => write!(f, "{USAGE}"),
            Self::MissingCommand => write!(f, "Missing command: expected encode, decode, option, or decode-options"),
            Self::UnknownCommand(command) => write!(f, "Unknown command '{command}'"),
            Self::UnknownFlag(flag) => write!(f, "Unknown flag '{flag}'"),
            Self::MissingValue(flag) => write!(f, "Flag '{flag}' needs a value"),
            Self::BadFormat(format) => write!(f, "Unknown format '{format}': expected compact, wire, or both"),
            Self::BadOffset(offset) => write!(f, "Offset '{offset}' is not a non-negative integer"),
            Self::BadOptionCode(code) => write!(f, "Option code '{code}' is not a number from 0 to 255"),
            Self::Server(error) => write!(f, "{error}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub command: Command,
    pub values: Vec<String>,
    pub compress: bool,
    pub format: Format,
    pub offset: usize,
    pub snippet: Option<Server>,
}

impl Config {
    /// Flags may appear anywhere. The first non-flag argument is the command;
    /// everything after it is a value.
    pub fn from_args(args: impl IntoIterator<Item = String>) -> Result<Self, ConfigError> {
        let mut args = args.into_iter().filter(|arg| !arg.is_empty());
        let mut command = None;
        let mut values = Vec::new();
        let mut compress = true;
        let mut format = Format::default();
        let mut offset = 0;
        let mut snippet = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--help" | "-h" => return Err(ConfigError::Help),
                "--no-compress" | "-n" => compress = false,
                "--format" | "-f" => format = next_value(&mut args, "--format")?.parse::<Format>()?,
                "--offset" | "-o" => {
                    let value = next_value(&mut args, "--offset")?;
                    offset = value.parse::<usize>().map_err(|_| ConfigError::BadOffset(value))?;
                },
                "--snippet" | "-s" => snippet = Some(next_value(&mut args, "--snippet")?.parse::<Server>().map_err(ConfigError::Server)?),
                flag if flag.starts_with('-') && flag.len() > 1 => return Err(ConfigError::UnknownFlag(arg)),
                _ if command.is_none() => command = Some(match arg.as_str() {
                    "encode" => Command::Encode,
                    "decode" => Command::Decode,
                    "decode-options" => Command::DecodeOptions,
                    "option" => {
                        let code = next_value(&mut args, "option")?;
                        Command::Option(code.parse().map_err(|_| ConfigError::BadOptionCode(code))?)
                    },
                    _ => return Err(ConfigError::UnknownCommand(arg)),
                }),
                _ => values.push(arg),
            }
        }

        Ok(Self {
            command: command.ok_or(ConfigError::MissingCommand)?,
            values,
            compress,
            format,
            offset,
            snippet,
        })
    }

    /// Values on the command line win, so an open but idle stdin (cron, ssh)
    /// is never waited on.
    #[inline]
    pub fn reads_stdin(&self, stdin_is_terminal: bool) -> bool {
        self.values.is_empty() && !stdin_is_terminal
    }
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &'static str) -> Result<String, ConfigError> {
    args.next().ok_or(ConfigError::MissingValue(flag))
}
