//! Command line front end for the domain name codec. Domains, hex, or option
//! values come from the command line, or from stdin when none are given.

use std::{env, io::IsTerminal, process};

use dns_codec::{CodecError, DecodedDomains, Hex, decode_hex_domains, dhcp::{DhcpOption, DhcpOptionError, Server, parse_tlv_options, render}, encode_domain_list};
use log::info;

use crate::config::{Command, Config, ConfigError, Format, USAGE};

mod config;

fn main() {
    env_logger::init();

    let mut config = match Config::from_args(env::args().skip(1)) {
        Ok(config) => config,
        Err(ConfigError::Help) => {
            println!("{USAGE}");
            return;
        },
        Err(error) => {
            eprintln!("{error}\n\n{USAGE}");
            process::exit(2);
        },
    };

    // Reading from stdin allows lists of domain names or hex dumps to be piped into the application.
    if config.reads_stdin(std::io::stdin().is_terminal()) {
        config.values.extend(std::io::stdin()
            .lines()
            .map_while(Result::ok)
            .filter(|line| !line.trim().is_empty())
        );
    }

    let result = match config.command {
        Command::Encode => encode(&config),
        Command::Decode => decode(&config),
        Command::Option(code) => option(&config, code),
        Command::DecodeOptions => decode_options(&config),
    };

    if let Err(messages) = result {
        for message in messages {
            eprintln!("error: {message}");
        }
        process::exit(1);
    }
}

fn encode(config: &Config) -> Result<(), Vec<String>> {
    let encoded = encode_domain_list(&config.values.join("\n"), config.compress)
        .map_err(|error| error.messages())?;

    println!("{}", format_hex(&encoded.compact, &encoded.wire, encoded.byte_count, config.format));
    Ok(())
}

fn decode(config: &Config) -> Result<(), Vec<String>> {
    let decoded = decode_hex_domains(&config.values.join(" "), config.offset)
        .map_err(|error| error.messages())?;

    info!(domains = decoded.domains.len(), consumed = decoded.consumed; "Decoded domain list");
    println!("{}", format_decoded(&decoded, config.format));
    Ok(())
}

fn option(config: &Config, code: u8) -> Result<(), Vec<String>> {
    let values = config.values.iter().map(String::as_str).collect::<Vec<_>>();
    let option = DhcpOption::from_text(code, &values).map_err(option_messages)?;
    let tlv = Hex::from_vec(option.to_tlv().map_err(option_messages)?);

    println!("{}", format_hex(&tlv.to_compact(), &tlv.to_wire_string(), tlv.byte_len(), config.format));
    print_snippet(&option, config.snippet)
}

fn decode_options(config: &Config) -> Result<(), Vec<String>> {
    let hex = Hex::from_utf8(&config.values.join(" "))
        .map_err(|error| CodecError::from(error).messages())?;
    let options = parse_tlv_options(hex.as_bytes()).map_err(option_messages)?;

    for option in options {
        println!("{option}");
        print_snippet(&option, config.snippet)?;
    }
    Ok(())
}

fn format_hex(compact: &str, wire: &str, byte_count: usize, format: Format) -> String {
    match format {
        Format::Compact => compact.to_string(),
        Format::Wire => wire.to_string(),
        Format::Both => format!("compact: {compact}\nwire:    {wire}\nbytes:   {byte_count}"),
    }
}

/// One domain per line. The default format adds the number of bytes read;
/// `compact` and `wire` leave only the domains, for piping.
fn format_decoded(decoded: &DecodedDomains, format: Format) -> String {
    let mut lines = decoded.domains.iter().map(ToString::to_string).collect::<Vec<_>>();
    if format == Format::Both {
        lines.push(format!("bytes:   {}", decoded.consumed));
    }
    lines.join("\n")
}

fn print_snippet(option: &DhcpOption, server: Option<Server>) -> Result<(), Vec<String>> {
    if let Some(server) = server {
        println!("{}", render(option, server).map_err(option_messages)?);
    }
    Ok(())
}

fn option_messages(error: DhcpOptionError) -> Vec<String> {
    match error {
        DhcpOptionError::Codec(error) => error.messages(),
        error => vec![error.to_string()],
    }
}
