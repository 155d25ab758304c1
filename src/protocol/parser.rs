//! PORT argument parsing
//!
//! `PORT h1,h2,h3,h4,p1,p2` carries an IPv4 address and a port split into
//! six decimal bytes. The arity is fixed by the protocol.

use std::net::Ipv4Addr;
use std::num::IntErrorKind;

use crate::error::ParseError;
use crate::transfer::DataEndpoint;

const PORT_VERB: &str = "PORT";
const FIELD_COUNT: usize = 6;

/// Parses a full `PORT h1,h2,h3,h4,p1,p2` command line.
///
/// The line must start with the verb and exactly one space.
pub fn parse_port_command(line: &str) -> Result<DataEndpoint, ParseError> {
    let bytes = line.as_bytes();
    let verb_len = PORT_VERB.len();
    let has_prefix = bytes.len() > verb_len
        && bytes[..verb_len].eq_ignore_ascii_case(PORT_VERB.as_bytes())
        && bytes[verb_len] == b' ';

    if !has_prefix {
        return Err(ParseError::MissingVerb(PORT_VERB));
    }

    let argument = &line[verb_len + 1..];
    if argument.starts_with(' ') {
        return Err(ParseError::MissingVerb(PORT_VERB));
    }

    parse_host_port(argument)
}

/// Parses the `h1,h2,h3,h4,p1,p2` argument of a PORT command.
pub fn parse_host_port(argument: &str) -> Result<DataEndpoint, ParseError> {
    let fields: Vec<&str> = argument.trim().split(',').collect();
    if fields.len() != FIELD_COUNT {
        return Err(ParseError::MalformedAddressList {
            fields: fields.len(),
        });
    }

    let mut octets = [0u8; FIELD_COUNT];
    for (index, field) in fields.iter().enumerate() {
        octets[index] = parse_octet(index, field.trim())?;
    }

    let address = Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]);
    let port = u16::from(octets[4]) * 256 + u16::from(octets[5]);

    Ok(DataEndpoint::new(address, port))
}

fn parse_octet(index: usize, field: &str) -> Result<u8, ParseError> {
    // Parse wider than u8 so an out-of-range value is reported as such
    // instead of as a non-number.
    match field.parse::<u32>() {
        Ok(value) if value <= u32::from(u8::MAX) => Ok(value as u8),
        Ok(_) => Err(ParseError::OutOfRange {
            index,
            value: field.to_string(),
        }),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Err(ParseError::OutOfRange {
            index,
            value: field.to_string(),
        }),
        Err(_) => Err(ParseError::InvalidField {
            index,
            value: field.to_string(),
        }),
    }
}
