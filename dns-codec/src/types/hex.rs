use std::{error::Error, fmt::{Debug, Display}, str::FromStr};

use ux::u4;

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum HexError {
    BadChar { character: char, index: usize },
    OddLength(usize),
}

impl Error for HexError {}
impl Display for HexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadChar { character, index } => write!(f, "Character '{}' at position {index} is not a valid hex digit or separator", character.escape_default()),
            Self::OddLength(digits) => write!(f, "Hex input has {digits} digits; every byte needs exactly two"),
        }
    }
}

#[inline]
fn u4_to_hex(bits: u4) -> char {
    match u8::from(bits) {
        0b0000_0000 => '0',
        0b0000_0001 => '1',
        0b0000_0010 => '2',
        0b0000_0011 => '3',
        0b0000_0100 => '4',
        0b0000_0101 => '5',
        0b0000_0110 => '6',
        0b0000_0111 => '7',
        0b0000_1000 => '8',
        0b0000_1001 => '9',
        0b0000_1010 => 'a',
        0b0000_1011 => 'b',
        0b0000_1100 => 'c',
        0b0000_1101 => 'd',
        0b0000_1110 => 'e',
        0b0000_1111 => 'f',

        _ => unreachable!("a u4 holds at most four bits"),
    }
}

#[inline]
const fn hex_to_u4(character: char) -> Option<u8> {
    match character {
        '0'..='9' => Some(character as u8 - b'0'),
        'a'..='f' => Some(character as u8 - b'a' + 10),
        'A'..='F' => Some(character as u8 - b'A' + 10),
        _ => None,
    }
}

/// Whitespace and colons may separate digits in hex input (`07 65 78`,
/// `07:65:78`). They carry no meaning and are dropped.
#[inline]
const fn is_separator(character: char) -> bool {
    character.is_ascii_whitespace() || character == ':'
}

/// Raw bytes with their human-facing hex forms.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Hex {
    bytes: Vec<u8>,
}

impl Hex {
    /// Parses hex text. Separators are stripped first; what remains must be an
    /// even number of hex digits in either case.
    pub fn from_utf8(string: &str) -> Result<Self, HexError> {
        let mut bytes = Vec::with_capacity(string.len() / 2);
        let mut high_nibble = None;
        let mut digits = 0;

        for (index, character) in string.chars().enumerate() {
            if is_separator(character) {
                continue;
            }

            let Some(nibble) = hex_to_u4(character) else {
                return Err(HexError::BadChar { character, index });
            };
            digits += 1;

            match high_nibble.take() {
                None => high_nibble = Some(nibble),
                Some(high) => bytes.push(((high << 4) & 0b1111_0000) | (nibble & 0b0000_1111)),
            }
        }

        if high_nibble.is_some() {
            return Err(HexError::OddLength(digits));
        }

        Ok(Self { bytes })
    }

    #[inline]
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    #[inline]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::from_vec(bytes.to_vec())
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Lowercase hex pairs with nothing between them.
    #[inline]
    pub fn to_compact(&self) -> String {
        self.to_delimited("")
    }

    /// Lowercase hex pairs separated by single spaces, one pair per byte.
    #[inline]
    pub fn to_wire_string(&self) -> String {
        self.to_delimited(" ")
    }

    pub fn to_delimited(&self, delimiter: &str) -> String {
        let mut encoded = String::with_capacity(self.bytes.len() * (2 + delimiter.len()));

        for (index, byte) in self.bytes.iter().enumerate() {
            if index != 0 {
                encoded.push_str(delimiter);
            }

            let bits0_3 = (byte & 0b1111_0000) >> 4;
            let bits4_7 = byte & 0b0000_1111;
            encoded.push(u4_to_hex(u4::new(bits0_3)));
            encoded.push(u4_to_hex(u4::new(bits4_7)));
        }

        encoded
    }
}

impl FromStr for Hex {
    type Err = HexError;

    #[inline]
    fn from_str(string: &str) -> Result<Self, Self::Err> {
        Self::from_utf8(string)
    }
}

impl Display for Hex {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_compact())
    }
}

impl Debug for Hex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Hex(\"{}\")", self.to_compact())
    }
}
