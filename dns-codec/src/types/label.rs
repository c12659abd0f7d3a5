use std::{error::Error, fmt::{Debug, Display}, str::FromStr};

use tinyvec::TinyVec;

const ASCII_HYPHEN: u8 = b'-';
const ASCII_PERIOD: u8 = b'.';
const ASCII_BACKSLASH: u8 = b'\\';

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum LabelError {
    Empty,
    LongLabel(usize),
    LeadingHyphen,
    TrailingHyphen,
    BadChar { character: char, index: usize },
}

impl Error for LabelError {}
impl Display for LabelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty =>              write!(f, "Empty Label: a label must contain at least {} octet", Label::MIN_OCTETS),
            Self::LongLabel(length) =>  write!(f, "Label Exceeded {} Octets: label is {length} octets long", Label::MAX_OCTETS),
            Self::LeadingHyphen =>      write!(f, "Bad Leading Hyphen: a label must not begin with '-'"),
            Self::TrailingHyphen =>     write!(f, "Bad Trailing Hyphen: a label must not end with '-'"),
            Self::BadChar { character, index } => write!(f, "Bad Character: '{}' at position {index} is not a letter, digit, or hyphen", character.escape_default()),
        }
    }
}

/// A single, non-root label of a domain name.
///
/// https://www.rfc-editor.org/rfc/rfc1035#section-2.3.1
///
/// "The labels must follow the rules for ARPANET host names.  They must
/// start with a letter, end with a letter or digit, and have as interior
/// characters only letters, digits, and hyphen.  There are also some
/// restrictions on the length.  Labels must be 63 characters or less."
///
/// The leading-letter rule was relaxed by RFC 1123 so labels may start with a
/// digit. Labels built from text go through that policy. Labels read off the
/// wire only have their length checked, since any octet is legal there.
///
/// Labels compare exactly (case-sensitive). The suffix dictionary relies on
/// this so that a decoded name reproduces the encoded one byte for byte.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Label {
    // A TinyVec with a length of 14 has a size of 24 bytes. This is the same size as a Vec.
    octets: TinyVec<[u8; 14]>,
}

impl Label {
    pub const MAX_OCTETS: usize = 63;
    pub const MIN_OCTETS: usize = 1;

    /// Validates `string` against the label policy and builds the label.
    #[inline]
    pub fn new(string: &str) -> Result<Self, LabelError> {
        Self::validate(string)?;
        Ok(Self { octets: string.as_bytes().iter().copied().collect() })
    }

    /// Checks a candidate label, reporting the first rule it breaks.
    pub fn validate(string: &str) -> Result<(), LabelError> {
        if string.is_empty() {
            return Err(LabelError::Empty);
        }

        for (index, character) in string.chars().enumerate() {
            if !(character.is_ascii_alphanumeric() || character == '-') {
                return Err(LabelError::BadChar { character, index });
            }
        }

        // Only ASCII remains so the byte length is the character count.
        if string.len() > Self::MAX_OCTETS {
            return Err(LabelError::LongLabel(string.len()));
        }

        match (string.as_bytes().first(), string.as_bytes().last()) {
            (Some(&ASCII_HYPHEN), _) => Err(LabelError::LeadingHyphen),
            (_, Some(&ASCII_HYPHEN)) => Err(LabelError::TrailingHyphen),
            _ => Ok(()),
        }
    }

    /// Builds a label from octets found in a wire buffer.
    #[inline]
    pub fn from_wire_octets(octets: &[u8]) -> Result<Self, LabelError> {
        match octets.len() {
            0 => Err(LabelError::Empty),
            1..=Self::MAX_OCTETS => Ok(Self { octets: octets.iter().copied().collect() }),
            length => Err(LabelError::LongLabel(length)),
        }
    }

    #[inline]
    pub fn octets(&self) -> &[u8] {
        &self.octets
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.octets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.octets.is_empty()
    }

    /// Number of octets this label occupies on the wire, including its length octet.
    #[inline]
    pub fn wire_len(&self) -> usize {
        self.octets.len() + 1
    }
}

impl FromStr for Label {
    type Err = LabelError;

    #[inline]
    fn from_str(string: &str) -> Result<Self, Self::Err> {
        Self::new(string)
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Presentation format escaping (RFC 1035 section 5.1). Only reachable for
        // labels that came off the wire.
        for character in self.octets.iter() {
            match *character {
                ASCII_PERIOD | ASCII_BACKSLASH => write!(f, "\\{}", *character as char)?,
                0x21..=0x7E => write!(f, "{}", *character as char)?,
                _ => write!(f, "\\{:03}", character)?,
            }
        }
        Ok(())
    }
}

impl Debug for Label {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Label: {self}")
    }
}
