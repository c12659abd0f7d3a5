use std::{error::Error, fmt::{Debug, Display}, str::FromStr};

use crate::types::label::{Label, LabelError};

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum DomainNameError {
    Empty,
    LeadingDot,
    TrailingDot,
    ConsecutiveDots,
    LongDotted(usize),
    LongDomain(usize),
    Label { index: usize, error: LabelError },
}

impl Error for DomainNameError {}
impl Display for DomainNameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty =>              write!(f, "Empty Domain Name: use '.' for the root"),
            Self::LeadingDot =>         write!(f, "Bad Leading Dot: domain name must not begin with a '.' except for in the root zone"),
            Self::TrailingDot =>        write!(f, "Bad Trailing Dot: domain name must not end with a '.'"),
            Self::ConsecutiveDots =>    write!(f, "Two Consecutive Dots: domain name must not contain two consecutive dots '..'"),
            Self::LongDotted(length) => write!(f, "Domain Name Exceeded {} Characters: domain name is {length} characters long", DomainName::MAX_DOTTED_LEN),
            Self::LongDomain(octets) => write!(f, "Domain Name Exceeded {} Wire-Format Octets: domain name needs {octets} octets", DomainName::MAX_OCTETS),
            Self::Label { index, error } => write!(f, "Label {}: {error}", index + 1),
        }
    }
}

/// A domain name as an ordered sequence of labels. The root is the name with
/// no labels.
///
/// https://www.rfc-editor.org/rfc/rfc1035#section-3.1
///
/// "To simplify implementations, the total length of a domain name (i.e.,
/// label octets and label length octets) is restricted to 255 octets or
/// less."
///
/// Every constructor enforces that limit, so a `DomainName` always fits in a
/// single wire-format name.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct DomainName {
    labels: Vec<Label>,
}

impl DomainName {
    /// Maximum number of octets in the wire form, including every length octet
    /// and the terminating root label.
    pub const MAX_OCTETS: usize = 255;
    /// Maximum length of the dotted text form. This is the wire limit minus the
    /// first length octet and the terminator.
    pub const MAX_DOTTED_LEN: usize = Self::MAX_OCTETS - 2;

    #[inline]
    pub fn new_root() -> Self {
        Self { labels: Vec::new() }
    }

    /// Splits a dotted domain name into validated labels.
    ///
    /// The single string `"."` is the root. Any other leading or trailing dot is
    /// rejected; names are entered without the closing dot.
    pub fn from_utf8(string: &str) -> Result<Self, DomainNameError> {
        match string {
            "" => return Err(DomainNameError::Empty),
            "." => return Ok(Self::new_root()),
            _ if string.starts_with('.') => return Err(DomainNameError::LeadingDot),
            _ if string.ends_with('.') => return Err(DomainNameError::TrailingDot),
            _ if string.contains("..") => return Err(DomainNameError::ConsecutiveDots),
            _ => (),
        }

        let labels = string.split('.')
            .enumerate()
            .map(|(index, label)| Label::new(label).map_err(|error| DomainNameError::Label { index, error }))
            .collect::<Result<Vec<_>, _>>()?;

        // Labels are ASCII at this point, so byte and character counts agree.
        if string.len() > Self::MAX_DOTTED_LEN {
            return Err(DomainNameError::LongDotted(string.len()));
        }

        Self::from_labels(labels)
    }

    /// Builds a name from labels that have already been validated.
    pub fn from_labels(labels: Vec<Label>) -> Result<Self, DomainNameError> {
        let octets = Self::wire_len_of(&labels);
        if octets > Self::MAX_OCTETS {
            return Err(DomainNameError::LongDomain(octets));
        }
        Ok(Self { labels })
    }

    #[inline]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    #[inline]
    pub fn into_labels(self) -> Vec<Label> {
        self.labels
    }

    #[inline]
    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    /// Length of the uncompressed wire form.
    #[inline]
    pub fn wire_len(&self) -> usize {
        Self::wire_len_of(&self.labels)
    }

    /// Every non-empty suffix of this name, longest first. `www.example.com`
    /// yields `www.example.com`, `example.com`, then `com`.
    #[inline]
    pub fn suffixes<'a>(&'a self) -> impl 'a + Iterator<Item = &'a [Label]> {
        (0..self.labels.len()).map(|index| &self.labels[index..])
    }

    #[inline]
    fn wire_len_of(labels: &[Label]) -> usize {
        // The `+ 1` is the root label's length octet.
        labels.iter().map(Label::wire_len).sum::<usize>() + 1
    }
}

impl FromStr for DomainName {
    type Err = DomainNameError;

    #[inline]
    fn from_str(string: &str) -> Result<Self, Self::Err> {
        Self::from_utf8(string)
    }
}

impl Display for DomainName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut labels = self.labels.iter();
        match labels.next() {
            None => write!(f, "."),
            Some(first) => {
                write!(f, "{first}")?;
                for label in labels {
                    write!(f, ".{label}")?;
                }
                Ok(())
            },
        }
    }
}

impl Debug for DomainName {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DomainName: {self}")
    }
}
