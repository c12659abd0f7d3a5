use std::collections::{HashMap, hash_map::Entry};

use log::{debug, trace};
use ux::u14;

use crate::types::label::Label;

/// The suffix dictionary used while compressing one buffer: every label
/// sequence that was written literally, mapped to the offset where it starts.
///
/// The first offset recorded for a suffix is the one that is kept, so pointers
/// always refer to the earliest copy.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct CompressionMap {
    map: HashMap<Vec<Label>, u14>,
}

impl CompressionMap {
    /// We have 14 bits for the compression pointer.
    pub const MAX_COMPRESSION_OFFSET: u16 = 0b0011_1111_1111_1111;

    #[inline]
    pub fn new() -> CompressionMap {
        Self { map: HashMap::new() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Records `labels` as starting at `offset`, unless it is already known.
    ///
    /// Offsets that do not fit in 14 bits are skipped. Those suffixes stay
    /// literal because no pointer could ever refer to them.
    pub fn insert_slice_labels(&mut self, labels: &[Label], offset: usize) -> bool {
        if labels.is_empty() {
            return false;
        }

        let pointer = match u16::try_from(offset) {
            Ok(pointer) if pointer <= Self::MAX_COMPRESSION_OFFSET => u14::new(pointer),
            _ => {
                debug!(offset = offset; "Suffix starts beyond the 14-bit pointer range; it will not be compressed");
                return false;
            },
        };

        match self.map.entry(labels.to_vec()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                trace!(offset = offset, labels = labels.len(); "Registered suffix");
                entry.insert(pointer);
                true
            },
        }
    }

    #[inline]
    pub fn find_from_slice_labels(&self, labels: &[Label]) -> Option<u14> {
        self.map.get(labels).copied()
    }
}

#[cfg(test)]
mod compression_map_tests {
    use ux::u14;

    use crate::types::domain_name::DomainName;

    use super::CompressionMap;

    #[test]
    fn first_offset_wins() {
        let domain = DomainName::from_utf8("example.com").unwrap();
        let mut map = CompressionMap::new();

        assert!(map.insert_slice_labels(domain.labels(), 10));
        assert!(!map.insert_slice_labels(domain.labels(), 2));
        assert_eq!(Some(u14::new(10)), map.find_from_slice_labels(domain.labels()));
        assert_eq!(None, map.find_from_slice_labels(&domain.labels()[1..]));
    }

    #[test]
    fn offsets_beyond_fourteen_bits_are_not_recorded() {
        let domain = DomainName::from_utf8("example.com").unwrap();
        let mut map = CompressionMap::new();

        assert!(map.insert_slice_labels(domain.labels(), CompressionMap::MAX_COMPRESSION_OFFSET as usize));
        assert!(!map.insert_slice_labels(&domain.labels()[1..], CompressionMap::MAX_COMPRESSION_OFFSET as usize + 1));
        assert_eq!(1, map.len());
    }

    #[test]
    fn root_is_never_recorded() {
        let mut map = CompressionMap::new();
        assert!(!map.insert_slice_labels(&[], 0));
        assert!(map.is_empty());
    }
}
