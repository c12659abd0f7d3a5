#[cfg(test)]
mod domain_name_to_wire_test {
    use crate::{serde::wire::{compression_map::CompressionMap, to_wire::ToWire, write_wire::{WriteWire, WriteWireError}}, types::domain_name::DomainName};

    fn domains(names: &[&str]) -> Vec<DomainName> {
        names.iter().map(|name| DomainName::from_utf8(name).unwrap()).collect()
    }

    fn to_wire(input: &Vec<DomainName>, compression_map: &mut Option<CompressionMap>) -> Vec<u8> {
        let mut write_wire_buffer = vec![0_u8; input.serial_length()];
        let mut write_wire = WriteWire::from_bytes(&mut write_wire_buffer);
        let output = input.to_wire_format(&mut write_wire, compression_map);

        assert!(output.is_ok(), "{}", output.unwrap_err());
        write_wire.current().to_vec()
    }

    #[test]
    fn single_name_test() {
        let input = domains(&["example.com"]);
        let expected = b"\x07example\x03com\x00";

        assert_eq!(expected.as_slice(), to_wire(&input, &mut None));
        assert_eq!(expected.as_slice(), to_wire(&input, &mut Some(CompressionMap::new())));
    }

    #[test]
    fn root_test() {
        let input = domains(&[".", "."]);
        assert_eq!(&[0, 0], to_wire(&input, &mut Some(CompressionMap::new())).as_slice());
    }

    #[test]
    fn shared_suffix_becomes_pointer_test() {
        let input = domains(&["corp.example.com", "example.com"]);
        let output = to_wire(&input, &mut Some(CompressionMap::new()));

        // "corp.example.com" is 18 octets. "example.com" starts 5 octets in.
        let mut expected = b"\x04corp\x07example\x03com\x00".to_vec();
        expected.extend([0xC0, 0x05]);
        assert_eq!(expected, output);
    }

    #[test]
    fn literal_prefix_then_pointer_test() {
        let input = domains(&["a.example.com", "b.example.com"]);
        let compressed = to_wire(&input, &mut Some(CompressionMap::new()));
        let uncompressed = to_wire(&input, &mut None);

        let mut expected = b"\x01a\x07example\x03com\x00".to_vec();
        expected.extend(b"\x01b");
        expected.extend([0xC0, 0x02]);
        assert_eq!(expected, compressed);
        assert!(compressed.len() < uncompressed.len());
    }

    #[test]
    fn pointers_reach_the_earliest_copy_test() {
        // "com" is first written at offset 8. Both later names point there.
        let input = domains(&["example.com", "test.org.com", "com"]);
        let output = to_wire(&input, &mut Some(CompressionMap::new()));

        let mut expected = b"\x07example\x03com\x00".to_vec();
        expected.extend(b"\x04test\x03org");
        expected.extend([0xC0, 0x08]);
        expected.extend([0xC0, 0x08]);
        assert_eq!(expected, output);
    }

    #[test]
    fn literal_prefix_suffixes_are_reusable_test() {
        let input = domains(&["example.com", "www.example.com", "www.example.com"]);
        let output = to_wire(&input, &mut Some(CompressionMap::new()));

        // 13 octets for example.com, then "www" + pointer to 0 at offset 13, then a
        // pointer straight to that copy.
        let mut expected = b"\x07example\x03com\x00".to_vec();
        expected.extend(b"\x03www");
        expected.extend([0xC0, 0x00]);
        expected.extend([0xC0, 0x0D]);
        assert_eq!(expected, output);
    }

    #[test]
    fn distinct_names_stay_literal_test() {
        let input = domains(&["example.com", "example.org"]);
        let compressed = to_wire(&input, &mut Some(CompressionMap::new()));
        let uncompressed = to_wire(&input, &mut None);

        // Only whole suffixes are shared; "example" alone is not a suffix.
        assert_eq!(uncompressed, compressed);
    }

    #[test]
    fn overflow_test() {
        let input = DomainName::from_utf8("example.com").unwrap();
        let mut write_wire_buffer = [0_u8; 5];
        let mut write_wire = WriteWire::from_bytes(&mut write_wire_buffer);

        let output = input.to_wire_format(&mut write_wire, &mut None);
        assert!(matches!(output, Err(WriteWireError::OverflowError(_))));
    }
}
