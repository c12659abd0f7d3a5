#[cfg(test)]
mod domain_name_from_wire_test {
    use rstest::rstest;

    use crate::{serde::wire::{from_wire::FromWire, read_wire::{ReadWire, ReadWireError}}, types::domain_name::DomainName};

    fn from_wire(input: &[u8]) -> Result<Vec<DomainName>, ReadWireError> {
        let mut read_wire = ReadWire::from_bytes(input);
        Vec::<DomainName>::from_wire_format(&mut read_wire)
    }

    fn to_strings(domains: Vec<DomainName>) -> Vec<String> {
        domains.iter().map(DomainName::to_string).collect()
    }

    #[test]
    fn single_name_test() {
        let input = b"\x07example\x03com\x00";
        let mut read_wire = ReadWire::from_bytes(input);

        let output = DomainName::from_wire_format(&mut read_wire).unwrap();
        assert_eq!("example.com", output.to_string());
        assert!(read_wire.is_end_reached());
    }

    #[test]
    fn root_test() {
        let output = from_wire(&[0]).unwrap();
        assert_eq!(vec![DomainName::new_root()], output);
    }

    #[test]
    fn resumes_after_first_pointer_test() {
        // example.com, then www + pointer(0), then pointer(13) which itself ends in a pointer.
        let mut input = b"\x07example\x03com\x00".to_vec();
        input.extend(b"\x03www");
        input.extend([0xC0, 0x00]);
        input.extend([0xC0, 0x0D]);

        let output = from_wire(&input).unwrap();
        assert_eq!(vec!["example.com", "www.example.com", "www.example.com"], to_strings(output));
    }

    #[test]
    fn pointer_into_middle_of_name_test() {
        let mut input = b"\x04corp\x07example\x03com\x00".to_vec();
        input.extend([0xC0, 0x0D]);

        let output = from_wire(&input).unwrap();
        assert_eq!(vec!["corp.example.com", "com"], to_strings(output));
    }

    #[rstest]
    // A pointer to itself.
    #[case(&[0xC0, 0x00], ReadWireError::ForwardPointer { offset: 0, pointer: 0, limit: 0 })]
    // A pointer ahead of itself.
    #[case(&[0x00, 0xC0, 0x03, 0x00], ReadWireError::ForwardPointer { offset: 1, pointer: 3, limit: 1 })]
    // A pointer into its own name.
    #[case(&[0x01, b'a', 0xC0, 0x00], ReadWireError::ForwardPointer { offset: 2, pointer: 0, limit: 0 })]
    // Two names pointing at each other's labels.
    #[case(&[0x01, b'a', 0x00, 0x01, b'b', 0xC0, 0x06, 0xC0, 0x03], ReadWireError::ForwardPointer { offset: 5, pointer: 6, limit: 3 })]
    fn pointer_cycles_are_rejected(#[case] input: &[u8], #[case] expected: ReadWireError) {
        assert_eq!(Err(expected), from_wire(input));
    }

    #[test]
    fn pointer_chain_must_keep_decreasing_test() {
        // name 1: a. (offset 0)
        // name 2: b -> pointer to 0 (offset 3)
        // name 3: pointer to 3, which then points to 0: strictly decreasing, accepted.
        let input = [0x01, b'a', 0x00, 0x01, b'b', 0xC0, 0x00, 0xC0, 0x03];
        assert_eq!(vec!["a", "b.a", "b.a"], to_strings(from_wire(&input).unwrap()));

        // name 2 now points forward at the pointer that follows it.
        let input = [0x01, b'a', 0x00, 0x01, b'b', 0xC0, 0x07, 0xC0, 0x05];
        assert_eq!(
            Err(ReadWireError::ForwardPointer { offset: 5, pointer: 7, limit: 3 }),
            from_wire(&input)
        );
    }

    #[rstest]
    #[case(&[0x07, b'e', b'x'], ReadWireError::LabelOverrun { offset: 0, length: 7, remaining: 2 })]
    #[case(&[0x03, b'c', b'o', b'm'], ReadWireError::Truncated { offset: 4, needed: 1, remaining: 0 })]
    #[case(&[0x00, 0xC0], ReadWireError::Truncated { offset: 1, needed: 2, remaining: 1 })]
    #[case(&[0x40, 0x00], ReadWireError::ReservedLabelType { offset: 0, octet: 0x40 })]
    #[case(&[0x80, 0x00], ReadWireError::ReservedLabelType { offset: 0, octet: 0x80 })]
    fn malformed_buffers_are_rejected(#[case] input: &[u8], #[case] expected: ReadWireError) {
        let output = from_wire(input);
        assert_eq!(Err(expected.clone()), output);
        assert_eq!(expected.offset(), output.unwrap_err().offset());
    }

    #[test]
    fn long_domain_is_rejected_test() {
        // Five 63-octet labels need 321 octets.
        let mut input = Vec::new();
        for _ in 0..5 {
            input.push(63);
            input.extend([b'a'; 63]);
        }
        input.push(0);

        assert_eq!(
            Err(ReadWireError::LongDomain { offset: 192, octets: 257 }),
            from_wire(&input)
        );
    }

    #[test]
    fn long_domain_through_pointers_is_rejected_test() {
        // 3 * 64 + 1 = 193 octets behind the pointer plus 64 in front of it.
        let mut input = Vec::new();
        for _ in 0..3 {
            input.push(63);
            input.extend([b'a'; 63]);
        }
        input.push(0);
        input.push(63);
        input.extend([b'b'; 63]);
        input.extend([0xC0, 0x00]);

        let output = from_wire(&input);
        assert!(matches!(output, Err(ReadWireError::LongDomain { octets: 257, .. })), "{output:?}");
    }
}

#[cfg(test)]
mod circular_serde_sanity_test {
    use crate::{serde::wire::circular_test::gen_test_circular_serde_sanity_test, types::domain_name::DomainName};

    fn domains(names: &[&str]) -> Vec<DomainName> {
        names.iter().map(|name| DomainName::from_utf8(name).unwrap()).collect()
    }

    gen_test_circular_serde_sanity_test!(
        root_circular_serde_sanity_test,
        DomainName::from_utf8(".").unwrap()
    );
    gen_test_circular_serde_sanity_test!(
        tld_circular_serde_sanity_test,
        DomainName::from_utf8("com").unwrap()
    );
    gen_test_circular_serde_sanity_test!(
        name_circular_serde_sanity_test,
        DomainName::from_utf8("www.example.com").unwrap()
    );
    gen_test_circular_serde_sanity_test!(
        repetitive_labels_circular_serde_sanity_test,
        DomainName::from_utf8("www.example.com.www.example.com").unwrap()
    );
    gen_test_circular_serde_sanity_test!(
        search_list_circular_serde_sanity_test,
        domains(&["eng.corp.example.com", "corp.example.com", "example.com", "example.org", "ns1.example.org", "."])
    );
    gen_test_circular_serde_sanity_test!(
        repeated_names_circular_serde_sanity_test,
        domains(&["example.com", "example.com", "Example.com", "example.com"])
    );
}
