use proptest::prelude::*;

use super::super::*;

proptest! {
    #[test]
    fn block_hash_display_fromstr_roundtrip(hash in any::<Hash>()) {
        let display = format!("{}", hash);
        let parsed = display.parse::<Hash>().expect("hash should parse");
        prop_assert_eq!(hash, parsed);
    }

    #[test]
    fn header_hash_is_stable(header in any::<Header>()) {
        prop_assert_eq!(header.hash(), header.hash());
    }

    #[test]
    fn header_read_from_roundtrip(header in any::<Header>()) {
        let read_back = Header::read_from(&header.as_bytes()[..]).expect("80 bytes are enough");
        prop_assert_eq!(header, read_back);
    }
}

#[test]
fn header_read_from_rejects_short_input() {
    assert!(Header::read_from(&[0u8; 79]).is_err());
}

#[test]
fn block_hash_is_header_hash() {
    let header = Header::from_bytes_exact([7u8; 80]);
    let block = Block {
        header,
        transactions: Vec::new(),
    };
    assert_eq!(block.hash(), header.hash());
}
