use archway_keystore::{is_valid_address, validate_address, AccountError};
use proptest::prelude::*;

#[test]
fn accepts_both_payload_lengths() {
    assert!(is_valid_address("archway19rl4cm2hmr8afy4kldpxz3fka4jguq0aft3e4z", Some("archway")));
    assert!(is_valid_address(
        "archway1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq7evy9g",
        Some("archway")
    ));
}

#[test]
fn rejects_other_payload_lengths() {
    assert!(!is_valid_address("archway1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqlvy8lx", None));
    assert!(!is_valid_address(
        "archway1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqwkt57c",
        None
    ));
}

#[test]
fn foreign_prefix_fails_when_prefix_is_fixed() {
    let cosmos = "cosmos19rl4cm2hmr8afy4kldpxz3fka4jguq0auqdal4";
    assert!(is_valid_address(cosmos, None));
    assert!(matches!(
        validate_address(cosmos, Some("archway")),
        Err(AccountError::InvalidFormat(_))
    ));
}

proptest! {
    #[test]
    fn strings_without_separator_are_invalid(input in "[a-z02-9]{0,90}") {
        prop_assert!(!is_valid_address(&input, None));
    }

    #[test]
    fn truncated_addresses_are_invalid(cut in 1usize..44) {
        let address = "archway19rl4cm2hmr8afy4kldpxz3fka4jguq0aft3e4z";
        prop_assert!(!is_valid_address(&address[..address.len() - cut], None));
    }
}
