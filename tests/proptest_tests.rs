// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property-based tests using proptest.
//!
//! These tests use property-based testing to verify that the parser and the
//! converters handle arbitrary inputs correctly.

mod common;

use common::config_of;
use optcfg::adapters::OptionsFileParser;
use optcfg::domain::{OptionName, ParseErrorKind, TimeSpan};
use optcfg::prelude::*;
use optcfg::ports::ConfigParser;
use proptest::prelude::*;

const SEGMENT: &str = "[a-zA-Z0-9_+-]{1,8}";

fn option_name() -> impl Strategy<Value = String> {
    prop::collection::vec(SEGMENT, 1..4).prop_map(|segments| segments.join("."))
}

fn parse(content: &str) -> optcfg::domain::Result<optcfg::domain::ParsedOptions> {
    OptionsFileParser::new().parse(content, None, "proptest")
}

// Test that generated dotted names follow the option-name grammar
proptest! {
    #[test]
    fn test_generated_names_are_valid(name in option_name()) {
        prop_assert!(OptionName::is_valid(&name));
        prop_assert_eq!(OptionName::qualify("", &name), name.clone());
    }
}

// Test that names with empty segments are rejected
proptest! {
    #[test]
    fn test_empty_segments_are_invalid(a in SEGMENT, b in SEGMENT) {
        let double_dot = format!("{}..{}", a, b);
        let leading_dot = format!(".{}", a);
        let trailing_dot = format!("{}.", b);
        prop_assert!(!OptionName::is_valid(&double_dot));
        prop_assert!(!OptionName::is_valid(&leading_dot));
        prop_assert!(!OptionName::is_valid(&trailing_dot));
    }
}

// Test that any single assignment is parsed back with its trimmed value
proptest! {
    #[test]
    fn test_assignment_roundtrip(
        name in option_name(),
        value in "[a-zA-Z0-9 ,./:=-]{0,30}",
    ) {
        let content = format!("{} = {}\n", name, value);
        let parsed = parse(&content).unwrap();
        prop_assert_eq!(parsed.len(), 1);
        prop_assert_eq!(parsed.get(&name), Some(value.trim()));
    }
}

// Test that sections prefix every key below them
proptest! {
    #[test]
    fn test_section_prefixes_keys(section in option_name(), key in option_name()) {
        let content = format!("[{}]\n{} = v\n", section, key);
        let parsed = parse(&content).unwrap();
        let expected = format!("{}.{}", section, key);
        prop_assert_eq!(parsed.get(&expected), Some("v"));
    }
}

// Test that defining a key twice is always a duplicate-option error
proptest! {
    #[test]
    fn test_duplicate_keys_rejected(name in option_name(), a in "[a-z]{1,5}", b in "[a-z]{1,5}") {
        let content = format!("{} = {}\n{} = {}\n", name, a, name, b);
        let error = parse(&content).unwrap_err();
        prop_assert_eq!(error.parse_kind(), Some(ParseErrorKind::DuplicateOption));
    }
}

// Test that comment lines never produce options
proptest! {
    #[test]
    fn test_comments_are_ignored(text in "[a-zA-Z0-9=.][a-zA-Z0-9 =.]{0,29}") {
        let content = format!("# {}\n// {}\n", text, text);
        let parsed = parse(&content).unwrap();
        prop_assert!(parsed.is_empty());
    }
}

// Test that the parser never panics on arbitrary input
proptest! {
    #[test]
    fn test_parser_never_panics(content in "\\PC{0,200}") {
        let result = parse(&content);
        prop_assert!(result.is_ok() || result.is_err());
    }
}

// Test that integer options accept every value inside their range and reject the rest
proptest! {
    #[test]
    fn test_integer_range(n in -1000i64..1000) {
        struct Holder {
            value: i64,
        }

        impl Configurable for Holder {
            fn options() -> ClassSpec<Self> {
                ClassSpec::new("").option(
                    OptionSpec::field("value", |h: &Holder| &h.value, |h, v| h.value = v)
                        .secondary(IntegerOption::range(-100, 100)),
                )
            }
        }

        let text = n.to_string();
        let config = config_of(&[("value", text.as_str())]);
        let mut holder = Holder { value: 0 };
        let result = config.inject(&mut holder);
        if (-100..=100).contains(&n) {
            prop_assert!(result.is_ok());
            prop_assert_eq!(holder.value, n);
        } else {
            prop_assert!(result.unwrap_err().is_user_error());
        }
    }
}

// Test that time spans with a known unit parse to that unit
proptest! {
    #[test]
    fn test_time_span_units(
        n in 0i64..1_000_000,
        unit in prop::sample::select(vec![
            TimeUnit::Nanoseconds,
            TimeUnit::Milliseconds,
            TimeUnit::Seconds,
            TimeUnit::Minutes,
            TimeUnit::Hours,
        ]),
    ) {
        let text = format!("{}{}", n, unit.suffix());
        let span: TimeSpan = text.parse().unwrap();
        prop_assert_eq!(span, TimeSpan::of(n, unit));
    }
}

// Test that collection values are split on commas and trimmed
proptest! {
    #[test]
    fn test_list_splitting(items in prop::collection::vec("[a-z]{1,6}", 0..8)) {
        struct Holder {
            items: Vec<String>,
        }

        impl Configurable for Holder {
            fn options() -> ClassSpec<Self> {
                ClassSpec::new("").option(OptionSpec::field(
                    "items",
                    |h: &Holder| &h.items,
                    |h, v| h.items = v,
                ))
            }
        }

        let text = items.join(" , ");
        let config = config_of(&[("items", text.as_str())]);
        let mut holder = Holder { items: vec!["default".to_string()] };
        config.inject(&mut holder).unwrap();
        prop_assert_eq!(holder.items, items);
    }
}
