// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the layering of option sources.
//!
//! Later builder calls override earlier ones, a file's own assignments
//! override what it includes, and derived configurations override their base.

mod common;

use common::{config_of, isolated_builder, write_file};
use optcfg::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_file_loaded_after_manual_value_wins() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "key = from_file").unwrap();

    let config = isolated_builder()
        .set_option("key", "manual")
        .load_from_file(file.path())
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(config.get_property("key").as_deref(), Some("from_file"));
}

#[test]
fn test_manual_value_after_file_wins() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "key = from_file").unwrap();

    let config = isolated_builder()
        .load_from_file(file.path())
        .unwrap()
        .set_option("key", "manual")
        .build()
        .unwrap();
    assert_eq!(config.get_property("key").as_deref(), Some("manual"));
}

#[test]
fn test_second_file_overrides_first() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_file(dir.path(), "first.properties", "a = 1\nb = 1\n");
    let second = write_file(dir.path(), "second.properties", "b = 2\n");

    let config = isolated_builder()
        .load_from_file(&first)
        .unwrap()
        .load_from_file(&second)
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(config.get_property("a").as_deref(), Some("1"));
    assert_eq!(config.get_property("b").as_deref(), Some("2"));
}

#[test]
fn test_direct_assignment_beats_include_regardless_of_order() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "base.properties", "mode = base\n");
    let main = write_file(
        dir.path(),
        "main.properties",
        "mode = main\n#include base.properties\n",
    );

    let config = isolated_builder().load_from_file(&main).unwrap().build().unwrap();
    assert_eq!(config.get_property("mode").as_deref(), Some("main"));
}

#[test]
fn test_copy_layers_over_base() {
    let base = config_of(&[("a", "base"), ("b", "base")]);
    let derived = ConfigurationBuilder::new()
        .copy_from(&base)
        .unwrap()
        .set_option("b", "derived")
        .build()
        .unwrap();

    assert_eq!(derived.get_property("a").as_deref(), Some("base"));
    assert_eq!(derived.get_property("b").as_deref(), Some("derived"));
    assert_eq!(base.get_property("b").as_deref(), Some("base"));
}

#[test]
fn test_copy_inherits_prefix() {
    let base = isolated_builder()
        .set_prefix("cpa")
        .set_option("cpa.x", "1")
        .build()
        .unwrap();
    let derived = ConfigurationBuilder::new()
        .copy_from(&base)
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(derived.prefix(), "cpa.");
    assert_eq!(derived.get_property("x").as_deref(), Some("1"));
}

#[test]
fn test_prefixed_name_beats_plain_name() {
    let config = config_of(&[("x", "plain"), ("p.x", "prefixed")]);
    assert_eq!(
        config.copy_with_new_prefix("p").get_property("x").as_deref(),
        Some("prefixed")
    );
    assert_eq!(
        config.copy_with_new_prefix("q").get_property("x").as_deref(),
        Some("plain")
    );
}

#[test]
fn test_command_line_repeated_key_last_wins() {
    let config =
        Configuration::from_cmd_line_arguments(["--level=1", "--level", "2"]).unwrap();
    assert_eq!(config.get_property("level").as_deref(), Some("2"));
}
