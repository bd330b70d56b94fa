// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration test for process-wide secure mode.
//!
//! Secure mode cannot be switched off again, so this file holds a single test
//! and runs in its own process.

use optcfg::prelude::*;

#[derive(Debug, Default)]
struct Solver {
    threads: i32,
    name: String,
}

impl Configurable for Solver {
    fn options() -> ClassSpec<Self> {
        ClassSpec::new("solver")
            .option(OptionSpec::field(
                "threads",
                |s: &Solver| &s.threads,
                |s, v| s.threads = v,
            ))
            .option(OptionSpec::field("name", |s: &Solver| &s.name, |s, v| s.name = v).secure())
    }
}

#[test]
fn test_global_secure_mode() {
    let earlier = Configuration::builder()
        .set_option("solver.threads", "4")
        .set_option("solver.name", "fast")
        .build()
        .unwrap();
    let mut solver = Solver::default();
    earlier.inject(&mut solver).unwrap();
    assert_eq!(solver.threads, 4);

    Configuration::enable_secure_mode_globally();
    assert!(ConverterRegistry::global().is_secure_mode());

    // secure options and unset options are still fine
    let config = Configuration::builder()
        .set_option("solver.name", "safe")
        .build()
        .unwrap();
    let mut solver = Solver::default();
    config.inject(&mut solver).unwrap();
    assert_eq!(solver.name, "safe");

    let error = config_with_threads().inject(&mut Solver::default()).unwrap_err();
    assert!(error.is_user_error());
    assert!(error.to_string().contains("secure mode"));

    // configurations built earlier share the registry and are affected too
    let error = earlier.inject(&mut Solver::default()).unwrap_err();
    assert!(error.to_string().contains("solver.threads"));

    // unsafe paths are refused for the directories of the file converter
    let error = Configuration::builder()
        .set_option("rootDirectory", "/etc")
        .build()
        .unwrap_err();
    assert!(error.to_string().contains("forbidden in safe mode"));
}

fn config_with_threads() -> Configuration {
    Configuration::builder()
        .set_option("solver.threads", "2")
        .build()
        .unwrap()
}
