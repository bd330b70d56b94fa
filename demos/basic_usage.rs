// SPDX-License-Identifier: MIT OR Apache-2.0

//! Basic usage example for the optcfg crate.
//!
//! This example loads an option file, layers command-line arguments on top,
//! injects the values into a configurable type and reports unused options.
//!
//! Run with:
//! ```sh
//! cargo run --example basic_usage -- --analysis.threads=4 --analysis.limit=90s
//! ```

use optcfg::impl_option_enum;
use optcfg::prelude::*;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Strategy {
    Greedy,
    Exhaustive,
}

impl_option_enum!(Strategy { Greedy => "GREEDY", Exhaustive => "EXHAUSTIVE" });

#[derive(Debug)]
struct Analysis {
    threads: i32,
    strategy: Strategy,
    limit_ms: i64,
    report: Option<PathBuf>,
    files: Vec<String>,
}

impl Default for Analysis {
    fn default() -> Self {
        Analysis {
            threads: 1,
            strategy: Strategy::Greedy,
            limit_ms: 60_000,
            report: Some(PathBuf::from("report.txt")),
            files: Vec::new(),
        }
    }
}

impl Configurable for Analysis {
    fn options() -> ClassSpec<Self> {
        ClassSpec::new("analysis")
            .option(
                OptionSpec::field("threads", |a: &Analysis| &a.threads, |a, v| a.threads = v)
                    .secondary(IntegerOption::range(1, 64))
                    .description("number of worker threads"),
            )
            .option(OptionSpec::field(
                "strategy",
                |a: &Analysis| &a.strategy,
                |a, v| a.strategy = v,
            ))
            .option(
                OptionSpec::field("limit_ms", |a: &Analysis| &a.limit_ms, |a, v| a.limit_ms = v)
                    .name("limit")
                    .secondary(TimeSpanOption::new(TimeUnit::Milliseconds, TimeUnit::Seconds)),
            )
            .option(
                OptionSpec::field("report", |a: &Analysis| &a.report, |a, v| a.report = v)
                    .secondary(FileOption::new(FileKind::OutputFile)),
            )
            .option(OptionSpec::field("files", |a: &Analysis| &a.files, |a, v| a.files = v))
    }
}

const OPTIONS: &str = "\
// defaults for the demo
[analysis]
strategy = exhaustive
files = main.c, \\
        util.c
[]
log.usedOptions.export = true
";

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== optcfg basic usage ===\n");

    let cmdline = CommandLineAdapter::from_env_args()?;
    let config = Configuration::builder()
        .load_from_string(OPTIONS, None, "demo.properties")?
        .set_parsed_options(cmdline.into_parsed_options())
        .build()?;

    println!("Effective options:\n{}", config.as_properties_string());

    let mut analysis = Analysis::default();
    config.inject(&mut analysis)?;
    println!("Injected: {analysis:#?}");

    let unused = config.get_unused_properties();
    if !unused.is_empty() {
        println!("Unused options: {unused:?}");
    }

    Ok(())
}
