use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("outrank")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("outrank")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("top-domains")
                .about(
                    "Rank the external destination domains of a crawl's outlink stream by \
                distinct follow links.",
                )
                .arg(
                    arg!(-i --"input" <PATH>)
                        .required(true)
                        .help("Path to the raw outlinks TSV stream"),
                )
                .arg(
                    arg!(-n --"count" <N>)
                        .required(false)
                        .help("How many domains to retain per leaderboard")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("50"),
                )
                .arg(
                    arg!(--"chunk-size" <RECORDS>)
                        .required(false)
                        .help("Records held in memory before the sorter spills a chunk")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("100000"),
                )
                .arg(
                    arg!(--"spill-dir" <DIR>)
                        .required(false)
                        .help("Directory for sort spill files (default: system temp)"),
                )
                .arg(
                    arg!(--"skip-second-level")
                        .required(false)
                        .help("Skip the second pass that collapses subdomains")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save the JSON report to a file (default: print to stdout)"),
                ),
        )
}
