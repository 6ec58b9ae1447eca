use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use outrank_core::report::save_report;
use outrank_core::{
    TopDomainsReport, compute_top_domains, compute_top_second_level_domains,
    filter_external_outlinks,
};
use outrank_stream::sort::DEFAULT_CHUNK_SIZE;
use outrank_stream::{ExternalSorter, LinkRecord, TsvLinkReader};

pub fn print_banner() {
    println!("{}", "outrank".cyan().bold());
    println!("top external domains from crawl link streams\n");
}

/// Expand `~` in a user-supplied path
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Options for one top-domains batch run
pub struct TopDomainsOptions {
    pub count: usize,
    pub chunk_size: usize,
    pub spill_dir: Option<PathBuf>,
    pub skip_second_level: bool,
    pub show_progress: bool,
}

impl Default for TopDomainsOptions {
    fn default() -> Self {
        Self {
            count: 50,
            chunk_size: DEFAULT_CHUNK_SIZE,
            spill_dir: None,
            skip_second_level: false,
            show_progress: false,
        }
    }
}

/// Run both leaderboard passes over the outlinks stream at `input`.
/// The file is opened once per pass; each pass is a single sequential read.
pub fn run_top_domains(input: &Path, options: &TopDomainsOptions) -> anyhow::Result<TopDomainsReport> {
    let mut sorter = ExternalSorter::new(options.chunk_size);
    if let Some(dir) = &options.spill_dir {
        sorter = sorter.with_spill_dir(dir);
    }

    info!(
        "computing top {} domains from {}",
        options.count,
        input.display()
    );

    let spinner = progress_spinner(options.show_progress, "Ranking external domains...");
    let stream = open_stream(input, spinner.clone())?;
    let top_domains = compute_top_domains(stream, options.count, &sorter)
        .with_context(|| format!("ranking domains from {}", input.display()))?;
    finish_spinner(spinner, format!("{} domains retained", top_domains.len()));

    let top_second_level_domains = if options.skip_second_level {
        Vec::new()
    } else {
        let spinner = progress_spinner(options.show_progress, "Ranking second level domains...");
        let stream = open_stream(input, spinner.clone())?;
        let ranked = compute_top_second_level_domains(stream, options.count, &sorter)
            .with_context(|| format!("ranking second level domains from {}", input.display()))?;
        finish_spinner(spinner, format!("{} second level domains retained", ranked.len()));
        ranked
    };

    Ok(TopDomainsReport {
        top_domains,
        top_second_level_domains,
    })
}

/// Handle the `top-domains` subcommand
pub fn handle_top_domains(args: &ArgMatches, quiet: bool) -> anyhow::Result<()> {
    let input = expand_path(args.get_one::<String>("input").unwrap());
    let options = TopDomainsOptions {
        count: *args.get_one::<usize>("count").unwrap(),
        chunk_size: *args.get_one::<usize>("chunk-size").unwrap(),
        spill_dir: args.get_one::<String>("spill-dir").map(|raw| expand_path(raw)),
        skip_second_level: args.get_flag("skip-second-level"),
        show_progress: !quiet,
    };

    let report = run_top_domains(&input, &options)?;
    let json = report.to_json_string().context("serializing the report")?;

    match args.get_one::<String>("output") {
        Some(raw) => {
            let path = expand_path(raw);
            save_report(&json, &path)
                .with_context(|| format!("writing report to {}", path.display()))?;
            if !quiet {
                print_summary(&report);
                println!("\n✓ Report saved to {}", path.display());
            }
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn print_summary(report: &TopDomainsReport) {
    println!("\n{}", "Top external domains".bold());
    for (rank, (count, stats)) in report.top_domains.iter().enumerate() {
        println!(
            "  {:>3}. {}  {} unique follow links ({} follow / {} nofollow)",
            rank + 1,
            stats.name.cyan(),
            count,
            stats.follow,
            stats.nofollow
        );
    }
}

fn open_stream(
    path: &Path,
    progress: Option<ProgressBar>,
) -> anyhow::Result<impl Iterator<Item = outrank_stream::Result<LinkRecord>>> {
    let reader = TsvLinkReader::open(path)
        .with_context(|| format!("opening outlinks stream {}", path.display()))?;

    let mut processed: u64 = 0;
    let counted = reader.inspect(move |_| {
        processed += 1;
        if processed % 100_000 == 0
            && let Some(pb) = &progress
        {
            pb.set_message(format!("{} records read", processed));
        }
    });
    Ok(filter_external_outlinks(counted))
}

fn progress_spinner(show: bool, message: &str) -> Option<ProgressBar> {
    if !show {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message.to_string());
    Some(pb)
}

fn finish_spinner(spinner: Option<ProgressBar>, message: String) {
    if let Some(pb) = spinner {
        pb.finish_with_message(format!("✓ {}", message));
    }
}
