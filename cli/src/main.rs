//! slideweight CLI - find the slides that make a PowerPoint file heavy
//!
//! Ranks slides by the bytes of embedded images, movies and sounds they
//! carry, and optionally reports image savings or master/layout media.

use clap::Parser;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use slideweight::render::{self, JsonFormat, ReportOptions};
use slideweight::AnalysisOptions;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Attribute embedded media weight to PowerPoint slides
#[derive(Parser)]
#[command(
    name = "slideweight",
    version,
    about = "Rank the slides of a .pptx file by embedded media size",
    long_about = "slideweight - find the slides that make a PowerPoint file heavy.\n\n\
                  Attributes the bytes of embedded images, videos and audio to the slides\n\
                  that use them and ranks slides by their media weight."
)]
struct Cli {
    /// Path to the .pptx file
    input_path: PathBuf,

    /// Show only the top N heaviest slides
    #[arg(long, value_name = "N")]
    top: Option<usize>,

    /// Also write results as JSON to PATH
    #[arg(long, value_name = "PATH")]
    output_json: Option<PathBuf>,

    /// Also write results as CSV to PATH
    #[arg(long, value_name = "PATH")]
    output_csv: Option<PathBuf>,

    /// Count shared media on every slide that uses it
    #[arg(long, conflicts_with = "ignore_shared_media")]
    include_shared_media: bool,

    /// Count shared media only on its first slide (default)
    #[arg(long)]
    ignore_shared_media: bool,

    /// Report image resize and recompression opportunities instead
    #[arg(long)]
    optimization_report: bool,

    /// Report media on slide masters and layouts instead
    #[arg(long)]
    masters_report: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    if std::env::args_os().len() <= 1 {
        print_banner();
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> slideweight::Result<()> {
    let input = cli.input_path.display().to_string();
    let pb = (!cli.verbose).then(|| create_spinner("Analyzing presentation..."));
    let finish = |pb: &Option<ProgressBar>| {
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
    };

    if cli.masters_report {
        let report = slideweight::masters_report_file(&cli.input_path);
        finish(&pb);
        print!("{}", render::render_masters_report(&report?, &input));
        return Ok(());
    }

    if cli.optimization_report {
        let opportunities = slideweight::analyze_optimizations_file(&cli.input_path);
        finish(&pb);
        print!(
            "{}",
            render::render_optimization_report(&opportunities?, &input)
        );
        return Ok(());
    }

    let options = AnalysisOptions::new()
        .with_include_shared(cli.include_shared_media && !cli.ignore_shared_media);
    let analysis = slideweight::analyze_file(&cli.input_path, &options);
    finish(&pb);
    let analysis = analysis?;

    if !analysis.warnings.is_empty() {
        eprintln!(
            "{} {} media shape(s) could not be read and were skipped",
            "!".yellow().bold(),
            analysis.warnings.len()
        );
    }

    let report_options = ReportOptions::new()
        .with_top(cli.top.unwrap_or(0))
        .with_json_format(JsonFormat::Pretty);
    print!(
        "{}",
        render::render_ranking(&analysis.results, &input, &report_options)
    );

    if let Some(path) = &cli.output_json {
        render::write_json(&analysis.results, path, report_options.json_format)?;
        println!("{} JSON written to {}", "✓".green().bold(), path.display());
    }

    if let Some(path) = &cli.output_csv {
        render::write_csv(&analysis.results, path)?;
        println!("{} CSV written to {}", "✓".green().bold(), path.display());
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_banner() {
    println!("{} {}", "slideweight".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("{}", "=".repeat(35));
    println!();
    println!("Finds the slides of a .pptx file that contribute most to its size");
    println!("through embedded media (images, videos, audio).");
    println!();
    println!("{}", "Usage:".bold());
    println!("  slideweight <file.pptx>                       Rank slides by media size");
    println!("  slideweight <file.pptx> --top 5               Show the 5 heaviest slides");
    println!("  slideweight <file.pptx> --optimization-report Find image savings");
    println!("  slideweight <file.pptx> --masters-report      Analyze slide masters/layouts");
    println!();
    println!("Run with --help for all options.");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.blue} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
