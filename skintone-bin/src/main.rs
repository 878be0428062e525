//! Detect the skin tone in images and print its category and recommended color palette.

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::unreadable_literal
)]

mod cli;

#[allow(clippy::wildcard_imports)]
use cli::*;

use std::{
    fmt::{self, Display},
    path::{Path, PathBuf},
    process::ExitCode,
    str::FromStr,
    time::Instant,
};

use clap::Parser;
use colored::Colorize;
use palette::Srgb;
use skintone::AnalysisResult;
use tracing::Level;

/// Record the running time of a function and log the elapsed time
macro_rules! time {
    ($name: literal, $func_call: expr) => {{
        let start = Instant::now();
        let result = $func_call;
        tracing::debug!("{} took {}ms", $name, start.elapsed().as_millis());
        result
    }};
}

/// Error cases for loading the analysis options file
#[derive(Debug)]
enum ConfigError {
    /// Failed to read the options file
    Read(std::io::Error),
    /// Failed to parse the options file
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Read(e) => write!(f, "Failed to read the config file: {e}"),
            ConfigError::Parse(e) => write!(f, "Failed to parse the config file: {e}"),
        }
    }
}

fn main() -> ExitCode {
    let options = Options::parse();
    init_logging(options.verbose);

    let analysis = match load_analysis_options(&options) {
        Ok(analysis) => analysis,
        Err(e) => {
            // Returning Result<_> uses Debug printing instead of Display
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let results = run_analyze_images(&options, &analysis);
    let all_detected = results.iter().all(|(_, result)| result.is_some());

    for (path, result) in &results {
        print_result(path, result.as_ref(), &options);
    }

    if all_detected {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Install the fmt subscriber, logging stage details only in verbose mode
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Read the options file if one was given, then apply the command line overrides
fn load_analysis_options(options: &Options) -> Result<skintone::Options, ConfigError> {
    let base = match &options.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
            serde_json::from_str(&text).map_err(ConfigError::Parse)?
        }
        None => skintone::Options::default(),
    };

    Ok(options.analysis_options(base))
}

/// Analyze a single image, logging how long it took
fn analyze_image(path: &Path, analysis: &skintone::Options) -> Option<AnalysisResult> {
    time!("Analysis", skintone::analyze_with(path, analysis))
}

/// Builds a thread pool and then analyzes each image in parallel
#[cfg(feature = "threads")]
fn run_analyze_images(
    options: &Options,
    analysis: &skintone::Options,
) -> Vec<(PathBuf, Option<AnalysisResult>)> {
    use rayon::prelude::*;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(usize::from(options.threads))
        .build()
        .expect("initialized thread pool");

    pool.install(|| {
        options
            .images
            .par_iter()
            .map(|path| (path.clone(), analyze_image(path, analysis)))
            .collect()
    })
}

/// Analyzes each image on a single thread
#[cfg(not(feature = "threads"))]
fn run_analyze_images(
    options: &Options,
    analysis: &skintone::Options,
) -> Vec<(PathBuf, Option<AnalysisResult>)> {
    options
        .images
        .iter()
        .map(|path| (path.clone(), analyze_image(path, analysis)))
        .collect()
}

/// Parse a `#rrggbb` hex string, falling back to black for malformed input
fn parse_hex(hex: &str) -> Srgb<u8> {
    Srgb::from_str(hex).unwrap_or(Srgb::new(0, 0, 0))
}

/// Print the result for one image based off the provided options
fn print_result(path: &Path, result: Option<&AnalysisResult>, options: &Options) {
    let Some(result) = result else {
        println!("{}: no skin tone detected", path.display());
        return;
    };

    match options.output {
        FormatOutput::Text => {
            println!("{}: {}", path.display(), result.season);
            println!("  skin tone: {}", colorize(&result.skin_tone, options));
            println!("  recommended: {}", colorize_all(&result.recommended_colors, options));
        }

        FormatOutput::Hex => println!(
            "{} {}",
            colorize(&result.skin_tone, options),
            colorize_all(&result.recommended_colors, options)
        ),

        FormatOutput::Json => match serde_json::to_string(result) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("{}: failed to serialize the result: {e}", path.display()),
        },

        FormatOutput::Swatch => println!(
            "{} {}",
            swatch(&result.skin_tone),
            result
                .recommended_colors
                .iter()
                .map(|hex| swatch(hex))
                .collect::<String>()
        ),
    }
}

/// A block of whitespace with the color as its true color background
fn swatch(hex: &str) -> String {
    let color = parse_hex(hex);
    "   "
        .on_truecolor(color.red, color.green, color.blue)
        .to_string()
}

/// Colorize a hex code with its own color based off the provided options
fn colorize(hex: &str, options: &Options) -> String {
    let color = parse_hex(hex);
    match options.colorize {
        Some(ColorizeOutput::Fg) => hex
            .truecolor(color.red, color.green, color.blue)
            .to_string(),
        Some(ColorizeOutput::Bg) => hex
            .on_truecolor(color.red, color.green, color.blue)
            .to_string(),
        None => hex.to_owned(),
    }
}

/// Colorize and join a list of hex codes
fn colorize_all(hexes: &[String], options: &Options) -> String {
    hexes
        .iter()
        .map(|hex| colorize(hex, options))
        .collect::<Vec<_>>()
        .join(" ")
}
