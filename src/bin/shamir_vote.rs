//! Minimal CLI for reconstructing secrets from JSON case files.
//!
//! `reconstruct` runs the majority vote over every case given on the command
//! line, `shares` prints the decoded shares of a case without voting.

use shamir_vote::{
    load_case, reconstruct_with, render_lines, write_report, InterpolationMode, Parallelism,
    ReconstructOptions, ReportDocument,
};
use std::{
    env,
    path::{Path, PathBuf},
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn fatal(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

fn print_help() {
    println!("Usage: shamir_vote <reconstruct|shares> ...");
    println!("  reconstruct <case.json>... [--json] [--exact] [--sequential] [--output <dir>]");
    println!("  shares <case.json>");
    println!();
    println!("Log verbosity follows RUST_LOG (default: info).");
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let mut args = env::args().skip(1);
    let command = args.next();
    match command.as_deref() {
        Some("reconstruct") => cmd_reconstruct(args.collect()),
        Some("shares") => cmd_shares(args.collect()),
        Some("-h") | Some("--help") => print_help(),
        _ => {
            print_help();
            std::process::exit(1);
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct ReconstructArgs {
    files: Vec<PathBuf>,
    json: bool,
    output: Option<PathBuf>,
    options: ReconstructOptions,
}

fn parse_reconstruct_args(args: Vec<String>) -> Result<ReconstructArgs, String> {
    let mut parsed = ReconstructArgs::default();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => parsed.json = true,
            "--exact" => parsed.options.mode = InterpolationMode::Exact,
            "--sequential" => parsed.options.parallelism = Parallelism::Sequential,
            "--output" => {
                let dir = iter
                    .next()
                    .ok_or_else(|| "--output expects a value".to_string())?;
                parsed.output = Some(PathBuf::from(dir));
            }
            other if other.starts_with("--") => return Err(format!("unknown argument: {other}")),
            path => parsed.files.push(PathBuf::from(path)),
        }
    }
    if parsed.files.is_empty() {
        return Err("reconstruct expects at least one case file".to_string());
    }
    Ok(parsed)
}

fn cmd_reconstruct(args: Vec<String>) {
    let parsed = parse_reconstruct_args(args).unwrap_or_else(|err| fatal(&err));
    let mut failures = 0usize;
    for path in &parsed.files {
        if let Err(err) = run_case(path, &parsed) {
            error!(file = %path.display(), "{err}");
            failures += 1;
        }
    }
    if failures > 0 {
        fatal(&format!("{failures} of {} cases failed", parsed.files.len()));
    }
}

fn run_case(path: &Path, parsed: &ReconstructArgs) -> Result<(), String> {
    let case = load_case(path).map_err(|err| err.to_string())?;
    for advisory in case.advisories() {
        warn!(file = %path.display(), "{advisory}");
    }
    let result =
        reconstruct_with(&case.shares, case.k, &parsed.options).map_err(|err| err.to_string())?;
    let label = path.display().to_string();
    let lines = render_lines(&label, &result);
    if parsed.json {
        let doc = ReportDocument::new(&label, &result)
            .to_json()
            .map_err(|err| format!("failed to encode report: {err}"))?;
        println!("{doc}");
    } else {
        for line in &lines {
            println!("{line}");
        }
        println!();
    }
    if let Some(dir) = &parsed.output {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("case");
        let written = write_report(dir, stem, &lines)
            .map_err(|err| format!("failed to write report: {err}"))?;
        info!(report = %written.display(), "report written");
    }
    Ok(())
}

fn cmd_shares(args: Vec<String>) {
    if args.len() != 1 {
        fatal("Usage: shamir_vote shares <case.json>");
    }
    let path = Path::new(&args[0]);
    let case = load_case(path).unwrap_or_else(|err| fatal(&err.to_string()));
    println!("declared n: {}", case.declared_n);
    println!("threshold k: {}", case.k);
    for share in &case.shares {
        println!("{share}");
    }
    for advisory in case.advisories() {
        warn!(file = %path.display(), "{advisory}");
    }
}
