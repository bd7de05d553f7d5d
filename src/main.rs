//! restab entry point: CLI wiring and config-driven job execution.

use std::path::Path;
use std::process;

use restab::cli::parse_args;
use restab::config::JobConfig;
use restab::io::export::export_csv;
use restab::job::run_job;

fn main() {
    env_logger::init();

    let cli = match parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("error: {e}");
            restab::cli::print_usage();
            process::exit(1);
        }
    };

    // Job file first, command-line flags layered on top
    let base = match cli.job.as_deref() {
        Some(path) => match JobConfig::from_toml_file(path) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        },
        None => None,
    };
    let job = cli.apply(base);

    let errors = job.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let report = match run_job(&job) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    if job.output.json {
        match report.to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to render JSON: {e}");
                process::exit(1);
            }
        }
    } else {
        print!("{report}");
    }

    if let Some(ref path) = job.output.csv {
        if let Err(e) = export_csv(&report.selected, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Aligned rows written to {path}");
    }

    if report.missed() > 0 {
        log::warn!(
            "{} of {} stations had no matching time",
            report.missed(),
            report.requested
        );
    }
}
