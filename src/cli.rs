use std::env;
use std::path::PathBuf;

use crate::config::{AlignConfig, InputConfig, JobConfig, OutputConfig};

pub struct CliOptions {
    pub job: Option<PathBuf>,
    pub files: Vec<String>,
    pub int_columns: Vec<String>,
    pub index_maps: bool,
    pub time_column: Option<String>,
    pub stations: Option<Vec<f64>>,
    pub tolerance: Option<f64>,
    pub csv_out: Option<String>,
    pub json: bool,
}

impl CliOptions {
    /// Builds a job from `--file` style options. Overrides given on the
    /// command line are applied on top of `base` when a job file was loaded.
    pub fn apply(&self, base: Option<JobConfig>) -> JobConfig {
        let mut cfg = base.unwrap_or_else(|| JobConfig {
            input: InputConfig {
                files: self.files.clone(),
                ..InputConfig::default()
            },
            align: AlignConfig::default(),
            output: OutputConfig::default(),
        });
        cfg.input.int_columns.extend(self.int_columns.iter().cloned());
        cfg.input.index_maps |= self.index_maps;
        if let Some(name) = &self.time_column {
            cfg.align.time_column = Some(name.clone());
        }
        if let Some(stations) = &self.stations {
            cfg.align.stations = stations.clone();
        }
        if let Some(tol) = self.tolerance {
            cfg.align.tolerance = tol;
        }
        if let Some(path) = &self.csv_out {
            cfg.output.csv = Some(path.clone());
        }
        cfg.output.json |= self.json;
        cfg
    }
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    if args.len() == 1 && (args[0] == "--help" || args[0] == "-h") {
        print_usage();
        std::process::exit(0);
    }
    parse_options(&args)
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut opts = CliOptions {
        job: None,
        files: Vec::new(),
        int_columns: Vec::new(),
        index_maps: false,
        time_column: None,
        stations: None,
        tolerance: None,
        csv_out: None,
        json: false,
    };

    while i < args.len() {
        match args[i].as_str() {
            "--job" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --job (expected a TOML file path)")?;
                if opts.job.replace(PathBuf::from(path)).is_some() {
                    return Err("--job provided more than once".to_string());
                }
            }
            "--file" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --file (expected a file path)")?;
                opts.files.push(path.to_string());
            }
            "--int-cols" => {
                i += 1;
                let list = args.next_or_err(
                    i,
                    "missing value for --int-cols (expected comma-separated column names)",
                )?;
                opts.int_columns.extend(
                    list.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string),
                );
            }
            "--maps" => opts.index_maps = true,
            "--time-column" => {
                i += 1;
                let name = args.next_or_err(i, "missing value for --time-column")?;
                opts.time_column = Some(name.to_string());
            }
            "--stations" => {
                i += 1;
                let list = args.next_or_err(
                    i,
                    "missing value for --stations (expected comma-separated times)",
                )?;
                opts.stations = Some(parse_float_list(list)?);
            }
            "--tolerance" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --tolerance")?;
                let tol = raw
                    .parse::<f64>()
                    .map_err(|_| format!("--tolerance value \"{raw}\" is not a number"))?;
                opts.tolerance = Some(tol);
            }
            "--csv-out" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --csv-out (expected a file path)")?;
                if opts.csv_out.replace(path.to_string()).is_some() {
                    return Err("--csv-out provided more than once".to_string());
                }
            }
            "--json" => opts.json = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if opts.job.is_some() && !opts.files.is_empty() {
        return Err(
            "arguments `--job` and `--file` are mutually exclusive; choose one source".to_string(),
        );
    }
    if opts.job.is_none() && opts.files.is_empty() {
        return Err("no input: pass --job <path> or at least one --file <path>".to_string());
    }

    Ok(opts)
}

fn parse_float_list(list: &str) -> Result<Vec<f64>, String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| format!("station \"{s}\" is not a number"))
        })
        .collect()
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  restab [--job <path> | --file <path>...] [--int-cols a,b] [--maps]");
    eprintln!("         [--time-column <name>] [--stations t0,t1,-1] [--tolerance <x>]");
    eprintln!("         [--csv-out <path>] [--json]");
    eprintln!();
    eprintln!("Several --file arguments are concatenated in the given (time) order.");
    eprintln!("A negative station stands for the final available time.");
}

#[cfg(test)]
mod tests {
    use super::parse_args_from;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn supports_job_cli() {
        let opts = parse_args_from(args(&["--job", "job.toml"])).expect("parse should succeed");
        assert_eq!(
            opts.job.as_deref().and_then(|p| p.to_str()),
            Some("job.toml")
        );
        assert!(opts.files.is_empty());
    }

    #[test]
    fn repeated_files_are_kept_in_order() {
        let opts = parse_args_from(args(&["--file", "a.res", "--file", "b.res"]))
            .expect("parse should succeed");
        assert_eq!(opts.files, vec!["a.res", "b.res"]);
    }

    #[test]
    fn stations_and_int_columns() {
        let opts = parse_args_from(args(&[
            "--file",
            "a.res",
            "--stations",
            "0, 0.5,-1",
            "--int-cols",
            "idx,num",
            "--tolerance",
            "1e-6",
        ]))
        .expect("parse should succeed");
        assert_eq!(opts.stations, Some(vec![0.0, 0.5, -1.0]));
        assert_eq!(opts.int_columns, vec!["idx", "num"]);
        assert_eq!(opts.tolerance, Some(1e-6));
    }

    #[test]
    fn job_and_file_are_exclusive() {
        let err = parse_args_from(args(&["--job", "j.toml", "--file", "a.res"]));
        assert!(err.is_err());
    }

    #[test]
    fn input_is_required() {
        assert!(parse_args_from(args(&["--json"])).is_err());
    }

    #[test]
    fn bad_station_rejected() {
        let err = parse_args_from(args(&["--file", "a.res", "--stations", "0,x"]));
        assert!(err.is_err_and(|e| e.contains("\"x\"")));
    }

    #[test]
    fn overrides_apply_on_top_of_job() {
        let opts = parse_args_from(args(&["--job", "j.toml", "--stations", "1", "--json"]))
            .expect("parse should succeed");
        let base = crate::config::JobConfig::from_toml_str(
            "[input]\nfiles = [\"a.res\"]\n[align]\nstations = [0.0]\ntolerance = 0.1\n",
        )
        .expect("TOML should parse");
        let cfg = opts.apply(Some(base));
        assert_eq!(cfg.input.files, vec!["a.res"]);
        assert_eq!(cfg.align.stations, vec![1.0]);
        assert_eq!(cfg.align.tolerance, 0.1);
        assert!(cfg.output.json);
    }
}
