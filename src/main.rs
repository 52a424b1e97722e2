use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};

use spark_submit_project::args::{compose, merged_flags_help};
use spark_submit_project::collect::collect;
use spark_submit_project::config::Settings;
use spark_submit_project::logging::{init_tracing, log_path_for};
use spark_submit_project::staging::PipWheel;
use spark_submit_project::submit::Submission;

/// Stage project dependencies and run spark-submit with them.
///
/// Every argument not listed below is forwarded to spark-submit. Existing
/// --py-files, --files and --archives values are merged with the collected
/// dependencies.
#[derive(Debug, Parser)]
#[command(
    name = "spark-submit-project",
    disable_help_flag = true,
    after_help = merged_flags_help()
)]
struct Cli {
    /// Configuration file [default: .spark-submit-project/ssp.toml]
    #[arg(long = "ssp-config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the composed spark-submit command instead of running it
    #[arg(long = "ssp-dry-run")]
    dry_run: bool,

    /// Print help
    #[arg(long = "ssp-help", action = clap::ArgAction::Help)]
    _help: Option<bool>,

    /// Arguments forwarded to spark-submit
    #[arg(
        value_name = "SPARK_ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    spark_args: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(Settings::default_path);

    let settings = match Settings::load_from(&config_path) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    };

    let log_path = log_path_for(&config_path);
    if let Err(e) = init_tracing(&settings.logging, &log_path) {
        eprintln!("Error: {e:#}");
        return ExitCode::from(1);
    }
    info!("Logs are being stored in {}", log_path.display());

    match run(&settings, cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(settings: &Settings, cli: Cli) -> Result<u8> {
    match settings.to_toml_string() {
        Ok(rendered) => debug!("Loaded settings:\n{rendered}"),
        Err(e) => debug!("Could not render settings: {e}"),
    }

    let resolver = PipWheel::new();
    let deps = collect(&settings.paths, &settings.options, &resolver)
        .context("failed to stage dependencies")?;
    if deps.is_empty() {
        info!("No dependencies were collected.");
    }

    let mut args = Vec::with_capacity(cli.spark_args.len() + 1);
    args.push(env!("CARGO_BIN_NAME").to_string());
    args.extend(cli.spark_args);
    compose(&mut args, &deps);

    let submission = Submission::new(args);
    debug!("Running the following command:\n\n  {}\n", submission.command_line());

    if cli.dry_run {
        println!("{}", submission.command_line());
        return Ok(0);
    }

    let code = submission.run().context("failed to run spark-submit")?;
    Ok(u8::try_from(code).unwrap_or(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("spark-submit-project").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn forwards_unknown_flags() {
        let cli = parse(&["--py-files", "old.py", "--master", "yarn", "main.py"]);
        assert!(cli.config.is_none());
        assert!(!cli.dry_run);
        assert_eq!(
            cli.spark_args,
            vec!["--py-files", "old.py", "--master", "yarn", "main.py"]
        );
    }

    #[test]
    fn wrapper_flags_before_spark_args() {
        let cli = parse(&["--ssp-config", "conf/ssp.toml", "--ssp-dry-run", "main.py", "-v"]);
        assert_eq!(cli.config, Some(PathBuf::from("conf/ssp.toml")));
        assert!(cli.dry_run);
        assert_eq!(cli.spark_args, vec!["main.py", "-v"]);
    }

    #[test]
    fn no_args_is_valid() {
        let cli = parse(&[]);
        assert!(cli.spark_args.is_empty());
    }
}
