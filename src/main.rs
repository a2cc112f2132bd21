use anyhow::Result;
use clap::{ArgAction, Parser};

use covshield::cli::{self, Style, UpdateArgs};

/// covshield: keep a coverage badge in your README up to date.
#[derive(Parser, Debug)]
#[command(name = "covshield", version, about)]
struct Cli {
    #[command(flatten)]
    update: UpdateArgs,

    /// Output style for the run summary.
    #[arg(long, value_enum, default_value = "text")]
    output: Style,

    /// More log output (-v for info, -vv for debug). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = cli::cmd_update(&cli.update, cli.output)?;
    print!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_no_flags_required() {
        let cli = Cli::try_parse_from(["covshield"]).unwrap();
        assert_eq!(cli.update.directory, std::path::PathBuf::from("."));
        assert_eq!(cli.update.readme, std::path::PathBuf::from("README.md"));
        assert!(!cli.update.git_push);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_cli_parses_options() {
        let cli = Cli::try_parse_from([
            "covshield",
            "--directory",
            "test_directory",
            "--readme",
            "test_README",
            "--git-push",
            "--tester",
            "pytest",
            "--policy",
            "thresholds",
            "--output",
            "json",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.update.directory, std::path::PathBuf::from("test_directory"));
        assert_eq!(cli.update.readme, std::path::PathBuf::from("test_README"));
        assert!(cli.update.git_push);
        assert_eq!(cli.update.tester, covshield::measure::Tester::Pytest);
        assert_eq!(cli.update.policy, cli::Policy::Thresholds);
        assert!(matches!(cli.output, Style::Json));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_rejects_unknown_tester() {
        assert!(Cli::try_parse_from(["covshield", "--tester", "nose"]).is_err());
    }

    #[test]
    fn test_cli_help_exits() {
        let err = Cli::try_parse_from(["covshield", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
