use crate::commands::{run_eligibility, run_pnp_match, run_score, PnpArgs, ProfileArgs};
use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use express_entry::config::AppConfig;
use express_entry::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Express Entry Assessor",
    about = "Score Express Entry profiles, check program eligibility, and match provincial streams",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Compute the CRS breakdown for a profile document
    Score(ProfileArgs),
    /// Evaluate FSWP, CEC, and FSTP eligibility for a profile document
    Eligibility(ProfileArgs),
    /// Match a profile document against a provincial nominee catalogue
    Pnp(PnpArgs),
    /// Walk through a full assessment of the bundled sample profiles
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args, &AppConfig::load()?),
        Command::Eligibility(args) => run_eligibility(args, &AppConfig::load()?),
        Command::Pnp(args) => run_pnp_match(args, &AppConfig::load()?),
        Command::Demo(args) => run_demo(args, &AppConfig::load()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_score_arguments() {
        let cli = Cli::try_parse_from([
            "express-entry-api",
            "score",
            "--profile",
            "profile.json",
            "--as-of",
            "2025-06-01",
            "--json",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Score(args)) => {
                assert_eq!(args.profile.to_str(), Some("profile.json"));
                assert!(args.json);
                assert!(args.as_of.is_some());
            }
            other => panic!("expected score command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_dates() {
        let result = Cli::try_parse_from([
            "express-entry-api",
            "eligibility",
            "--profile",
            "profile.json",
            "--as-of",
            "06/01/2025",
        ]);
        assert!(result.is_err());
    }
}
