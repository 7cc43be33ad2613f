use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use game_matcher::config::{load_config, MatchingConfig, MatchingOptions};
use game_matcher::demo::demo_roster;
use game_matcher::display::{print_schedule, write_schedule_to_file};
use game_matcher::export::export_schedule_to_csv;
use game_matcher::matching::{generate_matching, Player};
use game_matcher::parser::{load_roster, split_by_gender};
use game_matcher::web;

#[derive(Parser)]
#[command(name = "game-matcher", version, about = "Doubles team and court scheduler")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Schedule a session from a JSON session file or a roster CSV
    Schedule {
        /// Session file (players, session size, options, fixed partners)
        #[arg(long, conflicts_with = "roster")]
        config: Option<PathBuf>,

        /// Roster CSV with id, name, gender and grade columns
        #[arg(long)]
        roster: Option<PathBuf>,

        #[command(flatten)]
        session: SessionArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Schedule a randomly generated roster
    Demo {
        #[arg(long, default_value_t = 8)]
        males: usize,

        #[arg(long, default_value_t = 6)]
        females: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        #[command(flatten)]
        session: SessionArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Serve the JSON api
    Web {
        #[arg(long, env = "GAME_MATCHER_PORT", default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Args)]
struct SessionArgs {
    #[arg(long, default_value_t = 2)]
    courts: u32,

    #[arg(long, default_value_t = 2)]
    hours: u32,

    #[arg(long, default_value_t = 4)]
    games_per_hour: u32,

    /// Allow mixed doubles (about one game in five)
    #[arg(long)]
    mixed: bool,
}

#[derive(Args)]
struct OutputArgs {
    /// Write the schedule as plain text
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write the schedule as CSV
    #[arg(long)]
    csv: Option<PathBuf>,
}

impl SessionArgs {
    fn into_config(self, male_players: Vec<Player>, female_players: Vec<Player>) -> MatchingConfig {
        MatchingConfig {
            male_players,
            female_players,
            courts: self.courts,
            hours: self.hours,
            games_per_hour: self.games_per_hour,
            options: MatchingOptions {
                allow_mixed: self.mixed,
                allow_fixed_partners: false,
            },
            fixed_partners: Vec::new(),
        }
    }
}

fn run_schedule(config: &MatchingConfig, output: &OutputArgs) -> anyhow::Result<()> {
    config.validate().context("invalid session")?;

    let result = generate_matching(config);
    print_schedule(&result);

    if let Some(path) = &output.output {
        write_schedule_to_file(&result, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "schedule written");
    }
    if let Some(path) = &output.csv {
        export_schedule_to_csv(&result, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "schedule exported");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Command::Schedule { config, roster, session, output } => {
            let config = match (config, roster) {
                (Some(path), _) => load_config(&path)
                    .with_context(|| format!("failed to load {}", path.display()))?,
                (None, Some(path)) => {
                    let players = load_roster(&path)
                        .with_context(|| format!("failed to load {}", path.display()))?;
                    info!(players = players.len(), "roster loaded");
                    let (men, women) = split_by_gender(players);
                    session.into_config(men, women)
                }
                (None, None) => bail!("either --config or --roster is required"),
            };
            run_schedule(&config, &output)
        }
        Command::Demo { males, females, seed, session, output } => {
            let (men, women) = demo_roster(males, females, seed);
            info!(males, females, seed, "demo roster generated");
            run_schedule(&session.into_config(men, women), &output)
        }
        Command::Web { port } => {
            info!(port, "starting web server");
            web::start_server(port).await?;
            Ok(())
        }
    }
}
