//! sspm CLI - Simple scientific project manager.

use clap::Parser;
use sspm::cli::{Cli, Commands, ConfigCommands, ProjectCommands, StatsCommands};
use sspm::commands::{self, Output};
use sspm::config::Config;
use std::process;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `SSPM_LOG=debug`).
const LOG_ENV: &str = "SSPM_LOG";

fn main() {
    init_logging();

    let cli = Cli::parse();
    let human = cli.human_readable;

    if let Err(e) = run_command(cli.command, human) {
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        }
        process::exit(1);
    }
}

/// Log to stderr so stdout stays machine-readable.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_command(command: Commands, human: bool) -> Result<(), sspm::Error> {
    match command {
        Commands::Version => output(&commands::system::version(), human),

        Commands::Init {
            location,
            external_data,
        } => {
            let config = Config::open()?;
            let result = commands::system::init(&config, &location, external_data.as_deref())?;
            output(&result, human);
        }

        Commands::Config { command } => {
            let config = Config::open()?;
            match command {
                ConfigCommands::Show => output(&commands::config::show(&config)?, human),
                ConfigCommands::Get { key } => {
                    output(&commands::config::get(&config, &key)?, human)
                }
                ConfigCommands::Set { key, value } => {
                    output(&commands::config::set(&config, &key, &value)?, human)
                }
                ConfigCommands::Keys => output(&commands::config::keys(&config), human),
                ConfigCommands::Reset => output(&commands::config::reset(&config)?, human),
            }
        }

        Commands::Project { command } => {
            if let ProjectCommands::Keys = command {
                output(&commands::project::keys(), human);
                return Ok(());
            }
            let config = Config::open()?;
            match command {
                ProjectCommands::Create {
                    title,
                    user_name,
                    user_email,
                    user_group,
                    short_descr,
                    extern_git_repos,
                    date,
                } => {
                    let result = commands::project::create(
                        &config,
                        &commands::project::CreateArgs {
                            title: &title,
                            user_name: &user_name,
                            user_email: &user_email,
                            user_group: &user_group,
                            short_descr: &short_descr,
                            extern_git_repos: &extern_git_repos,
                            date: date.as_deref(),
                        },
                    )?;
                    output(&result, human);
                }
                ProjectCommands::List { id } => {
                    output(&commands::project::list(&config, id.as_deref())?, human)
                }
                ProjectCommands::Get { id, key } => {
                    output(&commands::project::get(&config, &id, &key)?, human)
                }
                ProjectCommands::Set { id, key, value } => {
                    output(&commands::project::set(&config, &id, &key, &value)?, human)
                }
                ProjectCommands::Keys => output(&commands::project::keys(), human),
                ProjectCommands::Close { id, mode, status } => output(
                    &commands::project::close(&config, &id, &mode, status.as_deref())?,
                    human,
                ),
                ProjectCommands::Open {
                    id,
                    external,
                    dry_run,
                } => output(
                    &commands::project::open(&config, id.as_deref(), external, dry_run)?,
                    human,
                ),
            }
        }

        Commands::Stats { command } => {
            let config = Config::open()?;
            match command {
                StatsCommands::Show => output(&commands::stats::show(&config)?, human),
            }
        }
    }

    Ok(())
}

fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
