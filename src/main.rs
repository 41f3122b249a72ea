use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use tokenbook::cli::{Cli, Command};
use tokenbook::commands::{self, shell::Shell};
use tokenbook::error::exit_code;
use tokenbook::{Config, Roster, Student, User};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::from(exit_code::SUCCESS as u8),
        Err(e) => {
            eprintln!("Error: {e:#}");
            if let Some(err) = e.downcast_ref::<tokenbook::Error>() {
                ExitCode::from(err.exit_code() as u8)
            } else if e.downcast_ref::<InvalidArguments>().is_some() {
                ExitCode::from(exit_code::INVALID_ARGUMENTS as u8)
            } else {
                ExitCode::from(exit_code::GENERAL_ERROR as u8)
            }
        }
    }
}

#[derive(Debug)]
struct InvalidArguments(String);

impl std::fmt::Display for InvalidArguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvalidArguments {}

fn run() -> anyhow::Result<()> {
    let mut cli = Cli::parse();

    tokenbook::logging::init_logging(&cli.log_level, cli.log_format);

    cli.validate()
        .map_err(InvalidArguments)
        .context("Invalid arguments")?;

    let actor = cli.actor();

    match cli.command.take() {
        Some(Command::Completions { shell }) => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "tokenbook", &mut std::io::stdout());
        }
        Some(Command::List) => commands::students::list(&open_roster(&cli)?)?,
        Some(Command::Find {
            first_name,
            last_name,
        }) => commands::students::find(&open_roster(&cli)?, &first_name, &last_name)?,
        Some(Command::Add {
            first_name,
            last_name,
            tokens,
        }) => commands::students::add(
            &mut open_roster(&cli)?,
            require_actor(&actor)?,
            Student::new(first_name, last_name, tokens),
        )?,
        Some(Command::Remove {
            first_name,
            last_name,
        }) => commands::students::remove(
            &mut open_roster(&cli)?,
            require_actor(&actor)?,
            &first_name,
            &last_name,
        )?,
        Some(Command::Expel {
            first_name,
            last_name,
        }) => commands::students::expel(
            &mut open_roster(&cli)?,
            require_actor(&actor)?,
            &first_name,
            &last_name,
        )?,
        Some(Command::Adjust {
            first_name,
            last_name,
            delta,
        }) => commands::students::adjust(
            &mut open_roster(&cli)?,
            require_actor(&actor)?,
            &first_name,
            &last_name,
            delta,
        )?,
        Some(Command::Log { limit }) => commands::log::run(&open_roster(&cli)?, limit)?,
        Some(Command::Shell) | None => {
            let mut roster = open_roster(&cli)?;
            let stdin = std::io::stdin();
            Shell::new(&mut roster, stdin.lock(), std::io::stdout())
                .run(actor)
                .context("Interactive session failed")?;
        }
    }

    Ok(())
}

fn open_roster(cli: &Cli) -> anyhow::Result<Roster> {
    let config = Config::from_cli(cli)?;
    Roster::open(&config).context("Failed to open roster")
}

fn require_actor(actor: &Option<User>) -> anyhow::Result<&User> {
    actor.as_ref().ok_or_else(|| {
        anyhow::Error::new(InvalidArguments(
            "--first-name, --last-name and --role are required for this command".to_string(),
        ))
    })
}
