use clap::Parser;
use colored::Colorize;
use omz_update::cli::Cli;
use omz_update::output::{self, ConsoleCallbacks, Formatter};
use omz_update::repo::RepoState;
use omz_update::terminal::{self, Capabilities};
use omz_update::{constants, logging, update};

fn main() {
    // Probe stdout before anything else can redirect or capture it.
    let is_interactive = terminal::is_interactive_output();
    colored::control::set_override(is_interactive);

    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            std::process::exit(constants::FAILURE_EXIT_CODE);
        }
    };
    logging::init(&config);

    let caps = Capabilities::detect();
    let formatter = Formatter::new(caps);
    let state = RepoState::new(&config.repo, config.git_logger());
    let callbacks = ConsoleCallbacks::new(&config, &caps);

    tracing::debug!(repo = %config.repo.display(), "starting update");
    let result = update::update(&state, &config.update_options(), &callbacks);
    output::print_outcome(&formatter, &result, &config);

    tracing::debug!(
        duration = ?result.duration,
        exit_code = result.exit_code(),
        "update finished"
    );
    std::process::exit(result.exit_code());
}
