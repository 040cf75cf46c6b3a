//! Film lists: console entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Parse CLI flags
//!   3. Load config
//!   4. Init logger (CLI `-v` flags > env > config)
//!   5. Open storage, optionally reset a corrupt collection
//!   6. Load the film catalog
//!   7. Run the console until `quit` or end of input

use std::io;

use tracing::info;

use film_lists::{
    catalog, config, console,
    console::Console,
    controller::Controller,
    error::AppError,
    lists::{ListCollection, ListStore},
    logger, render, store,
};

struct CliArgs {
    config_path: Option<String>,
    log_level: Option<&'static str>,
    reset_lists: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    // Load .env if present; the file is optional.
    let _ = dotenvy::dotenv();

    let args = parse_cli_args();
    let config = config::load(args.config_path.as_deref())?;

    let effective_log_level = args.log_level.unwrap_or(config.log_level.as_str());
    logger::init(effective_log_level, args.log_level.is_some())?;

    info!(
        work_dir = %config.work_dir.display(),
        backend = ?config.storage.backend,
        log_level = %effective_log_level,
        "config loaded"
    );

    let lists = ListStore::new(store::open(&config)?);
    if args.reset_lists {
        lists.reset()?;
    }

    let films = catalog::load(config.catalog_path.as_deref())?;

    let stdin = io::stdin();
    let ui = Console::new(stdin.lock(), io::stdout());
    let view = |lists: &ListCollection| print!("{}", render::text_view(lists));

    let mut controller = Controller::new(lists, films, ui, view)?;
    console::run(&mut controller)
}

fn parse_cli_args() -> CliArgs {
    let mut verbosity = 0u8;
    let mut config_path = None;
    let mut reset_lists = false;

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("Usage: film-lists [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -h, --help             Print help");
                println!("  -f, --config <PATH>    Configuration file (default: config/default.toml)");
                println!("  -v, -vv, -vvv, -vvvv   Increase logging verbosity");
                println!("      --reset-lists      Discard stored lists before starting");
                println!();
                println!("{}", console::HELP);
                std::process::exit(0);
            }
            "-f" | "--config" => {
                if let Some(path) = iter.next() {
                    config_path = Some(path);
                } else {
                    eprintln!("error: -f/--config requires a path argument");
                    std::process::exit(1);
                }
            }
            "--reset-lists" => reset_lists = true,
            "--verbose" => verbosity = verbosity.saturating_add(1),
            a if a.starts_with('-') && a.len() > 1 && a.chars().skip(1).all(|c| c == 'v') => {
                verbosity = verbosity.saturating_add((a.len() - 1) as u8);
            }
            other => {
                eprintln!("error: unexpected argument '{other}' (see --help)");
                std::process::exit(1);
            }
        }
    }

    CliArgs { config_path, log_level: logger::level_for_verbosity(verbosity), reset_lists }
}
