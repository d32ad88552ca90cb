//! Command-line front end for the Rappit formatter.
//!
//! ```text
//! rappit format [--content-type TYPE] [FILE]
//! rappit minify [--content-type TYPE] [FILE]
//! rappit detect [--content-type TYPE] [FILE]
//! ```
//!
//! Input is read from FILE, or from stdin when FILE is omitted.

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use env_logger::Env;
use rappit::formatter::{detect_kind, detect_language, format_content, minify_content};
use std::io::{self, Read};

fn main() -> Result<()> {
    let matches = create_app().get_matches();

    let level = match matches.get_count("verbose") {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    if let Some(path) = matches.get_one::<String>("config") {
        rappit::config::load_config_file(path)
            .with_context(|| format!("failed to load settings from {}", path))?;
    }

    match matches.subcommand() {
        Some(("format", args)) => {
            let (content, hint) = read_input(args)?;
            println!("{}", format_content(&content, hint.as_deref()));
        }
        Some(("minify", args)) => {
            let (content, hint) = read_input(args)?;
            println!("{}", minify_content(&content, hint.as_deref()));
        }
        Some(("detect", args)) => {
            let (content, hint) = read_input(args)?;
            let kind = detect_kind(&content, hint.as_deref());
            let language = detect_language(&content, hint.as_deref());
            println!("{} (highlight: {})", kind, language);
        }
        _ => unreachable!("subcommand is required"),
    }

    Ok(())
}

/// Create the CLI application structure
fn create_app() -> Command {
    let input_args = [
        Arg::new("content-type")
            .short('t')
            .long("content-type")
            .value_name("TYPE")
            .help("Declared content type, e.g. application/json"),
        Arg::new("file")
            .value_name("FILE")
            .help("Input file (defaults to stdin)")
            .index(1),
    ];

    Command::new("rappit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Detect, pretty-print and minify JSON, XML and HTML bodies")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Raise log verbosity (repeatable)")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("Settings file with a \"rappit\" section")
                .global(true),
        )
        .subcommand(
            Command::new("format")
                .about("Pretty-print content")
                .args(input_args.clone()),
        )
        .subcommand(
            Command::new("minify")
                .about("Minify content")
                .args(input_args.clone()),
        )
        .subcommand(
            Command::new("detect")
                .about("Print the detected content kind")
                .args(input_args),
        )
}

/// Reads the input text and content type hint for a subcommand.
fn read_input(args: &ArgMatches) -> Result<(String, Option<String>)> {
    let hint = args.get_one::<String>("content-type").cloned();

    let content = match args.get_one::<String>("file") {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?
        }
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
    };

    Ok((content, hint))
}
