#![deny(warnings)]

use std::fs::read_to_string;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::exit;

use clap::{App, Arg, ErrorKind};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use lox::config::{Config, Emit};
use lox::scanner::scan;
use lox::{parse_source, printer, run, EXIT_STATIC_ERROR};


const EXIT_USAGE: i32 = 64;


fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("LOX_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .init();
}


/// Runs one chunk of source and prints what `emit` asks for. On failure the
/// diagnostics are already on stderr and the exit status is returned.
fn run_source(source: &str, emit: Emit) -> Result<(), i32> {
    match emit {
        Emit::Tokens => {
            let (tokens, errors) = scan(source);
            for tok in tokens.iter() {
                println!("{}", tok);
            }
            for err in errors.iter() {
                eprintln!("{}", err);
            }
            if errors.is_empty() { Ok(()) } else { Err(EXIT_STATIC_ERROR) }
        }
        Emit::Ast => match parse_source(source) {
            Ok(expr) => {
                println!("{}", printer::print(&expr));
                Ok(())
            }
            Err(err) => {
                eprintln!("{}", err);
                Err(err.exit_code())
            }
        },
        Emit::Value => match run(source) {
            Ok(value) => {
                println!("{}", value);
                Ok(())
            }
            Err(err) => {
                eprintln!("{}", err);
                Err(err.exit_code())
            }
        },
    }
}


fn run_prompt(config: &Config) -> io::Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();

    loop {
        print!("{}", config.prompt);
        io::stdout().flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            println!();
            return Ok(());
        }

        let source = line.trim();
        if source.is_empty() {
            continue;
        }
        // errors were reported; the session goes on
        let _ = run_source(source, config.emit);
    }
}


fn main() -> io::Result<()> {
    let arg_matches = App::new("lox")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Scanner, parser and evaluator for Lox expressions")
        .arg(Arg::with_name("config")
             .short("c")
             .long("config")
             .value_name("FILE")
             .help("Config TOML file")
             .takes_value(true))
        .arg(Arg::with_name("emit")
             .short("e")
             .long("emit")
             .value_name("STAGE")
             .help("What to print for each input")
             .possible_values(&["tokens", "ast", "value"])
             .takes_value(true))
        .arg(Arg::with_name("verbose")
             .short("v")
             .long("verbose")
             .help("Log every pipeline stage"))
        .arg(Arg::with_name("SCRIPT")
             .help("Source file; starts a prompt when omitted")
             .index(1))
        .get_matches_safe()
        .unwrap_or_else(|err| match err.kind {
            ErrorKind::HelpDisplayed | ErrorKind::VersionDisplayed => err.exit(),
            _ => {
                eprintln!("{}", err.message);
                exit(EXIT_USAGE);
            }
        });

    let mut config = match arg_matches.value_of("config") {
        Some(path) => Config::load(Path::new(path)).unwrap_or_else(|err| {
            eprintln!("{}", err);
            exit(1);
        }),
        None => Config::default(),
    };
    if let Some(emit) = arg_matches.value_of("emit").and_then(Emit::from_name) {
        config.emit = emit;
    }
    config.verbose |= arg_matches.is_present("verbose");

    init_logging(config.verbose);
    debug!(?config, "configured");

    match arg_matches.value_of("SCRIPT") {
        Some(path) => {
            let source = read_to_string(path).unwrap_or_else(|err| {
                eprintln!("could not read source file: {}", err);
                exit(1);
            });
            debug!(path, bytes = source.len(), "running script");
            if let Err(code) = run_source(&source, config.emit) {
                exit(code);
            }
            Ok(())
        }
        None => run_prompt(&config),
    }
}
