//! Line-oriented front end for the directory app.
//!
//! Reads one command per stdin line and prints the resulting view:
//!
//! ```text
//! query <text>      set the search text (empty clears it)
//! category <name>   select a category (`__all__` or nothing for every category)
//! refresh           reload the directory
//! show              print the current view again
//! quit              exit
//! ```
//!
//! The directory is loaded once at startup, before the first command.

use anyhow::{Context, Result, anyhow, bail};
use directorio::render::ViewState;
use directorio::{
    CategoryFilter, Command, DirectoryApp, LogFormat, block_on, init_logging, load_or_default,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::{env, ffi::OsString};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

enum Input {
    Dispatch(Command),
    Show,
    Quit,
}

fn parse_line(line: &str) -> Result<Option<Input>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let (verb, rest) = trimmed
        .split_once(char::is_whitespace)
        .map(|(verb, rest)| (verb, rest.trim()))
        .unwrap_or((trimmed, ""));
    let input = match verb {
        "query" => Input::Dispatch(Command::SetQuery(rest.to_string())),
        "category" => Input::Dispatch(Command::SetCategory(CategoryFilter::parse(rest))),
        "refresh" => Input::Dispatch(Command::TriggerRefresh),
        "show" => Input::Show,
        "quit" | "exit" => Input::Quit,
        other => bail!("unknown command: {other}"),
    };
    Ok(Some(input))
}

fn print_view(out: &mut impl Write, view: &ViewState) -> Result<()> {
    writeln!(out, "status: {}", view.status)?;
    writeln!(out, "{}", view.last_updated)?;
    writeln!(
        out,
        "filters: category={} query={:?}",
        view.selected_category.as_str(),
        view.query
    )?;
    writeln!(out, "visible: {}/{}", view.visible, view.total)?;
    for name in &view.visible_names {
        writeln!(out, "- {name}")?;
    }
    out.flush()?;
    Ok(())
}

fn run() -> Result<()> {
    let cli = Cli::parse()?;
    init_logging(cli.log_format);

    let config = load_or_default(cli.config_path.as_deref())?;
    let mut app = DirectoryApp::from_config(&config, cli.input.as_deref());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let view = block_on(app.dispatch(Command::TriggerRefresh))?;
    print_view(&mut out, &view)?;

    for line in io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        let input = match parse_line(&line) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("directory-shell: {err}");
                continue;
            }
        };
        let view = match input {
            Input::Dispatch(command) => block_on(app.dispatch(command))?,
            Input::Show => app.view(),
            Input::Quit => break,
        };
        print_view(&mut out, &view)?;
    }
    Ok(())
}

struct Cli {
    config_path: Option<PathBuf>,
    input: Option<PathBuf>,
    log_format: LogFormat,
}

impl Cli {
    fn parse() -> Result<Self> {
        let mut args = env::args_os();
        let _program = args.next();
        let mut cli = Cli {
            config_path: None,
            input: None,
            log_format: LogFormat::Compact,
        };

        while let Some(arg) = args.next() {
            let arg_str = arg
                .to_str()
                .ok_or_else(|| anyhow!("invalid UTF-8 in argument"))?;
            match arg_str {
                "--config" => cli.config_path = Some(next_path("--config", &mut args)?),
                "--input" => cli.input = Some(next_path("--input", &mut args)?),
                "--log-format" => {
                    let value = next_path("--log-format", &mut args)?;
                    cli.log_format = LogFormat::parse(&value.to_string_lossy());
                }
                "--help" | "-h" => usage(0),
                other => bail!("unknown argument: {other}"),
            }
        }
        Ok(cli)
    }
}

fn next_path(flag: &str, args: &mut impl Iterator<Item = OsString>) -> Result<PathBuf> {
    let value = args
        .next()
        .ok_or_else(|| anyhow!("{flag} requires a value"))?;
    if value.is_empty() {
        bail!("{flag} must not be empty");
    }
    Ok(PathBuf::from(value))
}

fn usage(code: i32) -> ! {
    eprintln!(
        "Usage: directory-shell [--config PATH] [--input FILE]\n\nCommands (one per stdin line):\n  query <text>, category <name|__all__>, refresh, show, quit\n\nOptions:\n  --config PATH             Config file (or set DIRECTORIO_CONFIG).\n  --input FILE              Read the payload from a local JSON file instead of the endpoint.\n  --log-format FORMAT       compact (default) or json; logs go to stderr.\n  --help                    Show this help text."
    );
    std::process::exit(code);
}
