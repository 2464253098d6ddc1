//! Loads the directory once and writes a standalone HTML page.
//!
//! The payload comes from the configured endpoint, or from `--input` when a
//! local JSON file is given. `--query` and `--category` preselect filters.
//! Load failures do not fail the command: the page shows the status message
//! and an empty card area, exactly like the interactive view.

use anyhow::{Context, Result, anyhow, bail};
use directorio::{
    CategoryFilter, Command, DirectoryApp, LogFormat, block_on, init_logging, load_or_default,
    render_page,
};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::{env, ffi::OsString};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse()?;
    init_logging(cli.log_format);

    let mut config = load_or_default(cli.config_path.as_deref())?;
    if let Some(page_url) = cli.page_url {
        config.page_url = Some(page_url);
    }
    let general_link = config.issue_form.general_link().to_string();
    let mut app = DirectoryApp::from_config(&config, cli.input.as_deref());

    let (category, query) = (cli.category, cli.query);
    let view = block_on(async {
        app.dispatch(Command::TriggerRefresh).await;
        app.dispatch(Command::SetCategory(category)).await;
        app.dispatch(Command::SetQuery(query)).await
    })?;
    let page = render_page(&view, &general_link);

    match cli.output {
        Some(path) => fs::write(&path, page)
            .with_context(|| format!("writing {}", path.display()))?,
        None => io::stdout()
            .lock()
            .write_all(page.as_bytes())
            .context("writing page to stdout")?,
    }
    Ok(())
}

struct Cli {
    config_path: Option<PathBuf>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    query: String,
    category: CategoryFilter,
    page_url: Option<String>,
    log_format: LogFormat,
}

impl Cli {
    fn parse() -> Result<Self> {
        let mut args = env::args_os();
        let _program = args.next();
        let mut cli = Cli {
            config_path: None,
            input: None,
            output: None,
            query: String::new(),
            category: CategoryFilter::All,
            page_url: None,
            log_format: LogFormat::Compact,
        };

        while let Some(arg) = args.next() {
            let arg_str = arg
                .to_str()
                .ok_or_else(|| anyhow!("invalid UTF-8 in argument"))?;
            match arg_str {
                "--config" => cli.config_path = Some(next_value("--config", &mut args)?.into()),
                "--input" => cli.input = Some(next_value("--input", &mut args)?.into()),
                "--output" => cli.output = Some(next_value("--output", &mut args)?.into()),
                "--query" => cli.query = next_value("--query", &mut args)?,
                "--category" => {
                    cli.category = CategoryFilter::parse(&next_value("--category", &mut args)?)
                }
                "--page-url" => cli.page_url = Some(next_value("--page-url", &mut args)?),
                "--log-format" => {
                    cli.log_format = LogFormat::parse(&next_value("--log-format", &mut args)?)
                }
                "--help" | "-h" => usage(0),
                other => bail!("unknown argument: {other}"),
            }
        }
        Ok(cli)
    }
}

fn next_value(flag: &str, args: &mut impl Iterator<Item = OsString>) -> Result<String> {
    let value = args
        .next()
        .ok_or_else(|| anyhow!("{flag} requires a value"))?
        .into_string()
        .map_err(|_| anyhow!("{flag} must be valid UTF-8"))?;
    if value.is_empty() && flag != "--query" {
        bail!("{flag} must not be empty");
    }
    Ok(value)
}

fn usage(code: i32) -> ! {
    eprintln!(
        "Usage: directory-render [--config PATH] [--input FILE] [--output FILE] [--query TEXT] [--category NAME] [--page-url URL]\n\nOptions:\n  --config PATH             Config file (or set DIRECTORIO_CONFIG).\n  --input FILE              Read the payload from a local JSON file instead of the endpoint.\n  --output FILE             Write the page to FILE instead of stdout.\n  --query TEXT              Initial search text.\n  --category NAME           Initial category (__all__ for every category).\n  --page-url URL            Public page URL sent with error reports.\n  --log-format FORMAT       compact (default) or json; logs go to stderr.\n  --help                    Show this help text."
    );
    std::process::exit(code);
}
