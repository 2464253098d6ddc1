//! Searches the directory and streams matching records as NDJSON.
//!
//! Each output line is one visible record (snapshot order) with its
//! pre-built action links. A failed or unconfigured load is reported on
//! stderr and exits non-zero so scripts can tell "no matches" from "no data".

use anyhow::{Result, anyhow, bail};
use directorio::{
    CategoryFilter, Command, DialLink, DirectoryApp, DirectoryRecord, IssueFormConfig, LogFormat,
    block_on, build_dial_links, build_directions_url, build_issue_report_url, build_mail_link,
    init_logging, load_or_default, normalize_web_url, split_list,
};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::{env, ffi::OsString};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

#[derive(Serialize)]
struct RecordLine<'a> {
    #[serde(flatten)]
    record: &'a DirectoryRecord,
    links: RecordLinks,
}

#[derive(Serialize)]
struct RecordLinks {
    dial: Vec<DialLink>,
    mail: String,
    directions: String,
    website: String,
    report: String,
}

impl RecordLinks {
    fn for_record(record: &DirectoryRecord, form: &IssueFormConfig, page_url: &str) -> Self {
        Self {
            dial: build_dial_links(record.phone()),
            mail: build_mail_link(record.email(), record.name()),
            directions: build_directions_url(record.address()),
            website: normalize_web_url(record.website()),
            report: build_issue_report_url(record, form, page_url),
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse()?;
    init_logging(cli.log_format);

    let mut config = load_or_default(cli.config_path.as_deref())?;
    if let Some(values) = cli.active_values {
        config.active_values = values;
    }
    let mut app = DirectoryApp::from_config(&config, cli.input.as_deref());

    let (category, query) = (cli.category, cli.query);
    let view = block_on(async {
        app.dispatch(Command::TriggerRefresh).await;
        app.dispatch(Command::SetCategory(category)).await;
        app.dispatch(Command::SetQuery(query)).await
    })?;
    if view.status_is_error {
        bail!("{}", view.status);
    }
    eprintln!("directory-search: {} ({} of {} visible)", view.status, view.visible, view.total);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    app.with_visible(|records| -> Result<()> {
        for &record in records {
            let line = RecordLine {
                record,
                links: RecordLinks::for_record(record, app.form(), app.page_url()),
            };
            serde_json::to_writer(&mut out, &line)?;
            out.write_all(b"\n")?;
        }
        Ok(())
    })?;
    out.flush()?;
    Ok(())
}

struct Cli {
    config_path: Option<PathBuf>,
    input: Option<PathBuf>,
    query: String,
    category: CategoryFilter,
    active_values: Option<Vec<String>>,
    log_format: LogFormat,
}

impl Cli {
    fn parse() -> Result<Self> {
        let mut args = env::args_os();
        let _program = args.next();
        let mut cli = Cli {
            config_path: None,
            input: None,
            query: String::new(),
            category: CategoryFilter::All,
            active_values: None,
            log_format: LogFormat::Compact,
        };

        while let Some(arg) = args.next() {
            let arg_str = arg
                .to_str()
                .ok_or_else(|| anyhow!("invalid UTF-8 in argument"))?;
            match arg_str {
                "--config" => cli.config_path = Some(next_value("--config", &mut args)?.into()),
                "--input" => cli.input = Some(next_value("--input", &mut args)?.into()),
                "--query" => cli.query = next_value("--query", &mut args)?,
                "--category" => {
                    cli.category = CategoryFilter::parse(&next_value("--category", &mut args)?)
                }
                "--active-values" => {
                    let values = split_list(&next_value("--active-values", &mut args)?);
                    if values.is_empty() {
                        bail!("--active-values must list at least one value");
                    }
                    cli.active_values = Some(values);
                }
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
    args.next()
        .ok_or_else(|| anyhow!("{flag} requires a value"))?
        .into_string()
        .map_err(|_| anyhow!("{flag} must be valid UTF-8"))
}

fn usage(code: i32) -> ! {
    eprintln!(
        "Usage: directory-search [--config PATH] [--input FILE] [--query TEXT] [--category NAME] [--active-values LIST]\n\nOptions:\n  --config PATH             Config file (or set DIRECTORIO_CONFIG).\n  --input FILE              Read the payload from a local JSON file instead of the endpoint.\n  --query TEXT              Search text (accent and case insensitive).\n  --category NAME           Exact category (__all__ for every category).\n  --active-values LIST      Comma-separated values of `activo` that keep a record.\n  --log-format FORMAT       compact (default) or json; logs go to stderr.\n  --help                    Show this help text."
    );
    std::process::exit(code);
}
