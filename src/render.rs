//! Markup for directory cards and the standalone page.
//!
//! Rendering is a pure function of its inputs. Absent fields are omitted:
//! a field that normalized to `""` produces neither a row nor an action
//! button. Every user-sourced string goes through `escape_markup_text`.

use crate::directory::DirectoryRecord;
use crate::filter::{ALL_CATEGORIES, CategoryFilter};
use crate::links::{
    DISABLED_LINK, IssueFormConfig, build_dial_links, build_directions_url,
    build_issue_report_url, build_mail_link,
};
use crate::text::{escape_markup_text as esc, normalize_web_url};
use serde::Serialize;
use std::fmt::Write;

/// Placeholder shown when no record passes the filters.
pub const NO_RESULTS_MARKUP: &str =
    "<p class=\"status-text\">No hay resultados con esos filtros.</p>";

const UNNAMED: &str = "Sin nombre";
const UNCATEGORIZED: &str = "Sin categoría";
const EXTERNAL_LINK_ATTRS: &str = "target=\"_blank\" rel=\"noopener noreferrer\"";

/// Settings needed to build per-card report links.
#[derive(Clone, Copy, Debug)]
pub struct CardContext<'a> {
    pub form: &'a IssueFormConfig,
    pub page_url: &'a str,
}

/// Cards for the filtered records, or the no-results placeholder.
pub fn render_cards(records: &[&DirectoryRecord], ctx: CardContext<'_>) -> String {
    if records.is_empty() {
        return NO_RESULTS_MARKUP.to_string();
    }
    records
        .iter()
        .map(|record| render_card(record, ctx))
        .collect()
}

/// One `<article class="card">` for a record.
pub fn render_card(record: &DirectoryRecord, ctx: CardContext<'_>) -> String {
    let mut html = String::new();
    let title = non_empty_or(record.name(), UNNAMED);
    let badge = non_empty_or(record.category(), UNCATEGORIZED);

    html.push_str("<article class=\"card\">\n");
    html.push_str("  <div class=\"card-header\">\n");
    let _ = writeln!(html, "    <h3 class=\"card-title\">{}</h3>", esc(title));
    let _ = writeln!(html, "    <span class=\"badge\">{}</span>", esc(badge));
    html.push_str("  </div>\n");

    let dial_links = build_dial_links(record.phone());
    if !dial_links.is_empty() {
        let phones = dial_links
            .iter()
            .map(|link| match link.href() {
                Some(href) => format!(
                    "<a href=\"{}\">{}</a>",
                    esc(&href),
                    esc(&link.display_text)
                ),
                None => esc(&link.display_text),
            })
            .collect::<Vec<_>>()
            .join(" / ");
        push_row(&mut html, "📞", "Tel:", &phones);
    }
    if !record.address().is_empty() {
        push_row(&mut html, "📍", "Dirección:", &esc(record.address()));
    }
    let mail_link = build_mail_link(record.email(), record.name());
    if !mail_link.is_empty() {
        let value = format!("<a href=\"{}\">{}</a>", esc(&mail_link), esc(record.email()));
        push_row(&mut html, "✉️", "Email:", &value);
    }
    if !record.website().is_empty() {
        let value = format!(
            "<a href=\"{}\" {EXTERNAL_LINK_ATTRS}>Abrir web</a>",
            esc(&normalize_web_url(record.website()))
        );
        push_row(&mut html, "🌐", "Web:", &value);
    }
    if !record.hours().is_empty() {
        push_row(&mut html, "🕘", "Horario:", &esc(record.hours()));
    }
    if !record.notes().is_empty() {
        push_row(&mut html, "📝", "Notas:", &esc(record.notes()));
    }

    html.push_str("  <div class=\"card-actions\">\n");
    if let Some(href) = dial_links.iter().find_map(|link| link.href()) {
        let _ = writeln!(html, "    <a class=\"button\" href=\"{}\">📞 Llamar</a>", esc(&href));
    }
    let directions = build_directions_url(record.address());
    if !directions.is_empty() {
        let _ = writeln!(
            html,
            "    <a class=\"button button-secondary\" href=\"{}\" {EXTERNAL_LINK_ATTRS}>🧭 Cómo llegar</a>",
            esc(&directions)
        );
    }
    if !mail_link.is_empty() {
        let _ = writeln!(
            html,
            "    <a class=\"button button-secondary\" href=\"{}\">✉️ Email</a>",
            esc(&mail_link)
        );
    }
    let report = build_issue_report_url(record, ctx.form, ctx.page_url);
    let disabled = if report == DISABLED_LINK {
        " aria-disabled=\"true\""
    } else {
        ""
    };
    let _ = writeln!(
        html,
        "    <a class=\"button button-warn\" href=\"{}\" {EXTERNAL_LINK_ATTRS}{disabled}>⚠️ Dato incorrecto</a>",
        esc(&report)
    );
    html.push_str("  </div>\n");
    html.push_str("</article>\n");
    html
}

fn push_row(html: &mut String, icon: &str, label: &str, value_markup: &str) {
    let _ = writeln!(
        html,
        "  <div class=\"card-row\">{icon} <strong>{label}</strong> {value_markup}</div>"
    );
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}

/// Footer label for the payload's update stamp.
pub fn last_updated_label(last_updated: Option<&str>) -> String {
    match last_updated.filter(|stamp| !stamp.is_empty()) {
        Some(stamp) => format!("Última actualización: {stamp}"),
        None => "Última actualización: —".to_string(),
    }
}

/// Everything the page shows after a command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub status: String,
    pub status_is_error: bool,
    pub last_updated: String,
    pub categories: Vec<String>,
    pub selected_category: CategoryFilter,
    pub query: String,
    pub total: usize,
    pub visible: usize,
    pub visible_names: Vec<String>,
    pub markup: String,
}

/// Category `<option>` list with the current selection marked.
pub fn render_category_options(categories: &[String], selected: &CategoryFilter) -> String {
    let mut html = String::new();
    let all_selected = if *selected == CategoryFilter::All {
        " selected"
    } else {
        ""
    };
    let _ = writeln!(
        html,
        "<option value=\"{ALL_CATEGORIES}\"{all_selected}>Todas</option>"
    );
    for category in categories {
        let marker = if matches!(selected, CategoryFilter::Exact(current) if current == category) {
            " selected"
        } else {
            ""
        };
        let _ = writeln!(
            html,
            "<option value=\"{}\"{marker}>{}</option>",
            esc(category),
            esc(category)
        );
    }
    html
}

/// Standalone HTML document for a view.
pub fn render_page(view: &ViewState, general_report_link: &str) -> String {
    let mut html = String::new();
    html.push_str("<!doctype html>\n<html lang=\"es\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>Directorio de servicios</title>\n</head>\n<body>\n");
    html.push_str("<header>\n<h1>Directorio de servicios</h1>\n");
    let _ = writeln!(
        html,
        "<form class=\"filters\">\n<input id=\"searchInput\" type=\"search\" value=\"{}\" placeholder=\"Buscar…\">",
        esc(&view.query)
    );
    html.push_str("<select id=\"categorySelect\">\n");
    html.push_str(&render_category_options(&view.categories, &view.selected_category));
    html.push_str("</select>\n</form>\n");
    let _ = writeln!(html, "<p id=\"statusText\" class=\"status-text\">{}</p>", esc(&view.status));
    let _ = writeln!(html, "<span id=\"lastUpdated\">{}</span>", esc(&view.last_updated));
    html.push_str("</header>\n<main id=\"cards\">\n");
    html.push_str(&view.markup);
    html.push_str("</main>\n<footer>\n");
    let general_disabled = if general_report_link == DISABLED_LINK {
        " aria-disabled=\"true\""
    } else {
        ""
    };
    let _ = writeln!(
        html,
        "<a id=\"generalReportLink\" href=\"{}\" {EXTERNAL_LINK_ATTRS}{general_disabled}>Sugerir alta o cambio</a>",
        esc(general_report_link)
    );
    html.push_str("</footer>\n</body>\n</html>\n");
    html
}
