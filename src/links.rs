//! Action links built from a record: dial, mail, directions and the
//! prefilled "wrong data" report form.
//!
//! The report form's field identifiers come from configuration; this module
//! only knows what each field means, never its external key.

use crate::config::is_configured;
use crate::directory::DirectoryRecord;
use crate::text::{clean_phone_for_dialing, slugify, split_multi_value};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::form_urlencoded;

/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is escaped.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const MAPS_DIRECTIONS_BASE: &str = "https://www.google.com/maps/dir/?api=1&destination=";

/// Link target used when no report form is configured at all.
pub const DISABLED_LINK: &str = "#";

/// Percent-encode a value for use inside a URI component.
pub fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// One displayed phone number and, when it has digits, its dial target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DialLink {
    pub display_text: String,
    pub dial_target: Option<String>,
}

impl DialLink {
    /// `tel:` URI for the dial target.
    pub fn href(&self) -> Option<String> {
        self.dial_target.as_ref().map(|target| format!("tel:{target}"))
    }
}

/// Split a raw phone field into displayable, dialable parts.
pub fn build_dial_links(phone_raw: &str) -> Vec<DialLink> {
    split_multi_value(phone_raw)
        .into_iter()
        .map(|part| {
            let cleaned = clean_phone_for_dialing(&part);
            DialLink {
                display_text: part,
                dial_target: (!cleaned.is_empty()).then_some(cleaned),
            }
        })
        .collect()
}

/// `mailto:` URI with a prefilled subject and body; empty when there is no address.
pub fn build_mail_link(email: &str, service_name: &str) -> String {
    if email.is_empty() {
        return String::new();
    }
    let subject_name = if service_name.is_empty() {
        "servicio"
    } else {
        service_name
    };
    let body_name = if service_name.is_empty() {
        "este servicio"
    } else {
        service_name
    };
    let subject = format!("Consulta sobre {subject_name}");
    let body = format!("Hola,\n\nQuería hacer una consulta sobre {body_name}.\n\nGracias.");
    format!(
        "mailto:{}?subject={}&body={}",
        encode_uri_component(email),
        encode_uri_component(&subject),
        encode_uri_component(&body)
    )
}

/// Maps directions URL to the address; empty when there is no address.
pub fn build_directions_url(address: &str) -> String {
    if address.is_empty() {
        return String::new();
    }
    format!("{MAPS_DIRECTIONS_BASE}{}", encode_uri_component(address))
}

/// Meaning of each field on the external report form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportField {
    ServiceName,
    Category,
    Phone,
    Address,
    WrongField,
    CurrentValue,
    CorrectValue,
    Comments,
    InternalId,
    SourceUrl,
}

impl ReportField {
    /// Emission order of query parameters.
    pub const ALL: [ReportField; 10] = [
        ReportField::ServiceName,
        ReportField::Category,
        ReportField::Phone,
        ReportField::Address,
        ReportField::WrongField,
        ReportField::CurrentValue,
        ReportField::CorrectValue,
        ReportField::Comments,
        ReportField::InternalId,
        ReportField::SourceUrl,
    ];
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Option labels the form uses for "which field is wrong".
pub struct GuessLabels {
    #[serde(default = "default_phone_label")]
    pub phone: String,
    #[serde(default = "default_address_label")]
    pub address: String,
    #[serde(default = "default_other_label")]
    pub other: String,
}

fn default_phone_label() -> String {
    "Teléfono".to_string()
}

fn default_address_label() -> String {
    "Dirección".to_string()
}

fn default_other_label() -> String {
    "Otro".to_string()
}

impl Default for GuessLabels {
    fn default() -> Self {
        Self {
            phone: default_phone_label(),
            address: default_address_label(),
            other: default_other_label(),
        }
    }
}

fn default_field_prefix() -> String {
    "entry.".to_string()
}

/// External report form settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueFormConfig {
    /// Prefill base URL; when unset, reports fall back to `general_url`.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Plain (non-prefilled) form for suggestions and corrections.
    #[serde(default)]
    pub general_url: Option<String>,
    /// Prepended to every field identifier (`entry.` for hosted forms).
    #[serde(default = "default_field_prefix")]
    pub field_prefix: String,
    #[serde(default)]
    pub fields: BTreeMap<ReportField, String>,
    #[serde(default)]
    pub guess_labels: GuessLabels,
}

impl Default for IssueFormConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            general_url: None,
            field_prefix: default_field_prefix(),
            fields: BTreeMap::new(),
            guess_labels: GuessLabels::default(),
        }
    }
}

impl IssueFormConfig {
    /// Configured prefill base, ignoring blanks and template placeholders.
    pub fn prefill_base(&self) -> Option<&str> {
        configured(self.base_url.as_deref())
    }

    /// General form link, or [`DISABLED_LINK`] when unconfigured.
    pub fn general_link(&self) -> &str {
        configured(self.general_url.as_deref()).unwrap_or(DISABLED_LINK)
    }

    fn field_key(&self, field: ReportField) -> Option<String> {
        let id = configured(self.fields.get(&field).map(String::as_str))?;
        Some(format!("{}{id}", self.field_prefix))
    }
}

fn configured(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| is_configured(value))
}

/// Which record field a report most likely concerns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WrongFieldGuess {
    Phone,
    Address,
    Other,
}

impl WrongFieldGuess {
    pub fn for_record(record: &DirectoryRecord) -> Self {
        if !record.phone().is_empty() {
            WrongFieldGuess::Phone
        } else if !record.address().is_empty() {
            WrongFieldGuess::Address
        } else {
            WrongFieldGuess::Other
        }
    }

    fn label(self, labels: &GuessLabels) -> &str {
        match self {
            WrongFieldGuess::Phone => &labels.phone,
            WrongFieldGuess::Address => &labels.address,
            WrongFieldGuess::Other => &labels.other,
        }
    }

    fn current_value(self, record: &DirectoryRecord) -> &str {
        match self {
            WrongFieldGuess::Phone => record.phone(),
            WrongFieldGuess::Address => record.address(),
            WrongFieldGuess::Other => "",
        }
    }
}

/// Identifier the report form receives: the explicit id, else a slug of the name.
pub fn internal_id(record: &DirectoryRecord) -> String {
    if record.id().is_empty() {
        slugify(record.name())
    } else {
        record.id().to_string()
    }
}

/// Prefilled report URL for a record.
///
/// Without a prefill base this returns the general form link, or
/// [`DISABLED_LINK`]. Fields with no configured identifier are skipped; the
/// correction and comment fields are sent empty for the user to fill in.
pub fn build_issue_report_url(
    record: &DirectoryRecord,
    form: &IssueFormConfig,
    current_page_url: &str,
) -> String {
    let Some(base) = form.prefill_base() else {
        return form.general_link().to_string();
    };

    let guess = WrongFieldGuess::for_record(record);
    let mut query = form_urlencoded::Serializer::new(String::new());
    for field in ReportField::ALL {
        let Some(key) = form.field_key(field) else {
            continue;
        };
        let value = match field {
            ReportField::ServiceName => record.name().to_string(),
            ReportField::Category => record.category().to_string(),
            ReportField::Phone => record.phone().to_string(),
            ReportField::Address => record.address().to_string(),
            ReportField::WrongField => guess.label(&form.guess_labels).to_string(),
            ReportField::CurrentValue => guess.current_value(record).to_string(),
            ReportField::CorrectValue | ReportField::Comments => String::new(),
            ReportField::InternalId => internal_id(record),
            ReportField::SourceUrl => current_page_url.to_string(),
        };
        query.append_pair(&key, &value);
    }

    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}{}", query.finish())
}
