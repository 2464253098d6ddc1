//! Normalized directory records.
//!
//! Raw entries arrive as arbitrary JSON; `normalize_record` maps them onto a
//! fixed shape where every field is a trimmed string and the search index is
//! computed once, at construction. Records are immutable afterwards.

use crate::text::{normalize_for_search, safe_text};
use serde::Serialize;
use serde_json::{Map, Value};

/// Untyped record exactly as delivered by the directory endpoint.
pub type RawRecord = Map<String, Value>;

/// JSON keys read from raw records.
pub mod keys {
    pub const CATEGORY: &str = "categoria";
    pub const NAME: &str = "nombre";
    pub const PHONE: &str = "telefono";
    pub const ADDRESS: &str = "direccion";
    pub const EMAIL: &str = "email";
    pub const WEBSITE: &str = "web";
    pub const HOURS: &str = "horario";
    pub const NOTES: &str = "notas";
    pub const ID: &str = "id";
    pub const ACTIVE: &str = "activo";
}

/// Plain field values used to build a [`DirectoryRecord`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordFields {
    pub category: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub email: String,
    pub website: String,
    pub hours: String,
    pub notes: String,
    pub id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// One service entry after normalization.
///
/// An empty `category` means uncategorized; any other empty field means the
/// value is absent. The search index always reflects the other fields.
pub struct DirectoryRecord {
    category: String,
    name: String,
    phone: String,
    address: String,
    email: String,
    website: String,
    hours: String,
    notes: String,
    id: String,
    #[serde(skip)]
    search_index: String,
}

impl DirectoryRecord {
    /// Build a record and compute its search index.
    pub fn from_fields(fields: RecordFields) -> Self {
        let search_index = build_search_index(&fields);
        let RecordFields {
            category,
            name,
            phone,
            address,
            email,
            website,
            hours,
            notes,
            id,
        } = fields;
        Self {
            category,
            name,
            phone,
            address,
            email,
            website,
            hours,
            notes,
            id,
            search_index,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn website(&self) -> &str {
        &self.website
    }

    pub fn hours(&self) -> &str {
        &self.hours
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// External identifier, empty when the source did not provide one.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Lowercase, accent-free, whitespace-collapsed text of every visible field.
    pub fn search_index(&self) -> &str {
        &self.search_index
    }

    /// Whether the precomputed index contains an already-normalized query.
    pub fn matches_normalized(&self, normalized_query: &str) -> bool {
        self.search_index.contains(normalized_query)
    }
}

/// Join the human-visible fields and normalize them for substring search.
pub fn build_search_index(fields: &RecordFields) -> String {
    let joined = [
        fields.category.as_str(),
        fields.name.as_str(),
        fields.phone.as_str(),
        fields.address.as_str(),
        fields.email.as_str(),
        fields.website.as_str(),
        fields.hours.as_str(),
        fields.notes.as_str(),
    ]
    .join(" ");
    normalize_for_search(&joined)
}

/// Map any JSON value onto a [`DirectoryRecord`].
///
/// Missing values, `null` and non-object values are treated as an empty
/// mapping, so this never fails.
pub fn normalize_record(raw: Option<&Value>) -> DirectoryRecord {
    let empty = RawRecord::new();
    let map = raw.and_then(Value::as_object).unwrap_or(&empty);
    DirectoryRecord::from_fields(fields_from_map(map))
}

fn fields_from_map(map: &RawRecord) -> RecordFields {
    let field = |key: &str| safe_text(map.get(key));
    RecordFields {
        category: field(keys::CATEGORY),
        name: field(keys::NAME),
        phone: field(keys::PHONE),
        address: field(keys::ADDRESS),
        email: field(keys::EMAIL),
        website: field(keys::WEBSITE),
        hours: field(keys::HOURS),
        notes: field(keys::NOTES),
        id: field(keys::ID),
    }
}
