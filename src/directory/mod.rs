//! Directory data: raw payloads, normalized records and the in-memory store.
//!
//! Loads flow `payload` → `activity` → `model` → `store`. Callers filter
//! and render from `DirectoryStore::current_snapshot` and never mutate
//! records in place.

pub mod activity;
pub mod collation;
pub mod model;
pub mod payload;
pub mod store;

pub use activity::{ActivityRule, DEFAULT_ACTIVE_VALUES};
pub use collation::{compare_es, sort_es};
pub use model::{DirectoryRecord, RawRecord, RecordFields, build_search_index, normalize_record};
pub use payload::{DirectoryPayload, parse_directory_payload};
pub use store::{DirectorySnapshot, DirectoryStore, unique_categories};
