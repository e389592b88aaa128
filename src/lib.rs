pub mod core;
pub mod json;
pub mod query;
pub mod parallel;
pub mod storage;

pub use crate::core::collection::{Collection, ScanMode};
pub use crate::core::config::Config;
pub use crate::core::database::Database;
pub use crate::core::document::Document;
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::core::types::{DocId, IdGenerator};
pub use crate::json::view::{FromJson, JsonArray, JsonObject};

/*
┌──────────────────────────────── JSONDB STRUCT ARCHITECTURE ─────────────────────────────────┐
│                                                                                             │
│  struct Database                                                                            │
│  │ config: Config              // temp dir, cache extension, lanes, first id               │
│  │ layout: StorageLayout       // <cache_dir>/<collection>.<ext>                           │
│  │ collections: Vec<Collection>                                                             │
│  │ current: Option<usize>      // the one materialized collection                          │
│  │ ids: IdGenerator            // shared by all collections of the store                   │
│  │ lanes / sequential: LanePool                                                             │
│                                                                                             │
│  struct Collection             struct Document              JsonObject / JsonArray          │
│  │ name                        │ id: DocId                   │ owned copy of a value       │
│  │ load_file: Option<PathBuf>  │ data: String (normalized)   │ get::<T: FromJson>()        │
│  │ documents: Vec<Document>    │ get / query / apply_patch   │                             │
│                                                                                             │
├──────────────────────────────────── RELATIONSHIPS ──────────────────────────────────────────┤
│                                                                                             │
│  Database ──owns──> Collection ──owns──> Document ──views──> JsonObject / JsonArray         │
│     │                   │                    │                                              │
│     │                   │                    └──patched by──> json::patch ──checks──> validator
│     │                   │                                                                   │
│     │                   └──scans with──> LanePool ──matches──> query::Pattern ──> FieldPath │
│     │                                                                                       │
│     └──spills to──> storage::cache      saves/loads──> storage::collection_file             │
│                                                                                             │
│  Everything slices raw text through json::scanner (match_quote / match_bracket).            │
└─────────────────────────────────────────────────────────────────────────────────────────────┘
*/
