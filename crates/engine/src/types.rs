use serde::Serialize;

/// `k` / `hint_k` value meaning "no limit requested".
pub const UNSET_K: i32 = -1;

/// `r` / `hint_r` value meaning "no radius requested".
pub const UNSET_R: f64 = f64::NAN;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PingStats {
    pub first_start_time: i64,
    pub last_start_time: i64,
    pub restart_count: i32,
}

/// A query against one collection.
///
/// Exactly one of `raw`, `url` or `content` is normally populated; which one
/// is the engine's business. The ranking controls use [`UNSET_K`] and
/// [`UNSET_R`] when the caller did not supply them.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub db: String,
    pub raw: Vec<u8>,
    pub url: String,
    pub content: String,
    /// Content type of the payload.
    pub kind: String,
    pub k: i32,
    pub r: f64,
    pub hint_k: i32,
    pub hint_r: f64,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            db: String::new(),
            raw: Vec::new(),
            url: String::new(),
            content: String::new(),
            kind: String::new(),
            k: UNSET_K,
            r: UNSET_R,
            hint_k: UNSET_K,
            hint_r: UNSET_R,
        }
    }
}

impl SearchRequest {
    pub fn new(db: impl Into<String>) -> Self {
        Self {
            db: db.into(),
            ..Default::default()
        }
    }

    pub fn limit(&self) -> Option<usize> {
        usize::try_from(self.k).ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Hit {
    pub key: String,
    pub meta: String,
    pub details: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResponse {
    pub time: f64,
    pub load_time: f64,
    pub filter_time: f64,
    pub rank_time: f64,
    pub hits: Vec<Hit>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InsertRequest {
    pub db: String,
    pub key: String,
    pub meta: String,
    pub raw: Vec<u8>,
    pub url: String,
    pub content: String,
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InsertResponse {
    pub time: f64,
    pub load_time: f64,
    pub journal_time: f64,
    pub index_time: f64,
}

/// Engine specific administrative command.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MiscRequest {
    pub method: String,
    pub db: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MiscResponse {
    pub code: i32,
    pub text: String,
}
