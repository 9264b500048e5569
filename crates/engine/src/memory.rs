use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Instant;

use chrono::Utc;
use log::debug;

use crate::error::{Error, Result};
use crate::types::{
    Hit, InsertRequest, InsertResponse, MiscRequest, MiscResponse, PingStats, SearchRequest,
    SearchResponse,
};
use crate::Engine;

#[derive(Debug, Clone)]
struct Item {
    key: String,
    meta: String,
    raw: Vec<u8>,
    url: String,
    content: String,
    kind: String,
}

impl Item {
    /// Every non-empty payload field of the query must equal the item's.
    /// A query with no payload at all matches nothing.
    fn matches(&self, req: &SearchRequest) -> bool {
        let mut constrained = false;
        let mut check = |query_empty: bool, equal: bool| {
            if query_empty {
                true
            } else {
                constrained = true;
                equal
            }
        };

        let ok = check(req.raw.is_empty(), req.raw == self.raw)
            && check(req.url.is_empty(), req.url == self.url)
            && check(req.content.is_empty(), req.content == self.content);
        let kind_ok = req.kind.is_empty() || req.kind == self.kind;

        ok && kind_ok && constrained
    }
}

/// In-process exact-match engine.
///
/// Items live in memory, grouped by collection. Search returns items whose
/// payload equals the query's, in insertion order, each scored `1.0`.
pub struct MemoryEngine {
    started: i64,
    dbs: RwLock<HashMap<String, Vec<Item>>>,
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn seconds_since(start: Instant) -> f64 {
    start.elapsed().as_secs_f64()
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self {
            started: Utc::now().timestamp(),
            dbs: RwLock::new(HashMap::new()),
        }
    }

    fn count(&self, db: &str) -> usize {
        let dbs = self.dbs.read().unwrap_or_else(|e| e.into_inner());
        dbs.get(db).map_or(0, Vec::len)
    }
}

impl Engine for MemoryEngine {
    fn ping(&self) -> Result<PingStats> {
        Ok(PingStats {
            first_start_time: self.started,
            last_start_time: self.started,
            restart_count: 0,
        })
    }

    fn search(&self, req: &SearchRequest) -> Result<SearchResponse> {
        let start = Instant::now();
        let dbs = self.dbs.read().unwrap_or_else(|e| e.into_inner());
        let items = dbs
            .get(&req.db)
            .ok_or_else(|| Error::not_found(format!("no such db: {}", req.db)))?;
        let load_time = seconds_since(start);

        let filter_start = Instant::now();
        let matched: Vec<&Item> = items.iter().filter(|item| item.matches(req)).collect();
        let filter_time = seconds_since(filter_start);

        let rank_start = Instant::now();
        let limit = req.limit().unwrap_or(usize::MAX);
        let hits: Vec<Hit> = matched
            .into_iter()
            .take(limit)
            .map(|item| Hit {
                key: item.key.clone(),
                meta: item.meta.clone(),
                details: String::new(),
                score: 1.0,
            })
            .collect();
        let rank_time = seconds_since(rank_start);

        debug!("[memory] search db={} hits={}", req.db, hits.len());

        Ok(SearchResponse {
            time: seconds_since(start),
            load_time,
            filter_time,
            rank_time,
            hits,
        })
    }

    fn insert(&self, req: &InsertRequest) -> Result<InsertResponse> {
        if req.key.is_empty() {
            return Err(Error::invalid_argument("insert requires a key"));
        }

        let start = Instant::now();
        let item = Item {
            key: req.key.clone(),
            meta: req.meta.clone(),
            raw: req.raw.clone(),
            url: req.url.clone(),
            content: req.content.clone(),
            kind: req.kind.clone(),
        };
        let load_time = seconds_since(start);

        let index_start = Instant::now();
        let mut dbs = self.dbs.write().unwrap_or_else(|e| e.into_inner());
        let items = dbs.entry(req.db.clone()).or_default();
        match items.iter_mut().find(|existing| existing.key == item.key) {
            Some(existing) => *existing = item,
            None => items.push(item),
        }
        let index_time = seconds_since(index_start);

        Ok(InsertResponse {
            time: seconds_since(start),
            load_time,
            journal_time: 0.0,
            index_time,
        })
    }

    fn misc(&self, req: &MiscRequest) -> Result<MiscResponse> {
        match req.method.as_str() {
            "count" => Ok(MiscResponse {
                code: 0,
                text: self.count(&req.db).to_string(),
            }),
            "clear" => {
                let mut dbs = self.dbs.write().unwrap_or_else(|e| e.into_inner());
                let removed = dbs.remove(&req.db).map_or(0, |items| items.len());
                Ok(MiscResponse {
                    code: 0,
                    text: removed.to_string(),
                })
            }
            other => Err(Error::not_implemented(format!(
                "unsupported misc method: {other}"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
