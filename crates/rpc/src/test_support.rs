//! Engine double shared by the unit tests of this crate.

use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use donkey_engine::{
    Engine, Error, ErrorCode, Hit, InsertRequest, InsertResponse, MiscRequest, MiscResponse,
    PingStats, Result, SearchRequest, SearchResponse,
};

/// Behaviour is picked by the `db` of the request:
///
/// - `fail`: `NotFound` error
/// - `panic`: panics with a string message
/// - `panic-opaque`: panics with a non-string payload
/// - `slow*`: sleeps before answering
/// - anything else: three hits `<db>-0..2` scored 0.9, 0.5, 0.1
#[derive(Default)]
pub struct ScriptedEngine {
    pub seen: Mutex<Vec<SearchRequest>>,
}

pub const SCORES: [f64; 3] = [0.9, 0.5, 0.1];

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_search(&self) -> Option<SearchRequest> {
        self.seen.lock().expect("seen lock").last().cloned()
    }
}

fn scripted_failure(db: &str) {
    match db {
        "panic" => panic!("engine exploded"),
        "panic-opaque" => std::panic::panic_any(42u32),
        db if db.starts_with("slow") => thread::sleep(Duration::from_millis(50)),
        _ => {}
    }
}

impl Engine for ScriptedEngine {
    fn ping(&self) -> Result<PingStats> {
        Ok(PingStats::default())
    }

    fn search(&self, req: &SearchRequest) -> Result<SearchResponse> {
        self.seen.lock().expect("seen lock").push(req.clone());
        if req.db == "fail" {
            return Err(Error::not_found("no such db: fail"));
        }
        scripted_failure(&req.db);

        let hits = SCORES
            .iter()
            .enumerate()
            .map(|(i, score)| Hit {
                key: format!("{}-{i}", req.db),
                meta: format!("meta-{i}"),
                details: format!("details-{i}"),
                score: *score,
            })
            .collect();

        Ok(SearchResponse {
            time: 0.5,
            load_time: 0.125,
            filter_time: 0.25,
            rank_time: 0.0625,
            hits,
        })
    }

    fn insert(&self, req: &InsertRequest) -> Result<InsertResponse> {
        if req.db == "fail" {
            return Err(Error::new(ErrorCode::Io, "journal unavailable"));
        }
        scripted_failure(&req.db);
        Ok(InsertResponse {
            time: 1.0,
            load_time: 0.5,
            journal_time: 0.25,
            index_time: 0.125,
        })
    }

    fn misc(&self, req: &MiscRequest) -> Result<MiscResponse> {
        if req.method == "fail" {
            return Err(Error::new(ErrorCode::OutOfRange, ""));
        }
        scripted_failure(&req.db);
        Ok(MiscResponse {
            code: 7,
            text: format!("{}@{}", req.method, req.db),
        })
    }
}
