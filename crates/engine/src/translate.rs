//! Conversions between the engine's value objects and the wire contract.
//!
//! All conversions are total. Optional wire fields become the `UNSET_*`
//! placeholders on the way in, and the placeholders become unset fields on
//! the way out, so a placeholder never appears on the wire as a real value.

use donkey_protocol as wire;

use crate::error::{Error, ErrorCode};
use crate::types::{
    Hit, InsertRequest, InsertResponse, MiscRequest, MiscResponse, PingStats, SearchRequest,
    SearchResponse, UNSET_K,
};

fn k_to_wire(k: i32) -> Option<i32> {
    (k != UNSET_K).then_some(k)
}

fn r_to_wire(r: f64) -> Option<f64> {
    (!r.is_nan()).then_some(r)
}

impl From<wire::SearchRequest> for SearchRequest {
    fn from(req: wire::SearchRequest) -> Self {
        let unset = SearchRequest::default();
        Self {
            db: req.db,
            raw: req.raw,
            url: req.url,
            content: req.content,
            kind: req.kind,
            k: req.k.unwrap_or(unset.k),
            r: req.r.unwrap_or(unset.r),
            hint_k: req.hint_k.unwrap_or(unset.hint_k),
            hint_r: req.hint_r.unwrap_or(unset.hint_r),
        }
    }
}

impl From<SearchRequest> for wire::SearchRequest {
    fn from(req: SearchRequest) -> Self {
        Self {
            db: req.db,
            raw: req.raw,
            url: req.url,
            content: req.content,
            kind: req.kind,
            k: k_to_wire(req.k),
            r: r_to_wire(req.r),
            hint_k: k_to_wire(req.hint_k),
            hint_r: r_to_wire(req.hint_r),
        }
    }
}

impl From<wire::Hit> for Hit {
    fn from(hit: wire::Hit) -> Self {
        Self {
            key: hit.key,
            meta: hit.meta,
            details: hit.details,
            score: hit.score,
        }
    }
}

impl From<Hit> for wire::Hit {
    fn from(hit: Hit) -> Self {
        Self {
            key: hit.key,
            meta: hit.meta,
            details: hit.details,
            score: hit.score,
        }
    }
}

impl From<wire::SearchResponse> for SearchResponse {
    fn from(resp: wire::SearchResponse) -> Self {
        Self {
            time: resp.time,
            load_time: resp.load_time,
            filter_time: resp.filter_time,
            rank_time: resp.rank_time,
            hits: resp.hits.into_iter().map(Hit::from).collect(),
        }
    }
}

impl From<SearchResponse> for wire::SearchResponse {
    fn from(resp: SearchResponse) -> Self {
        Self {
            time: resp.time,
            load_time: resp.load_time,
            filter_time: resp.filter_time,
            rank_time: resp.rank_time,
            hits: resp.hits.into_iter().map(wire::Hit::from).collect(),
        }
    }
}

impl From<wire::InsertRequest> for InsertRequest {
    fn from(req: wire::InsertRequest) -> Self {
        Self {
            db: req.db,
            key: req.key,
            meta: req.meta,
            raw: req.raw,
            url: req.url,
            content: req.content,
            kind: req.kind,
        }
    }
}

impl From<InsertRequest> for wire::InsertRequest {
    fn from(req: InsertRequest) -> Self {
        Self {
            db: req.db,
            key: req.key,
            meta: req.meta,
            raw: req.raw,
            url: req.url,
            content: req.content,
            kind: req.kind,
        }
    }
}

impl From<wire::InsertResponse> for InsertResponse {
    fn from(resp: wire::InsertResponse) -> Self {
        Self {
            time: resp.time,
            load_time: resp.load_time,
            journal_time: resp.journal_time,
            index_time: resp.index_time,
        }
    }
}

impl From<InsertResponse> for wire::InsertResponse {
    fn from(resp: InsertResponse) -> Self {
        Self {
            time: resp.time,
            load_time: resp.load_time,
            journal_time: resp.journal_time,
            index_time: resp.index_time,
        }
    }
}

impl From<wire::MiscRequest> for MiscRequest {
    fn from(req: wire::MiscRequest) -> Self {
        Self {
            method: req.method,
            db: req.db,
        }
    }
}

impl From<MiscRequest> for wire::MiscRequest {
    fn from(req: MiscRequest) -> Self {
        Self {
            method: req.method,
            db: req.db,
        }
    }
}

impl From<wire::MiscResponse> for MiscResponse {
    fn from(resp: wire::MiscResponse) -> Self {
        Self {
            code: resp.code,
            text: resp.text,
        }
    }
}

impl From<MiscResponse> for wire::MiscResponse {
    fn from(resp: MiscResponse) -> Self {
        Self {
            code: resp.code,
            text: resp.text,
        }
    }
}

impl From<wire::PingResponse> for PingStats {
    fn from(resp: wire::PingResponse) -> Self {
        Self {
            first_start_time: resp.first_start_time,
            last_start_time: resp.last_start_time,
            restart_count: resp.restart_count,
        }
    }
}

impl From<PingStats> for wire::PingResponse {
    fn from(stats: PingStats) -> Self {
        Self {
            first_start_time: stats.first_start_time,
            last_start_time: stats.last_start_time,
            restart_count: stats.restart_count,
        }
    }
}

impl From<wire::WireError> for Error {
    fn from(err: wire::WireError) -> Self {
        Self::new(ErrorCode::from_i32(err.code), err.message.unwrap_or_default())
    }
}

impl From<Error> for wire::WireError {
    fn from(err: Error) -> Self {
        Self {
            code: err.code.as_i32(),
            message: (!err.message.is_empty()).then_some(err.message),
        }
    }
}

#[cfg(test)]
#[path = "translate_tests.rs"]
mod tests;
