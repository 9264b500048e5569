//! Wire contract shared by the donkey server and its clients.
//!
//! Every record here is what actually travels over the socket. Optional
//! ranking controls are `Option`s so an unset value costs a single tag byte
//! and never carries a placeholder.

pub mod codec;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PingRequest {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PingResponse {
    /// Unix seconds of the first server start in this process.
    pub first_start_time: i64,
    /// Unix seconds of the start of the generation answering the ping.
    pub last_start_time: i64,
    pub restart_count: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub db: String,
    pub raw: Vec<u8>,
    pub url: String,
    pub content: String,
    pub kind: String,
    pub k: Option<i32>,
    pub r: Option<f64>,
    pub hint_k: Option<i32>,
    pub hint_r: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub key: String,
    pub meta: String,
    pub details: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub time: f64,
    pub load_time: f64,
    pub filter_time: f64,
    pub rank_time: f64,
    /// Ranking order.
    pub hits: Vec<Hit>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsertRequest {
    pub db: String,
    pub key: String,
    pub meta: String,
    pub raw: Vec<u8>,
    pub url: String,
    pub content: String,
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsertResponse {
    pub time: f64,
    pub load_time: f64,
    pub journal_time: f64,
    pub index_time: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MiscRequest {
    pub method: String,
    pub db: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MiscResponse {
    pub code: i32,
    pub text: String,
}

/// The single failure record a remote call can produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireError {
    pub code: i32,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RpcRequest {
    Ping(PingRequest),
    Search(SearchRequest),
    Insert(InsertRequest),
    Misc(MiscRequest),
}

impl RpcRequest {
    pub fn method(&self) -> &'static str {
        match self {
            RpcRequest::Ping(_) => "ping",
            RpcRequest::Search(_) => "search",
            RpcRequest::Insert(_) => "insert",
            RpcRequest::Misc(_) => "misc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RpcResponse {
    Ping(PingResponse),
    Search(SearchResponse),
    Insert(InsertResponse),
    Misc(MiscResponse),
    Failure(WireError),
}
