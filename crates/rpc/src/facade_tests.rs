use super::*;
use crate::test_support::{SCORES, ScriptedEngine};
use donkey_engine::UNSET_K;

fn facade() -> (Facade<ScriptedEngine>, Arc<ScriptedEngine>, Arc<Lifecycle>) {
    let engine = Arc::new(ScriptedEngine::new());
    let lifecycle = Arc::new(Lifecycle::new());
    let start = lifecycle.record_start_at(100);
    let facade = Facade::new(Arc::clone(&engine), Arc::clone(&lifecycle), start);
    (facade, engine, lifecycle)
}

fn search_for(db: &str) -> wire::SearchRequest {
    wire::SearchRequest {
        db: db.into(),
        raw: vec![1, 2, 3],
        ..Default::default()
    }
}

#[test]
fn search_translates_both_ways() {
    let (facade, engine, _) = facade();
    let req = wire::SearchRequest {
        k: Some(10),
        ..search_for("d1")
    };

    let resp = facade.search(req).expect("search");
    let scores: Vec<f64> = resp.hits.iter().map(|h| h.score).collect();
    assert_eq!(scores, SCORES);
    assert_eq!(resp.hits[0].key, "d1-0");
    assert_eq!(resp.hits[2].details, "details-2");
    assert_eq!(resp.rank_time, 0.0625);

    let seen = engine.last_search().expect("engine saw request");
    assert_eq!(seen.k, 10);
    assert_eq!(seen.raw, vec![1, 2, 3]);
    assert!(seen.r.is_nan());
}

#[test]
fn search_without_k_reaches_engine_as_placeholder() {
    let (facade, engine, _) = facade();
    facade.search(search_for("d1")).expect("search");
    let seen = engine.last_search().expect("engine saw request");
    assert_eq!(seen.k, UNSET_K);
    assert_eq!(seen.hint_k, UNSET_K);
    assert!(seen.hint_r.is_nan());
}

#[test]
fn engine_errors_keep_code_and_message() {
    let (facade, _, _) = facade();

    let err = facade.search(search_for("fail")).expect_err("search fails");
    assert_eq!(err.code, ErrorCode::NotFound.as_i32());
    assert_eq!(err.message.as_deref(), Some("no such db: fail"));

    let err = facade
        .insert(wire::InsertRequest {
            db: "fail".into(),
            ..Default::default()
        })
        .expect_err("insert fails");
    assert_eq!(err.code, ErrorCode::Io.as_i32());
    assert_eq!(err.message.as_deref(), Some("journal unavailable"));

    let err = facade
        .misc(wire::MiscRequest {
            method: "fail".into(),
            db: "d".into(),
        })
        .expect_err("misc fails");
    assert_eq!(err.code, ErrorCode::OutOfRange.as_i32());
    assert_eq!(err.message, None);
}

#[test]
fn panics_become_unknown_with_best_message() {
    let (facade, _, _) = facade();

    let err = facade.search(search_for("panic")).expect_err("panic");
    assert_eq!(err.code, ErrorCode::Unknown.as_i32());
    assert_eq!(err.message.as_deref(), Some("engine exploded"));

    let err = facade.search(search_for("panic-opaque")).expect_err("panic");
    assert_eq!(err.code, ErrorCode::Unknown.as_i32());
    assert_eq!(err.message, None);

    // The facade is still usable afterwards.
    assert!(facade.search(search_for("d1")).is_ok());
}

#[test]
fn insert_and_misc_delegate() {
    let (facade, _, _) = facade();

    let resp = facade
        .insert(wire::InsertRequest {
            db: "d".into(),
            key: "k".into(),
            ..Default::default()
        })
        .expect("insert");
    assert_eq!(resp.journal_time, 0.25);
    assert_eq!(resp.index_time, 0.125);

    let resp = facade
        .misc(wire::MiscRequest {
            method: "stats".into(),
            db: "d".into(),
        })
        .expect("misc");
    assert_eq!(resp.code, 7);
    assert_eq!(resp.text, "stats@d");
}

#[test]
fn ping_reports_generation_start_and_process_counters() {
    let (facade, _, lifecycle) = facade();
    let first = facade.ping();
    assert_eq!(first.first_start_time, 100);
    assert_eq!(first.last_start_time, 100);
    assert_eq!(first.restart_count, 1);

    // A later generation bumps the shared counter; this facade still reports
    // its own start time.
    lifecycle.record_start_at(200);
    let later = facade.ping();
    assert_eq!(later.first_start_time, 100);
    assert_eq!(later.last_start_time, 100);
    assert_eq!(later.restart_count, 2);
}

#[test]
fn dispatch_wraps_replies_and_failures() {
    let (facade, _, _) = facade();

    match facade.dispatch(RpcRequest::Ping(Default::default())) {
        RpcResponse::Ping(p) => assert_eq!(p.restart_count, 1),
        other => panic!("unexpected reply {other:?}"),
    }

    match facade.dispatch(RpcRequest::Search(search_for("d1"))) {
        RpcResponse::Search(s) => assert_eq!(s.hits.len(), 3),
        other => panic!("unexpected reply {other:?}"),
    }

    match facade.dispatch(RpcRequest::Search(search_for("fail"))) {
        RpcResponse::Failure(e) => assert_eq!(e.code, ErrorCode::NotFound.as_i32()),
        other => panic!("unexpected reply {other:?}"),
    }

    match facade.dispatch(RpcRequest::Misc(wire::MiscRequest::default())) {
        RpcResponse::Misc(m) => assert_eq!(m.code, 7),
        other => panic!("unexpected reply {other:?}"),
    }
}
