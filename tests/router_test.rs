//! Backend selection and end-of-request behaviour of the router.

use route_core::{AccessLogger, LogEntry, RouteError, RouteStore};
use tokio::io::AsyncReadExt;

mod common;

use common::{add_frontend, expected, setup, strip_start_time};

#[tokio::test]
async fn test_init() {
    let (_store, router) = setup().await;
    assert!(router.round_robin().is_empty());
    assert!(router.cache().is_empty());
    assert!(!router.has_logger());
}

#[tokio::test]
async fn test_choose_backend() {
    let (store, router) = setup().await;
    add_frontend(store.as_ref(), "myfrontend.com", "myfrontend", &["http://url1:123"]).await;

    let data = router.choose_backend("myfrontend.com").await.unwrap();
    assert_eq!(
        strip_start_time(data),
        expected("myfrontend.com", "myfrontend.com", "http://url1:123", 0, 1)
    );
}

#[tokio::test]
async fn test_choose_backend_single_backend_repeats() {
    let (store, router) = setup().await;
    add_frontend(store.as_ref(), "myfrontend.com", "myfrontend", &["http://url1:123"]).await;

    for _ in 0..5 {
        let data = router.choose_backend("myfrontend.com").await.unwrap();
        assert_eq!(data.backend, "http://url1:123");
        assert_eq!(data.backend_idx, 0);
        assert_eq!(data.backend_len, 1);
    }
}

#[tokio::test]
async fn test_choose_backend_not_found() {
    let (_store, router) = setup().await;

    let err = router.choose_backend("myfrontend.com").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "error running routes backend commands: no backends available"
    );
    assert_eq!(err.kind, RouteError::NoBackends);
    assert_eq!(
        strip_start_time(err.data),
        expected("myfrontend.com", "", "", 0, 0)
    );
}

#[tokio::test]
async fn test_choose_backend_no_backends() {
    let (store, router) = setup().await;
    add_frontend(store.as_ref(), "myfrontend.com", "myfrontend", &[]).await;

    let err = router.choose_backend("myfrontend.com").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "error running routes backend commands: no backends available"
    );
    assert_eq!(
        strip_start_time(err.data),
        expected("myfrontend.com", "", "", 0, 0)
    );
}

#[tokio::test]
async fn test_choose_backend_all_dead() {
    let (store, router) = setup().await;
    add_frontend(store.as_ref(), "myfrontend.com", "myfrontend", &["http://url1:123"]).await;
    store.set_add("dead:myfrontend.com", "0").await.unwrap();

    let err = router.choose_backend("myfrontend.com").await.unwrap_err();
    assert_eq!(err.to_string(), "all backends are dead");
    assert_eq!(err.kind, RouteError::AllDead);
    assert_eq!(
        strip_start_time(err.data),
        expected("myfrontend.com", "myfrontend.com", "", 0, 1)
    );
}

#[tokio::test]
async fn test_choose_backend_all_of_many_dead() {
    let (store, router) = setup().await;
    add_frontend(store.as_ref(), "myfrontend.com", "myfrontend", &["http://url1:123", "http://url2:123"]).await;
    store.set_add("dead:myfrontend.com", "1").await.unwrap();
    store.set_add("dead:myfrontend.com", "0").await.unwrap();

    let err = router.choose_backend("myfrontend.com").await.unwrap_err();
    assert_eq!(err.kind, RouteError::AllDead);
    assert_eq!(err.data.backend_len, 2);
    assert!(err.data.backend.is_empty());
}

#[tokio::test]
async fn test_choose_backend_stale_dead_index_ignored() {
    let (store, router) = setup().await;
    add_frontend(store.as_ref(), "myfrontend.com", "myfrontend", &["http://url1:123"]).await;
    // Left over from a time the frontend had more backends
    store.set_add("dead:myfrontend.com", "3").await.unwrap();

    let data = router.choose_backend("myfrontend.com").await.unwrap();
    assert_eq!(data.backend, "http://url1:123");
}

#[tokio::test]
async fn test_choose_backend_round_robin() {
    let (store, router) = setup().await;
    add_frontend(
        store.as_ref(),
        "myfrontend.com",
        "myfrontend",
        &["http://url1:123", "http://url2:123", "http://url3:123"],
    )
    .await;

    let data = router.choose_backend("myfrontend.com").await.unwrap();
    assert_eq!(
        strip_start_time(data),
        expected("myfrontend.com", "myfrontend.com", "http://url1:123", 0, 3)
    );

    let data = router.choose_backend("myfrontend.com").await.unwrap();
    assert_eq!(data.backend, "http://url2:123");
    let data = router.choose_backend("myfrontend.com").await.unwrap();
    assert_eq!(data.backend, "http://url3:123");
    let data = router.choose_backend("myfrontend.com").await.unwrap();
    assert_eq!(data.backend, "http://url1:123");
}

#[tokio::test]
async fn test_choose_backend_round_robin_no_cache() {
    let (store, router) = setup().await;
    add_frontend(
        store.as_ref(),
        "myfrontend.com",
        "myfrontend",
        &["http://url1:123", "http://url2:123", "http://url3:123"],
    )
    .await;

    let mut picks = Vec::new();
    for _ in 0..4 {
        router.cache().purge();
        picks.push(router.choose_backend("myfrontend.com").await.unwrap().backend);
    }
    assert_eq!(
        picks,
        vec!["http://url1:123", "http://url2:123", "http://url3:123", "http://url1:123"]
    );
}

#[tokio::test]
async fn test_round_robin_survives_purges_mid_cycle() {
    let (store, router) = setup().await;
    add_frontend(store.as_ref(), "a.com", "a", &["http://b0", "http://b1", "http://b2"]).await;

    let mut with_purges = Vec::new();
    for n in 0..7 {
        if n % 2 == 1 {
            router.cache().purge();
        }
        with_purges.push(router.choose_backend("a.com").await.unwrap().backend_idx);
    }
    assert_eq!(with_purges, vec![0, 1, 2, 0, 1, 2, 0]);
}

#[tokio::test]
async fn test_cached_entry_served_until_purge() {
    let (store, router) = setup().await;
    add_frontend(store.as_ref(), "a.com", "a", &["http://b0"]).await;
    router.choose_backend("a.com").await.unwrap();

    // New backend is invisible while the cached entry is valid
    store.list_push("frontend:a.com", &["http://b1".to_string()]).await.unwrap();
    let data = router.choose_backend("a.com").await.unwrap();
    assert_eq!(data.backend_len, 1);

    router.cache().purge();
    let data = router.choose_backend("a.com").await.unwrap();
    assert_eq!(data.backend_len, 2);
}

#[tokio::test]
async fn test_dead_set_read_live_despite_cache() {
    let (store, router) = setup().await;
    add_frontend(store.as_ref(), "a.com", "a", &["http://b0", "http://b1"]).await;
    router.choose_backend("a.com").await.unwrap();

    store.set_add("dead:a.com", "1").await.unwrap();
    for _ in 0..4 {
        assert_eq!(router.choose_backend("a.com").await.unwrap().backend, "http://b0");
    }
}

#[tokio::test]
async fn test_end_request() {
    let (store, router) = setup().await;
    let (writer, mut reader) = tokio::io::duplex(64 * 1024);
    router.set_logger(AccessLogger::new(writer, 16));

    let data = route_core::RequestData::new("myfe.com");
    router.end_request(&data, false, None).await.unwrap();

    assert!(store.set_members("dead:myfe.com").await.unwrap().is_empty());

    router.stop().await;
    let mut out = String::new();
    reader.read_to_string(&mut out).await.unwrap();
    assert_eq!(out, "");
}

#[tokio::test]
async fn test_end_request_with_log_func() {
    let (store, router) = setup().await;
    let (writer, mut reader) = tokio::io::duplex(64 * 1024);
    router.set_logger(AccessLogger::new(writer, 16));

    let data = route_core::RequestData::new("myfe.com");
    router
        .end_request(&data, false, Some(&LogEntry::default))
        .await
        .unwrap();

    assert!(store.set_members("dead:myfe.com").await.unwrap().is_empty());

    router.stop().await;
    let mut out = String::new();
    reader.read_to_string(&mut out).await.unwrap();
    assert_eq!(
        out,
        "- - - [01/Jan/1970:00:00:00 +0000] \"  \" 0 0 \"\" \"\" \":\" \"\" 0.000 0.000\n"
    );
}

#[tokio::test]
async fn test_end_request_one_line_per_call() {
    let (store, router) = setup().await;
    add_frontend(store.as_ref(), "myfe.com", "myfe", &["http://b0", "http://b1"]).await;
    let (writer, mut reader) = tokio::io::duplex(64 * 1024);
    router.set_logger(AccessLogger::new(writer, 64));

    for status in [200u16, 404, 502] {
        let data = router.choose_backend("myfe.com").await.unwrap();
        let make_entry = move || LogEntry {
            method: "GET".into(),
            path: "/".into(),
            proto: "HTTP/1.1".into(),
            status_code: status,
            ..Default::default()
        };
        router.end_request(&data, false, Some(&make_entry)).await.unwrap();
    }

    router.stop().await;
    let mut out = String::new();
    reader.read_to_string(&mut out).await.unwrap();
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("\"GET / HTTP/1.1\" 200 "));
    assert!(lines[2].contains("\"GET / HTTP/1.1\" 502 "));
    // Backend key filled in from the decision record
    assert!(lines.iter().all(|l| l.contains("\"myfe.com\"")));
}

#[tokio::test]
async fn test_end_request_without_logger_is_noop() {
    let (_store, router) = setup().await;
    let data = route_core::RequestData::new("myfe.com");
    let called = std::sync::atomic::AtomicBool::new(false);
    let make_entry = || {
        called.store(true, std::sync::atomic::Ordering::SeqCst);
        LogEntry::default()
    };

    router.end_request(&data, false, Some(&make_entry)).await.unwrap();
    assert!(!called.load(std::sync::atomic::Ordering::SeqCst));
}

#[tokio::test]
async fn test_end_request_with_error() {
    let (store, router) = setup().await;
    let data = route_core::RequestData::new("myfe.com");

    router.end_request(&data, true, None).await.unwrap();
    assert_eq!(store.set_members("dead:myfe.com").await.unwrap(), vec!["0"]);
}

#[tokio::test]
async fn test_failure_feedback_excludes_backend() {
    let (store, router) = setup().await;
    add_frontend(store.as_ref(), "a.com", "a", &["http://b0", "http://b1"]).await;

    let first = router.choose_backend("a.com").await.unwrap();
    assert_eq!(first.backend_idx, 0);
    router.end_request(&first, true, None).await.unwrap();

    for _ in 0..3 {
        let data = router.choose_backend("a.com").await.unwrap();
        assert_eq!(data.backend, "http://b1");
        router.end_request(&data, false, None).await.unwrap();
    }

    let last = router.choose_backend("a.com").await.unwrap();
    router.end_request(&last, true, None).await.unwrap();
    let err = router.choose_backend("a.com").await.unwrap_err();
    assert_eq!(err.kind, RouteError::AllDead);

    route_core::admin::revive_backend(store.as_ref(), "a.com", 0).await.unwrap();
    assert_eq!(router.choose_backend("a.com").await.unwrap().backend, "http://b0");
}
