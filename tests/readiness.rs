//! Process-wide readiness gate.
//!
//! Global state is shared by every test in a binary, so the whole sequence
//! lives in one test.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use scoped_logger::lifecycle::{readiness, PACKAGE_TYPE};
use scoped_logger::observability::InitError;
use scoped_logger::sink::MemorySink;
use scoped_logger::{Context, ContextKey, Logger, Startup};

mod common;

const SEQUENCE_LEN: usize = 5_000;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_global_logger_waits_for_configuration() {
    let primary = Arc::new(MemorySink::new());
    let external = Arc::new(MemorySink::new());

    // Outside a runtime init fails without claiming the one-time slot.
    let outside = std::thread::spawn(scoped_logger::init).join().unwrap();
    assert!(matches!(outside, Err(InitError::NoRuntime)));

    // Before init: records are queued, not lost.
    let ctx = Context::background().with_value(ContextKey::RequestId, "r-1");
    scoped_logger::info(Some(&ctx), "early record");
    scoped_logger::output(0, "early driver line");
    assert!(!readiness::is_ready());
    assert_eq!(readiness::pending_len(), 2);
    assert!(scoped_logger::flush().is_ok());

    let builds = Arc::new(AtomicUsize::new(0));
    let factory = {
        let (primary, external, builds) = (primary.clone(), external.clone(), builds.clone());
        move || {
            builds.fetch_add(1, Ordering::SeqCst);
            Ok(Logger::new("test-host", primary, external))
        }
    };
    assert!(matches!(scoped_logger::init_with(factory), Ok(true)));
    assert!(matches!(
        scoped_logger::init_with(|| unreachable!("second init must not run")),
        Ok(false)
    ));
    assert!(matches!(scoped_logger::init(), Ok(false)));

    // Configuration has not been announced yet.
    let blocked = tokio::time::timeout(Duration::from_millis(100), scoped_logger::wait()).await;
    assert!(blocked.is_err());
    assert_eq!(builds.load(Ordering::SeqCst), 0);

    let waiters: Vec<_> = (0..4)
        .map(|_| tokio::spawn(scoped_logger::wait()))
        .collect();

    // One thread keeps emitting while readiness flips underneath it.
    let progress = Arc::new(AtomicUsize::new(0));
    let emitter = {
        let progress = progress.clone();
        tokio::task::spawn_blocking(move || {
            for i in 0..SEQUENCE_LEN {
                scoped_logger::info(None, &format!("seq-{i}"));
                progress.store(i + 1, Ordering::SeqCst);
                if i >= 500 {
                    std::thread::sleep(Duration::from_micros(50));
                }
            }
        })
    };
    while progress.load(Ordering::SeqCst) < 500 {
        tokio::task::yield_now().await;
    }

    Startup::global().ready();

    let logger = tokio::time::timeout(Duration::from_secs(5), scoped_logger::wait())
        .await
        .expect("logger ready");
    assert_eq!(logger.hostname(), "test-host");
    for waiter in waiters {
        let other = waiter.await.unwrap();
        assert!(Arc::ptr_eq(&logger, &other));
    }
    emitter.await.unwrap();

    // Waiting again resolves at once and does not rebuild anything.
    let again = tokio::time::timeout(Duration::from_millis(100), scoped_logger::wait())
        .await
        .unwrap();
    assert!(Arc::ptr_eq(&logger, &again));
    assert_eq!(builds.load(Ordering::SeqCst), 1);

    // Queued records were replayed first, with the hostname filled in.
    tokio::time::timeout(Duration::from_secs(5), Startup::global().wait(PACKAGE_TYPE))
        .await
        .expect("logprovider published");
    let messages = common::messages(&primary);
    assert_eq!(messages[0], "early record");
    assert!(messages.iter().any(|m| m == "Logging service is ready."));

    // Every record of the emitting thread arrived once, in program order.
    let sequence: Vec<_> = messages
        .iter()
        .filter(|m| m.starts_with("seq-"))
        .cloned()
        .collect();
    let expected: Vec<_> = (0..SEQUENCE_LEN).map(|i| format!("seq-{i}")).collect();
    assert_eq!(sequence, expected);

    let early = primary.find("early record").unwrap();
    assert_eq!(early.fields.get_str("server"), Some("test-host"));
    assert_eq!(early.fields.get_str("requestId"), Some("r-1"));
    assert!(early.caller.unwrap().contains("readiness.rs"));
    assert!(external.find("early driver line").is_some());
    assert_eq!(readiness::pending_len(), 0);

    // After readiness records go straight through.
    scoped_logger::warn(None, "after ready");
    assert!(primary.find("after ready").is_some());
    assert!(scoped_logger::flush().is_ok());
}
