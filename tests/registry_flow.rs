//! End-to-end flows on a tokio runtime: worker loop, tokio timeouts, subscribers.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use taskline::{
    CallbackError, Event, EventKind, Outcome, Subscribe, TaskId, TaskRegistry, TokioTimer, Wakeup,
};
use tokio::sync::mpsc;

struct Forward(mpsc::UnboundedSender<Event>);

#[async_trait]
impl Subscribe for Forward {
    async fn on_event(&self, ev: &Event) {
        let _ = self.0.send(ev.clone());
    }

    fn name(&self) -> &'static str {
        "forward"
    }
}

fn tokio_registry(wakeup: &Arc<Wakeup>) -> TaskRegistry<u32, u32> {
    TaskRegistry::builder(Arc::new(TokioTimer::try_current().expect("runtime")))
        .with_worker(wakeup.waker())
        .build()
        .expect("registry")
}

#[tokio::test]
async fn worker_drains_in_submission_order() {
    let wakeup = Arc::new(Wakeup::new());
    let registry = tokio_registry(&wakeup);
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<(u32, Outcome<u32>)>();

    let worker = {
        let registry = registry.clone();
        let wakeup = wakeup.clone();
        tokio::spawn(async move {
            let mut processed = Vec::new();
            loop {
                while let Some((id, input)) = registry.peek() {
                    processed.push(*input);
                    registry.complete(id, *input * 10);
                    registry.advance();
                }
                if processed.len() == 5 {
                    return processed;
                }
                wakeup.notified().await;
            }
        })
    };

    for n in 1..=5u32 {
        let tx = done_tx.clone();
        registry.submit(n, Duration::from_secs(30), move |out| {
            let _ = tx.send((n, out));
            Ok(())
        });
        tokio::task::yield_now().await;
    }

    let processed = worker.await.expect("worker");
    assert_eq!(processed, vec![1, 2, 3, 4, 5]);

    let mut results = Vec::new();
    for _ in 0..5 {
        results.push(done_rx.recv().await.expect("result"));
    }
    results.sort_by_key(|(n, _)| *n);
    for (n, out) in results {
        assert_eq!(out, Outcome::Success(n * 10));
    }
    assert!(registry.is_empty());
}

#[tokio::test(start_paused = true)]
async fn tokio_timeout_delivers_expired_once() {
    let wakeup = Arc::new(Wakeup::new());
    let registry = tokio_registry(&wakeup);
    let (tx, mut rx) = mpsc::unbounded_channel();

    let id = registry.submit(1, Duration::from_millis(100), move |out| {
        let _ = tx.send(out);
        Ok(())
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(registry.contains(id));

    let out = rx.recv().await.expect("expiry");
    assert_eq!(out, Outcome::Expired);
    assert!(!registry.contains(id));
    assert!(!registry.complete(id, 5));
    assert!(rx.recv().await.is_none(), "callback dropped after single use");
}

#[tokio::test(start_paused = true)]
async fn cancelled_task_never_calls_back() {
    let wakeup = Arc::new(Wakeup::new());
    let registry = tokio_registry(&wakeup);
    let (tx, mut rx) = mpsc::unbounded_channel::<Outcome<u32>>();

    let mut handle: Option<TaskId> = Some(registry.submit(1, Duration::from_millis(20), move |out| {
        let _ = tx.send(out);
        Ok(())
    }));
    assert!(registry.cancel(&mut handle));
    assert!(handle.is_none());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(rx.recv().await.is_none());
    assert!(registry.peek().is_none());
}

#[tokio::test]
async fn subscribers_observe_callback_failures() {
    let (ev_tx, mut ev_rx) = mpsc::unbounded_channel();
    let registry: TaskRegistry<u32, u32> =
        TaskRegistry::builder(Arc::new(TokioTimer::try_current().expect("runtime")))
            .with_subscribers(vec![Arc::new(Forward(ev_tx))])
            .build()
            .expect("registry");

    let id = registry.submit(1, Duration::from_secs(30), |_| {
        Err(CallbackError::fail("downstream gone"))
    });
    assert!(registry.complete(id, 2));

    let mut kinds = Vec::new();
    while let Some(ev) = ev_rx.recv().await {
        kinds.push(ev.kind);
        if ev.kind == EventKind::CallbackFailed {
            assert_eq!(ev.task, Some(id));
            assert_eq!(ev.reason.as_deref(), Some("callback failed: downstream gone"));
            break;
        }
    }
    assert_eq!(
        kinds,
        vec![
            EventKind::TaskSubmitted,
            EventKind::TaskCompleted,
            EventKind::CallbackFailed
        ]
    );
}

#[test]
fn submit_from_plain_threads_with_tokio_timer() {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_time()
        .build()
        .expect("runtime");
    let registry: TaskRegistry<u32, u32> =
        TaskRegistry::builder(Arc::new(TokioTimer::new(rt.handle().clone())))
            .build()
            .expect("registry");

    let (tx, rx) = std::sync::mpsc::channel();
    let producers: Vec<_> = (0..4u32)
        .map(|n| {
            let registry = registry.clone();
            let tx = tx.clone();
            std::thread::spawn(move || {
                registry.submit(n, Duration::from_millis(10), move |out| {
                    tx.send(out.is_expired()).map_err(|e| CallbackError::fail(e.to_string()))
                })
            })
        })
        .collect();
    for p in producers {
        p.join().expect("producer");
    }

    for _ in 0..4 {
        let expired = rx.recv_timeout(Duration::from_secs(5)).expect("expiry");
        assert!(expired);
    }
    assert!(registry.is_empty());
}
