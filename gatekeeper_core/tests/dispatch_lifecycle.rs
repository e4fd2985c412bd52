use std::time::Duration;

use crossbeam_channel as xch;
use gatekeeper_core::mocks::{FailingNotifier, RecordingNotifier};
use gatekeeper_core::{DispatchStats, Dispatcher, LogNotifier, Outgoing};
use gatekeeper_traits::{BoxError, Notifier};

#[test]
fn delivers_in_order_and_drains_on_shutdown() {
    let notifier = RecordingNotifier::new();
    let d = Dispatcher::spawn(notifier.clone(), 8);
    for i in 0..5 {
        assert!(d.submit(Outgoing::new("r", format!("m{i}"))));
    }
    let stats = d.shutdown();
    assert_eq!(
        stats,
        DispatchStats {
            delivered: 5,
            failed: 0,
            dropped: 0
        }
    );
    assert_eq!(notifier.texts(), vec!["m0", "m1", "m2", "m3", "m4"]);
}

#[test]
fn failures_are_counted_not_propagated() {
    let d = Dispatcher::spawn(FailingNotifier, 4);
    assert_eq!(
        d.submit_all(vec![Outgoing::new("a", "x"), Outgoing::new("b", "y")]),
        2
    );
    let stats = d.shutdown();
    assert_eq!(stats.failed, 2);
    assert_eq!(stats.delivered, 0);
}

/// Signals when a send starts, then blocks until released.
struct Gated {
    started: xch::Sender<()>,
    release: xch::Receiver<()>,
}

impl Notifier for Gated {
    fn send(&mut self, _recipient: &str, _text: &str) -> Result<(), BoxError> {
        let _ = self.started.send(());
        let _ = self.release.recv_timeout(Duration::from_secs(5));
        Ok(())
    }
}

#[test]
fn full_queue_drops_instead_of_blocking() {
    let (started_tx, started_rx) = xch::unbounded();
    let (release_tx, release_rx) = xch::unbounded();
    let d = Dispatcher::spawn(
        Gated {
            started: started_tx,
            release: release_rx,
        },
        1,
    );

    assert!(d.submit(Outgoing::new("r", "first")));
    started_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("worker picked up first message");

    // Worker is busy; one slot of queue left.
    assert!(d.submit(Outgoing::new("r", "second")));
    assert!(!d.submit(Outgoing::new("r", "third")));
    assert_eq!(d.stats().dropped, 1);

    release_tx.send(()).unwrap();
    release_tx.send(()).unwrap();
    let stats = d.shutdown();
    assert_eq!(stats.delivered, 2);
    assert_eq!(stats.dropped, 1);
}

#[test]
fn drop_joins_worker() {
    let notifier = RecordingNotifier::new();
    {
        let d = Dispatcher::spawn(notifier.clone(), 2);
        d.submit(Outgoing::new("r", "bye"));
    }
    assert_eq!(notifier.texts(), vec!["bye"]);
}

#[test]
fn log_notifier_always_succeeds() {
    let d = Dispatcher::spawn(LogNotifier, 2);
    d.submit(Outgoing::new("r", "dry"));
    assert_eq!(d.shutdown().delivered, 1);
}
