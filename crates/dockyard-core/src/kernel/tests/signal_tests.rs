use crate::kernel::signal::ShutdownSignal;
use std::thread;

#[test]
fn test_signal_starts_clear() {
    let signal = ShutdownSignal::new();
    assert!(!signal.is_requested());
}

#[test]
fn test_clones_share_the_flag() {
    let signal = ShutdownSignal::new();
    let remote = signal.clone();

    thread::spawn(move || remote.request())
        .join()
        .expect("signalling thread panicked");

    assert!(signal.is_requested());
    signal.reset();
    assert!(!signal.is_requested());
}

#[test]
fn test_failed_watcher_start_is_retried() {
    use crate::kernel::signal::ensure_watcher;
    use std::io;

    let mut running = false;
    let err = ensure_watcher(&mut running, || Err(io::Error::other("no threads left")));
    assert!(err.is_err());
    assert!(!running);

    let mut spawned = 0;
    ensure_watcher(&mut running, || {
        spawned += 1;
        Ok(())
    })
    .expect("second start should succeed");
    assert!(running);

    ensure_watcher(&mut running, || {
        spawned += 1;
        Ok(())
    })
    .expect("running watcher is reused");
    assert_eq!(spawned, 1);
}
