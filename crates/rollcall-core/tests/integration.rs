//! Integration tests for rollcall-core.
//!
//! The scanning-session tests drive the loop with the scripted mock and a
//! paused clock, so they need no hardware. The BLE test at the bottom
//! requires a real adapter and is ignored by default; run it with:
//! `cargo test --package rollcall-core -- --ignored --nocapture`

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use rollcall_core::{
    DiscoveryOptions, DiscoveryService, MockDiscovery, MockOutcome, RosterEvent, ScanSession,
    SessionOptions,
};

const CYCLE: Duration = Duration::from_secs(5);

fn session_with(
    outcomes: impl IntoIterator<Item = MockOutcome>,
) -> (Arc<MockDiscovery>, ScanSession<MockDiscovery>) {
    let discovery = Arc::new(MockDiscovery::scripted(outcomes));
    let session = ScanSession::new(
        Arc::clone(&discovery),
        SessionOptions::new().cycle_interval(CYCLE),
    );
    (discovery, session)
}

#[tokio::test(start_paused = true)]
async fn roster_deduplicates_across_cycles() {
    // Three interactions: a student, the same student seen again, and a
    // second student. The duplicate must not produce a second entry.
    let (_, session) = session_with([
        MockOutcome::named("RollNo_1001"),
        MockOutcome::named("RollNo_1001"),
        MockOutcome::named("EE123456"),
    ]);

    session.start().await;
    sleep(CYCLE * 3).await;
    session.stop().await;

    let rolls: Vec<_> = session
        .snapshot()
        .await
        .into_iter()
        .map(|e| e.roll_number.into_inner())
        .collect();
    assert_eq!(rolls, ["1001", "EE123456"]);
}

#[tokio::test(start_paused = true)]
async fn nameless_device_falls_back_to_the_characteristic() {
    let (_, session) = session_with([MockOutcome::Device {
        name: Some("Pixel 7".to_string()),
        characteristic: Some(b"CS2023001".to_vec()),
    }]);

    session.start().await;
    sleep(CYCLE).await;
    session.stop().await;

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.len(), 1);
    // The decoded characteristic is the roll number; the advertised name
    // is kept as the raw label.
    assert_eq!(snapshot[0].roll_number.as_str(), "CS2023001");
    assert_eq!(snapshot[0].raw_label, "Pixel 7");
}

#[tokio::test(start_paused = true)]
async fn failed_cycles_do_not_stop_the_loop() {
    let (discovery, session) = session_with([
        MockOutcome::Fail("adapter reset".to_string()),
        MockOutcome::Device {
            name: Some("Laptop".to_string()),
            characteristic: Some(b"1001".to_vec()),
        },
        MockOutcome::named("RollNo_2002"),
    ]);
    // The connection fallback for "Laptop" fails too; the loop swallows it.
    discovery.fail_next_connects(1);

    session.start().await;
    sleep(CYCLE * 3).await;
    session.stop().await;

    let rolls: Vec<_> = session
        .snapshot()
        .await
        .into_iter()
        .map(|e| e.roll_number.into_inner())
        .collect();
    assert_eq!(rolls, ["2002"]);
    assert!(discovery.request_count() >= 3);
}

#[tokio::test(start_paused = true)]
async fn stop_discards_an_interaction_still_in_flight() {
    let (discovery, session) = session_with([MockOutcome::named("RollNo_9999")]);
    discovery.set_request_latency(Duration::from_secs(60));

    session.start().await;
    // Let the first cycle get in flight, then stop while it is suspended.
    sleep(Duration::from_secs(2)).await;
    session.stop().await;
    assert!(!session.is_scanning().await);

    // The interaction resolves long after the stop; its result is dropped.
    sleep(Duration::from_secs(120)).await;
    assert!(session.snapshot().await.is_empty());

    // No further interactions were scheduled after the stop.
    assert_eq!(discovery.request_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn start_and_stop_are_idempotent() {
    let (_, session) = session_with([]);

    assert!(!session.is_scanning().await);
    session.stop().await; // Idle → Idle

    session.start().await;
    session.start().await; // Scanning → Scanning
    assert!(session.is_scanning().await);

    session.stop().await;
    session.stop().await; // Idle → Idle
    assert!(!session.is_scanning().await);
}

#[tokio::test(start_paused = true)]
async fn clearing_the_roster_resets_dedup_state() {
    let (discovery, session) = session_with([MockOutcome::named("RollNo_7")]);

    session.start().await;
    sleep(CYCLE).await;
    assert_eq!(session.roster_len().await, 1);

    session.clear_roster().await;
    assert!(session.snapshot().await.is_empty());

    // The same roll number records again after the clear.
    discovery.push(MockOutcome::named("RollNo_7")).await;
    sleep(CYCLE * 2).await;
    session.stop().await;

    assert_eq!(session.roster_len().await, 1);
}

#[tokio::test(start_paused = true)]
async fn state_transitions_are_broadcast() {
    let (_, session) = session_with([MockOutcome::named("RollNo_1001")]);
    let mut events = session.subscribe();

    session.start().await;
    sleep(CYCLE).await;
    session.stop().await;

    assert!(matches!(events.recv().await, Ok(RosterEvent::ScanStarted)));
    match events.recv().await {
        Ok(RosterEvent::StudentRecorded { entry }) => {
            assert_eq!(entry.roll_number.as_str(), "1001");
        }
        other => panic!("expected StudentRecorded, got {:?}", other),
    }
    assert!(matches!(events.recv().await, Ok(RosterEvent::ScanStopped)));
}

#[tokio::test]
#[ignore = "requires BLE hardware"]
async fn ble_discovery_surfaces_a_device() {
    use rollcall_core::BleDiscovery;

    let discovery = BleDiscovery::new(DiscoveryOptions::new().window_secs(10))
        .await
        .expect("no Bluetooth adapter available");

    match discovery.request_device().await {
        Ok(Some(candidate)) => {
            println!(
                "Surfaced {} ({}, rssi {:?})",
                candidate.display_label(),
                candidate.identifier,
                candidate.rssi
            );
        }
        Ok(None) => println!("No device in range"),
        Err(e) => panic!("Discovery failed: {}", e),
    }
}
