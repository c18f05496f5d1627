//! Integration tests for the NodeService → WaterLevel → indicators pipeline.
//!
//! A scripted load cell stands in for the HX711; every LED call and event
//! is recorded by the mocks.

use crate::mock_hw::{MemStore, MockIndicators, RecordingSink};

use kitchennode::app::commands::NodeCommand;
use kitchennode::app::events::NodeEvent;
use kitchennode::app::ports::{StorageError, StoredCalibration};
use kitchennode::app::service::NodeService;
use kitchennode::config::NodeConfig;
use kitchennode::error::SensorError;
use kitchennode::sensors::sim::SimulatedLoadCell;

const CAL: StoredCalibration = StoredCalibration {
    tare: 100.0,
    full_scale: 200.0,
};

fn make_app(
    cell: SimulatedLoadCell,
    store: &MemStore,
) -> (NodeService<SimulatedLoadCell>, MockIndicators, RecordingSink) {
    let mut app = NodeService::new(&NodeConfig::default(), cell);
    let mut leds = MockIndicators::new();
    let mut sink = RecordingSink::new();
    app.start(store, &mut leds, &mut sink);
    (app, leds, sink)
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_without_stored_calibration_is_uncalibrated() {
    let (app, leds, sink) = make_app(SimulatedLoadCell::constant(0.0), &MemStore::new());

    assert!(!app.calibration().calibrated);
    assert!(sink.contains(&NodeEvent::Started { calibrated: false }));
    assert!(!leds.tare_on() && !leds.full_on() && !leds.alarm_on());
}

#[test]
fn start_restores_stored_calibration() {
    let (app, leds, sink) = make_app(SimulatedLoadCell::constant(0.0), &MemStore::with(CAL));

    let cal = app.calibration();
    assert_eq!(cal.tare, 100.0);
    assert_eq!(cal.full_scale, 200.0);
    assert!(cal.calibrated);
    assert!(leds.tare_on() && leds.full_on());
    assert!(sink.contains(&NodeEvent::Started { calibrated: true }));
}

#[test]
fn start_ignores_invalid_stored_calibration() {
    let bad = StoredCalibration {
        tare: 100.0,
        full_scale: 0.0,
    };
    let (app, _leds, sink) = make_app(SimulatedLoadCell::constant(0.0), &MemStore::with(bad));

    assert!(!app.calibration().calibrated);
    assert_eq!(app.calibration().full_scale, 0.0);
    assert!(sink.contains(&NodeEvent::Started { calibrated: false }));
}

#[test]
fn start_survives_load_failure() {
    let mut store = MemStore::with(CAL);
    store.fail_load = Some(StorageError::Corrupted);
    let (app, _leds, sink) = make_app(SimulatedLoadCell::constant(0.0), &store);

    assert!(!app.calibration().calibrated);
    assert!(sink.contains(&NodeEvent::Started { calibrated: false }));
}

#[test]
fn new_wakes_the_load_cell() {
    let mut app = NodeService::new(&NodeConfig::default(), SimulatedLoadCell::constant(0.0));
    assert!(app.level_mut().source().is_prepared());
}

// ── Reading ───────────────────────────────────────────────────

#[test]
fn uncalibrated_tick_reports_net_weight_only() {
    let (mut app, _leds, _sink) = make_app(SimulatedLoadCell::constant(57.39), &MemStore::new());

    let net = app.tick(&mut MockIndicators::new(), &mut RecordingSink::new());

    assert_eq!(net, 57.3);
    assert_eq!(app.reading().remaining_percent, 0.0);
    assert!(!app.reading().is_low);
}

#[test]
fn telemetry_is_emitted_every_n_ticks() {
    let config = NodeConfig {
        telemetry_every: 2,
        ..NodeConfig::default()
    };
    let mut app = NodeService::new(&config, SimulatedLoadCell::constant(12.5));
    let mut leds = MockIndicators::new();
    let mut sink = RecordingSink::new();

    for _ in 0..5 {
        app.tick(&mut leds, &mut sink);
    }

    let ticks: Vec<u64> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            NodeEvent::Reading(t) => Some(t.tick),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, vec![2, 4]);
    assert_eq!(app.tick_count(), 5);
}

#[test]
fn read_failure_keeps_previous_reading() {
    let (mut app, mut leds, mut sink) =
        make_app(SimulatedLoadCell::scripted(&[130.0, 400.0]), &MemStore::with(CAL));

    assert_eq!(app.tick(&mut leds, &mut sink), 30.0);
    assert_eq!(app.reading().remaining_percent, 15.0);

    app.level_mut().source_mut().fail_next(SensorError::NotReady);
    assert_eq!(app.tick(&mut leds, &mut sink), 30.0);
    assert_eq!(app.reading().remaining_percent, 15.0);

    // Next read picks up where the script left off.
    assert_eq!(app.tick(&mut leds, &mut sink), 300.0);
}

// ── Low-water alarm ───────────────────────────────────────────

#[test]
fn low_level_edges_drive_alarm_and_events() {
    let (mut app, mut leds, mut sink) = make_app(
        SimulatedLoadCell::scripted(&[300.0, 110.0, 110.0, 250.0]),
        &MemStore::with(CAL),
    );

    app.tick(&mut leds, &mut sink);
    assert_eq!(app.reading().remaining_percent, 100.0);
    assert!(!leds.alarm_on());

    app.tick(&mut leds, &mut sink);
    assert!(app.reading().is_low);
    assert!(leds.alarm_on());
    assert!(sink.contains(&NodeEvent::LowLevel {
        remaining_percent: 5.0
    }));

    app.tick(&mut leds, &mut sink);
    assert_eq!(
        sink.count(|e| matches!(e, NodeEvent::LowLevel { .. })),
        1,
        "LowLevel fires on the edge only"
    );

    app.tick(&mut leds, &mut sink);
    assert!(!app.reading().is_low);
    assert!(!leds.alarm_on());
    assert!(sink.contains(&NodeEvent::LevelRestored {
        remaining_percent: 75.0
    }));
}

#[test]
fn acknowledged_alarm_stays_dark_until_next_low() {
    let (mut app, mut leds, mut sink) = make_app(
        SimulatedLoadCell::scripted(&[110.0, 110.0, 250.0, 110.0]),
        &MemStore::with(CAL),
    );
    let mut store = MemStore::new();

    app.tick(&mut leds, &mut sink);
    assert!(app.alarm_active());

    app.handle_command(NodeCommand::AcknowledgeAlarm, &mut store, &mut leds, &mut sink)
        .unwrap();
    assert!(!app.alarm_active());
    assert!(!leds.alarm_on());
    assert!(sink.contains(&NodeEvent::AlarmAcknowledged));

    // Still low, still silenced.
    app.tick(&mut leds, &mut sink);
    assert!(app.reading().is_low);
    assert!(!leds.alarm_on());

    // Refill, then drain again: the alarm comes back.
    app.tick(&mut leds, &mut sink);
    app.tick(&mut leds, &mut sink);
    assert!(app.alarm_active());
    assert!(leds.alarm_on());
}

#[test]
fn acknowledge_without_alarm_is_a_no_op() {
    let (mut app, mut leds, mut sink) =
        make_app(SimulatedLoadCell::constant(300.0), &MemStore::with(CAL));
    app.tick(&mut leds, &mut sink);

    app.handle_command(
        NodeCommand::AcknowledgeAlarm,
        &mut MemStore::new(),
        &mut leds,
        &mut sink,
    )
    .unwrap();

    assert!(!sink.contains(&NodeEvent::AlarmAcknowledged));
}

// ── Reset ─────────────────────────────────────────────────────

#[test]
fn reset_returns_to_defaults() {
    let (mut app, mut leds, mut sink) =
        make_app(SimulatedLoadCell::constant(110.0), &MemStore::with(CAL));
    let mut store = MemStore::with(CAL);
    app.tick(&mut leds, &mut sink);
    assert!(app.alarm_active());

    app.handle_command(NodeCommand::Reset, &mut store, &mut leds, &mut sink)
        .unwrap();

    let cal = app.calibration();
    assert_eq!((cal.tare, cal.full_scale, cal.calibrated), (0.0, 0.0, false));
    assert_eq!(app.reading().net_weight, 0.0);
    assert!(!app.alarm_active());
    assert!(!leds.alarm_on() && !leds.tare_on() && !leds.full_on());
    assert!(sink.contains(&NodeEvent::CalibrationChanged(false)));
    assert_eq!(store.saved, Some(CAL), "reset keeps the stored calibration");
}
