//! Node service, the hexagonal core.
//!
//! [`NodeService`] owns the calibrated [`WaterLevel`] reader and plays the
//! part of its calibration controller: it turns button presses and runtime
//! commands into tare / full-scale / calibrated updates, watches the
//! low-water flag and persists the calibration. All I/O flows through port
//! traits injected at call sites, making the entire service testable with
//! mock adapters.
//!
//! ```text
//!  WeightSource ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                   │      NodeService        │
//!  IndicatorPort ◀──│  WaterLevel · alarm     │◀──▶ CalibrationStore
//!                   └────────────────────────┘
//! ```

use log::{debug, info, warn};

use crate::config::NodeConfig;
use crate::error::{Error, Result};
use crate::sensors::WeightSource;
use crate::sensors::water_level::{CalibrationState, ReadingState, WaterLevel, truncate1};

use super::commands::NodeCommand;
use super::events::{NodeEvent, ReadingTelemetry};
use super::ports::{CalibrationStore, EventSink, IndicatorPort, StoredCalibration};

// ───────────────────────────────────────────────────────────────
// NodeService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct NodeService<S> {
    level: WaterLevel<S>,
    telemetry_every: u64,
    tick_count: u64,
    /// `is_low` as seen on the previous tick, for edge detection.
    was_low: bool,
    alarm_acknowledged: bool,
}

impl<S: WeightSource> NodeService<S> {
    /// Construct the service and initialize the reader.
    ///
    /// Does **not** load the stored calibration; call [`start`](Self::start) next.
    pub fn new(config: &NodeConfig, source: S) -> Self {
        let mut level = WaterLevel::new(source);
        level.initialize();

        Self {
            level,
            telemetry_every: u64::from(config.telemetry_every.max(1)),
            tick_count: 0,
            was_low: false,
            alarm_acknowledged: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Restore the stored calibration, if any, and announce the start.
    pub fn start(
        &mut self,
        store: &impl CalibrationStore,
        indicators: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) {
        indicators.all_off();

        match store.load() {
            Ok(Some(stored)) => match stored.validate() {
                Ok(()) => {
                    self.level.set_tare(stored.tare);
                    self.level.set_full_scale(stored.full_scale);
                    self.level.set_calibrated(true);
                    indicators.set_tare_led(true);
                    indicators.set_full_led(true);
                    info!(
                        "NodeService: restored calibration tare={} full={}",
                        stored.tare, stored.full_scale
                    );
                }
                Err(e) => warn!("NodeService: ignoring stored calibration ({})", e),
            },
            Ok(None) => info!("NodeService: no stored calibration, bowl uncalibrated"),
            Err(e) => warn!("NodeService: calibration load failed ({}), bowl uncalibrated", e),
        }

        sink.emit(&NodeEvent::Started {
            calibrated: self.level.is_calibrated(),
        });
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one read cycle: read → low-water edge → alarm LED → telemetry.
    /// Returns the net weight.
    pub fn tick(
        &mut self,
        indicators: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) -> f32 {
        self.tick_count += 1;

        let net_weight = self.level.read();
        let reading = *self.level.reading();

        if reading.is_low != self.was_low {
            if reading.is_low {
                warn!("Water low: {}% remaining", reading.remaining_percent);
                sink.emit(&NodeEvent::LowLevel {
                    remaining_percent: reading.remaining_percent,
                });
            } else {
                info!("Water restored: {}% remaining", reading.remaining_percent);
                self.alarm_acknowledged = false;
                sink.emit(&NodeEvent::LevelRestored {
                    remaining_percent: reading.remaining_percent,
                });
            }
            self.was_low = reading.is_low;
        }

        indicators.set_water_alarm(self.alarm_active());

        if self.tick_count % self.telemetry_every == 0 {
            sink.emit(&NodeEvent::Reading(self.build_telemetry()));
        }

        net_weight
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (buttons, provisioning, etc.).
    pub fn handle_command(
        &mut self,
        cmd: NodeCommand,
        store: &mut impl CalibrationStore,
        indicators: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        match cmd {
            NodeCommand::CaptureTare => {
                let raw = self.level.sample_raw().inspect_err(|e| {
                    warn!("Tare capture failed: {}", e);
                })?;
                self.level.set_tare(raw);
                self.update_calibrated(false, sink);
                indicators.set_water_alarm(false);
                indicators.set_tare_led(true);
                indicators.set_full_led(false);
                info!("Tare captured: {}", raw);
                sink.emit(&NodeEvent::TareCaptured(raw));
            }
            NodeCommand::CaptureFull => {
                let raw = self.level.sample_raw().inspect_err(|e| {
                    warn!("Full-bowl capture failed: {}", e);
                })?;
                let net = truncate1(raw - self.level.calibration().tare);
                if net <= 0.0 {
                    let reason = "full bowl must weigh more than the tare";
                    warn!("Full-bowl capture rejected: net={}", net);
                    sink.emit(&NodeEvent::CalibrationRejected(reason));
                    return Err(Error::Calibration(reason));
                }
                self.level.set_full_scale(net);
                indicators.set_full_led(true);
                info!("Full scale captured: {}", net);
                sink.emit(&NodeEvent::FullScaleCaptured(net));
                self.update_calibrated(true, sink);
            }
            NodeCommand::SetTare(value) => {
                debug!("Tare set to {}", value);
                self.level.set_tare(value);
            }
            NodeCommand::SetFullScale(value) => {
                if value == 0.0 {
                    warn!("Full scale set to zero; percentages frozen until changed");
                }
                self.level.set_full_scale(value);
            }
            NodeCommand::SetCalibrated(flag) => {
                self.update_calibrated(flag, sink);
            }
            NodeCommand::SaveCalibration => {
                let cal = self.level.calibration();
                let stored = StoredCalibration {
                    tare: cal.tare,
                    full_scale: cal.full_scale,
                };
                match store.save(&stored) {
                    Ok(()) => {
                        info!("Calibration saved");
                        sink.emit(&NodeEvent::CalibrationSaved);
                    }
                    Err(e) => {
                        warn!("Calibration save failed: {}", e);
                        sink.emit(&NodeEvent::CalibrationSaveFailed(e));
                        return Err(e.into());
                    }
                }
            }
            NodeCommand::ForgetCalibration => {
                store.clear().inspect_err(|e| {
                    warn!("Calibration erase failed: {}", e);
                })?;
                info!("Stored calibration erased");
                sink.emit(&NodeEvent::CalibrationForgotten);
            }
            NodeCommand::AcknowledgeAlarm => {
                if self.alarm_active() {
                    self.alarm_acknowledged = true;
                    indicators.set_water_alarm(false);
                    info!("Water alarm acknowledged");
                    sink.emit(&NodeEvent::AlarmAcknowledged);
                }
            }
            NodeCommand::Reset => {
                let was_calibrated = self.level.is_calibrated();
                self.level.initialize();
                self.was_low = false;
                self.alarm_acknowledged = false;
                indicators.all_off();
                info!("Reader reset to defaults");
                if was_calibrated {
                    sink.emit(&NodeEvent::CalibrationChanged(false));
                }
            }
        }
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot from the latest reading.
    pub fn build_telemetry(&self) -> ReadingTelemetry {
        let reading = self.level.reading();
        ReadingTelemetry {
            tick: self.tick_count,
            net_weight: reading.net_weight,
            remaining_percent: reading.remaining_percent,
            is_low: reading.is_low,
            calibrated: self.level.is_calibrated(),
        }
    }

    pub fn reading(&self) -> &ReadingState {
        self.level.reading()
    }

    pub fn calibration(&self) -> &CalibrationState {
        self.level.calibration()
    }

    /// Read cycles executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Water is low, nobody has silenced the alarm, and the reader is
    /// calibrated. The low flag is frozen while uncalibrated, so it cannot
    /// drive the alarm during a recalibration.
    pub fn alarm_active(&self) -> bool {
        self.was_low && !self.alarm_acknowledged && self.level.is_calibrated()
    }

    /// Direct access to the reader (tests, diagnostics).
    pub fn level_mut(&mut self) -> &mut WaterLevel<S> {
        &mut self.level
    }

    // ── Internal ──────────────────────────────────────────────

    fn update_calibrated(&mut self, flag: bool, sink: &mut impl EventSink) {
        if self.level.is_calibrated() != flag {
            self.level.set_calibrated(flag);
            sink.emit(&NodeEvent::CalibrationChanged(flag));
        }
    }
}
