//! KitchenNode firmware: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  Hx711          LedIndicators   NvsCalibrationStore          │
//! │  (WeightSource) (IndicatorPort) (CalibrationStore)           │
//! │  CalibrationButtons ──▶ NodeCommand   LogEventSink           │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │            NodeService (pure logic)                    │  │
//! │  │  WaterLevel · calibration · low-water alarm            │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Result, anyhow};
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::{AnyIOPin, PinDriver, Pull};
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::systime::EspSystemTime;
use log::{info, warn};

use kitchennode::adapters::indicators::LedIndicators;
use kitchennode::adapters::log_sink::LogEventSink;
use kitchennode::adapters::nvs::NvsCalibrationStore;
use kitchennode::app::commands::NodeCommand;
use kitchennode::app::service::NodeService;
use kitchennode::config::NodeConfig;
use kitchennode::drivers::button::CalibrationButtons;
use kitchennode::pins;
use kitchennode::sensors::hx711::Hx711;

/// Main-loop pass period; bounds button latency.
const POLL_INTERVAL_MS: u32 = 10;

/// Optional provisioning document baked in at build time.
const CONFIG_JSON: Option<&str> = option_env!("KITCHENNODE_CONFIG_JSON");

fn uptime_ms() -> u32 {
    // Wraps after ~49 days; all comparisons use wrapping_sub.
    EspSystemTime.now().as_millis() as u32
}

fn gpio(num: i32) -> AnyIOPin {
    // SAFETY: every number comes from `pins`, each is claimed exactly once
    // below and `Peripherals` is never taken in this binary.
    unsafe { AnyIOPin::new(num) }
}

fn load_config() -> NodeConfig {
    match CONFIG_JSON.map(NodeConfig::from_json) {
        Some(Ok(cfg)) => {
            info!("Config loaded from build-time JSON");
            cfg
        }
        Some(Err(e)) => {
            warn!("Config rejected ({}), using defaults", e);
            NodeConfig::default()
        }
        None => NodeConfig::default(),
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("KitchenNode v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config();

    // ── 2. Load cell ──────────────────────────────────────────
    let sck = PinDriver::output(gpio(pins::HX711_SCK_GPIO))?;
    let dout = PinDriver::input(gpio(pins::HX711_DOUT_GPIO))?;
    let mut hx711 = Hx711::new(sck, dout, Ets, config.gain);
    hx711.set_scale(config.scale_factor);

    // ── 3. Adapters ───────────────────────────────────────────
    let mut leds = LedIndicators::new(
        PinDriver::output(gpio(pins::LED_ALARM_GPIO))?,
        PinDriver::output(gpio(pins::LED_TARE_GPIO))?,
        PinDriver::output(gpio(pins::LED_FULL_GPIO))?,
    );

    let mut store = NvsCalibrationStore::new(EspDefaultNvsPartition::take()?)
        .map_err(|e| anyhow!("NVS unavailable: {e}"))?;

    let mut sink = LogEventSink::new();

    let mut button_pins = [
        PinDriver::input(gpio(pins::BUTTON_TARE_GPIO))?,
        PinDriver::input(gpio(pins::BUTTON_FULL_GPIO))?,
        PinDriver::input(gpio(pins::BUTTON_SAVE_GPIO))?,
        PinDriver::input(gpio(pins::BUTTON_ALARM_RESET_GPIO))?,
    ];
    for pin in &mut button_pins {
        pin.set_pull(Pull::Up)?;
    }
    let mut buttons = CalibrationButtons::new(config.button_debounce_ms);

    // ── 4. App service ────────────────────────────────────────
    let mut app = NodeService::new(&config, hx711);
    app.start(&store, &mut leds, &mut sink);

    info!("Node ready. Reading every {} ms.", config.read_interval_ms);

    // ── 5. Main loop ──────────────────────────────────────────
    let mut last_read_ms = uptime_ms();

    loop {
        let now_ms = uptime_ms();

        let pressed = button_pins.each_ref().map(|pin| pin.is_low());
        if let Some(id) = buttons.tick(now_ms, pressed) {
            info!("Button: {:?}", id);
            if let Err(e) = app.handle_command(NodeCommand::from(id), &mut store, &mut leds, &mut sink)
            {
                warn!("Command {:?} failed: {}", id, e);
            }
        }

        if now_ms.wrapping_sub(last_read_ms) >= config.read_interval_ms {
            last_read_ms = now_ms;
            app.tick(&mut leds, &mut sink);
        }

        FreeRtos::delay_ms(POLL_INTERVAL_MS);
    }
}
