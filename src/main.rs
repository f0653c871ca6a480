//! ec-fand — main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  DevPort        ThermalZone        TelemetryPrinter          │
//! │  (PortIo)       (TemperatureSource) (EventSink)              │
//! │  JsonFileConfig ShutdownSignals                              │
//! │  (ConfigPort)   (SIGINT/SIGTERM → CancellationToken)         │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │  FanService  ──▶  EmbeddedController (EC protocol) │      │
//! │  └────────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use anyhow::{Context, Result};
use log::info;
use tokio_util::sync::CancellationToken;

use ec_fand::adapters::json_config::JsonFileConfig;
use ec_fand::adapters::signals::ShutdownSignals;
use ec_fand::adapters::telemetry_sink::TelemetryPrinter;
use ec_fand::app::ports::ConfigPort;
use ec_fand::app::service::FanService;
use ec_fand::drivers::dev_port::DevPort;
use ec_fand::ec::EmbeddedController;
use ec_fand::logging;
use ec_fand::sensors::ThermalZone;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    logging::init();
    info!("ec-fand v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Platform configuration ─────────────────────────────
    let config = JsonFileConfig::from_env()
        .load()
        .context("loading configuration")?;

    // ── 3. Privileged port access (fatal if denied) ───────────
    let io = DevPort::acquire(&config.ports).with_context(|| {
        format!(
            "acquiring EC ports 0x{:02x}/0x{:02x} (needs root or CAP_SYS_RAWIO)",
            config.ports.command, config.ports.data
        )
    })?;

    // ── 4. Shutdown wiring ────────────────────────────────────
    // The signal task only cancels the token.  All EC traffic stays on
    // this future, which the runtime drives on the main thread.
    let shutdown = CancellationToken::new();
    let signals = ShutdownSignals::install().context("installing signal handlers")?;
    tokio::spawn(signals.cancel_on_signal(shutdown.clone()));

    // ── 5. Construct adapters and service ─────────────────────
    let mut ec =
        EmbeddedController::new(io, config.ports, config.wait).with_shutdown(shutdown.clone());
    let mut sensor = ThermalZone::new(config.sensor_path.clone());
    let mut sink = TelemetryPrinter::stdout();
    let mut service = FanService::new(&config);

    info!(
        "Manual mode 0x{:02x} -> reg 0x{:02x}, duty reg 0x{:02x}, tach regs 0x{:02x}/0x{:02x}, wait {:?}",
        config.manual_mode_value,
        config.registers.fan_mode,
        config.registers.fan_duty,
        config.registers.tach_high,
        config.registers.tach_low,
        config.wait,
    );

    // ── 6. Control loop ───────────────────────────────────────
    service
        .run(&mut ec, &mut sensor, &mut sink, &shutdown)
        .await
        .context("fan control loop")?;

    info!("Exiting.");
    Ok(())
}
