/*!
 * Traffic Sonifier - Main Entry Point
 *
 * Listens on a network interface and drives a synthesis backend:
 * - Capture thread counting frames per hardware address
 * - Report loop mapping traffic rates to instrument levels
 * - Reset loop restarting measurement windows
 * - Control listener for live tick-period changes
 * - Status line feed for viewers
 */

use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use traffic_sonifier::capture::PacketSocketSource;
use traffic_sonifier::emit::{bind_status_feed, serve_status_feed};
use traffic_sonifier::{
    init_tracing, ActivityStore, CaptureWorker, Cli, Config, ControlListener, DelayCell, Emitter,
    FrameIngestor, LevelEngine, Shutdown, SonifierError, SonifierStats, StatusBroadcaster,
    TickScheduler, UdpControlSink,
};

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    // Initialize structured tracing
    init_tracing();

    let config = Config::from_cli(&cli)?;
    info!("Traffic sonifier starting...");
    info!(
        device = %config.device,
        backend = %format!("{}:{}", config.server_host, config.server_port),
        instruments = config.catalog.len(),
        promiscuous = config.promiscuous,
        "configuration loaded"
    );

    // Capture source first: nothing to do without it
    let source = PacketSocketSource::open(&config.device, config.promiscuous)?;
    let mut ignored = config.ignore_hosts.clone();
    if !config.include_self {
        if let Some(own) = source.hardware_address() {
            info!(host = %own, "ignoring interface's own traffic");
            ignored.push(own);
        }
    }

    let stats = Arc::new(SonifierStats::new());
    let store = Arc::new(ActivityStore::new());
    let catalog = Arc::new(config.catalog.clone());
    for (slot, instrument) in catalog.iter() {
        info!(slot, name = %instrument.name, class = instrument.class.as_str(), "instrument");
    }
    let engine = Arc::new(LevelEngine::new(store.clone(), catalog, stats.clone()));

    let control_sink =
        Arc::new(UdpControlSink::connect(&config.server_host, config.server_port).await?);
    let broadcaster = StatusBroadcaster::new();
    let emitter = Emitter::new(
        control_sink,
        Arc::new(broadcaster.clone()),
        stats.clone(),
    );

    let shutdown = Shutdown::new();

    let status_listener = bind_status_feed(config.status_addr).await?;
    let status_task = tokio::spawn(serve_status_feed(
        status_listener,
        broadcaster,
        shutdown.listener(),
    ));

    let delays = Arc::new(DelayCell::new(config.report_delay_ms)?);
    let scheduler = TickScheduler::spawn(engine, emitter, delays.clone());

    let control = ControlListener::bind(config.control_addr).await?;
    let control_task = tokio::spawn(control.run(delays, stats.clone(), shutdown.listener()));

    let ingestor = FrameIngestor::new(store, stats.clone()).with_ignored(ignored);
    let worker = CaptureWorker::spawn(source, ingestor).map_err(SonifierError::from)?;

    info!("Sonifier running - press Ctrl+C to exit");

    let mut watchdog = tokio::time::interval(Duration::from_secs(1));
    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    warn!(error = %e, "Ctrl+C handler failed");
                }
                info!("Shutdown requested");
                break;
            }
            _ = watchdog.tick() => {
                if worker.is_finished() {
                    warn!("Capture worker exited");
                    break;
                }
            }
        }
    }

    // Stop ingestion first, then let in-flight ticks complete
    let capture_result = tokio::task::spawn_blocking(move || worker.stop())
        .await
        .unwrap_or_else(|e| {
            error!(error = %e, "capture worker join failed");
            Ok(())
        });
    scheduler.shutdown().await;
    shutdown.trigger();
    for task in [status_task, control_task] {
        if let Err(e) = task.await {
            warn!(error = %e, "listener task ended abnormally");
        }
    }

    let snapshot = stats.snapshot();
    info!(
        frames_seen = snapshot.frames_seen,
        frames_skipped = snapshot.frames_skipped,
        hosts_created = snapshot.hosts_created,
        hosts_evicted = snapshot.hosts_evicted,
        report_ticks = snapshot.report_ticks,
        reset_ticks = snapshot.reset_ticks,
        emissions = snapshot.emissions,
        emit_failures = snapshot.emit_failures,
        control_updates = snapshot.control_updates,
        "Sonifier stopped"
    );

    capture_result?;
    Ok(())
}
