//! # Hand Receiver
//!
//! Headless two-hand pose receiver. Drains OSC messages once per frame,
//! updates the pose store and "draws" both hand markers to the log.
//!
//! ## Usage
//!
//! ```bash
//! hand_receiver --port 12345 --tick-rate 60
//! hand_receiver --config handosc.toml --threaded --duration 30
//! RUST_LOG=handosc::fallback=off hand_receiver
//! ```

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use handosc::{HandTracker, LogTarget, RenderAdapter, TrackerConfig};
use handosc_core::Hand;
use handosc_networking::{
    DrainReport, FramePacer, InboundMessage, MessageSource, OscReceiver, ReceiverStats,
    ReceiverThread,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "hand_receiver", version, about = "Receives OSC hand poses over UDP")]
struct Cli {
    /// TOML config file; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// UDP port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Ticks per second
    #[arg(short, long)]
    tick_rate: Option<u32>,

    /// Receive on a dedicated I/O thread
    #[arg(long)]
    threaded: bool,

    /// Stop after this many seconds
    #[arg(short, long)]
    duration: Option<u64>,

    /// Log filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Whichever receiver the config selected.
enum Inbox {
    Polled(OscReceiver),
    Threaded(ReceiverThread),
}

impl Inbox {
    fn open(config: &TrackerConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let addr = config.socket_addr()?;
        Ok(if config.threaded {
            Self::Threaded(ReceiverThread::spawn(addr, config.channel_capacity)?)
        } else {
            Self::Polled(OscReceiver::bind(addr, config.max_datagrams_per_tick)?)
        })
    }

    fn stats(&self) -> ReceiverStats {
        match self {
            Self::Polled(rx) => *rx.stats(),
            Self::Threaded(rx) => rx.stats(),
        }
    }
}

impl MessageSource for Inbox {
    fn poll_pending(&mut self) -> usize {
        match self {
            Self::Polled(rx) => rx.poll_pending(),
            Self::Threaded(rx) => rx.poll_pending(),
        }
    }

    fn next_message(&mut self) -> Option<InboundMessage> {
        match self {
            Self::Polled(rx) => rx.next_message(),
            Self::Threaded(rx) => rx.next_message(),
        }
    }
}

fn load_config(cli: &Cli) -> Result<TrackerConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => TrackerConfig::load(path)?,
        None => TrackerConfig::default(),
    };
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(rate) = cli.tick_rate {
        config.tick_rate = rate;
    }
    config.threaded |= cli.threaded;
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let config = load_config(&cli)?;

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         HANDOSC HAND RECEIVER                                    ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();
    println!("┌─ CONFIGURATION ─────────────────────────────────────────────────┐");
    println!("│ Bind Address:       {}", config.socket_addr()?);
    println!("│ Tick Rate:          {} Hz", config.tick_rate);
    println!("│ Receiver:           {}", if config.threaded { "threaded" } else { "polled" });
    match cli.duration {
        Some(d) => println!("│ Duration:           {d} seconds"),
        None => println!("│ Duration:           infinite"),
    }
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    let mut inbox = Inbox::open(&config)?;
    let mut tracker = HandTracker::new();
    let adapter = RenderAdapter::new(config.hand_mesh_scale);
    let mut target = LogTarget::default();
    let mut pacer = FramePacer::new(config.tick_rate);

    let start = Instant::now();
    let deadline = cli.duration.map(Duration::from_secs);
    let stats_interval = u64::from(config.tick_rate) * 5;
    let mut interval_report = DrainReport::default();

    while deadline.map_or(true, |d| start.elapsed() < d) {
        let report = pacer.pace(|_| {
            let report = tracker.update(&mut inbox);
            adapter.render(&tracker.snapshot(), &mut target);
            report
        });
        interval_report.merge(&report);

        let stats = *pacer.stats();
        if stats.frames % stats_interval == 0 {
            tracing::info!(
                "frame {}: {} msgs ({} applied, {} malformed, {} unrecognized), worst frame {:?}, {} overruns, {} skipped",
                stats.frames,
                interval_report.drained,
                interval_report.applied(),
                interval_report.malformed,
                interval_report.unrecognized,
                stats.worst_frame,
                stats.overruns,
                stats.skipped
            );
            let snapshot = tracker.snapshot();
            for hand in Hand::ALL {
                let pose = snapshot.get(hand);
                tracing::info!("  {} hand at {:?} rot {:?}", hand, pose.position, pose.orientation);
            }
            interval_report = DrainReport::default();
        }
    }

    if let Inbox::Threaded(rx) = &mut inbox {
        rx.shutdown();
    }

    let frame_stats = pacer.stats();
    let rx_stats = inbox.stats();
    let totals = tracker.totals();
    println!();
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║                    RECEIVER SHUTDOWN                             ║");
    println!("╠══════════════════════════════════════════════════════════════════╣");
    println!("║ Frames:             {:>10}", frame_stats.frames);
    println!("║ Worst Frame:        {:>10} μs", frame_stats.worst_frame.as_micros());
    println!("║ Overruns:           {:>10}", frame_stats.overruns);
    println!("║ Skipped Frames:     {:>10}", frame_stats.skipped);
    println!("║ Datagrams:          {:>10}", rx_stats.datagrams);
    println!("║ Decode Errors:      {:>10}", rx_stats.decode_errors);
    println!("║ Dropped:            {:>10}", rx_stats.dropped);
    println!("║ Messages Routed:    {:>10}", totals.drained);
    println!("║ Poses Applied:      {:>10}", totals.applied());
    println!("║ Malformed:          {:>10}", totals.malformed);
    println!("║ Unrecognized:       {:>10}", totals.unrecognized);
    println!("║ Draw Calls:         {:>10}", target.draw_calls());
    println!("╚══════════════════════════════════════════════════════════════════╝");

    Ok(())
}
