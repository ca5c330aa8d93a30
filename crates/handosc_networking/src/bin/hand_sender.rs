//! # Hand Sender
//!
//! Synthetic hand-tracking source for exercising a receiver without a
//! tracking rig. Both hands orbit the origin and spin about Y.
//!
//! ## Usage
//!
//! ```bash
//! hand_sender --target 127.0.0.1:12345 --rate 100 --duration 10
//! hand_sender --bundle --noise
//! ```

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use clap::Parser;
use handosc_core::Hand;
use handosc_networking::{
    InboundMessage, NetworkResult, OscArg, OscEncoder, UdpTransport, DEFAULT_PORT,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "hand_sender", version, about = "Streams synthetic OSC hand poses over UDP")]
struct Args {
    /// Receiver address
    #[arg(short, long, default_value_t = SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)))]
    target: SocketAddr,

    /// Frames per second (each frame updates both hands)
    #[arg(short, long, default_value_t = 100)]
    rate: u32,

    /// Stop after this many seconds
    #[arg(short, long)]
    duration: Option<u64>,

    /// Pack each frame into a single OSC bundle
    #[arg(long)]
    bundle: bool,

    /// Also send a message no route handles, to exercise the fallback path
    #[arg(long)]
    noise: bool,

    /// Log filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    run(&args)?;
    Ok(())
}

fn run(args: &Args) -> NetworkResult<()> {
    let mut transport = UdpTransport::bind(SocketAddr::from(([0, 0, 0, 0], 0)))?;
    let mut encoder = OscEncoder::new();
    let frame_time = Duration::from_secs_f64(1.0 / f64::from(args.rate.max(1)));
    let deadline = args.duration.map(|s| Instant::now() + Duration::from_secs(s));
    let started = Instant::now();
    let mut frames: u64 = 0;

    tracing::info!(
        "sending to {} at {} Hz{}",
        args.target,
        args.rate,
        if args.bundle { " (bundled)" } else { "" }
    );

    while deadline.map_or(true, |d| Instant::now() < d) {
        let frame_start = Instant::now();
        let messages = frame(started.elapsed().as_secs_f32(), args.noise);

        if args.bundle {
            transport.send_to(encoder.encode_bundle(&messages), args.target)?;
        } else {
            for msg in &messages {
                transport.send_to(encoder.encode_message(msg), args.target)?;
            }
        }

        frames += 1;
        if frames % u64::from(args.rate.max(1)) == 0 {
            tracing::debug!("{} frames sent", frames);
        }

        if let Some(rest) = frame_time.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    let stats = transport.stats();
    tracing::info!(
        "done: {} frames, {} datagrams, {} bytes, {} send errors",
        frames,
        stats.packets_sent,
        stats.bytes_sent,
        stats.send_errors
    );
    Ok(())
}

/// One frame of synthetic poses for both hands at time `t` seconds.
fn frame(t: f32, noise: bool) -> Vec<InboundMessage> {
    let mut messages = Vec::with_capacity(5);

    for hand in Hand::ALL {
        let phase = match hand {
            Hand::Left => 0.0,
            Hand::Right => std::f32::consts::PI,
        };
        let a = t + phase;
        let (half_sin, half_cos) = (a * 0.5).sin_cos();

        messages.push(InboundMessage::floats(
            format!("/hand/{}/position", hand.as_str()),
            &[a.cos() * 0.3, 0.1 * (2.0 * t).sin(), a.sin() * 0.3],
        ));
        // (w, x, y, z): rotation by `a` about Y.
        messages.push(InboundMessage::floats(
            format!("/hand/{}/orientation", hand.as_str()),
            &[half_cos, 0.0, half_sin, 0.0],
        ));
    }

    if noise {
        messages.push(InboundMessage::new(
            "/hand/left/pinch",
            vec![OscArg::Float32((t.sin() + 1.0) * 0.5), OscArg::String("index".into())],
        ));
    }

    messages
}
