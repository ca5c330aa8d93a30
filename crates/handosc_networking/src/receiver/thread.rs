//! Dedicated I/O thread feeding a bounded channel.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use super::{ingest_datagram, ReceiverStats};
use crate::error::{NetworkError, NetworkResult};
use crate::protocol::InboundMessage;
use crate::router::MessageSource;
use crate::transport::UdpTransport;

/// How long a blocked read waits before re-checking the stop flag.
const READ_TIMEOUT: Duration = Duration::from_millis(50);

/// Counters shared between the I/O thread and its owner.
#[derive(Default)]
struct SharedCounters {
    datagrams: AtomicU64,
    messages: AtomicU64,
    decode_errors: AtomicU64,
    dropped: AtomicU64,
}

impl SharedCounters {
    fn add(&self, delta: &ReceiverStats) {
        self.datagrams.fetch_add(delta.datagrams, Ordering::Relaxed);
        self.messages.fetch_add(delta.messages, Ordering::Relaxed);
        self.decode_errors.fetch_add(delta.decode_errors, Ordering::Relaxed);
        self.dropped.fetch_add(delta.dropped, Ordering::Relaxed);
    }

    fn snapshot(&self) -> ReceiverStats {
        ReceiverStats {
            datagrams: self.datagrams.load(Ordering::Relaxed),
            messages: self.messages.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

/// Receiver that blocks on the socket in its own thread.
///
/// Decoded messages cross to the tick thread through a bounded
/// channel. When the channel is full the newest message is dropped and
/// counted; the I/O thread never blocks on the consumer.
///
/// The thread stops when [`shutdown`](Self::shutdown) is called or the
/// receiver is dropped.
pub struct ReceiverThread {
    rx: Receiver<InboundMessage>,
    stop: Arc<AtomicBool>,
    counters: Arc<SharedCounters>,
    handle: Option<JoinHandle<()>>,
    local_addr: SocketAddr,
}

impl ReceiverThread {
    /// Binds `addr` and starts the I/O thread.
    pub fn spawn(addr: SocketAddr, channel_capacity: usize) -> NetworkResult<Self> {
        let transport = UdpTransport::bind_with_timeout(addr, READ_TIMEOUT)?;
        let local_addr = transport.local_addr();
        let (tx, rx) = bounded(channel_capacity.max(1));
        let stop = Arc::new(AtomicBool::new(false));
        let counters = Arc::new(SharedCounters::default());

        let handle = {
            let stop = Arc::clone(&stop);
            let counters = Arc::clone(&counters);
            thread::Builder::new()
                .name("handosc-rx".into())
                .spawn(move || io_loop(transport, &tx, &stop, &counters))
                .map_err(NetworkError::Spawn)?
        };

        tracing::info!("receiver thread listening on {}", local_addr);

        Ok(Self {
            rx,
            stop,
            counters,
            handle: Some(handle),
            local_addr,
        })
    }

    /// Returns the bound address.
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Receiver statistics accumulated by the I/O thread.
    #[must_use]
    pub fn stats(&self) -> ReceiverStats {
        self.counters.snapshot()
    }

    /// Whether the I/O thread is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stops the I/O thread and waits for it to exit.
    ///
    /// Messages already in the channel stay drainable.
    pub fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("receiver thread panicked");
            }
        }
    }
}

impl Drop for ReceiverThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl MessageSource for ReceiverThread {
    fn poll_pending(&mut self) -> usize {
        self.rx.len()
    }

    fn next_message(&mut self) -> Option<InboundMessage> {
        self.rx.try_recv().ok()
    }
}

fn io_loop(
    mut transport: UdpTransport,
    tx: &Sender<InboundMessage>,
    stop: &AtomicBool,
    counters: &SharedCounters,
) {
    let mut decoded = Vec::with_capacity(16);

    while !stop.load(Ordering::Acquire) {
        let Some((datagram, from)) = transport.recv() else {
            continue;
        };

        let mut delta = ReceiverStats::default();
        ingest_datagram(datagram, from, &mut decoded, &mut delta);

        for message in decoded.drain(..) {
            match tx.try_send(message) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => delta.dropped += 1,
                Err(TrySendError::Disconnected(_)) => {
                    counters.add(&delta);
                    return;
                }
            }
        }

        if delta.dropped > 0 {
            tracing::debug!("receiver channel full, dropped {} messages", delta.dropped);
        }
        counters.add(&delta);
    }

    tracing::debug!("receiver thread stopping");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::encode_message;
    use std::net::UdpSocket;
    use std::time::Instant;

    fn wait_for(rx: &mut ReceiverThread, count: usize) -> usize {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            let pending = rx.poll_pending();
            if pending >= count {
                return pending;
            }
            thread::sleep(Duration::from_millis(5));
        }
        rx.poll_pending()
    }

    #[test]
    fn test_messages_cross_threads() {
        let mut rx = ReceiverThread::spawn("127.0.0.1:0".parse().unwrap(), 64).unwrap();
        let tx = UdpSocket::bind("127.0.0.1:0").unwrap();

        for i in 0..3 {
            let msg = InboundMessage::floats("/seq", &[i as f32]);
            tx.send_to(&encode_message(&msg), rx.local_addr()).unwrap();
        }

        assert_eq!(wait_for(&mut rx, 3), 3);
        for i in 0..3 {
            let msg = rx.next_message().unwrap();
            assert_eq!(msg.args[0].as_f32(), Some(i as f32));
        }
        assert!(rx.next_message().is_none());
        assert_eq!(rx.stats().messages, 3);
    }

    #[test]
    fn test_full_channel_drops_newest() {
        let mut rx = ReceiverThread::spawn("127.0.0.1:0".parse().unwrap(), 2).unwrap();
        let tx = UdpSocket::bind("127.0.0.1:0").unwrap();

        for i in 0..5 {
            let msg = InboundMessage::floats("/seq", &[i as f32]);
            tx.send_to(&encode_message(&msg), rx.local_addr()).unwrap();
        }

        let deadline = Instant::now() + Duration::from_secs(2);
        while rx.stats().datagrams < 5 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }

        assert_eq!(rx.poll_pending(), 2);
        assert_eq!(rx.stats().dropped, 3);
        assert_eq!(rx.next_message().unwrap().args[0].as_f32(), Some(0.0));
        assert_eq!(rx.next_message().unwrap().args[0].as_f32(), Some(1.0));
    }

    #[test]
    fn test_shutdown_stops_thread() {
        let mut rx = ReceiverThread::spawn("127.0.0.1:0".parse().unwrap(), 4).unwrap();
        assert!(rx.is_running());
        rx.shutdown();
        assert!(!rx.is_running());
        // Second call is a no-op.
        rx.shutdown();
    }
}
