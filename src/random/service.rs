//! The packet-producing service and its worker threads.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crossbeam_channel::{bounded, Receiver, SendTimeoutError, Sender};
use lazy_static::lazy_static;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use super::config::RandomConfig;
use super::handle::RandomHandle;
use crate::error::Result;

/// How long a producer waits for buffer space before re-checking the
/// interruption flag.
const PUT_WAIT: Duration = Duration::from_millis(10);

/// Seed offset separating gaussian producer streams from uniform ones.
const GAUSS_SEED_OFFSET: u64 = 0x1000;

lazy_static! {
    static ref GLOBAL: RandomService = RandomService::start(RandomConfig::default())
        .expect("default random service configuration is valid");
}

/// State shared between the service and its consumer handles.
pub(crate) struct ServiceCore {
    pub(crate) uniform_rx: Receiver<Vec<f64>>,
    pub(crate) gauss_rx: Receiver<Vec<f64>>,
    pub(crate) packet_size: usize,
    pub(crate) acquire_timeout: Duration,
    pub(crate) base_seed: u64,
    /// Next stream id for consumer fallback generators.
    pub(crate) fallback_streams: AtomicU64,
    stop: Arc<AtomicBool>,
}

/// Multi-producer random-number service.
///
/// Owns the producer threads and the bounded packet buffers. Consumers
/// draw through [`RandomHandle`]s obtained from [`handle`](Self::handle).
///
/// Dropping the service interrupts all producers at a packet boundary and
/// joins them; handles that outlive the service fall back to local
/// generation.
///
/// # Usage
///
/// ```
/// use evoparam::random::{RandomConfig, RandomService};
///
/// let service = RandomService::start(RandomConfig::default().with_seed(42)).unwrap();
/// let mut rng = service.handle();
/// let u = rng.even01();
/// assert!((0.0..1.0).contains(&u));
/// service.shutdown();
/// ```
pub struct RandomService {
    core: Arc<ServiceCore>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl RandomService {
    /// Validates `config` and starts the producer threads.
    ///
    /// # Panics
    /// Panics if the operating system refuses to spawn a worker thread;
    /// a random service that cannot produce randomness is fatal to the
    /// optimization it serves.
    pub fn start(config: RandomConfig) -> Result<Self> {
        config.validate()?;

        let base_seed = config.seed.unwrap_or_else(wall_clock_seed);
        let stop = Arc::new(AtomicBool::new(false));
        let (uniform_tx, uniform_rx) = bounded::<Vec<f64>>(config.buffer_capacity);
        let (gauss_tx, gauss_rx) = bounded::<Vec<f64>>(config.buffer_capacity);

        let mut workers = Vec::with_capacity(config.n_uniform_producers + config.n_gauss_producers);

        for i in 0..config.n_uniform_producers {
            let tx = uniform_tx.clone();
            let stop = Arc::clone(&stop);
            let packet_size = config.packet_size;
            let seed = base_seed.wrapping_add(i as u64);
            let handle = std::thread::Builder::new()
                .name(format!("evoparam-uniform-{i}"))
                .spawn(move || uniform_producer(seed, packet_size, tx, stop))
                .expect("failed to spawn uniform producer thread");
            workers.push(handle);
        }

        for i in 0..config.n_gauss_producers {
            let tx = gauss_tx.clone();
            let uniforms = uniform_rx.clone();
            let stop = Arc::clone(&stop);
            let packet_size = config.packet_size;
            let timeout = config.acquire_timeout;
            let seed = base_seed.wrapping_add(GAUSS_SEED_OFFSET + i as u64);
            let handle = std::thread::Builder::new()
                .name(format!("evoparam-gauss-{i}"))
                .spawn(move || gauss_producer(seed, packet_size, timeout, uniforms, tx, stop))
                .expect("failed to spawn gauss producer thread");
            workers.push(handle);
        }

        debug!(
            n_uniform = config.n_uniform_producers,
            n_gauss = config.n_gauss_producers,
            packet_size = config.packet_size,
            "random service started"
        );

        Ok(Self {
            core: Arc::new(ServiceCore {
                uniform_rx,
                gauss_rx,
                packet_size: config.packet_size,
                acquire_timeout: config.acquire_timeout,
                base_seed,
                fallback_streams: AtomicU64::new(0),
                stop,
            }),
            workers: Mutex::new(workers),
        })
    }

    /// The lazily-started process-wide service.
    ///
    /// Started with [`RandomConfig::default`] on first use and kept alive
    /// for the life of the process.
    pub fn global() -> &'static RandomService {
        &GLOBAL
    }

    /// Creates a consumer handle attached to this service.
    pub fn handle(&self) -> RandomHandle {
        RandomHandle::attach(Arc::clone(&self.core))
    }

    /// Interrupts all producers and joins them. Idempotent.
    pub fn shutdown(&self) {
        if self.core.stop.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Ok(mut workers) = self.workers.lock() {
            for worker in workers.drain(..) {
                let _ = worker.join();
            }
        }
        debug!("random service stopped");
    }
}

impl Drop for RandomService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for RandomService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomService")
            .field("packet_size", &self.core.packet_size)
            .field("stopped", &self.core.stop.load(Ordering::Relaxed))
            .finish()
    }
}

/// Seed derived from wall-clock time at service startup.
fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Fills a packet with uniform `[0, 1)` samples.
pub(crate) fn fill_uniform(rng: &mut ChaCha8Rng, n: usize) -> Vec<f64> {
    (0..n).map(|_| rng.random::<f64>()).collect()
}

/// Box–Muller transform: two uniform packets in, two standard-normal
/// packets out. The shorter input length wins.
pub(crate) fn box_muller(u1: &[f64], u2: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = u1.len().min(u2.len());
    let mut z0 = Vec::with_capacity(n);
    let mut z1 = Vec::with_capacity(n);
    for i in 0..n {
        // 1 - u maps [0, 1) onto (0, 1], keeping the logarithm finite.
        let radius = (-2.0 * (1.0 - u1[i]).ln()).sqrt();
        let theta = 2.0 * std::f64::consts::PI * u2[i];
        z0.push(radius * theta.cos());
        z1.push(radius * theta.sin());
    }
    (z0, z1)
}

/// Blocking send that re-checks the interruption flag every [`PUT_WAIT`].
/// Returns `false` when the producer should exit.
fn send_packet(tx: &Sender<Vec<f64>>, stop: &AtomicBool, packet: Vec<f64>) -> bool {
    let mut pending = packet;
    loop {
        if stop.load(Ordering::Relaxed) {
            return false;
        }
        match tx.send_timeout(pending, PUT_WAIT) {
            Ok(()) => return true,
            Err(SendTimeoutError::Timeout(p)) => pending = p,
            Err(SendTimeoutError::Disconnected(_)) => return false,
        }
    }
}

fn uniform_producer(seed: u64, packet_size: usize, tx: Sender<Vec<f64>>, stop: Arc<AtomicBool>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    while !stop.load(Ordering::Relaxed) {
        let packet = fill_uniform(&mut rng, packet_size);
        if !send_packet(&tx, &stop, packet) {
            break;
        }
    }
}

fn gauss_producer(
    seed: u64,
    packet_size: usize,
    timeout: Duration,
    uniforms: Receiver<Vec<f64>>,
    tx: Sender<Vec<f64>>,
    stop: Arc<AtomicBool>,
) {
    // Local source for the case where the uniform buffer stays dry.
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    while !stop.load(Ordering::Relaxed) {
        let u1 = uniforms
            .recv_timeout(timeout)
            .unwrap_or_else(|_| fill_uniform(&mut rng, packet_size));
        let u2 = uniforms
            .recv_timeout(timeout)
            .unwrap_or_else(|_| fill_uniform(&mut rng, packet_size));
        let (z0, z1) = box_muller(&u1, &u2);
        if !send_packet(&tx, &stop, z0) {
            break;
        }
        if !send_packet(&tx, &stop, z1) {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> RandomConfig {
        RandomConfig::default()
            .with_producers(1, 1)
            .with_packet_size(128)
            .with_buffer_capacity(2)
            .with_acquire_timeout(Duration::from_millis(50))
            .with_seed(42)
    }

    #[test]
    fn test_start_and_shutdown() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let service = RandomService::start(test_config()).unwrap();
        let mut rng = service.handle();
        for _ in 0..1000 {
            let u = rng.even01();
            assert!((0.0..1.0).contains(&u), "uniform out of range: {u}");
        }
        service.shutdown();
        // Idempotent.
        service.shutdown();
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(RandomService::start(test_config().with_packet_size(0)).is_err());
    }

    #[test]
    fn test_handles_survive_shutdown() {
        let service = RandomService::start(test_config()).unwrap();
        let mut rng = service.handle();
        service.shutdown();
        // Buffers drain, then the handle switches to local generation.
        for _ in 0..1000 {
            let u = rng.even01();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_multiple_consumers() {
        let service = RandomService::start(test_config()).unwrap();
        let mut handles: Vec<_> = (0..4).map(|_| service.handle()).collect();
        for rng in handles.iter_mut() {
            for _ in 0..300 {
                let g = rng.gauss(0.0, 1.0);
                assert!(g.is_finite());
            }
        }
    }

    #[test]
    fn test_box_muller_statistics() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let u1 = fill_uniform(&mut rng, 20_000);
        let u2 = fill_uniform(&mut rng, 20_000);
        let (z0, z1) = box_muller(&u1, &u2);

        let all: Vec<f64> = z0.iter().chain(z1.iter()).copied().collect();
        let n = all.len() as f64;
        let mean = all.iter().sum::<f64>() / n;
        let var = all.iter().map(|z| (z - mean) * (z - mean)).sum::<f64>() / n;

        assert!(mean.abs() < 0.05, "standard normal mean was {mean}");
        assert!((var - 1.0).abs() < 0.05, "standard normal variance was {var}");
    }

    #[test]
    fn test_global_service_is_reachable() {
        let mut rng = RandomService::global().handle();
        let u = rng.even01();
        assert!((0.0..1.0).contains(&u));
    }
}
