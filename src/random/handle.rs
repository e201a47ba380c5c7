//! Per-consumer draw API over the packet buffers.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::trace;

use super::service::{box_muller, fill_uniform, RandomService, ServiceCore};

/// Seed offset separating consumer fallback streams from all producers.
const FALLBACK_SEED_OFFSET: u64 = 0x0010_0000;

/// Cursor over the current packet of one sample kind.
struct Cursor {
    packet: Vec<f64>,
    pos: usize,
}

impl Cursor {
    fn empty() -> Self {
        Self {
            packet: Vec::new(),
            pos: 0,
        }
    }
}

/// A consumer's view of the random service.
///
/// A handle is intended to be used from a single thread; every consumer
/// takes its own. Creating one is cheap (two empty cursors and a seeded
/// fallback generator), and [`RandomHandle::default`] attaches to the
/// process-wide service — which is how deserialized objects re-acquire a
/// random source.
///
/// # Usage
///
/// ```
/// use evoparam::random::RandomHandle;
///
/// let mut rng = RandomHandle::default();
/// let step = rng.gauss(0.0, 0.1);
/// let coin = rng.bool_with_prob(0.25);
/// let index = rng.int_in(0, 10);
/// assert!((0..10).contains(&index));
/// let _ = (step, coin);
/// ```
pub struct RandomHandle {
    core: Arc<ServiceCore>,
    uniform: Cursor,
    gauss: Cursor,
    fallback: ChaCha8Rng,
}

impl RandomHandle {
    pub(crate) fn attach(core: Arc<ServiceCore>) -> Self {
        let stream = core.fallback_streams.fetch_add(1, Ordering::Relaxed);
        let seed = core
            .base_seed
            .wrapping_add(FALLBACK_SEED_OFFSET)
            .wrapping_add(stream);
        Self {
            fallback: ChaCha8Rng::seed_from_u64(seed),
            uniform: Cursor::empty(),
            gauss: Cursor::empty(),
            core,
        }
    }

    /// Uniform draw from `[0, 1)`.
    pub fn even01(&mut self) -> f64 {
        if self.uniform.pos >= self.uniform.packet.len() {
            self.uniform.packet = self.acquire_uniform();
            self.uniform.pos = 0;
        }
        let v = self.uniform.packet[self.uniform.pos];
        self.uniform.pos += 1;
        v
    }

    /// Uniform draw from `[lo, hi)`.
    pub fn even(&mut self, lo: f64, hi: f64) -> f64 {
        debug_assert!(lo <= hi, "even({lo}, {hi}): lo must not exceed hi");
        lo + self.even01() * (hi - lo)
    }

    /// Standard-normal draw.
    pub fn gauss_std(&mut self) -> f64 {
        if self.gauss.pos >= self.gauss.packet.len() {
            self.gauss.packet = self.acquire_gauss();
            self.gauss.pos = 0;
        }
        let v = self.gauss.packet[self.gauss.pos];
        self.gauss.pos += 1;
        v
    }

    /// Normal draw with the given mean and standard deviation.
    pub fn gauss(&mut self, mean: f64, sigma: f64) -> f64 {
        mean + sigma * self.gauss_std()
    }

    /// Biased coin.
    ///
    /// # Panics
    /// Panics unless `p` lies in `[0, 1]`.
    pub fn bool_with_prob(&mut self, p: f64) -> bool {
        assert!(
            (0.0..=1.0).contains(&p),
            "bool_with_prob({p}): probability must lie in [0, 1]"
        );
        self.even01() < p
    }

    /// Fair coin.
    pub fn coin(&mut self) -> bool {
        self.even01() < 0.5
    }

    /// Uniform integer from `[lo, hi_exclusive)`.
    ///
    /// # Panics
    /// Panics unless `lo < hi_exclusive`.
    pub fn int_in(&mut self, lo: i32, hi_exclusive: i32) -> i32 {
        assert!(
            lo < hi_exclusive,
            "int_in({lo}, {hi_exclusive}): empty range"
        );
        let span = (hi_exclusive as i64 - lo as i64) as f64;
        let offset = (span * self.even01()) as i64;
        // even01() < 1, but guard the last representable step anyway.
        let offset = offset.min(hi_exclusive as i64 - lo as i64 - 1);
        (lo as i64 + offset) as i32
    }

    /// Random ASCII character; `printable` restricts to space..`~`.
    pub fn ascii(&mut self, printable: bool) -> char {
        let code = if printable {
            self.int_in(32, 127)
        } else {
            self.int_in(0, 128)
        };
        code as u8 as char
    }

    fn acquire_uniform(&mut self) -> Vec<f64> {
        match self.core.uniform_rx.recv_timeout(self.core.acquire_timeout) {
            Ok(packet) => packet,
            Err(_) => {
                trace!("uniform buffer dry, generating a packet locally");
                fill_uniform(&mut self.fallback, self.core.packet_size)
            }
        }
    }

    fn acquire_gauss(&mut self) -> Vec<f64> {
        match self.core.gauss_rx.recv_timeout(self.core.acquire_timeout) {
            Ok(packet) => packet,
            Err(_) => {
                trace!("gauss buffer dry, generating a packet locally");
                let u1 = fill_uniform(&mut self.fallback, self.core.packet_size);
                let u2 = fill_uniform(&mut self.fallback, self.core.packet_size);
                let (z0, _) = box_muller(&u1, &u2);
                z0
            }
        }
    }
}

impl Default for RandomHandle {
    /// Attaches to the process-wide service.
    fn default() -> Self {
        RandomService::global().handle()
    }
}

impl Clone for RandomHandle {
    /// A fresh handle on the same service. Cursors and the fallback
    /// stream are not carried over; the clone draws its own packets.
    fn clone(&self) -> Self {
        Self::attach(Arc::clone(&self.core))
    }
}

impl std::fmt::Debug for RandomHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomHandle")
            .field("uniform_pos", &self.uniform.pos)
            .field("gauss_pos", &self.gauss.pos)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::RandomConfig;
    use std::time::Duration;

    fn seeded_handle() -> RandomHandle {
        // Leaked on purpose: keeps the producers alive for the whole test.
        let service = Box::leak(Box::new(
            RandomService::start(
                RandomConfig::default()
                    .with_producers(1, 1)
                    .with_packet_size(64)
                    .with_buffer_capacity(2)
                    .with_acquire_timeout(Duration::from_millis(50))
                    .with_seed(1234),
            )
            .unwrap(),
        ));
        service.handle()
    }

    #[test]
    fn test_even_range() {
        let mut rng = seeded_handle();
        for _ in 0..500 {
            let v = rng.even(-2.5, 4.0);
            assert!((-2.5..4.0).contains(&v), "even out of range: {v}");
        }
    }

    #[test]
    fn test_bool_with_prob_extremes() {
        let mut rng = seeded_handle();
        for _ in 0..200 {
            assert!(!rng.bool_with_prob(0.0));
            assert!(rng.bool_with_prob(1.0));
        }
    }

    #[test]
    #[should_panic(expected = "probability must lie in [0, 1]")]
    fn test_bool_with_prob_rejects_out_of_range() {
        let mut rng = seeded_handle();
        rng.bool_with_prob(1.5);
    }

    #[test]
    fn test_int_in_covers_range() {
        let mut rng = seeded_handle();
        let mut seen = [false; 5];
        for _ in 0..500 {
            let v = rng.int_in(10, 15);
            assert!((10..15).contains(&v));
            seen[(v - 10) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s), "all values should appear: {seen:?}");
    }

    #[test]
    fn test_int_in_single_value_range() {
        let mut rng = seeded_handle();
        for _ in 0..50 {
            assert_eq!(rng.int_in(3, 4), 3);
        }
    }

    #[test]
    fn test_ascii_printable() {
        let mut rng = seeded_handle();
        for _ in 0..300 {
            let c = rng.ascii(true);
            assert!((' '..='~').contains(&c), "not printable: {c:?}");
        }
    }

    #[test]
    fn test_gauss_scaling() {
        let mut rng = seeded_handle();
        let n = 20_000;
        let samples: Vec<f64> = (0..n).map(|_| rng.gauss(5.0, 2.0)).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n as f64;
        assert!((mean - 5.0).abs() < 0.1, "mean was {mean}");
        assert!((var - 4.0).abs() < 0.25, "variance was {var}");
    }

    #[test]
    fn test_clone_is_independent() {
        let rng = seeded_handle();
        let mut a = rng.clone();
        let mut b = rng.clone();
        // Both clones draw valid samples without coordinating.
        for _ in 0..100 {
            assert!((0.0..1.0).contains(&a.even01()));
            assert!((0.0..1.0).contains(&b.even01()));
        }
    }
}
