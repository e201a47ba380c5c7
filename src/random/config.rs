//! Random service configuration.

use std::time::Duration;

use crate::error::{Error, Result};

/// Configuration for [`RandomService`](super::RandomService).
///
/// # Defaults
///
/// ```
/// use evoparam::random::RandomConfig;
///
/// let config = RandomConfig::default();
/// assert_eq!(config.n_uniform_producers, 2);
/// assert_eq!(config.n_gauss_producers, 2);
/// assert_eq!(config.packet_size, 1000);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use std::time::Duration;
/// use evoparam::random::RandomConfig;
///
/// let config = RandomConfig::default()
///     .with_producers(1, 1)
///     .with_packet_size(256)
///     .with_acquire_timeout(Duration::from_millis(50))
///     .with_seed(42);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RandomConfig {
    /// Number of threads producing uniform `[0, 1)` packets. At least 1.
    pub n_uniform_producers: usize,

    /// Number of threads producing standard-gaussian packets. At least 1.
    pub n_gauss_producers: usize,

    /// Samples per packet. At least 1.
    pub packet_size: usize,

    /// Packets each buffer holds before producers block. At least 1.
    pub buffer_capacity: usize,

    /// How long a consumer waits for a packet before generating locally.
    pub acquire_timeout: Duration,

    /// Base seed for the producer threads (worker `i` seeds with
    /// `seed + i`). `None` derives the seed from wall-clock time at
    /// service startup.
    pub seed: Option<u64>,
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self {
            n_uniform_producers: 2,
            n_gauss_producers: 2,
            packet_size: 1000,
            buffer_capacity: 10,
            acquire_timeout: Duration::from_millis(200),
            seed: None,
        }
    }
}

impl RandomConfig {
    /// Sets the uniform and gaussian producer counts.
    pub fn with_producers(mut self, n_uniform: usize, n_gauss: usize) -> Self {
        self.n_uniform_producers = n_uniform;
        self.n_gauss_producers = n_gauss;
        self
    }

    /// Sets the number of samples per packet.
    pub fn with_packet_size(mut self, size: usize) -> Self {
        self.packet_size = size;
        self
    }

    /// Sets the buffer depth in packets.
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Sets the consumer-side acquisition timeout.
    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// Sets a fixed base seed for reproducible producer streams.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.n_uniform_producers == 0 {
            return Err(Error::InvalidConfiguration(
                "n_uniform_producers must be at least 1".into(),
            ));
        }
        if self.n_gauss_producers == 0 {
            return Err(Error::InvalidConfiguration(
                "n_gauss_producers must be at least 1".into(),
            ));
        }
        if self.packet_size == 0 {
            return Err(Error::InvalidConfiguration(
                "packet_size must be at least 1".into(),
            ));
        }
        if self.buffer_capacity == 0 {
            return Err(Error::InvalidConfiguration(
                "buffer_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
