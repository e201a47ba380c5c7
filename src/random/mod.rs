//! Process-wide random-number service.
//!
//! Optimization spends a large share of its time drawing random numbers.
//! Instead of seeding a generator per object, a small pool of producer
//! threads pre-generates fixed-size *packets* of samples into bounded
//! buffers, and every consumer holds a thin [`RandomHandle`] with a cursor
//! into its current packet:
//!
//! - uniform producers fill packets with `[0, 1)` doubles,
//! - gaussian producers turn two uniform packets into standard-normal
//!   packets via the Box–Muller transform.
//!
//! # Key Types
//!
//! - [`RandomConfig`]: worker counts, packet size, buffer depth, timeout
//! - [`RandomService`]: owns the producer threads and the packet buffers
//! - [`RandomHandle`]: per-consumer draw API (`even`, `gauss`, `int_in`, ...)
//!
//! # Liveness
//!
//! A handle never stalls: when the buffers stay dry past the configured
//! timeout (startup, shutdown, or producers outpaced), it generates a
//! packet locally and carries on. Producers check an interruption flag
//! between packets, so shutdown joins promptly.
//!
//! Handles are cheap to create and are *not* shared between threads; each
//! consumer takes its own. [`RandomHandle::default`] attaches to the
//! lazily-started process-wide service, which is also how deserialized
//! objects re-acquire randomness.

mod config;
mod handle;
mod service;

pub use config::RandomConfig;
pub use handle::RandomHandle;
pub use service::RandomService;
