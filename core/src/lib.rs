//! Monte-Carlo BER estimation for a cyclic-prefix OFDM link
//!
//! BPSK on every subcarrier, an optional repetition code with subcarrier
//! interleaving, and a frequency-selective Rayleigh channel with an
//! exponentially decaying power-delay profile, swept across an SNR grid.

pub mod channel;
pub mod config;
pub mod demodulator;
pub mod error;
pub mod experiment;
pub mod fading;
pub mod interleaver;
pub mod modulator;
pub mod trial;

pub use config::{CodeRate, SimConfig};
pub use error::{ConfigError, Result};
pub use experiment::{Experiment, SnrPoint, SweepReport};

// Default scenario: 128 subcarriers over a 10-tap channel.
pub const DEFAULT_NUM_SUBCARRIERS: usize = 128;
pub const DEFAULT_CHANNEL_TAPS: usize = 10;
pub const DEFAULT_POWER_DECAY_FACTOR: f64 = 3.0;
pub const DEFAULT_NUM_REALIZATIONS: usize = 5000;
