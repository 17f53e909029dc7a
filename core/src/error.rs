use thiserror::Error;

/// Configuration validation errors.
///
/// These are the only failures the engine can produce: every parameter is
/// checked once at construction, and a validated configuration makes the
/// per-trial pipeline total.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("subcarrier count {0} is not a power of two")]
    SubcarriersNotPowerOfTwo(usize),

    #[error("channel tap count must be at least 1")]
    NoChannelTaps,

    #[error("channel tap count {taps} exceeds subcarrier count {subcarriers}")]
    TooManyChannelTaps { taps: usize, subcarriers: usize },

    #[error("power decay factor {0} must be positive and finite")]
    InvalidDecayFactor(f64),

    #[error("code rate denominator {0} must be a nonzero power of two")]
    InvalidCodeRate(u32),

    #[error("malformed code rate {0:?}, expected \"1\" or \"1/<power of two>\"")]
    MalformedCodeRate(String),

    #[error("repeat count {repeat} does not divide subcarrier count {subcarriers}")]
    RateDoesNotDivideSubcarriers { repeat: usize, subcarriers: usize },

    #[error("realization count must be at least 1")]
    NoRealizations,

    #[error("SNR grid is empty")]
    EmptySnrGrid,
}

pub type Result<T> = std::result::Result<T, ConfigError>;
