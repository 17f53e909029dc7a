use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, Result};

/// Repetition code rate: 1 (uncoded) or 1/2^n.
///
/// Stored as the denominator so rate arithmetic stays exact. Parses from
/// `"1"`, `"1/2"`, `"1/4"`, ... which is also the CLI surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeRate {
    denominator: u32,
}

impl CodeRate {
    /// Rate 1, one information bit per subcarrier.
    pub const FULL: CodeRate = CodeRate { denominator: 1 };

    pub fn new(denominator: u32) -> Result<Self> {
        if denominator == 0 || !denominator.is_power_of_two() {
            return Err(ConfigError::InvalidCodeRate(denominator));
        }
        Ok(Self { denominator })
    }

    /// R as a real number in (0, 1].
    pub fn rate(&self) -> f64 {
        1.0 / f64::from(self.denominator)
    }

    /// Number of transmitted copies per information bit (1/R).
    pub fn repeat_count(&self) -> usize {
        self.denominator as usize
    }

    pub fn is_coded(&self) -> bool {
        self.denominator > 1
    }
}

impl FromStr for CodeRate {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || ConfigError::MalformedCodeRate(s.to_string());
        match s.split_once('/') {
            None => {
                if s.trim() == "1" {
                    Ok(CodeRate::FULL)
                } else {
                    Err(malformed())
                }
            }
            Some((num, den)) => {
                if num.trim() != "1" {
                    return Err(malformed());
                }
                let denominator: u32 = den.trim().parse().map_err(|_| malformed())?;
                CodeRate::new(denominator)
            }
        }
    }
}

impl fmt::Display for CodeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator == 1 {
            write!(f, "1")
        } else {
            write!(f, "1/{}", self.denominator)
        }
    }
}

/// Validated simulation parameters, immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    num_subcarriers: usize,
    channel_taps: usize,
    power_decay_factor: f64,
    code_rate: CodeRate,
    interleaving: bool,
    num_realizations: usize,
    snr_grid_db: Vec<f64>,
}

impl SimConfig {
    /// Validates every parameter and fails fast with a [`ConfigError`]
    /// naming the offending one. No simulation state is built on failure.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        num_subcarriers: usize,
        channel_taps: usize,
        power_decay_factor: f64,
        code_rate: CodeRate,
        interleaving: bool,
        num_realizations: usize,
        snr_grid_db: Vec<f64>,
    ) -> Result<Self> {
        if !num_subcarriers.is_power_of_two() {
            return Err(ConfigError::SubcarriersNotPowerOfTwo(num_subcarriers));
        }
        if channel_taps == 0 {
            return Err(ConfigError::NoChannelTaps);
        }
        if channel_taps > num_subcarriers {
            return Err(ConfigError::TooManyChannelTaps {
                taps: channel_taps,
                subcarriers: num_subcarriers,
            });
        }
        if !(power_decay_factor.is_finite() && power_decay_factor > 0.0) {
            return Err(ConfigError::InvalidDecayFactor(power_decay_factor));
        }
        if num_subcarriers % code_rate.repeat_count() != 0 {
            return Err(ConfigError::RateDoesNotDivideSubcarriers {
                repeat: code_rate.repeat_count(),
                subcarriers: num_subcarriers,
            });
        }
        if num_realizations == 0 {
            return Err(ConfigError::NoRealizations);
        }
        if snr_grid_db.is_empty() {
            return Err(ConfigError::EmptySnrGrid);
        }
        Ok(Self {
            num_subcarriers,
            channel_taps,
            power_decay_factor,
            code_rate,
            interleaving,
            num_realizations,
            snr_grid_db,
        })
    }

    pub fn num_subcarriers(&self) -> usize {
        self.num_subcarriers
    }

    pub fn channel_taps(&self) -> usize {
        self.channel_taps
    }

    pub fn power_decay_factor(&self) -> f64 {
        self.power_decay_factor
    }

    pub fn code_rate(&self) -> CodeRate {
        self.code_rate
    }

    pub fn interleaving_enabled(&self) -> bool {
        self.interleaving
    }

    pub fn num_realizations(&self) -> usize {
        self.num_realizations
    }

    pub fn snr_grid_db(&self) -> &[f64] {
        &self.snr_grid_db
    }

    /// Copies transmitted per information bit.
    pub fn repeat_count(&self) -> usize {
        self.code_rate.repeat_count()
    }

    /// Information bits carried by one OFDM symbol (N · R).
    pub fn info_bits_per_symbol(&self) -> usize {
        self.num_subcarriers / self.repeat_count()
    }

    /// Cyclic prefix length: one sample less than the channel memory.
    pub fn cp_len(&self) -> usize {
        self.channel_taps - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Result<SimConfig> {
        SimConfig::new(128, 10, 3.0, CodeRate::FULL, true, 100, vec![0.0, 10.0])
    }

    #[test]
    fn test_valid_config() {
        let config = valid_config().unwrap();
        assert_eq!(config.num_subcarriers(), 128);
        assert_eq!(config.cp_len(), 9);
        assert_eq!(config.info_bits_per_symbol(), 128);
    }

    #[test]
    fn test_code_rate_parse() {
        assert_eq!("1".parse::<CodeRate>().unwrap(), CodeRate::FULL);
        assert_eq!("1/4".parse::<CodeRate>().unwrap().repeat_count(), 4);
        assert_eq!("1/8".parse::<CodeRate>().unwrap().rate(), 0.125);
        assert!("2/3".parse::<CodeRate>().is_err());
        assert!("1/3".parse::<CodeRate>().is_err());
        assert!("1/0".parse::<CodeRate>().is_err());
        assert!("0".parse::<CodeRate>().is_err());
        assert!("".parse::<CodeRate>().is_err());
    }

    #[test]
    fn test_code_rate_display_round_trip() {
        for rate in ["1", "1/2", "1/16"] {
            assert_eq!(rate.parse::<CodeRate>().unwrap().to_string(), rate);
        }
    }

    #[test]
    fn test_rejects_non_power_of_two_subcarriers() {
        let result = SimConfig::new(100, 10, 3.0, CodeRate::FULL, true, 100, vec![0.0]);
        assert_eq!(result, Err(ConfigError::SubcarriersNotPowerOfTwo(100)));
    }

    #[test]
    fn test_rejects_zero_taps() {
        let result = SimConfig::new(128, 0, 3.0, CodeRate::FULL, true, 100, vec![0.0]);
        assert_eq!(result, Err(ConfigError::NoChannelTaps));
    }

    #[test]
    fn test_rejects_taps_exceeding_subcarriers() {
        let result = SimConfig::new(16, 17, 3.0, CodeRate::FULL, true, 100, vec![0.0]);
        assert!(matches!(
            result,
            Err(ConfigError::TooManyChannelTaps { taps: 17, subcarriers: 16 })
        ));
    }

    #[test]
    fn test_rejects_bad_decay_factor() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = SimConfig::new(128, 10, bad, CodeRate::FULL, true, 100, vec![0.0]);
            assert!(matches!(result, Err(ConfigError::InvalidDecayFactor(_))));
        }
    }

    #[test]
    fn test_rejects_indivisible_repeat_count() {
        let rate = CodeRate::new(16).unwrap();
        let result = SimConfig::new(8, 2, 3.0, rate, true, 100, vec![0.0]);
        assert!(matches!(
            result,
            Err(ConfigError::RateDoesNotDivideSubcarriers { repeat: 16, subcarriers: 8 })
        ));
    }

    #[test]
    fn test_rejects_zero_realizations() {
        let result = SimConfig::new(128, 10, 3.0, CodeRate::FULL, true, 0, vec![0.0]);
        assert_eq!(result, Err(ConfigError::NoRealizations));
    }

    #[test]
    fn test_rejects_empty_snr_grid() {
        let result = SimConfig::new(128, 10, 3.0, CodeRate::FULL, true, 100, vec![]);
        assert_eq!(result, Err(ConfigError::EmptySnrGrid));
    }

    #[test]
    fn test_derived_quantities_with_repetition() {
        let rate = CodeRate::new(4).unwrap();
        let config = SimConfig::new(128, 10, 3.0, rate, true, 100, vec![10.0]).unwrap();
        assert_eq!(config.repeat_count(), 4);
        assert_eq!(config.info_bits_per_symbol(), 32);
        assert!((config.code_rate().rate() - 0.25).abs() < 1e-15);
    }
}
