use std::sync::Arc;

use rand::Rng;
use rand_distr::{Distribution, Normal};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::config::SimConfig;

/// Per-tap average powers of the exponentially decaying delay profile,
/// normalized so the total average channel energy is 1.
pub fn tap_power_profile(num_taps: usize, decay_factor: f64) -> Vec<f64> {
    let raw: Vec<f64> = (0..num_taps)
        .map(|l| (-(l as f64) / decay_factor).exp())
        .collect();
    let total: f64 = raw.iter().sum();
    raw.into_iter().map(|p| p / total).collect()
}

/// One drawn multipath channel: the tap amplitudes and their DFT evaluated
/// on the subcarrier grid. Owned by a single trial and discarded with it.
#[derive(Debug, Clone)]
pub struct ChannelRealization {
    pub taps: Vec<Complex<f64>>,
    pub frequency_response: Vec<Complex<f64>>,
}

impl ChannelRealization {
    /// Per-subcarrier channel gain magnitude, the diagnostic vector exposed
    /// to external rendering.
    pub fn magnitude_response(&self) -> Vec<f64> {
        self.frequency_response.iter().map(|h| h.norm()).collect()
    }
}

/// Rayleigh-fading channel synthesizer.
///
/// Taps are i.i.d. circularly symmetric complex Gaussian with variances
/// following [`tap_power_profile`]; each call to [`realize`](Self::realize)
/// draws an independent channel.
#[derive(Clone)]
pub struct ChannelModel {
    // Per-tap draw distributions, std dev sqrt(p_l / 2) per component.
    tap_normals: Vec<Normal<f64>>,
    fft: Arc<dyn Fft<f64>>,
    num_subcarriers: usize,
}

impl ChannelModel {
    pub fn new(config: &SimConfig) -> Self {
        let profile = tap_power_profile(config.channel_taps(), config.power_decay_factor());
        let tap_normals = profile
            .iter()
            .map(|p| Normal::new(0.0, (p / 2.0).sqrt()).expect("validated tap variance"))
            .collect();
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(config.num_subcarriers());
        Self {
            tap_normals,
            fft,
            num_subcarriers: config.num_subcarriers(),
        }
    }

    /// Draws a fresh channel realization from `rng`.
    pub fn realize<R: Rng>(&self, rng: &mut R) -> ChannelRealization {
        let taps: Vec<Complex<f64>> = self
            .tap_normals
            .iter()
            .map(|normal| Complex::new(normal.sample(rng), normal.sample(rng)))
            .collect();
        self.realization_from_taps(taps)
    }

    /// Builds the realization for a known tap vector: the frequency response
    /// is the DFT of the taps zero-padded to the subcarrier count.
    pub fn realization_from_taps(&self, taps: Vec<Complex<f64>>) -> ChannelRealization {
        let mut frequency_response = vec![Complex::new(0.0, 0.0); self.num_subcarriers];
        frequency_response[..taps.len()].copy_from_slice(&taps);
        self.fft.process(&mut frequency_response);
        ChannelRealization {
            taps,
            frequency_response,
        }
    }
}

impl std::fmt::Debug for ChannelModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelModel")
            .field("num_taps", &self.tap_normals.len())
            .field("num_subcarriers", &self.num_subcarriers)
            .finish()
    }
}
