use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::config::SimConfig;
use crate::interleaver::InterleaverMap;

/// BPSK OFDM transmitter chain: repetition encode, interleave, unitary
/// IFFT, cyclic prefix.
///
/// The IFFT is scaled by `1/sqrt(N)` so the frequency/time transform pair is
/// energy preserving; the noise variance handed to the channel then maps
/// directly onto the post-FFT per-subcarrier SNR. The cyclic prefix copies
/// the last `channel_taps - 1` time samples to the front, which turns the
/// channel's linear convolution into a circular one once the receiver drops
/// the prefix.
#[derive(Clone)]
pub struct OfdmModulator {
    ifft: Arc<dyn Fft<f64>>,
    scale: f64,
    cp_len: usize,
    repeat_count: usize,
}

impl OfdmModulator {
    pub fn new(config: &SimConfig) -> Self {
        let mut planner = FftPlanner::new();
        let ifft = planner.plan_fft_inverse(config.num_subcarriers());
        Self {
            ifft,
            scale: 1.0 / (config.num_subcarriers() as f64).sqrt(),
            cp_len: config.cp_len(),
            repeat_count: config.repeat_count(),
        }
    }

    /// Maps `bits` (one per information symbol) to a time-domain OFDM
    /// symbol of `num_subcarriers + cp_len` samples.
    pub fn modulate(&self, bits: &[bool], map: &InterleaverMap) -> Vec<Complex<f64>> {
        debug_assert_eq!(bits.len() * self.repeat_count, map.len());

        let mut coded = Vec::with_capacity(map.len());
        for &bit in bits {
            let amplitude = if bit { 1.0 } else { -1.0 };
            for _ in 0..self.repeat_count {
                coded.push(Complex::new(amplitude, 0.0));
            }
        }

        let mut time_domain = map.scatter(&coded);
        self.ifft.process(&mut time_domain);
        for sample in time_domain.iter_mut() {
            *sample *= self.scale;
        }

        let n = time_domain.len();
        let mut output = Vec::with_capacity(self.cp_len + n);
        output.extend_from_slice(&time_domain[n - self.cp_len..]);
        output.extend_from_slice(&time_domain);
        output
    }

    pub fn cp_len(&self) -> usize {
        self.cp_len
    }
}

impl std::fmt::Debug for OfdmModulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfdmModulator")
            .field("cp_len", &self.cp_len)
            .field("repeat_count", &self.repeat_count)
            .finish()
    }
}
