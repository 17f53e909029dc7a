use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::config::SimConfig;
use crate::interleaver::InterleaverMap;

/// OFDM receiver chain: cyclic-prefix removal, unitary FFT, matched-filter
/// weighting by the known channel, repetition combining, hard decision.
///
/// Multiplying each subcarrier by the conjugate of its channel gain both
/// derotates the channel phase and weights the subcarrier by its own gain,
/// so summing the gathered copies of an information symbol is
/// maximum-ratio combining across its diversity branches.
#[derive(Clone)]
pub struct OfdmDemodulator {
    fft: Arc<dyn Fft<f64>>,
    scale: f64,
    cp_len: usize,
    repeat_count: usize,
    num_subcarriers: usize,
}

impl OfdmDemodulator {
    pub fn new(config: &SimConfig) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(config.num_subcarriers());
        Self {
            fft,
            scale: 1.0 / (config.num_subcarriers() as f64).sqrt(),
            cp_len: config.cp_len(),
            repeat_count: config.repeat_count(),
            num_subcarriers: config.num_subcarriers(),
        }
    }

    /// Matched-filter decision variables, one per information symbol,
    /// before the hard decision. Exposed separately so the combining gain
    /// can be inspected directly.
    pub fn combine(
        &self,
        received: &[Complex<f64>],
        frequency_response: &[Complex<f64>],
        map: &InterleaverMap,
    ) -> Vec<Complex<f64>> {
        // Dropping the prefix leaves exactly the circularly convolved block.
        let mut freq_domain =
            received[self.cp_len..self.cp_len + self.num_subcarriers].to_vec();
        self.fft.process(&mut freq_domain);

        for (bin, gain) in freq_domain.iter_mut().zip(frequency_response) {
            *bin = *bin * self.scale * gain.conj();
        }

        let gathered = map.gather(&freq_domain);
        gathered
            .chunks(self.repeat_count)
            .map(|copies| copies.iter().sum())
            .collect()
    }

    /// Recovers the transmitted bits by sign of the combined real part.
    pub fn demodulate(
        &self,
        received: &[Complex<f64>],
        frequency_response: &[Complex<f64>],
        map: &InterleaverMap,
    ) -> Vec<bool> {
        self.combine(received, frequency_response, map)
            .iter()
            .map(|decision| decision.re >= 0.0)
            .collect()
    }
}

impl std::fmt::Debug for OfdmDemodulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfdmDemodulator")
            .field("cp_len", &self.cp_len)
            .field("repeat_count", &self.repeat_count)
            .field("num_subcarriers", &self.num_subcarriers)
            .finish()
    }
}
