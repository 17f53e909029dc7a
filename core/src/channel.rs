use rand::Rng;
use rand_distr::{Distribution, Normal};
use rustfft::num_complex::Complex;

/// Multipath transport: linear convolution with the channel taps plus
/// circularly symmetric complex Gaussian noise.
///
/// Constructed once per SNR point with the noise variance `1/snr`; each
/// [`propagate`](Self::propagate) call is one transmission over one channel
/// realization.
#[derive(Debug, Clone)]
pub struct MultipathChannel {
    // Per-component distribution (variance sigma^2 / 2); None when noiseless.
    noise: Option<Normal<f64>>,
}

impl MultipathChannel {
    pub fn new(noise_variance: f64) -> Self {
        let noise = if noise_variance > 0.0 {
            Some(Normal::new(0.0, (noise_variance / 2.0).sqrt()).expect("finite noise variance"))
        } else {
            None
        };
        Self { noise }
    }

    /// Convolves `symbol` with `taps`, adds noise to every sample of the
    /// full convolution, then discards the `taps.len() - 1` tail samples
    /// that would spill into a following symbol. Output length equals the
    /// input length (cyclic prefix plus data block).
    pub fn propagate<R: Rng>(
        &self,
        rng: &mut R,
        symbol: &[Complex<f64>],
        taps: &[Complex<f64>],
    ) -> Vec<Complex<f64>> {
        let mut received = vec![Complex::new(0.0, 0.0); symbol.len() + taps.len() - 1];
        for (i, &s) in symbol.iter().enumerate() {
            for (l, &h) in taps.iter().enumerate() {
                received[i + l] += s * h;
            }
        }

        if let Some(noise) = &self.noise {
            for sample in received.iter_mut() {
                *sample += Complex::new(noise.sample(rng), noise.sample(rng));
            }
        }

        received.truncate(symbol.len());
        received
    }
}
