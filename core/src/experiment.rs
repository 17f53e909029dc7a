use std::thread;

use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::channel::MultipathChannel;
use crate::config::SimConfig;
use crate::fading::ChannelModel;
use crate::trial::TrialRunner;

/// Finalized result for one SNR grid entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SnrPoint {
    pub snr_db: f64,
    pub bit_errors: u64,
    pub bits_simulated: u64,
    pub ber: f64,
}

/// Everything a sweep produces: one BER point per SNR plus one
/// representative channel magnitude response for diagnostic rendering.
#[derive(Debug, Clone)]
pub struct SweepReport {
    pub points: Vec<SnrPoint>,
    pub channel_magnitude: Vec<f64>,
}

/// Monte-Carlo SNR sweep.
///
/// Trials are independent and side-effect free, so each SNR point fans its
/// realizations out over worker threads, each worker summing a private
/// error count; the partial counts are merged in worker order. Every trial
/// seeds its own ChaCha8 stream from the master seed and the trial's global
/// index, which makes the result identical for any worker count.
#[derive(Debug, Clone)]
pub struct Experiment {
    config: SimConfig,
    seed: u64,
    num_workers: usize,
}

impl Experiment {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            seed: 0,
            num_workers: num_cpus::get(),
        }
    }

    /// Master seed; the same seed reproduces the sweep bit for bit.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Worker thread count; values below 1 are clamped to 1.
    pub fn with_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers.max(1);
        self
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Runs the full sweep. Infallible: the configuration was validated at
    /// construction and the per-trial pipeline is total.
    pub fn run(&self) -> SweepReport {
        let trial = TrialRunner::new(&self.config);
        let num_realizations = self.config.num_realizations();
        let bits_per_snr = (trial.bits_per_trial() * num_realizations) as u64;

        info!(
            "sweeping {} SNR points, {} realizations each, {} workers",
            self.config.snr_grid_db().len(),
            num_realizations,
            self.num_workers
        );

        let mut points = Vec::with_capacity(self.config.snr_grid_db().len());
        for (snr_index, &snr_db) in self.config.snr_grid_db().iter().enumerate() {
            let snr_linear = 10f64.powf(snr_db / 10.0);
            let channel = MultipathChannel::new(1.0 / snr_linear);
            let first_trial = (snr_index * num_realizations) as u64;

            let bit_errors = self.count_errors(&trial, &channel, first_trial);
            let ber = bit_errors as f64 / bits_per_snr as f64;
            info!("snr {snr_db:>5.1} dB: {bit_errors} errors in {bits_per_snr} bits, ber {ber:.3e}");
            points.push(SnrPoint {
                snr_db,
                bit_errors,
                bits_simulated: bits_per_snr,
                ber,
            });
        }

        SweepReport {
            points,
            channel_magnitude: self.diagnostic_magnitude(),
        }
    }

    /// Accumulates bit errors for `num_realizations` trials of one SNR
    /// point. Each worker owns a contiguous range of trial indices and the
    /// per-trial seeding ties the random stream to the index, not the
    /// worker, so the sum is schedule independent.
    fn count_errors(&self, trial: &TrialRunner, channel: &MultipathChannel, first_trial: u64) -> u64 {
        let num_realizations = self.config.num_realizations();
        let num_workers = self.num_workers.min(num_realizations);
        let chunk = num_realizations.div_ceil(num_workers);
        let seed = self.seed;

        if num_workers == 1 {
            return (0..num_realizations as u64)
                .map(|index| {
                    let mut rng = trial_rng(seed, first_trial + index);
                    trial.run(&mut rng, channel)
                })
                .sum();
        }

        thread::scope(|scope| {
            let handles: Vec<_> = (0..num_workers)
                .map(|worker| {
                    let lo = worker * chunk;
                    let hi = ((worker + 1) * chunk).min(num_realizations);
                    scope.spawn(move || {
                        let mut errors = 0u64;
                        for index in lo..hi {
                            let mut rng = trial_rng(seed, first_trial + index as u64);
                            errors += trial.run(&mut rng, channel);
                        }
                        debug!("worker {worker}: trials {lo}..{hi}, {errors} errors");
                        errors
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("worker thread panicked"))
                .sum()
        })
    }

    /// One representative realization for the diagnostic channel plot,
    /// drawn from a reserved stream past all trial indices so it never
    /// depends on the sweep's scheduling.
    fn diagnostic_magnitude(&self) -> Vec<f64> {
        let total_trials =
            (self.config.snr_grid_db().len() * self.config.num_realizations()) as u64;
        let mut rng = trial_rng(self.seed, total_trials);
        ChannelModel::new(&self.config)
            .realize(&mut rng)
            .magnitude_response()
    }
}

fn trial_rng(seed: u64, trial_index: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed.wrapping_add(trial_index))
}
