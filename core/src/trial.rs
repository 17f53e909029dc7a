use rand::Rng;

use crate::channel::MultipathChannel;
use crate::config::SimConfig;
use crate::demodulator::OfdmDemodulator;
use crate::fading::ChannelModel;
use crate::interleaver::InterleaverMap;
use crate::modulator::OfdmModulator;

/// One complete transmit → channel → receive pass.
///
/// Every trial draws fresh information bits and a fresh channel realization
/// from the caller's RNG, so a trial is a pure function of that RNG stream
/// and the (shared, read-only) configuration-derived state. Cheap to clone:
/// the FFT plans are reference counted.
#[derive(Debug, Clone)]
pub struct TrialRunner {
    modulator: OfdmModulator,
    demodulator: OfdmDemodulator,
    channel_model: ChannelModel,
    interleaver: InterleaverMap,
    info_bits: usize,
}

impl TrialRunner {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            modulator: OfdmModulator::new(config),
            demodulator: OfdmDemodulator::new(config),
            channel_model: ChannelModel::new(config),
            interleaver: InterleaverMap::new(config),
            info_bits: config.info_bits_per_symbol(),
        }
    }

    /// Runs one trial and returns the number of bit errors.
    pub fn run<R: Rng>(&self, rng: &mut R, channel: &MultipathChannel) -> u64 {
        let bits: Vec<bool> = (0..self.info_bits).map(|_| rng.gen()).collect();
        let realization = self.channel_model.realize(rng);

        let symbol = self.modulator.modulate(&bits, &self.interleaver);
        let received = channel.propagate(rng, &symbol, &realization.taps);
        let recovered =
            self.demodulator
                .demodulate(&received, &realization.frequency_response, &self.interleaver);

        bits.iter()
            .zip(recovered.iter())
            .filter(|(sent, got)| sent != got)
            .count() as u64
    }

    /// Information bits transmitted per trial.
    pub fn bits_per_trial(&self) -> usize {
        self.info_bits
    }
}
