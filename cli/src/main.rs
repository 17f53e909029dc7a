use clap::{Args, Parser, Subcommand};
use fadesim_core::{
    CodeRate, Experiment, SimConfig, DEFAULT_CHANNEL_TAPS, DEFAULT_NUM_REALIZATIONS,
    DEFAULT_NUM_SUBCARRIERS, DEFAULT_POWER_DECAY_FACTOR,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[derive(Parser)]
#[command(name = "fadesim")]
#[command(about = "Monte-Carlo BER simulation for BPSK OFDM over Rayleigh fading")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct LinkArgs {
    /// Number of OFDM subcarriers (power of two)
    #[arg(long, default_value_t = DEFAULT_NUM_SUBCARRIERS)]
    subcarriers: usize,

    /// Number of channel taps (cyclic prefix is taps - 1 samples)
    #[arg(long, default_value_t = DEFAULT_CHANNEL_TAPS)]
    taps: usize,

    /// Exponential power-delay decay factor
    #[arg(long, default_value_t = DEFAULT_POWER_DECAY_FACTOR)]
    decay: f64,

    /// Master seed for reproducible runs
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a BER sweep across an SNR grid
    Sweep {
        #[command(flatten)]
        link: LinkArgs,

        /// Repetition code rate: "1", "1/2", "1/4", ...
        #[arg(long, default_value = "1", value_parser = parse_code_rate)]
        code_rate: CodeRate,

        /// Place repeated copies on adjacent subcarriers instead of
        /// spreading them apart
        #[arg(long)]
        no_interleaving: bool,

        /// Independent channel realizations per SNR point
        #[arg(long, default_value_t = DEFAULT_NUM_REALIZATIONS)]
        realizations: usize,

        /// First SNR of the grid in dB
        #[arg(long, default_value_t = 0.0)]
        snr_start: f64,

        /// Last SNR of the grid in dB
        #[arg(long, default_value_t = 20.0)]
        snr_stop: f64,

        /// SNR grid step in dB
        #[arg(long, default_value_t = 2.0)]
        snr_step: f64,

        /// Worker threads (default: all cores)
        #[arg(long)]
        workers: Option<usize>,

        /// Emit csv (snr_db,bit_errors,bits,ber) instead of a table
        #[arg(long)]
        csv: bool,
    },

    /// Draw one channel realization and print its frequency response magnitude
    Channel {
        #[command(flatten)]
        link: LinkArgs,
    },
}

fn parse_code_rate(s: &str) -> Result<CodeRate, fadesim_core::ConfigError> {
    s.parse()
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Sweep {
            link,
            code_rate,
            no_interleaving,
            realizations,
            snr_start,
            snr_stop,
            snr_step,
            workers,
            csv,
        } => sweep_command(
            link,
            code_rate,
            !no_interleaving,
            realizations,
            (snr_start, snr_stop, snr_step),
            workers,
            csv,
        ),
        Commands::Channel { link } => channel_command(link),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn sweep_command(
    link: LinkArgs,
    code_rate: CodeRate,
    interleaving: bool,
    realizations: usize,
    (snr_start, snr_stop, snr_step): (f64, f64, f64),
    workers: Option<usize>,
    csv: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let grid = snr_grid(snr_start, snr_stop, snr_step)?;
    let config = SimConfig::new(
        link.subcarriers,
        link.taps,
        link.decay,
        code_rate,
        interleaving,
        realizations,
        grid,
    )?;

    log::debug!("snr grid: {:?}", config.snr_grid_db());

    let mut experiment = Experiment::new(config).with_seed(link.seed);
    if let Some(workers) = workers {
        experiment = experiment.with_workers(workers);
    }
    let report = experiment.run();

    if csv {
        println!("snr_db,bit_errors,bits,ber");
        for point in &report.points {
            println!(
                "{},{},{},{:e}",
                point.snr_db, point.bit_errors, point.bits_simulated, point.ber
            );
        }
    } else {
        println!(
            "{} subcarriers, {} taps, rate {}, interleaving {}",
            link.subcarriers,
            link.taps,
            code_rate,
            if interleaving { "on" } else { "off" }
        );
        println!("{:>8}  {:>12}  {:>12}  {:>10}", "snr(dB)", "bit errors", "bits", "ber");
        for point in &report.points {
            println!(
                "{:>8.1}  {:>12}  {:>12}  {:>10.3e}",
                point.snr_db, point.bit_errors, point.bits_simulated, point.ber
            );
        }
    }

    Ok(())
}

fn channel_command(link: LinkArgs) -> Result<(), Box<dyn std::error::Error>> {
    use fadesim_core::fading::ChannelModel;

    // Any code rate works here; only the channel parameters matter.
    let config = SimConfig::new(
        link.subcarriers,
        link.taps,
        link.decay,
        CodeRate::FULL,
        false,
        1,
        vec![0.0],
    )?;

    let model = ChannelModel::new(&config);
    let mut rng = ChaCha8Rng::seed_from_u64(link.seed);
    let realization = model.realize(&mut rng);

    println!("subcarrier,magnitude");
    for (k, magnitude) in realization.magnitude_response().iter().enumerate() {
        println!("{k},{magnitude:.6}");
    }

    Ok(())
}

/// Builds the inclusive dB grid `start, start+step, ..` up to `stop`.
fn snr_grid(start: f64, stop: f64, step: f64) -> Result<Vec<f64>, String> {
    if !(step.is_finite() && step > 0.0) {
        return Err(format!("snr step {step} must be positive"));
    }
    let mut grid = Vec::new();
    let mut snr = start;
    while snr <= stop + 1e-9 {
        grid.push(snr);
        snr += step;
    }
    Ok(grid)
}
