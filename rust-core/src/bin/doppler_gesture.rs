use anyhow::{Context, Result};
use clap::Parser;
use doppler_gesture::audio::input::list_input_devices;
use doppler_gesture::audio::output::list_output_devices;
use doppler_gesture::audio::{GestureSession, GestureSink};
use doppler_gesture::config::{load_config, SessionConfig};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "doppler-gesture", about = "Ultrasonic push/pull gesture detector")]
struct Cli {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Carrier tone frequency in Hz
    #[arg(long)]
    carrier_hz: Option<f64>,

    /// FFT size (power of two)
    #[arg(long)]
    fft_size: Option<usize>,

    /// Apply a Blackman window to each frame
    #[arg(long)]
    blackman: bool,

    /// Delay between starting the tone and listening, in ms
    #[arg(long)]
    settle_ms: Option<u64>,

    /// Stop after this many seconds (runs until killed otherwise)
    #[arg(short, long)]
    duration: Option<u64>,

    /// List audio devices and exit
    #[arg(long)]
    list_devices: bool,
}

/// Prints each label on one line
struct TerminalSink;

impl GestureSink for TerminalSink {
    fn show(&mut self, label: &str) {
        println!("{}", label.replace('\n', "  "));
    }
}

fn list_devices() -> Result<()> {
    println!("Input devices:");
    for device in list_input_devices()? {
        println!("  {} ({} Hz, {} ch)", device.name, device.sample_rate, device.channels);
    }
    println!("Output devices:");
    for device in list_output_devices()? {
        println!("  {} ({} Hz, {} ch)", device.name, device.sample_rate, device.channels);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    if cli.list_devices {
        return list_devices();
    }

    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => SessionConfig::default(),
    };

    if let Some(carrier_hz) = cli.carrier_hz {
        config.detector.carrier_hz = carrier_hz;
    }
    if let Some(fft_size) = cli.fft_size {
        config.detector.fft_size = fft_size;
    }
    if cli.blackman {
        config.detector.apply_blackman = true;
    }
    if let Some(settle_ms) = cli.settle_ms {
        config.settle_ms = settle_ms;
    }

    let mut session = GestureSession::new(config).context("Invalid configuration")?;
    session.start(TerminalSink).context("Failed to start gesture session")?;

    match cli.duration {
        Some(secs) => {
            std::thread::sleep(Duration::from_secs(secs));
            session.stop();
        }
        None => loop {
            std::thread::park();
        },
    }

    Ok(())
}
