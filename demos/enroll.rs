use clap::Parser;
use fprint_enroll::sim::{synthetic_print, MinutiaeExtractor, OverlapComparator, ScriptedSensor};
use fprint_enroll::{
    CaptureError, ChannelNotifier, EnrollConfig, EnrollmentCoordinator, EnrollmentOutcome,
    RawSample,
};
use std::thread;
use tracing::{error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

const WIDTH: u32 = 64;
const HEIGHT: u32 = 64;

#[derive(Parser, Debug)]
#[command(version, about = "Simulated fingerprint enrollment", long_about = None)]
struct Args {
    /// Configuration file (`key = value` lines)
    #[arg(short = 'c', long)]
    config: Option<String>,

    /// Failed captures before the first good swipe
    #[arg(short = 'b', long = "bad-swipes", default_value_t = 1)]
    bad_swipes: usize,

    /// Minutiae shift between consecutive swipes; larger means less consistent prints
    #[arg(short = 's', long, default_value_t = 8)]
    shift: u32,

    /// Minutiae per swipe
    #[arg(short = 'm', long, default_value_t = 48)]
    minutiae: u32,

    /// Log file path
    #[arg(short = 'l', long = "log-file")]
    log_file: Option<String>,
}

fn initialize_logging(log_file: Option<String>) {
    let console_writer = std::io::stdout.with_max_level(tracing::Level::INFO);

    let file_appender = if let Some(log_file) = log_file {
        RollingFileAppender::new(Rotation::NEVER, ".", log_file)
            .with_max_level(tracing::Level::DEBUG)
    } else {
        RollingFileAppender::new(Rotation::NEVER, ".", "enroll.log")
            .with_max_level(tracing::Level::DEBUG)
    };

    let writer = console_writer.and(file_appender);

    let subscriber = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(writer)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set subscriber: {e}");
        std::process::exit(1);
    }
}

fn swipe(index: u32, shift: u32, count: u32) -> RawSample {
    let start = index * shift;
    let minutiae: Vec<(u32, u32)> =
        (start..start + count).map(|i| ((i * 5) % WIDTH, (i * 5) / WIDTH)).collect();
    synthetic_print(WIDTH, HEIGHT, &minutiae)
}

fn build_script(args: &Args) -> Vec<Result<RawSample, CaptureError>> {
    let mut script: Vec<Result<RawSample, CaptureError>> = (0..args.bad_swipes)
        .map(|i| Err(CaptureError::Device(format!("finger lifted too early ({})", i + 1))))
        .collect();
    script.extend((0..3).map(|i| Ok(swipe(i, args.shift, args.minutiae))));
    script
}

fn main() {
    let args = Args::parse();
    initialize_logging(args.log_file.clone());

    let config = match &args.config {
        Some(path) => match EnrollConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load config {}: {}", path, e);
                return;
            }
        },
        None => EnrollConfig::default(),
    };

    let script = build_script(&args);
    let (notifier, receiver) = ChannelNotifier::bounded(16);

    let mut coordinator = match EnrollmentCoordinator::with_config(
        ScriptedSensor::new(script),
        MinutiaeExtractor::default(),
        OverlapComparator,
        notifier,
        config,
    ) {
        Ok(coordinator) => coordinator,
        Err(e) => {
            error!("Failed to create coordinator: {}", e);
            return;
        }
    };

    let worker = thread::spawn(move || coordinator.enroll_with_report());

    // the coordinator owns the only sender: the loop ends when the run does
    for message in receiver {
        info!("> {}", message);
    }

    let (outcome, report) = match worker.join() {
        Ok(result) => result,
        Err(_) => {
            error!("Enrollment thread panicked");
            return;
        }
    };

    println!("{report}");

    match outcome {
        EnrollmentOutcome::Completed { template, sample } => {
            info!(
                "Enrolled template {} with {} minutiae",
                template.id,
                template.feature_count()
            );
            if let Some(sample) = sample {
                info!("Backing sample {}", sample.digest12());
            }
        }
        EnrollmentOutcome::Retry { sample } => {
            let digest = sample.map(|s| s.digest12()).unwrap_or_else(|| "-".to_string());
            info!("Please retry (diagnostic sample {})", digest);
        }
        EnrollmentOutcome::Failed => info!("Enrollment failed"),
    }
}
