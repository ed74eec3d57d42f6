//! pinch_voxels — interactive entry point.

use std::time::Duration;

use clap::{Parser, ValueEnum};
use pinch_pipeline::{CaptureConfig, DetectorConfig, PipelineConfig};
use pinch_voxels::app::{run, AppConfig, Backend};
use tracing::info;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendArg {
    Sim,
    Leap,
}

/// Place voxels in a 3D scene by pinching.
#[derive(Parser, Debug)]
#[command(name = "pinch_voxels", version, about)]
struct Cli {
    /// Hand source
    #[arg(long, value_enum, default_value = "sim")]
    backend: BackendArg,

    /// Thumb–index distance below which a hand counts as pinching
    #[arg(long, default_value_t = 0.05)]
    pinch_threshold: f32,

    /// Minimum time between accepted pinches (0 disables debouncing)
    #[arg(long, default_value_t = 500)]
    cooldown_ms: u64,

    /// World extent covered by the normalized image
    #[arg(long, default_value_t = 10.0)]
    span: f32,

    /// Cube edge length
    #[arg(long, default_value_t = 1.0)]
    voxel_size: f32,

    /// Stop placing once the scene holds this many voxels
    #[arg(long)]
    max_voxels: Option<usize>,

    #[arg(long, default_value_t = 640)]
    capture_width: u32,

    #[arg(long, default_value_t = 480)]
    capture_height: u32,

    /// Capture frame rate
    #[arg(long, default_value_t = 30)]
    fps: u32,

    #[arg(long, default_value_t = 0.7)]
    min_detection_confidence: f32,

    #[arg(long, default_value_t = 0.7)]
    min_tracking_confidence: f32,

    /// Window width
    #[arg(long, default_value_t = 1024)]
    width: usize,

    /// Window height
    #[arg(long, default_value_t = 768)]
    height: usize,
}

impl Cli {
    fn into_config(self) -> AppConfig {
        let pipeline = PipelineConfig {
            pinch_threshold: self.pinch_threshold,
            cooldown:        Duration::from_millis(self.cooldown_ms),
            span:            self.span,
            voxel_size:      self.voxel_size,
            voxel_capacity:  self.max_voxels,
            ..PipelineConfig::default()
        };
        let capture = CaptureConfig {
            width:  self.capture_width.max(1),
            height: self.capture_height.max(1),
            fps:    self.fps.max(1),
        };
        let detector = DetectorConfig {
            min_detection_confidence: self.min_detection_confidence,
            min_tracking_confidence:  self.min_tracking_confidence,
            ..DetectorConfig::default()
        };
        AppConfig {
            pipeline,
            capture,
            detector,
            backend: match self.backend {
                BackendArg::Sim  => Backend::Simulated,
                BackendArg::Leap => Backend::Leap,
            },
            window_width:  self.width.max(64),
            window_height: self.height.max(64),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pinch_voxels=info,pinch_pipeline=info".into()),
        )
        .init();

    info!("pinch_voxels v{} starting", env!("CARGO_PKG_VERSION"));
    match cli.backend {
        BackendArg::Sim  => info!("mode: mouse simulation (left button or Space to pinch)"),
        BackendArg::Leap => info!("mode: LeapMotion hardware"),
    }

    let cfg = cli.into_config();
    info!(
        threshold = cfg.pipeline.pinch_threshold,
        cooldown_ms = cfg.pipeline.cooldown.as_millis() as u64,
        span = cfg.pipeline.span,
        "pipeline configured"
    );

    run(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_library_defaults() {
        let cfg = Cli::parse_from(["pinch_voxels"]).into_config();
        assert_eq!(cfg.pipeline, PipelineConfig::default());
        assert_eq!(cfg.capture, CaptureConfig::default());
        assert_eq!(cfg.detector, DetectorConfig::default());
        assert_eq!(cfg.backend, Backend::Simulated);
    }

    #[test]
    fn zero_cooldown_disables_debounce() {
        let cfg = Cli::parse_from(["pinch_voxels", "--cooldown-ms", "0", "--voxel-size", "0.5"])
            .into_config();
        assert_eq!(cfg.pipeline.cooldown, Duration::ZERO);
        assert_eq!(cfg.pipeline.voxel_size, 0.5);
    }

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
