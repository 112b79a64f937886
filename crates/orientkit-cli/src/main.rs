//! orientkit command-line front end
//!
//! # Commands
//!
//! - `orientkit indicator` - Run the 3D device indicator against a simulated sweep
//! - `orientkit level` - Run the bubble level against a simulated roll
//! - `orientkit euler <W,X,Y,Z>` - Convert a quaternion to pitch/roll/yaw
//! - `orientkit distance <W,X,Y,Z> [W,X,Y,Z]` - Angle between two orientations
//! - `orientkit config show|init` - Inspect or create the config file
//!
//! Logs go to stderr and honour `RUST_LOG`.

mod sim;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use orientkit_config::{load_config, load_config_from, save_config_to, OrientKitConfig};
use orientkit_core::{format_angle, AngleFormat, Quaternion, SystemClock, TargetOrientation};
use orientkit_sensor::{
    spawn_indicator, spawn_level, AngleReadout, DeviceIndicator, IndicatorEvent, LevelEvent,
    LevelIndicator,
};
use tracing::{info, warn};

use crate::sim::Sweep;

/// Device orientation indicators and angle math
#[derive(Parser, Debug)]
#[command(name = "orientkit")]
#[command(about = "Device orientation, alignment and bubble-level toolkit", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file to use instead of the platform default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the 3D device indicator against a simulated sensor sweep
    Indicator {
        /// How long to run
        #[arg(long, default_value_t = 3000)]
        duration_ms: u64,

        /// Override the configured target orientation
        #[arg(long)]
        target: Option<TargetOrientation>,

        /// Override the configured alignment tolerance (degrees)
        #[arg(long)]
        tolerance: Option<f64>,

        /// Peak tilt of the simulated sweep (degrees)
        #[arg(long, default_value_t = 10.0)]
        amplitude: f64,

        /// Emit events as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Run the bubble level against a simulated side-to-side roll
    Level {
        #[arg(long, default_value_t = 3000)]
        duration_ms: u64,

        /// Override the configured level threshold (degrees)
        #[arg(long)]
        threshold: Option<f64>,

        /// Peak roll of the simulated device (degrees)
        #[arg(long, default_value_t = 5.0)]
        amplitude: f64,

        /// Also report the rendered angle text
        #[arg(long)]
        show_text: bool,

        #[arg(long)]
        json: bool,
    },

    /// Convert a quaternion to pitch/roll/yaw
    Euler {
        /// Quaternion as `w,x,y,z`
        #[arg(value_parser = parse_quaternion, allow_hyphen_values = true)]
        quaternion: Quaternion,

        /// Decimal places (0-3)
        #[arg(long, default_value_t = 1)]
        precision: i32,

        /// `degrees` or `radians`
        #[arg(long, default_value_t = AngleFormat::Degrees)]
        format: AngleFormat,

        #[arg(long)]
        json: bool,
    },

    /// Angle between two orientations in degrees
    Distance {
        /// Quaternion as `w,x,y,z`
        #[arg(value_parser = parse_quaternion, allow_hyphen_values = true)]
        from: Quaternion,

        /// Second quaternion; defaults to the reference of `--target`
        #[arg(value_parser = parse_quaternion, allow_hyphen_values = true)]
        to: Option<Quaternion>,

        #[arg(long, default_value_t = TargetOrientation::Portrait)]
        target: TargetOrientation,
    },

    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective config as TOML
    Show,

    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orientkit_sensor=info,orientkit_config=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Indicator {
            duration_ms,
            target,
            tolerance,
            amplitude,
            json,
        } => {
            let mut config = resolve_config(cli.config.as_deref())?.indicator;
            if let Some(target) = target {
                config.target_orientation = target;
            }
            if let Some(tolerance) = tolerance {
                config.alignment_tolerance = tolerance;
            }
            run_indicator(DeviceIndicator::new(config), amplitude, duration_ms, json).await
        }
        Commands::Level {
            duration_ms,
            threshold,
            amplitude,
            show_text,
            json,
        } => {
            let mut config = resolve_config(cli.config.as_deref())?.level;
            if let Some(threshold) = threshold {
                config.level_threshold = threshold;
            }
            config.show_angle_text |= show_text;
            run_level(LevelIndicator::new(config), amplitude, duration_ms, json).await
        }
        Commands::Euler {
            quaternion,
            precision,
            format,
            json,
        } => {
            let angles = quaternion.to_euler_at(0);
            if json {
                let value = serde_json::json!({
                    "pitch": angles.pitch,
                    "roll": angles.roll,
                    "yaw": angles.yaw,
                });
                println!("{value}");
            } else {
                println!("{}", AngleReadout::new(precision, format).render(&angles));
            }
            Ok(())
        }
        Commands::Distance { from, to, target } => {
            let to = to.unwrap_or_else(|| target.reference());
            if !from.is_normalized() || !to.is_normalized() {
                warn!("Input quaternion is not unit length; distance may be meaningless");
            }
            println!("{}", format_angle(from.angular_distance(&to), 3, AngleFormat::Degrees));
            Ok(())
        }
        Commands::Config { action } => run_config(action, cli.config.as_deref()),
    }
}

fn resolve_config(path: Option<&Path>) -> Result<OrientKitConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config().unwrap_or_else(|e| {
            warn!(?e, "Failed to load config, using defaults");
            OrientKitConfig::default()
        }),
    };
    Ok(config.validated())
}

fn config_file(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(orientkit_config::config_path()?),
    }
}

fn run_config(action: ConfigAction, path: Option<&Path>) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = resolve_config(path)?;
            let rendered = toml::to_string_pretty(&config).context("Failed to render config")?;
            print!("{rendered}");
        }
        ConfigAction::Init { force } => {
            let path = config_file(path)?;
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            save_config_to(&OrientKitConfig::default(), &path)?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

async fn run_indicator(indicator: DeviceIndicator, amplitude: f64, duration_ms: u64, json: bool) -> Result<()> {
    let readout = indicator.readout();
    let rest = indicator.config().target_orientation.reference();
    info!(
        target = %indicator.config().target_orientation,
        tolerance = indicator.config().alignment_tolerance,
        "Running device indicator"
    );

    let source = Sweep::new(amplitude, Duration::from_secs(4)).orientation_around(rest);
    let handle = spawn_indicator(indicator, source, SystemClock, move |event: IndicatorEvent| {
        if json {
            print_json(&event);
        } else {
            print_indicator_event(&readout, &event);
        }
    });

    tokio::time::sleep(Duration::from_millis(duration_ms)).await;
    handle.shutdown().await
}

async fn run_level(level: LevelIndicator, amplitude: f64, duration_ms: u64, json: bool) -> Result<()> {
    info!(threshold = level.config().level_threshold, "Running bubble level");

    let source = Sweep::new(amplitude, Duration::from_secs(4)).gravity();
    let handle = spawn_level(level, source, SystemClock, move |event: LevelEvent| {
        if json {
            print_json(&event);
        } else {
            print_level_event(&event);
        }
    });

    tokio::time::sleep(Duration::from_millis(duration_ms)).await;
    handle.shutdown().await
}

fn print_json<T: serde::Serialize>(event: &T) {
    match serde_json::to_string(event) {
        Ok(line) => println!("{line}"),
        Err(e) => warn!(?e, "Failed to serialize event"),
    }
}

fn print_indicator_event(readout: &AngleReadout, event: &IndicatorEvent) {
    match event {
        IndicatorEvent::OrientationChanged(state) => {
            println!("[{}] {}", state.timestamp, readout.render(state));
        }
        IndicatorEvent::AlignmentChanged { aligned: true } => println!("aligned"),
        IndicatorEvent::AlignmentChanged { aligned: false } => println!("not aligned"),
    }
}

fn print_level_event(event: &LevelEvent) {
    match event {
        LevelEvent::AngleChanged { angle } => println!("angle {angle:.2}"),
        LevelEvent::AngleTextChanged { text } => println!("text {text}"),
        LevelEvent::LevelReached => println!("level"),
        LevelEvent::LevelLost => println!("not level"),
    }
}

/// Parse `w,x,y,z` into a quaternion
fn parse_quaternion(s: &str) -> Result<Quaternion, String> {
    let parts = s
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in {s:?}: {e}"))?;
    match parts.as_slice() {
        [w, x, y, z] => Ok(Quaternion::new(*w, *x, *y, *z)),
        _ => Err(format!("expected 4 comma-separated values (w,x,y,z), got {}", parts.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quaternion() {
        let q = parse_quaternion("0.7071, 0, 0, -0.7071").unwrap();
        assert_eq!(q, Quaternion::new(0.7071, 0.0, 0.0, -0.7071));
        assert!(parse_quaternion("1,0,0").is_err());
        assert!(parse_quaternion("1,0,zero,0").is_err());
    }

    #[test]
    fn test_cli_parses_negative_quaternion() {
        let cli = Cli::try_parse_from(["orientkit", "euler", "-0.5,0.5,0.5,0.5", "--format", "rad"]).unwrap();
        match cli.command {
            Commands::Euler { quaternion, format, .. } => {
                assert_eq!(quaternion, Quaternion::new(-0.5, 0.5, 0.5, 0.5));
                assert_eq!(format, AngleFormat::Radians);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_indicator_overrides() {
        let cli = Cli::try_parse_from([
            "orientkit",
            "indicator",
            "--target",
            "landscape-left",
            "--tolerance",
            "3",
            "--config",
            "/tmp/orientkit.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/orientkit.toml")));
        match cli.command {
            Commands::Indicator { target, tolerance, duration_ms, .. } => {
                assert_eq!(target, Some(TargetOrientation::LandscapeLeft));
                assert_eq!(tolerance, Some(3.0));
                assert_eq!(duration_ms, 3000);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_config_init_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        run_config(ConfigAction::Init { force: false }, Some(path.as_path())).unwrap();
        assert!(path.exists());
        assert!(run_config(ConfigAction::Init { force: false }, Some(path.as_path())).is_err());
        run_config(ConfigAction::Init { force: true }, Some(path.as_path())).unwrap();

        let loaded = resolve_config(Some(path.as_path())).unwrap();
        assert_eq!(loaded, OrientKitConfig::default());
    }
}
