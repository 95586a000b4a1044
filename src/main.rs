mod config;
mod environment;
mod error;
mod identity;
mod prompt;
mod rotation;
mod scoring;
mod selector;
mod store;
mod vendor;

#[cfg(test)]
mod test_utils;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use config::{DEFAULT_INTERVAL_SECS, DEFAULT_SETTLE_SECS, RotationConfig};
use environment::{LinkTool, SystemEnvironment, interface_exists};
use error::IdentityError;
use identity::Oui;
use prompt::Prompter;
use rotation::{EventLog, Rotator, StopSignal};
use selector::VendorMode;
use store::FileProfileStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Auto,
    Manual,
    Custom,
    Random,
}

#[derive(Parser)]
#[command(name = "mac-identity-rotator")]
#[command(about = "Rotate a network interface's MAC address behind believable vendor identities")]
struct Cli {
    /// Interface to rotate; prompts for everything when omitted
    #[arg(short, long)]
    interface: Option<String>,

    /// Seconds between rotations
    #[arg(long, default_value_t = DEFAULT_INTERVAL_SECS)]
    interval: u64,

    /// Number of rotations (0 = until interrupted)
    #[arg(long, default_value_t = 0)]
    count: u64,

    /// Vendor mode; defaults to manual with --vendor, custom with --oui, else auto
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Vendor for manual mode (e.g. "Intel", "Raspberry Pi")
    #[arg(long)]
    vendor: Option<String>,

    /// OUI prefix for custom mode (e.g. 00:11:22)
    #[arg(long)]
    oui: Option<Oui>,

    /// Print the commands instead of running them
    #[arg(long)]
    dry_run: bool,

    /// Leave the last rotated MAC in place when exiting
    #[arg(long)]
    no_restore: bool,

    /// Append event lines to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Show a countdown between rotations
    #[arg(long)]
    countdown: bool,

    /// SSID -> vendor store
    /// (default: $MAC_IDENTITY_PROFILES or /var/lib/mac_identity_profiles.json)
    #[arg(long)]
    profiles: Option<PathBuf>,

    /// Seconds to wait for DHCP after each change
    #[arg(long, default_value_t = DEFAULT_SETTLE_SECS)]
    settle_secs: u64,
}

impl Cli {
    fn vendor_mode(&self) -> Result<VendorMode, IdentityError> {
        let mode = self.mode.unwrap_or(match (&self.vendor, &self.oui) {
            (Some(_), _) => ModeArg::Manual,
            (None, Some(_)) => ModeArg::Custom,
            (None, None) => ModeArg::Auto,
        });

        match mode {
            ModeArg::Auto => Ok(VendorMode::Auto),
            ModeArg::Random => Ok(VendorMode::FullyRandom),
            ModeArg::Manual => {
                let name = self.vendor.clone().ok_or_else(|| {
                    IdentityError::InvalidConfig("--mode manual requires --vendor".to_string())
                })?;
                vendor::lookup(&name)?;
                Ok(VendorMode::Manual(name))
            }
            ModeArg::Custom => self.oui.map(VendorMode::CustomOui).ok_or_else(|| {
                IdentityError::InvalidConfig("--mode custom requires --oui".to_string())
            }),
        }
    }

    fn rotation_config(&self, interface: &str) -> Result<RotationConfig, IdentityError> {
        let mut config = RotationConfig::new(interface);
        config.interval = Duration::from_secs(self.interval);
        config.count = self.count;
        config.mode = self.vendor_mode()?;
        config.dry_run = self.dry_run;
        config.restore_on_exit = !self.no_restore;
        config.log_path = self.log_file.clone();
        config.countdown = self.countdown;
        config.settle_delay = Duration::from_secs(self.settle_secs);
        if let Some(path) = &self.profiles {
            config.profiles_path = path.clone();
        }
        Ok(config)
    }
}

fn run(cli: Cli) -> Result<(), IdentityError> {
    let config = match &cli.interface {
        Some(interface) => cli.rotation_config(interface)?,
        None => {
            let mut config = Prompter::stdio().rotation_config()?;
            if let Some(path) = &cli.profiles {
                config.profiles_path = path.clone();
            }
            config
        }
    };
    config.validate()?;

    if !interface_exists(&config.interface) {
        return Err(IdentityError::InterfaceNotFound(config.interface.clone()));
    }

    let tool = match LinkTool::detect() {
        Some(tool) => tool,
        None if config.dry_run => LinkTool::Ip,
        None => return Err(IdentityError::MissingTool),
    };
    info!("Using {:?} to change link addresses", tool);

    let stop = StopSignal::new();
    let handler_stop = stop.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        eprintln!("\n[!] Exiting safely");
        handler_stop.trigger();
    }) {
        warn!("Could not install interrupt handler: {}", e);
    }

    let store = FileProfileStore::open(&config.profiles_path);
    info!(
        "Loaded {} network profile(s) from {}",
        store.table().len(),
        store.path().display()
    );
    let log = EventLog::open(config.log_path.as_deref(), true);
    let env = SystemEnvironment::new(tool, config.dry_run);

    let mut rotator = Rotator::new(config, env, store, log, StdRng::from_entropy());
    let summary = rotator.run(&stop);
    info!(
        "Finished: {} rotation(s), {} failed, last score {}",
        summary.rotations,
        summary.failed,
        summary
            .last_score
            .map_or_else(|| "n/a".to_string(), |s| format!("{}/100", s))
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[-] {}", e);
            ExitCode::FAILURE
        }
    }
}
