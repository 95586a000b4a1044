//! Interactive configuration, used when no interface is given on the command line.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{DEFAULT_INTERVAL_SECS, RotationConfig};
use crate::error::IdentityError;
use crate::identity::Oui;
use crate::selector::VendorMode;
use crate::vendor;

const BOLD: &str = "\x1b[1m";
const CYAN: &str = "\x1b[96m";
const RESET: &str = "\x1b[0m";

pub struct Prompter<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Trimmed answer; empty at end of input
    pub fn text(&mut self, label: &str) -> Result<String, IdentityError> {
        write!(self.output, "{BOLD}{CYAN}{label}{RESET} ")?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    /// Blank or unparsable answers fall back to `default`
    pub fn integer(&mut self, label: &str, default: u64) -> Result<u64, IdentityError> {
        Ok(self.text(label)?.parse().unwrap_or(default))
    }

    pub fn yes_no(&mut self, label: &str) -> Result<bool, IdentityError> {
        let answer = self.text(label)?.to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }

    fn say(&mut self, line: &str) -> Result<(), IdentityError> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    /// Vendor mode menu. An invalid manual pick falls back to Auto; an invalid
    /// custom OUI is an error.
    pub fn vendor_mode(&mut self) -> Result<VendorMode, IdentityError> {
        self.say(&format!("\n{BOLD}{CYAN}MAC Vendor Mode:{RESET}"))?;
        self.say(&format!("{BOLD}1){RESET} Auto (interface + network based) [Recommended]"))?;
        self.say(&format!("{BOLD}2){RESET} Manual vendor selection"))?;
        self.say(&format!("{BOLD}3){RESET} Custom OUI"))?;
        self.say(&format!("{BOLD}4){RESET} Fully random"))?;

        match self.text("Select option [1-4]:")?.as_str() {
            "1" => Ok(VendorMode::Auto),
            "2" => {
                self.say(&format!("\n{BOLD}{CYAN}Available Vendors:{RESET}"))?;
                for (i, profile) in vendor::all().iter().enumerate() {
                    self.say(&format!("{BOLD}{}){RESET} {}", i + 1, profile.name))?;
                }
                let pick = self.text("Choose vendor number:")?;
                let chosen = pick
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| vendor::all().get(i));
                match chosen {
                    Some(profile) => Ok(VendorMode::Manual(profile.key.to_string())),
                    None => {
                        self.say("[-] Invalid selection, falling back to AUTO mode")?;
                        Ok(VendorMode::Auto)
                    }
                }
            }
            "3" => {
                let prefix: Oui = self.text("Enter OUI (e.g. 00:11:22):")?.parse()?;
                Ok(VendorMode::CustomOui(prefix))
            }
            _ => Ok(VendorMode::FullyRandom),
        }
    }

    pub fn rotation_config(&mut self) -> Result<RotationConfig, IdentityError> {
        let interface = self.text("Interface:")?;
        let mut config = RotationConfig::new(&interface);

        let interval = self.integer(
            &format!("Interval seconds [{}]:", DEFAULT_INTERVAL_SECS),
            DEFAULT_INTERVAL_SECS,
        )?;
        config.interval = Duration::from_secs(interval);
        config.count = self.integer("Change count (0=∞):", 0)?;
        config.dry_run = self.yes_no("Dry-run? (y/n):")?;
        config.restore_on_exit = self.yes_no("Restore on exit? (y/n):")?;
        let log_path = self.text("Log file (optional):")?;
        config.log_path = (!log_path.is_empty()).then(|| PathBuf::from(log_path));
        config.countdown = self.yes_no("Show countdown? (y/n):")?;
        config.mode = self.vendor_mode()?;
        Ok(config)
    }
}
