use std::env;
use std::io::{self, Write};
use std::net::{IpAddr, Ipv4Addr};
use std::process::{Command, Stdio};

use log::debug;
use pnet::datalink::{self, NetworkInterface};
use pnet::util::MacAddr;

use super::{Directive, NetworkEnvironment};
use crate::error::IdentityError;

/// Link configuration tool available on this host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTool {
    Ip,
    Ifconfig,
}

impl LinkTool {
    /// Prefer iproute2, fall back to net-tools
    pub fn detect() -> Option<Self> {
        if on_path("ip") {
            Some(LinkTool::Ip)
        } else if on_path("ifconfig") {
            Some(LinkTool::Ifconfig)
        } else {
            None
        }
    }

    /// Down, set address, up
    fn mac_commands(&self, interface: &str, mac: &MacAddr) -> [Vec<String>; 3] {
        let mac = mac.to_string();
        let cmds = match self {
            LinkTool::Ip => [
                vec!["ip", "link", "set", interface, "down"],
                vec!["ip", "link", "set", interface, "address", mac.as_str()],
                vec!["ip", "link", "set", interface, "up"],
            ],
            LinkTool::Ifconfig => [
                vec!["ifconfig", interface, "down"],
                vec!["ifconfig", interface, "ether", mac.as_str()],
                vec!["ifconfig", interface, "up"],
            ],
        };
        cmds.map(|cmd| cmd.into_iter().map(String::from).collect())
    }
}

fn on_path(program: &str) -> bool {
    env::var_os("PATH")
        .map(|paths| env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
        .unwrap_or(false)
}

fn find_interface(name: &str) -> Option<NetworkInterface> {
    datalink::interfaces().into_iter().find(|iface| iface.name == name)
}

pub fn interface_exists(name: &str) -> bool {
    find_interface(name).is_some()
}

/// Runs the platform commands, or only reports them in dry-run mode
pub struct SystemEnvironment<W: Write = io::Stdout> {
    tool: LinkTool,
    dry_run: bool,
    /// Where dry-run commands are reported
    out: W,
}

impl SystemEnvironment {
    pub fn new(tool: LinkTool, dry_run: bool) -> Self {
        Self::with_output(tool, dry_run, io::stdout())
    }
}

impl<W: Write> SystemEnvironment<W> {
    pub fn with_output(tool: LinkTool, dry_run: bool, out: W) -> Self {
        Self { tool, dry_run, out }
    }

    fn run(&mut self, cmd: &[String]) -> Result<(), IdentityError> {
        let line = cmd.join(" ");
        if self.dry_run {
            writeln!(self.out, "[DRY] {}", line)?;
            return Ok(());
        }

        let (program, args) = cmd
            .split_first()
            .ok_or_else(|| IdentityError::CommandFailure("empty command".to_string()))?;
        debug!("Running {}", line);
        let status = Command::new(program)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| IdentityError::CommandFailure(format!("{}: {}", line, e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(IdentityError::CommandFailure(format!("{} ({})", line, status)))
        }
    }

    fn set_mac(&mut self, interface: &str, mac: &MacAddr) -> Result<(), IdentityError> {
        let [down, set, up] = self.tool.mac_commands(interface, mac);

        self.run(&down)?;
        if let Err(e) = self.run(&set) {
            // Leave the link up even when the address change is refused
            let _ = self.run(&up);
            return Err(e);
        }
        self.run(&up)
    }
}

impl<W: Write> NetworkEnvironment for SystemEnvironment<W> {
    fn apply(&mut self, directive: &Directive) -> Result<(), IdentityError> {
        match directive {
            Directive::Mac { interface, mac } => self.set_mac(interface, mac),
            Directive::Hostname(hostname) => self.run(&[
                "hostnamectl".to_string(),
                "set-hostname".to_string(),
                hostname.clone(),
            ]),
            Directive::Ttl(ttl) => self.run(&[
                "sysctl".to_string(),
                "-w".to_string(),
                format!("net.ipv4.ip_default_ttl={}", ttl),
            ]),
        }
    }

    fn current_ssid(&self) -> Option<String> {
        let output = Command::new("iwgetid")
            .arg("-r")
            .stderr(Stdio::null())
            .output()
            .ok()?;
        let ssid = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!ssid.is_empty()).then_some(ssid)
    }

    fn current_ip(&self, interface: &str) -> Option<Ipv4Addr> {
        find_interface(interface)?.ips.iter().find_map(|ip| match ip.ip() {
            IpAddr::V4(ipv4) => Some(ipv4),
            IpAddr::V6(_) => None,
        })
    }

    fn current_mac(&self, interface: &str) -> Option<MacAddr> {
        find_interface(interface)?.mac.filter(|mac| !mac.is_zero())
    }
}
