// src/cli.rs
use crate::types::ConnectionMode;
use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_BAUD: u32 = 115_200;

#[derive(Parser, Debug)]
#[command(name = "dsoview")]
#[command(about = "Receive and plot captures sent by a DSO138-style oscilloscope")]
#[command(long_about = None)]
pub struct Cli {
    /// Serial device the oscilloscope is attached to
    pub port: Option<String>,

    /// Serial baud rate
    #[arg(long, default_value_t = DEFAULT_BAUD)]
    pub baud: u32,

    /// Use a simulated instrument instead of a serial port
    #[arg(long, conflicts_with_all = ["port", "replay"])]
    pub simulate: bool,

    /// Read protocol lines from a text file instead of a serial port
    #[arg(long, value_name = "FILE", conflicts_with = "port")]
    pub replay: Option<PathBuf>,

    /// Do not open a window; report captures on the console
    #[arg(long)]
    pub headless: bool,

    /// With --headless, print each capture to stdout as one JSON line
    #[arg(long, requires = "headless")]
    pub json: bool,
}

impl Cli {
    pub fn connection_mode(&self) -> Result<ConnectionMode> {
        if self.simulate {
            return Ok(ConnectionMode::Simulation);
        }
        if let Some(path) = &self.replay {
            return Ok(ConnectionMode::Replay(path.clone()));
        }
        match &self.port {
            Some(port) => Ok(ConnectionMode::Hardware {
                port: port.clone(),
                baud: self.baud,
            }),
            None => bail!("no input given: pass a serial PORT, --replay FILE or --simulate"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn port_with_default_baud() {
        let cli = Cli::try_parse_from(["dsoview", "/dev/ttyUSB0"]).unwrap();
        assert_eq!(
            cli.connection_mode().unwrap(),
            ConnectionMode::Hardware {
                port: "/dev/ttyUSB0".into(),
                baud: 115_200
            }
        );
        assert!(!cli.headless);
    }
    #[test]
    fn simulate_and_replay_modes() {
        let cli = Cli::try_parse_from(["dsoview", "--simulate", "--headless"]).unwrap();
        assert_eq!(cli.connection_mode().unwrap(), ConnectionMode::Simulation);
        let cli = Cli::try_parse_from(["dsoview", "--replay", "dump.txt"]).unwrap();
        assert_eq!(
            cli.connection_mode().unwrap(),
            ConnectionMode::Replay(PathBuf::from("dump.txt"))
        );
    }
    #[test]
    fn rejects_conflicting_or_missing_inputs() {
        assert!(Cli::try_parse_from(["dsoview", "COM3", "--simulate"]).is_err());
        assert!(Cli::try_parse_from(["dsoview", "--json"]).is_err());
        let cli = Cli::try_parse_from(["dsoview"]).unwrap();
        assert!(cli.connection_mode().is_err());
    }
}
