use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Path value that selects stdin instead of a serial device.
pub const STDIN_PATH: &str = "-";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "drum-relay",
    about = "Forward drum sensor triggers from a serial line to WebSocket clients"
)]
pub struct RelayConfig {
    /// Serial device the sensor writes trigger lines to, or `-` for stdin.
    #[arg(long, env = "DRUM_RELAY_SERIAL", default_value = "/dev/ttyACM0")]
    pub serial: PathBuf,

    /// Serial line speed (8N1, no flow control).
    #[arg(long, env = "DRUM_RELAY_BAUD", default_value_t = 9600)]
    pub baud: u32,

    /// Address the WebSocket server listens on.
    #[arg(long, env = "DRUM_RELAY_LISTEN", default_value = "127.0.0.1:8081")]
    pub listen: SocketAddr,

    /// Delay before reopening the serial device after it closed or failed.
    #[arg(long, env = "DRUM_RELAY_REOPEN_MS", default_value_t = 1000)]
    pub reopen_ms: u64,

    /// Triggers buffered per client before a slow client starts losing them.
    #[arg(long, env = "DRUM_RELAY_BUFFER", default_value_t = 64)]
    pub buffer: usize,
}

impl RelayConfig {
    #[inline]
    pub fn reopen_delay(&self) -> Duration {
        Duration::from_millis(self.reopen_ms)
    }

    #[inline]
    pub fn reads_stdin(&self) -> bool {
        self.serial.as_os_str() == STDIN_PATH
    }
}
