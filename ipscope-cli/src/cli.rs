use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{parse_position, DeviceConfig};

#[derive(Parser, Debug)]
#[command(name = "ipscope", version)]
#[command(about = "Look up where an IP address or domain is located", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Print records as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (defaults to <config dir>/ipscope/config.json)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Geolocation provider base URL
    #[arg(long, global = true, env = "IPSCOPE_GEO_URL", value_name = "URL")]
    pub geo_url: Option<String>,

    /// DNS-over-HTTPS JSON endpoint
    #[arg(long, global = true, env = "IPSCOPE_DNS_URL", value_name = "URL")]
    pub dns_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Report this device position: LAT,LON[,ACCURACY]
    #[arg(
        long,
        global = true,
        value_name = "LAT,LON[,ACC]",
        value_parser = parse_position,
        allow_hyphen_values = true,
        conflicts_with = "device_error"
    )]
    pub position: Option<DeviceConfig>,

    /// Make the device fail with this reason code (1 denied, 2 unavailable, 3 timeout)
    #[arg(long, global = true, value_name = "CODE")]
    pub device_error: Option<u16>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Locate an IP address or domain
    Lookup {
        /// IP address or domain name
        query: String,
    },
    /// Locate this machine (device position first, then public IP)
    Me,
    /// Print device position updates
    Watch {
        /// Number of updates to print before stopping
        #[arg(long, default_value_t = 5)]
        count: usize,
    },
    /// Great-circle distance between two points, in kilometers
    #[command(allow_negative_numbers = true)]
    Distance {
        lat1: f64,
        lon1: f64,
        lat2: f64,
        lon2: f64,
    },
}
