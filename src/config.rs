use std::{ffi::OsString, path::PathBuf, time::Duration};

use clap::Parser;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_HOSTNAME: &str = "localhost";

/// Browse the dependency graph of a ninja build in a web browser.
#[derive(Debug, Parser)]
#[command(name = "ninja-browse", version, about)]
pub struct Args {
    /// Path to the ninja binary used to run `-t query`.
    pub ninja: PathBuf,

    /// Node to show when the root page is requested.
    pub target: String,

    /// Port for the web server to listen on.
    #[arg(short, long, env = "NINJA_BROWSE_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Hostname to bind the web server to, also used in the opened URL.
    #[arg(long, env = "NINJA_BROWSE_HOSTNAME", default_value = DEFAULT_HOSTNAME)]
    pub hostname: String,

    /// Don't open a browser window on startup.
    #[arg(long)]
    pub no_browser: bool,

    /// Build file passed to ninja as `-f`.
    #[arg(short = 'f', long, value_name = "FILE")]
    pub build_file: Option<PathBuf>,

    /// Directory passed to ninja as `-C`.
    #[arg(short = 'C', long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Give up on a query that takes longer than this many seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}

/// Everything the server needs, fixed at startup and shared read-only by all
/// requests.
#[derive(Debug, Clone)]
pub struct BrowseConfig {
    pub tool: PathBuf,
    pub default_target: String,
    pub build_file: Option<PathBuf>,
    pub directory: Option<PathBuf>,
    pub hostname: String,
    pub port: u16,
    pub open_browser: bool,
    pub query_timeout: Option<Duration>,
}

impl BrowseConfig {
    pub fn new<P: Into<PathBuf>>(tool: P, default_target: &str) -> BrowseConfig {
        BrowseConfig {
            tool: tool.into(),
            default_target: default_target.to_string(),
            build_file: None,
            directory: None,
            hostname: DEFAULT_HOSTNAME.to_string(),
            port: DEFAULT_PORT,
            open_browser: true,
            query_timeout: None,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}/", self.hostname, self.port)
    }

    /// Arguments for `tool` that print the query block for `target`.
    pub fn query_args(&self, target: &str) -> Vec<OsString> {
        let mut args = vec![];
        if let Some(dir) = &self.directory {
            args.push("-C".into());
            args.push(dir.clone().into_os_string());
        }
        if let Some(file) = &self.build_file {
            args.push("-f".into());
            args.push(file.clone().into_os_string());
        }
        args.push("-t".into());
        args.push("query".into());
        args.push(target.into());
        args
    }
}

impl From<Args> for BrowseConfig {
    fn from(args: Args) -> BrowseConfig {
        BrowseConfig {
            tool: args.ninja,
            default_target: args.target,
            build_file: args.build_file,
            directory: args.directory,
            hostname: args.hostname,
            port: args.port,
            open_browser: !args.no_browser,
            query_timeout: args.timeout_secs.map(Duration::from_secs),
        }
    }
}
