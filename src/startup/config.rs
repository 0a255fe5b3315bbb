//! Viewer configuration from defaults, environment and command line.
//!
//! Precedence, lowest to highest: built-in defaults, `SNIFFER_*` environment
//! variables, command-line flags.

use std::path::PathBuf;
use std::time::Duration;

use crate::adapters::DEFAULT_JQ_TIMEOUT;
use crate::error::ConfigError;
use crate::store::DISPLAY_WINDOW;
use crate::websocket::WsClientConfig;

pub const ENV_URL: &str = "SNIFFER_URL";
pub const ENV_JQ: &str = "SNIFFER_JQ";
pub const ENV_JQ_TIMEOUT_MS: &str = "SNIFFER_JQ_TIMEOUT_MS";
pub const ENV_LOG_FILE: &str = "SNIFFER_LOG_FILE";

pub const USAGE: &str = "\
Usage: sniffer [OPTIONS]

Live viewer for a packet sniffer's websocket feed.

Options:
  --url <URL>         Feed endpoint [env: SNIFFER_URL] [default: ws://127.0.0.1:8080/ws]
  --jq <COMMAND>      Filter evaluator command line [env: SNIFFER_JQ] [default: jq]
  --log-file <PATH>   Log destination [env: SNIFFER_LOG_FILE]
  -V, --version       Print version and exit
  -h, --help          Print this help and exit

Environment:
  SNIFFER_JQ_TIMEOUT_MS   Evaluation timeout in milliseconds [default: 10000]
  SNIFFER_LOG             Log filter directives [default: info]
";

/// Everything the binary needs to start the viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub feed: WsClientConfig,
    /// Evaluator command line, split with shell-word rules
    pub jq_command: String,
    pub jq_timeout: Duration,
    /// `None` when no cache directory is known and none was given
    pub log_file: Option<PathBuf>,
    pub window: usize,
}

/// What `main` should do.
#[derive(Debug, Clone, PartialEq)]
pub enum StartupAction {
    Run(ViewerConfig),
    PrintVersion,
    PrintHelp,
}

/// `<cache dir>/sniffer/sniffer.log`
pub fn default_log_file() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("sniffer").join("sniffer.log"))
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            feed: WsClientConfig::default(),
            jq_command: "jq".to_string(),
            jq_timeout: DEFAULT_JQ_TIMEOUT,
            log_file: default_log_file(),
            window: DISPLAY_WINDOW,
        }
    }
}

impl ViewerConfig {
    /// Build from the process arguments and environment.
    pub fn load() -> Result<StartupAction, ConfigError> {
        Self::from_env_and_args(std::env::args(), |key| std::env::var(key).ok())
    }

    /// Build from explicit inputs. `args` includes the program name.
    pub fn from_env_and_args<I, F>(args: I, env: F) -> Result<StartupAction, ConfigError>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_env(env)?;

        let mut args = args.into_iter().skip(1);
        while let Some(arg) = args.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
                _ => (arg.clone(), None),
            };

            match flag.as_str() {
                "--version" | "-V" => return Ok(StartupAction::PrintVersion),
                "--help" | "-h" => return Ok(StartupAction::PrintHelp),
                "--url" | "--jq" | "--log-file" => {
                    let value = match inline {
                        Some(value) => value,
                        None => args
                            .next()
                            .ok_or_else(|| ConfigError::MissingValue { flag: flag.clone() })?,
                    };
                    config.set_flag(&flag, value)?;
                }
                _ => return Err(ConfigError::UnknownArgument { argument: arg }),
            }
        }

        Ok(StartupAction::Run(config))
    }

    fn apply_env<F>(&mut self, env: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = env(ENV_URL).filter(|v| !v.is_empty()) {
            self.feed.url = url;
        }
        if let Some(jq) = env(ENV_JQ).filter(|v| !v.trim().is_empty()) {
            self.jq_command = jq;
        }
        if let Some(raw) = env(ENV_JQ_TIMEOUT_MS) {
            let millis = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|&ms| ms > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: ENV_JQ_TIMEOUT_MS.to_string(),
                    value: raw.clone(),
                })?;
            self.jq_timeout = Duration::from_millis(millis);
        }
        if let Some(path) = env(ENV_LOG_FILE).filter(|v| !v.is_empty()) {
            self.log_file = Some(PathBuf::from(path));
        }
        Ok(())
    }

    fn set_flag(&mut self, flag: &str, value: String) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: flag.to_string(),
                value,
            });
        }
        match flag {
            "--url" => self.feed.url = value,
            "--jq" => self.jq_command = value,
            "--log-file" => self.log_file = Some(PathBuf::from(value)),
            _ => {
                return Err(ConfigError::UnknownArgument {
                    argument: flag.to_string(),
                })
            }
        }
        Ok(())
    }
}
