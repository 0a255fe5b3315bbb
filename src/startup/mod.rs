//! Startup configuration.
//!
//! ```no_run
//! use sniffer::startup::{StartupAction, ViewerConfig};
//!
//! match ViewerConfig::load() {
//!     Ok(StartupAction::Run(config)) => println!("feed: {}", config.feed.url),
//!     Ok(_) => {}
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

pub mod config;

pub use config::{default_log_file, StartupAction, ViewerConfig, USAGE};
