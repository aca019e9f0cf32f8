//! VPN and share management module
//!
//! External command execution, IP probing, mount detection, the status state
//! machine and its background monitor.

pub mod command;
pub mod engine;
pub mod ip_probe;
pub mod monitor;
pub mod mount;
pub mod state;

// Public re-exports
pub use engine::{EngineTimings, StatusEngine};
pub use monitor::MonitorHandle;
pub use state::Status;
