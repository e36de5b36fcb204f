//! Host side of the redstone bridge: configuration, logging and the drive loop that
//! owns every runtime bridge.

pub mod config;
pub mod demo;
pub mod host_loop;
pub mod logging;
pub mod registrar;

pub use config::{BridgeSettings, ConfigLoadError, HostConfig, LoggingConfig};
pub use host_loop::{HostLoop, HostedBridge, RegistrySummary};
pub use logging::init_logging;
pub use registrar::{InMemoryRegistrar, ObjectRegistrar, RegisteredObject};
