//! Core types, error taxonomy, and the chain-source trait for the
//! market-mood PCR sentiment engine.
//!
//! Everything that crosses a crate boundary lives here: the option-chain
//! data model, the `ChainSource` collaborator trait, the source error
//! taxonomy, and configuration.

pub mod config;
pub mod config_loader;
pub mod error;
pub mod traits;
pub mod types;

pub use config::{AppConfig, BatchConfig, SourceConfig};
pub use config_loader::ConfigLoader;
pub use error::{ChainSourceError, SourceResult};
pub use traits::ChainSource;
pub use types::{OptionChainSnapshot, OptionContractRow, OptionRight};
