pub mod adapters;
pub mod config;
pub mod core;
pub mod dom;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{Settings, TomlConfig};

pub use crate::adapters::{FixturePostSource, HttpPostSource};
pub use crate::core::{controller::PageController, engine::ViewerEngine};
pub use crate::dom::Document;
pub use crate::utils::error::{Result, ViewerError};
