//! Project model: configuration, discovery, and backend descriptors.

pub mod config;
pub mod descriptor;
pub mod project;

pub use config::{BuildMode, BuildOverrides, BuildSettings, ProjectConfig, CONFIG_NAME};
pub use descriptor::BackendDescriptor;
pub use project::{find_config, Project};
