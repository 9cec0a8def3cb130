//! Registry state.
//!
//! - [`RegistryState`] - Sounds, bucket membership and mute flags of one host
//! - [`SoundDefinition`] - A loaded sound and its live instances
//! - [`RegistryHandle`] - Shared, lock-protected access to a registry

mod manager;
mod model;

pub use manager::RegistryHandle;
pub use model::{RegistryState, SoundDefinition};
