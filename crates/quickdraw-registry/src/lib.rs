//! Per-channel session registry for Quickdraw.
//!
//! Maps each text channel to at most one running game session. The map
//! is owned, explicit state with a clear lifecycle — create, get, remove
//! — never process-wide globals. Sessions report their own end on a
//! channel the registry drains, so finished games disappear from the map
//! without callback plumbing.

mod error;
mod registry;

pub use error::RegistryError;
pub use registry::SessionRegistry;
