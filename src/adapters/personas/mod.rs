//! Persona directory adapters.

mod static_directory;

pub use static_directory::StaticPersonaDirectory;
