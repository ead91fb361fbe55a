//! Persistent settings: the [`data::Config`] model, its TOML file handling
//! and the `tutor set` listing.

pub mod data;
pub mod io;
pub mod printing;

#[cfg(test)]
pub mod tests;
