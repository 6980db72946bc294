//! Species data

pub mod bestiary;
mod species;

pub use species::{MonsterSize, Resistances, Species, SpeciesFlags, SpeciesKind};
