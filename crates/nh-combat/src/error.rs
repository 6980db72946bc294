//! Errors for the fallible edges of the crate
//!
//! Game-logic failures (misses, resisted effects, immune targets) are
//! outcome values, never errors. Only ownership bookkeeping and options
//! loading can fail.

use thiserror::Error;

use crate::combatant::EquipSlot;
use crate::object::ItemId;

/// Item ownership violations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error("item {id} is already held in this inventory")]
    DuplicateItem { id: ItemId },

    #[error("{slot} slot already holds item {occupant}")]
    SlotOccupied { slot: EquipSlot, occupant: ItemId },

    #[error("no item {id} in this inventory")]
    NoSuchItem { id: ItemId },
}

/// Options file loading failures
#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("could not read options file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown option '{name}' on line {line}")]
    UnknownOption { name: String, line: usize },

    #[error("invalid value '{value}' for option '{name}'")]
    InvalidValue { name: String, value: String },

    #[error("malformed options json: {0}")]
    Json(#[from] serde_json::Error),
}
