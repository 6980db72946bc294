//! Objects: catalog stats, item instances and inventories

mod catalog;
mod class;
mod inventory;
mod item;
mod material;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::combatant::AlignmentType;

pub use catalog::{ObjectCatalog, ObjectKind, ObjectStats, ObjectTraits, ObjectType, StaticCatalog, otyp};
pub use class::{BucStatus, ObjectClass};
pub use inventory::Inventory;
pub use item::{ErodeResult, ErosionKind, Item, ItemId};
pub use material::Material;

/// Named artifacts handed out by crowning and sacrifice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum Artifact {
    Excalibur,
    #[strum(to_string = "Vorpal Blade")]
    VorpalBlade,
    Stormbringer,
    Dragonbane,
}

impl Artifact {
    pub const fn base_type(self) -> ObjectType {
        match self {
            Artifact::Excalibur | Artifact::VorpalBlade => otyp::LONG_SWORD,
            Artifact::Stormbringer => otyp::RUNESWORD,
            Artifact::Dragonbane => otyp::LANCE,
        }
    }

    /// `None` for artifacts any god may give
    pub const fn alignment(self) -> Option<AlignmentType> {
        match self {
            Artifact::Excalibur => Some(AlignmentType::Lawful),
            Artifact::VorpalBlade => Some(AlignmentType::Neutral),
            Artifact::Stormbringer => Some(AlignmentType::Chaotic),
            Artifact::Dragonbane => None,
        }
    }
}
