//! Worn and wielded items
//!
//! Each slot owns at most one [`Item`]. Taking an item out of a slot hands
//! ownership to the caller; nothing else can reach it until it is put back.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

use crate::InventoryError;
use crate::object::{Item, ItemId};

/// Equipment slot
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumCount,
)]
#[repr(u8)]
pub enum EquipSlot {
    #[strum(to_string = "weapon")]
    Weapon,
    #[strum(to_string = "alternate weapon")]
    SwapWeapon,
    #[strum(to_string = "body armor")]
    Body,
    #[strum(to_string = "shirt")]
    Shirt,
    #[strum(to_string = "cloak")]
    Cloak,
    #[strum(to_string = "helmet")]
    Helmet,
    #[strum(to_string = "gloves")]
    Gloves,
    #[strum(to_string = "boots")]
    Boots,
    #[strum(to_string = "shield")]
    Shield,
    #[strum(to_string = "amulet")]
    Amulet,
    #[strum(to_string = "left ring")]
    LeftRing,
    #[strum(to_string = "right ring")]
    RightRing,
    #[strum(to_string = "blindfold")]
    Blindfold,
}

impl EquipSlot {
    /// Slots that count as armor
    pub const ARMOR: [EquipSlot; 7] = [
        EquipSlot::Body,
        EquipSlot::Cloak,
        EquipSlot::Helmet,
        EquipSlot::Gloves,
        EquipSlot::Boots,
        EquipSlot::Shield,
        EquipSlot::Shirt,
    ];

    pub const RINGS: [EquipSlot; 2] = [EquipSlot::LeftRing, EquipSlot::RightRing];

    pub const fn is_armor(&self) -> bool {
        matches!(
            self,
            EquipSlot::Body
                | EquipSlot::Cloak
                | EquipSlot::Helmet
                | EquipSlot::Gloves
                | EquipSlot::Boots
                | EquipSlot::Shield
                | EquipSlot::Shirt
        )
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// What a combatant is wearing and wielding
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    slots: [Option<Item>; EquipSlot::COUNT],
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipSlot) -> Option<&Item> {
        self.slots[slot.index()].as_ref()
    }

    pub fn get_mut(&mut self, slot: EquipSlot) -> Option<&mut Item> {
        self.slots[slot.index()].as_mut()
    }

    pub fn is_empty(&self, slot: EquipSlot) -> bool {
        self.slots[slot.index()].is_none()
    }

    /// Put an item into an empty slot
    pub fn equip(&mut self, slot: EquipSlot, item: Item) -> Result<(), InventoryError> {
        if let Some(occupant) = self.get(slot) {
            return Err(InventoryError::SlotOccupied {
                slot,
                occupant: occupant.id,
            });
        }
        if self.contains(item.id) {
            return Err(InventoryError::DuplicateItem { id: item.id });
        }
        self.slots[slot.index()] = Some(item);
        Ok(())
    }

    /// Remove and return whatever is in a slot
    pub fn take(&mut self, slot: EquipSlot) -> Option<Item> {
        self.slots[slot.index()].take()
    }

    /// Return an item taken with [`take`](Self::take). If the slot has been
    /// filled in the meantime the item is handed back.
    pub fn put_back(&mut self, slot: EquipSlot, item: Option<Item>) -> Option<Item> {
        match item {
            Some(item) if self.is_empty(slot) => {
                self.slots[slot.index()] = Some(item);
                None
            }
            other => other,
        }
    }

    /// Remove an item by id, wherever it is worn
    pub fn unequip(&mut self, id: ItemId) -> Result<Item, InventoryError> {
        let slot = self.slot_of(id).ok_or(InventoryError::NoSuchItem { id })?;
        self.take(slot).ok_or(InventoryError::NoSuchItem { id })
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.slot_of(id).is_some()
    }

    pub fn slot_of(&self, id: ItemId) -> Option<EquipSlot> {
        EquipSlot::iter().find(|slot| self.get(*slot).is_some_and(|item| item.id == id))
    }

    /// Occupied slots in slot order
    pub fn iter(&self) -> impl Iterator<Item = (EquipSlot, &Item)> {
        EquipSlot::iter().filter_map(|slot| self.get(slot).map(|item| (slot, item)))
    }

    /// Worn armor pieces
    pub fn armor(&self) -> impl Iterator<Item = (EquipSlot, &Item)> {
        self.iter().filter(|(slot, _)| slot.is_armor())
    }

    /// Hand over every worn item
    pub fn take_all(&mut self) -> Vec<Item> {
        self.slots.iter_mut().filter_map(Option::take).collect()
    }

    pub fn weapon(&self) -> Option<&Item> {
        self.get(EquipSlot::Weapon)
    }

    /// Wearing anything on the body, cloak included
    pub fn wears_body_armor(&self) -> bool {
        !self.is_empty(EquipSlot::Body) || !self.is_empty(EquipSlot::Cloak)
    }
}
