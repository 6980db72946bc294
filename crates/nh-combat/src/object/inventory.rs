//! Carried items
//!
//! Worn items live in [`crate::combatant::Equipment`]; everything else a
//! combatant carries lives here.

use serde::{Deserialize, Serialize};

use super::{Item, ItemId};
use crate::InventoryError;

/// An ordered bag of items keyed by id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<Item>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of an item. An id may only be held once.
    pub fn add(&mut self, item: Item) -> Result<(), InventoryError> {
        if self.contains(item.id) {
            return Err(InventoryError::DuplicateItem { id: item.id });
        }
        self.items.push(item);
        Ok(())
    }

    pub fn remove(&mut self, id: ItemId) -> Result<Item, InventoryError> {
        let idx = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(InventoryError::NoSuchItem { id })?;
        Ok(self.items.remove(idx))
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Item> {
        self.items.iter_mut()
    }

    /// First item matching a predicate
    pub fn find(&self, mut pred: impl FnMut(&Item) -> bool) -> Option<&Item> {
        self.items.iter().find(|item| pred(item))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_weight(&self) -> u32 {
        self.items.iter().map(Item::total_weight).sum()
    }

    /// Hand over every item, leaving the inventory empty
    pub fn take_all(&mut self) -> Vec<Item> {
        std::mem::take(&mut self.items)
    }

    /// Split one unit off a stack, or remove the item if it is the last
    pub fn take_one(&mut self, id: ItemId, new_id: ItemId) -> Result<Item, InventoryError> {
        let item = self.get_mut(id).ok_or(InventoryError::NoSuchItem { id })?;
        if item.quantity > 1 {
            item.quantity -= 1;
            let mut one = item.clone();
            one.id = new_id;
            one.quantity = 1;
            return Ok(one);
        }
        self.remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{StaticCatalog, otyp};

    #[test]
    fn test_duplicate_rejected() {
        let cat = StaticCatalog::standard();
        let mut inv = Inventory::new();
        let dagger = Item::from_catalog(ItemId(3), otyp::DAGGER, &cat);
        inv.add(dagger.clone()).unwrap();
        assert_eq!(
            inv.add(dagger),
            Err(InventoryError::DuplicateItem { id: ItemId(3) })
        );
        assert_eq!(inv.len(), 1);
    }

    #[test]
    fn test_remove_missing() {
        let mut inv = Inventory::new();
        assert_eq!(
            inv.remove(ItemId(9)),
            Err(InventoryError::NoSuchItem { id: ItemId(9) })
        );
    }

    #[test]
    fn test_take_one_splits_stack() {
        let cat = StaticCatalog::standard();
        let mut inv = Inventory::new();
        inv.add(Item::from_catalog(ItemId(1), otyp::ARROW, &cat).with_quantity(3))
            .unwrap();
        let one = inv.take_one(ItemId(1), ItemId(50)).unwrap();
        assert_eq!(one.quantity, 1);
        assert_eq!(one.id, ItemId(50));
        assert_eq!(inv.get(ItemId(1)).map(|i| i.quantity), Some(2));
    }
}
