//! What an item is made of, and what that means in a fight

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::ErosionKind;

/// Item material
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Material {
    Liquid = 1,
    Wax = 2,
    Veggy = 3,
    Flesh = 4,
    Paper = 5,
    Cloth = 6,
    Leather = 7,
    Wood = 8,
    Bone = 9,
    DragonHide = 10,
    #[default]
    Iron = 11,
    Metal = 12,
    Copper = 13,
    Silver = 14,
    Gold = 15,
    Platinum = 16,
    Mithril = 17,
    Plastic = 18,
    Glass = 19,
    Gemstone = 20,
    Mineral = 21,
}

impl Material {
    pub const fn is_metallic(&self) -> bool {
        matches!(
            self,
            Material::Iron
                | Material::Metal
                | Material::Copper
                | Material::Silver
                | Material::Gold
                | Material::Platinum
                | Material::Mithril
        )
    }

    pub const fn rusts(&self) -> bool {
        matches!(self, Material::Iron)
    }

    pub const fn corrodes(&self) -> bool {
        matches!(self, Material::Copper | Material::Iron)
    }

    pub const fn burns(&self) -> bool {
        matches!(
            self,
            Material::Wax
                | Material::Wood
                | Material::Paper
                | Material::Cloth
                | Material::Leather
        )
    }

    pub const fn rots(&self) -> bool {
        matches!(
            self,
            Material::Leather | Material::Wood | Material::Veggy | Material::Flesh | Material::Cloth
        )
    }

    /// Whether this material takes a given kind of erosion at all
    pub const fn suffers(&self, kind: ErosionKind) -> bool {
        match kind {
            ErosionKind::Burn => self.burns(),
            ErosionKind::Rust => self.rusts(),
            ErosionKind::Rot => self.rots(),
            ErosionKind::Corrode => self.corrodes(),
        }
    }

    /// Extra damage die rolled against a creature that hates this material
    pub const fn hatred_die(&self) -> u32 {
        match self {
            Material::Silver => 20,
            _ => 6,
        }
    }

    /// Adjective used in "sears" messages
    pub const fn adjective(&self) -> &'static str {
        match self {
            Material::Silver => "silver",
            Material::Iron => "iron",
            Material::Wood => "wooden",
            Material::Glass => "glass",
            Material::Gold => "gold",
            Material::Copper => "copper",
            Material::Bone => "bone",
            _ => "metal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iron_erodes_two_ways() {
        assert!(Material::Iron.suffers(ErosionKind::Rust));
        assert!(Material::Iron.suffers(ErosionKind::Corrode));
        assert!(!Material::Iron.suffers(ErosionKind::Burn));
    }

    #[test]
    fn test_silver_hatred_die() {
        assert_eq!(Material::Silver.hatred_die(), 20);
        assert_eq!(Material::Iron.hatred_die(), 6);
    }

    #[test]
    fn test_mithril_is_inert() {
        assert!(Material::Mithril.is_metallic());
        assert!(!Material::Mithril.rusts());
        assert!(!Material::Mithril.corrodes());
    }
}
