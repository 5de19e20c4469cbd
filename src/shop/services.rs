//! Narrow interfaces onto the host engine and the sibling modules the shop
//! depends on. The shop never touches host storage directly; anything it reads
//! or writes goes through one of these traits.

use crate::shop::errors::ShopError;
use crate::shop::types::{Armor, ArmorId, CharacterRecord, SceneId, SceneRecord, Viewpoint};

/// Armor slot of the inventory module.
pub trait Inventory {
    /// The armor the character currently wears, if any.
    fn armor_for(&self, character: &CharacterRecord) -> Result<Option<Armor>, ShopError>;

    /// Replace the worn armor. Takes effect once the character is saved.
    fn set_armor_for(&self, character: &mut CharacterRecord, armor: &Armor);

    fn armor_by_id(&self, id: ArmorId) -> Result<Option<Armor>, ShopError>;

    /// All armor offered to characters of `level`, cheapest first.
    fn armors_for_level(&self, level: u32) -> Result<Vec<Armor>, ShopError>;
}

/// Gold purse of the wealth module.
pub trait Wealth {
    fn gold_for(&self, character: &CharacterRecord) -> i64;

    /// Takes effect once the character is saved.
    fn set_gold_for(&self, character: &mut CharacterRecord, gold: i64);
}

pub trait CharacterRepository {
    fn save_character(&self, character: &mut CharacterRecord) -> Result<(), ShopError>;
}

pub trait SceneRepository {
    fn find_scene(&self, id: SceneId) -> Result<Option<SceneRecord>, ShopError>;

    fn find_scenes_by_template(&self, template: &str) -> Result<Vec<SceneRecord>, ShopError>;

    /// Persist `scene`, assigning an id first if it has none. Returns the id.
    fn save_scene(&self, scene: &mut SceneRecord) -> Result<SceneId, ShopError>;

    /// Remove the scene and unlink it from its parents. Returns false if it did not exist.
    fn remove_scene(&self, id: SceneId) -> Result<bool, ShopError>;
}

pub trait ViewpointRepository {
    fn save_viewpoint(&self, viewpoint: &Viewpoint) -> Result<(), ShopError>;
}

/// Everything a shop handler needs from the host in one bound.
pub trait HostServices:
    Inventory + Wealth + CharacterRepository + SceneRepository + ViewpointRepository
{
}

impl<T> HostServices for T where
    T: Inventory + Wealth + CharacterRepository + SceneRepository + ViewpointRepository
{
}
