use std::path::{Path, PathBuf};

use log::debug;
use sled::IVec;

use crate::shop::errors::ShopError;
use crate::shop::seed_loader::{default_armor_catalog, load_armor_from_json};
use crate::shop::services::{
    CharacterRepository, Inventory, SceneRepository, ViewpointRepository, Wealth,
};
use crate::shop::types::{
    Armor, ArmorId, CharacterRecord, ModuleRecord, SceneId, SceneRecord, Viewpoint,
    ARMOR_SCHEMA_VERSION, CHARACTER_SCHEMA_VERSION, SCENE_SCHEMA_VERSION,
};

const TREE_PRIMARY: &str = "armorshop";
const TREE_ARMOR: &str = "armorshop_armor";
const TREE_MODULES: &str = "armorshop_modules";

#[derive(Debug, Clone)]
enum ArmorSeed {
    None,
    Default,
    File(PathBuf),
}

/// Helper builder so tests can easily create throwaway stores with custom paths.
pub struct ShopStoreBuilder {
    path: PathBuf,
    armor_seed: ArmorSeed,
}

impl ShopStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            armor_seed: ArmorSeed::Default,
        }
    }

    /// Opt out of seeding the default armor catalog (useful for targeted tests).
    pub fn without_armor_seed(mut self) -> Self {
        self.armor_seed = ArmorSeed::None;
        self
    }

    /// Seed from a JSON catalog instead of the built-in one.
    pub fn with_armor_seed_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.armor_seed = ArmorSeed::File(path.into());
        self
    }

    pub fn open(self) -> Result<ShopStore, ShopError> {
        ShopStore::open_with_seed(self.path, self.armor_seed)
    }
}

/// Sled-backed stand-in for the host's persistence: characters, scenes,
/// viewpoints, the armor catalog and module records.
pub struct ShopStore {
    db: sled::Db,
    primary: sled::Tree,
    armor: sled::Tree,
    modules: sled::Tree,
}

impl ShopStore {
    /// Open (or create) the store rooted at `path`, seeding the default armor
    /// catalog if no armor exists yet.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ShopError> {
        Self::open_with_seed(path, ArmorSeed::Default)
    }

    fn open_with_seed<P: AsRef<Path>>(path: P, seed: ArmorSeed) -> Result<Self, ShopError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let primary = db.open_tree(TREE_PRIMARY)?;
        let armor = db.open_tree(TREE_ARMOR)?;
        let modules = db.open_tree(TREE_MODULES)?;
        let store = Self {
            db,
            primary,
            armor,
            modules,
        };

        if store.armor.is_empty() {
            let catalog = match seed {
                ArmorSeed::None => Vec::new(),
                ArmorSeed::Default => default_armor_catalog(),
                ArmorSeed::File(file) => load_armor_from_json(file)?,
            };
            for a in catalog {
                store.put_armor(a)?;
            }
        }

        Ok(store)
    }

    fn character_key(id: &str) -> Vec<u8> {
        format!("characters:{}", id.to_ascii_lowercase()).into_bytes()
    }

    fn scene_key(id: SceneId) -> Vec<u8> {
        format!("scenes:{:020}", id).into_bytes()
    }

    fn viewpoint_key(owner: &str) -> Vec<u8> {
        format!("viewpoints:{}", owner.to_ascii_lowercase()).into_bytes()
    }

    fn armor_key(id: ArmorId) -> Vec<u8> {
        format!("armor:{:020}", id).into_bytes()
    }

    fn module_key(name: &str) -> Vec<u8> {
        format!("modules:{}", name).into_bytes()
    }

    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, ShopError> {
        Ok(bincode::serialize(value)?)
    }

    fn deserialize<T: serde::de::DeserializeOwned>(bytes: IVec) -> Result<T, ShopError> {
        Ok(bincode::deserialize::<T>(&bytes)?)
    }

    fn check_version(entity: &'static str, expected: u8, found: u8) -> Result<(), ShopError> {
        if found != expected {
            return Err(ShopError::SchemaMismatch {
                entity,
                expected,
                found,
            });
        }
        Ok(())
    }

    /// Insert or update a character record.
    pub fn put_character(&self, mut character: CharacterRecord) -> Result<(), ShopError> {
        character.schema_version = CHARACTER_SCHEMA_VERSION;
        let key = Self::character_key(&character.id);
        let bytes = Self::serialize(&character)?;
        self.primary.insert(key, bytes)?;
        self.primary.flush()?;
        Ok(())
    }

    pub fn get_character(&self, id: &str) -> Result<CharacterRecord, ShopError> {
        let Some(bytes) = self.primary.get(Self::character_key(id))? else {
            return Err(ShopError::NotFound(format!("character: {}", id)));
        };
        let record: CharacterRecord = Self::deserialize(bytes)?;
        Self::check_version("character", CHARACTER_SCHEMA_VERSION, record.schema_version)?;
        Ok(record)
    }

    pub fn get_scene(&self, id: SceneId) -> Result<SceneRecord, ShopError> {
        self.find_scene(id)?
            .ok_or_else(|| ShopError::NotFound(format!("scene: {}", id)))
    }

    /// All scene ids in ascending order.
    pub fn list_scene_ids(&self) -> Result<Vec<SceneId>, ShopError> {
        let mut ids = Vec::new();
        for entry in self.primary.scan_prefix(b"scenes:") {
            let (key, _) = entry?;
            let text = String::from_utf8_lossy(&key);
            if let Some(id) = text.strip_prefix("scenes:").and_then(|s| s.parse().ok()) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    fn scenes(&self) -> Result<Vec<SceneRecord>, ShopError> {
        let mut scenes = Vec::new();
        for entry in self.primary.scan_prefix(b"scenes:") {
            let (_, bytes) = entry?;
            let record: SceneRecord = Self::deserialize(bytes)?;
            Self::check_version("scene", SCENE_SCHEMA_VERSION, record.schema_version)?;
            scenes.push(record);
        }
        Ok(scenes)
    }

    pub fn get_viewpoint(&self, owner: &str) -> Result<Viewpoint, ShopError> {
        let Some(bytes) = self.primary.get(Self::viewpoint_key(owner))? else {
            return Err(ShopError::NotFound(format!("viewpoint: {}", owner)));
        };
        Self::deserialize(bytes)
    }

    /// Insert or update a catalog entry.
    pub fn put_armor(&self, mut armor: Armor) -> Result<(), ShopError> {
        armor.schema_version = ARMOR_SCHEMA_VERSION;
        let key = Self::armor_key(armor.id);
        let bytes = Self::serialize(&armor)?;
        self.armor.insert(key, bytes)?;
        self.armor.flush()?;
        Ok(())
    }

    /// The whole catalog in id order.
    pub fn list_armor(&self) -> Result<Vec<Armor>, ShopError> {
        let mut all = Vec::new();
        for entry in self.armor.iter() {
            let (_, bytes) = entry?;
            let record: Armor = Self::deserialize(bytes)?;
            Self::check_version("armor", ARMOR_SCHEMA_VERSION, record.schema_version)?;
            all.push(record);
        }
        Ok(all)
    }

    /// Module records carry an open property bag, so they are stored as JSON.
    pub fn put_module(&self, module: &ModuleRecord) -> Result<(), ShopError> {
        let bytes = serde_json::to_vec(module)?;
        self.modules.insert(Self::module_key(&module.name), bytes)?;
        self.modules.flush()?;
        Ok(())
    }

    /// The stored record for `name`, or a fresh one if the module was never installed.
    pub fn get_module(&self, name: &str) -> Result<ModuleRecord, ShopError> {
        match self.modules.get(Self::module_key(name))? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(ModuleRecord::new(name)),
        }
    }

    pub fn flush(&self) -> Result<(), ShopError> {
        self.db.flush()?;
        Ok(())
    }
}

impl Inventory for ShopStore {
    fn armor_for(&self, character: &CharacterRecord) -> Result<Option<Armor>, ShopError> {
        match character.armor_id {
            Some(id) => {
                let armor = self.armor_by_id(id)?;
                if armor.is_none() {
                    debug!("character {} wears unknown armor id={}", character.id, id);
                }
                Ok(armor)
            }
            None => Ok(None),
        }
    }

    fn set_armor_for(&self, character: &mut CharacterRecord, armor: &Armor) {
        character.armor_id = Some(armor.id);
    }

    fn armor_by_id(&self, id: ArmorId) -> Result<Option<Armor>, ShopError> {
        let Some(bytes) = self.armor.get(Self::armor_key(id))? else {
            return Ok(None);
        };
        let record: Armor = Self::deserialize(bytes)?;
        Self::check_version("armor", ARMOR_SCHEMA_VERSION, record.schema_version)?;
        Ok(Some(record))
    }

    /// Armor is offered from its level upward.
    fn armors_for_level(&self, level: u32) -> Result<Vec<Armor>, ShopError> {
        let mut offered: Vec<Armor> = self
            .list_armor()?
            .into_iter()
            .filter(|a| a.level <= level)
            .collect();
        offered.sort_by(|a, b| a.cost.cmp(&b.cost).then(a.id.cmp(&b.id)));
        Ok(offered)
    }
}

impl Wealth for ShopStore {
    fn gold_for(&self, character: &CharacterRecord) -> i64 {
        character.gold
    }

    fn set_gold_for(&self, character: &mut CharacterRecord, gold: i64) {
        character.gold = gold;
    }
}

impl CharacterRepository for ShopStore {
    fn save_character(&self, character: &mut CharacterRecord) -> Result<(), ShopError> {
        character.touch();
        self.put_character(character.clone())
    }
}

impl SceneRepository for ShopStore {
    fn find_scene(&self, id: SceneId) -> Result<Option<SceneRecord>, ShopError> {
        let Some(bytes) = self.primary.get(Self::scene_key(id))? else {
            return Ok(None);
        };
        let record: SceneRecord = Self::deserialize(bytes)?;
        Self::check_version("scene", SCENE_SCHEMA_VERSION, record.schema_version)?;
        Ok(Some(record))
    }

    fn find_scenes_by_template(&self, template: &str) -> Result<Vec<SceneRecord>, ShopError> {
        Ok(self
            .scenes()?
            .into_iter()
            .filter(|s| s.template == template)
            .collect())
    }

    fn save_scene(&self, scene: &mut SceneRecord) -> Result<SceneId, ShopError> {
        if !scene.is_persisted() {
            // sled ids start at zero, which marks an unsaved scene.
            scene.id = self.db.generate_id()? + 1;
        }
        scene.schema_version = SCENE_SCHEMA_VERSION;
        let bytes = Self::serialize(&*scene)?;
        self.primary.insert(Self::scene_key(scene.id), bytes)?;
        self.primary.flush()?;
        Ok(scene.id)
    }

    fn remove_scene(&self, id: SceneId) -> Result<bool, ShopError> {
        let Some(scene) = self.find_scene(id)? else {
            return Ok(false);
        };
        for parent_id in &scene.parents {
            if let Some(mut parent) = self.find_scene(*parent_id)? {
                parent.children.retain(|c| *c != id);
                self.save_scene(&mut parent)?;
            }
        }
        self.primary.remove(Self::scene_key(id))?;
        self.primary.flush()?;
        Ok(true)
    }
}

impl ViewpointRepository for ShopStore {
    fn save_viewpoint(&self, viewpoint: &Viewpoint) -> Result<(), ShopError> {
        let bytes = Self::serialize(viewpoint)?;
        self.primary
            .insert(Self::viewpoint_key(&viewpoint.owner), bytes)?;
        self.primary.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn opens_with_default_catalog() {
        let dir = TempDir::new().unwrap();
        let store = ShopStore::open(dir.path()).unwrap();
        assert_eq!(store.list_armor().unwrap().len(), 15);
        assert_eq!(store.armors_for_level(1).unwrap().len(), 1);
        assert_eq!(store.armors_for_level(3).unwrap().len(), 3);
    }

    #[test]
    fn scene_ids_are_never_zero() {
        let dir = TempDir::new().unwrap();
        let store = ShopStoreBuilder::new(dir.path())
            .without_armor_seed()
            .open()
            .unwrap();
        let mut scene = SceneRecord::new("t", "A", "");
        let id = store.save_scene(&mut scene).unwrap();
        assert_ne!(id, 0);
        assert_eq!(scene.id, id);
        assert_eq!(store.list_scene_ids().unwrap(), vec![id]);
    }

    #[test]
    fn removing_scene_unlinks_parent() {
        let dir = TempDir::new().unwrap();
        let store = ShopStoreBuilder::new(dir.path())
            .without_armor_seed()
            .open()
            .unwrap();
        let mut parent = SceneRecord::new("village", "Village", "");
        let parent_id = store.save_scene(&mut parent).unwrap();
        let mut child = SceneRecord::new("shop", "Shop", "").with_parent(parent_id);
        let child_id = store.save_scene(&mut child).unwrap();
        parent.children.push(child_id);
        store.save_scene(&mut parent).unwrap();

        assert!(store.remove_scene(child_id).unwrap());
        assert!(store.get_scene(parent_id).unwrap().children.is_empty());
        assert!(!store.remove_scene(child_id).unwrap());
    }
}
