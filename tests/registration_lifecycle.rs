/// Integration tests for module install/uninstall
/// Tests: villages found → shop + buy scenes attached → ids recorded → removed on uninstall
use std::cell::Cell;

use tempfile::TempDir;

use armorshop::config::ShopConfig;
use armorshop::shop::{
    recorded_scene_ids, Armor, ArmorId, ArmorShopModule, CharacterRecord, CharacterRepository,
    Inventory, ModuleRecord, SceneId, SceneRecord, SceneRepository, ShopError, ShopStore,
    ShopStoreBuilder, Viewpoint, ViewpointRepository, Wealth, BUY_TEMPLATE, MODULE,
    SCENES_PROPERTY, SHOP_TEMPLATE,
};

const VILLAGE: &str = "lotgd/module-village/village";

fn empty_store(dir: &TempDir) -> ShopStore {
    ShopStoreBuilder::new(dir.path())
        .without_armor_seed()
        .open()
        .expect("store")
}

fn add_scene(store: &ShopStore, template: &str, title: &str) -> u64 {
    let mut scene = SceneRecord::new(template, title, "");
    store.save_scene(&mut scene).expect("save scene")
}

/// Store whose `fail_on`-th scene save (1-based) errors out.
struct FlakyStore<'a> {
    inner: &'a ShopStore,
    saves: Cell<usize>,
    fail_on: usize,
}

impl Inventory for FlakyStore<'_> {
    fn armor_for(&self, character: &CharacterRecord) -> Result<Option<Armor>, ShopError> {
        self.inner.armor_for(character)
    }
    fn set_armor_for(&self, character: &mut CharacterRecord, armor: &Armor) {
        self.inner.set_armor_for(character, armor)
    }
    fn armor_by_id(&self, id: ArmorId) -> Result<Option<Armor>, ShopError> {
        self.inner.armor_by_id(id)
    }
    fn armors_for_level(&self, level: u32) -> Result<Vec<Armor>, ShopError> {
        self.inner.armors_for_level(level)
    }
}

impl Wealth for FlakyStore<'_> {
    fn gold_for(&self, character: &CharacterRecord) -> i64 {
        self.inner.gold_for(character)
    }
    fn set_gold_for(&self, character: &mut CharacterRecord, gold: i64) {
        self.inner.set_gold_for(character, gold)
    }
}

impl CharacterRepository for FlakyStore<'_> {
    fn save_character(&self, character: &mut CharacterRecord) -> Result<(), ShopError> {
        self.inner.save_character(character)
    }
}

impl SceneRepository for FlakyStore<'_> {
    fn find_scene(&self, id: SceneId) -> Result<Option<SceneRecord>, ShopError> {
        self.inner.find_scene(id)
    }
    fn find_scenes_by_template(&self, template: &str) -> Result<Vec<SceneRecord>, ShopError> {
        self.inner.find_scenes_by_template(template)
    }
    fn save_scene(&self, scene: &mut SceneRecord) -> Result<SceneId, ShopError> {
        let n = self.saves.get() + 1;
        self.saves.set(n);
        if n == self.fail_on {
            return Err(ShopError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )));
        }
        self.inner.save_scene(scene)
    }
    fn remove_scene(&self, id: SceneId) -> Result<bool, ShopError> {
        self.inner.remove_scene(id)
    }
}

impl ViewpointRepository for FlakyStore<'_> {
    fn save_viewpoint(&self, viewpoint: &Viewpoint) -> Result<(), ShopError> {
        self.inner.save_viewpoint(viewpoint)
    }
}

#[test]
fn test_install_with_two_villages() {
    let dir = TempDir::new().expect("tempdir");
    let store = empty_store(&dir);
    let degolburg = add_scene(&store, VILLAGE, "Degolburg");
    let romar = add_scene(&store, VILLAGE, "Romar");
    let forest = add_scene(&store, "lotgd/module-forest/forest", "Forest");

    let shop = ArmorShopModule::new(ShopConfig::default()).expect("module");
    let mut module = ModuleRecord::new(MODULE);
    let created = shop.on_register(&store, &mut module).expect("install");

    assert_eq!(created.len(), 4);
    assert_eq!(recorded_scene_ids(&module).expect("ids"), created);
    assert_eq!(store.list_scene_ids().expect("list").len(), 7);

    for village_id in [degolburg, romar] {
        let village = store.get_scene(village_id).expect("village");
        assert_eq!(village.children.len(), 1);
        let shop_scene = store.get_scene(village.children[0]).expect("shop");
        assert_eq!(shop_scene.template, SHOP_TEMPLATE);
        assert_eq!(shop_scene.parents, vec![village_id]);
        assert_eq!(shop_scene.children.len(), 1);
        let buy = store.get_scene(shop_scene.children[0]).expect("buy");
        assert_eq!(buy.template, BUY_TEMPLATE);
        assert_eq!(buy.parents, vec![shop_scene.id]);
    }
    assert!(store.get_scene(forest).expect("forest").children.is_empty());

    let removed = shop.on_unregister(&store, &mut module).expect("uninstall");
    assert_eq!(removed, 4);
    let mut remaining = store.list_scene_ids().expect("list");
    remaining.sort_unstable();
    assert_eq!(remaining, vec![degolburg, romar, forest]);
    assert!(store.get_scene(degolburg).expect("village").children.is_empty());
    assert!(module.get_property(SCENES_PROPERTY).is_none());
}

#[test]
fn test_install_without_villages_does_nothing() {
    let dir = TempDir::new().expect("tempdir");
    let store = empty_store(&dir);
    add_scene(&store, "lotgd/module-forest/forest", "Forest");

    let shop = ArmorShopModule::new(ShopConfig::default()).expect("module");
    let mut module = ModuleRecord::new(MODULE);
    let created = shop.on_register(&store, &mut module).expect("install");

    assert!(created.is_empty());
    assert!(module.get_property(SCENES_PROPERTY).is_none());
    assert_eq!(store.list_scene_ids().expect("list").len(), 1);
}

#[test]
fn test_uninstall_skips_scenes_deleted_elsewhere() {
    let dir = TempDir::new().expect("tempdir");
    let store = empty_store(&dir);
    add_scene(&store, VILLAGE, "Degolburg");

    let shop = ArmorShopModule::new(ShopConfig::default()).expect("module");
    let mut module = ModuleRecord::new(MODULE);
    let created = shop.on_register(&store, &mut module).expect("install");
    assert!(store.remove_scene(created[1]).expect("external delete"));

    let removed = shop.on_unregister(&store, &mut module).expect("uninstall");
    assert_eq!(removed, 1);
    assert_eq!(store.list_scene_ids().expect("list").len(), 1);
}

#[test]
fn test_module_record_survives_store_round_trip() {
    let dir = TempDir::new().expect("tempdir");
    let store = empty_store(&dir);
    add_scene(&store, VILLAGE, "Degolburg");

    let shop = ArmorShopModule::new(ShopConfig::default()).expect("module");
    let mut module = store.get_module(MODULE).expect("module");
    let created = shop.on_register(&store, &mut module).expect("install");
    store.put_module(&module).expect("save module");

    let mut reloaded = store.get_module(MODULE).expect("module");
    assert_eq!(recorded_scene_ids(&reloaded).expect("ids"), created);
    assert_eq!(shop.on_unregister(&store, &mut reloaded).expect("uninstall"), 2);
}

#[test]
fn test_custom_village_template() {
    let dir = TempDir::new().expect("tempdir");
    let store = empty_store(&dir);
    add_scene(&store, VILLAGE, "Degolburg");
    add_scene(&store, "custom/hamlet", "Hamlet");

    let config = ShopConfig {
        village_template: "custom/hamlet".to_string(),
        ..ShopConfig::default()
    };
    let shop = ArmorShopModule::new(config).expect("module");
    let mut module = ModuleRecord::new(MODULE);
    assert_eq!(shop.on_register(&store, &mut module).expect("install").len(), 2);
}

#[test]
fn test_failed_install_keeps_ids_for_cleanup() {
    let dir = TempDir::new().expect("tempdir");
    let store = empty_store(&dir);
    let degolburg = add_scene(&store, VILLAGE, "Degolburg");

    // saves: shop, village, buy <- fails
    let flaky = FlakyStore {
        inner: &store,
        saves: Cell::new(0),
        fail_on: 3,
    };
    let shop = ArmorShopModule::new(ShopConfig::default()).expect("module");
    let mut module = ModuleRecord::new(MODULE);
    assert!(matches!(
        shop.on_register(&flaky, &mut module),
        Err(ShopError::Io(_))
    ));

    let recorded = recorded_scene_ids(&module).expect("ids");
    assert_eq!(recorded.len(), 1);
    let shop_scene = store.get_scene(recorded[0]).expect("shop");
    assert_eq!(shop_scene.template, SHOP_TEMPLATE);

    assert_eq!(shop.on_unregister(&store, &mut module).expect("uninstall"), 1);
    assert_eq!(store.list_scene_ids().expect("list"), vec![degolburg]);
    assert!(store.get_scene(degolburg).expect("village").children.is_empty());
}

#[test]
fn test_rejects_trade_in_over_100() {
    let config = ShopConfig {
        trade_in_percent: 150,
        ..ShopConfig::default()
    };
    assert!(matches!(
        ArmorShopModule::new(config),
        Err(ShopError::InvalidConfig(_))
    ));
}
