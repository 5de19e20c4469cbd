//! Armor shop module: a shop scene listing armor with trade-in credit, a buy
//! scene that settles the trade, and install/uninstall hooks that hang both
//! under every village.
//!
//! Host engine collaborators are reached through the traits in [`services`];
//! [`storage::ShopStore`] implements them on sled for the CLI and tests.

pub mod buy_scene;
pub mod errors;
pub mod hook;
pub mod module;
pub mod narrative;
pub mod pricing;
pub mod seed_loader;
pub mod services;
pub mod shop_scene;
pub mod storage;
pub mod types;

pub use buy_scene::PurchaseOutcome;
pub use errors::ShopError;
pub use hook::{TradeInHook, TradeInListener, TradeInValuation, TRADE_IN_HOOK};
pub use module::{
    recorded_scene_ids, ArmorShopModule, NavigationContext, BUY_TEMPLATE, CHOICE_PARAMETER,
    MODULE, NAVIGATE_TO_BUY, NAVIGATE_TO_SHOP, SCENES_PROPERTY, SHOP_TEMPLATE,
};
pub use pricing::{is_selectable, trade_in_value, TradeQuote, DEFAULT_TRADE_IN_PERCENT};
pub use seed_loader::{default_armor_catalog, load_armor_from_json};
pub use services::{
    CharacterRepository, HostServices, Inventory, SceneRepository, ViewpointRepository, Wealth,
};
pub use storage::{ShopStore, ShopStoreBuilder};
pub use types::*;
