//! Module entry points: event dispatch plus install/uninstall hooks.

use log::{debug, error, info, warn};

use crate::config::ShopConfig;
use crate::shop::errors::ShopError;
use crate::shop::hook::{TradeInHook, TradeInListener};
use crate::shop::narrative;
use crate::shop::pricing::trade_in_value;
use crate::shop::services::HostServices;
use crate::shop::types::{
    Armor, CharacterRecord, ModuleRecord, Parameters, SceneId, SceneRecord, Viewpoint,
};
use crate::shop::{buy_scene, shop_scene};

pub const MODULE: &str = "lotgd/module-armor-shop";

pub const SHOP_TEMPLATE: &str = "lotgd/module-armor-shop/shop";
pub const BUY_TEMPLATE: &str = "lotgd/module-armor-shop/buy";
pub const SCENES_PROPERTY: &str = "lotgd/module-armor-shop/scenes";

/// Request parameter carrying the chosen armor id.
pub const CHOICE_PARAMETER: &str = "choice";

pub const NAVIGATE_TO_SHOP: &str = "h/lotgd/core/navigate-to/lotgd/module-armor-shop/shop";
pub const NAVIGATE_TO_BUY: &str = "h/lotgd/core/navigate-to/lotgd/module-armor-shop/buy";

/// What the host hands a handler for one navigation.
pub struct NavigationContext<'a> {
    pub scene: &'a SceneRecord,
    pub viewpoint: &'a mut Viewpoint,
    pub character: &'a mut CharacterRecord,
    pub parameters: &'a Parameters,
    /// Scene the character came from.
    pub referrer: Option<&'a SceneRecord>,
}

#[derive(Debug, Default)]
pub struct ArmorShopModule {
    config: ShopConfig,
    trade_in_hook: TradeInHook,
}

impl ArmorShopModule {
    /// Fails with [`ShopError::InvalidConfig`] if `config` doesn't validate.
    pub fn new(config: ShopConfig) -> Result<Self, ShopError> {
        config.validate()?;
        Ok(Self {
            config,
            trade_in_hook: TradeInHook::new(),
        })
    }

    pub fn config(&self) -> &ShopConfig {
        &self.config
    }

    /// Let another module adjust trade-in values before the shop uses them.
    pub fn on_trade_in(&mut self, listener: impl TradeInListener + 'static) {
        self.trade_in_hook.register(listener);
    }

    /// Route a navigation event. Returns false for events this module doesn't handle.
    pub fn handle_event<S>(
        &self,
        services: &S,
        event: &str,
        ctx: &mut NavigationContext<'_>,
    ) -> Result<bool, ShopError>
    where
        S: HostServices + ?Sized,
    {
        match event {
            NAVIGATE_TO_SHOP => {
                shop_scene::handle_viewpoint(services, self, ctx)?;
                Ok(true)
            }
            NAVIGATE_TO_BUY => {
                buy_scene::handle_viewpoint(services, self, ctx)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Current armor of `character` and what the shop will credit for it.
    pub fn trade_in_for<S>(
        &self,
        services: &S,
        character: &CharacterRecord,
    ) -> Result<(Option<Armor>, i64), ShopError>
    where
        S: HostServices + ?Sized,
    {
        let Some(armor) = services.armor_for(character)? else {
            match character.armor_id {
                Some(id) => error!(
                    "Couldn't find armor id={} for user {}.",
                    id, character.id
                ),
                None => debug!("user {} wears no armor, no trade-in", character.id),
            }
            return Ok((None, 0));
        };
        let base = trade_in_value(Some(&armor), self.config.trade_in_percent);
        let value = self.trade_in_hook.publish(base, &armor);
        Ok((Some(armor), value))
    }

    /// Attach a shop and its buy scene under every village. Returns the new scene ids.
    pub fn on_register<S>(
        &self,
        services: &S,
        module: &mut ModuleRecord,
    ) -> Result<Vec<SceneId>, ShopError>
    where
        S: HostServices + ?Sized,
    {
        let villages = services.find_scenes_by_template(&self.config.village_template)?;
        if villages.is_empty() {
            info!(
                "{}: Couldn't find any villages to add the armor shop to",
                self.config.module_name
            );
            return Ok(Vec::new());
        }

        let mut created = Vec::with_capacity(villages.len() * 2);
        for mut village in villages {
            info!(
                "{}: Adding an armor shop to scene id={}",
                self.config.module_name, village.id
            );
            let mut shop = SceneRecord::new(
                SHOP_TEMPLATE,
                &self.config.shop_title,
                &narrative::shop_description(),
            )
            .with_parent(village.id);
            // Record each id as soon as it exists so uninstall can find it
            // even if a later save fails.
            let shop_id = services.save_scene(&mut shop)?;
            store_scene_id(module, shop_id)?;
            created.push(shop_id);
            village.children.push(shop_id);
            services.save_scene(&mut village)?;

            let mut buy =
                SceneRecord::new(BUY_TEMPLATE, &self.config.shop_title, "").with_parent(shop_id);
            let buy_id = services.save_scene(&mut buy)?;
            store_scene_id(module, buy_id)?;
            created.push(buy_id);
            shop.children.push(buy_id);
            services.save_scene(&mut shop)?;
        }
        Ok(created)
    }

    /// Remove every scene recorded by [`Self::on_register`]. Ids that no longer
    /// resolve are skipped. Returns how many scenes were removed.
    pub fn on_unregister<S>(
        &self,
        services: &S,
        module: &mut ModuleRecord,
    ) -> Result<usize, ShopError>
    where
        S: HostServices + ?Sized,
    {
        let ids = recorded_scene_ids(module)?;
        let mut removed = 0;
        for id in ids {
            info!("{}: Removing scene id={}", self.config.module_name, id);
            if services.remove_scene(id)? {
                removed += 1;
            } else {
                warn!(
                    "{}: scene id={} is already gone, skipping",
                    self.config.module_name, id
                );
            }
        }
        module.remove_property(SCENES_PROPERTY);
        debug!("{}: removed {} scenes", self.config.module_name, removed);
        Ok(removed)
    }
}

/// Scene ids this module has recorded, in insertion order.
pub fn recorded_scene_ids(module: &ModuleRecord) -> Result<Vec<SceneId>, ShopError> {
    match module.get_property(SCENES_PROPERTY) {
        Some(value) => Ok(serde_json::from_value(value.clone())?),
        None => Ok(Vec::new()),
    }
}

fn store_scene_id(module: &mut ModuleRecord, id: SceneId) -> Result<(), ShopError> {
    let mut ids = recorded_scene_ids(module)?;
    ids.push(id);
    module.set_property(SCENES_PROPERTY, serde_json::to_value(ids)?);
    Ok(())
}
