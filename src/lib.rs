//! # Armorshop - armor purchase and trade-in for LotGD-style hosts
//!
//! A shop module for a text-based game engine. Arriving at the shop shows
//! what the merchant will pay for the armor you're wearing and lists the
//! armor on offer for your level; submitting a choice trades the old piece in
//! and settles the difference in gold, or ends badly if you can't cover it.
//!
//! ## Features
//!
//! - **Trade-in pricing**: 75% of list price by default, adjustable by other
//!   modules through [`shop::TradeInHook`].
//! - **Shop and buy handlers**: narrative text, a purchase form and menu
//!   actions on the host viewpoint.
//! - **Install hooks**: attach a shop and buy scene to every village and
//!   remove exactly those scenes on uninstall.
//! - **Reference host store**: sled-backed implementation of the host
//!   service traits so the module can run from the CLI.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use armorshop::config::Config;
//! use armorshop::shop::{ArmorShopModule, ShopStore};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let store = ShopStore::open(&config.storage.data_dir)?;
//!     let shop = ArmorShopModule::new(config.shop.clone())?;
//!
//!     let mut module = store.get_module(&config.shop.module_name)?;
//!     shop.on_register(&store, &mut module)?;
//!     store.put_module(&module)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`shop`] - Handlers, pricing, hook, host service traits and store
//! - [`config`] - Configuration management and validation
//! - [`logutil`] - Log escaping and color-code stripping

pub mod config;
pub mod logutil;
pub mod shop;
