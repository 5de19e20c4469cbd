//! Binary entrypoint for the armorshop CLI.
//!
//! Drives the armor shop module against the sled-backed reference store, the
//! way a host engine would:
//! - `init` - write a starter `armorshop.toml`
//! - `install` / `uninstall` - run the module's registration hooks
//! - `add-village`, `add-character` - populate the store
//! - `shop`, `buy` - navigate to the shop or submit a purchase and print the viewpoint
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};

use armorshop::config::Config;
use armorshop::logutil::strip_color_codes;
use armorshop::shop::{
    ArmorShopModule, CharacterRecord, NavigationContext, Parameters, SceneRecord,
    SceneRepository, ShopStore, ShopStoreBuilder, Viewpoint, BUY_TEMPLATE, CHOICE_PARAMETER,
    HIDDEN_GROUP, NAVIGATE_TO_BUY, NAVIGATE_TO_SHOP, SHOP_TEMPLATE,
};

#[derive(Parser)]
#[command(name = "armorshop")]
#[command(about = "Armor shop and trade-in module for LotGD-style hosts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "armorshop.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init,
    /// Attach a shop to every village
    Install,
    /// Remove every scene the module created
    Uninstall,
    /// Create a village scene
    AddVillage {
        #[arg(short, long, default_value = "Village Square")]
        title: String,
    },
    /// Create or replace a character
    AddCharacter {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long, default_value_t = 1)]
        level: u32,
        #[arg(short, long, default_value_t = 0)]
        gold: i64,
        /// Armor id the character starts out wearing
        #[arg(short, long)]
        armor: Option<u64>,
    },
    /// Walk into the armor shop
    Shop {
        #[arg(long)]
        character: String,
        /// Village scene id whose shop to visit (defaults to the first shop found)
        #[arg(long)]
        village: Option<u64>,
    },
    /// Submit a purchase
    Buy {
        #[arg(long)]
        character: String,
        /// Armor id to buy
        #[arg(long)]
        choice: Option<String>,
        #[arg(long)]
        village: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init = cli.command {
        Config::create_default(&cli.config).await?;
        println!("Wrote default configuration to {}", cli.config);
        return Ok(());
    }

    let loaded = Config::load(&cli.config).await;
    let config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => Config::default(),
    };
    init_logging(&config, cli.verbose);
    if let Err(e) = loaded {
        warn!("{} (using defaults)", e);
    }

    let mut builder = ShopStoreBuilder::new(&config.storage.data_dir);
    if let Some(seed) = &config.storage.armor_seed_file {
        builder = builder.with_armor_seed_file(seed);
    }
    let store = builder.open()?;
    let shop = ArmorShopModule::new(config.shop.clone())?;

    match cli.command {
        Commands::Init => unreachable!("handled above"),
        Commands::Install => {
            let mut module = store.get_module(&shop.config().module_name)?;
            // Keep whatever ids got recorded before a failure so uninstall can clean up
            let result = shop.on_register(&store, &mut module);
            store.put_module(&module)?;
            store.flush()?;
            let created = result?;
            println!("Created {} scenes", created.len());
        }
        Commands::Uninstall => {
            let mut module = store.get_module(&shop.config().module_name)?;
            let removed = shop.on_unregister(&store, &mut module)?;
            store.put_module(&module)?;
            println!("Removed {} scenes", removed);
        }
        Commands::AddVillage { title } => {
            let mut village = SceneRecord::new(
                &config.shop.village_template,
                &title,
                "The village hustles and bustles.",
            );
            let id = store.save_scene(&mut village)?;
            println!("Village '{}' is scene {}", title, id);
        }
        Commands::AddCharacter {
            id,
            name,
            level,
            gold,
            armor,
        } => {
            let name = name.unwrap_or_else(|| id.clone());
            let mut character = CharacterRecord::new(&id, &name, level);
            character.gold = gold;
            character.armor_id = armor;
            store.put_character(character)?;
            info!("stored character {}", id);
        }
        Commands::Shop { character, village } => {
            let mut character = store.get_character(&character)?;
            let scene = find_shop(&store, village)?;
            let referrer = scene.parents.first().and_then(|id| store.find_scene(*id).ok().flatten());
            let parameters = Parameters::new();
            let viewpoint = navigate(
                &store,
                &shop,
                NAVIGATE_TO_SHOP,
                &scene,
                &mut character,
                &parameters,
                referrer.as_ref(),
            )?;
            print_viewpoint(&viewpoint);
        }
        Commands::Buy {
            character,
            choice,
            village,
        } => {
            let mut character = store.get_character(&character)?;
            let shop_scene = find_shop(&store, village)?;
            let buy_scene = child_with_template(&store, &shop_scene, BUY_TEMPLATE)?
                .ok_or_else(|| anyhow!("shop scene {} has no buy scene", shop_scene.id))?;
            let mut parameters = Parameters::new();
            if let Some(choice) = choice {
                parameters.insert(CHOICE_PARAMETER.to_string(), choice);
            }
            let viewpoint = navigate(
                &store,
                &shop,
                NAVIGATE_TO_BUY,
                &buy_scene,
                &mut character,
                &parameters,
                Some(&shop_scene),
            )?;
            print_viewpoint(&viewpoint);
            println!("Gold: {}", character.gold);
        }
    }

    store.flush()?;
    Ok(())
}

fn navigate(
    store: &ShopStore,
    shop: &ArmorShopModule,
    event: &str,
    scene: &SceneRecord,
    character: &mut CharacterRecord,
    parameters: &Parameters,
    referrer: Option<&SceneRecord>,
) -> Result<Viewpoint> {
    let mut viewpoint = Viewpoint::from_scene(character, scene);
    let mut ctx = NavigationContext {
        scene,
        viewpoint: &mut viewpoint,
        character,
        parameters,
        referrer,
    };
    if !shop.handle_event(store, event, &mut ctx)? {
        return Err(anyhow!("no handler for {}", event));
    }
    Ok(viewpoint)
}

fn find_shop(store: &ShopStore, village: Option<u64>) -> Result<SceneRecord> {
    match village {
        Some(id) => {
            let village = store.get_scene(id)?;
            child_with_template(store, &village, SHOP_TEMPLATE)?
                .ok_or_else(|| anyhow!("village {} has no armor shop; run install", id))
        }
        None => store
            .find_scenes_by_template(SHOP_TEMPLATE)?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("no armor shop installed; run install")),
    }
}

fn child_with_template(
    store: &ShopStore,
    scene: &SceneRecord,
    template: &str,
) -> Result<Option<SceneRecord>> {
    for id in &scene.children {
        if let Some(child) = store.find_scene(*id)? {
            if child.template == template {
                return Ok(Some(child));
            }
        }
    }
    Ok(None)
}

fn print_viewpoint(viewpoint: &Viewpoint) {
    println!("=== {} ===", viewpoint.title);
    println!("{}", strip_color_codes(&viewpoint.description));
    for form in viewpoint.forms() {
        println!();
        for element in &form.elements {
            let marker = if element.is_disabled() { "-" } else { "*" };
            println!(" {} [{}] {}", marker, element.value, element.label);
        }
    }
    for group in &viewpoint.action_groups {
        if group.id == HIDDEN_GROUP {
            continue;
        }
        for action in &group.actions {
            println!(
                " > {} (scene {})",
                action.title.as_deref().unwrap_or("Go"),
                action.destination
            );
        }
    }
}

fn init_logging(config: &Config, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .logging
            .level
            .parse()
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    if let Some(ref file) = config.logging.file {
        if let Ok(f) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(file)
        {
            builder.target(env_logger::Target::Pipe(Box::new(f)));
        }
    }
    builder.format(|fmt, record| {
        writeln!(
            fmt,
            "{} [{}] {}",
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
            record.level(),
            record.args()
        )
    });
    let _ = builder.try_init();
}
