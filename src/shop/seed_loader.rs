//! Armor catalog seeds.
//!
//! The store is seeded with the classic armor ladder unless a JSON catalog is
//! supplied. A catalog file is a JSON array of objects with `id`, `name`,
//! `cost`, `level` and `defense`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::shop::errors::ShopError;
use crate::shop::types::Armor;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ArmorSeed {
    id: u64,
    name: String,
    cost: i64,
    level: u32,
    #[serde(default)]
    defense: u32,
}

/// Load an armor catalog from a JSON file.
pub fn load_armor_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<Armor>, ShopError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let seeds: Vec<ArmorSeed> = serde_json::from_str(&contents).map_err(|e| {
        ShopError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Failed to parse {}: {}", path.display(), e),
        ))
    })?;

    Ok(seeds
        .into_iter()
        .map(|s| Armor::new(s.id, &s.name, s.cost, s.level, s.defense))
        .collect())
}

/// One piece per level, defense rising with the price.
pub fn default_armor_catalog() -> Vec<Armor> {
    const LADDER: [(&str, i64); 15] = [
        ("Fuzzy Slippers", 48),
        ("Flannel Pajamas", 225),
        ("Homespun Longjohns", 585),
        ("Homespun Undershirt", 990),
        ("Knitted Socks", 1575),
        ("Knitted Gloves", 2250),
        ("Old Leather Boots", 2790),
        ("Homespun Pants", 3420),
        ("Homespun Tunic", 4230),
        ("Gypsy Cape", 5040),
        ("Old Leather Cap", 5850),
        ("Old Leather Gauntlets", 6840),
        ("Traveller's Shield", 8010),
        ("Old Leather Pants", 9000),
        ("Old Leather Tunic", 10350),
    ];

    LADDER
        .iter()
        .enumerate()
        .map(|(i, (name, cost))| {
            let rank = i as u32 + 1;
            Armor::new(rank as u64, name, *cost, rank, rank)
        })
        .collect()
}
