// OpenDota hero catalog (`heroes.json`).

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use nobscan_core::catalog::{Hero, HeroCatalog, HeroId, RoleTag};

use crate::loader::LoadError;

/// One entry of the OpenDota `/heroes` array. Unused columns are ignored.
#[derive(Debug, Deserialize)]
struct RawHero {
    id: u32,
    localized_name: String,
    #[serde(default)]
    roles: Vec<String>,
}

impl From<RawHero> for Hero {
    fn from(raw: RawHero) -> Self {
        Hero {
            id: HeroId(raw.id),
            name: raw.localized_name,
            roles: raw.roles.into_iter().map(RoleTag::new).collect(),
        }
    }
}

pub fn load_heroes_from_reader<R: Read>(rdr: R) -> Result<HeroCatalog, serde_json::Error> {
    let raw: Vec<RawHero> = serde_json::from_reader(rdr)?;
    Ok(raw.into_iter().map(Hero::from).collect())
}

pub fn load_heroes(path: &Path) -> Result<HeroCatalog, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let catalog = load_heroes_from_reader(std::io::BufReader::new(file)).map_err(|e| {
        LoadError::Json {
            path: path.display().to_string(),
            source: e,
        }
    })?;
    info!(
        "Loaded {} heroes with {} role tags from {}",
        catalog.len(),
        catalog.role_tags().len(),
        path.display()
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEROES: &str = r#"[
        {"id": 1, "name": "npc_dota_hero_antimage", "localized_name": "Anti-Mage",
         "primary_attr": "agi", "roles": ["Carry", "Escape", "Nuker"], "legs": 2},
        {"id": 5, "name": "npc_dota_hero_crystal_maiden", "localized_name": "Crystal Maiden",
         "roles": ["Support", "Disabler", "Nuker"]},
        {"id": 999, "localized_name": "Roleless"}
    ]"#;

    #[test]
    fn parses_opendota_heroes() {
        let catalog = load_heroes_from_reader(HEROES.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 3);
        let am = catalog.get(HeroId(1)).unwrap();
        assert_eq!(am.name, "Anti-Mage");
        assert!(am.roles.contains(&RoleTag::new("Escape")));
        assert_eq!(catalog.name(HeroId(5)), "Crystal Maiden");
        assert!(catalog.get(HeroId(999)).unwrap().roles.is_empty());
        let tags: Vec<&str> = catalog.role_tags().into_iter().map(|t| t.as_str()).collect();
        assert_eq!(tags, vec!["Carry", "Disabler", "Escape", "Nuker", "Support"]);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(load_heroes_from_reader(r#"[{"id": "one"}]"#.as_bytes()).is_err());
        assert!(load_heroes_from_reader("{".as_bytes()).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_heroes(Path::new("/nonexistent/heroes.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/heroes.json"));
    }
}
