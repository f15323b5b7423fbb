// Static hero catalog: hero identity and role tags.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeroId(pub u32);

impl fmt::Display for HeroId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A role tag attached to a hero ("Carry", "Support", ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleTag(pub String);

impl RoleTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hero {
    pub id: HeroId,
    pub name: String,
    pub roles: BTreeSet<RoleTag>,
}

/// Hero id -> hero lookup, loaded once per run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeroCatalog {
    heroes: BTreeMap<HeroId, Hero>,
}

impl HeroCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a hero, returning the previous entry with the same id.
    pub fn insert(&mut self, hero: Hero) -> Option<Hero> {
        self.heroes.insert(hero.id, hero)
    }

    pub fn get(&self, id: HeroId) -> Option<&Hero> {
        self.heroes.get(&id)
    }

    /// Display name, falling back to the numeric id for unknown heroes.
    pub fn name(&self, id: HeroId) -> String {
        self.get(id)
            .map_or_else(|| id.to_string(), |hero| hero.name.clone())
    }

    /// Heroes in ascending id order.
    pub fn heroes(&self) -> impl Iterator<Item = &Hero> {
        self.heroes.values()
    }

    /// Every role tag carried by at least one hero, in sorted order.
    pub fn role_tags(&self) -> BTreeSet<&RoleTag> {
        self.heroes.values().flat_map(|h| h.roles.iter()).collect()
    }

    pub fn len(&self) -> usize {
        self.heroes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heroes.is_empty()
    }
}

impl FromIterator<Hero> for HeroCatalog {
    fn from_iter<I: IntoIterator<Item = Hero>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for hero in iter {
            catalog.insert(hero);
        }
        catalog
    }
}
