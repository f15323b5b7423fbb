// Historical reference baselines: per hero, per role tag, and global.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{info, warn};

use crate::catalog::{HeroCatalog, HeroId, RoleTag};
use crate::model::{Match, Metric, Metrics};
use crate::settings::{SamplePolicy, ScoringSettings};
use crate::stats::{RobustSummary, StatsError};

// ---------------------------------------------------------------------------
// Per-metric summaries
// ---------------------------------------------------------------------------

/// One [`RobustSummary`] per metric over the same population of players.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSummaries {
    pub combat: RobustSummary,
    pub gold_rate: RobustSummary,
    pub xp_rate: RobustSummary,
}

impl MetricSummaries {
    pub fn from_metrics<'a, I>(metrics: I) -> Result<Self, StatsError>
    where
        I: IntoIterator<Item = &'a Metrics>,
    {
        let metrics: Vec<&Metrics> = metrics.into_iter().collect();
        Ok(Self {
            combat: RobustSummary::new(metrics.iter().map(|m| m.combat))?,
            gold_rate: RobustSummary::new(metrics.iter().map(|m| m.gold_rate))?,
            xp_rate: RobustSummary::new(metrics.iter().map(|m| m.xp_rate))?,
        })
    }

    pub fn get(&self, metric: Metric) -> &RobustSummary {
        match metric {
            Metric::Combat => &self.combat,
            Metric::GoldRate => &self.gold_rate,
            Metric::XpRate => &self.xp_rate,
        }
    }

    /// Normalized value of each metric, in [`Metric::ALL`] order.
    pub fn normalize(&self, metrics: &Metrics) -> [f64; 3] {
        Metric::ALL.map(|metric| self.get(metric).normalize(metrics.get(metric)))
    }

    /// Number of players the summaries were built from.
    pub fn size(&self) -> usize {
        self.combat.size
    }
}

// ---------------------------------------------------------------------------
// Errors and warnings
// ---------------------------------------------------------------------------

/// A hero or role grouping of the player population.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaselineGroup {
    Hero(HeroId),
    Role(RoleTag),
}

impl fmt::Display for BaselineGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaselineGroup::Hero(id) => write!(f, "hero {id}"),
            BaselineGroup::Role(tag) => write!(f, "role {tag}"),
        }
    }
}

/// A baseline built from fewer samples than the configured minimum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleWarning {
    pub group: BaselineGroup,
    pub samples: usize,
    pub min_sample: usize,
}

impl fmt::Display for SampleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.samples == 0 {
            write!(f, "{} has no samples, no baseline built", self.group)
        } else {
            write!(
                f,
                "{} has only {} samples (minimum {})",
                self.group, self.samples, self.min_sample
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReferenceError {
    #[error("{group} has {samples} samples, at least {min_sample} required")]
    InsufficientSample {
        group: BaselineGroup,
        samples: usize,
        min_sample: usize,
    },

    #[error("match {match_id}: hero {hero_id} is not in the hero catalog")]
    UnknownHero { match_id: u64, hero_id: HeroId },

    #[error("no players to build the global baseline from")]
    EmptyPopulation,
}

// ---------------------------------------------------------------------------
// ReferenceTables
// ---------------------------------------------------------------------------

/// Immutable historical baselines, built once per run before any player is
/// scored.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTables {
    heroes: BTreeMap<HeroId, MetricSummaries>,
    roles: BTreeMap<RoleTag, MetricSummaries>,
    global: MetricSummaries,
    warnings: Vec<SampleWarning>,
}

impl ReferenceTables {
    /// Partition every player by hero and by role tag and summarize each
    /// group. A player feeds every role tag of their hero.
    ///
    /// Groups below `settings.min_sample` are handled per
    /// `settings.sample_policy`. Catalog entries nobody played only produce a
    /// warning: no baseline exists for them and none will be queried.
    pub fn build(
        matches: &[Match],
        catalog: &HeroCatalog,
        settings: &ScoringSettings,
    ) -> Result<Self, ReferenceError> {
        let mut by_hero: BTreeMap<HeroId, Vec<Metrics>> =
            catalog.heroes().map(|h| (h.id, Vec::new())).collect();
        let mut by_role: BTreeMap<RoleTag, Vec<Metrics>> = catalog
            .role_tags()
            .into_iter()
            .map(|tag| (tag.clone(), Vec::new()))
            .collect();
        let mut all = Vec::new();

        for m in matches {
            for player in m.players() {
                let hero = catalog
                    .get(player.hero_id)
                    .ok_or(ReferenceError::UnknownHero {
                        match_id: m.match_id,
                        hero_id: player.hero_id,
                    })?;
                by_hero.entry(hero.id).or_default().push(player.metrics);
                for tag in &hero.roles {
                    by_role.entry(tag.clone()).or_default().push(player.metrics);
                }
                all.push(player.metrics);
            }
        }

        let global =
            MetricSummaries::from_metrics(&all).map_err(|_| ReferenceError::EmptyPopulation)?;

        let mut warnings = Vec::new();
        let heroes = build_groups(
            by_hero,
            |id: &HeroId| BaselineGroup::Hero(*id),
            settings,
            &mut warnings,
        )?;
        let roles = build_groups(
            by_role,
            |tag: &RoleTag| BaselineGroup::Role(tag.clone()),
            settings,
            &mut warnings,
        )?;

        info!(
            "Built reference tables from {} players: {} hero baselines, {} role baselines, {} warnings",
            all.len(),
            heroes.len(),
            roles.len(),
            warnings.len()
        );

        Ok(Self {
            heroes,
            roles,
            global,
            warnings,
        })
    }

    pub fn hero(&self, id: HeroId) -> Option<&MetricSummaries> {
        self.heroes.get(&id)
    }

    pub fn role(&self, tag: &RoleTag) -> Option<&MetricSummaries> {
        self.roles.get(tag)
    }

    pub fn global(&self) -> &MetricSummaries {
        &self.global
    }

    pub fn heroes(&self) -> impl Iterator<Item = (HeroId, &MetricSummaries)> {
        self.heroes.iter().map(|(id, s)| (*id, s))
    }

    pub fn roles(&self) -> impl Iterator<Item = (&RoleTag, &MetricSummaries)> {
        self.roles.iter()
    }

    pub fn warnings(&self) -> &[SampleWarning] {
        &self.warnings
    }
}

fn build_groups<K, F>(
    groups: BTreeMap<K, Vec<Metrics>>,
    label: F,
    settings: &ScoringSettings,
    warnings: &mut Vec<SampleWarning>,
) -> Result<BTreeMap<K, MetricSummaries>, ReferenceError>
where
    K: Ord,
    F: Fn(&K) -> BaselineGroup,
{
    let mut built = BTreeMap::new();
    for (key, samples) in groups {
        if samples.len() < settings.min_sample {
            let group = label(&key);
            if !samples.is_empty() && settings.sample_policy == SamplePolicy::Fail {
                return Err(ReferenceError::InsufficientSample {
                    group,
                    samples: samples.len(),
                    min_sample: settings.min_sample,
                });
            }
            let warning = SampleWarning {
                group,
                samples: samples.len(),
                min_sample: settings.min_sample,
            };
            warn!("{warning}");
            warnings.push(warning);
        }
        if let Ok(summaries) = MetricSummaries::from_metrics(&samples) {
            built.insert(key, summaries);
        }
    }
    Ok(built)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
