// Match, team and player model carried through the scoring pipeline.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::HeroId;

/// Players per side in a valid match.
pub const TEAM_SIZE: usize = 5;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("match {match_id}: {side} has {count} players, expected 5")]
    TeamSize {
        match_id: u64,
        side: Side,
        count: usize,
    },
}

// ---------------------------------------------------------------------------
// Input records
// ---------------------------------------------------------------------------

/// One participant as recorded by the data source.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub hero_id: HeroId,
    pub side: Side,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub gold_per_min: u32,
    pub xp_per_min: u32,
}

/// One completed, already validated session.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub match_id: u64,
    pub start_time: Option<DateTime<Utc>>,
    pub radiant_win: bool,
    pub players: Vec<PlayerRecord>,
}

// ---------------------------------------------------------------------------
// Sides and metrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Radiant,
    Dire,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Radiant => "Radiant",
            Side::Dire => "Dire",
        })
    }
}

/// The three performance metrics every baseline is built over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Combat,
    GoldRate,
    XpRate,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Combat, Metric::GoldRate, Metric::XpRate];

    /// Decimal places used when displaying values of this metric.
    pub fn display_decimals(self) -> usize {
        match self {
            Metric::Combat => 1,
            Metric::GoldRate | Metric::XpRate => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Combat => "cKPD",
            Metric::GoldRate => "GPM",
            Metric::XpRate => "XPM",
        }
    }
}

/// Metric values of one player in one match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub combat: f64,
    pub gold_rate: f64,
    pub xp_rate: f64,
}

impl Metrics {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Combat => self.combat,
            Metric::GoldRate => self.gold_rate,
            Metric::XpRate => self.xp_rate,
        }
    }
}

/// Composite combat efficiency: `kills + assists * assist_weight - deaths`.
pub fn combat_efficiency(kills: u32, deaths: u32, assists: u32, assist_weight: f64) -> f64 {
    f64::from(kills) + f64::from(assists) * assist_weight - f64::from(deaths)
}

// ---------------------------------------------------------------------------
// Player / Team / Match
// ---------------------------------------------------------------------------

/// A participant carried through the scoring pipeline.
///
/// `score` and `relative_score` start at zero and are filled by the collapse
/// and team baseline stages.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub hero_id: HeroId,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub metrics: Metrics,
    pub score: f64,
    pub relative_score: f64,
}

impl Player {
    pub fn from_record(record: &PlayerRecord, assist_weight: f64) -> Self {
        Self {
            hero_id: record.hero_id,
            kills: record.kills,
            deaths: record.deaths,
            assists: record.assists,
            metrics: Metrics {
                combat: combat_efficiency(
                    record.kills,
                    record.deaths,
                    record.assists,
                    assist_weight,
                ),
                gold_rate: f64::from(record.gold_per_min),
                xp_rate: f64::from(record.xp_per_min),
            },
            score: 0.0,
            relative_score: 0.0,
        }
    }
}

/// One side of one match. `skill`, `best` and `worst` are set by the team
/// baseline stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub side: Side,
    pub won: bool,
    pub players: Vec<Player>,
    pub skill: f64,
    pub best: f64,
    pub worst: f64,
}

impl Team {
    fn new(side: Side, won: bool) -> Self {
        Self {
            side,
            won,
            players: Vec::with_capacity(TEAM_SIZE),
            skill: 0.0,
            best: 0.0,
            worst: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub match_id: u64,
    pub start_time: Option<DateTime<Utc>>,
    pub radiant: Team,
    pub dire: Team,
}

impl Match {
    /// Split a record into its two teams. A side without exactly
    /// [`TEAM_SIZE`] players is a corrupt record.
    pub fn from_record(record: &MatchRecord, assist_weight: f64) -> Result<Self, ModelError> {
        let mut radiant = Team::new(Side::Radiant, record.radiant_win);
        let mut dire = Team::new(Side::Dire, !record.radiant_win);
        for p in &record.players {
            let team = match p.side {
                Side::Radiant => &mut radiant,
                Side::Dire => &mut dire,
            };
            team.players.push(Player::from_record(p, assist_weight));
        }
        for team in [&radiant, &dire] {
            if team.players.len() != TEAM_SIZE {
                return Err(ModelError::TeamSize {
                    match_id: record.match_id,
                    side: team.side,
                    count: team.players.len(),
                });
            }
        }
        Ok(Self {
            match_id: record.match_id,
            start_time: record.start_time,
            radiant,
            dire,
        })
    }

    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::Radiant => &self.radiant,
            Side::Dire => &self.dire,
        }
    }

    pub fn team_mut(&mut self, side: Side) -> &mut Team {
        match side {
            Side::Radiant => &mut self.radiant,
            Side::Dire => &mut self.dire,
        }
    }

    pub fn teams(&self) -> [&Team; 2] {
        [&self.radiant, &self.dire]
    }

    /// All ten players, radiant first.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.radiant.players.iter().chain(self.dire.players.iter())
    }

    pub fn winner(&self) -> Side {
        if self.radiant.won {
            Side::Radiant
        } else {
            Side::Dire
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
