// OpenDota match documents: parsing, validity filter and conversion into
// core match records.

use std::fmt;
use std::io::Read;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use nobscan_core::catalog::HeroId;
use nobscan_core::model::{MatchRecord, PlayerRecord, Side};

/// Players in a full lobby.
pub const LOBBY_SIZE: usize = 10;

// ---------------------------------------------------------------------------
// Raw serde structs
// ---------------------------------------------------------------------------

/// The subset of an OpenDota `/matches/{id}` document the analysis reads.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMatch {
    pub match_id: u64,
    #[serde(default)]
    pub start_time: Option<i64>,
    pub radiant_win: bool,
    pub human_players: u32,
    pub players: Vec<RawPlayer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPlayer {
    pub hero_id: u32,
    #[serde(rename = "isRadiant")]
    pub is_radiant: bool,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub gold_per_min: u32,
    pub xp_per_min: u32,
    pub leaver_status: u32,
}

pub fn parse_match_from_reader<R: Read>(rdr: R) -> Result<RawMatch, serde_json::Error> {
    serde_json::from_reader(rdr)
}

// ---------------------------------------------------------------------------
// Validity
// ---------------------------------------------------------------------------

/// Why a match is left out of the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// At least one player abandoned or disconnected.
    Leaver { hero_id: u32, leaver_status: u32 },
    HumanPlayers(u32),
    PlayerCount(usize),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Leaver {
                hero_id,
                leaver_status,
            } => write!(f, "hero {hero_id} has leaver status {leaver_status}"),
            Rejection::HumanPlayers(n) => write!(f, "{n} human players"),
            Rejection::PlayerCount(n) => write!(f, "{n} player entries"),
        }
    }
}

impl RawMatch {
    /// A match counts only when all ten players are human and nobody left.
    pub fn check(&self) -> Result<(), Rejection> {
        if let Some(p) = self.players.iter().find(|p| p.leaver_status != 0) {
            return Err(Rejection::Leaver {
                hero_id: p.hero_id,
                leaver_status: p.leaver_status,
            });
        }
        if self.human_players as usize != LOBBY_SIZE {
            return Err(Rejection::HumanPlayers(self.human_players));
        }
        if self.players.len() != LOBBY_SIZE {
            return Err(Rejection::PlayerCount(self.players.len()));
        }
        Ok(())
    }

    pub fn into_record(self) -> MatchRecord {
        MatchRecord {
            match_id: self.match_id,
            start_time: self
                .start_time
                .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)),
            radiant_win: self.radiant_win,
            players: self.players.into_iter().map(PlayerRecord::from).collect(),
        }
    }
}

impl From<RawPlayer> for PlayerRecord {
    fn from(raw: RawPlayer) -> Self {
        PlayerRecord {
            hero_id: HeroId(raw.hero_id),
            side: if raw.is_radiant {
                Side::Radiant
            } else {
                Side::Dire
            },
            kills: raw.kills,
            deaths: raw.deaths,
            assists: raw.assists,
            gold_per_min: raw.gold_per_min,
            xp_per_min: raw.xp_per_min,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
