// Team baseline: re-express each raw score relative to the team median.

use crate::model::{Match, Team};
use crate::stats::reduce;

/// Set `skill`, every player's `relative_score`, and `best`/`worst`.
///
/// Must run after every player on the team has a raw score. An empty team
/// is left untouched.
pub fn normalize_team(team: &mut Team) {
    let scores: Vec<f64> = team.players.iter().map(|p| p.score).collect();
    let Some(skill) = reduce(&scores) else {
        return;
    };

    team.skill = skill;
    team.best = f64::NEG_INFINITY;
    team.worst = f64::INFINITY;
    for player in &mut team.players {
        player.relative_score = player.score - skill;
        team.best = team.best.max(player.relative_score);
        team.worst = team.worst.min(player.relative_score);
    }
}

pub fn normalize_match(m: &mut Match) {
    normalize_team(&mut m.radiant);
    normalize_team(&mut m.dire);
}
