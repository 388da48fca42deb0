//! Leaderboard formatting - ranking and rendering of player standings

use crate::domain::entities::{LeaderboardSnapshot, PlayerStanding};

const TITLE: &str = "🏆 Squabble Leaderboard";
const RULE: &str = "━━━━━━━━━━━━━━━━━━━━";

/// Sort standings by points, then wins, both descending.
///
/// The sort is stable: players tied on both keys keep the service's order.
/// Precondition: no two entries share an `external_id`.
pub fn rank(mut standings: Vec<PlayerStanding>) -> Vec<PlayerStanding> {
    standings.sort_by(|a, b| b.points.cmp(&a.points).then_with(|| b.wins.cmp(&a.wins)));
    standings
}

/// Render already-ranked standings: header, one line per player, footer.
///
/// The header and footer are always present, even with no players.
pub fn render(ranked: &[PlayerStanding], total_finished_games: u64) -> String {
    let mut lines = Vec::with_capacity(ranked.len() + 4);
    lines.push(TITLE.to_string());
    lines.push(RULE.to_string());
    for (i, player) in ranked.iter().enumerate() {
        lines.push(format!(
            "{}. @{} - {} pts ({}W/{}G)",
            i + 1,
            player.handle,
            player.points,
            player.wins,
            player.total_games
        ));
    }
    lines.push(RULE.to_string());
    lines.push(format!("🎮 {} games finished", total_finished_games));
    lines.join("\n")
}

/// Rank and render a leaderboard response
pub fn format_snapshot(snapshot: LeaderboardSnapshot) -> String {
    let ranked = rank(snapshot.leaderboard);
    render(&ranked, snapshot.total_finished_games)
}
