use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

use crate::config::MatchingConfig;
use super::candidates::{
    eligible_teams, enumerate_matches, select_best, team_skill_scores, SlotContext, MAX_GAME_SPREAD,
};
use super::mixed::MixedQuota;
use super::state::SchedulingState;
use super::teams::generate_teams;
use super::types::{MatchDetail, MatchingResult, Player, Team};

/// Computes a complete schedule for a session: builds the team pool, derives the
/// mixed quota and fills every (round, court) slot it can.
#[instrument(skip_all, fields(courts = config.courts, games = config.total_games()))]
pub fn generate_matching(config: &MatchingConfig) -> MatchingResult {
    let total_games = config.total_games();
    let target_mixed = config.target_mixed_games();

    info!(
        males = config.male_players.len(),
        females = config.female_players.len(),
        hours = config.hours,
        games_per_hour = config.games_per_hour,
        allow_mixed = config.options.allow_mixed,
        target_mixed,
        "generating matching"
    );

    let teams = generate_teams(config);
    let players = config.all_players();

    let result = schedule_matches(&teams, &players, config.courts, total_games, target_mixed);

    info!(
        scheduled = result.total_games,
        requested = result.requested_games,
        mixed = result.mixed_games,
        "matching complete"
    );
    result
}

/// Fills rounds court by court from the candidate pool.
///
/// Slots that have no legal match are left empty and reported through
/// `MatchingResult::total_games`, never as an error.
pub fn schedule_matches(
    teams: &[Team],
    players: &[Player],
    courts: u32,
    total_games: u32,
    target_mixed: u32,
) -> MatchingResult {
    let total_rounds = if courts == 0 { 0 } else { total_games.div_ceil(courts) };
    let quota = MixedQuota::new(total_games, target_mixed);
    let skill_scores = team_skill_scores(teams, players);
    let roster: HashMap<&str, &Player> = players.iter().map(|p| (p.id.as_str(), p)).collect();
    let mut state = SchedulingState::new(players, teams);
    let mut matches: Vec<MatchDetail> = Vec::new();

    debug!(
        teams = teams.len(),
        total_rounds,
        mixed_slots = ?quota.designated_slots(),
        "scheduling"
    );

    for round in 0..total_rounds {
        state.start_round();

        for court in 0..courts {
            let slot = round * courts + court;
            if slot >= total_games {
                break;
            }

            let placed = state.mixed_games();
            let next_slot = slot + 1;
            let ctx = SlotContext {
                allow_mixed: quota.allows_mixed(slot, placed),
                has_next_court: court + 1 < courts && next_slot < total_games,
                next_allows_mixed: quota.allows_mixed(next_slot, placed),
                next_allows_mixed_after_mixed: quota.allows_mixed(next_slot, placed + 1),
            };

            let eligible = eligible_teams(teams, &state);
            let candidates = enumerate_matches(&eligible, &state, &skill_scores, &ctx);
            let candidate_count = candidates.len();

            let Some(best) = select_best(candidates, ctx.allow_mixed) else {
                warn!(
                    round = round + 1,
                    court = court + 1,
                    eligible_teams = eligible.len(),
                    "no legal match for slot, leaving it empty"
                );
                continue;
            };

            debug!(
                round = round + 1,
                court = court + 1,
                team_a = %best.team_a.id,
                team_b = %best.team_b.id,
                team_type = best.team_a.team_type.code(),
                skill_gap = best.skill_gap,
                games_gap = best.games_gap,
                spread_excess = best.spread_excess,
                lookahead = best.leaves_next_court,
                designated_mixed = quota.is_designated(slot),
                candidates = candidate_count,
                "match selected"
            );

            if best.spread_excess > 0 {
                warn!(
                    round = round + 1,
                    court = court + 1,
                    spread = MAX_GAME_SPREAD + best.spread_excess,
                    "no match keeps game counts within one, spread widens"
                );
            }

            let (team_a, team_b) = (best.team_a, best.team_b);
            state.commit(team_a, team_b);

            let match_players: Vec<Player> = team_a
                .player_ids()
                .into_iter()
                .chain(team_b.player_ids())
                .filter_map(|id| roster.get(id).map(|p| (*p).clone()))
                .collect();

            matches.push(MatchDetail {
                round_index: round + 1,
                court_index: court + 1,
                team_a: team_a.clone(),
                team_b: team_b.clone(),
                team_type: team_a.team_type,
                players: match_players,
            });
        }
    }

    if state.mixed_games() < quota.target() {
        warn!(
            placed = state.mixed_games(),
            target = quota.target(),
            "mixed quota not reached"
        );
    }

    MatchingResult {
        total_games: matches.len() as u32,
        matches,
        player_game_counts: state.player_game_counts(),
        requested_games: total_games,
        total_rounds,
        mixed_games: state.mixed_games(),
    }
}
