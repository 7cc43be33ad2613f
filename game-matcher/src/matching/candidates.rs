use std::cmp::Reverse;
use std::collections::HashMap;

use super::grade::grade_score;
use super::state::{GameSpread, SchedulingState};
use super::types::{Player, Team};

/// Two teams may face each other at most this many times in one run
pub const MAX_MEETINGS: u32 = 2;

/// Widest max − min game count a match may leave behind without penalty
pub const MAX_GAME_SPREAD: u32 = 1;

/// What the scheduler knows about the slot being filled
#[derive(Debug, Clone, Copy)]
pub struct SlotContext {
    /// Mixed teams may be used in this slot
    pub allow_mixed: bool,
    /// Whether the next court of the same round still has to be filled
    pub has_next_court: bool,
    /// Mixed permission of the next court if this slot is filled with a non-mixed match
    pub next_allows_mixed: bool,
    /// Mixed permission of the next court if this slot is filled with a mixed match
    pub next_allows_mixed_after_mixed: bool,
}

/// Skill score of every team in the pool: the sum of both members' grade scores
pub fn team_skill_scores(teams: &[Team], players: &[Player]) -> HashMap<String, u32> {
    let grades: HashMap<&str, u32> = players
        .iter()
        .map(|p| (p.id.as_str(), grade_score(p.grade)))
        .collect();

    teams
        .iter()
        .map(|t| {
            let score: u32 = t
                .player_ids()
                .iter()
                .map(|id| grades.get(id).copied().unwrap_or(0))
                .sum();
            (t.id.clone(), score)
        })
        .collect()
}

/// A legal pairing of two candidate teams with everything needed to rank it
#[derive(Debug, Clone)]
pub struct MatchCandidate<'a> {
    pub team_a: &'a Team,
    pub team_b: &'a Team,
    /// Games already played by the four players (4 × their average)
    pub games_total: u32,
    /// |games of team A − games of team B| (2 × the gap in team averages)
    pub games_gap: u32,
    pub skill_gap: u32,
    /// How far committing this match pushes the game spread past `MAX_GAME_SPREAD`
    pub spread_excess: u32,
    pub leaves_next_court: bool,
    pub new_mixed_players: usize,
    pub is_mixed: bool,
}

impl MatchCandidate<'_> {
    /// Sort key, smallest first.
    ///
    /// Spread excess, then lookahead feasibility, then mixed preference while the quota
    /// is open, then fewest games played, then mixed newcomers, then skill parity, then
    /// game-count parity. Non-mixed candidates carry zero newcomers; they never tie with
    /// mixed ones on the earlier fields when mixed is preferred.
    pub fn rank_key(&self, prefer_mixed: bool) -> (u32, bool, bool, u32, Reverse<usize>, u32, u32) {
        (
            self.spread_excess,
            !self.leaves_next_court,
            prefer_mixed && !self.is_mixed,
            self.games_total,
            Reverse(if self.is_mixed { self.new_mixed_players } else { 0 }),
            self.skill_gap,
            self.games_gap,
        )
    }
}

/// Teams whose players are free this round and inside the fairness window.
///
/// A player more than one game ahead of the least-played player is excluded.
pub fn eligible_teams<'a>(teams: &'a [Team], state: &SchedulingState) -> Vec<&'a Team> {
    let max_allowed = state.min_games() + 1;
    teams
        .iter()
        .filter(|team| {
            team.player_ids().iter().all(|id| {
                !state.is_used_in_round(id) && state.games_played(id) <= max_allowed
            })
        })
        .collect()
}

fn can_face(team_a: &Team, team_b: &Team, state: &SchedulingState) -> bool {
    team_a.team_type == team_b.team_type
        && !team_a.shares_player_with(team_b)
        && state.times_met(team_a, team_b) < MAX_MEETINGS
}

fn spread_excess(state: &SchedulingState, spread: &GameSpread, player_ids: &[&str]) -> u32 {
    state
        .spread_after(spread, player_ids)
        .saturating_sub(MAX_GAME_SPREAD)
}

/// Whether a legal match remains among `eligible` once the four players of the chosen
/// match are taken, without widening the game spread beyond what the chosen match
/// already does
fn leaves_follow_up(
    eligible: &[&Team],
    team_a: &Team,
    team_b: &Team,
    allow_mixed: bool,
    state: &SchedulingState,
    spread: &GameSpread,
    excess: u32,
) -> bool {
    let remaining: Vec<&Team> = eligible
        .iter()
        .copied()
        .filter(|t| !t.shares_player_with(team_a) && !t.shares_player_with(team_b))
        .filter(|t| allow_mixed || !t.team_type.is_mixed())
        .collect();

    let [a1, a2] = team_a.player_ids();
    let [b1, b2] = team_b.player_ids();
    remaining.iter().enumerate().any(|(i, first)| {
        remaining[i + 1..].iter().any(|second| {
            if !can_face(first, second, state) {
                return false;
            }
            let [c1, c2] = first.player_ids();
            let [d1, d2] = second.player_ids();
            spread_excess(state, spread, &[a1, a2, b1, b2, c1, c2, d1, d2]) <= excess
        })
    })
}

/// Every legal match among the eligible teams, in pool order
pub fn enumerate_matches<'a>(
    eligible: &[&'a Team],
    state: &SchedulingState,
    skill_scores: &HashMap<String, u32>,
    ctx: &SlotContext,
) -> Vec<MatchCandidate<'a>> {
    let mut candidates = Vec::new();
    let spread = state.game_spread();

    for (i, &team_a) in eligible.iter().enumerate() {
        if team_a.team_type.is_mixed() && !ctx.allow_mixed {
            continue;
        }
        for &team_b in &eligible[i + 1..] {
            if !can_face(team_a, team_b, state) {
                continue;
            }

            let is_mixed = team_a.team_type.is_mixed();
            let games_a = state.team_games(team_a);
            let games_b = state.team_games(team_b);
            let skill_a = skill_scores.get(&team_a.id).copied().unwrap_or(0);
            let skill_b = skill_scores.get(&team_b.id).copied().unwrap_or(0);
            let [a1, a2] = team_a.player_ids();
            let [b1, b2] = team_b.player_ids();
            let excess = spread_excess(state, &spread, &[a1, a2, b1, b2]);

            let leaves_next_court = if ctx.has_next_court {
                let next_mixed = if is_mixed {
                    ctx.next_allows_mixed_after_mixed
                } else {
                    ctx.next_allows_mixed
                };
                leaves_follow_up(eligible, team_a, team_b, next_mixed, state, &spread, excess)
            } else {
                true
            };

            candidates.push(MatchCandidate {
                team_a,
                team_b,
                games_total: games_a + games_b,
                games_gap: games_a.abs_diff(games_b),
                skill_gap: skill_a.abs_diff(skill_b),
                spread_excess: excess,
                leaves_next_court,
                new_mixed_players: if is_mixed {
                    state.new_mixed_players(team_a, team_b)
                } else {
                    0
                },
                is_mixed,
            });
        }
    }

    candidates
}

/// Best-ranked candidate; the earliest in pool order wins a full tie
pub fn select_best<'a>(
    candidates: Vec<MatchCandidate<'a>>,
    prefer_mixed: bool,
) -> Option<MatchCandidate<'a>> {
    candidates
        .into_iter()
        .min_by_key(|c| c.rank_key(prefer_mixed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::{Gender, Grade, TeamType};

    fn player(id: &str, gender: Gender, grade: Grade) -> Player {
        Player::new(id, id, gender, grade)
    }

    fn open_slot() -> SlotContext {
        SlotContext {
            allow_mixed: false,
            has_next_court: false,
            next_allows_mixed: false,
            next_allows_mixed_after_mixed: false,
        }
    }

    fn mens_pool(ids: &[&str]) -> Vec<Team> {
        let mut teams = Vec::new();
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                teams.push(Team::new(a, b, TeamType::MensDoubles));
            }
        }
        teams
    }

    #[test]
    fn skill_score_sums_member_grades() {
        let players = vec![
            player("m1", Gender::Male, Grade::A),
            player("m2", Gender::Male, Grade::Beginner),
        ];
        let teams = mens_pool(&["m1", "m2"]);
        let scores = team_skill_scores(&teams, &players);
        assert_eq!(scores["m1-m2"], 40);
    }

    #[test]
    fn eligibility_excludes_round_players_and_players_ahead() {
        let ids = ["m1", "m2", "m3", "m4", "m5", "m6"];
        let players: Vec<Player> =
            ids.iter().map(|id| player(id, Gender::Male, Grade::C)).collect();
        let teams = mens_pool(&ids);
        let mut state = SchedulingState::new(&players, &teams);

        let a = Team::new("m1", "m2", TeamType::MensDoubles);
        let b = Team::new("m3", "m4", TeamType::MensDoubles);
        state.commit(&a, &b);
        let eligible = eligible_teams(&teams, &state);
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].id, "m5-m6");

        // m1..m4 on 2 games while m5, m6 stay on 0
        state.start_round();
        state.commit(&a, &b);
        state.start_round();
        let eligible = eligible_teams(&teams, &state);
        assert!(eligible.iter().all(|t| !t.contains("m1")));
        assert!(eligible.iter().any(|t| t.id == "m5-m6"));
    }

    #[test]
    fn teams_that_met_twice_are_not_matched_again() {
        let ids = ["m1", "m2", "m3", "m4"];
        let players: Vec<Player> =
            ids.iter().map(|id| player(id, Gender::Male, Grade::C)).collect();
        let teams = vec![
            Team::new("m1", "m2", TeamType::MensDoubles),
            Team::new("m3", "m4", TeamType::MensDoubles),
        ];
        let mut state = SchedulingState::new(&players, &teams);
        let scores = team_skill_scores(&teams, &players);

        for _ in 0..MAX_MEETINGS {
            let eligible = eligible_teams(&teams, &state);
            let candidates = enumerate_matches(&eligible, &state, &scores, &open_slot());
            assert_eq!(candidates.len(), 1);
            state.commit(&teams[0], &teams[1]);
            state.start_round();
        }

        let eligible = eligible_teams(&teams, &state);
        assert!(enumerate_matches(&eligible, &state, &scores, &open_slot()).is_empty());
    }

    #[test]
    fn mixed_teams_only_paired_when_allowed() {
        let players = vec![
            player("m1", Gender::Male, Grade::C),
            player("m2", Gender::Male, Grade::C),
            player("f1", Gender::Female, Grade::C),
            player("f2", Gender::Female, Grade::C),
        ];
        let teams = vec![
            Team::new("m1", "f1", TeamType::MixedDoubles),
            Team::new("m2", "f2", TeamType::MixedDoubles),
        ];
        let state = SchedulingState::new(&players, &teams);
        let scores = team_skill_scores(&teams, &players);
        let eligible = eligible_teams(&teams, &state);

        assert!(enumerate_matches(&eligible, &state, &scores, &open_slot()).is_empty());

        let ctx = SlotContext { allow_mixed: true, ..open_slot() };
        let candidates = enumerate_matches(&eligible, &state, &scores, &ctx);
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].is_mixed);
        assert_eq!(candidates[0].new_mixed_players, 4);
    }

    #[test]
    fn closer_skill_wins_when_games_are_even() {
        let players = vec![
            player("m1", Gender::Male, Grade::A),
            player("m2", Gender::Male, Grade::A),
            player("m3", Gender::Male, Grade::Beginner),
            player("m4", Gender::Male, Grade::Beginner),
        ];
        let teams = mens_pool(&["m1", "m2", "m3", "m4"]);
        let state = SchedulingState::new(&players, &teams);
        let scores = team_skill_scores(&teams, &players);
        let eligible = eligible_teams(&teams, &state);

        let candidates = enumerate_matches(&eligible, &state, &scores, &open_slot());
        assert_eq!(candidates.len(), 3);
        let best = select_best(candidates, false).unwrap();
        assert_eq!(best.skill_gap, 0);
        assert_eq!(best.team_a.id, "m1-m3");
        assert_eq!(best.team_b.id, "m2-m4");
    }

    #[test]
    fn lookahead_avoids_starving_next_court() {
        let ids = ["m1", "m2", "m3", "m4", "m5", "m6", "m7", "m8"];
        let players: Vec<Player> =
            ids.iter().map(|id| player(id, Gender::Male, Grade::C)).collect();
        let teams = vec![
            Team::new("m1", "m2", TeamType::MensDoubles),
            Team::new("m5", "m6", TeamType::MensDoubles),
            Team::new("m3", "m4", TeamType::MensDoubles),
            Team::new("m7", "m8", TeamType::MensDoubles),
        ];
        let state = SchedulingState::new(&players, &teams);
        let scores = team_skill_scores(&teams, &players);
        let eligible = eligible_teams(&teams, &state);
        let ctx = SlotContext { has_next_court: true, ..open_slot() };

        let candidates = enumerate_matches(&eligible, &state, &scores, &ctx);
        let first = candidates
            .iter()
            .find(|c| c.team_a.id == "m1-m2" && c.team_b.id == "m5-m6")
            .unwrap();
        assert!(first.leaves_next_court);

        let teams = vec![
            Team::new("m1", "m2", TeamType::MensDoubles),
            Team::new("m5", "m7", TeamType::MensDoubles),
            Team::new("m3", "m4", TeamType::MensDoubles),
            Team::new("m5", "m6", TeamType::MensDoubles),
            Team::new("m7", "m8", TeamType::MensDoubles),
        ];
        let eligible = eligible_teams(&teams, &state);
        let candidates = enumerate_matches(&eligible, &state, &scores, &ctx);
        let starving = candidates
            .iter()
            .find(|c| c.team_a.id == "m1-m2" && c.team_b.id == "m5-m7")
            .unwrap();
        assert!(!starving.leaves_next_court);
        let best = select_best(candidates, false).unwrap();
        assert!(best.leaves_next_court);
        assert_eq!(best.team_a.id, "m1-m2");
        assert_eq!(best.team_b.id, "m3-m4");
    }

    #[test]
    fn rank_prefers_mixed_only_when_asked() {
        let a = Team::new("m1", "f1", TeamType::MixedDoubles);
        let b = Team::new("m2", "f2", TeamType::MixedDoubles);
        let c = Team::new("m3", "m4", TeamType::MensDoubles);
        let d = Team::new("m5", "m6", TeamType::MensDoubles);
        let mixed = MatchCandidate {
            team_a: &a,
            team_b: &b,
            games_total: 4,
            games_gap: 0,
            skill_gap: 10,
            spread_excess: 0,
            leaves_next_court: true,
            new_mixed_players: 4,
            is_mixed: true,
        };
        let plain = MatchCandidate {
            team_a: &c,
            team_b: &d,
            games_total: 0,
            games_gap: 0,
            skill_gap: 0,
            spread_excess: 0,
            leaves_next_court: true,
            new_mixed_players: 0,
            is_mixed: false,
        };
        assert!(mixed.rank_key(true) < plain.rank_key(true));
        assert!(plain.rank_key(false) < mixed.rank_key(false));
    }
}
