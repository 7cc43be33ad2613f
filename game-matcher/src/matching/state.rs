use std::collections::{BTreeMap, HashMap, HashSet};

use super::types::{Player, Team};

/// Key for a pairing of two teams, independent of which side is which
pub fn matchup_key(team_a: &Team, team_b: &Team) -> String {
    if team_a.id <= team_b.id {
        format!("{} vs {}", team_a.id, team_b.id)
    } else {
        format!("{} vs {}", team_b.id, team_a.id)
    }
}

/// Snapshot of the game-count extremes, taken once per slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSpread {
    pub min: u32,
    pub max: u32,
    /// Players sitting on `min`
    pub at_min: usize,
}

/// Running tallies for one scheduling run.
///
/// Candidate evaluation only reads from here; `commit` is the single place the
/// counters change.
#[derive(Debug, Clone)]
pub struct SchedulingState {
    player_games: HashMap<String, u32>,
    team_usage: HashMap<String, u32>,
    match_history: HashMap<String, u32>,
    mixed_games: u32,
    mixed_participants: HashSet<String>,
    used_in_round: HashSet<String>,
}

impl SchedulingState {
    pub fn new(players: &[Player], teams: &[Team]) -> Self {
        Self {
            player_games: players.iter().map(|p| (p.id.clone(), 0)).collect(),
            team_usage: teams.iter().map(|t| (t.id.clone(), 0)).collect(),
            match_history: HashMap::new(),
            mixed_games: 0,
            mixed_participants: HashSet::new(),
            used_in_round: HashSet::new(),
        }
    }

    /// Clears the per-round player set
    pub fn start_round(&mut self) {
        self.used_in_round.clear();
    }

    pub fn is_used_in_round(&self, player_id: &str) -> bool {
        self.used_in_round.contains(player_id)
    }

    pub fn games_played(&self, player_id: &str) -> u32 {
        self.player_games.get(player_id).copied().unwrap_or(0)
    }

    /// Fewest games any rostered player has so far
    pub fn min_games(&self) -> u32 {
        self.player_games.values().min().copied().unwrap_or(0)
    }

    pub fn game_spread(&self) -> GameSpread {
        let min = self.min_games();
        GameSpread {
            min,
            max: self.player_games.values().max().copied().unwrap_or(0),
            at_min: self.player_games.values().filter(|&&c| c == min).count(),
        }
    }

    /// Max minus min game count once each of `player_ids` has played one more game.
    ///
    /// The ids must be distinct. The minimum only moves when every player on it is
    /// among them, and then by exactly one.
    pub fn spread_after(&self, spread: &GameSpread, player_ids: &[&str]) -> u32 {
        if self.player_games.is_empty() {
            return 0;
        }
        let bumped_at_min = player_ids
            .iter()
            .filter(|id| self.games_played(id) == spread.min)
            .count();
        let min = if bumped_at_min >= spread.at_min { spread.min + 1 } else { spread.min };
        let max = player_ids
            .iter()
            .map(|id| self.games_played(id) + 1)
            .fold(spread.max, u32::max);
        max.saturating_sub(min)
    }

    /// Sum of both members' game counts
    pub fn team_games(&self, team: &Team) -> u32 {
        self.games_played(&team.player1_id) + self.games_played(&team.player2_id)
    }

    pub fn team_usage(&self, team: &Team) -> u32 {
        self.team_usage.get(&team.id).copied().unwrap_or(0)
    }

    /// How often the two teams have already faced each other
    pub fn times_met(&self, team_a: &Team, team_b: &Team) -> u32 {
        self.match_history
            .get(&matchup_key(team_a, team_b))
            .copied()
            .unwrap_or(0)
    }

    pub fn mixed_games(&self) -> u32 {
        self.mixed_games
    }

    pub fn has_played_mixed(&self, player_id: &str) -> bool {
        self.mixed_participants.contains(player_id)
    }

    /// Players of the two teams who have not yet played a mixed game
    pub fn new_mixed_players(&self, team_a: &Team, team_b: &Team) -> usize {
        team_a
            .player_ids()
            .iter()
            .chain(team_b.player_ids().iter())
            .filter(|id| !self.has_played_mixed(id))
            .count()
    }

    /// Records a placed match
    pub fn commit(&mut self, team_a: &Team, team_b: &Team) {
        for id in team_a.player_ids().into_iter().chain(team_b.player_ids()) {
            *self.player_games.entry(id.to_string()).or_insert(0) += 1;
            self.used_in_round.insert(id.to_string());
        }
        *self.team_usage.entry(team_a.id.clone()).or_insert(0) += 1;
        *self.team_usage.entry(team_b.id.clone()).or_insert(0) += 1;
        *self.match_history.entry(matchup_key(team_a, team_b)).or_insert(0) += 1;

        if team_a.team_type.is_mixed() {
            self.mixed_games += 1;
            for id in team_a.player_ids().into_iter().chain(team_b.player_ids()) {
                self.mixed_participants.insert(id.to_string());
            }
        }
    }

    /// Final per-player counts in stable order
    pub fn player_game_counts(&self) -> BTreeMap<String, u32> {
        self.player_games
            .iter()
            .map(|(id, count)| (id.clone(), *count))
            .collect()
    }
}
