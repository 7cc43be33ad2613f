use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

/// Gender category used to split the roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M", alias = "male")]
    Male,
    #[serde(rename = "F", alias = "female")]
    Female,
}

/// Skill grade, ordered from weakest to strongest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    Beginner,
    D,
    C,
    B,
    A,
}

/// Kind of doubles a team plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamType {
    #[serde(rename = "MD")]
    MensDoubles,
    #[serde(rename = "WD")]
    WomensDoubles,
    #[serde(rename = "XD")]
    MixedDoubles,
}

impl TeamType {
    /// Same-gender doubles type for players of `gender`
    pub fn same_gender(gender: Gender) -> Self {
        match gender {
            Gender::Male => TeamType::MensDoubles,
            Gender::Female => TeamType::WomensDoubles,
        }
    }

    /// Natural type of a pair with the given genders
    pub fn for_genders(a: Gender, b: Gender) -> Self {
        if a == b {
            TeamType::same_gender(a)
        } else {
            TeamType::MixedDoubles
        }
    }

    pub fn is_mixed(self) -> bool {
        self == TeamType::MixedDoubles
    }

    pub fn code(self) -> &'static str {
        match self {
            TeamType::MensDoubles => "MD",
            TeamType::WomensDoubles => "WD",
            TeamType::MixedDoubles => "XD",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    pub grade: Grade,
}

impl Player {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        gender: Gender,
        grade: Grade,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            gender,
            grade,
        }
    }
}

/// Builds the order-independent identity of a pair: the two ids sorted and joined with `-`
pub fn team_id(player1_id: &str, player2_id: &str) -> String {
    if player1_id <= player2_id {
        format!("{}-{}", player1_id, player2_id)
    } else {
        format!("{}-{}", player2_id, player1_id)
    }
}

/// Two distinct players playing together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub player1_id: String,
    pub player2_id: String,
    pub team_type: TeamType,
}

impl Team {
    pub fn new(player1_id: &str, player2_id: &str, team_type: TeamType) -> Self {
        Self {
            id: team_id(player1_id, player2_id),
            player1_id: player1_id.to_string(),
            player2_id: player2_id.to_string(),
            team_type,
        }
    }

    pub fn player_ids(&self) -> [&str; 2] {
        [&self.player1_id, &self.player2_id]
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.player1_id == player_id || self.player2_id == player_id
    }

    /// True when the two teams have at least one player in common
    pub fn shares_player_with(&self, other: &Team) -> bool {
        other.contains(&self.player1_id) || other.contains(&self.player2_id)
    }
}

/// A mandatory partnership supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedPartner {
    pub player1_id: String,
    pub player2_id: String,
    #[serde(rename = "type")]
    pub team_type: TeamType,
}

/// One filled (round, court) slot. Round and court are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDetail {
    pub round_index: u32,
    pub court_index: u32,
    pub team_a: Team,
    pub team_b: Team,
    pub team_type: TeamType,
    pub players: Vec<Player>,
}

impl MatchDetail {
    pub fn player_ids(&self) -> [&str; 4] {
        [
            &self.team_a.player1_id,
            &self.team_a.player2_id,
            &self.team_b.player1_id,
            &self.team_b.player2_id,
        ]
    }
}

/// Complete output of one scheduling run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingResult {
    pub matches: Vec<MatchDetail>,
    pub player_game_counts: BTreeMap<String, u32>,
    /// Games actually scheduled
    pub total_games: u32,
    pub requested_games: u32,
    pub total_rounds: u32,
    pub mixed_games: u32,
}

impl MatchingResult {
    /// Smallest and largest per-player game count, or `None` for an empty roster
    pub fn game_count_range(&self) -> Option<(u32, u32)> {
        let min = self.player_game_counts.values().min()?;
        let max = self.player_game_counts.values().max()?;
        Some((*min, *max))
    }

    pub fn unfilled_games(&self) -> u32 {
        self.requested_games.saturating_sub(self.total_games)
    }

    pub fn matches_in_round(&self, round_index: u32) -> impl Iterator<Item = &MatchDetail> {
        self.matches.iter().filter(move |m| m.round_index == round_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_id_is_order_independent() {
        assert_eq!(team_id("b", "a"), "a-b");
        assert_eq!(team_id("a", "b"), "a-b");
        assert_eq!(Team::new("m2", "m1", TeamType::MensDoubles).id, "m1-m2");
    }

    #[test]
    fn teams_sharing_a_player_are_detected() {
        let a = Team::new("m1", "m2", TeamType::MensDoubles);
        let b = Team::new("m2", "m3", TeamType::MensDoubles);
        let c = Team::new("m3", "m4", TeamType::MensDoubles);
        assert!(a.shares_player_with(&b));
        assert!(!a.shares_player_with(&c));
    }

    #[test]
    fn team_type_follows_genders() {
        assert_eq!(TeamType::for_genders(Gender::Male, Gender::Male), TeamType::MensDoubles);
        assert_eq!(TeamType::for_genders(Gender::Female, Gender::Female), TeamType::WomensDoubles);
        assert_eq!(TeamType::for_genders(Gender::Male, Gender::Female), TeamType::MixedDoubles);
    }

    #[test]
    fn team_type_uses_short_codes_on_the_wire() {
        let json = serde_json::to_string(&TeamType::MixedDoubles).unwrap();
        assert_eq!(json, "\"XD\"");
        let gender: Gender = serde_json::from_str("\"female\"").unwrap();
        assert_eq!(gender, Gender::Female);
    }

    #[test]
    fn game_count_range_of_empty_result_is_none() {
        let result = MatchingResult {
            matches: Vec::new(),
            player_game_counts: BTreeMap::new(),
            total_games: 0,
            requested_games: 4,
            total_rounds: 2,
            mixed_games: 0,
        };
        assert_eq!(result.game_count_range(), None);
        assert_eq!(result.unfilled_games(), 4);
    }
}
