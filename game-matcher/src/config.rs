//! Session configuration: what the caller collects before asking for a schedule.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, RosterError};
use crate::matching::{target_mixed_games, FixedPartner, Gender, Player, TeamType};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingOptions {
    pub allow_mixed: bool,
    pub allow_fixed_partners: bool,
}

/// Largest session `validate` accepts
pub const MAX_SESSION_GAMES: u32 = 1_000;

/// Everything one scheduling run needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub male_players: Vec<Player>,
    pub female_players: Vec<Player>,
    pub courts: u32,
    pub hours: u32,
    pub games_per_hour: u32,
    pub options: MatchingOptions,
    pub fixed_partners: Vec<FixedPartner>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            male_players: Vec::new(),
            female_players: Vec::new(),
            courts: 1,
            hours: 1,
            games_per_hour: 4,
            options: MatchingOptions::default(),
            fixed_partners: Vec::new(),
        }
    }
}

impl MatchingConfig {
    /// Requested games: courts × hours × games per hour, saturating at `u32::MAX`
    pub fn total_games(&self) -> u32 {
        self.checked_total_games().unwrap_or(u32::MAX)
    }

    fn checked_total_games(&self) -> Option<u32> {
        self.courts
            .checked_mul(self.hours)?
            .checked_mul(self.games_per_hour)
    }

    /// Mixed quota, zero when mixed doubles is off
    pub fn target_mixed_games(&self) -> u32 {
        if self.options.allow_mixed {
            target_mixed_games(self.total_games())
        } else {
            0
        }
    }

    /// Men first, then women, in roster order
    pub fn all_players(&self) -> Vec<Player> {
        self.male_players
            .iter()
            .chain(self.female_players.iter())
            .cloned()
            .collect()
    }

    pub fn player_count(&self) -> usize {
        self.male_players.len() + self.female_players.len()
    }

    /// Fixed partnerships that take effect, empty unless the option is on
    pub fn active_fixed_partners(&self) -> &[FixedPartner] {
        if self.options.allow_fixed_partners {
            &self.fixed_partners
        } else {
            &[]
        }
    }

    /// Checks the configuration before it reaches the engine
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.player_count() == 0 {
            return Err(ConfigError::NoPlayers);
        }

        if self.courts == 0 || self.hours == 0 || self.games_per_hour == 0 {
            return Err(ConfigError::InvalidSessionSize {
                courts: self.courts,
                hours: self.hours,
                games_per_hour: self.games_per_hour,
            });
        }

        let requested = self.checked_total_games().unwrap_or(u32::MAX);
        if requested > MAX_SESSION_GAMES {
            return Err(ConfigError::TooManyGames {
                requested: u64::from(self.courts)
                    * u64::from(self.hours)
                    * u64::from(self.games_per_hour),
                max: MAX_SESSION_GAMES,
            });
        }

        let slots = requested * 4;
        if (slots as usize) < self.player_count() {
            return Err(ConfigError::NotEnoughSlots {
                slots,
                players: self.player_count(),
            });
        }

        let mut genders: HashMap<&str, Gender> = HashMap::new();
        for player in self.male_players.iter().chain(self.female_players.iter()) {
            if genders.insert(&player.id, player.gender).is_some() {
                return Err(ConfigError::DuplicatePlayerId(player.id.clone()));
            }
        }

        self.validate_fixed_partners(&genders)
    }

    fn validate_fixed_partners(&self, genders: &HashMap<&str, Gender>) -> Result<(), ConfigError> {
        let mut fixed: HashSet<(TeamType, &str)> = HashSet::new();

        for pair in self.active_fixed_partners() {
            if pair.player1_id == pair.player2_id {
                return Err(ConfigError::SelfPartnership(pair.player1_id.clone()));
            }

            let gender_of = |player_id: &String| {
                genders
                    .get(player_id.as_str())
                    .copied()
                    .ok_or_else(|| ConfigError::UnknownPartner(player_id.clone()))
            };
            let pair_genders = [gender_of(&pair.player1_id)?, gender_of(&pair.player2_id)?];

            let members = [&pair.player1_id, &pair.player2_id];
            for (player_id, gender) in members.into_iter().zip(pair_genders) {
                let fits = match pair.team_type {
                    TeamType::MensDoubles => gender == Gender::Male,
                    TeamType::WomensDoubles => gender == Gender::Female,
                    // a mixed pair needs one of each
                    TeamType::MixedDoubles => pair_genders[0] != pair_genders[1],
                };
                if !fits {
                    return Err(ConfigError::PartnerTypeMismatch {
                        player_id: player_id.clone(),
                        team_type: pair.team_type,
                    });
                }

                if !fixed.insert((pair.team_type, player_id.as_str())) {
                    return Err(ConfigError::AlreadyFixed {
                        player_id: player_id.clone(),
                        team_type: pair.team_type,
                    });
                }
            }
        }

        Ok(())
    }
}

/// Loads a session configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MatchingConfig, RosterError> {
    let text = fs::read_to_string(path)?;
    let config = serde_json::from_str(&text)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::Grade;

    fn players(prefix: &str, gender: Gender, count: usize) -> Vec<Player> {
        (1..=count)
            .map(|i| {
                let id = format!("{}{}", prefix, i);
                Player::new(id.clone(), id, gender, Grade::C)
            })
            .collect()
    }

    fn session(males: usize, females: usize) -> MatchingConfig {
        MatchingConfig {
            male_players: players("m", Gender::Male, males),
            female_players: players("f", Gender::Female, females),
            courts: 2,
            hours: 1,
            games_per_hour: 4,
            ..MatchingConfig::default()
        }
    }

    #[test]
    fn total_games_multiplies_session_size() {
        let config = session(4, 4);
        assert_eq!(config.total_games(), 8);
        assert_eq!(config.target_mixed_games(), 0);
    }

    #[test]
    fn mixed_target_only_when_enabled() {
        let mut config = session(4, 4);
        config.options.allow_mixed = true;
        assert_eq!(config.target_mixed_games(), 1);
    }

    #[test]
    fn fixed_partners_are_gated_by_option() {
        let mut config = session(4, 0);
        config.fixed_partners.push(FixedPartner {
            player1_id: "m1".to_string(),
            player2_id: "m2".to_string(),
            team_type: TeamType::MensDoubles,
        });
        assert!(config.active_fixed_partners().is_empty());
        config.options.allow_fixed_partners = true;
        assert_eq!(config.active_fixed_partners().len(), 1);
    }

    #[test]
    fn rejects_empty_roster() {
        assert_eq!(session(0, 0).validate(), Err(ConfigError::NoPlayers));
    }

    #[test]
    fn rejects_zero_session_size() {
        let mut config = session(4, 0);
        config.hours = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSessionSize { .. })));
    }

    #[test]
    fn rejects_oversized_session() {
        let mut config = session(4, 0);
        config.courts = 70_000;
        config.hours = 70_000;
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManyGames { requested: 19_600_000_000, max: MAX_SESSION_GAMES })
        );
        assert_eq!(config.total_games(), u32::MAX);

        config.courts = 126;
        config.hours = 2;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooManyGames { requested: 1_008, .. })
        ));
        config.courts = 125;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_too_few_slots() {
        let mut config = session(9, 0);
        config.courts = 1;
        config.games_per_hour = 2;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotEnoughSlots { slots: 8, players: 9 })
        );
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut config = session(2, 0);
        config.female_players.push(Player::new("m1", "Dup", Gender::Female, Grade::A));
        assert_eq!(config.validate(), Err(ConfigError::DuplicatePlayerId("m1".to_string())));
    }

    #[test]
    fn rejects_inconsistent_fixed_partners() {
        let mut config = session(4, 4);
        config.options.allow_fixed_partners = true;
        config.fixed_partners.push(FixedPartner {
            player1_id: "m1".to_string(),
            player2_id: "f1".to_string(),
            team_type: TeamType::MensDoubles,
        });
        assert!(matches!(config.validate(), Err(ConfigError::PartnerTypeMismatch { .. })));

        config.fixed_partners[0].team_type = TeamType::MixedDoubles;
        assert_eq!(config.validate(), Ok(()));

        config.fixed_partners.push(FixedPartner {
            player1_id: "m1".to_string(),
            player2_id: "f2".to_string(),
            team_type: TeamType::MixedDoubles,
        });
        assert!(matches!(config.validate(), Err(ConfigError::AlreadyFixed { .. })));
    }

    #[test]
    fn mixed_fixed_pair_needs_one_of_each() {
        let mut config = session(4, 4);
        config.options.allow_fixed_partners = true;
        config.fixed_partners.push(FixedPartner {
            player1_id: "m1".to_string(),
            player2_id: "m2".to_string(),
            team_type: TeamType::MixedDoubles,
        });
        assert_eq!(
            config.validate(),
            Err(ConfigError::PartnerTypeMismatch {
                player_id: "m1".to_string(),
                team_type: TeamType::MixedDoubles,
            })
        );

        config.fixed_partners[0].player2_id = "f2".to_string();
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn same_player_may_be_fixed_once_per_type() {
        let mut config = session(4, 4);
        config.options.allow_fixed_partners = true;
        config.fixed_partners = vec![
            FixedPartner {
                player1_id: "m1".to_string(),
                player2_id: "m2".to_string(),
                team_type: TeamType::MensDoubles,
            },
            FixedPartner {
                player1_id: "m1".to_string(),
                player2_id: "f1".to_string(),
                team_type: TeamType::MixedDoubles,
            },
        ];
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_unknown_partner() {
        let mut config = session(2, 0);
        config.options.allow_fixed_partners = true;
        config.fixed_partners.push(FixedPartner {
            player1_id: "m1".to_string(),
            player2_id: "ghost".to_string(),
            team_type: TeamType::MensDoubles,
        });
        assert_eq!(config.validate(), Err(ConfigError::UnknownPartner("ghost".to_string())));
    }

    #[test]
    fn json_uses_defaults_for_missing_fields() {
        let config: MatchingConfig = serde_json::from_str(
            r#"{"male_players":[{"id":"m1","name":"Kim","gender":"M","grade":"B"}],"courts":2}"#,
        )
        .unwrap();
        assert_eq!(config.courts, 2);
        assert_eq!(config.hours, 1);
        assert_eq!(config.games_per_hour, 4);
        assert!(!config.options.allow_mixed);
    }
}
