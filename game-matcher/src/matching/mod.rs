pub mod types;
pub mod grade;
pub mod teams;
pub mod mixed;
pub mod state;
pub mod candidates;
pub mod scheduler;

pub use types::{
    team_id, FixedPartner, Gender, Grade, MatchDetail, MatchingResult, Player, Team, TeamType,
};
pub use grade::{grade_label, grade_score, parse_grade, ALL_GRADES};
pub use teams::generate_teams;
pub use mixed::{target_mixed_games, MixedQuota};
pub use state::{matchup_key, GameSpread, SchedulingState};
pub use scheduler::{generate_matching, schedule_matches};
