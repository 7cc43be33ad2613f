use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::config::MatchingConfig;
use super::mixed::target_mixed_games;
use super::types::{team_id, FixedPartner, Player, Team, TeamType};

/// Ceiling on mixed-team memberships a single player gets during generation
pub const MAX_MIXED_TEAMS_PER_PLAYER: u32 = 10;

/// How many mixed teams to generate per targeted mixed game
pub const MIXED_TEAMS_PER_TARGET_GAME: u32 = 3;

/// Builds the candidate team pool for a session.
///
/// Order of the pool is the tie-break order for the scheduler: fixed teams, men's
/// pairs, women's pairs, then mixed teams in generation order.
pub fn generate_teams(config: &MatchingConfig) -> Vec<Team> {
    let allow_mixed = config.options.allow_mixed;
    let fixed_partners: Vec<&FixedPartner> = config
        .active_fixed_partners()
        .iter()
        .filter(|pair| allow_mixed || !pair.team_type.is_mixed())
        .collect();

    let roster = config.all_players();
    let (fixed_teams, mut consumed) = generate_fixed_teams(&roster, &fixed_partners);
    for team_type in [TeamType::MensDoubles, TeamType::WomensDoubles, TeamType::MixedDoubles] {
        consumed.entry(team_type).or_default();
    }

    let mens = generate_same_gender_teams(
        &config.male_players,
        TeamType::MensDoubles,
        &consumed[&TeamType::MensDoubles],
    );
    let womens = generate_same_gender_teams(
        &config.female_players,
        TeamType::WomensDoubles,
        &consumed[&TeamType::WomensDoubles],
    );

    let mixed = if allow_mixed {
        let fixed_mixed: Vec<&Team> = fixed_teams
            .iter()
            .filter(|t| t.team_type.is_mixed())
            .collect();
        generate_mixed_teams(
            &config.male_players,
            &config.female_players,
            &consumed[&TeamType::MixedDoubles],
            &fixed_mixed,
            target_mixed_games(config.total_games()),
        )
    } else {
        Vec::new()
    };

    info!(
        fixed = fixed_teams.len(),
        md = mens.len(),
        wd = womens.len(),
        xd = mixed.len(),
        "team pool built"
    );
    if allow_mixed && mixed.is_empty() && fixed_teams.iter().all(|t| !t.team_type.is_mixed()) {
        warn!("mixed doubles enabled but no mixed teams could be formed");
    }

    let mut teams = fixed_teams;
    teams.extend(mens);
    teams.extend(womens);
    teams.extend(mixed);
    teams
}

/// Materializes fixed partnerships whose two members are both on the roster.
///
/// Returns the teams and, per team type, the players now unavailable for ad-hoc
/// pairing of that type. A same-gender fixture leaves the players free for mixed.
pub fn generate_fixed_teams(
    roster: &[Player],
    fixed_partners: &[&FixedPartner],
) -> (Vec<Team>, HashMap<TeamType, HashSet<String>>) {
    let known: HashSet<&str> = roster.iter().map(|p| p.id.as_str()).collect();
    let mut teams: Vec<Team> = Vec::new();
    let mut consumed: HashMap<TeamType, HashSet<String>> = HashMap::new();

    for pair in fixed_partners {
        if pair.player1_id == pair.player2_id {
            debug!(player = %pair.player1_id, "ignoring self partnership");
            continue;
        }
        if !known.contains(pair.player1_id.as_str()) || !known.contains(pair.player2_id.as_str()) {
            debug!(
                p1 = %pair.player1_id,
                p2 = %pair.player2_id,
                "fixed partner not on roster, skipped"
            );
            continue;
        }
        let id = team_id(&pair.player1_id, &pair.player2_id);
        if teams.iter().any(|t| t.id == id && t.team_type == pair.team_type) {
            continue;
        }

        teams.push(Team::new(&pair.player1_id, &pair.player2_id, pair.team_type));
        let used = consumed.entry(pair.team_type).or_default();
        used.insert(pair.player1_id.clone());
        used.insert(pair.player2_id.clone());
    }

    (teams, consumed)
}

/// Every unordered pair of non-consumed players, in roster order
pub fn generate_same_gender_teams(
    players: &[Player],
    team_type: TeamType,
    consumed: &HashSet<String>,
) -> Vec<Team> {
    let available: Vec<&Player> = players
        .iter()
        .filter(|p| !consumed.contains(&p.id))
        .collect();

    let mut teams = Vec::new();
    for (i, first) in available.iter().enumerate() {
        for second in &available[i + 1..] {
            teams.push(Team::new(&first.id, &second.id, team_type));
        }
    }
    teams
}

/// Round-robin construction of mixed teams.
///
/// Each step pairs the man with the fewest mixed memberships so far with the woman
/// with the fewest, skipping pairs that already exist. Stops at
/// `3 × target_games` teams, when every man×woman combination is used, or when
/// no pair is left under the per-player ceiling.
pub fn generate_mixed_teams(
    male_players: &[Player],
    female_players: &[Player],
    consumed: &HashSet<String>,
    fixed_mixed: &[&Team],
    target_games: u32,
) -> Vec<Team> {
    let males: Vec<&Player> = male_players
        .iter()
        .filter(|p| !consumed.contains(&p.id))
        .collect();
    let females: Vec<&Player> = female_players
        .iter()
        .filter(|p| !consumed.contains(&p.id))
        .collect();

    let wanted = (target_games * MIXED_TEAMS_PER_TARGET_GAME) as usize;
    let limit = wanted.min(males.len() * females.len());

    let mut created: HashSet<String> = fixed_mixed.iter().map(|t| t.id.clone()).collect();
    let mut male_counts: HashMap<&str, u32> =
        males.iter().map(|p| (p.id.as_str(), 0)).collect();
    let mut female_counts: HashMap<&str, u32> =
        females.iter().map(|p| (p.id.as_str(), 0)).collect();
    let mut teams: Vec<Team> = Vec::new();

    debug!(
        males = males.len(),
        females = females.len(),
        target_games,
        limit,
        "generating mixed teams"
    );

    while teams.len() < limit {
        let mut sorted_males = males.clone();
        sorted_males.sort_by_key(|p| male_counts[p.id.as_str()]);
        let mut sorted_females = females.clone();
        sorted_females.sort_by_key(|p| female_counts[p.id.as_str()]);

        let next = sorted_males
            .iter()
            .filter(|m| male_counts[m.id.as_str()] < MAX_MIXED_TEAMS_PER_PLAYER)
            .find_map(|male| {
                sorted_females
                    .iter()
                    .filter(|f| female_counts[f.id.as_str()] < MAX_MIXED_TEAMS_PER_PLAYER)
                    .find(|female| !created.contains(&team_id(&male.id, &female.id)))
                    .map(|female| (*male, *female))
            });

        let Some((male, female)) = next else {
            debug!(generated = teams.len(), "no further mixed pairing available");
            break;
        };

        let team = Team::new(&male.id, &female.id, TeamType::MixedDoubles);
        created.insert(team.id.clone());
        if let Some(count) = male_counts.get_mut(male.id.as_str()) {
            *count += 1;
        }
        if let Some(count) = female_counts.get_mut(female.id.as_str()) {
            *count += 1;
        }
        teams.push(team);
    }

    teams
}
