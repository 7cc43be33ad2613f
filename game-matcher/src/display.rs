use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::matching::{grade_label, MatchDetail, MatchingResult, Player, Team, TeamType};

/// Formats a player name with their grade, e.g. "Kim (B)"
pub fn format_player_name(player: &Player) -> String {
    format!("{} ({})", player.name, grade_label(player.grade))
}

pub fn team_type_label(team_type: TeamType) -> &'static str {
    match team_type {
        TeamType::MensDoubles => "Men's doubles",
        TeamType::WomensDoubles => "Women's doubles",
        TeamType::MixedDoubles => "Mixed doubles",
    }
}

fn format_team(team: &Team, m: &MatchDetail) -> String {
    team.player_ids()
        .iter()
        .map(|id| {
            m.players
                .iter()
                .find(|p| p.id == *id)
                .map(format_player_name)
                .unwrap_or_else(|| id.to_string())
        })
        .collect::<Vec<_>>()
        .join(" / ")
}

/// One line per match: "Court 1 [MD] Kim (B) / Lee (C)  vs  Park (B) / Choi (C)"
pub fn format_match(m: &MatchDetail) -> String {
    format!(
        "Court {} [{}] {}  vs  {}",
        m.court_index,
        m.team_type.code(),
        format_team(&m.team_a, m),
        format_team(&m.team_b, m)
    )
}

/// Summary lines shared by the console and file output
pub fn summary_lines(result: &MatchingResult) -> Vec<String> {
    let mut lines = vec![
        format!("Total games: {} of {} requested", result.total_games, result.requested_games),
        format!("Total rounds: {}", result.total_rounds),
        format!("Mixed games: {}", result.mixed_games),
    ];
    if let Some((min, max)) = result.game_count_range() {
        lines.push(format!("Games per player: {} ~ {} (spread {})", min, max, max - min));
    }
    if result.unfilled_games() > 0 {
        lines.push(format!("Unfilled slots: {}", result.unfilled_games()));
    }
    lines
}

/// Writes the schedule grouped by round, followed by per-player game counts
pub fn write_schedule<W: Write>(result: &MatchingResult, out: &mut W) -> std::io::Result<()> {
    for line in summary_lines(result) {
        writeln!(out, "{}", line)?;
    }

    for round in 1..=result.total_rounds {
        writeln!(out)?;
        writeln!(out, "Round {}", round)?;
        let mut any = false;
        for m in result.matches_in_round(round) {
            writeln!(out, "  {}", format_match(m))?;
            any = true;
        }
        if !any {
            writeln!(out, "  [NO GAMES]")?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Games per player:")?;
    let mut counts: Vec<(&String, &u32)> = result.player_game_counts.iter().collect();
    counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (player_id, count) in counts {
        writeln!(out, "  {}: {}", player_id, count)?;
    }
    Ok(())
}

/// Writes the schedule to a text file with a generation timestamp
pub fn write_schedule_to_file<P: AsRef<Path>>(
    result: &MatchingResult,
    path: P,
) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "** Game schedule ({}) **", chrono::Local::now().format("%Y-%m-%d %H:%M"))?;
    write_schedule(result, &mut file)
}

/// Prints the schedule to stdout
pub fn print_schedule(result: &MatchingResult) {
    let mut buffer = Vec::new();
    if write_schedule(result, &mut buffer).is_ok() {
        println!("\n=== Game Schedule ===");
        print!("{}", String::from_utf8_lossy(&buffer));
    }
}
