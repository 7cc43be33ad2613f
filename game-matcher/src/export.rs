use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::display::format_player_name;
use crate::matching::{grade_score, MatchDetail, MatchingResult, Team};

const HEADER: [&str; 9] = [
    "round",
    "court",
    "type",
    "team_a_player_1",
    "team_a_player_2",
    "team_b_player_1",
    "team_b_player_2",
    "team_a_score",
    "team_b_score",
];

fn player_label(m: &MatchDetail, id: &str) -> String {
    m.players
        .iter()
        .find(|p| p.id == id)
        .map(format_player_name)
        .unwrap_or_else(|| id.to_string())
}

fn team_score(m: &MatchDetail, team: &Team) -> u32 {
    m.players
        .iter()
        .filter(|p| team.contains(&p.id))
        .map(|p| grade_score(p.grade))
        .sum()
}

/// Writes one CSV row per match
pub fn write_schedule_csv<W: Write>(result: &MatchingResult, writer: W) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(HEADER)?;

    for m in &result.matches {
        wtr.write_record(&[
            m.round_index.to_string(),
            m.court_index.to_string(),
            m.team_type.code().to_string(),
            player_label(m, &m.team_a.player1_id),
            player_label(m, &m.team_a.player2_id),
            player_label(m, &m.team_b.player1_id),
            player_label(m, &m.team_b.player2_id),
            team_score(m, &m.team_a).to_string(),
            team_score(m, &m.team_b).to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the schedule to a CSV file, replacing any existing file
pub fn export_schedule_to_csv<P: AsRef<Path>>(
    result: &MatchingResult,
    csv_path: P,
) -> Result<(), csv::Error> {
    let file = File::create(csv_path)?;
    write_schedule_csv(result, file)
}

pub fn schedule_to_csv_string(result: &MatchingResult) -> Result<String, csv::Error> {
    let mut buffer = Vec::new();
    write_schedule_csv(result, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
