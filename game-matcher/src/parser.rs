use csv::{Reader, StringRecord};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::error::RosterError;
use crate::matching::{parse_grade, Gender, Player};

/// Parses a gender from the usual spellings ("M", "male", "F", "female", ...)
pub fn parse_gender(value: &str) -> Option<Gender> {
    let lower = value.trim().to_lowercase();
    match lower.as_str() {
        "m" | "male" | "man" | "men" => Some(Gender::Male),
        "f" | "w" | "female" | "woman" | "women" => Some(Gender::Female),
        _ => None,
    }
}

fn column(headers: &StringRecord, name: &str, fallback: usize) -> usize {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .unwrap_or(fallback)
}

/// Loads a roster from a CSV file with `id`, `name`, `gender` and `grade` columns
pub fn load_roster<P: AsRef<Path>>(csv_path: P) -> Result<Vec<Player>, RosterError> {
    let reader = Reader::from_path(csv_path)?;
    read_records(reader)
}

/// Reads a roster from any CSV source.
///
/// Rows without a name are skipped. A missing id falls back to the name, and a
/// repeated id replaces the earlier row in place.
pub fn read_roster<R: Read>(source: R) -> Result<Vec<Player>, RosterError> {
    read_records(Reader::from_reader(source))
}

fn read_records<R: Read>(mut reader: Reader<R>) -> Result<Vec<Player>, RosterError> {
    let headers = reader.headers()?.clone();
    let id_col = column(&headers, "id", 0);
    let name_col = column(&headers, "name", 1);
    let gender_col = column(&headers, "gender", 2);
    let grade_col = column(&headers, "grade", 3);

    let mut players: Vec<Player> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (index, result) in reader.records().enumerate() {
        let record = result?;
        // header is line 1
        let row = index + 2;

        let name = record.get(name_col).unwrap_or("").trim().to_string();
        if name.is_empty() {
            continue;
        }
        let mut id = record.get(id_col).unwrap_or("").trim().to_string();
        if id.is_empty() {
            id = name.clone();
        }

        let gender_value = record.get(gender_col).unwrap_or("");
        let gender = parse_gender(gender_value).ok_or_else(|| RosterError::UnknownGender {
            row,
            value: gender_value.to_string(),
        })?;
        let grade_value = record.get(grade_col).unwrap_or("");
        let grade = parse_grade(grade_value).ok_or_else(|| RosterError::UnknownGrade {
            row,
            value: grade_value.to_string(),
        })?;

        let player = Player { id: id.clone(), name, gender, grade };
        match positions.get(&id) {
            Some(&existing) => players[existing] = player,
            None => {
                positions.insert(id, players.len());
                players.push(player);
            }
        }
    }

    Ok(players)
}

/// Splits a roster into (men, women), keeping roster order
pub fn split_by_gender(players: Vec<Player>) -> (Vec<Player>, Vec<Player>) {
    players.into_iter().partition(|p| p.gender == Gender::Male)
}
