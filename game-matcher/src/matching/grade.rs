use super::types::Grade;

/// All grades from weakest to strongest
pub const ALL_GRADES: [Grade; 5] = [Grade::Beginner, Grade::D, Grade::C, Grade::B, Grade::A];

/// Numeric weight of a grade, used to estimate team strength
pub fn grade_score(grade: Grade) -> u32 {
    match grade {
        Grade::Beginner => 10,
        Grade::D => 15,
        Grade::C => 20,
        Grade::B => 25,
        Grade::A => 30,
    }
}

/// Short display label for a grade
pub fn grade_label(grade: Grade) -> &'static str {
    match grade {
        Grade::Beginner => "Beginner",
        Grade::D => "D",
        Grade::C => "C",
        Grade::B => "B",
        Grade::A => "A",
    }
}

/// Parses a grade label, case-insensitive. Accepts "Beginner"/"Novice" and the single letters.
pub fn parse_grade(value: &str) -> Option<Grade> {
    let lower = value.trim().to_lowercase();
    match lower.as_str() {
        "beginner" | "novice" => Some(Grade::Beginner),
        "d" => Some(Grade::D),
        "c" => Some(Grade::C),
        "b" => Some(Grade::B),
        "a" => Some(Grade::A),
        _ => None,
    }
}
