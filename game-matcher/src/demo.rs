//! Reproducible random rosters for trying the scheduler out.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::matching::{Gender, Grade, Player, ALL_GRADES};

const MALE_NAMES: [&str; 12] = [
    "Minjun", "Seojun", "Dohyun", "Jiho", "Hajun", "Eunwoo",
    "Siwoo", "Juwon", "Yejun", "Jihun", "Gunwoo", "Woojin",
];

const FEMALE_NAMES: [&str; 12] = [
    "Seoyeon", "Jiwoo", "Seoyun", "Jimin", "Haeun", "Suah",
    "Hayoon", "Jiyu", "Chaewon", "Soyul", "Yuna", "Dayeon",
];

fn demo_player(rng: &mut StdRng, gender: Gender, index: usize, names: &[&str]) -> Player {
    let prefix = match gender {
        Gender::Male => "m",
        Gender::Female => "f",
    };
    let base = names[index % names.len()];
    // names repeat once the list runs out
    let name = if index < names.len() {
        base.to_string()
    } else {
        format!("{} {}", base, index / names.len() + 1)
    };
    let grade = ALL_GRADES.choose(rng).copied().unwrap_or(Grade::C);

    Player::new(format!("{}{:02}", prefix, index + 1), name, gender, grade)
}

/// Builds `males` men and `females` women with random grades.
///
/// The same seed always yields the same roster.
pub fn demo_roster(males: usize, females: usize, seed: u64) -> (Vec<Player>, Vec<Player>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let men = (0..males)
        .map(|i| demo_player(&mut rng, Gender::Male, i, &MALE_NAMES))
        .collect();
    let women = (0..females)
        .map(|i| demo_player(&mut rng, Gender::Female, i, &FEMALE_NAMES))
        .collect();
    (men, women)
}
