use std::collections::BTreeSet;

/// Share of requested games that should be mixed doubles, in percent
pub const MIXED_GAME_PERCENT: u32 = 20;

/// Target number of mixed games: 20% of the requested games, rounded down
pub fn target_mixed_games(total_games: u32) -> u32 {
    (u64::from(total_games) * u64::from(MIXED_GAME_PERCENT) / 100) as u32
}

/// Places the mixed quota over the global game sequence.
///
/// Designated slots are spread evenly: with `interval = total / target` the first
/// designated slot is `interval / 2` and the rest follow at multiples of `interval`.
/// 20 games with a target of 4 designate slots 2, 7, 12 and 17 (0-based).
#[derive(Debug, Clone)]
pub struct MixedQuota {
    target: u32,
    total_games: u32,
    designated: BTreeSet<u32>,
}

impl MixedQuota {
    pub fn new(total_games: u32, target: u32) -> Self {
        let mut designated = BTreeSet::new();
        if target > 0 {
            let interval = total_games / target;
            let offset = interval / 2;
            for i in 0..target {
                let slot = offset + i * interval;
                if slot < total_games {
                    designated.insert(slot);
                }
            }
        }
        Self {
            target,
            total_games,
            designated,
        }
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn designated_slots(&self) -> &BTreeSet<u32> {
        &self.designated
    }

    pub fn is_designated(&self, slot_index: u32) -> bool {
        self.designated.contains(&slot_index)
    }

    pub fn is_met(&self, placed: u32) -> bool {
        placed >= self.target
    }

    /// Whether the slot at `slot_index` may take a mixed match after `placed` mixed games.
    ///
    /// Outside designated slots, mixed is still allowed when the remaining slots are no
    /// more than the remaining shortfall, so the quota stays reachable near the end.
    pub fn allows_mixed(&self, slot_index: u32, placed: u32) -> bool {
        if self.is_met(placed) {
            return false;
        }
        let games_left = self.total_games.saturating_sub(slot_index);
        let shortfall = self.target - placed;
        self.is_designated(slot_index) || games_left <= shortfall
    }
}
