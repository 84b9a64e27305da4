//! Difficulty scaling rules applied before per-map-type multipliers.

use crate::types::{Difficulty, EnemyTier};

pub(super) fn enemy_multiplier(difficulty: Difficulty) -> f64 {
    match difficulty {
        Difficulty::Normal => 1.0,
        Difficulty::Nightmare => 1.5,
        Difficulty::Hell => 2.5,
    }
}

pub(super) fn obstacle_multiplier(difficulty: Difficulty) -> f64 {
    match difficulty {
        Difficulty::Normal => 1.0,
        Difficulty::Nightmare => 1.2,
        Difficulty::Hell => 1.5,
    }
}

pub(super) fn chest_multiplier(difficulty: Difficulty) -> f64 {
    match difficulty {
        Difficulty::Normal | Difficulty::Nightmare => 1.0,
        Difficulty::Hell => 1.3,
    }
}

pub(super) fn elite_chance(difficulty: Difficulty) -> f64 {
    match difficulty {
        Difficulty::Normal => 0.05,
        Difficulty::Nightmare => 0.15,
        Difficulty::Hell => 0.25,
    }
}

/// Inclusive level range for a spawn of the given tier.
pub(super) fn level_range(difficulty: Difficulty, tier: EnemyTier) -> (u32, u32) {
    let (min, max) = match difficulty {
        Difficulty::Normal => (1, 30),
        Difficulty::Nightmare => (30, 60),
        Difficulty::Hell => (60, 100),
    };
    match tier {
        EnemyTier::Normal => (min, max),
        EnemyTier::Elite => ((min as f64 * 1.5) as u32, (max as f64 * 1.2) as u32),
        EnemyTier::Boss => (min * 2, (max as f64 * 1.5) as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIERS: [EnemyTier; 3] = [EnemyTier::Normal, EnemyTier::Elite, EnemyTier::Boss];

    #[test]
    fn level_ranges_rise_monotonically_with_difficulty() {
        for tier in TIERS {
            let normal = level_range(Difficulty::Normal, tier);
            let nightmare = level_range(Difficulty::Nightmare, tier);
            let hell = level_range(Difficulty::Hell, tier);
            assert!(normal.0 <= nightmare.0 && nightmare.0 <= hell.0);
            assert!(normal.1 <= nightmare.1 && nightmare.1 <= hell.1);
        }
    }

    #[test]
    fn tier_scaling_raises_both_range_ends() {
        for difficulty in [Difficulty::Normal, Difficulty::Nightmare, Difficulty::Hell] {
            let normal = level_range(difficulty, EnemyTier::Normal);
            let elite = level_range(difficulty, EnemyTier::Elite);
            let boss = level_range(difficulty, EnemyTier::Boss);
            assert!(elite.0 >= normal.0 && elite.1 >= normal.1);
            assert!(boss.0 >= elite.0 && boss.1 >= elite.1);
        }
    }

    #[test]
    fn density_multipliers_grow_with_difficulty() {
        assert!(enemy_multiplier(Difficulty::Hell) > enemy_multiplier(Difficulty::Nightmare));
        assert!(enemy_multiplier(Difficulty::Nightmare) > enemy_multiplier(Difficulty::Normal));
        assert!(obstacle_multiplier(Difficulty::Hell) > obstacle_multiplier(Difficulty::Normal));
        assert!(chest_multiplier(Difficulty::Hell) > chest_multiplier(Difficulty::Normal));
        assert!(elite_chance(Difficulty::Hell) > elite_chance(Difficulty::Normal));
    }
}
