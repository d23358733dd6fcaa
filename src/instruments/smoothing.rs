/*!
 * Level Smoothing
 * Per-tick transitions of a record's current level toward its target
 */

use crate::core::types::Level;

/// Highest level of the active (loud) percussive band
pub const ACTIVE_BAND_MAX: Level = 4;

/// Move one unit toward `target`, never overshooting
#[inline]
pub fn step_toward(current: Level, target: Level) -> Level {
    if current < target {
        current + 1
    } else if current > target {
        current - 1
    } else {
        current
    }
}

/// Percussive attack/release
///
/// Ambient targets (> 4) are taken immediately. Otherwise a level still in
/// the ambient band re-enters the active band at 1 before stepping.
#[inline]
pub fn percussive_transition(current: Level, target: Level) -> Level {
    if target > ACTIVE_BAND_MAX {
        return target;
    }
    let current = if current > ACTIVE_BAND_MAX { 1 } else { current };
    step_toward(current, target)
}

/// Melodic instruments jump straight to the target
#[inline]
pub fn melodic_transition(_current: Level, target: Level) -> Level {
    target
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_toward() {
        assert_eq!(step_toward(1, 3), 2);
        assert_eq!(step_toward(3, 1), 2);
        assert_eq!(step_toward(2, 2), 2);
        assert_eq!(step_toward(0, 0), 0);
    }

    #[test]
    fn test_percussive_ambient_reentry() {
        // 16 -> target 4: reset to 1 first, then one step
        assert_eq!(percussive_transition(16, 4), 2);
        // 8 -> target 0: reset to 1, then down to 0
        assert_eq!(percussive_transition(8, 0), 0);
        // 8 -> target 1: reset to 1 and hold
        assert_eq!(percussive_transition(8, 1), 1);
    }

    #[test]
    fn test_percussive_jump_into_ambient() {
        assert_eq!(percussive_transition(2, 8), 8);
        assert_eq!(percussive_transition(8, 16), 16);
        assert_eq!(percussive_transition(16, 8), 8);
    }
}
