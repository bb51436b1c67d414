//! Cap position projection: a team's space figures after the trade.

use serde::Serialize;

use crate::models::TeamCapSnapshot;

/// Project one space figure forward by the team's net salary change.
///
/// Cases are split on the sign of `current`, not on how it compares with
/// `cap_difference`. A current value of exactly zero always projects to zero.
/// Results saturate at the `i64` bounds.
pub fn updated_value(current: i64, cap_difference: i64) -> i64 {
    if current == 0 {
        return 0;
    }

    match (current < 0, cap_difference.signum()) {
        // Over the line and shedding salary: the deficit shrinks.
        (true, -1) => current.saturating_add(cap_difference.saturating_abs()),
        // Over the line and adding salary: the deficit grows.
        (true, 1) => current.saturating_sub(cap_difference),
        // Under the line: room shrinks as salary arrives, grows as it leaves.
        (false, 1) | (false, -1) => current.saturating_sub(cap_difference),
        _ => current,
    }
}

/// Projected space figures after a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapProjection {
    pub updated_cap_space: i64,
    pub updated_first_apron_space: i64,
    pub updated_second_apron_space: i64,
}

impl CapProjection {
    /// Snapshot with the projected space values, for tier display.
    pub fn as_snapshot(&self, total_cap_allocation: i64) -> TeamCapSnapshot {
        TeamCapSnapshot {
            total_cap_allocation,
            cap_space: self.updated_cap_space,
            first_apron_space: self.updated_first_apron_space,
            second_apron_space: self.updated_second_apron_space,
        }
    }
}

impl TeamCapSnapshot {
    /// Apply [`updated_value`] to each space field independently.
    pub fn project(&self, cap_difference: i64) -> CapProjection {
        CapProjection {
            updated_cap_space: updated_value(self.cap_space, cap_difference),
            updated_first_apron_space: updated_value(self.first_apron_space, cap_difference),
            updated_second_apron_space: updated_value(self.second_apron_space, cap_difference),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_cases() {
        assert_eq!(updated_value(-5, -3), -2);
        assert_eq!(updated_value(-5, 3), -8);
        assert_eq!(updated_value(5, 3), 2);
        assert_eq!(updated_value(5, -3), 8);
    }

    #[test]
    fn test_zero_current_value_stays_zero() {
        for diff in [-10_000_000, -1, 0, 1, 10_000_000] {
            assert_eq!(updated_value(0, diff), 0);
        }
    }

    #[test]
    fn test_zero_difference_leaves_value() {
        assert_eq!(updated_value(7_500_000, 0), 7_500_000);
        assert_eq!(updated_value(-2_000_000, 0), -2_000_000);
    }

    #[test]
    fn test_positive_space_can_cross_below_zero() {
        assert_eq!(updated_value(2_000_000, 3_000_000), -1_000_000);
    }

    #[test]
    fn test_extreme_values_saturate() {
        assert_eq!(updated_value(5, i64::MIN), i64::MAX);
        assert_eq!(updated_value(-5, i64::MAX), i64::MIN);
        assert_eq!(updated_value(-5, i64::MIN), i64::MAX - 5);
        assert_eq!(updated_value(i64::MIN, 1), i64::MIN);
    }

    #[test]
    fn test_project_applies_fields_independently() {
        let snapshot = TeamCapSnapshot {
            total_cap_allocation: 150_000_000,
            cap_space: -10_000_000,
            first_apron_space: 5_000_000,
            second_apron_space: 0,
        };

        let projection = snapshot.project(3_000_000);
        assert_eq!(projection.updated_cap_space, -13_000_000);
        assert_eq!(projection.updated_first_apron_space, 2_000_000);
        assert_eq!(projection.updated_second_apron_space, 0);

        let as_snapshot = projection.as_snapshot(153_000_000);
        assert_eq!(as_snapshot.cap_space, -13_000_000);
        assert_eq!(as_snapshot.total_cap_allocation, 153_000_000);
    }
}
