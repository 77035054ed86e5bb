//! Soft limit configuration for bounded axes.

use serde::Deserialize;

use super::units::Degrees;

/// Policy for handling limit violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitPolicy {
    /// Reject targets that would exceed limits.
    #[default]
    Reject,
    /// Clamp target to nearest limit.
    Clamp,
}

/// Soft limits in degrees (from configuration).
///
/// Used to keep declination targets inside the mechanically reachable sky.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SoftLimits {
    /// Minimum allowed position in degrees.
    #[serde(rename = "min_degrees")]
    pub min: Degrees,

    /// Maximum allowed position in degrees.
    #[serde(rename = "max_degrees")]
    pub max: Degrees,

    /// What to do when limit is exceeded.
    #[serde(default)]
    pub policy: LimitPolicy,
}

impl SoftLimits {
    /// Create new soft limits.
    pub fn new(min: Degrees, max: Degrees, policy: LimitPolicy) -> Self {
        Self { min, max, policy }
    }

    /// The full declination range of the sky.
    pub fn sky() -> Self {
        Self::new(Degrees(-90.0), Degrees(90.0), LimitPolicy::Reject)
    }

    /// Limits are usable when both bounds are finite and ordered.
    pub fn is_valid(&self) -> bool {
        self.min.0.is_finite() && self.max.0.is_finite() && self.min.0 < self.max.0
    }

    /// Whether `position` lies inside the limits, bounds included.
    pub fn contains(&self, position: Degrees) -> bool {
        (self.min.0..=self.max.0).contains(&position.0)
    }

    /// Target after applying the policy, or `None` when it is rejected.
    ///
    /// A non-finite target is rejected under either policy.
    pub fn apply(&self, target: Degrees) -> Option<Degrees> {
        if !target.0.is_finite() {
            return None;
        }
        match self.policy {
            _ if self.contains(target) => Some(target),
            LimitPolicy::Reject => None,
            LimitPolicy::Clamp => Some(Degrees(target.0.clamp(self.min.0, self.max.0))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_limits_reject() {
        let limits = SoftLimits::new(Degrees(-45.0), Degrees(60.0), LimitPolicy::Reject);

        assert!(limits.apply(Degrees(0.0)).is_some());
        assert!(limits.apply(Degrees(60.0)).is_some());
        assert!(limits.apply(Degrees(-45.0)).is_some());
        assert!(limits.apply(Degrees(60.5)).is_none());
        assert!(limits.apply(Degrees(-46.0)).is_none());
    }

    #[test]
    fn test_soft_limits_clamp() {
        let limits = SoftLimits::new(Degrees(-45.0), Degrees(60.0), LimitPolicy::Clamp);

        assert_eq!(limits.apply(Degrees(10.0)).unwrap().0, 10.0);
        assert_eq!(limits.apply(Degrees(89.0)).unwrap().0, 60.0);
        assert_eq!(limits.apply(Degrees(-89.0)).unwrap().0, -45.0);
        assert!(limits.apply(Degrees(f64::NAN)).is_none());
    }
}
