//! Step sequencing: turns a profile into the wait before every pulse.

use super::profile::{MotionPhase, MotionProfile};

/// Iterator over the pulse intervals of one profile, in nanoseconds.
#[derive(Debug, Clone)]
pub struct MotionExecutor {
    profile: MotionProfile,
    issued: u32,
}

impl MotionExecutor {
    /// Start stepping out `profile`.
    pub fn new(profile: MotionProfile) -> Self {
        Self { profile, issued: 0 }
    }

    /// Phase of the next pulse.
    #[inline]
    pub fn phase(&self) -> MotionPhase {
        self.profile.phase_at(self.issued)
    }
}

impl Iterator for MotionExecutor {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.issued >= self.profile.total_steps {
            return None;
        }
        let interval = self.profile.interval_at(self.issued);
        self.issued += 1;
        Some(interval)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.profile.total_steps.saturating_sub(self.issued) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for MotionExecutor {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yields_one_interval_per_step() {
        let executor = MotionExecutor::new(MotionProfile::trapezoidal(-10, 1000.0, 2000.0));
        assert_eq!(executor.len(), 10);
        assert_eq!(executor.count(), 10);

        let mut empty = MotionExecutor::new(MotionProfile::zero());
        assert_eq!(empty.phase(), MotionPhase::Complete);
        assert_eq!(empty.next(), None);
    }

    #[test]
    fn test_phase_transitions() {
        let mut executor = MotionExecutor::new(MotionProfile::trapezoidal(1000, 1000.0, 2000.0));
        let mut phases = heapless::Vec::<MotionPhase, 4>::new();

        loop {
            let phase = executor.phase();
            if phases.last() != Some(&phase) {
                phases.push(phase).unwrap();
            }
            if executor.next().is_none() {
                break;
            }
        }

        assert_eq!(
            phases.as_slice(),
            &[
                MotionPhase::Accelerating,
                MotionPhase::Cruising,
                MotionPhase::Decelerating,
                MotionPhase::Complete,
            ]
        );
    }
}
