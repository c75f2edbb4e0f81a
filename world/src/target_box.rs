//! Stage, health and progression state for the besieged box.

use box_siege_core::{Money, Stage, StageDirection};

/// Number of frontier kills required to unlock the next stage.
pub(crate) const MAX_PROGRESS: u32 = 10;

/// Outcome reported by [`TargetBox::take_damage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DamageOutcome {
    /// The box absorbed the hit and remains standing.
    Survived,
    /// The box's health was depleted and reset to its maximum.
    Killed {
        /// Stage entered when the kill completed the frontier progress.
        advanced: Option<Stage>,
    },
}

/// The defended target at the center of the grid.
#[derive(Debug)]
pub(crate) struct TargetBox {
    stage: Stage,
    max_stage: Stage,
    health: i64,
    max_health: i64,
    progress: u32,
}

impl TargetBox {
    pub(crate) fn new() -> Self {
        let stage = Stage::FIRST;
        let max_health = stage.max_health();
        Self {
            stage,
            max_stage: stage,
            health: max_health,
            max_health,
            progress: 0,
        }
    }

    pub(crate) const fn stage(&self) -> Stage {
        self.stage
    }

    pub(crate) const fn max_stage(&self) -> Stage {
        self.max_stage
    }

    pub(crate) const fn health(&self) -> i64 {
        self.health
    }

    pub(crate) const fn max_health(&self) -> i64 {
        self.max_health
    }

    pub(crate) const fn progress(&self) -> u32 {
        self.progress
    }

    pub(crate) fn money_drop(&self) -> Money {
        self.stage.money_drop()
    }

    /// Switches to the provided stage and refills health.
    ///
    /// Targets outside `[FIRST, max_stage]` are silently ignored. Lowering
    /// the stage resets frontier progress.
    pub(crate) fn switch_stage(&mut self, target: Stage) -> bool {
        if target < Stage::FIRST || target > self.max_stage {
            return false;
        }

        if target < self.stage {
            self.progress = 0;
        }

        self.stage = target;
        self.max_health = target.max_health();
        self.health = self.max_health;
        true
    }

    /// Applies an input-driven stage change. No-op at the terminal stage;
    /// raising the stage is bounded by the frontier.
    pub(crate) fn navigate(&mut self, direction: StageDirection) -> Option<Stage> {
        if self.stage.is_terminal() {
            return None;
        }

        let target = match direction {
            StageDirection::Previous => self.stage.previous()?,
            StageDirection::Next => {
                if self.stage < self.max_stage {
                    self.stage.next()?
                } else {
                    return None;
                }
            }
        };

        if self.switch_stage(target) {
            Some(target)
        } else {
            None
        }
    }

    /// Subtracts damage from the box.
    ///
    /// A depleted box resets to full health and reports a kill. Kills at the
    /// frontier accrue progress; the tenth frontier kill unlocks and enters
    /// the next stage.
    pub(crate) fn take_damage(&mut self, damage: u32) -> DamageOutcome {
        self.health -= i64::from(damage);
        if self.health > 0 {
            return DamageOutcome::Survived;
        }

        self.health = self.max_health;

        let mut advanced = None;
        if self.stage == self.max_stage && !self.stage.is_terminal() {
            self.progress += 1;
            if self.progress >= MAX_PROGRESS {
                if let Some(next) = self.stage.next() {
                    self.max_stage = next;
                    let _ = self.switch_stage(next);
                    self.progress = 0;
                    advanced = Some(next);
                }
            }
        }

        DamageOutcome::Killed { advanced }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kill(target: &mut TargetBox) -> DamageOutcome {
        let health = target.health();
        let mut outcome = DamageOutcome::Survived;
        let mut dealt = 0;
        while dealt < health {
            outcome = target.take_damage(1_000);
            dealt += 1_000;
        }
        outcome
    }

    #[test]
    fn switch_stage_ignores_targets_beyond_frontier() {
        let mut target = TargetBox::new();
        assert!(!target.switch_stage(Stage::new(2)));
        assert_eq!(target.stage(), Stage::FIRST);
        assert_eq!(target.health(), 100);
    }

    #[test]
    fn depletion_resets_health_and_reports_kill() {
        let mut target = TargetBox::new();
        assert_eq!(target.take_damage(40), DamageOutcome::Survived);
        assert_eq!(target.health(), 60);
        assert_eq!(
            target.take_damage(60),
            DamageOutcome::Killed { advanced: None }
        );
        assert_eq!(target.health(), target.max_health());
        assert_eq!(target.progress(), 1);
    }

    #[test]
    fn tenth_frontier_kill_unlocks_the_next_stage() {
        let mut target = TargetBox::new();
        for _ in 0..MAX_PROGRESS - 1 {
            assert_eq!(kill(&mut target), DamageOutcome::Killed { advanced: None });
        }
        assert_eq!(target.progress(), MAX_PROGRESS - 1);

        assert_eq!(
            kill(&mut target),
            DamageOutcome::Killed {
                advanced: Some(Stage::new(2))
            }
        );
        assert_eq!(target.stage(), Stage::new(2));
        assert_eq!(target.max_stage(), Stage::new(2));
        assert_eq!(target.progress(), 0);
        assert_eq!(target.health(), Stage::new(2).max_health());
    }

    #[test]
    fn lowering_the_stage_resets_progress() {
        let mut target = TargetBox::new();
        for _ in 0..MAX_PROGRESS {
            let _ = kill(&mut target);
        }
        assert_eq!(target.stage(), Stage::new(2));

        let _ = kill(&mut target);
        assert_eq!(target.progress(), 1);

        assert_eq!(
            target.navigate(StageDirection::Previous),
            Some(Stage::FIRST)
        );
        assert_eq!(target.progress(), 0);
    }

    #[test]
    fn kills_below_the_frontier_do_not_accrue_progress() {
        let mut target = TargetBox::new();
        for _ in 0..MAX_PROGRESS {
            let _ = kill(&mut target);
        }
        let _ = target.navigate(StageDirection::Previous);

        assert_eq!(kill(&mut target), DamageOutcome::Killed { advanced: None });
        assert_eq!(target.progress(), 0);
        assert_eq!(target.max_stage(), Stage::new(2));
    }

    #[test]
    fn navigation_is_bounded_by_frontier_and_floor() {
        let mut target = TargetBox::new();
        assert_eq!(target.navigate(StageDirection::Previous), None);
        assert_eq!(target.navigate(StageDirection::Next), None);

        for _ in 0..MAX_PROGRESS {
            let _ = kill(&mut target);
        }
        assert_eq!(
            target.navigate(StageDirection::Previous),
            Some(Stage::FIRST)
        );
        assert_eq!(target.navigate(StageDirection::Next), Some(Stage::new(2)));
        assert_eq!(target.navigate(StageDirection::Next), None);
    }

    #[test]
    fn terminal_stage_rejects_navigation() {
        let mut target = TargetBox::new();
        target.stage = Stage::TERMINAL;
        target.max_stage = Stage::TERMINAL;

        assert_eq!(target.navigate(StageDirection::Previous), None);
        assert_eq!(target.navigate(StageDirection::Next), None);
    }
}
