//! Cue dispatcher
//!
//! Maps engine output to cue requests. Transition cues are gated by the
//! [`CueRule`]; the finish cue and lead-in beeps are not.
//!
//! The final-stretch beep is de-duplicated with a flag that is re-armed on
//! every boundary crossing, so it sounds at most once per phase instance
//! no matter how the ticks are timed.

use tracing::debug;

use crate::phase::{Phase, PhaseTransition, WorkoutState};

use super::{Cue, CueEvent, CueRule, should_fire};

/// Seconds at the end of a non-Work phase that count as the final stretch.
pub const FINAL_STRETCH_SECONDS: u32 = 3;

/// Decides which cues to request for each engine event.
#[derive(Debug, Clone)]
pub struct CueDispatcher {
    rule: CueRule,
    final_stretch_armed: bool,
}

impl CueDispatcher {
    /// Creates a dispatcher for the given rules.
    #[must_use]
    pub const fn new(rule: CueRule) -> Self {
        Self {
            rule,
            final_stretch_armed: true,
        }
    }

    /// Re-arms per-phase state. Called on reset and on every new run.
    pub const fn reset(&mut self) {
        self.final_stretch_armed = true;
    }

    /// Cue for the first Work phase after the lead-in.
    pub fn on_start(&mut self) -> Option<Cue> {
        self.final_stretch_armed = true;
        self.gate(
            Cue::FightBell,
            CueEvent {
                is_work: true,
                is_start: true,
            },
        )
    }

    /// Cue for a boundary crossing.
    pub fn on_transition(&mut self, transition: &PhaseTransition) -> Option<Cue> {
        self.final_stretch_armed = true;

        if transition.is_completion() {
            return Some(transition.cue);
        }

        self.gate(
            transition.cue,
            CueEvent {
                is_work: transition.enters_work(),
                is_start: false,
            },
        )
    }

    /// Cue for a plain countdown tick (no boundary crossed).
    ///
    /// Requests one `CountdownBeep` per non-Work phase instance once the
    /// remaining time enters the final stretch. The beep announces the
    /// coming Work phase and is gated like one.
    pub fn on_countdown(&mut self, state: &WorkoutState) -> Option<Cue> {
        if state.phase == Phase::Work
            || !self.final_stretch_armed
            || state.remaining_seconds == 0
            || state.remaining_seconds > FINAL_STRETCH_SECONDS
        {
            return None;
        }

        self.final_stretch_armed = false;
        self.gate(
            Cue::CountdownBeep,
            CueEvent {
                is_work: true,
                is_start: false,
            },
        )
    }

    fn gate(&self, cue: Cue, event: CueEvent) -> Option<Cue> {
        if should_fire(&self.rule, event) {
            Some(cue)
        } else {
            debug!(cue = cue.name(), "cue suppressed by rule");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::{Intervals, PhaseEngine};

    const SILENT: CueRule = CueRule {
        before_work: false,
        before_rest: false,
        only_at_start: false,
        all_transitions: false,
    };

    fn intervals() -> Intervals {
        Intervals {
            work: 3,
            rest: 5,
            rounds: 3,
            circuits: 2,
            between_circuits_rest: 6,
        }
    }

    /// Runs a whole workout and returns the cues requested, start included.
    fn run(rule: CueRule) -> (Vec<Cue>, usize) {
        let mut engine = PhaseEngine::new(intervals());
        let mut dispatcher = CueDispatcher::new(rule);
        let mut cues = Vec::new();
        let mut boundaries = 0;

        engine.begin();
        cues.extend(dispatcher.on_start());
        while !engine.state().complete {
            if let Some(t) = engine.tick() {
                boundaries += 1;
                cues.extend(dispatcher.on_transition(&t));
            } else {
                cues.extend(dispatcher.on_countdown(&engine.state()));
            }
        }
        (cues, boundaries)
    }

    #[test]
    fn test_all_transitions_one_cue_per_boundary() {
        let (cues, boundaries) = run(CueRule::default());
        let boundary_cues = cues.iter().filter(|c| **c != Cue::CountdownBeep).count();
        // +1 for the start bell
        assert_eq!(boundary_cues, boundaries + 1);
    }

    #[test]
    fn test_silent_rules_only_celebration() {
        let (cues, _) = run(SILENT);
        assert_eq!(cues, vec![Cue::Celebration]);
    }

    #[test]
    fn test_only_at_start() {
        let (cues, _) = run(CueRule {
            only_at_start: true,
            ..SILENT
        });
        assert_eq!(cues, vec![Cue::FightBell, Cue::Celebration]);
    }

    #[test]
    fn test_before_rest_only() {
        let (cues, _) = run(CueRule {
            before_rest: true,
            ..SILENT
        });
        assert!(cues.iter().all(|c| matches!(
            c,
            Cue::Whistle | Cue::Buzzer | Cue::Celebration
        )));
        assert_eq!(cues.iter().filter(|c| **c == Cue::Buzzer).count(), 1);
    }

    #[test]
    fn test_final_stretch_once_per_phase() {
        let (cues, _) = run(CueRule::default());
        // 2 rests per circuit x 2 circuits + 1 between-circuit rest
        let beeps = cues.iter().filter(|c| **c == Cue::CountdownBeep).count();
        assert_eq!(beeps, 5);
    }

    #[test]
    fn test_final_stretch_window() {
        let mut dispatcher = CueDispatcher::new(CueRule::default());
        let rest = |remaining| WorkoutState {
            phase: Phase::Rest,
            remaining_seconds: remaining,
            round: 2,
            circuit: 1,
            running: true,
            paused: false,
            complete: false,
        };

        assert_eq!(dispatcher.on_countdown(&rest(4)), None);
        assert_eq!(dispatcher.on_countdown(&rest(3)), Some(Cue::CountdownBeep));
        assert_eq!(dispatcher.on_countdown(&rest(2)), None);
        assert_eq!(dispatcher.on_countdown(&rest(1)), None);
        dispatcher.reset();
        assert_eq!(dispatcher.on_countdown(&rest(0)), None);
    }

    #[test]
    fn test_no_final_stretch_in_work() {
        let mut dispatcher = CueDispatcher::new(CueRule::default());
        let work = WorkoutState {
            phase: Phase::Work,
            remaining_seconds: 2,
            round: 1,
            circuit: 1,
            running: true,
            paused: false,
            complete: false,
        };
        assert_eq!(dispatcher.on_countdown(&work), None);
    }
}
