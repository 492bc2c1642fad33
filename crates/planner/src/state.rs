// The Reactive Planner's own state machine (spec.md §4.6): a goal stack plus
// a `Status`, stepped one decision at a time against an `Engine`.

use crate::actions::{expected_preconditions_for, select_action_for, Decision, StuckReason};
use crate::config::PlannerConfig;
use crate::goal::Goal;
use crate::trace::{TraceCategory, TraceEntry, TraceEvent, TraceLog, TraceMask};
use engine_contract::{Engine, Snapshot, StaticTables};
use log::{debug, error, info, warn};
use prepcatalog::{PrepCatalog, PrepId, PrepKind};
use std::collections::HashSet;
use verifier::{check_preconditions, ThiefMonitor};

/// Repeated post-condition mismatches at the same goal past this count
/// escalate a `Running` planner straight to `Stuck` (spec.md §7's error
/// taxonomy: "repeated mismatches (>3 at the same goal) escalate to Stuck").
const MAX_CONSECUTIVE_MISMATCHES: u32 = 3;

/// In-progress position within a `PrepKind::Atomic` sequence (spec.md §3,
/// §4.5's `AtomicSequence`, §8 scenario S4). Lives outside the goal stack
/// because completing the sequence spans multiple `step` calls while the
/// top goal stays a single unchanged `Goal::FlagSet`.
#[derive(Clone, Debug)]
struct AtomicProgress {
    prep_id: PrepId,
    step: usize,
    started_turn: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Status {
    Running,
    Complete,
    Dead,
    Timeout,
    Stuck(StuckReason),
}

/// A LIFO goal stack mirrored by a `HashSet` so membership checks during
/// decomposition (spec.md §4.6's cycle rejection) are O(1) rather than a
/// linear scan of the stack on every sub-goal.
pub struct PlannerState {
    stack: Vec<Goal>,
    in_stack: HashSet<Goal>,
    turn: u32,
    status: Status,
    trace: TraceLog,
    /// The goal a post-condition mismatch was last recorded against, and how
    /// many consecutive steps at that same goal have mismatched.
    mismatch_goal: Option<Goal>,
    mismatch_streak: u32,
    thief_monitor: ThiefMonitor,
    atomic_progress: Option<AtomicProgress>,
}

impl PlannerState {
    pub fn new(root: Goal, mask: TraceMask) -> Self {
        let mut in_stack = HashSet::new();
        in_stack.insert(root);
        Self {
            stack: vec![root],
            in_stack,
            turn: 0,
            status: Status::Running,
            trace: TraceLog::new(mask),
            mismatch_goal: None,
            mismatch_streak: 0,
            thief_monitor: ThiefMonitor::new(),
            atomic_progress: None,
        }
    }

    /// Recent thief sightings/thefts observed during `step` (spec.md §4.8),
    /// available to recovery-strategy selection and diagnostics.
    pub fn thief_monitor(&self) -> &ThiefMonitor {
        &self.thief_monitor
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn trace(&self) -> &[TraceEntry] {
        self.trace.entries()
    }

    pub fn goal_stack(&self) -> &[Goal] {
        &self.stack
    }

    fn push_goal(&mut self, goal: Goal) {
        self.stack.push(goal);
        self.in_stack.insert(goal);
    }

    fn pop_goal(&mut self) -> Goal {
        let goal = self.stack.pop().expect("pop_goal called on an empty stack");
        self.in_stack.remove(&goal);
        goal
    }

    fn trace_entry(snapshot: &impl Snapshot, turn: u32, goal: Goal, event: TraceEvent, message: String) -> TraceEntry {
        TraceEntry {
            turn,
            room: snapshot.here(),
            goal,
            event,
            message,
            inventory: snapshot.inventory_all().into_iter().collect(),
            score: snapshot.score(),
        }
    }

    /// One step of spec.md §4.6's five numbered rules. Returns the status
    /// after the step; once terminal, further calls are no-ops.
    pub fn step<E: Engine>(&mut self, engine: &mut E, config: &PlannerConfig, tables: &StaticTables, catalog: &PrepCatalog) -> Status {
        if !matches!(self.status, Status::Running) {
            return self.status.clone();
        }

        // Rule 1: empty stack.
        if self.stack.is_empty() {
            self.status = Status::Complete;
            info!("planner complete: goal stack empty at turn {}", self.turn);
            return self.status.clone();
        }

        // Rule 2: turn budget.
        if self.turn >= config.max_turns {
            self.status = Status::Timeout;
            error!("planner timed out after {} turns", self.turn);
            return self.status.clone();
        }

        let snapshot = engine.snapshot();

        // Rule 3: player death is always terminal.
        if !snapshot.alive() {
            self.status = Status::Dead;
            error!("player died at turn {} in {}", self.turn, snapshot.here());
            return self.status.clone();
        }

        // Rule 4: the engine itself reports the run finished.
        if snapshot.finished() {
            self.status = Status::Complete;
            info!("planner complete: engine reports finished at turn {}", self.turn);
            return self.status.clone();
        }

        // Rule 5: peek the top goal and act on it.
        let goal = *self.stack.last().expect("stack checked non-empty above");
        let decision = select_action_for(goal, &snapshot, config, tables, catalog);

        // An atomic sequence's in-progress position only survives to the
        // next step if this step's decision continues the very same prep;
        // anything else (satisfied, decomposed, a plain action, stuck) means
        // we are no longer mid-sequence, so a later re-entry restarts at
        // step 0 rather than resuming midway.
        let continues_atomic = matches!(
            (&decision, &self.atomic_progress),
            (Decision::RunAtomic(id), Some(progress)) if *id == progress.prep_id
        );
        if !continues_atomic {
            self.atomic_progress = None;
        }

        match decision {
            Decision::Satisfied => {
                self.pop_goal();
                debug!("{goal} satisfied at turn {}", self.turn);
                self.trace.record(TraceCategory::Actions, || {
                    Self::trace_entry(&snapshot, self.turn, goal, TraceEvent::Satisfied, format!("{goal} satisfied"))
                });
            }
            Decision::Decompose(subs) => {
                let fresh: Vec<Goal> = subs.into_iter().filter(|sub| !self.in_stack.contains(sub)).collect();
                if fresh.is_empty() {
                    self.pop_goal();
                    warn!("every sub-goal of {goal} would cycle, dropping it");
                    self.trace.record(TraceCategory::Actions, || {
                        Self::trace_entry(&snapshot, self.turn, goal, TraceEvent::CycleSkip, format!("every sub-goal of {goal} would cycle"))
                    });
                } else {
                    debug!("{goal} decomposed into {fresh:?}");
                    self.trace.record(TraceCategory::Actions, || {
                        Self::trace_entry(&snapshot, self.turn, goal, TraceEvent::Decompose(fresh.clone()), format!("{goal} decomposed"))
                    });
                    for sub in fresh.into_iter().rev() {
                        self.push_goal(sub);
                    }
                }
            }
            Decision::Action(action) => {
                let expected = expected_preconditions_for(goal, config, tables);
                let checks = check_preconditions(&snapshot, &expected, tables);
                if let Some(failure) = checks.iter().find(|c| c.is_blocking_failure()) {
                    error!("precondition {} failed before {goal}: {}", failure.name, failure.message);
                    self.trace.record(TraceCategory::Actions, || {
                        Self::trace_entry(&snapshot, self.turn, goal, TraceEvent::Stuck(failure.message.clone()), failure.message.clone())
                    });
                    self.status = Status::Stuck(StuckReason::Unreachable(format!(
                        "precondition {} failed before {goal}: {}",
                        failure.name, failure.message
                    )));
                    return self.status.clone();
                }
                for warning in checks.iter().filter(|c| !c.passed && c.severity == verifier::Severity::Warning) {
                    warn!("precondition {} not met before {goal} (non-critical): {}", warning.name, warning.message);
                }

                self.trace.record(TraceCategory::Actions, || {
                    Self::trace_entry(&snapshot, self.turn, goal, TraceEvent::Action(action.clone()), format!("{goal}: {action:?}"))
                });
                debug!("turn {}: executing {action:?} for {goal}", self.turn);
                let (post, _message) = engine.execute(&action);
                self.turn += 1;

                let side_effects = verifier::detect_side_effects(&snapshot, &post);
                if !side_effects.stolen.is_empty() {
                    warn!("side effect: {:?} vanished from inventory during {goal}", side_effects.stolen);
                    for &item in &side_effects.stolen {
                        self.thief_monitor.record_theft(item, post.here(), self.turn);
                    }
                }
                if verifier::thief_present(&post) {
                    self.thief_monitor.record_sighting(post.here(), self.turn);
                }

                let result = verifier::verify_action(&action, &snapshot, &post);
                if result.success {
                    debug!("{goal}: {action:?} verified (expected {}, got {})", result.expected, result.actual);
                    self.mismatch_goal = None;
                    self.mismatch_streak = 0;
                } else {
                    self.mismatch_streak = if self.mismatch_goal == Some(goal) { self.mismatch_streak + 1 } else { 1 };
                    self.mismatch_goal = Some(goal);
                    warn!(
                        "post-condition mismatch #{} at {goal}: expected {}, got {}",
                        self.mismatch_streak, result.expected, result.actual
                    );
                    if self.mismatch_streak > MAX_CONSECUTIVE_MISMATCHES {
                        error!("{goal} mismatched {} turns in a row, giving up", self.mismatch_streak);
                        self.status = Status::Stuck(StuckReason::Unreachable(format!(
                            "{goal} mismatched {} consecutive post-condition checks",
                            self.mismatch_streak
                        )));
                        return self.status.clone();
                    }
                }
            }
            Decision::RunAtomic(prep_id) => {
                let Some(prep) = catalog.get(&prep_id) else {
                    self.status = Status::Stuck(StuckReason::Unreachable(format!("atomic prep {prep_id} not in catalog")));
                    return self.status.clone();
                };
                let PrepKind::Atomic { steps, window } = &prep.kind else {
                    self.status = Status::Stuck(StuckReason::Unreachable(format!("{prep_id} is not an atomic prep")));
                    return self.status.clone();
                };

                let progress = match &self.atomic_progress {
                    Some(p) if p.prep_id == prep_id => p.clone(),
                    _ => AtomicProgress { prep_id: prep_id.clone(), step: 0, started_turn: self.turn },
                };

                // Mid-sequence and already past the window: the contiguity
                // invariant (spec.md §4.5, §8 S4) is broken. Reattempt from
                // the first step rather than resume from where we stalled.
                if progress.step > 0 && self.turn.saturating_sub(progress.started_turn) > *window {
                    warn!("atomic sequence {prep_id} exceeded its {window}-turn window at step {}, reattempting from the first step", progress.step + 1);
                    self.trace.record(TraceCategory::Actions, || {
                        Self::trace_entry(
                            &snapshot,
                            self.turn,
                            goal,
                            TraceEvent::Stuck(format!("{prep_id} window exceeded, restarting")),
                            format!("{prep_id} interrupted after step {}, restarting at step 1", progress.step),
                        )
                    });
                    self.atomic_progress = Some(AtomicProgress { prep_id: prep_id.clone(), step: 0, started_turn: self.turn });
                    return self.status.clone();
                }

                let Some(atomic_step) = steps.get(progress.step) else {
                    self.atomic_progress = None;
                    self.status = Status::Stuck(StuckReason::Unreachable(format!("{prep_id} atomic step {} out of range", progress.step)));
                    return self.status.clone();
                };

                self.trace.record(TraceCategory::Actions, || {
                    Self::trace_entry(
                        &snapshot,
                        self.turn,
                        goal,
                        TraceEvent::Action(atomic_step.action.clone()),
                        format!("{goal}: atomic step {} of {} ({prep_id})", progress.step + 1, atomic_step.description),
                    )
                });
                debug!("turn {}: executing atomic step {} of {prep_id} ({:?})", self.turn, progress.step + 1, atomic_step.action);
                let (post, _message) = engine.execute(&atomic_step.action);
                self.turn += 1;

                let side_effects = verifier::detect_side_effects(&snapshot, &post);
                if verifier::thief_present(&post) {
                    self.thief_monitor.record_sighting(post.here(), self.turn);
                }
                if !side_effects.stolen.is_empty() {
                    warn!("atomic sequence {prep_id} interrupted by theft of {:?} at step {}", side_effects.stolen, progress.step + 1);
                    for &item in &side_effects.stolen {
                        self.thief_monitor.record_theft(item, post.here(), self.turn);
                    }
                    // Theft mid-sequence breaks the "without interruption"
                    // invariant just like the window running out does:
                    // reattempt from the first step next time around.
                    self.atomic_progress = None;
                    return self.status.clone();
                }

                let next_step = progress.step + 1;
                if next_step >= steps.len() {
                    debug!("atomic sequence {prep_id} completed all {} steps", steps.len());
                    self.atomic_progress = None;
                } else {
                    self.atomic_progress = Some(AtomicProgress { prep_id, step: next_step, started_turn: progress.started_turn });
                }
            }
            Decision::Stuck(reason) => {
                warn!("{goal} stuck: {reason}");
                self.trace.record(TraceCategory::Actions, || {
                    Self::trace_entry(&snapshot, self.turn, goal, TraceEvent::Stuck(reason.to_string()), reason.to_string())
                });
                self.status = Status::Stuck(reason);
            }
        }

        self.status.clone()
    }

    /// Drives `step` to a terminal status, per spec.md's state diagram.
    /// Recovery (C8) is expected to call `retarget` and keep driving the
    /// planner after a `Stuck` status rather than use this loop directly.
    pub fn run_to_completion<E: Engine>(&mut self, engine: &mut E, config: &PlannerConfig, tables: &StaticTables, catalog: &PrepCatalog) -> Status {
        loop {
            let status = self.step(engine, config, tables, catalog);
            if !matches!(status, Status::Running) {
                return status;
            }
        }
    }

    /// Pushes a new goal onto the stack without requiring `Stuck`, rejecting
    /// it as a cycle if it's already present (spec.md §4.6's cycle
    /// avoidance). Used to feed the Reactive Planner the next `Schedule`
    /// entry reactively (spec.md §2's data flow) once the current top goal
    /// has resolved down to an empty stack.
    pub fn pursue(&mut self, goal: Goal) -> bool {
        if self.in_stack.contains(&goal) {
            return false;
        }
        // `Dead`/`Timeout` are the only truly unrecoverable terminal states
        // (spec.md §4.6's state diagram); `Complete` and `Stuck` both resume
        // to `Running` once a fresh goal is queued.
        if !matches!(self.status, Status::Dead | Status::Timeout) {
            self.status = Status::Running;
        }
        self.push_goal(goal);
        true
    }

    /// Recovery's hook back into `Running`: replace the top of the stack
    /// with a new goal (e.g. after choosing a `RecoveryStrategy`) and clear
    /// `Stuck`, per spec.md §4.8's "Recovery may transition Stuck → Running
    /// by replacing the top goal."
    pub fn retarget(&mut self, replacement: Goal) {
        if let Status::Stuck(_) = self.status {
            if let Some(top) = self.stack.pop() {
                self.in_stack.remove(&top);
            }
            info!("recovery retargeting stuck goal to {replacement}");
            self.push_goal(replacement);
            self.status = Status::Running;
            self.mismatch_goal = None;
            self.mismatch_streak = 0;
        }
    }
}
