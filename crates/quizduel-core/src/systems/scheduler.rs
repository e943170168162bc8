//! Scheduler - cancellable timed tasks on the session clock
//!
//! Every task is stamped with the generation of its scope when it is
//! scheduled. Advancing to the next question bumps the question generation;
//! resetting the session bumps both. A task whose stamp no longer matches
//! when it comes due is stale and is dropped without running.

/// Lifetime a task is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskScope {
    /// Cancelled when the session moves past the current question
    Question,
    /// Survives question changes, cancelled on reset/navigation
    Session,
}

/// Slots that may hold at most one pending task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskSlot {
    /// Competitive per-question countdown
    Countdown,
    /// Move on after the answer reveal
    Advance,
}

#[derive(Debug, Clone)]
struct ScheduledTask<T> {
    due_at: f64,
    scope: TaskScope,
    generation: u64,
    slot: Option<TaskSlot>,
    seq: u64,
    payload: T,
}

/// Pending timed tasks carrying payloads of type `T`
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    tasks: Vec<ScheduledTask<T>>,
    question_generation: u64,
    session_generation: u64,
    next_seq: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            question_generation: 0,
            session_generation: 0,
            next_seq: 0,
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a task; returns its sequence number
    pub fn schedule(&mut self, due_at: f64, scope: TaskScope, payload: T) -> u64 {
        self.push(due_at, scope, None, payload)
    }

    /// Schedule a question-scoped task in `slot`, replacing whatever the
    /// slot held before
    pub fn schedule_exclusive(&mut self, slot: TaskSlot, due_at: f64, payload: T) -> u64 {
        self.cancel_slot(slot);
        self.push(due_at, TaskScope::Question, Some(slot), payload)
    }

    /// Cancel the task in `slot`. Returns true if one was pending.
    pub fn cancel_slot(&mut self, slot: TaskSlot) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.slot != Some(slot));
        self.tasks.len() != before
    }

    /// When the task in `slot` is due, if one is pending and current
    pub fn deadline(&self, slot: TaskSlot) -> Option<f64> {
        self.tasks
            .iter()
            .find(|t| t.slot == Some(slot) && self.is_current(t))
            .map(|t| t.due_at)
    }

    /// Supersede every question-scoped task
    pub fn next_question(&mut self) {
        self.question_generation += 1;
        self.purge_stale();
    }

    /// Supersede every task
    pub fn reset(&mut self) {
        self.question_generation += 1;
        self.session_generation += 1;
        self.purge_stale();
    }

    /// Remove and return the earliest current task due at or before `now`.
    /// Stale tasks met on the way are discarded.
    pub fn pop_due(&mut self, now: f64) -> Option<(f64, T)> {
        loop {
            let index = self
                .tasks
                .iter()
                .enumerate()
                .filter(|(_, t)| t.due_at <= now)
                .min_by(|(_, a), (_, b)| {
                    a.due_at
                        .partial_cmp(&b.due_at)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then(a.seq.cmp(&b.seq))
                })
                .map(|(i, _)| i)?;

            let task = self.tasks.remove(index);
            if self.is_current(&task) {
                return Some((task.due_at, task.payload));
            }
            log::trace!("Dropped stale task #{} due at {:.2}", task.seq, task.due_at);
        }
    }

    /// Number of pending current tasks
    pub fn pending(&self) -> usize {
        self.tasks.iter().filter(|t| self.is_current(t)).count()
    }

    pub fn question_generation(&self) -> u64 {
        self.question_generation
    }

    pub fn session_generation(&self) -> u64 {
        self.session_generation
    }

    fn push(&mut self, due_at: f64, scope: TaskScope, slot: Option<TaskSlot>, payload: T) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        let generation = self.generation_of(scope);
        self.tasks.push(ScheduledTask {
            due_at,
            scope,
            generation,
            slot,
            seq,
            payload,
        });
        seq
    }

    fn generation_of(&self, scope: TaskScope) -> u64 {
        match scope {
            TaskScope::Question => self.question_generation,
            TaskScope::Session => self.session_generation,
        }
    }

    fn is_current(&self, task: &ScheduledTask<T>) -> bool {
        task.generation == self.generation_of(task.scope)
    }

    fn purge_stale(&mut self) {
        let (question, session) = (self.question_generation, self.session_generation);
        self.tasks.retain(|t| match t.scope {
            TaskScope::Question => t.generation == question,
            TaskScope::Session => t.generation == session,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_due_in_time_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(5.0, TaskScope::Session, "late");
        scheduler.schedule(1.0, TaskScope::Session, "early");
        scheduler.schedule(1.0, TaskScope::Session, "early-second");
        scheduler.schedule(9.0, TaskScope::Session, "future");

        assert_eq!(scheduler.pop_due(6.0), Some((1.0, "early")));
        assert_eq!(scheduler.pop_due(6.0), Some((1.0, "early-second")));
        assert_eq!(scheduler.pop_due(6.0), Some((5.0, "late")));
        assert_eq!(scheduler.pop_due(6.0), None);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_exclusive_slot_replaces() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_exclusive(TaskSlot::Advance, 3.0, 1);
        scheduler.schedule_exclusive(TaskSlot::Advance, 4.0, 2);

        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.deadline(TaskSlot::Advance), Some(4.0));
        assert_eq!(scheduler.pop_due(10.0), Some((4.0, 2)));
    }

    #[test]
    fn test_cancel_slot() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_exclusive(TaskSlot::Countdown, 30.0, ());
        assert!(scheduler.cancel_slot(TaskSlot::Countdown));
        assert!(!scheduler.cancel_slot(TaskSlot::Countdown));
        assert_eq!(scheduler.deadline(TaskSlot::Countdown), None);
    }

    #[test]
    fn test_next_question_cancels_question_tasks() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_exclusive(TaskSlot::Countdown, 30.0, "countdown");
        scheduler.schedule(2.0, TaskScope::Session, "chat");

        scheduler.next_question();
        assert_eq!(scheduler.question_generation(), 1);
        assert_eq!(scheduler.pop_due(100.0), Some((2.0, "chat")));
        assert_eq!(scheduler.pop_due(100.0), None);
    }

    #[test]
    fn test_reset_cancels_everything() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_exclusive(TaskSlot::Advance, 3.0, "advance");
        scheduler.schedule(2.0, TaskScope::Session, "chat");

        scheduler.reset();
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.pop_due(100.0), None);
        assert_eq!(scheduler.session_generation(), 1);
    }
}
