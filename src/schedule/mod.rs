//! Cooperative virtual-time scheduler
//!
//! Owns every timer of a night shift: the periodic processes (hour, power,
//! attack check, one movement process per animatronic) and the fire-once
//! delayed events (rush resolution, blackout strike).
//!
//! Nothing runs on its own. The driver pulls due tasks with `pop_due` and
//! runs each to completion before pulling the next, so callbacks never
//! interleave mid-way. `cancel_all` drops every entry and bumps the epoch;
//! a `Fired` carrying an older epoch belongs to a torn-down session.

use ahash::AHashSet;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::core::error::{NightError, Result};
use crate::core::types::{AnimatronicId, Millis};

/// Named timer callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Advance the in-game clock one hour
    Hour,
    /// Drain power according to current usage
    Power,
    /// Door attack check
    AttackCheck,
    /// One animatronic's movement roll
    Move(AnimatronicId),
    /// Foxy reaches the door
    RushResolve,
    /// Delayed strike after the power runs out
    BlackoutStrike,
}

/// A task that came due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub task: Task,
    pub epoch: u64,
    pub at: Millis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    due: Millis,
    seq: u64,
    task: Task,
    period: Option<Millis>,
}

// Min-heap on (due, seq): earliest first, ties in registration order
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now: Millis,
    epoch: u64,
    seq: u64,
    queue: BinaryHeap<Entry>,
    running: AHashSet<Task>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Number of queued entries (periodic and one-shot)
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_scheduled(&self, task: Task) -> bool {
        self.queue.iter().any(|entry| entry.task == task)
    }

    /// Register a periodic task; first fire is one period from now
    pub fn every(&mut self, task: Task, period: Millis) -> Result<()> {
        if period == 0 {
            return Err(NightError::InvalidConfig(format!(
                "period of {task:?} must be greater than zero"
            )));
        }
        if !self.running.insert(task) {
            return Err(NightError::TaskAlreadyScheduled(task));
        }
        self.push(task, self.now + period, Some(period));
        Ok(())
    }

    /// Register a fire-once task
    pub fn after(&mut self, task: Task, delay: Millis) {
        self.push(task, self.now + delay, None);
    }

    /// Next task due at or before `until`, advancing the clock to its due time
    pub fn pop_due(&mut self, until: Millis) -> Option<Fired> {
        let next = self.queue.peek()?;
        if next.due > until {
            return None;
        }
        let entry = self.queue.pop()?;
        self.now = self.now.max(entry.due);

        if let Some(period) = entry.period {
            self.push(entry.task, entry.due + period, Some(period));
        }

        Some(Fired {
            task: entry.task,
            epoch: self.epoch,
            at: entry.due,
        })
    }

    /// Move the clock forward once nothing more is due
    pub fn settle(&mut self, until: Millis) {
        self.now = self.now.max(until);
    }

    /// Drop every timer and start a new epoch
    pub fn cancel_all(&mut self) {
        self.queue.clear();
        self.running.clear();
        self.epoch += 1;
    }

    fn push(&mut self, task: Task, due: Millis, period: Option<Millis>) {
        self.seq += 1;
        self.queue.push(Entry {
            due,
            seq: self.seq,
            task,
            period,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(scheduler: &mut Scheduler, until: Millis) -> Vec<(Task, Millis)> {
        let mut fired = Vec::new();
        while let Some(f) = scheduler.pop_due(until) {
            fired.push((f.task, f.at));
        }
        scheduler.settle(until);
        fired
    }

    #[test]
    fn test_periodic_fires_once_per_period() {
        let mut scheduler = Scheduler::new();
        scheduler.every(Task::Power, 100).unwrap();

        let fired = drain(&mut scheduler, 350);
        assert_eq!(
            fired,
            vec![(Task::Power, 100), (Task::Power, 200), (Task::Power, 300)]
        );
        assert_eq!(scheduler.now(), 350);
    }

    #[test]
    fn test_tasks_fire_in_time_order() {
        let mut scheduler = Scheduler::new();
        scheduler.every(Task::AttackCheck, 1000).unwrap();
        scheduler.every(Task::Move(AnimatronicId::Bonnie), 300).unwrap();
        scheduler.after(Task::RushResolve, 500);

        let tasks: Vec<Task> = drain(&mut scheduler, 1000)
            .into_iter()
            .map(|(task, _)| task)
            .collect();
        assert_eq!(
            tasks,
            vec![
                Task::Move(AnimatronicId::Bonnie),
                Task::RushResolve,
                Task::Move(AnimatronicId::Bonnie),
                Task::Move(AnimatronicId::Bonnie),
                Task::AttackCheck,
            ]
        );
    }

    #[test]
    fn test_ties_keep_registration_order() {
        let mut scheduler = Scheduler::new();
        scheduler.every(Task::Hour, 500).unwrap();
        scheduler.every(Task::Power, 500).unwrap();

        let fired = drain(&mut scheduler, 500);
        assert_eq!(fired, vec![(Task::Hour, 500), (Task::Power, 500)]);
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut scheduler = Scheduler::new();
        scheduler.after(Task::BlackoutStrike, 50);

        assert_eq!(drain(&mut scheduler, 1000).len(), 1);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_duplicate_periodic_rejected() {
        let mut scheduler = Scheduler::new();
        scheduler.every(Task::Hour, 1000).unwrap();

        let result = scheduler.every(Task::Hour, 1000);
        assert!(matches!(
            result,
            Err(NightError::TaskAlreadyScheduled(Task::Hour))
        ));
    }

    #[test]
    fn test_cancel_all_clears_and_bumps_epoch() {
        let mut scheduler = Scheduler::new();
        scheduler.every(Task::Hour, 1000).unwrap();
        scheduler.after(Task::RushResolve, 10);
        let epoch = scheduler.epoch();

        scheduler.cancel_all();

        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.epoch(), epoch + 1);
        assert!(scheduler.pop_due(u64::MAX).is_none());
        // The same periodic task may be registered again afterwards
        assert!(scheduler.every(Task::Hour, 1000).is_ok());
    }

    #[test]
    fn test_zero_period_rejected() {
        let mut scheduler = Scheduler::new();
        assert!(scheduler.every(Task::Power, 0).is_err());
    }
}
