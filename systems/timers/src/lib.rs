#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Cancellable tasks scheduled against simulated time.
//!
//! Timers only move when [`Timers::advance`] is called with a simulated
//! delta, so a paused simulation freezes every pending task. Each scheduled
//! task yields a [`TaskHandle`] that acts as its cancellation token.

use std::time::Duration;

/// Cancellation token identifying a scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

impl TaskHandle {
    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

#[derive(Clone, Debug)]
struct Scheduled<T> {
    handle: TaskHandle,
    deadline: Duration,
    task: T,
}

/// Set of pending tasks keyed by their simulated deadline.
#[derive(Clone, Debug)]
pub struct Timers<T> {
    now: Duration,
    next_handle: u64,
    pending: Vec<Scheduled<T>>,
}

impl<T> Timers<T> {
    /// Creates an empty timer set whose clock starts at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_handle: 0,
            pending: Vec::new(),
        }
    }

    /// Simulated time observed by the timer set.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Schedules `task` to become due once `delay` of simulated time elapsed.
    pub fn schedule(&mut self, delay: Duration, task: T) -> TaskHandle {
        self.schedule_at(self.now.saturating_add(delay), task)
    }

    /// Schedules `task` to become due at the absolute simulated `deadline`.
    ///
    /// Deadlines in the past become due on the next call to [`Timers::advance`].
    pub fn schedule_at(&mut self, deadline: Duration, task: T) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.pending.push(Scheduled {
            handle,
            deadline,
            task,
        });
        handle
    }

    /// Cancels a pending task, returning whether it was still pending.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|scheduled| scheduled.handle != handle);
        self.pending.len() != before
    }

    /// Cancels every pending task.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Reports whether the task identified by `handle` is still pending.
    #[must_use]
    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.pending
            .iter()
            .any(|scheduled| scheduled.handle == handle)
    }

    /// Deadline of a pending task.
    #[must_use]
    pub fn deadline(&self, handle: TaskHandle) -> Option<Duration> {
        self.pending
            .iter()
            .find(|scheduled| scheduled.handle == handle)
            .map(|scheduled| scheduled.deadline)
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Reports whether no task is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Advances the clock and moves every task that became due into `due`.
    ///
    /// Due tasks are emitted ordered by deadline, then by scheduling order.
    pub fn advance(&mut self, dt: Duration, due: &mut Vec<Due<T>>) {
        self.now = self.now.saturating_add(dt);

        let now = self.now;
        let mut expired = Vec::new();
        let mut index = 0;
        while index < self.pending.len() {
            if self.pending[index].deadline <= now {
                expired.push(self.pending.swap_remove(index));
            } else {
                index += 1;
            }
        }

        expired.sort_by_key(|scheduled| (scheduled.deadline, scheduled.handle));
        due.extend(expired.into_iter().map(|scheduled| Due {
            handle: scheduled.handle,
            deadline: scheduled.deadline,
            task: scheduled.task,
        }));
    }
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Task that became due during [`Timers::advance`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Due<T> {
    /// Handle the task was scheduled under.
    pub handle: TaskHandle,
    /// Deadline the task was scheduled for.
    pub deadline: Duration,
    /// Payload supplied when scheduling.
    pub task: T,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tasks_fire_once_their_deadline_passes() {
        let mut timers = Timers::new();
        let handle = timers.schedule(Duration::from_millis(500), "fire");
        let mut due = Vec::new();

        timers.advance(Duration::from_millis(499), &mut due);
        assert!(due.is_empty());
        assert!(timers.is_pending(handle));

        timers.advance(Duration::from_millis(1), &mut due);
        assert_eq!(
            due,
            vec![Due {
                handle,
                deadline: Duration::from_millis(500),
                task: "fire"
            }]
        );
        assert!(!timers.is_pending(handle));
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let mut timers = Timers::new();
        let handle = timers.schedule(Duration::from_millis(10), ());
        assert!(timers.cancel(handle));
        assert!(!timers.cancel(handle), "second cancel finds nothing");

        let mut due = Vec::new();
        timers.advance(Duration::from_secs(1), &mut due);
        assert!(due.is_empty());
    }

    #[test]
    fn due_tasks_are_ordered_by_deadline_then_schedule_order() {
        let mut timers = Timers::new();
        let late = timers.schedule(Duration::from_millis(30), 'c');
        let early = timers.schedule(Duration::from_millis(10), 'a');
        let tied = timers.schedule(Duration::from_millis(10), 'b');

        let mut due = Vec::new();
        timers.advance(Duration::from_millis(50), &mut due);

        let order: Vec<TaskHandle> = due.iter().map(|entry| entry.handle).collect();
        assert_eq!(order, vec![early, tied, late]);
    }

    #[test]
    fn clock_only_moves_when_advanced() {
        let mut timers: Timers<()> = Timers::new();
        let handle = timers.schedule(Duration::from_secs(1), ());
        assert_eq!(timers.deadline(handle), Some(Duration::from_secs(1)));

        let mut due = Vec::new();
        timers.advance(Duration::ZERO, &mut due);
        assert!(due.is_empty());
        assert_eq!(timers.now(), Duration::ZERO);
        assert_eq!(timers.len(), 1);
    }
}
