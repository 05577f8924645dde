use crate::dom::NodeId;
use crate::{Error, Result};

/// Work a timer performs when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerTask {
    RevealStatCard(NodeId),
    RevealTableRow(NodeId),
    DismissAlert(NodeId),
    RemoveClosedAlert(NodeId),
}

impl TimerTask {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::RevealStatCard(_) => "reveal_stat_card",
            Self::RevealTableRow(_) => "reveal_table_row",
            Self::DismissAlert(_) => "dismiss_alert",
            Self::RemoveClosedAlert(_) => "remove_closed_alert",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ScheduledTask {
    pub(crate) id: i64,
    pub(crate) due_at: i64,
    pub(crate) order: i64,
    pub(crate) task: TimerTask,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTimer {
    pub id: i64,
    pub due_at: i64,
    pub order: i64,
    pub label: &'static str,
}

/// Fake-clock queue of one-shot timers. Tasks run in `(due_at, order)`
/// order; nothing here can cancel a scheduled task.
#[derive(Debug)]
pub(crate) struct TimerQueue {
    tasks: Vec<ScheduledTask>,
    now_ms: i64,
    next_timer_id: i64,
    next_task_order: i64,
    step_limit: usize,
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            now_ms: 0,
            next_timer_id: 1,
            next_task_order: 0,
            step_limit: 10_000,
        }
    }
}

impl TimerQueue {
    pub(crate) fn now_ms(&self) -> i64 {
        self.now_ms
    }

    pub(crate) fn set_now(&mut self, now_ms: i64) {
        self.now_ms = now_ms;
    }

    pub(crate) fn step_limit(&self) -> usize {
        self.step_limit
    }

    pub(crate) fn set_step_limit(&mut self, max_steps: usize) -> Result<()> {
        if max_steps == 0 {
            return Err(Error::Runtime(
                "set_timer_step_limit requires at least 1 step".into(),
            ));
        }
        self.step_limit = max_steps;
        Ok(())
    }

    pub(crate) fn schedule(&mut self, task: TimerTask, delay_ms: i64) -> ScheduledTask {
        let delay_ms = delay_ms.max(0);
        let scheduled = ScheduledTask {
            id: self.next_timer_id,
            due_at: self.now_ms.saturating_add(delay_ms),
            order: self.next_task_order,
            task,
        };
        self.next_timer_id += 1;
        self.next_task_order += 1;
        self.tasks.push(scheduled.clone());
        scheduled
    }

    /// Removes and returns the next task due at or before `due_limit`.
    pub(crate) fn pop_next(&mut self, due_limit: Option<i64>) -> Option<ScheduledTask> {
        let idx = self.next_index(due_limit)?;
        Some(self.tasks.remove(idx))
    }

    pub(crate) fn has_next(&self, due_limit: Option<i64>) -> bool {
        self.next_index(due_limit).is_some()
    }

    fn next_index(&self, due_limit: Option<i64>) -> Option<usize> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| due_limit.is_none_or(|limit| task.due_at <= limit))
            .min_by_key(|(_, task)| (task.due_at, task.order))
            .map(|(idx, _)| idx)
    }

    pub(crate) fn len(&self) -> usize {
        self.tasks.len()
    }

    pub(crate) fn pending(&self) -> Vec<PendingTimer> {
        let mut timers = self
            .tasks
            .iter()
            .map(|task| PendingTimer {
                id: task.id,
                due_at: task.due_at,
                order: task.order,
                label: task.task.label(),
            })
            .collect::<Vec<_>>();
        timers.sort_by_key(|timer| (timer.due_at, timer.order));
        timers
    }

    pub(crate) fn step_limit_error(&self, steps: usize, due_limit: Option<i64>) -> Error {
        let due_limit_desc = due_limit
            .map(|value| value.to_string())
            .unwrap_or_else(|| "none".into());
        let next_task_desc = self
            .next_index(due_limit)
            .and_then(|idx| self.tasks.get(idx))
            .map(|task| {
                format!(
                    "id={},due_at={},order={},task={}",
                    task.id,
                    task.due_at,
                    task.order,
                    task.task.label()
                )
            })
            .unwrap_or_else(|| "none".into());

        Error::Runtime(format!(
            "timer queue exceeded max task steps: limit={}, steps={steps}, now_ms={}, due_limit={due_limit_desc}, pending_tasks={}, next_task={next_task_desc}",
            self.step_limit,
            self.now_ms,
            self.len(),
        ))
    }
}
