//! Progress reporting for long-running phases.
//!
//! A [`ProgressReporter`] is advanced once per unit of work, possibly from
//! many rayon workers at once, and notifies its [`ProgressListener`] only
//! when the position crosses into a new step.

use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Default number of notifications per task.
pub const DEFAULT_STEPS: usize = 100;

/// Receives progress notifications.
pub trait ProgressListener: Send + Sync {
    /// Progress of a task, `fraction` in `[0, 1]`.
    fn on_progress(&self, task: &str, message: &str, fraction: f64);

    /// The task is complete.
    fn on_finished(&self, task: &str);
}

/// Step-wise progress counter for one task.
pub struct ProgressReporter<'a> {
    listener: Option<&'a dyn ProgressListener>,
    task: &'a str,
    action: &'a str,
    unit: &'a str,
    total: usize,
    steps: usize,
    done: AtomicUsize,
    step: AtomicUsize,
}

impl<'a> ProgressReporter<'a> {
    /// Reporter over `total` units of `unit` with [`DEFAULT_STEPS`] steps.
    ///
    /// Messages read `{action} {done} of {total} {unit}`.
    pub fn new(
        listener: Option<&'a dyn ProgressListener>,
        task: &'a str,
        action: &'a str,
        unit: &'a str,
        total: usize,
    ) -> Self {
        Self::with_steps(listener, task, action, unit, total, DEFAULT_STEPS)
    }

    /// Reporter with an explicit number of steps (at least one).
    pub fn with_steps(
        listener: Option<&'a dyn ProgressListener>,
        task: &'a str,
        action: &'a str,
        unit: &'a str,
        total: usize,
        steps: usize,
    ) -> Self {
        Self {
            listener,
            task,
            action,
            unit,
            total,
            steps: steps.max(1),
            done: AtomicUsize::new(0),
            step: AtomicUsize::new(0),
        }
    }

    /// Units completed so far.
    pub fn done(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }

    /// Record one completed unit.
    pub fn advance(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        let Some(listener) = self.listener else {
            return;
        };
        if self.total == 0 {
            return;
        }
        let step = done.min(self.total) * self.steps / self.total;
        if self.step.fetch_max(step, Ordering::Relaxed) < step {
            let message = format!("{} {done} of {} {}", self.action, self.total, self.unit);
            listener.on_progress(self.task, &message, step as f64 / self.steps as f64);
        }
    }

    /// Signal completion to the listener.
    pub fn finish(&self) {
        if let Some(listener) = self.listener {
            listener.on_finished(self.task);
        }
    }
}

/// Latest known state of a task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskProgress {
    /// Last message.
    pub message: String,
    /// Last fraction.
    pub fraction: f64,
    /// Whether the task has finished.
    pub finished: bool,
}

/// Listener that remembers the latest state of every task.
#[derive(Default)]
pub struct StatefulProgressListener {
    tasks: DashMap<String, TaskProgress>,
    inner: Option<Arc<dyn ProgressListener>>,
}

impl StatefulProgressListener {
    /// Listener without forwarding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Listener that forwards every notification to `inner`.
    pub fn forwarding(inner: Arc<dyn ProgressListener>) -> Self {
        Self {
            tasks: DashMap::new(),
            inner: Some(inner),
        }
    }

    /// Latest state of a task.
    pub fn task(&self, task: &str) -> Option<TaskProgress> {
        self.tasks.get(task).map(|entry| entry.value().clone())
    }

    /// Names of all tasks seen so far.
    pub fn task_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tasks.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}

impl ProgressListener for StatefulProgressListener {
    fn on_progress(&self, task: &str, message: &str, fraction: f64) {
        self.tasks.insert(
            task.to_string(),
            TaskProgress {
                message: message.to_string(),
                fraction,
                finished: false,
            },
        );
        if let Some(inner) = &self.inner {
            inner.on_progress(task, message, fraction);
        }
    }

    fn on_finished(&self, task: &str) {
        self.tasks
            .entry(task.to_string())
            .and_modify(|p| {
                p.finished = true;
                p.fraction = 1.0;
            })
            .or_insert_with(|| TaskProgress {
                message: String::new(),
                fraction: 1.0,
                finished: true,
            });
        if let Some(inner) = &self.inner {
            inner.on_finished(task);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        messages: Mutex<Vec<String>>,
        fractions: Mutex<Vec<f64>>,
        finished: Mutex<Vec<String>>,
    }

    impl ProgressListener for Recorder {
        fn on_progress(&self, _task: &str, message: &str, fraction: f64) {
            self.messages.lock().unwrap().push(message.to_string());
            self.fractions.lock().unwrap().push(fraction);
        }

        fn on_finished(&self, task: &str) {
            self.finished.lock().unwrap().push(task.to_string());
        }
    }

    #[test]
    fn test_notifies_once_per_step() {
        let recorder = Recorder::default();
        let reporter =
            ProgressReporter::with_steps(Some(&recorder), "t", "mapped", "entities", 1000, 10);
        (0..1000).into_par_iter().for_each(|_| reporter.advance());
        reporter.finish();

        let fractions = recorder.fractions.lock().unwrap();
        assert!(fractions.len() <= 10);
        assert!(fractions.iter().any(|f| (*f - 1.0).abs() < f64::EPSILON));
        assert_eq!(reporter.done(), 1000);
        assert_eq!(*recorder.finished.lock().unwrap(), vec!["t".to_string()]);
    }

    #[test]
    fn test_small_totals_still_reach_the_end() {
        let recorder = Recorder::default();
        let reporter = ProgressReporter::new(Some(&recorder), "t", "mapped", "entities", 3);
        for _ in 0..3 {
            reporter.advance();
        }
        assert_eq!(recorder.fractions.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_message_names_action_and_unit() {
        let recorder = Recorder::default();
        let reporter =
            ProgressReporter::with_steps(Some(&recorder), "t", "resolved", "references", 4, 2);
        for _ in 0..4 {
            reporter.advance();
        }
        assert_eq!(
            *recorder.messages.lock().unwrap(),
            vec!["resolved 2 of 4 references", "resolved 4 of 4 references"]
        );
    }

    #[test]
    fn test_without_listener_only_counts() {
        let reporter = ProgressReporter::new(None, "t", "mapped", "entities", 0);
        reporter.advance();
        reporter.finish();
        assert_eq!(reporter.done(), 1);
    }

    #[test]
    fn test_stateful_listener_tracks_tasks() {
        let recorder = Arc::new(Recorder::default());
        let stateful = StatefulProgressListener::forwarding(recorder.clone());
        stateful.on_progress("Generating Triples", "generated triples for 5 of 10 entities", 0.5);
        assert_eq!(
            stateful.task("Generating Triples").map(|p| p.fraction),
            Some(0.5)
        );
        stateful.on_finished("Generating Triples");
        let state = stateful.task("Generating Triples").unwrap();
        assert!(state.finished);
        assert_eq!(state.message, "generated triples for 5 of 10 entities");
        assert_eq!(stateful.task_names(), vec!["Generating Triples".to_string()]);
        assert_eq!(recorder.fractions.lock().unwrap().len(), 1);
    }
}
