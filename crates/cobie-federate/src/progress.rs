//! Progress reporting for long federation runs
//!
//! [`Progress`] keeps the counters and turns them into `(percent, message)`
//! events for a [`ProgressObserver`]. The observer is handed in explicitly by
//! whoever drives the run; there is no global progress channel. Callbacks run
//! inline on the merge loop, so observers must be cheap.

use tracing::debug;

/// Receives progress events
pub trait ProgressObserver {
    fn on_progress(&mut self, percent: u8, message: &str);
}

impl<F> ProgressObserver for F
where
    F: FnMut(u8, &str),
{
    fn on_progress(&mut self, percent: u8, message: &str) {
        self(percent, message)
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_progress(&mut self, _percent: u8, _message: &str) {}
}

/// Forwards events to `tracing` at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ProgressObserver for TracingObserver {
    fn on_progress(&mut self, percent: u8, message: &str) {
        debug!(percent, "{}", message);
    }
}

/// Percentage of `current` out of `total`
///
/// Anything strictly between 0 and 1 percent is reported as 1 so an observer
/// never sits on 0% while work is moving.
pub fn percent(current: usize, total: usize) -> u8 {
    if total == 0 || current == 0 {
        return 0;
    }
    let exact = current as f64 / total as f64 * 100.0;
    if exact > 0.0 && exact < 1.0 {
        1
    } else {
        exact.min(100.0) as u8
    }
}

/// Step counter driving an observer
pub struct Progress<'a> {
    observer: &'a mut dyn ProgressObserver,
    label: String,
    total: usize,
    current: usize,
}

impl<'a> Progress<'a> {
    pub fn new(observer: &'a mut dyn ProgressObserver) -> Self {
        Self {
            observer,
            label: String::new(),
            total: 0,
            current: 0,
        }
    }

    /// Start a new counted stage
    pub fn initialise(&mut self, label: impl Into<String>, total: usize, current: usize) {
        self.label = label.into();
        self.total = total;
        self.current = current.min(total);
        self.update();
    }

    /// Advance one step and notify
    pub fn increment_and_update(&mut self) {
        if self.current < self.total {
            self.current += 1;
        }
        self.update();
    }

    /// Send a free-form message at the current percentage
    pub fn report_message(&mut self, text: &str) {
        let percent = percent(self.current, self.total);
        self.observer.on_progress(percent, text);
    }

    /// Mark the stage complete
    pub fn finalise(&mut self) {
        self.current = self.total;
        let message = format!("{} finished", self.label);
        self.observer.on_progress(100, &message);
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn percent(&self) -> u8 {
        percent(self.current, self.total)
    }

    fn update(&mut self) {
        let message = if self.total != 0 && self.current > 0 {
            format!("{} [{}/{}]", self.label, self.current, self.total)
        } else {
            self.label.clone()
        };
        let percent = percent(self.current, self.total);
        self.observer.on_progress(percent, &message);
    }
}
