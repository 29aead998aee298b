use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::scheduler::Scheduler;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn icon(self) -> &'static str {
        match self {
            Severity::Info => "ℹ️",
            Severity::Success => "✅",
            Severity::Warning => "⚠️",
            Severity::Error => "❌",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ToastId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastPhase {
    /// Created but still sliding in; not drawn yet.
    Entering,
    Visible,
    /// Auto-hide started; removed once the exit delay elapses.
    Leaving,
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub severity: Severity,
    pub phase: ToastPhase,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToastTiming {
    pub entrance: Duration,
    pub display: Duration,
    pub exit: Duration,
}

impl Default for ToastTiming {
    fn default() -> Self {
        Self {
            entrance: Duration::from_millis(100),
            display: Duration::from_millis(4000),
            exit: Duration::from_millis(300),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Show,
    Hide,
    Remove,
}

#[derive(Clone, Copy, Debug)]
struct ToastTimer {
    toast: ToastId,
    stage: Stage,
}

/// Stack of transient messages rendered in the top-right corner.
///
/// Toasts are independent: no queue, no deduplication. Each one owns up to
/// three timers (show, hide, remove) which are cancelled on dismissal.
pub struct Notifier {
    toasts: Vec<Toast>,
    timers: Scheduler<ToastTimer>,
    timing: ToastTiming,
    next_id: u64,
}

impl Notifier {
    pub fn new(timing: ToastTiming) -> Self {
        Self {
            toasts: Vec::new(),
            timers: Scheduler::new(),
            timing,
            next_id: 0,
        }
    }

    pub fn notify(&mut self, message: impl Into<String>, severity: Severity, now: Instant) -> ToastId {
        let id = ToastId(self.next_id);
        self.next_id += 1;
        let message = message.into();
        debug!(severity = severity.as_str(), %message, "toast");

        self.toasts.push(Toast {
            id,
            message,
            severity,
            phase: ToastPhase::Entering,
        });
        self.timers.schedule(
            now,
            self.timing.entrance,
            ToastTimer {
                toast: id,
                stage: Stage::Show,
            },
        );
        self.timers.schedule(
            now,
            self.timing.display,
            ToastTimer {
                toast: id,
                stage: Stage::Hide,
            },
        );
        id
    }

    /// Remove a toast immediately. Its pending timers are cancelled.
    pub fn dismiss(&mut self, id: ToastId) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.timers.cancel_where(|t| t.toast == id);
        self.toasts.len() != before
    }

    pub fn dismiss_newest(&mut self) -> bool {
        match self.toasts.last() {
            Some(toast) => {
                let id = toast.id;
                self.dismiss(id)
            }
            None => false,
        }
    }

    pub fn tick(&mut self, now: Instant) {
        for timer in self.timers.drain_due(now) {
            self.fire(timer, now);
        }
    }

    fn fire(&mut self, timer: ToastTimer, now: Instant) {
        let Some(idx) = self.toasts.iter().position(|t| t.id == timer.toast) else {
            // Dismissed while the timer was in flight.
            debug!(?timer, "stale toast timer ignored");
            return;
        };
        match timer.stage {
            Stage::Show => {
                if self.toasts[idx].phase == ToastPhase::Entering {
                    self.toasts[idx].phase = ToastPhase::Visible;
                }
            }
            Stage::Hide => {
                self.toasts[idx].phase = ToastPhase::Leaving;
                self.timers.schedule(
                    now,
                    self.timing.exit,
                    ToastTimer {
                        toast: timer.toast,
                        stage: Stage::Remove,
                    },
                );
            }
            Stage::Remove => {
                self.toasts.remove(idx);
            }
        }
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Toasts that should be drawn, oldest first.
    pub fn shown(&self) -> impl Iterator<Item = &Toast> {
        self.toasts
            .iter()
            .filter(|t| t.phase != ToastPhase::Entering)
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.timers.next_due()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(ToastTiming::default())
    }
}
