//! Ordered, additive listener registry.

use std::sync::{Arc, Mutex};

use crate::error::TrayError;
use crate::types::{ClickEvent, ExitInfo};

pub(crate) type ClickListener = Arc<dyn Fn(&ClickEvent) + Send + Sync>;
pub(crate) type ExitListener = Arc<dyn Fn(ExitInfo) + Send + Sync>;
pub(crate) type ErrorListener = Arc<dyn Fn(&TrayError) + Send + Sync>;
pub(crate) type StderrListener = Arc<dyn Fn(&str) + Send + Sync>;

/// Listeners for every kind of tray notification.
///
/// Each list fires in registration order. Lists are snapshotted before
/// invocation, so a listener may register further listeners.
#[derive(Default)]
pub(crate) struct Listeners {
    click: Mutex<Vec<ClickListener>>,
    exit: Mutex<Vec<ExitListener>>,
    error: Mutex<Vec<ErrorListener>>,
    stderr: Mutex<Vec<StderrListener>>,
}

fn snapshot<T: Clone>(list: &Mutex<Vec<T>>) -> Vec<T> {
    list.lock().unwrap_or_else(|e| e.into_inner()).clone()
}

fn push<T>(list: &Mutex<Vec<T>>, listener: T) {
    list.lock().unwrap_or_else(|e| e.into_inner()).push(listener);
}

impl Listeners {
    pub(crate) fn add_click(&self, listener: ClickListener) {
        push(&self.click, listener);
    }

    pub(crate) fn add_exit(&self, listener: ExitListener) {
        push(&self.exit, listener);
    }

    pub(crate) fn add_error(&self, listener: ErrorListener) {
        push(&self.error, listener);
    }

    pub(crate) fn add_stderr(&self, listener: StderrListener) {
        push(&self.stderr, listener);
    }

    pub(crate) fn emit_click(&self, event: &ClickEvent) {
        for listener in snapshot(&self.click) {
            listener(event);
        }
    }

    pub(crate) fn emit_exit(&self, info: ExitInfo) {
        for listener in snapshot(&self.exit) {
            listener(info);
        }
    }

    pub(crate) fn emit_error(&self, err: &TrayError) {
        let listeners = snapshot(&self.error);
        if listeners.is_empty() {
            tracing::warn!("unobserved tray error: {err}");
        }
        for listener in listeners {
            listener(err);
        }
    }

    pub(crate) fn emit_stderr(&self, line: &str) {
        for listener in snapshot(&self.stderr) {
            listener(line);
        }
    }
}
