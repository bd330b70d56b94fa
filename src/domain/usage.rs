// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tracking of unused and deprecated properties.
//!
//! A [`UsageTracker`] accumulates, across every configuration derived from one
//! another, which supplied properties were never looked up and which options
//! were set through a deprecated name. Cloning a tracker yields a handle to the
//! same accumulator.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Default)]
struct UsageState {
    unused: BTreeSet<String>,
    deprecated: BTreeSet<String>,
}

/// A shared accumulator of property usage.
///
/// # Examples
///
/// ```
/// use optcfg::domain::usage::UsageTracker;
///
/// let tracker = UsageTracker::with_unused(["a", "b"]);
/// let shared = tracker.clone();
/// shared.mark_used("a");
/// assert_eq!(tracker.unused().into_iter().collect::<Vec<_>>(), vec!["b".to_string()]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct UsageTracker {
    state: Arc<Mutex<UsageState>>,
}

impl UsageTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tracker in which all `keys` are still unused.
    pub fn with_unused<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tracker = Self::new();
        tracker.add_unused(keys);
        tracker
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut UsageState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    /// Adds keys to the unused set.
    pub fn add_unused<I, S>(&self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_state(|state| state.unused.extend(keys.into_iter().map(Into::into)));
    }

    /// Records that `key` was looked up.
    pub fn mark_used(&self, key: &str) {
        self.with_state(|state| state.unused.remove(key));
    }

    /// Records that `key` is a deprecated option that was set.
    pub fn mark_deprecated(&self, key: impl Into<String>) {
        self.with_state(|state| state.deprecated.insert(key.into()));
    }

    /// The keys that were supplied but never looked up.
    pub fn unused(&self) -> BTreeSet<String> {
        self.with_state(|state| state.unused.clone())
    }

    /// The deprecated options that were set.
    pub fn deprecated(&self) -> BTreeSet<String> {
        self.with_state(|state| state.deprecated.clone())
    }

    /// True if both handles refer to the same accumulator.
    pub fn is_shared_with(&self, other: &UsageTracker) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}
