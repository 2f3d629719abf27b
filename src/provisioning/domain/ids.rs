//! Project identifier derivation and the stamp source backing it.

use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

/// Repository name assigned to a single task execution.
///
/// Built from the caller's task identifier with every character outside
/// `[A-Za-z0-9-]` replaced by `-`, followed by `-` and a millisecond stamp.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectIdentifier(String);

impl ProjectIdentifier {
    /// Derives an identifier from a raw task identifier and a stamp.
    #[must_use]
    pub fn derive(task: &str, stamp_millis: i64) -> Self {
        let sanitized: String = task.chars().map(sanitize_char).collect();
        Self(format!("{sanitized}-{stamp_millis}"))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

const fn sanitize_char(ch: char) -> char {
    if ch.is_ascii_alphanumeric() || ch == '-' {
        ch
    } else {
        '-'
    }
}

impl AsRef<str> for ProjectIdentifier {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ProjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strictly increasing millisecond stamp source.
///
/// Returns the clock's current epoch milliseconds unless an earlier call
/// already issued that value, in which case the previous stamp plus one is
/// returned instead. Two calls on the same source never yield equal stamps.
#[derive(Debug, Default)]
pub struct ProjectStamp {
    last: AtomicI64,
}

impl ProjectStamp {
    /// Creates a stamp source that has not issued any stamps.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: AtomicI64::new(0),
        }
    }

    /// Issues the next stamp using the given clock.
    pub fn next(&self, clock: &impl Clock) -> i64 {
        let now = clock.utc().timestamp_millis();
        let mut previous = self.last.load(Ordering::Acquire);
        loop {
            let candidate = now.max(previous.saturating_add(1));
            match self.last.compare_exchange_weak(
                previous,
                candidate,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return candidate,
                Err(actual) => previous = actual,
            }
        }
    }
}
