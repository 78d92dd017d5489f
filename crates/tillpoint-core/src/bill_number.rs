//! # Bill Numbers
//!
//! Bill numbers are issued by the backend when it can, and generated locally
//! otherwise.
//!
//! ```text
//! local sequence seeded with "INV-0098"
//!
//!   next()               → INV-0099
//!   commit fails         → next() still INV-0099
//!   advance_past(0099)   → next() INV-0100
//!
//! no usable seed         → BILL-<epoch-ms>-<random>
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A bill number as printed on the bill.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(transparent)]
pub struct BillNumber(String);

impl BillNumber {
    pub fn new(number: impl Into<String>) -> Self {
        BillNumber(number.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for BillNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a bill number came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BillNumberOrigin {
    ServerIssued,
    LocalFallback,
}

/// Increments the trailing digits of a bill number, keeping their width.
///
/// Returns `None` when the number has no trailing digits.
///
/// ## Example
/// ```rust
/// use tillpoint_core::bill_number::increment;
///
/// assert_eq!(increment("INV-0099").as_deref(), Some("INV-0100"));
/// assert_eq!(increment("B-99").as_deref(), Some("B-100"));
/// assert_eq!(increment("DRAFT"), None);
/// ```
pub fn increment(number: &str) -> Option<String> {
    let digits_start = number
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;

    let (prefix, digits) = number.split_at(digits_start);
    let mut bytes = digits.as_bytes().to_vec();

    let mut carry = true;
    for b in bytes.iter_mut().rev() {
        if !carry {
            break;
        }
        if *b == b'9' {
            *b = b'0';
        } else {
            *b += 1;
            carry = false;
        }
    }
    if carry {
        bytes.insert(0, b'1');
    }

    let digits = String::from_utf8(bytes).ok()?;
    Some(format!("{}{}", prefix, digits))
}

/// A placeholder number used when nothing better is available.
pub fn placeholder(now: DateTime<Utc>, random: u32) -> String {
    format!("BILL-{}-{:04}", now.timestamp_millis(), random % 10_000)
}

/// Locally generated bill numbers.
///
/// Tracks the last committed number; [`next`](Self::next) proposes the one
/// after it without consuming it, so a failed commit reuses the same number.
#[derive(Debug, Clone, Default)]
pub struct LocalBillSequence {
    last: Option<String>,
}

impl LocalBillSequence {
    pub fn new(seed: Option<String>) -> Self {
        LocalBillSequence {
            last: seed.filter(|s| !s.trim().is_empty()),
        }
    }

    /// Proposes the next bill number.
    pub fn next(&self, now: DateTime<Utc>, random: u32) -> BillNumber {
        let number = self
            .last
            .as_deref()
            .and_then(increment)
            .unwrap_or_else(|| placeholder(now, random));
        BillNumber(number)
    }

    /// Records a committed bill number. Numbers without trailing digits are
    /// ignored so the sequence keeps counting from its last usable value.
    pub fn advance_past(&mut self, committed: &BillNumber) {
        if increment(committed.as_str()).is_some() {
            self.last = Some(committed.0.clone());
        }
    }

    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
