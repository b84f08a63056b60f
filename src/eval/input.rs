//! Raw answer values and the per-participant answer sheet.
//!
//! Hosts hand the engine whatever their widgets produce: text from an input
//! box, a number, a checkbox flag. Parsing is lenient and happens here, at
//! evaluation time, never in the host.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// An unvalidated answer value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum RawInput {
    #[display("{_0}")]
    Text(String),
    #[display("{_0}")]
    Number(i64),
    #[display("{_0}")]
    Flag(bool),
}

impl RawInput {
    /// Whitespace-only text counts as no answer at all.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, RawInput::Text(text) if text.trim().is_empty())
    }

    /// Integer value, read leniently from text: leading whitespace, an
    /// optional sign, then as many digits as follow (`"45°"` is 45).
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            RawInput::Number(n) => Some(*n),
            RawInput::Text(text) => parse_int_prefix(text),
            RawInput::Flag(_) => None,
        }
    }

    /// Boolean value. Blank text reads as `false`.
    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            RawInput::Flag(b) => Some(*b),
            RawInput::Number(n) => Some(*n != 0),
            RawInput::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "x" => Some(true),
                "" | "0" | "false" | "no" => Some(false),
                _ => None,
            },
        }
    }

    /// A single symbol, upper-cased.
    #[must_use]
    pub fn as_symbol(&self) -> Option<char> {
        let RawInput::Text(text) = self else {
            return None;
        };
        let mut chars = text.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c.to_ascii_uppercase()),
            _ => None,
        }
    }
}

fn parse_int_prefix(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for digit in digits.bytes().take_while(u8::is_ascii_digit) {
        seen = true;
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(digit - b'0'));
    }

    seen.then(|| if negative { -value } else { value })
}

impl From<&str> for RawInput {
    fn from(text: &str) -> Self {
        RawInput::Text(text.to_owned())
    }
}

impl From<String> for RawInput {
    fn from(text: String) -> Self {
        RawInput::Text(text)
    }
}

impl From<char> for RawInput {
    fn from(symbol: char) -> Self {
        RawInput::Text(symbol.to_string())
    }
}

impl From<i64> for RawInput {
    fn from(n: i64) -> Self {
        RawInput::Number(n)
    }
}

impl From<i32> for RawInput {
    fn from(n: i32) -> Self {
        RawInput::Number(i64::from(n))
    }
}

impl From<bool> for RawInput {
    fn from(flag: bool) -> Self {
        RawInput::Flag(flag)
    }
}

/// One participant's answers for one round, keyed by answer position.
///
/// Sparse: unanswered positions simply have no entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSheet {
    entries: FxHashMap<usize, RawInput>,
}

impl AnswerSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value recorded at `position`, blank or not.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&RawInput> {
        self.entries.get(&position)
    }

    /// Value at `position`, treating blank text as unanswered.
    #[must_use]
    pub fn answered(&self, position: usize) -> Option<&RawInput> {
        self.get(position).filter(|input| !input.is_blank())
    }

    /// Record a value, returning the one it replaced.
    pub fn insert(&mut self, position: usize, value: RawInput) -> Option<RawInput> {
        self.entries.insert(position, value)
    }

    /// Clear a position, returning what it held.
    pub fn remove(&mut self, position: usize) -> Option<RawInput> {
        self.entries.remove(&position)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending position order.
    #[must_use]
    pub fn entries(&self) -> Vec<(usize, &RawInput)> {
        let mut entries: Vec<_> = self.entries.iter().map(|(p, v)| (*p, v)).collect();
        entries.sort_unstable_by_key(|(position, _)| *position);
        entries
    }

    /// Whether `symbol` is already placed at any position.
    #[must_use]
    pub fn holds_symbol(&self, symbol: char) -> bool {
        self.entries.values().any(|v| v.as_symbol() == Some(symbol))
    }
}

impl FromIterator<(usize, RawInput)> for AnswerSheet {
    fn from_iter<I: IntoIterator<Item = (usize, RawInput)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
