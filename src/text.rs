//! Fixed capacity text buffer.
//!
//! Every write clamps to the capacity instead of failing, cutting at the last
//! complete character that fits.

use core::fmt;
use core::ops::Deref;

use heapless::String;
use serde::Serialize;

/// Strip ASCII whitespace only. Latin-1 input maps NBSP and NEL to Unicode
/// whitespace, those are content.
pub fn trim_ascii(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_ascii_whitespace())
}

#[derive(Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FixedString<const N: usize> {
    inner: String<N>,
}

impl<const N: usize> FixedString<N> {
    pub const fn new() -> Self {
        Self {
            inner: String::new(),
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn as_str(&self) -> &str {
        self.inner.as_str()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.inner.len() == N
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Replace the content with `s`. Returns `false` if `s` was truncated.
    pub fn set(&mut self, s: &str) -> bool {
        self.inner.clear();
        self.push_str(s)
    }

    /// Append `s`, truncating on overflow. Returns `false` if anything was cut.
    pub fn push_str(&mut self, s: &str) -> bool {
        let avail = N - self.inner.len();
        if s.len() <= avail {
            // Cannot fail, the length was checked above.
            let _ = self.inner.push_str(s);
            return true;
        }

        let mut end = avail;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        let _ = self.inner.push_str(&s[..end]);
        false
    }

    /// Append a single character. Returns `false` if it did not fit.
    pub fn push(&mut self, c: char) -> bool {
        self.inner.push(c).is_ok()
    }

    /// Strip leading and trailing whitespace in place.
    pub fn trim_in_place(&mut self) {
        let s = self.inner.as_str();
        let trimmed = trim_ascii(s);
        if trimmed.len() == s.len() {
            return;
        }
        let copy = Self::from(trimmed);
        *self = copy;
    }

    /// Remove `count` bytes starting at byte offset `pos`.
    ///
    /// The range is clamped to the content. Nothing happens if either end of
    /// the range falls inside a multi-byte character.
    pub fn remove(&mut self, pos: usize, count: usize) {
        let len = self.inner.len();
        if pos >= len {
            return;
        }
        let end = pos.saturating_add(count).min(len);
        let s = self.inner.as_str();
        if !s.is_char_boundary(pos) || !s.is_char_boundary(end) {
            return;
        }

        let mut out = Self::from(&s[..pos]);
        out.push_str(&s[end..]);
        *self = out;
    }

    /// Copy of the byte range `start..end`, clamped to the content.
    ///
    /// Returns an empty buffer if the range does not sit on character
    /// boundaries.
    pub fn substring(&self, start: usize, end: usize) -> Self {
        let end = end.min(self.inner.len());
        if start >= end {
            return Self::new();
        }
        self.inner
            .as_str()
            .get(start..end)
            .map(Self::from)
            .unwrap_or_default()
    }
}

impl<const N: usize> From<&str> for FixedString<N> {
    fn from(s: &str) -> Self {
        let mut out = Self::new();
        out.push_str(s);
        out
    }
}

impl<const N: usize> Deref for FixedString<N> {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl<const N: usize> AsRef<str> for FixedString<N> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<const N: usize> PartialEq<str> for FixedString<N> {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl<const N: usize> PartialEq<&str> for FixedString<N> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Formatting into a full buffer truncates and never reports an error.
impl<const N: usize> fmt::Write for FixedString<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}

impl<const N: usize> fmt::Debug for FixedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl<const N: usize> fmt::Display for FixedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl<const N: usize> defmt::Format for FixedString<N> {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(f, "{=str}", self.as_str())
    }
}
