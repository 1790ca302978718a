//! Repository name generation
//!
//! Generated names must stay unique across parallel and successive test
//! runs without any coordination, and must trace back to the test that
//! created them. Both properties come from the shape
//! `<time token>.<caller label>`.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Build a default repository name from a fresh time token and the
/// caller-supplied label.
pub fn generate(label: &str) -> String {
    format!("{}.{}", time_token(), sanitize_label(label))
}

/// Name a kept repository is moved to when its original name must become
/// available again.
pub fn rename_target(name: &str) -> String {
    format!("{}.{}", name, time_token())
}

/// Base-36 token derived from the current epoch microseconds.
///
/// Tokens are strictly increasing within a process, so two calls can never
/// produce the same token even inside one microsecond.
pub fn time_token() -> String {
    to_base36(next_micros())
}

static LAST_MICROS: AtomicI64 = AtomicI64::new(0);

fn next_micros() -> i64 {
    let now = Utc::now().timestamp_micros();
    let mut prev = LAST_MICROS.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(prev + 1);
        match LAST_MICROS.compare_exchange(prev, candidate, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return candidate,
            Err(actual) => prev = actual,
        }
    }
}

fn to_base36(value: i64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut remaining = value.unsigned_abs();
    if remaining == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while remaining > 0 {
        out.push(DIGITS[(remaining % 36) as usize]);
        remaining /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// Reduce a caller label to characters safe in both a directory name and a
/// URL path segment. Runs of unsafe characters collapse to a single dash.
pub fn sanitize_label(label: &str) -> String {
    let mut result = String::with_capacity(label.len());
    let mut last_was_dash = true; // skip leading dashes
    for c in label.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
            result.push(c);
            last_was_dash = false;
        } else if !last_was_dash {
            result.push('-');
            last_was_dash = true;
        }
    }
    if result.ends_with('-') {
        result.pop();
    }
    if result.is_empty() {
        result.push_str("test");
    }
    result
}
