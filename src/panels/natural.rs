//! Natural filename ordering
//!
//! Names are split into runs of ASCII digits and runs of everything else.
//! Digit runs compare by value, other runs compare case-insensitively by
//! code point, so `panel2.jpg` sorts before `panel10.jpg`. Panels are merged
//! in this order; it is the only thing that keeps them in reading order.

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Run<'a> {
    Digits(&'a str),
    Text(&'a str),
}

struct Runs<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Runs<'a> {
    type Item = Run<'a>;

    fn next(&mut self) -> Option<Run<'a>> {
        let first = self.rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = self
            .rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != digits)
            .map_or(self.rest.len(), |(i, _)| i);

        let (run, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(if digits { Run::Digits(run) } else { Run::Text(run) })
    }
}

fn runs(name: &str) -> Runs<'_> {
    Runs { rest: name }
}

/// Compare two filenames in natural order
///
/// Names differing only in letter case or in leading zeros of a number
/// compare equal; use [`sort_names`] when a listing needs one fixed order.
pub fn compare(a: &str, b: &str) -> Ordering {
    let mut left = runs(a);
    let mut right = runs(b);

    loop {
        let ord = match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => compare_runs(x, y),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
}

fn compare_runs(a: Run<'_>, b: Run<'_>) -> Ordering {
    match (a, b) {
        (Run::Digits(x), Run::Digits(y)) => compare_numbers(x, y),
        (Run::Text(x), Run::Text(y)) => x
            .chars()
            .flat_map(char::to_lowercase)
            .cmp(y.chars().flat_map(char::to_lowercase)),
        (Run::Digits(_), Run::Text(_)) => Ordering::Less,
        (Run::Text(_), Run::Digits(_)) => Ordering::Greater,
    }
}

// Compared as strings so runs longer than any integer type still work
fn compare_numbers(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Sort a directory listing into natural order
///
/// Ties under [`compare`] are broken byte-wise so the same listing always
/// produces the same sequence.
pub fn sort_names<S: AsRef<str>>(names: &mut [S]) {
    names.sort_by(|a, b| {
        let (a, b) = (a.as_ref(), b.as_ref());
        compare(a, b).then_with(|| a.cmp(b))
    });
}
