//! Locale-aware string ordering for table cells.
//!
//! Plain `str::cmp` orders by code point, which puts `"Zurich"` before `"apple"` and `"é"` after
//! `"z"`. Table columns are expected to sort the way a browser's `localeCompare` does, so this
//! module implements a small three-level collation modeled on the Unicode root collation:
//!
//! 1. **Primary**: base characters, ignoring case and accents.
//! 2. **Secondary**: accents (unaccented sorts first).
//! 3. **Tertiary**: case (lowercase first by default).
//!
//! This is not a full UCA implementation; contractions and script-specific
//! tailorings are not modeled. Letters without a canonical decomposition (`æ`, `ø`, `ł`) are
//! weighted by code point, so they sort after `z` rather than next to `a`, `o` and `l`.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization as _;

/// ASCII punctuation and symbols in root collation order.
const PUNCTUATION_ORDER: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

const CLASS_WHITESPACE: u8 = 0;
const CLASS_PUNCTUATION: u8 = 1;
const CLASS_SYMBOL: u8 = 2;
const CLASS_DIGIT: u8 = 3;
const CLASS_LETTER: u8 = 4;

/// Which case sorts first when two strings differ only by case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseFirst {
    #[default]
    Lower,
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Collator {
    /// Compare runs of ASCII digits by numeric value (`"item 2" < "item 10"`).
    pub numeric: bool,
    pub case_first: CaseFirst,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Primary {
    Char { class: u8, weight: u32 },
    /// Digit run with leading zeros stripped (numeric mode only).
    Number(String),
}

#[derive(Debug, Clone)]
struct Element {
    primary: Primary,
    marks: Vec<char>,
    upper: bool,
}

impl Collator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            numeric: false,
            case_first: CaseFirst::Lower,
        }
    }

    #[must_use]
    pub const fn numeric(mut self, numeric: bool) -> Self {
        self.numeric = numeric;
        self
    }

    #[must_use]
    pub const fn case_first(mut self, case_first: CaseFirst) -> Self {
        self.case_first = case_first;
        self
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }

        let left = self.elements(a);
        let right = self.elements(b);

        let primary = left
            .iter()
            .zip(&right)
            .map(|(l, r)| cmp_primary(&l.primary, &r.primary))
            .find(|ord| ord.is_ne())
            .unwrap_or_else(|| left.len().cmp(&right.len()));
        if primary.is_ne() {
            return primary;
        }

        let secondary = left
            .iter()
            .zip(&right)
            .map(|(l, r)| l.marks.cmp(&r.marks))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal);
        if secondary.is_ne() {
            return secondary;
        }

        left.iter()
            .zip(&right)
            .map(|(l, r)| match self.case_first {
                CaseFirst::Lower => l.upper.cmp(&r.upper),
                CaseFirst::Upper => r.upper.cmp(&l.upper),
            })
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    fn elements(&self, s: &str) -> Vec<Element> {
        let mut out: Vec<Element> = Vec::with_capacity(s.len());
        let mut chars = s.nfd().peekable();

        while let Some(c) = chars.next() {
            if is_combining_mark(c) {
                // A leading mark has no base to attach to and is ignored.
                if let Some(last) = out.last_mut() {
                    last.marks.push(c);
                }
                continue;
            }

            if self.numeric && c.is_ascii_digit() {
                let mut digits = String::new();
                digits.push(c);
                while let Some(&next) = chars.peek() {
                    if !next.is_ascii_digit() {
                        break;
                    }
                    digits.push(next);
                    chars.next();
                }
                let trimmed = digits.trim_start_matches('0');
                let digits = if trimmed.is_empty() { "0" } else { trimmed };
                out.push(Element {
                    primary: Primary::Number(digits.to_string()),
                    marks: Vec::new(),
                    upper: false,
                });
                continue;
            }

            let upper = c.is_uppercase();
            for folded in c.to_lowercase() {
                out.push(Element {
                    primary: primary_for(folded),
                    marks: Vec::new(),
                    upper,
                });
            }
        }

        out
    }
}

fn primary_for(c: char) -> Primary {
    if c.is_whitespace() {
        return Primary::Char {
            class: CLASS_WHITESPACE,
            weight: c as u32,
        };
    }
    if let Some(pos) = PUNCTUATION_ORDER.find(c) {
        return Primary::Char {
            class: CLASS_PUNCTUATION,
            weight: pos as u32,
        };
    }
    let class = if c.is_numeric() {
        CLASS_DIGIT
    } else if c.is_alphabetic() {
        CLASS_LETTER
    } else {
        CLASS_SYMBOL
    };
    Primary::Char {
        class,
        weight: c as u32,
    }
}

fn cmp_primary(a: &Primary, b: &Primary) -> Ordering {
    match (a, b) {
        (Primary::Number(x), Primary::Number(y)) => {
            x.len().cmp(&y.len()).then_with(|| x.cmp(y))
        }
        (Primary::Number(_), Primary::Char { class, .. }) => {
            CLASS_DIGIT.cmp(class).then(Ordering::Less)
        }
        (Primary::Char { class, .. }, Primary::Number(_)) => {
            class.cmp(&CLASS_DIGIT).then(Ordering::Greater)
        }
        (
            Primary::Char {
                class: ca,
                weight: wa,
            },
            Primary::Char {
                class: cb,
                weight: wb,
            },
        ) => ca.cmp(cb).then(wa.cmp(wb)),
    }
}
