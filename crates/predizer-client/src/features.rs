//! Turning the raw text of the input field into the numeric feature sequence.
//!
//! Every comma-separated segment becomes exactly one feature. Segments are converted with the
//! same coercion a browser applies to a form value (`Number(text)`): surrounding whitespace is
//! ignored, an empty segment is `0`, and anything that is not a numeric literal is `NaN`. `NaN`
//! values are kept so the server sees exactly what the user typed.

use serde::Serialize;

/// Separator between features in the input field.
pub const FEATURE_SEPARATOR: char = ',';

/// Ordered sequence of features sent in one prediction request.
///
/// Non-finite values (`NaN`, `±Infinity`) serialize as JSON `null`.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Number of features that did not coerce to a number.
    pub fn nan_count(&self) -> usize {
        self.0.iter().filter(|v| v.is_nan()).count()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl FromIterator<f64> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Split `text` on commas and coerce each segment.
///
/// An empty `text` yields a single `0` feature, since splitting never produces zero segments.
pub fn parse_features(text: &str) -> FeatureVector {
    text.split(FEATURE_SEPARATOR).map(coerce_number).collect()
}

/// Browser-style numeric coercion of a single segment.
pub fn coerce_number(raw: &str) -> f64 {
    let s = raw.trim_matches(is_js_whitespace);
    if s.is_empty() {
        return 0.0;
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(v) = parse_radix_literal(s) {
        return v;
    }
    if is_decimal_literal(s) {
        // `is_decimal_literal` only admits text `f64::from_str` accepts
        s.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

fn is_js_whitespace(c: char) -> bool {
    // U+0085 is Unicode whitespace but not a JS whitespace/line terminator
    (c.is_whitespace() && c != '\u{0085}') || c == '\u{FEFF}'
}

/// `0x1F`, `0o17`, `0b101`; unsigned only.
fn parse_radix_literal(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    if bytes.len() < 3 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };
    let mut value = 0.0_f64;
    for c in s[2..].chars() {
        let d = c.to_digit(radix)?;
        value = value * f64::from(radix) + f64::from(d);
    }
    Some(value)
}

/// `[+-]? (digits [. digits?]? | . digits) ([eE] [+-]? digits)?`
fn is_decimal_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        mantissa_digits += i - frac_start;
    }
    if mantissa_digits == 0 {
        return false;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}
