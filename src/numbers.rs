//! Int and Float conversions to and from `Str`, plus modulo helpers whose
//! result takes the sign of the divisor.

use crate::error::{Result, RuntimeError};
use crate::string::Str;

pub fn int_to_str(n: i64) -> Str {
    Str::from_string(n.to_string())
}

/// Shortest form that parses back to the same value. Integral finite values
/// keep a trailing `.0` so they still read as floats.
pub fn float_to_str(f: f64) -> Str {
    let mut s = f.to_string();
    if f.is_finite() && !s.contains('.') && !s.contains('e') {
        s.push_str(".0");
    }
    Str::from_string(s)
}

/// `a % b` with the result having the sign of `b`.
///
/// # Panics
/// If `b` is 0, as integer remainder does.
pub fn int_mod(a: i64, b: i64) -> i64 {
    let r = a.wrapping_rem(b);
    if (b > 0 && r < 0) || (b < 0 && r > 0) {
        r + b
    } else {
        r
    }
}

pub fn float_mod(a: f64, b: f64) -> f64 {
    let r = a % b;
    if (b > 0.0 && r < 0.0) || (b < 0.0 && r > 0.0) {
        r + b
    } else {
        r
    }
}

// Float to Int conversions saturate at the i64 range; NaN becomes 0.

pub fn float_floor(f: f64) -> i64 {
    f.floor() as i64
}

pub fn float_ceil(f: f64) -> i64 {
    f.ceil() as i64
}

/// Halfway cases round away from zero.
pub fn float_round(f: f64) -> i64 {
    f.round() as i64
}

pub fn float_truncate(f: f64) -> i64 {
    f.trunc() as i64
}

impl Str {
    /// Parse the whole string as a base-10 integer.
    pub fn to_int(&self) -> Result<i64> {
        let s = self.as_str();
        s.parse::<i64>()
            .map_err(|_| RuntimeError::invalid_number(&*s))
    }

    pub fn to_float(&self) -> Result<f64> {
        let s = self.as_str();
        s.parse::<f64>()
            .map_err(|_| RuntimeError::invalid_number(&*s))
    }
}
