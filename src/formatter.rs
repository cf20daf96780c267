//! Fixed-point decimal rendering without floating point
use core::{fmt, ops::Deref};

use heapless::String;

/// Capacity of a [`DecimalString`], enough for any `u32` at up to [`MAX_FRACTIONAL_DIGITS`]
pub const DECIMAL_CAPACITY: usize = 16;
/// Fewest digits rendered after the decimal point
pub const MIN_FRACTIONAL_DIGITS: u8 = 1;
/// Most digits rendered after the decimal point
pub const MAX_FRACTIONAL_DIGITS: u8 = 12;

/// Rendered fixed-point value, ex. `"123.4"`
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct DecimalString(String<DECIMAL_CAPACITY>);

impl DecimalString {
    /// Rendered text
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for DecimalString {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<&str> for DecimalString {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for DecimalString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DecimalString {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{=str}", self.as_str())
    }
}

/// Render `value` with its lowest `fractional_digits` decimal digits after the point.
///
/// `fractional_digits` is clamped to [`MIN_FRACTIONAL_DIGITS`]..=[`MAX_FRACTIONAL_DIGITS`]. At
/// least one integer digit is always rendered, so `(5, 1)` gives `"0.5"` and `(0, 1)` gives
/// `"0.0"`.
///
/// ```
/// use grove_current_monitor::formatter::format_fixed_decimal;
///
/// assert_eq!(format_fixed_decimal(1234, 1), "123.4");
/// assert_eq!(format_fixed_decimal(5, 2), "0.05");
/// ```
pub fn format_fixed_decimal(value: u32, fractional_digits: u8) -> DecimalString {
    let fractional_digits =
        usize::from(fractional_digits.clamp(MIN_FRACTIONAL_DIGITS, MAX_FRACTIONAL_DIGITS));

    // Filled from the end, least-significant digit first
    let mut buffer = [0u8; DECIMAL_CAPACITY];
    let mut start = DECIMAL_CAPACITY;
    let mut remaining = value;
    let mut digits = 0;

    while digits <= fractional_digits || remaining != 0 {
        if digits == fractional_digits {
            start -= 1;
            buffer[start] = b'.';
        }
        start -= 1;
        buffer[start] = b'0' + (remaining % 10) as u8;
        remaining /= 10;
        digits += 1;
    }

    let mut text = String::new();
    for &byte in &buffer[start..] {
        if text.push(char::from(byte)).is_err() {
            break;
        }
    }
    DecimalString(text)
}
