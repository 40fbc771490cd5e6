use rust_decimal::Decimal;

use crate::config::ColumnLayout;
use crate::error::LineError;

/// Largest number of fractional digits a `Decimal` can carry.
const MAX_SCALE: u32 = 28;

/// The two fields of a line the engine cares about. Borrowed from the line
/// and dropped as soon as it has been folded into the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRecord<'a> {
    pub key: &'a str,
    pub value: Decimal,
}

/// Positional scanner that slices out only the key and value columns.
#[derive(Debug, Clone, Copy)]
pub struct FieldExtractor {
    columns: usize,
    key_column: usize,
    value_column: usize,
    delimiter: u8,
}

impl FieldExtractor {
    pub fn new(layout: &ColumnLayout) -> Self {
        Self {
            columns: layout.columns,
            key_column: layout.key_column,
            value_column: layout.value_column,
            delimiter: layout.delimiter,
        }
    }

    /// Extracts `(key, value)` from one line.
    ///
    /// Blank and whitespace-only lines give `Ok(None)`. The last column may
    /// run to the end of the line or be closed by a single trailing
    /// delimiter.
    pub fn extract<'a>(&self, line: &'a [u8]) -> Result<Option<RawRecord<'a>>, LineError> {
        if line.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        let mut start = 0;
        let mut key: &[u8] = &[];
        let mut value: &[u8] = &[];
        for column in 0..self.columns {
            let end = match find_delimiter(line, start, self.delimiter) {
                Some(end) => end,
                None if column + 1 == self.columns => line.len(),
                None => {
                    return Err(LineError::TooFewColumns {
                        expected: self.columns,
                        found: column + 1,
                    })
                }
            };
            if column == self.key_column {
                key = &line[start..end];
            } else if column == self.value_column {
                value = &line[start..end];
            }
            start = end + 1;
        }
        if start < line.len() {
            return Err(LineError::TooManyColumns {
                expected: self.columns,
            });
        }

        let key = match std::str::from_utf8(key) {
            Ok(key) if !key.is_empty() => key,
            _ => return Err(LineError::InvalidKey),
        };
        let value = parse_decimal(value)
            .ok_or_else(|| LineError::InvalidValue(String::from_utf8_lossy(value).into_owned()))?;
        Ok(Some(RawRecord { key, value }))
    }
}

#[inline]
fn find_delimiter(line: &[u8], start: usize, delimiter: u8) -> Option<usize> {
    line[start..]
        .iter()
        .position(|&b| b == delimiter)
        .map(|pos| start + pos)
}

/// Parses invariant decimal notation: optional `-`, digits, at most one `.`.
///
/// Surrounding ASCII whitespace is ignored. Signs other than a leading `-`,
/// group separators and exponents are rejected.
pub fn parse_decimal(raw: &[u8]) -> Option<Decimal> {
    let raw = raw.trim_ascii();
    let (negative, digits) = match raw.split_first() {
        Some((b'-', rest)) => (true, rest),
        _ => (false, raw),
    };

    let mut mantissa: i128 = 0;
    let mut scale: u32 = 0;
    let mut seen_point = false;
    let mut seen_digit = false;
    for &b in digits {
        match b {
            b'0'..=b'9' => {
                mantissa = mantissa.checked_mul(10)?.checked_add(i128::from(b - b'0'))?;
                if seen_point {
                    scale += 1;
                    if scale > MAX_SCALE {
                        return None;
                    }
                }
                seen_digit = true;
            }
            b'.' if !seen_point => seen_point = true,
            _ => return None,
        }
    }
    if !seen_digit {
        return None;
    }
    if negative {
        mantissa = -mantissa;
    }
    Decimal::try_from_i128_with_scale(mantissa, scale).ok()
}
