//! Fixed-column field primitives for archive text blocks.
//!
//! ANSYS right-justifies every value in a field of known width, so blanks
//! mean "no digit here" rather than separating tokens. All routines work on
//! a byte buffer and an explicit [`TextCursor`]; none of them mutate the
//! buffer.

use mapdl_model::LineEnding;

use crate::error::{DecodeError, Result};

/// Position inside an immutable text buffer. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextCursor {
    pub position: usize,
}

fn is_eol(b: u8) -> bool {
    b == b'\r' || b == b'\n'
}

impl TextCursor {
    pub fn new(position: usize) -> Self {
        Self { position }
    }

    pub fn is_at_end(&self, buf: &[u8]) -> bool {
        self.position >= buf.len()
    }

    pub fn peek(&self, buf: &[u8]) -> Option<u8> {
        buf.get(self.position).copied()
    }

    /// Index of the next line terminator, or the buffer end.
    pub fn line_end(&self, buf: &[u8]) -> usize {
        buf.get(self.position..)
            .and_then(|rest| rest.iter().position(|&b| is_eol(b)))
            .map_or(buf.len(), |i| self.position + i)
    }

    pub fn skip_blanks(&mut self, buf: &[u8]) {
        while self.peek(buf) == Some(b' ') {
            self.position += 1;
        }
    }

    /// Consumes consecutive line terminators, returning the bytes skipped.
    pub fn skip_line_ends(&mut self, buf: &[u8], line_ending: LineEnding) -> usize {
        let start = self.position;
        match line_ending {
            LineEnding::Any => {
                while self.peek(buf).is_some_and(is_eol) {
                    self.position += 1;
                }
            }
            LineEnding::Lf => {
                while self.peek(buf) == Some(b'\n') {
                    self.position += 1;
                }
            }
            LineEnding::CrLf => {
                while buf.get(self.position..self.position + 2) == Some(b"\r\n".as_slice()) {
                    self.position += 2;
                }
            }
        }
        self.position - start
    }

    /// Moves past the remainder of the current line and its terminator.
    pub fn skip_line(&mut self, buf: &[u8]) {
        self.position = self.line_end(buf);
        self.skip_line_ends(buf, LineEnding::Any);
    }

    /// Advances over a field that is not materialized.
    pub fn skip_field(&mut self, buf: &[u8], width: usize) -> Result<()> {
        let available = buf.len().saturating_sub(self.position);
        if width > available {
            return Err(DecodeError::truncated("skipped field", width, available));
        }
        self.position += width;
        Ok(())
    }
}

/// Parses a right-justified integer occupying exactly `width` bytes.
///
/// Blanks anywhere in the field are ignored, an optional sign may precede
/// the digits, and an all-blank field reads as zero.
pub fn parse_fixed_int(buf: &[u8], cursor: &mut TextCursor, width: usize) -> Result<i32> {
    let start = cursor.position;
    let available = buf.len().saturating_sub(start);
    if width > available {
        return Err(DecodeError::truncated("integer field", width, available));
    }
    let field = &buf[start..start + width];

    let mut value: i64 = 0;
    let mut negative = false;
    let mut seen_digit = false;
    for &b in field {
        match b {
            b' ' => continue,
            b'-' | b'+' if !seen_digit && !negative => negative = b == b'-',
            b'0'..=b'9' => {
                seen_digit = true;
                value = value * 10 + i64::from(b - b'0');
                if value > i64::from(i32::MAX) + 1 {
                    return Err(DecodeError::Malformed(format!(
                        "integer field at byte {start} overflows: {:?}",
                        String::from_utf8_lossy(field)
                    )));
                }
            }
            _ => {
                return Err(DecodeError::Malformed(format!(
                    "unexpected byte {:?} in integer field at byte {start}",
                    b as char
                )));
            }
        }
    }
    let value = if negative { -value } else { value };
    let value = i32::try_from(value).map_err(|_| {
        DecodeError::Malformed(format!("integer field at byte {start} out of range"))
    })?;
    cursor.position += width;
    Ok(value)
}

/// Reports whether the next `width` bytes hold a `-`, without consuming
/// them. Used to spot `-1` block terminators.
pub fn probe_negative(buf: &[u8], cursor: &TextCursor, width: usize) -> bool {
    let start = cursor.position.min(buf.len());
    let end = start.saturating_add(width).min(buf.len());
    buf[start..end].contains(&b'-')
}

/// Result of reading one floating-point field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FloatField {
    Value(f64),
    /// The line ended before the field started; ANSYS omits trailing
    /// all-zero fields, so the value is zero and nothing was consumed.
    EndOfLine,
}

impl FloatField {
    pub fn value(self) -> f64 {
        match self {
            FloatField::Value(v) => v,
            FloatField::EndOfLine => 0.0,
        }
    }
}

/// Parses an ANSYS fixed-width float such as `1.0000000000000E+000`,
/// `-6.01203` or the Fortran form `0.1234567890123-100`.
///
/// The field spans `width` bytes or up to the end of the line, whichever is
/// shorter. At most `exponent_digits` exponent digits are accepted; zero
/// lifts the limit. Fortran drops the exponent letter once the magnitude
/// outgrows the field, so the `D` and bare-sign forms take one digit more.
pub fn parse_fixed_float(
    buf: &[u8],
    cursor: &mut TextCursor,
    width: usize,
    exponent_digits: usize,
) -> Result<FloatField> {
    let start = cursor.position;
    let end = start.saturating_add(width).min(cursor.line_end(buf));
    let field = buf.get(start..end).unwrap_or(&[]);
    let reached_eol = end < start.saturating_add(width);

    let mut i = 0;
    while i < field.len() && field[i] == b' ' {
        i += 1;
    }
    if i == field.len() {
        if reached_eol {
            return Ok(FloatField::EndOfLine);
        }
        cursor.position = end;
        return Ok(FloatField::Value(0.0));
    }

    let malformed = |what: &str| {
        DecodeError::Malformed(format!(
            "{what} in float field at byte {start}: {:?}",
            String::from_utf8_lossy(field)
        ))
    };
    let truncated = || DecodeError::truncated("float field", width, field.len());

    let literal_start = i;
    if matches!(field[i], b'-' | b'+') {
        i += 1;
    }
    let mut mantissa_digits = 0;
    let mut seen_point = false;
    while i < field.len() {
        match field[i] {
            b'0'..=b'9' => mantissa_digits += 1,
            b'.' if !seen_point => seen_point = true,
            _ => break,
        }
        i += 1;
    }
    if mantissa_digits == 0 {
        return Err(if i == field.len() {
            truncated()
        } else {
            malformed("missing mantissa digits")
        });
    }
    let mantissa_end = i;

    // `E`, `e`, `D`, `d`, or a bare exponent sign in the Fortran style.
    let mut standard = true;
    let mut exponent = None;
    if i < field.len() && field[i] != b' ' {
        match field[i] {
            b'E' | b'e' => i += 1,
            b'D' | b'd' => {
                standard = false;
                i += 1;
            }
            b'-' | b'+' => standard = false,
            _ => return Err(malformed("unexpected character")),
        }
        let negative = match field.get(i) {
            Some(b'-') => {
                i += 1;
                true
            }
            Some(b'+') => {
                i += 1;
                false
            }
            _ => false,
        };
        let digits_start = i;
        while i < field.len() && field[i].is_ascii_digit() {
            i += 1;
        }
        let digit_count = i - digits_start;
        if digit_count == 0 {
            return Err(if i == field.len() {
                truncated()
            } else {
                malformed("missing exponent digits")
            });
        }
        let limit = if standard {
            exponent_digits
        } else {
            exponent_digits + 1
        };
        if exponent_digits > 0 && digit_count > limit {
            return Err(malformed("too many exponent digits"));
        }
        let magnitude = field[digits_start..i]
            .iter()
            .fold(0i32, |acc, &d| acc.saturating_mul(10).saturating_add(i32::from(d - b'0')));
        exponent = Some(if negative { -magnitude } else { magnitude });
    }
    if field[i..].iter().any(|&b| b != b' ') {
        return Err(malformed("trailing characters"));
    }

    let value = if standard {
        // Only ASCII digits, signs, '.', and 'E' remain at this point.
        let literal = std::str::from_utf8(&field[literal_start..i])
            .map_err(|_| malformed("non-ASCII text"))?;
        literal
            .parse::<f64>()
            .map_err(|_| malformed("unparsable literal"))?
    } else {
        let mantissa = std::str::from_utf8(&field[literal_start..mantissa_end])
            .map_err(|_| malformed("non-ASCII text"))?;
        format!("{mantissa}e{}", exponent.unwrap_or(0))
            .parse::<f64>()
            .map_err(|_| malformed("unparsable literal"))?
    };

    cursor.position = end;
    Ok(FloatField::Value(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float(text: &str, width: usize, exp: usize) -> (FloatField, usize) {
        let mut cursor = TextCursor::default();
        let field = parse_fixed_float(text.as_bytes(), &mut cursor, width, exp)
            .unwrap_or_else(|e| panic!("{text:?}: {e}"));
        (field, cursor.position)
    }

    #[test]
    fn integers_ignore_blanks() {
        let buf = concat!("       1", "     -12", "    3 45").as_bytes();
        let mut cursor = TextCursor::default();
        assert_eq!(parse_fixed_int(buf, &mut cursor, 8).expect("first"), 1);
        assert_eq!(parse_fixed_int(buf, &mut cursor, 8).expect("second"), -12);
        assert_eq!(parse_fixed_int(buf, &mut cursor, 8).expect("third"), 345);
        assert_eq!(cursor.position, 24);
    }

    #[test]
    fn blank_integer_field_is_zero() {
        let mut cursor = TextCursor::default();
        assert_eq!(parse_fixed_int(b"    ", &mut cursor, 4).expect("blank"), 0);
    }

    #[test]
    fn short_integer_field_is_truncated() {
        let mut cursor = TextCursor::new(2);
        let err = parse_fixed_int(b"   12", &mut cursor, 8).expect_err("three bytes left");
        assert!(err.is_truncated());
        assert_eq!(cursor.position, 2);
    }

    #[test]
    fn line_break_inside_integer_field_is_malformed() {
        let mut cursor = TextCursor::default();
        let err = parse_fixed_int(b"  1\n    ", &mut cursor, 8).expect_err("newline");
        assert!(matches!(err, DecodeError::Malformed(_)));
    }

    #[test]
    fn probe_does_not_consume() {
        let buf = b"      -1\n";
        let cursor = TextCursor::default();
        assert!(probe_negative(buf, &cursor, 8));
        assert!(!probe_negative(b"       1", &cursor, 8));
        assert!(!probe_negative(b"", &cursor, 8));
        assert_eq!(cursor.position, 0);
    }

    #[test]
    fn ansys_float_layouts() {
        assert_eq!(float(" 1.0000000000000E+00 ", 21, 2), (FloatField::Value(1.0), 21));
        assert_eq!(float("-3.7826539829200E+00", 20, 2).0, FloatField::Value(-3.78265398292));
        assert_eq!(float(" 1.0000000000000E-001", 21, 3).0, FloatField::Value(0.1));
        assert_eq!(float("        -6.01203 ", 17, 2).0, FloatField::Value(-6.01203));
        assert_eq!(float("  2.5000000000000e+01", 21, 2).0, FloatField::Value(25.0));
        assert_eq!(float(" 0.1234567890123-100", 20, 3).0, FloatField::Value(0.1234567890123e-100));
        assert_eq!(float("   1.5D+02", 10, 2).0, FloatField::Value(150.0));
    }

    #[test]
    fn end_of_line_is_not_a_zero_value() {
        let (field, position) = float("   \r\n", 21, 2);
        assert_eq!(field, FloatField::EndOfLine);
        assert_eq!(field.value(), 0.0);
        assert_eq!(position, 0);

        let (field, position) = float(" 0.0000000000000E+00", 20, 2);
        assert_eq!(field, FloatField::Value(0.0));
        assert_eq!(position, 20);
    }

    #[test]
    fn field_stops_at_line_end() {
        let buf = b" 2.0000000000000E+00\n 3.0";
        let mut cursor = TextCursor::default();
        let field = parse_fixed_float(buf, &mut cursor, 25, 2).expect("value");
        assert_eq!(field, FloatField::Value(2.0));
        assert_eq!(cursor.position, 20);
    }

    #[test]
    fn cut_off_literal_is_truncated() {
        let mut cursor = TextCursor::default();
        let err = parse_fixed_float(b" 1.00000E+", &mut cursor, 21, 2).expect_err("no exponent");
        assert!(err.is_truncated());
        assert_eq!(cursor.position, 0);
    }

    #[test]
    fn exponent_wider_than_descriptor_is_malformed() {
        let mut cursor = TextCursor::default();
        let err = parse_fixed_float(b" 1.0E+001", &mut cursor, 9, 2).expect_err("three digits");
        assert!(matches!(err, DecodeError::Malformed(_)));
    }

    #[test]
    fn bare_sign_exponent_may_exceed_descriptor_by_one_digit() {
        assert_eq!(float(" 0.1000000000000-100", 20, 2).0, FloatField::Value(0.1e-100));
        assert_eq!(float(" 0.1000000000000+100", 20, 2).0, FloatField::Value(0.1e100));
        let mut cursor = TextCursor::default();
        let err = parse_fixed_float(b" 0.1-1000", &mut cursor, 9, 2).expect_err("four digits");
        assert!(matches!(err, DecodeError::Malformed(_)));
    }

    #[test]
    fn line_end_policies() {
        let buf = b"\r\n\r\nX";
        let mut cursor = TextCursor::default();
        assert_eq!(cursor.skip_line_ends(buf, LineEnding::Lf), 0);
        assert_eq!(cursor.skip_line_ends(buf, LineEnding::CrLf), 4);
        assert_eq!(cursor.peek(buf), Some(b'X'));

        let mut cursor = TextCursor::default();
        assert_eq!(cursor.skip_line_ends(b"\n\r\nX", LineEnding::Any), 3);
    }
}
