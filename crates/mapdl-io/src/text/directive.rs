//! Fortran-style format directives that follow block headers, e.g.
//! `(3i9,6e21.13e3)` for NBLOCK or `(19i9)` for EBLOCK.

use mapdl_model::FormatDescriptor;

use crate::error::{DecodeError, Result};

/// Exponent width of `eW.D` items that carry no explicit `eN` suffix.
const DEFAULT_EXPONENT_DIGITS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Float,
}

/// One `[repeat]kW[.D[eN]]` item of a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub repeat: usize,
    pub kind: FieldKind,
    pub width: usize,
    pub decimals: Option<usize>,
    pub exponent_digits: Option<usize>,
}

fn malformed(directive: &str, what: &str) -> DecodeError {
    DecodeError::Malformed(format!("format directive {directive:?}: {what}"))
}

fn take_number(s: &str) -> (Option<usize>, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    (s[..end].parse().ok(), &s[end..])
}

fn parse_item(item: &str, directive: &str) -> Result<FieldSpec> {
    let (repeat, rest) = take_number(item.trim());
    let mut chars = rest.chars();
    let kind = match chars.next().map(|c| c.to_ascii_lowercase()) {
        Some('i') => FieldKind::Integer,
        Some('e' | 'g' | 'f' | 'd') => FieldKind::Float,
        _ => return Err(malformed(directive, "unknown field kind")),
    };
    let (width, rest) = take_number(chars.as_str());
    let width = width
        .filter(|&w| w > 0)
        .ok_or_else(|| malformed(directive, "missing field width"))?;

    let (decimals, rest) = match rest.strip_prefix('.') {
        Some(after) => take_number(after),
        None => (None, rest),
    };
    let (exponent_digits, rest) = match rest.strip_prefix(['e', 'E']) {
        Some(after) => take_number(after),
        None => (None, rest),
    };
    if !rest.is_empty() {
        return Err(malformed(directive, "unexpected trailing text"));
    }
    Ok(FieldSpec {
        repeat: repeat.unwrap_or(1),
        kind,
        width,
        decimals,
        exponent_digits,
    })
}

/// Splits a directive such as `(3i9,6e21.13e3)` into its items.
pub fn parse_directive(directive: &str) -> Result<Vec<FieldSpec>> {
    let body = directive
        .trim()
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| malformed(directive, "expected parenthesized list"))?;
    body.split(',')
        .filter(|item| !item.trim().is_empty())
        .map(|item| parse_item(item, directive))
        .collect()
}

fn integer_widths(items: &[FieldSpec]) -> Vec<usize> {
    items
        .iter()
        .filter(|f| f.kind == FieldKind::Integer)
        .flat_map(|f| std::iter::repeat_n(f.width, f.repeat))
        .collect()
}

/// Descriptor for an NBLOCK directive: node number, two skipped integers,
/// then the floating DOF fields.
pub fn nblock_format(directive: &str) -> Result<FormatDescriptor> {
    let items = parse_directive(directive)?;
    let ints = integer_widths(&items);
    let Some(&int_width) = ints.first() else {
        return Err(malformed(directive, "no integer field"));
    };
    let float = items
        .iter()
        .find(|f| f.kind == FieldKind::Float)
        .ok_or_else(|| malformed(directive, "no floating field"))?;

    let mut descriptor = FormatDescriptor::new(
        int_width,
        float.width,
        float.exponent_digits.unwrap_or(DEFAULT_EXPONENT_DIGITS),
    )
    .with_dof_fields(float.repeat);
    let skip = [
        ints.get(1).copied().unwrap_or(0),
        ints.get(2).copied().unwrap_or(0),
    ];
    if skip != [int_width, int_width] {
        descriptor = descriptor.with_skip_widths(skip[0], skip[1]);
    }
    Ok(descriptor)
}

/// Descriptor for an EBLOCK directive; only the integer width matters.
pub fn eblock_format(directive: &str) -> Result<FormatDescriptor> {
    let items = parse_directive(directive)?;
    let int_width = integer_widths(&items)
        .first()
        .copied()
        .ok_or_else(|| malformed(directive, "no integer field"))?;
    Ok(FormatDescriptor::integers(int_width))
}
