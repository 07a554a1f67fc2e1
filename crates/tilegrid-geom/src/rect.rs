use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Deserializer, Serialize};

/// Footprint of a widget in 1-based grid cells.
///
/// A well-formed rectangle has every field `>= 1`. Values coming from the
/// outside world go through [`Rect::sanitized`] before they reach the
/// layout store. Negative wire values decode as 0 so they get the same
/// treatment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rect {
    /// First occupied column (1-based).
    #[serde(deserialize_with = "cell_field")]
    pub col_start: u32,
    /// Number of occupied columns.
    #[serde(deserialize_with = "cell_field")]
    pub col_span: u32,
    /// First occupied row (1-based).
    #[serde(deserialize_with = "cell_field")]
    pub row_start: u32,
    /// Number of occupied rows.
    #[serde(deserialize_with = "cell_field")]
    pub row_span: u32,
}

/// Read a signed cell value, saturating into `0..=u32::MAX`.
fn cell_field<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    let v = i64::deserialize(d)?;
    Ok(u32::try_from(v.max(0)).unwrap_or(u32::MAX))
}

impl Rect {
    /// Construct a rectangle from start/span pairs as given.
    #[must_use]
    pub const fn new(col_start: u32, col_span: u32, row_start: u32, row_span: u32) -> Self {
        Self {
            col_start,
            col_span,
            row_start,
            row_span,
        }
    }

    /// Copy of `self` with every field floored at 1.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            col_start: self.col_start.max(1),
            col_span: self.col_span.max(1),
            row_start: self.row_start.max(1),
            row_span: self.row_span.max(1),
        }
    }

    /// True when every field is at least 1.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.col_start >= 1 && self.col_span >= 1 && self.row_start >= 1 && self.row_span >= 1
    }

    /// One past the last occupied column.
    #[inline]
    #[must_use]
    pub const fn col_end(&self) -> u64 {
        self.col_start as u64 + self.col_span as u64
    }

    /// One past the last occupied row.
    #[inline]
    #[must_use]
    pub const fn row_end(&self) -> u64 {
        self.row_start as u64 + self.row_span as u64
    }

    /// Last occupied column (inclusive).
    #[inline]
    #[must_use]
    pub const fn last_col(&self) -> u64 {
        self.col_end() - 1
    }

    /// Last occupied row (inclusive).
    #[inline]
    #[must_use]
    pub const fn last_row(&self) -> u64 {
        self.row_end() - 1
    }
}

impl Display for Rect {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "col {}+{} row {}+{}",
            self.col_start, self.col_span, self.row_start, self.row_span
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges() {
        let r = Rect::new(3, 4, 2, 1);
        assert_eq!(r.col_end(), 7);
        assert_eq!(r.last_col(), 6);
        assert_eq!(r.row_end(), 3);
        assert_eq!(r.last_row(), 2);
    }

    #[test]
    fn sanitized_floors_zero_fields() {
        let r = Rect::new(0, 0, 5, 0).sanitized();
        assert_eq!(r, Rect::new(1, 1, 5, 1));
        assert!(r.is_valid());
        assert!(!Rect::new(1, 0, 1, 1).is_valid());
    }

    #[test]
    fn serde_uses_camel_case() {
        let json = serde_json::to_string(&Rect::new(1, 4, 1, 3)).unwrap();
        assert_eq!(json, r#"{"colStart":1,"colSpan":4,"rowStart":1,"rowSpan":3}"#);
    }

    #[test]
    fn negative_wire_values_read_as_zero() {
        let r: Rect =
            serde_json::from_str(r#"{"colStart":-1,"colSpan":-4,"rowStart":0,"rowSpan":2}"#)
                .unwrap();
        assert_eq!(r, Rect::new(0, 0, 0, 2));
        assert_eq!(r.sanitized(), Rect::new(1, 1, 1, 2));
    }
}
