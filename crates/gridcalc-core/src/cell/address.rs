//! Cell coordinates and ranges

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A zero-based grid position (e.g. "B3" is row 2, column 1)
///
/// Column letters are base-26 with no zero digit: A=0, Z=25, AA=26, ZZ=701, AAA=702.
/// Rows are 1-based in text and 0-based here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    /// Row index (0-based internally, 1-based in display)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ...)
    pub col: u32,
}

impl Coordinate {
    /// Create a new coordinate
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Parse a coordinate from A1-style notation
    ///
    /// Letters are case-insensitive. The row must be a positive integer without
    /// leading zeros so that every accepted address formats back to itself. Rows run
    /// from 1 to 2^32, so every `u32` row index has an address.
    ///
    /// # Examples
    /// ```
    /// use gridcalc_core::Coordinate;
    ///
    /// let at = Coordinate::parse("B3").unwrap();
    /// assert_eq!(at.row, 2);
    /// assert_eq!(at.col, 1);
    ///
    /// assert!(Coordinate::parse("3B").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::address("empty address"));
        }

        let letters_end = s
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(s.len());
        if letters_end == 0 {
            return Err(Error::address(format!("no column letters in '{}'", s)));
        }

        let (letters, digits) = s.split_at(letters_end);
        if digits.is_empty() {
            return Err(Error::address(format!("no row number in '{}'", s)));
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::address(format!(
                "unexpected characters after row number in '{}'",
                s
            )));
        }
        if digits.starts_with('0') {
            return Err(Error::address(format!(
                "row number must start with 1-9 in '{}'",
                s
            )));
        }

        let col = Self::letters_to_column(letters)?;
        let row = digits
            .parse::<u64>()
            .ok()
            .and_then(|n| u32::try_from(n - 1).ok())
            .ok_or_else(|| Error::address(format!("row number out of range in '{}'", s)))?;

        Ok(Self { row, col })
    }

    /// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
    pub fn letters_to_column(letters: &str) -> Result<u32> {
        if letters.is_empty() {
            return Err(Error::address("empty column letters"));
        }

        let mut acc: u64 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::address(format!("invalid column letter '{}'", c)));
            }
            let digit = (c.to_ascii_uppercase() as u64) - ('A' as u64) + 1;
            acc = acc * 26 + digit;
            if acc > u32::MAX as u64 + 1 {
                return Err(Error::address(format!("column '{}' out of range", letters)));
            }
        }

        Ok((acc - 1) as u32)
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: u32) -> String {
        let mut result = String::new();
        let mut n = col as u64 + 1;

        while n > 0 {
            n -= 1;
            result.insert(0, ((n % 26) as u8 + b'A') as char);
            n /= 26;
        }

        result
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", Self::column_to_letters(self.col), self.row as u64 + 1)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for Coordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Every coordinate in the closed rectangle spanned by two corners, row by row
///
/// The corners may be given in any order.
pub fn coords_in_range(start: Coordinate, end: Coordinate) -> Vec<Coordinate> {
    CellRange::new(start, end).cells().collect()
}

/// A rectangular, inclusive range of cells (e.g., "A1:B10")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRange {
    /// Top-left corner
    pub start: Coordinate,
    /// Bottom-right corner
    pub end: Coordinate,
}

impl CellRange {
    /// Create a new cell range, normalizing so `start` is top-left
    pub fn new(a: Coordinate, b: Coordinate) -> Self {
        Self {
            start: Coordinate::new(a.row.min(b.row), a.col.min(b.col)),
            end: Coordinate::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// Create a single-cell range
    pub fn single(at: Coordinate) -> Self {
        Self { start: at, end: at }
    }

    /// Parse a range from A1:B10 notation
    pub fn parse(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((start, end)) => {
                let start = Coordinate::parse(start.trim())
                    .map_err(|e| Error::MalformedRange(format!("'{}': {}", s, e)))?;
                let end = Coordinate::parse(end.trim())
                    .map_err(|e| Error::MalformedRange(format!("'{}': {}", s, e)))?;
                Ok(Self::new(start, end))
            }
            None => Ok(Self::single(Coordinate::parse(s.trim())?)),
        }
    }

    /// Check if a coordinate is within this range
    pub fn contains(&self, at: &Coordinate) -> bool {
        at.row >= self.start.row
            && at.row <= self.end.row
            && at.col >= self.start.col
            && at.col <= self.end.col
    }

    /// Get the number of rows in the range
    pub fn row_count(&self) -> u64 {
        (self.end.row - self.start.row) as u64 + 1
    }

    /// Get the number of columns in the range
    pub fn col_count(&self) -> u64 {
        (self.end.col - self.start.col) as u64 + 1
    }

    /// Get the total number of cells in the range
    pub fn cell_count(&self) -> u64 {
        self.row_count() * self.col_count()
    }

    /// Iterate over all coordinates in the range (row by row)
    pub fn cells(&self) -> CellRangeIter {
        CellRangeIter {
            range: *self,
            next: Some(self.start),
        }
    }

    /// Format as A1:B10 string
    pub fn to_a1_string(&self) -> String {
        if self.start == self.end {
            self.start.to_a1_string()
        } else {
            format!("{}:{}", self.start, self.end)
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Iterator over coordinates in a range
pub struct CellRangeIter {
    range: CellRange,
    next: Option<Coordinate>,
}

impl Iterator for CellRangeIter {
    type Item = Coordinate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;

        // Stepping past u32::MAX on either axis ends the walk.
        self.next = if current.col < self.range.end.col {
            Some(Coordinate::new(current.row, current.col + 1))
        } else if current.row < self.range.end.row {
            Some(Coordinate::new(current.row + 1, self.range.start.col))
        } else {
            None
        };

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(Coordinate::column_to_letters(0), "A");
        assert_eq!(Coordinate::column_to_letters(25), "Z");
        assert_eq!(Coordinate::column_to_letters(26), "AA");
        assert_eq!(Coordinate::column_to_letters(27), "AB");
        assert_eq!(Coordinate::column_to_letters(701), "ZZ");
        assert_eq!(Coordinate::column_to_letters(702), "AAA");
        assert_eq!(Coordinate::column_to_letters(16383), "XFD");
    }

    #[test]
    fn test_letters_to_column() {
        assert_eq!(Coordinate::letters_to_column("A").unwrap(), 0);
        assert_eq!(Coordinate::letters_to_column("Z").unwrap(), 25);
        assert_eq!(Coordinate::letters_to_column("AA").unwrap(), 26);
        assert_eq!(Coordinate::letters_to_column("ZZ").unwrap(), 701);
        assert_eq!(Coordinate::letters_to_column("AAA").unwrap(), 702);

        // Case insensitive
        assert_eq!(Coordinate::letters_to_column("a").unwrap(), 0);
        assert_eq!(Coordinate::letters_to_column("aB").unwrap(), 27);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Coordinate::parse("A1").unwrap(), Coordinate::new(0, 0));
        assert_eq!(Coordinate::parse("B3").unwrap(), Coordinate::new(2, 1));
        assert_eq!(Coordinate::parse("ab12").unwrap(), Coordinate::new(11, 27));
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", "A", "1", "A0", "A01", "3B", "A1B", "A-1", "A 1", "$A$1"] {
            assert!(
                matches!(Coordinate::parse(bad), Err(Error::MalformedAddress(_))),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_parse_overflow() {
        let huge_col = format!("{}1", "Z".repeat(40));
        assert!(Coordinate::parse(&huge_col).is_err());
        assert!(Coordinate::parse("A99999999999").is_err());
    }

    #[test]
    fn test_extreme_coordinates_round_trip() {
        let corner = Coordinate::new(u32::MAX, u32::MAX);
        assert_eq!(Coordinate::parse(&corner.to_a1_string()).unwrap(), corner);

        let last_row = Coordinate::new(u32::MAX, 0);
        assert_eq!(last_row.to_string(), "A4294967296");
        assert_eq!(Coordinate::parse("A4294967296").unwrap(), last_row);
        assert!(Coordinate::parse("A4294967297").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Coordinate::new(0, 0).to_string(), "A1");
        assert_eq!(Coordinate::new(99, 2).to_string(), "C100");
    }

    #[test]
    fn test_coords_in_range_row_major() {
        let coords = coords_in_range(Coordinate::new(0, 0), Coordinate::new(1, 2));
        let names: Vec<String> = coords.iter().map(|c| c.to_string()).collect();
        assert_eq!(names, vec!["A1", "B1", "C1", "A2", "B2", "C2"]);
    }

    #[test]
    fn test_coords_in_range_single_cell() {
        let at = Coordinate::new(4, 4);
        assert_eq!(coords_in_range(at, at), vec![at]);
    }

    #[test]
    fn test_range_parse_and_normalize() {
        let range = CellRange::parse("C3:A1").unwrap();
        assert_eq!(range.start, Coordinate::new(0, 0));
        assert_eq!(range.end, Coordinate::new(2, 2));
        assert_eq!(range.to_string(), "A1:C3");
        assert_eq!(range.cell_count(), 9);

        assert!(matches!(
            CellRange::parse("A1:"),
            Err(Error::MalformedRange(_))
        ));
    }

    #[test]
    fn test_range_contains() {
        let range = CellRange::parse("B2:D4").unwrap();
        assert!(range.contains(&Coordinate::new(1, 1)));
        assert!(range.contains(&Coordinate::new(3, 3)));
        assert!(!range.contains(&Coordinate::new(0, 1)));
        assert!(!range.contains(&Coordinate::new(4, 3)));
    }

    #[test]
    fn test_range_iter_at_axis_limit() {
        let range = CellRange::new(
            Coordinate::new(u32::MAX, u32::MAX - 1),
            Coordinate::new(u32::MAX, u32::MAX),
        );
        assert_eq!(range.cells().count(), 2);
    }

    proptest! {
        #[test]
        fn prop_coordinate_round_trip(row in any::<u32>(), col in any::<u32>()) {
            let at = Coordinate::new(row, col);
            prop_assert_eq!(Coordinate::parse(&at.to_a1_string()).unwrap(), at);
        }

        #[test]
        fn prop_address_round_trip(letters in "[A-Z]{1,5}", row in 1u32..1_000_000) {
            let text = format!("{}{}", letters, row);
            prop_assert_eq!(Coordinate::parse(&text).unwrap().to_a1_string(), text);
        }

        #[test]
        fn prop_range_order_independent(
            r1 in 0u32..50, c1 in 0u32..50, r2 in 0u32..50, c2 in 0u32..50,
        ) {
            let a = Coordinate::new(r1, c1);
            let b = Coordinate::new(r2, c2);
            prop_assert_eq!(coords_in_range(a, b), coords_in_range(b, a));
            prop_assert_eq!(
                coords_in_range(a, b).len() as u64,
                CellRange::new(a, b).cell_count()
            );
        }
    }
}
