//! Sales column totals in fixed-point cents.

use std::fmt;

/// Sum of a CSV sales column, held in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct SalesTotal {
    cents: i64,
}

impl SalesTotal {
    /// Creates a total from a cent amount.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Returns the total in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.cents
    }

    /// Sums the first column whose header contains `sales`, case-insensitively.
    ///
    /// Blank lines are skipped. Cells that do not start with a number count as
    /// zero, and rows too short to reach the column are ignored. Input with no
    /// matching header totals zero.
    #[must_use]
    pub fn from_csv(csv: &str) -> Self {
        let mut lines = csv.lines().map(str::trim).filter(|line| !line.is_empty());
        let Some(header) = lines.next() else {
            return Self::default();
        };
        let Some(column) = header
            .split(',')
            .position(|cell| cell.trim().to_lowercase().contains("sales"))
        else {
            return Self::default();
        };

        let cents = lines
            .filter_map(|line| line.split(',').nth(column))
            .map(|cell| parse_cents(cell.trim()))
            .fold(0_i64, i64::saturating_add);
        Self { cents }
    }
}

impl fmt::Display for SalesTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let magnitude = self.cents.unsigned_abs();
        write!(
            f,
            "{sign}{}.{:02}",
            magnitude.div_euclid(100),
            magnitude.rem_euclid(100)
        )
    }
}

/// Reads the leading decimal number of a cell as cents, rounding half up on
/// the third fractional digit.
fn parse_cents(cell: &str) -> i64 {
    let negative = cell.starts_with('-');
    let unsigned = cell.strip_prefix(['-', '+']).unwrap_or(cell);

    let mut chars = unsigned.chars().peekable();
    let mut whole: i64 = 0;
    let mut seen_digit = false;
    while let Some(digit) = chars.peek().and_then(|ch| ch.to_digit(10)) {
        whole = whole.saturating_mul(10).saturating_add(i64::from(digit));
        seen_digit = true;
        chars.next();
    }

    let mut fraction: i64 = 0;
    let mut round_up = false;
    if chars.peek() == Some(&'.') {
        chars.next();
        let mut position = 0_u8;
        while let Some(digit) = chars.peek().and_then(|ch| ch.to_digit(10)) {
            match position {
                0 | 1 => fraction = fraction * 10 + i64::from(digit),
                2 => round_up = digit >= 5,
                _ => {}
            }
            position = position.saturating_add(1);
            seen_digit = true;
            chars.next();
        }
        if position == 1 {
            fraction *= 10;
        }
    }

    if !seen_digit {
        return 0;
    }
    let cents = whole
        .saturating_mul(100)
        .saturating_add(fraction)
        .saturating_add(i64::from(round_up));
    if negative { -cents } else { cents }
}
