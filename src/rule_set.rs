use std::str::FromStr;

use thiserror::Error;

/// Rules of Conway's Game of Life.
pub const B3S23: RuleSet = RuleSet::new(0b1000, 0b1100);

/// # Representation
/// Life rules are represented as
/// ```notrust
/// |------birth------|
/// 0000_0000_0000_0000_0000_0000_0000_0000
///                     |----survival-----|
/// ```
///
/// # Examples
/// ```notrust
/// b3s23:                0000_0000_0000_1000_0000_0000_0000_1100
///
/// b0s0:                 0000_0000_0000_0000_0000_0000_0000_0000
/// b012345678s012345678: 0000_0001_1111_1111_0000_0001_1111_1111
/// ```
///
/// Only [`B3S23`] is ever simulated. Other rules can still be parsed so that patterns written
/// for them are recognised and turned away.
///
/// See: https://conwaylife.com/wiki/Rulestring
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RuleSet {
    rule: u32,
}

impl Default for RuleSet {
    fn default() -> Self {
        B3S23
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

impl std::fmt::Display for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let digits = |mask: u16| -> String {
            (0..=8u16)
                .filter(|&n| mask & (1 << n) != 0)
                .map(|n| char::from(b'0' + n as u8))
                .collect()
        };

        write!(f, "B{}/S{}", digits(self.births()), digits(self.survivals()))
    }
}

impl RuleSet {
    /// Create a new `RuleSet` for the given births and survivals. For both `b` and
    /// `s`, numbers are set on a bit basis. For instance if bit `i` in `b` is on, it
    /// means `i` is included in the set of births. Any bit past the 8th is ignored.
    pub const fn new(b: u16, s: u16) -> Self {
        let b = b & 0x1FF;
        let s = s & 0x1FF;

        Self {
            rule: (b as u32) << 16 | s as u32,
        }
    }

    pub const fn births(&self) -> u16 {
        ((self.rule & 0x1FF0000) >> 0x10) as u16
    }

    pub const fn survivals(&self) -> u16 {
        (self.rule & 0x1FF) as u16
    }

    /// Whether a cell is alive in the next generation, given whether it is alive now and how many
    /// of its neighbours are.
    pub const fn next_state(&self, alive: bool, neighbors: u8) -> bool {
        if neighbors > 8 {
            return false;
        }

        let mask = if alive {
            self.survivals()
        } else {
            self.births()
        };

        mask & (1 << neighbors) != 0
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("Empty rule")]
    Empty,

    #[error("Expected a neighbour count in 0..=8, found '{got}'")]
    InvalidDigit { got: char },

    #[error("Expected exactly one '/' between births and survivals")]
    MissingSeparator,

    #[error("Births and survivals must be prefixed with 'B' and 'S', found '{got}'")]
    InvalidPrefix { got: String },
}

/// Parses rules in any of the common notations:
///
/// * `B3/S23`, as found in RLE header lines
/// * `S23/B3`, the same with survivals first
/// * `b3s23`, without a separator
/// * `23/3`, survivals first, as found in `#r` comment lines
impl FromStr for RuleSet {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.is_empty() {
            return Err(RuleError::Empty);
        }

        let starts_with_letter = s.starts_with(|c: char| c.is_ascii_alphabetic());

        if !starts_with_letter {
            let (s, b) = s.split_once('/').ok_or(RuleError::MissingSeparator)?;

            return Ok(RuleSet::new(digits_to_mask(b)?, digits_to_mask(s)?));
        }

        let lower = s.to_ascii_lowercase();
        let (b, s) = match lower.split_once('/') {
            Some((s, b)) if s.starts_with('s') && b.starts_with('b') => (b, s),
            Some(parts) => parts,
            None => {
                let i = lower.find('s').ok_or(RuleError::MissingSeparator)?;
                lower.split_at(i)
            }
        };

        let b = b.strip_prefix('b').ok_or_else(|| RuleError::InvalidPrefix {
            got: b.to_string(),
        })?;
        let s = s.strip_prefix('s').ok_or_else(|| RuleError::InvalidPrefix {
            got: s.to_string(),
        })?;

        Ok(RuleSet::new(digits_to_mask(b)?, digits_to_mask(s)?))
    }
}

/// Convert the human readable birth/survival digits to a packed bit representation
fn digits_to_mask(digits: &str) -> Result<u16, RuleError> {
    let mut n = 0;

    for c in digits.chars() {
        match c.to_digit(10) {
            Some(d) if d <= 8 => n |= 1 << d,
            _ => return Err(RuleError::InvalidDigit { got: c }),
        }
    }

    Ok(n)
}
