use thiserror::Error;
use tracing::debug;
use tracing::warn;

use crate::CellOffset;
use crate::cell::Cell;
use crate::cell_set::CellSet;
use crate::parse_rle;
use crate::parse_rle::RleError;
use crate::rule_set::B3S23;
use crate::rule_set::RuleSet;

/// Default number of cells a brush can hold.
pub const DEFAULT_BRUSH_CAPACITY: usize = 128;

/// Number of brush slots.
pub const BRUSH_SLOTS: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BrushError {
    #[error("Brush slot {slot} is out of range, there are {} slots", BRUSH_SLOTS)]
    SlotOutOfRange { slot: usize },
}

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("Failed to read RLE pattern: {0}")]
    Rle(#[from] RleError),

    #[error("Pattern is written for rule {rule}, only {} is supported", B3S23)]
    UnsupportedRule { rule: RuleSet },
}

/// A stamp pattern: offsets relative to wherever it is stamped.
///
/// Offsets are kept in the order they were added, but only the set of offsets matters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brush {
    offsets: Vec<(CellOffset, CellOffset)>,
    capacity: usize,
}

impl Default for Brush {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_BRUSH_CAPACITY)
    }
}

impl Brush {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            offsets: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Build a brush from an RLE pattern. Cells past `capacity` are dropped.
    ///
    /// Offsets are relative to the pattern's top-left corner; a `#P`/`#R` offset in the file is
    /// not applied.
    pub fn from_rle(bytes: &[u8], capacity: usize) -> Result<Self, PatternError> {
        let mut brush = Self::with_capacity(capacity);
        let mut total = 0usize;

        let file = parse_rle::read_rle(bytes, |dx, dy| {
            total += 1;
            brush.push(dx, dy);
        })?;

        match file.rule {
            Some(rule) if rule != B3S23 => return Err(PatternError::UnsupportedRule { rule }),
            _ => {}
        }

        if let Some((ox, oy)) = file.offset {
            brush.offsets.retain_mut(|(dx, dy)| {
                let (Some(x), Some(y)) = (dx.checked_sub(ox), dy.checked_sub(oy)) else {
                    return false;
                };

                (*dx, *dy) = (x, y);

                true
            });
        }

        if total > brush.len() {
            warn!(
                cells = total,
                kept = brush.len(),
                "pattern does not fit in brush, truncated"
            );
        }

        let name = file.name.map(String::from_utf8_lossy);
        debug!(
            name = name.as_deref().unwrap_or("unnamed"),
            cells = brush.len(),
            "loaded pattern"
        );

        Ok(brush)
    }

    /// Append an offset. Returns `false` if the brush is full.
    pub fn push(&mut self, dx: CellOffset, dy: CellOffset) -> bool {
        if self.is_full() {
            return false;
        }

        self.offsets.push((dx, dy));

        true
    }

    /// Replace the brush with the alive cells of the `width x height` rectangle whose top-left
    /// corner is `origin`.
    pub fn capture(&mut self, origin: Cell, width: u16, height: u16, source: &CellSet) {
        self.clear();

        // i16 offsets cannot reach past this
        let width = width.min(CellOffset::MAX as u16 + 1);
        let height = height.min(CellOffset::MAX as u16 + 1);

        for i in 0..width {
            for j in 0..height {
                let (dx, dy) = (i as CellOffset, j as CellOffset);

                let Some(cell) = origin.offset(dx, dy) else {
                    continue;
                };

                if source.contains(cell) {
                    self.push(dx, dy);
                }
            }
        }

        debug!(
            x = origin.x,
            y = origin.y,
            width,
            height,
            cells = self.len(),
            "captured brush"
        );
    }

    /// Place every cell of the brush relative to `anchor`. Never kills anything.
    pub fn stamp(&self, anchor: Cell, target: &mut CellSet) {
        for cell in self.cells_at(anchor) {
            target.insert(cell);
        }
    }

    /// The cells the brush covers when anchored at `anchor`.
    pub fn cells_at(&self, anchor: Cell) -> impl Iterator<Item = Cell> + '_ {
        self.offsets
            .iter()
            .filter_map(move |&(dx, dy)| anchor.offset(dx, dy))
    }

    pub fn offsets(&self) -> &[(CellOffset, CellOffset)] {
        &self.offsets
    }

    pub fn clear(&mut self) {
        self.offsets.clear();
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.offsets.len() >= self.capacity
    }
}

/// The ten brush slots. Slots are plain storage and never affect one another.
#[derive(Debug, Clone)]
pub struct Brushes {
    slots: [Brush; BRUSH_SLOTS],
}

impl Default for Brushes {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_BRUSH_CAPACITY)
    }
}

impl Brushes {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: std::array::from_fn(|_| Brush::with_capacity(capacity)),
        }
    }

    pub fn get(&self, slot: usize) -> Result<&Brush, BrushError> {
        self.slots
            .get(slot)
            .ok_or(BrushError::SlotOutOfRange { slot })
    }

    pub fn get_mut(&mut self, slot: usize) -> Result<&mut Brush, BrushError> {
        self.slots
            .get_mut(slot)
            .ok_or(BrushError::SlotOutOfRange { slot })
    }

    /// Replace the brush in `slot`.
    pub fn set(&mut self, slot: usize, brush: Brush) -> Result<(), BrushError> {
        *self.get_mut(slot)? = brush;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::BRUSH_SLOTS;
    use super::Brush;
    use super::BrushError;
    use super::Brushes;
    use super::PatternError;
    use crate::cell::Cell;
    use crate::cell_set::CellSet;

    fn set_of(cells: &[(i16, i16)]) -> CellSet {
        let mut set = CellSet::default();
        for &(x, y) in cells {
            set.place(x, y);
        }
        set
    }

    fn alive(set: &CellSet) -> HashSet<(i16, i16)> {
        set.iter().map(|c| (c.x, c.y)).collect()
    }

    const GLIDER: [(i16, i16); 5] = [(11, 20), (12, 21), (10, 22), (11, 22), (12, 22)];

    #[test]
    fn capture_records_offsets_from_origin() {
        let source = set_of(&GLIDER);
        let mut brush = Brush::default();

        brush.capture(Cell::new(10, 20), 3, 3, &source);

        let offsets: HashSet<_> = brush.offsets().iter().copied().collect();
        let expected = HashSet::from([(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)]);
        assert_eq!(offsets, expected);
    }

    #[test]
    fn capture_then_stamp_in_place_reproduces_region() {
        let mut source = set_of(&GLIDER);
        // outside the captured rectangle
        source.place(50, 50);
        source.place(9, 20);

        let mut brush = Brush::default();
        brush.capture(Cell::new(10, 20), 3, 3, &source);

        let mut target = CellSet::default();
        brush.stamp(Cell::new(10, 20), &mut target);

        assert_eq!(alive(&target), HashSet::from(GLIDER));
    }

    #[test]
    fn capture_replaces_previous_contents() {
        let mut brush = Brush::default();
        brush.capture(Cell::new(0, 0), 2, 2, &set_of(&[(0, 0), (1, 1)]));
        brush.capture(Cell::new(0, 0), 2, 2, &set_of(&[(1, 0)]));

        assert_eq!(brush.offsets(), &[(1, 0)]);
    }

    #[test]
    fn empty_rectangle_captures_nothing() {
        let mut brush = Brush::default();
        brush.capture(Cell::new(0, 0), 0, 5, &set_of(&[(0, 0)]));

        assert!(brush.is_empty());
    }

    #[test]
    fn stamp_is_additive() {
        let mut brush = Brush::default();
        brush.push(0, 0);
        brush.push(1, 0);

        let mut target = set_of(&[(5, 5), (100, 100)]);
        brush.stamp(Cell::new(100, 100), &mut target);

        assert_eq!(alive(&target), HashSet::from([(5, 5), (100, 100), (101, 100)]));
    }

    #[test]
    fn stamp_respects_target_capacity() {
        let mut brush = Brush::default();
        for x in 0..5 {
            brush.push(x, 0);
        }

        let mut target = CellSet::with_capacity(3);
        brush.stamp(Cell::new(0, 0), &mut target);

        assert_eq!(target.len(), 3);
        assert!(target.is_full());
    }

    #[test]
    fn stamp_skips_offsets_off_the_grid() {
        let mut brush = Brush::default();
        brush.push(0, 0);
        brush.push(1, 0);

        let mut target = CellSet::default();
        brush.stamp(Cell::new(i16::MAX, 0), &mut target);

        assert_eq!(alive(&target), HashSet::from([(i16::MAX, 0)]));
    }

    #[test]
    fn capture_stops_at_brush_capacity() {
        let source = set_of(&[(0, 0), (1, 0), (2, 0), (3, 0)]);
        let mut brush = Brush::with_capacity(3);

        brush.capture(Cell::new(0, 0), 4, 1, &source);

        assert!(brush.is_full());
        assert_eq!(brush.offsets(), &[(0, 0), (1, 0), (2, 0)]);
    }

    #[test]
    fn slots_are_independent() {
        let mut brushes = Brushes::default();
        brushes.get_mut(1).unwrap().push(3, 3);

        assert!(brushes.get(0).unwrap().is_empty());
        assert_eq!(brushes.get(1).unwrap().len(), 1);
        assert!(brushes.get(9).unwrap().is_empty());
    }

    #[test]
    fn slot_out_of_range_is_an_error() {
        let mut brushes = Brushes::default();

        assert_eq!(
            brushes.get(BRUSH_SLOTS).unwrap_err(),
            BrushError::SlotOutOfRange { slot: 10 }
        );
        assert!(brushes.get_mut(42).is_err());
        assert!(brushes.set(10, Brush::default()).is_err());
    }

    #[test]
    fn from_rle_glider() {
        let brush = Brush::from_rle(b"x = 3, y = 3, rule = B3/S23\nbo$2bo$3o!\n", 128).unwrap();
        let offsets: HashSet<_> = brush.offsets().iter().copied().collect();

        assert_eq!(offsets, HashSet::from([(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)]));
    }

    #[test]
    fn from_rle_truncates_to_capacity() {
        let brush = Brush::from_rle(b"x = 10, y = 1\n10o!", 4).unwrap();

        assert_eq!(brush.len(), 4);
        assert!(brush.is_full());
    }

    #[test]
    fn from_rle_ignores_the_file_offset() {
        let brush = Brush::from_rle(b"#P -1 -1\nx = 2, y = 2\n2o$2o!", 128).unwrap();

        let mut target = CellSet::default();
        brush.stamp(Cell::new(10, 10), &mut target);

        assert_eq!(
            alive(&target),
            HashSet::from([(10, 10), (11, 10), (10, 11), (11, 11)])
        );
    }

    #[test]
    fn from_rle_rejects_other_rules() {
        let err = Brush::from_rle(b"x = 1, y = 1, rule = B36/S23\no!", 128).unwrap_err();

        assert!(matches!(err, PatternError::UnsupportedRule { .. }));
    }
}
