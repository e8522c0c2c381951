use tracing::debug;
use tracing::warn;

use crate::CellOffset;
use crate::cell::Cell;
use crate::cell_set::CellSet;
use crate::tally::CandidateTally;
use crate::rule_set::B3S23;
use crate::rule_set::RuleSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Paused,
    Running,
}

impl RunState {
    pub fn toggled(self) -> Self {
        match self {
            RunState::Paused => RunState::Running,
            RunState::Running => RunState::Paused,
        }
    }
}

/// The life engine: the alive cells, the scratch tally used to step them, and whether the
/// simulation is running.
pub struct World {
    /// Alive cells of the current generation
    cells: CellSet,

    /// Reused every generation so stepping never allocates past the first step
    tally: CandidateTally,

    rules: RuleSet,

    state: RunState,

    /// Number of generations advanced since creation
    generation: u64,
}

impl Default for World {
    fn default() -> Self {
        Self::new(CellSet::default())
    }
}

impl World {
    /// Create a paused world starting from `cells`. The capacity of `cells` bounds every later
    /// generation.
    pub fn new(cells: CellSet) -> Self {
        let tally = CandidateTally::for_cells(&cells);

        Self {
            cells,
            tally,
            rules: B3S23,
            state: RunState::Paused,
            generation: 0,
        }
    }

    /// An empty, paused world holding at most `capacity` alive cells.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(CellSet::with_capacity(capacity))
    }

    pub fn cells(&self) -> &CellSet {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut CellSet {
        &mut self.cells
    }

    pub fn is_alive(&self, x: CellOffset, y: CellOffset) -> bool {
        self.cells.is_alive(x, y)
    }

    pub fn place(&mut self, x: CellOffset, y: CellOffset) -> bool {
        self.cells.place(x, y)
    }

    pub fn kill(&mut self, x: CellOffset, y: CellOffset) -> bool {
        self.cells.kill(x, y)
    }

    pub fn population(&self) -> usize {
        self.cells.len()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Flip between paused and running, returning the new state.
    pub fn toggle_running(&mut self) -> RunState {
        self.state = self.state.toggled();
        debug!(state = ?self.state, "run state toggled");

        self.state
    }

    /// Advance one generation, but only while running.
    pub fn tick(&mut self) -> bool {
        if self.is_running() {
            self.advance();
        }

        self.is_running()
    }

    /// Advance exactly one generation, whatever the run state.
    ///
    /// Neighbour counts all come from the current generation; the next generation is built on
    /// the side and swapped in whole.
    pub fn advance(&mut self) {
        self.tally.tally(&self.cells);

        if self.tally.is_full() {
            debug!(
                candidates = self.tally.len(),
                "candidate tally reached capacity"
            );
        }

        let mut next = CellSet::with_capacity(self.cells.capacity());
        let mut dropped = 0usize;

        for candidate in self.tally.iter() {
            let alive = self.cells.contains(candidate.cell);

            if self.rules.next_state(alive, candidate.count) && !next.insert(candidate.cell) {
                dropped += 1;
            }
        }

        let previous = std::mem::replace(&mut self.cells, next);
        self.generation += 1;

        if dropped > 0 {
            warn!(
                generation = self.generation,
                dropped, "next generation exceeded capacity"
            );
        }

        debug!(
            generation = self.generation,
            population = self.cells.len(),
            previous = previous.len(),
            candidates = self.tally.len(),
            "advanced"
        );
    }

    /// Alive cells, in no meaningful order.
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::RunState;
    use super::World;
    use crate::cell::Cell;

    fn world_of(cells: &[(i16, i16)]) -> World {
        let mut world = World::default();
        for &(x, y) in cells {
            world.place(x, y);
        }
        world
    }

    fn alive(world: &World) -> HashSet<(i16, i16)> {
        world.iter().map(|c| (c.x, c.y)).collect()
    }

    fn set(cells: &[(i16, i16)]) -> HashSet<(i16, i16)> {
        cells.iter().copied().collect()
    }

    #[test]
    fn starts_paused_and_toggles() {
        let mut world = World::default();

        assert_eq!(world.state(), RunState::Paused);
        assert_eq!(world.toggle_running(), RunState::Running);
        assert!(world.is_running());
        assert_eq!(world.toggle_running(), RunState::Paused);
    }

    #[test]
    fn tick_only_advances_while_running() {
        let mut world = world_of(&[(0, 0)]);

        world.tick();
        assert_eq!(world.generation(), 0);
        assert!(world.is_alive(0, 0));

        world.toggle_running();
        world.tick();
        assert_eq!(world.generation(), 1);
        assert!(!world.is_alive(0, 0));
    }

    #[test]
    fn advance_works_while_paused() {
        let mut world = world_of(&[(0, 0), (1, 0), (2, 0)]);
        world.advance();

        assert_eq!(world.generation(), 1);
        assert_eq!(alive(&world), set(&[(1, -1), (1, 0), (1, 1)]));
    }

    #[test]
    fn survival_depends_on_two_or_three_neighbors() {
        // centre cell at (0, 0) with `n` neighbours taken from the top row and left column
        let around = [(-1, -1), (0, -1), (1, -1), (-1, 0), (-1, 1)];

        for n in 0..=5 {
            let mut cells = vec![(0, 0)];
            cells.extend_from_slice(&around[..n]);

            let mut world = world_of(&cells);
            world.advance();

            assert_eq!(world.is_alive(0, 0), n == 2 || n == 3, "{n} neighbours");
        }
    }

    #[test]
    fn birth_needs_exactly_three() {
        let around = [(-1, -1), (1, -1), (1, 1), (-1, 1)];

        for n in 0..=4 {
            let mut world = world_of(&around[..n]);
            world.advance();

            assert_eq!(world.is_alive(0, 0), n == 3, "{n} neighbours");
        }
    }

    #[test]
    fn block_is_still() {
        for (ox, oy) in [(0, 0), (-40, 17), (300, -300)] {
            let block = [(ox, oy), (ox + 1, oy), (ox, oy + 1), (ox + 1, oy + 1)];
            let mut world = world_of(&block);

            world.advance();

            assert_eq!(alive(&world), set(&block));
        }
    }

    #[test]
    fn blinker_has_period_two() {
        let horizontal = [(0, 0), (1, 0), (2, 0)];
        let vertical = [(1, -1), (1, 0), (1, 1)];
        let mut world = world_of(&horizontal);

        world.advance();
        assert_eq!(alive(&world), set(&vertical));

        world.advance();
        assert_eq!(alive(&world), set(&horizontal));
    }

    #[test]
    fn empty_world_stays_empty() {
        let mut world = World::default();
        world.advance();

        assert_eq!(world.population(), 0);
        assert_eq!(world.generation(), 1);
    }

    #[test]
    fn next_generation_is_capped() {
        // a blinker fits in capacity 3 in both phases
        let mut world = World::with_capacity(3);
        for x in 0..3 {
            world.place(x, 0);
        }
        world.advance();
        assert_eq!(world.population(), 3);

        // an L tromino grows into a four cell block; capacity 3 drops one of them
        let mut world = World::with_capacity(3);
        for (x, y) in [(0, 0), (1, 0), (0, 1)] {
            world.place(x, y);
        }
        world.advance();

        let block = set(&[(0, 0), (1, 0), (0, 1), (1, 1)]);
        assert_eq!(world.population(), 3);
        assert!(world.cells().is_full());
        assert!(alive(&world).is_subset(&block));
    }

    #[test]
    fn cells_on_the_grid_edge_do_not_wrap() {
        let m = i16::MAX;
        let mut world = world_of(&[(m, 0), (m, 1), (m, 2)]);
        world.advance();

        // the births that would land at x = m + 1 do not exist
        assert_eq!(alive(&world), set(&[(m - 1, 1), (m, 1)]));
        assert!(world.iter().all(|Cell { x, .. }| x >= m - 1));
    }
}
