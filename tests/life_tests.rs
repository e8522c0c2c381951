use std::collections::HashMap;
use std::collections::HashSet;

use proptest::prelude::*;

use sparselife::brush::Brush;
use sparselife::cell::Cell;
use sparselife::simulation::Simulation;
use sparselife::world::World;

type Cells = HashSet<(i16, i16)>;

fn world_of(cells: &Cells, capacity: usize) -> World {
    let mut world = World::with_capacity(capacity);
    for &(x, y) in cells {
        world.place(x, y);
    }
    world
}

fn alive(world: &World) -> Cells {
    world.iter().map(|c| (c.x, c.y)).collect()
}

/// Straightforward B3/S23 step over a set, used as a reference.
fn naive_step(cells: &Cells) -> Cells {
    let mut counts: HashMap<(i16, i16), u8> = HashMap::new();

    for &(x, y) in cells {
        for dx in -1..=1 {
            for dy in -1..=1 {
                if (dx, dy) != (0, 0) {
                    *counts.entry((x + dx, y + dy)).or_default() += 1;
                }
            }
        }
    }

    counts
        .into_iter()
        .filter(|&(cell, n)| n == 3 || (n == 2 && cells.contains(&cell)))
        .map(|(cell, _)| cell)
        .collect()
}

fn translate(cells: &Cells, dx: i16, dy: i16) -> Cells {
    cells.iter().map(|&(x, y)| (x + dx, y + dy)).collect()
}

#[test]
fn glider_moves_diagonally() {
    let glider = Cells::from([(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)]);
    let mut world = world_of(&glider, 1024);

    for period in 1..=10 {
        for _ in 0..4 {
            world.advance();
        }

        assert_eq!(alive(&world), translate(&glider, period, period), "after {period} periods");
    }
}

#[test]
fn lwss_moves_sideways() {
    let lwss = Cells::from([
        (1, 0),
        (4, 0),
        (0, 1),
        (0, 2),
        (4, 2),
        (0, 3),
        (1, 3),
        (2, 3),
        (3, 3),
    ]);
    let mut world = world_of(&lwss, 1024);

    for _ in 0..4 {
        world.advance();
    }

    assert_eq!(alive(&world), translate(&lwss, -2, 0));
}

#[test]
fn gosper_gun_fires_gliders() -> anyhow::Result<()> {
    let bytes = std::fs::read("tests/rle_pats/gosper_gun.rle")?;
    let gun = Brush::from_rle(&bytes, 128)?;

    let mut sim = Simulation::default();
    sim.brushes_mut().set(0, gun)?;
    sim.stamp_brush(0, 0, 0)?;

    assert_eq!(sim.population(), 36);

    // the gun has period 30 and adds one five cell glider per period
    for _ in 0..30 {
        sim.advance_generation();
    }
    assert_eq!(sim.population(), 41);

    for _ in 0..30 {
        sim.advance_generation();
    }
    assert_eq!(sim.population(), 46);

    Ok(())
}

#[test]
fn capture_and_stamp_a_moving_glider() {
    let mut sim = Simulation::default();
    for (x, y) in [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)] {
        sim.place_cell(x, y);
    }

    for _ in 0..8 {
        sim.advance_generation();
    }

    // it is now two cells down and to the right
    sim.capture_brush(2, 2, 2, 3, 3).unwrap();
    sim.stamp_brush(2, 50, 50).unwrap();

    assert_eq!(sim.population(), 10);

    let stamped: Cells = sim
        .alive_cells()
        .filter(|c| c.x >= 50)
        .map(|c| (c.x, c.y))
        .collect();
    assert_eq!(
        stamped,
        Cells::from([(51, 50), (52, 51), (50, 52), (51, 52), (52, 52)])
    );
    assert!(sim.is_alive(3, 2));
    assert!(!sim.alive_cells().any(|c| c == Cell::new(1, 0)));
}

proptest! {
    #[test]
    fn matches_naive_reference(
        soup in prop::collection::hash_set((-6i16..6, -6i16..6), 0..60),
        generations in 1usize..12,
    ) {
        let mut world = world_of(&soup, 4096);
        let mut expected = soup.clone();

        for generation in 0..generations {
            world.advance();
            expected = naive_step(&expected);

            prop_assert_eq!(alive(&world), expected.clone(), "generation {}", generation + 1);
        }
    }

    #[test]
    fn population_never_exceeds_capacity(
        soup in prop::collection::hash_set((-8i16..8, -8i16..8), 0..120),
        capacity in 1usize..40,
    ) {
        let mut world = world_of(&soup, capacity);
        prop_assert!(world.population() <= capacity);

        for _ in 0..5 {
            world.advance();
            prop_assert!(world.population() <= capacity);
        }
    }
}
