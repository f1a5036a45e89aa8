//! Property tests for the grid model

use proptest::prelude::*;
use quiz_arcade::battleships::{Board, ShotOutcome};
use quiz_arcade::core::types::Coord;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

fn fleet() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..=5, 1..=8)
}

proptest! {
    #[test]
    fn prop_auto_place_never_overlaps(size in 6usize..=15, sizes in fleet(), seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut board = Board::new(size, &sizes);
        let unplaced = board.auto_place(&mut rng, 100);

        let mut seen = HashSet::new();
        let mut placed = 0;
        for ship in board.ships() {
            if ship.is_placed() {
                placed += 1;
            }
            for cell in ship.cells() {
                prop_assert!(cell.in_bounds(size));
                prop_assert!(seen.insert(cell), "cell {} used twice", cell);
                prop_assert_eq!(board.grid().cell(cell).unwrap().ship, Some(ship.id));
            }
        }
        prop_assert_eq!(placed + unplaced, sizes.len());
        let grid = board.grid();
        let occupied = grid.coords().filter(|&c| grid.cell(c).unwrap().occupied()).count();
        prop_assert_eq!(occupied, seen.len());
    }

    #[test]
    fn prop_moves_keep_fleet_disjoint(
        seed in any::<u64>(),
        moves in prop::collection::vec((0usize..4, 0usize..8, 0usize..8, any::<bool>()), 0..40),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut board = Board::new(8, &[5, 4, 3, 2]);
        board.auto_place(&mut rng, 100);

        for (id, row, col, horizontal) in moves {
            board.try_place(id, Coord::new(row, col), horizontal);
            let mut seen = HashSet::new();
            for cell in board.ships().iter().flat_map(|s| s.cells()) {
                prop_assert!(seen.insert(cell));
            }
        }
    }

    #[test]
    fn prop_hits_are_monotonic_and_sunk_is_consistent(
        seed in any::<u64>(),
        shots in prop::collection::vec((0usize..10, 0usize..10), 1..150),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut board = Board::new(10, &[5, 4, 3, 3, 2]);
        board.auto_place(&mut rng, 100);
        let mut hit: HashSet<Coord> = HashSet::new();

        for (row, col) in shots {
            let at = Coord::new(row, col);
            let before: Vec<usize> = board.ships().iter().map(|s| s.hit_count).collect();
            let outcome = board.fire_at(at);

            if hit.contains(&at) {
                prop_assert_eq!(outcome, ShotOutcome::Ignored);
            }
            hit.insert(at);
            for c in &hit {
                prop_assert!(board.grid().is_hit(*c));
            }
            for (ship, old) in board.ships().iter().zip(before) {
                prop_assert!(ship.hit_count >= old);
                prop_assert!(ship.hit_count <= ship.size);
                prop_assert_eq!(ship.sunk, ship.hit_count >= ship.size);
            }
        }
    }

    #[test]
    fn prop_size_three_ship_sinks_on_third_hit(order in Just(vec![0usize, 1, 2]).prop_shuffle()) {
        let mut board = Board::new(8, &[3]);
        board.place(0, Coord::new(2, 2), false);
        for (n, i) in order.iter().enumerate() {
            let outcome = board.fire_at(Coord::new(2 + i, 2));
            if n < 2 {
                prop_assert_eq!(outcome, ShotOutcome::Hit(0));
            } else {
                prop_assert_eq!(outcome, ShotOutcome::Sunk(0));
            }
        }
        prop_assert!(board.all_sunk());
    }
}
