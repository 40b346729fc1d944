//! Property-based tests for wayfind-paths

use std::collections::{HashMap, VecDeque};

use proptest::prelude::*;
use wayfind_paths::{GradientConfig, GradientGrid, Measurement, Point, ScanState};

fn prop_rows(max: usize) -> impl Strategy<Value = Vec<Vec<bool>>> {
    (2..=max, 2..=max).prop_flat_map(|(w, h)| {
        prop::collection::vec(prop::collection::vec(prop::bool::weighted(0.7), w), h)
    })
}

fn open_cells(rows: &[Vec<bool>]) -> Vec<Point> {
    let mut cells = Vec::new();
    for (y, row) in rows.iter().enumerate() {
        for (x, &open) in row.iter().enumerate() {
            if open {
                cells.push(Point::new(x as i32, y as i32));
            }
        }
    }
    cells
}

/// Reference multi-source BFS distance on a 4-connected grid.
fn bfs(rows: &[Vec<bool>], goals: &[Point]) -> HashMap<Point, usize> {
    let open = |p: Point| {
        p.x >= 0
            && p.y >= 0
            && rows
                .get(p.y as usize)
                .and_then(|r| r.get(p.x as usize))
                .copied()
                .unwrap_or(false)
    };
    let mut dist = HashMap::new();
    let mut queue = VecDeque::new();
    for &g in goals {
        if open(g) && !dist.contains_key(&g) {
            dist.insert(g, 0);
            queue.push_back(g);
        }
    }
    while let Some(p) = queue.pop_front() {
        let d = dist[&p];
        for q in p.neighbors_4() {
            if open(q) && !dist.contains_key(&q) {
                dist.insert(q, d + 1);
                queue.push_back(q);
            }
        }
    }
    dist
}

// Property: the Manhattan field equals multi-source BFS distance
proptest! {
    #[test]
    fn prop_field_matches_bfs(rows in prop_rows(9), picks in prop::collection::vec(any::<prop::sample::Index>(), 1..4)) {
        let cells = open_cells(&rows);
        prop_assume!(!cells.is_empty());
        let goals: Vec<Point> = picks.iter().map(|i| *i.get(&cells)).collect();

        let mut grid = GradientGrid::from_bool_grid(&rows);
        grid.set_goals(goals.iter().copied());
        grid.scan(&[]);
        let reference = bfs(&rows, &goals);

        for q in grid.range() {
            prop_assert_eq!(grid.distance_at(q), reference.get(&q).map(|&d| d as f32));
        }
    }
}

// Property: a descent has as many steps as the start's distance and ends on a goal
proptest! {
    #[test]
    fn prop_descent_follows_gradient(rows in prop_rows(9), picks in (any::<prop::sample::Index>(), any::<prop::sample::Index>())) {
        let cells = open_cells(&rows);
        prop_assume!(!cells.is_empty());
        let goal = *picks.0.get(&cells);
        let start = *picks.1.get(&cells);

        let mut grid = GradientGrid::from_bool_grid(&rows);
        grid.set_goal(goal);
        grid.scan(&[]);
        let path = grid.find_path_pre_scanned(start);
        match grid.distance_at(start) {
            Some(d) if start != goal => {
                prop_assert_eq!(path.len() as f32, d);
                prop_assert_eq!(path.last(), Some(&goal));
                let mut prev = start;
                for &p in &path {
                    prop_assert!(grid.is_passable(p));
                    prop_assert_eq!((p.x - prev.x).abs() + (p.y - prev.y).abs(), 1);
                    prev = p;
                }
            }
            _ => prop_assert!(path.is_empty()),
        }
    }
}

// Property: any sequence of partial scans ends at the same field as one full scan
proptest! {
    #[test]
    fn prop_partial_scans_converge(
        rows in prop_rows(8),
        pick in any::<prop::sample::Index>(),
        limits in prop::collection::vec(1usize..6, 1..50),
        diagonal in any::<bool>(),
    ) {
        let cells = open_cells(&rows);
        prop_assume!(!cells.is_empty());
        let goal = *pick.get(&cells);
        let measurement = if diagonal { Measurement::Euclidean } else { Measurement::Manhattan };
        let config = GradientConfig::default().with_measurement(measurement);

        let mut whole = GradientGrid::from_bool_grid(&rows).with_config(config);
        whole.set_goal(goal);
        whole.scan(&[]);

        let mut split = GradientGrid::from_bool_grid(&rows).with_config(config);
        split.set_goal(goal);
        for limit in limits {
            if split.partial_scan(limit, &[]) == ScanState::Scanned {
                break;
            }
        }
        split.scan(&[]);
        prop_assert_eq!(split.state(), ScanState::Scanned);
        prop_assert_eq!(split.settled_count(), whole.settled_count());
        for q in whole.range() {
            prop_assert_eq!(split.distance_at(q), whole.distance_at(q));
        }
    }
}
