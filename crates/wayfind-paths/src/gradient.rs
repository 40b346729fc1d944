use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::{debug, trace};
use wayfind_core::{Point, Range};

use crate::measurement::GradientConfig;

/// Progress of a [`GradientGrid`] scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScanState {
    /// No scan has run yet.
    Unscanned,
    /// A scan was suspended; its frontier is kept for resumption.
    Scanning,
    /// The last scan ran to completion.
    Scanned,
    /// Goals or terrain changed since the last scan.
    Stale,
}

/// Frontier entry ordered by distance, then insertion sequence.
#[derive(Debug, Clone, Copy)]
struct Entry {
    dist: f32,
    seq: u64,
    idx: usize,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so BinaryHeap (max-heap) pops the nearest cell first.
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A multi-goal distance field over a rectangular grid.
///
/// The field holds, for every cell it has settled, the cost of the cheapest
/// walk from that cell to the nearest goal. Entering a cell costs its
/// terrain cost times the step length (1 for orthogonal steps; 1 or √2 for
/// diagonals depending on the [`Measurement`](crate::Measurement)).
///
/// Scans may be split across calls with [`partial_scan`](Self::partial_scan):
/// the frontier is kept between calls and the next call resumes it. Changing
/// goals or terrain marks the field [`ScanState::Stale`]; the next scan then
/// starts a fresh run. Cells carry the run stamp that last reached and
/// settled them, so a fresh run never has to clear the grid.
///
/// No method panics on out-of-range input: setters report `false`,
/// queries return `None` and path searches return an empty path.
#[derive(Debug, Clone)]
pub struct GradientGrid {
    range: Range,
    passable: Vec<bool>,
    cost: Vec<f32>,
    gradient: Vec<f32>,
    reached: Vec<u32>,
    settled: Vec<u32>,
    blocked: Vec<u32>,
    is_goal: Vec<bool>,
    goals: Vec<Point>,
    run: u32,
    frontier: BinaryHeap<Entry>,
    seq: u64,
    settled_count: usize,
    state: ScanState,
    config: GradientConfig,
}

impl GradientGrid {
    /// A `width × height` grid with every cell passable at cost 1.
    pub fn new(width: i32, height: i32) -> Self {
        let range = Range::sized(width, height);
        let len = range.len();
        Self {
            range,
            passable: vec![true; len],
            cost: vec![1.0; len],
            gradient: vec![0.0; len],
            reached: vec![0; len],
            settled: vec![0; len],
            blocked: vec![0; len],
            is_goal: vec![false; len],
            goals: Vec::new(),
            run: 0,
            frontier: BinaryHeap::new(),
            seq: 0,
            settled_count: 0,
            state: ScanState::Unscanned,
            config: GradientConfig::default(),
        }
    }

    /// A grid whose `true` cells are passable. Rows are indexed `[y][x]`;
    /// the width is the longest row and missing cells are walls.
    pub fn from_bool_grid<R: AsRef<[bool]>>(rows: &[R]) -> Self {
        let width = rows.iter().map(|r| r.as_ref().len()).max().unwrap_or(0);
        let mut grid = Self::new(width as i32, rows.len() as i32);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            for x in 0..width {
                let open = row.get(x).copied().unwrap_or(false);
                grid.passable[y * width + x] = open;
            }
        }
        grid
    }

    /// A grid where every cell except `wall` is passable.
    pub fn from_char_grid<S: AsRef<str>>(rows: &[S], wall: char) -> Self {
        let cells: Vec<Vec<bool>> = rows
            .iter()
            .map(|r| r.as_ref().chars().map(|c| c != wall).collect())
            .collect();
        Self::from_bool_grid(&cells)
    }

    /// Replace the settings. The field becomes stale.
    pub fn with_config(mut self, config: GradientConfig) -> Self {
        self.set_config(config);
        self
    }

    #[inline]
    pub fn config(&self) -> GradientConfig {
        self.config
    }

    pub fn set_config(&mut self, config: GradientConfig) {
        self.config = config.with_blocking_requirement(config.blocking_requirement);
        self.mark_stale();
    }

    #[inline]
    pub fn range(&self) -> Range {
        self.range
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.range.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.range.height()
    }

    #[inline]
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Stamp of the current (or most recent) run.
    #[inline]
    pub fn run_stamp(&self) -> u32 {
        self.run
    }

    /// Cells settled by the current run.
    #[inline]
    pub fn settled_count(&self) -> usize {
        self.settled_count
    }

    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        self.range.index_of(p)
    }

    fn mark_stale(&mut self) {
        if self.state != ScanState::Unscanned {
            self.state = ScanState::Stale;
        }
    }

    // -----------------------------------------------------------------------
    // Terrain
    // -----------------------------------------------------------------------

    /// Make `p` a floor or a wall. A goal turned into a wall stops being a
    /// goal. Returns `false` if `p` is outside the grid.
    pub fn set_passable(&mut self, p: Point, passable: bool) -> bool {
        let Some(i) = self.idx(p) else {
            return false;
        };
        if self.passable[i] != passable {
            self.passable[i] = passable;
            if !passable && self.is_goal[i] {
                self.is_goal[i] = false;
                self.goals.retain(|&g| g != p);
            }
            self.mark_stale();
        }
        true
    }

    /// Whether `p` is inside the grid and not a wall.
    #[inline]
    pub fn is_passable(&self, p: Point) -> bool {
        self.idx(p).is_some_and(|i| self.passable[i])
    }

    /// Set the cost of entering `p`. Costs must be positive and finite.
    pub fn set_cost(&mut self, p: Point, cost: f32) -> bool {
        let Some(i) = self.idx(p) else {
            return false;
        };
        if !(cost.is_finite() && cost > 0.0) {
            return false;
        }
        if self.cost[i] != cost {
            self.cost[i] = cost;
            self.mark_stale();
        }
        true
    }

    #[inline]
    pub fn cost(&self, p: Point) -> Option<f32> {
        self.idx(p).map(|i| self.cost[i])
    }

    // -----------------------------------------------------------------------
    // Goals
    // -----------------------------------------------------------------------

    /// Add `p` as a goal. Walls and cells outside the grid are refused.
    pub fn set_goal(&mut self, p: Point) -> bool {
        let Some(i) = self.idx(p) else {
            return false;
        };
        if !self.passable[i] {
            return false;
        }
        if !self.is_goal[i] {
            self.is_goal[i] = true;
            self.goals.push(p);
            self.mark_stale();
        }
        true
    }

    /// Add every acceptable goal; returns how many were accepted.
    pub fn set_goals(&mut self, goals: impl IntoIterator<Item = Point>) -> usize {
        goals.into_iter().filter(|&p| self.set_goal(p)).count()
    }

    pub fn clear_goals(&mut self) {
        if self.goals.is_empty() {
            return;
        }
        for &g in &self.goals {
            if let Some(i) = self.range.index_of(g) {
                self.is_goal[i] = false;
            }
        }
        self.goals.clear();
        self.mark_stale();
    }

    /// Goals in the order they were added.
    #[inline]
    pub fn goals(&self) -> &[Point] {
        &self.goals
    }

    #[inline]
    pub fn is_goal(&self, p: Point) -> bool {
        self.idx(p).is_some_and(|i| self.is_goal[i])
    }

    // -----------------------------------------------------------------------
    // Scanning
    // -----------------------------------------------------------------------

    /// Scan until every reachable cell is settled.
    pub fn scan(&mut self, blocked: &[Point]) {
        self.scan_until(usize::MAX, blocked, None);
    }

    /// Settle at most `limit` cells, then suspend.
    ///
    /// Starts a new run when the field is unscanned or stale, and resumes
    /// the retained frontier otherwise. Cells in `blocked` are treated as
    /// walls for the rest of the run; blocking a cell the run has already
    /// settled restarts the run, keeping earlier blocked cells. A finished
    /// field is left untouched.
    pub fn partial_scan(&mut self, limit: usize, blocked: &[Point]) -> ScanState {
        self.scan_until(limit, blocked, None)
    }

    fn scan_until(&mut self, limit: usize, blocked: &[Point], stop: Option<usize>) -> ScanState {
        match self.state {
            ScanState::Scanned => return self.state,
            ScanState::Unscanned | ScanState::Stale => self.begin_run(),
            ScanState::Scanning => {
                // Distances already routed through a newly blocked cell are
                // wrong, so rerun with every blocked cell so far.
                let reroute = blocked
                    .iter()
                    .filter_map(|&p| self.idx(p))
                    .any(|i| self.settled[i] == self.run && self.blocked[i] != self.run);
                if reroute {
                    let held: Vec<usize> = (0..self.blocked.len())
                        .filter(|&i| self.blocked[i] == self.run)
                        .collect();
                    self.begin_run();
                    for i in held {
                        self.blocked[i] = self.run;
                    }
                }
            }
        }
        for &p in blocked {
            if let Some(i) = self.idx(p) {
                self.blocked[i] = self.run;
            }
        }

        let mut budget = limit;
        while budget > 0 {
            let Some(entry) = self.frontier.pop() else {
                break;
            };
            let ci = entry.idx;
            if self.settled[ci] == self.run
                || self.blocked[ci] == self.run
                || entry.dist > self.gradient[ci]
            {
                continue;
            }
            self.settled[ci] = self.run;
            self.settled_count += 1;
            budget -= 1;
            self.relax(ci);
            if stop == Some(ci) {
                break;
            }
        }

        if self.frontier.is_empty() {
            self.state = ScanState::Scanned;
            debug!(
                "gradient scan complete: {} cells settled in run {}",
                self.settled_count, self.run
            );
        } else {
            self.state = ScanState::Scanning;
            trace!(
                "gradient scan suspended: {} settled, {} queued",
                self.settled_count,
                self.frontier.len()
            );
        }
        self.state
    }

    fn begin_run(&mut self) {
        if self.run == u32::MAX {
            debug!("gradient run stamp wrapped; resetting cell stamps");
            self.reached.fill(0);
            self.settled.fill(0);
            self.blocked.fill(0);
            self.run = 0;
        }
        self.run += 1;
        self.frontier.clear();
        self.settled_count = 0;
        self.seq = 0;
        for k in 0..self.goals.len() {
            let Some(i) = self.idx(self.goals[k]) else {
                continue;
            };
            self.reached[i] = self.run;
            self.gradient[i] = 0.0;
            self.push(0.0, i);
        }
    }

    fn push(&mut self, dist: f32, idx: usize) {
        self.seq += 1;
        self.frontier.push(Entry {
            dist,
            seq: self.seq,
            idx,
        });
    }

    /// Whether the cell at `i` is passable and not blocked this run.
    #[inline]
    fn open(&self, i: usize) -> bool {
        self.passable[i] && self.blocked[i] != self.run
    }

    /// The index of `p + d` if that move is allowed from `p`.
    fn step(&self, p: Point, d: Point) -> Option<usize> {
        let q = p + d;
        let i = self.idx(q)?;
        if !self.open(i) {
            return None;
        }
        if d.is_diagonal() {
            let walls = [Point::new(d.x, 0), Point::new(0, d.y)]
                .into_iter()
                .filter(|&o| !self.is_passable(p + o))
                .count() as u8;
            if self.config.corner_blocked(walls) {
                return None;
            }
        }
        Some(i)
    }

    /// Offer every neighbour of the settled cell `ci` a route through it.
    fn relax(&mut self, ci: usize) {
        let p = self.range.point_at(ci);
        let here = self.gradient[ci];
        let measurement = self.config.measurement;
        for &d in measurement.directions() {
            let Some(ni) = self.step(p, d) else {
                continue;
            };
            if self.settled[ni] == self.run {
                continue;
            }
            // Walking from the neighbour into `ci` costs `ci`'s terrain.
            let dist = here + self.cost[ci] * measurement.step_length(d);
            if self.reached[ni] == self.run && dist >= self.gradient[ni] {
                continue;
            }
            self.reached[ni] = self.run;
            self.gradient[ni] = dist;
            self.push(dist, ni);
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Distance from `p` to the nearest goal, if the current run settled it.
    ///
    /// A stale or unscanned field has no distances.
    pub fn distance_at(&self, p: Point) -> Option<f32> {
        if matches!(self.state, ScanState::Unscanned | ScanState::Stale) {
            return None;
        }
        let i = self.idx(p)?;
        (self.settled[i] == self.run).then(|| self.gradient[i])
    }

    /// The next step downhill from `p`: the settled neighbour minimising
    /// its distance plus the cost of entering it. Cardinals are tried
    /// before diagonals and the first minimum wins.
    fn descend(&self, p: Point, here: f32) -> Option<usize> {
        let measurement = self.config.measurement;
        let mut best: Option<(f32, usize)> = None;
        for &d in measurement.directions() {
            let Some(ni) = self.step(p, d) else {
                continue;
            };
            if self.settled[ni] != self.run || self.gradient[ni] >= here {
                continue;
            }
            let score = self.gradient[ni] + self.cost[ni] * measurement.step_length(d);
            if best.is_none_or(|(s, _)| score < s) {
                best = Some((score, ni));
            }
        }
        best.map(|(_, ni)| ni)
    }

    /// Walk downhill from `start` to a goal over the current field.
    ///
    /// The result excludes `start` and ends on a goal. It is empty when
    /// `start` is outside the field, unsettled or already a goal.
    pub fn find_path_pre_scanned(&self, start: Point) -> Vec<Point> {
        self.walk(start, usize::MAX)
    }

    fn walk(&self, start: Point, max_length: usize) -> Vec<Point> {
        let mut path = Vec::new();
        let Some(mut here) = self.distance_at(start) else {
            return path;
        };
        let mut p = start;
        while !self.is_goal(p) && path.len() < max_length {
            let Some(ni) = self.descend(p, here) else {
                return Vec::new();
            };
            p = self.range.point_at(ni);
            here = self.gradient[ni];
            path.push(p);
        }
        path
    }

    /// Replace the goals with `goals`, scan, and walk from `start`.
    ///
    /// The scan treats `impassable` as walls (except `start` itself) and
    /// settles at most `max_scan` cells before giving up; it stops early
    /// once `start` is settled. The path has at most `max_length` steps.
    /// When it is cut short, trailing cells listed in `only_passable` are
    /// dropped so the walker never stops on one of them.
    pub fn find_path(
        &mut self,
        max_length: usize,
        max_scan: usize,
        impassable: &[Point],
        only_passable: &[Point],
        start: Point,
        goals: &[Point],
    ) -> Vec<Point> {
        let Some(si) = self.idx(start) else {
            return Vec::new();
        };
        self.clear_goals();
        if self.set_goals(goals.iter().copied()) == 0 {
            return Vec::new();
        }
        self.mark_stale();
        let blocked: Vec<Point> = impassable.iter().copied().filter(|&p| p != start).collect();
        self.scan_until(max_scan, &blocked, Some(si));

        let mut path = self.walk(start, max_length);
        let reached_goal = path.last().is_some_and(|&p| self.is_goal(p));
        if !reached_goal {
            while path.last().is_some_and(|p| only_passable.contains(p)) {
                path.pop();
            }
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Measurement;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn distances_on_open_grid() {
        let mut g = GradientGrid::new(5, 5);
        assert!(g.set_goal(p(4, 4)));
        g.scan(&[]);
        assert_eq!(g.state(), ScanState::Scanned);
        assert_eq!(g.distance_at(p(0, 0)), Some(8.0));
        assert_eq!(g.distance_at(p(4, 4)), Some(0.0));
        assert_eq!(g.settled_count(), 25);
        let path = g.find_path_pre_scanned(p(0, 0));
        assert_eq!(path.len(), 8);
        assert_eq!(path.last(), Some(&p(4, 4)));
        assert!(!path.contains(&p(0, 0)));
    }

    #[test]
    fn nearer_goal_wins() {
        let mut g = GradientGrid::new(10, 1);
        g.set_goals([p(0, 0), p(9, 0)]);
        g.scan(&[]);
        assert_eq!(g.find_path_pre_scanned(p(6, 0)).last(), Some(&p(9, 0)));
        assert_eq!(g.find_path_pre_scanned(p(3, 0)).last(), Some(&p(0, 0)));
    }

    #[test]
    fn refused_goals() {
        let mut g = GradientGrid::from_char_grid(&[".#", ".."], '#');
        assert!(!g.set_goal(p(1, 0)));
        assert!(!g.set_goal(p(5, 5)));
        assert!(g.set_goal(p(0, 0)));
        assert_eq!(g.goals(), &[p(0, 0)]);
        assert!(g.set_goal(p(0, 0)));
        assert_eq!(g.goals().len(), 1);
    }

    #[test]
    fn wall_corner_blocks_diagonal() {
        // .#
        // ..
        let rows = [".#", ".."];
        let config = GradientConfig::default().with_measurement(Measurement::Chebyshev);
        let mut g = GradientGrid::from_char_grid(&rows, '#').with_config(config);
        g.set_goal(p(1, 1));
        g.scan(&[]);
        // (0,0) -> (1,1) would cut the wall corner at (1,0).
        assert_eq!(g.distance_at(p(0, 0)), Some(2.0));
        assert_eq!(g.find_path_pre_scanned(p(0, 0)), vec![p(0, 1), p(1, 1)]);

        let mut lax = GradientGrid::from_char_grid(&rows, '#')
            .with_config(config.with_blocking_requirement(2));
        lax.set_goal(p(1, 1));
        lax.scan(&[]);
        assert_eq!(lax.distance_at(p(0, 0)), Some(1.0));
        assert_eq!(lax.find_path_pre_scanned(p(0, 0)), vec![p(1, 1)]);
    }

    #[test]
    fn euclidean_diagonals_cost_more() {
        let config = GradientConfig::default().with_measurement(Measurement::Euclidean);
        let mut g = GradientGrid::new(3, 3).with_config(config);
        g.set_goal(p(2, 2));
        g.scan(&[]);
        let d = g.distance_at(p(0, 0)).unwrap();
        assert!((d - 2.0 * std::f32::consts::SQRT_2).abs() < 1e-5);
        assert_eq!(g.find_path_pre_scanned(p(0, 0)), vec![p(1, 1), p(2, 2)]);
    }

    #[test]
    fn terrain_cost_is_paid_on_entry() {
        let mut g = GradientGrid::new(3, 1);
        g.set_cost(p(1, 0), 5.0);
        g.set_goal(p(2, 0));
        g.scan(&[]);
        assert_eq!(g.distance_at(p(1, 0)), Some(1.0));
        assert_eq!(g.distance_at(p(0, 0)), Some(6.0));
        assert!(!g.set_cost(p(0, 0), 0.0));
        assert!(!g.set_cost(p(0, 0), f32::NAN));
    }

    #[test]
    fn partial_scan_resumes_to_completion() {
        let mut whole = GradientGrid::new(6, 6);
        whole.set_goal(p(0, 0));
        whole.scan(&[]);

        let mut g = GradientGrid::new(6, 6);
        g.set_goal(p(0, 0));
        assert_eq!(g.partial_scan(5, &[]), ScanState::Scanning);
        assert_eq!(g.settled_count(), 5);
        let run = g.run_stamp();
        while g.partial_scan(7, &[]) == ScanState::Scanning {}
        assert_eq!(g.run_stamp(), run);
        assert_eq!(g.settled_count(), 36);
        for q in g.range() {
            assert_eq!(g.distance_at(q), whole.distance_at(q));
        }
    }

    #[test]
    fn changes_make_the_field_stale() {
        let mut g = GradientGrid::new(4, 4);
        assert_eq!(g.state(), ScanState::Unscanned);
        g.set_goal(p(0, 0));
        assert_eq!(g.state(), ScanState::Unscanned);
        g.scan(&[]);
        let first = g.run_stamp();
        g.set_goal(p(3, 3));
        assert_eq!(g.state(), ScanState::Stale);
        assert_eq!(g.distance_at(p(2, 2)), None);
        g.scan(&[]);
        assert_eq!(g.run_stamp(), first + 1);
        assert_eq!(g.distance_at(p(2, 2)), Some(2.0));

        g.set_passable(p(1, 1), false);
        assert_eq!(g.state(), ScanState::Stale);
        g.scan(&[]);
        assert_eq!(g.distance_at(p(1, 1)), None);
    }

    #[test]
    fn stale_cells_from_earlier_runs_are_ignored() {
        let mut g = GradientGrid::new(5, 1);
        g.set_goal(p(0, 0));
        g.scan(&[]);
        assert!(g.distance_at(p(4, 0)).is_some());
        // Wall off the right half; its old distances must not leak.
        g.set_passable(p(2, 0), false);
        g.scan(&[]);
        assert_eq!(g.distance_at(p(4, 0)), None);
        assert!(g.find_path_pre_scanned(p(4, 0)).is_empty());
    }

    #[test]
    fn blocked_cells_hold_for_the_run() {
        let mut g = GradientGrid::from_char_grid(&["...", ".#.", "..."], '#');
        g.set_goal(p(2, 2));
        g.partial_scan(1, &[p(1, 2)]);
        g.scan(&[]);
        // Only the route over the top row remains.
        assert_eq!(g.distance_at(p(0, 2)), Some(6.0));
        assert_eq!(g.distance_at(p(1, 2)), None);
    }

    #[test]
    fn blocking_a_settled_cell_reroutes() {
        let mut g = GradientGrid::new(3, 1);
        g.set_goal(p(0, 0));
        g.partial_scan(2, &[]);
        assert_eq!(g.distance_at(p(1, 0)), Some(1.0));
        assert_eq!(g.partial_scan(10, &[p(1, 0)]), ScanState::Scanned);
        assert_eq!(g.distance_at(p(1, 0)), None);
        assert_eq!(g.distance_at(p(2, 0)), None);
        assert!(g.find_path_pre_scanned(p(2, 0)).is_empty());

        let mut g = GradientGrid::new(3, 2);
        g.set_goal(p(0, 0));
        g.partial_scan(1, &[p(1, 1)]);
        g.partial_scan(1, &[]);
        assert_eq!(g.distance_at(p(1, 0)), Some(1.0));
        g.scan(&[p(1, 0)]);
        // (1, 1) stays blocked across the restart, cutting off the right.
        assert_eq!(g.distance_at(p(0, 1)), Some(1.0));
        assert_eq!(g.distance_at(p(2, 0)), None);
        assert_eq!(g.distance_at(p(2, 1)), None);
    }

    #[test]
    fn equidistant_goals_prefer_east() {
        let mut g = GradientGrid::new(5, 1);
        g.set_goals([p(0, 0), p(4, 0)]);
        g.scan(&[]);
        assert_eq!(g.find_path_pre_scanned(p(2, 0)), vec![p(3, 0), p(4, 0)]);
    }

    #[test]
    fn descent_tries_cardinals_in_order() {
        let mut g = GradientGrid::new(3, 3);
        g.set_goal(p(2, 2));
        g.scan(&[]);
        assert_eq!(
            g.find_path_pre_scanned(p(0, 0)),
            vec![p(1, 0), p(2, 0), p(2, 1), p(2, 2)]
        );
    }

    #[test]
    fn run_stamp_wraps() {
        let mut g = GradientGrid::new(3, 1);
        g.set_goal(p(0, 0));
        g.run = u32::MAX - 1;
        g.scan(&[]);
        assert_eq!(g.run_stamp(), u32::MAX);
        g.set_goal(p(2, 0));
        g.scan(&[]);
        assert_eq!(g.run_stamp(), 1);
        assert_eq!(g.distance_at(p(1, 0)), Some(1.0));
    }

    #[test]
    fn out_of_bounds_is_harmless() {
        let mut g = GradientGrid::new(2, 2);
        assert!(!g.set_passable(p(-1, 0), false));
        assert!(!g.is_passable(p(2, 0)));
        assert_eq!(g.cost(p(0, 9)), None);
        assert_eq!(g.distance_at(p(7, 7)), None);
        assert!(g.find_path_pre_scanned(p(7, 7)).is_empty());
        assert!(g.find_path(5, 100, &[], &[], p(-3, 0), &[p(1, 1)]).is_empty());
        assert!(g.find_path(5, 100, &[], &[], p(0, 0), &[p(9, 9)]).is_empty());
    }

    #[test]
    fn start_on_goal_gives_empty_path() {
        let mut g = GradientGrid::new(3, 3);
        assert!(g.find_path(10, 100, &[], &[], p(1, 1), &[p(1, 1)]).is_empty());
    }

    #[test]
    fn find_path_caps_length() {
        let mut g = GradientGrid::new(10, 1);
        let path = g.find_path(3, usize::MAX, &[], &[], p(0, 0), &[p(9, 0)]);
        assert_eq!(path, vec![p(1, 0), p(2, 0), p(3, 0)]);
        let full = g.find_path(20, usize::MAX, &[], &[], p(0, 0), &[p(9, 0)]);
        assert_eq!(full.len(), 9);
    }

    #[test]
    fn capped_path_never_stops_on_only_passable() {
        let mut g = GradientGrid::new(10, 1);
        let allies = [p(2, 0), p(3, 0)];
        let path = g.find_path(3, usize::MAX, &[], &allies, p(0, 0), &[p(9, 0)]);
        assert_eq!(path, vec![p(1, 0)]);
        // An uncapped path may pass through them.
        let full = g.find_path(20, usize::MAX, &[], &allies, p(0, 0), &[p(9, 0)]);
        assert!(full.contains(&p(2, 0)));
    }

    #[test]
    fn find_path_avoids_impassable() {
        let mut g = GradientGrid::new(3, 3);
        let path = g.find_path(10, usize::MAX, &[p(1, 0), p(1, 1)], &[], p(0, 0), &[p(2, 0)]);
        assert_eq!(path.last(), Some(&p(2, 0)));
        assert!(path.contains(&p(1, 2)));
        assert!(!path.contains(&p(1, 1)));
    }

    #[test]
    fn scan_budget_too_small_gives_no_path() {
        let mut g = GradientGrid::new(10, 10);
        assert!(g.find_path(50, 3, &[], &[], p(0, 0), &[p(9, 9)]).is_empty());
        assert_eq!(g.state(), ScanState::Scanning);
    }
}
