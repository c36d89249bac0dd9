//! Piecewise remapping of half-open intervals through a pipeline of
//! mapping tables.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Bound::{Excluded, Included, Unbounded};

use tracing::trace;

/// Half-open range `[start, end)`. Empty when `start >= end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Interval {
    pub start: i64,
    pub end: i64,
}

impl Interval {
    pub fn new(start: i64, end: i64) -> Self {Interval {start, end}}

    pub fn point(x: i64) -> Self {Interval::new(x, x + 1)}

    pub fn is_empty(&self) -> bool {self.start >= self.end}

    pub fn len(&self) -> i64 {(self.end - self.start).max(0)}

    pub fn contains(&self, x: i64) -> bool {self.start <= x && x < self.end}

    pub fn shift(self, offset: i64) -> Self {Interval::new(self.start + offset, self.end + offset)}
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Everything in `source` moves by the same offset, landing at `dest_start`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MappingRule {
    pub source: Interval,
    pub dest_start: i64,
}

impl MappingRule {
    pub fn new(dest_start: i64, source_start: i64, len: i64) -> Self {
        MappingRule {source: Interval::new(source_start, source_start + len), dest_start}
    }

    pub fn offset(&self) -> i64 {self.dest_start - self.source.start}

    pub fn dest(&self) -> Interval {self.source.shift(self.offset())}
}

impl fmt::Display for MappingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.dest())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    pub source: Interval,
    pub offset: i64,
}

impl Piece {
    fn identity(source: Interval) -> Self {Piece {source, offset: 0}}

    pub fn mapped(&self) -> Interval {self.source.shift(self.offset)}
}

/// A single pipeline stage. Rules are keyed by the end of their source
/// range so that a lower-bound query on a point finds the first rule
/// that can still contain it.
#[derive(Clone, Debug, Default)]
pub struct MappingTable {
    pub from: String,
    pub to: String,
    rules: BTreeMap<i64, MappingRule>,
}

impl MappingTable {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        MappingTable {from: from.into(), to: to.into(), rules: BTreeMap::new()}
    }

    /// Adds a rule. Rules with an empty source are dropped since they map
    /// nothing. A rule overlapping an existing one is refused and the
    /// existing rule is handed back.
    pub fn insert(&mut self, rule: MappingRule) -> Result<(), MappingRule> {
        if rule.source.is_empty() {return Ok(())};
        if let Some(&existing) = self.rules_after(rule.source.start).next() {
            if existing.source.start < rule.source.end {return Err(existing)};
        }
        self.rules.insert(rule.source.end, rule);
        Ok(())
    }

    pub fn len(&self) -> usize {self.rules.len()}

    pub fn is_empty(&self) -> bool {self.rules.is_empty()}

    /// Rules whose source range ends at or after `point`, in source order.
    pub fn lower_bound(&self, point: i64) -> impl Iterator<Item = &MappingRule> {
        self.rules.range((Included(point), Unbounded)).map(|(_, rule)| rule)
    }

    // strictly after: the first of these is the only candidate to contain `point`
    fn rules_after(&self, point: i64) -> impl Iterator<Item = &MappingRule> {
        self.rules.range((Excluded(point), Unbounded)).map(|(_, rule)| rule)
    }

    pub fn map_point(&self, x: i64) -> i64 {
        match self.rules_after(x).next() {
            Some(rule) if rule.source.contains(x) => x + rule.offset(),
            _ => x
        }
    }

    /// Cuts `interval` along the rule boundaries of this table. Gaps
    /// between rules come out with offset 0. The returned pieces are
    /// non-empty and tile `interval` exactly, in increasing order.
    pub fn split(&self, interval: Interval) -> Vec<Piece> {
        let mut pieces = Vec::new();
        if interval.is_empty() {return pieces};

        //
        // interval:         [-----------[
        // rules:     [-A-[    [-C-[   [-D-[    [-E-[
        // pieces:           [0|-1-|-2-|3[
        //
        // A is skipped by the lower bound, E by the walk condition
        let mut cursor = interval.start;
        for rule in self.lower_bound(interval.start).take_while(|rule| rule.source.start < interval.end) {
            let boundary = rule.source.start.max(interval.start);
            let cut = rule.source.end.min(interval.end);
            pieces.push(Piece::identity(Interval::new(cursor, boundary)));
            pieces.push(Piece {source: Interval::new(boundary, cut), offset: rule.offset()});
            cursor = rule.source.end;
        }
        pieces.push(Piece::identity(Interval::new(cursor, interval.end)));

        pieces.retain(|piece| !piece.source.is_empty());
        pieces
    }
}

#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    pub tables: Vec<MappingTable>,
}

impl Pipeline {
    pub fn new(tables: Vec<MappingTable>) -> Self {Pipeline {tables}}

    pub fn len(&self) -> usize {self.tables.len()}

    pub fn is_empty(&self) -> bool {self.tables.is_empty()}

    pub fn map_point(&self, x: i64) -> i64 {
        self.tables.iter().fold(x, |x, table| table.map_point(x))
    }

    /// The lowest value `interval` can reach once it has passed through
    /// every table from `table_index` on. `None` for an empty interval.
    ///
    /// Each split is pushed onto an explicit stack rather than recursed
    /// into, so depth does not grow with the number of tables or rules.
    pub fn remap_minimum(&self, table_index: usize, interval: Interval) -> Option<i64> {
        let mut minimum = None;
        let mut work = vec![(table_index, interval)];
        while let Some((index, interval)) = work.pop() {
            if interval.is_empty() {continue};
            let Some(table) = self.tables.get(index) else {
                // a final interval is ordered, so its start is its minimum
                minimum = Some(minimum.map_or(interval.start, |m: i64| m.min(interval.start)));
                continue;
            };
            for piece in table.split(interval) {
                trace!(stage = index, from = %piece.source, to = %piece.mapped(), "split");
                work.push((index + 1, piece.mapped()));
            }
        }
        minimum
    }

    /// Minimum over several independent top-level queries.
    pub fn minimum(&self, intervals: impl IntoIterator<Item = Interval>) -> Option<i64> {
        intervals.into_iter().filter_map(|interval| self.remap_minimum(0, interval)).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table(rules: &[(i64, i64, i64)]) -> MappingTable {
        let mut table = MappingTable::new("a", "b");
        for &(dest, source, len) in rules {
            table.insert(MappingRule::new(dest, source, len)).unwrap();
        }
        table
    }

    fn seed_to_soil() -> MappingTable {table(&[(50, 98, 2), (52, 50, 48)])}

    fn soil_to_fertilizer() -> MappingTable {table(&[(0, 15, 37), (37, 52, 2), (39, 0, 15)])}

    fn assert_tiles(pieces: &[Piece], interval: Interval) {
        let mut cursor = interval.start;
        for piece in pieces {
            assert!(!piece.source.is_empty(), "empty piece {:?}", piece);
            assert_eq!(piece.source.start, cursor, "gap or overlap in {:?}", pieces);
            cursor = piece.source.end;
        }
        assert_eq!(cursor, interval.end, "pieces {:?} do not cover {}", pieces, interval);
    }

    #[test]
    fn point_inside_rule_moves_by_offset() {
        let table = table(&[(10, 100, 5)]);
        for x in 100 .. 105 {
            assert_eq!(table.map_point(x), x - 90);
        }
    }

    #[test]
    fn point_outside_rules_is_unchanged() {
        let table = seed_to_soil();
        for x in [0, 13, 49, 100, 1000, -5] {
            assert_eq!(table.map_point(x), x);
        }
        assert_eq!(table.map_point(98), 50);
        assert_eq!(table.map_point(99), 51);
        assert_eq!(table.map_point(97), 99);
        assert_eq!(table.map_point(50), 52);
    }

    #[test]
    fn interval_inside_one_rule_is_one_mapped_piece() {
        let pieces = seed_to_soil().split(Interval::new(79, 93));
        assert_eq!(pieces, vec![Piece {source: Interval::new(79, 93), offset: 2}]);
        assert_eq!(pieces[0].mapped(), Interval::new(81, 95));
    }

    #[test]
    fn interval_touching_no_rule_passes_through() {
        let table = seed_to_soil();
        assert_eq!(table.split(Interval::new(0, 50)), vec![Piece {source: Interval::new(0, 50), offset: 0}]);
        assert_eq!(table.split(Interval::new(100, 120)), vec![Piece {source: Interval::new(100, 120), offset: 0}]);
    }

    #[test]
    fn empty_table_is_identity() {
        let table = MappingTable::new("x", "y");
        let interval = Interval::new(-7, 42);
        assert_eq!(table.split(interval), vec![Piece {source: interval, offset: 0}]);
    }

    #[test]
    fn straddling_interval_splits_at_every_boundary() {
        let table = table(&[(1000, 10, 5), (2000, 20, 5)]);
        let pieces = table.split(Interval::new(5, 30));
        assert_eq!(pieces, vec![
            Piece {source: Interval::new(5, 10), offset: 0},
            Piece {source: Interval::new(10, 15), offset: 990},
            Piece {source: Interval::new(15, 20), offset: 0},
            Piece {source: Interval::new(20, 25), offset: 1980},
            Piece {source: Interval::new(25, 30), offset: 0},
        ]);
    }

    #[test]
    fn leading_gap_before_first_rule_is_kept() {
        let pieces = seed_to_soil().split(Interval::new(40, 60));
        assert_eq!(pieces, vec![
            Piece {source: Interval::new(40, 50), offset: 0},
            Piece {source: Interval::new(50, 60), offset: 2},
        ]);
    }

    #[test]
    fn boundaries_touching_rules_produce_no_empty_pieces() {
        let table = table(&[(0, 10, 10)]);
        // ends exactly where the rule starts
        assert_eq!(table.split(Interval::new(5, 10)), vec![Piece {source: Interval::new(5, 10), offset: 0}]);
        // starts exactly where the rule ends
        assert_eq!(table.split(Interval::new(20, 25)), vec![Piece {source: Interval::new(20, 25), offset: 0}]);
        // covers the rule exactly
        assert_eq!(table.split(Interval::new(10, 20)), vec![Piece {source: Interval::new(10, 20), offset: -10}]);
        // single point at either edge
        assert_eq!(table.split(Interval::point(10)), vec![Piece {source: Interval::point(10), offset: -10}]);
        assert_eq!(table.split(Interval::point(19)), vec![Piece {source: Interval::point(19), offset: -10}]);
        assert_eq!(table.split(Interval::point(20)), vec![Piece {source: Interval::point(20), offset: 0}]);
    }

    #[test]
    fn adjacent_rules_leave_no_gap_piece() {
        let table = table(&[(100, 0, 10), (200, 10, 10)]);
        let pieces = table.split(Interval::new(5, 15));
        assert_eq!(pieces, vec![
            Piece {source: Interval::new(5, 10), offset: 100},
            Piece {source: Interval::new(10, 15), offset: 190},
        ]);
    }

    #[test]
    fn empty_interval_splits_into_nothing() {
        assert!(seed_to_soil().split(Interval::new(60, 60)).is_empty());
        assert!(seed_to_soil().split(Interval::new(60, 50)).is_empty());
        assert_eq!(Pipeline::new(vec![seed_to_soil()]).remap_minimum(0, Interval::new(3, 3)), None);
    }

    #[test]
    fn pieces_tile_the_interval() {
        let tables = [seed_to_soil(), soil_to_fertilizer(), table(&[(7, 3, 1), (0, 4, 2), (9, 8, 30)])];
        for table in &tables {
            for start in -3 .. 105 {
                for len in [1, 2, 5, 17, 60] {
                    let interval = Interval::new(start, start + len);
                    let pieces = table.split(interval);
                    assert_tiles(&pieces, interval);
                    for piece in &pieces {
                        for x in piece.source.start .. piece.source.end {
                            assert_eq!(x + piece.offset, table.map_point(x));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn overlapping_rule_is_refused() {
        let mut table = table(&[(0, 10, 10)]);
        assert_eq!(table.insert(MappingRule::new(50, 15, 10)), Err(MappingRule::new(0, 10, 10)));
        assert_eq!(table.insert(MappingRule::new(50, 5, 6)), Err(MappingRule::new(0, 10, 10)));
        assert_eq!(table.insert(MappingRule::new(50, 0, 30)), Err(MappingRule::new(0, 10, 10)));
        assert_eq!(table.insert(MappingRule::new(50, 0, 10)), Ok(()));
        assert_eq!(table.insert(MappingRule::new(50, 20, 10)), Ok(()));
        assert_eq!(table.insert(MappingRule::new(50, 40, 0)), Ok(()));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn lower_bound_includes_rule_ending_at_point() {
        let table = seed_to_soil();
        let found = table.lower_bound(98).map(|rule| rule.source).collect::<Vec<_>>();
        assert_eq!(found, vec![Interval::new(50, 98), Interval::new(98, 100)]);
        assert_eq!(table.lower_bound(101).count(), 0);
    }

    #[test]
    fn two_stage_pipeline_matches_brute_force() {
        let pipeline = Pipeline::new(vec![seed_to_soil(), soil_to_fertilizer()]);
        for seed in [79, 14, 55, 13] {
            assert_eq!(pipeline.remap_minimum(0, Interval::point(seed)), Some(pipeline.map_point(seed)));
        }
        assert_eq!(pipeline.map_point(79), 81);
        assert_eq!(pipeline.map_point(14), 53);
        assert_eq!(pipeline.map_point(55), 57);
        assert_eq!(pipeline.map_point(13), 52);
        assert_eq!(pipeline.minimum([79, 14, 55, 13].map(Interval::point)), Some(52));
    }

    #[test]
    fn interval_minimum_matches_brute_force() {
        let pipeline = Pipeline::new(vec![
            seed_to_soil(),
            soil_to_fertilizer(),
            table(&[(49, 53, 8), (0, 11, 42), (42, 0, 7), (57, 7, 4)]),
            table(&[(3, 40, 5), (90, 0, 3)]),
        ]);
        for start in 0 .. 110 {
            for len in [1, 3, 8, 25] {
                let interval = Interval::new(start, start + len);
                let brute = (interval.start .. interval.end).map(|x| pipeline.map_point(x)).min();
                assert_eq!(pipeline.remap_minimum(0, interval), brute, "interval {}", interval);
            }
        }
    }

    #[test]
    fn remap_minimum_from_last_index_is_interval_start() {
        let pipeline = Pipeline::new(vec![seed_to_soil()]);
        assert_eq!(pipeline.remap_minimum(1, Interval::new(98, 100)), Some(98));
        assert_eq!(pipeline.remap_minimum(0, Interval::new(98, 100)), Some(50));
    }

    #[test]
    fn deep_pipeline_does_not_overflow_the_stack() {
        let tables = (0 .. 20_000).map(|_| table(&[(1, 0, 1_000_000)])).collect();
        let pipeline = Pipeline::new(tables);
        assert_eq!(pipeline.remap_minimum(0, Interval::new(0, 10)), Some(20_000));
    }
}
