//! The seed almanac: a `seeds:` line followed by chained
//! `<from>-to-<to> map:` blocks of `<dest> <source> <length>` rules.

use std::num::ParseIntError;

use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::remap::{Interval, MappingRule, MappingTable, Pipeline};

lazy_static! {
    static ref SEEDS: Regex = Regex::new(r"^seeds:((?: +\d+)+)$").unwrap();
    static ref HEADER: Regex = Regex::new(r"^(\w+)-to-(\w+) map:$").unwrap();
    static ref RULE: Regex = Regex::new(r"^(\d+) +(\d+) +(\d+)$").unwrap();
}

#[derive(Debug, Error)]
pub enum AlmanacError {
    #[error("input is empty, expected a `seeds:` line")]
    MissingSeeds,
    #[error("line {line}: expected `seeds: <n> ...`, got {text:?}")]
    Seeds {line: usize, text: String},
    #[error("line {line}: expected `<from>-to-<to> map:`, got {text:?}")]
    Header {line: usize, text: String},
    #[error("line {line}: expected `<dest> <source> <length>`, got {text:?}")]
    Rule {line: usize, text: String},
    #[error("line {line}: cannot read {text:?} as a number")]
    Number {line: usize, text: String, #[source] source: ParseIntError},
    #[error("line {line}: range end does not fit in 64 bits")]
    Overflow {line: usize},
    #[error("line {line}: rule {rule} overlaps {existing} in the {from}-to-{to} map")]
    Overlap {line: usize, rule: MappingRule, existing: MappingRule, from: String, to: String},
    #[error("line {line}: {from}-to-{to} map cannot follow a map to {expected}")]
    Chain {line: usize, from: String, to: String, expected: String},
    #[error("seed ranges come in start/length pairs, got {0} values")]
    OddSeedCount(usize),
}

fn number(line: usize, text: &str) -> Result<i64, AlmanacError> {
    text.parse().map_err(|source| AlmanacError::Number {line, text: text.to_owned(), source})
}

#[derive(Clone, Debug)]
pub struct Almanac {
    pub seeds: Vec<i64>,
    pub pipeline: Pipeline,
}

impl Almanac {
    pub fn parse(input: &str) -> Result<Self, AlmanacError> {
        let mut lines = input.lines().map(str::trim_end).enumerate().map(|(ix, text)| (ix + 1, text));

        let (line, text) = lines.next().ok_or(AlmanacError::MissingSeeds)?;
        let seeds = SEEDS.captures(text)
            .ok_or_else(|| AlmanacError::Seeds {line, text: text.to_owned()})?[1]
            .split_whitespace()
            .map(|n| number(line, n))
            .collect::<Result<Vec<_>, _>>()?;
        // a lone seed is the interval [seed, seed + 1)
        if seeds.contains(&i64::MAX) {return Err(AlmanacError::Overflow {line})};

        let mut tables: Vec<MappingTable> = vec![];
        let mut in_block = false;
        for (line, text) in lines {
            if text.is_empty() {
                in_block = false;
                continue;
            }

            if let Some(header) = HEADER.captures(text) {
                let (from, to) = (&header[1], &header[2]);
                if let Some(previous) = tables.last().filter(|previous| previous.to != from) {
                    return Err(AlmanacError::Chain {
                        line, from: from.to_owned(), to: to.to_owned(), expected: previous.to.clone()
                    });
                }
                tables.push(MappingTable::new(from, to));
                in_block = true;
                continue;
            }

            let Some(table) = tables.last_mut().filter(|_| in_block) else {
                return Err(AlmanacError::Header {line, text: text.to_owned()});
            };
            let Some(rule) = RULE.captures(text) else {
                return Err(AlmanacError::Rule {line, text: text.to_owned()});
            };
            let [dest, source, len] = [&rule[1], &rule[2], &rule[3]].map(|n| number(line, n));
            let (dest, source, len) = (dest?, source?, len?);
            if source.checked_add(len).is_none() || dest.checked_add(len).is_none() {
                return Err(AlmanacError::Overflow {line});
            }

            let rule = MappingRule::new(dest, source, len);
            table.insert(rule).map_err(|existing| AlmanacError::Overlap {
                line, rule, existing, from: table.from.clone(), to: table.to.clone()
            })?;
        }

        debug!(seeds = seeds.len(), tables = tables.len(), "parsed almanac");
        for table in &tables {
            debug!(from = %table.from, to = %table.to, rules = table.len(), "mapping table");
        }
        Ok(Almanac {seeds, pipeline: Pipeline::new(tables)})
    }

    pub fn point_seeds(&self) -> Vec<Interval> {
        self.seeds.iter().map(|&seed| Interval::point(seed)).collect()
    }

    /// Seeds read as `start length` pairs.
    pub fn seed_ranges(&self) -> Result<Vec<Interval>, AlmanacError> {
        if self.seeds.len() % 2 != 0 {return Err(AlmanacError::OddSeedCount(self.seeds.len()))};
        self.seeds.iter().tuples().map(|(&start, &len)|
            start.checked_add(len).map(|end| Interval::new(start, end)).ok_or(AlmanacError::Overflow {line: 1})
        ).collect()
    }

    /// Lowest location for part 1 (single seeds) or part 2 (seed ranges).
    /// `None` when there is nothing to plant.
    pub fn lowest_location(&self, part: u8) -> Result<Option<i64>, AlmanacError> {
        let seeds = if part == 1 {self.point_seeds()} else {self.seed_ranges()?};
        debug!(part, intervals = seeds.len(), values = seeds.iter().map(Interval::len).sum::<i64>(), "planting");
        Ok(self.pipeline.minimum(seeds))
    }
}
