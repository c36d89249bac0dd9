//! One solver per day. Each takes the part (1 or 2) and the whole input
//! file and returns the answer as text.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};
use std::iter::zip;

use anyhow::{bail, ensure, Context, Result};
use arrayvec::ArrayVec;
use bitvec::prelude::*;
use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use rustc_hash::FxHashMap;

use crate::almanac::Almanac;

pub type Solver = fn(u8, &str) -> Result<String>;

pub const DAYS: [Solver; 18] = [
    day1, day2, day3, day4, day5, day6, day7, day8, day9,
    day10, day11, day12, day13, day14, day15, day16, day17, day18,
];

lazy_static! {
    static ref GAME: Regex = Regex::new(r"^Game (\d+):(.*)$").unwrap();
    static ref CUBES: Regex = Regex::new(r"(\d+) (red|green|blue)").unwrap();
    static ref NUMBER: Regex = Regex::new(r"\d+").unwrap();
    static ref CARD: Regex = Regex::new(r"^Card +(\d+):([\d ]+)\|([\d ]+)$").unwrap();
    static ref RACE: Regex = Regex::new(r"^(\w+):((?: +\d+)+)$").unwrap();
    static ref HAND: Regex = Regex::new(r"^([2-9TJQKA]{5}) +(\d+)$").unwrap();
    static ref NODE: Regex = Regex::new(r"^(\w+) = \((\w+), (\w+)\)$").unwrap();
    static ref DIG: Regex = Regex::new(r"^([UDLR]) +(\d+) +\(#([0-9a-f]{5})([0-3])\)$").unwrap();
}

fn gcd(a: u64, b: u64) -> u64 {if b == 0 {a} else {gcd(b, a % b)}}
fn lcm(a: u64, b: u64) -> u64 {a / gcd(a, b) * b}

// 1-based line numbers, blank lines skipped
fn lines(input: &str) -> impl Iterator<Item = (usize, &str)> {
    input.lines().map(str::trim_end).enumerate()
        .map(|(ix, text)| (ix + 1, text))
        .filter(|(_, text)| !text.is_empty())
}

////////////////////////////////////////////////////////////////////////////////

const DIGIT_NAMES: [&str; 9] = ["one", "two", "three", "four", "five", "six", "seven", "eight", "nine"];

fn digit_at(rest: &str, spelled: bool) -> Option<u32> {
    rest.chars().next()?.to_digit(10).or_else(|| {
        if !spelled {return None};
        DIGIT_NAMES.iter().position(|name| rest.starts_with(name)).map(|ix| ix as u32 + 1)
    })
}

pub fn day1(part: u8, input: &str) -> Result<String> {
    Ok(input.lines().filter_map(|line| {
        // spelled digits may share letters ("eightwo"), so try every position
        let mut digits = line.char_indices().filter_map(|(ix, _)| digit_at(&line[ix ..], part == 2));
        let first = digits.next()?;
        Some(10 * first + digits.last().unwrap_or(first))
    }).sum::<u32>().to_string())
}

pub fn day2(part: u8, input: &str) -> Result<String> {
    let mut total = 0u32;
    for (line, text) in lines(input) {
        let (_, [id, draws]) = GAME.captures(text)
            .with_context(|| format!("line {}: expected `Game <id>: <draws>`, got {:?}", line, text))?
            .extract();
        let mut most = FxHashMap::<&str, u32>::default();
        for (_, [count, color]) in CUBES.captures_iter(draws).map(|c| c.extract()) {
            let count: u32 = count.parse().with_context(|| format!("line {}", line))?;
            let max = most.entry(color).or_default();
            *max = (*max).max(count);
        }

        total += if part == 1 {
            let possible = most.iter().all(|(&color, &count)|
                count <= match color {"red" => 12, "green" => 13, _ => 14}
            );
            if possible {id.parse::<u32>()?} else {0}
        } else {
            ["red", "green", "blue"].iter().map(|color| most.get(color).copied().unwrap_or(0)).product::<u32>()
        };
    }
    Ok(total.to_string())
}

pub fn day3(part: u8, input: &str) -> Result<String> {
    let rows = input.trim().lines().map(str::trim_end).collect::<Vec<_>>();
    let grid = rows.iter().map(|row| row.as_bytes()).collect::<Vec<_>>();

    let mut part_sum = 0u64;
    // any one cell has at most 8 neighbouring numbers
    let mut gears = FxHashMap::<(usize, usize), ArrayVec<u64, 8>>::default();
    for (ri, row) in rows.iter().enumerate() {
        for number in NUMBER.find_iter(row) {
            let n: u64 = number.as_str().parse().with_context(|| format!("line {}", ri + 1))?;
            let cols = number.start().saturating_sub(1) ..= number.end();
            let neighbours = (ri.saturating_sub(1) ..= ri + 1).flat_map(|rj|
                cols.clone().map(move |cj| (rj, cj))
            ).filter_map(|(rj, cj)|
                grid.get(rj).and_then(|r| r.get(cj)).map(|&cell| (rj, cj, cell))
            );

            let mut is_part = false;
            for (rj, cj, cell) in neighbours {
                if cell == b'.' || cell.is_ascii_digit() {continue};
                is_part = true;
                if cell == b'*' {gears.entry((rj, cj)).or_default().push(n)};
            }
            if is_part {part_sum += n};
        }
    }

    if part == 1 {
        Ok(part_sum.to_string())
    } else {
        Ok(gears.values().filter(|ns| ns.len() == 2).map(|ns| ns[0] * ns[1]).sum::<u64>().to_string())
    }
}

pub fn day4(part: u8, input: &str) -> Result<String> {
    let mut points = 0u64;
    let mut cards = 0u64;
    // extra copies won for the cards that follow
    let mut copies = VecDeque::<u64>::new();
    for (line, text) in lines(input) {
        let (_, [_, winning, mine]) = CARD.captures(text)
            .with_context(|| format!("line {}: expected `Card <n>: <numbers> | <numbers>`, got {:?}", line, text))?
            .extract();

        let mut winners = bitvec![0; 100];
        for n in winning.split_whitespace() {
            let n: usize = n.parse().with_context(|| format!("line {}", line))?;
            if n >= winners.len() {winners.resize(n + 1, false)};
            winners.set(n, true);
        }
        let mine = mine.split_whitespace().map(str::parse::<usize>).collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("line {}", line))?;
        let matches = mine.iter().filter(|&&n| winners.get(n).is_some_and(|bit| *bit)).count();

        ensure!(matches <= 64, "line {}: {} winning numbers, a card's points only fit 64", line, matches);
        if matches > 0 {points += 1u64 << (matches - 1)};
        let held = 1 + copies.pop_front().unwrap_or(0);
        cards += held;
        if copies.len() < matches {copies.resize(matches, 0)};
        for extra in copies.iter_mut().take(matches) {*extra += held};
    }
    Ok((if part == 1 {points} else {cards}).to_string())
}

pub fn day5(part: u8, input: &str) -> Result<String> {
    let almanac = Almanac::parse(input)?;
    let lowest = almanac.lowest_location(part)?.context("no seeds to plant")?;
    Ok(lowest.to_string())
}

/// Hold times that beat `record` in a race of length `time`.
fn winning_holds(time: u64, record: u64) -> u64 {
    // distance rises with hold time up to time / 2 and is symmetric after
    let beats = |hold: u64| hold * (time - hold) > record;
    if !beats(time / 2) {return 0};
    let (mut lo, mut hi) = (0, time / 2);
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if beats(mid) {hi = mid} else {lo = mid}
    }
    time + 1 - 2 * hi
}

pub fn day6(part: u8, input: &str) -> Result<String> {
    let mut rows = lines(input).map(|(line, text)| -> Result<Vec<u64>> {
        let (_, [_, numbers]) = RACE.captures(text)
            .with_context(|| format!("line {}: expected `<label>: <numbers>`, got {:?}", line, text))?
            .extract();
        Ok(if part == 1 {
            numbers.split_whitespace().map(str::parse::<u64>).collect::<Result<_, _>>()?
        } else {
            vec![numbers.split_whitespace().collect::<String>().parse::<u64>()?]
        })
    });
    let (Some(times), Some(records)) = (rows.next().transpose()?, rows.next().transpose()?) else {
        bail!("expected a time line and a distance line")
    };
    ensure!(times.len() == records.len(), "{} times but {} distances", times.len(), records.len());
    Ok(zip(times, records).map(|(time, record)| winning_holds(time, record)).product::<u64>().to_string())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum HandType {HighCard, OnePair, TwoPair, ThreeOfAKind, FullHouse, FourOfAKind, FiveOfAKind}

fn hand_type(cards: &[u8; 5], jokers_wild: bool) -> HandType {
    let jokers = if jokers_wild {cards.iter().filter(|&&c| c == b'J').count()} else {0};
    let mut counts = cards.iter().filter(|&&c| !jokers_wild || c != b'J').counts().into_values().collect::<Vec<_>>();
    counts.sort_unstable_by(|a, b| b.cmp(a));
    // jokers always join the biggest group
    match counts.first_mut() {
        Some(most) => *most += jokers,
        None => counts.push(jokers)
    }
    match counts[..] {
        [5] => HandType::FiveOfAKind,
        [4, ..] => HandType::FourOfAKind,
        [3, 2] => HandType::FullHouse,
        [3, ..] => HandType::ThreeOfAKind,
        [2, 2, ..] => HandType::TwoPair,
        [2, ..] => HandType::OnePair,
        _ => HandType::HighCard
    }
}

pub fn day7(part: u8, input: &str) -> Result<String> {
    let order: &[u8] = if part == 1 {b"23456789TJQKA"} else {b"J23456789TQKA"};
    let mut hands = lines(input).map(|(line, text)| -> Result<_> {
        let (_, [cards, bid]) = HAND.captures(text)
            .with_context(|| format!("line {}: expected `<five cards> <bid>`, got {:?}", line, text))?
            .extract();
        let cards: [u8; 5] = cards.as_bytes().try_into()?;
        let strengths = cards.map(|card| order.iter().position(|&c| c == card).unwrap_or(0));
        Ok(((hand_type(&cards, part == 2), strengths), bid.parse::<u64>()?))
    }).collect::<Result<Vec<_>>>()?;

    hands.sort_unstable();
    Ok(hands.iter().zip(1 ..).map(|(&(_, bid), rank)| bid * rank).sum::<u64>().to_string())
}

pub fn day8(part: u8, input: &str) -> Result<String> {
    let mut rows = lines(input);
    let (_, turns) = rows.next().context("missing the left/right instructions")?;
    ensure!(turns.bytes().all(|b| b == b'L' || b == b'R'), "line 1: expected L/R instructions, got {:?}", turns);

    let mut network = FxHashMap::<&str, (&str, &str)>::default();
    for (line, text) in rows {
        let (_, [node, left, right]) = NODE.captures(text)
            .with_context(|| format!("line {}: expected `<node> = (<left>, <right>)`, got {:?}", line, text))?
            .extract();
        network.insert(node, (left, right));
    }

    let steps = |start: &str, at_end: fn(&str) -> bool| -> Result<u64> {
        // past this many steps some (node, turn) state has repeated
        let limit = turns.len() * network.len();
        let mut turn = turns.bytes().cycle();
        let mut node = start;
        for step in 0 ..= limit {
            if at_end(node) {return Ok(step as u64)};
            let &(left, right) = network.get(node).with_context(|| format!("no node named {}", node))?;
            node = if turn.next() == Some(b'L') {left} else {right};
        }
        bail!("{} never reaches an end node", start)
    };

    if part == 1 {
        Ok(steps("AAA", |node| node == "ZZZ")?.to_string())
    } else {
        let starts = network.keys().copied().filter(|node| node.ends_with('A')).collect::<Vec<_>>();
        ensure!(!starts.is_empty(), "no start nodes ending in A");
        // every ghost's path loops back onto its first end node in the same number of steps
        let distances = starts.into_iter()
            .map(|start| steps(start, |node| node.ends_with('Z')))
            .collect::<Result<Vec<_>>>()?;
        Ok(distances.into_iter().fold(1, lcm).to_string())
    }
}

/// Values one step before and one step after `values`.
fn extrapolate(values: &[i64]) -> (i64, i64) {
    if values.iter().all(|&v| v == 0) {return (0, 0)};
    let deltas = values.iter().tuple_windows().map(|(a, b)| b - a).collect::<Vec<_>>();
    let (before, after) = extrapolate(&deltas);
    (values[0] - before, values[values.len() - 1] + after)
}

pub fn day9(part: u8, input: &str) -> Result<String> {
    let mut total = 0i64;
    for (line, text) in lines(input) {
        let values = text.split_whitespace().map(str::parse).collect::<Result<Vec<i64>, _>>()
            .with_context(|| format!("line {}: expected numbers, got {:?}", line, text))?;
        let (before, after) = extrapolate(&values);
        total += if part == 1 {after} else {before};
    }
    Ok(total.to_string())
}

////////////////////////////////////////////////////////////////////////////////

// a rectangular map of byte tiles
fn grid(input: &str) -> Result<Vec<Vec<u8>>> {
    let mut rows: Vec<Vec<u8>> = vec![];
    for (line, text) in lines(input) {
        if let Some(first) = rows.first() {
            ensure!(text.len() == first.len(), "line {}: expected {} tiles, got {}", line, first.len(), text.len());
        }
        rows.push(text.as_bytes().to_vec());
    }
    ensure!(!rows.is_empty(), "empty map");
    Ok(rows)
}

fn step(grid: &[Vec<u8>], (r, c): (usize, usize), (dr, dc): (isize, isize)) -> Option<(usize, usize)> {
    let (r, c) = (r.checked_add_signed(dr)?, c.checked_add_signed(dc)?);
    (r < grid.len() && c < grid[r].len()).then_some((r, c))
}

fn transpose(grid: &[Vec<u8>]) -> Vec<Vec<u8>> {
    (0 .. grid[0].len()).map(|c| grid.iter().map(|row| row[c]).collect()).collect()
}

fn rotate_clockwise(grid: &[Vec<u8>]) -> Vec<Vec<u8>> {
    (0 .. grid[0].len()).map(|c| grid.iter().rev().map(|row| row[c]).collect()).collect()
}

// ends listed north, south, west, east
fn pipe_ends(tile: u8) -> &'static [(isize, isize)] {
    match tile {
        b'|' => &[(-1, 0), (1, 0)],
        b'-' => &[(0, -1), (0, 1)],
        b'L' => &[(-1, 0), (0, 1)],
        b'J' => &[(-1, 0), (0, -1)],
        b'7' => &[(1, 0), (0, -1)],
        b'F' => &[(1, 0), (0, 1)],
        _ => &[]
    }
}

pub fn day10(part: u8, input: &str) -> Result<String> {
    let mut grid = grid(input)?;
    let start = grid.iter().enumerate()
        .find_map(|(r, row)| row.iter().position(|&tile| tile == b'S').map(|c| (r, c)))
        .context("no start tile S")?;
    let joined = [(-1, 0), (1, 0), (0, -1), (0, 1)].into_iter().filter(|&(dr, dc)|
        step(&grid, start, (dr, dc)).is_some_and(|(r, c)| pipe_ends(grid[r][c]).contains(&(-dr, -dc)))
    ).collect::<Vec<_>>();
    let pipe = b"|-LJ7F".iter().copied().find(|&pipe| pipe_ends(pipe) == joined.as_slice())
        .with_context(|| format!("start tile joins {} pipes, expected 2", joined.len()))?;
    grid[start.0][start.1] = pipe;

    let width = grid[0].len();
    let mut on_loop = bitvec![0; grid.len() * width];
    let (mut at, mut heading) = (start, pipe_ends(pipe)[0]);
    loop {
        on_loop.set(at.0 * width + at.1, true);
        at = step(&grid, at, heading).context("loop runs off the map")?;
        if at == start {break};
        let back = (-heading.0, -heading.1);
        let ends = pipe_ends(grid[at.0][at.1]);
        ensure!(ends.contains(&back), "row {} column {}: pipe does not join the loop", at.0 + 1, at.1 + 1);
        heading = if ends[0] == back {ends[1]} else {ends[0]};
    }

    if part == 1 {return Ok((on_loop.count_ones() / 2).to_string())};
    let mut inside = 0;
    for (r, row) in grid.iter().enumerate() {
        let mut crossings = 0;
        for (c, &tile) in row.iter().enumerate() {
            if on_loop[r * width + c] {
                // only pipes reaching north count, so L-7 crosses once and L-J not at all
                if matches!(tile, b'|' | b'L' | b'J') {crossings += 1};
            } else if crossings % 2 == 1 {
                inside += 1;
            }
        }
    }
    Ok(inside.to_string())
}

// position of each row or column once every empty one is `expansion` wide
fn expand(occupied: impl Iterator<Item = bool>, expansion: u64) -> Vec<u64> {
    occupied.scan(0, |at, full| {
        let here = *at;
        *at += if full {1} else {expansion};
        Some(here)
    }).collect()
}

fn galaxy_distances(input: &str, expansion: u64) -> Result<u64> {
    let grid = grid(input)?;
    let galaxies = grid.iter().enumerate().flat_map(|(r, row)|
        row.iter().enumerate().filter(|&(_, &tile)| tile == b'#').map(move |(c, _)| (r, c))
    ).collect::<Vec<_>>();
    let rows = expand(grid.iter().map(|row| row.contains(&b'#')), expansion);
    let cols = expand((0 .. grid[0].len()).map(|c| grid.iter().any(|row| row[c] == b'#')), expansion);
    Ok(galaxies.iter().tuple_combinations().map(|(&(r1, c1), &(r2, c2))|
        rows[r1].abs_diff(rows[r2]) + cols[c1].abs_diff(cols[c2])
    ).sum())
}

pub fn day11(part: u8, input: &str) -> Result<String> {
    Ok(galaxy_distances(input, if part == 1 {2} else {1_000_000})?.to_string())
}

/// Ways to fill in the `?` springs so that the damaged runs are exactly `groups`.
fn arrangements(springs: &[u8], groups: &[usize]) -> u64 {
    let (n, m) = (springs.len(), groups.len());
    // ways[i][j]: ways to place groups[j ..] in springs[i ..]
    let mut ways = vec![vec![0u64; m + 1]; n + 1];
    ways[n][m] = 1;
    for i in (0 .. n).rev() {
        for j in 0 ..= m {
            if springs[i] != b'#' {ways[i][j] += ways[i + 1][j]};
            if springs[i] == b'.' || j == m {continue};
            let end = i + groups[j];
            let fits = end <= n && !springs[i .. end].contains(&b'.') && springs.get(end) != Some(&b'#');
            if fits {ways[i][j] += ways[(end + 1).min(n)][j + 1]};
        }
    }
    ways[0][0]
}

pub fn day12(part: u8, input: &str) -> Result<String> {
    let copies = if part == 1 {1} else {5};
    let mut total = 0;
    for (line, text) in lines(input) {
        let (springs, groups) = text.split_once(' ')
            .with_context(|| format!("line {}: expected `<springs> <groups>`, got {:?}", line, text))?;
        ensure!(springs.bytes().all(|b| matches!(b, b'.' | b'#' | b'?')), "line {}: unknown spring in {:?}", line, springs);
        let groups = groups.split(',').map(str::parse::<usize>).collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("line {}", line))?;
        total += arrangements(vec![springs; copies].join("?").as_bytes(), &groups.repeat(copies));
    }
    Ok(total.to_string())
}

// blank-line separated blocks
fn blocks(input: &str) -> Vec<Vec<Vec<u8>>> {
    let mut blocks = vec![];
    let mut block = vec![];
    for text in input.lines().map(str::trim_end) {
        if !text.is_empty() {
            block.push(text.as_bytes().to_vec());
        } else if !block.is_empty() {
            blocks.push(std::mem::take(&mut block));
        }
    }
    if !block.is_empty() {blocks.push(block)};
    blocks
}

/// Rows above a horizontal mirror that is off by exactly `smudges` tiles.
fn mirror_row(pattern: &[Vec<u8>], smudges: usize) -> Option<usize> {
    (1 .. pattern.len()).find(|&k| {
        zip(pattern[.. k].iter().rev(), &pattern[k ..])
            .map(|(a, b)| zip(a, b).filter(|(x, y)| x != y).count())
            .sum::<usize>() == smudges
    })
}

pub fn day13(part: u8, input: &str) -> Result<String> {
    let smudges = if part == 1 {0} else {1};
    let mut total = 0;
    for (ix, pattern) in blocks(input).iter().enumerate() {
        ensure!(pattern.iter().all(|row| row.len() == pattern[0].len()), "pattern {} is not rectangular", ix + 1);
        total += match mirror_row(pattern, smudges) {
            Some(rows) => 100 * rows,
            None => mirror_row(&transpose(pattern), smudges).with_context(|| format!("pattern {} has no mirror", ix + 1))?
        };
    }
    Ok(total.to_string())
}

fn tilt_north(grid: &mut [Vec<u8>]) {
    for c in 0 .. grid[0].len() {
        let mut free = 0;
        for r in 0 .. grid.len() {
            match grid[r][c] {
                b'#' => free = r + 1,
                b'O' => {grid[r][c] = b'.'; grid[free][c] = b'O'; free += 1}
                _ => {}
            }
        }
    }
}

// north, west, south, east: tilting north then turning clockwise brings west to the top
fn spin_cycle(grid: Vec<Vec<u8>>) -> Vec<Vec<u8>> {
    (0 .. 4).fold(grid, |mut grid, _| {tilt_north(&mut grid); rotate_clockwise(&grid)})
}

fn north_load(grid: &[Vec<u8>]) -> usize {
    grid.iter().enumerate().map(|(r, row)| row.iter().filter(|&&tile| tile == b'O').count() * (grid.len() - r)).sum()
}

pub fn day14(part: u8, input: &str) -> Result<String> {
    const CYCLES: usize = 1_000_000_000;
    let mut grid = grid(input)?;
    if part == 1 {
        tilt_north(&mut grid);
        return Ok(north_load(&grid).to_string());
    }

    let mut seen = FxHashMap::<Vec<Vec<u8>>, usize>::default();
    let mut loads: Vec<usize> = vec![];
    for cycle in 0 .. CYCLES {
        if let Some(&first) = seen.get(&grid) {
            let period = cycle - first;
            return Ok(loads[first + (CYCLES - first) % period].to_string());
        }
        seen.insert(grid.clone(), cycle);
        loads.push(north_load(&grid));
        grid = spin_cycle(grid);
    }
    Ok(north_load(&grid).to_string())
}

fn holiday_hash(text: &str) -> usize {
    text.bytes().fold(0, |hash, b| (hash + b as usize) * 17 % 256)
}

pub fn day15(part: u8, input: &str) -> Result<String> {
    let sequence = input.replace(['\r', '\n'], "");
    let steps = sequence.split(',').filter(|step| !step.is_empty());
    if part == 1 {return Ok(steps.map(holiday_hash).sum::<usize>().to_string())};

    let mut boxes: Vec<Vec<(&str, usize)>> = vec![vec![]; 256];
    for step in steps {
        if let Some(label) = step.strip_suffix('-') {
            boxes[holiday_hash(label)].retain(|&(held, _)| held != label);
            continue;
        }
        let (label, focal) = step.split_once('=')
            .with_context(|| format!("step {:?}: expected `<label>=<focal length>` or `<label>-`", step))?;
        let focal = focal.parse::<usize>().with_context(|| format!("step {:?}", step))?;
        let lenses = &mut boxes[holiday_hash(label)];
        match lenses.iter_mut().find(|(held, _)| *held == label) {
            Some(lens) => lens.1 = focal,
            None => lenses.push((label, focal))
        }
    }
    Ok(boxes.iter().enumerate().flat_map(|(b, lenses)|
        lenses.iter().enumerate().map(move |(slot, &(_, focal))| (b + 1) * (slot + 1) * focal)
    ).sum::<usize>().to_string())
}

// north, east, south, west
const HEADINGS: [(isize, isize); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

fn energized(grid: &[Vec<u8>], start: (usize, usize), heading: usize) -> usize {
    let width = grid[0].len();
    let mut seen = bitvec![0; grid.len() * width * 4];
    let mut beams = vec![(start, heading)];
    while let Some(((r, c), heading)) = beams.pop() {
        let state = (r * width + c) * 4 + heading;
        if seen[state] {continue};
        seen.set(state, true);

        let mut turns = ArrayVec::<usize, 2>::new();
        match grid[r][c] {
            b'/' => turns.push(heading ^ 1),
            b'\\' => turns.push(3 - heading),
            b'|' if heading % 2 == 1 => turns.extend([0, 2]),
            b'-' if heading % 2 == 0 => turns.extend([1, 3]),
            _ => turns.push(heading)
        }
        for turn in turns {
            if let Some(next) = step(grid, (r, c), HEADINGS[turn]) {beams.push((next, turn))};
        }
    }
    (0 .. grid.len() * width).filter(|&tile| seen[tile * 4 .. tile * 4 + 4].any()).count()
}

pub fn day16(part: u8, input: &str) -> Result<String> {
    let grid = grid(input)?;
    ensure!(grid.iter().flatten().all(|b| b".|-/\\".contains(b)), "unknown tile in the contraption");
    if part == 1 {return Ok(energized(&grid, (0, 0), 1).to_string())};

    let (height, width) = (grid.len(), grid[0].len());
    let entries = (0 .. width).flat_map(|c| [((0, c), 2), ((height - 1, c), 0)])
        .chain((0 .. height).flat_map(|r| [((r, 0), 1), ((r, width - 1), 3)]));
    Ok(entries.map(|(start, heading)| energized(&grid, start, heading)).max().unwrap_or(0).to_string())
}

/// Least heat lost on the way to the bottom right corner, moving between
/// `min_run` and `max_run` blocks before each turn.
fn least_heat(grid: &[Vec<u8>], min_run: usize, max_run: usize) -> Option<u32> {
    let (height, width) = (grid.len(), grid[0].len());
    // states are (tile, axis of the last run); axis 0 runs vertically, 1 horizontally
    let mut best = vec![u32::MAX; height * width * 2];
    let mut queue = BinaryHeap::new();
    for axis in 0 .. 2 {
        best[axis] = 0;
        queue.push(Reverse((0, (0, 0), axis)));
    }

    while let Some(Reverse((heat, at, axis))) = queue.pop() {
        if at == (height - 1, width - 1) {return Some(heat)};
        if heat > best[(at.0 * width + at.1) * 2 + axis] {continue};
        let turned = 1 - axis;
        for sign in [-1, 1] {
            let heading = if axis == 0 {(0, sign)} else {(sign, 0)};
            let (mut to, mut total) = (at, heat);
            for run in 1 ..= max_run {
                let Some(next) = step(grid, to, heading) else {break};
                to = next;
                total += (grid[to.0][to.1] - b'0') as u32;
                if run < min_run {continue};
                let state = (to.0 * width + to.1) * 2 + turned;
                if total < best[state] {
                    best[state] = total;
                    queue.push(Reverse((total, to, turned)));
                }
            }
        }
    }
    None
}

pub fn day17(part: u8, input: &str) -> Result<String> {
    let grid = grid(input)?;
    ensure!(grid.iter().flatten().all(u8::is_ascii_digit), "heat loss map holds a non-digit");
    let (min_run, max_run) = if part == 1 {(1, 3)} else {(4, 10)};
    Ok(least_heat(&grid, min_run, max_run).context("the factory cannot be reached")?.to_string())
}

pub fn day18(part: u8, input: &str) -> Result<String> {
    let (mut x, mut y) = (0i64, 0i64);
    let (mut twice_area, mut boundary) = (0i64, 0i64);
    for (line, text) in lines(input) {
        let (_, [dir, len, hex, hex_dir]) = DIG.captures(text)
            .with_context(|| format!("line {}: expected `<U|D|L|R> <meters> (#<color>)`, got {:?}", line, text))?
            .extract();
        let (dir, len) = if part == 1 {
            (dir, len.parse::<i64>().with_context(|| format!("line {}", line))?)
        } else {
            (&"RDLU"[hex_dir.parse::<usize>()? ..][.. 1], i64::from_str_radix(hex, 16)?)
        };
        let (dx, dy) = match dir {"R" => (1, 0), "D" => (0, 1), "L" => (-1, 0), _ => (0, -1)};
        let (nx, ny) = (x + dx * len, y + dy * len);
        // shoelace
        twice_area += x * ny - nx * y;
        boundary += len;
        (x, y) = (nx, ny);
    }
    ensure!((x, y) == (0, 0), "the dig plan ends at ({}, {}) instead of its start", x, y);
    // Pick's theorem gives the interior, the trench itself is one cubic meter per step
    Ok((twice_area.abs() / 2 + boundary / 2 + 1).to_string())
}
