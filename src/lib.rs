//! Advent of Code 2023. Day 5 is built on [`remap`], which pushes whole
//! seed ranges through the almanac's mapping tables instead of single seeds.

pub mod almanac;
pub mod days;
pub mod remap;
