use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use aoc2023::days::DAYS;

/// Solves one day of Advent of Code 2023 and prints the answers.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Day number
    #[arg(value_parser = clap::value_parser!(u8).range(1 ..= DAYS.len() as i64))]
    day: u8,
    /// Part to solve; both parts when omitted
    #[arg(value_parser = clap::value_parser!(u8).range(1 ..= 2))]
    part: Option<u8>,
    /// Read `day<N>test<T>.in` instead of `day<N>.in`
    #[arg(short, long)]
    test: Option<u32>,
    /// Input file, bypassing the naming scheme
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Where the `day*.in` files live
    #[arg(long, env = "AOC_INPUT_DIR", default_value = "inputs")]
    input_dir: PathBuf,
}

impl Args {
    fn input_path(&self) -> PathBuf {
        if let Some(input) = &self.input {return input.clone()};
        let fname = match self.test {
            Some(test) => format!("day{}test{}.in", self.day, test),
            None => format!("day{}.in", self.day)
        };
        self.input_dir.join(fname)
    }

    fn parts(&self) -> Vec<u8> {self.part.map_or(vec![1, 2], |part| vec![part])}
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let solve = DAYS[args.day as usize - 1];
    let fname = args.input_path();
    info!(path = %fname.display(), "reading input");
    let input = std::fs::read_to_string(&fname).with_context(|| format!("cannot read {}", fname.display()))?;

    for part in args.parts() {
        let time = Instant::now();
        let answer = solve(part, &input).with_context(|| format!("day {} part {}", args.day, part))?;
        println!("{}", answer);
        info!(part, elapsed = ?time.elapsed(), "solved");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(argv: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("aoc2023").chain(argv.iter().copied()))
    }

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn default_input_names() {
        let args = parse(&["5", "--input-dir", "in"]).unwrap();
        assert_eq!(args.input_path(), PathBuf::from("in/day5.in"));
        assert_eq!(args.parts(), vec![1, 2]);

        let args = parse(&["8", "2", "--test", "3", "--input-dir", "in"]).unwrap();
        assert_eq!(args.input_path(), PathBuf::from("in/day8test3.in"));
        assert_eq!(args.parts(), vec![2]);
    }

    #[test]
    fn input_dir_defaults_to_inputs() {
        let command = Args::command();
        let input_dir = command.get_arguments().find(|arg| arg.get_id() == "input_dir").unwrap();
        let defaults = input_dir.get_default_values().iter().map(|value| value.to_str()).collect::<Vec<_>>();
        assert_eq!(defaults, vec![Some("inputs")]);
        assert_eq!(input_dir.get_env(), Some(std::ffi::OsStr::new("AOC_INPUT_DIR")));
    }

    #[test]
    fn explicit_input_wins() {
        let args = parse(&["1", "-t", "2", "-i", "/tmp/x.txt"]).unwrap();
        assert_eq!(args.input_path(), PathBuf::from("/tmp/x.txt"));
    }

    #[test]
    fn rejects_unknown_day_and_part() {
        assert!(parse(&["0"]).is_err());
        assert!(parse(&["18"]).is_ok());
        assert!(parse(&["19"]).is_err());
        assert!(parse(&["3", "3"]).is_err());
    }
}
