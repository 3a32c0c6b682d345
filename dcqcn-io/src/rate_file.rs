// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use dcqcn_core::{Tick, WorkloadChangePoint};

use crate::error::Error;

fn malformed(path: &Path, line: usize, reason: impl Into<String>) -> Error {
    Error::MalformedLine {
        file: path.to_path_buf(),
        line,
        reason: reason.into(),
    }
}

/// Parses the DCQCN workload rate-change file: `<tick> <rate>` per line,
/// ascii decimal integers separated by whitespace, strictly ascending by
/// tick, first record's tick must be 0, blank lines ignored.
pub fn parse_workload_rate_file(path: &Path) -> Result<Vec<WorkloadChangePoint>, Error> {
    let reader = BufReader::new(File::open(path)?);

    let mut points = Vec::new();
    let mut last_tick: Option<u64> = None;

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split_whitespace();
        let tick_str = fields
            .next()
            .ok_or_else(|| malformed(path, line_number, "missing tick field"))?;
        let rate_str = fields
            .next()
            .ok_or_else(|| malformed(path, line_number, "missing rate field"))?;
        if fields.next().is_some() {
            return Err(malformed(path, line_number, "too many fields"));
        }

        let tick: u64 = tick_str
            .parse()
            .map_err(|_| malformed(path, line_number, format!("tick {:?} is not a decimal integer", tick_str)))?;
        let rate: i64 = rate_str
            .parse()
            .map_err(|_| malformed(path, line_number, format!("rate {:?} is not a decimal integer", rate_str)))?;

        check_ascending(path, line_number, tick, &mut last_tick, true)?;

        points.push(WorkloadChangePoint {
            tick: Tick::new(tick),
            rate: rate as f64,
        });
    }

    Ok(points)
}

/// Parses the scheduler's rate-trace file: `<tick> <rate>` per line, rate as
/// a float, strictly ascending by tick. Unlike the DCQCN workload file, the
/// first tick is not required to be 0.
pub fn parse_scheduler_rate_trace(path: &Path) -> Result<Vec<(u64, f64)>, Error> {
    let reader = BufReader::new(File::open(path)?);

    let mut points = Vec::new();
    let mut last_tick: Option<u64> = None;

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split_whitespace();
        let tick_str = fields
            .next()
            .ok_or_else(|| malformed(path, line_number, "missing tick field"))?;
        let rate_str = fields
            .next()
            .ok_or_else(|| malformed(path, line_number, "missing rate field"))?;
        if fields.next().is_some() {
            return Err(malformed(path, line_number, "too many fields"));
        }

        let tick: u64 = tick_str
            .parse()
            .map_err(|_| malformed(path, line_number, format!("tick {:?} is not a decimal integer", tick_str)))?;
        let rate: f64 = rate_str
            .parse()
            .map_err(|_| malformed(path, line_number, format!("rate {:?} is not a number", rate_str)))?;

        check_ascending(path, line_number, tick, &mut last_tick, false)?;

        points.push((tick, rate));
    }

    Ok(points)
}

fn check_ascending(
    path: &Path,
    line_number: usize,
    tick: u64,
    last_tick: &mut Option<u64>,
    first_must_be_zero: bool,
) -> Result<(), Error> {
    match *last_tick {
        Some(last) if tick <= last => {
            return Err(Error::NonAscendingTick {
                file: path.to_path_buf(),
                line: line_number,
            })
        }
        None if first_must_be_zero && tick != 0 => {
            return Err(Error::FirstTickNotZero {
                file: path.to_path_buf(),
            })
        }
        _ => {}
    }
    *last_tick = Some(tick);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        path
    }

    #[test]
    fn parses_ascending_integer_records_and_skips_blank_lines() {
        let path = write_temp(
            "dcqcn_io_workload_rate_file_ok.txt",
            "0 50\n\n500 300\n1500 50\n",
        );
        let points = parse_workload_rate_file(&path).expect("valid file must parse");
        assert_eq!(points.len(), 3);
        assert_eq!(points[1].rate, 300.0);
    }

    #[test]
    fn rejects_a_first_tick_that_is_not_zero() {
        let path = write_temp("dcqcn_io_workload_rate_file_bad_first.txt", "10 50\n");
        assert!(matches!(
            parse_workload_rate_file(&path),
            Err(Error::FirstTickNotZero { .. })
        ));
    }

    #[test]
    fn rejects_non_ascending_ticks() {
        let path = write_temp(
            "dcqcn_io_workload_rate_file_non_ascending.txt",
            "0 50\n0 60\n",
        );
        assert!(matches!(
            parse_workload_rate_file(&path),
            Err(Error::NonAscendingTick { .. })
        ));
    }

    #[test]
    fn scheduler_rate_trace_accepts_floats_and_a_nonzero_first_tick() {
        let path = write_temp(
            "dcqcn_io_scheduler_rate_trace_ok.txt",
            "100 500000.5\n200 600000.25\n",
        );
        let points = parse_scheduler_rate_trace(&path).expect("valid file must parse");
        assert_eq!(points, vec![(100, 500000.5), (200, 600000.25)]);
    }
}
