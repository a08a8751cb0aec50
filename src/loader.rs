use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str::FromStr,
};

use crate::{
    error::LoadError,
    shared::{Dataset, ParticleRecord},
};

/// Reads `step,id,x,y[,...]` rows from `path`. There is no header line.
///
/// Rows whose x or y is empty or not finite (`inf`, `-inf`, `nan`) are dropped.
/// Columns past the fourth are ignored.
pub fn load_records(path: &Path, delimiter: char) -> Result<Dataset, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = parse_records(BufReader::new(file), delimiter)?;
    log::info!(
        "Loaded {} records from {} ({} dropped)",
        dataset.len(),
        path.display(),
        dataset.dropped()
    );
    Ok(dataset)
}

pub fn parse_records<R: BufRead>(reader: R, delimiter: char) -> Result<Dataset, LoadError> {
    let mut records = Vec::new();
    let mut dropped = 0;

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|source| LoadError::Read {
            line: line_no,
            source,
        })?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_row(line, line_no, delimiter)? {
            Some(record) => records.push(record),
            None => {
                log::trace!("Dropping non-finite row at line {}", line_no);
                dropped += 1;
            }
        }
    }

    Ok(Dataset::new(records, dropped))
}

fn parse_row(line: &str, line_no: usize, delimiter: char) -> Result<Option<ParticleRecord>, LoadError> {
    let parts: Vec<&str> = line.split(delimiter).map(str::trim).collect();
    if parts.len() < 4 {
        return Err(LoadError::MissingColumns {
            line: line_no,
            found: parts.len(),
        });
    }

    let step: u64 = parse_field(parts[0], line_no, "step")?;
    let id: u64 = parse_field(parts[1], line_no, "id")?;
    let (Some(x), Some(y)) = (
        parse_coordinate(parts[2], line_no, "x")?,
        parse_coordinate(parts[3], line_no, "y")?,
    ) else {
        return Ok(None);
    };

    Ok(Some(ParticleRecord::new(step, id, x, y)))
}

fn parse_field<T: FromStr>(value: &str, line: usize, column: &'static str) -> Result<T, LoadError> {
    value.parse().map_err(|_| LoadError::NonNumeric {
        line,
        column,
        value: value.to_string(),
    })
}

/// `None` marks a missing coordinate.
fn parse_coordinate(value: &str, line: usize, column: &'static str) -> Result<Option<f64>, LoadError> {
    if value.is_empty() {
        return Ok(None);
    }
    let v: f64 = parse_field(value, line, column)?;
    Ok(v.is_finite().then_some(v))
}
