//! Decoding of delimited-text digit records.
//!
//! Supported format: one record per line, comma-separated, first field the
//! class label (an integer in `0..output_size`), followed by exactly
//! `input_size` raw pixel fields. Pixels are scaled via
//! `(raw / 0.99 * 255.0) + 0.01` and the label becomes a soft one-hot
//! target (`0.99` at the class index, `0.01` elsewhere).

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::Path;

/// One decoded training/evaluation record.
#[derive(Debug, Clone)]
pub struct Sample {
    pub input: Vec<f64>,
    pub target: Vec<f64>,
    pub label: usize,
}

#[derive(Debug)]
pub enum DatasetError {
    Io(io::Error),
    /// A record that could not be decoded; carries the 1-based line number.
    Parse { line: usize, message: String },
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::Io(e) => write!(f, "dataset I/O error: {}", e),
            DatasetError::Parse { line, message } => {
                write!(f, "dataset line {}: {}", line, message)
            }
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Io(e) => Some(e),
            DatasetError::Parse { .. } => None,
        }
    }
}

impl From<io::Error> for DatasetError {
    fn from(e: io::Error) -> Self {
        DatasetError::Io(e)
    }
}

/// Scales a raw pixel field into the network's input range.
pub fn scale_pixel(raw: f64) -> f64 {
    (raw / 0.99 * 255.0) + 0.01
}

/// Soft one-hot target: `0.99` at `label`, `0.01` everywhere else.
pub fn one_hot_target(label: usize, output_size: usize) -> Vec<f64> {
    let mut target = vec![0.01; output_size];
    target[label] = 0.99;
    target
}

/// Decodes one CSV line into a `Sample`.
pub fn decode_record(
    line: &str,
    line_no: usize,
    input_size: usize,
    output_size: usize,
) -> Result<Sample, DatasetError> {
    let fields: Vec<&str> = line.split(',').collect();

    if fields.len() != input_size + 1 {
        return Err(parse_error(
            line_no,
            format!(
                "expected {} fields (label + {} pixels), got {}",
                input_size + 1,
                input_size,
                fields.len()
            ),
        ));
    }

    let label: usize = fields[0].trim().parse().map_err(|_| {
        parse_error(line_no, format!("label '{}' is not a non-negative integer", fields[0]))
    })?;
    if label >= output_size {
        return Err(parse_error(
            line_no,
            format!("label {} out of range for {} classes", label, output_size),
        ));
    }

    let input = fields[1..]
        .iter()
        .map(|f| {
            f.trim()
                .parse::<f64>()
                .map(scale_pixel)
                .map_err(|_| parse_error(line_no, format!("pixel '{}' is not a number", f)))
        })
        .collect::<Result<Vec<f64>, DatasetError>>()?;

    Ok(Sample {
        input,
        target: one_hot_target(label, output_size),
        label,
    })
}

fn parse_error(line: usize, message: String) -> DatasetError {
    DatasetError::Parse { line, message }
}

/// Streams samples out of a CSV file one record at a time, so a full MNIST
/// epoch never holds the dataset in memory.
pub struct SampleReader {
    lines: Lines<BufReader<File>>,
    line_no: usize,
    input_size: usize,
    output_size: usize,
}

impl SampleReader {
    pub fn open(
        path: &Path,
        input_size: usize,
        output_size: usize,
    ) -> Result<SampleReader, DatasetError> {
        let file = File::open(path)?;
        Ok(SampleReader {
            lines: BufReader::new(file).lines(),
            line_no: 0,
            input_size,
            output_size,
        })
    }
}

impl Iterator for SampleReader {
    type Item = Result<Sample, DatasetError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(DatasetError::Io(e))),
            };
            self.line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            return Some(decode_record(
                trimmed,
                self.line_no,
                self.input_size,
                self.output_size,
            ));
        }
    }
}
