//! Labelled examples read from delimited text.
//!
//! Each record is `label,x0,x1,...`: the label is a class index that becomes
//! a one-hot expected vector, the remaining fields form the input vector.

use crate::prelude::*;
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// One training or test pair.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Example {
    pub input: Vec<f64>,
    pub expected: Vec<f64>,
}

impl Example {
    pub fn new(input: Vec<f64>, expected: Vec<f64>) -> Self {
        Self { input, expected }
    }

    /// Example whose expected vector is one-hot at `label`.
    pub fn labelled(input: Vec<f64>, label: usize, classes: usize) -> Result<Self> {
        Ok(Self::new(input, one_hot(label, classes)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoaderOptions {
    pub delimiter: u8,
    /// Rescale every input value from `(lb, ub)` onto `[0, 1]`.
    pub scale: Option<(f64, f64)>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            scale: None,
        }
    }
}

pub fn one_hot(label: usize, classes: usize) -> Result<Vec<f64>> {
    if label >= classes {
        return Err(NNError::DatasetError(format!(
            "label {} is out of range for {} classes",
            label, classes
        )));
    }
    let mut expected = vec![0.0; classes];
    expected[label] = 1.0;
    Ok(expected)
}

pub fn load_examples<P: AsRef<Path>>(path: P, classes: usize) -> Result<Vec<Example>> {
    load_examples_with(path, classes, LoaderOptions::default())
}

pub fn load_examples_with<P: AsRef<Path>>(
    path: P,
    classes: usize,
    options: LoaderOptions,
) -> Result<Vec<Example>> {
    let file = std::fs::File::open(&path)?;
    let examples = read_examples(file, classes, options)?;
    debug!(
        "Loaded {} examples from {}",
        examples.len(),
        path.as_ref().display()
    );
    Ok(examples)
}

pub fn read_examples<R: Read>(
    reader: R,
    classes: usize,
    options: LoaderOptions,
) -> Result<Vec<Example>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(options.delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut examples = vec![];
    for (line, record) in rdr.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                if let csv::ErrorKind::UnequalLengths {
                    expected_len, len, ..
                } = e.kind()
                {
                    return Err(NNError::DatasetError(format!(
                        "record {}: expected {} fields, found {}",
                        line + 1,
                        expected_len,
                        len
                    )));
                }
                return Err(e.into());
            }
        };
        let example = parse_record(&record, classes, &options)
            .map_err(|msg| NNError::DatasetError(format!("record {}: {}", line + 1, msg)))?;
        examples.push(example);
    }
    Ok(examples)
}

fn parse_record(
    record: &StringRecord,
    classes: usize,
    options: &LoaderOptions,
) -> std::result::Result<Example, String> {
    let mut fields = record.iter();
    let label = fields.next().ok_or("empty record")?;
    let label: usize = label
        .parse()
        .map_err(|_| format!("label {:?} is not a class index", label))?;

    let mut input = fields
        .map(|f| {
            f.parse::<f64>()
                .map_err(|_| format!("value {:?} is not a number", f))
        })
        .collect::<std::result::Result<Vec<f64>, String>>()?;
    if input.is_empty() {
        return Err("record has a label but no input values".to_string());
    }
    if let Some((lb, ub)) = options.scale {
        input.to_unity(lb, ub);
    }

    let expected = one_hot(label, classes).map_err(|e| e.to_string())?;
    Ok(Example::new(input, expected))
}
