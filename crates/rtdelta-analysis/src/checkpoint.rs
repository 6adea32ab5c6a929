//! CSV form of the quantile table
//!
//! The quantile table is the one artifact that outlives a run: it is written
//! once after aggregation and reloaded by later stages.
//!
//! ```text
//! pnum,condition,mode,p10,p30,p50,p70,p90
//! 1,0,overall,0.418,0.452,0.51,0.556,0.605
//! 1,0,error,,,,,
//! ```
//!
//! Undefined values are written as empty fields. The reader also accepts
//! `nan` (any case) as undefined. Percentile columns are located by header
//! name, so extra columns and column order do not matter.
//!
//! The reader rejects infinite values, rows whose defined values decrease
//! with the percentile, and repeated `(pnum, condition, mode)` keys.

use std::{
    collections::HashSet,
    io::{self, BufRead, Write},
};

use crate::{
    condition::Condition,
    config::{AnalysisConfig, NUM_PERCENTILES},
    mode::AccuracyMode,
    quantile::{QuantileSummary, QuantileTable, QuantileVector},
    trial::SchemaError,
};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum CheckpointError {
    #[display("I/O error: {_0}")]
    #[from]
    Io(io::Error),
    #[display("quantile table is empty")]
    Empty,
    #[display("missing column '{name}'")]
    MissingColumn { name: String },
    #[display("line {line}: invalid {column} value '{value}'")]
    InvalidNumber {
        line: usize,
        column: String,
        value: String,
    },
    #[display("line {line}: {source}")]
    Schema { line: usize, source: SchemaError },
    #[display("line {line}: percentile values decrease")]
    NonMonotonic { line: usize },
    #[display("line {line}: duplicate row for {participant_id},{condition},{mode}")]
    DuplicateRow {
        line: usize,
        participant_id: u32,
        condition: Condition,
        mode: AccuracyMode,
    },
}

/// Writes the table as CSV, one row per summary in key order.
pub fn write_quantile_table<W>(table: &QuantileTable, mut writer: W) -> io::Result<()>
where
    W: Write,
{
    let config = table.config();
    write!(writer, "pnum,condition,mode")?;
    for i in 0..NUM_PERCENTILES {
        write!(writer, ",{}", config.column_name(i))?;
    }
    writeln!(writer)?;

    for summary in table.iter() {
        write!(
            writer,
            "{},{},{}",
            summary.participant_id, summary.condition, summary.mode
        )?;
        for value in summary.quantiles.iter() {
            match value {
                Some(value) => write!(writer, ",{value}")?,
                None => write!(writer, ",")?,
            }
        }
        writeln!(writer)?;
    }
    writer.flush()
}

/// Reads a table written by [`write_quantile_table`].
///
/// The percentile columns named by `config` must all be present.
pub fn read_quantile_table<R>(
    reader: R,
    config: &AnalysisConfig,
) -> Result<QuantileTable, CheckpointError>
where
    R: BufRead,
{
    let mut lines = reader.lines();
    let header = lines.next().transpose()?.ok_or(CheckpointError::Empty)?;
    let columns = header.split(',').map(str::trim).collect::<Vec<_>>();
    let find_column = |name: &str| {
        columns
            .iter()
            .position(|c| *c == name)
            .ok_or_else(|| CheckpointError::MissingColumn {
                name: name.to_owned(),
            })
    };

    let pnum_idx = find_column("pnum")?;
    let condition_idx = find_column("condition")?;
    let mode_idx = find_column("mode")?;
    let mut percentile_idx = [0; NUM_PERCENTILES];
    for (i, idx) in percentile_idx.iter_mut().enumerate() {
        *idx = find_column(&config.column_name(i))?;
    }

    let mut summaries = vec![];
    let mut seen = HashSet::new();
    for (line_no, line) in lines.enumerate() {
        let line_no = line_no + 2;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields = line.split(',').map(str::trim).collect::<Vec<_>>();
        let field = |idx: usize| fields.get(idx).copied().unwrap_or("");
        let invalid = |column: &str, value: &str| CheckpointError::InvalidNumber {
            line: line_no,
            column: column.to_owned(),
            value: value.to_owned(),
        };
        let schema = |source| CheckpointError::Schema {
            line: line_no,
            source,
        };

        let participant_id = field(pnum_idx)
            .parse::<u32>()
            .map_err(|_| invalid("pnum", field(pnum_idx)))?;
        let code = field(condition_idx)
            .parse::<u8>()
            .map_err(|_| invalid("condition", field(condition_idx)))?;
        let condition = Condition::from_code(code).map_err(schema)?;
        let mode = field(mode_idx).parse::<AccuracyMode>().map_err(schema)?;

        let mut values = [None; NUM_PERCENTILES];
        for (i, (slot, &idx)) in values.iter_mut().zip(&percentile_idx).enumerate() {
            *slot = parse_value(field(idx))
                .ok_or_else(|| invalid(&config.column_name(i), field(idx)))?;
        }

        let quantiles = QuantileVector::new(values);
        if !quantiles.is_non_decreasing() {
            return Err(CheckpointError::NonMonotonic { line: line_no });
        }

        let summary = QuantileSummary {
            participant_id,
            condition,
            mode,
            sample_count: None,
            quantiles,
        };
        if !seen.insert(summary.key()) {
            return Err(CheckpointError::DuplicateRow {
                line: line_no,
                participant_id,
                condition,
                mode,
            });
        }
        summaries.push(summary);
    }

    log::debug!("read {} quantile summaries", summaries.len());
    Ok(QuantileTable::from_summaries(config, summaries))
}

/// `Some(None)` for an undefined value, `None` for a malformed or infinite one.
fn parse_value(field: &str) -> Option<Option<f64>> {
    if field.is_empty() {
        return Some(None);
    }
    let value = field.parse::<f64>().ok()?;
    if value.is_nan() {
        return Some(None);
    }
    value.is_finite().then_some(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantile::tests::trial;

    fn sample_table() -> QuantileTable {
        let rts = [0.40, 0.42, 0.45, 0.47, 0.50, 0.52, 0.55, 0.58, 0.60, 0.65];
        let mut trials = rts.map(|rt| trial(1, Condition::ALL[0], true, rt)).to_vec();
        trials.extend(rts.map(|rt| trial(2, Condition::ALL[3], rt > 0.5, rt + 0.1)));
        QuantileTable::from_trials(&trials, &AnalysisConfig::default())
    }

    #[test]
    fn test_write_layout() {
        let mut out = vec![];
        write_quantile_table(&sample_table(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines = text.lines().collect::<Vec<_>>();

        assert_eq!(lines[0], "pnum,condition,mode,p10,p30,p50,p70,p90");
        assert_eq!(lines.len(), 7);
        assert!(lines[1].starts_with("1,0,overall,"));
        assert_eq!(lines[3], "1,0,error,,,,,");
        assert!(lines[4].starts_with("2,3,overall,"));
    }

    #[test]
    fn test_reload_preserves_quantiles() {
        let table = sample_table();
        let mut out = vec![];
        write_quantile_table(&table, &mut out).unwrap();
        let reloaded = read_quantile_table(out.as_slice(), &AnalysisConfig::default()).unwrap();

        assert_eq!(reloaded.len(), table.len());
        for (a, b) in table.iter().zip(reloaded.iter()) {
            assert_eq!(a.key(), b.key());
            assert_eq!(a.quantiles, b.quantiles);
            assert_eq!(b.sample_count, None);
        }
    }

    #[test]
    fn test_reads_nan_and_reordered_columns() {
        let csv = "mode,pnum,condition,p90,p70,p50,p30,p10\n\
                   error,7,2,NaN,nan,,,\n\
                   \n\
                   overall,7,2,0.9,0.7,0.5,0.3,0.1\n";
        let table = read_quantile_table(csv.as_bytes(), &AnalysisConfig::default()).unwrap();
        let condition = Condition::ALL[2];
        assert!(table.quantiles(7, condition, AccuracyMode::Error).is_undefined());
        assert_eq!(
            table.quantiles(7, condition, AccuracyMode::Overall),
            QuantileVector::from_values([0.1, 0.3, 0.5, 0.7, 0.9])
        );
    }

    #[test]
    fn test_errors() {
        let config = AnalysisConfig::default();
        assert!(matches!(
            read_quantile_table("".as_bytes(), &config),
            Err(CheckpointError::Empty)
        ));
        assert!(matches!(
            read_quantile_table("pnum,condition,mode,p10\n".as_bytes(), &config),
            Err(CheckpointError::MissingColumn { name }) if name == "p30"
        ));

        let header = "pnum,condition,mode,p10,p30,p50,p70,p90\n";
        let bad_mode = format!("{header}1,0,correct,,,,,\n");
        assert!(matches!(
            read_quantile_table(bad_mode.as_bytes(), &config),
            Err(CheckpointError::Schema {
                line: 2,
                source: SchemaError::UnknownMode { .. }
            })
        ));
        let bad_condition = format!("{header}1,4,overall,,,,,\n");
        assert!(matches!(
            read_quantile_table(bad_condition.as_bytes(), &config),
            Err(CheckpointError::Schema {
                source: SchemaError::UnknownCondition { code: 4 },
                ..
            })
        ));
        let bad_number = format!("{header}1,0,overall,0.1,abc,,,\n");
        let err = read_quantile_table(bad_number.as_bytes(), &config).unwrap_err();
        assert_eq!(err.to_string(), "line 2: invalid p30 value 'abc'");
    }

    const HEADER: &str = "pnum,condition,mode,p10,p30,p50,p70,p90\n";

    #[test]
    fn test_rejects_infinite_values() {
        let config = AnalysisConfig::default();
        for (row, column, value) in [
            ("1,0,overall,0.1,0.2,inf,0.4,0.5", "p50", "inf"),
            ("1,0,overall,0.1,0.2,0.3,0.4,-inf", "p90", "-inf"),
            ("1,0,overall,-Infinity,0.2,0.3,0.4,0.5", "p10", "-Infinity"),
        ] {
            let csv = format!("{HEADER}{row}\n");
            let err = read_quantile_table(csv.as_bytes(), &config).unwrap_err();
            assert!(
                matches!(
                    &err,
                    CheckpointError::InvalidNumber { line: 2, column: c, value: v }
                        if c == column && v == value
                ),
                "{row}: {err}"
            );
        }
    }

    #[test]
    fn test_rejects_decreasing_values() {
        let config = AnalysisConfig::default();
        let csv = format!("{HEADER}1,0,overall,0.1,0.2,0.3,0.4,0.35\n");
        assert!(matches!(
            read_quantile_table(csv.as_bytes(), &config),
            Err(CheckpointError::NonMonotonic { line: 2 })
        ));

        // undefined gaps are skipped when checking the order
        let csv = format!("{HEADER}1,0,overall,0.1,,0.3,,0.3\n");
        let table = read_quantile_table(csv.as_bytes(), &config).unwrap();
        assert_eq!(
            table.quantiles(1, Condition::ALL[0], AccuracyMode::Overall),
            QuantileVector::new([Some(0.1), None, Some(0.3), None, Some(0.3)])
        );
    }

    #[test]
    fn test_rejects_duplicate_rows() {
        let config = AnalysisConfig::default();
        let csv = format!(
            "{HEADER}1,0,overall,0.1,0.2,0.3,0.4,0.5\n\
             1,0,error,,,,,\n\
             1,0,overall,,,,,\n"
        );
        let err = read_quantile_table(csv.as_bytes(), &config).unwrap_err();
        assert!(matches!(
            err,
            CheckpointError::DuplicateRow {
                line: 4,
                participant_id: 1,
                mode: AccuracyMode::Overall,
                ..
            }
        ));
        assert_eq!(err.to_string(), "line 4: duplicate row for 1,0,overall");
    }
}
