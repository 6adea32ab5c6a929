//! Plain CSV readers and writers
//!
//! Columns are located by header name and fields are split on `,`; quoting is
//! not supported. Undefined values are written as empty fields.

use std::io::{self, BufRead, Write};

use rtdelta_analysis::{
    config::AnalysisConfig, delta::DeltaRecord, descriptive::DescriptiveRow, trial::RawTrial,
};

const TRIAL_COLUMNS: [&str; 6] = [
    "participant_id",
    "difficulty",
    "stimulus_type",
    "signal",
    "accuracy",
    "rt",
];

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum TableError {
    #[display("I/O error: {_0}")]
    #[from]
    Io(io::Error),
    #[display("table is empty")]
    Empty,
    #[display("missing column '{name}'")]
    MissingColumn { name: &'static str },
    #[display("line {line}: invalid {column} value '{value}'")]
    InvalidField {
        line: usize,
        column: &'static str,
        value: String,
    },
}

/// Reads the per-trial input table.
///
/// Factor labels are kept as text; they are validated when the rows are
/// encoded.
pub fn read_raw_trials<R>(reader: R) -> Result<Vec<RawTrial>, TableError>
where
    R: BufRead,
{
    let mut lines = reader.lines();
    let header = lines.next().transpose()?.ok_or(TableError::Empty)?;
    let columns = header.split(',').map(str::trim).collect::<Vec<_>>();
    let mut index = [0; TRIAL_COLUMNS.len()];
    for (idx, name) in index.iter_mut().zip(TRIAL_COLUMNS) {
        *idx = columns
            .iter()
            .position(|c| *c == name)
            .ok_or(TableError::MissingColumn { name })?;
    }
    let [pid_idx, difficulty_idx, stimulus_idx, signal_idx, accuracy_idx, rt_idx] = index;

    let mut rows = vec![];
    for (line_no, line) in lines.enumerate() {
        let line_no = line_no + 2;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields = line.split(',').map(str::trim).collect::<Vec<_>>();
        let field = |idx: usize| fields.get(idx).copied().unwrap_or("");
        let invalid = |column, value: &str| TableError::InvalidField {
            line: line_no,
            column,
            value: value.to_owned(),
        };

        let participant_id = field(pid_idx)
            .parse()
            .map_err(|_| invalid("participant_id", field(pid_idx)))?;
        let accuracy = field(accuracy_idx)
            .parse()
            .map_err(|_| invalid("accuracy", field(accuracy_idx)))?;
        let rt = field(rt_idx)
            .parse()
            .map_err(|_| invalid("rt", field(rt_idx)))?;

        rows.push(RawTrial {
            participant_id,
            difficulty: field(difficulty_idx).to_owned(),
            stimulus_type: field(stimulus_idx).to_owned(),
            signal: field(signal_idx).to_owned(),
            accuracy,
            rt,
        });
    }
    Ok(rows)
}

fn fmt_field(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Writes delta records in long form, one row per percentile.
pub fn write_delta_records<W>(records: &[DeltaRecord], mut writer: W) -> io::Result<()>
where
    W: Write,
{
    writeln!(writer, "subject,comparison,percentile,value")?;
    for record in records {
        writeln!(
            writer,
            "{},{},{},{}",
            record.subject,
            record.comparison,
            record.percentile,
            fmt_field(record.value)
        )?;
    }
    Ok(())
}

pub fn write_descriptive_rows<W>(rows: &[DescriptiveRow], mut writer: W) -> io::Result<()>
where
    W: Write,
{
    writeln!(
        writer,
        "difficulty,stimulus_type,signal,n_trials,mean_rt,std_rt,median_rt,accuracy_mean"
    )?;
    for row in rows {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{}",
            row.difficulty,
            row.stimulus_type,
            row.signal,
            row.n_trials,
            row.mean_rt,
            fmt_field(row.std_rt),
            row.median_rt,
            row.accuracy_mean
        )?;
    }
    Ok(())
}

/// Header of a per-percentile table: `label` followed by `p10..p90`.
pub fn percentile_header(label: &str, config: &AnalysisConfig) -> String {
    let mut header = format!("{label:<24}");
    for i in 0..config.percentiles.len() {
        header.push_str(&format!(" {:>8}", config.column_name(i)));
    }
    header
}

#[cfg(test)]
mod tests {
    use rtdelta_analysis::{
        condition::Condition,
        delta::{Comparison, DeltaTrace, Subject},
        mode::AccuracyMode,
        quantile::QuantileVector,
    };

    use super::*;

    #[test]
    fn test_read_raw_trials_by_header() {
        let csv = "rt,participant_id,extra,difficulty,stimulus_type,signal,accuracy\n\
                   0.52,3,x,hard,simple,present,1\n\
                   \n\
                   0.61, 3 ,y,easy,complex,absent,0\n";
        let rows = read_raw_trials(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            RawTrial {
                participant_id: 3,
                difficulty: "hard".to_owned(),
                stimulus_type: "simple".to_owned(),
                signal: "present".to_owned(),
                accuracy: 1.0,
                rt: 0.52,
            }
        );
        assert_eq!(rows[1].stimulus_type, "complex");
        assert!(rows[1].accuracy.abs() < f64::EPSILON);
    }

    #[test]
    fn test_read_raw_trials_errors() {
        assert!(matches!(
            read_raw_trials("".as_bytes()),
            Err(TableError::Empty)
        ));
        assert!(matches!(
            read_raw_trials("participant_id,difficulty,stimulus_type,signal,accuracy\n".as_bytes()),
            Err(TableError::MissingColumn { name: "rt" })
        ));
        let csv = "participant_id,difficulty,stimulus_type,signal,accuracy,rt\n\
                   1,easy,simple,present,1,fast\n";
        let err = read_raw_trials(csv.as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "line 2: invalid rt value 'fast'");
    }

    #[test]
    fn test_read_errors_become_io_errors() {
        let bytes: &[u8] = &[0xff, 0xfe, b'\n'];
        let err = read_raw_trials(bytes).unwrap_err();
        assert!(matches!(&err, TableError::Io(e) if e.kind() == io::ErrorKind::InvalidData));
        assert!(err.to_string().starts_with("I/O error: "));
    }

    #[test]
    fn test_write_delta_records() {
        let from = Condition::ALL[0];
        let to = Condition::ALL[2];
        let trace = DeltaTrace {
            subject: Subject::Population,
            comparison: Comparison::Conditions {
                from,
                to,
                mode: AccuracyMode::Overall,
            },
            values: QuantileVector::new([Some(0.05), None, Some(0.1), None, None]),
        };
        let mut out = vec![];
        write_delta_records(&trace.records(&AnalysisConfig::default()), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "subject,comparison,percentile,value");
        assert_eq!(lines[1], "population,0->2/overall,10,0.05");
        assert_eq!(lines[2], "population,0->2/overall,30,");
        assert_eq!(lines.len(), 6);
    }
}
