use std::{
    fs::File,
    io::{self, BufReader, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use rtdelta_analysis::{
    checkpoint,
    config::AnalysisConfig,
    quantile::QuantileTable,
    trial::{self, Trial},
};

use crate::tabular;

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, &value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }

    /// Runs a CSV writer against this output and attaches the path to any error.
    pub fn write_csv<F>(&mut self, write: F) -> anyhow::Result<()>
    where
        F: FnOnce(&mut Self) -> io::Result<()>,
    {
        write(self).with_context(|| format!("Failed to write CSV to {}", self.display_path()))?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

fn open_file(file_kind: &str, path: &Path) -> anyhow::Result<BufReader<File>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;
    Ok(BufReader::new(file))
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let reader = open_file(file_kind, path)?;
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Read and encode the per-trial input table
///
/// Fails on the first row with an unknown factor label or an invalid
/// accuracy/RT value.
pub fn read_trials_file<P>(path: P) -> anyhow::Result<Vec<Trial>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let reader = open_file("trials", path)?;
    let raw_trials = tabular::read_raw_trials(reader)
        .with_context(|| format!("Failed to parse trials CSV file: {}", path.display()))?;
    let trials = trial::encode_trials(&raw_trials)
        .with_context(|| format!("Invalid trial in {}", path.display()))?;
    log::info!("Loaded {} trials from {}", trials.len(), path.display());
    Ok(trials)
}

/// Read a quantile table checkpoint written by the `quantiles` command
pub fn read_checkpoint_file<P>(path: P, config: &AnalysisConfig) -> anyhow::Result<QuantileTable>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let reader = open_file("quantile table", path)?;
    let table = checkpoint::read_quantile_table(reader, config)
        .with_context(|| format!("Failed to parse quantile table: {}", path.display()))?;
    log::info!(
        "Loaded {} quantile summaries for {} participants from {}",
        table.len(),
        table.participants().len(),
        path.display()
    );
    Ok(table)
}

/// Formats an optional value for tables, `N/A` when undefined.
pub fn fmt_value(value: Option<f64>) -> String {
    value.map_or("N/A".to_string(), |v| format!("{v:.3}"))
}
