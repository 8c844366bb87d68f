//! Row enrichment - one converted column added to every row
//!
//! The enricher is a straight fold over the input rows. The first row whose
//! rate cannot be resolved aborts the run and nothing is written; the output
//! file is only created once every row has been converted.

use crate::config::EnrichConfig;
use crate::error::{FxEnrichError, Result};
use crate::rates::{RateResolver, RateSource, ResolverStats};
use csv::{ReaderBuilder, WriterBuilder};
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Positional layout of the exports
///
/// Rows are numbered from 1 in errors; the header is row 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    /// Column holding the `DD.MM.YYYY HH:MM:SS` timestamp
    pub timestamp: usize,
    /// Column holding the amount in the native currency
    pub amount: usize,
    /// Index the converted value is inserted at
    pub insert_at: usize,
    /// Header label of the inserted column
    pub label: String,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            timestamp: 0,
            amount: 3,
            insert_at: 5,
            label: "EUR".to_string(),
        }
    }
}

impl ColumnLayout {
    /// Reject layouts where an insertion could move the inputs or the label is empty
    pub fn validate(&self) -> Result<()> {
        if self.timestamp == self.amount {
            return Err(FxEnrichError::Config(format!(
                "timestamp and amount share column {}",
                self.amount
            )));
        }
        // Both inputs must sit before the insertion point so it never shifts them
        if self.timestamp >= self.insert_at || self.amount >= self.insert_at {
            return Err(FxEnrichError::Config(format!(
                "timestamp ({}) and amount ({}) columns must come before insert column {}",
                self.timestamp, self.amount, self.insert_at
            )));
        }
        if self.label.is_empty() {
            return Err(FxEnrichError::Config("column label must not be empty".to_string()));
        }
        Ok(())
    }

    /// Fields a record needs so that insertion lands exactly at `insert_at`
    pub fn min_fields(&self) -> usize {
        self.insert_at
    }

    fn check_len(&self, row: usize, len: usize) -> Result<()> {
        if len < self.min_fields() {
            return Err(FxEnrichError::MissingField {
                row,
                index: self.min_fields() - 1,
                len,
            });
        }
        Ok(())
    }
}

/// Enriched header and rows, held in memory until written
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl OutputTable {
    /// Number of data rows, header excluded
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write header then rows to any sink
    pub fn write_to<W: io::Write>(&self, sink: W, delimiter: u8) -> Result<()> {
        let mut writer = WriterBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_writer(sink);

        writer.write_record(&self.header)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write the table to `path` in one step
    ///
    /// Rows go to a temporary file in the destination directory that is
    /// renamed over `path` once flushed. A failed write leaves nothing behind.
    pub fn write_csv(&self, path: &Path, delimiter: u8) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        self.write_to(io::BufWriter::new(tmp.as_file_mut()), delimiter)?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Render an inserted value the way Python's `repr(float)` does
///
/// Shortest round-trip digits, always with a fractional part (`50.0`), and
/// scientific notation with a signed two-digit exponent outside
/// `1e-4 <= |v| < 1e16` (`2.5e-05`, `1e+16`).
///
/// # Example
/// ```
/// use fx_enrich::enrich::format_value;
///
/// assert_eq!(format_value(50.0), "50.0");
/// assert_eq!(format_value(0.000025), "2.5e-05");
/// assert_eq!(format_value(1e16), "1e+16");
/// ```
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // `{:e}` gives the shortest round-trip mantissa, e.g. "2.5e-5"
    let sci = format!("{:e}", value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((mantissa, exp)) => (mantissa, exp.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if (-4..16).contains(&exp) {
        let plain = value.to_string();
        if plain.contains('.') {
            plain
        } else {
            plain + ".0"
        }
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exp.abs())
    }
}

fn parse_amount(row: usize, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| FxEnrichError::AmountParse {
            row,
            value: raw.to_string(),
        })
}

/// Applies a `ColumnLayout` to a header and its rows
#[derive(Debug, Clone)]
pub struct Enricher {
    layout: ColumnLayout,
}

impl Enricher {
    /// Create an enricher for a validated layout
    pub fn new(layout: ColumnLayout) -> Result<Self> {
        layout.validate()?;
        Ok(Self { layout })
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// Header with the column label inserted; other labels keep their order
    pub fn enrich_header(&self, header: &[String]) -> Result<Vec<String>> {
        self.layout.check_len(0, header.len())?;
        let mut header = header.to_vec();
        header.insert(self.layout.insert_at, self.layout.label.clone());
        Ok(header)
    }

    /// Convert one data row; resolution failures come back as `Aborted`
    ///
    /// The row length is checked before the resolver is consulted, and the
    /// amount is parsed only after a rate was found.
    pub fn enrich_row<S: RateSource>(
        &self,
        resolver: &mut RateResolver<S>,
        row_num: usize,
        mut row: Vec<String>,
    ) -> Result<Vec<String>> {
        self.layout.check_len(row_num, row.len())?;

        let rate = match resolver.resolve(&row[self.layout.timestamp]) {
            Ok(rate) => rate,
            Err(e) => {
                return Err(FxEnrichError::Aborted {
                    row: row_num,
                    source: Box::new(e),
                })
            }
        };

        let amount = parse_amount(row_num, &row[self.layout.amount])?;
        row.insert(self.layout.insert_at, format_value(amount * rate));
        Ok(row)
    }

    /// Fold over records, stopping at the first failure
    ///
    /// Data rows are numbered from 1 in the order they arrive.
    pub fn enrich_records<S, I>(
        &self,
        resolver: &mut RateResolver<S>,
        header: &[String],
        records: I,
    ) -> Result<OutputTable>
    where
        S: RateSource,
        I: IntoIterator<Item = Result<Vec<String>>>,
    {
        let header = self.enrich_header(header)?;
        let mut rows = Vec::new();

        for (idx, record) in records.into_iter().enumerate() {
            let row = self.enrich_row(resolver, idx + 1, record?)?;
            rows.push(row);
        }

        Ok(OutputTable { header, rows })
    }

    /// Enrich rows already in memory
    pub fn enrich<S: RateSource>(
        &self,
        resolver: &mut RateResolver<S>,
        header: &[String],
        rows: &[Vec<String>],
    ) -> Result<OutputTable> {
        self.enrich_records(resolver, header, rows.iter().cloned().map(Ok))
    }

    /// Stream a delimited source through the enricher
    pub fn enrich_reader<S: RateSource, R: io::Read>(
        &self,
        resolver: &mut RateResolver<S>,
        source: R,
        delimiter: u8,
    ) -> Result<OutputTable> {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(source);

        let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let records = reader.into_records().map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect::<Vec<String>>())
                .map_err(FxEnrichError::from)
        });

        self.enrich_records(resolver, &header, records)
    }
}

/// Output file next to the input: `<dir>/<prefix><file name>`
pub fn output_path_for(input: &Path, prefix: &str) -> Result<PathBuf> {
    let name = input.file_name().ok_or_else(|| {
        FxEnrichError::InvalidInput(format!("{} does not name a file", input.display()))
    })?;

    let mut output_name = OsString::from(prefix);
    output_name.push(name);
    Ok(input.with_file_name(output_name))
}

/// Outcome of a successful `enrich_file` run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Path of the written file
    pub output: PathBuf,
    /// Data rows written
    pub rows: usize,
    pub stats: ResolverStats,
}

/// Read `input`, enrich every row, then write the sibling output file
pub fn enrich_file<S: RateSource>(
    input: &Path,
    config: &EnrichConfig,
    resolver: &mut RateResolver<S>,
) -> Result<RunSummary> {
    let enricher = Enricher::new(config.layout())?;
    let output = output_path_for(input, &config.output_prefix)?;

    let table = {
        let file = std::fs::File::open(input)?;
        enricher.enrich_reader(resolver, io::BufReader::new(file), config.delimiter_byte())?
    };

    table.write_csv(&output, config.delimiter_byte())?;
    let stats = resolver.stats();
    log::info!(
        "Wrote {} rows to {} ({} lookups, {} cache hits)",
        table.len(),
        output.display(),
        stats.lookups,
        stats.hits
    );

    Ok(RunSummary {
        output,
        rows: table.len(),
        stats,
    })
}
