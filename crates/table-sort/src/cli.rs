use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;

use crate::{
    normalize_missing, CaseFirst, ComparabilityGuard, Row, RowComparator, ShapeSelection,
    SortDirection, SortOptions,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ShapeArg {
    Auto,
    Scalar,
    Wrapped,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GuardArg {
    Truthy,
    Present,
}

#[derive(Parser, Debug)]
#[command(about = "Sort a JSON array of table rows by one column.")]
pub struct Args {
    /// JSON file holding an array of row objects (`-` or omitted reads stdin).
    input: Option<PathBuf>,

    /// Field to order by.
    #[arg(long)]
    key: String,

    /// Direction token. Only `asc` sorts ascending; anything else, or no token, sorts descending.
    #[arg(long)]
    direction: Option<String>,

    /// Layout of the field under `--key`.
    #[arg(long, value_enum)]
    shape: Option<ShapeArg>,

    /// Which value pairs take part in ordering.
    #[arg(long, value_enum)]
    guard: Option<GuardArg>,

    /// Compare digit runs inside strings by numeric value.
    #[arg(long)]
    numeric: bool,

    /// Sort uppercase before lowercase when strings differ only by case.
    #[arg(long)]
    upper_first: bool,

    /// JSON file with default sort options; flags above override it.
    #[arg(long, value_name = "PATH")]
    options: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Print the ordering as original row indices instead of the rows (rows are not filled).
    #[arg(long)]
    indices: bool,
}

#[derive(Debug, Serialize)]
struct JsonIndices<'a> {
    key: &'a str,
    direction: SortDirection,
    order: &'a [usize],
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    run_with_args(args)
}

pub fn run_with_args(args: Args) -> Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    run_with_writer(args, &mut handle)
}

/// Runs the command, writing the report to `out`. Nothing is written if sorting fails.
pub fn run_with_writer<W: Write>(args: Args, out: &mut W) -> Result<()> {
    let options = build_options(&args)?;
    let mut rows = read_rows(args.input.as_deref())?;

    let comparator = RowComparator::from_options(args.key.as_str(), &rows, &options);
    let order = comparator
        .sorted_indices(&rows)
        .with_context(|| format!("sort rows by `{}`", args.key))?;

    if args.indices {
        let report = JsonIndices {
            key: &args.key,
            direction: comparator.direction(),
            order: &order,
        };
        serde_json::to_writer(&mut *out, &report)?;
        out.write_all(b"\n")?;
        return Ok(());
    }

    normalize_missing(&mut rows, &args.key);
    let sorted: Vec<(usize, &Row)> = order.iter().map(|&i| (i, &rows[i])).collect();

    match args.format {
        OutputFormat::Json => {
            let rows: Vec<&Row> = sorted.iter().map(|(_, row)| *row).collect();
            serde_json::to_writer_pretty(&mut *out, &rows)?;
            out.write_all(b"\n")?;
        }
        OutputFormat::Text => {
            writeln!(
                out,
                "Sorted {} row(s) by `{}` ({} field, {})",
                sorted.len(),
                args.key,
                comparator.shape(),
                comparator.direction()
            )?;
            for (position, (original, row)) in sorted.iter().enumerate() {
                let value = row
                    .get(&args.key)
                    .map(|v| v.display_text().into_owned())
                    .unwrap_or_default();
                writeln!(out, "{:>4}  #{:<4} {value}", position + 1, original)?;
            }
        }
    }

    Ok(())
}

fn build_options(args: &Args) -> Result<SortOptions> {
    let mut options = match args.options.as_deref() {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("read options file {}", path.display()))?;
            serde_json::from_str::<SortOptions>(&raw)
                .with_context(|| format!("parse options file {}", path.display()))?
        }
        None => SortOptions::default(),
    };

    if let Some(token) = args.direction.as_deref() {
        options.direction = SortDirection::from_token(token);
    }
    if let Some(shape) = args.shape {
        options.shape = match shape {
            ShapeArg::Auto => ShapeSelection::Auto,
            ShapeArg::Scalar => ShapeSelection::Scalar,
            ShapeArg::Wrapped => ShapeSelection::Wrapped,
        };
    }
    if let Some(guard) = args.guard {
        options.guard = match guard {
            GuardArg::Truthy => ComparabilityGuard::Truthy,
            GuardArg::Present => ComparabilityGuard::Present,
        };
    }
    if args.numeric {
        options.collation.numeric = true;
    }
    if args.upper_first {
        options.collation.case_first = CaseFirst::Upper;
    }

    Ok(options)
}

fn read_rows(input: Option<&Path>) -> Result<Vec<Row>> {
    let raw = match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("read rows from {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("read rows from stdin")?;
            buf
        }
    };

    serde_json::from_str(&raw).context("parse rows (expected a JSON array of objects)")
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn flags_override_options_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        std::fs::write(
            &path,
            r#"{"direction": "asc", "guard": "present", "collation": {"numeric": false}}"#,
        )
        .unwrap();

        let args = Args::try_parse_from([
            "table-sort",
            "--key",
            "market",
            "--direction",
            "desc",
            "--numeric",
            "--options",
            path.to_str().unwrap(),
        ])
        .unwrap();
        let options = build_options(&args).unwrap();

        assert_eq!(options.direction, SortDirection::Descending);
        assert_eq!(options.guard, ComparabilityGuard::Present);
        assert!(options.collation.numeric);
        assert_eq!(options.shape, ShapeSelection::Auto);
    }

    #[test]
    fn missing_options_file_is_reported() {
        let args = Args::try_parse_from([
            "table-sort",
            "--key",
            "market",
            "--options",
            "/definitely/not/here.json",
        ])
        .unwrap();
        let err = build_options(&args).unwrap_err();
        assert!(err.to_string().contains("read options file"));
    }

    #[test]
    fn key_is_required() {
        assert!(Args::try_parse_from(["table-sort", "rows.json"]).is_err());
    }
}
