use anyhow::Result;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes `(x, y)` points as a two-column CSV with the given header.
pub fn write_series<W: Write>(
    writer: W,
    x_label: &str,
    y_label: &str,
    points: impl IntoIterator<Item = (f64, f64)>,
) -> Result<usize> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record([x_label, y_label])?;

    let mut rows = 0;
    for (x, y) in points {
        writer.serialize((x, y))?;
        rows += 1;
    }

    writer.flush()?;
    Ok(rows)
}

/// Writes serializable records, one per row; the header comes from the
/// record's field names.
pub fn write_records<W: Write, T: Serialize>(
    writer: W,
    records: impl IntoIterator<Item = T>,
) -> Result<usize> {
    let mut writer = csv::Writer::from_writer(writer);

    let mut rows = 0;
    for record in records {
        writer.serialize(record)?;
        rows += 1;
    }

    writer.flush()?;
    Ok(rows)
}

fn create_output_file(path: &Path) -> Result<File> {
    let dir = path.parent().unwrap_or(Path::new("."));

    // Create directory if it doesn't exist
    if !dir.as_os_str().is_empty() {
        std::fs::create_dir_all(dir)?;
    }

    log::info!("Writing results to {}", path.display());
    Ok(File::create(path)?)
}

pub fn write_series_csv(
    path: &Path,
    x_label: &str,
    y_label: &str,
    points: impl IntoIterator<Item = (f64, f64)>,
) -> Result<usize> {
    write_series(create_output_file(path)?, x_label, y_label, points)
}

pub fn write_records_csv<T: Serialize>(
    path: &Path,
    records: impl IntoIterator<Item = T>,
) -> Result<usize> {
    write_records(create_output_file(path)?, records)
}
