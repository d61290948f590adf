use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// (profile id, horizon id, top, bottom, designation, clay %, munsell hex)
const HORIZONS: &[(&str, &str, f64, f64, &str, i64, &str)] = &[
    ("P1", "H1", 0.0, 10.0, "A", 15, "#A0522D"),
    ("P1", "H2", 10.0, 25.0, "Bt1", 35, "#8B4513"),
    ("P1", "H3", 25.0, 50.0, "Bt2", 40, "#8B4513"),
    ("P1", "H4", 50.0, 80.0, "C", 20, "#D2B48C"),
    ("P2", "H5", 0.0, 15.0, "Ap", 20, "#654321"),
    ("P2", "H6", 15.0, 40.0, "Bw", 28, "#A0522D"),
    ("P2", "H7", 40.0, 100.0, "BC", 25, "#CD853F"),
    ("P3", "H8", 0.0, 5.0, "O", 5, "#000000"),
    ("P3", "H9", 5.0, 20.0, "R", 2, "#808080"),
];

/// (profile id, x, y, site name)
const SITES: &[(&str, i64, i64, &str)] = &[
    ("P1", 100, 200, "Site Alpha"),
    ("P2", 150, 210, "Site Beta"),
    ("P3", 120, 190, "Site Gamma"),
];

fn strings<T>(rows: &[T], f: impl Fn(&T) -> &str) -> ArrayRef {
    Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
}

fn horizon_batch() -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("hzid", DataType::Utf8, false),
        Field::new("top", DataType::Float64, false),
        Field::new("bottom", DataType::Float64, false),
        Field::new("hzname", DataType::Utf8, false),
        Field::new("clay", DataType::Int64, false),
        Field::new("color", DataType::Utf8, false),
    ]));
    let columns: Vec<ArrayRef> = vec![
        strings(HORIZONS, |h| h.0),
        strings(HORIZONS, |h| h.1),
        Arc::new(Float64Array::from(HORIZONS.iter().map(|h| h.2).collect::<Vec<_>>())),
        Arc::new(Float64Array::from(HORIZONS.iter().map(|h| h.3).collect::<Vec<_>>())),
        strings(HORIZONS, |h| h.4),
        Arc::new(Int64Array::from(HORIZONS.iter().map(|h| h.5).collect::<Vec<_>>())),
        strings(HORIZONS, |h| h.6),
    ];
    RecordBatch::try_new(schema, columns).context("building horizon batch")
}

fn site_batch() -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("x", DataType::Int64, false),
        Field::new("y", DataType::Int64, false),
        Field::new("site_name", DataType::Utf8, false),
    ]));
    let columns: Vec<ArrayRef> = vec![
        strings(SITES, |s| s.0),
        Arc::new(Int64Array::from(SITES.iter().map(|s| s.1).collect::<Vec<_>>())),
        Arc::new(Int64Array::from(SITES.iter().map(|s| s.2).collect::<Vec<_>>())),
        strings(SITES, |s| s.3),
    ];
    RecordBatch::try_new(schema, columns).context("building site batch")
}

fn write_parquet(path: &Path, batch: &RecordBatch) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(batch)?;
    writer.close()?;
    log::info!("Wrote {} rows to {}", batch.num_rows(), path.display());
    Ok(())
}

fn write_csv(path: &Path, header: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(header)?;
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    log::info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    write_parquet(Path::new("sample_horizons.parquet"), &horizon_batch()?)?;
    write_parquet(Path::new("sample_site.parquet"), &site_batch()?)?;

    write_csv(
        Path::new("sample_horizons.csv"),
        &["id", "hzid", "top", "bottom", "hzname", "clay", "color"],
        HORIZONS
            .iter()
            .map(|h| {
                vec![
                    h.0.to_string(),
                    h.1.to_string(),
                    h.2.to_string(),
                    h.3.to_string(),
                    h.4.to_string(),
                    h.5.to_string(),
                    h.6.to_string(),
                ]
            })
            .collect(),
    )?;
    write_csv(
        Path::new("sample_site.csv"),
        &["id", "x", "y", "site_name"],
        SITES
            .iter()
            .map(|s| vec![s.0.to_string(), s.1.to_string(), s.2.to_string(), s.3.to_string()])
            .collect(),
    )?;

    println!(
        "Wrote {} horizons across {} profiles to sample_horizons/sample_site (.parquet, .csv)",
        HORIZONS.len(),
        SITES.len()
    );
    Ok(())
}
