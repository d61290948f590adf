#![allow(dead_code)]

use soil_profile_collection::{CollectionConfig, ColumnBindings, ProfileCollection, Table, Value};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn texts(values: &[&str]) -> Vec<Value> {
    values.iter().map(|&s| Value::from(s)).collect()
}

fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().map(|&i| Value::Integer(i)).collect()
}

/// The three-profile demo dataset: P1 (4 horizons, 80 cm), P2 (3, 100 cm),
/// P3 (2, 20 cm).
pub fn horizon_table() -> Table {
    Table::from_columns(vec![
        ("id", texts(&["P1", "P1", "P1", "P1", "P2", "P2", "P2", "P3", "P3"])),
        ("hzid", texts(&["H1", "H2", "H3", "H4", "H5", "H6", "H7", "H8", "H9"])),
        ("top", ints(&[0, 10, 25, 50, 0, 15, 40, 0, 5])),
        ("bottom", ints(&[10, 25, 50, 80, 15, 40, 100, 5, 20])),
        ("hzname", texts(&["A", "Bt1", "Bt2", "C", "Ap", "Bw", "BC", "O", "R"])),
        ("clay", ints(&[15, 35, 40, 20, 20, 28, 25, 5, 2])),
        (
            "color",
            texts(&[
                "#A0522D", "#8B4513", "#8B4513", "#D2B48C", "#654321", "#A0522D", "#CD853F",
                "#000000", "#808080",
            ]),
        ),
    ])
    .expect("valid horizon table")
}

pub fn site_table() -> Table {
    Table::from_columns(vec![
        ("id", texts(&["P1", "P2", "P3"])),
        ("x", ints(&[100, 150, 120])),
        ("y", ints(&[200, 210, 190])),
        ("site_name", texts(&["Site Alpha", "Site Beta", "Site Gamma"])),
    ])
    .expect("valid site table")
}

pub fn config() -> CollectionConfig {
    CollectionConfig::new(ColumnBindings::new("id", "hzid", ("top", "bottom")).with_designation("hzname"))
        .with_crs("EPSG:4326")
        .with_metadata("project", "Demo")
        .with_metadata("location", "Test Area")
}

pub fn sample() -> ProfileCollection {
    init_logging();
    ProfileCollection::new(&site_table(), &horizon_table(), &config()).expect("valid collection")
}
