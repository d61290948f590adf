mod common;

use std::fs::File;
use std::io::Write;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use soil_profile_collection::{load_collection, load_table, CollectionConfig, ColumnBindings, Value};

const HORIZONS_CSV: &str = "\
id,hzid,top,bottom,hzname,clay
P1,H1,0,10,A,15
P1,H2,10,25,Bt1,35
P2,H5,0,15,Ap,
";

const SITE_CSV: &str = "\
id,site_name
P2,Site Beta
P1,Site Alpha
";

#[test]
fn csv_cells_are_type_guessed() {
    common::init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("horizons.csv");
    std::fs::write(&path, HORIZONS_CSV).unwrap();

    let table = load_table(&path).unwrap();
    assert_eq!(table.num_rows(), 3);
    let clay: Vec<Value> = table.column("clay").unwrap().cloned().collect();
    assert_eq!(clay, vec![Value::Integer(15), Value::Integer(35), Value::Null]);
}

#[test]
fn csv_site_and_horizons_link_in_site_order() {
    common::init_logging();
    let dir = tempfile::tempdir().unwrap();
    let horizons = dir.path().join("horizons.csv");
    let site = dir.path().join("site.csv");
    std::fs::write(&horizons, HORIZONS_CSV).unwrap();
    std::fs::write(&site, SITE_CSV).unwrap();

    let config = CollectionConfig::new(ColumnBindings::default().with_designation("hzname"));
    let spc = load_collection(Some(site.as_path()), &horizons, &config).unwrap();
    assert_eq!(spc.profile_ids(), vec![&Value::from("P2"), &Value::from("P1")]);
    assert_eq!(spc.horizons().len(), 3);
}

#[test]
fn json_records_load() {
    common::init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("horizons.json");
    let mut file = File::create(&path).unwrap();
    write!(
        file,
        r#"[
            {{"id": "P1", "hzid": 1, "top": 0, "bottom": 10.5, "hzname": "A"}},
            {{"id": "P1", "hzid": 2, "top": 10.5, "bottom": 30, "hzname": null}}
        ]"#
    )
    .unwrap();

    let spc = load_collection(None, &path, &CollectionConfig::default()).unwrap();
    assert_eq!(spc.len(), 1);
    let horizons = spc.profile(0).unwrap().horizons();
    assert_eq!(horizons[1].top(), 10.5);
    assert!(horizons[1].attribute("hzname").is_null());
}

#[test]
fn parquet_scalar_columns_load() {
    common::init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("horizons.parquet");

    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("hzid", DataType::Utf8, false),
        Field::new("top", DataType::Float64, false),
        Field::new("bottom", DataType::Float64, false),
        Field::new("ph", DataType::Float64, true),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec!["P1", "P1"])),
        Arc::new(StringArray::from(vec!["H1", "H2"])),
        Arc::new(Float64Array::from(vec![0.0, 18.0])),
        Arc::new(Float64Array::from(vec![18.0, 30.0])),
        Arc::new(Float64Array::from(vec![Some(6.5), None])),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();
    let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let table = load_table(&path).unwrap();
    assert_eq!(table.columns().len(), 5);
    let ph: Vec<Value> = table.column("ph").unwrap().cloned().collect();
    assert_eq!(ph, vec![Value::Float(6.5), Value::Null]);

    let spc = load_collection(None, &path, &CollectionConfig::default()).unwrap();
    assert_eq!(spc.horizons().len(), 2);
}

#[test]
fn unknown_extension_and_bad_schema_are_reported() {
    common::init_logging();
    let dir = tempfile::tempdir().unwrap();
    let txt = dir.path().join("horizons.txt");
    std::fs::write(&txt, "whatever").unwrap();
    assert!(load_table(&txt).is_err());

    let csv = dir.path().join("no_depths.csv");
    std::fs::write(&csv, "id,hzid\nP1,H1\n").unwrap();
    let err = load_collection(None, &csv, &CollectionConfig::default()).unwrap_err();
    assert!(format!("{err:#}").contains("top"));
}
