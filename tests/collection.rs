mod common;

use std::collections::BTreeSet;

use soil_profile_collection::{
    AggregationPolicy, Axis, ColorSpec, DepthInterval, DepthMode, Depths, Error, ErrorKind,
    FilterState, GlomOptions, ProfileCollection, SketchOptions, Table, Value,
};

#[test]
fn construction_exposes_ids_site_and_metadata() {
    let spc = common::sample();
    assert_eq!(spc.len(), 3);
    assert_eq!(
        spc.profile_ids(),
        vec![&Value::from("P1"), &Value::from("P2"), &Value::from("P3")]
    );
    assert_eq!(spc.crs(), Some("EPSG:4326"));
    assert_eq!(spc.metadata()["project"], "Demo");
    assert!(spc.sites().column_names.contains(&"site_name".to_string()));
    assert_eq!(spc.thickness()[0], 10.0);
    assert_eq!(spc.get_profile(&Value::from("P1")).unwrap().horizons().len(), 4);
    assert_eq!(
        spc.to_string(),
        "ProfileCollection with 3 profiles and 9 horizons (crs EPSG:4326)"
    );
}

#[test]
fn duplicate_horizon_id_across_profiles_is_a_consistency_error() {
    let mut rows: Vec<Vec<Value>> = common::horizon_table().rows().map(|r| r.to_vec()).collect();
    // H5 (first horizon of P2) reuses P1's H1
    rows[4][1] = Value::from("H1");
    let mut table = Table::new(common::horizon_table().columns().to_vec()).unwrap();
    for row in rows {
        table.push_row(row).unwrap();
    }
    let err = ProfileCollection::new(&common::site_table(), &table, &common::config()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Consistency);
    assert!(err.to_string().contains("H1"));
}

#[test]
fn non_numeric_depths_are_a_schema_error() {
    let table = Table::from_columns(vec![
        ("id", vec![Value::from("P1")]),
        ("hzid", vec![Value::from("H1")]),
        ("top", vec![Value::from("surface")]),
        ("bottom", vec![Value::Integer(10)]),
        ("hzname", vec![Value::from("A")]),
    ])
    .unwrap();
    let site = Table::from_columns(vec![("id", vec![Value::from("P1")])]).unwrap();
    let err = ProfileCollection::new(&site, &table, &common::config()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
}

#[test]
fn subsetting_like_the_data_frame_api() {
    let spc = common::sample();

    let first = spc.select(0).unwrap();
    assert_eq!(first.profile_ids(), vec![&Value::from("P1")]);

    let by_id = spc.select_ids(&[Value::from("P1"), Value::from("P3")]).unwrap();
    assert_eq!(by_id.profile_ids(), vec![&Value::from("P1"), &Value::from("P3")]);

    let sliced = spc.select(1..3).unwrap();
    assert_eq!(sliced.profile_ids(), vec![&Value::from("P2"), &Value::from("P3")]);

    let masked = spc
        .select_where(|s| {
            s.attribute("site_name")
                .as_str()
                .is_some_and(|n| n.contains("Beta") || n.contains("Gamma"))
        })
        .unwrap();
    assert_eq!(masked.profile_ids(), vec![&Value::from("P2"), &Value::from("P3")]);

    let mut filters = FilterState::new();
    filters.insert("x".into(), BTreeSet::from([Value::Integer(100)]));
    let filtered = spc.select_filtered(&filters).unwrap();
    assert_eq!(filtered.profile_ids(), vec![&Value::from("P1")]);
    assert_eq!(filtered.horizons().len(), 4);
}

#[test]
fn out_of_range_profile_position_names_the_axis() {
    let spc = common::sample();
    match spc.select(vec![0, 3]) {
        Err(Error::Index { axis, position, len }) => {
            assert_eq!(axis, Axis::Profile);
            assert_eq!(position, 3);
            assert_eq!(len, 3);
        }
        other => panic!("expected index error, got {other:?}"),
    }
}

#[test]
fn single_profile_then_first_two_horizons() {
    let spc = common::sample();
    for p in 0..spc.len() {
        let original = spc.profile(p).unwrap().horizons().len();
        let one = spc.select(p).unwrap();
        let cut = one.index(.., 0..2).unwrap();
        assert_eq!(cut.horizons().len(), original.min(2));
    }
}

#[test]
fn derived_collections_leave_the_source_untouched() {
    let spc = common::sample();
    let before = spc.horizons().clone();
    let _ = spc.index(0..2, 1).unwrap();
    let _ = spc.glom(&GlomOptions::new([0.0, 15.0, 30.0])).unwrap();
    assert_eq!(spc.horizons(), &before);
}

#[test]
fn profile_apply_mean_clay() {
    let spc = common::sample();
    let means = spc.profile_apply(|p| {
        let clay: Vec<f64> = p
            .horizons()
            .iter()
            .filter_map(|h| h.attribute("clay").as_f64())
            .collect();
        clay.iter().sum::<f64>() / clay.len() as f64
    });
    assert_eq!(means[0].0, Value::from("P1"));
    assert!((means[0].1 - 27.5).abs() < 1e-9);
    assert!((means[1].1 - 24.333333333333332).abs() < 1e-9);
}

#[test]
fn depths_per_profile_and_minmax_agree() {
    let spc = common::sample();
    let per_profile = match spc.depths(DepthMode::PerProfile) {
        Depths::PerProfile(rows) => rows,
        other => panic!("unexpected {other:?}"),
    };
    assert_eq!(per_profile[0].range, Some(DepthInterval::new(0.0, 80.0)));
    assert_eq!(per_profile[2].range, Some(DepthInterval::new(0.0, 20.0)));
    assert_eq!(
        spc.depths(DepthMode::MinMax).minmax(),
        Some(DepthInterval::new(0.0, 100.0))
    );
}

#[test]
fn glom_dominant_on_standard_intervals() {
    let spc = common::sample();
    let options = GlomOptions::new([0.0, 15.0, 30.0, 60.0, 100.0])
        .policy(AggregationPolicy::Dominant)
        .variables(["hzname", "clay"]);
    let out = spc.glom(&options).unwrap();

    let p1: Vec<_> = out.profile(0).unwrap().horizons().to_vec();
    assert_eq!(p1.len(), 4);
    assert_eq!(p1[0].attribute("hzname"), &Value::from("A"));
    assert_eq!(p1[0].attribute("clay"), &Value::Integer(15));
    // [60, 100) is only reached by C (50-80)
    assert_eq!(p1[3].attribute("hzname"), &Value::from("C"));
    assert_eq!(p1[3].interval, DepthInterval::new(60.0, 100.0));

    // P3 ends at 20: only the first two targets have data
    let p3 = out.profile(2).unwrap().horizons();
    assert_eq!(p3.len(), 2);
    assert_eq!(p3[1].attribute("hzname"), &Value::from("R"));

    // site table is carried over unchanged
    assert_eq!(out.sites(), spc.sites());
}

#[test]
fn glom_then_sketch() {
    let spc = common::sample();
    let out = spc.glom(&GlomOptions::new([0.0, 25.0, 50.0])).unwrap();
    let columns = out
        .sketch(&SketchOptions::new(ColorSpec::Column("color".into())))
        .unwrap();
    assert_eq!(columns.len(), 3);
    assert_eq!(columns[0].horizons.len(), 2);
    assert_eq!(columns[0].horizons[0].label.as_deref(), Some("Bt1"));
}
