//! End-to-end run over a small on-disk hindcast layout.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use swe_core::error::HindcastError;
use swe_core::water_year::WaterYear;
use swe_hindcast::backfill::read_region_map;
use swe_hindcast::config::{HindcastPaths, InitOptions};
use swe_hindcast::evaluate::{assemble_evaluation, write_evaluation, EvaluationRow};
use swe_hindcast::initialize::initialize;

const HEADER: &str = "cell_id,Date,SWE,Long,Lat,elevation_m,WYWeek,northness,VIIRS_SCA,hasSnow";

const NORTH_OBS: &str = "\
c1,2021-10-02,5,-120.0,40.0,1900,1,0.2,10,True
c1,2021-10-09,6,-120.0,40.0,1900,2,0.2,20,True
c1,2021-10-16,7,-120.0,40.0,1900,3,0.2,30,True
";

const SOUTH_OBS: &str = "\
c2,2021-10-09,10,-119.0,36.0,2000,2,-0.1,40,True
c2,2021-10-16,12,-119.0,36.0,2000,3,-0.1,50,True
c3,2021-10-16,1,-119.5,37.0,2800,3,0.4,,False
";

fn write(path: &Path, body: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

/// Lays out inputs for water year 2022 under a single temp directory.
fn fixture(root: &Path) -> HindcastPaths {
    let paths = HindcastPaths::new(root.join("work"), root.join("data"), WaterYear(2022));

    write(
        &paths.submission_source(2022),
        "cell_id,2022-10-02,2022-10-09\nc1,1,2\nc2,3,4\n",
    );

    let obs = paths.observation_store();
    write(&obs.path_for("N_Sierras"), &format!("{HEADER}\n{NORTH_OBS}"));
    write(&obs.path_for("S_Sierras"), &format!("{HEADER}\n{SOUTH_OBS}"));

    let preds = paths.prediction_store();
    write(&preds.path_for("2021-10-02"), "cell_id,2021-10-02\nc1,1.0\nc2,2.0\n");
    write(&preds.path_for("2021-10-09"), "cell_id,2021-10-09\nc1,1.5\nc2,2.5\n");
    write(&preds.path_for("2021-10-16"), "cell_id,2021-10-16\nc1,2.0\nc3,0.5\n");

    write(
        &paths.region_map(),
        r#"{
  "N_Sierras": [{"cell_id":"c1","Long":-120.0,"Lat":40.0,"elevation_m":1900.0,"northness":0.2}],
  "S_Sierras": [{"cell_id":"c2","Long":-119.0,"Lat":36.0,"elevation_m":2000.0,"northness":-0.1}]
}"#,
    );

    let seed = paths.seed_prediction_store(chrono::NaiveDate::from_ymd_opt(2021, 9, 25).unwrap());
    write(&seed.path_for("N_Sierras"), "cell_id,Long,2021-09-25\nc1,-120,3\n");
    write(&seed.path_for("S_Sierras"), "cell_id,Long,2021-09-25\nc2,-119,4\n");

    paths
}

fn regions() -> Vec<String> {
    vec!["N_Sierras".to_string(), "S_Sierras".to_string()]
}

fn first_weeks() -> Vec<String> {
    ["2021-10-02", "2021-10-09", "2021-10-16"]
        .iter()
        .map(|d| d.to_string())
        .collect()
}

fn find<'a>(rows: &'a [EvaluationRow], cell_id: &str, date: &str) -> &'a EvaluationRow {
    rows.iter()
        .find(|r| r.cell_id == cell_id && r.date.to_string() == date)
        .unwrap_or_else(|| panic!("no row for {cell_id} on {date}"))
}

#[test]
fn initialize_seeds_submission_and_lists_dates() {
    let dir = tempfile::tempdir().unwrap();
    let paths = fixture(dir.path());
    let options = InitOptions {
        threshold: 0.9,
        regions: regions(),
        source_year: 2022,
        backfill: false,
    };

    let dates = initialize(&paths, &options).unwrap();
    assert_eq!(dates.first().map(String::as_str), Some("2021-10-02"));
    assert_eq!(dates.last().map(String::as_str), Some("2022-06-25"));
    assert_eq!(dates.len(), 39);

    let seeded = paths
        .submission_store()
        .read_frame("2021-09-25", "cell_id")
        .unwrap();
    assert_eq!(seeded.columns(), &["2021-10-02", "2022-10-09", "2022-10-01"]);
    assert_eq!(seeded.column_map("2021-10-02").unwrap()["c2"], 0.0);
    assert_eq!(seeded.column_map("2022-10-01").unwrap()["c1"], 0.0);
    assert_eq!(seeded.column_map("2022-10-09").unwrap()["c2"], 4.0);
}

#[test]
fn evaluation_merges_lagged_values() {
    let dir = tempfile::tempdir().unwrap();
    let paths = fixture(dir.path());
    let tables = assemble_evaluation(&first_weeks(), &regions(), &paths).unwrap();

    let north = &tables["N_Sierras"];
    let south = &tables["S_Sierras"];
    assert_eq!(north.len(), 3);
    assert_eq!(south.len(), 3);

    // first week: lag date precedes October 1
    let r = find(north, "c1", "2021-10-02");
    assert_eq!((r.y_test, r.y_pred, r.prev_swe, r.y_test_prev), (5.0, 1.0, 0.0, 0.0));

    let r = find(north, "c1", "2021-10-16");
    assert_eq!((r.y_test, r.y_pred, r.prev_swe, r.y_test_prev), (7.0, 2.0, 1.5, 6.0));
    assert_eq!(r.prev_swe_error, 4.5);

    // c2 not observed the week before
    let r = find(south, "c2", "2021-10-09");
    assert_eq!((r.y_test_prev, r.prev_swe, r.prev_swe_error), (0.0, 2.0, -2.0));

    // c2 missing from the 2021-10-16 predictions
    let r = find(south, "c2", "2021-10-16");
    assert_eq!((r.y_pred, r.prev_swe, r.y_test_prev), (0.0, 2.5, 10.0));

    let r = find(south, "c3", "2021-10-16");
    assert_eq!((r.y_pred, r.prev_swe, r.viirs_sca), (0.5, 0.0, 0.0));
    assert!(!r.has_snow);

    for row in north.iter().chain(south) {
        assert_eq!(row.prev_swe_error, row.y_test_prev - row.prev_swe);
        assert_eq!(row.y_pred_fsca, row.y_pred);
        assert!(first_weeks().contains(&row.date.to_string()));
    }
    assert!(north.iter().all(|r| r.region == "N_Sierras"));
}

#[test]
fn evaluation_keeps_lagged_values_per_region() {
    let dir = tempfile::tempdir().unwrap();
    let paths = fixture(dir.path());
    // c1 also listed under a second region with its own SWE history
    write(
        &paths.observation_store().path_for("Sierra_Crest"),
        &format!(
            "{HEADER}\n\
c1,2021-10-09,60,-120.0,40.0,1900,2,0.2,20,True
c1,2021-10-16,70,-120.0,40.0,1900,3,0.2,30,True
"
        ),
    );
    let regions = vec!["N_Sierras".to_string(), "Sierra_Crest".to_string()];
    let tables = assemble_evaluation(&first_weeks(), &regions, &paths).unwrap();

    assert_eq!(find(&tables["N_Sierras"], "c1", "2021-10-16").y_test_prev, 6.0);
    assert_eq!(find(&tables["Sierra_Crest"], "c1", "2021-10-16").y_test_prev, 60.0);
}

#[test]
fn evaluation_output_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let paths = fixture(dir.path());
    let out = paths.evaluation_store().path_for("S_Sierras");

    let tables = assemble_evaluation(&first_weeks(), &regions(), &paths).unwrap();
    write_evaluation(&paths, &tables).unwrap();
    let first = fs::read(&out).unwrap();

    let tables = assemble_evaluation(&first_weeks(), &regions(), &paths).unwrap();
    write_evaluation(&paths, &tables).unwrap();
    assert_eq!(first, fs::read(&out).unwrap());

    let text = String::from_utf8(first).unwrap();
    assert!(text.starts_with(
        "cell_id,Date,y_test,y_test_prev,y_pred,prev_SWE,Long,Lat,elevation_m,WYWeek,northness,VIIRS_SCA,hasSnow,Region,prev_SWE_error,y_pred_fSCA\n"
    ));
}

#[test]
fn evaluation_without_matches_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let paths = fixture(dir.path());
    let tables = assemble_evaluation(&[], &regions(), &paths).unwrap();
    assert!(tables["N_Sierras"].is_empty());
    assert!(tables["S_Sierras"].is_empty());
}

#[test]
fn evaluation_missing_prediction_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let paths = fixture(dir.path());
    let dates = vec!["2021-10-23".to_string()];
    let err = assemble_evaluation(&dates, &regions(), &paths).unwrap_err();
    assert!(matches!(err, HindcastError::MissingInput { .. }));
}

#[test]
fn evaluation_missing_region_fails() {
    let dir = tempfile::tempdir().unwrap();
    let paths = fixture(dir.path());
    let regions = vec!["Rockies".to_string()];
    let err = assemble_evaluation(&first_weeks(), &regions, &paths).unwrap_err();
    assert!(matches!(err, HindcastError::MissingInput { .. }));
}

#[test]
fn initialize_with_backfill_adds_unpredicted_sites() {
    let dir = tempfile::tempdir().unwrap();
    let paths = fixture(dir.path());
    let options = InitOptions {
        threshold: 0.9,
        regions: regions(),
        source_year: 2022,
        backfill: true,
    };
    initialize(&paths, &options).unwrap();

    let map = read_region_map(&paths.updated_region_map()).unwrap();
    let ids = |key: &str| -> HashSet<&str> { map[key].iter().map(|s| s.cell_id.as_str()).collect() };
    assert_eq!(ids("N_Sierras"), HashSet::from(["c1"]));
    assert_eq!(ids("S_Sierras"), HashSet::from(["c2", "c3"]));
    assert_eq!(ids("S_Sierras_High"), HashSet::from(["c3"]));
    assert_eq!(ids("S_Sierras_Low"), HashSet::from(["c2"]));

    // elevation split partitions S_Sierras
    assert!(map["S_Sierras_High"].iter().all(|s| s.elevation_m > 2500.0));
    assert!(map["S_Sierras_Low"].iter().all(|s| s.elevation_m <= 2500.0));
    let union: HashSet<&str> = ids("S_Sierras_High").union(&ids("S_Sierras_Low")).copied().collect();
    assert_eq!(union, ids("S_Sierras"));
    assert!(ids("S_Sierras_High").is_disjoint(&ids("S_Sierras_Low")));

    let seed = paths.seed_prediction_store(chrono::NaiveDate::from_ymd_opt(2021, 9, 25).unwrap());
    let south = seed.read_frame("S_Sierras", "cell_id").unwrap();
    assert_eq!(south.ids().collect::<Vec<_>>(), vec!["c2", "c3"]);
    assert_eq!(south.column_map("2021-09-25").unwrap()["c3"], 0.0);
    assert_eq!(south.column_map("WYWeek").unwrap()["c3"], 52.0);
    assert_eq!(south.column_map("Long").unwrap()["c3"], -119.5);
}
