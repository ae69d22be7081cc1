use std::fs;

use gin_bench::config::SoakConfig;
use gin_bench::soak::SoakRunner;
use serde_json::Value;
use tempfile::tempdir;

fn load_config(output_dir: &std::path::Path, count: usize) -> SoakConfig {
    let yaml = format!(
        r#"
run_id: "test_smoke"
deals:
  seed: 4242
  count: {count}
play:
  take_face_up_percent: 40
  max_turns: 80
outputs:
  jsonl: "{jsonl}"
logging:
  enable_structured: false
"#,
        jsonl = output_dir.join("deals.jsonl").display(),
    );

    let mut cfg: SoakConfig = serde_yaml::from_str(&yaml).expect("valid yaml");
    cfg.validate().expect("config validates");
    cfg
}

#[test]
fn soak_smoke_run_has_no_violations() {
    let dir = tempdir().expect("temp dir");
    let config = load_config(dir.path(), 40);
    let outputs = config.resolved_outputs();

    let summary = SoakRunner::new(config, outputs).run().expect("soak completes");
    assert_eq!(summary.deals_played, 40);
    assert_eq!(summary.violations, 0);
    assert_eq!(summary.gins + summary.walls + summary.turn_caps, 40);
    assert!(summary.events_checked > 40);

    let contents = fs::read_to_string(&summary.jsonl_path).expect("read jsonl");
    let rows: Vec<Value> = contents
        .lines()
        .map(|line| serde_json::from_str(line).expect("row parses"))
        .collect();
    assert_eq!(rows.len(), 40);

    for (index, row) in rows.iter().enumerate() {
        assert_eq!(row["run_id"], "test_smoke");
        assert_eq!(row["deal_index"], index);
        assert_eq!(row["violations"], 0);
        let outcome = row["outcome"].as_str().expect("outcome string");
        assert!(["gin", "wall", "turn_cap"].contains(&outcome));
        assert_eq!(row["gin_player"].is_null(), outcome != "gin");
    }
}

#[test]
fn nested_output_directories_are_created() {
    let dir = tempdir().expect("temp dir");
    let nested = dir.path().join("a").join("b");
    let config = load_config(&nested, 2);
    let outputs = config.resolved_outputs();

    let summary = SoakRunner::new(config, outputs).run().expect("soak completes");
    assert!(summary.jsonl_path.starts_with(&nested));
    assert!(summary.jsonl_path.exists());
}
