use std::fs;
use std::io::Cursor;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use temp_dir::TempDir;

use cookdex::config::{ArtifactConfig, ClusterConfig};
use cookdex::jobs;
use cookdex_clusters::BuildOutput;
use cookdex_cookability::Assessor;
use cookdex_lexicon::Classifier;
use cookdex_ontology::OntologyEntry;

async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .unwrap();
    cookdex_db::migrate(&pool).await.unwrap();
    pool
}

fn write_corpus(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("recipes.jsonl");
    let mut lines = Vec::new();
    for _ in 0..500 {
        lines.push(r#"{"ingredients": ["garlic, minced", "onion"]}"#);
    }
    for _ in 0..50 {
        lines.push(r#"{"ingredients": ["minced garlic"]}"#);
    }
    lines.push("not json");
    fs::write(&path, lines.join("\n")).unwrap();
    path
}

#[test]
fn test_cluster_build_writes_readable_artifact() {
    let dir = TempDir::new().unwrap();
    let corpus = write_corpus(&dir);
    let out = dir.path().join("clusters.json");

    let output = jobs::build_clusters(&corpus, &out, &ClusterConfig::default()).unwrap();
    assert!(output.stats.clusters_emitted > 0);

    let reloaded: BuildOutput =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let garlic = reloaded
        .clusters
        .iter()
        .find(|c| c.canonical == "garlic, minced")
        .expect("garlic cluster");
    assert_eq!(garlic.aliases.len(), 1);
    assert_eq!(garlic.aliases[0].name, "minced garlic");
}

#[test]
fn test_ontology_clean_dry_run_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ontology.json");
    let entries = vec![OntologyEntry {
        slug: "garlic".to_string(),
        display_name: "Garlic".to_string(),
        surface_forms: vec!["garlic".to_string(), "x".to_string()],
        fdc_id: None,
        confirm_tokens: None,
        recipe_count: None,
    }];
    fs::write(&path, serde_json::to_string(&entries).unwrap()).unwrap();
    let before = fs::read_to_string(&path).unwrap();

    let report = jobs::clean_ontology(&path, false).unwrap();
    assert_eq!(report.removals.len(), 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), before);

    jobs::clean_ontology(&path, true).unwrap();
    let cleaned: Vec<OntologyEntry> =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(cleaned[0].surface_forms, vec!["garlic".to_string()]);
}

#[tokio::test]
async fn test_backfill_tallies_and_skips() {
    let pool = setup_test_db().await;
    for (fdc_id, description) in [
        (100, "Chicken, breast, raw"),
        (101, "Garlic, raw"),
        (102, ""),
    ] {
        sqlx::query("INSERT INTO foods (fdc_id, description) VALUES (?, ?)")
            .bind(fdc_id)
            .bind(description)
            .execute(&pool)
            .await
            .unwrap();
    }

    let summary = jobs::backfill_canonical(&pool, 4, false).await.unwrap();
    assert_eq!(summary.foods_in, 3);
    assert_eq!(summary.written, 2);
    assert_eq!(summary.skipped_input, 1);
    assert_eq!(summary.skipped_by_reason.get("empty_description"), Some(&1));

    // Re-run with changed_only: everything written before is now current.
    let summary = jobs::backfill_canonical(&pool, 4, true).await.unwrap();
    assert_eq!(summary.written, 0);
    assert_eq!(summary.skipped_unchanged, 2);

    let summary = jobs::backfill_cookability(&pool, &Assessor::default(), 4, false)
        .await
        .unwrap();
    assert_eq!(summary.written, 3);

    let summary = jobs::backfill_cookability(&pool, &Assessor::default(), 4, true)
        .await
        .unwrap();
    assert_eq!(summary.skipped_unchanged, 3);
}

#[tokio::test]
async fn test_resolve_end_to_end() {
    let dir = TempDir::new().unwrap();
    let corpus = write_corpus(&dir);
    let clusters_path = dir.path().join("clusters.json");
    jobs::build_clusters(&corpus, &clusters_path, &ClusterConfig::default()).unwrap();

    let ontology_path = dir.path().join("ontology.json");
    let entries = vec![OntologyEntry {
        slug: "garlic".to_string(),
        display_name: "Garlic".to_string(),
        surface_forms: vec!["garlic".to_string(), "garlic, minced".to_string()],
        fdc_id: Some(11215),
        confirm_tokens: None,
        recipe_count: None,
    }];
    fs::write(&ontology_path, serde_json::to_string(&entries).unwrap()).unwrap();

    let pool = setup_test_db().await;
    sqlx::query("INSERT INTO foods (fdc_id, description) VALUES (171477, 'Chicken breast, skinless, raw')")
        .execute(&pool)
        .await
        .unwrap();
    jobs::backfill_canonical(&pool, 1, false).await.unwrap();

    let artifacts = ArtifactConfig {
        corpus_path: corpus.display().to_string(),
        clusters_path: clusters_path.display().to_string(),
        ontology_path: ontology_path.display().to_string(),
        catalog_path: dir.path().join("catalog.json").display().to_string(),
    };

    let classifier = Classifier::default();
    let index = jobs::build_index(&pool, &artifacts, &classifier)
        .await
        .unwrap();

    let input = "2 cloves garlic, minced\ndiced chicken breast\nasdf##\n";
    let mut out = Vec::new();
    let summary =
        jobs::resolve_lines(&index, &classifier, Cursor::new(input), &mut out).unwrap();

    assert_eq!(summary.inputs, 3);
    assert_eq!(summary.resolved, 2);
    assert_eq!(summary.unresolved, 1);

    let lines: Vec<serde_json::Value> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["matched"]["slug"], "garlic");
    assert_eq!(lines[0]["method"], "surface_form");
    assert_eq!(lines[1]["matched"]["fdc_ids"][0], 171477);
    assert!(lines[2]["matched"].is_null());
}
