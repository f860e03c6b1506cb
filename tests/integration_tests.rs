use pref_assign::config::toml_config::TomlConfig;
use pref_assign::{AllocationEngine, AllocationPipeline, CliConfig, LocalStorage};
use std::path::Path;
use tempfile::TempDir;

const RESPONSES: &str = "StudentEmail,Name,Preferences\n\
                         ann@example.com,Ann,\"Chess, Drama, Art\"\n\
                         ben@example.com,Ben,\"chess,art\"\n\
                         cat@example.com,Cat,\"Drama\"\n\
                         dan@example.com,Dan,\"Fencing\"\n\
                         eve@example.com,Eve,\n";

fn write_inputs(dir: &Path) {
    std::fs::write(dir.join("responses.csv"), RESPONSES).unwrap();
    std::fs::write(
        dir.join("activities.json"),
        r#"{ "Chess": 1, "Drama": 1, "Art": 2 }"#,
    )
    .unwrap();
}

fn cli_config(dir: &Path) -> CliConfig {
    CliConfig {
        input: "responses.csv".to_string(),
        activities: dir.join("activities.json").display().to_string(),
        output_path: "out".to_string(),
        participant_column: "StudentEmail".to_string(),
        preferences_column: "Preferences".to_string(),
        formats: vec!["csv".to_string()],
        archive: None,
        strict: false,
        verbose: false,
        monitor: false,
        log_json: false,
    }
}

fn read(dir: &Path, file: &str) -> String {
    std::fs::read_to_string(dir.join("out").join(file)).unwrap()
}

#[tokio::test]
async fn test_end_to_end_csv_outputs() {
    let temp_dir = TempDir::new().unwrap();
    write_inputs(temp_dir.path());

    let config = cli_config(temp_dir.path());
    let catalog = pref_assign::config::activities::load_catalog(&config.activities).unwrap();
    let storage = LocalStorage::new(temp_dir.path());
    let pipeline = AllocationPipeline::new(storage, config, catalog);
    let engine = AllocationEngine::new(pipeline);

    let output = engine.run().await.unwrap();
    assert_eq!(output, "out");

    // Ann and Ben both rank Chess first. Ann→Chess, Ben→Art, Cat→Drama is the
    // cheapest way to seat them, even though Ben only gets their second choice.
    assert_eq!(
        read(temp_dir.path(), "assignments.csv"),
        "StudentEmail,AssignedActivity,AchievedRank,Preferences,Name\n\
         ann@example.com,Chess,1,\"Chess, Drama, Art\",Ann\n\
         ben@example.com,Art,2,\"chess,art\",Ben\n\
         cat@example.com,Drama,1,Drama,Cat\n\
         dan@example.com,,,Fencing,Dan\n\
         eve@example.com,,,,Eve\n"
    );
    assert_eq!(
        read(temp_dir.path(), "capacity.csv"),
        "activity,capacity,filled,remaining\nChess,1,1,0\nDrama,1,1,0\nArt,2,1,1\n"
    );
    assert_eq!(
        read(temp_dir.path(), "rank_distribution.csv"),
        "rank,count,percentage\n1,2,66.67\n2,1,33.33\n"
    );
}

#[tokio::test]
async fn test_end_to_end_is_byte_identical_across_runs() {
    let temp_dir = TempDir::new().unwrap();
    write_inputs(temp_dir.path());

    let mut outputs = Vec::new();
    for _ in 0..2 {
        let config = cli_config(temp_dir.path());
        let catalog = pref_assign::config::activities::load_catalog(&config.activities).unwrap();
        let pipeline =
            AllocationPipeline::new(LocalStorage::new(temp_dir.path()), config, catalog);
        AllocationEngine::new(pipeline).run().await.unwrap();

        outputs.push(
            ["assignments.csv", "capacity.csv", "rank_distribution.csv"]
                .iter()
                .map(|f| read(temp_dir.path(), f))
                .collect::<Vec<_>>(),
        );
    }

    assert_eq!(outputs[0], outputs[1]);
}

#[tokio::test]
async fn test_end_to_end_with_monitoring_and_archive() {
    let temp_dir = TempDir::new().unwrap();
    write_inputs(temp_dir.path());

    let mut config = cli_config(temp_dir.path());
    config.formats = vec!["csv".to_string(), "json".to_string()];
    config.archive = Some("bundle.zip".to_string());
    config.monitor = true;
    let catalog = pref_assign::config::activities::load_catalog(&config.activities).unwrap();

    let pipeline = AllocationPipeline::new(LocalStorage::new(temp_dir.path()), config, catalog);
    let engine = AllocationEngine::new_with_monitoring(pipeline, true);

    let output = engine.run().await.unwrap();
    assert_eq!(output, "out/bundle.zip");

    let zip_data = std::fs::read(temp_dir.path().join("out/bundle.zip")).unwrap();
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
    assert_eq!(archive.len(), 4);

    let mut json_file = archive.by_name("allocation.json").unwrap();
    let mut json_content = String::new();
    std::io::Read::read_to_string(&mut json_file, &mut json_content).unwrap();
    let report: serde_json::Value = serde_json::from_str(&json_content).unwrap();

    assert_eq!(report["assignments"].as_array().unwrap().len(), 3);
    assert_eq!(report["unknown_tokens"][0]["token"], "fencing");
    assert_eq!(report["unassigned"][0], "dan@example.com");
}

#[tokio::test]
async fn test_missing_column_fails_before_solving() {
    let temp_dir = TempDir::new().unwrap();
    write_inputs(temp_dir.path());

    let mut config = cli_config(temp_dir.path());
    config.preferences_column = "Choices".to_string();
    let catalog = pref_assign::config::activities::load_catalog(&config.activities).unwrap();

    let pipeline = AllocationPipeline::new(LocalStorage::new(temp_dir.path()), config, catalog);
    let err = AllocationEngine::new(pipeline).run().await.unwrap_err();

    assert!(err.to_string().contains("Choices"));
    assert!(!temp_dir.path().join("out").exists());
}

#[tokio::test]
async fn test_toml_config_end_to_end() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    write_inputs(temp_dir.path());

    let config = TomlConfig::from_toml_str(
        r#"
[run]
name = "integration"

[input]
path = "responses.csv"

[[activity]]
name = "Chess"
capacity = 1

[[activity]]
name = "Drama"
capacity = 1

[[activity]]
name = "Art"
capacity = 2

[output]
path = "out"
formats = ["json"]
"#,
    )?;
    let catalog = config.catalog()?;

    let pipeline = AllocationPipeline::new(LocalStorage::new(temp_dir.path()), config, catalog);
    AllocationEngine::new(pipeline).run().await?;

    assert!(!temp_dir.path().join("out/assignments.csv").exists());
    let report: serde_json::Value =
        serde_json::from_str(&read(temp_dir.path(), "allocation.json"))?;
    assert_eq!(report["assignments"].as_array().map(Vec::len), Some(3));
    assert_eq!(report["capacity"][2]["remaining"], 1);

    Ok(())
}
