use crate::core::allocator::{Allocator, AllocatorOptions};
use crate::core::table::{
    read_participants, write_assignments_csv, write_capacity_csv, write_rank_distribution_csv,
};
use crate::core::{ConfigProvider, Participant, Pipeline, Storage, TransformResult};
use crate::domain::model::ActivityCatalog;
use crate::utils::error::Result;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

pub const ASSIGNMENTS_FILE: &str = "assignments.csv";
pub const CAPACITY_FILE: &str = "capacity.csv";
pub const RANK_DISTRIBUTION_FILE: &str = "rank_distribution.csv";
pub const REPORT_JSON_FILE: &str = "allocation.json";

pub struct AllocationPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    catalog: ActivityCatalog,
}

impl<S: Storage, C: ConfigProvider> AllocationPipeline<S, C> {
    pub fn new(storage: S, config: C, catalog: ActivityCatalog) -> Self {
        Self {
            storage,
            config,
            catalog,
        }
    }

    fn output_file(&self, name: &str) -> String {
        format!("{}/{}", self.config.output_path().trim_end_matches('/'), name)
    }

    /// 依設定的格式產生所有輸出檔 (檔名, 內容)
    fn render(&self, result: &TransformResult) -> Result<Vec<(&'static str, Vec<u8>)>> {
        let mut files = Vec::new();
        let formats = self.config.output_formats();

        if formats.iter().any(|f| f == "csv") {
            files.push((
                ASSIGNMENTS_FILE,
                write_assignments_csv(
                    &result.participants,
                    &result.report,
                    self.config.participant_column(),
                    self.config.preferences_column(),
                )?,
            ));
            files.push((CAPACITY_FILE, write_capacity_csv(&result.report.capacity)?));
            files.push((
                RANK_DISTRIBUTION_FILE,
                write_rank_distribution_csv(&result.report.rank_distribution)?,
            ));
        }

        if formats.iter().any(|f| f == "json") {
            let json = serde_json::to_string_pretty(&result.report)?;
            files.push((REPORT_JSON_FILE, json.into_bytes()));
        }

        Ok(files)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for AllocationPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Participant>> {
        tracing::debug!("Reading participant table from: {}", self.config.input_path());
        let data = self.storage.read_file(self.config.input_path()).await?;

        read_participants(
            &data,
            self.config.participant_column(),
            self.config.preferences_column(),
        )
    }

    async fn transform(&self, participants: Vec<Participant>) -> Result<TransformResult> {
        let options = AllocatorOptions {
            strict_preferences: self.config.strict_preferences(),
        };
        let report = Allocator::new(&self.catalog)
            .with_options(options)
            .run(&participants)?;

        Ok(TransformResult {
            participants,
            report,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let files = self.render(&result)?;

        for (name, data) in &files {
            let path = self.output_file(name);
            tracing::debug!("Writing {} ({} bytes)", path, data.len());
            self.storage.write_file(&path, data).await?;
        }

        let Some(archive_name) = self.config.archive_name() else {
            return Ok(self.config.output_path().to_string());
        };

        // 把所有輸出檔打包成一個 ZIP
        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
            for (name, data) in &files {
                zip.start_file(*name, SimpleFileOptions::default())?;
                zip.write_all(data)?;
            }
            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        let archive_path = self.output_file(archive_name);
        tracing::debug!("Writing ZIP archive ({} bytes) to {}", zip_data.len(), archive_path);
        self.storage.write_file(&archive_path, &zip_data).await?;

        Ok(archive_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::AllocError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_file(path: &str, data: &str) -> Self {
            let mut files = HashMap::new();
            files.insert(path.to_string(), data.as_bytes().to_vec());
            Self {
                files: Arc::new(Mutex::new(files)),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                AllocError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        output_formats: Vec<String>,
        archive_name: Option<String>,
        strict: bool,
    }

    impl MockConfig {
        fn new() -> Self {
            Self {
                output_formats: vec!["csv".to_string()],
                archive_name: None,
                strict: false,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> &str {
            "responses.csv"
        }

        fn output_path(&self) -> &str {
            "out"
        }

        fn participant_column(&self) -> &str {
            "StudentEmail"
        }

        fn preferences_column(&self) -> &str {
            "Preferences"
        }

        fn output_formats(&self) -> &[String] {
            &self.output_formats
        }

        fn archive_name(&self) -> Option<&str> {
            self.archive_name.as_deref()
        }

        fn strict_preferences(&self) -> bool {
            self.strict
        }
    }

    const RESPONSES: &str = "StudentEmail,Preferences\n\
                             a@example.com,\"x,y\"\n\
                             b@example.com,\"y,x\"\n\
                             c@example.com,\n";

    fn catalog() -> ActivityCatalog {
        ActivityCatalog::new(vec![("x", 1), ("y", 1)]).unwrap()
    }

    #[tokio::test]
    async fn test_extract_reads_participants() {
        let storage = MockStorage::with_file("responses.csv", RESPONSES);
        let pipeline = AllocationPipeline::new(storage, MockConfig::new(), catalog());

        let participants = pipeline.extract().await.unwrap();

        assert_eq!(participants.len(), 3);
        assert_eq!(participants[1].preferences, vec!["y", "x"]);
    }

    #[tokio::test]
    async fn test_extract_missing_input_file() {
        let storage = MockStorage::with_file("other.csv", RESPONSES);
        let pipeline = AllocationPipeline::new(storage, MockConfig::new(), catalog());

        let result = pipeline.extract().await;
        assert!(matches!(result, Err(AllocError::IoError(_))));
    }

    #[tokio::test]
    async fn test_transform_then_load_csv() {
        let storage = MockStorage::with_file("responses.csv", RESPONSES);
        let pipeline = AllocationPipeline::new(storage.clone(), MockConfig::new(), catalog());

        let participants = pipeline.extract().await.unwrap();
        let result = pipeline.transform(participants).await.unwrap();
        assert_eq!(result.report.assignments.len(), 2);

        let output = pipeline.load(result).await.unwrap();
        assert_eq!(output, "out");

        let assignments = storage.get_file("out/assignments.csv").await.unwrap();
        assert_eq!(
            String::from_utf8(assignments).unwrap(),
            "StudentEmail,AssignedActivity,AchievedRank,Preferences\n\
             a@example.com,x,1,\"x,y\"\n\
             b@example.com,y,1,\"y,x\"\n\
             c@example.com,,,\n"
        );

        let capacity = storage.get_file("out/capacity.csv").await.unwrap();
        assert_eq!(
            String::from_utf8(capacity).unwrap(),
            "activity,capacity,filled,remaining\nx,1,1,0\ny,1,1,0\n"
        );

        let ranks = storage.get_file("out/rank_distribution.csv").await.unwrap();
        assert_eq!(
            String::from_utf8(ranks).unwrap(),
            "rank,count,percentage\n1,2,100.00\n"
        );
        assert!(storage.get_file("out/allocation.json").await.is_none());
    }

    #[tokio::test]
    async fn test_transform_strict_mode() {
        let storage = MockStorage::with_file(
            "responses.csv",
            "StudentEmail,Preferences\na@example.com,fencing\n",
        );
        let mut config = MockConfig::new();
        config.strict = true;
        let pipeline = AllocationPipeline::new(storage, config, catalog());

        let participants = pipeline.extract().await.unwrap();
        let result = pipeline.transform(participants).await;
        assert!(matches!(result, Err(AllocError::ValidationError { .. })));
    }

    #[tokio::test]
    async fn test_load_json_and_archive() {
        let storage = MockStorage::with_file("responses.csv", RESPONSES);
        let mut config = MockConfig::new();
        config.output_formats = vec!["csv".to_string(), "json".to_string()];
        config.archive_name = Some("allocation.zip".to_string());
        let pipeline = AllocationPipeline::new(storage.clone(), config, catalog());

        let participants = pipeline.extract().await.unwrap();
        let result = pipeline.transform(participants).await.unwrap();
        let output = pipeline.load(result).await.unwrap();
        assert_eq!(output, "out/allocation.zip");

        let json = storage.get_file("out/allocation.json").await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value["assignments"][0]["activity"], "x");
        assert_eq!(value["assignments"][0]["rank"], 1);
        assert_eq!(value["unassigned"][0], "c@example.com");

        let zip_bytes = storage.get_file("out/allocation.zip").await.unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_bytes)).unwrap();
        let mut names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "allocation.json",
                "assignments.csv",
                "capacity.csv",
                "rank_distribution.csv"
            ]
        );
    }
}
