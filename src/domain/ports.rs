use crate::domain::model::{Participant, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn participant_column(&self) -> &str;
    fn preferences_column(&self) -> &str;
    fn output_formats(&self) -> &[String];
    /// Zip archive file name, `None` when archiving is off.
    fn archive_name(&self) -> Option<&str>;
    fn strict_preferences(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Participant>>;
    async fn transform(&self, participants: Vec<Participant>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
