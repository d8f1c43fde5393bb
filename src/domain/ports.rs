use crate::domain::model::PositionFix;
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

/// Source of the user's position. May fail, be denied, or never answer;
/// callers bound it with a timeout.
#[async_trait]
pub trait PositionProvider: Send + Sync {
    async fn acquire(&self) -> PositionFix;
}
