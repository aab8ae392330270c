use async_trait::async_trait;
use reqwest::{Request, Response};

/// Transport seam for outgoing requests, swappable for wrappers or fakes.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
