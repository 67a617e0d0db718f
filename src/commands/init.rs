use crate::commands::Out;
use crate::{Config, Result};
use std::path::Path;

/// Creates the pocketbook home directory and writes an initial `config.json` pointing at
/// the given backend base URL.
pub async fn init(home: &Path, api_url: &str) -> Result<Out<()>> {
    let config = Config::create(home, api_url).await?;
    Ok(Out::new_message(format!(
        "Initialized pocketbook home at {}",
        config.root().display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_creates_home() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("pb");
        let out = init(&home, "http://localhost:8000").await.unwrap();
        assert!(out.message().contains("Initialized"));
        assert!(Config::load(&home).await.is_ok());
    }

    #[tokio::test]
    async fn test_init_rejects_bad_url() {
        let dir = TempDir::new().unwrap();
        assert!(init(&dir.path().join("pb"), "nope").await.is_err());
    }
}
