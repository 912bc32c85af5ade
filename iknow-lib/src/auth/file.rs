//! Token provider backed by a token file on disk.

use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use async_trait::async_trait;

use super::AccessToken;
use super::TokenProvider;
use crate::error::AuthError;

/// Reads the bearer token from a file on every request.
///
/// The file holds the raw token, surrounding whitespace is ignored. A missing
/// or blank file means "not logged in" and yields no token, so a login or
/// logout performed by another process is picked up on the next request.
#[derive(Debug, Clone)]
pub struct FileTokenProvider {
    path: PathBuf,
}

impl FileTokenProvider {
    /// Creates a provider reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the token file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenProvider for FileTokenProvider {
    async fn get_token(&self) -> Result<Option<AccessToken>, AuthError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AuthError::Io(e)),
        };

        let token = contents.trim();
        if token.is_empty() {
            return Ok(None);
        }
        if token.chars().any(char::is_whitespace) {
            return Err(AuthError::Parse(format!(
                "token file {} contains more than one token",
                self.path.display()
            )));
        }

        Ok(Some(AccessToken::new(token)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("iknow-token-{}-{}", std::process::id(), name))
    }

    #[tokio::test]
    async fn test_missing_file_is_anonymous() {
        let provider = FileTokenProvider::new(temp_path("missing"));
        assert!(provider.get_token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reads_trimmed_token() {
        let path = temp_path("trimmed");
        std::fs::write(&path, "  tok123\n").unwrap();
        let provider = FileTokenProvider::new(&path);
        let token = provider.get_token().await.unwrap().unwrap();
        assert_eq!(token.access_token, "tok123");
        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_blank_file_is_anonymous() {
        let path = temp_path("blank");
        std::fs::write(&path, "\n\n").unwrap();
        let provider = FileTokenProvider::new(&path);
        assert!(provider.get_token().await.unwrap().is_none());
        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_garbage_file_is_rejected() {
        let path = temp_path("garbage");
        std::fs::write(&path, "one two").unwrap();
        let provider = FileTokenProvider::new(&path);
        assert!(matches!(provider.get_token().await, Err(AuthError::Parse(_))));
        std::fs::remove_file(&path).unwrap();
    }
}
