use financa_api::endpoints::categories::Taxonomy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

#[derive(Debug)]
pub enum CacheError {
    Io(std::io::Error),
    Serialization(serde_json::Error),
}

impl std::fmt::Display for CacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheError::Io(e) => write!(f, "IO error: {}", e),
            CacheError::Serialization(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for CacheError {}

impl From<std::io::Error> for CacheError {
    fn from(err: std::io::Error) -> Self {
        CacheError::Io(err)
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(err)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedTaxonomy {
    pub taxonomy: Taxonomy,
    pub cached_at: i64, // Unix timestamp
}

/// Async cache for the category taxonomy using tokio::fs for non-blocking I/O
///
/// The taxonomy is tiny, so the cache only exists to paint pickers instantly
/// while a fresh copy is fetched. Whatever arrives last wins.
#[derive(Clone)]
pub struct TaxonomyCache {
    cache_dir: PathBuf,
}

impl TaxonomyCache {
    pub async fn new() -> Result<Self, CacheError> {
        let cache_dir = dirs::cache_dir()
            .expect("Always returns")
            .join("financa-tui")
            .join("data");
        fs::create_dir_all(&cache_dir).await?;

        Ok(Self { cache_dir })
    }

    pub async fn get_taxonomy(&self) -> Result<Option<CachedTaxonomy>, CacheError> {
        let path = self.cache_dir.join("taxonomy.json");
        if !path.exists() {
            return Ok(None);
        }

        let data = fs::read_to_string(&path).await?;
        let cached: CachedTaxonomy = serde_json::from_str(&data)?;
        Ok(Some(cached))
    }

    pub async fn set_taxonomy(&self, taxonomy: &Taxonomy) -> Result<(), CacheError> {
        let cached = CachedTaxonomy {
            taxonomy: taxonomy.clone(),
            cached_at: chrono::Utc::now().timestamp(),
        };

        let path = self.cache_dir.join("taxonomy.json");
        let json = serde_json::to_string_pretty(&cached)?;
        fs::write(&path, json).await?;
        Ok(())
    }
}
