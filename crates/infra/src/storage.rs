use std::path::PathBuf;

use spark_domain::DomainResult;
use spark_domain::error::DomainError;
use spark_domain::ports::BoxFuture;
use spark_domain::ports::kv::KeyValueStore;
use tokio::fs;

/// File-backed key-value store: one UTF-8 blob per key, each key a
/// file inside the data directory. Writes go through a temp file and a
/// rename so a reader never observes a half-written blob.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub async fn open(dir: impl Into<PathBuf>) -> DomainResult<Self> {
        let store = Self { dir: dir.into() };
        fs::create_dir_all(&store.dir).await.map_err(storage_err)?;
        Ok(store)
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|ch| {
                if ch.is_ascii_alphanumeric() || ch == '-' || ch == '.' {
                    ch
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

fn storage_err(err: std::io::Error) -> DomainError {
    DomainError::Storage(err.to_string())
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> BoxFuture<'_, DomainResult<Option<String>>> {
        let path = self.path_for(key);
        Box::pin(async move {
            match fs::read_to_string(&path).await {
                Ok(raw) => Ok(Some(raw)),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(err) => Err(storage_err(err)),
            }
        })
    }

    fn set(&self, key: &str, value: String) -> BoxFuture<'_, DomainResult<()>> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        Box::pin(async move {
            fs::write(&tmp, value.as_bytes()).await.map_err(storage_err)?;
            fs::rename(&tmp, &path).await.map_err(storage_err)
        })
    }

    fn remove(&self, key: &str) -> BoxFuture<'_, DomainResult<()>> {
        let path = self.path_for(key);
        Box::pin(async move {
            match fs::remove_file(&path).await {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(err) => Err(storage_err(err)),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open_temp() -> (JsonFileStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::open(dir.path()).await.expect("open");
        (store, dir)
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let (store, _dir) = open_temp().await;
        store
            .set("plans:v1", "[{\"id\":\"p1\"}]".to_string())
            .await
            .unwrap();
        let raw = store.get("plans:v1").await.unwrap();
        assert_eq!(raw.as_deref(), Some("[{\"id\":\"p1\"}]"));
    }

    #[tokio::test]
    async fn missing_key_reads_as_none() {
        let (store, _dir) = open_temp().await;
        assert_eq!(store.get("hs:profile").await.unwrap(), None);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let (store, _dir) = open_temp().await;
        store.set("hs:branding", "{}".to_string()).await.unwrap();
        store.remove("hs:branding").await.unwrap();
        store.remove("hs:branding").await.unwrap();
        assert_eq!(store.get("hs:branding").await.unwrap(), None);
    }

    #[tokio::test]
    async fn keys_map_to_distinct_files() {
        let (store, _dir) = open_temp().await;
        store.set("plans:v1", "a".to_string()).await.unwrap();
        store.set("hs:profile", "b".to_string()).await.unwrap();
        assert_eq!(store.get("plans:v1").await.unwrap().as_deref(), Some("a"));
        assert_eq!(store.get("hs:profile").await.unwrap().as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn overwrite_replaces_previous_blob() {
        let (store, _dir) = open_temp().await;
        store.set("plans:v1", "old".to_string()).await.unwrap();
        store.set("plans:v1", "new".to_string()).await.unwrap();
        assert_eq!(store.get("plans:v1").await.unwrap().as_deref(), Some("new"));
    }
}
