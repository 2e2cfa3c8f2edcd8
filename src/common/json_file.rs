use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::sync::Mutex;
use uuid::Uuid;

/// A JSON document on disk, written atomically (temp file + rename).
///
/// Writes are serialized: callers take a snapshot while holding the guard
/// returned by [`JsonFile::lock`], so a newer snapshot can never be overwritten
/// by an older one that finished serializing later.
pub struct JsonFile {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Reads the document, returning `T::default()` if the file does not exist yet.
    pub async fn load<T: DeserializeOwned + Default>(&self) -> anyhow::Result<T> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(T::default()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(T::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn lock(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Writes `value`. The caller must hold the guard from [`JsonFile::lock`].
    pub async fn store<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        let json_encoded = serde_json::to_vec(value)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut tmp_name = self.path.clone().into_os_string();
        tmp_name.push(format!(".{}.tmp", Uuid::new_v4()));
        let tmp_path = PathBuf::from(tmp_name);

        tokio::fs::write(&tmp_path, json_encoded).await?;
        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }
        Ok(())
    }
}
