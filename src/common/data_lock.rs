use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

const LOCK_FILE_NAME: &str = "leaderboard-service.lock";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataLockMeta {
    pub component: String,
    pub pid: u32,
    pub acquired_at: DateTime<Utc>,
}

/// Exclusive ownership of the data directory.
///
/// Every component flushes whole snapshots of the stores, so at most one
/// process may have them loaded. The lock file is removed on drop.
#[derive(Debug)]
pub struct DataLock {
    path: PathBuf,
}

impl DataLock {
    pub fn acquire(data_dir: &Path, component: &str) -> anyhow::Result<Self> {
        fs::create_dir_all(data_dir)?;
        let path = data_dir.join(LOCK_FILE_NAME);

        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let holder = match read_meta(&path) {
                    Ok(meta) => format!(
                        "{} (pid {}) since {}",
                        meta.component, meta.pid, meta.acquired_at
                    ),
                    Err(e) => format!("an unknown process ({e})"),
                };
                anyhow::bail!(
                    "{} is held by {holder}; stop it first, or remove the file if it is stale",
                    path.display()
                );
            }
            Err(e) => return Err(e.into()),
        };

        let meta = DataLockMeta {
            component: component.to_owned(),
            pid: std::process::id(),
            acquired_at: Utc::now(),
        };
        if let Err(e) = serde_json::to_writer(&mut file, &meta) {
            let _ = fs::remove_file(&path);
            return Err(e.into());
        }
        info!(
            component = %meta.component,
            pid = meta.pid,
            path = %path.display(),
            "Acquired data directory lock"
        );
        Ok(Self { path })
    }

}

impl Drop for DataLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn read_meta(path: &Path) -> anyhow::Result<DataLockMeta> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}
