use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// Turns a path as written by the game client into one usable on this host.
#[async_trait]
pub trait PathTranslator: Send + Sync {
    async fn to_local(&self, client_path: &str) -> anyhow::Result<PathBuf>;
}

pub struct NativePaths;

#[async_trait]
impl PathTranslator for NativePaths {
    async fn to_local(&self, client_path: &str) -> anyhow::Result<PathBuf> {
        Ok(PathBuf::from(client_path))
    }
}

/// The client runs on Windows while this service runs under WSL.
pub struct WslPaths;

#[async_trait]
impl PathTranslator for WslPaths {
    async fn to_local(&self, client_path: &str) -> anyhow::Result<PathBuf> {
        let output = Command::new("wslpath")
            .arg(client_path)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await?;
        if !output.status.success() {
            anyhow::bail!("wslpath exited with {}", output.status);
        }
        let translated = String::from_utf8(output.stdout)?;
        Ok(PathBuf::from(translated.trim_end_matches(['\r', '\n'])))
    }
}

/// Last segment of a client path, accepting both `/` and `\` separators.
pub fn client_file_name(client_path: &str) -> &str {
    client_path
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(client_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_handles_both_separators() {
        assert_eq!(
            client_file_name(r"C:\osu!\Songs\123 Artist - Title\map [Hard].osu"),
            "map [Hard].osu"
        );
        assert_eq!(client_file_name("/home/me/Songs/set/map.osu"), "map.osu");
        assert_eq!(client_file_name("map.osu"), "map.osu");
    }

    #[tokio::test]
    async fn native_paths_are_unchanged() {
        let path = NativePaths.to_local("/tmp/some/map.osu").await.unwrap();
        assert_eq!(path, PathBuf::from("/tmp/some/map.osu"));
    }
}
