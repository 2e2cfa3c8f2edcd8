use std::path::Path;

const ENTRY_DELIMITER: &str = ".mp3 | ";

/// One tracked modified beatmap: `<audio file>.mp3 | <path to .osu>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifiedIndexEntry {
    /// The `.osu` path as the client wrote it.
    pub client_path: String,
}

pub fn parse(text: &str) -> Vec<ModifiedIndexEntry> {
    text.lines()
        .filter_map(|line| {
            let (_, client_path) = line.split_once(ENTRY_DELIMITER)?;
            let client_path = client_path.trim_end_matches('\r');
            if client_path.is_empty() {
                return None;
            }
            Some(ModifiedIndexEntry {
                client_path: client_path.to_owned(),
            })
        })
        .collect()
}

pub async fn fetch_all(index_path: &Path) -> std::io::Result<Vec<ModifiedIndexEntry>> {
    let bytes = tokio::fs::read(index_path).await?;
    Ok(parse(&String::from_utf8_lossy(&bytes)))
}
