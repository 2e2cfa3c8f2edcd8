use crate::entities::beatmaps::BeatmapRecord;
use std::path::PathBuf;

#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RankedStatus {
    NotSubmitted = -1,
    Pending = 0,
    UpdateAvailable = 1,
    Ranked = 2,
    Approved = 3,
    Qualified = 4,
    Loved = 5,
}

impl From<i8> for RankedStatus {
    fn from(value: i8) -> Self {
        match value {
            -1 => Self::NotSubmitted,
            1 => Self::UpdateAvailable,
            2 => Self::Ranked,
            3 => Self::Approved,
            4 => Self::Qualified,
            5 => Self::Loved,
            _ => Self::Pending,
        }
    }
}

impl RankedStatus {
    /// Converts the `approved` value of the osu! api into the client's status codes.
    pub const fn from_osu_api(approved: i8) -> Self {
        match approved {
            4 => Self::Loved,
            3 => Self::Qualified,
            2 => Self::Approved,
            1 => Self::Ranked,
            _ => Self::Pending,
        }
    }

    pub const fn as_i8(self) -> i8 {
        self as i8
    }

    pub const fn has_leaderboard(self) -> bool {
        matches!(
            self,
            Self::Ranked | Self::Approved | Self::Qualified | Self::Loved
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalBeatmap {
    pub beatmap_id: i32,
    pub beatmapset_id: i32,
    pub beatmap_md5: String,
    pub ranked_status: RankedStatus,
    pub title: String,
    pub artist: String,
    pub title_unicode: Option<String>,
    pub artist_unicode: Option<String>,
    pub version: String,
    pub max_combo: i32,
    pub file_content: Option<String>,
}

/// A locally edited copy of a canonical beatmap.
#[derive(Debug, Clone, PartialEq)]
pub struct ModifiedBeatmap {
    pub beatmap_md5: String,
    pub version: String,
    pub file_path: PathBuf,
    pub file_content: String,
    pub original: CanonicalBeatmap,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Beatmap {
    Canonical(CanonicalBeatmap),
    Modified(ModifiedBeatmap),
}

impl Beatmap {
    /// The canonical beatmap this one is scored against.
    pub fn canonical(&self) -> &CanonicalBeatmap {
        match self {
            Beatmap::Canonical(beatmap) => beatmap,
            Beatmap::Modified(beatmap) => &beatmap.original,
        }
    }

    pub fn beatmap_md5(&self) -> &str {
        match self {
            Beatmap::Canonical(beatmap) => &beatmap.beatmap_md5,
            Beatmap::Modified(beatmap) => &beatmap.beatmap_md5,
        }
    }

    pub fn beatmap_id(&self) -> i32 {
        self.canonical().beatmap_id
    }

    pub fn beatmapset_id(&self) -> i32 {
        self.canonical().beatmapset_id
    }

    pub fn ranked_status(&self) -> RankedStatus {
        self.canonical().ranked_status
    }

    pub fn max_combo(&self) -> i32 {
        self.canonical().max_combo
    }

    pub fn title(&self) -> &str {
        &self.canonical().title
    }

    pub fn artist(&self) -> &str {
        &self.canonical().artist
    }

    pub fn display_title(&self) -> &str {
        let canonical = self.canonical();
        canonical.title_unicode.as_deref().unwrap_or(&canonical.title)
    }

    pub fn display_artist(&self) -> &str {
        let canonical = self.canonical();
        canonical
            .artist_unicode
            .as_deref()
            .unwrap_or(&canonical.artist)
    }

    pub fn version(&self) -> &str {
        match self {
            Beatmap::Canonical(beatmap) => &beatmap.version,
            Beatmap::Modified(beatmap) => &beatmap.version,
        }
    }

    /// The `.osu` file body, if it has been read or downloaded.
    pub fn file_content(&self) -> Option<&str> {
        match self {
            Beatmap::Canonical(beatmap) => beatmap.file_content.as_deref(),
            Beatmap::Modified(beatmap) => Some(&beatmap.file_content),
        }
    }

    pub fn is_modified(&self) -> bool {
        matches!(self, Beatmap::Modified(_))
    }
}

impl From<BeatmapRecord> for CanonicalBeatmap {
    fn from(record: BeatmapRecord) -> Self {
        Self {
            beatmap_id: record.id,
            beatmapset_id: record.setid,
            beatmap_md5: record.md5,
            ranked_status: RankedStatus::from(record.rank_status),
            title: record.title,
            artist: record.artist,
            title_unicode: record.title_unicode,
            artist_unicode: record.artist_unicode,
            version: record.version,
            max_combo: record.max_combo,
            file_content: record.file_content,
        }
    }
}

impl TryFrom<BeatmapRecord> for Beatmap {
    type Error = anyhow::Error;

    fn try_from(mut record: BeatmapRecord) -> anyhow::Result<Self> {
        let Some(original) = record.original_bmap.take() else {
            return Ok(Beatmap::Canonical(CanonicalBeatmap::from(record)));
        };
        if original.original_bmap.is_some() {
            anyhow::bail!("modified beatmap {} points at another modified beatmap", record.md5);
        }
        let file_path = record
            .file_path
            .take()
            .ok_or_else(|| anyhow::anyhow!("modified beatmap {} has no file path", record.md5))?;
        let file_content = record.file_content.take().unwrap_or_default();

        Ok(Beatmap::Modified(ModifiedBeatmap {
            beatmap_md5: record.md5,
            version: record.version,
            file_path: PathBuf::from(file_path),
            file_content,
            original: CanonicalBeatmap::from(*original),
        }))
    }
}

impl From<&CanonicalBeatmap> for BeatmapRecord {
    fn from(beatmap: &CanonicalBeatmap) -> Self {
        Self {
            md5: beatmap.beatmap_md5.clone(),
            id: beatmap.beatmap_id,
            setid: beatmap.beatmapset_id,
            rank_status: beatmap.ranked_status.as_i8(),
            title: beatmap.title.clone(),
            artist: beatmap.artist.clone(),
            title_unicode: beatmap.title_unicode.clone(),
            artist_unicode: beatmap.artist_unicode.clone(),
            version: beatmap.version.clone(),
            max_combo: beatmap.max_combo,
            file_content: beatmap.file_content.clone(),
            file_path: None,
            original_bmap: None,
        }
    }
}

impl From<&Beatmap> for BeatmapRecord {
    fn from(beatmap: &Beatmap) -> Self {
        match beatmap {
            Beatmap::Canonical(canonical) => BeatmapRecord::from(canonical),
            Beatmap::Modified(modified) => {
                let original = &modified.original;
                Self {
                    md5: modified.beatmap_md5.clone(),
                    id: original.beatmap_id,
                    setid: original.beatmapset_id,
                    rank_status: original.ranked_status.as_i8(),
                    title: original.title.clone(),
                    artist: original.artist.clone(),
                    title_unicode: original.title_unicode.clone(),
                    artist_unicode: original.artist_unicode.clone(),
                    version: modified.version.clone(),
                    max_combo: original.max_combo,
                    file_content: Some(modified.file_content.clone()),
                    file_path: Some(modified.file_path.to_string_lossy().into_owned()),
                    original_bmap: Some(Box::new(BeatmapRecord::from(original))),
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn canonical(beatmap_id: i32, md5: &str, status: RankedStatus) -> CanonicalBeatmap {
        CanonicalBeatmap {
            beatmap_id,
            beatmapset_id: beatmap_id / 10,
            beatmap_md5: md5.to_owned(),
            ranked_status: status,
            title: "Title".to_owned(),
            artist: "Artist".to_owned(),
            title_unicode: None,
            artist_unicode: Some("アーティスト".to_owned()),
            version: "Hard".to_owned(),
            max_combo: 500,
            file_content: None,
        }
    }

    #[test]
    fn osu_api_statuses_are_converted() {
        assert_eq!(RankedStatus::from_osu_api(1), RankedStatus::Ranked);
        assert_eq!(RankedStatus::from_osu_api(2), RankedStatus::Approved);
        assert_eq!(RankedStatus::from_osu_api(4), RankedStatus::Loved);
        assert_eq!(RankedStatus::from_osu_api(-2), RankedStatus::Pending);
    }

    #[test]
    fn only_ranked_like_statuses_have_leaderboards() {
        assert!(RankedStatus::Loved.has_leaderboard());
        assert!(RankedStatus::Qualified.has_leaderboard());
        assert!(!RankedStatus::Pending.has_leaderboard());
        assert!(!RankedStatus::UpdateAvailable.has_leaderboard());
        assert!(!RankedStatus::NotSubmitted.has_leaderboard());
    }

    #[test]
    fn modified_beatmap_accessors_follow_the_original() {
        let original = canonical(1234, "aaaa", RankedStatus::Ranked);
        let beatmap = Beatmap::Modified(ModifiedBeatmap {
            beatmap_md5: "bbbb".to_owned(),
            version: "[Hard 1.2x]".to_owned(),
            file_path: PathBuf::from("/songs/map.osu"),
            file_content: "osu file format v14".to_owned(),
            original,
        });
        assert_eq!(beatmap.beatmap_md5(), "bbbb");
        assert_eq!(beatmap.beatmap_id(), 1234);
        assert_eq!(beatmap.ranked_status(), RankedStatus::Ranked);
        assert_eq!(beatmap.display_artist(), "アーティスト");
        assert_eq!(beatmap.display_title(), "Title");
        assert_eq!(beatmap.file_content(), Some("osu file format v14"));
    }

    #[test]
    fn records_survive_conversion() {
        let beatmap = Beatmap::Modified(ModifiedBeatmap {
            beatmap_md5: "bbbb".to_owned(),
            version: "[Hard 1.2x]".to_owned(),
            file_path: PathBuf::from("/songs/map.osu"),
            file_content: "content".to_owned(),
            original: canonical(1234, "aaaa", RankedStatus::Loved),
        });
        let record = BeatmapRecord::from(&beatmap);
        assert_eq!(Beatmap::try_from(record).unwrap(), beatmap);
    }

    #[test]
    fn chained_modified_records_are_rejected() {
        let mut inner = BeatmapRecord::from(&canonical(1, "aaaa", RankedStatus::Ranked));
        inner.original_bmap = Some(Box::new(BeatmapRecord::from(&canonical(
            2,
            "cccc",
            RankedStatus::Ranked,
        ))));
        let mut outer = BeatmapRecord::from(&canonical(1, "bbbb", RankedStatus::Ranked));
        outer.file_path = Some("/songs/map.osu".to_owned());
        outer.original_bmap = Some(Box::new(inner));
        assert!(Beatmap::try_from(outer).is_err());
    }
}
