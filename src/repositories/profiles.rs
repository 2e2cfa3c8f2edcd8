use crate::common::json_file::JsonFile;
use crate::entities::profiles::{PlaysByBeatmap, Profile, ProfilePlays};
use crate::entities::scores::ScoreEntity;
use crate::models::beatmaps::RankedStatus;
use crate::models::performance::PerformanceUpdate;
use hashbrown::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;

/// Which per-status map of a profile a play lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayBucket {
    Ranked,
    Approved,
    Qualified,
    Loved,
}

impl PlayBucket {
    /// Buckets whose plays award performance points.
    pub const PERFORMANCE: [PlayBucket; 2] = [PlayBucket::Ranked, PlayBucket::Approved];

    pub const fn for_status(status: RankedStatus) -> Option<Self> {
        match status {
            RankedStatus::Ranked => Some(Self::Ranked),
            RankedStatus::Approved => Some(Self::Approved),
            RankedStatus::Qualified => Some(Self::Qualified),
            RankedStatus::Loved => Some(Self::Loved),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Ranked => "ranked",
            Self::Approved => "approved",
            Self::Qualified => "qualified",
            Self::Loved => "loved",
        }
    }

    fn plays(self, plays: &ProfilePlays) -> &PlaysByBeatmap {
        match self {
            Self::Ranked => &plays.ranked_plays,
            Self::Approved => &plays.approved_plays,
            Self::Qualified => &plays.qualified_plays,
            Self::Loved => &plays.loved_plays,
        }
    }

    fn plays_mut(self, plays: &mut ProfilePlays) -> &mut PlaysByBeatmap {
        match self {
            Self::Ranked => &mut plays.ranked_plays,
            Self::Approved => &mut plays.approved_plays,
            Self::Qualified => &mut plays.qualified_plays,
            Self::Loved => &mut plays.loved_plays,
        }
    }
}

/// Identifies one stored play for an in-place update.
#[derive(Debug, Clone, Copy)]
pub struct PlayKey<'a> {
    pub profile: &'a str,
    pub bucket: PlayBucket,
    pub beatmap_md5: &'a str,
    pub index: usize,
    /// Guards against the list having changed since it was read.
    pub time: i64,
}

fn is_same_play(a: &ScoreEntity, b: &ScoreEntity) -> bool {
    a.md5 == b.md5 && a.time == b.time && a.id == b.id && a.score == b.score
}

pub struct ProfileStore {
    profiles: RwLock<HashMap<String, Profile>>,
    file: JsonFile,
}

impl ProfileStore {
    pub async fn load(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let file = JsonFile::new(path);
        let profiles: HashMap<String, Profile> = file.load().await?;
        Ok(Self {
            profiles: RwLock::new(profiles),
            file,
        })
    }

    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    pub async fn fetch_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.profiles.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn fetch_one(&self, name: &str) -> Option<Profile> {
        self.profiles.read().await.get(name).cloned()
    }

    pub async fn exists(&self, name: &str) -> bool {
        self.profiles.read().await.contains_key(name)
    }

    /// Plays of `name` on one beatmap; empty if the profile or map is unknown.
    pub async fn fetch_plays(
        &self,
        name: &str,
        bucket: PlayBucket,
        beatmap_md5: &str,
    ) -> Vec<ScoreEntity> {
        let profiles = self.profiles.read().await;
        profiles
            .get(name)
            .and_then(|profile| bucket.plays(&profile.plays).get(beatmap_md5))
            .cloned()
            .unwrap_or_default()
    }

    pub async fn fetch_beatmap_md5s(&self, name: &str, bucket: PlayBucket) -> Vec<String> {
        let profiles = self.profiles.read().await;
        let mut md5s: Vec<String> = profiles
            .get(name)
            .map(|profile| bucket.plays(&profile.plays).keys().cloned().collect())
            .unwrap_or_default();
        md5s.sort();
        md5s
    }

    pub async fn fetch_bucket_plays(&self, name: &str, bucket: PlayBucket) -> Vec<ScoreEntity> {
        let profiles = self.profiles.read().await;
        profiles
            .get(name)
            .map(|profile| {
                bucket
                    .plays(&profile.plays)
                    .values()
                    .flatten()
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub async fn fetch_all_plays(&self, name: &str) -> Option<Vec<ScoreEntity>> {
        let profiles = self.profiles.read().await;
        profiles
            .get(name)
            .map(|profile| profile.plays.all_plays.clone())
    }

    pub async fn insert(&self, profile: Profile) {
        let mut profiles = self.profiles.write().await;
        profiles.insert(profile.name.clone(), profile);
    }

    /// Writes pp and accuracy of one play in a single critical section.
    /// The copy kept in the play history is updated alongside.
    /// Returns `false` if the play is no longer where `key` says it is.
    pub async fn commit_performance(&self, key: PlayKey<'_>, update: PerformanceUpdate) -> bool {
        let mut profiles = self.profiles.write().await;
        let Some(profile) = profiles.get_mut(key.profile) else {
            return false;
        };

        let Some(play) = key
            .bucket
            .plays_mut(&mut profile.plays)
            .get_mut(key.beatmap_md5)
            .and_then(|plays| plays.get_mut(key.index))
            .filter(|play| play.time == key.time)
        else {
            return false;
        };
        let previous = play.clone();
        play.pp = update.pp;
        if let Some(accuracy) = update.accuracy {
            play.acc = accuracy;
        }

        if let Some(history) = profile
            .plays
            .all_plays
            .iter_mut()
            .find(|entry| is_same_play(entry, &previous))
        {
            history.pp = update.pp;
            if let Some(accuracy) = update.accuracy {
                history.acc = accuracy;
            }
        }
        true
    }

    /// Resets a profile to no plays. Returns `false` if it does not exist.
    pub async fn wipe(&self, name: &str) -> bool {
        let mut profiles = self.profiles.write().await;
        match profiles.get_mut(name) {
            Some(profile) => {
                profile.plays = ProfilePlays::default();
                true
            }
            None => false,
        }
    }

    pub async fn flush(&self) -> anyhow::Result<()> {
        let _guard = self.file.lock().await;
        let snapshot = self.profiles.read().await.clone();
        self.file.store(&snapshot).await
    }
}
