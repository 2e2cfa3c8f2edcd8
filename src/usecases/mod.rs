pub mod beatmaps;
pub mod leaderboards;
pub mod modified_beatmaps;
pub mod performance;
pub mod profiles;
