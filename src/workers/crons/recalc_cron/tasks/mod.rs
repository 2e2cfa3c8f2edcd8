pub mod recalculate_performance;
pub mod refresh_modified_beatmaps;
