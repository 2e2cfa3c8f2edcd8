pub mod beatmaps;
pub mod profiles;
pub mod scores;
