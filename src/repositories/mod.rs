pub mod beatmaps;
pub mod modified_index;
pub mod profiles;
