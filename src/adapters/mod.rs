pub mod beatmaps_catalog;
pub mod performance_calculator;
