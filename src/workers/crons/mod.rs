pub mod recalc_cron;
pub mod tasks;
