pub mod crons;
