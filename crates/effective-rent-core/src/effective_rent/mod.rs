pub mod calculator;
pub mod report;
