pub mod change_history;
pub mod models;
pub mod outage;
pub mod report;
