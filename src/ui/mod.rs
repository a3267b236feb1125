pub mod dashboard;
pub mod phrases;
