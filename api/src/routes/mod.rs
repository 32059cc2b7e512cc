pub mod health;
pub mod photos;
pub mod triage;
