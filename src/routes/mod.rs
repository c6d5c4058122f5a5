pub mod health;
pub mod synthesize;
pub mod upload;
