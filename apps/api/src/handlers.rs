pub mod health;
pub mod ownership;
