pub mod cases;
pub mod health;
