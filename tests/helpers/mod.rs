pub mod doubles;
pub mod factories;
