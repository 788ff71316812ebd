pub mod gemini;
pub mod generation;
pub mod health;
