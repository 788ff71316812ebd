pub mod activity;
pub mod draft;
pub mod event;
pub mod gemini;
pub mod health;
pub mod response;
pub mod retry;
pub mod validation;
