pub mod health;
pub mod message;
pub mod payload;
pub mod response;
pub mod validation;
