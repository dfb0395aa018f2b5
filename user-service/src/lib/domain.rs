pub mod context;
pub mod user;
