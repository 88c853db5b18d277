//! Application services

pub mod session;

pub use session::Session;
