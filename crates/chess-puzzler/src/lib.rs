pub use chess_core;

pub mod catalog;
pub mod error;
pub mod profile;
pub mod puzzle;
pub mod reporter;
pub mod service;
pub mod session;

pub use profile::UserId;
