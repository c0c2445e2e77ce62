pub mod pool;
pub mod profiles;
