pub mod backends;
pub mod template;
