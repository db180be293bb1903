mod memory;
mod register;
mod sqlite;

pub use memory::MemoryStore;
pub use register::DatabaseConfigs;
