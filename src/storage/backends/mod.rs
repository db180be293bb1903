mod filesystem;
mod memory;
mod register;

pub use memory::MemoryBackend;
pub use register::BackendConfigs;
