//! Policy repository implementations

mod ops;
pub mod memory;
pub mod file;

pub use memory::InMemoryPolicyStore;
pub use file::FilePolicyStore;
