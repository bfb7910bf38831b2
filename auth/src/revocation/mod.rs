pub mod memory;
pub mod store;
pub mod sweeper;

pub use memory::InMemoryRevocationStore;
pub use store::RevocationError;
pub use store::RevocationRecord;
pub use store::RevocationStore;
pub use sweeper::RevocationSweeper;
