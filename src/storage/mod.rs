pub mod disk;
pub mod memory;
pub mod traits;

pub use disk::DiskStorage;
pub use memory::InMemoryStorage;
pub use traits::{MediaFile, StorageProvider, StoredObject};
