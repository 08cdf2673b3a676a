pub mod bitmap;
pub mod block_device;
pub mod mem_disk;
pub mod types;

pub use bitmap::BlockBitmap;
pub use block_device::BlockDevice;
pub use mem_disk::MemDisk;
pub use types::{Block, BLOCK_SIZE, DISK_SIZE, ZERO_BLOCK};
