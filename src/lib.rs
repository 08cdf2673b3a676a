//! 磁盘空间分配模拟器
//!
//! 一块 256 x 512 字节的内存磁盘，配合连续、链式、索引三种分配方式
//! 和一张文件分配表（FAT）。

pub mod disk;
pub mod fs;
pub mod shell;
pub mod utils;

pub use disk::{BlockDevice, MemDisk};
pub use fs::{
    alloc::Locator,
    config::{FsConfig, PlacementMode, Strategy},
    error::{FileSystemError, Result},
    view::BlockView,
    FileSystem,
};
