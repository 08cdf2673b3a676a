/// 每个逻辑块（Block）的大小：512 字节
/// 模拟磁盘以“块”为最小读写单位。
pub const BLOCK_SIZE: usize = 512;

/// 磁盘中包含的块总数
pub const DISK_SIZE: usize = 256;

/// 定义一个逻辑块类型（每块 512 字节的字节数组）
/// 所有磁盘读写都以 Block 为单位进行。
pub type Block = [u8; BLOCK_SIZE];

/// 全零块，用于释放时清空内容
pub const ZERO_BLOCK: Block = [0; BLOCK_SIZE];
