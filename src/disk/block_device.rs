use crate::{
    disk::{bitmap::BlockBitmap, types::Block},
    fs::error::Result,
};

/// 块设备：按块读写，并维护唯一的空闲/占用位图。
///
/// 设备不了解文件，所有越界访问返回 `OutOfRange`。
pub trait BlockDevice {
    fn read_block(&self, block_id: usize, buf: &mut Block) -> Result<()>;
    fn write_block(&mut self, block_id: usize, buf: &Block) -> Result<()>;

    /// 更新位图中的一位
    fn set_used(&mut self, block_id: usize, used: bool) -> Result<()>;
    fn is_used(&self, block_id: usize) -> Result<bool>;

    /// 位图的只读视图
    fn bitmap(&self) -> &BlockBitmap;

    fn free_count(&self) -> usize {
        self.bitmap().free_blocks()
    }
}
