use thiserror::Error;

/// 文件系统错误类型
///
/// 所有错误都可恢复：报告给调用方后，系统仍可继续使用。
#[derive(Debug, Error)]
pub enum FileSystemError {
    #[error("Disk I/O error: {0}")]
    Io(#[from] std::io::Error), // 宿主机文件读写错误

    #[error("File is too large: {size} bytes (maximum is {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Insufficient disk space: {needed} free block(s) required")]
    InsufficientSpace { needed: usize },

    #[error("Block number is out of bounds: {0}")]
    OutOfRange(usize),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid allocation method: {0} (choose from: contiguous, chained, indexed)")]
    InvalidAllocationMethod(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("File system corrupted: {0}")]
    Corrupted(String), // 链表成环、指针越界等
}

/// 文件系统统一结果类型
pub type Result<T> = std::result::Result<T, FileSystemError>;
