use chrono::{DateTime, Local};

pub fn current_timestamp() -> DateTime<Local> {
    Local::now()
}

pub fn format_timestamp(time: &DateTime<Local>) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// 可显示的 ASCII 字符（32..=126）
pub fn is_printable(byte: u8) -> bool {
    (0x20..0x7F).contains(&byte)
}

// 导出时视为文本的字节：可见字符或空白
fn is_text(byte: u8) -> bool {
    byte.is_ascii_graphic() || byte.is_ascii_whitespace()
}

/// 去掉块尾部的非文本字节（补零等），块内没有文本时返回空切片
pub fn trim_trailing_non_text(block: &[u8]) -> &[u8] {
    let end = block.iter().rposition(|&b| is_text(b)).map_or(0, |i| i + 1);
    &block[..end]
}

/// 只保留可显示字符
pub fn printable_text(bytes: &[u8]) -> String {
    bytes
        .iter()
        .filter(|&&b| is_printable(b))
        .map(|&b| b as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_padding_but_keeps_newlines() {
        assert_eq!(trim_trailing_non_text(b"hello\n\0\0\0"), b"hello\n");
        assert_eq!(trim_trailing_non_text(b"a\0b\0"), b"a\0b");
        assert_eq!(trim_trailing_non_text(b"\0\0\x01"), b"");
        assert_eq!(trim_trailing_non_text(b""), b"");
    }

    #[test]
    fn printable_text_drops_control_bytes() {
        assert_eq!(printable_text(b"line\none\t\0~"), "lineone~");
    }
}
