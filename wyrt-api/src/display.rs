//! 值的文本表示
//!
//! 只有 String 和 Int 有可读的形式，其它类型统一显示为 `Unknown`。

use std::io::{self, Write};
use wyrt_core::{Payload, Value};

/// 把值渲染为字符串
pub fn to_display_string(value: &Value) -> String {
    match value.payload() {
        Payload::String(text) => text.clone(),
        Payload::Int(n) => n.to_string(),
        _ => "Unknown".to_string(),
    }
}

/// 写出值和换行
pub fn write_line<W: Write>(out: &mut W, value: &Value) -> io::Result<()> {
    writeln!(out, "{}", to_display_string(value))
}

/// 打印到标准输出
pub fn println(value: &Value) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_line(&mut handle, value)
}
