//! Addressed hex/ASCII listing of a byte buffer.
//!
//! Each line covers 16 bytes:
//!
//! ```text
//! 0000: 48 65 6c 6c 6f 2c 20 77 6f 72 6c 64 21 0d 0a 00    Hello, world!...
//! ```
//!
//! The offset is 4 lower-case hex digits. A short final line pads each missing
//! byte slot with three spaces so the ASCII column stays aligned.

use std::fmt::Write;

/// Bytes per dump line.
pub const BYTES_PER_LINE: usize = 16;

/// Separator between the hex block and the ASCII block.
const COLUMN_GAP: &str = "    ";

/// Render `bytes` as a hex dump. Empty input yields an empty string.
pub fn format_dump(bytes: &[u8]) -> String {
    dump_lines(bytes).collect::<Vec<_>>().join("\n")
}

/// Iterate over the dump one line at a time.
pub fn dump_lines(bytes: &[u8]) -> impl Iterator<Item = String> + '_ {
    bytes
        .chunks(BYTES_PER_LINE)
        .enumerate()
        .map(|(i, chunk)| format_line(i * BYTES_PER_LINE, chunk))
}

/// Number of lines [`format_dump`] produces for a buffer of `len` bytes.
pub fn line_count(len: usize) -> usize {
    len.div_ceil(BYTES_PER_LINE)
}

fn format_line(offset: usize, chunk: &[u8]) -> String {
    let mut line = String::with_capacity(6 + BYTES_PER_LINE * 4 + COLUMN_GAP.len());

    // Offsets past 0xffff widen rather than wrap
    let _ = write!(line, "{:04x}: ", offset);

    for (i, byte) in chunk.iter().enumerate() {
        if i > 0 {
            line.push(' ');
        }
        let _ = write!(line, "{:02x}", byte);
    }
    for _ in chunk.len()..BYTES_PER_LINE {
        line.push_str("   ");
    }

    line.push_str(COLUMN_GAP);
    line.extend(chunk.iter().map(|&b| printable(b)));
    line
}

fn printable(byte: u8) -> char {
    if byte > 31 && byte < 127 {
        byte as char
    } else {
        '.'
    }
}
