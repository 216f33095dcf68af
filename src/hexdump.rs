//! Hexdump Rendering
//!
//! Renders byte buffers as fixed-width offset/hex/ASCII rows so traffic
//! passing through the relay can be inspected in real time.

use std::fmt;
use std::sync::OnceLock;

use tracing::info;

/// Default number of bytes rendered per row
pub const DEFAULT_ROW_WIDTH: usize = 16;

static PRINTABLE_TABLE: OnceLock<[char; 256]> = OnceLock::new();

/// The printability table: one entry per byte value.
///
/// Printable bytes map to their own character, everything else maps to `.`.
/// A byte is printable when it is ASCII 0x20..=0x7E and not a backslash
/// (backslash has no single-character escaped form). Built once on first
/// use and shared read-only across all sessions.
pub fn printable_table() -> &'static [char; 256] {
    PRINTABLE_TABLE.get_or_init(|| {
        let mut table = ['.'; 256];
        for byte in 0x20..=0x7Eu8 {
            if byte != b'\\' {
                table[byte as usize] = byte as char;
            }
        }
        table
    })
}

/// One rendered hexdump row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpLine {
    offset: usize,
    bytes: Vec<u8>,
    width: usize,
}

impl DumpLine {
    /// Byte offset of the first byte in this row
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The raw bytes covered by this row
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hex column: two uppercase hex digits per byte, space-joined
    pub fn hex(&self) -> String {
        self.bytes
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// ASCII column: each byte through the printability table
    pub fn ascii(&self) -> String {
        let table = printable_table();
        self.bytes.iter().map(|&b| table[b as usize]).collect()
    }
}

impl fmt::Display for DumpLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The hex column is padded to width*3 regardless of how many bytes
        // this row holds, so all rows align.
        let hex_width = self.width * 3;
        write!(
            f,
            "{:04X} {:<hex_width$}  {}",
            self.offset,
            self.hex(),
            self.ascii()
        )
    }
}

/// Render `src` as a lazy sequence of hexdump rows, `width` bytes per row.
///
/// The iterator is finite and restartable; the last row may cover fewer
/// than `width` bytes. Pure function of its input.
pub fn hexdump(src: &[u8], width: usize) -> impl Iterator<Item = DumpLine> + '_ {
    src.chunks(width).enumerate().map(move |(i, chunk)| DumpLine {
        offset: i * width,
        bytes: chunk.to_vec(),
        width,
    })
}

/// Print a buffer as hexdump rows at the default width
pub fn dump(src: &[u8]) {
    for line in hexdump(src, DEFAULT_ROW_WIDTH) {
        info!("{}", line);
    }
}
