//! Hex-dump scanner.
//!
//! # State machine
//!
//! ```text
//!            marker line
//! Searching ─────────────> Capturing ──┐ dump row / `*`
//!     ▲                        │  ▲    │
//!     │   non-dump line        │  └────┘
//!     └────────────────────────┘
//!       (emit block, line is re-examined as a marker)
//! ```
//!
//! The scanner is a single pass over one snapshot of lines. After an error it
//! yields nothing more; scanning again needs a fresh iterator.

use std::iter::{Enumerate, Peekable};

use bytes::BytesMut;
use tracing::{debug, trace};

use crate::{
    block::{BlockOrigin, HexDumpBlock},
    dump::{DumpFormat, LineShape},
    error::FormatError,
    marker::LeadingMarker,
};

/// Lazy iterator over the dump blocks in a line sequence.
pub struct HexDumpScanner<I: Iterator, M> {
    lines: Peekable<Enumerate<I>>,
    marker: M,
    format: DumpFormat,
    failed: bool,
}

impl<I, M> HexDumpScanner<I, M>
where
    I: Iterator,
    I::Item: AsRef<str>,
    M: LeadingMarker,
{
    /// Scanner over `lines`, opening a block after each line `marker` accepts.
    pub fn new<L>(lines: L, marker: M, format: DumpFormat) -> Self
    where
        L: IntoIterator<IntoIter = I>,
    {
        Self { lines: lines.into_iter().enumerate().peekable(), marker, format, failed: false }
    }

    fn capture(&mut self, line: usize, header: String) -> Result<HexDumpBlock, FormatError> {
        let mut data = BytesMut::new();
        let mut last_row: Vec<u8> = Vec::new();
        let mut pending_repeat: Option<usize> = None;

        while let Some((index, text)) = self.lines.peek() {
            let number = *index + 1;
            let shape = self.format.parse_line(text.as_ref()).map_err(|cell| {
                FormatError::InvalidByte { line: number, column: cell.column, token: cell.token }
            })?;

            let row = match shape {
                LineShape::NotDump => break,
                LineShape::Repeat => {
                    if last_row.is_empty() || pending_repeat.is_some() {
                        return Err(FormatError::DanglingRepeat { line: number });
                    }
                    pending_repeat = Some(number);
                    self.lines.next();
                    continue;
                },
                LineShape::Row(row) => row,
            };

            let limit = self.format.max_block_len;
            if let Some(repeat_line) = pending_repeat.take() {
                let gap = row.offset.checked_sub(data.len());
                if gap.is_none_or(|gap| gap % last_row.len() != 0) {
                    return Err(FormatError::DanglingRepeat { line: repeat_line });
                }
                if row.offset > limit {
                    return Err(FormatError::BlockTooLarge { line: number, limit });
                }
                while data.len() < row.offset {
                    data.extend_from_slice(&last_row);
                }
            }

            if row.offset != data.len() {
                return Err(FormatError::OffsetMismatch {
                    line: number,
                    expected: data.len(),
                    found: row.offset,
                });
            }

            if data.len() + row.bytes.len() > limit {
                return Err(FormatError::BlockTooLarge { line: number, limit });
            }

            trace!(line = number, bytes = row.bytes.len(), "dump row");
            data.extend_from_slice(&row.bytes);
            if !row.bytes.is_empty() {
                last_row = row.bytes;
            }
            self.lines.next();
        }

        if let Some(repeat_line) = pending_repeat {
            return Err(FormatError::DanglingRepeat { line: repeat_line });
        }

        let origin = BlockOrigin::from_header(&header);
        debug!(line, bytes = data.len(), ?origin, "dump block");
        Ok(HexDumpBlock { line, header, origin, data: data.freeze() })
    }
}

impl<I, M> Iterator for HexDumpScanner<I, M>
where
    I: Iterator,
    I::Item: AsRef<str>,
    M: LeadingMarker,
{
    type Item = Result<HexDumpBlock, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let (index, header) = loop {
            let (index, line) = self.lines.next()?;
            if self.marker.matches(line.as_ref()) {
                break (index, line.as_ref().to_owned());
            }
        };

        let block = self.capture(index + 1, header);
        if let Err(err) = &block {
            debug!(%err, "hex dump scan stopped");
            self.failed = true;
        }
        Some(block)
    }
}
