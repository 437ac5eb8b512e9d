//! Dump-line formats.
//!
//! A dump row is an offset field, a fixed number of two-hex-digit byte
//! columns, and a printable rendering of the same bytes. The layout is a
//! property of the tool that printed it, so it is configuration rather than
//! protocol:
//!
//! ```text
//! CANONICAL (hexdump -C, ngtcp2 examples)
//! 00000000  16 03 01 00 f4 01 00 00  f0 03 03 5b 3a 1d 9e 4a  |...........[:..J|
//! *
//! 00000040
//!
//! OPENSSL (BIO_dump, `s_client -debug`)
//! 0000 - 16 03 01 00 f4 01 00 00-f0 03 03 5b 3a 1d 9e 4a   ...........[:..J
//! ```
//!
//! Byte columns are located by position, never by splitting on whitespace, so
//! hex-looking characters in the rendering column are never mistaken for data.

/// Default block size limit: one maximal handshake message plus its header.
pub const MAX_BLOCK_LEN: usize = 0x0100_0004;

/// Rendering conventions that differ between dump tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpStyle {
    /// `hexdump -C`: extra space between groups, `|ascii|` column, `*` for
    /// repeated rows, bare offset row at the end
    Canonical,
    /// OpenSSL `BIO_dump`: `-` between groups, rendering after three spaces
    OpenSsl,
}

/// Layout of one dump line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpFormat {
    /// Hex digits in the offset field
    pub offset_digits: usize,
    /// Text between the offset field and the first byte column
    pub offset_separator: &'static str,
    /// Byte columns in a full row
    pub columns: usize,
    /// Columns per group (0 for no grouping)
    pub group: usize,
    /// Tool conventions
    pub style: DumpStyle,
    /// Largest block a scanner will decode, after `*` expansion
    pub max_block_len: usize,
}

impl DumpFormat {
    /// `hexdump -C` layout, as printed by the ngtcp2 example clients.
    pub const CANONICAL: Self = Self {
        offset_digits: 8,
        offset_separator: "  ",
        columns: 16,
        group: 8,
        style: DumpStyle::Canonical,
        max_block_len: MAX_BLOCK_LEN,
    };

    /// OpenSSL `BIO_dump` layout, as printed by `s_client -debug`.
    pub const OPENSSL: Self = Self {
        offset_digits: 4,
        offset_separator: " - ",
        columns: 16,
        group: 8,
        style: DumpStyle::OpenSsl,
        max_block_len: MAX_BLOCK_LEN,
    };

    /// Classify one line and decode its byte columns.
    ///
    /// Lines that do not have the dump shape are [`LineShape::NotDump`]. A
    /// line with the shape but a malformed byte column is an error.
    pub fn parse_line(&self, line: &str) -> Result<LineShape, InvalidCell> {
        let line = line.trim_end_matches(['\r', '\n']).as_bytes();

        if self.style == DumpStyle::Canonical && line == b"*" {
            return Ok(LineShape::Repeat);
        }

        let Some(offset) = self.parse_offset(line) else {
            return Ok(LineShape::NotDump);
        };
        let rest = &line[self.offset_digits..];

        if rest.is_empty() {
            return Ok(match self.style {
                DumpStyle::Canonical => LineShape::Row(DumpRow { offset, bytes: Vec::new() }),
                DumpStyle::OpenSsl => LineShape::NotDump,
            });
        }

        let Some(cells) = rest.strip_prefix(self.offset_separator.as_bytes()) else {
            return Ok(LineShape::NotDump);
        };

        Ok(LineShape::Row(DumpRow { offset, bytes: self.parse_cells(cells)? }))
    }

    fn parse_offset(&self, line: &[u8]) -> Option<usize> {
        let digits = line.get(..self.offset_digits)?;
        if digits.is_empty() || !digits.iter().all(u8::is_ascii_hexdigit) {
            return None;
        }
        let digits = std::str::from_utf8(digits).ok()?;
        usize::from_str_radix(digits, 16).ok()
    }

    fn parse_cells(&self, cells: &[u8]) -> Result<Vec<u8>, InvalidCell> {
        let mut bytes = Vec::with_capacity(self.columns);

        for column in 0..self.columns {
            let pos = self.cell_position(column);
            let Some(cell) = cells.get(pos..) else {
                break;
            };
            let cell = &cell[..cell.len().min(2)];

            if cell.is_empty() || cell.iter().all(|b| *b == b' ') {
                break;
            }

            let invalid = || InvalidCell { column, token: String::from_utf8_lossy(cell).into_owned() };
            let mut byte = [0u8; 1];
            if cell.len() < 2 || hex::decode_to_slice(cell, &mut byte).is_err() {
                return Err(invalid());
            }
            if cells.get(pos + 2).is_some_and(|sep| *sep != b' ' && *sep != b'-') {
                return Err(invalid());
            }
            bytes.push(byte[0]);
        }

        Ok(bytes)
    }

    fn cell_position(&self, column: usize) -> usize {
        let gap = match self.style {
            DumpStyle::Canonical if self.group > 0 => column / self.group,
            _ => 0,
        };
        column * 3 + gap
    }

    /// Render `bytes` the way the emitting tool would.
    pub fn render(&self, bytes: &[u8]) -> Vec<String> {
        let columns = self.columns.max(1);
        let mut lines = Vec::new();
        let mut previous: Option<&[u8]> = None;
        let mut squeezing = false;

        for (index, row) in bytes.chunks(columns).enumerate() {
            let repeated = row.len() == columns && previous == Some(row);
            if self.style == DumpStyle::Canonical && repeated {
                if !squeezing {
                    lines.push("*".to_owned());
                    squeezing = true;
                }
                continue;
            }
            squeezing = false;
            previous = Some(row);
            lines.push(self.render_row(index * columns, row));
        }

        if self.style == DumpStyle::Canonical && !bytes.is_empty() {
            lines.push(format!("{:0width$x}", bytes.len(), width = self.offset_digits));
        }
        lines
    }

    fn render_row(&self, offset: usize, row: &[u8]) -> String {
        let mut line =
            format!("{offset:0width$x}{}", self.offset_separator, width = self.offset_digits);

        for column in 0..self.columns {
            let byte = row.get(column);
            match byte {
                Some(byte) => line.push_str(&hex::encode([*byte])),
                None => line.push_str("  "),
            }
            let boundary =
                self.group > 0 && (column + 1) % self.group == 0 && column + 1 < self.columns;
            match self.style {
                DumpStyle::Canonical => {
                    line.push(' ');
                    if boundary {
                        line.push(' ');
                    }
                },
                DumpStyle::OpenSsl => line.push(if boundary && byte.is_some() { '-' } else { ' ' }),
            }
        }

        let printable: String =
            row.iter().map(|b| if (b' '..=b'~').contains(b) { char::from(*b) } else { '.' }).collect();
        match self.style {
            DumpStyle::Canonical => {
                line.push_str(" |");
                line.push_str(&printable);
                line.push('|');
            },
            DumpStyle::OpenSsl => {
                line.push_str("  ");
                line.push_str(&printable);
            },
        }
        line
    }
}

impl Default for DumpFormat {
    fn default() -> Self {
        Self::CANONICAL
    }
}

/// One decoded dump row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpRow {
    /// Offset printed on the row
    pub offset: usize,
    /// Decoded byte columns (fewer than a full row on the last line)
    pub bytes: Vec<u8>,
}

/// Result of classifying one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineShape {
    /// Not a dump line; ends the current block
    NotDump,
    /// `*`: previous row repeats up to the next row's offset
    Repeat,
    /// Offset plus byte columns
    Row(DumpRow),
}

/// A byte column that is not two hex digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidCell {
    /// 0-based column
    pub column: usize,
    /// Offending text
    pub token: String,
}
