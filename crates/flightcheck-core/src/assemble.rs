//! Byte-stream assembly.

use bytes::{Bytes, BytesMut};

use crate::block::{BlockFilter, HexDumpBlock};

/// Concatenate the blocks `filter` accepts, in order.
pub fn assemble<'a>(blocks: impl IntoIterator<Item = &'a HexDumpBlock>, filter: &BlockFilter) -> Bytes {
    let mut buffer = BytesMut::new();
    for block in blocks.into_iter().filter(|block| filter.accepts(block)) {
        buffer.extend_from_slice(&block.data);
    }
    buffer.freeze()
}
