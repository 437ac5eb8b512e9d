//! Dump text round trips and block-level fragmentation.
//!
//! ```text
//! bytes ──render──> dump lines ──scan──> blocks ──assemble──> bytes'
//!                                                   bytes == bytes'
//! ```

use flightcheck_core::{
    BlockFilter, DecodeSession, DumpFormat, HexDumpScanner, Marker, SessionConfig, assemble,
};
use flightcheck_proto::HandshakeMessage;
use proptest::prelude::*;

const CRYPTO_MARKER: &str = "I00000001 0x9f1c Ordered CRYPTO data in Handshake crypto level";
const READ_MARKER: &str = "read from 0x5581 [0x5582] (16384 bytes => 16384 (0x4000))";

fn arb_format() -> impl Strategy<Value = (DumpFormat, Marker, &'static str)> {
    prop_oneof![
        Just((DumpFormat::CANONICAL, Marker::CryptoData, CRYPTO_MARKER)),
        Just((DumpFormat::OPENSSL, Marker::BioTrace, READ_MARKER)),
    ]
}

/// Bytes with long runs, so `*` rows show up in canonical dumps.
fn arb_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec((any::<u8>(), 1usize..40), 0..24)
        .prop_map(|runs| runs.into_iter().flat_map(|(byte, n)| std::iter::repeat_n(byte, n)).collect())
}

fn render_blocks(format: DumpFormat, marker: &str, chunks: &[&[u8]]) -> Vec<String> {
    let mut lines = vec!["client starting".to_owned()];
    for chunk in chunks {
        lines.push(marker.to_owned());
        lines.extend(format.render(chunk));
        lines.push("t=0.001 packet processed".to_owned());
    }
    lines
}

fn split<'a>(bytes: &'a [u8], cuts: &[usize]) -> Vec<&'a [u8]> {
    let mut points: Vec<usize> =
        cuts.iter().map(|cut| if bytes.is_empty() { 0 } else { cut % bytes.len() }).collect();
    points.push(0);
    points.push(bytes.len());
    points.sort_unstable();
    points.dedup();
    points.windows(2).map(|w| &bytes[w[0]..w[1]]).collect()
}

proptest! {
    #[test]
    fn rendered_dump_decodes_to_same_bytes(
        (format, marker, header) in arb_format(),
        bytes in arb_bytes(),
    ) {
        let lines = render_blocks(format, header, &[&bytes]);
        let blocks: Vec<_> = HexDumpScanner::new(&lines, marker, format)
            .collect::<Result<_, _>>()
            .unwrap();

        prop_assert_eq!(blocks.len(), 1);
        prop_assert_eq!(blocks[0].data.as_ref(), bytes.as_slice());
    }

    #[test]
    fn block_boundaries_do_not_matter(
        (format, marker, header) in arb_format(),
        bytes in arb_bytes(),
        cuts in prop::collection::vec(any::<usize>(), 0..8),
    ) {
        let chunks = split(&bytes, &cuts);
        let lines = render_blocks(format, header, &chunks);
        let blocks: Vec<_> = HexDumpScanner::new(&lines, marker, format)
            .collect::<Result<_, _>>()
            .unwrap();

        let assembled = assemble(&blocks, &BlockFilter::All);
        prop_assert_eq!(blocks.len(), chunks.len());
        prop_assert_eq!(assembled.as_ref(), bytes.as_slice());
    }

    #[test]
    fn handshake_split_across_crypto_blocks(
        bodies in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..200), 1..6),
        cuts in prop::collection::vec(any::<usize>(), 0..8),
    ) {
        let messages: Vec<HandshakeMessage> =
            bodies.iter().map(|body| HandshakeMessage::new(11, body.clone())).collect();
        let bytes: Vec<u8> = messages.iter().flat_map(HandshakeMessage::to_bytes).collect();

        let lines = render_blocks(DumpFormat::CANONICAL, CRYPTO_MARKER, &split(&bytes, &cuts));
        let session = DecodeSession::new(lines, SessionConfig::quic_crypto());
        let sequence = session.handshake().unwrap();

        prop_assert_eq!(sequence.as_slice(), messages.as_slice());
    }
}
