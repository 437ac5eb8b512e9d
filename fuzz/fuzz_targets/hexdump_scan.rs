#![no_main]

use flightcheck_core::{DumpFormat, HexDumpScanner, Marker};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);

    for (format, marker) in
        [(DumpFormat::CANONICAL, Marker::CryptoData), (DumpFormat::OPENSSL, Marker::BioTrace)]
    {
        // Arbitrary text must never panic the scanner.
        for block in HexDumpScanner::new(text.lines(), marker.clone(), format) {
            if block.is_err() {
                break;
            }
        }

        // Rendered bytes always scan back to themselves.
        let mut lines = vec!["read from 0x1 [0x2] (0 bytes => 0 (0x0))".to_owned()];
        if format == DumpFormat::CANONICAL {
            lines[0] = "Ordered CRYPTO data in Initial crypto level".to_owned();
        }
        lines.extend(format.render(&data[..data.len().min(0xfff0)]));
        let blocks: Vec<_> = HexDumpScanner::new(&lines, marker, format).collect();
        assert_eq!(blocks.len(), 1);
        let block = blocks.into_iter().next().and_then(Result::ok);
        assert_eq!(block.map(|b| b.data.to_vec()), Some(data[..data.len().min(0xfff0)].to_vec()));
    }
});
