#![no_main]

use flightcheck_proto::{DecoderConfig, HandshakeDecoder, RecordPolicy, decode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    for config in [
        DecoderConfig::messages_only(),
        DecoderConfig::records(RecordPolicy::Strict),
        DecoderConfig::records(RecordPolicy::SkipNonHandshake),
    ] {
        let whole = decode(data, config);

        // Byte-at-a-time feeding must agree with the one-shot decode.
        let mut decoder = HandshakeDecoder::new(config);
        let mut pushed = Ok(());
        for byte in data {
            pushed = decoder.push(std::slice::from_ref(byte));
            if pushed.is_err() {
                break;
            }
        }
        let streamed = pushed.and_then(|()| decoder.finish());

        assert_eq!(whole, streamed);
        if let Ok(sequence) = whole {
            for message in &sequence {
                assert_eq!(message.length() as usize, message.body().len());
            }
        }
    }
});
