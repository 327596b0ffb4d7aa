use std::collections::HashSet;

use proptest::prelude::*;
use fgk_rust::fgk::{self, CodecConfig, FgkDecoder, FgkEncoder, END_OF_TEXT};

fn payload() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        proptest::collection::vec(any::<u8>().prop_filter("sentinel", |&b| b != END_OF_TEXT), 0..512),
        // Few distinct symbols exercise the exchanges much more than uniform bytes do.
        proptest::collection::vec(prop_oneof![Just(b'a'), Just(b'b'), Just(b'c'), Just(b'd')], 0..512),
    ]
}

proptest! {
    #[test]
    fn compressed_payloads_decompress_unchanged(payload in payload()) {
        let config = CodecConfig::default();

        let compressed = fgk::compress(&payload, &config).expect("payload has no sentinel");
        let decoded = fgk::decompress(&compressed, &config).expect("stream is well formed");

        prop_assert_eq!(decoded, payload);
    }

    #[test]
    fn any_free_byte_works_as_sentinel(payload in payload(), sentinel in any::<u8>()) {
        prop_assume!(!payload.contains(&sentinel));
        let config = CodecConfig { sentinel, verify_invariants: true };

        let compressed = fgk::compress(&payload, &config).expect("payload has no sentinel");

        prop_assert_eq!(fgk::decompress(&compressed, &config).expect("stream is well formed"), payload);
    }

    #[test]
    fn encoder_and_decoder_trees_stay_identical(payload in payload()) {
        let mut encoder = FgkEncoder::new();
        let mut snapshots = Vec::with_capacity(payload.len());

        for &symbol in &payload {
            encoder.encode_symbol(symbol).expect("symbol is encodable");
            snapshots.push(encoder.tree().clone());
        }
        encoder.encode_symbol(END_OF_TEXT).expect("sentinel is encodable");

        let mut decoder = FgkDecoder::new(encoder.finish().os, END_OF_TEXT);

        for (expected, snapshot) in payload.iter().zip(&snapshots) {
            prop_assert_eq!(decoder.decode_symbol().expect("symbol decodes"), Some(*expected));
            prop_assert_eq!(decoder.tree(), snapshot);
        }
        prop_assert_eq!(decoder.decode_symbol().expect("sentinel decodes"), None);
    }

    #[test]
    fn every_update_preserves_the_invariants(payload in payload()) {
        let mut encoder = FgkEncoder::new();

        for (i, &symbol) in payload.iter().enumerate() {
            encoder.encode_symbol(symbol).expect("symbol is encodable");

            let tree = encoder.tree();
            prop_assert!(tree.check_invariants().is_ok(), "{:?}", tree.check_invariants());
            prop_assert_eq!(tree.total_weight(), i as u64 + 1);

            let ranks: HashSet<_> = tree.nodes().iter().map(|node| node.rank()).collect();
            prop_assert_eq!(ranks.len(), tree.num_nodes());
            prop_assert_eq!(tree.num_nodes(), 2 * encoder.symbols().len() + 1);
        }
    }

    #[test]
    fn codewords_are_prefix_free(payload in payload()) {
        let mut encoder = FgkEncoder::new();
        for &symbol in &payload {
            encoder.encode_symbol(symbol).expect("symbol is encodable");
        }

        let tree = encoder.tree();
        let mut codes: Vec<Vec<bool>> = (0..=255u8)
            .filter_map(|symbol| encoder.symbols().get(symbol))
            .chain(std::iter::once(tree.not_yet_seen()))
            .map(|leaf| tree.code_path(leaf).expect("leaf has a path"))
            .collect();
        codes.sort();

        for pair in codes.windows(2) {
            prop_assert!(!pair[1].starts_with(&pair[0]), "{:?} prefixes {:?}", pair[0], pair[1]);
        }
    }
}
