//! Tests for the two Prüfer decoders

use std::collections::HashSet;

use proptest::prelude::*;
use rstest::rstest;

use pruefer::domain::{
    encode, Decoder, DecoderKind, DegreeCountingDecoder, DomainError, ExclusionSetDecoder,
    LabeledTree, PrueferSequence,
};
use pruefer::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

/// Every sequence of length `n - 2` over `1..=n`, in lexicographic order.
fn all_sequences(n: usize) -> Vec<Vec<usize>> {
    let len = n - 2;
    let total = n.pow(len as u32);
    (0..total)
        .map(|mut code| {
            let mut labels = vec![0; len];
            for slot in labels.iter_mut().rev() {
                *slot = code % n + 1;
                code /= n;
            }
            labels
        })
        .collect()
}

#[rstest]
#[case(vec![], vec![(1, 2)])]
#[case(vec![1], vec![(1, 2), (1, 3)])]
#[case(vec![3], vec![(1, 3), (2, 3)])]
#[case(vec![1, 1], vec![(1, 2), (1, 3), (1, 4)])]
#[case(vec![4, 4, 4], vec![(1, 4), (2, 4), (3, 4), (4, 5)])]
#[case(vec![3, 3, 3, 3], vec![(1, 3), (2, 3), (3, 4), (3, 5), (3, 6)])]
#[case(
    vec![2, 3, 5, 5, 3, 7, 10, 8, 10],
    vec![(1, 2), (2, 3), (3, 5), (3, 7), (4, 5), (5, 6), (7, 10), (8, 9), (8, 10), (10, 11)]
)]
fn given_sequence_when_decoding_then_returns_canonical_tree(
    #[case] labels: Vec<usize>,
    #[case] edges: Vec<(usize, usize)>,
    #[values(DecoderKind::DegreeCounting, DecoderKind::ExclusionSet)] kind: DecoderKind,
) {
    // Arrange
    let expected = LabeledTree::from_edges(labels.len() + 2, edges);

    // Act
    let tree = kind.decoder().decode(&labels).unwrap();

    // Assert
    assert_eq!(tree, expected, "{} on {:?}", kind, labels);
}

#[rstest]
#[case(vec![0])]
#[case(vec![100])]
#[case(vec![1, 2, 5])]
#[case(vec![2, 0, 2])]
fn given_label_out_of_range_when_decoding_then_invalid_sequence(
    #[case] labels: Vec<usize>,
    #[values(DecoderKind::DegreeCounting, DecoderKind::ExclusionSet)] kind: DecoderKind,
) {
    // Act
    let err = kind.decoder().decode(&labels).unwrap_err();

    // Assert
    assert!(matches!(err, DomainError::LabelOutOfRange { .. }), "{err}");
    assert!(err.is_invalid_sequence());
}

#[test]
fn given_reference_example_when_decoding_then_spanning_tree_on_eleven_vertices() {
    // Arrange
    let labels = [2, 3, 5, 5, 3, 7, 10, 8, 10];

    // Act
    let tree = ExclusionSetDecoder.decode(&labels).unwrap();

    // Assert
    assert_eq!(tree.vertex_count(), 11);
    assert_eq!(tree.edge_count(), 10);
    assert!(tree.is_connected());
    assert!(tree.is_acyclic());
    let touched: HashSet<usize> = tree
        .edges()
        .iter()
        .flat_map(|e| [e.low(), e.high()])
        .collect();
    assert_eq!(touched, (1..=11).collect());
}

#[rstest]
#[case(2)]
#[case(3)]
#[case(4)]
#[case(5)]
#[case(6)]
#[case(7)]
fn given_all_sequences_when_decoding_with_both_then_identical_spanning_trees(#[case] n: usize) {
    for labels in all_sequences(n) {
        // Act
        let by_degree = DegreeCountingDecoder.decode(&labels).unwrap();
        let by_exclusion = ExclusionSetDecoder.decode(&labels).unwrap();

        // Assert
        assert_eq!(by_degree, by_exclusion, "decoders disagree on {:?}", labels);
        assert!(by_degree.is_spanning_tree(), "not a tree for {:?}", labels);
        assert_eq!(by_degree.edge_count(), n - 1);
    }
}

#[rstest]
#[case(4)]
#[case(5)]
#[case(6)]
fn given_all_sequences_when_decoding_then_every_labeled_tree_appears_once(#[case] n: usize) {
    // Act
    let trees: HashSet<LabeledTree> = all_sequences(n)
        .iter()
        .map(|labels| DegreeCountingDecoder.decode(labels).unwrap())
        .collect();

    // Assert: Cayley's formula, n^(n-2) distinct labeled trees
    assert_eq!(trees.len(), n.pow(n as u32 - 2));
}

/// In-range sequences of length 0..300, i.e. trees on up to 301 vertices.
fn valid_sequence() -> impl Strategy<Value = Vec<usize>> {
    (0usize..300).prop_flat_map(|len| prop::collection::vec(1..=len + 2, len))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn given_random_valid_sequence_when_decoding_then_oracles_agree_on_spanning_tree(
        labels in valid_sequence(),
    ) {
        let by_degree = DegreeCountingDecoder.decode(&labels).unwrap();
        let by_exclusion = ExclusionSetDecoder.decode(&labels).unwrap();

        prop_assert_eq!(&by_degree, &by_exclusion);
        prop_assert!(by_degree.is_spanning_tree());
        prop_assert_eq!(by_degree.vertex_count(), labels.len() + 2);
        let encoded = encode(&by_degree).unwrap();
        prop_assert_eq!(encoded.labels(), labels.as_slice());
    }

    #[test]
    fn given_label_above_range_when_decoding_then_both_reject(
        mut labels in valid_sequence().prop_filter("non-empty", |l| !l.is_empty()),
        position in any::<prop::sample::Index>(),
        excess in 1usize..1_000,
    ) {
        let at = position.index(labels.len());
        labels[at] = labels.len() + 2 + excess;

        for kind in DecoderKind::ALL {
            let err = kind.decoder().decode(&labels).unwrap_err();
            prop_assert!(
                matches!(err, DomainError::LabelOutOfRange { .. }),
                "{} accepted {:?}",
                kind,
                labels
            );
        }
    }
}

#[rstest]
#[case(2)]
#[case(5)]
#[case(6)]
fn given_decoded_tree_when_encoding_then_returns_original_sequence(#[case] n: usize) {
    for labels in all_sequences(n) {
        // Arrange
        let tree = DegreeCountingDecoder.decode(&labels).unwrap();

        // Act
        let sequence = encode(&tree).unwrap();

        // Assert
        assert_eq!(sequence.labels(), labels.as_slice());
    }
}

#[test]
fn given_same_input_when_decoding_repeatedly_then_identical_results() {
    // Arrange
    let labels = [6, 2, 2, 7, 1, 6];
    let first = DegreeCountingDecoder.decode(&labels).unwrap();

    // Act / Assert
    for _ in 0..50 {
        assert_eq!(DegreeCountingDecoder.decode(&labels).unwrap(), first);
        assert_eq!(ExclusionSetDecoder.decode(&labels).unwrap(), first);
    }
    assert_eq!(first.to_string(), first.clone().to_string());
}

#[test]
fn given_parsed_sequence_when_decoding_then_matches_raw_labels() {
    // Arrange
    let sequence: PrueferSequence = "[2, 3, 5, 5, 3, 7, 10, 8, 10]".parse().unwrap();

    // Act
    let tree = DegreeCountingDecoder.decode(sequence.labels()).unwrap();

    // Assert
    assert_eq!(tree.vertex_count(), sequence.vertex_count());
    assert_eq!(encode(&tree).unwrap(), sequence);
}

#[test]
fn given_long_path_sequence_when_decoding_then_handles_large_n() {
    // Arrange: [2, 3, ..., n-1] encodes the path 1 - 2 - ... - n
    let n = 10_000;
    let labels: Vec<usize> = (2..n).collect();

    // Act
    let by_degree = DegreeCountingDecoder.decode(&labels).unwrap();
    let by_exclusion = ExclusionSetDecoder.decode(&labels).unwrap();

    // Assert
    let path = LabeledTree::from_edges(n, (1..n).map(|v| (v, v + 1)));
    assert_eq!(by_degree, path);
    assert_eq!(by_exclusion, path);
}
