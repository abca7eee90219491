use super::invariants::{assert_grammar_invariants, canonical_form};
use crate::Sequitur;
use proptest::prelude::*;

/// Random strings over a small alphabet; repetition-dense input exercises the
/// cascade paths far harder than uniform bytes do.
fn small_alphabet(len: usize) -> impl Strategy<Value = Vec<char>> {
    prop::collection::vec(prop::sample::select(vec!['a', 'b', 'c']), 0..len)
}

proptest! {
    /// The grammar invariants hold after every single append, not just at
    /// the end, and every prefix reconstructs exactly.
    #[test]
    fn invariants_hold_after_every_prefix(input in small_alphabet(100)) {
        let mut seq = Sequitur::new();
        for (i, &c) in input.iter().enumerate() {
            seq.push(c);
            assert_grammar_invariants(&seq);

            let expanded: Vec<char> = seq.iter().copied().collect();
            prop_assert_eq!(&expanded[..], &input[..=i]);
        }
    }

    /// Round-trip fidelity: expansion of the start rule is the input.
    #[test]
    fn roundtrip(input: Vec<u8>) {
        let mut seq = Sequitur::new();
        seq.extend(input.iter().copied());

        let reconstructed: Vec<u8> = seq.iter().copied().collect();
        prop_assert_eq!(reconstructed, input);
        assert_grammar_invariants(&seq);
    }

    /// The iterator yields exactly as many items as were appended.
    #[test]
    fn length_preserved(input: Vec<u8>) {
        let mut seq = Sequitur::new();
        seq.extend(input.iter().copied());

        prop_assert_eq!(seq.iter().count(), input.len());
        prop_assert_eq!(seq.len(), input.len());
    }

    /// One push at a time and bulk extend build the same grammar.
    #[test]
    fn incremental_equivalence(input in small_alphabet(60)) {
        let mut bulk = Sequitur::new();
        bulk.extend(input.iter().copied());

        let mut stepped = Sequitur::new();
        for &c in &input {
            stepped.push(c);
        }

        let render = |c: &char| c.to_string();
        prop_assert_eq!(
            canonical_form(&bulk, render),
            canonical_form(&stepped, render)
        );
    }

    /// Determinism: equal inputs give isomorphic grammars.
    #[test]
    fn equal_inputs_isomorphic_grammars(input in small_alphabet(80)) {
        let mut first = Sequitur::new();
        first.extend(input.iter().copied());
        let mut second = Sequitur::new();
        second.extend(input.iter().copied());

        let render = |c: &char| c.to_string();
        prop_assert_eq!(
            canonical_form(&first, render),
            canonical_form(&second, render)
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Longer runs over a two-symbol alphabet: maximal rule churn.
    #[test]
    fn long_binary_input(input in prop::collection::vec(prop::bool::ANY, 0..2000)) {
        let mut seq = Sequitur::new();
        seq.extend(input.iter().copied());

        assert_grammar_invariants(&seq);
        let reconstructed: Vec<bool> = seq.iter().copied().collect();
        prop_assert_eq!(reconstructed, input);
    }
}

/// Bolero fuzz: no panics, and the round trip survives arbitrary bytes.
#[test]
fn fuzz_no_panic() {
    bolero::check!().with_type::<Vec<u8>>().for_each(|input| {
        let mut seq = Sequitur::new();
        seq.extend(input.iter().copied());

        let _ = seq.len();
        let _ = seq.is_empty();
        let reconstructed: Vec<u8> = seq.iter().copied().collect();
        assert_eq!(reconstructed, *input);
    });
}

/// Bolero fuzz: every invariant holds on arbitrary input.
#[test]
fn fuzz_invariants() {
    bolero::check!().with_type::<Vec<u8>>().for_each(|input| {
        let mut seq = Sequitur::new();
        seq.extend(input.iter().copied());
        assert_grammar_invariants(&seq);
    });
}
