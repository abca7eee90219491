use super::invariants::{assert_grammar_invariants, canonical_form};
use crate::{Sequitur, SymbolKind};

fn grammar_of(input: &str) -> Sequitur<char> {
    let mut seq = Sequitur::new();
    seq.extend(input.chars());
    assert_grammar_invariants(&seq);

    let reconstructed: String = seq.iter().collect();
    assert_eq!(reconstructed, input, "round trip failed for {input:?}");
    seq
}

/// Grammar shape with rules renamed in discovery order; first line is S₀.
fn shape(input: &str) -> Vec<String> {
    canonical_form(&grammar_of(input), |c| c.to_string())
}

#[test]
fn empty_input_leaves_an_empty_start_rule() {
    let seq = grammar_of("");
    assert_eq!(seq.rule_count(), 1);
    assert_eq!(shape(""), vec![""]);
}

#[test]
fn single_terminal() {
    let seq = grammar_of("a");
    assert_eq!(seq.rule_count(), 1);
    assert_eq!(shape("a"), vec!["a"]);
}

#[test]
fn no_repetition_stays_flat() {
    let seq = grammar_of("abcd");
    assert_eq!(seq.rule_count(), 1);
    assert_eq!(shape("abcd"), vec!["a b c d"]);
}

#[test]
fn repeated_pair_in_context() {
    // `bc` repeats; everything else stays literal in S₀.
    assert_eq!(shape("abcdbc"), vec!["a A d A", "b c"]);
}

#[test]
fn classic_abcabd() {
    // After `abcab` the pair `ab` already repeats; the final `d` lands in S₀.
    assert_eq!(shape("abcabd"), vec!["A c A d", "a b"]);
}

#[test]
fn triple_of_identical_symbols_is_left_alone() {
    // The two `aa` pairs overlap; rewriting either would misrepresent the
    // run, so no rule forms.
    assert_eq!(shape("aaa"), vec!["a a a"]);
}

#[test]
fn run_of_four_pairs_up_once() {
    let seq = grammar_of("aaaa");
    assert_eq!(seq.rule_count(), 2, "no third rule for the overlap");
    assert_eq!(shape("aaaa"), vec!["A A", "a a"]);
}

#[test]
fn period_one_repetition_doubles_hierarchically() {
    assert_eq!(shape("aaaaaaaa"), vec!["A A", "B B", "a a"]);
}

#[test]
fn transient_two_symbol_rule_is_dissolved() {
    // `abcabcabc`: the intermediate `ab` rule forms and is expanded away
    // once the full `abc` period emerges.
    assert_eq!(shape("abcabcabc"), vec!["A A A", "a b c"]);
}

#[test]
fn alternating_pair() {
    assert_eq!(shape("abab"), vec!["A A", "a b"]);
}

#[test]
fn nested_periods_compose() {
    // `xyz` four times, `xyzxyz` twice, factored hierarchically.
    assert_eq!(shape("xyzxyzwxyzxyz"), vec!["A w A", "B B", "x y z"]);
}

#[test]
fn natural_text_keeps_every_rule_useful() {
    let seq = grammar_of("abracadabra");
    for rule in seq.rules() {
        if rule != seq.start_rule() {
            assert!(seq.ref_count(rule) >= 2);
        }
    }
}

#[test]
fn renderer_surface_walks_the_grammar() {
    let seq = grammar_of("abab");
    let root = seq.start_rule();

    let handles: Vec<_> = seq.symbols_in(root).collect();
    assert_eq!(handles.len(), 2);

    for handle in handles {
        assert_eq!(seq.symbol_kind(handle), SymbolKind::NonTerminal);
        assert_eq!(seq.terminal_of(handle), None);

        let rule = seq.rule_of(handle).expect("non-terminal resolves to a rule");
        assert_eq!(seq.ref_count(rule), 2);

        let body: Vec<char> = seq
            .symbols_in(rule)
            .map(|h| {
                assert_eq!(seq.symbol_kind(h), SymbolKind::Terminal);
                *seq.terminal_of(h).expect("terminal resolves to its value")
            })
            .collect();
        assert_eq!(body, vec!['a', 'b']);
    }
}

#[test]
fn rule_ids_are_stable_across_growth() {
    let mut seq = Sequitur::new();
    seq.extend("abab".chars());

    let rule = seq
        .rules()
        .find(|&r| r != seq.start_rule())
        .expect("abab creates one rule");

    // Growing the grammar must not renumber an existing rule.
    seq.extend("abab".chars());
    assert!(seq.rules().any(|r| r == rule));
    assert_grammar_invariants(&seq);
}

#[test]
fn longer_mixed_input_compresses() {
    let input = "the quick brown fox the quick brown fox jumps";
    let seq = grammar_of(input);

    let stats = seq.stats();
    assert_eq!(stats.input_len, input.len());
    assert!(
        stats.body_symbols < input.len(),
        "repetition should compress: {} symbols for {} terminals",
        stats.body_symbols,
        input.len()
    );
}
