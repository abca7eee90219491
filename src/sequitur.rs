use crate::grammar::Grammar;
use crate::symbol::{RuleId, Symbol, SymbolHandle, SymbolKind};
use std::hash::Hash;

/// Online Sequitur engine.
///
/// Terminals are appended one at a time; after every append the grammar
/// satisfies digram uniqueness (no digram occurs twice, save the overlapping
/// centre of a triple) and rule utility (every rule besides the start rule is
/// referenced at least twice). The whole update is sequential and completes
/// before [`push`](Self::push) returns, so the grammar read through
/// [`start_rule`](Self::start_rule) and friends is always consistent.
///
/// # Example
///
/// ```
/// use sequitur_core::Sequitur;
///
/// let mut seq = Sequitur::new();
/// seq.extend("abcabcabc".chars());
///
/// // Reconstructs the original sequence
/// let reconstructed: String = seq.iter().collect();
/// assert_eq!(reconstructed, "abcabcabc");
///
/// println!("Created {} rules", seq.rule_count());
/// ```
pub struct Sequitur<T> {
    /// Grammar storage and the mutation protocol.
    pub(crate) grammar: Grammar<T>,

    /// The start rule deriving the entire input.
    root: RuleId,

    /// Number of terminals appended.
    length: usize,
}

impl<T: Hash + Eq + Clone> Sequitur<T> {
    /// Creates an engine whose start rule is empty.
    pub fn new() -> Self {
        let mut grammar = Grammar::new();
        let root = grammar.new_rule();
        debug_assert_eq!(root.as_u64(), 0, "start rule should have id 0");

        Self {
            grammar,
            root,
            length: 0,
        }
    }

    /// Appends one terminal to the sequence.
    ///
    /// Splices a fresh symbol onto the tail of the start rule, then offers
    /// the digram it forms with its left neighbour to the index. All rule
    /// rewriting cascades from that one check.
    pub fn push(&mut self, value: T) {
        let key = self.grammar.push_back(self.root, Symbol::Terminal(value));
        self.length += 1;

        let prev = self.grammar.symbols[key].prev;
        self.grammar.check_digram(prev);
    }

    /// Appends every terminal the iterator yields, in order.
    pub fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }

    /// Number of terminals appended so far.
    pub fn len(&self) -> usize {
        self.length
    }

    /// True if no terminals have been appended.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    // ========================================================================
    // Renderer surface
    // ========================================================================

    /// Handle to the start rule S₀.
    pub fn start_rule(&self) -> RuleId {
        self.root
    }

    /// All live rules, in no particular order.
    pub fn rules(&self) -> impl Iterator<Item = RuleId> + '_ {
        self.grammar.rules.keys().copied()
    }

    /// Number of live rules, the start rule included.
    pub fn rule_count(&self) -> usize {
        self.grammar.rules.len()
    }

    /// How many non-terminals reference `rule`. Zero for the start rule.
    ///
    /// # Panics
    ///
    /// Panics if `rule` is not a live rule of this grammar.
    pub fn ref_count(&self, rule: RuleId) -> u32 {
        self.grammar.rules[&rule].refs
    }

    /// The kind of the symbol behind `sym`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale (a `push` happened since it was read).
    pub fn symbol_kind(&self, sym: SymbolHandle) -> SymbolKind {
        match self.grammar.symbols[sym.0].symbol {
            Symbol::Terminal(_) => SymbolKind::Terminal,
            Symbol::NonTerminal { .. } => SymbolKind::NonTerminal,
            Symbol::Guard { .. } => unreachable!("guards are never handed out"),
        }
    }

    /// The terminal value behind `sym`, or `None` for a non-terminal.
    pub fn terminal_of(&self, sym: SymbolHandle) -> Option<&T> {
        match &self.grammar.symbols[sym.0].symbol {
            Symbol::Terminal(v) => Some(v),
            _ => None,
        }
    }

    /// The rule referenced by `sym`, or `None` for a terminal.
    pub fn rule_of(&self, sym: SymbolHandle) -> Option<RuleId> {
        match self.grammar.symbols[sym.0].symbol {
            Symbol::NonTerminal { rule } => Some(rule),
            _ => None,
        }
    }

    /// Grammar statistics for the current state.
    pub fn stats(&self) -> GrammarStats {
        let mut body_symbols = 0;
        for rec in self.grammar.rules.values() {
            let mut cur = self.grammar.symbols[rec.guard].next;
            while cur != rec.guard {
                body_symbols += 1;
                cur = self.grammar.symbols[cur].next;
            }
        }

        GrammarStats {
            input_len: self.length,
            body_symbols,
            rule_count: self.grammar.rules.len(),
        }
    }
}

impl<T: Hash + Eq + Clone> Default for Sequitur<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Size of the grammar relative to its input.
#[derive(Debug, Clone, Copy)]
pub struct GrammarStats {
    /// Terminals appended so far.
    pub input_len: usize,
    /// Symbols across all rule bodies, guards excluded.
    pub body_symbols: usize,
    /// Live rules, the start rule included.
    pub rule_count: usize,
}

impl GrammarStats {
    /// Grammar size as a percentage of the input size.
    pub fn compression_ratio(&self) -> f64 {
        if self.input_len == 0 {
            0.0
        } else {
            (self.body_symbols as f64 / self.input_len as f64) * 100.0
        }
    }
}
