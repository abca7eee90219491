use crate::grammar::Grammar;
use crate::sequitur::Sequitur;
use crate::symbol::{RuleId, Symbol, SymbolHandle};
use slotmap::DefaultKey;
use std::hash::Hash;

/// Iterator reconstructing the original input by expanding rules.
///
/// Walks the start rule left to right, descending into every non-terminal
/// with an explicit stack and popping back out at each rule's guard. Yields
/// exactly the terminals that were appended, in order.
pub struct Terminals<'a, T> {
    grammar: &'a Grammar<T>,
    /// Next position to resolve; `None` once the start rule's guard is
    /// reached with an empty stack.
    next: Option<DefaultKey>,
    /// Non-terminal symbols whose expansion we are currently inside.
    stack: Vec<DefaultKey>,
}

impl<'a, T: Hash + Eq + Clone> Terminals<'a, T> {
    pub(crate) fn new(seq: &'a Sequitur<T>) -> Self {
        let grammar = &seq.grammar;
        let root_guard = grammar.guard_of(seq.start_rule());
        Self {
            grammar,
            next: Some(grammar.symbols[root_guard].next),
            stack: Vec::new(),
        }
    }
}

impl<'a, T: Hash + Eq + Clone> Iterator for Terminals<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let g = self.grammar;
        let mut cur = self.next?;

        loop {
            match &g.symbols[cur].symbol {
                Symbol::Terminal(v) => {
                    self.next = Some(g.symbols[cur].next);
                    return Some(v);
                }

                Symbol::NonTerminal { rule } => {
                    // Descend into the referenced rule's body.
                    self.stack.push(cur);
                    cur = g.symbols[g.guard_of(*rule)].next;
                }

                Symbol::Guard { .. } => match self.stack.pop() {
                    // End of a nested rule: resume after the reference.
                    Some(parent) => cur = g.symbols[parent].next,
                    // End of the start rule.
                    None => {
                        self.next = None;
                        return None;
                    }
                },
            }
        }
    }
}

/// Shallow, restartable walk over one rule's body, guards excluded.
///
/// Yields handles usable with [`Sequitur::symbol_kind`],
/// [`Sequitur::terminal_of`], and [`Sequitur::rule_of`] until the next
/// `push`.
pub struct RuleSymbols<'a, T> {
    grammar: &'a Grammar<T>,
    guard: DefaultKey,
    next: DefaultKey,
}

impl<'a, T: Hash + Eq + Clone> RuleSymbols<'a, T> {
    pub(crate) fn new(seq: &'a Sequitur<T>, rule: RuleId) -> Self {
        let grammar = &seq.grammar;
        let guard = grammar.guard_of(rule);
        Self {
            grammar,
            guard,
            next: grammar.symbols[guard].next,
        }
    }
}

impl<'a, T: Hash + Eq + Clone> Iterator for RuleSymbols<'a, T> {
    type Item = SymbolHandle;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next == self.guard {
            return None;
        }
        let key = self.next;
        self.next = self.grammar.symbols[key].next;
        Some(SymbolHandle(key))
    }
}

impl<T: Hash + Eq + Clone> Sequitur<T> {
    /// Iterates over the reconstructed input sequence.
    pub fn iter(&self) -> Terminals<'_, T> {
        Terminals::new(self)
    }

    /// Iterates over the symbols of `rule`'s body, in order.
    ///
    /// # Panics
    ///
    /// Panics if `rule` is not a live rule of this grammar.
    pub fn symbols_in(&self, rule: RuleId) -> RuleSymbols<'_, T> {
        RuleSymbols::new(self, rule)
    }
}

impl<'a, T: Hash + Eq + Clone> IntoIterator for &'a Sequitur<T> {
    type Item = &'a T;
    type IntoIter = Terminals<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
