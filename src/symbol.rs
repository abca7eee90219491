use slotmap::DefaultKey;
use std::fmt;

/// Stable identifier of a rule, assigned monotonically at creation.
///
/// Ids are never reused, so a `RuleId` observed by a renderer stays valid for
/// the rule's whole lifetime and the digram index can key on it safely.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct RuleId(pub(crate) u64);

impl RuleId {
    /// The raw id value.
    #[inline]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

/// Opaque handle to one symbol in the grammar.
///
/// Obtained from [`RuleSymbols`](crate::RuleSymbols); invalidated by the next
/// call to [`Sequitur::push`](crate::Sequitur::push).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct SymbolHandle(pub(crate) DefaultKey);

/// Public classification of a symbol, as seen by renderers.
///
/// Guards are sentinels and never surface through the public iterators.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SymbolKind {
    Terminal,
    NonTerminal,
}

/// Symbol variants in the grammar.
///
/// A three-way tagged variant instead of a class hierarchy: terminals carry
/// an input value, non-terminals reference the rule they stand for, and each
/// rule has exactly one guard closing its circular body list. Only the guard
/// knows its *owning* rule; a non-terminal's id names the *referenced* rule.
#[derive(Debug, Clone)]
pub(crate) enum Symbol<T> {
    /// A terminal carrying an input value.
    Terminal(T),

    /// A non-terminal referencing a rule.
    NonTerminal { rule: RuleId },

    /// The sentinel closing a rule's circular list.
    Guard { rule: RuleId },
}

impl<T> Symbol<T> {
    #[inline]
    pub(crate) fn is_guard(&self) -> bool {
        matches!(self, Symbol::Guard { .. })
    }
}

/// A node in a rule's circular doubly-linked list.
///
/// Lives in the engine's slotmap arena; `prev`/`next` are generational keys
/// into the same arena, never null. A symbol belongs to exactly one rule at a
/// time, and the list is circular through the rule's guard, so a freshly
/// created guard links to itself.
#[derive(Debug)]
pub(crate) struct SymbolNode<T> {
    pub symbol: Symbol<T>,
    pub prev: DefaultKey,
    pub next: DefaultKey,
}

/// Half of a digram key: the stable fingerprint of one symbol.
///
/// Terminals fingerprint by value, non-terminals by the referenced rule's
/// unique id. Guards have no fingerprint; they never take part in a digram.
#[derive(Clone, Hash, Eq, PartialEq, Debug)]
pub(crate) enum Fingerprint<T> {
    Terminal(T),
    Rule(RuleId),
}

impl<T: Clone> Fingerprint<T> {
    /// Fingerprint of a symbol. Guards are a caller error.
    pub(crate) fn of(symbol: &Symbol<T>) -> Self {
        match symbol {
            Symbol::Terminal(v) => Fingerprint::Terminal(v.clone()),
            Symbol::NonTerminal { rule } => Fingerprint::Rule(*rule),
            Symbol::Guard { .. } => panic!("guards have no digram fingerprint"),
        }
    }
}
