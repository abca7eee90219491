use crate::digram::{DigramIndex, DigramKey};
use crate::symbol::{Fingerprint, RuleId, Symbol, SymbolNode};
use ahash::AHashMap as HashMap;
use slotmap::{DefaultKey, SlotMap};
use std::hash::Hash;

/// Bookkeeping for one rule: its guard symbol and its reference count.
///
/// `refs` is the number of non-terminal symbols anywhere in the grammar that
/// reference this rule. The start rule keeps `refs == 0` for its lifetime.
#[derive(Debug)]
pub(crate) struct RuleRecord {
    pub guard: DefaultKey,
    pub refs: u32,
}

/// Grammar storage plus the Sequitur mutation protocol.
///
/// All symbols of all rules live in one slotmap arena; each rule is a
/// circular doubly-linked list of arena keys closed by its guard. The digram
/// index and the rule table are owned here, so every edit that can invalidate
/// an index entry runs next to the scrub that repairs it.
#[derive(Debug)]
pub(crate) struct Grammar<T> {
    pub symbols: SlotMap<DefaultKey, SymbolNode<T>>,
    pub digrams: DigramIndex<T>,
    pub rules: HashMap<RuleId, RuleRecord>,
    next_rule_id: u64,
}

impl<T: Hash + Eq + Clone> Grammar<T> {
    pub(crate) fn new() -> Self {
        Self {
            symbols: SlotMap::new(),
            digrams: DigramIndex::new(),
            rules: HashMap::default(),
            next_rule_id: 0,
        }
    }

    // ========================================================================
    // Rule and list plumbing
    // ========================================================================

    /// Allocates a rule with an empty body: a self-linked guard and no
    /// references. Ids are monotonic and never reused.
    pub(crate) fn new_rule(&mut self) -> RuleId {
        let id = RuleId(self.next_rule_id);
        self.next_rule_id += 1;

        let guard = self.symbols.insert_with_key(|k| SymbolNode {
            symbol: Symbol::Guard { rule: id },
            prev: k,
            next: k,
        });
        self.rules.insert(id, RuleRecord { guard, refs: 0 });
        id
    }

    #[inline]
    pub(crate) fn guard_of(&self, rule: RuleId) -> DefaultKey {
        self.rules[&rule].guard
    }

    #[inline]
    pub(crate) fn is_guard(&self, key: DefaultKey) -> bool {
        self.symbols[key].symbol.is_guard()
    }

    /// Appends `symbol` at the tail of `rule`'s body (just before the guard),
    /// bumping the referenced rule's count for non-terminals.
    pub(crate) fn push_back(&mut self, rule: RuleId, symbol: Symbol<T>) -> DefaultKey {
        if let Symbol::NonTerminal { rule: target } = &symbol {
            self.bump_refs(*target);
        }

        let guard = self.guard_of(rule);
        let last = self.symbols[guard].prev;
        let key = self.symbols.insert(SymbolNode {
            symbol,
            prev: last,
            next: guard,
        });
        self.symbols[last].next = key;
        self.symbols[guard].prev = key;
        key
    }

    #[inline]
    fn bump_refs(&mut self, rule: RuleId) {
        if let Some(rec) = self.rules.get_mut(&rule) {
            rec.refs += 1;
        }
    }

    /// Drops one reference held by `key` if it is a non-terminal. Rules are
    /// dissolved elsewhere; here the count only ever goes 2 → 1 or higher.
    #[inline]
    fn drop_refs_of(&mut self, key: DefaultKey) {
        if let Symbol::NonTerminal { rule } = self.symbols[key].symbol {
            if let Some(rec) = self.rules.get_mut(&rule) {
                debug_assert!(rec.refs > 0, "reference count underflow for {rule}");
                rec.refs -= 1;
            }
        }
    }

    /// Digram key starting at `first`, or `None` when either half is a guard.
    fn digram_key_at(&self, first: DefaultKey) -> Option<DigramKey<T>> {
        if self.is_guard(first) {
            return None;
        }
        let second = self.symbols[first].next;
        if self.is_guard(second) {
            return None;
        }
        Some((
            Fingerprint::of(&self.symbols[first].symbol),
            Fingerprint::of(&self.symbols[second].symbol),
        ))
    }

    /// Scrubs the index entry for the digram starting at `left`, but only if
    /// the entry still points there. No-op when the pair involves a guard.
    fn forget_digram(&mut self, left: DefaultKey) {
        if let Some(key) = self.digram_key_at(left) {
            self.digrams.remove_if(&key, left);
        }
    }

    // ========================================================================
    // The Sequitur loop
    // ========================================================================

    /// Enforces digram uniqueness for the digram starting at `first`.
    ///
    /// Returns `true` when the digram was already known to the index (a match
    /// was processed, or the occurrences overlap inside a run of identical
    /// symbols); `false` when a new entry was recorded or no digram exists
    /// here. Callers use the return value to decide whether the digram on the
    /// other side of a fresh symbol still needs checking.
    pub(crate) fn check_digram(&mut self, first: DefaultKey) -> bool {
        let Some(key) = self.digram_key_at(first) else {
            return false;
        };
        let second = self.symbols[first].next;

        let Some(other) = self.digrams.get(&key) else {
            self.digrams.insert(key, first);
            return false;
        };

        if other == first {
            // Already the recorded occurrence.
            return true;
        }
        if !self.symbols.contains_key(other) {
            // The entry outlived its symbol; repoint it here.
            self.digrams.insert(key, first);
            return false;
        }

        let other_second = self.symbols[other].next;
        if other_second == first || other == second {
            // Overlapping halves of a triple of identical symbols. The older
            // pair stays indexed; rewriting either would leave the run
            // unrepresentable.
            return true;
        }

        self.process_match(first, other);
        true
    }

    /// Resolves a repeated digram: the occurrence at `first` matches the
    /// recorded, disjoint occurrence at `older`.
    fn process_match(&mut self, first: DefaultKey, older: DefaultKey) {
        if let Some(rule) = self.whole_rule_body(older) {
            // The recorded occurrence is the entire body of an existing rule;
            // reuse it instead of minting a duplicate.
            let fresh = self.replace_with_ref(first, rule);
            self.recheck_neighbors(fresh);
            self.restore_utility(rule);
        } else {
            let rule = self.rule_from_digram(first);
            let at_older = self.replace_with_ref(older, rule);
            let at_first = self.replace_with_ref(first, rule);
            self.recheck_neighbors(at_older);
            self.recheck_neighbors(at_first);
            self.restore_utility(rule);
        }
    }

    /// If `first` and its successor make up the entire body of some rule,
    /// returns that rule.
    fn whole_rule_body(&self, first: DefaultKey) -> Option<RuleId> {
        let prev = self.symbols[first].prev;
        let Symbol::Guard { rule } = self.symbols[prev].symbol else {
            return None;
        };
        let second = self.symbols[first].next;
        if second != prev && self.symbols[second].next == prev {
            Some(rule)
        } else {
            None
        }
    }

    /// Allocates a rule whose body is a copy of the digram starting at
    /// `first`, and hands the index entry for that digram to the body copy.
    fn rule_from_digram(&mut self, first: DefaultKey) -> RuleId {
        let second = self.symbols[first].next;
        let first_sym = self.symbols[first].symbol.clone();
        let second_sym = self.symbols[second].symbol.clone();

        let rule = self.new_rule();
        let body_first = self.push_back(rule, first_sym);
        let body_second = self.push_back(rule, second_sym);

        // The body copy becomes the canonical occurrence of the digram.
        let key = (
            Fingerprint::of(&self.symbols[body_first].symbol),
            Fingerprint::of(&self.symbols[body_second].symbol),
        );
        self.digrams.insert(key, body_first);
        rule
    }

    /// Substitution: replaces the digram starting at `first` with a single
    /// non-terminal referencing `rule`. Returns the new symbol's key.
    ///
    /// The digrams the pair formed with its neighbours are scrubbed here; the
    /// pair's own index entry already points at `rule`'s body copy.
    fn replace_with_ref(&mut self, first: DefaultKey, rule: RuleId) -> DefaultKey {
        let second = self.symbols[first].next;
        debug_assert!(
            !self.is_guard(first) && !self.is_guard(second),
            "cannot substitute a guard"
        );

        let prev = self.symbols[first].prev;
        let after = self.symbols[second].next;

        self.forget_digram(prev);
        self.forget_digram(second);

        self.drop_refs_of(first);
        self.drop_refs_of(second);
        self.symbols.remove(first);
        self.symbols.remove(second);

        let fresh = self.symbols.insert(SymbolNode {
            symbol: Symbol::NonTerminal { rule },
            prev,
            next: after,
        });
        self.symbols[prev].next = fresh;
        self.symbols[after].prev = fresh;
        self.bump_refs(rule);
        fresh
    }

    /// Offers the digrams on both sides of a freshly inserted symbol to the
    /// index: the left one first, the right one only when the left check
    /// recorded a new entry. Checking the left side can cascade and delete
    /// `fresh`, so liveness is re-verified throughout.
    fn recheck_neighbors(&mut self, fresh: DefaultKey) {
        if !self.symbols.contains_key(fresh) {
            return;
        }
        let prev = self.symbols[fresh].prev;
        if self.check_digram(prev) {
            return;
        }
        if self.symbols.contains_key(fresh) {
            self.check_digram(fresh);
        }
    }

    /// Rule utility: after a substitution, any body symbol of `rule` whose
    /// own rule is down to a single use is expanded in place.
    ///
    /// Both keys are resolved before the first expansion runs; inlining the
    /// first symbol rewrites the body, and the symbol that lost a reference
    /// is the original second one, not whatever slid into its position.
    fn restore_utility(&mut self, rule: RuleId) {
        let Some(rec) = self.rules.get(&rule) else {
            return;
        };
        let guard = rec.guard;
        let first = self.symbols[guard].next;
        if first == guard {
            return;
        }
        let second = self.symbols[first].next;

        self.inline_if_single_use(first);
        if second != guard && self.symbols.contains_key(second) {
            self.inline_if_single_use(second);
        }
    }

    /// Expansion: if `key` is a non-terminal whose rule has exactly one
    /// remaining use, splices that rule's body in place of `key` and
    /// dissolves the rule, then offers the boundary digrams to the index.
    fn inline_if_single_use(&mut self, key: DefaultKey) {
        let Symbol::NonTerminal { rule } = self.symbols[key].symbol else {
            return;
        };
        let rec = &self.rules[&rule];
        debug_assert!(rec.refs > 0, "live reference to a dissolved rule {rule}");
        if rec.refs != 1 {
            return;
        }

        let guard = rec.guard;
        let first = self.symbols[guard].next;
        let last = self.symbols[guard].prev;
        debug_assert!(first != guard, "single-use rule {rule} has an empty body");

        let prev = self.symbols[key].prev;
        let after = self.symbols[key].next;

        self.forget_digram(prev);
        self.forget_digram(key);

        // Splice the body between the reference's former neighbours.
        self.symbols[prev].next = first;
        self.symbols[first].prev = prev;
        self.symbols[last].next = after;
        self.symbols[after].prev = last;

        self.symbols.remove(key);
        self.symbols.remove(guard);
        self.rules.remove(&rule);

        // The splice created boundary digrams on both sides; make sure
        // subsequent lookups see them.
        self.check_digram(prev);
        if self.symbols.contains_key(last) {
            self.check_digram(last);
        }
    }
}
