//! # Sequitur - Online Grammar Induction
//!
//! An incremental implementation of the Sequitur algorithm: terminals arrive
//! one at a time, and the engine maintains a context-free grammar whose start
//! rule derives exactly the input seen so far, factoring every repeated
//! adjacent pair (digram) into its own rule.
//!
//! The grammar is kept consistent by two constraints, restored after every
//! appended terminal:
//! 1. **Digram Uniqueness**: no digram (pair of consecutive symbols) appears
//!    more than once, except the overlapping centre of a run of three
//!    identical symbols
//! 2. **Rule Utility**: every rule besides the start rule is used at least
//!    twice
//!
//! ## Example
//!
//! ```
//! use sequitur_core::Sequitur;
//!
//! let mut seq = Sequitur::new();
//! seq.extend("abcabcabc".chars());
//!
//! // Reconstructs the original sequence
//! let reconstructed: String = seq.iter().collect();
//! assert_eq!(reconstructed, "abcabcabc");
//!
//! println!("Created {} rules", seq.rule_count());
//! ```
//!
//! ## Inspecting the grammar
//!
//! Renderers walk the grammar through handles: [`Sequitur::start_rule`]
//! names S₀, [`Sequitur::symbols_in`] yields a rule's body in order, and
//! [`Sequitur::terminal_of`] / [`Sequitur::rule_of`] resolve each symbol.
//!
//! ```
//! use sequitur_core::{Sequitur, SymbolKind};
//!
//! let mut seq = Sequitur::new();
//! seq.extend("abab".chars());
//!
//! for handle in seq.symbols_in(seq.start_rule()) {
//!     assert_eq!(seq.symbol_kind(handle), SymbolKind::NonTerminal);
//! }
//! ```
//!
//! ## Performance
//!
//! - Amortised O(1) per appended terminal
//! - Grammar size grows sub-linearly for repetitive input
//! - Symbols live in a generational arena (SlotMap); no raw pointers

mod digram;
mod grammar;
mod iter;
mod sequitur;
mod symbol;

#[cfg(test)]
mod tests;

pub use iter::{RuleSymbols, Terminals};
pub use sequitur::{GrammarStats, Sequitur};
pub use symbol::{RuleId, SymbolHandle, SymbolKind};
