//! Spell checking and suggestion with Hunspell-format dictionaries
//!
//! Load a dictionary pair, then query it:
//!
//! ```
//! use orthospell::Dictionary;
//!
//! let aff = "SFX S Y 1\nSFX S 0 s .\n";
//! let dic = "1\nword/S\n";
//! let dict = Dictionary::from_slice(aff, dic)?;
//!
//! assert!(dict.spell("words"));
//! assert!(!dict.spell("wort"));
//!
//! let mut corrections = Vec::new();
//! dict.suggest("wort", &mut corrections);
//! # Ok::<(), orthospell::dictionary::InitializeError>(())
//! ```

mod aff;
mod compound;
mod condition;
mod dic;
mod flag;
mod lookup;
mod suggest;
mod tables;
mod trie;

pub mod dictionary;

pub use dictionary::Dictionary;
