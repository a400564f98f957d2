//! High level interface to query dictionary pairs
//!
//! Entrypoint methods are
//! - [`Dictionary::spell`]: checks whether a word is spelled correctly
//! - [`Dictionary::suggest`]: collects corrections for a misspelled word

use crate::aff::AffFile;
use crate::dic::DicFile;
use std::{io, path::Path};

/// Maximum input length in characters. Longer inputs are rejected as
/// misspelled without invoking the engine.
const MAX_WORD_LEN: usize = 180;

/// A loaded dictionary pair, immutable and safe to share between threads
#[derive(Debug)]
pub struct Dictionary {
	/// Underlying `.aff` file
	pub(crate) aff: AffFile,
	/// Underlying `.dic` file
	pub(crate) dic: DicFile,
}

/// Ways initializing a [`Dictionary`] could go wrong
#[derive(Debug, thiserror::Error)]
pub enum InitializeError {
	/// Could not parse either `.aff` or `.dic` file
	#[error("Could not parse file: {0}")]
	Parser(String),

	/// The `SET` directive names an encoding this build cannot decode
	#[error("Unsupported dictionary encoding: {0}")]
	UnsupportedEncoding(String),

	/// Could not correctly open given files
	#[error(transparent)]
	Io(#[from] io::Error),
}

/// Constructors
impl Dictionary {
	/// # Errors
	///
	/// Will error if either the provided affix or dictionary content is
	/// not able to be parsed.
	pub fn from_slice(aff: &str, dic: &str) -> Result<Self, InitializeError> {
		let aff = AffFile::new(aff)?;
		let dic = DicFile::new(dic, &aff)?;
		log::debug!(
			"loaded {} stems, {} prefixes, {} suffixes",
			dic.len(),
			aff.prefix_index.len(),
			aff.suffix_index.len(),
		);
		Ok(Self { aff, dic })
	}

	/// Given a path `/path/to/hunspell/en_US`, this function will append
	/// `.aff` and `.dic` and then read those files.
	///
	/// # Errors
	///
	/// Will error if either file cannot be read or parsed.
	pub fn from_pair(base: &Path) -> Result<Self, InitializeError> {
		let aff = AffFile::file(&base.with_extension("aff"))?;
		let dic = DicFile::file(&base.with_extension("dic"), &aff)?;
		log::debug!(
			"loaded {} stems, {} prefixes, {} suffixes",
			dic.len(),
			aff.prefix_index.len(),
			aff.suffix_index.len(),
		);
		Ok(Self { aff, dic })
	}
}

/// Queries
impl Dictionary {
	/// Whether `word` is spelled correctly.
	///
	/// Never fails: empty input is correct, overlong input is not.
	#[must_use]
	pub fn spell(&self, word: &str) -> bool {
		if word.chars().count() > MAX_WORD_LEN {
			return false;
		}
		self.spell_priv(word)
	}

	/// Fill `out` with corrections for `word`, in discovery order.
	///
	/// Never fails; `out` is cleared first and may stay empty.
	pub fn suggest(&self, word: &str, out: &mut Vec<String>) {
		out.clear();
		if word.chars().count() > MAX_WORD_LEN {
			return;
		}
		self.suggest_priv(word, out);
		if !self.aff.options.output_conversion.is_empty() {
			for s in out.iter_mut() {
				self.aff.options.output_conversion.replace(s);
			}
		}
	}
}
