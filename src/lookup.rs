//! Logic of the [`Dictionary`] to validate a word
//!
//! The entry point is [`Dictionary::spell_priv`]: input conversion,
//! abbreviation dots, number detection, then break-pattern recursion into
//! the casing-aware checker. Below that sits the affix stripper, a family
//! of functions each trying one legal affixation shape. Every attempt
//! edits the scratch buffer in place and restores it before returning.

use crate::aff::{Affix, Prefix, Suffix};
use crate::dic::{to_lower, to_title, Casing, WordEntry};
use crate::dictionary::Dictionary;
use crate::flag::{FlagSet, HIDDEN_HOMONYM_FLAG};

/// Maximum break-pattern recursion depth
const MAX_BREAK_DEPTH: usize = 9;
/// Maximum `ss` ↔ `ß` replacements tried for `CHECKSHARPS`
const MAX_SHARPS: usize = 5;

/// Where in a word the current strip attempt sits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AffixingMode {
	FullWord,
	AtCompoundBegin,
	AtCompoundMiddle,
	AtCompoundEnd,
}

use AffixingMode::{AtCompoundBegin, AtCompoundEnd, AtCompoundMiddle, FullWord};

/// Does the inner affix's continuation set license the outer affix?
fn cross_valid_inner_outer<TI, TO>(inner: &Affix<TI>, outer: &Affix<TO>) -> bool {
	inner.cont_flags.contains(outer.flag)
}

/// Does the stem itself license the affix?
fn stem_licenses<T>(word_flags: &FlagSet, afx: &Affix<T>) -> bool {
	word_flags.contains(afx.flag)
}

impl Dictionary {
	pub(crate) fn spell_priv(&self, word: &str) -> bool {
		let mut word = word.to_owned();
		self.aff.options.input_conversion.replace(&mut word);

		if word.is_empty() {
			return true;
		}
		let abbreviation = word.ends_with('.');
		if abbreviation {
			word.truncate(word.trim_end_matches('.').len());
			if word.is_empty() {
				return true;
			}
		}

		if Self::is_number(&word) {
			return true;
		}

		if !self.aff.options.ignore_chars.is_empty() {
			let ignore = &self.aff.options.ignore_chars;
			word.retain(|c| !ignore.contains(c));
		}

		let ret = self.spell_break(&word, 0);
		if !ret && abbreviation {
			word.push('.');
			return self.spell_break(&word, 0);
		}
		ret
	}

	/// Checks recursively according to the break patterns
	pub(crate) fn spell_break(&self, s: &str, depth: usize) -> bool {
		if let Some(flags) = self.spell_casing(s) {
			if flags.contains(self.aff.special_flags.forbidden_word) {
				return false;
			}
			if self.aff.options.forbid_warn && flags.contains(self.aff.special_flags.warn)
			{
				return false;
			}
			return true;
		}
		if depth == MAX_BREAK_DEPTH {
			return false;
		}

		let breaks = &self.aff.options.break_table;
		for pat in breaks.start_word_breaks() {
			if let Some(rest) = s.strip_prefix(pat.as_str()) {
				if self.spell_break(rest, 0) {
					return true;
				}
			}
		}
		for pat in breaks.end_word_breaks() {
			if let Some(rest) = s.strip_suffix(pat.as_str()) {
				if self.spell_break(rest, 0) {
					return true;
				}
			}
		}
		for pat in breaks.middle_word_breaks() {
			if let Some(i) = s.find(pat.as_str()) {
				if i > 0 && i + pat.len() < s.len() {
					if !self.spell_break(&s[..i], depth + 1) {
						continue;
					}
					if self.spell_break(&s[i + pat.len()..], depth + 1) {
						return true;
					}
				}
			}
		}

		false
	}

	/// Dispatch to the right lookup strategy for the word's casing
	fn spell_casing(&self, s: &str) -> Option<&FlagSet> {
		match Casing::guess(s) {
			casing @ (Casing::Small | Casing::Camel | Casing::Pascal) => {
				self.check_word(s, casing, false)
			}
			Casing::AllCapital => self.spell_casing_upper(s),
			Casing::InitCapital => self.spell_casing_title(s),
		}
	}

	/// All-caps lookup: as-is, apostrophe prefixes, sharp s, then folded
	fn spell_casing_upper(&self, s: &str) -> Option<&FlagSet> {
		if let Some(res) = self.check_word(s, Casing::AllCapital, false) {
			return Some(res);
		}

		// prefixes joined by an apostrophe, e.g. SANT'ELIA -> Sant'Elia
		if let Some(apos) = s.find('\'') {
			if apos + 1 < s.len() {
				let (part1, part2) = (&s[..apos + 1], &s[apos + 1..]);
				let t = to_lower(part1) + &to_title(part2);
				if let Some(res) = self.check_word(&t, Casing::AllCapital, false) {
					return Some(res);
				}
				let t = to_title(part1) + &to_title(part2);
				if let Some(res) = self.check_word(&t, Casing::AllCapital, false) {
					return Some(res);
				}
			}
		}

		if self.aff.options.check_sharps && s.contains("SS") {
			let mut t = to_lower(s);
			if let Some(res) = self.spell_sharps(&mut t, 0, 0, 0) {
				return Some(res);
			}
			let mut t = to_title(s);
			if let Some(res) = self.spell_sharps(&mut t, 0, 0, 0) {
				return Some(res);
			}
		}

		let keep_case = self.aff.special_flags.keep_case;
		let t = to_title(s);
		if let Some(res) = self.check_word(&t, Casing::AllCapital, false) {
			if !res.contains(keep_case) {
				return Some(res);
			}
		}
		let t = to_lower(s);
		if let Some(res) = self.check_word(&t, Casing::AllCapital, false) {
			if !res.contains(keep_case) {
				return Some(res);
			}
		}
		None
	}

	/// Title-case lookup: as-is skipping hidden homonyms, then lowered
	fn spell_casing_title(&self, s: &str) -> Option<&FlagSet> {
		if let Some(res) = self.check_word(s, Casing::InitCapital, true) {
			return Some(res);
		}

		let t = to_lower(s);
		let res = self.check_word(&t, Casing::InitCapital, false)?;

		// with CHECKSHARPS, ß is allowed in KEEPCASE words in title case
		if res.contains(self.aff.special_flags.keep_case)
			&& !(self.aff.options.check_sharps && t.contains('ß'))
		{
			return None;
		}
		Some(res)
	}

	/// Try every combination of `ss` replaced by `ß`, recursively
	fn spell_sharps(
		&self,
		base: &mut String,
		pos: usize,
		depth: usize,
		replacements: usize,
	) -> Option<&FlagSet> {
		let found = base[pos..].find("ss").map(|p| p + pos);
		if let (Some(at), true) = (found, depth < MAX_SHARPS) {
			base.replace_range(at..at + 2, "ß");
			let res = self.spell_sharps(base, at + 2, depth + 1, replacements + 1);
			base.replace_range(at..at + 2, "ss");
			if res.is_some() {
				return res;
			}
			self.spell_sharps(base, at + 2, depth + 1, replacements)
		} else if replacements > 0 {
			self.check_word(base, Casing::AllCapital, false)
		} else {
			None
		}
	}

	/// Low-level check: simple (possibly affixed) word, else compound
	pub(crate) fn check_word(
		&self,
		s: &str,
		input_casing: Casing,
		skip_hidden_homonym: bool,
	) -> Option<&FlagSet> {
		if let Some(flags) = self.check_simple_word(s, skip_hidden_homonym) {
			return Some(flags);
		}
		self.check_compound(s, input_casing)
			.map(|res| &res.entry.flags)
	}

	/// Direct lookup plus every enabled affix-stripping shape
	pub(crate) fn check_simple_word(
		&self,
		s: &str,
		skip_hidden_homonym: bool,
	) -> Option<&FlagSet> {
		let sf = &self.aff.special_flags;
		for we in self.dic.homonyms(s) {
			let flags = &we.flags;
			if flags.contains(sf.need_affix) {
				continue;
			}
			if flags.contains(sf.compound_onlyin) {
				continue;
			}
			if skip_hidden_homonym && flags.contains(HIDDEN_HOMONYM_FLAG) {
				continue;
			}
			return Some(flags);
		}

		let mut buf = s.to_owned();
		if let Some((we, _)) = self.strip_suffix_only(&mut buf, skip_hidden_homonym, FullWord)
		{
			return Some(&we.flags);
		}
		if let Some((we, _)) = self.strip_prefix_only(&mut buf, skip_hidden_homonym, FullWord)
		{
			return Some(&we.flags);
		}
		if let Some((we, _, _)) = self.strip_prefix_then_suffix_commutative(
			&mut buf,
			skip_hidden_homonym,
			FullWord,
		) {
			return Some(&we.flags);
		}
		if !self.aff.options.complex_prefixes {
			if let Some((we, _, _)) =
				self.strip_suffix_then_suffix(&mut buf, skip_hidden_homonym)
			{
				return Some(&we.flags);
			}
			if let Some(we) =
				self.strip_prefix_then_2_suffixes(&mut buf, skip_hidden_homonym)
			{
				return Some(&we.flags);
			}
			if let Some(we) =
				self.strip_suffix_prefix_suffix(&mut buf, skip_hidden_homonym)
			{
				return Some(&we.flags);
			}
			// stripping 2 suffixes then a prefix is slow and unused,
			// so it stays disabled
		} else {
			if let Some((we, _, _)) =
				self.strip_prefix_then_prefix(&mut buf, skip_hidden_homonym)
			{
				return Some(&we.flags);
			}
			if let Some(we) =
				self.strip_suffix_then_2_prefixes(&mut buf, skip_hidden_homonym)
			{
				return Some(&we.flags);
			}
			if let Some(we) =
				self.strip_prefix_suffix_prefix(&mut buf, skip_hidden_homonym)
			{
				return Some(&we.flags);
			}
			// same for 2 prefixes then a suffix
		}
		None
	}

	// ——— per-affix validity

	fn prefix_not_valid(&self, e: &Affix<Prefix>, m: AffixingMode) -> bool {
		let sf = &self.aff.special_flags;
		if m == FullWord && e.cont_flags.contains(sf.compound_onlyin) {
			return true;
		}
		if m == AtCompoundEnd && !e.cont_flags.contains(sf.compound_permit) {
			return true;
		}
		if m != FullWord && e.cont_flags.contains(sf.compound_forbid) {
			return true;
		}
		false
	}

	fn suffix_not_valid(&self, e: &Affix<Suffix>, m: AffixingMode) -> bool {
		let sf = &self.aff.special_flags;
		if m == FullWord && e.cont_flags.contains(sf.compound_onlyin) {
			return true;
		}
		if m == AtCompoundBegin && !e.cont_flags.contains(sf.compound_permit) {
			return true;
		}
		if m != FullWord && e.cont_flags.contains(sf.compound_forbid) {
			return true;
		}
		false
	}

	fn outer_prefix_not_valid(&self, e: &Affix<Prefix>, m: AffixingMode) -> bool {
		self.prefix_not_valid(e, m)
			|| e.cont_flags.contains(self.aff.special_flags.need_affix)
	}

	fn outer_suffix_not_valid(&self, e: &Affix<Suffix>, m: AffixingMode) -> bool {
		self.suffix_not_valid(e, m)
			|| e.cont_flags.contains(self.aff.special_flags.need_affix)
	}

	fn is_circumfix<T>(&self, a: &Affix<T>) -> bool {
		a.cont_flags.contains(self.aff.special_flags.circumfix)
	}

	/// Whether these flags admit a compound part at the given position
	fn is_valid_inside_compound(&self, flags: &FlagSet, m: AffixingMode) -> bool {
		let sf = &self.aff.special_flags;
		let compound = flags.contains(sf.compound);
		match m {
			AtCompoundBegin => compound || flags.contains(sf.compound_begin),
			AtCompoundMiddle => compound || flags.contains(sf.compound_middle),
			AtCompoundEnd => compound || flags.contains(sf.compound_last),
			FullWord => true,
		}
	}

	// ——— single-affix strips

	pub(crate) fn strip_prefix_only<'a>(
		&'a self,
		word: &mut String,
		skip_hidden_homonym: bool,
		m: AffixingMode,
	) -> Option<(&'a WordEntry, &'a Affix<Prefix>)> {
		let sf = &self.aff.special_flags;
		for e in self.aff.prefix_index.iterate_prefixes_of(word) {
			if self.outer_prefix_not_valid(e, m) {
				continue;
			}
			if self.is_circumfix(e) {
				continue;
			}
			e.to_stem(word);
			let result = (|| {
				if !e.check_condition(word) {
					return None;
				}
				for we in self.dic.homonyms(word) {
					let word_flags = &we.flags;
					if !stem_licenses(word_flags, e) {
						continue;
					}
					if m == FullWord
						&& word_flags.contains(sf.compound_onlyin)
					{
						continue;
					}
					if skip_hidden_homonym
						&& word_flags.contains(HIDDEN_HOMONYM_FLAG)
					{
						continue;
					}
					if !self.is_valid_inside_compound(word_flags, m)
						&& !self.is_valid_inside_compound(&e.cont_flags, m)
					{
						continue;
					}
					return Some((we, e));
				}
				None
			})();
			e.to_derived(word);
			if result.is_some() {
				return result;
			}
		}
		None
	}

	pub(crate) fn strip_suffix_only<'a>(
		&'a self,
		word: &mut String,
		skip_hidden_homonym: bool,
		m: AffixingMode,
	) -> Option<(&'a WordEntry, &'a Affix<Suffix>)> {
		let sf = &self.aff.special_flags;
		for e in self.aff.suffix_index.iterate_suffixes_of(word) {
			if self.outer_suffix_not_valid(e, m) {
				continue;
			}
			if !e.add.is_empty()
				&& m == AtCompoundEnd
				&& e.cont_flags.contains(sf.compound_onlyin)
			{
				continue;
			}
			if self.is_circumfix(e) {
				continue;
			}
			e.to_stem(word);
			let result = (|| {
				if !e.check_condition(word) {
					return None;
				}
				for we in self.dic.homonyms(word) {
					let word_flags = &we.flags;
					if !stem_licenses(word_flags, e) {
						continue;
					}
					if m == FullWord
						&& word_flags.contains(sf.compound_onlyin)
					{
						continue;
					}
					if skip_hidden_homonym
						&& word_flags.contains(HIDDEN_HOMONYM_FLAG)
					{
						continue;
					}
					if !self.is_valid_inside_compound(word_flags, m)
						&& !self.is_valid_inside_compound(&e.cont_flags, m)
					{
						continue;
					}
					return Some((we, e));
				}
				None
			})();
			e.to_derived(word);
			if result.is_some() {
				return result;
			}
		}
		None
	}

	// ——— prefix and suffix together, either application order

	pub(crate) fn strip_prefix_then_suffix_commutative<'a>(
		&'a self,
		word: &mut String,
		skip_hidden_homonym: bool,
		m: AffixingMode,
	) -> Option<(&'a WordEntry, &'a Affix<Suffix>, &'a Affix<Prefix>)> {
		for pe in self.aff.prefix_index.iterate_prefixes_of(word) {
			if !pe.cross_product {
				continue;
			}
			if self.prefix_not_valid(pe, m) {
				continue;
			}
			pe.to_stem(word);
			let result = if pe.check_condition(word) {
				self.strip_pfx_then_sfx_comm_2(pe, word, skip_hidden_homonym, m)
			} else {
				None
			};
			pe.to_derived(word);
			if result.is_some() {
				return result;
			}
		}
		None
	}

	fn strip_pfx_then_sfx_comm_2<'a>(
		&'a self,
		pe: &'a Affix<Prefix>,
		word: &mut String,
		skip_hidden_homonym: bool,
		m: AffixingMode,
	) -> Option<(&'a WordEntry, &'a Affix<Suffix>, &'a Affix<Prefix>)> {
		let sf = &self.aff.special_flags;
		let has_needaffix_pe = pe.cont_flags.contains(sf.need_affix);
		let is_circumfix_pe = self.is_circumfix(pe);

		for se in self.aff.suffix_index.iterate_suffixes_of(word) {
			if !se.cross_product {
				continue;
			}
			if self.suffix_not_valid(se, m) {
				continue;
			}
			let has_needaffix_se = se.cont_flags.contains(sf.need_affix);
			if has_needaffix_pe && has_needaffix_se {
				continue;
			}
			if is_circumfix_pe != self.is_circumfix(se) {
				continue;
			}
			se.to_stem(word);
			let result = (|| {
				if !se.check_condition(word) {
					return None;
				}
				for we in self.dic.homonyms(word) {
					let word_flags = &we.flags;

					let valid_cross_pe_outer = !has_needaffix_pe
						&& stem_licenses(word_flags, se)
						&& (cross_valid_inner_outer(se, pe)
							|| stem_licenses(word_flags, pe));
					let valid_cross_se_outer = !has_needaffix_se
						&& stem_licenses(word_flags, pe)
						&& (cross_valid_inner_outer(pe, se)
							|| stem_licenses(word_flags, se));
					if !valid_cross_pe_outer && !valid_cross_se_outer {
						continue;
					}

					if m == FullWord
						&& word_flags.contains(sf.compound_onlyin)
					{
						continue;
					}
					if skip_hidden_homonym
						&& word_flags.contains(HIDDEN_HOMONYM_FLAG)
					{
						continue;
					}
					if !self.is_valid_inside_compound(word_flags, m)
						&& !self.is_valid_inside_compound(&se.cont_flags, m)
						&& !self.is_valid_inside_compound(&pe.cont_flags, m)
					{
						continue;
					}
					return Some((we, se, pe));
				}
				None
			})();
			se.to_derived(word);
			if result.is_some() {
				return result;
			}
		}
		None
	}

	// ——— chained same-kind affixes

	fn strip_suffix_then_suffix<'a>(
		&'a self,
		word: &mut String,
		skip_hidden_homonym: bool,
	) -> Option<(&'a WordEntry, &'a Affix<Suffix>, &'a Affix<Suffix>)> {
		// cheap rejection, correctness is unaffected
		if !self.aff.suffix_index.has_continuation_flags() {
			return None;
		}

		for se1 in self.aff.suffix_index.iterate_suffixes_of(word) {
			if !self.aff.suffix_index.has_continuation_flag(se1.flag) {
				continue;
			}
			if self.outer_suffix_not_valid(se1, FullWord) {
				continue;
			}
			if self.is_circumfix(se1) {
				continue;
			}
			se1.to_stem(word);
			let result = if se1.check_condition(word) {
				self.strip_sfx_then_sfx_2(se1, word, skip_hidden_homonym, FullWord)
			} else {
				None
			};
			se1.to_derived(word);
			if result.is_some() {
				return result;
			}
		}
		None
	}

	fn strip_sfx_then_sfx_2<'a>(
		&'a self,
		se1: &'a Affix<Suffix>,
		word: &mut String,
		skip_hidden_homonym: bool,
		m: AffixingMode,
	) -> Option<(&'a WordEntry, &'a Affix<Suffix>, &'a Affix<Suffix>)> {
		let sf = &self.aff.special_flags;
		for se2 in self.aff.suffix_index.iterate_suffixes_of(word) {
			if !cross_valid_inner_outer(se2, se1) {
				continue;
			}
			if self.suffix_not_valid(se2, m) {
				continue;
			}
			if self.is_circumfix(se2) {
				continue;
			}
			se2.to_stem(word);
			let result = (|| {
				if !se2.check_condition(word) {
					return None;
				}
				for we in self.dic.homonyms(word) {
					let word_flags = &we.flags;
					if !stem_licenses(word_flags, se2) {
						continue;
					}
					if m == FullWord
						&& word_flags.contains(sf.compound_onlyin)
					{
						continue;
					}
					if skip_hidden_homonym
						&& word_flags.contains(HIDDEN_HOMONYM_FLAG)
					{
						continue;
					}
					return Some((we, se2, se1));
				}
				None
			})();
			se2.to_derived(word);
			if result.is_some() {
				return result;
			}
		}
		None
	}

	fn strip_prefix_then_prefix<'a>(
		&'a self,
		word: &mut String,
		skip_hidden_homonym: bool,
	) -> Option<(&'a WordEntry, &'a Affix<Prefix>, &'a Affix<Prefix>)> {
		if !self.aff.prefix_index.has_continuation_flags() {
			return None;
		}

		for pe1 in self.aff.prefix_index.iterate_prefixes_of(word) {
			if !self.aff.prefix_index.has_continuation_flag(pe1.flag) {
				continue;
			}
			if self.outer_prefix_not_valid(pe1, FullWord) {
				continue;
			}
			if self.is_circumfix(pe1) {
				continue;
			}
			pe1.to_stem(word);
			let result = if pe1.check_condition(word) {
				self.strip_pfx_then_pfx_2(pe1, word, skip_hidden_homonym, FullWord)
			} else {
				None
			};
			pe1.to_derived(word);
			if result.is_some() {
				return result;
			}
		}
		None
	}

	fn strip_pfx_then_pfx_2<'a>(
		&'a self,
		pe1: &'a Affix<Prefix>,
		word: &mut String,
		skip_hidden_homonym: bool,
		m: AffixingMode,
	) -> Option<(&'a WordEntry, &'a Affix<Prefix>, &'a Affix<Prefix>)> {
		let sf = &self.aff.special_flags;
		for pe2 in self.aff.prefix_index.iterate_prefixes_of(word) {
			if !cross_valid_inner_outer(pe2, pe1) {
				continue;
			}
			if self.prefix_not_valid(pe2, m) {
				continue;
			}
			if self.is_circumfix(pe2) {
				continue;
			}
			pe2.to_stem(word);
			let result = (|| {
				if !pe2.check_condition(word) {
					return None;
				}
				for we in self.dic.homonyms(word) {
					let word_flags = &we.flags;
					if !stem_licenses(word_flags, pe2) {
						continue;
					}
					if m == FullWord
						&& word_flags.contains(sf.compound_onlyin)
					{
						continue;
					}
					if skip_hidden_homonym
						&& word_flags.contains(HIDDEN_HOMONYM_FLAG)
					{
						continue;
					}
					return Some((we, pe2, pe1));
				}
				None
			})();
			pe2.to_derived(word);
			if result.is_some() {
				return result;
			}
		}
		None
	}

	// ——— three-affix shapes

	fn strip_prefix_then_2_suffixes<'a>(
		&'a self,
		word: &mut String,
		skip_hidden_homonym: bool,
	) -> Option<&'a WordEntry> {
		if !self.aff.suffix_index.has_continuation_flags() {
			return None;
		}

		for pe1 in self.aff.prefix_index.iterate_prefixes_of(word) {
			if !pe1.cross_product {
				continue;
			}
			if self.outer_prefix_not_valid(pe1, FullWord) {
				continue;
			}
			pe1.to_stem(word);
			let result = (|| {
				if !pe1.check_condition(word) {
					return None;
				}
				for se1 in self.aff.suffix_index.iterate_suffixes_of(word) {
					if !self.aff.suffix_index.has_continuation_flag(se1.flag)
					{
						continue;
					}
					if !se1.cross_product {
						continue;
					}
					if self.suffix_not_valid(se1, FullWord) {
						continue;
					}
					if self.is_circumfix(pe1) != self.is_circumfix(se1) {
						continue;
					}
					se1.to_stem(word);
					let inner = if se1.check_condition(word) {
						self.strip_pfx_2_sfx_3(
							pe1,
							se1,
							word,
							skip_hidden_homonym,
							FullWord,
						)
					} else {
						None
					};
					se1.to_derived(word);
					if inner.is_some() {
						return inner;
					}
				}
				None
			})();
			pe1.to_derived(word);
			if result.is_some() {
				return result;
			}
		}
		None
	}

	fn strip_pfx_2_sfx_3<'a>(
		&'a self,
		pe1: &'a Affix<Prefix>,
		se1: &'a Affix<Suffix>,
		word: &mut String,
		skip_hidden_homonym: bool,
		m: AffixingMode,
	) -> Option<&'a WordEntry> {
		let sf = &self.aff.special_flags;
		for se2 in self.aff.suffix_index.iterate_suffixes_of(word) {
			if !cross_valid_inner_outer(se2, se1) {
				continue;
			}
			if self.suffix_not_valid(se2, m) {
				continue;
			}
			if self.is_circumfix(se2) {
				continue;
			}
			se2.to_stem(word);
			let result = (|| {
				if !se2.check_condition(word) {
					return None;
				}
				for we in self.dic.homonyms(word) {
					let word_flags = &we.flags;
					if !cross_valid_inner_outer(se1, pe1)
						&& !stem_licenses(word_flags, pe1)
					{
						continue;
					}
					if !stem_licenses(word_flags, se2) {
						continue;
					}
					if m == FullWord
						&& word_flags.contains(sf.compound_onlyin)
					{
						continue;
					}
					if skip_hidden_homonym
						&& word_flags.contains(HIDDEN_HOMONYM_FLAG)
					{
						continue;
					}
					return Some(we);
				}
				None
			})();
			se2.to_derived(word);
			if result.is_some() {
				return result;
			}
		}
		None
	}

	fn strip_suffix_prefix_suffix<'a>(
		&'a self,
		word: &mut String,
		skip_hidden_homonym: bool,
	) -> Option<&'a WordEntry> {
		if !self.aff.suffix_index.has_continuation_flags()
			&& !self.aff.prefix_index.has_continuation_flags()
		{
			return None;
		}

		for se1 in self.aff.suffix_index.iterate_suffixes_of(word) {
			if !self.aff.suffix_index.has_continuation_flag(se1.flag)
				&& !self.aff.prefix_index.has_continuation_flag(se1.flag)
			{
				continue;
			}
			if !se1.cross_product {
				continue;
			}
			if self.outer_suffix_not_valid(se1, FullWord) {
				continue;
			}
			se1.to_stem(word);
			let result = (|| {
				if !se1.check_condition(word) {
					return None;
				}
				for pe1 in self.aff.prefix_index.iterate_prefixes_of(word) {
					if !pe1.cross_product {
						continue;
					}
					if self.prefix_not_valid(pe1, FullWord) {
						continue;
					}
					pe1.to_stem(word);
					let inner = if pe1.check_condition(word) {
						self.strip_s_p_s_3(
							se1,
							pe1,
							word,
							skip_hidden_homonym,
							FullWord,
						)
					} else {
						None
					};
					pe1.to_derived(word);
					if inner.is_some() {
						return inner;
					}
				}
				None
			})();
			se1.to_derived(word);
			if result.is_some() {
				return result;
			}
		}
		None
	}

	fn strip_s_p_s_3<'a>(
		&'a self,
		se1: &'a Affix<Suffix>,
		pe1: &'a Affix<Prefix>,
		word: &mut String,
		skip_hidden_homonym: bool,
		m: AffixingMode,
	) -> Option<&'a WordEntry> {
		let sf = &self.aff.special_flags;
		for se2 in self.aff.suffix_index.iterate_suffixes_of(word) {
			if !se2.cross_product {
				continue;
			}
			if !cross_valid_inner_outer(se2, se1) && !cross_valid_inner_outer(pe1, se1)
			{
				continue;
			}
			if self.suffix_not_valid(se2, m) {
				continue;
			}
			let circ1ok = (self.is_circumfix(pe1) == self.is_circumfix(se1))
				&& !self.is_circumfix(se2);
			let circ2ok = (self.is_circumfix(pe1) == self.is_circumfix(se2))
				&& !self.is_circumfix(se1);
			if !circ1ok && !circ2ok {
				continue;
			}
			se2.to_stem(word);
			let result = (|| {
				if !se2.check_condition(word) {
					return None;
				}
				for we in self.dic.homonyms(word) {
					let word_flags = &we.flags;
					if !cross_valid_inner_outer(se2, pe1)
						&& !stem_licenses(word_flags, pe1)
					{
						continue;
					}
					if !stem_licenses(word_flags, se2) {
						continue;
					}
					if m == FullWord
						&& word_flags.contains(sf.compound_onlyin)
					{
						continue;
					}
					if skip_hidden_homonym
						&& word_flags.contains(HIDDEN_HOMONYM_FLAG)
					{
						continue;
					}
					return Some(we);
				}
				None
			})();
			se2.to_derived(word);
			if result.is_some() {
				return result;
			}
		}
		None
	}

	fn strip_suffix_then_2_prefixes<'a>(
		&'a self,
		word: &mut String,
		skip_hidden_homonym: bool,
	) -> Option<&'a WordEntry> {
		if !self.aff.prefix_index.has_continuation_flags() {
			return None;
		}

		for se1 in self.aff.suffix_index.iterate_suffixes_of(word) {
			if !se1.cross_product {
				continue;
			}
			if self.outer_suffix_not_valid(se1, FullWord) {
				continue;
			}
			se1.to_stem(word);
			let result = (|| {
				if !se1.check_condition(word) {
					return None;
				}
				for pe1 in self.aff.prefix_index.iterate_prefixes_of(word) {
					if !self.aff.prefix_index.has_continuation_flag(pe1.flag)
					{
						continue;
					}
					if !pe1.cross_product {
						continue;
					}
					if self.prefix_not_valid(pe1, FullWord) {
						continue;
					}
					if self.is_circumfix(se1) != self.is_circumfix(pe1) {
						continue;
					}
					pe1.to_stem(word);
					let inner = if pe1.check_condition(word) {
						self.strip_sfx_2_pfx_3(
							se1,
							pe1,
							word,
							skip_hidden_homonym,
							FullWord,
						)
					} else {
						None
					};
					pe1.to_derived(word);
					if inner.is_some() {
						return inner;
					}
				}
				None
			})();
			se1.to_derived(word);
			if result.is_some() {
				return result;
			}
		}
		None
	}

	fn strip_sfx_2_pfx_3<'a>(
		&'a self,
		se1: &'a Affix<Suffix>,
		pe1: &'a Affix<Prefix>,
		word: &mut String,
		skip_hidden_homonym: bool,
		m: AffixingMode,
	) -> Option<&'a WordEntry> {
		let sf = &self.aff.special_flags;
		for pe2 in self.aff.prefix_index.iterate_prefixes_of(word) {
			if !cross_valid_inner_outer(pe2, pe1) {
				continue;
			}
			if self.prefix_not_valid(pe2, m) {
				continue;
			}
			if self.is_circumfix(pe2) {
				continue;
			}
			pe2.to_stem(word);
			let result = (|| {
				if !pe2.check_condition(word) {
					return None;
				}
				for we in self.dic.homonyms(word) {
					let word_flags = &we.flags;
					if !cross_valid_inner_outer(pe1, se1)
						&& !stem_licenses(word_flags, se1)
					{
						continue;
					}
					if !stem_licenses(word_flags, pe2) {
						continue;
					}
					if m == FullWord
						&& word_flags.contains(sf.compound_onlyin)
					{
						continue;
					}
					if skip_hidden_homonym
						&& word_flags.contains(HIDDEN_HOMONYM_FLAG)
					{
						continue;
					}
					return Some(we);
				}
				None
			})();
			pe2.to_derived(word);
			if result.is_some() {
				return result;
			}
		}
		None
	}

	fn strip_prefix_suffix_prefix<'a>(
		&'a self,
		word: &mut String,
		skip_hidden_homonym: bool,
	) -> Option<&'a WordEntry> {
		if !self.aff.prefix_index.has_continuation_flags()
			&& !self.aff.suffix_index.has_continuation_flags()
		{
			return None;
		}

		for pe1 in self.aff.prefix_index.iterate_prefixes_of(word) {
			if !self.aff.prefix_index.has_continuation_flag(pe1.flag)
				&& !self.aff.suffix_index.has_continuation_flag(pe1.flag)
			{
				continue;
			}
			if !pe1.cross_product {
				continue;
			}
			if self.outer_prefix_not_valid(pe1, FullWord) {
				continue;
			}
			pe1.to_stem(word);
			let result = (|| {
				if !pe1.check_condition(word) {
					return None;
				}
				for se1 in self.aff.suffix_index.iterate_suffixes_of(word) {
					if !se1.cross_product {
						continue;
					}
					if self.suffix_not_valid(se1, FullWord) {
						continue;
					}
					se1.to_stem(word);
					let inner = if se1.check_condition(word) {
						self.strip_p_s_p_3(
							pe1,
							se1,
							word,
							skip_hidden_homonym,
							FullWord,
						)
					} else {
						None
					};
					se1.to_derived(word);
					if inner.is_some() {
						return inner;
					}
				}
				None
			})();
			pe1.to_derived(word);
			if result.is_some() {
				return result;
			}
		}
		None
	}

	fn strip_p_s_p_3<'a>(
		&'a self,
		pe1: &'a Affix<Prefix>,
		se1: &'a Affix<Suffix>,
		word: &mut String,
		skip_hidden_homonym: bool,
		m: AffixingMode,
	) -> Option<&'a WordEntry> {
		let sf = &self.aff.special_flags;
		for pe2 in self.aff.prefix_index.iterate_prefixes_of(word) {
			if !pe2.cross_product {
				continue;
			}
			if !cross_valid_inner_outer(pe2, pe1) && !cross_valid_inner_outer(se1, pe1)
			{
				continue;
			}
			if self.prefix_not_valid(pe2, m) {
				continue;
			}
			let circ1ok = (self.is_circumfix(se1) == self.is_circumfix(pe1))
				&& !self.is_circumfix(pe2);
			let circ2ok = (self.is_circumfix(se1) == self.is_circumfix(pe2))
				&& !self.is_circumfix(pe1);
			if !circ1ok && !circ2ok {
				continue;
			}
			pe2.to_stem(word);
			let result = (|| {
				if !pe2.check_condition(word) {
					return None;
				}
				for we in self.dic.homonyms(word) {
					let word_flags = &we.flags;
					if !cross_valid_inner_outer(pe2, se1)
						&& !stem_licenses(word_flags, se1)
					{
						continue;
					}
					if !stem_licenses(word_flags, pe2) {
						continue;
					}
					if m == FullWord
						&& word_flags.contains(sf.compound_onlyin)
					{
						continue;
					}
					if skip_hidden_homonym
						&& word_flags.contains(HIDDEN_HOMONYM_FLAG)
					{
						continue;
					}
					return Some(we);
				}
				None
			})();
			pe2.to_derived(word);
			if result.is_some() {
				return result;
			}
		}
		None
	}

	/// Checks if `word` is only digits and separators (`-,.`) that do not
	/// follow each other
	pub(crate) fn is_number(word: &str) -> bool {
		if word.is_empty() {
			return false;
		}
		let mut previous_is_sep = false;
		for char_ in word.chars() {
			match char_ {
				'0'..='9' => previous_is_sep = false,
				'-' | '.' | ',' if !previous_is_sep => previous_is_sep = true,
				_ => return false,
			}
		}
		true
	}
}

#[cfg(test)]
mod tests {
	use crate::Dictionary;

	fn dict(aff: &str, dic: &str) -> Dictionary {
		Dictionary::from_slice(aff, dic).unwrap()
	}

	#[test]
	fn accepts_plain_stems_and_affixed_forms() {
		let d = dict(
			"PFX A Y 1\nPFX A 0 un .\nSFX B Y 1\nSFX B 0 s .\n",
			"1\ndo/AB\n",
		);
		assert!(d.spell("do"));
		assert!(d.spell("undo"));
		assert!(d.spell("dos"));
		assert!(d.spell("undos")); // cross product on both sides
		assert!(!d.spell("undoed"));
		assert!(!d.spell("und"));
	}

	#[test]
	fn cross_product_is_required_for_pairing() {
		let d = dict(
			"PFX A N 1\nPFX A 0 un .\nSFX B Y 1\nSFX B 0 s .\n",
			"1\ndo/AB\n",
		);
		assert!(d.spell("undo"));
		assert!(d.spell("dos"));
		assert!(!d.spell("undos"));
	}

	#[test]
	fn suffix_condition_gates_application() {
		let d = dict(
			"SFX D Y 2\nSFX D y ied [^aeiou]y\nSFX D 0 ed [^y]\n",
			"2\nimply/D\nconvey\n",
		);
		assert!(d.spell("implied"));
		assert!(!d.spell("implyed"));
		assert!(!d.spell("conveyed")); // stem lacks the flag
	}

	#[test]
	fn stripping_restores_the_stem_text() {
		let d = dict("SFX D Y 1\nSFX D y ied [^aeiou]y\n", "1\nimply/D\n");
		assert!(d.spell("implied"));
		// the buffer surgery must not leak between lookups
		assert!(d.spell("implied"));
		assert!(d.spell("imply"));
	}

	#[test]
	fn chained_suffixes_need_continuation() {
		let aff = "SFX S Y 1\nSFX S 0 s .\nSFX T Y 1\nSFX T 0 ing/S .\n";
		let d = dict(aff, "1\ntalk/T\n");
		assert!(d.spell("talking"));
		assert!(d.spell("talkings")); // outer s licensed by inner ing
		assert!(!d.spell("talks")); // s not licensed by the stem
	}

	#[test]
	fn chained_prefixes_with_complex_prefixes() {
		let aff = "COMPLEXPREFIXES\nPFX P Y 1\nPFX P 0 re .\nPFX Q Y 1\nPFX Q 0 un/P .\n";
		let d = dict(aff, "1\ndo/Q\n");
		assert!(d.spell("undo"));
		assert!(d.spell("reundo"));
		assert!(!d.spell("redo"));
	}

	#[test]
	fn need_affix_stems_require_stripping() {
		let aff = "NEEDAFFIX X\nSFX S Y 1\nSFX S 0 s .\n";
		let d = dict(aff, "1\nvirtual/XS\n");
		assert!(!d.spell("virtual"));
		assert!(d.spell("virtuals"));
	}

	#[test]
	fn circumfix_requires_both_sides() {
		let aff = "CIRCUMFIX X\n\
PFX A Y 1\nPFX A 0 leg/X .\n\
SFX B Y 1\nSFX B 0 obb/X .\n\
SFX C Y 1\nSFX C 0 obb .\n";
		let d = dict(aff, "1\nnagy/ABC\n");
		assert!(d.spell("legnagyobb")); // both carry the circumfix flag
		assert!(d.spell("nagyobb")); // plain suffix without circumfix
		assert!(!d.spell("legnagy")); // circumfix prefix alone
	}

	#[test]
	fn forbidden_words_are_misspelled() {
		let d = dict("FORBIDDENWORD Z\n", "2\nfoo\nbar/Z\n");
		assert!(d.spell("foo"));
		assert!(!d.spell("bar"));
	}

	#[test]
	fn break_patterns_split_words() {
		let d = dict("BREAK 1\nBREAK -\n", "2\nfoo\nbar\n");
		assert!(d.spell("foo-bar"));
		assert!(!d.spell("foo-baz"));
	}

	#[test]
	fn default_break_handles_leading_and_trailing_dash() {
		let d = dict("", "1\nfoo\n");
		assert!(d.spell("foo-"));
		assert!(d.spell("-foo"));
	}

	#[test]
	fn numbers_are_always_accepted() {
		let d = dict("", "1\nfoo\n");
		assert!(d.spell("123"));
		assert!(d.spell("1,000.00"));
		assert!(!d.spell("1,,000"));
	}

	#[test]
	fn abbreviation_dot_is_tolerated() {
		let d = dict("", "1\netc\n");
		assert!(d.spell("etc"));
		assert!(d.spell("etc."));
		assert!(!d.spell("etd."));
	}

	#[test]
	fn empty_input_is_accepted() {
		let d = dict("", "1\nfoo\n");
		assert!(d.spell(""));
	}

	#[test]
	fn casing_foldings_are_tried() {
		let d = dict("", "3\nhello\nNASA\nHunspell\n");
		assert!(d.spell("hello"));
		assert!(d.spell("Hello"));
		assert!(d.spell("HELLO"));
		assert!(d.spell("NASA"));
		assert!(!d.spell("Nasa")); // hidden homonym skipped in title lookup
		assert!(d.spell("Hunspell"));
		assert!(d.spell("HUNSPELL"));
		assert!(!d.spell("hunspell"));
	}

	#[test]
	fn keepcase_rejects_folded_lookups() {
		let d = dict("KEEPCASE K\n", "1\nUNESCO/K\n");
		assert!(d.spell("UNESCO"));
		assert!(!d.spell("unesco"));
		assert!(!d.spell("Unesco"));
	}

	#[test]
	fn sharps_expansion_for_german() {
		let d = dict("CHECKSHARPS\n", "1\naußen\n");
		assert!(d.spell("außen"));
		assert!(d.spell("AUSSEN"));
	}

	#[test]
	fn warn_flag_combined_with_forbid_warn() {
		let d = dict("WARN W\nFORBIDWARN\n", "1\nfoo/W\n");
		assert!(!d.spell("foo"));
	}

	#[test]
	fn only_in_compound_blocks_standalone_use() {
		let d = dict("ONLYINCOMPOUND O\nCOMPOUNDFLAG X\n", "2\nfoot/XO\nball/X\n");
		assert!(!d.spell("foot"));
		assert!(d.spell("football"));
	}

	#[test]
	fn number_detector() {
		assert!(Dictionary::is_number("123"));
		assert!(Dictionary::is_number("-1.5"));
		assert!(!Dictionary::is_number(""));
		assert!(!Dictionary::is_number("12a"));
		assert!(!Dictionary::is_number("1--2"));
	}
}
