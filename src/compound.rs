//! Logic of the [`Dictionary`] to validate compound words
//!
//! Two strategies coexist: flag-based compounding splits the word at every
//! legal cut and validates the left part at its position and the right
//! part as a compound end or, recursively, as a further compound.
//! Rule-based compounding matches the sequence of part flag sets against
//! the `COMPOUNDRULE` patterns. Boundary vetoes (triple letters, casing,
//! duplicates, replacement similarity, patterns, syllable counts) apply on
//! every successful split.

use crate::aff::{Affix, Prefix, Suffix};
use crate::dic::{Casing, WordEntry};
use crate::dictionary::Dictionary;
use crate::flag::{Flag, FlagSet, HIDDEN_HOMONYM_FLAG};
use crate::lookup::AffixingMode::{self, AtCompoundBegin, AtCompoundEnd, AtCompoundMiddle};
use crate::tables::CompoundPattern;

/// A validated compound part: the head stem plus the counters that feed
/// the word-count and syllable bookkeeping
#[derive(Debug, Clone, Copy)]
pub(crate) struct CompoundingResult<'a> {
	pub(crate) entry: &'a WordEntry,
	pub(crate) num_words_modifier: u16,
	pub(crate) num_syllable_modifier: i16,
	/// Whether the part was derived through an affix that edits text
	pub(crate) affixed_and_modified: bool,
}

fn next_char(word: &str, i: usize) -> Option<char> {
	word[i..].chars().next()
}

fn prev_char(word: &str, i: usize) -> Option<char> {
	word[..i].chars().next_back()
}

/// Three identical letters would straddle the boundary at `i`
fn has_triple_at_boundary(word: &str, i: usize) -> bool {
	let (Some(before), Some(after)) = (prev_char(word, i), next_char(word, i)) else {
		return false;
	};
	if before != after {
		return false;
	}
	if next_char(word, i + after.len_utf8()) == Some(after) {
		return true;
	}
	prev_char(word, i - before.len_utf8()) == Some(after)
}

/// An uppercase letter touches the boundary at `i`
fn has_uppercase_at_boundary(word: &str, i: usize) -> bool {
	prev_char(word, i).is_some_and(char::is_uppercase)
		|| next_char(word, i).is_some_and(char::is_uppercase)
}

impl Dictionary {
	/// Try to read `word` as a compound of dictionary stems
	pub(crate) fn check_compound(
		&self,
		word: &str,
		input_casing: Casing,
	) -> Option<CompoundingResult<'_>> {
		let sf = &self.aff.special_flags;
		if sf.compound.is_set()
			|| sf.compound_begin.is_set()
			|| sf.compound_middle.is_set()
			|| sf.compound_last.is_set()
		{
			let mut buf = word.to_owned();
			let ret = self.check_compound_at(&mut buf, 0, 0, AtCompoundBegin, input_casing);
			if ret.is_some() {
				return ret;
			}
		}
		if !self.aff.options.compound_rules.is_empty() {
			let mut words_data = Vec::new();
			return self.check_compound_with_rules(word, &mut words_data, 0, input_casing);
		}
		None
	}

	/// Byte offsets where a cut keeps both sides at the minimum length
	fn cut_positions(&self, word: &str, start_pos: usize) -> Vec<usize> {
		let min_length = match self.aff.options.compound_min_length {
			0 => 3,
			n => usize::from(n),
		};
		let tail = &word[start_pos..];
		let offsets: Vec<usize> = tail.char_indices().map(|(o, _)| o).collect();
		let tail_chars = offsets.len();
		(min_length..=tail_chars.saturating_sub(min_length))
			.map(|k| start_pos + offsets[k])
			.collect()
	}

	fn check_compound_at<'a>(
		&'a self,
		word: &mut String,
		start_pos: usize,
		num_part: usize,
		m: AffixingMode,
		input_casing: Casing,
	) -> Option<CompoundingResult<'a>> {
		for i in self.cut_positions(word, start_pos) {
			let ret =
				self.check_compound_classic(word, start_pos, i, num_part, m, input_casing);
			if ret.is_some() {
				return ret;
			}
			let ret = self.check_compound_with_pattern_replacements(
				word,
				start_pos,
				i,
				num_part,
				m,
				input_casing,
			);
			if ret.is_some() {
				return ret;
			}
		}
		None
	}

	#[allow(clippy::too_many_lines)]
	fn check_compound_classic<'a>(
		&'a self,
		word: &mut String,
		start_pos: usize,
		i: usize,
		num_part: usize,
		m: AffixingMode,
		input_casing: Casing,
	) -> Option<CompoundingResult<'a>> {
		let opts = &self.aff.options;
		let sf = &self.aff.special_flags;

		let mut part = word[start_pos..i].to_owned();
		let part1_entry = self.check_word_in_compound(&mut part, m)?;
		if part1_entry.entry.flags.contains(sf.forbidden_word) {
			return None;
		}
		if opts.compound_check_triple && has_triple_at_boundary(word, i) {
			return None;
		}
		if opts.compound_check_case && has_uppercase_at_boundary(word, i) {
			return None;
		}

		let mut num_part = num_part
			+ usize::from(part1_entry.num_words_modifier)
			+ usize::from(part1_entry.entry.flags.contains(sf.compound_root));

		// whole second part at once
		'direct: {
			let mut part = word[i..].to_owned();
			let Some(part2_entry) =
				self.check_word_in_compound(&mut part, AtCompoundEnd)
			else {
				break 'direct;
			};
			if part2_entry.entry.flags.contains(sf.forbidden_word) {
				break 'direct;
			}
			if self.is_forbidden_by_patterns(word, i, &part1_entry, &part2_entry) {
				break 'direct;
			}
			if opts.compound_check_duplicate
				&& std::ptr::eq(part1_entry.entry, part2_entry.entry)
			{
				break 'direct;
			}
			if opts.compound_check_rep && self.is_rep_similar(&word[start_pos..]) {
				break 'direct;
			}
			if matches!(input_casing, Casing::Small | Casing::Camel)
				&& part2_entry
					.entry
					.flags
					.contains(sf.compound_force_uppercase)
			{
				break 'direct;
			}
			let saved_num_part = num_part;
			num_part += usize::from(part2_entry.num_words_modifier);
			num_part += usize::from(
				part2_entry.entry.flags.contains(sf.compound_root),
			);
			if opts.compound_max_word_count != 0
				&& num_part + 1 >= usize::from(opts.compound_max_word_count)
			{
				if opts.compound_syllable_vowels.is_empty() {
					// the part count can only grow from here
					return None;
				}
				let num_syllable = self.count_syllables(word) as i32
					+ i32::from(part2_entry.num_syllable_modifier);
				if num_syllable > i32::from(opts.compound_syllable_max) {
					num_part = saved_num_part;
					break 'direct;
				}
			}
			return Some(part1_entry);
		}

		// second part as a further compound
		'recursive: {
			let Some(part2_entry) = self.check_compound_at(
				word,
				i,
				num_part + 1,
				AtCompoundMiddle,
				input_casing,
			) else {
				break 'recursive;
			};
			if self.is_forbidden_by_patterns(word, i, &part1_entry, &part2_entry) {
				break 'recursive;
			}
			if opts.compound_check_rep {
				if self.is_rep_similar(&word[start_pos..]) {
					break 'recursive;
				}
				let p2word = &part2_entry.entry.stem;
				if word[i..].starts_with(p2word.as_str())
					&& self.is_rep_similar(&word[start_pos..i + p2word.len()])
				{
					break 'recursive;
				}
			}
			return Some(part1_entry);
		}

		// retry with one boundary letter restored (SIMPLIFIEDTRIPLE)
		if !opts.compound_simplified_triple {
			return None;
		}
		let doubled = prev_char(word, i)?;
		if prev_char(word, i - doubled.len_utf8()) != Some(doubled) {
			return None;
		}
		word.insert(i, doubled);
		let result = self.simplified_triple_tail(
			word,
			start_pos,
			i,
			num_part,
			part1_entry,
			input_casing,
		);
		word.remove(i);
		result
	}

	/// The second-part attempts after the boundary letter was re-doubled
	#[allow(clippy::too_many_arguments)]
	fn simplified_triple_tail<'a>(
		&'a self,
		word: &mut String,
		start_pos: usize,
		i: usize,
		num_part: usize,
		part1_entry: CompoundingResult<'a>,
		input_casing: Casing,
	) -> Option<CompoundingResult<'a>> {
		let opts = &self.aff.options;
		let sf = &self.aff.special_flags;

		// the inserted copy must not take part in rep similarity
		let without_inserted = |word: &str, upto: Option<usize>| -> String {
			let end = upto.unwrap_or(word.len());
			let mut s = word[start_pos..end].to_owned();
			s.remove(i - start_pos);
			s
		};

		'direct: {
			let mut part = word[i..].to_owned();
			let Some(part2_entry) =
				self.check_word_in_compound(&mut part, AtCompoundEnd)
			else {
				break 'direct;
			};
			if part2_entry.entry.flags.contains(sf.forbidden_word) {
				break 'direct;
			}
			if self.is_forbidden_by_patterns(word, i, &part1_entry, &part2_entry) {
				break 'direct;
			}
			if opts.compound_check_duplicate
				&& std::ptr::eq(part1_entry.entry, part2_entry.entry)
			{
				break 'direct;
			}
			if opts.compound_check_rep
				&& self.is_rep_similar(&without_inserted(word, None))
			{
				break 'direct;
			}
			if matches!(input_casing, Casing::Small | Casing::Camel)
				&& part2_entry
					.entry
					.flags
					.contains(sf.compound_force_uppercase)
			{
				break 'direct;
			}
			if opts.compound_max_word_count != 0
				&& num_part + 1 >= usize::from(opts.compound_max_word_count)
			{
				return None;
			}
			return Some(part1_entry);
		}

		let part2_entry =
			self.check_compound_at(word, i, num_part + 1, AtCompoundMiddle, input_casing)?;
		if self.is_forbidden_by_patterns(word, i, &part1_entry, &part2_entry) {
			return None;
		}
		if opts.compound_check_rep {
			if self.is_rep_similar(&without_inserted(word, None)) {
				return None;
			}
			let p2word = &part2_entry.entry.stem;
			if word[i..].starts_with(p2word.as_str())
				&& self.is_rep_similar(&without_inserted(word, Some(i + p2word.len())))
			{
				return None;
			}
		}
		Some(part1_entry)
	}

	/// Splits whose junction text matches a pattern's `replacement` are
	/// retried with the junction rewritten to the pattern's boundary pair
	#[allow(clippy::too_many_lines)]
	fn check_compound_with_pattern_replacements<'a>(
		&'a self,
		word: &mut String,
		start_pos: usize,
		i: usize,
		num_part: usize,
		m: AffixingMode,
		input_casing: Casing,
	) -> Option<CompoundingResult<'a>> {
		for p in &self.aff.options.compound_patterns {
			if p.replacement.is_empty() {
				continue;
			}
			if !word[i..].starts_with(&p.replacement) {
				continue;
			}

			let begin_end =
				format!("{}{}", p.first_end_chars, p.second_begin_chars);
			word.replace_range(i..i + p.replacement.len(), &begin_end);
			let i2 = i + p.first_end_chars.len();
			let result = self.pattern_replacement_attempt(
				word,
				start_pos,
				i2,
				num_part,
				p,
				m,
				input_casing,
			);
			word.replace_range(i..i + begin_end.len(), &p.replacement);
			if result.is_some() {
				return result;
			}
		}
		None
	}

	#[allow(clippy::too_many_arguments, clippy::too_many_lines)]
	fn pattern_replacement_attempt<'a>(
		&'a self,
		word: &mut String,
		start_pos: usize,
		i: usize,
		num_part: usize,
		p: &CompoundPattern,
		m: AffixingMode,
		input_casing: Casing,
	) -> Option<CompoundingResult<'a>> {
		let opts = &self.aff.options;
		let sf = &self.aff.special_flags;

		let mut part = word[start_pos..i].to_owned();
		let part1_entry = self.check_word_in_compound(&mut part, m)?;
		if part1_entry.entry.flags.contains(sf.forbidden_word) {
			return None;
		}
		if p.first_word_flag.is_set()
			&& !part1_entry.entry.flags.contains(p.first_word_flag)
		{
			return None;
		}
		if opts.compound_check_triple && has_triple_at_boundary(word, i) {
			return None;
		}

		// the junction as the file spelled it, for rep similarity; the
		// boolean drops the re-doubled letter of the simplified retry
		let with_replacement = |word: &str, upto: Option<usize>, drop_inserted: bool| {
			let end = upto.unwrap_or(word.len());
			let mut s = word[start_pos..end].to_owned();
			if drop_inserted && s.is_char_boundary(i - start_pos) {
				s.remove(i - start_pos);
			}
			let begin_end_len = p.first_end_chars.len() + p.second_begin_chars.len();
			let at = i - p.first_end_chars.len() - start_pos;
			if at + begin_end_len <= s.len()
				&& s.is_char_boundary(at)
				&& s.is_char_boundary(at + begin_end_len)
			{
				s.replace_range(at..at + begin_end_len, &p.replacement);
			}
			s
		};

		'direct: {
			let mut part = word[i..].to_owned();
			let Some(part2_entry) =
				self.check_word_in_compound(&mut part, AtCompoundEnd)
			else {
				break 'direct;
			};
			if part2_entry.entry.flags.contains(sf.forbidden_word) {
				break 'direct;
			}
			if p.second_word_flag.is_set()
				&& !part2_entry.entry.flags.contains(p.second_word_flag)
			{
				break 'direct;
			}
			if opts.compound_check_duplicate
				&& std::ptr::eq(part1_entry.entry, part2_entry.entry)
			{
				break 'direct;
			}
			if opts.compound_check_rep
				&& self.is_rep_similar(&with_replacement(word, None, false))
			{
				break 'direct;
			}
			if matches!(input_casing, Casing::Small | Casing::Camel)
				&& part2_entry
					.entry
					.flags
					.contains(sf.compound_force_uppercase)
			{
				break 'direct;
			}
			if opts.compound_max_word_count != 0
				&& num_part + 1 >= usize::from(opts.compound_max_word_count)
			{
				return None;
			}
			return Some(part1_entry);
		}

		'recursive: {
			let Some(part2_entry) = self.check_compound_at(
				word,
				i,
				num_part + 1,
				AtCompoundMiddle,
				input_casing,
			) else {
				break 'recursive;
			};
			if p.second_word_flag.is_set()
				&& !part2_entry.entry.flags.contains(p.second_word_flag)
			{
				break 'recursive;
			}
			if opts.compound_check_rep {
				if self.is_rep_similar(&with_replacement(word, None, false)) {
					break 'recursive;
				}
				let p2word = &part2_entry.entry.stem;
				if word[i..].starts_with(p2word.as_str())
					&& self.is_rep_similar(&word[start_pos..i + p2word.len()])
				{
					break 'recursive;
				}
			}
			return Some(part1_entry);
		}

		// re-doubled boundary letter, within the rewritten junction
		if !opts.compound_simplified_triple {
			return None;
		}
		let doubled = prev_char(word, i)?;
		if prev_char(word, i - doubled.len_utf8()) != Some(doubled) {
			return None;
		}
		word.insert(i, doubled);
		let result = 'triple: {
			'direct: {
				let mut part = word[i..].to_owned();
				let Some(part2_entry) =
					self.check_word_in_compound(&mut part, AtCompoundEnd)
				else {
					break 'direct;
				};
				if part2_entry.entry.flags.contains(sf.forbidden_word) {
					break 'direct;
				}
				if p.second_word_flag.is_set()
					&& !part2_entry.entry.flags.contains(p.second_word_flag)
				{
					break 'direct;
				}
				if opts.compound_check_duplicate
					&& std::ptr::eq(part1_entry.entry, part2_entry.entry)
				{
					break 'direct;
				}
				if opts.compound_check_rep
					&& self.is_rep_similar(&with_replacement(word, None, true))
				{
					break 'direct;
				}
				if matches!(input_casing, Casing::Small | Casing::Camel)
					&& part2_entry
						.entry
						.flags
						.contains(sf.compound_force_uppercase)
				{
					break 'direct;
				}
				if opts.compound_max_word_count != 0
					&& num_part + 1 >= usize::from(opts.compound_max_word_count)
				{
					break 'triple None;
				}
				break 'triple Some(part1_entry);
			}

			let Some(part2_entry) = self.check_compound_at(
				word,
				i,
				num_part + 1,
				AtCompoundMiddle,
				input_casing,
			) else {
				break 'triple None;
			};
			if p.second_word_flag.is_set()
				&& !part2_entry.entry.flags.contains(p.second_word_flag)
			{
				break 'triple None;
			}
			if opts.compound_check_rep {
				if self.is_rep_similar(&with_replacement(word, None, true)) {
					break 'triple None;
				}
				let p2word = &part2_entry.entry.stem;
				if word[i..].starts_with(p2word.as_str()) {
					let mut part =
						word[start_pos..i + p2word.len()].to_owned();
					if part.is_char_boundary(i - start_pos) {
						part.remove(i - start_pos);
					}
					if self.is_rep_similar(&part) {
						break 'triple None;
					}
				}
			}
			Some(part1_entry)
		};
		word.remove(i);
		result
	}

	/// Validate one compound part at its position: direct lookup, then
	/// suffix, prefix and commutative affix stripping with the mode kept
	fn check_word_in_compound<'a>(
		&'a self,
		word: &mut String,
		m: AffixingMode,
	) -> Option<CompoundingResult<'a>> {
		let sf = &self.aff.special_flags;
		let cpd_flag = match m {
			AtCompoundBegin => sf.compound_begin,
			AtCompoundMiddle => sf.compound_middle,
			AtCompoundEnd => sf.compound_last,
			AffixingMode::FullWord => Flag::default(),
		};

		for we in self.dic.homonyms(word) {
			let word_flags = &we.flags;
			if word_flags.contains(sf.need_affix) {
				continue;
			}
			if !word_flags.contains(sf.compound) && !word_flags.contains(cpd_flag) {
				continue;
			}
			if word_flags.contains(HIDDEN_HOMONYM_FLAG) {
				continue;
			}
			return Some(CompoundingResult {
				entry: we,
				num_words_modifier: 0,
				num_syllable_modifier: self.entry_syllable_modifier(we, m),
				affixed_and_modified: false,
			});
		}

		if let Some((we, se)) = self.strip_suffix_only(word, true, m) {
			return Some(CompoundingResult {
				entry: we,
				num_words_modifier: 0,
				num_syllable_modifier: self.suffix_syllable_modifier(we, se, m),
				affixed_and_modified: se.is_modifying(),
			});
		}
		if let Some((we, pe)) = self.strip_prefix_only(word, true, m) {
			return Some(CompoundingResult {
				entry: we,
				num_words_modifier: self.prefix_words_modifier(pe),
				num_syllable_modifier: 0,
				affixed_and_modified: pe.is_modifying(),
			});
		}
		if let Some((we, se, pe)) =
			self.strip_prefix_then_suffix_commutative(word, true, m)
		{
			return Some(CompoundingResult {
				entry: we,
				num_words_modifier: self.prefix_words_modifier(pe),
				num_syllable_modifier: self.suffix_syllable_modifier(we, se, m),
				affixed_and_modified: se.is_modifying() || pe.is_modifying(),
			});
		}
		None
	}

	fn is_forbidden_by_patterns(
		&self,
		word: &str,
		i: usize,
		first: &CompoundingResult<'_>,
		second: &CompoundingResult<'_>,
	) -> bool {
		self.aff
			.options
			.compound_patterns
			.iter()
			.any(|p| match_compound_pattern(p, word, i, first, second))
	}

	/// Does any replacement-table rewrite of `word` spell correctly?
	pub(crate) fn is_rep_similar(&self, word: &str) -> bool {
		let reps = &self.aff.options.replacements;
		for (from, to) in reps.whole_word_replacements() {
			if word == from && self.check_simple_word(to, false).is_some() {
				return true;
			}
		}
		for (from, to) in reps.start_word_replacements() {
			if let Some(rest) = word.strip_prefix(from.as_str()) {
				let candidate = format!("{to}{rest}");
				if self.check_simple_word(&candidate, false).is_some() {
					return true;
				}
			}
		}
		for (from, to) in reps.end_word_replacements() {
			if let Some(rest) = word.strip_suffix(from.as_str()) {
				let candidate = format!("{rest}{to}");
				if self.check_simple_word(&candidate, false).is_some() {
					return true;
				}
			}
		}
		for (from, to) in reps.any_place_replacements() {
			let mut search_from = 0;
			while let Some(at) = word[search_from..].find(from.as_str()) {
				let at = search_from + at;
				let candidate = format!(
					"{}{to}{}",
					&word[..at],
					&word[at + from.len()..]
				);
				if self.check_simple_word(&candidate, false).is_some() {
					return true;
				}
				search_from = at + 1;
				while !word.is_char_boundary(search_from) {
					search_from += 1;
				}
			}
		}
		false
	}

	// ——— Hungarian syllable bookkeeping

	pub(crate) fn count_syllables(&self, word: &str) -> usize {
		let vowels = &self.aff.options.compound_syllable_vowels;
		word.chars().filter(|&c| vowels.contains(c)).count()
	}

	fn prefix_words_modifier(&self, pfx: &Affix<Prefix>) -> u16 {
		if self.aff.options.compound_syllable_vowels.is_empty() {
			return 0;
		}
		u16::from(self.count_syllables(&pfx.add) > 1)
	}

	fn entry_syllable_modifier(&self, we: &WordEntry, m: AffixingMode) -> i16 {
		let subtract = m == AtCompoundEnd
			&& !self.aff.options.compound_syllable_vowels.is_empty()
			&& we.flags.contains(Flag(b'I' as u16))
			&& !we.flags.contains(Flag(b'J' as u16));
		0 - i16::from(subtract)
	}

	fn suffix_syllable_modifier(
		&self,
		we: &WordEntry,
		sfx: &Affix<Suffix>,
		m: AffixingMode,
	) -> i16 {
		if m != AtCompoundEnd {
			return 0;
		}
		if self.aff.options.compound_syllable_vowels.is_empty() {
			return 0;
		}
		let append = &sfx.add;
		let mut modifier = -(self.count_syllables(append) as i16);
		let mut sfx_extra = append.ends_with('i');
		if sfx_extra && append.chars().count() > 1 {
			let before_last = append.chars().rev().nth(1);
			sfx_extra = before_last != Some('y') && before_last != Some('t');
		}
		modifier -= i16::from(sfx_extra);

		if self.aff.options.compound_syllable_num {
			match sfx.flag {
				f if f == Flag(b'c' as u16) => modifier += 2,
				f if f == Flag(b'J' as u16) => modifier += 1,
				f if f == Flag(b'I' as u16) => {
					modifier += i16::from(we.flags.contains(Flag(b'J' as u16)));
				}
				_ => {}
			}
		}
		modifier
	}

	// ——— rule-based compounding

	fn check_compound_with_rules<'a>(
		&'a self,
		word: &str,
		words_data: &mut Vec<&'a FlagSet>,
		start_pos: usize,
		input_casing: Casing,
	) -> Option<CompoundingResult<'a>> {
		let opts = &self.aff.options;
		let sf = &self.aff.special_flags;
		for i in self.cut_positions(word, start_pos) {
			let part1 = &word[start_pos..i];
			let part1_entry = self.dic.homonyms(part1).find(|we| {
				!we.flags.contains(sf.need_affix)
					&& opts.compound_rules.has_any_of_flags(&we.flags)
			});
			let Some(part1_entry) = part1_entry else {
				continue;
			};

			words_data.push(&part1_entry.flags);
			let result = 'attempt: {
				let part2 = &word[i..];
				let part2_entry = self.dic.homonyms(part2).find(|we| {
					!we.flags.contains(sf.need_affix)
						&& opts.compound_rules.has_any_of_flags(&we.flags)
				});
				if let Some(part2_entry) = part2_entry {
					words_data.push(&part2_entry.flags);
					let matched = opts.compound_rules.match_any_rule(words_data);
					words_data.pop();
					let force_rejected = matches!(
						input_casing,
						Casing::Small | Casing::Camel
					) && part2_entry
						.flags
						.contains(sf.compound_force_uppercase);
					if matched && !force_rejected {
						break 'attempt Some(CompoundingResult {
							entry: part1_entry,
							num_words_modifier: 0,
							num_syllable_modifier: 0,
							affixed_and_modified: false,
						});
					}
				}
				self.check_compound_with_rules(word, words_data, i, input_casing)
			};
			words_data.pop();
			if result.is_some() {
				return result;
			}
		}
		None
	}
}

/// Does this forbidding pattern match the split of `word` at `i`?
fn match_compound_pattern(
	p: &CompoundPattern,
	word: &str,
	i: usize,
	first: &CompoundingResult<'_>,
	second: &CompoundingResult<'_>,
) -> bool {
	let fl = p.first_end_chars.len();
	if i < fl {
		return false;
	}
	if word.as_bytes()[i - fl..i] != *p.first_end_chars.as_bytes() {
		return false;
	}
	if !word.as_bytes()[i..].starts_with(p.second_begin_chars.as_bytes()) {
		return false;
	}
	if p.first_word_flag.is_set() && !first.entry.flags.contains(p.first_word_flag) {
		return false;
	}
	if p.second_word_flag.is_set() && !second.entry.flags.contains(p.second_word_flag) {
		return false;
	}
	if p.match_first_only_unaffixed && first.affixed_and_modified {
		return false;
	}
	true
}

#[cfg(test)]
mod tests {
	use crate::Dictionary;

	fn dict(aff: &str, dic: &str) -> Dictionary {
		Dictionary::from_slice(aff, dic).unwrap()
	}

	#[test]
	fn flag_based_two_part_compound() {
		let d = dict("COMPOUNDFLAG X\n", "2\nfoot/X\nball/X\n");
		assert!(d.spell("football"));
		assert!(d.spell("ballfoot"));
		assert!(!d.spell("balltree"));
		// plain stems stay valid on their own
		assert!(d.spell("ball"));
		assert!(d.spell("foot"));
	}

	#[test]
	fn positional_compound_flags() {
		let aff = "COMPOUNDBEGIN B\nCOMPOUNDMIDDLE M\nCOMPOUNDEND E\n";
		let d = dict(aff, "3\nfoo/B\nbar/M\nbaz/E\n");
		assert!(d.spell("foobaz"));
		assert!(d.spell("foobarbaz"));
		assert!(!d.spell("barfoo"));
		assert!(!d.spell("foobar"));
	}

	#[test]
	fn compound_min_length_applies() {
		let d = dict("COMPOUNDFLAG X\nCOMPOUNDMIN 4\n", "2\nfoot/X\nball/X\n");
		assert!(d.spell("football"));
		let d = dict("COMPOUNDFLAG X\nCOMPOUNDMIN 5\n", "2\nfoot/X\nball/X\n");
		assert!(!d.spell("football"));
	}

	#[test]
	fn compound_word_max_caps_parts() {
		let d = dict("COMPOUNDFLAG X\nCOMPOUNDWORDMAX 2\n", "2\nfoo/X\nbar/X\n");
		assert!(d.spell("foobar"));
		assert!(!d.spell("foobarfoo"));
		let unlimited = dict("COMPOUNDFLAG X\n", "2\nfoo/X\nbar/X\n");
		assert!(unlimited.spell("foobarfoo"));
	}

	#[test]
	fn triple_letters_at_boundary_are_rejected() {
		let aff = "COMPOUNDFLAG X\nCHECKCOMPOUNDTRIPLE\n";
		let d = dict(aff, "2\nfell/X\nlike/X\n");
		assert!(!d.spell("felllike"));
		assert!(d.spell("likefell"));
	}

	#[test]
	fn simplified_triple_restores_a_letter() {
		let aff = "COMPOUNDFLAG X\nCHECKCOMPOUNDTRIPLE\nSIMPLIFIEDTRIPLE\n";
		let d = dict(aff, "2\nfell/X\nlike/X\n");
		// junction written with two l's, the third is restored to check
		assert!(d.spell("fellike"));
		// three letters at the boundary stay forbidden
		assert!(!d.spell("felllike"));
	}

	#[test]
	fn duplicate_parts_can_be_forbidden() {
		let d = dict("COMPOUNDFLAG X\nCHECKCOMPOUNDDUP\n", "2\nfoo/X\nbar/X\n");
		assert!(!d.spell("foofoo"));
		assert!(d.spell("foobar"));
	}

	#[test]
	fn uppercase_at_boundary_can_be_forbidden() {
		let aff = "COMPOUNDFLAG X\nCHECKCOMPOUNDCASE\n";
		let d = dict(aff, "2\nfoo/X\nBar/X\n");
		assert!(!d.spell("fooBar"));
		assert!(d.spell("foofoo"));
	}

	#[test]
	fn rep_similar_compounds_are_rejected() {
		let aff = "COMPOUNDFLAG X\nCHECKCOMPOUNDREP\nREP 1\nREP í i\n";
		let d = dict(aff, "3\nszer/X\nvíz/X\nszerviz\n");
		// szer+víz reads as a compound but rewrites to the real word
		assert!(!d.spell("szervíz"));
		assert!(d.spell("szerviz"));
	}

	#[test]
	fn force_uppercase_flag_on_second_part() {
		let aff = "COMPOUNDFLAG X\nFORCEUCASE U\n";
		let d = dict(aff, "2\nfoo/X\nbar/XU\n");
		assert!(!d.spell("foobar"));
		assert!(d.spell("Foobar"));
		assert!(d.spell("FOOBAR"));
		assert!(d.spell("barfoo"));
	}

	#[test]
	fn compound_pattern_forbids_boundaries() {
		let aff = "COMPOUNDFLAG X\nCHECKCOMPOUNDPATTERN 1\nCHECKCOMPOUNDPATTERN o b\n";
		let d = dict(aff, "2\nfoo/X\nbar/X\n");
		assert!(!d.spell("foobar"));
		assert!(d.spell("barfoo"));
	}

	#[test]
	fn affixed_parts_participate_in_compounds() {
		let aff = "COMPOUNDFLAG X\nCOMPOUNDPERMITFLAG P\nSFX S Y 1\nSFX S 0 s/P .\n";
		let d = dict(aff, "2\nfoot/XS\nball/X\n");
		assert!(d.spell("footsball"));
		let no_permit = dict(
			"COMPOUNDFLAG X\nSFX S Y 1\nSFX S 0 s .\n",
			"2\nfoot/XS\nball/X\n",
		);
		assert!(!no_permit.spell("footsball"));
	}

	#[test]
	fn rule_based_compounding() {
		let aff = "COMPOUNDRULE 1\nCOMPOUNDRULE AB\n";
		let d = dict(aff, "2\nfoo/A\nbar/B\n");
		assert!(d.spell("foobar"));
		assert!(!d.spell("barfoo"));
	}

	#[test]
	fn rule_operators_allow_repetition() {
		let aff = "COMPOUNDRULE 1\nCOMPOUNDRULE A*B\n";
		let d = dict(aff, "2\nfoo/A\nbar/B\n");
		assert!(d.spell("foobar"));
		assert!(d.spell("foofoobar"));
		assert!(!d.spell("barbar"));
	}

	#[test]
	fn numeric_rule_compounding() {
		let aff = "FLAG num\nCOMPOUNDMIN 1\nCOMPOUNDRULE 1\nCOMPOUNDRULE (11)(22)?(33)\n";
		let d = dict(aff, "3\n0/11\n1st/33\n2nd/22\n");
		assert!(d.spell("01st"));
		assert!(d.spell("02nd1st"));
		assert!(!d.spell("1st0"));
	}
}
