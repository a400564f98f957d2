//! Lookup tables built once from the affix file
//!
//! All of these are immutable after construction. They are plain sorted or
//! partitioned vectors; the construction step normalizes the raw parsed
//! entries (dropping degenerate ones, splitting off anchors) so the query
//! paths stay branch-light.

use crate::flag::{Flag, FlagSet};
use std::cmp::Ordering;

/// `BREAK` patterns, partitioned into the three anchor groups
///
/// Entries starting with `^` apply at the start of the word, entries ending
/// with `$` at the end, the rest anywhere in the middle. The anchors are
/// stripped during construction.
#[derive(Debug, Default)]
pub(crate) struct BreakTable {
	table: Vec<String>,
	start_last_idx: usize,
	end_last_idx: usize,
}

impl BreakTable {
	pub(crate) fn new(patterns: Vec<String>) -> Self {
		let mut start = Vec::new();
		let mut end = Vec::new();
		let mut middle = Vec::new();
		for pat in patterns {
			if pat.is_empty() || pat == "^" || pat == "$" {
				continue;
			}
			if let Some(rest) = pat.strip_prefix('^') {
				start.push(rest.to_owned());
			} else if let Some(rest) = pat.strip_suffix('$') {
				end.push(rest.to_owned());
			} else {
				middle.push(pat);
			}
		}
		let start_last_idx = start.len();
		let end_last_idx = start_last_idx + end.len();
		let mut table = start;
		table.append(&mut end);
		table.append(&mut middle);
		Self {
			table,
			start_last_idx,
			end_last_idx,
		}
	}

	pub(crate) fn start_word_breaks(&self) -> &[String] {
		&self.table[..self.start_last_idx]
	}

	pub(crate) fn end_word_breaks(&self) -> &[String] {
		&self.table[self.start_last_idx..self.end_last_idx]
	}

	pub(crate) fn middle_word_breaks(&self) -> &[String] {
		&self.table[self.end_last_idx..]
	}
}

/// Ordered rewrite table used for `ICONV` and `OCONV`
///
/// At every position of the scanned string the longest matching source
/// string wins; the scan resumes after the inserted replacement.
#[derive(Debug, Default)]
pub(crate) struct SubstrReplacer {
	/// Pairs sorted by source string, first entry wins among duplicates
	table: Vec<(String, String)>,
}

/// Compare `key` against the first `key.len()` bytes of `of`; `Equal`
/// means `key` is a prefix of `of`.
fn cmp_prefix_of(key: &str, of: &str) -> Ordering {
	let n = key.len().min(of.len());
	key.as_bytes().cmp(&of.as_bytes()[..n])
}

impl SubstrReplacer {
	pub(crate) fn new(mut pairs: Vec<(String, String)>) -> Self {
		pairs.sort_by(|a, b| a.0.cmp(&b.0));
		pairs.dedup_by(|a, b| a.0 == b.0);
		pairs.retain(|p| !p.0.is_empty());
		Self { table: pairs }
	}

	pub(crate) fn is_empty(&self) -> bool {
		self.table.is_empty()
	}

	/// Longest entry whose source is a prefix of `s`
	fn find_match(&self, s: &str) -> Option<&(String, String)> {
		let mut first = 0;
		let mut last_match = None;
		loop {
			let ub = first
				+ self.table[first..]
					.partition_point(|p| cmp_prefix_of(&p.0, s) != Ordering::Greater);
			if ub == first {
				break;
			}
			let candidate = &self.table[ub - 1];
			if cmp_prefix_of(&candidate.0, s) != Ordering::Equal {
				break;
			}
			last_match = Some(candidate);
			first = ub;
		}
		last_match
	}

	pub(crate) fn replace(&self, s: &mut String) {
		if self.table.is_empty() {
			return;
		}
		let mut i = 0;
		while i < s.len() {
			match self.find_match(&s[i..]) {
				Some((from, to)) => {
					let from_len = from.len();
					let to_len = to.len();
					s.replace_range(i..i + from_len, to);
					i += to_len;
				}
				None => {
					i += s[i..].chars().next().map_or(1, char::len_utf8);
				}
			}
		}
	}

	pub(crate) fn replace_copy(&self, s: &str) -> String {
		let mut copy = s.to_owned();
		self.replace(&mut copy);
		copy
	}
}

/// `REP` entries, partitioned into whole-word, start, end and any-place
/// groups with their anchors stripped
#[derive(Debug, Default)]
pub(crate) struct ReplacementTable {
	table: Vec<(String, String)>,
	whole_last_idx: usize,
	start_last_idx: usize,
	end_last_idx: usize,
}

impl ReplacementTable {
	pub(crate) fn new(pairs: Vec<(String, String)>) -> Self {
		let mut whole = Vec::new();
		let mut start = Vec::new();
		let mut end = Vec::new();
		let mut any = Vec::new();
		for (from, to) in pairs {
			if from.is_empty() || from == "^" || from == "$" {
				continue;
			}
			if let Some(rest) = from.strip_prefix('^') {
				match rest.strip_suffix('$') {
					Some(inner) => whole.push((inner.to_owned(), to)),
					None => start.push((rest.to_owned(), to)),
				}
			} else if let Some(rest) = from.strip_suffix('$') {
				end.push((rest.to_owned(), to));
			} else {
				any.push((from, to));
			}
		}
		let whole_last_idx = whole.len();
		let start_last_idx = whole_last_idx + start.len();
		let end_last_idx = start_last_idx + end.len();
		let mut table = whole;
		table.append(&mut start);
		table.append(&mut end);
		table.append(&mut any);
		Self {
			table,
			whole_last_idx,
			start_last_idx,
			end_last_idx,
		}
	}

	pub(crate) fn is_empty(&self) -> bool {
		self.table.is_empty()
	}

	pub(crate) fn whole_word_replacements(&self) -> &[(String, String)] {
		&self.table[..self.whole_last_idx]
	}

	pub(crate) fn start_word_replacements(&self) -> &[(String, String)] {
		&self.table[self.whole_last_idx..self.start_last_idx]
	}

	pub(crate) fn end_word_replacements(&self) -> &[(String, String)] {
		&self.table[self.start_last_idx..self.end_last_idx]
	}

	pub(crate) fn any_place_replacements(&self) -> &[(String, String)] {
		&self.table[self.end_last_idx..]
	}
}

/// One `MAP` line: characters and multi-char strings considered equivalent
#[derive(Debug, Default)]
pub(crate) struct SimilarityGroup {
	pub(crate) chars: String,
	pub(crate) strings: Vec<String>,
}

impl SimilarityGroup {
	/// Parse a raw group: plain characters, with `(..)` wrapping
	/// multi-character members
	pub(crate) fn parse(s: &str) -> Self {
		let mut group = Self::default();
		let mut rest = s;
		loop {
			match rest.find('(') {
				None => {
					group.chars.push_str(rest);
					break;
				}
				Some(open) => {
					group.chars.push_str(&rest[..open]);
					rest = &rest[open + 1..];
					let Some(close) = rest.find(')') else { break };
					let member = &rest[..close];
					match member.chars().count() {
						0 => {}
						1 => group.chars.push_str(member),
						_ => group.strings.push(member.to_owned()),
					}
					rest = &rest[close + 1..];
				}
			}
		}
		group
	}
}

/// Boundary restriction between two compound parts (`CHECKCOMPOUNDPATTERN`)
#[derive(Debug, Default)]
pub(crate) struct CompoundPattern {
	/// Characters the first part must end with
	pub(crate) first_end_chars: String,
	/// Characters the second part must begin with
	pub(crate) second_begin_chars: String,
	/// Optional junction text triggering the rewrite variant
	pub(crate) replacement: String,
	pub(crate) first_word_flag: Flag,
	pub(crate) second_word_flag: Flag,
	/// An end pattern of `0` in the file: the first part must not have
	/// been derived through a modifying affix
	pub(crate) match_first_only_unaffixed: bool,
}

/// `COMPOUNDRULE` patterns over flag atoms
///
/// Each rule is a flat code sequence mixing flags with the operator codes
/// of `?` and `*`, matched by the nondeterministic worklist below.
#[derive(Debug, Default)]
pub(crate) struct CompoundRuleTable {
	rules: Vec<Vec<u16>>,
	all_flags: FlagSet,
}

const RULE_OPT: u16 = b'?' as u16;
const RULE_STAR: u16 = b'*' as u16;

impl CompoundRuleTable {
	pub(crate) fn new(rules: Vec<Vec<u16>>) -> Self {
		let mut all_flags: FlagSet = rules
			.iter()
			.flatten()
			.map(|&code| Flag(code))
			.collect();
		all_flags.erase(Flag(RULE_OPT));
		all_flags.erase(Flag(RULE_STAR));
		Self { rules, all_flags }
	}

	pub(crate) fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}

	/// Fast rejection: does the part's flag set touch the rule alphabet
	pub(crate) fn has_any_of_flags(&self, flags: &FlagSet) -> bool {
		self.all_flags.intersects(flags)
	}

	pub(crate) fn match_any_rule(&self, data: &[&FlagSet]) -> bool {
		self.rules
			.iter()
			.any(|rule| match_simple_regex(data, rule))
	}
}

/// Match a sequence of flag sets against one rule
///
/// Operators follow their atom: `?` zero or one, `*` zero or more,
/// otherwise exactly one. A data element matches an atom when its flag set
/// contains the atom's flag. Nondeterminism is handled with an explicit
/// stack of `(data_pos, pattern_pos)` states.
fn match_simple_regex(data: &[&FlagSet], pattern: &[u16]) -> bool {
	let mut states = vec![(0_usize, 0_usize)];
	while let Some((data_pos, pat_pos)) = states.pop() {
		if pat_pos == pattern.len() {
			if data_pos == data.len() {
				return true;
			}
			continue;
		}
		let atom = Flag(pattern[pat_pos]);
		let eq = data_pos < data.len() && data[data_pos].contains(atom);
		let operator = pattern.get(pat_pos + 1).copied().unwrap_or(0);
		match operator {
			RULE_OPT => {
				states.push((data_pos, pat_pos + 2));
				if eq {
					states.push((data_pos + 1, pat_pos + 2));
				}
			}
			RULE_STAR => {
				states.push((data_pos, pat_pos + 2));
				if eq {
					states.push((data_pos + 1, pat_pos));
				}
			}
			_ => {
				if eq {
					states.push((data_pos + 1, pat_pos + 1));
				}
			}
		}
	}
	false
}

/// Result of matching one phonetic rule at one position
#[derive(Debug, Default, Clone, Copy)]
struct PhonetMatchResult {
	count_matched: usize,
	go_back_before_replace: usize,
	priority: u32,
	go_back_after_replace: bool,
	treat_next_as_begin: bool,
}

/// `PHONE` rules: patterns with classes, anchors, priorities and go-backs
#[derive(Debug, Default)]
pub(crate) struct PhoneticTable {
	/// Rules sorted stably by the first pattern character
	table: Vec<(Vec<char>, Vec<char>)>,
}

impl PhoneticTable {
	pub(crate) fn new(pairs: Vec<(String, String)>) -> Self {
		let mut table: Vec<(Vec<char>, Vec<char>)> = pairs
			.into_iter()
			.filter(|p| !p.0.is_empty())
			.map(|(pat, rep)| {
				let rep = if rep == "_" { String::new() } else { rep };
				(pat.chars().collect(), rep.chars().collect())
			})
			.collect();
		table.sort_by(|a, b| a.0[0].cmp(&b.0[0]));
		Self { table }
	}

	pub(crate) fn is_empty(&self) -> bool {
		self.table.is_empty()
	}

	fn rules_starting_with(&self, c: char) -> &[(Vec<char>, Vec<char>)] {
		let lo = self.table.partition_point(|r| r.0[0] < c);
		let hi = self.table.partition_point(|r| r.0[0] <= c);
		&self.table[lo..hi]
	}

	fn match_rule(
		data: &[char],
		i: usize,
		pattern: &[char],
		at_begin: bool,
	) -> Option<PhonetMatchResult> {
		let is_meta =
			|c: char| matches!(c, '(' | '<' | '-' | '^' | '$' | '0'..='9');
		let mut ret = PhonetMatchResult {
			priority: 5,
			..PhonetMatchResult::default()
		};
		let mut j = pattern
			.iter()
			.position(|&c| is_meta(c))
			.unwrap_or(pattern.len());
		if data.len() < i + j || data[i..i + j] != pattern[..j] {
			return None;
		}
		ret.count_matched = j;
		if j == pattern.len() {
			return Some(ret);
		}
		if pattern[j] == '(' {
			let k = pattern[j..].iter().position(|&c| c == ')')? + j;
			let class = &pattern[j + 1..k];
			let next = *data.get(i + j)?;
			if !class.contains(&next) {
				return None;
			}
			j = k + 1;
			ret.count_matched += 1;
		}
		if j == pattern.len() {
			return Some(ret);
		}
		if pattern[j] == '<' {
			ret.go_back_after_replace = true;
			j += 1;
		}
		let k = pattern[j..]
			.iter()
			.position(|&c| c != '-')
			.map(|p| p + j)
			.unwrap_or(pattern.len());
		ret.go_back_before_replace = k - j;
		if ret.go_back_before_replace >= ret.count_matched {
			return None; // bad rule
		}
		if k == pattern.len() {
			return Some(ret);
		}
		j = k;
		if pattern[j].is_ascii_digit() {
			ret.priority = pattern[j] as u32 - '0' as u32;
			j += 1;
		}
		if j == pattern.len() {
			return Some(ret);
		}
		if pattern[j] == '^' {
			if !at_begin {
				return None;
			}
			j += 1;
		}
		if j == pattern.len() {
			return Some(ret);
		}
		if pattern[j] == '^' {
			ret.treat_next_as_begin = true;
			j += 1;
		}
		if j == pattern.len() {
			return Some(ret);
		}
		if pattern[j] != '$' {
			return None; // bad rule, nothing else may follow
		}
		if i + ret.count_matched == data.len() {
			return Some(ret);
		}
		None
	}

	/// Rewrite `word` in place; true when any rule fired
	pub(crate) fn replace(&self, word: &mut Vec<char>) -> bool {
		if self.table.is_empty() {
			return false;
		}
		let mut changed = false;
		let mut treat_next_as_begin = true;
		let mut go_backs = 0_usize; // bounded to avoid infinite loops
		let mut i = 0;
		while i < word.len() {
			let mut fired = false;
			for rule in self.rules_starting_with(word[i]) {
				let Some(mut m) =
					Self::match_rule(word, i, &rule.0, treat_next_as_begin)
				else {
					continue;
				};
				let mut rule = rule;
				if m.go_back_before_replace == 0 {
					// prefer a higher-priority rule matching at the
					// last matched character
					let j = i + m.count_matched - 1;
					for rule2 in self.rules_starting_with(word[j]) {
						if let Some(m2) =
							Self::match_rule(word, j, &rule2.0, false)
						{
							if m2.priority >= m.priority {
								i = j;
								rule = rule2;
								m = m2;
								break;
							}
						}
					}
				}
				let replaced = m.count_matched - m.go_back_before_replace;
				word.splice(i..i + replaced, rule.1.iter().copied());
				treat_next_as_begin = m.treat_next_as_begin;
				if m.go_back_after_replace && go_backs < 100 {
					go_backs += 1;
				} else {
					i += rule.1.len();
				}
				changed = true;
				fired = true;
				break;
			}
			if !fired {
				i += 1;
			}
		}
		changed
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn break_table_partitions_by_anchor() {
		let table = BreakTable::new(
			["-", "^pre", "post$", "^", "$", ""]
				.map(str::to_owned)
				.to_vec(),
		);
		assert_eq!(table.start_word_breaks(), ["pre"]);
		assert_eq!(table.end_word_breaks(), ["post"]);
		assert_eq!(table.middle_word_breaks(), ["-"]);
	}

	#[test]
	fn substr_replacer_empty_table_is_identity() {
		let rep = SubstrReplacer::new(Vec::new());
		assert_eq!(rep.replace_copy("unchanged"), "unchanged");
	}

	#[test]
	fn substr_replacer_prefers_longest_match() {
		let rep = SubstrReplacer::new(vec![
			("a".to_owned(), "1".to_owned()),
			("ab".to_owned(), "2".to_owned()),
			("abc".to_owned(), "3".to_owned()),
		]);
		assert_eq!(rep.replace_copy("abcd"), "3d");
		assert_eq!(rep.replace_copy("abd"), "2d");
		assert_eq!(rep.replace_copy("axb"), "1x2");
	}

	#[test]
	fn substr_replacer_does_not_rescan_replacements() {
		let rep = SubstrReplacer::new(vec![("aa".to_owned(), "a".to_owned())]);
		assert_eq!(rep.replace_copy("aaaa"), "aa");
	}

	#[test]
	fn replacement_table_partitions_into_four_groups() {
		let table = ReplacementTable::new(vec![
			("^whole$".to_owned(), "w".to_owned()),
			("^start".to_owned(), "s".to_owned()),
			("end$".to_owned(), "e".to_owned()),
			("any".to_owned(), "a".to_owned()),
		]);
		assert_eq!(table.whole_word_replacements(), [("whole".to_owned(), "w".to_owned())]);
		assert_eq!(table.start_word_replacements(), [("start".to_owned(), "s".to_owned())]);
		assert_eq!(table.end_word_replacements(), [("end".to_owned(), "e".to_owned())]);
		assert_eq!(table.any_place_replacements(), [("any".to_owned(), "a".to_owned())]);
	}

	#[test]
	fn similarity_group_splits_chars_and_strings() {
		let group = SimilarityGroup::parse("aàâ(ss)(é)");
		assert_eq!(group.chars, "aàâé");
		assert_eq!(group.strings, ["ss"]);
	}

	#[test]
	fn simple_regex_operators() {
		let a: FlagSet = [Flag(b'A' as u16)].into_iter().collect();
		let b: FlagSet = [Flag(b'B' as u16)].into_iter().collect();
		let rule = |s: &str| s.bytes().map(u16::from).collect::<Vec<_>>();

		// A*B?A
		let pattern = rule("A*B?A");
		assert!(match_simple_regex(&[&a], &pattern));
		assert!(match_simple_regex(&[&a, &a, &a], &pattern));
		assert!(match_simple_regex(&[&a, &b, &a], &pattern));
		assert!(!match_simple_regex(&[&b, &b, &a], &pattern));
		assert!(!match_simple_regex(&[&a, &b], &pattern));

		// exactly-one atoms
		let pattern = rule("AB");
		assert!(match_simple_regex(&[&a, &b], &pattern));
		assert!(!match_simple_regex(&[&a], &pattern));
	}

	#[test]
	fn phonetic_table_basic_rewrite() {
		let table = PhoneticTable::new(vec![
			("PH".to_owned(), "F".to_owned()),
			("A".to_owned(), "_".to_owned()),
		]);
		let mut word: Vec<char> = "PHA".chars().collect();
		assert!(table.replace(&mut word));
		assert_eq!(word.iter().collect::<String>(), "F");
	}

	#[test]
	fn phonetic_table_respects_begin_anchor() {
		// "K^" only applies at the beginning of the word
		let table = PhoneticTable::new(vec![("K^".to_owned(), "C".to_owned())]);
		let mut word: Vec<char> = "KIK".chars().collect();
		assert!(table.replace(&mut word));
		assert_eq!(word.iter().collect::<String>(), "CIK");
	}
}
