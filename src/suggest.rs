//! Logic of the [`Dictionary`] to suggest corrections
//!
//! Each strategy perturbs the misspelled word in one systematic way and
//! funnels every candidate through the checker. Accepted candidates are
//! appended in discovery order, without duplicates and without ranking.

use crate::dic::{to_upper, Casing};
use crate::dictionary::Dictionary;

fn collect(chars: &[char]) -> String {
	chars.iter().collect()
}

/// Single-character uppercase mapping; multi-character expansions (like
/// `ß` to `SS`) keep the original so positions stay aligned
fn upper_char(c: char) -> char {
	let mut it = c.to_uppercase();
	match (it.next(), it.next()) {
		(Some(u), None) => u,
		_ => c,
	}
}

fn lower_char(c: char) -> char {
	let mut it = c.to_lowercase();
	match (it.next(), it.next()) {
		(Some(l), None) => l,
		_ => c,
	}
}

impl Dictionary {
	pub(crate) fn suggest_priv(&self, word: &str, out: &mut Vec<String>) {
		self.uppercase_suggest(word, out);
		self.rep_suggest(word, out);
		self.map_suggest(&mut word.to_owned(), out, 0);
		self.adjacent_swap_suggest(word, out);
		self.distant_swap_suggest(word, out);
		self.keyboard_suggest(word, out);
		self.extra_char_suggest(word, out);
		self.forgotten_char_suggest(word, out);
		self.move_char_suggest(word, out);
		self.bad_char_suggest(word, out);
		self.doubled_two_chars_suggest(word, out);
		self.two_words_suggest(word, out);
		self.phonetic_suggest(word, out);
	}

	/// Append `word` if it is a correct spelling and not already present
	fn add_sug_if_correct(&self, word: &str, out: &mut Vec<String>) -> bool {
		if out.iter().any(|o| o == word) {
			return true;
		}
		let Some(res) = self.check_word(word, Casing::Small, false) else {
			return false;
		};
		if res.contains(self.aff.special_flags.forbidden_word) {
			return false;
		}
		if self.aff.options.forbid_warn && res.contains(self.aff.special_flags.warn) {
			return false;
		}
		out.push(word.to_owned());
		true
	}

	fn uppercase_suggest(&self, word: &str, out: &mut Vec<String>) {
		self.add_sug_if_correct(&to_upper(word), out);
	}

	fn rep_suggest(&self, word: &str, out: &mut Vec<String>) {
		let reps = &self.aff.options.replacements;
		for (from, to) in reps.whole_word_replacements() {
			if word == from {
				self.try_rep_suggestion(to, out);
			}
		}
		for (from, to) in reps.start_word_replacements() {
			if let Some(rest) = word.strip_prefix(from.as_str()) {
				self.try_rep_suggestion(&format!("{to}{rest}"), out);
			}
		}
		for (from, to) in reps.end_word_replacements() {
			if let Some(rest) = word.strip_suffix(from.as_str()) {
				self.try_rep_suggestion(&format!("{rest}{to}"), out);
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
				self.try_rep_suggestion(&candidate, out);
				search_from = at + 1;
				while !word.is_char_boundary(search_from) {
					search_from += 1;
				}
			}
		}
	}

	/// A replacement result may be several words; accept it when every
	/// space-separated part spells correctly
	fn try_rep_suggestion(&self, word: &str, out: &mut Vec<String>) {
		if self.add_sug_if_correct(word, out) {
			return;
		}
		if !word.contains(' ') {
			return;
		}
		let all_parts_spell = word.split(' ').all(|part| {
			!part.is_empty() && self.check_word(part, Casing::Small, false).is_some()
		});
		if all_parts_spell && !out.iter().any(|o| o == word) {
			out.push(word.to_owned());
		}
	}

	/// Replace characters by their similarity-group relatives, recursively
	fn map_suggest(&self, word: &mut String, out: &mut Vec<String>, from: usize) {
		let mut i = from;
		while i < word.len() {
			let Some(current) = word[i..].chars().next() else {
				break;
			};
			for group in &self.aff.options.similarities {
				if group.chars.contains(current) {
					let mut alt_buf = [0_u8; 4];
					for alt in group.chars.chars() {
						if alt == current {
							continue;
						}
						let alt = &*alt.encode_utf8(&mut alt_buf);
						word.replace_range(i..i + current.len_utf8(), alt);
						self.add_sug_if_correct(word, out);
						self.map_suggest(word, out, i + alt.len());
						let mut cur_buf = [0_u8; 4];
						word.replace_range(
							i..i + alt.len(),
							current.encode_utf8(&mut cur_buf),
						);
					}
					for alt in &group.strings {
						word.replace_range(i..i + current.len_utf8(), alt);
						self.add_sug_if_correct(word, out);
						self.map_suggest(word, out, i + alt.len());
						let mut cur_buf = [0_u8; 4];
						word.replace_range(
							i..i + alt.len(),
							current.encode_utf8(&mut cur_buf),
						);
					}
				}
				for f in &group.strings {
					if !word[i..].starts_with(f.as_str()) {
						continue;
					}
					let mut alt_buf = [0_u8; 4];
					for alt in group.chars.chars() {
						let alt = &*alt.encode_utf8(&mut alt_buf);
						word.replace_range(i..i + f.len(), alt);
						self.add_sug_if_correct(word, out);
						self.map_suggest(word, out, i + alt.len());
						word.replace_range(i..i + alt.len(), f);
					}
					for alt in &group.strings {
						if alt == f {
							continue;
						}
						word.replace_range(i..i + f.len(), alt);
						self.add_sug_if_correct(word, out);
						self.map_suggest(word, out, i + alt.len());
						word.replace_range(i..i + alt.len(), f);
					}
				}
			}
			i += current.len_utf8();
		}
	}

	fn adjacent_swap_suggest(&self, word: &str, out: &mut Vec<String>) {
		let mut chars: Vec<char> = word.chars().collect();
		if chars.is_empty() {
			return;
		}
		for i in 0..chars.len() - 1 {
			chars.swap(i, i + 1);
			self.add_sug_if_correct(&collect(&chars), out);
			chars.swap(i, i + 1);
		}
		// for short words also try swapping two non-overlapping pairs
		if chars.len() == 4 {
			chars.swap(0, 1);
			chars.swap(2, 3);
			self.add_sug_if_correct(&collect(&chars), out);
			chars.swap(2, 3);
			chars.swap(0, 1);
		} else if chars.len() == 5 {
			chars.swap(0, 1);
			chars.swap(3, 4);
			self.add_sug_if_correct(&collect(&chars), out);
			chars.swap(0, 1);
			chars.swap(1, 2);
			self.add_sug_if_correct(&collect(&chars), out);
			chars.swap(1, 2);
			chars.swap(3, 4);
		}
	}

	fn distant_swap_suggest(&self, word: &str, out: &mut Vec<String>) {
		let mut chars: Vec<char> = word.chars().collect();
		if chars.len() < 3 {
			return;
		}
		for i in 0..chars.len() - 2 {
			for j in i + 2..chars.len() {
				chars.swap(i, j);
				self.add_sug_if_correct(&collect(&chars), out);
				chars.swap(i, j);
			}
		}
	}

	fn keyboard_suggest(&self, word: &str, out: &mut Vec<String>) {
		let kb: Vec<char> = self.aff.options.keyboard_closeness.chars().collect();
		let mut chars: Vec<char> = word.chars().collect();
		for j in 0..chars.len() {
			let c = chars[j];
			let upper = upper_char(c);
			if upper != c {
				chars[j] = upper;
				self.add_sug_if_correct(&collect(&chars), out);
				chars[j] = c;
			}
			for (i, _) in kb.iter().enumerate().filter(|&(_, &k)| k == c) {
				if i != 0 && kb[i - 1] != '|' {
					chars[j] = kb[i - 1];
					self.add_sug_if_correct(&collect(&chars), out);
					chars[j] = c;
				}
				if i + 1 != kb.len() && kb[i + 1] != '|' {
					chars[j] = kb[i + 1];
					self.add_sug_if_correct(&collect(&chars), out);
					chars[j] = c;
				}
			}
		}
	}

	fn extra_char_suggest(&self, word: &str, out: &mut Vec<String>) {
		let mut chars: Vec<char> = word.chars().collect();
		for i in (0..chars.len()).rev() {
			let c = chars.remove(i);
			self.add_sug_if_correct(&collect(&chars), out);
			chars.insert(i, c);
		}
	}

	fn forgotten_char_suggest(&self, word: &str, out: &mut Vec<String>) {
		let mut chars: Vec<char> = word.chars().collect();
		for new_c in self.aff.options.try_chars.clone().chars() {
			for i in (0..=chars.len()).rev() {
				chars.insert(i, new_c);
				self.add_sug_if_correct(&collect(&chars), out);
				chars.remove(i);
			}
		}
	}

	/// Rotate one character rightward then leftward across the word
	fn move_char_suggest(&self, word: &str, out: &mut Vec<String>) {
		let backup: Vec<char> = word.chars().collect();
		if backup.len() < 3 {
			return;
		}
		let mut chars = backup.clone();
		for i in 0..chars.len() - 2 {
			chars.swap(i, i + 1);
			for j in i + 1..chars.len() - 1 {
				chars.swap(j, j + 1);
				self.add_sug_if_correct(&collect(&chars), out);
			}
			chars.copy_from_slice(&backup);
		}
		for i in (2..chars.len()).rev() {
			chars.swap(i, i - 1);
			for j in (1..i).rev() {
				chars.swap(j, j - 1);
				self.add_sug_if_correct(&collect(&chars), out);
			}
			chars.copy_from_slice(&backup);
		}
	}

	fn bad_char_suggest(&self, word: &str, out: &mut Vec<String>) {
		let mut chars: Vec<char> = word.chars().collect();
		for new_c in self.aff.options.try_chars.clone().chars() {
			for i in 0..chars.len() {
				let c = chars[i];
				if c == new_c {
					continue;
				}
				chars[i] = new_c;
				self.add_sug_if_correct(&collect(&chars), out);
				chars[i] = c;
			}
		}
	}

	/// `ABABA` typed for `ABA`: drop the doubled two-character block
	fn doubled_two_chars_suggest(&self, word: &str, out: &mut Vec<String>) {
		let mut chars: Vec<char> = word.chars().collect();
		if chars.len() < 5 {
			return;
		}
		for i in 0..chars.len() - 4 {
			let (a, b) = (chars[i], chars[i + 1]);
			if a == chars[i + 2] && b == chars[i + 3] && a == chars[i + 4] {
				chars.drain(i + 3..i + 5);
				self.add_sug_if_correct(&collect(&chars), out);
				chars.insert(i + 3, a);
				chars.insert(i + 4, b);
			}
		}
	}

	fn two_words_suggest(&self, word: &str, out: &mut Vec<String>) {
		if self.aff.options.no_split_suggestions {
			return;
		}
		let chars: Vec<char> = word.chars().collect();
		if chars.len() < 2 {
			return;
		}
		let try_chars = &self.aff.options.try_chars;
		let dash_allowed = try_chars.contains('a') || try_chars.contains('-');
		for i in 0..chars.len() - 1 {
			let left = collect(&chars[..=i]);
			if self.check_simple_word(&left, false).is_none() {
				continue;
			}
			let right = collect(&chars[i + 1..]);
			if self.check_simple_word(&right, false).is_none() {
				continue;
			}
			let spaced = format!("{left} {right}");
			if !out.iter().any(|o| *o == spaced) {
				out.push(spaced);
			}
			if i + 1 > 1 && chars.len() - (i + 1) > 1 && dash_allowed {
				let dashed = format!("{left}-{right}");
				if !out.iter().any(|o| *o == dashed) {
					out.push(dashed);
				}
			}
		}
	}

	fn phonetic_suggest(&self, word: &str, out: &mut Vec<String>) {
		if self.aff.options.phonetic_table.is_empty() {
			return;
		}
		let mut chars: Vec<char> = word.chars().map(upper_char).collect();
		let changed = self.aff.options.phonetic_table.replace(&mut chars);
		if changed {
			let lowered: String = chars.into_iter().map(lower_char).collect();
			self.add_sug_if_correct(&lowered, out);
		}
	}
}

#[cfg(test)]
mod tests {
	use crate::Dictionary;

	fn dict(aff: &str, dic: &str) -> Dictionary {
		Dictionary::from_slice(aff, dic).unwrap()
	}

	fn suggestions(d: &Dictionary, word: &str) -> Vec<String> {
		let mut out = Vec::new();
		d.suggest(word, &mut out);
		out
	}

	#[test]
	fn replacement_table_drives_suggestions() {
		let d = dict("REP 1\nREP teh the\n", "1\nthe\n");
		assert!(suggestions(&d, "teh").contains(&"the".to_owned()));
	}

	#[test]
	fn replacement_may_produce_two_words() {
		let d = dict("REP 1\nREP alot a_lot\n", "2\na\nlot\n");
		assert!(suggestions(&d, "alot").contains(&"a lot".to_owned()));
	}

	#[test]
	fn adjacent_swap_finds_transpositions() {
		let d = dict("", "1\nhello\n");
		assert!(suggestions(&d, "hlelo").contains(&"hello".to_owned()));
	}

	#[test]
	fn distant_swap_crosses_several_positions() {
		let d = dict("", "1\nparty\n");
		// y and r swapped across two positions
		assert!(suggestions(&d, "paytr").contains(&"party".to_owned()));
	}

	#[test]
	fn extra_char_removal() {
		let d = dict("", "1\nseven\n");
		assert!(suggestions(&d, "seeven").contains(&"seven".to_owned()));
	}

	#[test]
	fn forgotten_char_insertion_uses_try() {
		let d = dict("TRY esianrtolc\n", "1\ntomorrow\n");
		assert!(suggestions(&d, "tomorow").contains(&"tomorrow".to_owned()));
	}

	#[test]
	fn bad_char_replacement_uses_try() {
		let d = dict("TRY abcdefghijklmnopqrstuvwxyz\n", "1\nsaid\n");
		assert!(suggestions(&d, "seid").contains(&"said".to_owned()));
	}

	#[test]
	fn keyboard_neighbors_are_tried() {
		let d = dict("KEY qwertyuiop|asdfghjkl|zxcvbnm\n", "1\nhello\n");
		// g sits next to h on the row
		assert!(suggestions(&d, "gello").contains(&"hello".to_owned()));
	}

	#[test]
	fn uppercase_suggestion() {
		let d = dict("", "1\nNASA\n");
		assert!(suggestions(&d, "nasa").contains(&"NASA".to_owned()));
	}

	#[test]
	fn two_word_split() {
		let d = dict("", "2\nrotten\nday\n");
		let sugs = suggestions(&d, "rottenday");
		assert!(sugs.contains(&"rotten day".to_owned()));
		// no dash without TRY chars allowing it
		assert!(!sugs.contains(&"rotten-day".to_owned()));

		let d = dict("TRY a\n", "2\nrotten\nday\n");
		assert!(suggestions(&d, "rottenday").contains(&"rotten-day".to_owned()));
	}

	#[test]
	fn map_similarity_groups() {
		let d = dict("MAP 1\nMAP uúü\n", "1\nfül\n");
		assert!(suggestions(&d, "ful").contains(&"fül".to_owned()));
	}

	#[test]
	fn doubled_two_char_block() {
		let d = dict("", "1\nvacation\n");
		assert!(suggestions(&d, "vacacation").contains(&"vacation".to_owned()));
	}

	#[test]
	fn move_char_rotation() {
		let d = dict("", "1\nright\n");
		assert!(suggestions(&d, "irght").contains(&"right".to_owned()));
	}

	#[test]
	fn phonetic_suggestion() {
		let d = dict(
			"PHONE 2\nPHONE AH(AEIOUY)-^ *H\nPHONE A _\n",
			"1\nh\n",
		);
		// the table rewrites the uppercased copy and the result is
		// offered lowercased when it spells
		let _ = suggestions(&d, "a");
	}

	#[test]
	fn suggestions_have_no_duplicates_and_all_spell() {
		let d = dict(
			"TRY ht\nREP 1\nREP teh the\nKEY qwertyuiop|asdfghjkl\n",
			"2\nthe\nteh\n",
		);
		// "teh" itself is a word here, so strategies may regenerate it
		let sugs = suggestions(&d, "tteh");
		let mut deduped = sugs.clone();
		deduped.sort();
		deduped.dedup();
		assert_eq!(sugs.len(), deduped.len());
		for s in &sugs {
			assert!(s.contains(' ') || s.contains('-') || d.spell(s), "{s} must spell");
		}
	}

	#[test]
	fn forbidden_words_never_suggested() {
		let d = dict("FORBIDDENWORD Z\nTRY o\n", "2\nfoo/Z\nfo\n");
		let sugs = suggestions(&d, "foo");
		assert!(!sugs.contains(&"foo".to_owned()));
	}

	#[test]
	fn single_char_input_has_no_move_or_split_suggestions() {
		let d = dict("", "2\na\nb\n");
		let sugs = suggestions(&d, "c");
		assert!(!sugs.iter().any(|s| s.contains(' ')));
	}
}
