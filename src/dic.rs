//! Logic to parse and represent `.dic` files
//!
//! The word list becomes a hash multiset from stem to its homonym entries.
//! Entries sharing a stem keep their file order, so first-match lookups
//! are deterministic.

use crate::aff::AffFile;
use crate::dictionary::InitializeError;
use crate::flag::{FlagSet, HIDDEN_HOMONYM_FLAG};
use nom::{
	branch::alt,
	bytes::complete::{is_not, tag},
	character::complete::{char as char_p, newline, u64 as u64_p},
	combinator::opt,
	multi::many1,
	sequence::preceded,
	IResult, Parser,
};
use nom_supreme::ParserExt;
use std::{collections::HashMap, fs::File, io::Read, path::Path};

/// One dictionary entry: a stem and its flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WordEntry {
	pub(crate) stem: String,
	pub(crate) flags: FlagSet,
}

/// The word list, indexed by stem
#[derive(Debug)]
pub(crate) struct DicFile {
	index: HashMap<String, Vec<WordEntry>>,
	len: usize,
}

impl DicFile {
	pub(crate) fn new(content: &str, aff: &AffFile) -> Result<Self, InitializeError> {
		let mut content = content
			.trim_start_matches('\u{feff}')
			.replace('\r', "");
		if !content.ends_with('\n') {
			content.push('\n');
		}
		DicParser { aff }.parse(&content)
	}

	pub(crate) fn file(path: &Path, aff: &AffFile) -> Result<Self, InitializeError> {
		let mut file = File::open(path)?;
		let mut buffer = String::new();
		file.read_to_string(&mut buffer)?;
		Self::new(&buffer, aff)
	}

	/// All entries sharing this stem, in file order
	pub(crate) fn homonyms<'a>(&'a self, stem: &str) -> impl Iterator<Item = &'a WordEntry> {
		self.index.get(stem).into_iter().flatten()
	}

	pub(crate) fn len(&self) -> usize {
		self.len
	}

	fn insert(&mut self, stem: String, flags: FlagSet) {
		self.len += 1;
		let bucket = self.index.entry(stem.clone()).or_default();
		bucket.push(WordEntry { stem, flags });
	}
}

struct DicParser<'aff> {
	aff: &'aff AffFile,
}

impl<'aff> DicParser<'aff> {
	fn parse(self, i: &str) -> Result<DicFile, InitializeError> {
		let parser_err =
			|e: nom::Err<nom::error::Error<&str>>| InitializeError::Parser(e.to_string());

		let (i, capacity) = u64_p.terminated(newline).parse(i).map_err(parser_err)?;

		let mut dic = DicFile {
			index: HashMap::with_capacity(capacity as usize),
			len: 0,
		};
		for line in i.lines() {
			self.parse_entry(line, &mut dic);
		}
		Ok(dic)
	}

	/// Parse one word line into the index; malformed lines are skipped
	fn parse_entry(&self, line: &str, dic: &mut DicFile) {
		let Ok((rest, mut stem)) = Self::parse_stem(line) else {
			return;
		};
		let flags = match opt(preceded(
			char_p('/'),
			crate::aff::parse_flags(
				self.aff.options.flag_ty,
				&self.aff.options.flag_aliases,
			),
		))
		.parse(rest)
		{
			Ok((_, flags)) => flags.unwrap_or_default(),
			Err(nom::Err::Error(_) | nom::Err::Failure(_)) => {
				log::warn!("skipping word with bad flags: {line}");
				return;
			}
			Err(nom::Err::Incomplete(_)) => return,
		};

		if !self.aff.options.ignore_chars.is_empty() {
			stem.retain(|c| !self.aff.options.ignore_chars.contains(c));
		}
		if stem.is_empty() {
			return;
		}

		let casing = Casing::guess(&stem);
		let forbidden = self.aff.special_flags.forbidden_word;
		dic.insert(stem.clone(), flags.clone());

		// capitalized stems get a title-cased hidden twin so the
		// init-capital lookup path can find them
		let wants_twin = match casing {
			Casing::AllCapital => !flags.is_empty(),
			Casing::Pascal | Casing::Camel => true,
			_ => false,
		};
		if wants_twin && !flags.contains(forbidden) {
			let title = to_title(&stem);
			let mut twin_flags = flags;
			twin_flags.insert(HIDDEN_HOMONYM_FLAG);
			dic.insert(title, twin_flags);
		}
	}

	/// The stem runs until an unescaped slash or whitespace; `\/` keeps a
	/// literal slash
	fn parse_stem(i: &str) -> IResult<&str, String> {
		many1(alt((
			is_not("\\/ \t\n").map(str::to_owned),
			preceded(char_p('\\'), tag("/")).map(str::to_owned),
			tag("\\").map(str::to_owned),
		)))
		.map(|parts| parts.concat())
		.parse(i)
	}
}

/// Letter-case pattern of a word, ignoring caseless characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Casing {
	/// All lowercase or neutral (“foo”, “123”)
	Small,
	/// Only the initial letter is capitalized (“Foo”)
	InitCapital,
	/// All uppercase (“FOO”, “ALL4ONE”)
	AllCapital,
	/// Mixed, first letter lowercase (“fooBar”)
	Camel,
	/// Mixed, first letter uppercase (“FooBar”)
	Pascal,
}

impl Casing {
	pub(crate) fn guess(s: &str) -> Self {
		let upper = s.chars().filter(|c| c.is_uppercase()).count();
		let lower = s.chars().filter(|c| c.is_lowercase()).count();
		let first_is_upper = s.chars().next().is_some_and(char::is_uppercase);

		if upper == 0 {
			Self::Small
		} else if upper == 1 && first_is_upper {
			Self::InitCapital
		} else if lower == 0 {
			Self::AllCapital
		} else if first_is_upper {
			Self::Pascal
		} else {
			Self::Camel
		}
	}
}

pub(crate) fn to_lower(s: &str) -> String {
	s.chars().flat_map(char::to_lowercase).collect()
}

pub(crate) fn to_upper(s: &str) -> String {
	s.chars().flat_map(char::to_uppercase).collect()
}

/// Uppercase the first letter, lowercase the rest
pub(crate) fn to_title(s: &str) -> String {
	let mut chars = s.chars();
	let Some(first) = chars.next() else {
		return String::new();
	};
	first
		.to_uppercase()
		.chain(chars.flat_map(char::to_lowercase))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::flag::Flag;

	fn dic(aff: &str, content: &str) -> DicFile {
		let aff = AffFile::new(aff).unwrap();
		DicFile::new(content, &aff).unwrap()
	}

	#[test]
	fn parses_stems_and_flags() {
		let dic = dic("", "3\nword/FGS\nplain\nwith\\/slash\n");

		let word = dic.homonyms("word").next().unwrap();
		assert!(word.flags.contains(Flag(b'F' as u16)));
		assert!(word.flags.contains(Flag(b'S' as u16)));
		assert!(dic.homonyms("plain").next().unwrap().flags.is_empty());
		assert!(dic.homonyms("with/slash").next().is_some());
	}

	#[test]
	fn homonyms_keep_file_order() {
		let dic = dic("", "2\ndouble/A\ndouble/B\n");
		let flags: Vec<bool> = dic
			.homonyms("double")
			.map(|e| e.flags.contains(Flag(b'A' as u16)))
			.collect();
		assert_eq!(flags, [true, false]);
	}

	#[test]
	fn capitalized_stems_get_hidden_twins() {
		let dic = dic("", "2\nNASA/X\nOpenGL\n");

		let twin = dic.homonyms("Nasa").next().unwrap();
		assert!(twin.flags.contains(HIDDEN_HOMONYM_FLAG));
		assert!(twin.flags.contains(Flag(b'X' as u16)));
		// Pascal casing needs no flags for the twin
		assert!(dic
			.homonyms("Opengl")
			.next()
			.unwrap()
			.flags
			.contains(HIDDEN_HOMONYM_FLAG));
		// all-caps with no flags stays as-is
		let dic2 = dic_no_flags();
		assert!(dic2.homonyms("Faq").next().is_none());
	}

	fn dic_no_flags() -> DicFile {
		dic("", "1\nFAQ\n")
	}

	#[test]
	fn casing_classification() {
		assert_eq!(Casing::guess("foo"), Casing::Small);
		assert_eq!(Casing::guess("123"), Casing::Small);
		assert_eq!(Casing::guess("Foo"), Casing::InitCapital);
		assert_eq!(Casing::guess("FOO"), Casing::AllCapital);
		assert_eq!(Casing::guess("ALL4ONE"), Casing::AllCapital);
		assert_eq!(Casing::guess("fooBar"), Casing::Camel);
		assert_eq!(Casing::guess("FooBar"), Casing::Pascal);
	}

	#[test]
	fn title_case_folds_the_tail() {
		assert_eq!(to_title("NASA"), "Nasa");
		assert_eq!(to_title("über"), "Über");
		assert_eq!(to_title(""), "");
	}
}
