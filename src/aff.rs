//! Logic to parse and represent `.aff` files
//!
//! - Final representation is [`AffFile`]
//! - Parsing logic is implemented in [`AffParser`], entrypoint is
//!   [`AffParser::parse`]
//!
//! The parser accumulates raw vectors while scanning the file; the final
//! tables (sorted, partitioned, indexed) are built once in
//! [`AffFile::new`] when the whole file has been read.

use crate::condition::Condition;
use crate::dictionary::InitializeError;
use crate::flag::{Flag, FlagSet};
use crate::tables::{
	BreakTable, CompoundPattern, CompoundRuleTable, PhoneticTable, ReplacementTable,
	SimilarityGroup, SubstrReplacer,
};
use crate::trie::Trie;
use nom::{
	branch::alt,
	bytes::complete::{is_not, tag, take, take_while1},
	character::complete::{char as char_p, newline, one_of, satisfy, space0, space1, u16 as u16_p},
	combinator::{map, opt, verify},
	multi::{many1, many_m_n},
	sequence::{delimited, preceded, terminated, tuple},
	IResult, Parser,
};
use nom_supreme::ParserExt;
use std::{fmt, fs::File, io::Read, marker::PhantomData, path::Path, str::FromStr};

/// An `.aff` file: options, special flags and the two affix indexes
#[derive(Debug)]
pub(crate) struct AffFile {
	pub(crate) options: Options,
	/// Flags other than affixes
	pub(crate) special_flags: SpecialFlags,

	pub(crate) prefix_index: PrefixIndex,
	pub(crate) suffix_index: SuffixIndex,
}

impl AffFile {
	/// Initializes a new [`AffFile`] from raw content
	pub(crate) fn new(content: &str) -> Result<Self, InitializeError> {
		// normalize so every directive parser can rely on `\n` endings
		let mut content = content
			.trim_start_matches('\u{feff}')
			.replace('\r', "");
		if !content.ends_with('\n') {
			content.push('\n');
		}

		let AffParser {
			mut options,
			special_flags,
			encoding,
			mut prefixes,
			mut suffixes,
			break_patterns,
			input_conversion,
			output_conversion,
			mut replacements,
			map_groups,
			phonetic_rules,
			compound_rules,
			compound_patterns,
			errors,
		} = AffParser::default().parse(&content)?;

		if let Some(enc) = encoding {
			if enc != "UTF-8" && enc != "UTF8" {
				return Err(InitializeError::UnsupportedEncoding(enc));
			}
		}
		if let Some(first) = errors.into_iter().next() {
			return Err(InitializeError::Parser(first));
		}

		// Ignored characters never make it into derived forms
		if !options.ignore_chars.is_empty() {
			for prefix in &mut prefixes {
				prefix.add.retain(|c| !options.ignore_chars.contains(c));
			}
			for suffix in &mut suffixes {
				suffix.add.retain(|c| !options.ignore_chars.contains(c));
			}
		}

		// the word-side replacement decodes `_` as a space
		for (_, to) in &mut replacements {
			*to = to.replace('_', " ");
		}

		options.break_table = BreakTable::new(break_patterns.unwrap_or_else(|| {
			["-", "^-", "-$"].map(str::to_owned).to_vec()
		}));
		options.input_conversion = SubstrReplacer::new(input_conversion);
		options.output_conversion = SubstrReplacer::new(output_conversion);
		options.replacements = ReplacementTable::new(replacements);
		options.similarities = map_groups;
		options.phonetic_table = PhoneticTable::new(phonetic_rules);
		options.compound_rules = CompoundRuleTable::new(compound_rules);
		options.compound_patterns = compound_patterns;

		Ok(Self {
			options,
			special_flags,
			prefix_index: PrefixIndex::new(prefixes),
			suffix_index: SuffixIndex::new(suffixes),
		})
	}

	/// Initializes a new [`AffFile`] from a file
	pub(crate) fn file(path: &Path) -> Result<Self, InitializeError> {
		let mut file = File::open(path)?;
		let mut buffer = String::new();
		file.read_to_string(&mut buffer)?;
		Self::new(&buffer)
	}
}

// Some directives are parsed and stored without a consumer in the query
// paths (suggestion limits, LANG, WORDCHARS); the checker carries them the
// same way the file format does.
#[allow(dead_code, clippy::struct_excessive_bools)]
#[derive(Debug, Default)]
/// Additional options defined in `.aff` file
pub(crate) struct Options {
	/// `FLAG`
	pub(crate) flag_ty: FlagType,
	/// `COMPLEXPREFIXES`
	pub(crate) complex_prefixes: bool,
	/// `IGNORE`
	pub(crate) ignore_chars: String,
	/// `AF`
	/// Flags can be compressed and replaced with an ordinal number.
	/// Table is `1`-indexed in the files.
	pub(crate) flag_aliases: Vec<FlagSet>,
	/// `LANG`
	pub(crate) lang: Option<String>,

	// ——— for suggestions
	/// `KEY`, kept as the raw `|`-separated row layout
	pub(crate) keyboard_closeness: String,
	/// `TRY`
	pub(crate) try_chars: String,
	/// `MAXCPDSUGS`
	pub(crate) max_compound_suggestions: u16,
	/// `MAXNGRAMSUGS`
	pub(crate) max_ngram_suggestions: u16,
	/// `MAXDIFF`
	pub(crate) max_diff_factor: u16,
	/// `ONLYMAXDIFF`
	pub(crate) only_max_diff: bool,
	/// `NOSPLITSUGS`
	pub(crate) no_split_suggestions: bool,
	/// `SUGSWITHDOTS`
	pub(crate) suggest_with_dots: bool,
	/// `REP`
	pub(crate) replacements: ReplacementTable,
	/// `MAP`
	pub(crate) similarities: Vec<SimilarityGroup>,
	/// `PHONE`
	pub(crate) phonetic_table: PhoneticTable,
	/// `FORBIDWARN`
	pub(crate) forbid_warn: bool,

	// ——— for compounding
	/// `BREAK`
	pub(crate) break_table: BreakTable,
	/// `COMPOUNDRULE`
	pub(crate) compound_rules: CompoundRuleTable,
	/// `COMPOUNDMIN`; zero means unset, checks fall back to 3
	pub(crate) compound_min_length: u16,
	/// `COMPOUNDMORESUFFIXES`
	pub(crate) compound_more_suffixes: bool,
	/// `COMPOUNDWORDMAX`
	pub(crate) compound_max_word_count: u16,
	/// `CHECKCOMPOUNDDUP`
	pub(crate) compound_check_duplicate: bool,
	/// `CHECKCOMPOUNDREP`
	pub(crate) compound_check_rep: bool,
	/// `CHECKCOMPOUNDCASE`
	pub(crate) compound_check_case: bool,
	/// `CHECKCOMPOUNDTRIPLE`
	pub(crate) compound_check_triple: bool,
	/// `SIMPLIFIEDTRIPLE`
	pub(crate) compound_simplified_triple: bool,
	/// `CHECKCOMPOUNDPATTERN`
	pub(crate) compound_patterns: Vec<CompoundPattern>,
	/// `SYLLABLENUM`
	pub(crate) compound_syllable_num: bool,
	/// `COMPOUNDSYLLABLE`
	pub(crate) compound_syllable_max: u16,
	pub(crate) compound_syllable_vowels: String,

	// ——— other
	/// `FULLSTRIP`
	pub(crate) full_strip: bool,
	/// `ICONV`
	pub(crate) input_conversion: SubstrReplacer,
	/// `OCONV`
	pub(crate) output_conversion: SubstrReplacer,
	/// `WORDCHARS`
	pub(crate) word_chars: String,
	/// `CHECKSHARPS`
	pub(crate) check_sharps: bool,
}

/// Flags that are not affixes but define additional behaviour
///
/// A zero flag means the option was not configured; zero never matches.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub(crate) struct SpecialFlags {
	// ——— for suggestions
	/// `NOSUGGEST`
	pub(crate) no_suggest: Flag,
	/// `WARN`
	pub(crate) warn: Flag,

	// ——— for compounding
	/// `COMPOUNDFLAG`
	pub(crate) compound: Flag,
	/// `COMPOUNDBEGIN`
	pub(crate) compound_begin: Flag,
	/// `COMPOUNDMIDDLE`
	pub(crate) compound_middle: Flag,
	/// `COMPOUNDLAST`, `COMPOUNDEND`
	pub(crate) compound_last: Flag,
	/// `ONLYINCOMPOUND`
	pub(crate) compound_onlyin: Flag,
	/// `COMPOUNDPERMITFLAG`
	pub(crate) compound_permit: Flag,
	/// `COMPOUNDFORBIDFLAG`
	pub(crate) compound_forbid: Flag,
	/// `COMPOUNDROOT`
	pub(crate) compound_root: Flag,
	/// `FORCEUCASE`
	pub(crate) compound_force_uppercase: Flag,

	// ——— other
	/// `CIRCUMFIX`
	pub(crate) circumfix: Flag,
	/// `FORBIDDENWORD`
	pub(crate) forbidden_word: Flag,
	/// `KEEPCASE`
	pub(crate) keep_case: Flag,
	/// `NEEDAFFIX`, `PSEUDOROOT`
	pub(crate) need_affix: Flag,
	/// `SUBSTANDARD`
	pub(crate) sub_standard: Flag,
}

/// Is only used to specialize [`Affix`]
#[derive(Debug, Clone)]
pub(crate) struct Prefix;
/// Is only used to specialize [`Affix`]
#[derive(Debug, Clone)]
pub(crate) struct Suffix;

/// Represents an affix entry, either a prefix (`PFX`) or a suffix (`SFX`).
/// It works the same for both so `AFX` is used in the following example.
///
/// ```aff
/// AFX A Y 1
/// AFX A   0     re      .
/// #   ^fg ^strp ^add    ^cond
/// ```
#[derive(Debug, Clone)]
pub(crate) struct Affix<T> {
	/// Flag that identifies this affix in `.dic` files
	pub(crate) flag: Flag,
	/// Whether this affix may combine with one of the opposite kind
	pub(crate) cross_product: bool,

	/// Affix part added to the stem
	pub(crate) add: String,
	/// What is stripped from the stem before adding the affix part
	pub(crate) strip: String,
	/// The stem must meet this condition before the affix is applied
	pub(crate) condition: Condition,

	/// Continuation flags: chained affixation and compounding policy
	pub(crate) cont_flags: FlagSet,

	/// `T` is either [`Prefix`] or [`Suffix`]. Specializes the affix,
	/// though they share the same structure.
	kind: PhantomData<T>,
}

impl Affix<Prefix> {
	/// Surface form to stem: replace the appended start with the strip
	pub(crate) fn to_stem(&self, word: &mut String) {
		word.replace_range(..self.add.len(), &self.strip);
	}

	/// Stem to surface form, the inverse of [`Self::to_stem`]
	pub(crate) fn to_derived(&self, word: &mut String) {
		word.replace_range(..self.strip.len(), &self.add);
	}

	pub(crate) fn check_condition(&self, stem: &str) -> bool {
		self.condition.match_prefix(stem)
	}

	/// Whether stripping this affix changes the buffer at all
	pub(crate) fn is_modifying(&self) -> bool {
		!self.strip.is_empty() || !self.add.is_empty()
	}
}

impl Affix<Suffix> {
	pub(crate) fn to_stem(&self, word: &mut String) {
		let at = word.len() - self.add.len();
		word.replace_range(at.., &self.strip);
	}

	pub(crate) fn to_derived(&self, word: &mut String) {
		let at = word.len() - self.strip.len();
		word.replace_range(at.., &self.add);
	}

	pub(crate) fn check_condition(&self, stem: &str) -> bool {
		self.condition.match_suffix(stem)
	}

	pub(crate) fn is_modifying(&self) -> bool {
		!self.strip.is_empty() || !self.add.is_empty()
	}
}

impl fmt::Display for Affix<Prefix> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"({}-, {}{})",
			self.add,
			self.flag,
			if self.cross_product { "×" } else { "" }
		)
	}
}

impl fmt::Display for Affix<Suffix> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"(-{}, {}{})",
			self.add,
			self.flag,
			if self.cross_product { "×" } else { "" }
		)
	}
}

/// Prefix entries indexed by their appended text
///
/// Enumerating a word yields every entry whose `add` is a prefix of it,
/// shortest first, zero-length entries before everything else.
#[derive(Debug)]
pub(crate) struct PrefixIndex {
	table: Trie<Affix<Prefix>>,
	all_cont_flags: FlagSet,
}

impl PrefixIndex {
	fn new(prefixes: Vec<Affix<Prefix>>) -> Self {
		let mut table = Trie::default();
		let mut all_cont_flags = FlagSet::default();
		for prefix in prefixes {
			all_cont_flags.union_with(&prefix.cont_flags);
			table.insert(&prefix.add.clone(), prefix);
		}
		Self {
			table,
			all_cont_flags,
		}
	}

	pub(crate) fn has_continuation_flags(&self) -> bool {
		!self.all_cont_flags.is_empty()
	}

	/// Fast rejection before attempting a chained strip
	pub(crate) fn has_continuation_flag(&self, flag: Flag) -> bool {
		self.all_cont_flags.contains(flag)
	}

	pub(crate) fn iterate_prefixes_of<'a>(&'a self, word: &str) -> Vec<&'a Affix<Prefix>> {
		self.table.prefixes_of(word)
	}

	pub(crate) fn len(&self) -> usize {
		self.table.len()
	}
}

/// Suffix entries, a prefix index over the reversed appended text
#[derive(Debug)]
pub(crate) struct SuffixIndex {
	table: Trie<Affix<Suffix>>,
	all_cont_flags: FlagSet,
}

impl SuffixIndex {
	fn new(suffixes: Vec<Affix<Suffix>>) -> Self {
		let mut table = Trie::default();
		let mut all_cont_flags = FlagSet::default();
		for suffix in suffixes {
			all_cont_flags.union_with(&suffix.cont_flags);
			let reversed: String = suffix.add.chars().rev().collect();
			table.insert(&reversed, suffix);
		}
		Self {
			table,
			all_cont_flags,
		}
	}

	pub(crate) fn has_continuation_flags(&self) -> bool {
		!self.all_cont_flags.is_empty()
	}

	pub(crate) fn has_continuation_flag(&self, flag: Flag) -> bool {
		self.all_cont_flags.contains(flag)
	}

	pub(crate) fn iterate_suffixes_of<'a>(&'a self, word: &str) -> Vec<&'a Affix<Suffix>> {
		let reversed: String = word.chars().rev().collect();
		self.table.prefixes_of(&reversed)
	}

	pub(crate) fn len(&self) -> usize {
		self.table.len()
	}
}

/// How flags are written in this dictionary pair
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FlagType {
	/// `short`: one ASCII character
	#[default]
	Short,
	/// `long`: two ASCII characters packed into one code
	Long,
	/// `UTF-8`: any BMP scalar
	Utf8,
	/// `num`: a number in 1..=65534, lists are comma-separated
	Numeric,
}

impl FromStr for FlagType {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"short" => Ok(Self::Short),
			"long" => Ok(Self::Long),
			"num" | "numeric" => Ok(Self::Numeric),
			"UTF-8" => Ok(Self::Utf8),
			_ => Err(()),
		}
	}
}

/// Parse a single flag in the given syntax. The reserved hidden-homonym
/// code can never be produced here.
pub(crate) fn parse_flag(fty: FlagType) -> impl Fn(&str) -> IResult<&str, Flag> {
	move |i: &str| match fty {
		FlagType::Short => satisfy(|c| c.is_ascii() && !c.is_ascii_whitespace())
			.map(|c| Flag(c as u16))
			.parse(i),
		FlagType::Long => tuple((
			satisfy(|c| c.is_ascii() && !c.is_ascii_whitespace()),
			satisfy(|c| c.is_ascii() && !c.is_ascii_whitespace()),
		))
		.map(|(c1, c2)| Flag(((c1 as u16) << 8) | c2 as u16))
		.parse(i),
		FlagType::Utf8 => satisfy(|c| !c.is_whitespace() && (c as u32) < 0xFFFF)
			.map(|c| Flag(c as u16))
			.parse(i),
		FlagType::Numeric => verify(u16_p, |&n| n != 0 && n != u16::MAX)
			.map(Flag)
			.parse(i),
	}
}

/// Parse a flag field: either an `AF` alias ordinal or a plain flag list
pub(crate) fn parse_flags<'o>(
	fty: FlagType,
	aliases: &'o [FlagSet],
) -> impl Fn(&str) -> IResult<&str, FlagSet> + 'o {
	move |i: &str| {
		if !aliases.is_empty() {
			let (i, ordinal) = u16_p(i)?;
			return match usize::from(ordinal)
				.checked_sub(1)
				.and_then(|idx| aliases.get(idx))
			{
				Some(set) => Ok((i, set.clone())),
				None => Err(nom::Err::Error(nom::error::Error::new(
					i,
					nom::error::ErrorKind::Verify,
				))),
			};
		}
		match fty {
			FlagType::Short | FlagType::Long | FlagType::Utf8 => {
				many1(parse_flag(fty)).map(FlagSet::new).parse(i)
			}
			FlagType::Numeric => {
				nom::multi::separated_list1(tag(","), parse_flag(fty))
					.map(FlagSet::new)
					.parse(i)
			}
		}
	}
}

/// Parse one `COMPOUNDRULE` pattern into its flat code sequence, `?` and
/// `*` kept as operator codes after their atom
fn parse_compound_rule(fty: FlagType) -> impl Fn(&str) -> IResult<&str, Vec<u16>> {
	move |i: &str| match fty {
		FlagType::Short | FlagType::Utf8 => many1(
			satisfy(|c| !c.is_whitespace() && (c as u32) < 0xFFFF).map(|c| c as u16),
		)
		.parse(i),
		FlagType::Long | FlagType::Numeric => many1(alt((
			delimited(char_p('('), parse_flag(fty), char_p(')')).map(|f| f.0),
			one_of("?*").map(|c| c as u16),
		)))
		.parse(i),
	}
}

/// Parses an `.aff` file
#[derive(Default)]
struct AffParser {
	options: Options,
	special_flags: SpecialFlags,
	/// `SET` value, validated after the parse
	encoding: Option<String>,

	prefixes: Vec<Affix<Prefix>>,
	suffixes: Vec<Affix<Suffix>>,

	// raw tables, turned into their query form by [`AffFile::new`]
	break_patterns: Option<Vec<String>>,
	input_conversion: Vec<(String, String)>,
	output_conversion: Vec<(String, String)>,
	replacements: Vec<(String, String)>,
	map_groups: Vec<SimilarityGroup>,
	phonetic_rules: Vec<(String, String)>,
	compound_rules: Vec<Vec<u16>>,
	compound_patterns: Vec<CompoundPattern>,

	/// Deferred load errors (bad affix conditions), reported after the
	/// scan so the parser itself stays simple
	errors: Vec<String>,
}

/// One whitespace-free token
fn token(i: &str) -> IResult<&str, &str> {
	is_not(" \t\n")(i)
}

impl AffParser {
	/// Entrypoint to parse an `.aff` file
	fn parse(mut self, content: &str) -> Result<Self, InitializeError> {
		many1(alt((
			Self::parse_directive(&mut self),
			preceded(space0, tag("#"))
				.terminated(opt(is_not("\n")))
				.terminated(newline)
				.value(()),
			preceded(space0, newline).value(()),
		)))
		.all_consuming()
		.parse(content)
		.map_err(|e: nom::Err<_>| InitializeError::Parser(e.to_string()))?;

		Ok(self)
	}

	#[allow(clippy::too_many_lines)]
	/// Takes care of parsing a whole directive, counted blocks included
	fn parse_directive<'a>(&mut self) -> impl FnMut(&'a str) -> IResult<&'a str, ()> + '_ {
		let Self {
			options,
			special_flags,
			encoding,
			prefixes,
			suffixes,
			break_patterns,
			input_conversion,
			output_conversion,
			replacements,
			map_groups,
			phonetic_rules,
			compound_rules,
			compound_patterns,
			errors,
		} = self;

		move |i: &'a str| {
			let is_directive_char = |c: char| matches!(c, 'A'..='Z' | '_');
			let (i, directive_name) =
				terminated(take_while1(is_directive_char), space0)(i)?;

			let flag_ty = options.flag_ty;
			let single_flag = parse_flag(flag_ty);

			let (i, ()) = match directive_name {
				"SET" => {
					let (i, enc) = token(i)?;
					(i, *encoding = Some(enc.to_owned()))
				}
				"FLAG" => {
					let (i, name) = token(i)?;
					match FlagType::from_str(name) {
						Ok(ty) => (i, options.flag_ty = ty),
						Err(()) => {
							log::warn!("(FLAG) unknown flag type {name}, ignoring");
							(i, ())
						}
					}
				}
				"LANG" => {
					let (i, lang) = token(i)?;
					(i, options.lang = Some(lang.to_owned()))
				}
				"IGNORE" => {
					let (i, chars) = token(i)?;
					(i, options.ignore_chars = chars.to_owned())
				}
				"COMPLEXPREFIXES" => (i, options.complex_prefixes = true),
				"FULLSTRIP" => (i, options.full_strip = true),
				"CHECKSHARPS" => (i, options.check_sharps = true),
				"FORBIDWARN" => (i, options.forbid_warn = true),
				"WORDCHARS" => {
					let (i, chars) = token(i)?;
					(i, options.word_chars = chars.to_owned())
				}

				"AF" => {
					let (i, num) = u16_p.terminated(space0).terminated(newline).parse(i)?;
					let (i, aliases) = many_m_n(
						num.into(),
						num.into(),
						delimited(
							tag("AF").terminated(space1),
							parse_flags(flag_ty, &[]),
							space0.terminated(newline),
						),
					)(i)?;
					for (n, alias) in aliases.iter().enumerate() {
						log::debug!("(AF) aliased {} to {alias}", n + 1);
					}
					(i, options.flag_aliases = aliases)
				}
				"AM" => {
					// morphological aliases carry no checking semantics
					let (i, num) = u16_p.terminated(space0).terminated(newline).parse(i)?;
					let (i, _) = many_m_n(
						num.into(),
						num.into(),
						tuple((tag("AM"), is_not("\n"), newline)),
					)(i)?;
					(i, ())
				}

				// ——— for suggestions
				"KEY" => {
					let (i, rows) = token(i)?;
					(i, options.keyboard_closeness = rows.to_owned())
				}
				"TRY" => {
					let (i, chars) = token(i)?;
					(i, options.try_chars = chars.to_owned())
				}
				"NOSUGGEST" => {
					let (i, flag) = single_flag(i)?;
					(i, special_flags.no_suggest = flag)
				}
				"WARN" => {
					let (i, flag) = single_flag(i)?;
					(i, special_flags.warn = flag)
				}
				"MAXCPDSUGS" => {
					let (i, num) = u16_p(i)?;
					(i, options.max_compound_suggestions = num)
				}
				"MAXNGRAMSUGS" => {
					let (i, num) = u16_p(i)?;
					(i, options.max_ngram_suggestions = num)
				}
				"MAXDIFF" => {
					let (i, num) = verify(u16_p, |&n| n <= 10)(i)?;
					(i, options.max_diff_factor = num)
				}
				"ONLYMAXDIFF" => (i, options.only_max_diff = true),
				"NOSPLITSUGS" => (i, options.no_split_suggestions = true),
				"SUGSWITHDOTS" => (i, options.suggest_with_dots = true),
				"REP" => {
					let (i, mut pairs) = Self::parse_pair_table(i, "REP")?;
					(i, replacements.append(&mut pairs))
				}
				"ICONV" => {
					let (i, mut pairs) = Self::parse_pair_table(i, "ICONV")?;
					(i, input_conversion.append(&mut pairs))
				}
				"OCONV" => {
					let (i, mut pairs) = Self::parse_pair_table(i, "OCONV")?;
					(i, output_conversion.append(&mut pairs))
				}
				"PHONE" => {
					let (i, mut pairs) = Self::parse_pair_table(i, "PHONE")?;
					(i, phonetic_rules.append(&mut pairs))
				}
				"MAP" => {
					let (i, num) = u16_p.terminated(space0).terminated(newline).parse(i)?;
					let (i, groups) = many_m_n(
						num.into(),
						num.into(),
						delimited(
							tag("MAP").terminated(space1),
							token.map(SimilarityGroup::parse),
							space0.terminated(newline),
						),
					)(i)?;
					(i, map_groups.extend(groups))
				}

				// ——— for compounding
				"BREAK" => {
					let (i, num) = u16_p.terminated(space0).terminated(newline).parse(i)?;
					let (i, patterns) = many_m_n(
						num.into(),
						num.into(),
						delimited(
							tag("BREAK").terminated(space1),
							token.map(str::to_owned),
							space0.terminated(newline),
						),
					)(i)?;
					(i, *break_patterns = Some(patterns))
				}
				"COMPOUNDRULE" => {
					let (i, num) = u16_p.terminated(space0).terminated(newline).parse(i)?;
					let (i, mut rules) = many_m_n(
						num.into(),
						num.into(),
						delimited(
							tag("COMPOUNDRULE").terminated(space1),
							parse_compound_rule(flag_ty),
							space0.terminated(newline),
						),
					)(i)?;
					(i, compound_rules.append(&mut rules))
				}
				"CHECKCOMPOUNDPATTERN" => {
					let (i, num) = u16_p.terminated(space0).terminated(newline).parse(i)?;
					let (i, patterns) = many_m_n(
						num.into(),
						num.into(),
						|i| Self::parse_compound_pattern(i, flag_ty),
					)(i)?;
					(i, compound_patterns.extend(patterns))
				}
				"COMPOUNDMIN" => {
					let (i, num) = u16_p(i)?;
					(i, options.compound_min_length = num.max(1))
				}
				"COMPOUNDWORDMAX" => {
					let (i, num) = u16_p(i)?;
					(i, options.compound_max_word_count = num)
				}
				"COMPOUNDFLAG" => {
					let (i, flag) = single_flag(i)?;
					(i, special_flags.compound = flag)
				}
				"COMPOUNDBEGIN" => {
					let (i, flag) = single_flag(i)?;
					(i, special_flags.compound_begin = flag)
				}
				"COMPOUNDMIDDLE" => {
					let (i, flag) = single_flag(i)?;
					(i, special_flags.compound_middle = flag)
				}
				"COMPOUNDLAST" | "COMPOUNDEND" => {
					let (i, flag) = single_flag(i)?;
					(i, special_flags.compound_last = flag)
				}
				"ONLYINCOMPOUND" => {
					let (i, flag) = single_flag(i)?;
					(i, special_flags.compound_onlyin = flag)
				}
				"COMPOUNDPERMITFLAG" => {
					let (i, flag) = single_flag(i)?;
					(i, special_flags.compound_permit = flag)
				}
				"COMPOUNDFORBIDFLAG" => {
					let (i, flag) = single_flag(i)?;
					(i, special_flags.compound_forbid = flag)
				}
				"COMPOUNDROOT" => {
					let (i, flag) = single_flag(i)?;
					(i, special_flags.compound_root = flag)
				}
				"FORCEUCASE" => {
					let (i, flag) = single_flag(i)?;
					(i, special_flags.compound_force_uppercase = flag)
				}
				"COMPOUNDMORESUFFIXES" => (i, options.compound_more_suffixes = true),
				"CHECKCOMPOUNDDUP" => (i, options.compound_check_duplicate = true),
				"CHECKCOMPOUNDREP" => (i, options.compound_check_rep = true),
				"CHECKCOMPOUNDCASE" => (i, options.compound_check_case = true),
				"CHECKCOMPOUNDTRIPLE" => (i, options.compound_check_triple = true),
				"SIMPLIFIEDTRIPLE" => (i, options.compound_simplified_triple = true),
				"SYLLABLENUM" => {
					// the original stores only the fact it is set
					let (i, _) = token(i)?;
					(i, options.compound_syllable_num = true)
				}
				"COMPOUNDSYLLABLE" => {
					let (i, max) = terminated(u16_p, space1)(i)?;
					let (i, vowels) = token(i)?;
					options.compound_syllable_max = max;
					(i, options.compound_syllable_vowels = vowels.to_owned())
				}

				// ——— affixes
				"PFX" => {
					let (i, mut parsed) = Self::parse_affix_block(
						i, "PFX", flag_ty, &options.flag_aliases, errors,
					)?;
					let pfxs = parsed.drain(..).map(
						|(flag, cross_product, strip, add, cont_flags, condition)| {
							let pfx = Affix::<Prefix> {
								flag,
								cross_product,
								strip,
								add,
								condition,
								cont_flags,
								kind: PhantomData,
							};
							log::debug!("(PFX) added prefix {pfx}");
							pfx
						},
					);
					(i, prefixes.extend(pfxs))
				}
				"SFX" => {
					let (i, mut parsed) = Self::parse_affix_block(
						i, "SFX", flag_ty, &options.flag_aliases, errors,
					)?;
					let sfxs = parsed.drain(..).map(
						|(flag, cross_product, strip, add, cont_flags, condition)| {
							let sfx = Affix::<Suffix> {
								flag,
								cross_product,
								strip,
								add,
								condition,
								cont_flags,
								kind: PhantomData,
							};
							log::debug!("(SFX) added suffix {sfx}");
							sfx
						},
					);
					(i, suffixes.extend(sfxs))
				}

				// ——— other flags
				"CIRCUMFIX" => {
					let (i, flag) = single_flag(i)?;
					(i, special_flags.circumfix = flag)
				}
				"FORBIDDENWORD" => {
					let (i, flag) = single_flag(i)?;
					(i, special_flags.forbidden_word = flag)
				}
				"KEEPCASE" => {
					let (i, flag) = single_flag(i)?;
					(i, special_flags.keep_case = flag)
				}
				"NEEDAFFIX" | "PSEUDOROOT" => {
					let (i, flag) = single_flag(i)?;
					(i, special_flags.need_affix = flag)
				}
				"SUBSTANDARD" => {
					let (i, flag) = single_flag(i)?;
					(i, special_flags.sub_standard = flag)
				}

				unknown => {
					log::warn!("skipping unknown directive {unknown}");
					let (i, _) = opt(is_not("\n"))(i)?;
					(i, ())
				}
			};

			// leave the line terminator for the outer loop
			let (i, _) = space0(i)?;
			Ok((i, ()))
		}
	}

	/// Counted table of `(from, to)` token pairs (`REP`, `ICONV`, …)
	fn parse_pair_table<'a>(
		i: &'a str,
		name: &'static str,
	) -> IResult<&'a str, Vec<(String, String)>> {
		let (i, num) = u16_p.terminated(space0).terminated(newline).parse(i)?;
		many_m_n(
			num.into(),
			num.into(),
			delimited(
				tag(name).terminated(space1),
				tuple((
					token.map(str::to_owned).terminated(space1),
					token.map(str::to_owned),
				)),
				space0.terminated(newline),
			),
		)(i)
	}

	/// One `CHECKCOMPOUNDPATTERN` entry: `end[/flag] begin[/flag] [repl]`
	fn parse_compound_pattern(i: &str, fty: FlagType) -> IResult<&str, CompoundPattern> {
		let word_slash_flag = |i| {
			tuple((
				is_not("/ \t\n").map(str::to_owned),
				opt(preceded(tag("/"), parse_flag(fty))),
			))(i)
		};
		let (i, _) = tag("CHECKCOMPOUNDPATTERN").terminated(space1).parse(i)?;
		let (i, (first, first_flag)) = word_slash_flag(i)?;
		let (i, (second, second_flag)) = preceded(space1, word_slash_flag)(i)?;
		let (i, replacement) = opt(preceded(space1, token))(i)?;
		let (i, _) = space0.terminated(newline).parse(i)?;

		let match_first_only_unaffixed = first == "0";
		Ok((
			i,
			CompoundPattern {
				first_end_chars: if match_first_only_unaffixed {
					String::new()
				} else {
					first
				},
				second_begin_chars: second,
				replacement: replacement.unwrap_or_default().to_owned(),
				first_word_flag: first_flag.unwrap_or_default(),
				second_word_flag: second_flag.unwrap_or_default(),
				match_first_only_unaffixed,
			},
		))
	}

	/// A `PFX`/`SFX` block: `AFX f Y|N n` header plus `n` entry lines
	#[allow(clippy::type_complexity)]
	fn parse_affix_block<'a>(
		i: &'a str,
		name: &'static str,
		fty: FlagType,
		aliases: &[FlagSet],
		errors: &mut Vec<String>,
	) -> IResult<&'a str, Vec<(Flag, bool, String, String, FlagSet, Condition)>> {
		// header: one flag means multiple entries
		let (i, (flag, cross_product, num)) = tuple((
			parse_flag(fty),
			preceded(space1, map(take(1_usize), |s| s == "Y")),
			delimited(space1, u16_p, space0.terminated(newline)),
		))(i)?;

		many_m_n(num.into(), num.into(), move |i: &'a str| {
			let (i, _) = tag(name).terminated(space1).parse(i)?;
			let (i, _) = verify(parse_flag(fty), |&f| f == flag)(i)?;

			// `0` means nothing is stripped
			let (i, strip) = preceded(space1, token)
				.map(|s| if s == "0" { "" } else { s })
				.parse(i)?;

			let (i, (add, cont_flags)) = preceded(
				space1,
				tuple((
					is_not("/ \t\n").map(|s| if s == "0" { "" } else { s }),
					opt(preceded(tag("/"), parse_flags(fty, aliases))),
				)),
			)(i)?;

			// a missing condition means "always applies"
			let (i, condition) = opt(preceded(space1, token))(i)?;
			// morphological fields carry no checking semantics
			let (i, _) = opt(preceded(space1, is_not("\n")))(i)?;
			let (i, _) = space0.terminated(newline).parse(i)?;

			let condition = condition.unwrap_or(".");
			let condition = Condition::new(condition).unwrap_or_else(|err| {
				errors.push(format!(
					"bad condition `{condition}` on {name} {flag}: {err}"
				));
				Condition::default()
			});

			Ok((
				i,
				(
					flag,
					cross_product,
					strip.to_owned(),
					add.to_owned(),
					cont_flags.unwrap_or_default(),
					condition,
				),
			))
		})(i)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn find_suffixes_in_index() -> Result<(), Box<dyn std::error::Error>> {
		let directive = "
SFX D Y 4
SFX D   y     ied        [^aeiou]y
SFX D   0     ed         [^ey]
SFX D   0     ed         [aeiou]y
SFX D   0     d          e
";
		let aff = AffFile::new(directive)?;

		let results = aff.suffix_index.iterate_suffixes_of("respelled");
		assert_eq!(results.len(), 3);
		// shortest appending first
		assert_eq!(results[0].add, "d");

		Ok(())
	}

	#[test]
	fn prefix_index_includes_zero_length_entries() -> Result<(), Box<dyn std::error::Error>> {
		let directive = "
PFX A Y 2
PFX A   0     0/X        .
PFX A   0     un         .
";
		let aff = AffFile::new(directive)?;

		let results = aff.prefix_index.iterate_prefixes_of("undo");
		assert_eq!(results.len(), 2);
		assert_eq!(results[0].add, "");
		assert_eq!(results[1].add, "un");
		assert!(aff.prefix_index.has_continuation_flag(Flag(b'X' as u16)));

		Ok(())
	}

	#[test]
	fn parse_iconv_directive() -> Result<(), Box<dyn std::error::Error>> {
		let aff = AffFile::new("ICONV 1\nICONV ’ '\n")?;
		assert_eq!(aff.options.input_conversion.replace_copy("don’t"), "don't");
		Ok(())
	}

	#[test]
	fn default_break_patterns_apply_when_absent() -> Result<(), Box<dyn std::error::Error>> {
		let aff = AffFile::new("SET UTF-8\n")?;
		assert_eq!(aff.options.break_table.middle_word_breaks(), ["-"]);
		assert_eq!(aff.options.break_table.start_word_breaks(), ["-"]);
		assert_eq!(aff.options.break_table.end_word_breaks(), ["-"]);
		Ok(())
	}

	#[test]
	fn rejects_non_utf8_encodings() {
		let err = AffFile::new("SET ISO8859-1\n").unwrap_err();
		assert!(matches!(err, InitializeError::UnsupportedEncoding(_)));
	}

	#[test]
	fn rejects_malformed_affix_conditions() {
		let err = AffFile::new("SFX A Y 1\nSFX A 0 s [ab\n").unwrap_err();
		assert!(matches!(err, InitializeError::Parser(_)));
	}

	#[test]
	fn long_flags_pack_two_chars() -> Result<(), Box<dyn std::error::Error>> {
		let aff = AffFile::new("FLAG long\nSFX Zx Y 1\nSFX Zx 0 s .\n")?;
		let suffixes = aff.suffix_index.iterate_suffixes_of("dogs");
		assert_eq!(suffixes.len(), 1);
		assert_eq!(suffixes[0].flag, Flag(((b'Z' as u16) << 8) | b'x' as u16));
		Ok(())
	}

	#[test]
	fn flag_aliases_resolve_ordinals() -> Result<(), Box<dyn std::error::Error>> {
		let aff = AffFile::new("AF 2\nAF AB\nAF CD\nSFX X Y 1\nSFX X 0 s/2 .\n")?;
		let suffixes = aff.suffix_index.iterate_suffixes_of("dogs");
		assert!(suffixes[0].cont_flags.contains(Flag(b'C' as u16)));
		assert!(suffixes[0].cont_flags.contains(Flag(b'D' as u16)));
		Ok(())
	}

	#[test]
	fn compound_rule_wrapped_flags() -> Result<(), Box<dyn std::error::Error>> {
		let aff = AffFile::new("FLAG num\nCOMPOUNDRULE 1\nCOMPOUNDRULE (101)(102)*\n")?;
		assert!(!aff.options.compound_rules.is_empty());
		Ok(())
	}

	#[test]
	fn checkcompoundpattern_zero_means_unaffixed() -> Result<(), Box<dyn std::error::Error>> {
		let aff = AffFile::new(
			"CHECKCOMPOUNDPATTERN 2\nCHECKCOMPOUNDPATTERN 0/X a/Y\nCHECKCOMPOUNDPATTERN nny ny nny\n",
		)?;
		let patterns = &aff.options.compound_patterns;
		assert!(patterns[0].match_first_only_unaffixed);
		assert_eq!(patterns[0].second_begin_chars, "a");
		assert_eq!(patterns[1].replacement, "nny");
		Ok(())
	}
}
