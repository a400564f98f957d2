//! Bounded pattern matcher for affix conditions
//!
//! Affix entries carry a condition the stem must satisfy before the affix
//! applies. The syntax is a tiny subset of regular expressions: literal
//! characters, `.`, `[abc]` and `[^abc]`. There are no quantifiers, so a
//! compiled condition has a fixed width in characters and matching is a
//! single linear pass.

/// One compiled piece of a condition pattern
#[derive(Debug, Clone, PartialEq, Eq)]
enum Span {
	/// Consecutive literal characters
	Literal(String),
	/// `.`, any single character
	Dot,
	/// `[...]`, one character out of the set
	AnyOf(String),
	/// `[^...]`, one character not in the set
	NoneOf(String),
}

/// Ways a condition pattern can be rejected at compile time
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub(crate) enum ConditionError {
	#[error("closing bracket has no matching opening bracket")]
	UnopenedBracket,
	#[error("opening bracket has no matching closing bracket")]
	UnclosedBracket,
	#[error("empty bracket expression")]
	EmptyBracketExpression,
}

/// A compiled affix condition
#[derive(Debug, Clone, Default)]
pub(crate) struct Condition {
	spans: Vec<Span>,
	/// Total number of characters the pattern consumes
	length: usize,
}

impl Condition {
	pub(crate) fn new(pattern: &str) -> Result<Self, ConditionError> {
		let mut spans = Vec::new();
		let mut length = 0;
		let mut rest = pattern;

		while !rest.is_empty() {
			let special = rest
				.find(|c| matches!(c, '[' | ']' | '.'))
				.unwrap_or(rest.len());
			if special > 0 {
				let lit = &rest[..special];
				length += lit.chars().count();
				spans.push(Span::Literal(lit.to_owned()));
				rest = &rest[special..];
				continue;
			}
			match rest.as_bytes()[0] {
				b'.' => {
					spans.push(Span::Dot);
					length += 1;
					rest = &rest[1..];
				}
				b']' => return Err(ConditionError::UnopenedBracket),
				_ => {
					// opening bracket
					rest = &rest[1..];
					let negated = rest.starts_with('^');
					if negated {
						rest = &rest[1..];
					}
					let close = rest
						.find(']')
						.ok_or(ConditionError::UnclosedBracket)?;
					if close == 0 {
						return Err(ConditionError::EmptyBracketExpression);
					}
					let set = rest[..close].to_owned();
					spans.push(if negated {
						Span::NoneOf(set)
					} else {
						Span::AnyOf(set)
					});
					length += 1;
					rest = &rest[close + 1..];
				}
			}
		}

		Ok(Self { spans, length })
	}

	/// Match against the first `length` characters of `word`
	pub(crate) fn match_prefix(&self, word: &str) -> bool {
		self.match_at(word.chars())
	}

	/// Match against the last `length` characters of `word`
	pub(crate) fn match_suffix(&self, word: &str) -> bool {
		let len = word.chars().count();
		if self.length > len {
			return false;
		}
		self.match_at(word.chars().skip(len - self.length))
	}

	fn match_at(&self, mut chars: impl Iterator<Item = char>) -> bool {
		for span in &self.spans {
			match span {
				Span::Literal(lit) => {
					for expected in lit.chars() {
						if chars.next() != Some(expected) {
							return false;
						}
					}
				}
				Span::Dot => {
					if chars.next().is_none() {
						return false;
					}
				}
				Span::AnyOf(set) => match chars.next() {
					Some(c) if set.contains(c) => {}
					_ => return false,
				},
				Span::NoneOf(set) => match chars.next() {
					Some(c) if !set.contains(c) => {}
					_ => return false,
				},
			}
		}
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn literal_and_dot() {
		let cond = Condition::new("a.c").unwrap();
		assert!(cond.match_prefix("abcde"));
		assert!(cond.match_prefix("axc"));
		assert!(!cond.match_prefix("abd"));
		assert!(!cond.match_prefix("ab"));
	}

	#[test]
	fn character_classes() {
		let cond = Condition::new("[^aeiou]y").unwrap();
		assert!(cond.match_suffix("carry"));
		assert!(!cond.match_suffix("delay"));

		let cond = Condition::new("[aeiou]y").unwrap();
		assert!(cond.match_suffix("delay"));
		assert!(!cond.match_suffix("carry"));
	}

	#[test]
	fn suffix_match_is_anchored_to_the_end() {
		let cond = Condition::new("e").unwrap();
		assert!(cond.match_suffix("like"));
		assert!(!cond.match_suffix("liked"));
		assert!(!cond.match_suffix(""));
	}

	#[test]
	fn matching_is_idempotent() {
		let cond = Condition::new("[bcd]ata").unwrap();
		let first = cond.match_prefix("data");
		assert_eq!(first, cond.match_prefix("data"));
		assert!(first);
	}

	#[test]
	fn malformed_patterns_are_rejected() {
		assert_eq!(
			Condition::new("ab]").unwrap_err(),
			ConditionError::UnopenedBracket
		);
		assert_eq!(
			Condition::new("[ab").unwrap_err(),
			ConditionError::UnclosedBracket
		);
		assert_eq!(
			Condition::new("a[]b").unwrap_err(),
			ConditionError::EmptyBracketExpression
		);
	}

	#[test]
	fn dot_pattern_matches_any_word() {
		let cond = Condition::new(".").unwrap();
		assert!(cond.match_prefix("z"));
		assert!(cond.match_suffix("word"));
		assert!(!cond.match_suffix(""));
	}
}
