//! Flags and flag sets as used across `.aff` and `.dic` files
//!
//! A [`Flag`] is a 16-bit code whatever the declared `FLAG` syntax was:
//! single chars map to their codepoint, long flags pack two ASCII bytes,
//! numeric flags are taken verbatim and UTF-8 flags must stay in the BMP.

use std::fmt;

/// Marks the title-cased twin of an all-caps or mixed-case stem.
///
/// Entries carrying it are found by the init-capital lookup path but must be
/// skipped wherever `skip_hidden_homonym` is requested. User flags can never
/// decode to this value.
pub(crate) const HIDDEN_HOMONYM_FLAG: Flag = Flag(u16::MAX);

/// A single dictionary flag. Zero means "no flag configured" and never
/// matches anything, which lets optional flag options stay plain `Flag`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub(crate) struct Flag(pub(crate) u16);

impl Flag {
	/// Whether the option carrying this flag was set at all
	pub(crate) const fn is_set(self) -> bool {
		self.0 != 0
	}
}

impl fmt::Display for Flag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match char::from_u32(u32::from(self.0)) {
			Some(c) if self.0 >= 0x20 => write!(f, "{c}"),
			_ => write!(f, "#{}", self.0),
		}
	}
}

/// Sorted, duplicate-free set of [`Flag`]s.
///
/// Kept sorted so containment is a binary search and set operations are
/// linear merges. Iteration order is ascending flag value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FlagSet(Vec<Flag>);

impl FlagSet {
	pub(crate) fn new(mut flags: Vec<Flag>) -> Self {
		flags.sort_unstable();
		flags.dedup();
		Self(flags)
	}

	pub(crate) fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub(crate) fn contains(&self, flag: Flag) -> bool {
		flag.is_set() && self.0.binary_search(&flag).is_ok()
	}

	pub(crate) fn insert(&mut self, flag: Flag) {
		if let Err(pos) = self.0.binary_search(&flag) {
			self.0.insert(pos, flag);
		}
	}

	pub(crate) fn erase(&mut self, flag: Flag) -> bool {
		match self.0.binary_search(&flag) {
			Ok(pos) => {
				self.0.remove(pos);
				true
			}
			Err(_) => false,
		}
	}

	/// Merge every flag of `other` into `self`
	pub(crate) fn union_with(&mut self, other: &Self) {
		for &flag in &other.0 {
			self.insert(flag);
		}
	}

	/// Whether the two sets share at least one flag
	pub(crate) fn intersects(&self, other: &Self) -> bool {
		let (mut i, mut j) = (0, 0);
		while i < self.0.len() && j < other.0.len() {
			match self.0[i].cmp(&other.0[j]) {
				std::cmp::Ordering::Less => i += 1,
				std::cmp::Ordering::Greater => j += 1,
				std::cmp::Ordering::Equal => return true,
			}
		}
		false
	}

	pub(crate) fn iter(&self) -> impl Iterator<Item = Flag> + '_ {
		self.0.iter().copied()
	}
}

impl FromIterator<Flag> for FlagSet {
	fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
		Self::new(iter.into_iter().collect())
	}
}

impl fmt::Display for FlagSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for flag in self.iter() {
			write!(f, "{flag}")?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn set(codes: &[u16]) -> FlagSet {
		codes.iter().map(|&c| Flag(c)).collect()
	}

	#[test]
	fn stays_sorted_and_deduplicated() {
		let fs = set(&[7, 3, 7, 1, 3]);
		let collected: Vec<_> = fs.iter().collect();
		assert_eq!(collected, vec![Flag(1), Flag(3), Flag(7)]);
	}

	#[test]
	fn insert_then_erase_roundtrips() {
		let original = set(&[2, 9]);
		let mut fs = original.clone();
		fs.insert(Flag(5));
		assert!(fs.contains(Flag(5)));
		assert!(fs.erase(Flag(5)));
		assert_eq!(fs, original);
	}

	#[test]
	fn union_keeps_invariant() {
		let mut fs = set(&[1, 4]);
		fs.union_with(&set(&[2, 4, 8]));
		let collected: Vec<_> = fs.iter().collect();
		assert_eq!(collected, vec![Flag(1), Flag(2), Flag(4), Flag(8)]);
	}

	#[test]
	fn intersects_only_on_shared_flags() {
		assert!(set(&[1, 5, 9]).intersects(&set(&[5])));
		assert!(!set(&[1, 5, 9]).intersects(&set(&[2, 6])));
		assert!(!set(&[]).intersects(&set(&[1])));
	}

	#[test]
	fn unset_flag_never_contained() {
		let fs = set(&[0, 1]);
		assert!(!fs.contains(Flag(0)));
		assert!(fs.contains(Flag(1)));
	}
}
