use orthospell::Dictionary;

fn suggestions(dict: &Dictionary, word: &str) -> Vec<String> {
	let mut out = Vec::new();
	dict.suggest(word, &mut out);
	out
}

#[test]
fn replacement_table_suggestion() -> Result<(), Box<dyn std::error::Error>> {
	let dict = Dictionary::from_slice("REP 1\nREP teh the\n", "1\nthe\n")?;
	assert!(suggestions(&dict, "teh").contains(&"the".to_owned()));
	Ok(())
}

#[test]
fn suggestions_are_deduplicated_and_spell() -> Result<(), Box<dyn std::error::Error>> {
	let aff = "\
TRY esianrtolcdugmphbyfvkwz
KEY qwertyuiop|asdfghjkl|zxcvbnm
REP 2
REP tomorow tomorrow
REP sed said
";
	let dic = "\
6
tomorrow
said
hello
look/S
rotten
day
";
	let aff = format!("{aff}SFX S Y 1\nSFX S 0 s .\n");
	let dict = Dictionary::from_slice(&aff, dic)?;

	for wrong in ["tomorow", "sed", "hlelo", "loook", "rottenday"] {
		let sugs = suggestions(&dict, wrong);
		assert!(!sugs.is_empty(), "{wrong} should have suggestions");

		let mut deduped = sugs.clone();
		deduped.sort();
		deduped.dedup();
		assert_eq!(sugs.len(), deduped.len(), "{wrong} yielded duplicates");

		for s in &sugs {
			// multi-word splits carry a separator the checker does
			// not see as one word
			if s.contains(' ') || s.contains('-') {
				continue;
			}
			assert!(dict.spell(s), "suggestion {s} for {wrong} must spell");
		}
	}

	assert!(suggestions(&dict, "tomorow").contains(&"tomorrow".to_owned()));
	assert!(suggestions(&dict, "sed").contains(&"said".to_owned()));
	assert!(suggestions(&dict, "hlelo").contains(&"hello".to_owned()));
	assert!(suggestions(&dict, "loook").contains(&"look".to_owned()));
	assert!(suggestions(&dict, "rottenday").contains(&"rotten day".to_owned()));
	Ok(())
}

#[test]
fn suggest_never_fails_on_degenerate_input() -> Result<(), Box<dyn std::error::Error>> {
	let dict = Dictionary::from_slice("", "1\nfoo\n")?;

	assert!(suggestions(&dict, "").is_empty());
	assert!(suggestions(&dict, &"a".repeat(181)).is_empty());

	// single characters get no split or rotation candidates
	let sugs = suggestions(&dict, "x");
	assert!(!sugs.iter().any(|s| s.contains(' ')));
	Ok(())
}

#[test]
fn output_conversion_applies_to_suggestions() -> Result<(), Box<dyn std::error::Error>> {
	let dict = Dictionary::from_slice(
		"OCONV 1\nOCONV ' ’\nREP 1\nREP cant can't\n",
		"1\ncan't\n",
	)?;
	assert!(suggestions(&dict, "cant").contains(&"can’t".to_owned()));
	Ok(())
}
