mod utils;

use utils::test_dictionary_pair;

#[test]
fn flag_compounding() -> Result<(), Box<dyn std::error::Error>> {
	test_dictionary_pair(
		"COMPOUNDFLAG X\n",
		"3\nfoot/X\nball/X\ntree\n",
		&["football", "ballfoot", "footballfoot"],
		&["balltree", "treeball", "footbal"],
	)
}

#[test]
fn break_patterns() -> Result<(), Box<dyn std::error::Error>> {
	test_dictionary_pair(
		"BREAK 1\nBREAK -\n",
		"2\nfoo\nbar\n",
		&["foo-bar", "bar-foo", "foo-bar-foo"],
		&["foo-baz", "baz-bar"],
	)
}

#[test]
fn rule_compounding() -> Result<(), Box<dyn std::error::Error>> {
	test_dictionary_pair(
		"COMPOUNDRULE 1\nCOMPOUNDRULE ABC?\n",
		"3\nfoo/A\nbar/B\nbaz/C\n",
		&["foobar", "foobarbaz"],
		&["barfoo", "foobaz", "bazbarfoo"],
	)
}

#[test]
fn compound_affixes_with_permit_flag() -> Result<(), Box<dyn std::error::Error>> {
	test_dictionary_pair(
		"COMPOUNDFLAG X\nCOMPOUNDPERMITFLAG P\nSFX S Y 1\nSFX S 0 s/P .\n",
		"2\nfoot/XS\nball/XS\n",
		&["football", "footsball", "footballs"],
		&["sfootball"],
	)
}
