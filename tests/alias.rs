mod utils;

use utils::test_dictionary_pair;

const ALIAS_AFF: &str = "\
AF 2
AF AB
AF B
PFX A Y 1
PFX A   0     un         .
SFX B Y 1
SFX B   0     s          .
";

const ALIAS_DIC: &str = "\
2
foo/1
bar/2
";

const ALIAS_GOOD: [&str; 6] = ["foo", "unfoo", "foos", "unfoos", "bar", "bars"];

const ALIAS_WRONG: [&str; 3] = ["unbar", "unbars", "baz"];

#[test]
fn alias() -> Result<(), Box<dyn std::error::Error>> {
	test_dictionary_pair(ALIAS_AFF, ALIAS_DIC, &ALIAS_GOOD, &ALIAS_WRONG)
}
