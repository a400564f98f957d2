mod utils;

use utils::test_dictionary_pair;

const UNICODE_AFF: &str = "\
SET UTF-8
FLAG UTF-8
PFX π Y 1
PFX π   0     un         .
SFX ß Y 1
SFX ß   0     s          .
";

const UNICODE_DIC: &str = "\
4
tüy/πß
naïve
Zürich
çay
";

const UNICODE_GOOD: [&str; 8] = [
	"tüy",
	"untüy",
	"tüys",
	"untüys",
	"naïve",
	"Zürich",
	"ZÜRICH",
	"çay",
];

const UNICODE_WRONG: [&str; 5] = ["tüz", "untüz", "Naïve2", "zürich", "çays"];

#[test]
fn base_unicode() -> Result<(), Box<dyn std::error::Error>> {
	test_dictionary_pair(UNICODE_AFF, UNICODE_DIC, &UNICODE_GOOD, &UNICODE_WRONG)
}
