mod utils;

use utils::test_dictionary_pair;

const BASE_AFF: &str = "\
SET UTF-8
TRY esianrtolcdugmphbyfvkwzESIANRTOLCDUGMPHBYFVKWZ'
PFX A Y 1
PFX A   0     un         .
SFX B Y 1
SFX B   0     s          .
SFX D Y 4
SFX D   y     ied        [^aeiou]y
SFX D   0     ed         [^ey]
SFX D   0     ed         [aeiou]y
SFX D   0     d          e
";

const BASE_DIC: &str = "\
12
do/AB
create/ABD
imply/D
convey/BD
text
hello
NASA
etc
can't
day
seven
Hunspell
";

const BASE_GOOD: [&str; 22] = [
	"do",
	"undo",
	"dos",
	"undos",
	"create",
	"created",
	"creates",
	"uncreate",
	"uncreated",
	"imply",
	"implied",
	"convey",
	"conveyed",
	"conveys",
	"can't",
	"etc",
	"etc.",
	"NASA",
	"NASA.",
	"Hello",
	"HELLO",
	"Text.",
];

const BASE_WRONG: [&str; 10] = [
	"undoed",
	"implyed",
	"texxt",
	"hlelo",
	"Nasa",
	"conveied",
	"daay",
	"sevens",
	"hunspell",
	"created.undone",
];

#[test]
fn base() -> Result<(), Box<dyn std::error::Error>> {
	test_dictionary_pair(BASE_AFF, BASE_DIC, &BASE_GOOD, &BASE_WRONG)
}

#[test]
fn empty_and_numeric_inputs() -> Result<(), Box<dyn std::error::Error>> {
	test_dictionary_pair(
		BASE_AFF,
		BASE_DIC,
		&["", "42", "4,200.1", "1-2-3"],
		&["4,,2", "42a"],
	)
}
