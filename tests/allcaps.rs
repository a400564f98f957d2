mod utils;

use utils::test_dictionary_pair;

const ALLCAPS_AFF: &str = "\
KEEPCASE K
SFX S Y 1
SFX S   0     s          .
";

const ALLCAPS_DIC: &str = "\
3
UNICEF/KS
iPod/K
OpenGL
";

const ALLCAPS_GOOD: [&str; 5] = ["UNICEF", "UNICEFs", "iPod", "OpenGL", "OPENGL"];

const ALLCAPS_WRONG: [&str; 6] = ["unicef", "Unicef", "IPOD", "ipod", "Ipod", "opengl"];

#[test]
fn allcaps() -> Result<(), Box<dyn std::error::Error>> {
	test_dictionary_pair(ALLCAPS_AFF, ALLCAPS_DIC, &ALLCAPS_GOOD, &ALLCAPS_WRONG)
}
