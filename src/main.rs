//! Orthospell CLI

use orthospell::Dictionary;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
	pretty_env_logger::init();

	let mut args = std::env::args().skip(1);
	let Some(base) = args.next() else {
		eprintln!("usage: orthospell <dictionary-base-path> <word>...");
		std::process::exit(2);
	};
	let dict = Dictionary::from_pair(Path::new(&base))?;

	let mut suggestions = Vec::new();
	for word in args {
		if dict.spell(&word) {
			println!("{word}: ok");
		} else {
			dict.suggest(&word, &mut suggestions);
			println!("{word}: wrong, near: {}", suggestions.join(", "));
		}
	}

	Ok(())
}
