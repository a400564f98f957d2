use orthospell::Dictionary;

#[derive(Debug, thiserror::Error)]
#[error("{0} words failed to be correctly spellchecked")]
struct SpellCheckErrors(usize);

pub(crate) fn test_dictionary_pair(
	aff: &str,
	dic: &str,
	good: &[&str],
	wrong: &[&str],
) -> Result<(), Box<dyn std::error::Error>> {
	let _ = pretty_env_logger::try_init();

	let dict = Dictionary::from_slice(aff, dic)?;

	let mut errors = 0;

	errors += good
		.iter()
		.filter(|w| {
			if dict.spell(w) {
				log::info!("{w} is indeed fine");
				false
			} else {
				log::error!("{w} is supposed to be fine but is wrong");
				true
			}
		})
		.count();

	errors += wrong
		.iter()
		.filter(|w| {
			if dict.spell(w) {
				log::error!("{w} is supposed to be wrong but is fine");
				true
			} else {
				log::info!("{w} is indeed wrong");
				false
			}
		})
		.count();

	if errors == 0 {
		Ok(())
	} else {
		Err(Box::new(SpellCheckErrors(errors)))
	}
}
