use crate::config::NormalizeConfig;
use crate::interner::InternerBuilder;
use crate::token::{NormalizedField, Token};

/// Main entry point. Splits `input` on whitespace, normalizes every word and
/// interns the survivors in their original order.
///
/// Empty or punctuation-only input produces an empty field; there are no
/// error cases.
pub fn normalize(
    input: &str,
    interner: &mut InternerBuilder,
    cfg: &NormalizeConfig,
) -> NormalizedField {
    let mut tokens: Vec<Token> = Vec::with_capacity((input.len() / 4).saturating_add(1));

    for word in input.split_whitespace() {
        if let Some(clean) = normalize_word(word, cfg) {
            tokens.push(interner.intern(&clean));
        }
    }

    NormalizedField::from(tokens)
}

/// Normalizes a single whitespace-free word.
///
/// Lowercases, drops every hyphen, then trims leading and trailing ASCII
/// punctuation (which covers `(` and `)`). Returns `None` when nothing is
/// left or when the result is a stop-word.
pub fn normalize_word(word: &str, cfg: &NormalizeConfig) -> Option<String> {
    let mut lowered = word.to_lowercase();
    lowered.retain(|ch| ch != '-');

    let stripped = strip_punctuation(&lowered);
    if stripped.is_empty() || cfg.is_stop_word(stripped) {
        return None;
    }

    Some(stripped.to_string())
}

/// Trims punctuation from both ends of a word.
fn strip_punctuation(word: &str) -> &str {
    word.trim_matches(|ch: char| ch.is_ascii_punctuation())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interner::Interner;

    fn run(input: &str) -> (NormalizedField, Interner) {
        let mut builder = InternerBuilder::new();
        let field = normalize(input, &mut builder, &NormalizeConfig::default());
        (field, builder.freeze())
    }

    fn words(input: &str) -> Vec<String> {
        let (field, interner) = run(input);
        interner
            .render(&field)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn empty_input_yields_empty_field() {
        assert!(run("").0.is_empty());
        assert!(run("   \t\n ").0.is_empty());
    }

    #[test]
    fn lowercases_and_removes_hyphens() {
        assert_eq!(words("Sony DSC-P1"), vec!["sony", "dscp1"]);
        assert_eq!(words("EOS--5D-Mark-II"), vec!["eos5dmarkii"]);
    }

    #[test]
    fn strips_edge_punctuation_only() {
        assert_eq!(
            words("(Cyber-shot) f/2.8, \"Kit\"!"),
            vec!["cybershot", "f/2.8", "kit"]
        );
    }

    #[test]
    fn punctuation_only_words_dropped() {
        assert_eq!(words("Canon - ... () EOS"), vec!["canon", "eos"]);
    }

    #[test]
    fn stop_words_dropped_regardless_of_case() {
        assert!(run("GmbH").0.is_empty());
        assert_eq!(
            words("Fujifilm Holdings Co. Ltd, UK"),
            vec!["fujifilm", "holdings"]
        );
        assert_eq!(words("Samsung INTERNATIONAL Inc."), vec!["samsung"]);
    }

    #[test]
    fn stop_word_fragments_are_kept() {
        assert_eq!(words("Coolpix incline"), vec!["coolpix", "incline"]);
    }

    #[test]
    fn single_character_words_kept() {
        assert_eq!(words("Canon EOS 5 D x"), vec!["canon", "eos", "5", "d", "x"]);
    }

    #[test]
    fn order_and_duplicates_preserved() {
        let mut builder = InternerBuilder::new();
        let field = normalize("zoom Zoom lens zoom", &mut builder, &NormalizeConfig::default());
        let zoom = builder.get("zoom").expect("zoom interned");
        let lens = builder.get("lens").expect("lens interned");
        assert_eq!(field.as_slice(), &[zoom, zoom, lens, zoom]);
    }

    #[test]
    fn normalization_is_idempotent() {
        let inputs = [
            "Sony Cyber-shot DSC-W310 (Black)",
            "Panasonic Lumix DMC-FZ35, 12MP -- 18x zoom!",
            "GmbH",
            "  Kodak   EasyShare C813 8.2 MP ",
        ];

        for input in inputs {
            let first = words(input);
            let second = words(&first.join(" "));
            assert_eq!(first, second, "input {input:?} is not idempotent");
        }
    }

    #[test]
    fn custom_stop_words_respected() {
        let cfg = NormalizeConfig {
            stop_words: vec!["camera".into()],
        };
        let mut builder = InternerBuilder::new();
        let field = normalize("Nikon D90 Camera Inc", &mut builder, &cfg);
        let interner = builder.freeze();
        assert_eq!(interner.render(&field), vec!["nikon", "d90", "inc"]);
    }
}
