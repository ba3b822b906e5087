//! Answer normalization applied before comparison.
//!
//! The transforms are applied in a fixed order (case, accent, punctuation)
//! so that stored expectations stay reproducible. Each transform is
//! idempotent.

use crate::types::Training;

/// Which normalization transforms to apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub ignore_case: bool,
    pub ignore_accent: bool,
    pub ignore_punctuation: bool,
}

impl From<&Training> for NormalizeOptions {
    fn from(training: &Training) -> Self {
        Self {
            ignore_case: training.ignore_case,
            ignore_accent: training.ignore_accent,
            ignore_punctuation: training.ignore_punctuation,
        }
    }
}

/// Punctuation marks removed by the punctuation transform.
const PUNCTUATION: &str = ":;,.!¡?¿؟-·~";

/// Normalize a string for comparison according to the enabled options.
pub fn normalize(text: &str, options: &NormalizeOptions) -> String {
    let mut text = text.to_string();
    if options.ignore_case {
        text = text.to_lowercase();
    }
    if options.ignore_accent {
        text = strip_accents(&text);
    }
    if options.ignore_punctuation {
        text.retain(|c| !PUNCTUATION.contains(c));
    }
    text
}

/// Map accented and ligature letters to their ASCII base. Characters
/// outside the table pass through unchanged.
pub fn strip_accents(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match ascii_base(c) {
            Some(base) => out.push_str(base),
            None => out.push(c),
        }
    }
    out
}

fn ascii_base(c: char) -> Option<&'static str> {
    let base = match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => "a",
        'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' => "A",
        'ç' | 'č' => "c",
        'Ç' | 'Č' => "C",
        'é' | 'è' | 'ê' | 'ë' | 'ě' => "e",
        'É' | 'È' | 'Ê' | 'Ë' | 'Ě' => "E",
        'í' | 'ì' | 'î' | 'ï' => "i",
        'Í' | 'Ì' | 'Î' | 'Ï' => "I",
        'ñ' => "n",
        'Ñ' => "N",
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ø' => "o",
        'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' | 'Ø' => "O",
        'š' => "s",
        'Š' => "S",
        'ú' | 'ù' | 'û' | 'ü' | 'ů' => "u",
        'Ú' | 'Ù' | 'Û' | 'Ü' | 'Ů' => "U",
        'ý' | 'ÿ' => "y",
        'Ý' => "Y",
        'ž' => "z",
        'Ž' => "Z",
        'ð' => "d",
        'Ð' => "D",
        'þ' => "t",
        'Þ' => "T",
        'æ' => "ae",
        'Æ' => "AE",
        'œ' => "oe",
        'Œ' => "OE",
        'ß' => "ss",
        _ => return None,
    };
    Some(base)
}

/// Leading article tokens per language. Keys match the list language label,
/// case-insensitively, by ISO code or English name.
fn article_tokens(lang: &str) -> &'static [&'static str] {
    match lang.to_lowercase().as_str() {
        "de" | "german" | "deutsch" => &["der", "die", "das", "ein", "eine"],
        "es" | "spanish" | "español" => {
            &["el", "la", "los", "las", "un", "una", "unos", "unas"]
        }
        "fr" | "french" | "français" => &["le", "la", "les", "un", "une", "des"],
        "en" | "english" => &["the", "a", "an"],
        "it" | "italian" | "italiano" => {
            &["il", "lo", "la", "i", "gli", "le", "un", "uno", "una"]
        }
        _ => &[],
    }
}

/// Remove a single leading article of the given language, if present.
///
/// Applied only to correct-answer variants, never to the learner's input.
/// A bare article with nothing following it is left alone.
pub fn strip_leading_article<'a>(text: &'a str, lang: &str) -> &'a str {
    let trimmed = text.trim_start();
    let Some((first, rest)) = trimmed.split_once(char::is_whitespace) else {
        return text;
    };
    let first = first.to_lowercase();
    if article_tokens(lang).iter().any(|article| *article == first) {
        rest.trim_start()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ALL: NormalizeOptions = NormalizeOptions {
        ignore_case: true,
        ignore_accent: true,
        ignore_punctuation: true,
    };

    #[test]
    fn case_folding() {
        let options = NormalizeOptions {
            ignore_case: true,
            ..Default::default()
        };
        assert_eq!(normalize("HÉLLO", &options), "héllo");
    }

    #[test]
    fn accent_stripping() {
        let options = NormalizeOptions {
            ignore_accent: true,
            ..Default::default()
        };
        assert_eq!(normalize("él ámó", &options), "el amo");
        assert_eq!(normalize("Æther œuvre straße", &options), "AEther oeuvre strasse");
        // Unknown characters pass through.
        assert_eq!(normalize("日本語", &options), "日本語");
    }

    #[test]
    fn punctuation_stripping() {
        let options = NormalizeOptions {
            ignore_punctuation: true,
            ..Default::default()
        };
        assert_eq!(normalize("¿Qué tal?", &options), "Qué tal");
        assert_eq!(normalize("a-b·c~d!", &options), "abcd");
        assert_eq!(normalize("x, y; z.", &options), "x y z");
    }

    #[test]
    fn transforms_combined() {
        assert_eq!(normalize("¡Está BIEN!", &ALL), "esta bien");
    }

    #[test]
    fn normalization_is_idempotent() {
        let samples = ["¿Dónde ESTÁ el baño?", "straße", "ÆON.", "plain"];
        for ignore_case in [false, true] {
            for ignore_accent in [false, true] {
                for ignore_punctuation in [false, true] {
                    let options = NormalizeOptions {
                        ignore_case,
                        ignore_accent,
                        ignore_punctuation,
                    };
                    for sample in samples {
                        let once = normalize(sample, &options);
                        assert_eq!(normalize(&once, &options), once);
                    }
                }
            }
        }
    }

    #[test]
    fn article_stripping_by_language() {
        assert_eq!(strip_leading_article("der Tisch", "de"), "Tisch");
        assert_eq!(strip_leading_article("la casa", "es"), "casa");
        assert_eq!(strip_leading_article("Les fleurs", "fr"), "fleurs");
        assert_eq!(strip_leading_article("the house", "English"), "house");
    }

    #[test]
    fn article_stripping_leaves_non_articles() {
        assert_eq!(strip_leading_article("Tisch", "de"), "Tisch");
        assert_eq!(strip_leading_article("derb gesagt", "de"), "derb gesagt");
        // Unknown language has no article table.
        assert_eq!(strip_leading_article("der Tisch", "fi"), "der Tisch");
        // A bare article stays.
        assert_eq!(strip_leading_article("der", "de"), "der");
    }
}
