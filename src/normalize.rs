//! Collapsing the different ways a token can be spaced, so `"2 + 3"` and
//! `"2+3"` look the same to a tokenizer.

use regex::Regex;

/// Normalize `text` against a single set of aliases.
///
/// Any whitespace counts, not just spaces: tabs and newlines next to an alias
/// are removed and every other run of whitespace becomes a single space.
///
/// ```rust
/// let got = symbolics::normalize("  2  plus   3 ", &["+", "plus"]);
/// assert_eq!(got, "2plus3");
/// ```
pub fn normalize<I, S>(text: &str, aliases: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Normalizer::new(aliases).normalize(text)
}

/// A reusable normalizer for a fixed set of aliases.
///
/// Whitespace on either side of an alias is removed and every remaining run
/// of whitespace becomes a single space. Longer aliases are tried first, so
/// `"2 ** 3"` is treated as `"**"` rather than two `"*"`s.
#[derive(Debug, Clone)]
pub struct Normalizer {
    around_aliases: Option<Regex>,
}

impl Normalizer {
    pub fn new<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut aliases: Vec<String> = aliases
            .into_iter()
            .map(|alias| alias.as_ref().trim().to_string())
            .filter(|alias| !alias.is_empty())
            .collect();

        if aliases.is_empty() {
            return Normalizer {
                around_aliases: None,
            };
        }

        // the regex engine takes the first alternative that matches
        aliases.sort_by(|left, right| {
            right.len().cmp(&left.len()).then_with(|| left.cmp(right))
        });
        aliases.dedup();

        let alternatives: Vec<String> =
            aliases.iter().map(|alias| alternative(alias)).collect();
        let pattern = format!(r"\s*({})\s*", alternatives.join("|"));

        match Regex::new(&pattern) {
            Ok(re) => Normalizer {
                around_aliases: Some(re),
            },
            Err(e) => {
                log::warn!(
                    "Unable to match {} aliases, only normalizing whitespace: {}",
                    aliases.len(),
                    e
                );
                Normalizer {
                    around_aliases: None,
                }
            },
        }
    }

    pub fn normalize(&self, text: &str) -> String {
        let text = text.trim();

        let tightened = match &self.around_aliases {
            Some(re) => re.replace_all(text, "$1"),
            None => text.into(),
        };

        tightened.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Aliases spelled with letters only match whole words, so the `"e"` in
/// `"time step"` is left alone.
fn alternative(alias: &str) -> String {
    let escaped = regex::escape(alias);
    let starts_word = alias.chars().next().map_or(false, is_word_character);
    let ends_word = alias.chars().last().map_or(false, is_word_character);

    match (starts_word, ends_word) {
        (true, true) => format!(r"\b{}\b", escaped),
        (true, false) => format!(r"\b{}", escaped),
        (false, true) => format!(r"{}\b", escaped),
        (false, false) => escaped,
    }
}

fn is_word_character(c: char) -> bool { c.is_alphanumeric() || c == '_' }

#[cfg(test)]
mod tests {
    use super::*;

    const ADD: &[&str] = &["+", "plus"];

    macro_rules! normalize_test {
        ($name:ident, $aliases:expr, $src:expr, $should_be:expr) => {
            #[test]
            fn $name() {
                let got = normalize($src, $aliases);

                assert_eq!(got, $should_be);
            }
        };
    }

    normalize_test!(surrounding_spaces, ADD, " 2 + 3 ", "2+3");
    normalize_test!(runs_of_spaces, ADD, "2  +   3", "2+3");
    normalize_test!(already_normalized, ADD, "2+3", "2+3");
    normalize_test!(space_before, ADD, "2 +3", "2+3");
    normalize_test!(space_after, ADD, "2+ 3", "2+3");
    normalize_test!(word_aliases, ADD, "2 plus 3", "2plus3");
    normalize_test!(tabs_and_newlines, ADD, "2\t+\n3", "2+3");
    normalize_test!(other_spacing_is_collapsed, ADD, "x   y + z", "x y+z");
    normalize_test!(no_aliases, &[] as &[&str], "  a    b ", "a b");
    normalize_test!(empty_text, ADD, "   ", "");
    normalize_test!(
        longest_alias_wins,
        &["*", "**"],
        "2 ** 3 * 4",
        "2**3*4"
    );
    normalize_test!(
        aliases_with_regex_metacharacters,
        &["^", "(", ")", "."],
        "( 2 ^ 3 ) . 4",
        "(2^3).4"
    );
    normalize_test!(word_aliases_inside_words, ADD, "surplus 1", "surplus 1");
    normalize_test!(
        single_letter_aliases_match_whole_words,
        &["e"],
        "time step e 2",
        "time stepe2"
    );
    normalize_test!(
        multi_character_alias_is_not_split,
        &["=", "!=", "=="],
        "a != b == c",
        "a!=b==c"
    );

    #[test]
    fn normalizers_can_be_reused() {
        let normalizer = Normalizer::new(ADD);

        assert_eq!(normalizer.normalize("1 + 1"), "1+1");
        assert_eq!(normalizer.normalize("1 plus   1"), "1plus1");
    }
}
