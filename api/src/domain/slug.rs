//! Slug derivation and validation
//!
//! `slugify` turns an arbitrary title into a URL-safe ASCII string,
//! transliterating Cyrillic letters and dropping everything else that is
//! not a latin letter, digit or hyphen.

use std::sync::OnceLock;

use regex::Regex;

use super::entities::MAX_SLUG_LENGTH;

fn slug_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("slug pattern is valid"))
}

/// Latin spelling of a lowercase Cyrillic letter, `None` if not Cyrillic.
fn transliterate(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        // Ukrainian
        'і' => "i",
        'ї' => "yi",
        'є' => "ye",
        'ґ' => "g",
        _ => return None,
    };
    Some(latin)
}

/// Derive a slug from free text. Deterministic; may return an empty string
/// when nothing in the input survives.
pub fn slugify(input: &str) -> String {
    let lowered = input.to_lowercase();
    let mut out = String::with_capacity(lowered.len());

    for c in lowered.chars() {
        match c {
            '&' => push_word(&mut out, "and"),
            'a'..='z' | '0'..='9' => out.push(c),
            '-' => push_hyphen(&mut out),
            c if c.is_whitespace() => push_hyphen(&mut out),
            c => {
                if let Some(latin) = transliterate(c) {
                    out.push_str(latin);
                }
            }
        }
    }

    out.trim_matches('-').to_string()
}

/// `slugify` cut down to the column limit
pub fn slugify_truncated(input: &str) -> String {
    let slug = slugify(input);
    // slugify output is ASCII, so byte and char positions agree
    match slug.get(..MAX_SLUG_LENGTH) {
        Some(prefix) => prefix.trim_end_matches('-').to_string(),
        None => slug,
    }
}

pub fn is_valid_slug(slug: &str) -> bool {
    slug.len() <= MAX_SLUG_LENGTH && slug_pattern().is_match(slug)
}

fn push_hyphen(out: &mut String) {
    if !out.is_empty() && !out.ends_with('-') {
        out.push('-');
    }
}

fn push_word(out: &mut String, word: &str) {
    push_hyphen(out);
    out.push_str(word);
    out.push('-');
}
