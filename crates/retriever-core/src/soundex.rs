//! Soundex phonetic hashing (component C2).

enum Class {
    Vowel,
    Transparent,
    Consonant(u8),
}

fn classify(c: char) -> Option<Class> {
    match c {
        'a' | 'e' | 'i' | 'o' | 'u' => Some(Class::Vowel),
        'h' | 'w' | 'y' => Some(Class::Transparent),
        'b' | 'f' | 'p' | 'v' => Some(Class::Consonant(1)),
        'c' | 'g' | 'j' | 'k' | 'q' | 's' | 'x' | 'z' => Some(Class::Consonant(2)),
        'd' | 't' => Some(Class::Consonant(3)),
        'l' => Some(Class::Consonant(4)),
        'm' | 'n' => Some(Class::Consonant(5)),
        'r' => Some(Class::Consonant(6)),
        _ => None,
    }
}

/// Maps a word to its 4-character Soundex code (spec §4.2). Blank input
/// returns an empty string; a single-letter input returns itself, matching
/// the letter-collapse rules having nothing to operate on.
pub fn soundex(word: &str) -> String {
    let lower: String = word.trim().to_lowercase();
    if lower.chars().count() <= 1 {
        return lower;
    }

    let letters: Vec<char> = lower.chars().filter(|c| c.is_ascii_alphabetic()).collect();
    let Some((&first, rest)) = letters.split_first() else {
        return String::new();
    };

    let mut code = String::with_capacity(4);
    code.push(first.to_ascii_uppercase());

    // The code of the previous consonant, reset by a vowel and left
    // untouched by `h`/`w`/`y` so that e.g. "Ashcraft" collapses the `s`
    // and `c` (both code 2) across the transparent `h`.
    let mut last_digit = classify(first).and_then(|c| match c {
        Class::Consonant(d) => Some(d),
        _ => None,
    });

    for &c in rest {
        if code.len() == 4 {
            break;
        }
        match classify(c) {
            Some(Class::Consonant(d)) => {
                if last_digit != Some(d) {
                    code.push((b'0' + d) as char);
                }
                last_digit = Some(d);
            }
            Some(Class::Transparent) => {}
            Some(Class::Vowel) | None => last_digit = None,
        }
    }

    while code.len() < 4 {
        code.push('0');
    }
    code.truncate(4);
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_examples() {
        assert_eq!(soundex("Robert"), "R163");
        assert_eq!(soundex("Rupert"), "R163");
        assert_eq!(soundex("Ashcraft"), "A261");
        assert_eq!(soundex("Tymczak"), "T522");
    }

    #[test]
    fn blank_and_single_letter() {
        assert_eq!(soundex(""), "");
        assert_eq!(soundex("a"), "a");
    }

    #[test]
    fn length_is_always_four_for_longer_words() {
        for word in ["space", "jam", "basketball", "silver", "a1"] {
            if word.chars().count() >= 2 {
                assert_eq!(soundex(word).len(), 4, "word = {word}");
            }
        }
    }

    proptest::proptest! {
        #[test]
        fn soundex_length_invariant(word in "[a-zA-Z]{2,30}") {
            proptest::prop_assert_eq!(soundex(&word).len(), 4);
        }
    }
}
