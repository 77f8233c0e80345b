//! Vietnamese-locale string collation.
//!
//! Titles are ordered the way a Vietnamese reader expects, following the
//! CLDR `vi` tailoring of the Unicode Collation Algorithm:
//!
//! - **Primary**: base letters in Vietnamese alphabet order, where the
//!   modified letters are distinct letters: `a < ă < â < b < c < d < đ < e < ê
//!   < … < o < ô < ơ < … < u < ư < …`. Whitespace sorts before punctuation,
//!   punctuation before digits, digits before letters.
//! - **Secondary**: tone marks, `none < grave < hook < tilde < acute < dot`
//!   (`a < à < ả < ã < á < ạ`).
//! - **Tertiary**: case, lowercase first.
//!
//! Each level only breaks ties left by the previous one, so comparison is
//! case-insensitive until everything else is equal.
//!
//! Both precomposed input (`ạ`) and decomposed input (`a` + U+0323) are
//! understood. Letters outside the Vietnamese alphabet keep their code point
//! order after the Latin letters.

use std::cmp::Ordering;

/// Vietnamese alphabet, including the Latin letters Vietnamese does not use.
const ALPHABET: [char; 33] = [
    'a', 'ă', 'â', 'b', 'c', 'd', 'đ', 'e', 'ê', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o',
    'ô', 'ơ', 'p', 'q', 'r', 's', 't', 'u', 'ư', 'v', 'w', 'x', 'y', 'z',
];

/// Vowels with their five tones, columns in secondary order:
/// none, grave, hook above, tilde, acute, dot below.
const TONED_LOWER: [&str; 12] = [
    "aàảãáạ", "ăằẳẵắặ", "âầẩẫấậ", "eèẻẽéẹ", "êềểễếệ", "iìỉĩíị", "oòỏõóọ", "ôồổỗốộ", "ơờởỡớợ",
    "uùủũúụ", "ưừửữứự", "yỳỷỹýỵ",
];

const TONED_UPPER: [&str; 12] = [
    "AÀẢÃÁẠ", "ĂẰẲẴẮẶ", "ÂẦẨẪẤẬ", "EÈẺẼÉẸ", "ÊỀỂỄẾỆ", "IÌỈĨÍỊ", "OÒỎÕÓỌ", "ÔỒỔỖỐỘ", "ƠỜỞỠỚỢ",
    "UÙỦŨÚỤ", "ƯỪỬỮỨỰ", "YỲỶỸÝỴ",
];

const WHITESPACE_BASE: u32 = 0x0100;
const PUNCTUATION_BASE: u32 = 0x1000;
const DIGIT_BASE: u32 = 0x2000;
const LETTER_BASE: u32 = 0x3000;
const OTHER_BASE: u32 = 0x10000;

/// A Vietnamese letter split into base letter, tone and case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Letter {
    /// Lowercase base letter with its vowel modifier kept (`ấ` → `â`).
    pub base: char,
    /// Tone index, 0 (none) to 5 (dot below).
    pub tone: u8,
    pub upper: bool,
}

/// Decompose a precomposed Vietnamese letter.
///
/// Returns `None` for anything that is not a letter of the Vietnamese
/// alphabet (plain ASCII letters included, with tone 0).
pub fn decompose(c: char) -> Option<Letter> {
    for (rows, upper) in [(&TONED_LOWER, false), (&TONED_UPPER, true)] {
        for (i, row) in rows.iter().enumerate() {
            if let Some(tone) = row.chars().position(|t| t == c) {
                let base = TONED_LOWER[i].chars().next().unwrap_or(c);
                return Some(Letter {
                    base,
                    tone: tone as u8,
                    upper,
                });
            }
        }
    }
    match c {
        'đ' => Some(Letter { base: 'đ', tone: 0, upper: false }),
        'Đ' => Some(Letter { base: 'đ', tone: 0, upper: true }),
        c if c.is_ascii_alphabetic() => Some(Letter {
            base: c.to_ascii_lowercase(),
            tone: 0,
            upper: c.is_ascii_uppercase(),
        }),
        _ => None,
    }
}

/// Fold a Vietnamese letter to its plain ASCII base (`ờ` → `o`, `Đ` → `d`).
pub fn fold_to_ascii(c: char) -> Option<char> {
    let letter = decompose(c)?;
    Some(match letter.base {
        'ă' | 'â' => 'a',
        'đ' => 'd',
        'ê' => 'e',
        'ô' | 'ơ' => 'o',
        'ư' => 'u',
        other => other,
    })
}

/// One collation element per visible character.
#[derive(Debug, Clone, Copy)]
struct Element {
    base: Option<char>,
    primary: u32,
    secondary: u8,
    tertiary: u8,
}

impl Element {
    fn from_char(c: char) -> Self {
        if let Some(letter) = decompose(c) {
            return Self::letter(letter.base, letter.tone, letter.upper);
        }
        let (primary, upper) = if c.is_whitespace() {
            (WHITESPACE_BASE + c as u32 % 0x0F00, false)
        } else if let Some(d) = c.to_digit(10) {
            (DIGIT_BASE + d, false)
        } else if c.is_alphabetic() {
            let lower = c.to_lowercase().next().unwrap_or(c);
            (OTHER_BASE + lower as u32, lower != c)
        } else {
            (PUNCTUATION_BASE + c as u32 % 0x1000, false)
        };
        Self {
            base: None,
            primary,
            secondary: 0,
            tertiary: u8::from(upper),
        }
    }

    fn letter(base: char, tone: u8, upper: bool) -> Self {
        let rank = ALPHABET.iter().position(|&a| a == base).unwrap_or(0) as u32;
        Self {
            base: Some(base),
            primary: LETTER_BASE + rank,
            secondary: tone,
            tertiary: u8::from(upper),
        }
    }

    /// Apply a combining mark that followed this element's character.
    fn combine(&mut self, mark: char) {
        let upper = self.tertiary == 1;
        if let Some(tone) = tone_of_mark(mark) {
            self.secondary = tone;
            return;
        }
        let modified = match (self.base, mark) {
            (Some('a'), '\u{0306}') => Some('ă'),
            (Some('a'), '\u{0302}') => Some('â'),
            (Some('e'), '\u{0302}') => Some('ê'),
            (Some('o'), '\u{0302}') => Some('ô'),
            (Some('o'), '\u{031B}') => Some('ơ'),
            (Some('u'), '\u{031B}') => Some('ư'),
            _ => None,
        };
        match modified {
            Some(base) => *self = Self::letter(base, self.secondary, upper),
            // Marks foreign to Vietnamese still distinguish at the accent level.
            None if self.secondary == 0 => {
                self.secondary = 6 + (mark as u32).saturating_sub(0x0300).min(0xF0) as u8;
            }
            None => {}
        }
    }
}

fn tone_of_mark(mark: char) -> Option<u8> {
    match mark {
        '\u{0300}' => Some(1),
        '\u{0309}' => Some(2),
        '\u{0303}' => Some(3),
        '\u{0301}' => Some(4),
        '\u{0323}' => Some(5),
        _ => None,
    }
}

fn is_combining_mark(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036F}')
}

/// Sort key for a string under Vietnamese collation.
///
/// The derived ordering compares the primary weights of the whole string
/// first, then secondary, then tertiary, which is exactly the multi-level
/// comparison.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey {
    primary: Vec<u32>,
    secondary: Vec<u8>,
    tertiary: Vec<u8>,
}

impl CollationKey {
    pub fn new(s: &str) -> Self {
        let mut elements: Vec<Element> = Vec::with_capacity(s.len());
        for c in s.chars() {
            if is_combining_mark(c) {
                if let Some(last) = elements.last_mut() {
                    last.combine(c);
                }
                continue;
            }
            elements.push(Element::from_char(c));
        }
        Self {
            primary: elements.iter().map(|e| e.primary).collect(),
            secondary: elements.iter().map(|e| e.secondary).collect(),
            tertiary: elements.iter().map(|e| e.tertiary).collect(),
        }
    }
}

/// Compare two strings under Vietnamese collation.
pub fn compare(a: &str, b: &str) -> Ordering {
    CollationKey::new(a).cmp(&CollationKey::new(b))
}
