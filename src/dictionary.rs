//! The fixed code table shared by packing and unpacking.
//!
//! A dictionary always starts from the 98 legal single characters, so any
//! legal text can be tokenized. Up to [`MAX_CUSTOM_WORDS`] more words come
//! from a word list with one `<length> <word>` pair per line:
//!
//! ```text
//! 3 the
//! 4 that
//! 2 an
//! ```
//!
//! Once everything is inserted the table is sorted, and a word's code is its
//! position in the sorted table. Packing and unpacking must therefore build
//! their dictionaries from the same word list.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use derivative::Derivative;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::bits::CODE_LIMIT;
use crate::error::{Error, Result};
use crate::word::{is_legal, legal_chars, Word, WORD_MAX};

/// Word list read when none is named.
pub const DEFAULT_WORD_FILE: &str = "words.txt";

/// Single characters present in every dictionary.
pub const BUILTIN_COUNT: usize = 98;

/// The whole code space.
pub const MAX_ENTRIES: usize = CODE_LIMIT;

/// Room left for a word list after the single characters.
pub const MAX_CUSTOM_WORDS: usize = MAX_ENTRIES - BUILTIN_COUNT;

/// Where a dictionary entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    Builtin,
    /// 1-based line of the word list
    Line(usize),
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Builtin => write!(f, "built-in character"),
            Origin::Line(line) => write!(f, "line {line}"),
        }
    }
}

/// A word and where it came from. Entries compare by word alone.
#[derive(Debug, Clone, Derivative, Serialize, Deserialize)]
#[derivative(PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entry {
    word: Word,

    #[derivative(PartialEq = "ignore")]
    #[derivative(PartialOrd = "ignore")]
    #[derivative(Ord = "ignore")]
    #[derivative(Hash = "ignore")]
    origin: Origin,
}

impl Entry {
    fn new(word: Word, origin: Origin) -> Self {
        Self { word, origin }
    }

    pub fn word(&self) -> &Word {
        &self.word
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Entry>", into = "Vec<Entry>")]
pub struct Dictionary {
    entries: Vec<Entry>,
}

impl Dictionary {
    /// A dictionary of the single characters only.
    pub fn builtin() -> Self {
        let mut entries = builtin_entries();
        entries.sort();
        Self { entries }
    }

    /// Build a dictionary from a word list.
    ///
    /// # Errors
    /// Any unreadable, malformed, oversized, illegal or duplicated word, and
    /// more than [`MAX_CUSTOM_WORDS`] words. Nothing is truncated.
    pub fn from_reader<R: BufRead>(source: R) -> Result<Self> {
        let mut entries = builtin_entries();
        let mut custom = 0;

        for (index, line) in source.split(b'\n').enumerate() {
            let line = line?;
            let number = index + 1;
            let Some(word) = parse_line(&line, number)? else {
                continue;
            };

            custom += 1;
            if custom > MAX_CUSTOM_WORDS {
                return Err(Error::CapacityExceeded {
                    max: MAX_CUSTOM_WORDS,
                });
            }
            entries.push(Entry::new(word, Origin::Line(number)));
        }

        let dictionary = Self::from_unsorted(entries)?;
        debug!(
            "built dictionary: {} words ({} from word list)",
            dictionary.len(),
            custom
        );
        Ok(dictionary)
    }

    /// Build a dictionary from a word list file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("reading word list {}", path.display());
        Self::from_reader(BufReader::new(file))
    }

    fn from_unsorted(mut entries: Vec<Entry>) -> Result<Self> {
        // Stable, so the first of two duplicates is the one inserted first
        entries.sort();

        if let Some(pair) = entries.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(Error::DuplicateWord {
                word: pair[1].word.to_string(),
                first: pair[0].origin,
                second: pair[1].origin,
            });
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The code of a word with exactly this content.
    pub fn code_of(&self, word: &[u8]) -> Option<u16> {
        self.entries
            .binary_search_by(|entry| entry.word.as_bytes().cmp(word))
            .ok()
            .map(|index| index as u16)
    }

    /// The word with this code, if there is one.
    pub fn word_of(&self, code: u16) -> Option<&Word> {
        self.entries.get(usize::from(code)).map(|entry| &entry.word)
    }

    /// Longest entry that `text` starts with, as its code and length.
    ///
    /// Only `None` for empty text or text starting with an illegal character;
    /// every legal character is an entry of its own.
    pub fn best_code(&self, text: &[u8]) -> Option<(u16, usize)> {
        (1..=text.len().min(WORD_MAX))
            .rev()
            .find_map(|len| self.code_of(&text[..len]).map(|code| (code, len)))
    }

    /// Entries in code order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &Entry)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(code, entry)| (code as u16, entry))
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TryFrom<Vec<Entry>> for Dictionary {
    type Error = Error;

    /// Accept a table that is already a valid dictionary, in code order.
    fn try_from(entries: Vec<Entry>) -> Result<Self> {
        if entries.len() > MAX_ENTRIES {
            return Err(Error::InvalidTable(format!(
                "{} entries do not fit in {} codes",
                entries.len(),
                MAX_ENTRIES
            )));
        }
        if let Some(entry) = entries.iter().find(|entry| entry.word.is_empty()) {
            return Err(Error::InvalidTable(format!(
                "empty word from {}",
                entry.origin
            )));
        }
        if let Some(pair) = entries.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(Error::InvalidTable(format!(
                "{:?} is not sorted before {:?}",
                pair[0].word, pair[1].word
            )));
        }

        let dictionary = Self { entries };
        if let Some(ch) = legal_chars().find(|&ch| dictionary.code_of(&[ch]).is_none()) {
            return Err(Error::InvalidTable(format!(
                "missing single character {:?}",
                char::from(ch)
            )));
        }
        Ok(dictionary)
    }
}

impl From<Dictionary> for Vec<Entry> {
    fn from(dictionary: Dictionary) -> Self {
        dictionary.entries
    }
}

fn builtin_entries() -> Vec<Entry> {
    let mut entries = Vec::with_capacity(MAX_ENTRIES);
    entries.extend(legal_chars().map(|ch| Entry::new(Word::from_legal(&[ch]), Origin::Builtin)));
    entries
}

/// Parse one word-list line. Blank lines yield `None`.
fn parse_line(line: &[u8], number: usize) -> Result<Option<Word>> {
    let malformed = |reason: String| Error::MalformedLine {
        line: number,
        reason,
    };

    let mut tokens = line
        .split(|b| b.is_ascii_whitespace())
        .filter(|token| !token.is_empty());

    let Some(length) = tokens.next() else {
        return Ok(None);
    };
    let length: usize = std::str::from_utf8(length)
        .ok()
        .and_then(|length| length.parse().ok())
        .ok_or_else(|| {
            malformed(format!(
                "expected a word length, found \"{}\"",
                length.escape_ascii()
            ))
        })?;

    let token = tokens
        .next()
        .ok_or_else(|| malformed("missing word after length".to_string()))?;
    if tokens.next().is_some() {
        return Err(malformed("unexpected text after word".to_string()));
    }

    if length == 0 || length > WORD_MAX {
        return Err(Error::WordLength {
            line: number,
            length,
            max: WORD_MAX,
        });
    }
    // A short word keeps its own length; a long one is cut to the declared one
    let text = &token[..token.len().min(length)];
    if let Some(&byte) = text.iter().find(|&&b| !is_legal(b)) {
        return Err(Error::IllegalWordChar { line: number, byte });
    }
    if token.len() != length {
        warn!(
            "word list line {number}: declared length {length}, word has {} characters, keeping {}",
            token.len(),
            text.len()
        );
    }

    Ok(Some(Word::from_legal(text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(list: &str) -> Result<Dictionary> {
        Dictionary::from_reader(list.as_bytes())
    }

    #[test]
    fn builtin_has_every_legal_character() {
        let dict = Dictionary::builtin();
        assert_eq!(dict.len(), BUILTIN_COUNT);
        for ch in legal_chars() {
            let code = dict.code_of(&[ch]).unwrap();
            assert_eq!(dict.word_of(code).unwrap().as_bytes(), &[ch]);
        }
    }

    #[test]
    fn codes_follow_sort_order() {
        let dict = Dictionary::builtin();
        assert_eq!(dict.code_of(b"\t"), Some(0));
        assert_eq!(dict.code_of(b"\n"), Some(1));
        assert_eq!(dict.code_of(b"\r"), Some(2));
        assert_eq!(dict.code_of(b" "), Some(3));
        assert_eq!(dict.code_of(b"~"), Some(97));
    }

    #[test]
    fn word_list_words_are_sorted_in() {
        let dict = build("3 the\n2 an\n").unwrap();
        assert_eq!(dict.len(), BUILTIN_COUNT + 2);

        let a = dict.code_of(b"a").unwrap();
        let an = dict.code_of(b"an").unwrap();
        let b = dict.code_of(b"b").unwrap();
        assert_eq!(an, a + 1);
        assert_eq!(b, an + 1);

        assert_eq!(dict.word_of(an).unwrap().as_bytes(), b"an");
        assert!(dict.iter().all(|(code, entry)| dict.code_of(entry.word().as_bytes()) == Some(code)));
    }

    #[test]
    fn entries_remember_their_origin() {
        let dict = build("\n3 the\n\n2 an\n").unwrap();
        let an = dict.code_of(b"an").unwrap();
        let (_, entry) = dict.iter().nth(usize::from(an)).unwrap();
        assert_eq!(entry.origin(), Origin::Line(4));

        let x = dict.code_of(b"x").unwrap();
        let (_, entry) = dict.iter().nth(usize::from(x)).unwrap();
        assert_eq!(entry.origin(), Origin::Builtin);
    }

    #[test]
    fn code_of_is_exact() {
        let dict = build("5 hello\n").unwrap();
        assert!(dict.code_of(b"hello").is_some());
        assert_eq!(dict.code_of(b"hell"), None);
        assert_eq!(dict.code_of(b"hellos"), None);
        assert_eq!(dict.code_of(b""), None);
    }

    #[test]
    fn word_of_outside_table() {
        let dict = Dictionary::builtin();
        assert!(dict.word_of(97).is_some());
        assert!(dict.word_of(98).is_none());
        assert!(dict.word_of(511).is_none());
    }

    #[test]
    fn best_code_prefers_longest_match() {
        let dict = build("2 an\n3 and\n").unwrap();

        let (code, len) = dict.best_code(b"an").unwrap();
        assert_eq!((dict.word_of(code).unwrap().as_bytes(), len), (&b"an"[..], 2));

        let (code, len) = dict.best_code(b"andy").unwrap();
        assert_eq!((dict.word_of(code).unwrap().as_bytes(), len), (&b"and"[..], 3));

        let (code, len) = dict.best_code(b"ax").unwrap();
        assert_eq!((dict.word_of(code).unwrap().as_bytes(), len), (&b"a"[..], 1));
    }

    #[test]
    fn best_code_probes_at_most_word_max() {
        let long = "abcdefghijklmnopqrst";
        assert_eq!(long.len(), WORD_MAX);
        let dict = build(&format!("{} {long}\n", WORD_MAX)).unwrap();

        let text = format!("{long}uvwxyz");
        let (code, len) = dict.best_code(text.as_bytes()).unwrap();
        assert_eq!(len, WORD_MAX);
        assert_eq!(dict.word_of(code).unwrap().to_string(), long);
    }

    #[test]
    fn best_code_always_matches_legal_text() {
        let dict = build("3 the\n").unwrap();
        for ch in legal_chars() {
            assert_eq!(dict.best_code(&[ch]).map(|(_, len)| len), Some(1));
        }
        assert_eq!(dict.best_code(b""), None);
        assert_eq!(dict.best_code(b"\x00"), None);
    }

    #[test]
    fn carriage_return_line_endings() {
        let dict = build("3 the\r\n2 an\r\n").unwrap();
        assert!(dict.code_of(b"the").is_some());
        assert!(dict.code_of(b"an").is_some());
    }

    #[test]
    fn longer_word_is_cut_to_declared_length() {
        let dict = build("3 there\n").unwrap();
        assert!(dict.code_of(b"the").is_some());
        assert_eq!(dict.code_of(b"there"), None);
    }

    #[test]
    fn shorter_word_keeps_its_own_length() {
        let dict = build("5 the\n").unwrap();
        assert_eq!(dict.len(), BUILTIN_COUNT + 1);
        let code = dict.code_of(b"the").unwrap();
        assert_eq!(dict.word_of(code).unwrap().as_bytes(), b"the");
        assert_eq!(dict.iter().nth(usize::from(code)).unwrap().1.origin(), Origin::Line(1));
    }

    #[test]
    fn short_word_is_still_checked() {
        assert!(matches!(
            build("9 ab\x7f\n"),
            Err(Error::IllegalWordChar { line: 1, byte: 0x7F })
        ));
    }

    #[test]
    fn malformed_lines() {
        for list in ["the 3\n", "3\n", "3 the extra\n", "-1 a\n", "x1 ab\n"] {
            assert!(
                matches!(build(list), Err(Error::MalformedLine { line: 1, .. })),
                "{list:?}"
            );
        }
    }

    #[test]
    fn word_length_limits() {
        let max = "x".repeat(WORD_MAX);
        assert!(build(&format!("{WORD_MAX} {max}\n")).is_ok());

        let over = "x".repeat(WORD_MAX + 1);
        assert!(matches!(
            build(&format!("{} {over}\n", WORD_MAX + 1)),
            Err(Error::WordLength { line: 1, length: 21, max: WORD_MAX })
        ));
        assert!(matches!(
            build("0 a\n"),
            Err(Error::WordLength { length: 0, .. })
        ));
    }

    #[test]
    fn illegal_word_character_is_reported() {
        let list = b"3 the\n3 ca\x80\n";
        assert!(matches!(
            Dictionary::from_reader(&list[..]),
            Err(Error::IllegalWordChar { line: 2, byte: 0x80 })
        ));
    }

    #[test]
    fn capacity_ceiling() {
        // Three-letter words from a lowercase alphabet, all distinct
        let words: Vec<String> = (0..=MAX_CUSTOM_WORDS)
            .map(|i| {
                let letter = |n: usize| char::from(b'a' + (n % 26) as u8);
                format!("3 {}{}{}\n", letter(i / 676), letter(i / 26), letter(i))
            })
            .collect();

        let full = words[..MAX_CUSTOM_WORDS].concat();
        let dict = build(&full).unwrap();
        assert_eq!(dict.len(), MAX_ENTRIES);
        assert_eq!(dict.iter().last().map(|(code, _)| code), Some(511));

        let over = words.concat();
        assert!(matches!(
            build(&over),
            Err(Error::CapacityExceeded { max: 414 })
        ));
    }

    #[test]
    fn duplicate_words_are_rejected() {
        match build("3 the\n2 an\n3 the\n") {
            Err(Error::DuplicateWord {
                word,
                first,
                second,
            }) => {
                assert_eq!(word, "the");
                assert_eq!(first, Origin::Line(1));
                assert_eq!(second, Origin::Line(3));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn word_list_cannot_repeat_a_single_character() {
        assert!(matches!(
            build("1 q\n"),
            Err(Error::DuplicateWord {
                first: Origin::Builtin,
                second: Origin::Line(1),
                ..
            })
        ));
    }

    #[test]
    fn snapshot_round_trip() {
        let dict = build("3 the\n2 an\n4 that\n").unwrap();
        let bytes = rmp_serde::to_vec(&dict).unwrap();
        let back: Dictionary = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(back, dict);
        assert_eq!(back.code_of(b"that"), dict.code_of(b"that"));
    }

    #[test]
    fn snapshot_must_be_sorted_and_complete() {
        let mut entries: Vec<Entry> = build("2 an\n").unwrap().into();

        let mut unsorted = entries.clone();
        unsorted.swap(10, 11);
        assert!(matches!(
            Dictionary::try_from(unsorted),
            Err(Error::InvalidTable(_))
        ));

        entries.retain(|entry| entry.word().as_bytes() != b"z");
        assert!(matches!(
            Dictionary::try_from(entries),
            Err(Error::InvalidTable(_))
        ));
    }

    #[test]
    fn opening_missing_word_list() {
        let err = Dictionary::from_path("/nonexistent/words.txt").unwrap_err();
        assert!(matches!(err, Error::Open { .. }));
        assert!(err.to_string().contains("/nonexistent/words.txt"));
    }
}
