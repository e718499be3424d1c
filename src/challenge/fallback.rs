use tracing::{error, warn};

use crate::challenge::model::{ChallengeList, RawWordChallenge, WordChallenge};

const FALLBACK_WORDS: &str = include_str!("../../assets/fallback_words.json");

/// Parse the bundled word list. Entries that fail validation are skipped;
/// if nothing survives, a single built-in word is used instead.
pub fn load() -> ChallengeList {
    let raw: Vec<RawWordChallenge> = match serde_json::from_str(FALLBACK_WORDS) {
        Ok(raw) => raw,
        Err(err) => {
            error!(%err, "bundled word list is not valid JSON");
            Vec::new()
        }
    };

    let words: Vec<WordChallenge> = raw
        .into_iter()
        .filter_map(|entry| {
            WordChallenge::try_from(entry)
                .inspect_err(|err| warn!(%err, "skipping bundled word"))
                .ok()
        })
        .collect();

    ChallengeList::new(words).unwrap_or_else(|| {
        error!("bundled word list is empty, using built-in word");
        ChallengeList::single(WordChallenge::builtin())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_bundled_entry_is_well_formed() {
        let raw: Vec<RawWordChallenge> = serde_json::from_str(FALLBACK_WORDS).unwrap();
        let count = raw.len();
        for entry in raw {
            let word = entry.word.clone();
            WordChallenge::try_from(entry)
                .unwrap_or_else(|e| panic!("bundled word {word} is malformed: {e}"));
        }
        assert_eq!(load().len(), count);
    }

    #[test]
    fn first_bundled_word_is_xiao_mao() {
        let list = load();
        let first = &list[0];
        assert_eq!(first.word(), "小貓");
        assert_eq!(first.key_sequence().collect::<String>(), "vul3al ");
        assert_eq!(first.hint(), Some("喜歡抓老鼠"));
    }

    #[test]
    fn builtin_word_matches_bundled_first_word() {
        let builtin = WordChallenge::builtin();
        let bundled = &load()[0];
        assert_eq!(builtin.word(), bundled.word());
        assert_eq!(builtin.characters(), bundled.characters());
    }
}
