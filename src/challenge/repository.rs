use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use tracing::{info, warn};

use crate::challenge::fallback;
use crate::challenge::model::{ChallengeList, WordChallenge};
use crate::challenge::supplier::WordSupplier;

/// Hands out word lists for a topic. Never fails: any supplier problem is
/// logged and answered with the bundled list.
pub struct WordRepository {
    supplier: Box<dyn WordSupplier>,
    word_count: usize,
    shuffle_fallback: bool,
}

impl WordRepository {
    pub fn new(supplier: Box<dyn WordSupplier>, word_count: usize, shuffle_fallback: bool) -> Self {
        Self {
            supplier,
            word_count: word_count.max(1),
            shuffle_fallback,
        }
    }

    pub fn supplier_name(&self) -> &str {
        self.supplier.name()
    }

    pub fn load(&self, topic: &str) -> ChallengeList {
        let mut rng = SmallRng::from_entropy();
        self.load_with_rng(topic, &mut rng)
    }

    pub fn load_with_rng<R: Rng + ?Sized>(&self, topic: &str, rng: &mut R) -> ChallengeList {
        match self.supplier.fetch(topic, self.word_count) {
            Ok(raw) => {
                let offered = raw.len();
                let words: Vec<WordChallenge> = raw
                    .into_iter()
                    .filter_map(|entry| {
                        WordChallenge::try_from(entry)
                            .inspect_err(|err| warn!(%err, "dropping supplied word"))
                            .ok()
                    })
                    .collect();
                if let Some(list) = ChallengeList::new(words) {
                    info!(
                        supplier = self.supplier.name(),
                        topic,
                        offered,
                        accepted = list.len(),
                        "loaded supplied words"
                    );
                    return list;
                }
                warn!(
                    supplier = self.supplier.name(),
                    topic, offered, "no supplied word passed validation, using bundled words"
                );
            }
            Err(err) => {
                warn!(
                    supplier = self.supplier.name(),
                    topic,
                    %err,
                    "word supply failed, using bundled words"
                );
            }
        }
        self.fallback(rng)
    }

    fn fallback<R: Rng + ?Sized>(&self, rng: &mut R) -> ChallengeList {
        let list = fallback::load();
        if !self.shuffle_fallback {
            return list;
        }
        let mut words = list.into_inner();
        words.shuffle(rng);
        ChallengeList::new(words).unwrap_or_else(fallback::load)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::challenge::model::{RawWordChallenge, raw_char};
    use crate::challenge::supplier::{OfflineSupplier, SupplyError};

    struct FixedSupplier(Vec<RawWordChallenge>);

    impl WordSupplier for FixedSupplier {
        fn name(&self) -> &str {
            "fixed"
        }

        fn fetch(&self, _topic: &str, _count: usize) -> Result<Vec<RawWordChallenge>, SupplyError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSupplier;

    impl WordSupplier for FailingSupplier {
        fn name(&self) -> &str {
            "failing"
        }

        fn fetch(&self, _topic: &str, _count: usize) -> Result<Vec<RawWordChallenge>, SupplyError> {
            Err(SupplyError::Status(503))
        }
    }

    fn words(list: &ChallengeList) -> Vec<String> {
        list.iter().map(|w| w.word().to_string()).collect()
    }

    fn sorted(mut v: Vec<String>) -> Vec<String> {
        v.sort();
        v
    }

    fn cat() -> RawWordChallenge {
        RawWordChallenge {
            word: "貓".to_string(),
            hint: None,
            characters: vec![raw_char("貓", &["ㄇ", "ㄠ"], &["a", "l", " "], " ")],
        }
    }

    #[test]
    fn failure_falls_back_to_bundled_set() {
        let bundled = sorted(words(&fallback::load()));
        for supplier in [
            Box::new(FailingSupplier) as Box<dyn WordSupplier>,
            Box::new(OfflineSupplier) as Box<dyn WordSupplier>,
        ] {
            let repo = WordRepository::new(supplier, 5, true);
            let loaded = repo.load("任何主題");
            assert!(!loaded.is_empty());
            assert_eq!(sorted(words(&loaded)), bundled);
        }
    }

    #[test]
    fn empty_supply_falls_back() {
        let repo = WordRepository::new(Box::new(FixedSupplier(Vec::new())), 5, false);
        assert_eq!(words(&repo.load("水果")), words(&fallback::load()));
    }

    #[test]
    fn unshuffled_fallback_keeps_bundled_order() {
        let repo = WordRepository::new(Box::new(OfflineSupplier), 5, false);
        assert_eq!(repo.load("水果")[0].word(), "小貓");
    }

    #[test]
    fn supplied_words_are_used_in_order() {
        let mut second = cat();
        second.word = "貓貓".to_string();
        second.characters.push(second.characters[0].clone());
        let repo = WordRepository::new(Box::new(FixedSupplier(vec![cat(), second])), 5, true);
        assert_eq!(words(&repo.load("動物")), vec!["貓", "貓貓"]);
    }

    #[test]
    fn malformed_entries_are_dropped_individually() {
        let mut broken = cat();
        broken.word = "壞".to_string();
        broken.characters[0].keys = vec!["a".to_string(), "l".to_string()];
        let repo = WordRepository::new(Box::new(FixedSupplier(vec![broken, cat()])), 5, true);
        assert_eq!(words(&repo.load("動物")), vec!["貓"]);
    }

    #[test]
    fn all_malformed_entries_fall_back() {
        let mut broken = cat();
        broken.characters[0].keys.clear();
        let repo = WordRepository::new(Box::new(FixedSupplier(vec![broken])), 5, false);
        assert_eq!(words(&repo.load("動物")), words(&fallback::load()));
    }

    #[test]
    fn fallback_shuffle_is_roughly_uniform() {
        let repo = WordRepository::new(Box::new(OfflineSupplier), 5, true);
        let mut rng = SmallRng::seed_from_u64(7);
        let bundled_len = fallback::load().len();
        let runs = 4000;

        let mut first_counts: HashMap<String, usize> = HashMap::new();
        for _ in 0..runs {
            let list = repo.load_with_rng("水果", &mut rng);
            assert_eq!(list.len(), bundled_len);
            *first_counts.entry(list[0].word().to_string()).or_default() += 1;
        }

        // Every word should lead about runs / n times; allow a generous band.
        let expected = runs / bundled_len;
        assert_eq!(first_counts.len(), bundled_len);
        for (word, count) in first_counts {
            assert!(
                count > expected / 2 && count < expected * 3 / 2,
                "{word} led {count} times, expected about {expected}"
            );
        }
    }
}
