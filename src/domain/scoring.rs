use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Per-psychotype yes/no counters for one test attempt.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct TallyBucket {
    pub yes: u32,
    pub no: u32,
}

/// Tally keyed by psychotype name. BTreeMap keeps the serialized
/// form stable between runs of the same attempt.
pub type PsychotypeTally = BTreeMap<String, TallyBucket>;

/// Folds a batch of (question_id, user_answer) pairs into per-psychotype
/// yes/no counts.
///
/// Answers whose question is not in `question_psychotype`, or whose
/// psychotype id has no entry in `psychotype_names`, are skipped without
/// error. An empty batch yields an empty tally.
pub fn tally(
    answers: &[(Uuid, bool)],
    question_psychotype: &HashMap<Uuid, Uuid>,
    psychotype_names: &HashMap<Uuid, String>,
) -> PsychotypeTally {
    let mut counts = PsychotypeTally::new();

    for (question_id, answer) in answers {
        let Some(psychotype_id) = question_psychotype.get(question_id) else {
            continue;
        };
        let Some(name) = psychotype_names.get(psychotype_id) else {
            continue;
        };

        let bucket = counts.entry(name.clone()).or_default();
        if *answer {
            bucket.yes += 1;
        } else {
            bucket.no += 1;
        }
    }

    counts
}
