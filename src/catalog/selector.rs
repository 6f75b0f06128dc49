use crate::session::AttemptResult;
use itertools::Itertools;
use rand::seq::SliceRandom;

/// Remediation rounds are capped at this many words.
pub const REMEDIATION_TARGET: usize = 10;

/// Uniformly shuffled game list: the first `min(word_count, pool.len())`
/// elements of a random permutation of the pool. A request larger than the
/// pool yields every pool word exactly once; the game just runs shorter.
pub fn select_game_words(pool: &[String], word_count: usize) -> Vec<String> {
    let mut words = pool.to_vec();
    words.shuffle(&mut rand::thread_rng());
    words.truncate(word_count);
    words
}

/// Quick-test list biased toward previously missed or multi-attempt words.
///
/// Problem words are the unique words (first-occurrence order) that failed
/// or took more than one attempt. At most `target_count` of them are kept;
/// a short problem list is topped up with random pool words not already in
/// it. The combined list is shuffled so problems are not front-loaded.
pub fn select_remediation_words(
    previous_results: &[AttemptResult],
    pool: &[String],
    target_count: usize,
) -> Vec<String> {
    let mut rng = rand::thread_rng();

    let problems: Vec<String> = previous_results
        .iter()
        .filter(|r| !r.success || r.attempts > 1)
        .map(|r| r.word.clone())
        .unique()
        .collect();

    let mut words: Vec<String> = if problems.len() >= target_count {
        problems
            .choose_multiple(&mut rng, target_count)
            .cloned()
            .collect()
    } else {
        let fillers: Vec<&String> = pool.iter().filter(|w| !problems.contains(w)).collect();
        let needed = target_count - problems.len();

        let mut combined = problems;
        combined.extend(
            fillers
                .choose_multiple(&mut rng, needed)
                .map(|w| (*w).clone()),
        );
        combined
    };

    words.shuffle(&mut rng);
    words
}
