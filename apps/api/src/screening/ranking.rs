//! Ranking: orders scored candidates and buckets them for the hiring manager.
//!
//! Pure and synchronous. Ranks are dense ordinals: candidates with equal scores
//! receive consecutive distinct ranks in upload order, never a shared rank.

use crate::screening::models::{Category, RankedCandidate, ScoreVerdict};

/// Lowest score that lands in the interview list.
pub const INTERVIEW_THRESHOLD: u8 = 80;
/// Lowest score that lands in the backup list.
pub const BACKUP_THRESHOLD: u8 = 60;

/// Maps a score to its screening bucket. Thresholds are fixed.
pub fn categorize(score: u8) -> Category {
    if score >= INTERVIEW_THRESHOLD {
        Category::Interview
    } else if score >= BACKUP_THRESHOLD {
        Category::Backup
    } else {
        Category::Eliminate
    }
}

/// Ranks verdicts given in upload order.
///
/// The sort is stable, so ties keep upload order and the first element is the top
/// candidate. `upload_index` on each output points back into the input slice.
pub fn rank_candidates(verdicts: &[ScoreVerdict]) -> Vec<RankedCandidate> {
    let mut order: Vec<usize> = (0..verdicts.len()).collect();
    order.sort_by(|&a, &b| verdicts[b].score.cmp(&verdicts[a].score));

    order
        .into_iter()
        .enumerate()
        .map(|(position, upload_index)| {
            let verdict = &verdicts[upload_index];
            RankedCandidate {
                candidate_name: verdict.candidate_name.clone(),
                file_name: verdict.file_name.clone(),
                score: verdict.score,
                reasoning: verdict.reasoning.clone(),
                category: categorize(verdict.score),
                rank: position as u32 + 1,
                upload_index,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(name: &str, score: u8) -> ScoreVerdict {
        ScoreVerdict {
            candidate_name: name.to_string(),
            file_name: format!("{}.pdf", name.to_lowercase()),
            score,
            reasoning: format!("{name} reasoning"),
        }
    }

    #[test]
    fn test_category_thresholds() {
        assert_eq!(categorize(100), Category::Interview);
        assert_eq!(categorize(80), Category::Interview);
        assert_eq!(categorize(79), Category::Backup);
        assert_eq!(categorize(60), Category::Backup);
        assert_eq!(categorize(59), Category::Eliminate);
        assert_eq!(categorize(0), Category::Eliminate);
    }

    #[test]
    fn test_three_candidate_scenario() {
        let ranked = rank_candidates(&[
            verdict("Alice", 92),
            verdict("Bob", 65),
            verdict("Carol", 40),
        ]);

        let summary: Vec<(&str, u32, Category)> = ranked
            .iter()
            .map(|c| (c.candidate_name.as_str(), c.rank, c.category))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Alice", 1, Category::Interview),
                ("Bob", 2, Category::Backup),
                ("Carol", 3, Category::Eliminate),
            ]
        );
    }

    #[test]
    fn test_sorts_descending_and_tracks_upload_index() {
        let ranked = rank_candidates(&[verdict("Low", 10), verdict("High", 95), verdict("Mid", 70)]);

        assert_eq!(ranked[0].candidate_name, "High");
        assert_eq!(ranked[0].upload_index, 1);
        assert_eq!(ranked[1].candidate_name, "Mid");
        assert_eq!(ranked[1].upload_index, 2);
        assert_eq!(ranked[2].candidate_name, "Low");
        assert_eq!(ranked[2].upload_index, 0);
    }

    #[test]
    fn test_ties_keep_upload_order_with_distinct_ranks() {
        let ranked = rank_candidates(&[
            verdict("First", 75),
            verdict("Top", 90),
            verdict("Second", 75),
            verdict("Third", 75),
        ]);

        let names: Vec<&str> = ranked.iter().map(|c| c.candidate_name.as_str()).collect();
        assert_eq!(names, vec!["Top", "First", "Second", "Third"]);
        let ranks: Vec<u32> = ranked.iter().map(|c| c.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_ranks_are_exactly_one_to_n() {
        let verdicts: Vec<ScoreVerdict> = [50, 50, 100, 0, 81]
            .iter()
            .enumerate()
            .map(|(i, s)| verdict(&format!("C{i}"), *s))
            .collect();

        let mut ranks: Vec<u32> = rank_candidates(&verdicts).iter().map(|c| c.rank).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let verdicts = vec![verdict("A", 60), verdict("B", 60), verdict("C", 61)];
        assert_eq!(rank_candidates(&verdicts), rank_candidates(&verdicts));
    }

    #[test]
    fn test_reranking_stripped_output_is_idempotent() {
        let verdicts = vec![
            verdict("A", 42),
            verdict("B", 88),
            verdict("C", 42),
            verdict("D", 67),
        ];
        let first = rank_candidates(&verdicts);

        let stripped: Vec<ScoreVerdict> = first.iter().map(RankedCandidate::to_verdict).collect();
        let second = rank_candidates(&stripped);

        let key = |c: &RankedCandidate| (c.file_name.clone(), c.rank, c.category);
        assert_eq!(
            first.iter().map(key).collect::<Vec<_>>(),
            second.iter().map(key).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_empty_input_yields_empty_ranking() {
        assert!(rank_candidates(&[]).is_empty());
    }
}
