//! Frequency ranking of a search vector against a query
//!
//! For each query lexeme with positions `p_0..p_n` (in offset order):
//!
//! ```text
//! res_j = Σ w(p_j) / (j + 1)²
//! term  = (w_max + res_j - w_max / (j_max + 1)²) / ζ(2)
//! rank  = Σ term / number of query lexemes
//! ```
//!
//! where `w(p)` is the weight-value of the position's bucket and `w_max`
//! the largest of them. Lexemes absent from the vector contribute 0.

use crate::query::TextQuery;
use crate::vector::SearchVector;
use crate::weight::WeightValues;

/// ζ(2) = π²/6, the limit of Σ 1/(j+1)²
const ZETA_2: f64 = 1.644_934_066_85;

/// Rank `vector` against `query`
pub fn rank(vector: &SearchVector, query: &TextQuery, weights: &WeightValues) -> f32 {
    let lexemes = query.lexemes();
    if lexemes.is_empty() {
        return 0.0;
    }

    let mut total = 0.0f64;
    for lexeme in &lexemes {
        let positions = vector.positions(lexeme);
        if positions.is_empty() {
            continue;
        }
        let mut res_j = 0.0f64;
        let mut w_max = -1.0f64;
        let mut j_max = 0usize;
        for (j, position) in positions.iter().enumerate() {
            let w = f64::from(weights.get(position.weight));
            let denom = ((j + 1) * (j + 1)) as f64;
            res_j += w / denom;
            if w > w_max {
                w_max = w;
                j_max = j;
            }
        }
        let denom_max = ((j_max + 1) * (j_max + 1)) as f64;
        total += (w_max + res_j - w_max / denom_max) / ZETA_2;
    }

    (total / lexemes.len() as f64) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weight::Weight;

    #[test]
    fn test_no_match_ranks_zero() {
        let v = SearchVector::from_lexemes(["cat"], Weight::A);
        let q = TextQuery::term(["dog"]);
        assert_eq!(rank(&v, &q, &WeightValues::default()), 0.0);
        assert_eq!(rank(&v, &TextQuery::Empty, &WeightValues::default()), 0.0);
    }

    #[test]
    fn test_single_occurrence() {
        // one occurrence at weight 1.0: (1 + 1 - 1) / ζ(2)
        let v = SearchVector::from_lexemes(["cat"], Weight::A);
        let q = TextQuery::term(["cat"]);
        let r = rank(&v, &q, &WeightValues::default());
        assert!((f64::from(r) - 1.0 / ZETA_2).abs() < 1e-6);
    }

    #[test]
    fn test_higher_bucket_ranks_higher() {
        let weights = WeightValues::default();
        let q = TextQuery::term(["cat"]);
        let title = SearchVector::from_lexemes(["cat"], Weight::A);
        let body = SearchVector::from_lexemes(["cat"], Weight::D);
        assert!(rank(&title, &q, &weights) > rank(&body, &q, &weights));
    }

    #[test]
    fn test_more_occurrences_rank_higher() {
        let weights = WeightValues::default();
        let q = TextQuery::term(["cat"]);
        let once = SearchVector::from_lexemes(["cat", "dog"], Weight::B);
        let twice = SearchVector::from_lexemes(["cat", "cat"], Weight::B);
        assert!(rank(&twice, &q, &weights) > rank(&once, &q, &weights));
    }

    #[test]
    fn test_partial_or_match_is_averaged() {
        let weights = WeightValues::default();
        let v = SearchVector::from_lexemes(["cat"], Weight::A);
        let one = rank(&v, &TextQuery::term(["cat"]), &weights);
        let half = rank(
            &v,
            &(TextQuery::term(["cat"]) | TextQuery::term(["dog"])),
            &weights,
        );
        assert!((half - one / 2.0).abs() < 1e-6);
    }
}
