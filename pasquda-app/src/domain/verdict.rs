use serde::{Deserialize, Serialize};

/// Winner token as emitted by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    A,
    B,
    Tie,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleVerdict {
    pub winner: Winner,
    pub verdict: String,
}

/// The slice of a completed roast the verdict generator needs.
#[derive(Debug, Clone)]
pub struct RoastSnapshot {
    pub domain: String,
    pub score: i32,
    pub grade: String,
    pub summary: String,
}

/// Ties within this score distance are called a draw by the fallback rule.
const TIE_MARGIN: i32 = 5;

impl BattleVerdict {
    /// Deterministic verdict used when the model path is unavailable or
    /// unparseable. Lower score wins (lower = less roastable).
    pub fn fallback(a: &RoastSnapshot, b: &RoastSnapshot) -> Self {
        let diff = a.score - b.score;
        if diff.abs() <= TIE_MARGIN {
            return Self {
                winner: Winner::Tie,
                verdict: format!(
                    "Too close to call. {} and {} are equally roastable — nobody wins, everybody loses.",
                    a.domain, b.domain
                ),
            };
        }

        let (winner, winning, losing) = if a.score < b.score {
            (Winner::A, a, b)
        } else {
            (Winner::B, b, a)
        };

        Self {
            winner,
            verdict: format!(
                "{} takes it with a {} to the {}'s {}. Being the less ugly one still counts as winning.",
                winning.domain, winning.score, losing.domain, losing.score
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(domain: &str, score: i32) -> RoastSnapshot {
        RoastSnapshot {
            domain: domain.to_string(),
            score,
            grade: "C".to_string(),
            summary: String::new(),
        }
    }

    #[test]
    fn lower_score_wins() {
        let verdict = BattleVerdict::fallback(&snapshot("a.com", 30), &snapshot("b.com", 80));
        assert_eq!(verdict.winner, Winner::A);
        assert!(!verdict.verdict.is_empty());
    }

    #[test]
    fn close_scores_tie() {
        let verdict = BattleVerdict::fallback(&snapshot("a.com", 50), &snapshot("b.com", 53));
        assert_eq!(verdict.winner, Winner::Tie);
    }

    #[test]
    fn tie_margin_is_inclusive() {
        let verdict = BattleVerdict::fallback(&snapshot("a.com", 40), &snapshot("b.com", 45));
        assert_eq!(verdict.winner, Winner::Tie);
        let verdict = BattleVerdict::fallback(&snapshot("a.com", 40), &snapshot("b.com", 46));
        assert_eq!(verdict.winner, Winner::A);
    }

    #[test]
    fn winner_token_parses_lowercase() {
        assert_eq!(
            serde_json::from_str::<Winner>("\"tie\"").unwrap(),
            Winner::Tie
        );
        assert_eq!(serde_json::from_str::<Winner>("\"a\"").unwrap(), Winner::A);
    }
}
