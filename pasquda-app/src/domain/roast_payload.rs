use super::Grade;
use serde::{Deserialize, Serialize};

/// Structured roast emitted by the model. Shape is validated (types and
/// bullet count); score range is not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoastPayload {
    pub score: i32,
    pub grade: Grade,
    pub roast_bullets: Vec<String>,
    pub summary: String,
    pub backhanded_compliment: String,
}

impl RoastPayload {
    pub fn has_valid_shape(&self) -> bool {
        self.roast_bullets.len() >= 3
    }

    /// Fixed payload used when the model irrecoverably fails to produce
    /// valid JSON. A boring roast beats no roast.
    pub fn emergency() -> Self {
        let score = 50;
        Self {
            score,
            grade: Grade::from_score(score),
            roast_bullets: vec![
                "Your website confused our AI so much it needed a moment.".to_string(),
                "We tried to roast it, but it roasted our servers first.".to_string(),
                "The design is... certainly a choice. A bold, confusing choice.".to_string(),
            ],
            summary: "Your website broke our AI. That's either impressive or terrifying."
                .to_string(),
            backhanded_compliment:
                "At least your website is memorable — for all the wrong reasons.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emergency_payload_is_well_formed() {
        let payload = RoastPayload::emergency();
        assert!(payload.has_valid_shape());
        assert_eq!(payload.grade, Grade::from_score(payload.score));
    }

    #[test]
    fn two_bullets_is_invalid_shape() {
        let payload = RoastPayload {
            score: 40,
            grade: Grade::B,
            roast_bullets: vec!["one".into(), "two".into()],
            summary: "s".into(),
            backhanded_compliment: "c".into(),
        };
        assert!(!payload.has_valid_shape());
    }
}
