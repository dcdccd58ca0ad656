use crate::domain::{BattleVerdict, RoastPayload};
use serde::de::DeserializeOwned;

/// Extraction strategies applied in order against free-form model text.
/// Each candidate is shape-validated before acceptance; the first hit wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtractStrategy {
    /// The whole response is the JSON object.
    Direct,
    /// The object is wrapped in a fenced code block.
    FencedBlock,
    /// The object is buried in surrounding prose.
    BraceSpan,
}

const STRATEGIES: [ExtractStrategy; 3] = [
    ExtractStrategy::Direct,
    ExtractStrategy::FencedBlock,
    ExtractStrategy::BraceSpan,
];

fn extract(strategy: ExtractStrategy, text: &str) -> Option<String> {
    match strategy {
        ExtractStrategy::Direct => Some(text.trim().to_string()),
        ExtractStrategy::FencedBlock => {
            let re = regex_lite::Regex::new(r"(?s)```(?:json)?\s*(.*?)```").ok()?;
            re.captures(text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
        }
        ExtractStrategy::BraceSpan => {
            let re = regex_lite::Regex::new(r"(?s)\{.*\}").ok()?;
            re.find(text).map(|m| m.as_str().to_string())
        }
    }
}

fn parse_with_strategies<T, F>(text: &str, is_valid: F) -> Option<T>
where
    T: DeserializeOwned,
    F: Fn(&T) -> bool,
{
    for strategy in STRATEGIES {
        let Some(candidate) = extract(strategy, text) else {
            continue;
        };
        if let Ok(value) = serde_json::from_str::<T>(&candidate) {
            if is_valid(&value) {
                return Some(value);
            }
        }
    }
    None
}

/// Tolerant extraction of a roast payload from model output.
pub fn parse_roast_payload(text: &str) -> Option<RoastPayload> {
    parse_with_strategies(text, RoastPayload::has_valid_shape)
}

/// Tolerant extraction of a battle verdict from model output.
pub fn parse_battle_verdict(text: &str) -> Option<BattleVerdict> {
    parse_with_strategies(text, |verdict: &BattleVerdict| {
        !verdict.verdict.trim().is_empty()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Grade, Winner};

    const RAW: &str = r#"{
        "score": 72,
        "grade": "D",
        "roast_bullets": ["one", "two", "three"],
        "summary": "ouch",
        "backhanded_compliment": "brave"
    }"#;

    #[test]
    fn direct_parse() {
        let payload = parse_roast_payload(RAW).unwrap();
        assert_eq!(payload.score, 72);
        assert_eq!(payload.grade, Grade::D);
        assert_eq!(payload.roast_bullets.len(), 3);
    }

    #[test]
    fn fenced_block_yields_same_object_as_unwrapped() {
        let fenced = format!("Here you go:\n```json\n{RAW}\n```\nEnjoy!");
        // Direct parse of the fenced text fails; extraction recovers it.
        assert!(serde_json::from_str::<RoastPayload>(&fenced).is_err());
        assert_eq!(
            parse_roast_payload(&fenced).unwrap(),
            parse_roast_payload(RAW).unwrap()
        );
    }

    #[test]
    fn fence_without_language_tag() {
        let fenced = format!("```\n{RAW}\n```");
        assert!(parse_roast_payload(&fenced).is_some());
    }

    #[test]
    fn brace_span_in_prose() {
        let prose = format!("Sure! The roast is {RAW} — hope that helps.");
        assert!(parse_roast_payload(&prose).is_some());
    }

    #[test]
    fn rejects_too_few_bullets() {
        let short = r#"{
            "score": 72,
            "grade": "D",
            "roast_bullets": ["one", "two"],
            "summary": "ouch",
            "backhanded_compliment": "brave"
        }"#;
        assert!(parse_roast_payload(short).is_none());
    }

    #[test]
    fn rejects_unknown_grade() {
        let bad = RAW.replace("\"D\"", "\"Z\"");
        assert!(parse_roast_payload(&bad).is_none());
    }

    #[test]
    fn rejects_plain_prose() {
        assert!(parse_roast_payload("I refuse to roast this website.").is_none());
    }

    #[test]
    fn verdict_parses_and_requires_text() {
        let verdict =
            parse_battle_verdict(r#"{"winner": "b", "verdict": "B wins, barely."}"#).unwrap();
        assert_eq!(verdict.winner, Winner::B);
        assert!(parse_battle_verdict(r#"{"winner": "b", "verdict": "  "}"#).is_none());
        assert!(parse_battle_verdict(r#"{"winner": "both", "verdict": "no"}"#).is_none());
    }
}
