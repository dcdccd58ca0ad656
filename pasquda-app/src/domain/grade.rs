use serde::{Deserialize, Serialize};

/// Letter grade on the roast report card. Higher score = worse website,
/// so `S` is reserved for the rare site that survives the roast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Score band mapping: S 0-10, A 11-25, B 26-40, C 41-60, D 61-80, F 81-100.
    /// Used by fallback paths only; model-emitted grades are trusted as-is.
    pub fn from_score(score: i32) -> Self {
        match score {
            i32::MIN..=10 => Grade::S,
            11..=25 => Grade::A,
            26..=40 => Grade::B,
            41..=60 => Grade::C,
            61..=80 => Grade::D,
            _ => Grade::F,
        }
    }

    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "S" => Some(Grade::S),
            "A" => Some(Grade::A),
            "B" => Some(Grade::B),
            "C" => Some(Grade::C),
            "D" => Some(Grade::D),
            "F" => Some(Grade::F),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::S => "S",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }

    /// Accent color used on share cards.
    pub fn color(&self) -> &'static str {
        match self {
            Grade::S => "#FFD700",
            Grade::A => "#00FF88",
            Grade::B => "#4ECDC4",
            Grade::C => "#FFE66D",
            Grade::D => "#FF6B6B",
            Grade::F => "#FF1493",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_bands() {
        assert_eq!(Grade::from_score(5), Grade::S);
        assert_eq!(Grade::from_score(15), Grade::A);
        assert_eq!(Grade::from_score(35), Grade::B);
        assert_eq!(Grade::from_score(55), Grade::C);
        assert_eq!(Grade::from_score(75), Grade::D);
        assert_eq!(Grade::from_score(95), Grade::F);
    }

    #[test]
    fn band_edges() {
        assert_eq!(Grade::from_score(0), Grade::S);
        assert_eq!(Grade::from_score(10), Grade::S);
        assert_eq!(Grade::from_score(11), Grade::A);
        assert_eq!(Grade::from_score(80), Grade::D);
        assert_eq!(Grade::from_score(81), Grade::F);
        assert_eq!(Grade::from_score(100), Grade::F);
    }

    #[test]
    fn letter_roundtrip() {
        assert_eq!(Grade::from_letter("S"), Some(Grade::S));
        assert_eq!(Grade::from_letter("-"), None);
        assert_eq!(Grade::from_letter("X"), None);
    }

    #[test]
    fn serde_uses_bare_letters() {
        let grade: Grade = serde_json::from_str("\"B\"").unwrap();
        assert_eq!(grade, Grade::B);
        assert!(serde_json::from_str::<Grade>("\"Z\"").is_err());
    }
}
