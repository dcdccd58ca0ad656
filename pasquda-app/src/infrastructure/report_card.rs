use crate::domain::{Grade, Winner};
use pasquda_errors::AppError;
use resvg::{tiny_skia, usvg};
use std::sync::Arc;

pub const CARD_WIDTH: u32 = 1200;
pub const CARD_HEIGHT: u32 = 630;

/// Grades outside the scale (the `-` placeholder never reaches rendering,
/// but model output is only shape-checked) fall back to the F color.
const FALLBACK_GRADE_COLOR: &str = "#FF1493";

const ACCENT: &str = "#FF1493";
const MUTED: &str = "#666666";
const BODY: &str = "#EEEEEE";
const DIM: &str = "#AAAAAA";

pub struct RoastCard {
    pub domain: String,
    pub score: i32,
    pub grade: String,
    pub summary: String,
    pub bullets: Vec<String>,
}

pub struct BattleSide {
    pub domain: String,
    pub score: i32,
    pub grade: String,
}

pub struct BattleCard {
    pub side_a: BattleSide,
    pub side_b: BattleSide,
    pub verdict: String,
    pub winner: Winner,
}

/// Renders 1200x630 share-card PNGs from composed SVG. Text rendering uses
/// the system font database loaded once at startup.
pub struct ReportCardRenderer {
    options: usvg::Options<'static>,
}

impl ReportCardRenderer {
    pub fn new() -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();

        let mut options = usvg::Options::default();
        options.fontdb = Arc::new(fontdb);

        Self { options }
    }

    pub fn render_roast(&self, card: &RoastCard) -> Result<Vec<u8>, AppError> {
        self.render(&roast_card_svg(card))
    }

    pub fn render_battle(&self, card: &BattleCard) -> Result<Vec<u8>, AppError> {
        self.render(&battle_card_svg(card))
    }

    fn render(&self, svg: &str) -> Result<Vec<u8>, AppError> {
        let tree = usvg::Tree::from_str(svg, &self.options)
            .map_err(|e| AppError::Internal(format!("svg parse: {e}")))?;

        let mut pixmap = tiny_skia::Pixmap::new(CARD_WIDTH, CARD_HEIGHT)
            .ok_or_else(|| AppError::Internal("pixmap allocation failed".to_string()))?;

        resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

        pixmap
            .encode_png()
            .map_err(|e| AppError::Internal(format!("png encode: {e}")))
    }
}

impl Default for ReportCardRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn roast_card_svg(card: &RoastCard) -> String {
    let grade_color = grade_color(&card.grade);
    let domain = escape_xml(&truncate(&card.domain.to_uppercase(), 40));

    let summary_lines = wrap_text(&card.summary, 62);
    let summary_svg: String = summary_lines
        .iter()
        .take(3)
        .enumerate()
        .map(|(i, line)| {
            format!(
                r#"<text x="48" y="{y}" font-family="sans-serif" font-size="28" fill="{BODY}">{text}</text>"#,
                y = 350 + i * 38,
                text = escape_xml(line),
            )
        })
        .collect();

    let bullets_svg: String = card
        .bullets
        .iter()
        .take(3)
        .enumerate()
        .map(|(i, bullet)| {
            format!(
                r#"<text x="48" y="{y}" font-family="sans-serif" font-size="22" fill="{DIM}">&#8226; {text}</text>"#,
                y = 490 + i * 40,
                text = escape_xml(&truncate(bullet, 88)),
            )
        })
        .collect();

    format!(
        r##"<svg width="{CARD_WIDTH}" height="{CARD_HEIGHT}" viewBox="0 0 {CARD_WIDTH} {CARD_HEIGHT}" xmlns="http://www.w3.org/2000/svg">
<defs>
<linearGradient id="bg" x1="0" y1="0" x2="1" y2="1">
<stop offset="0%" stop-color="#030305"/>
<stop offset="50%" stop-color="#0d0d12"/>
<stop offset="100%" stop-color="#1A1A1A"/>
</linearGradient>
</defs>
<rect width="{CARD_WIDTH}" height="{CARD_HEIGHT}" fill="url(#bg)"/>
<text x="48" y="84" font-family="sans-serif" font-size="22" font-weight="bold" letter-spacing="3" fill="{ACCENT}">PASQUDA AUDIT</text>
<text x="48" y="144" font-family="sans-serif" font-size="20" letter-spacing="2" fill="{MUTED}">{domain}</text>
<text x="48" y="268" font-family="sans-serif" font-size="110" font-weight="bold" fill="{ACCENT}">{score}</text>
<text x="{score_suffix_x}" y="268" font-family="sans-serif" font-size="36" fill="#555555">/100</text>
<circle cx="1072" cy="160" r="72" fill="{grade_color}"/>
<text x="1072" y="186" font-family="sans-serif" font-size="80" font-weight="bold" fill="#0A0A0A" text-anchor="middle">{grade}</text>
{summary_svg}
{bullets_svg}
<text x="48" y="600" font-family="sans-serif" font-size="18" fill="#555555">pasquda — the internet's meanest report card</text>
</svg>"##,
        score = card.score,
        score_suffix_x = 48 + score_width(card.score),
        grade = escape_xml(&card.grade),
    )
}

fn battle_card_svg(card: &BattleCard) -> String {
    let verdict_lines = wrap_text(&card.verdict, 84);
    let verdict_svg: String = verdict_lines
        .iter()
        .take(3)
        .enumerate()
        .map(|(i, line)| {
            format!(
                r#"<text x="600" y="{y}" font-family="sans-serif" font-size="24" fill="{BODY}" text-anchor="middle">{text}</text>"#,
                y = 470 + i * 34,
                text = escape_xml(line),
            )
        })
        .collect();

    let (label_a, label_b) = match card.winner {
        Winner::A => ("WINNER", ""),
        Winner::B => ("", "WINNER"),
        Winner::Tie => ("TIE", "TIE"),
    };

    format!(
        r##"<svg width="{CARD_WIDTH}" height="{CARD_HEIGHT}" viewBox="0 0 {CARD_WIDTH} {CARD_HEIGHT}" xmlns="http://www.w3.org/2000/svg">
<defs>
<linearGradient id="bg" x1="0" y1="0" x2="1" y2="1">
<stop offset="0%" stop-color="#030305"/>
<stop offset="50%" stop-color="#0d0d12"/>
<stop offset="100%" stop-color="#1A1A1A"/>
</linearGradient>
</defs>
<rect width="{CARD_WIDTH}" height="{CARD_HEIGHT}" fill="url(#bg)"/>
<text x="48" y="84" font-family="sans-serif" font-size="22" font-weight="bold" letter-spacing="3" fill="{ACCENT}">PASQUDA BATTLE</text>
{side_a}
<text x="600" y="250" font-family="sans-serif" font-size="48" font-weight="bold" fill="#555555" text-anchor="middle">VS</text>
{side_b}
{verdict_svg}
<text x="48" y="600" font-family="sans-serif" font-size="18" fill="#555555">pasquda — the internet's meanest report card</text>
</svg>"##,
        side_a = battle_side_svg(&card.side_a, 270, label_a),
        side_b = battle_side_svg(&card.side_b, 930, label_b),
    )
}

fn battle_side_svg(side: &BattleSide, center_x: u32, label: &str) -> String {
    let color = grade_color(&side.grade);
    let label_svg = if label.is_empty() {
        String::new()
    } else {
        format!(
            r##"<text x="{center_x}" y="392" font-family="sans-serif" font-size="24" font-weight="bold" letter-spacing="2" fill="#FFD700" text-anchor="middle">{label}</text>"##,
        )
    };

    format!(
        r#"<text x="{center_x}" y="170" font-family="sans-serif" font-size="26" letter-spacing="1" fill="{MUTED}" text-anchor="middle">{domain}</text>
<text x="{center_x}" y="280" font-family="sans-serif" font-size="90" font-weight="bold" fill="{ACCENT}" text-anchor="middle">{score}</text>
<text x="{center_x}" y="340" font-family="sans-serif" font-size="40" font-weight="bold" fill="{color}" text-anchor="middle">{grade}</text>
{label_svg}"#,
        domain = escape_xml(&truncate(&side.domain.to_uppercase(), 26)),
        score = side.score,
        grade = escape_xml(&side.grade),
    )
}

fn grade_color(grade: &str) -> &'static str {
    Grade::from_letter(grade)
        .map(|g| g.color())
        .unwrap_or(FALLBACK_GRADE_COLOR)
}

/// Rough advance width of the big score digits, to place the "/100" suffix.
fn score_width(score: i32) -> usize {
    score.to_string().len() * 66
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

/// Greedy word wrap by character budget. Words longer than the budget get
/// their own line rather than being split.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_xml(r#"<b>&"it's""#),
            "&lt;b&gt;&amp;&quot;it&apos;s&quot;"
        );
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap_text("one two three four five", 9);
        assert_eq!(lines, vec!["one two", "three", "four five"]);
    }

    #[test]
    fn wrap_keeps_oversized_words_whole() {
        let lines = wrap_text("tiny absurdlyoversizedword end", 10);
        assert_eq!(lines[1], "absurdlyoversizedword");
    }

    #[test]
    fn truncation_appends_ellipsis() {
        assert_eq!(truncate("abcdef", 10), "abcdef");
        let cut = truncate("a very long domain name indeed", 10);
        assert!(cut.chars().count() <= 10);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn roast_card_svg_is_well_formed_enough() {
        let card = RoastCard {
            domain: "example.com".into(),
            score: 72,
            grade: "D".into(),
            summary: "A website that answers the question nobody asked.".into(),
            bullets: vec!["b < 1".into(), "b & 2".into(), "b3".into()],
        };
        let svg = roast_card_svg(&card);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("EXAMPLE.COM"));
        assert!(svg.contains("#FF6B6B"));
        assert!(!svg.contains("b < 1"));
        assert!(svg.contains("b &lt; 1"));
    }

    #[test]
    fn battle_card_marks_the_winner_side() {
        let card = BattleCard {
            side_a: BattleSide {
                domain: "a.com".into(),
                score: 30,
                grade: "B".into(),
            },
            side_b: BattleSide {
                domain: "b.com".into(),
                score: 80,
                grade: "D".into(),
            },
            verdict: "A wins.".into(),
            winner: Winner::A,
        };
        let svg = battle_card_svg(&card);
        assert_eq!(svg.matches("WINNER").count(), 1);
    }

    #[test]
    fn unknown_grade_uses_fallback_color() {
        assert_eq!(grade_color("-"), FALLBACK_GRADE_COLOR);
        assert_eq!(grade_color("S"), "#FFD700");
    }
}
