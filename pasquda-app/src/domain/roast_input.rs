/// One submitted artifact, tagged by content type. Each variant carries its
/// own acquisition strategy: websites get screenshotted, LinkedIn and resume
/// submissions attach assets uploaded at creation time.
#[derive(Debug, Clone)]
pub enum RoastInput {
    Website {
        url: String,
        domain: String,
    },
    LinkedIn {
        text: Option<String>,
        image_base64: Option<String>,
        file_url: Option<String>,
    },
    Resume {
        text: String,
        file_url: String,
    },
}

impl RoastInput {
    /// Themed message written to the record when this pipeline fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            RoastInput::Website { .. } => {
                "This website is so broken, even our AI gave up. That's almost impressive."
            }
            RoastInput::LinkedIn { .. } => {
                "Your LinkedIn persona broke our AI. That's either impressive or deeply concerning."
            }
            RoastInput::Resume { .. } => {
                "Your resume broke our AI. Maybe that's why you're not getting callbacks."
            }
        }
    }
}
