use pasquda_errors::AppError;

const MAX_URL_LENGTH: usize = 2048;
const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// Resume PDFs above this size are rejected before any processing.
pub const MAX_PDF_BYTES: usize = 5 * 1024 * 1024;
/// LinkedIn screenshots arrive base64-inflated; 4 MB encoded is ~2 MB raw.
pub const MAX_IMAGE_BASE64_LEN: usize = 4 * 1024 * 1024;
/// Minimum pasted LinkedIn text worth roasting.
pub const MIN_LINKEDIN_TEXT_LEN: usize = 20;
/// Extracted resume text shorter than this is probably not a resume.
pub const MIN_RESUME_TEXT_LEN: usize = 50;
/// Resume text is truncated to this many chars before prompting.
pub const MAX_RESUME_TEXT_LEN: usize = 10_000;

pub struct InputValidator;

impl InputValidator {
    /// Normalizes a submitted URL: trims, prepends `https://` when no scheme
    /// is present, and requires an http(s) URL with a dotted hostname.
    pub fn validate_url(input: &str) -> Result<String, AppError> {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return Err(AppError::InvalidInput(
                "You forgot to paste a URL. We can't roast thin air... yet.".to_string(),
            ));
        }

        if trimmed.len() > MAX_URL_LENGTH {
            return Err(AppError::InvalidInput(
                "That URL is suspiciously long. Trim it down and try again.".to_string(),
            ));
        }

        let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };

        let parsed = url::Url::parse(&candidate).map_err(|_| {
            AppError::InvalidInput(
                "Even Pasquda can't roast a URL that doesn't exist. Try again.".to_string(),
            )
        })?;

        if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
            return Err(AppError::InvalidInput(
                "Even Pasquda can't roast a URL that doesn't exist. Try a real website."
                    .to_string(),
            ));
        }

        let host = parsed.host_str().ok_or_else(|| {
            AppError::InvalidInput(
                "Even Pasquda can't roast a URL that doesn't exist. Try again.".to_string(),
            )
        })?;

        if !host.contains('.') {
            return Err(AppError::InvalidInput(
                "That doesn't look like a real website. Did you forget the .com?".to_string(),
            ));
        }

        Ok(parsed.to_string())
    }

    /// Display label for a URL: hostname with any leading `www.` stripped.
    /// Falls back to the raw input when the URL does not parse.
    pub fn extract_domain(url: &str) -> String {
        url::Url::parse(url)
            .ok()
            .and_then(|parsed| parsed.host_str().map(str::to_string))
            .map(|host| host.trim_start_matches("www.").to_string())
            .unwrap_or_else(|| url.to_string())
    }

    pub fn is_valid_email(email: &str) -> bool {
        let re = match regex_lite::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$") {
            Ok(re) => re,
            Err(_) => return false,
        };
        re.is_match(email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_absolute_urls() {
        assert_eq!(
            InputValidator::validate_url("https://example.com").unwrap(),
            "https://example.com/"
        );
        assert!(InputValidator::validate_url("http://example.com/path?q=1").is_ok());
    }

    #[test]
    fn prepends_scheme_for_bare_domains() {
        let url = InputValidator::validate_url("example.com").unwrap();
        assert_eq!(url, "https://example.com/");
    }

    #[test]
    fn trims_whitespace() {
        assert!(InputValidator::validate_url("  example.com  ").is_ok());
    }

    #[test]
    fn rejects_empty_input() {
        assert!(InputValidator::validate_url("").is_err());
        assert!(InputValidator::validate_url("   ").is_err());
    }

    #[test]
    fn rejects_dotless_hostnames() {
        assert!(InputValidator::validate_url("localhost").is_err());
        assert!(InputValidator::validate_url("http://intranet").is_err());
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert!(InputValidator::validate_url("ftp://example.com").is_err());
        assert!(InputValidator::validate_url("javascript:alert(1)").is_err());
    }

    #[test]
    fn rejection_messages_are_non_empty() {
        for input in ["", "localhost", "ftp://example.com"] {
            match InputValidator::validate_url(input) {
                Err(err) => assert!(!err.user_message().is_empty()),
                Ok(url) => panic!("{input:?} unexpectedly validated as {url}"),
            }
        }
    }

    #[test]
    fn extracts_domain_without_www() {
        assert_eq!(
            InputValidator::extract_domain("https://www.example.com/about"),
            "example.com"
        );
        assert_eq!(
            InputValidator::extract_domain("https://blog.example.com"),
            "blog.example.com"
        );
    }

    #[test]
    fn extract_domain_falls_back_to_input() {
        assert_eq!(
            InputValidator::extract_domain("linkedin-profile"),
            "linkedin-profile"
        );
    }

    #[test]
    fn email_validation() {
        assert!(InputValidator::is_valid_email("user@example.com"));
        assert!(InputValidator::is_valid_email("a.b+c@sub.example.co"));
        assert!(!InputValidator::is_valid_email("not-an-email"));
        assert!(!InputValidator::is_valid_email("user@nodot"));
        assert!(!InputValidator::is_valid_email("spa ced@example.com"));
    }
}
