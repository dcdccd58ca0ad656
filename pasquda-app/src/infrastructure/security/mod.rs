mod input_validator;
mod rate_limiter;

pub use input_validator::{
    InputValidator, MAX_IMAGE_BASE64_LEN, MAX_PDF_BYTES, MAX_RESUME_TEXT_LEN,
    MIN_LINKEDIN_TEXT_LEN, MIN_RESUME_TEXT_LEN,
};
pub use rate_limiter::{client_key, RateLimiter};
