use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

/// Why a field was rejected. Handlers pick the user-facing message; the kind
/// exists so checks compose without inverted-boolean double negatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    Blank,
    OutOfRange,
    NotAUuid,
    BadUserName,
    BadEmail,
    BadPassword,
    InsecureUrl,
}

pub type FieldResult = Result<(), FieldError>;

lazy_static! {
    // 2-10 code points: CJK ideographs, ASCII letters, digits. No spaces or symbols.
    static ref USER_NAME_RE: Regex =
        Regex::new(r"^[\u{4e00}-\u{9fa5}a-zA-Z0-9]{2,10}$").unwrap();
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
}

/// Rejects empty and whitespace-only strings.
pub fn non_blank(value: &str) -> FieldResult {
    if value.trim().is_empty() {
        return Err(FieldError::Blank);
    }
    Ok(())
}

pub fn non_negative(value: i32) -> FieldResult {
    if value < 0 {
        return Err(FieldError::OutOfRange);
    }
    Ok(())
}

pub fn positive(value: i32) -> FieldResult {
    if value <= 0 {
        return Err(FieldError::OutOfRange);
    }
    Ok(())
}

pub fn uuid(value: &str) -> Result<Uuid, FieldError> {
    Uuid::parse_str(value).map_err(|_| FieldError::NotAUuid)
}

pub fn user_name(value: &str) -> FieldResult {
    if !USER_NAME_RE.is_match(value) {
        return Err(FieldError::BadUserName);
    }
    Ok(())
}

pub fn email(value: &str) -> FieldResult {
    if !EMAIL_RE.is_match(value) {
        return Err(FieldError::BadEmail);
    }
    Ok(())
}

/// 8-16 code points with at least one ASCII digit, one lowercase and one
/// uppercase letter. Length is enforced on the whole string, so an over-long
/// password containing a valid 8-16 run is rejected.
pub fn password(value: &str) -> FieldResult {
    let len = value.chars().count();
    if !(8..=16).contains(&len) {
        return Err(FieldError::BadPassword);
    }
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    let has_lower = value.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = value.chars().any(|c| c.is_ascii_uppercase());
    if !(has_digit && has_lower && has_upper) {
        return Err(FieldError::BadPassword);
    }
    Ok(())
}

/// Meeting and profile-image links must use secure transport.
pub fn secure_url(value: &str) -> FieldResult {
    non_blank(value).map_err(|_| FieldError::InsecureUrl)?;
    if !value.starts_with("https") {
        return Err(FieldError::InsecureUrl);
    }
    Ok(())
}
