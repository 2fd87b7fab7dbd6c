use lazy_static::lazy_static;
use regex::Regex;

pub const MIN_PASSWORD_CHARS: usize = 6;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("ana@x.com"));
        assert!(is_valid_email("first.last@news.example.org"));
    }

    #[test]
    fn rejects_missing_at_or_dotless_domain() {
        assert!(!is_valid_email("ana.x.com"));
        assert!(!is_valid_email("ana@localhost"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn rejects_whitespace() {
        assert!(!is_valid_email("ana maria@x.com"));
        assert!(!is_valid_email("ana@x .com"));
    }
}
