//! Pattern matching for emails, phone numbers and passwords.
//!
//! Pure functions over text, no I/O. Patterns are fixed and compiled once
//! via the `lazy_regex!` macro (compile-time validated).

use lazy_regex::lazy_regex;

/// Email-shaped substrings: local part, `@`, dotted domain, 2+ letter TLD
static RE_EMAIL: lazy_regex::Lazy<regex::Regex> =
    lazy_regex!(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}");

/// Russian mobile numbers: optional +, country digit 7, optional parentheses
/// around the area code, space/hyphen separators
static RE_PHONE: lazy_regex::Lazy<regex::Regex> =
    lazy_regex!(r"\+?7[-\s]?\(?\d{3}\)?[-\s]?\d{3}[-\s]?\d{2}[-\s]?\d{2}");

/// Symbols counted towards password complexity
const PASSWORD_SYMBOLS: &str = "@$!%*#?&";

/// Verdict of [`rate_password`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrength {
    /// Meets every complexity requirement
    Strong,
    /// Fails at least one complexity requirement
    Weak,
}

/// Returns all email-shaped substrings of `text` in order of appearance.
///
/// No normalization is applied; matches are returned exactly as they appear.
#[must_use]
pub fn extract_emails(text: &str) -> Vec<String> {
    RE_EMAIL
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Returns all phone-shaped substrings of `text` in order of appearance.
#[must_use]
pub fn extract_phones(text: &str) -> Vec<String> {
    RE_PHONE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Rates a password against the fixed complexity policy.
///
/// `Strong` iff the password is at least 8 characters, consists only of
/// ASCII letters, digits and the symbols `@$!%*#?&`, and contains at least
/// one uppercase letter, one lowercase letter, one digit and one symbol.
/// This is a single whole-string verdict, not per-condition diagnostics.
#[must_use]
pub fn rate_password(password: &str) -> PasswordStrength {
    if password.chars().count() < 8 {
        return PasswordStrength::Weak;
    }

    let mut has_upper = false;
    let mut has_lower = false;
    let mut has_digit = false;
    let mut has_symbol = false;

    for c in password.chars() {
        if c.is_ascii_uppercase() {
            has_upper = true;
        } else if c.is_ascii_lowercase() {
            has_lower = true;
        } else if c.is_ascii_digit() {
            has_digit = true;
        } else if PASSWORD_SYMBOLS.contains(c) {
            has_symbol = true;
        } else {
            // Character outside the allowed universe
            return PasswordStrength::Weak;
        }
    }

    if has_upper && has_lower && has_digit && has_symbol {
        PasswordStrength::Strong
    } else {
        PasswordStrength::Weak
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_found_in_order() {
        let text = "contact me at a@b.com or x@y.org";
        let emails = extract_emails(text);
        assert_eq!(emails, vec!["a@b.com", "x@y.org"]);
        for email in &emails {
            assert!(text.contains(email.as_str()));
        }
    }

    #[test]
    fn emails_none_found() {
        assert!(extract_emails("nothing to see here").is_empty());
        assert!(extract_emails("broken@nodot").is_empty());
    }

    #[test]
    fn email_no_normalization() {
        assert_eq!(extract_emails("Ivan.Petrov@Example.COM"), vec!["Ivan.Petrov@Example.COM"]);
    }

    #[test]
    fn phone_full_span() {
        assert_eq!(extract_phones("+7 (912) 345-67-89"), vec!["+7 (912) 345-67-89"]);
    }

    #[test]
    fn phone_variants() {
        assert_eq!(extract_phones("call 79123456789 now"), vec!["79123456789"]);
        assert_eq!(extract_phones("8 900 000 00 00"), Vec::<String>::new());
        assert_eq!(
            extract_phones("office: 7-912-345-67-89, mobile: +7 912 345 67 89"),
            vec!["7-912-345-67-89", "+7 912 345 67 89"]
        );
    }

    #[test]
    fn password_missing_symbol_is_weak() {
        assert_eq!(rate_password("Abc12345"), PasswordStrength::Weak);
    }

    #[test]
    fn password_all_classes_is_strong() {
        assert_eq!(rate_password("Abc123$5"), PasswordStrength::Strong);
    }

    #[test]
    fn password_length_floor_is_eight() {
        // Meets every class requirement but is only 7 characters
        assert_eq!(rate_password("Abc12$5"), PasswordStrength::Weak);
    }

    #[test]
    fn password_missing_any_class_is_weak() {
        assert_eq!(rate_password("abc123$5"), PasswordStrength::Weak); // no upper
        assert_eq!(rate_password("ABC123$5"), PasswordStrength::Weak); // no lower
        assert_eq!(rate_password("Abcdefg$"), PasswordStrength::Weak); // no digit
        assert_eq!(rate_password("Abc12345"), PasswordStrength::Weak); // no symbol
    }

    #[test]
    fn password_outside_universe_is_weak() {
        // Otherwise strong, but ^ is not in the allowed symbol set
        assert_eq!(rate_password("Abc123$5^"), PasswordStrength::Weak);
        // Spaces are not allowed either
        assert_eq!(rate_password("Abc 123$5"), PasswordStrength::Weak);
        // Non-ASCII letters fall outside the universe
        assert_eq!(rate_password("Пароль1$a"), PasswordStrength::Weak);
    }

    #[test]
    fn password_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(rate_password("Abc123$5"), PasswordStrength::Strong);
        }
    }
}
