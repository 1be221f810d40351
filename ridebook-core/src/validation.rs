use serde::Serialize;
use validator::ValidateEmail;

use crate::booking::{BookingDetails, BookingForm};

pub const INVALID_VALUE: &str = "Invalid value";
pub const INVALID_EMAIL: &str = "Please Enter a Valid Email!";

/// A single rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub value: String,
    pub msg: String,
    pub path: String,
    pub location: String,
}

impl FieldError {
    pub fn body(path: &str, value: &str, msg: &str) -> Self {
        Self {
            value: value.to_string(),
            msg: msg.to_string(),
            path: path.to_string(),
            location: "body".to_string(),
        }
    }
}

/// HTML-escapes the characters that are unsafe to echo back into markup.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(c),
        }
    }
    out
}

/// Trim then escape.
pub fn sanitize(input: &str) -> String {
    escape_html(input.trim())
}

/// Email check with a stricter domain rule: no IP literals, and the last label must be a
/// letters-only TLD of two or more characters (or an `xn--` punycode TLD).
pub fn is_valid_email(email: &str) -> bool {
    if !email.to_owned().validate_email() {
        return false;
    }

    let domain = match email.rsplit_once('@') {
        Some((_, domain)) => domain,
        None => return false,
    };
    if domain.starts_with('[') {
        return false;
    }

    match domain.rsplit_once('.') {
        Some((_, tld)) => {
            let tld = tld.to_ascii_lowercase();
            if let Some(puny) = tld.strip_prefix("xn--") {
                !puny.is_empty() && puny.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
            } else {
                tld.chars().count() >= 2 && tld.chars().all(char::is_alphabetic)
            }
        }
        None => false,
    }
}

/// Checks the form and returns its sanitized fields, or every failed field in form order.
///
/// Checks run on trimmed values; escaping is applied afterwards.
pub fn validate_booking(form: &BookingForm) -> Result<BookingDetails, Vec<FieldError>> {
    let mut errors = Vec::new();

    let email = form.email.trim().to_string();
    if !is_valid_email(&email) {
        errors.push(FieldError::body("email", &email, INVALID_EMAIL));
    }

    for (path, value) in [("pickLoc", &form.pick_loc), ("dropLoc", &form.drop_loc)] {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            errors.push(FieldError::body(path, trimmed, INVALID_VALUE));
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(BookingDetails {
        first: sanitize(&form.first),
        last: sanitize(&form.last),
        email: escape_html(&email),
        pick_loc: sanitize(&form.pick_loc),
        drop_loc: sanitize(&form.drop_loc),
        reference: sanitize(&form.reference),
        no_of_ppl: sanitize(&form.no_of_ppl),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> BookingForm {
        BookingForm {
            first: "  Ada ".to_string(),
            last: "Lovelace".to_string(),
            email: " ada@example.com ".to_string(),
            pick_loc: "Main St & 5th".to_string(),
            drop_loc: "<Harbour>".to_string(),
            reference: "".to_string(),
            no_of_ppl: " 3 ".to_string(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a&b"), "a&amp;b");
        assert_eq!(escape_html("<script>alert('x')</script>"), "&lt;script&gt;alert(&#x27;x&#x27;)&lt;&#x2F;script&gt;");
        assert_eq!(escape_html("\"q\" `t` \\"), "&quot;q&quot; &#96;t&#96; &#x5C;");
        assert_eq!(escape_html("plain text"), "plain text");
    }

    #[test]
    fn test_valid_form_is_trimmed_and_escaped() {
        let details = validate_booking(&valid_form()).unwrap();

        assert_eq!(details.first, "Ada");
        assert_eq!(details.email, "ada@example.com");
        assert_eq!(details.pick_loc, "Main St &amp; 5th");
        assert_eq!(details.drop_loc, "&lt;Harbour&gt;");
        assert_eq!(details.reference, "");
        assert_eq!(details.no_of_ppl, "3");
    }

    #[test]
    fn test_invalid_email_is_rejected() {
        let mut form = valid_form();
        form.email = "not-an-email".to_string();

        let errors = validate_booking(&form).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "email");
        assert_eq!(errors[0].msg, INVALID_EMAIL);
        assert_eq!(errors[0].location, "body");
    }

    #[test]
    fn test_email_domain_needs_alphabetic_tld() {
        for rejected in ["ada@localhost", "ada@[127.0.0.1]", "ada@example.1", "ada@b.c"] {
            assert!(!is_valid_email(rejected), "{} should be rejected", rejected);
        }
        for accepted in ["ada@example.com", "ada.lovelace@mail.example.co.uk", "ada@example.xn--p1ai"] {
            assert!(is_valid_email(accepted), "{} should be accepted", accepted);
        }

        let mut form = valid_form();
        form.email = "ada@localhost".to_string();
        let errors = validate_booking(&form).unwrap_err();
        assert_eq!(errors[0].msg, INVALID_EMAIL);
    }

    #[test]
    fn test_blank_locations_are_rejected_in_form_order() {
        let mut form = valid_form();
        form.email = String::new();
        form.pick_loc = "   ".to_string();
        form.drop_loc = String::new();

        let errors = validate_booking(&form).unwrap_err();
        let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["email", "pickLoc", "dropLoc"]);
        assert_eq!(errors[1].msg, INVALID_VALUE);
        assert_eq!(errors[1].value, "");
    }
}
