//! Field rules for the user form.
//!
//! Every rule runs on every submit; failures are collected into one
//! [`FieldErrors`] map so all problems are reported together.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

// ASCII classes only: `\d` and case folding would otherwise admit
// non-ASCII digits and letters such as U+017F or the Kelvin sign.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?([0-9].*){3,}$").expect("valid phone regex"));

/// A form field, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Phone,
    Username,
    Street,
    City,
    Company,
    Website,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Name,
        Field::Email,
        Field::Phone,
        Field::Username,
        Field::Street,
        Field::City,
        Field::Company,
        Field::Website,
    ];

    /// Parse a field key as typed in `field=value` assignments.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "name" => Some(Self::Name),
            "email" => Some(Self::Email),
            "phone" => Some(Self::Phone),
            "username" => Some(Self::Username),
            "street" | "address.street" => Some(Self::Street),
            "city" | "address.city" => Some(Self::City),
            "company" | "company.name" => Some(Self::Company),
            "website" => Some(Self::Website),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Username => "username",
            Self::Street => "street",
            Self::City => "city",
            Self::Company => "company",
            Self::Website => "website",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Username => "Username",
            Self::Street => "Street",
            Self::City => "City",
            Self::Company => "Company Name",
            Self::Website => "Website",
        }
    }

    pub fn required(&self) -> bool {
        !matches!(self, Self::Company | Self::Website)
    }

    /// Username is generated, never typed.
    pub fn editable(&self) -> bool {
        !matches!(self, Self::Username)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Validation failures keyed by field. Empty means the form may be submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn fields(&self) -> Vec<Field> {
        self.0.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    fn insert(&mut self, field: Field, message: &str) {
        self.0.insert(field, message.to_string());
    }
}

/// Raw field values as typed, before any trimming.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub username: String,
    pub street: String,
    pub city: String,
    pub company: String,
    pub website: String,
}

impl FormFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Username => &self.username,
            Field::Street => &self.street,
            Field::City => &self.city,
            Field::Company => &self.company,
            Field::Website => &self.website,
        }
    }

    pub fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::Username => &mut self.username,
            Field::Street => &mut self.street,
            Field::City => &mut self.city,
            Field::Company => &mut self.company,
            Field::Website => &mut self.website,
        }
    }
}

fn trimmed_len(s: &str) -> usize {
    s.trim().chars().count()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// True when `s` parses as an absolute URL (scheme required).
pub fn is_valid_url(s: &str) -> bool {
    url::Url::parse(s).is_ok()
}

pub fn validate(fields: &FormFields) -> FieldErrors {
    let mut errors = FieldErrors::default();

    if fields.name.trim().is_empty() {
        errors.insert(Field::Name, "Name is required.");
    } else if trimmed_len(&fields.name) < 3 {
        errors.insert(Field::Name, "Name must be at least 3 characters.");
    }

    // Emptiness is judged on the trimmed value, the pattern on the raw one.
    if fields.email.trim().is_empty() {
        errors.insert(Field::Email, "Email is required.");
    } else if !is_valid_email(&fields.email) {
        errors.insert(Field::Email, "Invalid email address.");
    }

    if fields.phone.trim().is_empty() {
        errors.insert(Field::Phone, "Phone number is required.");
    } else if !is_valid_phone(&fields.phone) {
        errors.insert(Field::Phone, "Invalid phone number.");
    }

    if fields.username.trim().is_empty() {
        errors.insert(Field::Username, "Username is required.");
    } else if trimmed_len(&fields.username) < 3 {
        errors.insert(Field::Username, "Username must be at least 3 characters.");
    }

    if fields.street.trim().is_empty() {
        errors.insert(Field::Street, "Street is required.");
    }
    if fields.city.trim().is_empty() {
        errors.insert(Field::City, "City is required.");
    }

    if !fields.company.is_empty() && trimmed_len(&fields.company) < 3 {
        errors.insert(Field::Company, "Company name must be at least 3 characters.");
    }

    if !fields.website.is_empty() && !is_valid_url(&fields.website) {
        errors.insert(Field::Website, "Invalid URL.");
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_fields() -> FormFields {
        FormFields {
            name: "Leanne Graham".to_string(),
            email: "Sincere@april.biz".to_string(),
            phone: "1-770-736-8031 x56442".to_string(),
            username: "USER-x7k".to_string(),
            street: "Kulas Light".to_string(),
            city: "Gwenborough".to_string(),
            company: String::new(),
            website: String::new(),
        }
    }

    #[test]
    fn test_valid_fields_have_no_errors() {
        assert!(validate(&valid_fields()).is_empty());
    }

    #[test]
    fn test_required_fields_report_exactly_that_field() {
        for field in Field::ALL.iter().filter(|f| f.required()) {
            let mut fields = valid_fields();
            fields.get_mut(*field).clear();
            let errors = validate(&fields);
            assert_eq!(errors.fields(), vec![*field], "field {}", field);
            assert!(errors.get(*field).unwrap().contains("required"));
        }
    }

    #[test]
    fn test_whitespace_only_counts_as_empty() {
        let mut fields = valid_fields();
        fields.name = "   ".to_string();
        fields.city = "\t".to_string();
        let errors = validate(&fields);
        assert_eq!(errors.get(Field::Name), Some("Name is required."));
        assert_eq!(errors.get(Field::City), Some("City is required."));
    }

    #[test]
    fn test_short_name() {
        let mut fields = valid_fields();
        fields.name = "Al".to_string();
        let errors = validate(&fields);
        assert_eq!(errors.fields().len(), 1);
        assert_eq!(
            errors.get(Field::Name),
            Some("Name must be at least 3 characters.")
        );

        // Padding does not count toward the minimum.
        fields.name = "  Al  ".to_string();
        assert!(validate(&fields).get(Field::Name).is_some());
    }

    #[test]
    fn test_short_username() {
        let mut fields = valid_fields();
        fields.username = "ab".to_string();
        assert_eq!(
            validate(&fields).get(Field::Username),
            Some("Username must be at least 3 characters.")
        );
    }

    #[test]
    fn test_email_patterns() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("First.Last+tag@Sub.Example.ORG"));
        assert!(!is_valid_email("bad-email"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user@example.c"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@exa mple.com"));
        assert!(!is_valid_email("a@b.\u{17F}\u{17F}"));
        assert!(!is_valid_email("\u{212A}@b.com"));
        assert!(!is_valid_email("us\u{e9}r@example.com"));

        let mut fields = valid_fields();
        fields.email = "bad-email".to_string();
        let errors = validate(&fields);
        assert_eq!(errors.fields(), vec![Field::Email]);
        assert_eq!(errors.get(Field::Email), Some("Invalid email address."));
    }

    #[test]
    fn test_phone_patterns() {
        assert!(is_valid_phone("123"));
        assert!(is_valid_phone("+1 555 0100"));
        assert!(is_valid_phone("010-692-6593 x09125"));
        assert!(!is_valid_phone("12"));
        assert!(!is_valid_phone("phone"));
        assert!(!is_valid_phone("++123"));
        assert!(!is_valid_phone("\u{661}\u{662}\u{663}"));
        assert!(!is_valid_phone("\u{ff11}\u{ff12}\u{ff13}"));

        let mut fields = valid_fields();
        fields.phone = "call me".to_string();
        assert_eq!(
            validate(&fields).get(Field::Phone),
            Some("Invalid phone number.")
        );
    }

    #[test]
    fn test_optional_fields_empty_is_fine() {
        let mut fields = FormFields::default();
        fields.company.clear();
        fields.website.clear();
        let errors = validate(&fields);
        assert!(errors.get(Field::Company).is_none());
        assert!(errors.get(Field::Website).is_none());
    }

    #[test]
    fn test_company_min_length() {
        let mut fields = valid_fields();
        fields.company = "AB".to_string();
        assert_eq!(
            validate(&fields).get(Field::Company),
            Some("Company name must be at least 3 characters.")
        );
        fields.company = "   ".to_string();
        assert!(validate(&fields).get(Field::Company).is_some());
        fields.company = "ACME".to_string();
        assert!(validate(&fields).is_empty());
    }

    #[test]
    fn test_website_must_be_absolute_url() {
        let mut fields = valid_fields();
        fields.website = "hildegard.org".to_string();
        assert_eq!(validate(&fields).get(Field::Website), Some("Invalid URL."));
        fields.website = "https://hildegard.org".to_string();
        assert!(validate(&fields).is_empty());
    }

    #[test]
    fn test_all_failures_collected() {
        let errors = validate(&FormFields::default());
        assert_eq!(
            errors.fields(),
            vec![
                Field::Name,
                Field::Email,
                Field::Phone,
                Field::Username,
                Field::Street,
                Field::City
            ]
        );
    }

    #[test]
    fn test_field_keys() {
        assert_eq!(Field::from_key("address.street"), Some(Field::Street));
        assert_eq!(Field::from_key("City"), Some(Field::City));
        assert_eq!(Field::from_key("company.name"), Some(Field::Company));
        assert_eq!(Field::from_key("id"), None);
        for field in Field::ALL {
            assert_eq!(Field::from_key(field.key()), Some(field));
        }
        assert!(!Field::Username.editable());
    }
}
