//! Contact data masking for logs.
//!
//! Notification recipients (email addresses and phone numbers) are personal
//! data; they are masked before they reach any log sink.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z0-9._%+-]+)@([A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,})").unwrap()
});

// E.164: plus sign, no leading zero, at most 15 digits
static PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\+[1-9][0-9]{7,14}").unwrap());

/// Masks email addresses and phone numbers.
#[derive(Debug, Clone)]
pub struct ContactMasker {
    /// Characters of a phone number kept at each end
    show_digits: usize,
    /// Mask character
    mask_char: char,
}

impl Default for ContactMasker {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactMasker {
    /// Create a masker with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            show_digits: 3,
            mask_char: '*',
        }
    }

    fn mask(&self) -> String {
        self.mask_char.to_string().repeat(3)
    }

    /// Mask an email address, keeping the first character and the domain.
    ///
    /// # Example
    ///
    /// ```
    /// use fondo_telemetry::masking::ContactMasker;
    ///
    /// let masker = ContactMasker::new();
    /// assert_eq!(masker.mask_email("jane@example.com"), "j***@example.com");
    /// ```
    #[must_use]
    pub fn mask_email(&self, email: &str) -> String {
        match email.split_once('@') {
            Some((local, domain)) => {
                let first = local.chars().next().map(String::from).unwrap_or_default();
                format!("{first}{}@{domain}", self.mask())
            }
            None => self.mask(),
        }
    }

    /// Mask a phone number, keeping a few characters at each end.
    ///
    /// # Example
    ///
    /// ```
    /// use fondo_telemetry::masking::ContactMasker;
    ///
    /// let masker = ContactMasker::new();
    /// assert_eq!(masker.mask_phone("+573001234567"), "+57***567");
    /// ```
    #[must_use]
    pub fn mask_phone(&self, phone: &str) -> String {
        let chars: Vec<char> = phone.chars().collect();
        if chars.len() <= self.show_digits * 2 {
            return self.mask();
        }
        let start: String = chars[..self.show_digits].iter().collect();
        let end: String = chars[chars.len() - self.show_digits..].iter().collect();
        format!("{start}{}{end}", self.mask())
    }

    /// Mask a recipient: emails when it contains `@`, phone numbers otherwise.
    #[must_use]
    pub fn mask_recipient(&self, recipient: &str) -> String {
        if recipient.contains('@') {
            self.mask_email(recipient)
        } else {
            self.mask_phone(recipient)
        }
    }

    /// Mask every email address and phone number found in `input`.
    #[must_use]
    pub fn mask_string<'a>(&self, input: &'a str) -> Cow<'a, str> {
        let emails = EMAIL.replace_all(input, |caps: &Captures<'_>| self.mask_email(&caps[0]));
        if !PHONE.is_match(&emails) {
            return emails;
        }
        let masked = PHONE
            .replace_all(&emails, |caps: &Captures<'_>| self.mask_phone(&caps[0]))
            .into_owned();
        Cow::Owned(masked)
    }

    /// Check if a string contains contact data.
    #[must_use]
    pub fn contains_contact(&self, input: &str) -> bool {
        EMAIL.is_match(input) || PHONE.is_match(input)
    }
}
