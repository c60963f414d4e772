use base64::{engine::general_purpose, Engine as _};
use regex::Regex;
use sha2::{Digest, Sha256};

#[allow(clippy::expect_used)]
mod patterns {
    use lazy_static::lazy_static;
    use regex::Regex;

    lazy_static! {
        pub static ref EMAIL_REGEX: Regex =
            Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("email pattern");
        pub static ref PHONE_REGEX: Regex =
            Regex::new(r"(?:\+1[-.\s]?)?\(?\b[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}\b").expect("phone pattern");
        pub static ref SSN_REGEX: Regex = Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").expect("ssn pattern");
        pub static ref DATE_REGEX: Regex =
            Regex::new(r"\b\d{4}-\d{2}-\d{2}\b").expect("date pattern");
        pub static ref DEFAULT: super::PiiRedactor = super::PiiRedactor::default();
    }
}

/// PII redaction configuration
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub redact_emails: bool,
    pub redact_phones: bool,
    pub redact_ssn: bool,
    pub redact_dates: bool,
    pub hash_for_correlation: bool,
    pub custom_patterns: Vec<(Regex, String)>,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            redact_emails: true,
            redact_phones: true,
            redact_ssn: true,
            redact_dates: true,
            hash_for_correlation: false,
            custom_patterns: Vec::new(),
        }
    }
}

/// PII redactor for log messages
#[derive(Debug, Clone, Default)]
pub struct PiiRedactor {
    config: RedactionConfig,
}

pub(crate) fn default_redactor() -> &'static PiiRedactor {
    &*patterns::DEFAULT
}

impl PiiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    pub fn redact(&self, text: &str) -> String {
        let mut result = text.to_string();

        // Emails first so the phone pattern never sees digits inside an address.
        if self.config.redact_emails {
            result = self.redact_emails(&result);
        }

        // SSNs before dates and phones: all three are digit runs with dashes.
        if self.config.redact_ssn {
            result = self.replace(&patterns::SSN_REGEX, &result, "SSN", "***-**-****");
        }

        if self.config.redact_dates {
            result = self.replace(&patterns::DATE_REGEX, &result, "DATE", "****-**-**");
        }

        if self.config.redact_phones {
            result = self.replace(&patterns::PHONE_REGEX, &result, "PHONE", "(***) ***-****");
        }

        for (pattern, replacement) in &self.config.custom_patterns {
            result = pattern.replace_all(&result, replacement.as_str()).to_string();
        }

        result
    }

    fn redact_emails(&self, text: &str) -> String {
        patterns::EMAIL_REGEX
            .replace_all(text, |caps: &regex::Captures| {
                let email = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
                if self.config.hash_for_correlation {
                    return format!("EMAIL[{}]", self.hash_value(email));
                }
                match email.split_once('@') {
                    Some((local, domain)) => format!(
                        "{}***@{}***",
                        local.chars().next().unwrap_or('*'),
                        domain.chars().next().unwrap_or('*')
                    ),
                    None => "***@***".to_string(),
                }
            })
            .to_string()
    }

    fn replace(&self, pattern: &Regex, text: &str, label: &str, mask: &str) -> String {
        pattern
            .replace_all(text, |caps: &regex::Captures| {
                let value = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
                if self.config.hash_for_correlation {
                    format!("{label}[{}]", self.hash_value(value))
                } else {
                    mask.to_string()
                }
            })
            .to_string()
    }

    fn hash_value(&self, value: &str) -> String {
        let digest = Sha256::digest(value.as_bytes());
        // First 8 bytes keep the token short.
        general_purpose::STANDARD_NO_PAD.encode(digest.get(..8).unwrap_or_default())
    }
}
