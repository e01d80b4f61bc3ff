use crate::transform::{Transform, full_column_name};

/// Default number of digest characters replacing the local part.
pub const DEFAULT_HASH_LENGTH: usize = 15;

/// Hash the local part of values that look like e-mail addresses.
///
/// A value matching `%@%` becomes `<md5 prefix>@<domain>`, where the
/// prefix is the first `hash_length` characters of the MD5 of the whole
/// value. The domain is kept, or replaced by a digest prefix of the same
/// length plus `.com` when domain anonymization is on. Other values pass
/// through.
///
/// ```
/// use shroud::postgres::Email;
///
/// let email = Email::builder().hash_length(10).anonymize_domain(true).build();
/// # let _ = email;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Email {
    hash_length: usize,
    anonymize_domain: bool,
}

impl Default for Email {
    fn default() -> Self {
        Self {
            hash_length: DEFAULT_HASH_LENGTH,
            anonymize_domain: false,
        }
    }
}

impl Email {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> EmailBuilder {
        EmailBuilder::default()
    }

    fn domain_part(&self, column: &str) -> String {
        if self.anonymize_domain {
            format!(
                r#"("left"(md5(split_part(({})::text, '@'::text, 2)::text), {}) || '.com')"#,
                column, self.hash_length
            )
        } else {
            format!("split_part(({})::text, '@'::text, 2)", column)
        }
    }
}

impl Transform for Email {
    fn emit(&self, table: &str, column: &str) -> String {
        let column = full_column_name(table, column);
        format!(
            r#"CASE WHEN (({col})::TEXT ~~ '%@%'::TEXT) THEN ((("left"(md5(({col})::text), {len}) || '@'::text) || {domain}))::CHARACTER VARYING ELSE {col} END"#,
            col = column,
            len = self.hash_length,
            domain = self.domain_part(&column),
        )
    }
}

/// Builder for [`Email`].
#[derive(Debug, Default)]
pub struct EmailBuilder {
    email: Email,
}

impl EmailBuilder {
    /// Number of digest characters used for the local part (and the domain).
    pub fn hash_length(mut self, length: usize) -> Self {
        self.email.hash_length = length;
        self
    }

    /// Also replace the domain with a digest-based one.
    pub fn anonymize_domain(mut self, anonymize: bool) -> Self {
        self.email.anonymize_domain = anonymize;
        self
    }

    pub fn build(self) -> Email {
        self.email
    }
}
