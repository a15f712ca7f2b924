use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Bytes left unescaped when quoting a path segment.
/// Alphanumerics plus `_ . - ~` and `/`; everything else, `@` included, is escaped.
const PATH_QUOTE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// Normalize an email address by lower-casing its domain part
///
/// The address is split on the last `@`. The local part is kept as-is since
/// mailbox names may be case-sensitive. A value without `@` is returned
/// unchanged.
pub fn normalize_email(email: &str) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// Percent-encode a value for use inside a URL path
pub fn urlquote(value: &str) -> String {
    utf8_percent_encode(value, PATH_QUOTE).to_string()
}
