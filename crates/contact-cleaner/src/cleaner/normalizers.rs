//! Canonicalisation of single field values.
//!
//! Every function here is total: any input, including an empty one, yields
//! a (possibly empty) string. Validity is judged later by the validators.
//! All normalisers are idempotent.

/// UK national trunk prefix.
const TRUNK_PREFIX: char = '0';
/// Country calling code that replaces the trunk prefix.
const COUNTRY_CODE: &str = "+44";
/// Digits following the trunk prefix in a full national number.
pub(crate) const NATIONAL_DIGITS: usize = 10;

/// Trim and collapse internal whitespace runs to a single space.
pub fn normalize_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a person's name.
///
/// Each word is title-cased, and each hyphen-separated part of a word is
/// capitalised on its own: `"amy-walker"` becomes `"Amy-Walker"`.
pub fn normalize_name(raw: &str) -> String {
    normalize_text(raw)
        .split(' ')
        .map(|word| {
            word.split('-')
                .map(capitalize)
                .collect::<Vec<_>>()
                .join("-")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize a company name.
///
/// Title-case with a word boundary at every non-alphabetic character, so
/// `"o'brien & sons ltd"` becomes `"O'Brien & Sons Ltd"`.
pub fn normalize_company(raw: &str) -> String {
    let text = normalize_text(raw).to_lowercase();
    let mut out = String::with_capacity(text.len());
    let mut at_boundary = true;

    for c in text.chars() {
        if c.is_alphabetic() {
            if at_boundary {
                push_title(&mut out, c);
            } else {
                out.push(c);
            }
            at_boundary = false;
        } else {
            out.push(c);
            at_boundary = true;
        }
    }
    out
}

/// Normalize an email address: trimmed, whitespace collapsed, lowercased.
///
/// Internal whitespace is kept (collapsed) so the validator can still
/// reject it.
pub fn normalize_email(raw: &str) -> String {
    normalize_text(raw).to_lowercase()
}

/// Normalize a phone number to digits, keeping a leading `+`.
///
/// A national number (`0` followed by exactly 10 digits) is rewritten to
/// international form: `07123 456789` becomes `+447123456789`. Anything
/// else is left as extracted.
pub fn normalize_phone(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut phone = String::with_capacity(trimmed.len());
    if trimmed.starts_with('+') {
        phone.push('+');
    }
    phone.extend(trimmed.chars().filter(|c| c.is_ascii_digit()));

    if let Some(national) = phone.strip_prefix(TRUNK_PREFIX)
        && national.len() == NATIONAL_DIGITS
    {
        return format!("{COUNTRY_CODE}{national}");
    }
    phone
}

fn capitalize(part: &str) -> String {
    let lower = part.to_lowercase();
    let mut out = String::with_capacity(lower.len());
    let mut chars = lower.chars();
    if let Some(first) = chars.next() {
        push_title(&mut out, first);
    }
    out.extend(chars);
    out
}

/// Push the title-case form of `c`: only the first char of its uppercase
/// expansion stays upper, so `'ﬁ'` becomes `"Fi"` rather than `"FI"`.
fn push_title(out: &mut String, c: char) {
    let mut upper = c.to_uppercase();
    if let Some(first) = upper.next() {
        out.push(first);
    }
    out.extend(upper.flat_map(char::to_lowercase));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Acme \t  Widgets \n"), "Acme Widgets");
        assert_eq!(normalize_text("   "), "");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name(" alice "), "Alice");
        assert_eq!(normalize_name("JOHN   smith"), "John Smith");
        assert_eq!(normalize_name("amy-walker"), "Amy-Walker");
        assert_eq!(normalize_name("mary-jane o'neil"), "Mary-Jane O'neil");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn test_normalize_company() {
        assert_eq!(normalize_company("  acme   LTD "), "Acme Ltd");
        assert_eq!(normalize_company("o'brien & sons"), "O'Brien & Sons");
        assert_eq!(normalize_company("3m uk"), "3M Uk");
    }

    #[test]
    fn test_multi_char_uppercase_initials() {
        assert_eq!(normalize_name("ﬁnch ltd"), "Finch Ltd");
        assert_eq!(normalize_company("ﬁnch ltd"), "Finch Ltd");
        assert_eq!(normalize_name("ßauer"), "Ssauer");
        assert_eq!(normalize_company("ßauer gmbh"), "Ssauer Gmbh");
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  ALICE@X.COM "), "alice@x.com");
        assert_eq!(normalize_email("Bob @Example.com"), "bob @example.com");
    }

    #[test]
    fn test_normalize_phone_national_to_international() {
        assert_eq!(normalize_phone("07123456789"), "+447123456789");
        assert_eq!(normalize_phone("07123 456 789"), "+447123456789");
        assert_eq!(normalize_phone("(0712) 345-6789"), "+447123456789");
    }

    #[test]
    fn test_normalize_phone_keeps_leading_plus_only() {
        assert_eq!(normalize_phone("+44 7123 456789"), "+447123456789");
        assert_eq!(normalize_phone("0044+7123"), "00447123");
        assert_eq!(normalize_phone("  +1 (555) 010-0000"), "+15550100000");
    }

    #[test]
    fn test_normalize_phone_short_numbers_untouched() {
        assert_eq!(normalize_phone("0123"), "0123");
        assert_eq!(normalize_phone("020 7946 09581"), "020794609581");
        assert_eq!(normalize_phone("n/a"), "");
        assert_eq!(normalize_phone(""), "");
    }

    #[test]
    fn test_normalizers_are_idempotent() {
        let samples = [
            "  alice  SMITH-jones ",
            "O'BRIEN & sons ltd",
            " ALICE@X.COM ",
            "07123 456789",
            "+44 (0)7123 456789",
            "ﬁnch ltd",
            "ßauer-ﬂint gmbh",
            "ǅemal İpek",
            "xİy co",
            "",
            "  ",
        ];
        for s in samples {
            let name = normalize_name(s);
            assert_eq!(normalize_name(&name), name, "name: {s:?}");
            let company = normalize_company(s);
            assert_eq!(normalize_company(&company), company, "company: {s:?}");
            let email = normalize_email(s);
            assert_eq!(normalize_email(&email), email, "email: {s:?}");
            let phone = normalize_phone(s);
            assert_eq!(normalize_phone(&phone), phone, "phone: {s:?}");
        }
    }
}
