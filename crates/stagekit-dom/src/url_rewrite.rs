//! Resource reference rewriting for exported and imported markup.
//!
//! Rewrites `src="..."` attributes and CSS `url(...)` references between
//! absolute and base-relative form. This is textual pattern matching over the
//! simple markup components produce, not an HTML/CSS parser: references split
//! across entities, unquoted `src` values and nested parentheses inside
//! `url()` are passed through untouched.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use tracing::trace;
use url::Url;

lazy_static! {
    static ref SRC_ATTR: Regex =
        Regex::new(r#"src\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid src pattern");
    static ref CSS_URL: Regex =
        Regex::new(r#"url\(\s*(?:"([^"]*)"|'([^']*)'|([^)"'\s]+))\s*\)"#)
            .expect("valid url() pattern");
}

/// Rewrite absolute references under `base` to relative ones.
///
/// References on another origin, or that are already relative, are kept.
pub fn to_relative(html: &str, base: &Url) -> String {
    rewrite(html, |reference| relative_reference(reference, base))
}

/// Resolve relative references against `base`.
pub fn to_absolute(html: &str, base: &Url) -> String {
    rewrite(html, |reference| absolute_reference(reference, base))
}

fn is_opaque(reference: &str) -> bool {
    reference.is_empty()
        || reference.starts_with('#')
        || reference.starts_with("data:")
        || reference.contains("&quot;")
}

fn relative_reference(reference: &str, base: &Url) -> Option<String> {
    if is_opaque(reference) {
        return None;
    }
    let target = Url::parse(reference).ok()?;
    let relative = base.make_relative(&target)?;
    if relative.is_empty() {
        return None;
    }
    Some(relative)
}

fn absolute_reference(reference: &str, base: &Url) -> Option<String> {
    if is_opaque(reference) || Url::parse(reference).is_ok() {
        return None;
    }
    match base.join(reference) {
        Ok(url) => Some(url.into()),
        Err(error) => {
            trace!(reference, %error, "Leaving unresolvable reference as is");
            None
        }
    }
}

/// Reference and quote character of the first matching alternative.
fn captured<'a>(caps: &Captures<'a>) -> Option<(&'a str, &'static str)> {
    [(1, "\""), (2, "'"), (3, "")]
        .into_iter()
        .find_map(|(group, quote)| caps.get(group).map(|m| (m.as_str(), quote)))
}

fn rewrite(html: &str, resolve: impl Fn(&str) -> Option<String>) -> String {
    let pass = SRC_ATTR.replace_all(html, |caps: &Captures<'_>| {
        match captured(caps).and_then(|(reference, quote)| Some((resolve(reference)?, quote))) {
            Some((rewritten, quote)) => format!("src={quote}{rewritten}{quote}"),
            None => caps[0].to_string(),
        }
    });
    CSS_URL
        .replace_all(&pass, |caps: &Captures<'_>| {
            match captured(caps).and_then(|(reference, quote)| Some((resolve(reference)?, quote))) {
                Some((rewritten, quote)) => format!("url({quote}{rewritten}{quote})"),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
