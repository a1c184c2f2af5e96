// src/checker/reference.rs
// =============================================================================
// This module splits a link destination into its URI-reference parts.
//
// Markdown destinations are usually *relative* references ("docs/a.md#intro")
// which the `url` crate refuses to parse without a base. We only need to know:
// - does it have a scheme? (decides relative vs absolute)
// - what is its path? (decides which document it points at)
// - what is its fragment? (decides which heading it points at)
//
// so we split it ourselves following RFC 3986:
//
//   scheme ":" "//" authority path "?" query "#" fragment
//
// Percent-escapes in the path and fragment are decoded. Anything a strict
// URI parser would reject is an error, and the caller drops the link.
// =============================================================================

use thiserror::Error;

// Why a destination could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("invalid control character in URL")]
    ControlCharacter,
    #[error("missing protocol scheme")]
    MissingScheme,
    #[error("first path segment in URL cannot contain colon")]
    ColonInFirstSegment,
    #[error("invalid URL escape {0:?}")]
    InvalidEscape(String),
    #[error("invalid port {0:?} after host")]
    InvalidPort(String),
    #[error("invalid host {0:?}")]
    InvalidHost(String),
}

/// A parsed URI reference.
///
/// `path` and `fragment` are percent-decoded. `fragment` is empty when the
/// destination has no `#`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reference {
    /// Lowercased scheme, `None` for relative references.
    pub scheme: Option<String>,
    /// Raw authority for `//host` references.
    pub authority: Option<String>,
    /// Decoded hierarchical path. Empty for opaque references like `mailto:`.
    pub path: String,
    pub fragment: String,
}

impl Reference {
    /// Parses a destination exactly as written in the document.
    pub fn parse(raw: &str) -> Result<Self, ReferenceError> {
        if raw.chars().any(|c| c.is_ascii_control()) {
            return Err(ReferenceError::ControlCharacter);
        }

        let (rest, fragment) = match raw.split_once('#') {
            Some((rest, fragment)) => (rest, unescape(fragment)?),
            None => (raw, String::new()),
        };

        let (scheme, rest) = split_scheme(rest)?;

        // The query never matters for resolution, only where it starts
        let rest = rest.split_once('?').map_or(rest, |(before, _)| before);

        let mut reference = Reference {
            scheme,
            fragment,
            ..Reference::default()
        };

        if !rest.starts_with('/') {
            if reference.scheme.is_some() {
                // Opaque reference such as mailto:someone@example.com
                return Ok(reference);
            }
            let first_segment = rest.split('/').next().unwrap_or_default();
            if first_segment.contains(':') {
                return Err(ReferenceError::ColonInFirstSegment);
            }
        }

        // "///x" without a scheme is a path, not an empty authority
        let authority_and_path = if reference.scheme.is_some() || !rest.starts_with("///") {
            rest.strip_prefix("//")
        } else {
            None
        };

        let path = match authority_and_path {
            Some(after) => {
                let (authority, path) = match after.find('/') {
                    Some(i) => after.split_at(i),
                    None => (after, ""),
                };
                validate_authority(authority)?;
                reference.authority = Some(authority.to_string());
                path
            }
            None => rest,
        };

        reference.path = unescape(path)?;
        Ok(reference)
    }

    /// A reference without a scheme points into the document corpus.
    pub fn is_relative(&self) -> bool {
        self.scheme.is_none()
    }
}

// Splits "scheme:rest" if the prefix is a valid scheme
//
// A scheme is a letter followed by letters, digits, '+', '-' or '.'.
// When a character outside that set shows up before the ':' there is no scheme
// at all (e.g. "./a:b" or "a b:c").
fn split_scheme(raw: &str) -> Result<(Option<String>, &str), ReferenceError> {
    for (i, c) in raw.char_indices() {
        match c {
            'a'..='z' | 'A'..='Z' => {}
            '0'..='9' | '+' | '-' | '.' => {
                if i == 0 {
                    return Ok((None, raw));
                }
            }
            ':' => {
                if i == 0 {
                    return Err(ReferenceError::MissingScheme);
                }
                return Ok((Some(raw[..i].to_ascii_lowercase()), &raw[i + 1..]));
            }
            _ => return Ok((None, raw)),
        }
    }
    Ok((None, raw))
}

fn validate_authority(authority: &str) -> Result<(), ReferenceError> {
    let host_port = authority
        .rsplit_once('@')
        .map_or(authority, |(_userinfo, host)| host);

    let port = if let Some(bracketed) = host_port.strip_prefix('[') {
        let (_ip, after) = bracketed
            .split_once(']')
            .ok_or_else(|| ReferenceError::InvalidHost(host_port.to_string()))?;
        if !after.is_empty() && !after.starts_with(':') {
            return Err(ReferenceError::InvalidHost(host_port.to_string()));
        }
        after.strip_prefix(':')
    } else {
        host_port.rsplit_once(':').map(|(_, port)| port)
    };

    if let Some(port) = port {
        if !port.chars().all(|c| c.is_ascii_digit()) {
            return Err(ReferenceError::InvalidPort(format!(":{port}")));
        }
    }

    unescape(host_port).map(|_| ())
}

// Decodes %XX escapes. A '%' not followed by two hex digits is an error.
fn unescape(s: &str) -> Result<String, ReferenceError> {
    if !s.contains('%') {
        return Ok(s.to_string());
    }

    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3);
            let decoded = escape
                .filter(|hex| hex.iter().all(u8::is_ascii_hexdigit))
                .and_then(|hex| std::str::from_utf8(hex).ok())
                .and_then(|hex| u8::from_str_radix(hex, 16).ok());
            match decoded {
                Some(byte) => {
                    out.push(byte);
                    i += 3;
                }
                None => {
                    let end = (i + 3).min(bytes.len());
                    return Err(ReferenceError::InvalidEscape(
                        String::from_utf8_lossy(&bytes[i..end]).into_owned(),
                    ));
                }
            }
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    Ok(String::from_utf8_lossy(&out).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_with_fragment() {
        let r = Reference::parse("b.md#intro").unwrap();
        assert!(r.is_relative());
        assert_eq!(r.path, "b.md");
        assert_eq!(r.fragment, "intro");
    }

    #[test]
    fn test_absolute_url() {
        let r = Reference::parse("HTTPS://example.com:8443/docs?q=1#top").unwrap();
        assert_eq!(r.scheme.as_deref(), Some("https"));
        assert_eq!(r.authority.as_deref(), Some("example.com:8443"));
        assert_eq!(r.path, "/docs");
        assert_eq!(r.fragment, "top");
        assert!(!r.is_relative());
    }

    #[test]
    fn test_mailto_is_opaque() {
        let r = Reference::parse("mailto:a@b.com").unwrap();
        assert_eq!(r.scheme.as_deref(), Some("mailto"));
        assert!(!r.is_relative());
        assert_eq!(r.path, "");
        assert_eq!(r.fragment, "");
    }

    #[test]
    fn test_empty_destination() {
        let r = Reference::parse("").unwrap();
        assert!(r.is_relative());
        assert_eq!(r.path, "");
        assert_eq!(r.fragment, "");
    }

    #[test]
    fn test_fragment_only() {
        let r = Reference::parse("#section").unwrap();
        assert!(r.is_relative());
        assert_eq!(r.path, "");
        assert_eq!(r.fragment, "section");
    }

    #[test]
    fn test_query_is_dropped_from_path() {
        let r = Reference::parse("../guide.md?plain=1").unwrap();
        assert_eq!(r.path, "../guide.md");
    }

    #[test]
    fn test_percent_escapes_decoded() {
        let r = Reference::parse("my%20notes.md#caf%C3%A9").unwrap();
        assert_eq!(r.path, "my notes.md");
        assert_eq!(r.fragment, "café");
    }

    #[test]
    fn test_scheme_needs_leading_letter() {
        let r = Reference::parse("./a:b.md").unwrap();
        assert!(r.is_relative());
        assert_eq!(r.path, "./a:b.md");
    }

    #[test]
    fn test_rejects_malformed_destinations() {
        assert_eq!(Reference::parse(":nothing"), Err(ReferenceError::MissingScheme));
        assert_eq!(
            Reference::parse("1ab:c/d"),
            Err(ReferenceError::ColonInFirstSegment)
        );
        assert!(matches!(
            Reference::parse("bad%zzescape.md"),
            Err(ReferenceError::InvalidEscape(_))
        ));
        assert!(matches!(
            Reference::parse("http://host:port/"),
            Err(ReferenceError::InvalidPort(_))
        ));
        assert_eq!(
            Reference::parse("line\nbreak"),
            Err(ReferenceError::ControlCharacter)
        );
    }

    #[test]
    fn test_numeric_port_accepted() {
        let r = Reference::parse("http://localhost:0123456789").unwrap();
        assert_eq!(r.authority.as_deref(), Some("localhost:0123456789"));
        assert_eq!(r.path, "");
    }
}
