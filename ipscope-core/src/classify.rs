//! Lexical query classification.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::QueryKind;

/// Single second-level label of 3-63 characters under an alphabetic TLD.
///
/// Multi-label names (`www.example.com`) and labels shorter than three
/// characters do not match and are forwarded to the provider as IP literals.
const DOMAIN_PATTERN: &str = r"^[a-zA-Z0-9][a-zA-Z0-9-]{1,61}[a-zA-Z0-9]\.[a-zA-Z]{2,}$";

const IPV4_PATTERN: &str = r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$";

const IPV6_PATTERN: &str = r"^(?:[0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}$";

#[allow(clippy::expect_used)]
static DOMAIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DOMAIN_PATTERN).expect("domain pattern compiles"));

#[allow(clippy::expect_used)]
static IPV4_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(IPV4_PATTERN).expect("IPv4 pattern compiles"));

#[allow(clippy::expect_used)]
static IPV6_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(IPV6_PATTERN).expect("IPv6 pattern compiles"));

/// Classify a trimmed query as a domain name or an IP literal.
///
/// Total over any input; anything that is not a domain is an IP literal.
pub fn classify(query: &str) -> QueryKind {
    if DOMAIN_RE.is_match(query) {
        QueryKind::Domain
    } else {
        QueryKind::IpLiteral
    }
}

/// Whether `ip` is a dotted-quad IPv4 address or a fully expanded IPv6 address.
///
/// Compressed IPv6 forms (`::1`) are not accepted.
pub fn is_valid_ip(ip: &str) -> bool {
    IPV4_RE.is_match(ip) || IPV6_RE.is_match(ip)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_domains() {
        assert_eq!(classify("google.com"), QueryKind::Domain);
        assert_eq!(classify("example.org"), QueryKind::Domain);
        assert_eq!(classify("my-site.io"), QueryKind::Domain);
        assert_eq!(classify("123abc.network"), QueryKind::Domain);
    }

    #[test]
    fn test_classify_ip_literals() {
        assert_eq!(classify("8.8.8.8"), QueryKind::IpLiteral);
        assert_eq!(classify("2606:4700:4700::1111"), QueryKind::IpLiteral);
        assert_eq!(classify("192.168.0.1"), QueryKind::IpLiteral);
    }

    #[test]
    fn test_classify_unmatched_strings_are_ip_literals() {
        assert_eq!(classify(""), QueryKind::IpLiteral);
        assert_eq!(classify("not a domain"), QueryKind::IpLiteral);
        assert_eq!(classify("localhost"), QueryKind::IpLiteral);
        assert_eq!(classify("-bad.com"), QueryKind::IpLiteral);
        assert_eq!(classify("bad-.com"), QueryKind::IpLiteral);
        assert_eq!(classify("example.c0m"), QueryKind::IpLiteral);
    }

    #[test]
    fn test_classify_known_lexical_limits() {
        // Multi-label names and short labels fall outside the pattern.
        assert_eq!(classify("www.google.com"), QueryKind::IpLiteral);
        assert_eq!(classify("x.com"), QueryKind::IpLiteral);
        assert_eq!(classify("ab.io"), QueryKind::IpLiteral);
        assert_eq!(classify("abc.io"), QueryKind::Domain);
    }

    #[test]
    fn test_classify_label_length_bounds() {
        let longest = format!("a{}a.com", "b".repeat(61));
        assert_eq!(classify(&longest), QueryKind::Domain);
        let too_long = format!("a{}a.com", "b".repeat(62));
        assert_eq!(classify(&too_long), QueryKind::IpLiteral);
    }

    #[test]
    fn test_is_valid_ip() {
        assert!(is_valid_ip("8.8.8.8"));
        assert!(is_valid_ip("255.255.255.255"));
        assert!(is_valid_ip("2001:0db8:0000:0000:0000:ff00:0042:8329"));
        assert!(!is_valid_ip("256.1.1.1"));
        assert!(!is_valid_ip("1.2.3"));
        assert!(!is_valid_ip("::1"));
        assert!(!is_valid_ip("google.com"));
    }
}
