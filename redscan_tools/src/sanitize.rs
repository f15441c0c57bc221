//! Input validation for values that end up inside a `sh -c` command line.
//!
//! Everything a caller supplies passes through here before a builder splices
//! it into a command string. The rules are allow-lists: a value either
//! matches the narrow shape the field needs (hostname, port spec, path) or
//! it is rejected. Free-form argument strings get a deny-list of shell
//! metacharacters instead, and payload values that legitimately need
//! arbitrary bytes are single-quoted with [`escape_shell_arg`].

use crate::error::{Result, ToolError};
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Upper bound on any single caller-supplied value. Longer input is almost
/// certainly abuse and would bloat log lines anyway.
const MAX_VALUE_LEN: usize = 2048;

fn target_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Hostnames, IPv4, IPv6 (colons), CIDR suffixes.
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._:/\-]*$").expect("target regex must compile")
    })
}

fn ports_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // nmap port specs: "80", "1-1024", "22,80,443", "U:53,T:21-25".
        Regex::new(r"^[TU:0-9,\-]+$").expect("ports regex must compile")
    })
}

fn path_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._~/\-]+$").expect("path regex must compile")
    })
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Usernames, service names, hash format names, tag lists.
        Regex::new(r"^[A-Za-z0-9._@,\-]+$").expect("identifier regex must compile")
    })
}

fn check_len(field: &'static str, value: &str) -> Result<()> {
    if value.len() > MAX_VALUE_LEN {
        return Err(ToolError::invalid(field, "value is too long"));
    }
    Ok(())
}

/// Validates a scan target: hostname, IPv4/IPv6 address, or CIDR range.
pub fn validate_target(field: &'static str, value: &str) -> Result<()> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ToolError::MissingParameter(field));
    }
    check_len(field, value)?;
    if !target_pattern().is_match(value) {
        return Err(ToolError::invalid(
            field,
            "must be a hostname, IP address, or CIDR range",
        ));
    }
    Ok(())
}

/// Validates an nmap-style port specification.
pub fn validate_ports(field: &'static str, value: &str) -> Result<()> {
    check_len(field, value)?;
    if value.is_empty() || !ports_pattern().is_match(value) {
        return Err(ToolError::invalid(
            field,
            "must be a port list or range like 80,443 or 1-1024",
        ));
    }
    Ok(())
}

/// Validates an http(s) URL and rejects anything the `url` parser cannot
/// make sense of or that carries a non-web scheme.
pub fn validate_url(field: &'static str, value: &str) -> Result<()> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ToolError::MissingParameter(field));
    }
    check_len(field, value)?;
    let parsed =
        Url::parse(value).map_err(|e| ToolError::invalid(field, format!("not a valid URL: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ToolError::invalid(field, "URL scheme must be http or https"));
    }
    if parsed.host_str().is_none() {
        return Err(ToolError::invalid(field, "URL must include a host"));
    }
    Ok(())
}

/// Validates a filesystem path argument (wordlists, hash files).
pub fn validate_file_path(field: &'static str, value: &str) -> Result<()> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ToolError::MissingParameter(field));
    }
    check_len(field, value)?;
    if !path_pattern().is_match(value) {
        return Err(ToolError::invalid(
            field,
            "path contains characters outside [A-Za-z0-9._~/-]",
        ));
    }
    Ok(())
}

/// Validates short identifier-like values: usernames, service names, hash
/// formats, comma-separated tag lists.
pub fn validate_identifier(field: &'static str, value: &str) -> Result<()> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ToolError::MissingParameter(field));
    }
    check_len(field, value)?;
    if !identifier_pattern().is_match(value) {
        return Err(ToolError::invalid(
            field,
            "contains characters outside [A-Za-z0-9._@,-]",
        ));
    }
    Ok(())
}

/// Validates a free-form extra-arguments string. Flags and values are
/// allowed; anything that could break out of the command (substitution,
/// pipes, redirection, chaining) is rejected outright.
pub fn validate_extra_args(field: &'static str, value: &str) -> Result<()> {
    check_len(field, value)?;
    const FORBIDDEN: &[char] = &[';', '|', '&', '`', '$', '(', ')', '<', '>', '\n', '\r'];
    if let Some(c) = value.chars().find(|c| FORBIDDEN.contains(c)) {
        return Err(ToolError::invalid(
            field,
            format!("shell metacharacter '{c}' is not allowed"),
        ));
    }
    Ok(())
}

/// Wraps an arbitrary value in single quotes for safe interpolation into a
/// `sh -c` command line. Embedded single quotes are rewritten as `'\''`.
///
/// Used for values like POST bodies and passwords that legitimately contain
/// characters the allow-lists above would reject.
pub fn escape_shell_arg(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('\'');
    for c in value.chars() {
        if c == '\'' {
            escaped.push_str("'\\''");
        } else {
            escaped.push(c);
        }
    }
    escaped.push('\'');
    escaped
}
