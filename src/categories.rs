//! AbuseIPDB report categories.
//!
//! The registry is a fixed table. Ids are kept as strings and compared
//! as strings, so `"013"` is not the same category as `"13"`.

use crate::error::{Error, Result};

/// A report category known to the AbuseIPDB API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Category {
    short_name: &'static str,
    id: &'static str,
    name: &'static str,
    allowed_alone: bool,
}

impl Category {
    const fn new(
        short_name: &'static str,
        id: &'static str,
        name: &'static str,
        allowed_alone: bool,
    ) -> Self {
        Self {
            short_name,
            id,
            name,
            allowed_alone,
        }
    }

    /// Short name, e.g. `"brute"`.
    pub fn short_name(&self) -> &'static str {
        self.short_name
    }

    /// Numeric id in its canonical string form, e.g. `"18"`.
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Display name, e.g. `"Brute-Force"`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the category may be the only one in a report.
    pub fn allowed_alone(&self) -> bool {
        self.allowed_alone
    }
}

static CATEGORIES: [Category; 23] = [
    // Altering DNS records resulting in improper redirection.
    Category::new("dns-c", "1", "DNS Compromise", true),
    // Falsifying domain server cache (cache poisoning).
    Category::new("dns-p", "2", "DNS Poisoning", true),
    Category::new("fraud-orders", "3", "Fraud Orders", true),
    // Usually part of a botnet.
    Category::new("ddos", "4", "DDoS Attack", true),
    Category::new("ftp-bf", "5", "FTP Brute-Force", true),
    // Oversized IP packet.
    Category::new("pingdeath", "6", "Ping of Death", true),
    Category::new("phishing", "7", "Phishing", true),
    Category::new("fraudvoip", "8", "Fraud VoIP", true),
    // Open proxy, open relay, or Tor exit node.
    Category::new("openproxy", "9", "Open Proxy", true),
    Category::new("webspam", "10", "Web Spam", true),
    Category::new("emailspam", "11", "Email Spam", true),
    Category::new("blogspam", "12", "Blog Spam", true),
    // Conjunctive category.
    Category::new("vpnip", "13", "VPN IP", false),
    Category::new("scan", "14", "Port Scan", true),
    Category::new("hack", "15", "Hacking", true),
    Category::new("sql", "16", "SQL Injection", true),
    // Email sender spoofing.
    Category::new("spoof", "17", "Spoofing", true),
    // Credential brute-force on logins and services (SSH, FTP, SIP, SMTP, RDP...).
    Category::new("brute", "18", "Brute-Force", true),
    Category::new("badbot", "19", "Bad Web Bot", true),
    Category::new("explhost", "20", "Exploited Host", true),
    Category::new("webattack", "21", "Web App Attack", true),
    // Must be combined with a more specific category.
    Category::new("ssh", "22", "SSH", false),
    Category::new("iot", "23", "IoT Targeted", true),
];

/// Full registry, in id order.
pub fn list_categories() -> &'static [Category] {
    &CATEGORIES
}

/// Look up a category by short name.
pub fn find_by_short_name(name: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.short_name == name)
}

/// Look up a category by numeric id (string comparison).
pub fn find_by_id(id: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.id == id)
}

/// Get the category id for a short name.
pub fn category_id_by_name(name: &str) -> Option<&'static str> {
    find_by_short_name(name).map(Category::id)
}

/// Get the short name for a category id.
pub fn category_name_by_id(id: &str) -> Option<&'static str> {
    find_by_id(id).map(Category::short_name)
}

/// Resolve a single token: all-digit tokens are ids, anything else a short name.
fn resolve_token(token: &str) -> Option<&'static Category> {
    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        find_by_id(token)
    } else {
        find_by_short_name(token)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pairing {
    Unset,
    Satisfied,
    NeedsPairing,
}

/// Validate a comma separated category selection and return it as
/// comma joined ids, in input order.
///
/// Tokens may be ids or short names and are trimmed. A category that is
/// not allowed alone must be accompanied by at least one category that is;
/// two such categories do not satisfy each other. Once an allowed-alone
/// category has been seen the check is settled for the rest of the list.
pub fn resolve_report_categories(input: &str) -> Result<String> {
    if input.trim().is_empty() {
        return Err(Error::InvalidCategory(input.to_string()));
    }

    let mut ids = Vec::new();
    let mut pairing = Pairing::Unset;

    for token in input.split(',').map(str::trim) {
        let category =
            resolve_token(token).ok_or_else(|| Error::InvalidCategory(token.to_string()))?;

        if pairing != Pairing::Satisfied {
            pairing = if category.allowed_alone {
                Pairing::Satisfied
            } else {
                Pairing::NeedsPairing
            };
        }

        ids.push(category.id);
    }

    if pairing == Pairing::NeedsPairing {
        return Err(Error::StandaloneCategory(input.to_string()));
    }

    Ok(ids.join(","))
}
