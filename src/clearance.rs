// clearance.rs
// Purpose: the fixed clearance hierarchy and the registry that describes it

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Short code identifying an authority tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClearanceCode {
    OS,
    DA,
    CA,
    SA,
    RA,
    LA,
    XA,
    AA,
}

impl ClearanceCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ClearanceCode::OS => "OS",
            ClearanceCode::DA => "DA",
            ClearanceCode::CA => "CA",
            ClearanceCode::SA => "SA",
            ClearanceCode::RA => "RA",
            ClearanceCode::LA => "LA",
            ClearanceCode::XA => "XA",
            ClearanceCode::AA => "AA",
        }
    }
}

impl FromStr for ClearanceCode {
    type Err = ();

    // Codes are matched exactly; "ra" is not a clearance token.
    fn from_str(input: &str) -> Result<ClearanceCode, Self::Err> {
        match input {
            "OS" => Ok(ClearanceCode::OS),
            "DA" => Ok(ClearanceCode::DA),
            "CA" => Ok(ClearanceCode::CA),
            "SA" => Ok(ClearanceCode::SA),
            "RA" => Ok(ClearanceCode::RA),
            "LA" => Ok(ClearanceCode::LA),
            "XA" => Ok(ClearanceCode::XA),
            "AA" => Ok(ClearanceCode::AA),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ClearanceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One registry entry: a code and its human-readable level label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearanceDescriptor {
    pub code: ClearanceCode,
    pub label: String,
}

/// Ordered, read-only table of clearance tiers.
///
/// Entries are stored most senior first, so an entry's index is its rank:
/// lower rank means higher authority. The registry is built once at startup
/// and shared by reference; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct ClearanceRegistry {
    entries: Vec<ClearanceDescriptor>,
}

const STANDARD_LEVELS: [(ClearanceCode, &str); 8] = [
    (ClearanceCode::OS, "Level 5 System Access | Overseer System"),
    (ClearanceCode::DA, "Level 4 System Access | Director Access"),
    (ClearanceCode::CA, "Level 3 System Access | Command Access"),
    (ClearanceCode::SA, "Level 2 System Access | Security Access"),
    (ClearanceCode::RA, "Level 1 System Access | Restricted Access"),
    (ClearanceCode::LA, "Level 0 System Access | Limited Access"),
    (ClearanceCode::XA, "Level ∅ System Access | Experimental Access"),
    (ClearanceCode::AA, "Level Authorized Access | Automated Access"),
];

impl ClearanceRegistry {
    /// Build a registry from descriptors listed most senior first.
    ///
    /// A code listed twice keeps its first (most senior) position.
    pub fn new(descriptors: impl IntoIterator<Item = ClearanceDescriptor>) -> Self {
        let mut entries: Vec<ClearanceDescriptor> = Vec::new();
        for descriptor in descriptors {
            if !entries.iter().any(|e| e.code == descriptor.code) {
                entries.push(descriptor);
            }
        }
        Self { entries }
    }

    /// The hierarchy OS > DA > CA > SA > RA > LA > XA > AA.
    pub fn standard() -> Self {
        Self::new(STANDARD_LEVELS.iter().map(|(code, label)| ClearanceDescriptor {
            code: *code,
            label: (*label).to_string(),
        }))
    }

    pub fn describe(&self, code: ClearanceCode) -> Option<&str> {
        self.entry(code).map(|e| e.label.as_str())
    }

    pub fn rank(&self, code: ClearanceCode) -> Option<usize> {
        self.entries.iter().position(|e| e.code == code)
    }

    pub fn is_known(&self, code: ClearanceCode) -> bool {
        self.rank(code).is_some()
    }

    /// Parse a raw token and return it only if this registry knows it.
    pub fn lookup(&self, token: &str) -> Option<ClearanceCode> {
        token
            .parse::<ClearanceCode>()
            .ok()
            .filter(|code| self.is_known(*code))
    }

    pub fn descriptors(&self) -> &[ClearanceDescriptor] {
        &self.entries
    }

    fn entry(&self, code: ClearanceCode) -> Option<&ClearanceDescriptor> {
        self.entries.iter().find(|e| e.code == code)
    }
}

impl Default for ClearanceRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
