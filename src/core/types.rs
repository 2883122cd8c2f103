use serde::{Deserialize, Serialize};

/// Compatibility tier guessed for a wad, or the tier a port's runs require.
///
/// The text forms are what the tier cache stores, so `Display` and
/// [`Tier::parse`] must stay in sync with files written by earlier syncs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "limit-removing")]
    LimitRemoving,
    #[serde(rename = "Boom")]
    Boom,
    #[serde(rename = "MBF")]
    Mbf,
    /// Generic PrBoom/PrBoom+ without a usable complevel.
    /// Only lives inside an estimation pass, never in a cache entry.
    #[serde(rename = "PrBoom")]
    PrBoom,
    #[serde(rename = "Doom 64")]
    Doom64,
    #[serde(rename = "GZDoom")]
    GzDoom,
    #[serde(rename = "ZDaemon")]
    ZDaemon,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl Tier {
    /// Tiers PrBoom+ can emulate through a complevel, in redistribution priority order
    pub const PRBOOM_RESOLVABLE: [Tier; 3] = [Tier::LimitRemoving, Tier::Boom, Tier::Mbf];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LimitRemoving => "limit-removing",
            Self::Boom => "Boom",
            Self::Mbf => "MBF",
            Self::PrBoom => "PrBoom",
            Self::Doom64 => "Doom 64",
            Self::GzDoom => "GZDoom",
            Self::ZDaemon => "ZDaemon",
            Self::Unknown => "Unknown",
        }
    }

    /// Parse the cached text form of a tier
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "limit-removing" => Some(Self::LimitRemoving),
            "Boom" => Some(Self::Boom),
            "MBF" => Some(Self::Mbf),
            "PrBoom" => Some(Self::PrBoom),
            "Doom 64" => Some(Self::Doom64),
            "GZDoom" => Some(Self::GzDoom),
            "ZDaemon" => Some(Self::ZDaemon),
            "Unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_transient(self) -> bool {
        matches!(self, Self::PrBoom)
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of entity a name lookup is performed against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Wad,
    /// Wad looked up in the tier cache rather than the URL cache
    WadCompat,
}

impl EntityKind {
    /// Noun used in ambiguity listings ("Found 3 matching wads!")
    pub fn noun(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Wad | Self::WadCompat => "wad",
        }
    }

    /// Message reported when resolution finds nothing
    pub fn not_found_message(self) -> &'static str {
        match self {
            Self::Player => "No matching player found!",
            Self::Wad => "Wad name not found!",
            Self::WadCompat => "Wad compat not found!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_text_round_trip() {
        for tier in [
            Tier::LimitRemoving,
            Tier::Boom,
            Tier::Mbf,
            Tier::PrBoom,
            Tier::Doom64,
            Tier::GzDoom,
            Tier::ZDaemon,
            Tier::Unknown,
        ] {
            assert_eq!(Tier::parse(&tier.to_string()), Some(tier));
        }
    }

    #[test]
    fn test_tier_parse_rejects_unknown_text() {
        assert_eq!(Tier::parse("boom"), None);
        assert_eq!(Tier::parse("Doom64"), None);
    }

    #[test]
    fn test_tier_serializes_as_cache_text() {
        let json = serde_json::to_string(&Tier::Doom64).unwrap();
        assert_eq!(json, "\"Doom 64\"");
    }
}
