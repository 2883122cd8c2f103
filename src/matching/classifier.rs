use regex::Regex;

use crate::core::types::Tier;

/// Port rules in evaluation order.
///
/// The prefixes do not overlap, so at most one rule matches any label; the
/// order is still fixed so that a future overlapping rule has a defined
/// outcome.
const PORT_RULES: &[(&str, Tier)] = &[
    // Original Boom releases
    (r"^Boom.*$", Tier::Boom),
    (r"^CDooM.*$", Tier::LimitRemoving),
    (r"^Chocolate DooM.*$", Tier::LimitRemoving),
    (r"^CNDoom.*$", Tier::LimitRemoving),
    (r"^Crispy Doom.*$", Tier::LimitRemoving),
    // Vanilla Doom, Doom 2 and Final Doom executables
    (r"^DooM2? v1.\d+\.?\d*f?$", Tier::LimitRemoving),
    (r"^DooM2? v95f?$", Tier::LimitRemoving),
    (r"^Doom64 EX.*$", Tier::Doom64),
    (r"^Doomsday.*$", Tier::Unknown),
    (r"^DosDooM.*$", Tier::LimitRemoving),
    (r"^TasDooM.*$", Tier::LimitRemoving),
    // Sits between PrBoom and ZDoom, no single tier fits
    (r"^Eternity.*$", Tier::Unknown),
    (r"^GZDoom.*$", Tier::GzDoom),
    (r"^Legacy.*$", Tier::Unknown),
    (r"^ManDoom.*$", Tier::GzDoom),
    (r"^MBF.*$", Tier::Mbf),
    (r"^TASMBF.*$", Tier::Mbf),
    // PrBoom and PrBoom+; the complevel, when given, decides the tier
    (r"^PRBoom.*$", Tier::PrBoom),
    (r"^Strawberry DooM.*$", Tier::LimitRemoving),
    (r"^ZDaemon.*$", Tier::ZDaemon),
    (r"^ZDoom.*$", Tier::GzDoom),
];

/// Maps source port labels to compatibility tiers
#[derive(Debug, Clone)]
pub struct PortClassifier {
    rules: Vec<(Regex, Tier)>,
}

impl PortClassifier {
    pub fn new() -> Self {
        let rules = PORT_RULES
            .iter()
            .map(|(pattern, tier)| {
                let regex = Regex::new(pattern).expect("port rule patterns are valid");
                (regex, *tier)
            })
            .collect();
        Self { rules }
    }

    /// Tier of the first rule matching the label, before complevel resolution
    pub fn family(&self, port: &str) -> Option<Tier> {
        self.rules
            .iter()
            .find(|(regex, _)| regex.is_match(port))
            .map(|(_, tier)| *tier)
    }

    /// Resolved tier of a port label, `None` when no rule recognizes it
    pub fn classify(&self, port: &str) -> Option<Tier> {
        match self.family(port)? {
            Tier::PrBoom => Some(complevel_tier(port)),
            tier => Some(tier),
        }
    }

    /// Whether runs recorded with `port` count for a wad guessed as `compat`.
    /// PrBoom family ports pass regardless of complevel.
    pub fn accepts(&self, port: &str, compat: Tier) -> bool {
        if compat == Tier::Unknown {
            return true;
        }
        match self.family(port) {
            Some(Tier::PrBoom) => true,
            Some(tier) => tier == compat,
            None => false,
        }
    }

    /// Number of rules matching a label; exactly one for any recognized port
    #[cfg(test)]
    fn match_count(&self, port: &str) -> usize {
        self.rules.iter().filter(|(regex, _)| regex.is_match(port)).count()
    }
}

impl Default for PortClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Tier implied by a PrBoom label's `cl<N>` complevel suffix
fn complevel_tier(port: &str) -> Tier {
    let Some(level) = port.split("cl").nth(1) else {
        return Tier::PrBoom;
    };
    match level.trim().parse::<i64>() {
        Ok(0..=6) => Tier::LimitRemoving,
        Ok(7..=10) => Tier::Boom,
        Ok(11) => Tier::Mbf,
        _ => Tier::PrBoom,
    }
}
