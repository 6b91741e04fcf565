use serde::{Deserialize, Serialize};

/// Priority class of a media resource.
///
/// Governs both admission order (higher weight first) and the number of
/// loads of that class allowed in flight at once.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Critical,
    High,
    Medium,
    Low,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Critical, Tier::High, Tier::Medium, Tier::Low];

    pub fn weight(self) -> u32 {
        match self {
            Tier::Critical => 4,
            Tier::High => 3,
            Tier::Medium => 2,
            Tier::Low => 1,
        }
    }

    /// Queue priority for `runtime::WorkQueue` (smaller runs earlier).
    pub fn queue_priority(self) -> i32 {
        -(self.weight() as i32)
    }

    pub fn from_queue_priority(priority: i32) -> Option<Tier> {
        Tier::ALL
            .into_iter()
            .find(|t| t.queue_priority() == priority)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Critical => "critical",
            Tier::High => "high",
            Tier::Medium => "medium",
            Tier::Low => "low",
        }
    }

    /// Lenient parser for values coming from markup/JS (`"critical"`, `"HIGH"`).
    pub fn parse(s: &str) -> Option<Tier> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Some(Tier::Critical),
            "high" => Some(Tier::High),
            "medium" => Some(Tier::Medium),
            "low" => Some(Tier::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per tier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TierTable<T> {
    pub critical: T,
    pub high: T,
    pub medium: T,
    pub low: T,
}

impl<T> TierTable<T> {
    pub fn get(&self, tier: Tier) -> &T {
        match tier {
            Tier::Critical => &self.critical,
            Tier::High => &self.high,
            Tier::Medium => &self.medium,
            Tier::Low => &self.low,
        }
    }

    pub fn get_mut(&mut self, tier: Tier) -> &mut T {
        match tier {
            Tier::Critical => &mut self.critical,
            Tier::High => &mut self.high,
            Tier::Medium => &mut self.medium,
            Tier::Low => &mut self.low,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(Tier, &T) -> U) -> TierTable<U> {
        TierTable {
            critical: f(Tier::Critical, &self.critical),
            high: f(Tier::High, &self.high),
            medium: f(Tier::Medium, &self.medium),
            low: f(Tier::Low, &self.low),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tier, &T)> {
        Tier::ALL.into_iter().map(move |t| (t, self.get(t)))
    }
}

/// Default in-flight ceilings per tier.
pub const DEFAULT_CAPACITIES: TierTable<u32> = TierTable {
    critical: 4,
    high: 3,
    medium: 2,
    low: 1,
};
