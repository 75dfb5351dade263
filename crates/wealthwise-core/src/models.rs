//! Domain models for WealthWise

use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: i64,
    pub name: String,
    pub target_amount: f64,
    /// May exceed `target_amount`; nothing caps it
    pub current_amount: f64,
    pub deadline: NaiveDate,
    pub priority: Priority,
}

/// Input for creating a goal (the id is assigned by the collection)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub name: String,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub priority: Priority,
}

impl NewGoal {
    /// Attach an id, producing the stored goal
    pub fn with_id(self, id: i64) -> Goal {
        Goal {
            id,
            name: self.name,
            target_amount: self.target_amount,
            current_amount: self.current_amount,
            deadline: self.deadline,
            priority: self.priority,
        }
    }
}

/// Goal priority. Display only; no ordering semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A spending transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Creation timestamp in milliseconds
    pub id: i64,
    /// Free-form grouping key
    pub category: String,
    pub description: String,
    pub amount: f64,
    #[serde(with = "flexible_timestamp")]
    pub date: DateTime<Utc>,
}

/// Category used for transactions synthesized by funding a goal
pub const SAVINGS_CATEGORY: &str = "Savings";

/// A named monetary allocation (goal or budget category)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Distribution {
    pub name: String,
    pub value: f64,
}

impl Distribution {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Accumulated spending for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpend {
    pub name: String,
    pub amount: f64,
}

impl CategorySpend {
    /// Display icon for well-known categories
    pub fn icon(&self) -> &'static str {
        category_icon(&self.name)
    }
}

/// Icon shown next to a spending category
pub fn category_icon(category: &str) -> &'static str {
    match category {
        "Shopping" => "🛍️",
        "Food" => "🍽️",
        "Rent" => "🏠",
        "Savings" => "💰",
        "Groceries" => "🛒",
        "Restaurant" => "🍜",
        _ => "💸",
    }
}

/// How the user is feeling, used to condition the tip prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Mood {
    #[default]
    Neutral,
    Stressed,
    Confident,
    Hopeful,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "Neutral",
            Self::Stressed => "Stressed",
            Self::Confident => "Confident",
            Self::Hopeful => "Hopeful",
        }
    }

    pub fn all() -> &'static [Mood] {
        &[Self::Neutral, Self::Stressed, Self::Confident, Self::Hopeful]
    }
}

impl std::str::FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "neutral" => Ok(Self::Neutral),
            "stressed" => Ok(Self::Stressed),
            "confident" => Ok(Self::Confident),
            "hopeful" => Ok(Self::Hopeful),
            _ => Err(format!("Unknown mood: {}", s)),
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Accepts either a full RFC 3339 timestamp or a bare `YYYY-MM-DD` date
/// (read as midnight UTC). Always writes RFC 3339.
mod flexible_timestamp {
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(ts.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", raw)))
    }
}

/// Format an amount in rupees with Indian digit grouping (`₹1,23,456.00`)
pub fn format_inr(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((&fixed, "00"));

    let grouped = if whole.len() <= 3 {
        whole.to_string()
    } else {
        let (head, last3) = whole.split_at(whole.len() - 3);
        let mut parts: Vec<&str> = Vec::new();
        let mut rest = head;
        while rest.len() > 2 {
            let (h, t) = rest.split_at(rest.len() - 2);
            parts.push(t);
            rest = h;
        }
        if !rest.is_empty() {
            parts.push(rest);
        }
        parts.reverse();
        format!("{},{}", parts.join(","), last3)
    };

    format!("{}₹{}.{}", sign, grouped, fraction)
}
