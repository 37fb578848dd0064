use serde::Serialize;
use std::fmt;

/// Qualitative rating of daylight efficiency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rating {
    Excellent,
    Good,
    Fair,
    Acceptable,
    Poor,
}

impl Rating {
    /// Converts an average daylight efficiency percentage into a rating.
    ///
    /// | Range   | Rating     |
    /// |---------|------------|
    /// | > 75    | Excellent  |
    /// | > 60    | Good       |
    /// | > 45    | Fair       |
    /// | > 30    | Acceptable |
    /// | <= 30   | Poor       |
    pub fn from_efficiency(pct: f64) -> Self {
        match pct {
            p if p > 75.0 => Rating::Excellent,
            p if p > 60.0 => Rating::Good,
            p if p > 45.0 => Rating::Fair,
            p if p > 30.0 => Rating::Acceptable,
            _ => Rating::Poor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Excellent => "EXCELLENT",
            Rating::Good => "GOOD",
            Rating::Fair => "FAIR",
            Rating::Acceptable => "ACCEPTABLE",
            Rating::Poor => "POOR",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_boundaries() {
        assert_eq!(Rating::from_efficiency(100.0), Rating::Excellent);
        assert_eq!(Rating::from_efficiency(75.1), Rating::Excellent);
        assert_eq!(Rating::from_efficiency(75.0), Rating::Good);
        assert_eq!(Rating::from_efficiency(60.1), Rating::Good);
        assert_eq!(Rating::from_efficiency(60.0), Rating::Fair);
        assert_eq!(Rating::from_efficiency(45.0), Rating::Acceptable);
        assert_eq!(Rating::from_efficiency(30.1), Rating::Acceptable);
        assert_eq!(Rating::from_efficiency(30.0), Rating::Poor);
        assert_eq!(Rating::from_efficiency(0.0), Rating::Poor);
        assert_eq!(Rating::from_efficiency(f64::NAN), Rating::Poor);
    }

    #[test]
    fn test_rating_display() {
        assert_eq!(Rating::Fair.to_string(), "FAIR");
        assert_eq!(
            serde_json::to_string(&Rating::Acceptable).unwrap(),
            "\"ACCEPTABLE\""
        );
    }
}
