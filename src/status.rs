use serde::Serialize;

/// Coarse visual bucket for a prediction label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    Positive,
    Neutral,
    Negative,
}

const POSITIVE_LABELS: [&str; 2] = ["placed", "high"];
const NEUTRAL_LABELS: [&str; 2] = ["medium", "moderate"];

/// Maps a label onto a [`Category`]. Unknown and absent labels fall back to
/// `Negative`; check the label itself before treating that as a real signal.
pub fn classify(label: Option<&str>) -> Category {
    let Some(label) = label else {
        return Category::Negative;
    };
    let label = label.to_lowercase();

    if POSITIVE_LABELS.contains(&label.as_str()) {
        Category::Positive
    } else if NEUTRAL_LABELS.contains(&label.as_str()) {
        Category::Neutral
    } else {
        Category::Negative
    }
}

impl Category {
    pub fn badge(self) -> &'static str {
        match self {
            Category::Positive => "+",
            Category::Neutral => "~",
            Category::Negative => "!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_ignores_case() {
        assert_eq!(classify(Some("PLACED")), Category::Positive);
        assert_eq!(classify(Some("placed")), Category::Positive);
        assert_eq!(classify(Some("High")), Category::Positive);
        assert_eq!(classify(Some("MODERATE")), Category::Neutral);
        assert_eq!(classify(Some("medium")), Category::Neutral);
    }

    #[test]
    fn unknown_or_absent_labels_fall_back_to_negative() {
        assert_eq!(classify(None), Category::Negative);
        assert_eq!(classify(Some("")), Category::Negative);
        assert_eq!(classify(Some("Not Ready")), Category::Negative);
        assert_eq!(classify(Some(" placed ")), Category::Negative);
    }
}
