use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct UserRef {
    #[serde(default)]
    pub email: Option<String>,
}

/// Snapshot of the student's academic attributes as returned by `/profile`.
///
/// Every field is optional so a partially filled profile still renders,
/// with placeholders standing in for whatever the server left out.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(default)]
    pub cgpa: Option<f64>,
    #[serde(default)]
    pub dsa_rating: Option<f64>,
    #[serde(default)]
    pub projects_count: Option<i64>,
    #[serde(default)]
    pub internship: Option<bool>,
    #[serde(default)]
    pub attendance: Option<f64>,
    #[serde(default)]
    pub aptitude_score: Option<f64>,
}

impl StudentProfile {
    pub fn email(&self) -> Option<&str> {
        self.user.as_ref().and_then(|user| user.email.as_deref())
    }
}

/// One entry of `/history`. The server returns these newest-first.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    #[serde(default)]
    pub timestamp: Option<String>,
    pub prediction_score: f64,
    #[serde(default)]
    pub prediction_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub probability: f64,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub explanations: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub date: String,
    pub score: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_tolerates_missing_fields() {
        let profile: StudentProfile =
            serde_json::from_str(r#"{"cgpa": 8.4, "internship": true}"#).unwrap();
        assert_eq!(profile.cgpa, Some(8.4));
        assert_eq!(profile.internship, Some(true));
        assert_eq!(profile.dsa_rating, None);
        assert_eq!(profile.email(), None);
    }

    #[test]
    fn profile_reads_nested_email_and_camel_case_fields() {
        let body = r#"{
            "user": {"email": "asha@college.edu"},
            "cgpa": 7.9,
            "dsaRating": 1650,
            "projectsCount": 4,
            "internship": false,
            "attendance": 91.5,
            "aptitudeScore": 72
        }"#;
        let profile: StudentProfile = serde_json::from_str(body).unwrap();
        assert_eq!(profile.email(), Some("asha@college.edu"));
        assert_eq!(profile.dsa_rating, Some(1650.0));
        assert_eq!(profile.projects_count, Some(4));
        assert_eq!(profile.aptitude_score, Some(72.0));
    }

    #[test]
    fn prediction_lists_default_to_empty() {
        let result: PredictionResult =
            serde_json::from_str(r#"{"probability": 0.42, "label": "Medium"}"#).unwrap();
        assert_eq!(result.label.as_deref(), Some("Medium"));
        assert!(result.explanations.is_empty());
        assert!(result.recommendations.is_empty());
    }
}
