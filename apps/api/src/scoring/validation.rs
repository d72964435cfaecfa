//! Schema check for the scoring model's JSON reply.
//!
//! Structural problems (not an object, no breakdown, no recognisable category)
//! reject the reply. Missing or wrong-typed leaf fields fall back to defaults and
//! are recorded in `notes` so reviewers can see what the model left out.

use serde_json::{Map, Value};

use crate::llm_client::fields;
use crate::scoring::models::{ExtractedProfile, GapsAndNotes};
use crate::scoring::rubric::{Breakdown, Category, CategoryScore};

/// Model reply after validation. Weighting and the verdict are applied later by the engine.
#[derive(Debug, Clone)]
pub struct ValidatedReply {
    pub breakdown: Breakdown,
    pub reason_summary: String,
    pub model_reported_qualified: Option<bool>,
    pub extracted: ExtractedProfile,
    pub gaps_and_notes: GapsAndNotes,
}

pub fn validate_reply(value: &Value) -> Result<ValidatedReply, String> {
    let root = value
        .as_object()
        .ok_or_else(|| "top-level value is not a JSON object".to_string())?;

    let breakdown_obj = root
        .get("breakdown")
        .and_then(Value::as_object)
        .ok_or_else(|| "missing `breakdown` object".to_string())?;

    let mut notes = Vec::new();
    let mut found = 0usize;

    let breakdown = Breakdown::from_fn(|category| {
        match find_category(breakdown_obj, category) {
            Some(entry) => match read_category(entry) {
                Some((score, evidence)) => {
                    found += 1;
                    CategoryScore::new(category, score, evidence)
                }
                None => {
                    notes.push(format!(
                        "{} returned without a usable score; scored 0",
                        category.key()
                    ));
                    CategoryScore::new(category, 0, Vec::new())
                }
            },
            None => {
                notes.push(format!("{} not assessed by the model; scored 0", category.key()));
                CategoryScore::new(category, 0, Vec::new())
            }
        }
    });

    if found == 0 {
        return Err("breakdown contains no scored rubric category".to_string());
    }

    let overall = root.get("overall").and_then(Value::as_object);
    let reason_summary = overall
        .and_then(|o| fields::string(o.get("reason_summary")))
        .unwrap_or_default();
    let model_reported_qualified = overall.and_then(|o| fields::boolean(o.get("qualified")));

    let extracted = root
        .get("extracted")
        .and_then(Value::as_object)
        .map(read_extracted)
        .unwrap_or_default();

    let mut gaps_and_notes = read_gaps(root.get("gaps_and_notes"));
    gaps_and_notes.notes.extend(notes);

    Ok(ValidatedReply {
        breakdown,
        reason_summary,
        model_reported_qualified,
        extracted,
        gaps_and_notes,
    })
}

fn find_category<'a>(breakdown: &'a Map<String, Value>, category: Category) -> Option<&'a Value> {
    breakdown.get(category.key()).or_else(|| {
        category
            .aliases()
            .iter()
            .find_map(|alias| breakdown.get(*alias))
    })
}

/// Accepts `{"score": 80, "evidence": [...]}` or a bare number.
fn read_category(entry: &Value) -> Option<(u8, Vec<String>)> {
    match entry {
        Value::Object(obj) => {
            let score = fields::score(obj.get("score"))?;
            let evidence = fields::string_list(obj.get("evidence"));
            Some((score, evidence))
        }
        other => fields::score(Some(other)).map(|s| (s, Vec::new())),
    }
}

fn read_extracted(obj: &Map<String, Value>) -> ExtractedProfile {
    let contact = obj.get("contact").and_then(Value::as_object);
    let from_contact = |key: &str| {
        fields::string(obj.get(key)).or_else(|| contact.and_then(|c| fields::string(c.get(key))))
    };

    ExtractedProfile {
        name: fields::string(obj.get("name")),
        email: from_contact("email"),
        phone: from_contact("phone"),
        location: from_contact("location"),
        current_title: fields::string(obj.get("current_title")),
        total_years_experience: fields::number(obj.get("total_years_experience"))
            .filter(|years| *years >= 0.0),
        skills: fields::string_list(obj.get("skills")),
        education: fields::string_list(obj.get("education")),
        certifications: fields::string_list(obj.get("certifications")),
        employers: fields::string_list(obj.get("employers")),
    }
}

fn read_gaps(value: Option<&Value>) -> GapsAndNotes {
    match value {
        Some(Value::Object(obj)) => GapsAndNotes {
            missing_requirements: fields::string_list(obj.get("missing_requirements")),
            red_flags: fields::string_list(obj.get("red_flags")),
            notes: fields::string_list(obj.get("notes")),
        },
        // Some replies collapse everything into a flat list of notes.
        other => GapsAndNotes {
            notes: fields::string_list(other),
            ..Default::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejects_non_object() {
        assert!(validate_reply(&json!([1, 2, 3])).is_err());
        assert!(validate_reply(&json!("hello")).is_err());
    }

    #[test]
    fn test_rejects_missing_breakdown() {
        let err = validate_reply(&json!({"overall": {"qualified": true}})).unwrap_err();
        assert!(err.contains("breakdown"));
    }

    #[test]
    fn test_rejects_breakdown_without_any_category() {
        assert!(validate_reply(&json!({"breakdown": {"vibes": 99}})).is_err());
    }

    #[test]
    fn test_missing_categories_default_to_zero_with_note() {
        let reply = validate_reply(&json!({
            "breakdown": {"hard_skills": {"score": 80, "evidence": ["Rust"]}}
        }))
        .unwrap();
        assert_eq!(reply.breakdown.hard_skills.score, 80);
        assert_eq!(reply.breakdown.hard_skills.evidence, vec!["Rust".to_string()]);
        assert_eq!(reply.breakdown.experience_depth.score, 0);
        assert_eq!(reply.gaps_and_notes.notes.len(), 6);
        assert!(reply.gaps_and_notes.notes[0].contains("role_title_alignment"));
    }

    #[test]
    fn test_model_weights_are_ignored() {
        let reply = validate_reply(&json!({
            "breakdown": {"hard_skills": {"score": 50, "weight": 90}}
        }))
        .unwrap();
        assert_eq!(reply.breakdown.hard_skills.weight, 35);
        assert_eq!(reply.breakdown.total_weight(), 100);
    }

    #[test]
    fn test_aliases_and_bare_numbers_accepted() {
        let reply = validate_reply(&json!({
            "breakdown": {"education_certs": 70, "red_flags": "60"}
        }))
        .unwrap();
        assert_eq!(reply.breakdown.education_certifications.score, 70);
        assert_eq!(reply.breakdown.communication_red_flags.score, 60);
    }

    #[test]
    fn test_wrong_typed_score_is_noted() {
        let reply = validate_reply(&json!({
            "breakdown": {"hard_skills": {"score": "excellent"}, "experience_depth": 40}
        }))
        .unwrap();
        assert_eq!(reply.breakdown.hard_skills.score, 0);
        assert!(reply
            .gaps_and_notes
            .notes
            .iter()
            .any(|n| n.contains("hard_skills returned without a usable score")));
    }

    #[test]
    fn test_extracted_reads_nested_contact() {
        let reply = validate_reply(&json!({
            "breakdown": {"hard_skills": 10},
            "extracted": {
                "name": "Ada Lovelace",
                "contact": {"email": "ada@example.com", "phone": "+44 20 0000"},
                "skills": ["Mathematics", "Analytical Engine"],
                "total_years_experience": "12"
            }
        }))
        .unwrap();
        assert_eq!(reply.extracted.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(reply.extracted.email.as_deref(), Some("ada@example.com"));
        assert_eq!(reply.extracted.skills.len(), 2);
        assert_eq!(reply.extracted.total_years_experience, Some(12.0));
    }

    #[test]
    fn test_flat_gap_list_becomes_notes() {
        let reply = validate_reply(&json!({
            "breakdown": {"hard_skills": 10},
            "gaps_and_notes": ["No Kubernetes"]
        }))
        .unwrap();
        assert!(reply.gaps_and_notes.notes.contains(&"No Kubernetes".to_string()));
        assert!(reply.gaps_and_notes.missing_requirements.is_empty());
    }

    #[test]
    fn test_model_qualified_string_is_read_for_audit() {
        let reply = validate_reply(&json!({
            "overall": {"qualified": "yes", "reason_summary": "Strong match"},
            "breakdown": {"hard_skills": 10}
        }))
        .unwrap();
        assert_eq!(reply.model_reported_qualified, Some(true));
        assert_eq!(reply.reason_summary, "Strong match");
    }
}
