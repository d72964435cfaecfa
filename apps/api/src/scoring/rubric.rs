//! Rubric — the fixed, engine-owned set of weighted evaluation categories.
//!
//! Weights live here and nowhere else. Whatever the model writes into a
//! `weight` field is discarded; the breakdown is always rebuilt from `Category::weight`.

use serde::{Deserialize, Serialize};

/// One of the seven rubric categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    RoleTitleAlignment,
    HardSkills,
    ExperienceDepth,
    DomainRelevance,
    EducationCertifications,
    NiceToHave,
    CommunicationRedFlags,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::RoleTitleAlignment,
        Category::HardSkills,
        Category::ExperienceDepth,
        Category::DomainRelevance,
        Category::EducationCertifications,
        Category::NiceToHave,
        Category::CommunicationRedFlags,
    ];

    /// Weight in percentage points. All seven sum to 100.
    pub fn weight(self) -> u8 {
        match self {
            Category::RoleTitleAlignment => 15,
            Category::HardSkills => 35,
            Category::ExperienceDepth => 20,
            Category::DomainRelevance => 10,
            Category::EducationCertifications => 10,
            Category::NiceToHave => 5,
            Category::CommunicationRedFlags => 5,
        }
    }

    /// JSON key used in the model contract and in persisted payloads.
    pub fn key(self) -> &'static str {
        match self {
            Category::RoleTitleAlignment => "role_title_alignment",
            Category::HardSkills => "hard_skills",
            Category::ExperienceDepth => "experience_depth",
            Category::DomainRelevance => "domain_relevance",
            Category::EducationCertifications => "education_certifications",
            Category::NiceToHave => "nice_to_have",
            Category::CommunicationRedFlags => "communication_red_flags",
        }
    }

    /// Alternate keys models have been seen to emit for the same category.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Category::RoleTitleAlignment => &["role_alignment", "title_alignment"],
            Category::HardSkills => &["skills", "technical_skills"],
            Category::ExperienceDepth => &["experience"],
            Category::DomainRelevance => &["domain", "industry_relevance"],
            Category::EducationCertifications => &["education_certs", "education"],
            Category::NiceToHave => &["nice_to_haves", "bonus_skills"],
            Category::CommunicationRedFlags => &["communication", "red_flags"],
        }
    }

    /// Scoring guidance shown to the model for this category.
    pub fn guidance(self) -> &'static str {
        match self {
            Category::RoleTitleAlignment => {
                "How closely past titles and responsibilities match the target role. \
                 Adjacent roles (e.g. frontend engineer for a full-stack role) earn partial credit."
            }
            Category::HardSkills => {
                "Coverage of the required tools, languages, frameworks and techniques. \
                 Closely related technologies earn partial credit."
            }
            Category::ExperienceDepth => {
                "Years and seniority of relevant experience against what the role asks for, \
                 including scope and ownership."
            }
            Category::DomainRelevance => "Familiarity with the industry or problem domain of the role.",
            Category::EducationCertifications => {
                "Degrees, certifications or equivalent practical training the role calls for."
            }
            Category::NiceToHave => "Preferred but optional qualifications listed in the job description.",
            Category::CommunicationRedFlags => {
                "Clarity of the resume. Deduct only for concrete red flags: unexplained \
                 contradictions, fabricated-looking claims, or missing core information."
            }
        }
    }
}

/// Score for a single rubric category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub score: u8, // 0 – 100
    pub weight: u8,
    pub evidence: Vec<String>,
}

impl CategoryScore {
    pub fn new(category: Category, score: u8, evidence: Vec<String>) -> Self {
        Self {
            score: score.min(100),
            weight: category.weight(),
            evidence,
        }
    }
}

/// Exactly seven category scores. A struct, not a map, so a breakdown can never
/// be missing a category or carry an extra one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub role_title_alignment: CategoryScore,
    pub hard_skills: CategoryScore,
    pub experience_depth: CategoryScore,
    pub domain_relevance: CategoryScore,
    pub education_certifications: CategoryScore,
    pub nice_to_have: CategoryScore,
    pub communication_red_flags: CategoryScore,
}

impl Breakdown {
    /// Builds a breakdown by asking `score_for` for each category in rubric order.
    pub fn from_fn(mut score_for: impl FnMut(Category) -> CategoryScore) -> Self {
        Self {
            role_title_alignment: score_for(Category::RoleTitleAlignment),
            hard_skills: score_for(Category::HardSkills),
            experience_depth: score_for(Category::ExperienceDepth),
            domain_relevance: score_for(Category::DomainRelevance),
            education_certifications: score_for(Category::EducationCertifications),
            nice_to_have: score_for(Category::NiceToHave),
            communication_red_flags: score_for(Category::CommunicationRedFlags),
        }
    }

    pub fn get(&self, category: Category) -> &CategoryScore {
        match category {
            Category::RoleTitleAlignment => &self.role_title_alignment,
            Category::HardSkills => &self.hard_skills,
            Category::ExperienceDepth => &self.experience_depth,
            Category::DomainRelevance => &self.domain_relevance,
            Category::EducationCertifications => &self.education_certifications,
            Category::NiceToHave => &self.nice_to_have,
            Category::CommunicationRedFlags => &self.communication_red_flags,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &CategoryScore)> {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    pub fn total_weight(&self) -> u32 {
        self.iter().map(|(_, s)| s.weight as u32).sum()
    }

    /// Σ(score × weight / 100). Computed on integers first so that ties with
    /// the threshold compare exactly.
    pub fn weighted_sum(&self) -> f64 {
        let points: u32 = self
            .iter()
            .map(|(_, s)| s.score as u32 * s.weight as u32)
            .sum();
        points as f64 / 100.0
    }
}
