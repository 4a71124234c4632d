//! An offline oracle that answers from a small built-in drug table.
//!
//! [`KnowledgeBase`] serves the same three requests as the model-backed
//! oracle and replies with JSON in the declared shapes, so its answers go
//! through the same parsing, severity policy, and rendering. It reads the
//! request's [`Query`]; the prompt text is ignored.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::backend::{Oracle, OracleRequest, Query};
use crate::error::{ApiErrorKind, Result, RxVerifyError};
use crate::model::{
    AlternativeFinderResult, AlternativeReport, AlternativeSuggestion, AnalysisResult,
    DosageRecommendation, Drug, DrugInteraction, InteractionReport, Severity,
};

pub const PROVIDER_NAME: &str = "knowledge-base";

/// Below this age, weight-based pediatric dosing applies when a weight is known.
const PEDIATRIC_AGE: f64 = 12.0;

struct DrugEntry {
    name: &'static str,
    aliases: &'static [&'static str],
    classes: &'static [&'static str],
    description: &'static str,
}

struct InteractionRule {
    drug: &'static str,
    with: &'static str,
    severity: &'static str,
    explanation: &'static str,
}

struct AlternativeRule {
    for_drug: &'static str,
    suggested_drug: &'static str,
    suggestion: &'static str,
    reason: &'static str,
    considerations: &'static str,
}

// Scanned in order; the first alias found in the text claims the entry.
const DRUGS: &[DrugEntry] = &[
    DrugEntry {
        name: "paracetamol",
        aliases: &["paracetamol", "acetaminophen", "tylenol"],
        classes: &["analgesic", "antipyretic"],
        description: "Pain and fever reducer.",
    },
    DrugEntry {
        name: "ibuprofen",
        aliases: &["ibuprofen", "advil", "motrin"],
        classes: &["NSAID", "analgesic"],
        description: "Non-steroidal anti-inflammatory for pain and inflammation.",
    },
    DrugEntry {
        name: "amoxicillin",
        aliases: &["amoxicillin", "amox"],
        classes: &["antibiotic", "penicillin"],
        description: "Aminopenicillin antibiotic for bacterial infections.",
    },
    DrugEntry {
        name: "metformin",
        aliases: &["metformin", "glucophage"],
        classes: &["antidiabetic", "biguanide"],
        description: "First-line oral therapy for type 2 diabetes.",
    },
    DrugEntry {
        name: "atorvastatin",
        aliases: &["atorvastatin", "lipitor"],
        classes: &["statin", "lipid-lowering"],
        description: "HMG-CoA reductase inhibitor for hyperlipidemia.",
    },
    DrugEntry {
        name: "aspirin",
        aliases: &["aspirin", "acetylsalicylic acid"],
        classes: &["antiplatelet", "NSAID"],
        description: "Antiplatelet agent used for cardiovascular protection and pain.",
    },
];

const INTERACTIONS: &[InteractionRule] = &[
    InteractionRule {
        drug: "ibuprofen",
        with: "aspirin",
        severity: "moderate",
        explanation: "Ibuprofen may interfere with aspirin's antiplatelet effect; separate dosing or prefer acetaminophen.",
    },
    InteractionRule {
        drug: "amoxicillin",
        with: "warfarin",
        severity: "moderate",
        explanation: "May increase INR; monitor anticoagulation.",
    },
    InteractionRule {
        drug: "atorvastatin",
        with: "clarithromycin",
        severity: "high",
        explanation: "CYP3A4 inhibition increases statin levels; risk of rhabdomyolysis.",
    },
    InteractionRule {
        drug: "metformin",
        with: "cimetidine",
        severity: "moderate",
        explanation: "May increase metformin levels; consider alternatives or dose adjustment.",
    },
];

const ALTERNATIVES: &[AlternativeRule] = &[
    AlternativeRule {
        for_drug: "ibuprofen",
        suggested_drug: "Paracetamol",
        suggestion: "Paracetamol (Acetaminophen) for pain/fever",
        reason: "Lower GI risk; no antiplatelet interference.",
        considerations: "Hepatotoxic above the maximum daily dose; reduce in hepatic impairment.",
    },
    AlternativeRule {
        for_drug: "amoxicillin",
        suggested_drug: "Azithromycin",
        suggestion: "Azithromycin (if penicillin allergy)",
        reason: "Macrolide alternative for common respiratory infections.",
        considerations: "Can prolong the QT interval; check local macrolide resistance.",
    },
    AlternativeRule {
        for_drug: "metformin",
        suggested_drug: "Metformin XR",
        suggestion: "Metformin XR or add GLP-1 RA per guidelines",
        reason: "Improves GI tolerance and adds glycemic/weight benefits.",
        considerations: "Monitor renal function; GLP-1 RAs commonly cause nausea.",
    },
];

/// Rule-based oracle over the built-in drug table.
///
/// ```
/// use rxverify::backend::KnowledgeBase;
///
/// let kb = KnowledgeBase::new();
/// let drugs = kb.extract_drugs("Advil 400 mg tid, Lipitor 20 mg nightly");
/// let names: Vec<_> = drugs.iter().map(|d| d.name.as_str()).collect();
/// assert_eq!(names, ["ibuprofen", "atorvastatin"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct KnowledgeBase;

impl KnowledgeBase {
    pub fn new() -> Self {
        Self
    }

    /// Known drugs mentioned anywhere in `text`, by case-insensitive alias
    /// match, in table order and at most once each.
    pub fn extract_drugs(&self, text: &str) -> Vec<Drug> {
        let lowered = text.to_lowercase();
        DRUGS
            .iter()
            .filter(|entry| entry.aliases.iter().any(|alias| lowered.contains(alias)))
            .map(|entry| Drug {
                name: entry.name.to_string(),
                description: entry.description.to_string(),
                classes: entry.classes.iter().map(|c| c.to_string()).collect(),
                dosage: None,
                frequency: None,
            })
            .collect()
    }

    /// Interactions among `names`, one per unordered pair.
    ///
    /// Names are matched case-insensitively; a name that is exactly one of a
    /// known drug's aliases counts as that drug.
    pub fn interactions(&self, names: &[String]) -> Vec<DrugInteraction> {
        let names: Vec<String> = names.iter().map(|name| canonical_name(name)).collect();
        let mut seen: Vec<[&str; 2]> = Vec::new();
        let mut found = Vec::new();

        for name in &names {
            for rule in INTERACTIONS.iter().filter(|rule| rule.drug == name) {
                if !names.iter().any(|other| other == rule.with) {
                    continue;
                }
                let mut key = [rule.drug, rule.with];
                key.sort_unstable();
                if seen.contains(&key) {
                    continue;
                }
                seen.push(key);
                found.push(DrugInteraction {
                    pair: [rule.drug.to_string(), rule.with.to_string()],
                    severity: Severity::from(rule.severity),
                    explanation: rule.explanation.to_string(),
                });
            }
        }
        found
    }

    /// Dosage advice for one drug, weight-based for children under 12 when a
    /// weight is given. `None` for drugs without a dosing rule.
    pub fn dosage(&self, drug: &str, age: f64, weight: Option<f64>) -> Option<DosageRecommendation> {
        let name = canonical_name(drug);
        let pediatric_weight = weight.filter(|w| *w > 0.0 && age < PEDIATRIC_AGE);
        let per_kg = |mg: f64| pediatric_weight.map(|w| (w * mg).round_ties_even() as i64);

        let (dose, rationale) = match name.as_str() {
            "paracetamol" => match per_kg(15.0) {
                Some(mg) => (
                    format!("{} mg per dose, every 4–6 hours (max 60 mg/kg/day)", mg),
                    "Pediatric dose ~10–15 mg/kg per dose.",
                ),
                None => (
                    "500–1000 mg every 4–6 hours as needed (max 3000 mg/day)".to_string(),
                    "Typical adult dosing. Reduce max in hepatic impairment.",
                ),
            },
            "ibuprofen" => match per_kg(10.0) {
                Some(mg) => (
                    format!("{} mg per dose, every 6–8 hours (max 40 mg/kg/day)", mg),
                    "Pediatric dose ~5–10 mg/kg per dose.",
                ),
                None => (
                    "200–400 mg every 6–8 hours with food (max 1200 mg/day OTC)".to_string(),
                    "Typical adult OTC dosing.",
                ),
            },
            "amoxicillin" => match per_kg(45.0) {
                Some(mg) => (
                    format!(
                        "{} mg/day divided q12h (standard); up to 80–90 mg/kg/day for otitis media",
                        mg
                    ),
                    "Pediatric dosing is weight-based.",
                ),
                None => (
                    "500 mg every 8 hours or 875 mg every 12 hours".to_string(),
                    "Typical adult dosing for common infections.",
                ),
            },
            _ => return None,
        };

        Some(DosageRecommendation {
            drug: name,
            recommendation: format!("{}. {}", dose, rationale),
            warning: None,
        })
    }

    /// Substitutes listed for any of `names`.
    pub fn alternatives(&self, names: &[String]) -> Vec<AlternativeSuggestion> {
        names
            .iter()
            .map(|name| canonical_name(name))
            .flat_map(|name| {
                ALTERNATIVES
                    .iter()
                    .filter(move |rule| rule.for_drug == name)
                    .map(|rule| AlternativeSuggestion {
                        for_drug: rule.for_drug.to_string(),
                        reason: rule.reason.to_string(),
                        suggestion: rule.suggestion.to_string(),
                        suggested_drug: rule.suggested_drug.to_string(),
                    })
            })
            .collect()
    }

    /// Full analysis of prescription text: extraction, then interactions,
    /// dosing, and alternatives over the extracted drugs.
    pub fn analyze(&self, text: &str, age: f64, weight: Option<f64>) -> AnalysisResult {
        let drugs = self.extract_drugs(text);
        let names: Vec<String> = drugs.iter().map(|drug| drug.name.clone()).collect();
        AnalysisResult {
            interactions: self.interactions(&names),
            dosage_recommendations: names
                .iter()
                .filter_map(|name| self.dosage(name, age, weight))
                .collect(),
            alternative_suggestions: self.alternatives(&names),
            drugs,
        }
    }

    /// Alternative-finder cards for one drug. Condition and context do not
    /// narrow the table.
    pub fn find_alternatives(&self, drug: &str) -> Vec<AlternativeFinderResult> {
        let name = canonical_name(drug);
        ALTERNATIVES
            .iter()
            .filter(|rule| rule.for_drug == name)
            .map(|rule| AlternativeFinderResult {
                suggested_drug: rule.suggested_drug.to_string(),
                reasoning: rule.reason.to_string(),
                benefits: rule.suggestion.to_string(),
                considerations: rule.considerations.to_string(),
            })
            .collect()
    }

    fn answer(&self, query: &Query) -> Result<String> {
        match query {
            Query::Prescription {
                text: Some(text),
                age,
                weight,
            } => to_reply(&self.analyze(text, *age, *weight)),
            Query::Prescription { text: None, .. } => {
                warn!("Knowledge base cannot read prescription images");
                Err(RxVerifyError::api_error(
                    PROVIDER_NAME,
                    ApiErrorKind::BadRequest {
                        details: "image prescriptions are not supported".to_string(),
                    },
                ))
            }
            Query::Interactions { drugs } => to_reply(&InteractionReport {
                interactions: self.interactions(drugs),
            }),
            Query::Alternatives { drug, .. } => to_reply(&AlternativeReport {
                suggestions: self.find_alternatives(drug),
            }),
        }
    }
}

fn canonical_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    DRUGS
        .iter()
        .find(|entry| entry.aliases.contains(&lowered.as_str()))
        .map(|entry| entry.name.to_string())
        .unwrap_or(lowered)
}

fn to_reply<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

#[async_trait]
impl Oracle for KnowledgeBase {
    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    #[instrument(name = "knowledge_base_complete", skip(self, request))]
    async fn complete(&self, request: &OracleRequest) -> Result<String> {
        let query = request.query.as_ref().ok_or_else(|| {
            RxVerifyError::api_error(
                PROVIDER_NAME,
                ApiErrorKind::BadRequest {
                    details: "request carries no structured query".to_string(),
                },
            )
        })?;
        let reply = self.answer(query)?;
        debug!(reply_len = reply.len(), "Answered from knowledge base");
        Ok(reply)
    }
}
