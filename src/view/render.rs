//! Maps screen state to display models, and display models to plain text.
//!
//! Rendering is pure. Every result area is a [`Panel`]: a placeholder before
//! the first request, a loading placeholder, an error, or the ready view. A
//! ready list is a [`Listing`], which distinguishes "nothing found" from items.

use std::fmt;

use super::state::ViewState;
use crate::model::{
    AlternativeFinderResult, AlternativeSuggestion, AnalysisResult, DosageRecommendation, Drug,
    DrugInteraction, Severity,
};

pub const VERIFIER_IDLE: &str = "Your analysis results will appear here.";
pub const CHECKER_IDLE: &str = "Results will be displayed here.";
pub const FINDER_IDLE: &str = "Suggestions will be displayed here.";

pub const NO_INTERACTIONS: &str = "No interactions found.";
pub const NO_DOSAGE: &str = "No specific dosage recommendations generated.";
pub const NO_ALTERNATIVES: &str = "No alternative medications suggested.";
pub const NO_EXTRACTION: &str = "No medication details extracted yet. Run an analysis.";
pub const NO_DRUG_DETAILS: &str = "Detailed drug information will appear here after analysis.";
pub const CHECKER_NONE_FOUND: &str =
    "No potential interactions were found among the specified drugs.";
pub const FINDER_NONE_FOUND: &str = "No specific alternatives were suggested based on the provided context. The original drug may be appropriate, or more information may be needed.";

const NOT_AVAILABLE: &str = "N/A";

/// Visual bucket for an interaction. Closed world: anything that is not a
/// recognized severity lands in `Neutral`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeverityStyle {
    Low,
    Moderate,
    High,
    Neutral,
}

impl SeverityStyle {
    pub fn for_severity(severity: &Severity) -> Self {
        match severity {
            Severity::Low => SeverityStyle::Low,
            Severity::Moderate => SeverityStyle::Moderate,
            Severity::High => SeverityStyle::High,
            Severity::Unrecognized(_) => SeverityStyle::Neutral,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            SeverityStyle::High => "border-red-500 bg-red-500/10 text-red-400",
            SeverityStyle::Moderate => "border-yellow-500 bg-yellow-500/10 text-yellow-400",
            SeverityStyle::Low => "border-green-500 bg-green-500/10 text-green-400",
            SeverityStyle::Neutral => "border-gray-600 bg-gray-600/10 text-gray-400",
        }
    }

    fn marker(self) -> &'static str {
        match self {
            SeverityStyle::High => "[!!!]",
            SeverityStyle::Moderate => "[!! ]",
            SeverityStyle::Low => "[!  ]",
            SeverityStyle::Neutral => "[ ? ]",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Panel<T> {
    Placeholder(&'static str),
    Loading,
    Error(String),
    Ready(T),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Listing<T> {
    Empty(&'static str),
    Items(Vec<T>),
}

impl<T> Listing<T> {
    fn from_items<S>(items: &[S], empty: &'static str, map: impl Fn(&S) -> T) -> Self {
        if items.is_empty() {
            Listing::Empty(empty)
        } else {
            Listing::Items(items.iter().map(map).collect())
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Listing::Empty(_) => 0,
            Listing::Items(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn items(&self) -> &[T] {
        match self {
            Listing::Empty(_) => &[],
            Listing::Items(items) => items,
        }
    }
}

fn panel<R, T>(state: &ViewState<R>, idle: &'static str, ready: impl FnOnce(&R) -> T) -> Panel<T> {
    match state {
        ViewState::Idle => Panel::Placeholder(idle),
        ViewState::Loading { .. } => Panel::Loading,
        ViewState::Failed(message) | ViewState::ValidationError(message) => {
            Panel::Error(message.clone())
        }
        ViewState::Success(result) => Panel::Ready(ready(result)),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InteractionView {
    pub drugs: String,
    pub severity: String,
    pub style: SeverityStyle,
    pub explanation: String,
}

impl From<&DrugInteraction> for InteractionView {
    fn from(interaction: &DrugInteraction) -> Self {
        Self {
            drugs: interaction.pair.join(" + "),
            severity: interaction.severity.to_string(),
            style: SeverityStyle::for_severity(&interaction.severity),
            explanation: interaction.explanation.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DosageView {
    pub drug: String,
    pub recommendation: String,
    pub warning: Option<String>,
}

impl From<&DosageRecommendation> for DosageView {
    fn from(dosage: &DosageRecommendation) -> Self {
        Self {
            drug: dosage.drug.clone(),
            recommendation: dosage.recommendation.clone(),
            warning: dosage.warning.clone().filter(|w| !w.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlternativeView {
    pub for_drug: String,
    pub suggestion: String,
    pub reason: String,
}

impl From<&AlternativeSuggestion> for AlternativeView {
    fn from(alt: &AlternativeSuggestion) -> Self {
        Self {
            for_drug: alt.for_drug.clone(),
            suggestion: alt.suggestion.clone(),
            reason: alt.reason.clone(),
        }
    }
}

/// One row of the structured-extraction table.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionRow {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
}

fn or_not_available(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

impl From<&Drug> for ExtractionRow {
    fn from(drug: &Drug) -> Self {
        Self {
            name: drug.name.clone(),
            dosage: or_not_available(&drug.dosage),
            frequency: or_not_available(&drug.frequency),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrugCard {
    pub name: String,
    pub description: String,
    pub classes: Vec<String>,
}

impl From<&Drug> for DrugCard {
    fn from(drug: &Drug) -> Self {
        Self {
            name: drug.name.clone(),
            description: drug.description.clone(),
            classes: drug.classes.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuickInsights {
    pub drugs_detected: usize,
    pub interactions: usize,
    pub high_risk: usize,
}

impl From<&AnalysisResult> for QuickInsights {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            drugs_detected: result.drugs.len(),
            interactions: result.interactions.len(),
            high_risk: result.high_risk_count(),
        }
    }
}

/// Everything the verifier shows for a successful analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifierReport {
    pub insights: QuickInsights,
    pub extraction: Listing<ExtractionRow>,
    pub drugs: Listing<DrugCard>,
    pub interactions: Listing<InteractionView>,
    pub dosage: Listing<DosageView>,
    pub alternatives: Listing<AlternativeView>,
}

impl From<&AnalysisResult> for VerifierReport {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            insights: QuickInsights::from(result),
            extraction: Listing::from_items(&result.drugs, NO_EXTRACTION, |drug| {
                ExtractionRow::from(drug)
            }),
            drugs: Listing::from_items(&result.drugs, NO_DRUG_DETAILS, |drug| DrugCard::from(drug)),
            interactions: Listing::from_items(&result.interactions, NO_INTERACTIONS, |item| {
                InteractionView::from(item)
            }),
            dosage: Listing::from_items(&result.dosage_recommendations, NO_DOSAGE, |item| {
                DosageView::from(item)
            }),
            alternatives: Listing::from_items(
                &result.alternative_suggestions,
                NO_ALTERNATIVES,
                |item| AlternativeView::from(item),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlternativeCard {
    pub suggested_drug: String,
    pub reasoning: String,
    pub benefits: String,
    pub considerations: String,
}

impl From<&AlternativeFinderResult> for AlternativeCard {
    fn from(result: &AlternativeFinderResult) -> Self {
        Self {
            suggested_drug: result.suggested_drug.clone(),
            reasoning: result.reasoning.clone(),
            benefits: result.benefits.clone(),
            considerations: result.considerations.clone(),
        }
    }
}

pub fn render_verifier(state: &ViewState<AnalysisResult>) -> Panel<VerifierReport> {
    panel(state, VERIFIER_IDLE, |result| VerifierReport::from(result))
}

pub fn render_interactions(
    state: &ViewState<Vec<DrugInteraction>>,
) -> Panel<Listing<InteractionView>> {
    panel(state, CHECKER_IDLE, |interactions| {
        Listing::from_items(interactions, CHECKER_NONE_FOUND, |item| {
            InteractionView::from(item)
        })
    })
}

pub fn render_alternatives(
    state: &ViewState<Vec<AlternativeFinderResult>>,
) -> Panel<Listing<AlternativeCard>> {
    panel(state, FINDER_IDLE, |results| {
        Listing::from_items(results, FINDER_NONE_FOUND, |item| AlternativeCard::from(item))
    })
}

// Plain-text output

impl<T: fmt::Display> fmt::Display for Panel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Panel::Placeholder(message) => writeln!(f, "{}", message),
            Panel::Loading => writeln!(f, "Loading..."),
            Panel::Error(message) => writeln!(f, "Error: {}", message),
            Panel::Ready(view) => write!(f, "{}", view),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Listing<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Listing::Empty(message) => writeln!(f, "{}", message),
            Listing::Items(items) => items.iter().try_for_each(|item| write!(f, "{}", item)),
        }
    }
}

impl fmt::Display for InteractionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {} ({})",
            self.style.marker(),
            self.drugs,
            self.severity
        )?;
        writeln!(f, "      {}", self.explanation)
    }
}

impl fmt::Display for DosageView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- {}: {}", self.drug, self.recommendation)?;
        if let Some(warning) = &self.warning {
            writeln!(f, "  Warning: {}", warning)?;
        }
        Ok(())
    }
}

impl fmt::Display for AlternativeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- For: {}", self.for_drug)?;
        writeln!(f, "  {}", self.suggestion)?;
        writeln!(f, "  Reason: {}", self.reason)
    }
}

impl fmt::Display for ExtractionRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<24} {:<16} {}", self.name, self.dosage, self.frequency)
    }
}

impl fmt::Display for DrugCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- {}: {}", self.name, self.description)?;
        if !self.classes.is_empty() {
            writeln!(f, "  Classes: {}", self.classes.join(", "))?;
        }
        Ok(())
    }
}

impl fmt::Display for AlternativeCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.suggested_drug)?;
        writeln!(f, "  Reasoning: {}", self.reasoning)?;
        writeln!(f, "  Benefits: {}", self.benefits)?;
        writeln!(f, "  Considerations: {}", self.considerations)
    }
}

impl fmt::Display for QuickInsights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Drugs Detected: {}  |  Interactions: {}  |  High Risk: {}",
            self.drugs_detected, self.interactions, self.high_risk
        )
    }
}

impl fmt::Display for VerifierReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== Quick Insights ==")?;
        write!(f, "{}", self.insights)?;
        writeln!(f, "\n== Structured Information Extraction ==")?;
        if !self.extraction.is_empty() {
            writeln!(f, "{:<24} {:<16} {}", "Drug Name", "Dosage", "Frequency")?;
        }
        write!(f, "{}", self.extraction)?;
        writeln!(f, "\n== Drug Interactions ==")?;
        write!(f, "{}", self.interactions)?;
        writeln!(f, "\n== Dosage Recommendations ==")?;
        write!(f, "{}", self.dosage)?;
        writeln!(f, "\n== Alternative Suggestions ==")?;
        write!(f, "{}", self.alternatives)?;
        writeln!(f, "\n== Detailed Drug Information ==")?;
        write!(f, "{}", self.drugs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::state::ViewController;

    fn interaction(a: &str, b: &str, severity: &str, explanation: &str) -> DrugInteraction {
        DrugInteraction {
            pair: [a.to_string(), b.to_string()],
            severity: Severity::from(severity),
            explanation: explanation.to_string(),
        }
    }

    #[test]
    fn severity_buckets_are_closed_world() {
        assert_eq!(SeverityStyle::for_severity(&Severity::Low), SeverityStyle::Low);
        assert_eq!(
            SeverityStyle::for_severity(&Severity::Moderate),
            SeverityStyle::Moderate
        );
        assert_eq!(SeverityStyle::for_severity(&Severity::High), SeverityStyle::High);
        for unknown in ["severe", "HIGH", "", "minor"] {
            assert_eq!(
                SeverityStyle::for_severity(&Severity::from(unknown)),
                SeverityStyle::Neutral
            );
        }
    }

    #[test]
    fn idle_loading_and_error_panels() {
        let mut controller = ViewController::<Vec<DrugInteraction>>::new();
        assert_eq!(
            render_interactions(controller.state()),
            Panel::Placeholder(CHECKER_IDLE)
        );

        let ticket = controller.begin();
        assert_eq!(render_interactions(controller.state()), Panel::Loading);

        controller.resolve(ticket, Err("Failed"));
        assert_eq!(
            render_interactions(controller.state()),
            Panel::Error("Failed".to_string())
        );
    }

    #[test]
    fn empty_result_is_distinct_from_idle() {
        let mut controller = ViewController::<Vec<DrugInteraction>>::new();
        let ticket = controller.begin();
        controller.resolve::<String>(ticket, Ok(Vec::new()));

        let rendered = render_interactions(controller.state());
        assert_eq!(rendered, Panel::Ready(Listing::Empty(CHECKER_NONE_FOUND)));
        assert_ne!(rendered, Panel::Placeholder(CHECKER_IDLE));
    }

    #[test]
    fn interaction_count_and_styles_are_preserved() {
        let interactions = vec![
            interaction("A", "B", "low", "x"),
            interaction("A", "C", "moderate", "y"),
            interaction("B", "C", "catastrophic", "z"),
        ];
        let mut controller = ViewController::new();
        let ticket = controller.begin();
        controller.resolve::<String>(ticket, Ok(interactions));

        let Panel::Ready(listing) = render_interactions(controller.state()) else {
            panic!("expected ready panel");
        };
        let styles: Vec<_> = listing.items().iter().map(|v| v.style).collect();
        assert_eq!(
            styles,
            vec![SeverityStyle::Low, SeverityStyle::Moderate, SeverityStyle::Neutral]
        );
    }

    #[test]
    fn verifier_report_sections() {
        let result = AnalysisResult {
            drugs: vec![Drug {
                name: "Paracetamol".into(),
                description: "Pain and fever reducer.".into(),
                classes: vec!["analgesic".into(), "antipyretic".into()],
                dosage: Some("500 mg".into()),
                frequency: None,
            }],
            interactions: vec![interaction("Warfarin", "Ibuprofen", "high", "bleeding risk")],
            dosage_recommendations: vec![DosageRecommendation {
                drug: "Paracetamol".into(),
                recommendation: "500 mg every 6 hours".into(),
                warning: Some(String::new()),
            }],
            alternative_suggestions: Vec::new(),
        };

        let report = VerifierReport::from(&result);
        assert_eq!(
            report.insights,
            QuickInsights {
                drugs_detected: 1,
                interactions: 1,
                high_risk: 1
            }
        );
        assert_eq!(report.extraction.items()[0].dosage, "500 mg");
        assert_eq!(report.extraction.items()[0].frequency, "N/A");
        assert_eq!(report.dosage.items()[0].warning, None);
        assert_eq!(report.alternatives, Listing::Empty(NO_ALTERNATIVES));

        let text = report.to_string();
        assert!(text.contains("Warfarin + Ibuprofen (high)"));
        assert!(text.contains("bleeding risk"));
        assert!(text.contains(NO_ALTERNATIVES));
        assert!(text.contains("Classes: analgesic, antipyretic"));
    }

    #[test]
    fn ready_panels_map_every_item() {
        let mut verifier = ViewController::<AnalysisResult>::new();
        let ticket = verifier.begin();
        verifier.resolve::<String>(
            ticket,
            Ok(AnalysisResult {
                drugs: Vec::new(),
                interactions: Vec::new(),
                dosage_recommendations: Vec::new(),
                alternative_suggestions: vec![AlternativeSuggestion {
                    for_drug: "Ibuprofen".into(),
                    suggested_drug: "Paracetamol".into(),
                    suggestion: "Paracetamol for pain".into(),
                    reason: "Lower GI risk".into(),
                }],
            }),
        );
        let Panel::Ready(report) = render_verifier(verifier.state()) else {
            panic!("expected ready panel");
        };
        assert_eq!(report.alternatives.len(), 1);
        assert_eq!(report.extraction, Listing::Empty(NO_EXTRACTION));

        let mut finder = ViewController::<Vec<AlternativeFinderResult>>::new();
        let ticket = finder.begin();
        finder.resolve::<String>(
            ticket,
            Ok(vec![AlternativeFinderResult {
                suggested_drug: "Azithromycin".into(),
                reasoning: "Macrolide".into(),
                benefits: "No penicillin exposure".into(),
                considerations: "QT prolongation".into(),
            }]),
        );
        let Panel::Ready(cards) = render_alternatives(finder.state()) else {
            panic!("expected ready panel");
        };
        assert_eq!(cards.items()[0].suggested_drug, "Azithromycin");
    }

    #[test]
    fn finder_empty_message() {
        let mut controller = ViewController::<Vec<AlternativeFinderResult>>::new();
        let ticket = controller.begin();
        controller.resolve::<String>(ticket, Ok(Vec::new()));
        let text = render_alternatives(controller.state()).to_string();
        assert_eq!(text.trim_end(), FINDER_NONE_FOUND);
    }

    #[test]
    fn validation_error_renders_in_error_slot() {
        let mut controller = ViewController::<AnalysisResult>::new();
        controller.reject("Please enter a valid patient age.");
        assert_eq!(
            render_verifier(controller.state()).to_string(),
            "Error: Please enter a valid patient age.\n"
        );
    }
}
