//! End-to-end screen behavior: validation, submission, rendering, and stale
//! response handling.

mod common;

#[cfg(test)]
mod screen_flow_tests {
    use super::common::{ScriptedOracle, WARFARIN_ANALYSIS};
    use rxverify::view::{
        AlternativeForm, InteractionForm, Listing, Panel, SeverityStyle, VerifierForm,
        render_alternatives, render_interactions, render_verifier,
    };
    use rxverify::{
        AlternativeScreen, AnalysisClient, InteractionScreen, Operation, VerifierScreen, ViewState,
    };

    #[tokio::test]
    async fn test_empty_forms_never_send_requests() {
        let client = AnalysisClient::new(ScriptedOracle::replying(WARFARIN_ANALYSIS));

        let mut verifier = VerifierScreen::new();
        verifier.form.age = "45".into();
        let state = verifier.submit(&client).await;
        assert_eq!(
            state.error(),
            Some("Please enter a prescription or upload an image.")
        );

        let mut checker = InteractionScreen::new();
        let state = checker.submit(&client).await;
        assert_eq!(
            state,
            &ViewState::ValidationError("Please enter a list of drugs to check.".into())
        );

        let mut finder = AlternativeScreen::with_form(AlternativeForm {
            condition: "Headache".into(),
            ..Default::default()
        });
        let state = finder.submit(&client).await;
        assert_eq!(
            state.error(),
            Some("Please enter the drug and the condition it's treating.")
        );

        assert_eq!(client.oracle().calls(), 0);
    }

    #[tokio::test]
    async fn test_verifier_renders_warfarin_scenario() {
        let client = AnalysisClient::new(ScriptedOracle::replying(WARFARIN_ANALYSIS));
        let mut screen = VerifierScreen::with_form(VerifierForm {
            age: "67".into(),
            weight: "72".into(),
            prescription: "Warfarin 5 mg once daily. Ibuprofen 400 mg three times daily.".into(),
            image: None,
        });

        let state = screen.submit(&client).await;
        let Panel::Ready(report) = render_verifier(state) else {
            panic!("expected a rendered report, got {:?}", state);
        };

        assert_eq!(report.insights.drugs_detected, 2);
        assert_eq!(report.insights.high_risk, 1);
        let interactions = report.interactions.items();
        assert_eq!(interactions.len(), 1);
        assert_eq!(interactions[0].drugs, "Warfarin + Ibuprofen");
        assert_eq!(interactions[0].style, SeverityStyle::High);
        assert_eq!(
            interactions[0].style.css_class(),
            "border-red-500 bg-red-500/10 text-red-400"
        );
        assert_eq!(report.alternatives.len(), 1);

        let text = report.to_string();
        assert!(text.contains("Warning: Bleeding risk in elderly patients."));
        assert!(text.contains("For: Ibuprofen"));
        assert!(text.contains("Reason: Interaction with Warfarin."));
    }

    #[tokio::test]
    async fn test_malformed_reply_shows_generic_message() {
        let client = AnalysisClient::new(ScriptedOracle::replying("not json at all"));
        let mut screen = VerifierScreen::with_form(VerifierForm::sample());

        let state = screen.submit(&client).await;
        assert!(state.result().is_none());
        assert_eq!(
            state.error(),
            Some(Operation::AnalyzePrescription.failure_message())
        );
        assert_eq!(
            render_verifier(state),
            Panel::Error(Operation::AnalyzePrescription.failure_message().to_string())
        );
    }

    #[tokio::test]
    async fn test_empty_results_render_found_nothing() {
        let oracle = ScriptedOracle::replying(r#"{"interactions": []}"#);
        let client = AnalysisClient::new(oracle);
        let mut checker = InteractionScreen::with_form(InteractionForm {
            drug_list: "Paracetamol".into(),
        });
        let rendered = render_interactions(checker.submit(&client).await);
        assert_eq!(
            rendered,
            Panel::Ready(Listing::Empty(
                "No potential interactions were found among the specified drugs."
            ))
        );

        let client = AnalysisClient::new(ScriptedOracle::replying(r#"{"suggestions": []}"#));
        let mut finder = AlternativeScreen::with_form(AlternativeForm {
            original_drug: "Paracetamol".into(),
            condition: "Fever".into(),
            patient_context: String::new(),
        });
        let rendered = render_alternatives(finder.submit(&client).await);
        assert!(matches!(rendered, Panel::Ready(Listing::Empty(_))));
        assert!(rendered.to_string().starts_with("No specific alternatives were suggested"));
    }

    #[tokio::test]
    async fn test_idle_placeholders() {
        assert_eq!(
            render_verifier(VerifierScreen::new().state()),
            Panel::Placeholder("Your analysis results will appear here.")
        );
        assert_eq!(
            render_interactions(InteractionScreen::new().state()),
            Panel::Placeholder("Results will be displayed here.")
        );
        assert_eq!(
            render_alternatives(AlternativeScreen::new().state()),
            Panel::Placeholder("Suggestions will be displayed here.")
        );
    }

    #[tokio::test]
    async fn test_only_latest_submission_is_displayed() {
        let first_reply =
            r#"{"interactions": [{"pair": ["A", "B"], "severity": "low", "explanation": "old"}]}"#;
        let second_reply =
            r#"{"interactions": [{"pair": ["C", "D"], "severity": "high", "explanation": "new"}]}"#;
        let client = AnalysisClient::new(
            ScriptedOracle::new()
                .then_reply(first_reply)
                .then_reply(second_reply),
        );

        let mut screen = InteractionScreen::with_form(InteractionForm {
            drug_list: "A, B".into(),
        });
        let (first, first_list) = screen.begin().unwrap();
        screen.form.drug_list = "C, D".into();
        let (second, second_list) = screen.begin().unwrap();

        let first_outcome = client.check_drug_interactions(&first_list).await;
        let second_outcome = client.check_drug_interactions(&second_list).await;

        // Replies arrive out of order.
        assert!(screen.finish(second, second_outcome));
        assert!(!screen.finish(first, first_outcome));

        let interactions = screen.state().result().unwrap();
        assert_eq!(interactions.len(), 1);
        assert_eq!(interactions[0].explanation, "new");
    }

    #[tokio::test]
    async fn test_reply_after_reset_is_ignored() {
        let client = AnalysisClient::new(ScriptedOracle::replying(r#"{"interactions": []}"#));
        let mut screen = InteractionScreen::with_form(InteractionForm {
            drug_list: "Warfarin, Aspirin".into(),
        });

        let (ticket, list) = screen.begin().unwrap();
        assert!(screen.state().is_loading());
        screen.reset();

        let outcome = client.check_drug_interactions(&list).await;
        assert!(!screen.finish(ticket, outcome));
        assert!(screen.state().is_idle());
        assert_eq!(screen.form, InteractionForm::default());
    }

    #[tokio::test]
    async fn test_resubmit_after_failure() {
        let client = AnalysisClient::new(
            ScriptedOracle::new()
                .then_reply("garbage")
                .then_reply(r#"{"interactions": []}"#),
        );
        let mut screen = InteractionScreen::with_form(InteractionForm {
            drug_list: "Warfarin, Aspirin".into(),
        });

        assert!(matches!(screen.submit(&client).await, ViewState::Failed(_)));
        assert!(matches!(screen.submit(&client).await, ViewState::Success(_)));
        assert_eq!(client.oracle().calls(), 2);
    }
}
