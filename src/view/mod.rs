//! Per-screen presentation: input forms, the result-area state machine, and
//! the mapping from results to display models.

pub mod render;
pub mod screens;
pub mod state;

pub use render::{
    AlternativeCard, AlternativeView, DosageView, DrugCard, ExtractionRow, InteractionView,
    Listing, Panel, QuickInsights, SeverityStyle, VerifierReport, render_alternatives,
    render_interactions, render_verifier,
};
pub use screens::{
    AlternativeForm, AlternativeQuery, AlternativeScreen, Form, InteractionForm,
    InteractionScreen, Screen, VerifierForm, VerifierScreen,
};
pub use state::{Ticket, ViewController, ViewEvent, ViewState};
