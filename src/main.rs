use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use rxverify::config::BackendKind;
use rxverify::logging::{LogLevel, init_logging};
use rxverify::view::{
    AlternativeForm, InteractionForm, VerifierForm, render_alternatives, render_interactions,
    render_verifier,
};
use rxverify::{
    AlternativeReport, AlternativeScreen, AnalysisResult, Config, InteractionReport,
    InteractionScreen, MediaFile, SchemaType, VerifierScreen, ViewState,
};

#[derive(Parser)]
#[command(name = "rxverify")]
#[command(about = "AI-assisted prescription verification", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print the raw result as JSON instead of the rendered view
    #[arg(long, global = true)]
    json: bool,

    /// Answer with `gemini` or the offline `knowledge-base` (overrides RXVERIFY_BACKEND)
    #[arg(long, global = true)]
    backend: Option<BackendKind>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a prescription for a patient
    Verify {
        /// Patient age in years
        #[arg(long)]
        age: Option<String>,
        /// Patient weight in kg (optional)
        #[arg(long)]
        weight: Option<String>,
        /// Prescription text
        #[arg(long, conflicts_with_all = ["image", "sample"])]
        text: Option<String>,
        /// Photo or scan of the prescription
        #[arg(long, conflicts_with = "sample")]
        image: Option<PathBuf>,
        /// Use the built-in sample prescription
        #[arg(long)]
        sample: bool,
    },
    /// Check a list of drugs for interactions
    Interactions {
        /// Drug names, comma-separated
        drug_list: String,
    },
    /// Suggest alternatives to a drug
    Alternatives {
        /// The drug to replace
        #[arg(long)]
        drug: String,
        /// The condition it treats
        #[arg(long)]
        condition: String,
        /// Allergies, other medications, or other patient context (optional)
        #[arg(long, default_value = "")]
        context: String,
    },
    /// Print the response schema sent with a request
    Schema {
        #[arg(value_enum)]
        kind: SchemaKind,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemaKind {
    Analysis,
    Interactions,
    Alternatives,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(LogLevel::from_verbosity(cli.verbose));

    if let Commands::Schema { kind } = cli.command {
        let schema = match kind {
            SchemaKind::Analysis => AnalysisResult::schema(),
            SchemaKind::Interactions => InteractionReport::schema(),
            SchemaKind::Alternatives => AlternativeReport::schema(),
        };
        return match serde_json::to_string_pretty(schema.to_json()) {
            Ok(text) => {
                println!("{}", text);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let config = Config::from_env_with_backend(cli.backend);
    let client = match config.and_then(|config| config.analysis_client()) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    match cli.command {
        Commands::Verify {
            age,
            weight,
            text,
            image,
            sample,
        } => {
            let mut form = if sample {
                VerifierForm::sample()
            } else {
                VerifierForm::default()
            };
            if let Some(age) = age {
                form.age = age;
            }
            if let Some(weight) = weight {
                form.weight = weight;
            }
            if let Some(text) = text {
                form.prescription = text;
            }
            if let Some(path) = image {
                match MediaFile::from_path(&path) {
                    Ok(media) => form.image = Some(media),
                    Err(e) => {
                        eprintln!("Error: could not read {}: {}", path.display(), e);
                        return ExitCode::FAILURE;
                    }
                }
            }

            let mut screen = VerifierScreen::with_form(form);
            let state = screen.submit(&client).await;
            if cli.json {
                return print_json(state);
            }
            print!("{}", render_verifier(state));
            exit_code(state)
        }
        Commands::Interactions { drug_list } => {
            let mut screen = InteractionScreen::with_form(InteractionForm { drug_list });
            let state = screen.submit(&client).await;
            if cli.json {
                return print_json(state);
            }
            print!("{}", render_interactions(state));
            exit_code(state)
        }
        Commands::Alternatives {
            drug,
            condition,
            context,
        } => {
            let mut screen = AlternativeScreen::with_form(AlternativeForm {
                original_drug: drug,
                condition,
                patient_context: context,
            });
            let state = screen.submit(&client).await;
            if cli.json {
                return print_json(state);
            }
            print!("{}", render_alternatives(state));
            exit_code(state)
        }
        Commands::Schema { .. } => ExitCode::SUCCESS,
    }
}

fn exit_code<R>(state: &ViewState<R>) -> ExitCode {
    match state {
        ViewState::Success(_) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}

fn print_json<R: serde::Serialize>(state: &ViewState<R>) -> ExitCode {
    match state {
        ViewState::Success(result) => match serde_json::to_string_pretty(result) {
            Ok(text) => {
                println!("{}", text);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        },
        other => {
            if let Some(message) = other.error() {
                eprintln!("Error: {}", message);
            }
            ExitCode::FAILURE
        }
    }
}
