mod answer_key;
mod error;
mod html;
mod parser;
mod pdf;
mod server;
mod settings;
mod store;
mod translations;
mod version;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::settings::Settings;
use crate::store::{AnswerKeyEntry, Question};
use crate::translations::TranslationMap;

#[derive(Parser)]
#[command(name = "exam_extract", about = "Exam question extractor and offline study page builder")]
struct Cli {
    /// Settings file (default: exam.toml in the working directory, if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a PDF and show a sample of the first page
    Read { pdf: PathBuf },
    /// Extract numbered questions with A–C answers from a PDF
    Extract {
        pdf: PathBuf,
        output: Option<PathBuf>,
    },
    /// Extract questions grouped under all-caps category headings
    ExtractCategories {
        pdf: PathBuf,
        output: Option<PathBuf>,
    },
    /// Write a CSV listing every text that needs translating
    TranslationTemplate {
        questions: PathBuf,
        output: Option<PathBuf>,
    },
    /// Convert a translations CSV into a JSON object
    TranslationsJson {
        csv: Option<PathBuf>,
        output: Option<PathBuf>,
    },
    /// Generate a random answer-key template to be corrected by hand
    AnswerKey {
        questions: PathBuf,
        output: Option<PathBuf>,
    },
    /// Build a self-contained HTML study page
    BuildApp {
        questions: PathBuf,
        output: Option<PathBuf>,
        /// Answer key JSON
        #[arg(short, long)]
        answers: Option<PathBuf>,
        /// Translations CSV (default: settings `translations_csv`, if it exists)
        #[arg(short, long)]
        translations: Option<PathBuf>,
        /// HTML template (default: built-in)
        #[arg(long)]
        template: Option<PathBuf>,
    },
    /// Serve a directory over HTTP
    Serve {
        dir: Option<PathBuf>,
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    info!(?settings, "settings loaded");

    let result = match cli.command {
        Commands::Read { pdf } => read(&pdf),
        Commands::Extract { pdf, output } => {
            let output = output.unwrap_or_else(|| settings.questions_output.clone());
            extract(&pdf, &output, false)
        }
        Commands::ExtractCategories { pdf, output } => {
            let output = output.unwrap_or_else(|| settings.categorized_output.clone());
            extract(&pdf, &output, true)
        }
        Commands::TranslationTemplate { questions, output } => {
            let output = output.unwrap_or_else(|| settings.translation_template.clone());
            translation_template(&questions, &output)
        }
        Commands::TranslationsJson { csv, output } => {
            let csv = csv.unwrap_or_else(|| settings.translations_csv.clone());
            let output = output.unwrap_or_else(|| settings.translations_json.clone());
            translations_json(&csv, &output, settings.normalize_translation_keys)
        }
        Commands::AnswerKey { questions, output } => {
            let output = output.unwrap_or_else(|| settings.answer_key_output.clone());
            write_answer_key(&questions, &output)
        }
        Commands::BuildApp {
            questions,
            output,
            answers,
            translations,
            template,
        } => {
            let output = output.unwrap_or_else(|| settings.app_output.clone());
            let template = template.or_else(|| settings.template.clone());
            // The settings CSV is only used when it is actually there.
            let translations = translations.or_else(|| {
                Some(settings.translations_csv.clone()).filter(|p| p.exists())
            });
            build_app(
                &settings,
                &questions,
                &output,
                answers.as_deref(),
                translations.as_deref(),
                template.as_deref(),
            )
        }
        Commands::Serve { dir, port } => {
            let dir = dir.unwrap_or_else(|| settings.serve_dir.clone());
            let port = port.unwrap_or(settings.port);
            server::serve(dir, port).await.context("Server failed")
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn read(pdf: &Path) -> anyhow::Result<()> {
    let pages = pdf::read_pages(pdf)?;
    if pages.is_empty() {
        bail!("Failed to extract text from the PDF");
    }
    println!("Successfully read {} pages from the PDF", pages.len());
    println!("\nSample text from first page:");
    println!("{}", "-".repeat(50));
    println!("{}", pdf::sample(&pages[0], 500));
    println!("{}", "-".repeat(50));
    Ok(())
}

fn extract(pdf: &Path, output: &Path, with_categories: bool) -> anyhow::Result<()> {
    println!("Reading PDF: {}", pdf.display());
    let pages = pdf::read_pages(pdf)?;
    if pages.is_empty() {
        bail!("Failed to extract text from the PDF");
    }

    if with_categories {
        println!("Extracting categories, questions, and answers...");
    } else {
        println!("Extracting questions and answers...");
    }
    let questions = parser::process_pages(&pages, with_categories);
    println!("Extracted {} questions with multiple-choice answers", questions.len());

    if with_categories {
        let counts = parser::questions::category_counts(&questions);
        println!("Found {} categories:", counts.len());
        for (category, n) in &counts {
            println!("  - {}: {} questions", category.replace('\n', " "), n);
        }
        if counts.is_empty() {
            println!("No category headings found; try `extract` for an uncategorized run.");
        }
    }

    store::write_json(output, &questions)?;
    println!("Successfully saved {} questions to {}", questions.len(), output.display());

    if let Some(first) = questions.first() {
        println!("\nSample question:");
        println!("{}", serde_json::to_string_pretty(first)?);
    }
    Ok(())
}

fn translation_template(questions_path: &Path, output: &Path) -> anyhow::Result<()> {
    let questions = store::read_questions(questions_path)?;
    let texts = translations::collect_texts(&questions);
    let n = translations::write_template(output, &texts)?;
    println!("Created translation template CSV: {}", output.display());
    println!("The file contains {} unique texts for translation.", n);
    println!("Fill in the second column with translations and save the file.");
    Ok(())
}

fn translations_json(csv: &Path, output: &Path, normalize: bool) -> anyhow::Result<()> {
    let map = TranslationMap::load_csv(csv, normalize)?;
    if map.is_empty() {
        println!("Warning: no translations found in {}", csv.display());
    }
    store::write_json(output, map.entries())?;
    println!("Successfully converted {} to {}", csv.display(), output.display());
    println!("Total translations: {}", map.len());
    Ok(())
}

fn write_answer_key(questions_path: &Path, output: &Path) -> anyhow::Result<()> {
    let questions = store::read_questions(questions_path)?;
    let key = answer_key::generate(&questions, &mut rand::thread_rng());
    store::write_json(output, &key)?;
    println!("Successfully generated correct answers template with {} entries", key.len());
    println!("Please manually update {} with the actual correct answers", output.display());
    Ok(())
}

fn build_app(
    settings: &Settings,
    questions_path: &Path,
    output: &Path,
    answers: Option<&Path>,
    translations_csv: Option<&Path>,
    template: Option<&Path>,
) -> anyhow::Result<()> {
    let questions: Vec<Question> = store::read_questions(questions_path)?;
    let answer_key: Option<Vec<AnswerKeyEntry>> =
        answers.map(|p| store::read_json(p)).transpose()?;
    let translations = translations_csv
        .map(|p| TranslationMap::load_csv(p, settings.normalize_translation_keys))
        .transpose()?;
    if let Some(map) = translations.as_ref() {
        let translated = questions
            .iter()
            .filter(|q| map.lookup(&q.question) != q.question)
            .count();
        info!(translated, total = questions.len(), "questions with a translation");
    }
    let template = match template {
        Some(p) => store::read_text(p)?,
        None => html::DEFAULT_TEMPLATE.to_string(),
    };

    let version = version::next_version(&settings.version_file);
    println!("Generating app version: {}", version);
    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let data = html::AppData {
        questions: &questions,
        answer_key: answer_key.as_deref(),
        translations: translations.as_ref(),
        version: &version,
        generated_at: &generated_at,
    };
    let (page, report) = html::render(&template, &data).context("Failed to render page")?;
    store::write_text(output, &page)?;
    info!(
        question_slots = report.question_slots,
        answer_slots = report.answer_slots,
        "data slots filled"
    );

    println!("Created standalone HTML file: {}", output.display());
    println!(
        "This file contains {} questions and {} translations and can be opened directly in a browser.",
        questions.len(),
        if report.translations_applied {
            translations.as_ref().map_or(0, TranslationMap::len)
        } else {
            0
        }
    );
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
