use chrono::Local;
use clap::Args;
use ds_qualifier::assessment::{
    custom_weight_field, export_document, AssessmentResult, Assessor, PlainTextRenderer,
    Submission, CUSTOM_PROFILE,
};
use ds_qualifier::config::AppConfig;
use ds_qualifier::error::AppError;
use std::fs::File;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// JSON object of submitted fields, e.g. {"ds1": 1, "ts2": "unknown"}
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Weighting profile key (overrides any `profile` field in the answers file)
    #[arg(long)]
    pub(crate) profile: Option<String>,
    /// Custom domain weight as `<domain>=<weight>`; selects the custom profile
    #[arg(long = "weight", value_parser = parse_weight_override)]
    pub(crate) weights: Vec<(String, String)>,
    /// Write the plain-text export into this directory
    #[arg(long)]
    pub(crate) export_dir: Option<PathBuf>,
    /// Print the full result as JSON instead of the summary
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn parse_weight_override(raw: &str) -> Result<(String, String), String> {
    let (domain, weight) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected <domain>=<weight>, got '{raw}'"))?;
    let domain = domain.trim();
    if domain.is_empty() {
        return Err(format!("missing domain name in '{raw}'"));
    }
    Ok((domain.to_string(), weight.trim().to_string()))
}

fn load_assessor() -> Result<Assessor, AppError> {
    let config = AppConfig::load()?;
    Ok(Assessor::load(&config.catalog)?)
}

pub(crate) fn build_submission(
    mut submission: Submission,
    profile: Option<String>,
    weights: Vec<(String, String)>,
) -> Submission {
    if !weights.is_empty() {
        submission.insert("profile", CUSTOM_PROFILE);
    }
    if let Some(profile) = profile {
        submission.insert("profile", profile);
    }
    for (domain, weight) in weights {
        submission.insert(custom_weight_field(&domain), weight);
    }
    submission
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs {
        answers,
        profile,
        weights,
        export_dir,
        json,
    } = args;

    let assessor = load_assessor()?;
    let submission: Submission = serde_json::from_reader(File::open(&answers)?)?;
    let submission = build_submission(submission, profile, weights);
    let result = assessor.assess(&submission);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        render_summary(&result);
    }

    if let Some(dir) = export_dir {
        let document = export_document(&PlainTextRenderer, &result, Local::now().naive_local())?;
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(&document.filename);
        std::fs::write(&path, &document.body)?;
        println!("\nExport written to {}", path.display());
    }

    Ok(())
}

pub(crate) fn run_profiles() -> Result<(), AppError> {
    let assessor = load_assessor()?;
    let domains: Vec<&str> = assessor.questions().domain_names().collect();

    println!("Weighting profiles");
    for profile in assessor.profiles().profiles() {
        println!("\n{} ({})", profile.name, profile.key);
        println!("  {}", profile.description);
        if profile.is_custom() {
            println!("  Weights: supplied per submission (1.0x to 2.0x)");
            continue;
        }
        for domain in &domains {
            let weight = profile.weight_for(domain).unwrap_or(1.0);
            println!("  {:<26} {:.1}x", domain, weight);
        }
    }
    Ok(())
}

pub(crate) fn run_check() -> Result<(), AppError> {
    let assessor = load_assessor()?;
    println!(
        "Catalogs valid: {} domains, {} questions ({} points), {} profiles",
        assessor.questions().domains().len(),
        assessor.questions().question_count(),
        assessor.questions().max_score(),
        assessor.profiles().profiles().len()
    );
    Ok(())
}

fn render_summary(result: &AssessmentResult) {
    println!("Digital Sovereignty Readiness Assessment");
    println!(
        "Profile: {} ({})",
        result.profile.name, result.profile.description
    );
    println!(
        "{} | {:.1} of {} points weighted ({}%) | raw {} points",
        result.maturity.headline,
        result.composite_score,
        result.max_score,
        result.composite_percentage,
        result.raw_total
    );

    println!("\nDomains:");
    for domain in &result.domains {
        let marker = if domain.emphasized { "*" } else { " " };
        println!(
            " {marker}{:<26} {}/{} {:>3}%  {:.1}x  {}",
            domain.domain,
            domain.raw_score,
            domain.max_score,
            domain.percentage,
            domain.weight,
            domain.maturity_label
        );
    }

    let actions = result.recommended_actions;
    println!("\n{}", actions.heading);
    for action in actions.actions {
        println!("  - {}", action.title);
    }

    if result.unknown_count() > 0 {
        println!("\nQuestions to research ({}):", result.unknown_count());
        for group in &result.unknown_questions {
            println!("  {}", group.domain);
            for question in &group.questions {
                println!("    {} {}", question.id, question.text);
            }
        }
    }
}
