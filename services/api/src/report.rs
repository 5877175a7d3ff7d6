use std::path::PathBuf;
use std::sync::Arc;

use admission::admission::{
    AdmissionService, ImportContext, InMemoryApplicantStore, ProgramCatalog, ProgramRanking,
};
use admission::error::AppError;
use clap::Args;

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// Program to rank (catalog name, e.g. "Applied Mathematics")
    #[arg(long)]
    pub(crate) program: String,
    /// CSV score sheet to import before ranking
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Assign every imported row to --program instead of inferring from
    /// the row or the filename
    #[arg(long)]
    pub(crate) force_program: bool,
    /// Treat the sheet as the authoritative applicant set and prune the
    /// rest
    #[arg(long)]
    pub(crate) full_sync: bool,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let store = Arc::new(InMemoryApplicantStore::new());
    let service = AdmissionService::new(store, ProgramCatalog::seed());

    if let Some(path) = &args.csv {
        let file = std::fs::File::open(path)?;
        let context = ImportContext {
            filename: path
                .file_name()
                .and_then(|name| name.to_str())
                .map(str::to_string),
            program_override: args.force_program.then(|| args.program.clone()),
            fallback_date: None,
            full_sync: args.full_sync,
        };
        let summary = service.import_csv(file, &context)?;
        println!(
            "Imported {} new, {} updated, {} deleted",
            summary.inserted, summary.updated, summary.deleted
        );
    }

    let ranking = service.ranking(&args.program)?;
    render_ranking(&ranking);
    Ok(())
}

fn render_ranking(ranking: &ProgramRanking) {
    println!("\nAdmission ranking: {}", ranking.program);
    println!("Budget places: {}", ranking.budget_places);
    match ranking.passing_score {
        Some(score) => println!("Passing score: {score}"),
        None => println!("Passing score: N/A"),
    }

    if ranking.applicants.is_empty() {
        println!("\nNo applicants on file");
        return;
    }

    println!("\nRank | Score | Priority | Probability | Status | Name");
    for entry in &ranking.applicants {
        println!(
            "{:>4} | {:>5} | {:>8} | {:>10}% | {} | {}",
            entry.rank,
            entry.applicant.total_score,
            entry.applicant.priority,
            entry.probability,
            entry.status.label(),
            entry.applicant.name
        );
    }
}
