// Application layer: wires a config source to the engine and reports the outcome.

use crate::adapters::storage::FileRecorder;
use crate::core::engine::{ScanEngine, ScanPlan};
use crate::core::{ConfigProvider, ScanSummary};
use crate::utils::error::{ErrorSeverity, Result, ScanError};
use chrono::Local;

/// Builds the engine for `config` with an output file stamped at call time.
pub fn build_engine(config: &impl ConfigProvider) -> Result<ScanEngine<FileRecorder>> {
    let recorder = FileRecorder::for_run(config.output_path(), config.brand(), Local::now());
    ScanEngine::new(config, recorder)
}

pub async fn execute(config: &impl ConfigProvider, dry_run: bool) -> Result<Option<ScanSummary>> {
    let engine = build_engine(config)?;

    if dry_run {
        tracing::info!("🔍 DRY RUN MODE - No request will be sent");
        print_plan(&engine.plan());
        return Ok(None);
    }

    let summary = engine.run().await?;
    print_summary(&summary);
    Ok(Some(summary))
}

pub fn print_plan(plan: &ScanPlan) {
    println!("📞 Base number: {}", plan.base_prefix);
    println!("📌 Fixed positions: {}", plan.fixed_positions);
    println!("🔢 Candidates: {}", plan.candidate_count);
    if let (Some(first), Some(last)) = (&plan.first_candidate, &plan.last_candidate) {
        println!("   Range: {} .. {}", first, last);
    }
    println!("👷 Workers: {}", plan.workers);
}

pub fn print_summary(summary: &ScanSummary) {
    println!();
    print!("{}", format_summary(summary));
}

/// Renders the end-of-run report, one line per fact, listing every found
/// and every unresolved number.
pub fn format_summary(summary: &ScanSummary) -> String {
    let mut out = String::new();
    out.push_str("✅ Search completed!\n");
    out.push_str(&format!(
        "🔢 Checked {} of {} candidates in {:.1}s\n",
        summary.checked,
        summary.total_candidates,
        summary.elapsed.as_secs_f64()
    ));
    out.push_str(&format!("📱 Found {} available numbers\n", summary.found()));
    for number in &summary.available {
        out.push_str(&format!("   {}\n", number));
    }
    out.push_str(&format!(
        "📁 Results saved to: {}\n",
        summary.output_path.display()
    ));
    if summary.already_known > 0 {
        out.push_str(&format!(
            "⏭️ Skipped {} already-checked numbers\n",
            summary.already_known
        ));
    }
    if !summary.unresolved.is_empty() {
        out.push_str(&format!(
            "⚠️ Warning: {} numbers could not be checked\n",
            summary.unresolved.len()
        ));
        for number in &summary.unresolved {
            out.push_str(&format!("   {}\n", number));
        }
    }
    out
}

/// Process exit code for a failed run.
pub fn exit_code(error: &ScanError) -> i32 {
    match error.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
