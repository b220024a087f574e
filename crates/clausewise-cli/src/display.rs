//! Terminal rendering for analysis results and key-point candidates.
//!
//! Candidates go through the Arrow key-point schema so the table and card
//! views read the same columns.

use arrow::array::*;
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use clausewise_core::schema::key_points;
use clausewise_core::{AnalysisResult, CandidatePoint};

use crate::Format;

const MAX_TEXT_CHARS: usize = 80;

// ── Analysis ──

/// Print the metadata block of an analysis result.
pub fn print_analysis_header(result: &AnalysisResult) {
    let meta = &result.metadata;
    println!("=== Analysis ({}) ===", meta.processing_method);
    println!("  {:<22} {}", "provider", meta.provider_or_model);
    println!("  {:<22} {}", "mode", meta.mode.as_str());
    println!("  {:<22} {}", "success", if meta.success { "yes" } else { "no" });
    if meta.summary_provider != meta.key_points_provider {
        println!("  {:<22} {}", "summary_provider", meta.summary_provider);
        println!("  {:<22} {}", "key_points_provider", meta.key_points_provider);
    }
    println!("  {:<22} {}", "candidates_considered", meta.candidates_considered);
    println!("  {:<22} {} ms", "elapsed", meta.elapsed_ms);
    println!("  {:<22} {}", "analyzed_at", meta.analyzed_at.to_rfc3339());
    println!();
}

/// Print an analysis result as a card: metadata, summary, numbered points.
pub fn print_analysis(result: &AnalysisResult) {
    print_analysis_header(result);

    println!("Summary");
    for paragraph in result.summary.split("\n\n") {
        println!("  {}", paragraph.trim());
    }
    println!();

    println!("Key points ({})", result.key_points.len());
    for (i, point) in result.key_points.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, point);
    }
}

// ── Candidates ──

pub fn print_points(points: &[CandidatePoint], format: Format) -> anyhow::Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(points)?),
        Format::Table => {
            let batch = key_points::to_batch(points)?;
            println!("{}", pretty_format_batches(&[truncate_text(&batch)?])?);
        }
        Format::Text => print_point_cards(&key_points::to_batch(points)?),
    }
    Ok(())
}

/// One short block per row of a key-point batch.
fn print_point_cards(batch: &RecordBatch) {
    if batch.num_rows() == 0 {
        println!("(no candidates)");
        return;
    }
    let category = utf8_col(batch, "category");
    let text = utf8_col(batch, "text");
    let concept = utf8_col(batch, "matched_concept");
    let entity = utf8_col(batch, "entity_type");
    let confidence = batch
        .column_by_name("confidence")
        .and_then(|c| c.as_any().downcast_ref::<Float32Array>());
    let position = batch
        .column_by_name("position")
        .and_then(|c| c.as_any().downcast_ref::<UInt64Array>());

    for i in 0..batch.num_rows() {
        let cat = category.and_then(|a| col_str(a, i)).unwrap_or("-");
        let conf = confidence.map(|a| a.value(i)).unwrap_or_default();
        let pos = position.map(|a| a.value(i)).unwrap_or_default();
        println!("[{:>2}] {cat:<20} {conf:.2}  @{pos}", i + 1);
        if let Some(t) = text.and_then(|a| col_str(a, i)) {
            println!("     {t}");
        }
        if let Some(c) = concept.and_then(|a| col_str(a, i)) {
            println!("     concept: {c}");
        }
        if let Some(e) = entity.and_then(|a| col_str(a, i)) {
            println!("     entity:  {e}");
        }
    }
}

/// Copy of `batch` with the `text` column shortened for table output.
fn truncate_text(batch: &RecordBatch) -> anyhow::Result<RecordBatch> {
    let Some(idx) = batch.schema().index_of("text").ok() else {
        return Ok(batch.clone());
    };
    let Some(texts) = batch.column(idx).as_any().downcast_ref::<StringArray>() else {
        return Ok(batch.clone());
    };
    let short: StringArray = texts.iter().map(|t| t.map(shorten)).collect();
    let mut columns = batch.columns().to_vec();
    columns[idx] = std::sync::Arc::new(short);
    Ok(RecordBatch::try_new(batch.schema(), columns)?)
}

fn shorten(text: &str) -> String {
    if text.chars().count() > MAX_TEXT_CHARS {
        let head: String = text.chars().take(MAX_TEXT_CHARS - 3).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

// ── Helpers ──

fn utf8_col<'a>(batch: &'a RecordBatch, name: &str) -> Option<&'a StringArray> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
}

fn col_str(col: &StringArray, i: usize) -> Option<&str> {
    if col.is_null(i) {
        return None;
    }
    Some(col.value(i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clausewise_core::Category;

    #[test]
    fn shorten_long_text() {
        let long = "x".repeat(200);
        let short = shorten(&long);
        assert_eq!(short.chars().count(), MAX_TEXT_CHARS);
        assert!(short.ends_with("..."));
        assert_eq!(shorten("brief"), "brief");
    }

    #[test]
    fn truncate_keeps_other_columns() {
        let points = vec![CandidatePoint::new("y".repeat(120), Category::Keyword, 0.5, 3)];
        let batch = key_points::to_batch(&points).unwrap();
        let short = truncate_text(&batch).unwrap();
        assert_eq!(short.num_columns(), batch.num_columns());
        let text = utf8_col(&short, "text").unwrap();
        assert_eq!(text.value(0).chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn table_renders() {
        let points = vec![
            CandidatePoint::new("$1,500.00", Category::Amount, 0.9, 8),
            CandidatePoint::new("March 1, 2025", Category::Entity, 0.6, 28).with_entity_type("DATE"),
        ];
        let batch = truncate_text(&key_points::to_batch(&points).unwrap()).unwrap();
        let table = pretty_format_batches(&[batch]).unwrap().to_string();
        assert!(table.contains("$1,500.00"));
        assert!(table.contains("DATE"));
    }
}
