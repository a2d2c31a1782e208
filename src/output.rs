//! CLI output formatting.
//!
//! Two displays: live progress lines while the pipeline runs, and a summary
//! once it has finished. Artifacts are shown by label first, with the file
//! path as secondary context.
//!
//! # Output Format
//!
//! ## Progress
//!
//! ```text
//! Source: photo.jpg (640×480)
//!     base → out/photo.png
//!     gray → out/photo-gray.png
//!     skipped gg0000: invalid hex digit in color code "gg0000"
//!     ffb6c1 → out/photo-ffb6c1.png
//! ```
//!
//! ## Summary
//!
//! ```text
//! photo.jpg 640×480 → 128×128
//! 001 base → out/photo.png
//! 002 gray → out/photo-gray.png
//! ...
//! 011 ffb6c1 → out/photo-ffb6c1.png (#ffb6c1)
//!
//! Skipped
//!     gg0000: invalid hex digit in color code "gg0000"
//!
//! Wrote 11 images, skipped 1 color
//! ```
//!
//! # Architecture
//!
//! Each display has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::pipeline::{PipelineEvent, RunReport, SkippedColor};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// `gg0000` when the name is the code, `name (code)` otherwise.
fn skipped_label(skip: &SkippedColor) -> String {
    if skip.name == skip.code {
        skip.name.clone()
    } else {
        format!("{} ({})", skip.name, skip.code)
    }
}

// ============================================================================
// Progress
// ============================================================================

/// Format a single pipeline progress event as display lines.
pub fn format_pipeline_event(event: &PipelineEvent) -> Vec<String> {
    match event {
        PipelineEvent::SourceLoaded {
            path,
            width,
            height,
        } => vec![format!("Source: {path} ({width}×{height})")],
        PipelineEvent::ArtifactWritten { label, path } => {
            vec![format!("{}{label} → {path}", indent(1))]
        }
        PipelineEvent::ColorSkipped { name, code, reason } => {
            let skip = SkippedColor {
                name: name.clone(),
                code: code.clone(),
                reason: reason.clone(),
            };
            vec![format!("{}skipped {}: {reason}", indent(1), skipped_label(&skip))]
        }
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Format the end-of-run summary.
pub fn format_run_summary(report: &RunReport) -> Vec<String> {
    let mut lines = Vec::new();
    let (sw, sh) = report.source_dimensions;
    let (tw, th) = report.target_dimensions;
    lines.push(format!("{} {sw}×{sh} → {tw}×{th}", report.source));

    for (i, artifact) in report.artifacts.iter().enumerate() {
        let mut line = format!(
            "{} {} → {}",
            format_index(i + 1),
            artifact.label,
            artifact.path
        );
        if let Some(code) = &artifact.color {
            line.push_str(&format!(" (#{code})"));
        }
        lines.push(line);
    }

    if !report.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for skip in &report.skipped {
            lines.push(format!(
                "{}{}: {}",
                indent(1),
                skipped_label(skip),
                skip.reason
            ));
        }
    }

    lines.push(String::new());
    let mut total = format!("Wrote {}", plural(report.artifacts.len(), "image", "images"));
    if !report.skipped.is_empty() {
        total.push_str(&format!(
            ", skipped {}",
            plural(report.skipped.len(), "color", "colors")
        ));
    }
    lines.push(total);
    lines
}

pub fn print_run_summary(report: &RunReport) {
    for line in format_run_summary(report) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ArtifactRecord;

    fn artifact(label: &str, path: &str, color: Option<&str>) -> ArtifactRecord {
        ArtifactRecord {
            label: label.into(),
            path: path.into(),
            width: 128,
            height: 128,
            color: color.map(String::from),
        }
    }

    fn report() -> RunReport {
        RunReport {
            source: "photo.jpg".into(),
            source_dimensions: (640, 480),
            target_dimensions: (128, 128),
            artifacts: vec![
                artifact("base", "out/photo.png", None),
                artifact("gray", "out/photo-gray.png", None),
                artifact("sakura", "out/photo-sakura.png", Some("fef4f4")),
            ],
            skipped: Vec::new(),
        }
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn source_event_shows_dimensions() {
        let lines = format_pipeline_event(&PipelineEvent::SourceLoaded {
            path: "in/photo.jpg".into(),
            width: 640,
            height: 480,
        });
        assert_eq!(lines, vec!["Source: in/photo.jpg (640×480)"]);
    }

    #[test]
    fn artifact_event_is_indented() {
        let lines = format_pipeline_event(&PipelineEvent::ArtifactWritten {
            label: "nega".into(),
            path: "out-nega.png".into(),
        });
        assert_eq!(lines, vec!["    nega → out-nega.png"]);
    }

    #[test]
    fn skipped_event_names_code_once_when_same() {
        let lines = format_pipeline_event(&PipelineEvent::ColorSkipped {
            name: "zz".into(),
            code: "zz".into(),
            reason: "bad".into(),
        });
        assert_eq!(lines, vec!["    skipped zz: bad"]);
    }

    #[test]
    fn skipped_event_shows_name_and_code() {
        let lines = format_pipeline_event(&PipelineEvent::ColorSkipped {
            name: "fog".into(),
            code: "zz".into(),
            reason: "bad".into(),
        });
        assert_eq!(lines, vec!["    skipped fog (zz): bad"]);
    }

    #[test]
    fn summary_lists_artifacts_in_order() {
        let lines = format_run_summary(&report());
        assert_eq!(lines[0], "photo.jpg 640×480 → 128×128");
        assert_eq!(lines[1], "001 base → out/photo.png");
        assert_eq!(lines[2], "002 gray → out/photo-gray.png");
        assert_eq!(lines[3], "003 sakura → out/photo-sakura.png (#fef4f4)");
        assert_eq!(lines.last().unwrap(), "Wrote 3 images");
    }

    #[test]
    fn summary_reports_skipped_colors() {
        let mut report = report();
        report.skipped.push(SkippedColor {
            name: "gg0000".into(),
            code: "gg0000".into(),
            reason: "invalid hex digit".into(),
        });
        let lines = format_run_summary(&report);
        assert!(lines.contains(&"Skipped".to_string()));
        assert!(lines.contains(&"    gg0000: invalid hex digit".to_string()));
        assert_eq!(lines.last().unwrap(), "Wrote 3 images, skipped 1 color");
    }

    #[test]
    fn summary_singular_image() {
        let mut report = report();
        report.artifacts.truncate(1);
        assert_eq!(format_run_summary(&report).last().unwrap(), "Wrote 1 image");
    }
}
