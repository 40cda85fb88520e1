//! Human-readable console reports.

use super::options::ReportOptions;
use crate::model::{MastersReport, OptimizationOpportunity, Severity, SlideMediaStats};

const RULE_WIDTH: usize = 80;

/// Format a byte count for people: `0.0 MB`, `512 B`, `1.5 KB`, `2.3 MB`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0.0 MB".to_string();
    }
    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64 / 1024.0;
    for unit in ["KB", "MB"] {
        if value < 1024.0 {
            return format!("{:.1} {}", value, unit);
        }
        value /= 1024.0;
    }
    format!("{:.1} GB", value)
}

fn rule(c: char) -> String {
    c.to_string().repeat(RULE_WIDTH)
}

/// Render the ranked slide list.
pub fn render_ranking(
    results: &[SlideMediaStats],
    filename: &str,
    options: &ReportOptions,
) -> String {
    let mut output = String::new();
    output.push_str(&format!("\nAnalyzing: {}\n", filename));
    output.push_str(&format!("\nTotal slides: {}\n", results.len()));
    output.push_str("\nRanked by media size (descending):\n\n");

    let shown = options.top.unwrap_or(results.len()).min(results.len());
    for (rank, stats) in results[..shown].iter().enumerate() {
        output.push_str(&format!(
            "#{:<3} Slide {:<3} | {:>10} | title=\"{}\"\n",
            rank + 1,
            stats.slide_index,
            format_bytes(stats.total_media_bytes),
            stats.display_title()
        ));
    }

    output.push('\n');
    output
}

fn severity_marker(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "🔴 HIGH",
        Severity::Medium => "🟡 MEDIUM",
        Severity::Low => "🟢 LOW",
    }
}

/// Render the image optimization report.
pub fn render_optimization_report(
    opportunities: &[OptimizationOpportunity],
    filename: &str,
) -> String {
    let mut output = String::new();

    if opportunities.is_empty() {
        output.push_str(&format!("\nOptimization Report: {}\n", filename));
        output.push_str("\nNo optimization opportunities found. Your images are well-optimized!\n");
        return output;
    }

    let total_savings: u64 = opportunities.iter().map(|o| o.savings_bytes).sum();
    let total_current: u64 = opportunities.iter().map(|o| o.current_bytes).sum();
    let savings_pct = if total_current > 0 {
        total_savings as f64 / total_current as f64 * 100.0
    } else {
        0.0
    };
    let count = |severity: Severity| {
        opportunities
            .iter()
            .filter(|o| o.severity == severity)
            .count()
    };

    output.push_str(&format!("\n{}\n", rule('=')));
    output.push_str(&format!("OPTIMIZATION REPORT: {}\n", filename));
    output.push_str(&format!("{}\n", rule('=')));
    output.push_str("\nSUMMARY:\n");
    output.push_str(&format!("  Total opportunities found: {}\n", opportunities.len()));
    output.push_str(&format!(
        "  Potential savings: {} ({:.1}% reduction)\n",
        format_bytes(total_savings),
        savings_pct
    ));
    output.push_str(&format!(
        "  High priority: {} | Medium: {} | Low: {}\n",
        count(Severity::High),
        count(Severity::Medium),
        count(Severity::Low)
    ));

    output.push_str(&format!("\n{}\n", rule('=')));
    output.push_str("RECOMMENDATIONS (sorted by potential savings):\n");
    output.push_str(&format!("{}\n\n", rule('=')));

    for (idx, opp) in opportunities.iter().enumerate() {
        output.push_str(&format!(
            "#{} - Slide {}: {}\n",
            idx + 1,
            opp.slide_index,
            opp.slide_title.as_deref().unwrap_or("(no title)")
        ));
        output.push_str(&format!("    Priority: {}\n", severity_marker(opp.severity)));
        output.push_str(&format!(
            "    Current: {} | {} | {}\n",
            format_bytes(opp.current_bytes),
            opp.current_format,
            opp.current_dimensions
        ));
        output.push_str(&format!("    Display size: {} pixels\n", opp.display_dimensions));
        output.push_str(&format!(
            "    Recommended: {} | {}\n",
            opp.recommended_format, opp.recommended_dimensions
        ));
        output.push_str(&format!(
            "    Potential savings: {} ({:.1}%)\n",
            format_bytes(opp.savings_bytes),
            opp.savings_percent
        ));
        if opp.is_shared {
            output.push_str(
                "    ⚠️  SHARED: This image appears on multiple slides - optimization affects all\n",
            );
        }
        output.push_str(&format!("    💡 {}\n\n", opp.details));
    }

    output.push_str(&format!("{}\n", rule('=')));
    output.push_str("NOTES FOR CONFERENCE PRESENTATIONS:\n");
    output.push_str(&format!("{}\n", rule('=')));
    output.push_str("  • Most conference projectors are 1920x1080 (Full HD)\n");
    output.push_str("  • 2x resolution (e.g., 1536x864 for a 768x432 display) ensures retina quality\n");
    output.push_str("  • Images larger than 2560px rarely improve visual quality on projectors\n");
    output.push_str("  • JPEG quality 85-90 is visually identical to quality 95-100 when projected\n");
    output.push_str("  • PNG is best for screenshots/diagrams; JPEG is best for photos\n\n");
    output
}

/// Render the slide masters and layouts report.
pub fn render_masters_report(report: &MastersReport, filename: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", rule('=')));
    output.push_str(&format!("SLIDE MASTERS REPORT: {}\n", filename));
    output.push_str(&format!("{}\n", rule('=')));

    output.push_str("\nSUMMARY:\n");
    output.push_str(&format!("  Total slide masters: {}\n", report.total_masters));
    output.push_str(&format!("  Total layouts: {}\n", report.total_layouts));
    output.push_str(&format!("  Unused layouts: {}\n", report.unused_layouts));
    output.push_str(&format!(
        "\n  Media in masters: {}\n",
        format_bytes(report.total_master_media_bytes)
    ));
    output.push_str(&format!(
        "  Media in layouts: {}\n",
        format_bytes(report.total_layout_media_bytes)
    ));
    output.push_str(&format!(
        "  Media in UNUSED layouts: {}\n",
        format_bytes(report.unused_layout_media_bytes)
    ));
    if report.unused_layout_media_bytes > 0 {
        output.push_str(&format!(
            "\n  ⚠️  You could save {} by deleting unused layouts\n",
            format_bytes(report.unused_layout_media_bytes)
        ));
    }

    for master in &report.masters {
        output.push_str(&format!("\n{}\n", rule('-')));
        output.push_str(&format!(
            "MASTER {}: {}\n",
            master.master_index,
            master.display_name()
        ));
        output.push_str(&format!("{}\n", rule('-')));

        if master.media.media_count > 0 {
            output.push_str(&format!(
                "  Media on master: {} ({} items)\n",
                format_bytes(master.media.total_media_bytes),
                master.media.media_count
            ));
        } else {
            output.push_str("  Media on master: (none)\n");
        }
        output.push_str(&format!(
            "  Layouts: {} total, {} media\n",
            master.layouts.len(),
            format_bytes(master.total_layout_bytes)
        ));
        if master.unused_layout_bytes > 0 {
            output.push_str(&format!(
                "  ⚠️  Unused layout media: {}\n",
                format_bytes(master.unused_layout_bytes)
            ));
        }

        let mut with_media: Vec<_> = master
            .layouts
            .iter()
            .filter(|l| l.media.total_media_bytes > 0)
            .collect();
        with_media.sort_by(|a, b| b.media.total_media_bytes.cmp(&a.media.total_media_bytes));
        if !with_media.is_empty() {
            output.push_str("\n  Layouts with media:\n");
            for layout in with_media {
                let status = if layout.is_used {
                    format!("used by {} slides", layout.slides_using.len())
                } else {
                    "UNUSED".to_string()
                };
                output.push_str(&format!(
                    "    • {}: {} [{}]\n",
                    layout.layout_name,
                    format_bytes(layout.media.total_media_bytes),
                    status
                ));
            }
        }

        let unused_empty: Vec<_> = master
            .layouts
            .iter()
            .filter(|l| !l.is_used && l.media.total_media_bytes == 0)
            .collect();
        if !unused_empty.is_empty() {
            output.push_str("\n  Unused layouts (no media):\n");
            for layout in unused_empty {
                output.push_str(&format!("    • {}\n", layout.layout_name));
            }
        }
    }

    if report.unused_layouts > 0 {
        output.push_str(&format!("\n{}\n", rule('=')));
        output.push_str("RECOMMENDATIONS:\n");
        output.push_str(&format!("{}\n", rule('=')));
        output.push_str("\n  To reduce file size, consider deleting unused layouts:\n");
        output.push_str("  1. Open the presentation in PowerPoint\n");
        output.push_str("  2. Go to View > Slide Master\n");
        output.push_str("  3. Right-click unused layouts and select 'Delete Layout'\n");
        output.push_str("  4. Close the Slide Master view\n");
        if report.unused_layout_media_bytes > 0 {
            output.push_str(&format!(
                "\n  Potential savings: {}\n",
                format_bytes(report.unused_layout_media_bytes)
            ));
        }
    }

    output.push('\n');
    output
}
