//! Table and JSON rendering of a comparison report.

use std::io::Write;

use crossterm::style::{Color, Stylize};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use treecmp_compare::{CompareReport, DifferenceKind, DifferenceRecord, Location};

const NAME_WIDTH: usize = 24;
const PATH_WIDTH: usize = 44;
const KIND_WIDTH: usize = 32;
const FOLDER_WIDTH: usize = 8;

/// Print the difference table, summary line and traversal warnings.
pub fn render_report(report: &CompareReport, out: &mut impl Write, color: bool) -> std::io::Result<()> {
    let rule_width = NAME_WIDTH + PATH_WIDTH + KIND_WIDTH + FOLDER_WIDTH + 3;
    if color {
        // The caller already honoured NO_COLOR and terminal detection
        crossterm::style::force_color_output(true);
    }

    writeln!(out)?;
    writeln!(out, "{}", "─".repeat(rule_width))?;
    writeln!(out, " 1: {}", report.first_root.display())?;
    writeln!(out, " 2: {}", report.second_root.display())?;
    writeln!(
        out,
        " {} vs {} entries, compared in {:.2}s",
        report.first_stats.total(),
        report.second_stats.total(),
        report.duration.as_secs_f64()
    )?;
    writeln!(out, "{}", "─".repeat(rule_width))?;

    if !report.records.is_empty() {
        let header = format!(
            "{} {} {} {}",
            fit("FILENAME", NAME_WIDTH),
            fit("RELATIVE PATH", PATH_WIDTH),
            fit("DIFFERENCE", KIND_WIDTH),
            fit("FOLDER", FOLDER_WIDTH)
        );
        if color {
            writeln!(out, "{}", header.bold())?;
        } else {
            writeln!(out, "{header}")?;
        }

        for record in &report.records {
            write_row(out, record, color)?;
        }
        writeln!(out)?;
    }

    writeln!(out, "{}", summary(report))?;

    if report.has_warnings() {
        writeln!(out)?;
        writeln!(out, "{} warning(s) while reading the folders:", report.warnings.len())?;
        for warning in &report.warnings {
            writeln!(out, "  {}", warning.message)?;
        }
    }

    Ok(())
}

/// Print the whole report as pretty JSON.
pub fn render_json(report: &CompareReport, out: &mut impl Write) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)
}

fn write_row(out: &mut impl Write, record: &DifferenceRecord, color: bool) -> std::io::Result<()> {
    let row = format!(
        "{} {} {} {}",
        fit(&record.name, NAME_WIDTH),
        fit(&record.relative_path.to_string_lossy(), PATH_WIDTH),
        fit(&describe(&record.kind), KIND_WIDTH),
        fit(folder_label(record.location), FOLDER_WIDTH)
    );

    if color {
        writeln!(out, "{}", row.with(kind_color(&record.kind)))
    } else {
        writeln!(out, "{row}")
    }
}

/// Summary line shown after the table.
fn summary(report: &CompareReport) -> String {
    match report.total_count {
        // Parts of a tree were skipped; identical is not established
        0 if report.has_warnings() => "No differences found in the readable parts of both folders".to_string(),
        0 => "Folders are identical".to_string(),
        1 => "1 difference found".to_string(),
        n => format!("{n} differences found"),
    }
}

/// Text for the DIFFERENCE column.
fn describe(kind: &DifferenceKind) -> String {
    match kind {
        DifferenceKind::TypeDiffers { first, second } => format!("type differs ({first}/{second})"),
        DifferenceKind::SizeDiffers { first, second } => {
            format!("size differs ({} / {})", format_size(*first), format_size(*second))
        }
        other => other.label().to_string(),
    }
}

fn folder_label(location: Location) -> &'static str {
    match location {
        Location::First => "Folder 1",
        Location::Second => "Folder 2",
        Location::Both => "Both",
    }
}

/// Only-in-either as warning/success, size/content as error, the rest as info.
fn kind_color(kind: &DifferenceKind) -> Color {
    match kind {
        DifferenceKind::OnlyInFirst => Color::Yellow,
        DifferenceKind::OnlyInSecond => Color::Green,
        DifferenceKind::SizeDiffers { .. } | DifferenceKind::ContentDiffers => Color::Red,
        DifferenceKind::TypeDiffers { .. } | DifferenceKind::PermissionError => Color::Cyan,
    }
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Truncate to `width` display columns (marking the cut with `…`) and pad.
fn fit(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;

    if s.width() <= width {
        out.push_str(s);
        used = s.width();
    } else {
        for c in s.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > width.saturating_sub(1) {
                break;
            }
            out.push(c);
            used += w;
        }
        out.push('…');
        used += 1;
    }

    out.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;
    use treecmp_compare::{EntryKind, Platform, ScanWarning, SideStats};

    fn report(records: Vec<DifferenceRecord>) -> CompareReport {
        CompareReport::new(
            PathBuf::from("/first"),
            PathBuf::from("/second"),
            records,
            Vec::new(),
            (SideStats::default(), SideStats::default()),
            Platform::Linux,
            Duration::ZERO,
        )
    }

    fn render(report: &CompareReport) -> String {
        let mut out = Vec::new();
        render_report(report, &mut out, false).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_fit_pads_and_truncates() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 4), "abc…");
        assert_eq!(fit("abcd", 4), "abcd");
        assert_eq!(fit("日本語テキスト", 5).width(), 5);
    }

    #[test]
    fn test_identical_summary() {
        let text = render(&report(Vec::new()));
        assert!(text.contains("Folders are identical"));
        assert!(!text.contains("FILENAME"));
    }

    #[test]
    fn test_table_columns_and_count() {
        let text = render(&report(vec![
            DifferenceRecord::only_in_first("a/f1.txt"),
            DifferenceRecord::size_differs("b.txt", 2, 4),
            DifferenceRecord::type_differs("sub", EntryKind::Directory, EntryKind::File),
        ]));

        assert!(text.contains("FILENAME"));
        assert!(text.contains("RELATIVE PATH"));
        assert!(text.contains("DIFFERENCE"));
        assert!(text.contains("FOLDER"));
        assert!(text.contains("only in first"));
        assert!(text.contains("Folder 1"));
        assert!(text.contains("size differs (2 B / 4 B)"));
        assert!(text.contains("type differs (directory/file)"));
        assert!(text.contains("3 differences found"));
    }

    #[test]
    fn test_rows_have_fixed_width() {
        let long = "x".repeat(200);
        let text = render(&report(vec![
            DifferenceRecord::content_differs(format!("{long}/{long}")),
            DifferenceRecord::only_in_second("short"),
        ]));

        let rows: Vec<_> = text
            .lines()
            .filter(|l| l.contains("content differs") || l.contains("only in second"))
            .collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].width(), rows[1].width());
    }

    #[test]
    fn test_warnings_listed() {
        let mut r = report(Vec::new());
        r.warnings.push(ScanWarning::permission_denied("/first/locked"));

        let text = render(&r);
        assert!(text.contains("1 warning(s)"));
        assert!(text.contains("/first/locked"));
        assert!(!text.contains("Folders are identical"));
        assert!(text.contains("No differences found in the readable parts"));
    }

    #[test]
    fn test_colored_output_contains_escape_codes() {
        let mut out = Vec::new();
        render_report(&report(vec![DifferenceRecord::content_differs("f")]), &mut out, true).unwrap();
        assert!(String::from_utf8(out).unwrap().contains('\u{1b}'));
    }

    #[test]
    fn test_json_output() {
        let mut out = Vec::new();
        render_json(&report(vec![DifferenceRecord::content_differs("f")]), &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["total_count"], 1);
        assert_eq!(value["records"][0]["kind"]["type"], "content_differs");
    }
}
