//! Human-readable reports for the CLI

use crate::corpus::{BuildReport, Rank, TextPosition, VerifyReport};
use crate::utils::format_size;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

fn stdout(color: bool) -> StandardStream {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

fn label(out: &mut StandardStream, text: &str, fg: Color) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(fg)).set_bold(true))?;
    write!(out, "{}", text)?;
    out.reset()
}

/// Summary of one build
pub fn print_build_report(name: Option<&str>, report: &BuildReport, color: bool) -> io::Result<()> {
    let mut out = stdout(color);

    if let Some(name) = name {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
        writeln!(out, "{}", name)?;
        out.reset()?;
    }

    if report.is_complete() {
        label(&mut out, "ok", Color::Green)?;
    } else {
        label(&mut out, "partial", Color::Yellow)?;
    }
    writeln!(
        out,
        "  {}/{} documents, {} ({} bytes)",
        report.documents_written(),
        report.requested,
        format_size(report.corpus_len),
        report.corpus_len
    )?;

    if !report.missing.is_empty() {
        label(&mut out, "missing", Color::Yellow)?;
        writeln!(out, "  ranks {}", join(&report.missing))?;
    }

    Ok(())
}

/// Summary of a verification
pub fn print_verify_report(report: &VerifyReport, color: bool) -> io::Result<()> {
    let mut out = stdout(color);

    if report.is_clean() {
        label(&mut out, "ok", Color::Green)?;
    } else {
        label(&mut out, "warning", Color::Yellow)?;
    }
    writeln!(
        out,
        "  {} documents, {} ({} bytes), {} delimiter bytes",
        report.documents,
        format_size(report.corpus_len),
        report.corpus_len,
        report.delimiter_count
    )?;

    if let (Some(shortest), Some(longest)) = (report.shortest, report.longest) {
        writeln!(out, "    document sizes: {} .. {} bytes", shortest, longest)?;
    }

    if !report.is_clean() {
        label(&mut out, "contains delimiter", Color::Yellow)?;
        writeln!(out, "  documents {}", join(&report.contaminated))?;
    }

    Ok(())
}

/// One line per queried position: `position<TAB>document[<TAB>rank]`
pub fn print_locations(
    locations: &[(TextPosition, Option<usize>, Option<Rank>)],
    color: bool,
) -> io::Result<()> {
    let mut out = stdout(color);

    for &(position, document, rank) in locations {
        write!(out, "{}\t", position)?;
        match (document, rank) {
            (Some(doc), Some(rank)) => writeln!(out, "{}\t{}", doc, rank)?,
            (Some(doc), None) => writeln!(out, "{}", doc)?,
            (None, _) => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
                writeln!(out, "out of range")?;
                out.reset()?;
            }
        }
    }

    Ok(())
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
