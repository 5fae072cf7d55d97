//! Format compile reports, validation results, and errors as text.

use crate::compiler::CompileReport;
use crate::error::CompileError;
use crate::validation::ValidationResult;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Format a successful compile as human-readable text.
pub fn format_compile_report_text(report: &CompileReport, verbose: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n\n",
        format_section_heading(&format!("Profile: {}", report.profile))
    ));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Output", "Count"]);
    table.add_row(vec!["Agents".to_string(), report.agents.len().to_string()]);
    table.add_row(vec!["Skills".to_string(), report.skills.len().to_string()]);
    if let Some(ref written) = report.written {
        table.add_row(vec!["Commands".to_string(), written.commands.to_string()]);
        table.add_row(vec!["Files".to_string(), written.files.to_string()]);
    }
    out.push_str(&format!("{}\n\n", table));

    if verbose {
        out.push_str(&format!("{}\n", format_section_heading("Agents")));
        for agent in &report.agents {
            out.push_str(&format!("  {}\n", agent));
        }
        out.push('\n');
        if !report.skills.is_empty() {
            out.push_str(&format!("{}\n", format_section_heading("Skills")));
            for skill in &report.skills {
                out.push_str(&format!("  {}\n", skill));
            }
            out.push('\n');
        }
    }

    out.push_str(&format_warnings(&report.validation));

    match report.written {
        Some(ref written) => {
            out.push_str(&format!(
                "{} Wrote {} ({}...)\n",
                "✓".green(),
                report.output_dir.display(),
                &written.fingerprint[..written.fingerprint.len().min(12)]
            ));
        }
        None => {
            out.push_str(&format!("{} Check passed, nothing written\n", "✓".green()));
        }
    }
    out
}

/// Format a validation result as human-readable text.
pub fn format_validation_report_text(result: &ValidationResult, verbose: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Validation")));

    if verbose {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Check", "Result"]);
        for (description, passed) in &result.checks {
            let status = if *passed { "pass" } else { "fail" };
            table.add_row(vec![description.clone(), status.to_string()]);
        }
        out.push_str(&format!("{}\n\n", table));
    }

    out.push_str(&format_errors(result));
    out.push_str(&format_warnings(result));
    out.push_str(&format!(
        "Checks: {}/{} passed\n",
        result.passed_checks(),
        result.total_checks()
    ));
    if result.is_valid() {
        out.push_str(&format!("{} Valid\n", "✓".green()));
    } else {
        out.push_str(&format!(
            "{} Invalid ({} error(s))\n",
            "✗".red(),
            result.errors.len()
        ));
    }
    out
}

/// Format the profiles list, marking the default.
pub fn format_profiles_text(profiles: &[String], default_profile: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Profiles")));
    if profiles.is_empty() {
        out.push_str("No profiles found.\n");
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Profile", "Default"]);
    for name in profiles {
        let marker = if name == default_profile { "yes" } else { "" };
        table.add_row(vec![name.clone(), marker.to_string()]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

/// Format an error for stderr. Validation failures list every error.
pub fn format_error(err: &CompileError) -> String {
    match err {
        CompileError::Validation(result) => {
            let mut out = format!("{} {}\n", "Error:".red(), err);
            out.push_str(&format_errors(result));
            out.push_str(&format_warnings(result));
            out
        }
        _ => format!("{} {}", "Error:".red(), err),
    }
}

fn format_errors(result: &ValidationResult) -> String {
    let mut out = String::new();
    for error in &result.errors {
        out.push_str(&format!("  {} {}\n", "✗".red(), error));
    }
    out
}

fn format_warnings(result: &ValidationResult) -> String {
    let mut out = String::new();
    for warning in &result.warnings {
        out.push_str(&format!("  {} {}\n", "!".yellow(), warning));
    }
    out
}
