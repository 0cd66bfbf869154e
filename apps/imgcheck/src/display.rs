//! Output rendering and formatting

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use imgcheck_checks::{CheckName, VerificationReport};
use imgcheck_types::ColorChoice;
use std::io;

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    /// Color configuration
    color_choice: ColorChoice,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(json_output: bool, color_choice: ColorChoice) -> Self {
        Self {
            json_output,
            color_choice,
        }
    }

    fn colors_enabled(&self) -> bool {
        match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => console::Term::stdout().features().colors_supported(),
        }
    }

    /// Render a verification report
    pub fn render_report(&self, report: &VerificationReport) -> io::Result<()> {
        if self.json_output {
            println!(
                "{}",
                serde_json::to_string_pretty(report).map_err(io::Error::other)?
            );
            return Ok(());
        }

        let overall = if report.passed { "[OK]" } else { "[ERROR]" };
        println!("{overall} Image verification");
        println!();

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(vec![
            Cell::new("Check").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
            Cell::new("Duration").add_attribute(Attribute::Bold),
            Cell::new("Failures").add_attribute(Attribute::Bold),
        ]);

        for result in &report.results {
            let status = if result.passed {
                self.colored_cell("PASSED", Color::Green)
            } else {
                self.colored_cell("FAILED", Color::Red)
            };
            table.add_row(vec![
                Cell::new(&result.name),
                status,
                Cell::new(format!("{}ms", result.duration_ms)),
                Cell::new(result.failures.len().to_string()),
            ]);
        }

        println!("{table}");

        if !report.passed {
            println!();
            println!("Failures:");
            for (check, failure) in report.failures() {
                println!("  - {check}: {failure}");
            }
        }

        Ok(())
    }

    /// Render the check battery listing
    pub fn render_checks(&self) -> io::Result<()> {
        if self.json_output {
            let names: Vec<&str> = CheckName::ALL.iter().map(|n| n.as_str()).collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&names).map_err(io::Error::other)?
            );
            return Ok(());
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(vec![
            Cell::new("Check").add_attribute(Attribute::Bold),
            Cell::new("Verifies").add_attribute(Attribute::Bold),
        ]);

        for name in CheckName::ALL {
            table.add_row(vec![Cell::new(name.as_str()), Cell::new(name.description())]);
        }

        println!("{table}");
        Ok(())
    }

    /// Render the effective profile
    pub fn render_profile(&self, toml: &str) -> io::Result<()> {
        // TOML is already a structured format; print it either way
        println!("{toml}");
        Ok(())
    }

    fn colored_cell(&self, text: &str, color: Color) -> Cell {
        if self.colors_enabled() {
            Cell::new(text).fg(color)
        } else {
            Cell::new(text)
        }
    }
}
