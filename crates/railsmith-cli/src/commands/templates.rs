//! Implementation of the `railsmith templates` command.

use railsmith_core::application::{TemplateInfo, TemplateService};

use crate::{
    cli::{ListFormat, TemplatesArgs},
    commands::apply::template_store,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: TemplatesArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let service = TemplateService::new(template_store(&config)?);
    let templates = service.list()?;

    match args.format {
        ListFormat::Table => {
            output.header("Available Templates:")?;
            for line in table_lines(&templates) {
                output.print(&line)?;
            }
        }
        ListFormat::List => {
            for t in &templates {
                output.print(&t.id)?;
            }
        }
        // Bypasses OutputManager: the array must be printed even when the
        // global output format is not JSON.
        ListFormat::Json => {
            let json = serde_json::to_string_pretty(&templates).map_err(|e| {
                crate::error::CliError::InvalidInput {
                    message: format!("Failed to serialise templates: {e}"),
                    source: Some(Box::new(e)),
                }
            })?;
            println!("{json}");
        }
    }

    Ok(())
}

fn table_lines(templates: &[TemplateInfo]) -> Vec<String> {
    let width = templates.iter().map(|t| t.id.len()).max().unwrap_or(0);
    templates
        .iter()
        .map(|t| {
            let origin = if t.builtin { "" } else { " [local]" };
            let placeholders = if t.placeholders.is_empty() {
                String::new()
            } else {
                format!(" ({})", t.placeholders.join(", "))
            };
            format!(
                "  {:<width$}  {}{placeholders}{origin}",
                t.id, t.description
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(id: &str, builtin: bool, placeholders: &[&str]) -> TemplateInfo {
        TemplateInfo {
            id: id.into(),
            description: "desc".into(),
            placeholders: placeholders.iter().map(|p| p.to_string()).collect(),
            builtin,
        }
    }

    #[test]
    fn table_aligns_ids_and_marks_local_templates() {
        let lines = table_lines(&[
            info("README.md", true, &["APP_NAME_PASCAL", "PORT"]),
            info("trix.css", false, &[]),
        ]);
        assert_eq!(lines[0], "  README.md  desc (APP_NAME_PASCAL, PORT)");
        assert_eq!(lines[1], "  trix.css   desc [local]");
    }

    #[test]
    fn builtin_templates_are_listed() {
        let service = TemplateService::new(template_store(&AppConfig::default()).unwrap());
        let ids: Vec<String> = service.list().unwrap().into_iter().map(|t| t.id).collect();
        assert!(ids.iter().any(|id| id == "README.md"));
        assert!(ids.iter().any(|id| id == "trix.css"));
    }
}
