//! Templates compiled into the binary.
//!
//! Each file under `templates/` is embedded with `include_str!` and
//! registered under its file name. A directory passed as
//! `templates.local_path` can shadow any of them (see
//! [`crate::template_store::DirectoryStore`]).

use railsmith_core::domain::Template;

pub const README: &str = "README.md";
pub const TRIX_CSS: &str = "trix.css";
pub const HOME_CONTROLLER: &str = "home_controller.rb";
pub const HOME_INDEX: &str = "index.html.erb";
pub const DATABASE_YML: &str = "database.yml.example";
pub const SOLID_QUEUE_YML: &str = "solid_queue.yml.example";

/// Every built-in template, in display order.
pub fn all_templates() -> Vec<Template> {
    vec![
        Template::new(README, include_str!("../templates/README.md"))
            .with_description("Project README rendered with the configuration"),
        Template::new(TRIX_CSS, include_str!("../templates/trix.css"))
            .with_description("Rich text editor styles (Tailwind only)"),
        Template::new(HOME_CONTROLLER, include_str!("../templates/home_controller.rb"))
            .with_description("Controller for the root route"),
        Template::new(HOME_INDEX, include_str!("../templates/index.html.erb"))
            .with_description("View for the root route"),
        Template::new(DATABASE_YML, include_str!("../templates/database.yml.example"))
            .with_description("SQLite database config with a separate queue database"),
        Template::new(SOLID_QUEUE_YML, include_str!("../templates/solid_queue.yml.example"))
            .with_description("Solid Queue dispatcher and worker config"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use railsmith_core::domain::Bindings;

    #[test]
    fn ids_are_unique() {
        let templates = all_templates();
        let mut ids: Vec<_> = templates.iter().map(|t| t.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), templates.len());
    }

    #[test]
    fn only_readme_has_placeholders() {
        for t in all_templates() {
            if t.id.as_str() == README {
                assert!(t.placeholders().contains(&"APP_NAME_PASCAL"));
            } else {
                assert!(t.placeholders().is_empty(), "{} has placeholders", t.id);
                assert_eq!(t.render(&Bindings::new()).unwrap(), t.source.as_str());
            }
        }
    }
}
