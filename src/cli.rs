use crate::config::DEFAULT_API_URL;
use crate::selector::resources;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// portfolio-admin – pick images, videos, skills and labels from the portfolio CMS
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Which resource to select from
    #[arg(value_enum, value_name = "RESOURCE")]
    pub resource: Resource,

    /// Base URL of the REST backend
    #[arg(long, env = "PORTFOLIO_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Bearer token sent with every request
    #[arg(long, env = "PORTFOLIO_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Allow only one row to be chosen (radio semantics)
    #[arg(long)]
    pub single: bool,

    /// Comma-separated ids that start out selected, e.g. --preselect 3,7
    #[arg(long, value_delimiter = ',', value_name = "IDS")]
    pub preselect: Vec<i64>,

    /// Rows per page for paginated resources (images, videos, labels)
    #[arg(long, default_value_t = 10)]
    pub page_size: usize,

    /// Dialog heading; defaults to a resource specific title
    #[arg(long)]
    pub title: Option<String>,

    /// Text of the opening control; defaults to a resource specific label
    #[arg(long)]
    pub button_label: Option<String>,

    /// Write logs to this file (the terminal belongs to the UI)
    #[arg(long, env = "PORTFOLIO_ADMIN_LOG", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Resolve --preselect against the backend and print the rows without the TUI.
    /// Requires --preselect to be specified.
    #[arg(long, requires = "preselect")]
    pub headless: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Images,
    Videos,
    Skills,
    SkillSons,
    Labels,
}

impl Resource {
    /// Path segment of the backend collection.
    pub fn path(self) -> &'static str {
        match self {
            Resource::Images => resources::IMAGES,
            Resource::Videos => resources::VIDEOS,
            Resource::Skills => resources::SKILLS,
            Resource::SkillSons => resources::SKILL_SONS,
            Resource::Labels => resources::LABELS,
        }
    }

    /// Skills and skill-sons are small and fetched whole.
    pub fn is_paginated(self) -> bool {
        !matches!(self, Resource::Skills | Resource::SkillSons)
    }

    pub fn heading(self) -> &'static str {
        match self {
            Resource::Images => "Imágenes",
            Resource::Videos => "Videos",
            Resource::Skills => "Habilidades",
            Resource::SkillSons => "Sub-habilidades",
            Resource::Labels => "Etiquetas",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_resource_and_preselect_list() {
        let cli = Cli::try_parse_from([
            "portfolio-admin",
            "skill-sons",
            "--single",
            "--preselect",
            "3,7",
        ])
        .unwrap();
        assert_eq!(cli.resource, Resource::SkillSons);
        assert!(cli.single);
        assert_eq!(cli.preselect, vec![3, 7]);
        assert!(!cli.headless);
        assert_eq!(cli.resource.path(), "skill-sons");
        assert!(!cli.resource.is_paginated());
    }

    #[test]
    fn headless_requires_preselect() {
        assert!(Cli::try_parse_from(["portfolio-admin", "images", "--headless"]).is_err());
        assert!(
            Cli::try_parse_from(["portfolio-admin", "images", "--headless", "--preselect", "1"])
                .is_ok()
        );
    }
}
