//! Project export to JSON or plain text

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;

use crate::error::{BrandForgeError, Result};
use crate::types::{BrandNames, ProviderId, Slogans};

/// File format, picked from the output extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Text,
}

impl ExportFormat {
    /// `.txt` and `.md` export as text, anything else as JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()).map(|e| e.to_lowercase()) {
            Some(ext) if ext == "txt" || ext == "md" => ExportFormat::Text,
            _ => ExportFormat::Json,
        }
    }
}

/// A named set of generated brand names and slogans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectExport {
    pub name: String,
    pub sector: String,
    /// Only known when brand names were generated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default)]
    pub brand_names: Vec<String>,
    #[serde(default)]
    pub slogans: Vec<String>,
    pub provider: ProviderId,
    pub created_at: DateTime<Utc>,
}

impl ProjectExport {
    /// Project holding a brand name generation
    pub fn from_brand_names(
        name: impl Into<String>,
        sector: &str,
        style: &str,
        result: &BrandNames,
    ) -> Self {
        Self {
            name: name.into(),
            sector: sector.to_string(),
            style: Some(style.to_string()),
            brand_names: result.brands.clone(),
            slogans: Vec::new(),
            provider: result.provider,
            created_at: Utc::now(),
        }
    }

    /// Project holding slogans for one brand, which is kept as the only brand name
    pub fn from_slogans(brand_name: &str, sector: &str, result: &Slogans) -> Self {
        Self {
            name: brand_name.to_string(),
            sector: sector.to_string(),
            style: None,
            brand_names: vec![brand_name.to_string()],
            slogans: result.slogans.clone(),
            provider: result.provider,
            created_at: Utc::now(),
        }
    }

    /// Load a JSON export
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BrandForgeError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            BrandForgeError::parse(e.to_string(), Some(content))
        })
    }

    /// Save in the format implied by the file extension
    pub fn save(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                BrandForgeError::io(e.to_string(), Some(parent.to_string_lossy().to_string()))
            })?;
        }

        let content = match ExportFormat::from_path(path) {
            ExportFormat::Json => serde_json::to_string_pretty(self).map_err(|e| {
                crate::internal_error!("Failed to serialize project: {}", e)
            })?,
            ExportFormat::Text => self.to_text(),
        };

        std::fs::write(path, content).map_err(|e| {
            BrandForgeError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
        })
    }

    /// Human-readable rendering, also used for sharing
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Project: {}", self.name);
        let _ = writeln!(out, "Sector: {}", self.sector);
        if let Some(style) = &self.style {
            let _ = writeln!(out, "Style: {}", style);
        }
        let _ = writeln!(out, "Provider: {}", self.provider);
        let _ = writeln!(out, "Created: {}", self.created_at.format("%Y-%m-%d %H:%M UTC"));

        if !self.brand_names.is_empty() {
            let _ = writeln!(out, "\nBrand names:");
            for (i, name) in self.brand_names.iter().enumerate() {
                let _ = writeln!(out, "{:2}. {}", i + 1, name);
            }
        }

        if !self.slogans.is_empty() {
            let _ = writeln!(out, "\nSlogans:");
            for slogan in &self.slogans {
                let _ = writeln!(out, "  \"{}\"", slogan);
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProjectExport {
        ProjectExport::from_brand_names(
            "Launch",
            "tech",
            "modern",
            &BrandNames {
                brands: vec!["Nexa".to_string(), "Voltio".to_string()],
                provider: ProviderId::Gemini,
                from_cache: false,
            },
        )
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("out/p.json")), ExportFormat::Json);
        assert_eq!(ExportFormat::from_path(Path::new("p.TXT")), ExportFormat::Text);
        assert_eq!(ExportFormat::from_path(Path::new("p.md")), ExportFormat::Text);
        assert_eq!(ExportFormat::from_path(Path::new("project")), ExportFormat::Json);
    }

    #[test]
    fn test_text_rendering() {
        let text = sample().to_text();
        assert!(text.starts_with("Project: Launch\n"));
        assert!(text.contains("Style: modern"));
        assert!(text.contains("Provider: gemini"));
        assert!(text.contains(" 1. Nexa\n 2. Voltio\n"));
        assert!(!text.contains("Slogans:"));
    }

    #[test]
    fn test_slogan_project() {
        let project = ProjectExport::from_slogans(
            "Nexa",
            "tech",
            &Slogans {
                slogans: vec!["Ahead of now".to_string()],
                provider: ProviderId::OpenAi,
                from_cache: true,
            },
        );
        assert_eq!(project.brand_names, vec!["Nexa"]);
        assert!(project.style.is_none());
        assert!(project.to_text().contains("  \"Ahead of now\""));
    }

    #[test]
    fn test_save_and_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("launch.json");

        let project = sample();
        project.save(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"brandNames\""));
        assert_eq!(ProjectExport::load(&path).unwrap(), project);
    }

    #[test]
    fn test_save_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("launch.txt");

        sample().save(&path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("Project: Launch"));
        assert!(ProjectExport::load(&path).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = ProjectExport::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, BrandForgeError::Io { .. }));
    }
}
