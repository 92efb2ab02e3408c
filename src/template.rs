use crate::config::ConfigError;
use crate::task::{CategorySelection, TaskSelection};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// How a template turns a selection into tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicKind {
    /// Selected tasks times days, broken into progressive percentages.
    #[default]
    Percentual,
    /// Category items times the category's fixed tasks.
    Multiplicador,
}

impl LogicKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicKind::Percentual => "percentual",
            LogicKind::Multiplicador => "multiplicador",
        }
    }
}

impl fmt::Display for LogicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for LogicKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "percentual" => Ok(LogicKind::Percentual),
            "multiplicador" => Ok(LogicKind::Multiplicador),
            other => Err(ConfigError::Invalid(format!(
                "unknown tipo_logica '{other}' (expected percentual or multiplicador)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateTask {
    pub id: u32,
    pub nome: String,
    #[serde(default = "default_days")]
    pub dias_default: i32,
}

fn default_days() -> i32 {
    1
}

impl TemplateTask {
    pub fn select(&self, dias: i32) -> TaskSelection {
        TaskSelection::new(self.id, self.nome.clone(), dias)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Category {
    pub id: String,
    pub nome: String,
    pub tarefas: Vec<String>,
    #[serde(default)]
    pub itens: Vec<String>,
}

impl Category {
    pub fn select<S: Into<String>>(&self, items: impl IntoIterator<Item = S>) -> CategorySelection {
        CategorySelection {
            categoria_nome: self.nome.clone(),
            itens: items.into_iter().map(Into::into).collect(),
            tarefas_fixas: self.tarefas.clone(),
        }
    }
}

/// One WBS template file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WbsTemplate {
    pub wbs_type: String,
    pub nome: String,
    #[serde(default)]
    pub descricao: String,
    #[serde(default)]
    pub tipo_logica: LogicKind,
    #[serde(default)]
    pub tarefas: Vec<TemplateTask>,
    #[serde(default)]
    pub categorias: Vec<Category>,
}

impl WbsTemplate {
    pub fn from_yaml_str(input: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(input)
    }

    pub fn task(&self, id: u32) -> Option<&TemplateTask> {
        self.tarefas.iter().find(|t| t.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categorias.iter().find(|c| c.id == id)
    }
}

pub fn load_template<P: AsRef<Path>>(path: P) -> Result<WbsTemplate, ConfigError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    WbsTemplate::from_yaml_str(&raw).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads every `*.yaml` / `*.yml` file in `dir`, keyed by `wbs_type`.
pub fn load_templates<P: AsRef<Path>>(dir: P) -> Result<BTreeMap<String, WbsTemplate>, ConfigError> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|source| ConfigError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == "yaml" || ext == "yml");
        if is_yaml {
            paths.push(path);
        }
    }
    paths.sort();

    let mut templates = BTreeMap::new();
    for path in paths {
        let template = load_template(&path)?;
        if templates.contains_key(&template.wbs_type) {
            return Err(ConfigError::DuplicateTemplate(template.wbs_type));
        }
        debug!(wbs_type = %template.wbs_type, path = %path.display(), "loaded template");
        templates.insert(template.wbs_type.clone(), template);
    }
    Ok(templates)
}

/// Splits free text into items: by line when the text has a newline,
/// otherwise by comma. Entries are trimmed and blanks dropped.
pub fn parse_items(text: &str) -> Vec<String> {
    let separator = if text.contains('\n') { '\n' } else { ',' };
    text.split(separator)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
