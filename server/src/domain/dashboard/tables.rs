//! Static reference tables used by the metrics stage
//!
//! Built once at startup (defaults, optionally overridden by the config
//! file) and shared read-only across requests.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use crate::core::config::TablesConfig;

pub const STEP_INICIO: &str = "inicio_de_jornada";
pub const STEP_MAIOR_DE_IDADE: &str = "maior_de_idade";
pub const STEP_NOME: &str = "nome_agendamento";
pub const STEP_PERGUNTA_CLIENTE: &str = "Pergunta se é cliente";
pub const STEP_TELEFONE: &str = "telefone_agendamento";
pub const STEP_UNIDADE: &str = "unidade_nome_e_id";
pub const STEP_API_LEAD: &str = "api_lead";
pub const STEP_QUEIXA: &str = "Passo 11 - Agendamentos - Seleciona Queixa";
pub const STEP_HORARIO: &str = "Agendamento - Horário Encontrado";
pub const STEP_RESUMO: &str = "Passo 13 - Agendamento - Resumo do Agendamento";
pub const STEP_AGENDAMENTO_REALIZADO: &str = "agendamento_realizado";
pub const STEP_FINAL: &str = "final_de_jornada";

const DEFAULT_FRIENDLY_NAMES: &[(&str, &str)] = &[
    (STEP_INICIO, "Início"),
    (STEP_MAIOR_DE_IDADE, "Confirmou Maioridade"),
    (STEP_NOME, "Forneceu Nome"),
    (STEP_PERGUNTA_CLIENTE, "Informou se é Cliente"),
    (STEP_TELEFONE, "Forneceu Telefone"),
    (STEP_UNIDADE, "Selecionou Unidade"),
    (STEP_API_LEAD, "Lead Capturado (API)"),
    (STEP_QUEIXA, "Selecionou Queixa"),
    (STEP_HORARIO, "Recebeu Horário"),
    (STEP_RESUMO, "Viu Resumo Agend."),
    (STEP_AGENDAMENTO_REALIZADO, "Agendou com Sucesso"),
    (STEP_FINAL, "Fim da Jornada"),
];

const DEFAULT_STEP_ORDER: &[&str] = &[
    STEP_INICIO,
    STEP_MAIOR_DE_IDADE,
    STEP_NOME,
    STEP_PERGUNTA_CLIENTE,
    STEP_TELEFONE,
    STEP_UNIDADE,
    STEP_API_LEAD,
    STEP_QUEIXA,
    STEP_HORARIO,
    STEP_RESUMO,
    STEP_AGENDAMENTO_REALIZADO,
];

const DEFAULT_KNOWN_CATEGORIES: &[&str] = &[
    "dor",
    "implante",
    "estética",
    "ortodontia",
    "não desejo informar",
    "prótese",
    "checkup",
    "emergência",
];

const DEFAULT_NOISE: &[&str] = &[
    "fraude de abertura",
    "sim!",
    "alterar",
    "início",
    "agendar uma avaliação",
    "api_unidade1",
];

/// Process-wide lookup tables for the metrics stage
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    friendly_names: FxHashMap<String, String>,
    step_order: Vec<String>,
    known_categories: Vec<String>,
    noise: Vec<String>,
}

impl Default for ReferenceTables {
    fn default() -> Self {
        Self {
            friendly_names: DEFAULT_FRIENDLY_NAMES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            step_order: to_strings(DEFAULT_STEP_ORDER),
            known_categories: to_strings(DEFAULT_KNOWN_CATEGORIES),
            noise: to_strings(DEFAULT_NOISE),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn lowercase_all(items: Vec<String>) -> Vec<String> {
    items.into_iter().map(|s| s.trim().to_lowercase()).collect()
}

impl ReferenceTables {
    /// Build tables from defaults with config overrides applied.
    ///
    /// Friendly names are merged over the defaults; the list tables are
    /// replaced wholesale. Category and noise entries are lowercased since
    /// matching is case-insensitive.
    pub fn from_config(config: &TablesConfig) -> Self {
        let mut tables = Self::default();

        if let Some(names) = &config.friendly_names {
            tables.merge_friendly_names(names);
        }
        if let Some(order) = &config.step_order {
            tables.step_order = order.clone();
        }
        if let Some(categories) = &config.known_categories {
            tables.known_categories = lowercase_all(categories.clone());
        }
        if let Some(noise) = &config.noise {
            tables.noise = lowercase_all(noise.clone());
        }

        tracing::debug!(
            steps = tables.step_order.len(),
            categories = tables.known_categories.len(),
            noise = tables.noise.len(),
            "Reference tables loaded"
        );
        tables
    }

    fn merge_friendly_names(&mut self, names: &BTreeMap<String, String>) {
        for (step, label) in names {
            self.friendly_names.insert(step.clone(), label.clone());
        }
    }

    /// Human-readable label for a step, falling back to the raw name
    pub fn friendly_name<'a>(&'a self, step: &'a str) -> &'a str {
        self.friendly_names
            .get(step)
            .map(String::as_str)
            .unwrap_or(step)
    }

    /// Canonical position of a funnel step
    pub fn step_position(&self, step: &str) -> Option<usize> {
        self.step_order.iter().position(|s| s == step)
    }

    /// `label` must already be trimmed and lowercased
    pub fn is_known_category(&self, label: &str) -> bool {
        self.known_categories.iter().any(|c| c == label)
    }

    /// `label` must already be trimmed and lowercased
    pub fn is_noise(&self, label: &str) -> bool {
        self.noise.iter().any(|n| label.contains(n.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_friendly_name_fallback() {
        let tables = ReferenceTables::default();
        assert_eq!(tables.friendly_name(STEP_API_LEAD), "Lead Capturado (API)");
        assert_eq!(tables.friendly_name("desconhecido"), "desconhecido");
    }

    #[test]
    fn test_step_position() {
        let tables = ReferenceTables::default();
        assert_eq!(tables.step_position(STEP_INICIO), Some(0));
        assert_eq!(tables.step_position(STEP_AGENDAMENTO_REALIZADO), Some(10));
        assert_eq!(tables.step_position(STEP_FINAL), None);
    }

    #[test]
    fn test_noise_is_substring_match() {
        let tables = ReferenceTables::default();
        assert!(tables.is_noise("quero alterar horário"));
        assert!(!tables.is_noise("implante"));
    }

    #[test]
    fn test_from_config_overrides() {
        let mut names = BTreeMap::new();
        names.insert(STEP_INICIO.to_string(), "Começo".to_string());
        let config = TablesConfig {
            friendly_names: Some(names),
            step_order: Some(vec![STEP_API_LEAD.to_string(), STEP_INICIO.to_string()]),
            known_categories: Some(vec!["  Canal ".to_string()]),
            noise: None,
        };
        let tables = ReferenceTables::from_config(&config);

        assert_eq!(tables.friendly_name(STEP_INICIO), "Começo");
        assert_eq!(tables.friendly_name(STEP_API_LEAD), "Lead Capturado (API)");
        assert_eq!(tables.step_position(STEP_INICIO), Some(1));
        assert!(tables.is_known_category("canal"));
        assert!(!tables.is_known_category("dor"));
        assert!(tables.is_noise("sim!"));
    }
}
