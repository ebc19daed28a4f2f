//! Business metrics derived from the aggregates
//!
//! Every function here is pure and total: absent steps or details resolve
//! to zero/empty values instead of errors.

use rustc_hash::FxHashMap;

use super::aggregate::Aggregates;
use super::tables::{
    ReferenceTables, STEP_AGENDAMENTO_REALIZADO, STEP_API_LEAD, STEP_INICIO, STEP_MAIOR_DE_IDADE,
    STEP_PERGUNTA_CLIENTE, STEP_QUEIXA,
};
use crate::utils::number::percentage;
use crate::utils::string::{capitalize_first, normalize_label};

/// Default number of complaint categories kept
pub const DEFAULT_COMPLAINTS_TOP_N: usize = 8;

/// Label bucket for answers matching neither side of a binary question
const OTHER_LABEL: &str = "Outras Interações/Não resp.";

// ============================================================================
// Metric types
// ============================================================================

/// Value shown on a KPI tile
#[derive(Debug, Clone, PartialEq)]
pub enum KpiValue {
    Count(u64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Kpi {
    pub title: &'static str,
    pub value: KpiValue,
    pub icon: &'static str,
    pub percentual: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MainValues {
    pub total_interacoes: Kpi,
    pub leads_capturados: Kpi,
    pub agendamentos_realizados: Kpi,
    pub taxa_conversao_final: Kpi,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MainMetrics {
    pub title: &'static str,
    pub description: &'static str,
    pub values: MainValues,
    pub taxa_captura_lead: f64,
    pub taxa_conversao_final: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunnelStep {
    pub name: String,
    pub friendly_name: String,
    pub value: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunnelMetric {
    pub title: &'static str,
    pub description: &'static str,
    pub chart_title: &'static str,
    pub steps: Vec<FunnelStep>,
}

/// Labelled series rendered as a single chart dataset
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub title: &'static str,
    pub description: &'static str,
    pub chart_title: String,
    pub labels: Vec<String>,
    pub data: Vec<u64>,
    /// Set when the metric cannot be derived from the record shape at all
    pub unavailable: bool,
}

/// Partition of a yes/no question's answers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinaryCounts {
    pub positive: u64,
    pub negative: u64,
    pub other: u64,
}

impl BinaryCounts {
    pub fn total(&self) -> u64 {
        self.positive + self.negative + self.other
    }
}

/// Every metric the dashboard renders, computed in one pass
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardMetrics {
    pub main: MainMetrics,
    pub funnel: FunnelMetric,
    pub age: Distribution,
    pub client_type: Distribution,
    pub complaints: Distribution,
    pub top_units: Distribution,
    pub time_of_day: Distribution,
    pub day_of_week: Distribution,
}

impl DashboardMetrics {
    pub fn derive(
        aggregates: &Aggregates,
        tables: &ReferenceTables,
        complaints_top_n: usize,
    ) -> Self {
        Self {
            main: main_metrics(aggregates),
            funnel: funnel_steps(aggregates, tables),
            age: age_distribution(aggregates),
            client_type: client_type_distribution(aggregates),
            complaints: complaint_distribution(aggregates, tables, complaints_top_n),
            top_units: top_units(),
            time_of_day: time_distribution(),
            day_of_week: day_distribution(),
        }
    }
}

// ============================================================================
// Main metrics
// ============================================================================

pub fn main_metrics(aggregates: &Aggregates) -> MainMetrics {
    let total_interacoes = aggregates.step_value(STEP_INICIO);
    let leads_capturados = aggregates.step_value(STEP_API_LEAD);
    let agendamentos_realizados = aggregates.step_value(STEP_AGENDAMENTO_REALIZADO);

    let taxa_captura_lead = percentage(leads_capturados, total_interacoes);
    let taxa_conversao_final = percentage(agendamentos_realizados, total_interacoes);

    MainMetrics {
        title: "Resumo Geral",
        description: "Visão rápida dos principais indicadores de desempenho.",
        values: MainValues {
            total_interacoes: Kpi {
                title: "Total Interações",
                value: KpiValue::Count(total_interacoes),
                icon: "👥",
                percentual: None,
            },
            leads_capturados: Kpi {
                title: "Leads Capturados",
                value: KpiValue::Count(leads_capturados),
                icon: "📋",
                percentual: Some(format!("{}% do total", taxa_captura_lead)),
            },
            agendamentos_realizados: Kpi {
                title: "Agendamentos",
                value: KpiValue::Count(agendamentos_realizados),
                icon: "📅",
                percentual: None,
            },
            taxa_conversao_final: Kpi {
                title: "Conversão Final",
                value: KpiValue::Text(format!("{}%", taxa_conversao_final)),
                icon: "🎯",
                percentual: None,
            },
        },
        taxa_captura_lead,
        taxa_conversao_final,
    }
}

// ============================================================================
// Funnel
// ============================================================================

/// Funnel restricted to the canonical steps, in canonical order
pub fn funnel_steps(aggregates: &Aggregates, tables: &ReferenceTables) -> FunnelMetric {
    let total = aggregates.step_value(STEP_INICIO);

    let mut ranked: Vec<(usize, FunnelStep)> = aggregates
        .jornadas
        .iter()
        .filter_map(|step| {
            let position = tables.step_position(&step.name)?;
            Some((
                position,
                FunnelStep {
                    name: step.name.clone(),
                    friendly_name: tables.friendly_name(&step.name).to_string(),
                    value: step.value,
                    percentage: percentage(step.value, total),
                },
            ))
        })
        .collect();
    ranked.sort_by_key(|(position, _)| *position);

    FunnelMetric {
        title: "Funil de Conversão",
        description: "Acompanhe a jornada do cliente, desde o contato inicial até a conversão.",
        chart_title: "Funil Detalhado",
        steps: ranked.into_iter().map(|(_, step)| step).collect(),
    }
}

// ============================================================================
// Distributions
// ============================================================================

/// Bucket a detail's values into positive/negative/other by
/// case-insensitive label match
pub fn binary_distribution(
    aggregates: &Aggregates,
    detail_name: &str,
    positive_label: &str,
    negative_label: &str,
) -> BinaryCounts {
    let positive_label = positive_label.to_lowercase();
    let negative_label = negative_label.to_lowercase();
    let mut counts = BinaryCounts::default();

    let Some(detail) = aggregates.detail(detail_name) else {
        return counts;
    };

    for item in &detail.values {
        let name = normalize_label(&item.name);
        if name == positive_label {
            counts.positive += item.value;
        } else if name == negative_label {
            counts.negative += item.value;
        } else {
            counts.other += item.value;
        }
    }
    counts
}

/// Known categories of a detail, noise removed, summed per label and
/// ranked by count (ties keep first-seen order), truncated to `top_n`
pub fn category_top_n(
    aggregates: &Aggregates,
    detail_name: &str,
    tables: &ReferenceTables,
    top_n: usize,
) -> Vec<(String, u64)> {
    let Some(detail) = aggregates.detail(detail_name) else {
        return Vec::new();
    };

    let mut entries: Vec<(String, u64)> = Vec::new();
    let mut index: FxHashMap<String, usize> = FxHashMap::default();

    for item in &detail.values {
        let name = normalize_label(&item.name);
        if item.value == 0 || !tables.is_known_category(&name) || tables.is_noise(&name) {
            continue;
        }
        let label = capitalize_first(&name);
        match index.get(&label) {
            Some(&pos) => entries[pos].1 += item.value,
            None => {
                index.insert(label.clone(), entries.len());
                entries.push((label, item.value));
            }
        }
    }

    // Vec::sort_by is stable
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(top_n);
    entries
}

fn binary_as_distribution(
    counts: BinaryCounts,
    title: &'static str,
    description: &'static str,
    chart_title: &'static str,
    positive: &str,
    negative: &str,
) -> Distribution {
    Distribution {
        title,
        description,
        chart_title: chart_title.to_string(),
        labels: vec![
            positive.to_string(),
            negative.to_string(),
            OTHER_LABEL.to_string(),
        ],
        data: vec![counts.positive, counts.negative, counts.other],
        unavailable: false,
    }
}

pub fn age_distribution(aggregates: &Aggregates) -> Distribution {
    let counts = binary_distribution(aggregates, STEP_MAIOR_DE_IDADE, "Sim", "Não");
    binary_as_distribution(
        counts,
        "Perfil por Idade",
        "Distribuição dos usuários que confirmaram ser maiores ou menores de idade.",
        "Maioridade Declarada",
        "Maior de Idade",
        "Menor de Idade",
    )
}

pub fn client_type_distribution(aggregates: &Aggregates) -> Distribution {
    let counts = binary_distribution(aggregates, STEP_PERGUNTA_CLIENTE, "Sim", "Não");
    binary_as_distribution(
        counts,
        "Perfil por Tipo de Cliente",
        "Distribuição dos usuários que se identificaram como clientes existentes ou novos.",
        "Cliente Existente vs Novo",
        "Já é Cliente",
        "Não é Cliente",
    )
}

pub fn complaint_distribution(
    aggregates: &Aggregates,
    tables: &ReferenceTables,
    top_n: usize,
) -> Distribution {
    let (labels, data): (Vec<String>, Vec<u64>) =
        category_top_n(aggregates, STEP_QUEIXA, tables, top_n)
            .into_iter()
            .unzip();
    Distribution {
        title: "Distribuição de Queixas",
        description: "Principais motivos relatados pelos usuários que buscaram agendamento.",
        chart_title: format!("Top {} Queixas Declaradas", top_n),
        labels,
        data,
        unavailable: false,
    }
}

// ============================================================================
// Placeholders (not derivable from key/value records)
// ============================================================================

pub fn top_units() -> Distribution {
    tracing::warn!("Unit data cannot be derived from the upstream records");
    Distribution {
        title: "Top Unidades (Agendamentos)",
        description: "Unidades com maior número de agendamentos confirmados (Dados Indisponíveis).",
        chart_title: "Top Unidades".to_string(),
        labels: Vec::new(),
        data: Vec::new(),
        unavailable: true,
    }
}

pub fn time_distribution() -> Distribution {
    tracing::warn!("Booking time data cannot be derived from the upstream records");
    Distribution {
        title: "Horários de Agendamento",
        description: "Distribuição dos agendamentos por faixa de horário (Dados Indisponíveis).",
        chart_title: "Agendamentos por Horário".to_string(),
        labels: Vec::new(),
        data: Vec::new(),
        unavailable: true,
    }
}

pub fn day_distribution() -> Distribution {
    tracing::warn!("Weekday data cannot be derived from the upstream records");
    Distribution {
        title: "Dias de Maior Movimento",
        description: "Distribuição de agendamentos ou interações por dia da semana (Dados Indisponíveis).",
        chart_title: "Movimento por Dia da Semana".to_string(),
        labels: ["Dom", "Seg", "Ter", "Qua", "Qui", "Sex", "Sáb"]
            .iter()
            .map(|d| d.to_string())
            .collect(),
        data: vec![0; 7],
        unavailable: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dashboard::aggregate::{Detail, StepCount, aggregate_payload};
    use crate::domain::dashboard::tables::STEP_UNIDADE;
    use serde_json::json;

    fn step(name: &str, value: u64) -> StepCount {
        StepCount {
            name: name.to_string(),
            value,
        }
    }

    fn with_detail(name: &str, values: Vec<StepCount>) -> Aggregates {
        Aggregates {
            jornadas: vec![step(name, values.iter().map(|v| v.value).sum())],
            details: vec![Detail {
                name: name.to_string(),
                values,
            }],
        }
    }

    #[test]
    fn test_main_metrics_scenario() {
        let payload = json!([
            {"user_variable_key_name": "inicio_de_jornada"},
            {"user_variable_key_name": "inicio_de_jornada"},
            {"user_variable_key_name": "api_lead"},
        ]);
        let metrics = main_metrics(&aggregate_payload(&payload));

        assert_eq!(metrics.values.total_interacoes.value, KpiValue::Count(2));
        assert_eq!(metrics.values.leads_capturados.value, KpiValue::Count(1));
        assert_eq!(metrics.taxa_captura_lead, 50.0);
        assert_eq!(
            metrics.values.leads_capturados.percentual.as_deref(),
            Some("50% do total")
        );
        assert_eq!(
            metrics.values.taxa_conversao_final.value,
            KpiValue::Text("0%".to_string())
        );
    }

    #[test]
    fn test_main_metrics_zero_total() {
        let aggregates = Aggregates {
            jornadas: vec![step(STEP_API_LEAD, 4), step(STEP_AGENDAMENTO_REALIZADO, 2)],
            details: Vec::new(),
        };
        let metrics = main_metrics(&aggregates);
        assert_eq!(metrics.taxa_captura_lead, 0.0);
        assert_eq!(metrics.taxa_conversao_final, 0.0);
    }

    #[test]
    fn test_main_metrics_conversion_rounding() {
        let aggregates = Aggregates {
            jornadas: vec![step(STEP_INICIO, 3), step(STEP_AGENDAMENTO_REALIZADO, 1)],
            details: Vec::new(),
        };
        let metrics = main_metrics(&aggregates);
        assert_eq!(metrics.taxa_conversao_final, 33.3);
        assert_eq!(
            metrics.values.taxa_conversao_final.value,
            KpiValue::Text("33.3%".to_string())
        );
    }

    #[test]
    fn test_funnel_uses_canonical_order() {
        let tables = ReferenceTables::default();
        let aggregates = Aggregates {
            jornadas: vec![
                step(STEP_AGENDAMENTO_REALIZADO, 1),
                step("final_de_jornada", 9),
                step(STEP_API_LEAD, 3),
                step("desconhecido", 50),
                step(STEP_INICIO, 4),
                step(STEP_UNIDADE, 3),
            ],
            details: Vec::new(),
        };
        let funnel = funnel_steps(&aggregates, &tables);
        let names: Vec<&str> = funnel.steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                STEP_INICIO,
                STEP_UNIDADE,
                STEP_API_LEAD,
                STEP_AGENDAMENTO_REALIZADO
            ]
        );
        assert_eq!(funnel.steps[0].friendly_name, "Início");
        assert_eq!(funnel.steps[0].percentage, 100.0);
        assert_eq!(funnel.steps[2].percentage, 75.0);
        assert_eq!(funnel.steps[3].percentage, 25.0);
    }

    #[test]
    fn test_funnel_order_independent_of_input_order() {
        let tables = ReferenceTables::default();
        let forward = Aggregates {
            jornadas: vec![step(STEP_INICIO, 2), step(STEP_API_LEAD, 1)],
            details: Vec::new(),
        };
        let reversed = Aggregates {
            jornadas: vec![step(STEP_API_LEAD, 1), step(STEP_INICIO, 2)],
            details: Vec::new(),
        };
        assert_eq!(
            funnel_steps(&forward, &tables),
            funnel_steps(&reversed, &tables)
        );
    }

    #[test]
    fn test_funnel_without_start_step_has_zero_percentages() {
        let tables = ReferenceTables::default();
        let aggregates = Aggregates {
            jornadas: vec![step(STEP_API_LEAD, 5)],
            details: Vec::new(),
        };
        let funnel = funnel_steps(&aggregates, &tables);
        assert_eq!(funnel.steps.len(), 1);
        assert_eq!(funnel.steps[0].percentage, 0.0);
    }

    #[test]
    fn test_binary_distribution_partitions_all_values() {
        let aggregates = with_detail(
            STEP_MAIOR_DE_IDADE,
            vec![
                step("Sim", 5),
                step(" sim ", 2),
                step("NÃO", 3),
                step("talvez", 1),
                step("Início", 4),
            ],
        );
        let counts = binary_distribution(&aggregates, STEP_MAIOR_DE_IDADE, "Sim", "Não");
        assert_eq!(
            counts,
            BinaryCounts {
                positive: 7,
                negative: 3,
                other: 5
            }
        );
        assert_eq!(counts.total(), aggregates.step_value(STEP_MAIOR_DE_IDADE));
    }

    #[test]
    fn test_binary_distribution_missing_detail() {
        let counts = binary_distribution(&Aggregates::default(), STEP_MAIOR_DE_IDADE, "Sim", "Não");
        assert_eq!(counts, BinaryCounts::default());
    }

    #[test]
    fn test_age_distribution_labels() {
        let aggregates = with_detail(STEP_MAIOR_DE_IDADE, vec![step("Sim", 1), step("Não", 2)]);
        let age = age_distribution(&aggregates);
        assert_eq!(
            age.labels,
            vec!["Maior de Idade", "Menor de Idade", OTHER_LABEL]
        );
        assert_eq!(age.data, vec![1, 2, 0]);
        assert!(!age.unavailable);
    }

    #[test]
    fn test_client_type_distribution() {
        let aggregates = with_detail(
            STEP_PERGUNTA_CLIENTE,
            vec![step("Não", 4), step("Sim", 1), step("outro", 2)],
        );
        let client = client_type_distribution(&aggregates);
        assert_eq!(client.labels[0], "Já é Cliente");
        assert_eq!(client.data, vec![1, 4, 2]);
    }

    #[test]
    fn test_category_top_n_filters_and_ranks() {
        let tables = ReferenceTables::default();
        let aggregates = with_detail(
            STEP_QUEIXA,
            vec![
                step("Dor", 3),
                step("implante", 5),
                step("dor ", 4),
                step("Fraude de abertura", 100),
                step("alterar", 50),
                step("outra coisa", 30),
                step("Estética", 0),
                step("prótese", 5),
            ],
        );
        let top = category_top_n(&aggregates, STEP_QUEIXA, &tables, 8);
        assert_eq!(
            top,
            vec![
                ("Dor".to_string(), 7),
                ("Implante".to_string(), 5),
                ("Prótese".to_string(), 5),
            ]
        );
    }

    #[test]
    fn test_category_top_n_truncates_and_is_descending() {
        let tables = ReferenceTables::default();
        let aggregates = with_detail(
            STEP_QUEIXA,
            vec![
                step("dor", 1),
                step("implante", 2),
                step("estética", 3),
                step("ortodontia", 4),
                step("prótese", 5),
                step("checkup", 6),
                step("emergência", 7),
                step("não desejo informar", 8),
            ],
        );
        let top = category_top_n(&aggregates, STEP_QUEIXA, &tables, 3);
        assert_eq!(top.len(), 3);
        assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));
        assert_eq!(top[0], ("Não desejo informar".to_string(), 8));
    }

    #[test]
    fn test_complaint_distribution_missing_detail_is_empty() {
        let tables = ReferenceTables::default();
        let complaints = complaint_distribution(&Aggregates::default(), &tables, 8);
        assert!(complaints.labels.is_empty());
        assert!(complaints.data.is_empty());
    }

    #[test]
    fn test_complaint_chart_title_follows_top_n() {
        let tables = ReferenceTables::default();
        let default = complaint_distribution(&Aggregates::default(), &tables, DEFAULT_COMPLAINTS_TOP_N);
        assert_eq!(default.chart_title, "Top 8 Queixas Declaradas");

        let five = complaint_distribution(&Aggregates::default(), &tables, 5);
        assert_eq!(five.chart_title, "Top 5 Queixas Declaradas");
    }

    #[test]
    fn test_placeholders_are_flagged_unavailable() {
        let units = top_units();
        assert!(units.unavailable);
        assert!(units.labels.is_empty());

        assert!(time_distribution().unavailable);

        let days = day_distribution();
        assert!(days.unavailable);
        assert_eq!(days.labels.len(), 7);
        assert_eq!(days.data, vec![0; 7]);
    }
}
