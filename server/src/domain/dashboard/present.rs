//! Presentation assembly: metrics → cards and chart sections
//!
//! Layout coordinates, chart types and option payloads are fixed; only
//! labels, data and the generated color ramps depend on the request.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::json;

use super::metrics::{
    DashboardMetrics, Distribution, FunnelMetric, Kpi, KpiValue, MainMetrics,
};
use super::types::{
    Card, CardValue, Chart, ChartData, ChartType, Dashboard, Dataset, GridArea, Section,
};

pub const COLOR_PURPLE: &str = "rgba(106, 27, 154, 0.7)";
pub const COLOR_ORANGE: &str = "rgba(255, 152, 0, 0.7)";
pub const COLOR_GREY: &str = "rgba(158, 158, 158, 0.7)";
pub const COLOR_BLUE: &str = "rgba(25, 118, 210, 0.7)";

/// Alpha decrement per ramp step
const RAMP_STEP: f64 = 0.05;
/// Lowest alpha a ramp reaches; later colors clamp here
const RAMP_FLOOR: f64 = 0.3;

const AREA_CARD_TOTAL: GridArea = GridArea::new(1, 1, 2, 3);
const AREA_CARD_LEADS: GridArea = GridArea::new(1, 3, 2, 5);
const AREA_CARD_AGENDAMENTOS: GridArea = GridArea::new(1, 5, 2, 7);
const AREA_CARD_CONVERSAO: GridArea = GridArea::new(1, 7, 2, 9);
const AREA_FUNNEL: GridArea = GridArea::new(2, 1, 4, 9);
const AREA_AGE: GridArea = GridArea::new(4, 1, 6, 4);
const AREA_CLIENT_TYPE: GridArea = GridArea::new(4, 4, 6, 7);
const AREA_COMPLAINTS: GridArea = GridArea::new(6, 1, 8, 9);
const AREA_TOP_UNITS: GridArea = GridArea::new(8, 1, 10, 4);
const AREA_TIME_OF_DAY: GridArea = GridArea::new(8, 4, 10, 7);
const AREA_DAY_OF_WEEK: GridArea = GridArea::new(10, 1, 12, 9);

/// Knobs for the assembler, set once from config
#[derive(Debug, Clone, Copy, Default)]
pub struct PresentationOptions {
    /// Render the placeholder metrics as charts flagged `unavailable`
    pub show_unavailable: bool,
}

fn rgba_pattern() -> &'static Regex {
    static RE_RGBA: OnceLock<Regex> = OnceLock::new();
    RE_RGBA.get_or_init(|| {
        Regex::new(r"rgba\((\d+),\s*(\d+),\s*(\d+),\s*([\d.]+)\)").expect("Invalid regex")
    })
}

/// `count` shades of `base`, alpha decreasing by 0.05 per index and
/// clamped at 0.3. A base that is not `rgba(...)` is repeated as is.
pub fn generate_colors(count: usize, base: &str) -> Vec<String> {
    let Some(caps) = rgba_pattern().captures(base) else {
        return vec![base.to_string(); count];
    };
    let (r, g, b) = (&caps[1], &caps[2], &caps[3]);
    let Ok(base_alpha) = caps[4].parse::<f64>() else {
        return vec![base.to_string(); count];
    };

    (0..count)
        .map(|i| {
            let alpha = base_alpha - i as f64 * RAMP_STEP;
            let alpha = if alpha > RAMP_FLOOR { alpha } else { RAMP_FLOOR };
            format!("rgba({}, {}, {}, {})", r, g, b, alpha)
        })
        .collect()
}

impl From<&KpiValue> for CardValue {
    fn from(value: &KpiValue) -> Self {
        match value {
            KpiValue::Count(n) => CardValue::Integer(*n),
            KpiValue::Text(s) => CardValue::Text(s.clone()),
        }
    }
}

fn card(
    kpi: &Kpi,
    area: GridArea,
    tipo_calculo: &'static str,
    coluna: &'static str,
    formato: &'static str,
) -> Card {
    Card {
        titulo: kpi.title.to_string(),
        area,
        tipo_calculo,
        colunas_calculo: vec![coluna],
        formato,
        valor: CardValue::from(&kpi.value),
        icone: kpi.icon,
        percentual: kpi.percentual.clone(),
    }
}

fn cards(main: &MainMetrics) -> Vec<Card> {
    let values = &main.values;
    vec![
        card(
            &values.total_interacoes,
            AREA_CARD_TOTAL,
            "soma",
            "Interacoes",
            "inteiro",
        ),
        card(
            &values.leads_capturados,
            AREA_CARD_LEADS,
            "soma",
            "Leads",
            "inteiro",
        ),
        card(
            &values.agendamentos_realizados,
            AREA_CARD_AGENDAMENTOS,
            "soma",
            "Agendamentos",
            "inteiro",
        ),
        card(
            &values.taxa_conversao_final,
            AREA_CARD_CONVERSAO,
            "percentual",
            "ConversaoFinal",
            "percentual",
        ),
    ]
}

fn funnel_section(funnel: &FunnelMetric) -> Section {
    let dataset = Dataset {
        label: "Jornada de Conversão".to_string(),
        data: funnel.steps.iter().map(|s| s.value).collect(),
        background_color: generate_colors(funnel.steps.len(), COLOR_PURPLE),
    };

    Section {
        titulo1: "Funil de Conversão".to_string(),
        titulo2: funnel.title.to_string(),
        descricao: funnel.description.to_string(),
        graficos: vec![Chart {
            chart_id: "funnelChart",
            titulo: funnel.chart_title.to_string(),
            area: AREA_FUNNEL,
            chart_type: ChartType::Bar,
            data: ChartData {
                labels: funnel.steps.iter().map(|s| s.friendly_name.clone()).collect(),
                datasets: vec![dataset],
            },
            options: json!({
                "indexAxis": "y",
                "scales": {
                    "x": { "beginAtZero": true, "grid": { "display": false } },
                    "y": { "grid": { "display": false } }
                }
            }),
            unavailable: false,
        }],
    }
}

fn distribution_chart(
    distribution: &Distribution,
    chart_id: &'static str,
    area: GridArea,
    chart_type: ChartType,
    dataset_label: &str,
    background_color: Vec<String>,
    options: serde_json::Value,
) -> Chart {
    Chart {
        chart_id,
        titulo: distribution.chart_title.clone(),
        area,
        chart_type,
        data: ChartData {
            labels: distribution.labels.clone(),
            datasets: vec![Dataset {
                label: dataset_label.to_string(),
                data: distribution.data.clone(),
                background_color,
            }],
        },
        options,
        unavailable: distribution.unavailable,
    }
}

fn palette(colors: &[&str]) -> Vec<String> {
    colors.iter().map(|c| c.to_string()).collect()
}

fn profile_section(metrics: &DashboardMetrics) -> Section {
    let complaints = &metrics.complaints;
    Section {
        titulo1: "Visão Geral do Atendimento".to_string(),
        titulo2: "Perfil dos Usuários".to_string(),
        descricao: "Entenda o perfil e as necessidades dos clientes que interagem.".to_string(),
        graficos: vec![
            distribution_chart(
                &metrics.age,
                "ageChart",
                AREA_AGE,
                ChartType::Pie,
                "Perfil por Idade",
                palette(&[COLOR_PURPLE, COLOR_ORANGE, COLOR_GREY]),
                json!({}),
            ),
            distribution_chart(
                &metrics.client_type,
                "clientTypeChart",
                AREA_CLIENT_TYPE,
                ChartType::Pie,
                "Tipo de Cliente",
                palette(&[COLOR_BLUE, COLOR_PURPLE, COLOR_GREY]),
                json!({}),
            ),
            distribution_chart(
                complaints,
                "complaintsChart",
                AREA_COMPLAINTS,
                ChartType::Doughnut,
                "Queixas",
                generate_colors(complaints.labels.len(), COLOR_PURPLE),
                json!({ "plugins": { "legend": { "position": "right" } } }),
            ),
        ],
    }
}

fn operations_section(metrics: &DashboardMetrics) -> Section {
    let bar = |distribution: &Distribution, chart_id, area| {
        distribution_chart(
            distribution,
            chart_id,
            area,
            ChartType::Bar,
            distribution.title,
            generate_colors(distribution.labels.len(), COLOR_BLUE),
            json!({}),
        )
    };

    Section {
        titulo1: "Operação".to_string(),
        titulo2: "Unidades e Horários".to_string(),
        descricao: "Indicadores que dependem de dados ainda não disponíveis na origem.".to_string(),
        graficos: vec![
            bar(&metrics.top_units, "topUnitsChart", AREA_TOP_UNITS),
            bar(&metrics.time_of_day, "timeChart", AREA_TIME_OF_DAY),
            bar(&metrics.day_of_week, "dayChart", AREA_DAY_OF_WEEK),
        ],
    }
}

/// Map computed metrics into the fixed dashboard layout
pub fn assemble(metrics: &DashboardMetrics, options: PresentationOptions) -> Dashboard {
    let mut sessoes = vec![funnel_section(&metrics.funnel), profile_section(metrics)];
    if options.show_unavailable {
        sessoes.push(operations_section(metrics));
    }

    Dashboard {
        cards: cards(&metrics.main),
        sessoes,
    }
}
