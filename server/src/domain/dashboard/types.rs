//! Dashboard response schema
//!
//! Field names and order are consumed verbatim by the front-end charting
//! layer; serde renames keep the Rust side idiomatic.

use serde::Serialize;

/// Grid placement of a card or chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridArea {
    pub row_start: u32,
    pub col_start: u32,
    pub row_end: u32,
    pub col_end: u32,
}

impl GridArea {
    pub const fn new(row_start: u32, col_start: u32, row_end: u32, col_end: u32) -> Self {
        Self {
            row_start,
            col_start,
            row_end,
            col_end,
        }
    }
}

/// Card value: integer counts or preformatted text such as `"12.5%"`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CardValue {
    Integer(u64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub titulo: String,
    #[serde(flatten)]
    pub area: GridArea,
    pub tipo_calculo: &'static str,
    pub colunas_calculo: Vec<&'static str>,
    pub formato: &'static str,
    pub valor: CardValue,
    pub icone: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentual: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Pie,
    Doughnut,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<u64>,
    pub background_color: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chart {
    pub chart_id: &'static str,
    pub titulo: String,
    #[serde(flatten)]
    pub area: GridArea,
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub data: ChartData,
    /// Chart-library options, passed through untouched
    pub options: serde_json::Value,
    #[serde(skip_serializing_if = "is_false")]
    pub unavailable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub titulo1: String,
    pub titulo2: String,
    pub descricao: String,
    pub graficos: Vec<Chart>,
}

/// Full `/dashboard-data` payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub cards: Vec<Card>,
    pub sessoes: Vec<Section>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_card_serializes_flat_camel_case() {
        let card = Card {
            titulo: "Agendamentos".to_string(),
            area: GridArea::new(1, 5, 2, 7),
            tipo_calculo: "soma",
            colunas_calculo: vec!["Agendamentos"],
            formato: "inteiro",
            valor: CardValue::Integer(3),
            icone: "📅",
            percentual: None,
        };
        let value = serde_json::to_value(&card).unwrap();
        assert_eq!(
            value,
            json!({
                "titulo": "Agendamentos",
                "rowStart": 1,
                "colStart": 5,
                "rowEnd": 2,
                "colEnd": 7,
                "tipoCalculo": "soma",
                "colunasCalculo": ["Agendamentos"],
                "formato": "inteiro",
                "valor": 3,
                "icone": "📅"
            })
        );
    }

    #[test]
    fn test_card_key_order() {
        let card = Card {
            titulo: "Leads".to_string(),
            area: GridArea::new(1, 3, 2, 5),
            tipo_calculo: "soma",
            colunas_calculo: vec!["Leads"],
            formato: "inteiro",
            valor: CardValue::Text("1%".to_string()),
            icone: "📋",
            percentual: Some("1% do total".to_string()),
        };
        let text = serde_json::to_string(&card).unwrap();
        let keys = [
            "titulo",
            "rowStart",
            "colStart",
            "rowEnd",
            "colEnd",
            "tipoCalculo",
            "colunasCalculo",
            "formato",
            "valor",
            "icone",
            "percentual",
        ];
        let positions: Vec<usize> = keys
            .iter()
            .map(|k| text.find(&format!("\"{}\"", k)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_chart_type_and_unavailable_flag() {
        let chart = Chart {
            chart_id: "ageChart",
            titulo: "Idade".to_string(),
            area: GridArea::new(4, 1, 6, 4),
            chart_type: ChartType::Doughnut,
            data: ChartData {
                labels: Vec::new(),
                datasets: Vec::new(),
            },
            options: json!({}),
            unavailable: false,
        };
        let value = serde_json::to_value(&chart).unwrap();
        assert_eq!(value["type"], "doughnut");
        assert!(value.get("unavailable").is_none());

        let value = serde_json::to_value(Chart {
            unavailable: true,
            ..chart
        })
        .unwrap();
        assert_eq!(value["unavailable"], true);
    }
}
