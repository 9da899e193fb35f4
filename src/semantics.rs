//! Field-name semantics: icon tags, color variants, and descriptions.
//!
//! All three lookups are ordered association lists evaluated top to bottom;
//! the first keyword contained in the (normalized, lowercased) field name
//! wins. Order is load-bearing: a field named `investimento_cancelado`
//! resolves to whichever of its keywords appears first in each table, and
//! the tables are deliberately independent so the icon, variant, and
//! description of the same field may come from different keywords.
//!
//! The generator only ever emits the string tag; mapping a tag to an actual
//! rendered asset belongs to the presentation layer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{classify::DataType, dashboard::Aggregation};

/// Semantic icon tag attached to KPI widgets. Serialized in kebab-case; the
/// rendering side owns the tag→asset resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconTag {
    Users,
    UserPlus,
    DollarSign,
    Wallet,
    CreditCard,
    ShoppingCart,
    TrendingUp,
    TrendingDown,
    Target,
    Percent,
    MousePointer,
    Eye,
    Mail,
    Phone,
    Calendar,
    Clock,
    Hash,
    BarChart,
    LineChart,
    PieChart,
    Activity,
    MapPin,
    Tag,
    Layers,
    Zap,
}

impl fmt::Display for IconTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", tag.trim_matches('"'))
    }
}

/// Color variant for KPI cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Default,
    Primary,
    Success,
    Warning,
    Destructive,
}

/// Keyword → icon, first match wins. The revenue keywords sit above the
/// cost keywords so fields like `receita_investida` read as revenue.
const ICON_TABLE: &[(&str, IconTag)] = &[
    ("lead", IconTag::Users),
    ("cliente", IconTag::Users),
    ("customer", IconTag::Users),
    ("usuario", IconTag::UserPlus),
    ("user", IconTag::UserPlus),
    ("valor", IconTag::DollarSign),
    ("receita", IconTag::DollarSign),
    ("venda", IconTag::DollarSign),
    ("revenue", IconTag::DollarSign),
    ("faturamento", IconTag::DollarSign),
    ("ticket", IconTag::CreditCard),
    ("pedido", IconTag::ShoppingCart),
    ("order", IconTag::ShoppingCart),
    ("investimento", IconTag::Wallet),
    ("custo", IconTag::Wallet),
    ("spend", IconTag::Wallet),
    ("cpl", IconTag::TrendingUp),
    ("cpc", IconTag::TrendingUp),
    ("cpa", IconTag::TrendingUp),
    ("roas", IconTag::TrendingUp),
    ("roi", IconTag::TrendingUp),
    ("churn", IconTag::TrendingDown),
    ("perda", IconTag::TrendingDown),
    ("conversao", IconTag::Target),
    ("conversão", IconTag::Target),
    ("meta", IconTag::Target),
    ("taxa", IconTag::Percent),
    ("percent", IconTag::Percent),
    ("click", IconTag::MousePointer),
    ("clique", IconTag::MousePointer),
    ("impress", IconTag::Eye),
    ("visita", IconTag::Eye),
    ("view", IconTag::Eye),
    ("email", IconTag::Mail),
    ("telefone", IconTag::Phone),
    ("phone", IconTag::Phone),
    ("data", IconTag::Calendar),
    ("date", IconTag::Calendar),
    ("tempo", IconTag::Clock),
    ("duracao", IconTag::Clock),
    ("quantidade", IconTag::Hash),
    ("count", IconTag::Hash),
    ("total", IconTag::BarChart),
    ("regiao", IconTag::MapPin),
    ("cidade", IconTag::MapPin),
    ("categoria", IconTag::Tag),
    ("produto", IconTag::Layers),
    ("campanha", IconTag::Zap),
];

/// Keyword → variant. Falls back on the data type when nothing matches.
const VARIANT_TABLE: &[(&str, Variant)] = &[
    ("lead", Variant::Primary),
    ("total", Variant::Primary),
    ("conversao", Variant::Success),
    ("conversão", Variant::Success),
    ("realizado", Variant::Success),
    ("ativo", Variant::Success),
    ("investimento", Variant::Warning),
    ("spend", Variant::Warning),
    ("custo", Variant::Warning),
    ("cancelado", Variant::Destructive),
    ("perda", Variant::Destructive),
    ("churn", Variant::Destructive),
];

/// Keyword → canned description sentence.
const DESCRIPTION_TABLE: &[(&str, &str)] = &[
    ("lead", "Total de leads captados no período"),
    ("receita", "Receita acumulada no período"),
    ("venda", "Vendas realizadas no período"),
    ("valor", "Valor acumulado no período"),
    ("investimento", "Investimento aplicado no período"),
    ("custo", "Custo total no período"),
    ("cpl", "Custo médio por lead"),
    ("conversao", "Taxa de conversão do funil"),
    ("conversão", "Taxa de conversão do funil"),
    ("ticket", "Valor médio por venda"),
    ("churn", "Clientes perdidos no período"),
];

pub fn icon_for(field_name: &str) -> IconTag {
    let lowered = field_name.to_lowercase();
    ICON_TABLE
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, icon)| *icon)
        .unwrap_or(IconTag::Activity)
}

pub fn variant_for(field_name: &str, data_type: DataType) -> Variant {
    let lowered = field_name.to_lowercase();
    if let Some((_, variant)) = VARIANT_TABLE
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
    {
        return *variant;
    }
    match data_type {
        DataType::Currency => Variant::Warning,
        DataType::Percent => Variant::Success,
        _ => Variant::Default,
    }
}

/// Description for a KPI over `field_name`. Keyword sentences win; the
/// fallback is parameterized by display name, type, and aggregation.
pub fn describe_field(
    field_name: &str,
    display_name: &str,
    data_type: DataType,
    aggregation: Aggregation,
) -> String {
    let lowered = field_name.to_lowercase();
    if let Some((_, sentence)) = DESCRIPTION_TABLE
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
    {
        return (*sentence).to_string();
    }
    let verb = match aggregation {
        Aggregation::Sum => "Soma",
        Aggregation::Avg => "Média",
        Aggregation::Count => "Contagem",
        Aggregation::Min => "Mínimo",
        Aggregation::Max => "Máximo",
    };
    match data_type {
        DataType::Currency => format!("{verb} de {display_name} em valor monetário"),
        DataType::Percent => format!("{verb} de {display_name} em percentual"),
        _ => format!("{verb} de {display_name} no período"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_matching_keyword_wins_per_table() {
        // "investimento_cancelado": icon table hits "investimento" first,
        // variant table also hits "investimento" before "cancelado".
        assert_eq!(icon_for("investimento_cancelado"), IconTag::Wallet);
        assert_eq!(
            variant_for("investimento_cancelado", DataType::Currency),
            Variant::Warning
        );
    }

    #[test]
    fn unmatched_name_gets_default_icon() {
        assert_eq!(icon_for("xyz"), IconTag::Activity);
    }

    #[test]
    fn variant_falls_back_on_data_type() {
        assert_eq!(variant_for("montante", DataType::Currency), Variant::Warning);
        assert_eq!(variant_for("indice", DataType::Percent), Variant::Success);
        assert_eq!(variant_for("nome", DataType::Text), Variant::Default);
    }

    #[test]
    fn description_fallback_names_the_aggregation() {
        let description =
            describe_field("montante", "Montante", DataType::Integer, Aggregation::Sum);
        assert_eq!(description, "Soma de Montante no período");
    }

    #[test]
    fn icon_tag_serializes_kebab_case() {
        assert_eq!(IconTag::DollarSign.to_string(), "dollar-sign");
        assert_eq!(IconTag::TrendingUp.to_string(), "trending-up");
    }
}
