//! Intent Resolver - maps a free-text question to a report intent
//!
//! Questions are written in Portuguese, the language of the warehouse
//! views. Rules are evaluated in order and the first match wins; a text can
//! satisfy several rules, so the order is part of the contract.

use crate::intent::Intent;

/// One keyword rule: if `matches` accepts the normalized text, `intent` is chosen.
pub struct KeywordRule {
    pub intent: Intent,
    pub matches: fn(&str) -> bool,
}

fn any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

fn mentions_month(t: &str) -> bool {
    any(t, &["mês", "mes"])
}

fn mentions_payment_method(t: &str) -> bool {
    t.contains("forma") && any(t, &["pag", "pagamento"])
}

pub const RULES: [KeywordRule; 18] = [
    KeywordRule {
        intent: Intent::GeneralKpis,
        matches: |t| any(t, &["kpi", "gerais"]),
    },
    KeywordRule {
        intent: Intent::SaleExtremes,
        matches: |t| any(t, &["maior venda", "menor venda"]),
    },
    KeywordRule {
        intent: Intent::BestMonths,
        matches: |t| mentions_month(t) && any(t, &["maior", "melhor"]) && t.contains("fatur"),
    },
    KeywordRule {
        intent: Intent::WorstMonths,
        matches: |t| mentions_month(t) && any(t, &["menor", "pior"]) && t.contains("fatur"),
    },
    KeywordRule {
        intent: Intent::MonthlySeries,
        matches: |t| t.contains("mensal"),
    },
    KeywordRule {
        intent: Intent::DailySeries,
        matches: |t| any(t, &["diaria", "diária"]),
    },
    KeywordRule {
        intent: Intent::PaymentMethodRevenue,
        matches: |t| mentions_payment_method(t) && any(t, &["fatura", "faturamento"]),
    },
    KeywordRule {
        intent: Intent::PaymentMethodCount,
        matches: |t| mentions_payment_method(t) && any(t, &["quantidade", "qtd", "mais vendas"]),
    },
    KeywordRule {
        intent: Intent::TopSellersByRevenue,
        matches: |t| t.contains("top") && t.contains("vendedor") && any(t, &["fatur", "valor"]),
    },
    KeywordRule {
        intent: Intent::TopSellersByCount,
        matches: |t| {
            t.contains("top") && t.contains("vendedor") && any(t, &["qtd", "quantidade", "vendas"])
        },
    },
    KeywordRule {
        intent: Intent::DistinctCustomersPerSeller,
        matches: |t| t.contains("cliente") && t.contains("vendedor"),
    },
    KeywordRule {
        intent: Intent::SellerCustomerMix,
        matches: |t| t.contains("mix") || (t.contains("pf") && t.contains("pj")),
    },
    KeywordRule {
        intent: Intent::TopCustomersByValue,
        matches: |t| {
            t.contains("top") && t.contains("cliente") && any(t, &["valor", "comprado", "total"])
        },
    },
    KeywordRule {
        intent: Intent::TopCustomersByPurchases,
        matches: |t| t.contains("mais compras") || (t.contains("top") && t.contains("compras")),
    },
    KeywordRule {
        intent: Intent::InactiveCustomers,
        matches: |t| t.contains("inativo") && any(t, &["lista", "clientes"]),
    },
    KeywordRule {
        intent: Intent::StatusCounts,
        matches: |t| t.contains("ativos") && t.contains("inativos"),
    },
    KeywordRule {
        intent: Intent::HighValueInactive,
        matches: |t| t.contains("reativa") || (t.contains("alto valor") && t.contains("inativo")),
    },
    KeywordRule {
        intent: Intent::ChurnRisk,
        matches: |t| t.contains("tempo") && any(t, &["entre compras", "dias"]),
    },
];

/// Resolve a question to an intent. `None` means keep the menu selection.
pub fn resolve(free_text: &str) -> Option<Intent> {
    let text = free_text.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }
    RULES
        .iter()
        .find(|rule| (rule.matches)(&text))
        .map(|rule| rule.intent)
}

/// The intent to run for a menu pick plus an optional question.
pub fn select(menu: Intent, free_text: Option<&str>) -> Intent {
    free_text.and_then(resolve).unwrap_or(menu)
}

/// What one line typed at the interactive prompt asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Run(Intent),
    UnknownOption(u64),
}

/// A number picks a menu id; any other text is resolved as a question,
/// falling back to `current`.
pub fn select_line(current: Intent, line: &str) -> Selection {
    let line = line.trim();
    match line.parse::<u64>() {
        Ok(id) => u8::try_from(id)
            .ok()
            .and_then(Intent::from_id)
            .map(Selection::Run)
            .unwrap_or(Selection::UnknownOption(id)),
        Err(_) => Selection::Run(select(current, Some(line))),
    }
}
