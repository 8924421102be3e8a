//! Formatting helpers shared by the screens.

use financa_api::endpoints::Valor;

/// Format an amount as Brazilian currency, e.g. `-R$ 1.234,56`.
pub fn fmt_valor(valor: Valor) -> String {
    let value = valor.inner();
    let cents = (value.abs() * 100.0).round() as i64;
    let (reais, centavos) = (cents / 100, cents % 100);

    let mut inteiro = String::new();
    for (i, digit) in reais.to_string().chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            inteiro.push('.');
        }
        inteiro.push(digit);
    }
    let inteiro: String = inteiro.chars().rev().collect();

    let sign = if value < 0.0 && cents != 0 { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, inteiro, centavos)
}

/// Format an ISO date as `DD/MM/YYYY`. Anything else passes through
/// untouched, the server already localizes some feeds.
pub fn fmt_data(data: &str) -> String {
    let parts: Vec<&str> = data.splitn(3, '-').collect();
    match parts.as_slice() {
        [ano, mes, dia] if ano.len() == 4 && mes.len() == 2 && dia.len() == 2 => {
            format!("{}/{}/{}", dia, mes, ano)
        }
        _ => data.to_string(),
    }
}

/// Format a variance percentage badge. Zero is rendered without a sign so
/// it reads as "on the average" rather than a change.
pub fn fmt_variance(variacao_pct: f64) -> String {
    if variacao_pct == 0.0 {
        "0%".to_string()
    } else {
        format!("{:+.0}%", variacao_pct)
    }
}

/// Truncate a string with an ellipsis when it exceeds the width.
pub fn truncate(text: &str, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_width.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_currency_with_grouping() {
        assert_eq!(fmt_valor(Valor::new(1234.56)), "R$ 1.234,56");
        assert_eq!(fmt_valor(Valor::new(-1234.56)), "-R$ 1.234,56");
        assert_eq!(fmt_valor(Valor::new(-1_000_000.0)), "-R$ 1.000.000,00");
        assert_eq!(fmt_valor(Valor::new(0.0)), "R$ 0,00");
        assert_eq!(fmt_valor(Valor::new(-0.004)), "R$ 0,00");
    }

    #[test]
    fn formats_iso_dates_and_passes_through_the_rest() {
        assert_eq!(fmt_data("2025-08-10"), "10/08/2025");
        assert_eq!(fmt_data("10/08/2025"), "10/08/2025");
        assert_eq!(fmt_data(""), "");
    }

    #[test]
    fn variance_badge_keeps_zero_neutral() {
        assert_eq!(fmt_variance(0.0), "0%");
        assert_eq!(fmt_variance(12.4), "+12%");
        assert_eq!(fmt_variance(-7.6), "-8%");
    }

    #[test]
    fn truncates_long_text() {
        assert_eq!(truncate("curto", 10), "curto");
        assert_eq!(truncate("descrição muito longa", 10), "descrição…");
    }
}
