//! pt-BR display labels and casing helpers for the dashboard.

/// Display label for a transaction by amount sign.
#[must_use]
pub fn kind_label(amount: f64) -> &'static str {
    if amount < 0.0 { "Despesa" } else { "Renda" }
}

/// Month name (1-based), `None` outside `1..=12`.
#[must_use]
pub fn month_label(month: u32) -> Option<&'static str> {
    let name = match month {
        1 => "Janeiro",
        2 => "Fevereiro",
        3 => "Março",
        4 => "Abril",
        5 => "Maio",
        6 => "Junho",
        7 => "Julho",
        8 => "Agosto",
        9 => "Setembro",
        10 => "Outubro",
        11 => "Novembro",
        12 => "Dezembro",
        _ => return None,
    };
    Some(name)
}

/// Title-case a free-form label the way the dashboard displays category
/// names: each word capitalized, except short pt-BR connectives which stay
/// lowercase when they are not the first word.
#[must_use]
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut first = true;

    for word in input.split_whitespace() {
        if !first {
            out.push(' ');
        }

        let lower = word.to_lowercase();
        if !first && is_connective(&lower) {
            out.push_str(&lower);
        } else {
            let mut chars = lower.chars();
            if let Some(head) = chars.next() {
                out.extend(head.to_uppercase());
                out.push_str(chars.as_str());
            }
        }

        first = false;
    }

    out
}

fn is_connective(word: &str) -> bool {
    matches!(word, "de" | "da" | "do" | "das" | "dos" | "e" | "em" | "com")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_label() {
        assert_eq!(kind_label(-12.5), "Despesa");
        assert_eq!(kind_label(0.0), "Renda");
        assert_eq!(kind_label(100.0), "Renda");
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label(1), Some("Janeiro"));
        assert_eq!(month_label(12), Some("Dezembro"));
        assert_eq!(month_label(0), None);
        assert_eq!(month_label(13), None);
    }

    #[test]
    fn test_title_case_basic() {
        assert_eq!(title_case("mercado"), "Mercado");
        assert_eq!(title_case("CONTA DE LUZ"), "Conta de Luz");
        assert_eq!(title_case("gastos com saúde"), "Gastos com Saúde");
    }

    #[test]
    fn test_title_case_connective_first_word() {
        // A leading connective is still capitalized.
        assert_eq!(title_case("de volta"), "De Volta");
    }

    #[test]
    fn test_title_case_whitespace() {
        assert_eq!(title_case("  cartão   de  crédito "), "Cartão de Crédito");
        assert_eq!(title_case(""), "");
    }
}
