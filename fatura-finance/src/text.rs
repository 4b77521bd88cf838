/// Capitalize the first letter of every word and lower-case the rest.
///
/// A "word" starts at any letter not preceded by another letter, so
/// `"[cartão] loja (parcela 2)"` becomes `"[Cartão] Loja (Parcela 2)"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case_words() {
        assert_eq!(title_case("PADARIA SÃO JOÃO"), "Padaria São João");
        assert_eq!(title_case("[cartão] loja (parcela 2) {em 11/mar}"), "[Cartão] Loja (Parcela 2) {Em 11/Mar}");
        assert_eq!(title_case("uber*trip"), "Uber*Trip");
        assert_eq!(title_case("mc2go"), "Mc2Go");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_title_case_is_idempotent() {
        for s in ["AMAZON MKTPLACE", "ifood *restaurante", "[Card] Shop (Installment 2) {11/Mar}", "ÇÃO ção"] {
            let once = title_case(s);
            assert_eq!(title_case(&once), once);
        }
    }
}
