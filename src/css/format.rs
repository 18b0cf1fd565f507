use crate::tokens::{TokenPath, TokenType};

/// Units that already make a numeric value CSS-ready. Longer names first so
/// `vmin` is not mistaken for `in`.
const CSS_UNITS: &[&str] = &[
    "vmin", "vmax", "rem", "px", "em", "vw", "vh", "pt", "cm", "mm", "in", "ex", "ch", "fr", "%",
];

/// `--Seg-Seg-Seg`, with every whitespace run inside a segment collapsed to a
/// single hyphen. Case is preserved.
pub fn css_var_name(path: &TokenPath) -> String {
    let segments: Vec<String> = path
        .segments()
        .iter()
        .map(|segment| hyphenate_whitespace(segment))
        .collect();
    format!("--{}", segments.join("-"))
}

fn hyphenate_whitespace(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut in_whitespace = false;
    for ch in segment.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push('-');
            }
            in_whitespace = true;
        } else {
            out.push(ch);
            in_whitespace = false;
        }
    }
    out
}

pub fn format_css_value(value: &str, token_type: Option<TokenType>) -> String {
    match token_type {
        Some(TokenType::Number) if needs_px_suffix(value) => format!("{value}px"),
        _ => value.to_string(),
    }
}

fn needs_px_suffix(value: &str) -> bool {
    let trimmed = value.trim();
    if CSS_UNITS.iter().any(|unit| trimmed.ends_with(unit)) {
        return false;
    }
    trimmed.parse::<f64>().is_ok_and(f64::is_finite)
}

pub fn mode_selector(mode: &str) -> String {
    format!("[data-mode=\"{mode}\"]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn var_name_joins_segments_with_hyphens() {
        let path = TokenPath::new(["Color", "Base", "Background", "default"]);
        assert_eq!(css_var_name(&path), "--Color-Base-Background-default");
    }

    #[test]
    fn var_name_collapses_whitespace_runs() {
        let path = TokenPath::new(["Color", "Primary Background", "hover  state"]);
        assert_eq!(css_var_name(&path), "--Color-Primary-Background-hover-state");
    }

    #[test]
    fn bare_numbers_get_px() {
        assert_eq!(format_css_value("8", Some(TokenType::Number)), "8px");
        assert_eq!(format_css_value("0.5", Some(TokenType::Number)), "0.5px");
    }

    #[test]
    fn values_with_units_are_not_suffixed_twice() {
        assert_eq!(format_css_value("50%", Some(TokenType::Number)), "50%");
        assert_eq!(format_css_value("1.5rem", Some(TokenType::Number)), "1.5rem");
        assert_eq!(format_css_value("12px", Some(TokenType::Number)), "12px");
        assert_eq!(format_css_value("10vmin", Some(TokenType::Number)), "10vmin");
    }

    #[test]
    fn non_numeric_number_tokens_pass_through() {
        assert_eq!(format_css_value("auto", Some(TokenType::Number)), "auto");
        assert_eq!(
            format_css_value("calc(100% - 4px)", Some(TokenType::Number)),
            "calc(100% - 4px)"
        );
    }

    #[test]
    fn nan_and_infinity_spellings_are_not_numbers() {
        for value in ["NaN", "inf", "-inf", "infinity", "Infinity"] {
            assert_eq!(format_css_value(value, Some(TokenType::Number)), value);
        }
    }

    #[test]
    fn colors_and_text_pass_through() {
        assert_eq!(format_css_value("#ffffff", Some(TokenType::Color)), "#ffffff");
        assert_eq!(format_css_value("8", Some(TokenType::Text)), "8");
        assert_eq!(format_css_value("8", None), "8");
    }

    #[test]
    fn selector_scopes_by_data_mode() {
        assert_eq!(mode_selector("hc-dark"), "[data-mode=\"hc-dark\"]");
    }
}
