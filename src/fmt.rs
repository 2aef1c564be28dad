fn group_thousands(int_part: &str) -> String {
    let mut grouped = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped.chars().rev().collect()
}

/// Whole-dollar amount with thousands separators: $1,234
pub fn money(val: f64) -> String {
    let rounded = format!("{:.0}", val.abs());
    let sign = if val < 0.0 && rounded != "0" { "-" } else { "" };
    format!("{sign}${}", group_thousands(&rounded))
}

/// Dollar amount with cents: $1,234.56
pub fn money_cents(val: f64) -> String {
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));
    let sign = if val < 0.0 && cents != "0.00" { "-" } else { "" };
    format!("{sign}${}.{dec_part}", group_thousands(int_part))
}

pub fn pct(val: f64) -> String {
    format!("{val:.2}%")
}

pub fn multiple(val: f64) -> String {
    format!("{val:.2}x")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(1234.56), "$1,235");
        assert_eq!(money(-500.0), "-$500");
        assert_eq!(money(0.0), "$0");
        assert_eq!(money(-0.2), "$0");
        assert_eq!(money(2_200_000.0), "$2,200,000");
    }

    #[test]
    fn test_money_cents_formatting() {
        assert_eq!(money_cents(1234.56), "$1,234.56");
        assert_eq!(money_cents(-500.00), "-$500.00");
        assert_eq!(money_cents(1000000.99), "$1,000,000.99");
        assert_eq!(money_cents(42.10), "$42.10");
    }

    #[test]
    fn test_ratios() {
        assert_eq!(pct(45.0), "45.00%");
        assert_eq!(multiple(1.8101), "1.81x");
    }
}
