//! Display metadata for the currencies the converter offers.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
}

const fn info(code: &'static str, name: &'static str, symbol: &'static str) -> CurrencyInfo {
    CurrencyInfo { code, name, symbol }
}

pub const CURRENCIES: &[CurrencyInfo] = &[
    info("USD", "US Dollar", "$"),
    info("EUR", "Euro", "€"),
    info("GBP", "British Pound", "£"),
    info("JPY", "Japanese Yen", "¥"),
    info("CNY", "Chinese Yuan", "¥"),
    info("KRW", "South Korean Won", "₩"),
    info("AUD", "Australian Dollar", "$"),
    info("CAD", "Canadian Dollar", "$"),
    info("CHF", "Swiss Franc", "CHF"),
    info("HKD", "Hong Kong Dollar", "$"),
    // Southeast Asia
    info("VND", "Vietnamese Dong", "₫"),
    info("THB", "Thai Baht", "฿"),
    info("SGD", "Singapore Dollar", "$"),
    info("MYR", "Malaysian Ringgit", "RM"),
    info("IDR", "Indonesian Rupiah", "Rp"),
    info("PHP", "Philippine Peso", "₱"),
    info("BND", "Brunei Dollar", "$"),
    info("KHR", "Cambodian Riel", "៛"),
    info("LAK", "Lao Kip", "₭"),
    info("MMK", "Myanmar Kyat", "K"),
    info("TWD", "New Taiwan Dollar", "NT$"),
    info("INR", "Indian Rupee", "₹"),
    info("RUB", "Russian Ruble", "₽"),
    info("BRL", "Brazilian Real", "R$"),
    info("MXN", "Mexican Peso", "$"),
    info("ZAR", "South African Rand", "R"),
    info("TRY", "Turkish Lira", "₺"),
    info("SEK", "Swedish Krona", "kr"),
    info("NOK", "Norwegian Krone", "kr"),
    info("DKK", "Danish Krone", "kr"),
    info("NZD", "New Zealand Dollar", "$"),
    info("PLN", "Polish Zloty", "zł"),
];

/// Looks up a currency by code, ignoring case.
pub fn find(code: &str) -> Option<&'static CurrencyInfo> {
    CURRENCIES
        .iter()
        .find(|currency| currency.code.eq_ignore_ascii_case(code))
}

/// Currencies whose code or name contains `query`, in catalog order.
pub fn search(query: &str) -> Vec<&'static CurrencyInfo> {
    let query = query.trim().to_lowercase();
    CURRENCIES
        .iter()
        .filter(|currency| {
            query.is_empty()
                || currency.code.to_lowercase().contains(&query)
                || currency.name.to_lowercase().contains(&query)
        })
        .collect()
}
