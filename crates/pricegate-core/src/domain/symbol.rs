use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

pub const MIN_SYMBOL_LEN: usize = 2;
pub const MAX_SYMBOL_LEN: usize = 20;

/// Normalized exchange symbol, e.g. `BTCUSDT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Validate and normalize a symbol to uppercase.
    ///
    /// Input is not trimmed; any character outside `[A-Za-z0-9]` is rejected.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if input.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        if let Some((index, ch)) = input
            .chars()
            .enumerate()
            .find(|(_, ch)| !ch.is_ascii_alphanumeric())
        {
            return Err(ValidationError::SymbolInvalidChar {
                symbol: input.to_owned(),
                ch,
                index,
            });
        }

        let len = input.len();
        if !(MIN_SYMBOL_LEN..=MAX_SYMBOL_LEN).contains(&len) {
            return Err(ValidationError::SymbolLength {
                symbol: input.to_owned(),
                len,
                min: MIN_SYMBOL_LEN,
                max: MAX_SYMBOL_LEN,
            });
        }

        Ok(Self(input.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_normalizes_symbol() {
        let parsed = Symbol::parse("btcusdt").expect("symbol should parse");
        assert_eq!(parsed.as_str(), "BTCUSDT");
    }

    #[test]
    fn accepts_digits_anywhere() {
        let parsed = Symbol::parse("1000pepeusdt").expect("symbol should parse");
        assert_eq!(parsed.as_str(), "1000PEPEUSDT");
    }

    #[test]
    fn rejects_surrounding_whitespace() {
        let err = Symbol::parse(" BTCUSDT").expect_err("must fail");
        assert!(matches!(
            err,
            ValidationError::SymbolInvalidChar { ch: ' ', index: 0, .. }
        ));
    }

    #[test]
    fn rejects_separators() {
        for input in ["BTC-USDT", "BTC_USDT", "BTC/USDT", "BTC.USDT"] {
            let err = Symbol::parse(input).expect_err("must fail");
            assert!(matches!(err, ValidationError::SymbolInvalidChar { index: 3, .. }));
        }
    }

    #[test]
    fn rejects_non_ascii_letters() {
        let err = Symbol::parse("BTCÜSDT").expect_err("must fail");
        assert!(matches!(err, ValidationError::SymbolInvalidChar { ch: 'Ü', .. }));
    }

    #[test]
    fn enforces_length_bounds() {
        assert!(matches!(
            Symbol::parse("B"),
            Err(ValidationError::SymbolLength { len: 1, .. })
        ));
        assert!(matches!(
            Symbol::parse(&"A".repeat(21)),
            Err(ValidationError::SymbolLength { len: 21, .. })
        ));
        assert!(Symbol::parse("BT").is_ok());
        assert!(Symbol::parse(&"A".repeat(20)).is_ok());
    }

    #[test]
    fn deserializes_through_validation() {
        let symbol: Symbol = serde_json::from_str("\"ethusdt\"").expect("valid json symbol");
        assert_eq!(symbol.as_str(), "ETHUSDT");

        let err = serde_json::from_str::<Symbol>("\"ETH USDT\"");
        assert!(err.is_err());
    }
}
