use crate::{Evaluate, Sign, SymbolIdx, Symbols};

#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub struct Literal {
    code: SymbolIdx,
}

impl Literal {
    #[inline]
    pub fn new(symbol: SymbolIdx, sign: impl Into<Sign>) -> Self {
        assert!(symbol < (SymbolIdx::max_value() >> 1));
        let sign = sign.into();
        Literal {
            code: (symbol << 1) | matches!(sign, Sign::Positive) as SymbolIdx,
        }
    }

    #[inline]
    pub fn symbol(self) -> SymbolIdx {
        self.code >> 1
    }

    #[inline]
    pub fn sign(self) -> Sign {
        ((self.code & 1) == 1).into()
    }

    #[inline]
    pub fn is_negated(self) -> bool {
        self.sign() == Sign::Negative
    }

    /// Writes the literal with the symbol's id, e.g. `-12`
    pub fn display(self, symbols: &Symbols) -> impl std::fmt::Display + '_ {
        Show {
            literal: self,
            symbols,
        }
    }
}

impl Evaluate for Literal {
    #[inline]
    fn evaluate(&self, symbols: &Symbols) -> Option<bool> {
        symbols
            .value(self.symbol())
            .map(|value| value == self.sign().satisfying_value())
    }
}

impl std::ops::Not for Literal {
    type Output = Literal;

    #[inline]
    fn not(self) -> Self::Output {
        Literal {
            code: self.code ^ 1,
        }
    }
}

impl std::fmt::Debug for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}#{}", self.sign(), self.symbol())
    }
}

struct Show<'a> {
    literal: Literal,
    symbols: &'a Symbols,
}

impl std::fmt::Display for Show<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}{}",
            self.literal.sign(),
            self.symbols.id(self.literal.symbol())
        )
    }
}

#[test]
fn evaluating_literals() {
    let symbols = Symbols::new_with(vec![Some(true), Some(false), None]);

    assert_eq!(Literal::new(0, true).evaluate(&symbols), Some(true));
    assert_eq!(Literal::new(0, false).evaluate(&symbols), Some(false));
    assert_eq!(Literal::new(1, true).evaluate(&symbols), Some(false));
    assert_eq!(Literal::new(1, false).evaluate(&symbols), Some(true));
    assert_eq!(Literal::new(2, true).evaluate(&symbols), None);
    assert_eq!(Literal::new(2, false).evaluate(&symbols), None);
}

#[test]
fn literal_parts() {
    let literal = Literal::new(5, Sign::Negative);
    assert_eq!(literal.symbol(), 5);
    assert!(literal.is_negated());
    assert_eq!(!literal, Literal::new(5, Sign::Positive));
    assert!(!(!literal).is_negated());

    let symbols = Symbols::new_with(vec![None; 6]);
    assert_eq!(literal.display(&symbols).to_string(), "-6");
    assert_eq!((!literal).display(&symbols).to_string(), "6");
}
