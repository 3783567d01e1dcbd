#[derive(Clone, Copy, Eq, PartialEq)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    /// The truth value a symbol needs for a literal of this sign to hold
    #[inline]
    pub fn satisfying_value(self) -> bool {
        matches!(self, Sign::Positive)
    }
}

/// `true` is a plain symbol, `false` its negation
impl From<bool> for Sign {
    #[inline]
    fn from(positive: bool) -> Self {
        match positive {
            true => Sign::Positive,
            false => Sign::Negative,
        }
    }
}

impl std::ops::Not for Sign {
    type Output = Sign;

    #[inline]
    fn not(self) -> Self::Output {
        match self {
            Sign::Positive => Sign::Negative,
            Sign::Negative => Sign::Positive,
        }
    }
}

/// The prefix a literal carries in the input format: nothing for positive literals
impl std::fmt::Display for Sign {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(match self {
            Sign::Positive => "",
            Sign::Negative => "-",
        })
    }
}

impl std::fmt::Debug for Sign {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(match self {
            Sign::Positive => "+",
            Sign::Negative => "-",
        })
    }
}

#[test]
fn sign_from_bool() {
    assert_eq!(Sign::from(true), Sign::Positive);
    assert_eq!(Sign::from(false), Sign::Negative);
    assert_eq!(!Sign::Positive, Sign::Negative);
    assert!(Sign::Positive.satisfying_value());
    assert!(!Sign::Negative.satisfying_value());
    assert_eq!(format!("{}{}", Sign::Negative, 4), "-4");
    assert_eq!(format!("{}{}", Sign::Positive, 4), "4");
    assert_eq!(format!("{:?}{:?}", Sign::Positive, Sign::Negative), "+-");
}
