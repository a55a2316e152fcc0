//! [§ 14.1 The An+B notation](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax)

/// Largest magnitude accepted for `a`, `b`, or a numeric pseudo-class argument.
pub const MAX_MAGNITUDE: i64 = 1_000_000_000;

/// A parsed `An+B` formula.
///
/// "The An+B notation defines an integer step (A) and offset (B), and
/// represents the An+Bth elements in a list, for every positive integer or
/// zero value of n, with the first element in the list having index 1."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NthExpr {
    /// The step.
    pub a: i64,
    /// The offset.
    pub b: i64,
}

impl NthExpr {
    /// `odd`, equivalent to `2n+1`.
    pub const ODD: Self = Self { a: 2, b: 1 };
    /// `even`, equivalent to `2n`.
    pub const EVEN: Self = Self { a: 2, b: 0 };

    /// Parse `odd`, `even`, `B`, or `An+B` with whitespace ignored.
    ///
    /// Returns `None` for malformed text or coefficients beyond
    /// [`MAX_MAGNITUDE`].
    pub fn parse(raw: &str) -> Option<Self> {
        let compact = raw
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();

        let expr = match compact.as_str() {
            "" => return None,
            "odd" => Self::ODD,
            "even" => Self::EVEN,
            other if other.contains('n') => parse_expression(other)?,
            other => Self {
                a: 0,
                b: parse_bounded(other)?,
            },
        };
        Some(expr)
    }

    /// Whether the 1-based `position` is an `An+B`th position.
    pub const fn matches(&self, position: usize) -> bool {
        #[allow(clippy::cast_possible_wrap)]
        let diff = position as i64 - self.b;
        if self.a == 0 {
            return diff == 0;
        }
        diff % self.a == 0 && diff / self.a >= 0
    }
}

fn parse_expression(expr: &str) -> Option<NthExpr> {
    if expr.matches('n').count() != 1 {
        return None;
    }
    let (a_part, rest) = expr.split_at(expr.find('n')?);
    let b_part = &rest[1..];

    let a = match a_part {
        "" | "+" => 1,
        "-" => -1,
        _ => parse_bounded(a_part)?,
    };

    if b_part.is_empty() {
        return Some(NthExpr { a, b: 0 });
    }
    // The sign is mandatory between the n and B terms.
    let digits = b_part.strip_prefix(['+', '-'])?;
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    let b = parse_bounded(b_part)?;
    Some(NthExpr { a, b })
}

/// Parse a signed integer, rejecting anything beyond [`MAX_MAGNITUDE`].
pub fn parse_bounded(text: &str) -> Option<i64> {
    let value = text.parse::<i64>().ok()?;
    (-MAX_MAGNITUDE..=MAX_MAGNITUDE).contains(&value).then_some(value)
}
