//! Contrast formulas.
//!
//! A contrast is written as arithmetic over design column names, e.g.
//! `1/2*(mismatch_2back+match_2back-mismatch_1back-match_1back)`. The
//! formula is parsed once into a list of `(column, coefficient)` terms;
//! anything that is not a linear combination of columns is rejected.
//!
//! Grammar:
//!
//! ```text
//! expr    = term (('+' | '-') term)*
//! term    = unary (('*' | '/') unary)*
//! unary   = ('+' | '-') unary | primary
//! primary = number | identifier | '(' expr ')'
//! ```

use std::{collections::BTreeMap, fmt, iter::Peekable, str::CharIndices};

use nalgebra::DVector;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ContrastParseError {
    #[display("contrast formula is empty")]
    Empty,
    #[display("unexpected character '{character}' at offset {offset}")]
    UnexpectedCharacter { character: char, offset: usize },
    #[display("unexpected '{token}' at offset {offset}")]
    UnexpectedToken { token: String, offset: usize },
    #[display("formula ends unexpectedly")]
    UnexpectedEnd,
    #[display("product of two column terms is not linear")]
    NonLinear,
    #[display("division by a column term or by zero")]
    DivisionByZero,
    #[display("formula has a constant term {value}")]
    ConstantTerm { value: f64 },
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("contrast references column '{column}' which is not in the design")]
pub struct UnknownColumn {
    pub column: String,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Ident(s) => f.write_str(s),
            Token::Plus => f.write_str("+"),
            Token::Minus => f.write_str("-"),
            Token::Star => f.write_str("*"),
            Token::Slash => f.write_str("/"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
        }
    }
}

fn tokenize(source: &str) -> Result<Vec<(usize, Token)>, ContrastParseError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();
    while let Some(&(offset, c)) = chars.peek() {
        let token = match c {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            c if c.is_ascii_digit() || c == '.' => {
                let text = take_while(&mut chars, |c| c.is_ascii_digit() || c == '.');
                let value = text
                    .parse()
                    .map_err(|_| ContrastParseError::UnexpectedToken {
                        token: text.clone(),
                        offset,
                    })?;
                tokens.push((offset, Token::Number(value)));
                continue;
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let text = take_while(&mut chars, |c| c.is_ascii_alphanumeric() || c == '_');
                tokens.push((offset, Token::Ident(text)));
                continue;
            }
            character => {
                return Err(ContrastParseError::UnexpectedCharacter { character, offset });
            }
        };
        chars.next();
        tokens.push((offset, token));
    }
    Ok(tokens)
}

fn take_while(chars: &mut Peekable<CharIndices<'_>>, pred: impl Fn(char) -> bool) -> String {
    let mut text = String::new();
    while let Some(&(_, c)) = chars.peek() {
        if !pred(c) {
            break;
        }
        text.push(c);
        chars.next();
    }
    text
}

/// Linear combination `constant + Σ coefficient · column`.
#[derive(Debug, Clone, Default)]
struct Linear {
    constant: f64,
    terms: BTreeMap<String, f64>,
}

impl Linear {
    fn constant(value: f64) -> Self {
        Self {
            constant: value,
            terms: BTreeMap::new(),
        }
    }

    fn column(name: String) -> Self {
        Self {
            constant: 0.0,
            terms: BTreeMap::from([(name, 1.0)]),
        }
    }

    fn as_constant(&self) -> Option<f64> {
        self.terms.is_empty().then_some(self.constant)
    }

    fn scale(mut self, factor: f64) -> Self {
        self.constant *= factor;
        for coefficient in self.terms.values_mut() {
            *coefficient *= factor;
        }
        self
    }

    fn plus(mut self, other: Self, sign: f64) -> Self {
        self.constant += sign * other.constant;
        for (name, coefficient) in other.terms {
            *self.terms.entry(name).or_insert(0.0) += sign * coefficient;
        }
        self
    }

    fn times(self, other: Self) -> Result<Self, ContrastParseError> {
        match (self.as_constant(), other.as_constant()) {
            (Some(factor), _) => Ok(other.scale(factor)),
            (_, Some(factor)) => Ok(self.scale(factor)),
            (None, None) => Err(ContrastParseError::NonLinear),
        }
    }

    fn divided_by(self, other: &Self) -> Result<Self, ContrastParseError> {
        match other.as_constant() {
            Some(divisor) if divisor != 0.0 => Ok(self.scale(1.0 / divisor)),
            _ => Err(ContrastParseError::DivisionByZero),
        }
    }
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    position: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position).map(|(_, t)| t)
    }

    fn additive_sign(&self) -> Option<f64> {
        match self.peek() {
            Some(Token::Plus) => Some(1.0),
            Some(Token::Minus) => Some(-1.0),
            _ => None,
        }
    }

    fn advance(&mut self) -> Result<(usize, Token), ContrastParseError> {
        let token = self
            .tokens
            .get(self.position)
            .cloned()
            .ok_or(ContrastParseError::UnexpectedEnd)?;
        self.position += 1;
        Ok(token)
    }

    fn expr(&mut self) -> Result<Linear, ContrastParseError> {
        let mut value = self.term()?;
        while let Some(sign) = self.additive_sign() {
            self.position += 1;
            value = value.plus(self.term()?, sign);
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<Linear, ContrastParseError> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.position += 1;
                    value = value.times(self.unary()?)?;
                }
                Some(Token::Slash) => {
                    self.position += 1;
                    value = value.divided_by(&self.unary()?)?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary(&mut self) -> Result<Linear, ContrastParseError> {
        match self.peek() {
            Some(Token::Plus) => {
                self.position += 1;
                self.unary()
            }
            Some(Token::Minus) => {
                self.position += 1;
                Ok(self.unary()?.scale(-1.0))
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Linear, ContrastParseError> {
        match self.advance()? {
            (_, Token::Number(value)) => Ok(Linear::constant(value)),
            (_, Token::Ident(name)) => Ok(Linear::column(name)),
            (_, Token::LParen) => {
                let value = self.expr()?;
                match self.advance()? {
                    (_, Token::RParen) => Ok(value),
                    (offset, token) => Err(ContrastParseError::UnexpectedToken {
                        token: token.to_string(),
                        offset,
                    }),
                }
            }
            (offset, token) => Err(ContrastParseError::UnexpectedToken {
                token: token.to_string(),
                offset,
            }),
        }
    }
}

/// A parsed contrast formula.
///
/// Terms are sorted by column name; a column whose coefficients cancel is
/// kept with a zero coefficient so that it is still checked against the
/// design.
#[derive(Debug, Clone, PartialEq)]
pub struct ContrastFormula {
    source: String,
    terms: Vec<(String, f64)>,
}

impl ContrastFormula {
    pub fn parse(source: &str) -> Result<Self, ContrastParseError> {
        let tokens = tokenize(source)?;
        if tokens.is_empty() {
            return Err(ContrastParseError::Empty);
        }
        let mut parser = Parser {
            tokens,
            position: 0,
        };
        let value = parser.expr()?;
        if let Some((offset, token)) = parser.tokens.get(parser.position) {
            return Err(ContrastParseError::UnexpectedToken {
                token: token.to_string(),
                offset: *offset,
            });
        }
        if value.constant != 0.0 {
            return Err(ContrastParseError::ConstantTerm {
                value: value.constant,
            });
        }
        Ok(Self {
            source: source.to_owned(),
            terms: value.terms.into_iter().collect(),
        })
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn terms(&self) -> &[(String, f64)] {
        &self.terms
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|(name, _)| name.as_str())
    }

    /// Coefficient vector aligned with `columns`.
    pub fn coefficients(&self, columns: &[String]) -> Result<DVector<f64>, UnknownColumn> {
        let mut vector = DVector::zeros(columns.len());
        for (name, coefficient) in &self.terms {
            let index = columns
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| UnknownColumn {
                    column: name.clone(),
                })?;
            vector[index] = *coefficient;
        }
        Ok(vector)
    }
}

impl fmt::Display for ContrastFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Serialize for ContrastFormula {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.source)
    }
}

/// A named contrast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contrast {
    pub name: String,
    pub formula: ContrastFormula,
}

impl Contrast {
    pub fn new<N>(name: N, formula: &str) -> Result<Self, ContrastParseError>
    where
        N: Into<String>,
    {
        Ok(Self {
            name: name.into(),
            formula: ContrastFormula::parse(formula)?,
        })
    }
}
