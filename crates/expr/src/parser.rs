//! Recursive descent parser.
//!
//! ```text
//! expression     --> additive
//! additive       --> multiplicative ( ("+" | "-") multiplicative )*
//! multiplicative --> unary ( ("*" | "/" | "%") unary )*
//! unary          --> ("-" | "+") unary | power
//! power          --> primary ( "^" unary )?
//! primary        --> NUMBER | IDENTIFIER | call | "(" expression ")"
//! call           --> IDENTIFIER "(" ( expression ( "," expression )* )? ")"
//! ```

use std::collections::{BTreeSet, HashMap};

use crate::error::{ExprError, Result};
use crate::lexer::{Lexer, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Power,
}

impl BinaryOperator {
    fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            BinaryOperator::Add => left + right,
            BinaryOperator::Subtract => left - right,
            BinaryOperator::Multiply => left * right,
            BinaryOperator::Divide => left / right,
            BinaryOperator::Remainder => left % right,
            BinaryOperator::Power => left.powf(right),
        }
    }
}

/// Parsed expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Number(f64),
    Variable(String),
    Negate(Box<Expression>),
    Binary {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Call {
        name: String,
        args: Vec<Expression>,
    },
}

impl Expression {
    /// Parse `input` into a reusable tree.
    pub fn parse(input: &str) -> Result<Expression> {
        Parser::new(input).parse()
    }

    /// Evaluate with variables bound from `bindings`.
    pub fn eval(&self, bindings: &HashMap<String, f64>) -> Result<f64> {
        self.eval_with(&|name: &str| bindings.get(name).copied())
    }

    /// Evaluate against `lookup`, which resolves variable names.
    pub fn eval_with<F>(&self, lookup: &F) -> Result<f64>
    where
        F: Fn(&str) -> Option<f64>,
    {
        match self {
            Expression::Number(n) => Ok(*n),
            Expression::Variable(name) => lookup(name)
                .or_else(|| constant(name))
                .ok_or_else(|| ExprError::UnknownVariable(name.clone())),
            Expression::Negate(inner) => Ok(-inner.eval_with(lookup)?),
            Expression::Binary { op, left, right } => {
                Ok(op.apply(left.eval_with(lookup)?, right.eval_with(lookup)?))
            }
            Expression::Call { name, args } => {
                let values = args
                    .iter()
                    .map(|arg| arg.eval_with(lookup))
                    .collect::<Result<Vec<_>>>()?;
                call(name, &values)
            }
        }
    }

    /// Every variable the expression reads, constants excluded.
    #[must_use]
    pub fn variables(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables(&self, names: &mut BTreeSet<String>) {
        match self {
            Expression::Number(_) => {}
            Expression::Variable(name) => {
                names.insert(name.clone());
            }
            Expression::Negate(inner) => inner.collect_variables(names),
            Expression::Binary { left, right, .. } => {
                left.collect_variables(names);
                right.collect_variables(names);
            }
            Expression::Call { args, .. } => {
                for arg in args {
                    arg.collect_variables(names);
                }
            }
        }
    }
}

fn constant(name: &str) -> Option<f64> {
    match name {
        "pi" | "PI" => Some(std::f64::consts::PI),
        "e" | "E" => Some(std::f64::consts::E),
        _ => None,
    }
}

fn call(name: &str, args: &[f64]) -> Result<f64> {
    let unary = |f: fn(f64) -> f64| -> Result<f64> {
        match args {
            [x] => Ok(f(*x)),
            _ => Err(ExprError::Arity {
                name: name.to_string(),
                expected: 1,
                found: args.len(),
            }),
        }
    };
    let binary = |f: fn(f64, f64) -> f64| -> Result<f64> {
        match args {
            [x, y] => Ok(f(*x, *y)),
            _ => Err(ExprError::Arity {
                name: name.to_string(),
                expected: 2,
                found: args.len(),
            }),
        }
    };

    match name {
        "sqrt" => unary(f64::sqrt),
        "exp" => unary(f64::exp),
        "ln" | "log" => unary(f64::ln),
        "log10" => unary(f64::log10),
        "abs" => unary(f64::abs),
        "sin" => unary(f64::sin),
        "cos" => unary(f64::cos),
        "tan" => unary(f64::tan),
        "asin" => unary(f64::asin),
        "acos" => unary(f64::acos),
        "atan" => unary(f64::atan),
        "sinh" => unary(f64::sinh),
        "cosh" => unary(f64::cosh),
        "tanh" => unary(f64::tanh),
        "floor" => unary(f64::floor),
        "ceil" => unary(f64::ceil),
        "round" => unary(f64::round),
        "pow" => binary(f64::powf),
        "atan2" => binary(f64::atan2),
        "min" => binary(f64::min),
        "max" => binary(f64::max),
        _ => Err(ExprError::UnknownFunction(name.to_string())),
    }
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Self { lexer, current }
    }

    pub fn parse(&mut self) -> Result<Expression> {
        if self.current == Token::Eof {
            return Err(ExprError::Empty);
        }
        let expression = self.parse_additive()?;
        if self.current != Token::Eof {
            return Err(ExprError::unexpected("end of input", &self.current));
        }
        Ok(expression)
    }

    fn advance(&mut self) -> Token {
        std::mem::replace(&mut self.current, self.lexer.next_token())
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        if self.current == expected {
            self.advance();
            Ok(())
        } else {
            Err(ExprError::unexpected(expected.to_string(), &self.current))
        }
    }

    fn parse_additive(&mut self) -> Result<Expression> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.current {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right);
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expression> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                Token::Percent => BinaryOperator::Remainder,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }
    }

    fn parse_unary(&mut self) -> Result<Expression> {
        match self.current {
            Token::Minus => {
                self.advance();
                Ok(Expression::Negate(Box::new(self.parse_unary()?)))
            }
            Token::Plus => {
                self.advance();
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> Result<Expression> {
        let base = self.parse_primary()?;
        if self.current == Token::Caret {
            self.advance();
            let exponent = self.parse_unary()?;
            return Ok(binary(BinaryOperator::Power, base, exponent));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expression> {
        match self.advance() {
            Token::Number(n) => Ok(Expression::Number(n)),
            Token::Identifier(name) => {
                if self.current == Token::LParen {
                    self.advance();
                    let args = self.parse_arguments()?;
                    Ok(Expression::Call { name, args })
                } else {
                    Ok(Expression::Variable(name))
                }
            }
            Token::LParen => {
                let inner = self.parse_additive()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Token::Illegal(ch) => Err(ExprError::IllegalCharacter(ch)),
            other => Err(ExprError::unexpected("a value", other)),
        }
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expression>> {
        let mut args = Vec::new();
        if self.current == Token::RParen {
            self.advance();
            return Ok(args);
        }
        loop {
            args.push(self.parse_additive()?);
            match self.advance() {
                Token::Comma => continue,
                Token::RParen => return Ok(args),
                other => return Err(ExprError::unexpected("',' or ')'", other)),
            }
        }
    }
}

fn binary(op: BinaryOperator, left: Expression, right: Expression) -> Expression {
    Expression::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn eval(input: &str) -> f64 {
        Expression::parse(input)
            .unwrap()
            .eval_with(&|_: &str| None)
            .unwrap()
    }

    #[test]
    fn respects_precedence() {
        assert_eq!(eval("1 + 2 * 3"), 7.0);
        assert_eq!(eval("(1 + 2) * 3"), 9.0);
        assert_eq!(eval("2 ^ 3 ^ 2"), 512.0);
        assert_eq!(eval("-2 ^ 2"), -4.0);
        assert_eq!(eval("7 % 4"), 3.0);
    }

    #[test]
    fn calls_functions_and_constants() {
        assert_eq!(eval("sqrt(16) + max(1, 3)"), 7.0);
        assert!((eval("cos(pi)") + 1.0).abs() < 1e-12);
    }

    #[test]
    fn collects_variables() {
        let expr = Expression::parse("10 * sqrt(2/10 * position) + pi * t").unwrap();
        let vars: Vec<_> = expr.variables().into_iter().collect();
        assert_eq!(vars, vec!["pi".to_string(), "position".into(), "t".into()]);
    }

    #[test]
    fn reports_parse_errors() {
        assert_eq!(Expression::parse("  "), Err(ExprError::Empty));
        assert_eq!(Expression::parse("2 $ 3"), Err(ExprError::unexpected("end of input", "'$'")));
        assert!(matches!(
            Expression::parse("(1 + 2"),
            Err(ExprError::UnexpectedToken { .. })
        ));
        assert_eq!(Expression::parse("1 +"), Err(ExprError::unexpected("a value", "end of input")));
    }

    #[test]
    fn reports_evaluation_errors() {
        let expr = Expression::parse("foo(1)").unwrap();
        assert_eq!(
            expr.eval_with(&|_: &str| None),
            Err(ExprError::UnknownFunction("foo".into()))
        );
        let expr = Expression::parse("pow(1)").unwrap();
        assert!(matches!(
            expr.eval_with(&|_: &str| None),
            Err(ExprError::Arity { expected: 2, found: 1, .. })
        ));
        let expr = Expression::parse("x + 1").unwrap();
        assert_eq!(
            expr.eval_with(&|_: &str| None),
            Err(ExprError::UnknownVariable("x".into()))
        );
    }
}
