//! Recursive-descent FEEL parser

use super::lexer::{tokenize, Token, TokenKind};
use crate::error::{ParseError, Result};
use verdict_core::ast::{BinaryOperator, BuiltinFunction, Expression, UnaryOperator};
use verdict_core::Value;

/// Expression parser
pub struct ExpressionParser;

impl ExpressionParser {
    /// Parse a complete FEEL expression
    pub fn parse(input: &str) -> Result<Expression> {
        if input.trim().is_empty() {
            return Err(ParseError::syntax(input, 0, "empty expression"));
        }
        let mut parser = Parser::new(input)?;
        let expression = parser.parse_expression()?;
        parser.expect_end()?;
        Ok(expression)
    }

    /// Parse a DMN input entry (unary tests) into an expression over `?`.
    ///
    /// Returns `None` for the wildcard (`-` or an empty cell). Each
    /// comma-separated test becomes:
    /// - `< e`, `<= e`, `> e`, `>= e`, `= e`, `!= e`: `? op e`
    /// - a range: `? in range`
    /// - `not(tests)`: the negation of the inner tests
    /// - an expression using `?`: itself
    /// - any other value: `? = value`
    ///
    /// Plain values are gathered into one `? in [..]` test; mixed tests are
    /// joined with `or`.
    pub fn parse_unary_tests(input: &str) -> Result<Option<Expression>> {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed == "-" {
            return Ok(None);
        }
        let mut parser = Parser::new(input)?;
        let expression = parser.parse_tests()?;
        parser.expect_end()?;
        Ok(Some(expression))
    }
}

enum UnaryTest {
    Value(Expression),
    Test(Expression),
}

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self> {
        Ok(Self {
            input,
            tokens: tokenize(input)?,
            pos: 0,
        })
    }

    fn peek(&self) -> &TokenKind {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> &TokenKind {
        let index = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[index].kind
    }

    fn position(&self) -> usize {
        self.tokens[self.pos.min(self.tokens.len() - 1)].position
    }

    fn advance(&mut self) -> TokenKind {
        let kind = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, context: &str) -> Result<()> {
        if self.eat(&kind) {
            Ok(())
        } else {
            Err(self.unexpected(context))
        }
    }

    fn expect_end(&self) -> Result<()> {
        match self.peek() {
            TokenKind::Eof => Ok(()),
            _ => Err(self.unexpected("end of expression")),
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::syntax(
            self.input,
            self.position(),
            format!("expected {}, found {}", expected, self.peek().describe()),
        )
    }

    fn parse_expression(&mut self) -> Result<Expression> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expression> {
        let mut left = self.parse_and()?;
        while self.eat(&TokenKind::Or) {
            let right = self.parse_and()?;
            left = Expression::binary(left, BinaryOperator::Or, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expression> {
        let mut left = self.parse_in()?;
        while self.eat(&TokenKind::And) {
            let right = self.parse_in()?;
            left = Expression::binary(left, BinaryOperator::And, right);
        }
        Ok(left)
    }

    fn parse_in(&mut self) -> Result<Expression> {
        let mut left = self.parse_comparison()?;
        while self.eat(&TokenKind::In) {
            let right = self.parse_comparison()?;
            left = Expression::binary(left, BinaryOperator::In, right);
        }
        Ok(left)
    }

    fn comparison_operator(kind: &TokenKind) -> Option<BinaryOperator> {
        match kind {
            TokenKind::Eq => Some(BinaryOperator::Eq),
            TokenKind::Neq => Some(BinaryOperator::Neq),
            TokenKind::Lt => Some(BinaryOperator::Lt),
            TokenKind::Lte => Some(BinaryOperator::Lte),
            TokenKind::Gt => Some(BinaryOperator::Gt),
            TokenKind::Gte => Some(BinaryOperator::Gte),
            _ => None,
        }
    }

    fn parse_comparison(&mut self) -> Result<Expression> {
        let mut left = self.parse_additive()?;
        while let Some(op) = Self::comparison_operator(self.peek()) {
            self.advance();
            let right = self.parse_additive()?;
            left = Expression::binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expression> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                TokenKind::Plus => BinaryOperator::Add,
                TokenKind::Minus => BinaryOperator::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expression::binary(left, op, right);
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expression> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                TokenKind::Star => BinaryOperator::Mul,
                TokenKind::Slash => BinaryOperator::Div,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expression::binary(left, op, right);
        }
    }

    fn parse_unary(&mut self) -> Result<Expression> {
        if self.eat(&TokenKind::Not) {
            let operand = self.parse_unary()?;
            return Ok(Expression::unary(UnaryOperator::Not, operand));
        }
        if self.eat(&TokenKind::Minus) {
            let operand = self.parse_unary()?;
            // Fold negative number literals so `-5` stays a literal
            return Ok(match operand {
                Expression::Literal(Value::Number(n)) => Expression::Literal(Value::Number(-n)),
                other => Expression::unary(UnaryOperator::Negate, other),
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expression> {
        let start = self.position();
        let expression = match self.peek().clone() {
            TokenKind::Number(n) => Expression::literal(n),
            TokenKind::Str(s) => Expression::literal(s),
            TokenKind::True => Expression::literal(true),
            TokenKind::False => Expression::literal(false),
            TokenKind::Null => Expression::Literal(Value::Missing),
            TokenKind::Question => Expression::Input,
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                if self.eat(&TokenKind::DotDot) {
                    return self.finish_range(inner, false);
                }
                self.expect(TokenKind::RParen, "')'")?;
                return Ok(inner);
            }
            TokenKind::LBracket => {
                self.advance();
                return self.parse_bracket();
            }
            TokenKind::Ident(name) => {
                self.advance();
                return self.parse_identifier(name, start);
            }
            _ => return Err(self.unexpected("a value")),
        };
        self.advance();
        Ok(expression)
    }

    /// `[` already consumed: empty list, list literal or range
    fn parse_bracket(&mut self) -> Result<Expression> {
        if self.eat(&TokenKind::RBracket) {
            return Ok(Expression::List(Vec::new()));
        }
        let first = self.parse_expression()?;
        if self.eat(&TokenKind::DotDot) {
            return self.finish_range(first, true);
        }
        let mut items = vec![first];
        while self.eat(&TokenKind::Comma) {
            items.push(self.parse_expression()?);
        }
        self.expect(TokenKind::RBracket, "',' or ']'")?;
        Ok(Expression::List(items))
    }

    /// `..` already consumed
    fn finish_range(&mut self, start: Expression, start_inclusive: bool) -> Result<Expression> {
        let end = self.parse_expression()?;
        let end_inclusive = match self.peek() {
            TokenKind::RBracket => true,
            TokenKind::RParen => false,
            _ => return Err(self.unexpected("']' or ')' closing the range")),
        };
        self.advance();
        Ok(Expression::range(start, end, start_inclusive, end_inclusive))
    }

    /// A field path, or a call when a run of words is followed by `(`
    fn parse_identifier(&mut self, first: String, start: usize) -> Result<Expression> {
        let mut words = vec![first];
        let mut lookahead = 0;
        while let TokenKind::Ident(word) = self.peek_at(lookahead) {
            words.push(word.clone());
            lookahead += 1;
        }
        if *self.peek_at(lookahead) == TokenKind::LParen {
            self.pos += lookahead + 1;
            return self.parse_call(words.join(" "), start);
        }

        let mut segments = vec![words.swap_remove(0)];
        while self.eat(&TokenKind::Dot) {
            match self.peek().clone() {
                TokenKind::Ident(segment) => {
                    self.advance();
                    segments.push(segment);
                }
                _ => return Err(self.unexpected("a field name after '.'")),
            }
        }
        Ok(Expression::Path(segments))
    }

    /// Function name and `(` already consumed
    fn parse_call(&mut self, name: String, start: usize) -> Result<Expression> {
        let function = BuiltinFunction::from_name(&name).ok_or_else(|| {
            ParseError::syntax(self.input, start, format!("unknown function '{}'", name))
        })?;

        let mut args = Vec::new();
        if !self.eat(&TokenKind::RParen) {
            args.push(self.parse_expression()?);
            while self.eat(&TokenKind::Comma) {
                args.push(self.parse_expression()?);
            }
            self.expect(TokenKind::RParen, "',' or ')'")?;
        }

        let (min, max) = function.arity();
        if args.len() < min || max.is_some_and(|max| args.len() > max) {
            let expected = match max {
                Some(max) if max == min => format!("{}", min),
                Some(max) => format!("{} to {}", min, max),
                None => format!("at least {}", min),
            };
            return Err(ParseError::syntax(
                self.input,
                start,
                format!(
                    "function '{}' expects {} argument(s), got {}",
                    name,
                    expected,
                    args.len()
                ),
            ));
        }

        Ok(Expression::Call { function, args })
    }

    fn parse_tests(&mut self) -> Result<Expression> {
        let mut tests = vec![self.parse_test()?];
        while self.eat(&TokenKind::Comma) {
            tests.push(self.parse_test()?);
        }

        if tests.iter().all(|t| matches!(t, UnaryTest::Value(_))) {
            let mut values: Vec<Expression> = tests
                .into_iter()
                .filter_map(|t| match t {
                    UnaryTest::Value(v) => Some(v),
                    UnaryTest::Test(_) => None,
                })
                .collect();
            return Ok(if values.len() == 1 {
                Expression::binary(Expression::Input, BinaryOperator::Eq, values.remove(0))
            } else {
                Expression::binary(Expression::Input, BinaryOperator::In, Expression::List(values))
            });
        }

        let mut tests = tests.into_iter().map(|t| match t {
            UnaryTest::Value(v) => Expression::binary(Expression::Input, BinaryOperator::Eq, v),
            UnaryTest::Test(e) => e,
        });
        let first = tests
            .next()
            .ok_or_else(|| ParseError::syntax(self.input, 0, "empty unary test"))?;
        Ok(tests.fold(first, |acc, test| {
            Expression::binary(acc, BinaryOperator::Or, test)
        }))
    }

    fn parse_test(&mut self) -> Result<UnaryTest> {
        if *self.peek() == TokenKind::Not && *self.peek_at(1) == TokenKind::LParen {
            self.pos += 2;
            let inner = self.parse_tests()?;
            self.expect(TokenKind::RParen, "')' closing not(")?;
            return Ok(UnaryTest::Test(Expression::unary(UnaryOperator::Not, inner)));
        }

        if let Some(op) = Self::comparison_operator(self.peek()) {
            self.advance();
            let endpoint = self.parse_additive()?;
            return Ok(UnaryTest::Test(Expression::binary(Expression::Input, op, endpoint)));
        }

        let expression = self.parse_expression()?;
        Ok(match expression {
            e if e.references_input() => UnaryTest::Test(e),
            e @ (Expression::Range(_) | Expression::List(_)) => UnaryTest::Test(
                Expression::binary(Expression::Input, BinaryOperator::In, e),
            ),
            e => UnaryTest::Value(e),
        })
    }
}
