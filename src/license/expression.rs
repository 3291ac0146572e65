//! Minimal SPDX license-expression parser.
//!
//! Grammar (AND binds tighter than OR):
//! ```text
//! expr     := or_expr
//! or_expr  := and_expr ( "OR" and_expr )*
//! and_expr := atom ( "AND" atom )*
//! atom     := "(" expr ")" | id ( "WITH" id )?
//! ```
//! `/` is accepted as OR shorthand (`MIT/Apache-2.0`). `WITH` exceptions are
//! parsed and dropped; only the base license takes part in evaluation.

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    License(String),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Id(String),
    And,
    Or,
    With,
    LParen,
    RParen,
}

impl Expr {
    /// Parse an expression. `None` for empty or dangling input.
    pub fn parse(raw: &str) -> Option<Expr> {
        let tokens = tokenize(&raw.replace('/', " OR "));
        let mut parser = Parser { tokens, pos: 0 };
        let expr = parser.parse_or()?;
        (parser.pos == parser.tokens.len()).then_some(expr)
    }

    /// Fold the tree: `leaf` maps each license id, `and`/`or` combine operands.
    pub fn evaluate<T>(&self, leaf: &dyn Fn(&str) -> T, and: fn(T, T) -> T, or: fn(T, T) -> T) -> T {
        match self {
            Expr::License(id) => leaf(id),
            Expr::And(l, r) => and(l.evaluate(leaf, and, or), r.evaluate(leaf, and, or)),
            Expr::Or(l, r) => or(l.evaluate(leaf, and, or), r.evaluate(leaf, and, or)),
        }
    }
}

fn tokenize(expr: &str) -> Vec<Token> {
    let spaced = expr.replace('(', " ( ").replace(')', " ) ");
    spaced
        .split_whitespace()
        .map(|word| match word {
            "(" => Token::LParen,
            ")" => Token::RParen,
            "AND" => Token::And,
            "OR" => Token::Or,
            "WITH" => Token::With,
            id => Token::Id(id.to_string()),
        })
        .collect()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn parse_or(&mut self) -> Option<Expr> {
        let mut lhs = self.parse_and()?;
        while self.peek() == Some(&Token::Or) {
            self.advance();
            let rhs = self.parse_and()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Some(lhs)
    }

    fn parse_and(&mut self) -> Option<Expr> {
        let mut lhs = self.parse_atom()?;
        while self.peek() == Some(&Token::And) {
            self.advance();
            let rhs = self.parse_atom()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Some(lhs)
    }

    fn parse_atom(&mut self) -> Option<Expr> {
        match self.advance()? {
            Token::LParen => {
                let inner = self.parse_or()?;
                // A missing ')' at end of input is tolerated.
                if self.peek() == Some(&Token::RParen) {
                    self.advance();
                }
                Some(inner)
            }
            Token::Id(id) => {
                if self.peek() == Some(&Token::With) {
                    self.advance();
                    match self.advance() {
                        Some(Token::Id(_)) => {}
                        _ => return None,
                    }
                }
                Some(Expr::License(id))
            }
            _ => None,
        }
    }
}
