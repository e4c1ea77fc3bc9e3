//! Formula parser.
//!
//! Accepts the usual infix syntax: `+ - * /`, `**` or `^` for powers
//! (right associative, binding tighter than unary minus), parentheses,
//! integer and decimal literals, and calls of the elementary functions.
//! Expressions are built straight into the arena through its canonical
//! constructors.

use hashbrown::HashSet;
use logos::Logos;
use sigprop_numeric::Number;

use crate::arena::ExprArena;
use crate::error::CoreError;
use crate::expr::{Constant, ExprHandle, Func};

#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
#[logos(skip r"[ \t\r\n]+")]
enum Token {
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    Float,
    #[regex(r"[0-9]+")]
    Integer,
    #[token("**")]
    DoubleStar,
    #[token("^")]
    Caret,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
}

#[derive(Debug, Clone, Copy)]
struct TokenInfo<'a> {
    token: Token,
    lexeme: &'a str,
    position: usize,
}

/// Decides what a bare identifier means.
///
/// Declared names always resolve to symbols, even `pi` or `E`. Other
/// names resolve to the constants `pi` and `E`, and anything else becomes
/// a free symbol only when the scope allows it.
#[derive(Debug, Clone, Default)]
pub struct SymbolScope {
    declared: HashSet<String>,
    free_allowed: bool,
}

impl SymbolScope {
    /// A scope for plain numbers: only constants may appear.
    #[must_use]
    pub fn numeric() -> Self {
        Self::default()
    }

    /// A scope where every identifier that is not a constant is a symbol.
    #[must_use]
    pub fn symbolic() -> Self {
        Self {
            declared: HashSet::new(),
            free_allowed: true,
        }
    }

    /// A symbolic scope in which `names` shadow the constants.
    #[must_use]
    pub fn with_declared<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            declared: names.into_iter().map(Into::into).collect(),
            free_allowed: true,
        }
    }

    fn resolve(&self, arena: &mut ExprArena, name: &str) -> Result<ExprHandle, CoreError> {
        if self.declared.contains(name) {
            return Ok(arena.symbol(name));
        }
        match name {
            "pi" => Ok(arena.constant(Constant::Pi)),
            "E" => Ok(arena.constant(Constant::E)),
            _ if self.free_allowed => Ok(arena.symbol(name)),
            _ => Err(CoreError::UnexpectedIdentifier(name.to_string())),
        }
    }
}

/// Parses `source` into `arena`.
///
/// # Errors
///
/// Returns [`CoreError::Syntax`] for malformed text,
/// [`CoreError::UnexpectedIdentifier`] for a name the scope rejects and
/// [`CoreError::Numeric`] for an unusable literal.
pub fn parse_expr(
    arena: &mut ExprArena,
    source: &str,
    scope: &SymbolScope,
) -> Result<ExprHandle, CoreError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);
    while let Some(token) = lexer.next() {
        let position = lexer.span().start;
        let Ok(token) = token else {
            return Err(CoreError::Syntax {
                message: format!("invalid character '{}'", lexer.slice()),
                position,
            });
        };
        tokens.push(TokenInfo {
            token,
            lexeme: lexer.slice(),
            position,
        });
    }

    let mut parser = Parser {
        arena,
        scope,
        tokens,
        pos: 0,
        end: source.len(),
    };
    let expr = parser.parse_add_sub()?;
    if let Some(extra) = parser.tokens.get(parser.pos) {
        return Err(CoreError::Syntax {
            message: format!("unexpected '{}'", extra.lexeme),
            position: extra.position,
        });
    }
    Ok(expr)
}

struct Parser<'a> {
    arena: &'a mut ExprArena,
    scope: &'a SymbolScope,
    tokens: Vec<TokenInfo<'a>>,
    pos: usize,
    end: usize,
}

impl<'a> Parser<'a> {
    fn parse_add_sub(&mut self) -> Result<ExprHandle, CoreError> {
        let mut node = self.parse_mul_div()?;
        loop {
            if self.consume(Token::Plus) {
                let rhs = self.parse_mul_div()?;
                node = self.arena.add([node, rhs]);
            } else if self.consume(Token::Minus) {
                let rhs = self.parse_mul_div()?;
                node = self.arena.sub(node, rhs);
            } else {
                break;
            }
        }
        Ok(node)
    }

    fn parse_mul_div(&mut self) -> Result<ExprHandle, CoreError> {
        let mut node = self.parse_unary()?;
        loop {
            if self.consume(Token::Star) {
                let rhs = self.parse_unary()?;
                node = self.arena.mul([node, rhs]);
            } else if self.consume(Token::Slash) {
                let rhs = self.parse_unary()?;
                node = self.arena.div(node, rhs);
            } else {
                break;
            }
        }
        Ok(node)
    }

    fn parse_unary(&mut self) -> Result<ExprHandle, CoreError> {
        if self.consume(Token::Minus) {
            let operand = self.parse_unary()?;
            Ok(self.arena.neg(operand))
        } else if self.consume(Token::Plus) {
            self.parse_unary()
        } else {
            self.parse_pow()
        }
    }

    fn parse_pow(&mut self) -> Result<ExprHandle, CoreError> {
        let base = self.parse_primary()?;
        if self.consume(Token::DoubleStar) || self.consume(Token::Caret) {
            // the exponent may carry its own sign: 2**-1
            let exp = self.parse_unary()?;
            return Ok(self.arena.pow(base, exp));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<ExprHandle, CoreError> {
        let Some(info) = self.next() else {
            return Err(CoreError::Syntax {
                message: "unexpected end of input".to_string(),
                position: self.end,
            });
        };
        match info.token {
            Token::Integer | Token::Float => {
                let number: Number = info.lexeme.parse()?;
                Ok(self.arena.number(number))
            }
            Token::Ident if self.consume(Token::LParen) => {
                let arg = self.parse_add_sub()?;
                self.expect(Token::RParen, "')' after function argument")?;
                self.call(info, arg)
            }
            Token::Ident => self.scope.resolve(self.arena, info.lexeme),
            Token::LParen => {
                let inner = self.parse_add_sub()?;
                self.expect(Token::RParen, "')'")?;
                Ok(inner)
            }
            _ => Err(CoreError::Syntax {
                message: format!("unexpected '{}'", info.lexeme),
                position: info.position,
            }),
        }
    }

    fn call(&mut self, name: TokenInfo<'a>, arg: ExprHandle) -> Result<ExprHandle, CoreError> {
        if name.lexeme == "sqrt" {
            return Ok(self.arena.sqrt(arg));
        }
        match Func::from_name(name.lexeme) {
            Some(func) => Ok(self.arena.func(func, arg)),
            None => Err(CoreError::Syntax {
                message: format!("unknown function '{}'", name.lexeme),
                position: name.position,
            }),
        }
    }

    fn next(&mut self) -> Option<TokenInfo<'a>> {
        let info = self.tokens.get(self.pos).copied();
        if info.is_some() {
            self.pos += 1;
        }
        info
    }

    fn consume(&mut self, token: Token) -> bool {
        if self.tokens.get(self.pos).map(|t| t.token) == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token, what: &str) -> Result<(), CoreError> {
        if self.consume(token) {
            return Ok(());
        }
        let position = self.tokens.get(self.pos).map_or(self.end, |t| t.position);
        Err(CoreError::Syntax {
            message: format!("expected {what}"),
            position,
        })
    }
}
