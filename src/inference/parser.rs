//! # Parser de Regras — Texto → AST por Nome
//!
//! Primeira das duas fases de construção de uma regra: o texto é
//! tokenizado e analisado em uma AST que ainda referencia variáveis e
//! termos **por nome**. A segunda fase ([`Rule::parse`](super::Rule::parse))
//! resolve esses nomes para índices.
//!
//! ## Gramática
//!
//! ```text
//! rule        := "if" antecedent "then" consequent ("and" consequent)*
//! antecedent  := clause (("and" | "or") clause)*
//! clause      := "(" antecedent ")"
//!              | ["not"] variable "is" ["not"] term
//! consequent  := variable "is" term ["with" weight]
//! ```
//!
//! - Palavras-chave sem distinção de maiúsculas (`IF`, `Then`, `AND`...).
//! - Nomes de variáveis e termos **com** distinção de maiúsculas.
//! - Um único conectivo encadeia da esquerda para a direita:
//!   `a and b and c` ≡ `(a and b) and c`.
//! - `and` e `or` misturados no **mesmo nível** são rejeitados
//!   ([`ConfigurationError::AmbiguousOperators`]) — use parênteses:
//!   `(a and b) or c`.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::ConfigurationError;

const KEYWORDS: &[&str] = &["if", "then", "and", "or", "not", "is", "with"];

#[derive(Clone, Debug, PartialEq)]
enum Token {
    LParen,
    RParen,
    Word(String),
    Number(f64),
}

/// Conectivo binário do antecedente.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

/// Antecedente ainda não resolvido.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Proposition {
        variable: String,
        term: String,
        negated: bool,
    },
    Binary {
        connective: Connective,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Conclusion {
    pub variable: String,
    pub term: String,
    pub weight: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RuleAst {
    pub antecedent: Expr,
    pub conclusions: Vec<Conclusion>,
}

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?P<lp>\()|(?P<rp>\))|(?P<num>[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)|(?P<word>[A-Za-z_][A-Za-z0-9_.]*)|(?P<bad>\S)",
        )
        .expect("invalid regex")
    })
}

fn tokenize(text: &str) -> Result<Vec<Token>, ConfigurationError> {
    let mut tokens = Vec::new();
    for caps in token_re().captures_iter(text) {
        if caps.name("lp").is_some() {
            tokens.push(Token::LParen);
        } else if caps.name("rp").is_some() {
            tokens.push(Token::RParen);
        } else if let Some(m) = caps.name("num") {
            let value = m.as_str().parse::<f64>().map_err(|_| syntax(text, format!("número inválido '{}'", m.as_str())))?;
            tokens.push(Token::Number(value));
        } else if let Some(m) = caps.name("word") {
            tokens.push(Token::Word(m.as_str().to_string()));
        } else if let Some(m) = caps.name("bad") {
            return Err(syntax(text, format!("caractere inesperado '{}'", m.as_str())));
        }
    }
    Ok(tokens)
}

fn syntax(rule: &str, message: impl Into<String>) -> ConfigurationError {
    ConfigurationError::Syntax {
        rule: rule.to_string(),
        message: message.into(),
    }
}

fn is_keyword(word: &str) -> bool {
    KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(word))
}

/// Analisa o texto de uma regra.
pub fn parse(text: &str) -> Result<RuleAst, ConfigurationError> {
    let tokens = tokenize(text)?;
    let mut parser = Parser {
        text,
        tokens,
        pos: 0,
    };
    parser.parse_rule()
}

struct Parser<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token::Word(w)) if w.eq_ignore_ascii_case(keyword))
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.peek_keyword(keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), ConfigurationError> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}'", keyword)))
        }
    }

    fn expect_identifier(&mut self, what: &str) -> Result<String, ConfigurationError> {
        match self.peek() {
            Some(Token::Word(w)) if !is_keyword(w) => {
                let w = w.clone();
                self.pos += 1;
                Ok(w)
            }
            _ => Err(self.unexpected(what)),
        }
    }

    fn unexpected(&self, expected: &str) -> ConfigurationError {
        let found = match self.peek() {
            None => "fim da regra".to_string(),
            Some(Token::LParen) => "'('".to_string(),
            Some(Token::RParen) => "')'".to_string(),
            Some(Token::Word(w)) => format!("'{}'", w),
            Some(Token::Number(n)) => format!("'{}'", n),
        };
        syntax(self.text, format!("esperado {}, encontrado {}", expected, found))
    }

    fn parse_rule(&mut self) -> Result<RuleAst, ConfigurationError> {
        self.expect_keyword("if")?;
        let antecedent = self.parse_antecedent()?;
        self.expect_keyword("then")?;

        let mut conclusions = vec![self.parse_conclusion()?];
        while self.eat_keyword("and") {
            conclusions.push(self.parse_conclusion()?);
        }
        if self.peek().is_some() {
            return Err(self.unexpected("fim da regra"));
        }
        Ok(RuleAst {
            antecedent,
            conclusions,
        })
    }

    fn peek_connective(&self) -> Option<Connective> {
        if self.peek_keyword("and") {
            Some(Connective::And)
        } else if self.peek_keyword("or") {
            Some(Connective::Or)
        } else {
            None
        }
    }

    fn parse_antecedent(&mut self) -> Result<Expr, ConfigurationError> {
        let mut left = self.parse_clause()?;
        let mut level: Option<Connective> = None;
        while let Some(connective) = self.peek_connective() {
            match level {
                Some(previous) if previous != connective => {
                    return Err(ConfigurationError::AmbiguousOperators {
                        rule: self.text.to_string(),
                    });
                }
                _ => level = Some(connective),
            }
            self.pos += 1;
            let right = self.parse_clause()?;
            left = Expr::Binary {
                connective,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_clause(&mut self) -> Result<Expr, ConfigurationError> {
        if self.peek() == Some(&Token::LParen) {
            self.pos += 1;
            let inner = self.parse_antecedent()?;
            if self.peek() != Some(&Token::RParen) {
                return Err(self.unexpected("')'"));
            }
            self.pos += 1;
            return Ok(inner);
        }

        let mut negated = self.eat_keyword("not");
        let variable = self.expect_identifier("nome de variável")?;
        self.expect_keyword("is")?;
        // forma FLL: "x is not t"
        if self.eat_keyword("not") {
            negated = !negated;
        }
        let term = self.expect_identifier("nome de termo")?;
        Ok(Expr::Proposition {
            variable,
            term,
            negated,
        })
    }

    fn parse_conclusion(&mut self) -> Result<Conclusion, ConfigurationError> {
        let variable = self.expect_identifier("variável de saída")?;
        self.expect_keyword("is")?;
        let term = self.expect_identifier("nome de termo")?;
        let weight = if self.eat_keyword("with") {
            match self.peek() {
                Some(Token::Number(n)) => {
                    let n = *n;
                    self.pos += 1;
                    n
                }
                _ => return Err(self.unexpected("peso numérico")),
            }
        } else {
            1.0
        };
        if !(0.0..=1.0).contains(&weight) {
            return Err(ConfigurationError::InvalidWeight {
                rule: self.text.to_string(),
                weight,
            });
        }
        Ok(Conclusion {
            variable,
            term,
            weight,
        })
    }
}
