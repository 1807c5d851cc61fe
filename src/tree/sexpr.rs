//! Textual S-expression format: `(+ 9 5)`, `[1 2 3]`, `"string"`, `true`,
//! `v3`. The writer is the `Display` impl on [`Node`]; the reader resolves
//! operator symbols and variable ids through a table built from the
//! registered catalog, so trees round-trip without losing type information.

use super::node::{Node, Tree};
use crate::catalog::PrimitiveCatalog;
use crate::error::{Result, TreeLangError};
use crate::operators::OpRef;
use crate::types::{Type, Value};
use std::collections::HashMap;

/// Maps operator symbols and variable ids back to typed nodes.
#[derive(Debug, Default)]
pub struct SymbolTable {
    operators: HashMap<&'static str, OpRef>,
    variables: HashMap<usize, Type>,
}

impl SymbolTable {
    pub fn from_catalog(catalog: &PrimitiveCatalog) -> Self {
        let mut operators = HashMap::new();
        for op in catalog.functions().all() {
            operators.insert(op.symbol(), op.clone());
        }
        let mut variables = HashMap::new();
        for var in catalog.variables().all() {
            if let Node::Variable { id, ty } = var.as_ref() {
                variables.insert(*id, ty.clone());
            }
        }
        Self {
            operators,
            variables,
        }
    }

    pub fn parse(&self, text: &str) -> Result<Tree> {
        let tokens = tokenize(text)?;
        let mut parser = Parser {
            table: self,
            tokens: &tokens,
            pos: 0,
        };
        let tree = parser.expression()?;
        if parser.pos != tokens.len() {
            return Err(TreeLangError::Parse(format!(
                "trailing input after expression: {:?}",
                tokens[parser.pos]
            )));
        }
        Ok(tree)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    LParen,
    RParen,
    LBracket,
    RBracket,
    Str(String),
    Atom(String),
}

fn tokenize(text: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '[' => {
                chars.next();
                tokens.push(Token::LBracket);
            }
            ']' => {
                chars.next();
                tokens.push(Token::RBracket);
            }
            '"' => {
                chars.next();
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some('"') => s.push('"'),
                            Some('\\') => s.push('\\'),
                            Some(other) => {
                                return Err(TreeLangError::Parse(format!(
                                    "unknown escape \\{}",
                                    other
                                )))
                            }
                            None => {
                                return Err(TreeLangError::Parse(
                                    "unterminated string literal".to_string(),
                                ))
                            }
                        },
                        Some(other) => s.push(other),
                        None => {
                            return Err(TreeLangError::Parse(
                                "unterminated string literal".to_string(),
                            ))
                        }
                    }
                }
                tokens.push(Token::Str(s));
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            _ => {
                let mut atom = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']' | '"') {
                        break;
                    }
                    atom.push(c);
                    chars.next();
                }
                tokens.push(Token::Atom(atom));
            }
        }
    }
    Ok(tokens)
}

struct Parser<'a> {
    table: &'a SymbolTable,
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn next(&mut self) -> Result<&'a Token> {
        let token = self
            .tokens
            .get(self.pos)
            .ok_or_else(|| TreeLangError::Parse("unexpected end of input".to_string()))?;
        self.pos += 1;
        Ok(token)
    }

    fn expression(&mut self) -> Result<Tree> {
        match self.next()? {
            Token::LParen => self.call(),
            Token::LBracket => self.list(),
            Token::Str(s) => Ok(Node::constant(Value::Str(s.clone()), Type::string())),
            Token::Atom(atom) => self.atom(atom),
            unexpected => Err(TreeLangError::Parse(format!(
                "unexpected token {:?}",
                unexpected
            ))),
        }
    }

    fn call(&mut self) -> Result<Tree> {
        let symbol = match self.next()? {
            Token::Atom(s) => s.clone(),
            other => {
                return Err(TreeLangError::Parse(format!(
                    "expected operator symbol, found {:?}",
                    other
                )))
            }
        };
        let op = self.table.operators.get(symbol.as_str()).cloned().ok_or_else(
            || TreeLangError::Parse(format!("unknown operator '{}'", symbol)),
        )?;

        let mut children = Vec::new();
        while self.tokens.get(self.pos) != Some(&Token::RParen) {
            if self.pos >= self.tokens.len() {
                return Err(TreeLangError::Parse("unbalanced parenthesis".to_string()));
            }
            children.push(self.expression()?);
        }
        self.pos += 1; // closing paren

        if children.len() != op.arity() {
            return Err(TreeLangError::Parse(format!(
                "operator '{}' expects {} arguments, found {}",
                symbol,
                op.arity(),
                children.len()
            )));
        }
        for (child, expected) in children.iter().zip(op.input_types()) {
            if !child.ty().satisfies(&expected) {
                return Err(TreeLangError::TypeMismatch {
                    expected: expected.to_string(),
                    actual: child.ty().to_string(),
                });
            }
        }
        Ok(Node::call(op, children))
    }

    fn list(&mut self) -> Result<Tree> {
        let mut items = Vec::new();
        while self.tokens.get(self.pos) != Some(&Token::RBracket) {
            if self.pos >= self.tokens.len() {
                return Err(TreeLangError::Parse("unbalanced bracket".to_string()));
            }
            let element = self.expression()?;
            match element.as_constant() {
                Some(value) => items.push(value.clone()),
                None => {
                    return Err(TreeLangError::Parse(
                        "list literals may only contain constants".to_string(),
                    ))
                }
            }
        }
        self.pos += 1; // closing bracket

        let element_ty = items
            .first()
            .map(Value::type_of)
            .unwrap_or_else(Type::integer);
        Ok(Node::constant(
            Value::List(items),
            Type::list(element_ty),
        ))
    }

    fn atom(&mut self, atom: &str) -> Result<Tree> {
        match atom {
            "true" => return Ok(Node::boolean(true)),
            "false" => return Ok(Node::boolean(false)),
            _ => {}
        }
        if let Some(id_text) = atom.strip_prefix('v') {
            if let Ok(id) = id_text.parse::<usize>() {
                let ty = self.table.variables.get(&id).cloned().ok_or_else(|| {
                    TreeLangError::Parse(format!("undeclared variable v{}", id))
                })?;
                return Ok(Node::variable(id, ty));
            }
        }
        if let Ok(i) = atom.parse::<i64>() {
            return Ok(Node::integer(i));
        }
        if let Ok(x) = atom.parse::<f64>() {
            return Ok(Node::constant(Value::Float(x), Type::float()));
        }
        Err(TreeLangError::Parse(format!("unknown atom '{}'", atom)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogBuilder;
    use crate::operators::{Add, And, Lt, Mul, Not, OpRef, Sort, Sub};
    use std::sync::Arc;

    fn table() -> SymbolTable {
        let catalog = CatalogBuilder::default()
            .functions([
                Arc::new(Add) as OpRef,
                Arc::new(Sub) as OpRef,
                Arc::new(Mul) as OpRef,
                Arc::new(Lt) as OpRef,
                Arc::new(And) as OpRef,
                Arc::new(Not) as OpRef,
                Arc::new(Sort::new(Type::integer())) as OpRef,
            ])
            .constant(Value::Integer(1))
            .variable(Type::integer())
            .variable(Type::integer())
            .variable(Type::boolean())
            .build();
        SymbolTable::from_catalog(&catalog)
    }

    #[test]
    fn test_round_trip() {
        let table = table();
        for text in [
            "(+ 9 5)",
            "(* (+ 1 2) v0)",
            "(and (< v0 v1) v2)",
            "(sort [3 1 2])",
            "v1",
            "true",
            "42",
        ] {
            let tree = table.parse(text).unwrap();
            assert_eq!(tree.to_string(), text);
        }
    }

    #[test]
    fn test_variable_types_recovered() {
        let table = table();
        let tree = table.parse("v2").unwrap();
        assert_eq!(tree.ty(), Type::boolean());
    }

    #[test]
    fn test_string_literal() {
        let table = table();
        let tree = table.parse("\"hello\"").unwrap();
        assert_eq!(tree.ty(), Type::string());
        assert_eq!(tree.to_string(), "\"hello\"");
    }

    #[test]
    fn test_unknown_operator_rejected() {
        let err = table().parse("(nope 1 2)").unwrap_err();
        assert!(err.to_string().contains("unknown operator"));
    }

    #[test]
    fn test_arity_mismatch_rejected() {
        let err = table().parse("(+ 1)").unwrap_err();
        assert!(err.to_string().contains("expects 2 arguments"));
    }

    #[test]
    fn test_type_mismatch_rejected() {
        let err = table().parse("(+ 1 true)").unwrap_err();
        assert!(err.to_string().contains("Type mismatch"));
    }

    #[test]
    fn test_undeclared_variable_rejected() {
        let err = table().parse("v9").unwrap_err();
        assert!(err.to_string().contains("undeclared variable"));
    }
}
