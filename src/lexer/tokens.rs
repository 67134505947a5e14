use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("var", TokenKind::Var);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("for", TokenKind::For);
        map.insert("break", TokenKind::Break);
        map.insert("continue", TokenKind::Continue);
        map.insert("return", TokenKind::Return);
        map.insert("func", TokenKind::Func);
        // Lexed but never parsed; the parser reports them as unexpected.
        map.insert("package", TokenKind::Package);
        map.insert("import", TokenKind::Import);
        map.insert("map", TokenKind::Map);
        map.insert("struct", TokenKind::Struct);
        map.insert("interface", TokenKind::Interface);
        map.insert("int16", TokenKind::Int16);
        map.insert("int32", TokenKind::Int32);
        map.insert("int64", TokenKind::Int64);
        map.insert("bool", TokenKind::BoolType);
        map.insert("true", TokenKind::Bool(true));
        map.insert("false", TokenKind::Bool(false));
        map
    };
}

/// One entry of the punctuator disambiguation table: the token the leading
/// character produces on its own (if any), and the follow-character to
/// doubled-token mapping.
pub struct PunctuatorEntry {
    pub single: Option<TokenKind>,
    pub doubled: Vec<(char, TokenKind)>,
}

lazy_static! {
    pub static ref PUNCTUATOR_LOOKUP: HashMap<char, PunctuatorEntry> = {
        let single = |kind: TokenKind| PunctuatorEntry {
            single: Some(kind),
            doubled: vec![],
        };
        let mut map = HashMap::new();
        map.insert('(', single(TokenKind::OpenParen));
        map.insert(')', single(TokenKind::CloseParen));
        map.insert('{', single(TokenKind::OpenCurly));
        map.insert('}', single(TokenKind::CloseCurly));
        map.insert(',', single(TokenKind::Comma));
        map.insert(';', single(TokenKind::Semicolon));
        map.insert('.', single(TokenKind::Dot));
        map.insert('*', single(TokenKind::Star));
        map.insert('/', single(TokenKind::Slash));
        map.insert('%', single(TokenKind::Percent));
        map.insert(
            '+',
            PunctuatorEntry {
                single: Some(TokenKind::Plus),
                doubled: vec![('+', TokenKind::PlusPlus)],
            },
        );
        map.insert(
            '-',
            PunctuatorEntry {
                single: Some(TokenKind::Minus),
                doubled: vec![('-', TokenKind::MinusMinus)],
            },
        );
        map.insert(
            '=',
            PunctuatorEntry {
                single: Some(TokenKind::Assign),
                doubled: vec![('=', TokenKind::Equals)],
            },
        );
        map.insert(
            '!',
            PunctuatorEntry {
                single: Some(TokenKind::Not),
                doubled: vec![('=', TokenKind::NotEquals)],
            },
        );
        map.insert(
            '<',
            PunctuatorEntry {
                single: Some(TokenKind::Less),
                doubled: vec![('=', TokenKind::LessEquals)],
            },
        );
        map.insert(
            '>',
            PunctuatorEntry {
                single: Some(TokenKind::Greater),
                doubled: vec![('=', TokenKind::GreaterEquals)],
            },
        );
        map.insert(
            '&',
            PunctuatorEntry {
                single: None,
                doubled: vec![('&', TokenKind::And)],
            },
        );
        map.insert(
            '|',
            PunctuatorEntry {
                single: None,
                doubled: vec![('|', TokenKind::Or)],
            },
        );
        map.insert(
            ':',
            PunctuatorEntry {
                single: None,
                doubled: vec![('=', TokenKind::Define)],
            },
        );
        map
    };
}

#[derive(Debug, PartialEq, Clone)]
pub enum TokenKind {
    Eof,
    /// Statement separator; one per physical line, even if blank.
    Newline,

    Identifier(String),
    Int(u64),
    Float(f64),
    Str(String),
    Bool(bool),

    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,

    Assign,  // =
    Define,  // :=
    Equals,  // ==
    Not,     // !
    NotEquals,

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,
    And,

    Dot,
    Semicolon,
    Comma,

    PlusPlus,
    MinusMinus,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // Reserved
    Var,
    If,
    Else,
    For,
    Break,
    Continue,
    Return,
    Func,
    Package,
    Import,
    Map,
    Struct,
    Interface,

    // Type keywords
    Int16,
    Int32,
    Int64,
    BoolType,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Eof => write!(f, "end of file"),
            TokenKind::Newline => write!(f, "newline"),
            TokenKind::Identifier(name) => write!(f, "{}", name),
            TokenKind::Int(value) => write!(f, "{}", value),
            TokenKind::Float(value) => write!(f, "{}", value),
            TokenKind::Str(value) => write!(f, "{:?}", value),
            TokenKind::Bool(value) => write!(f, "{}", value),
            TokenKind::OpenParen => write!(f, "("),
            TokenKind::CloseParen => write!(f, ")"),
            TokenKind::OpenCurly => write!(f, "{{"),
            TokenKind::CloseCurly => write!(f, "}}"),
            TokenKind::Assign => write!(f, "="),
            TokenKind::Define => write!(f, ":="),
            TokenKind::Equals => write!(f, "=="),
            TokenKind::Not => write!(f, "!"),
            TokenKind::NotEquals => write!(f, "!="),
            TokenKind::Less => write!(f, "<"),
            TokenKind::LessEquals => write!(f, "<="),
            TokenKind::Greater => write!(f, ">"),
            TokenKind::GreaterEquals => write!(f, ">="),
            TokenKind::Or => write!(f, "||"),
            TokenKind::And => write!(f, "&&"),
            TokenKind::Dot => write!(f, "."),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::PlusPlus => write!(f, "++"),
            TokenKind::MinusMinus => write!(f, "--"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Percent => write!(f, "%"),
            TokenKind::Var => write!(f, "var"),
            TokenKind::If => write!(f, "if"),
            TokenKind::Else => write!(f, "else"),
            TokenKind::For => write!(f, "for"),
            TokenKind::Break => write!(f, "break"),
            TokenKind::Continue => write!(f, "continue"),
            TokenKind::Return => write!(f, "return"),
            TokenKind::Func => write!(f, "func"),
            TokenKind::Package => write!(f, "package"),
            TokenKind::Import => write!(f, "import"),
            TokenKind::Map => write!(f, "map"),
            TokenKind::Struct => write!(f, "struct"),
            TokenKind::Interface => write!(f, "interface"),
            TokenKind::Int16 => write!(f, "int16"),
            TokenKind::Int32 => write!(f, "int32"),
            TokenKind::Int64 => write!(f, "int64"),
            TokenKind::BoolType => write!(f, "bool"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}
