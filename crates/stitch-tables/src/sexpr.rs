//! S-expression 解析器
//!
//! 事實檔格式：每行一個括號包住的 token 清單，`;` 起始為註解。
//!
//! ```text
//! ; 布料單價
//! (fabric-price cotton-jersey-180gsm 5.80)
//! (shipping-days China 15)
//! ```

use thiserror::Error;

/// 解析結果節點
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sexpr {
    Atom(String),
    List(Vec<Sexpr>),
}

impl Sexpr {
    /// 取出原子字串；列表節點回傳 None
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Sexpr::Atom(s) => Some(s),
            Sexpr::List(_) => None,
        }
    }

    /// 取出列表切片；原子節點回傳 None
    pub fn as_list(&self) -> Option<&[Sexpr]> {
        match self {
            Sexpr::Atom(_) => None,
            Sexpr::List(items) => Some(items),
        }
    }
}

/// 解析錯誤
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("第 {line} 行: 括號未閉合")]
    UnclosedParen { line: usize },

    #[error("第 {line} 行: 多餘的右括號")]
    UnexpectedCloseParen { line: usize },

    #[error("第 {line} 行: 頂層不可出現裸原子 {atom:?}")]
    BareAtom { line: usize, atom: String },
}

/// 解析整份文件，回傳頂層表達式清單
pub fn parse_document(input: &str) -> Result<Vec<Sexpr>, ParseError> {
    let mut parser = Parser::new(input);
    let mut forms = Vec::new();

    loop {
        parser.skip_trivia();
        match parser.peek() {
            None => break,
            Some('(') => forms.push(parser.parse_list()?),
            Some(')') => {
                return Err(ParseError::UnexpectedCloseParen { line: parser.line });
            }
            Some(_) => {
                let atom = parser.parse_atom();
                return Err(ParseError::BareAtom {
                    line: parser.line,
                    atom,
                });
            }
        }
    }

    Ok(forms)
}

struct Parser<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line += 1;
        }
        c
    }

    /// 跳過空白與 `;` 到行尾的註解
    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == ';' {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.bump();
                }
            } else {
                break;
            }
        }
    }

    fn parse_list(&mut self) -> Result<Sexpr, ParseError> {
        let open_line = self.line;
        self.bump(); // '('

        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                None => return Err(ParseError::UnclosedParen { line: open_line }),
                Some(')') => {
                    self.bump();
                    return Ok(Sexpr::List(items));
                }
                Some('(') => items.push(self.parse_list()?),
                Some(_) => items.push(Sexpr::Atom(self.parse_atom())),
            }
        }
    }

    fn parse_atom(&mut self) -> String {
        let mut atom = String::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == '(' || c == ')' || c == ';' {
                break;
            }
            atom.push(c);
            self.bump();
        }
        atom
    }
}
