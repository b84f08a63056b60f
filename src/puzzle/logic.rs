//! Boolean expressions for truth-table puzzles.
//!
//! Expressions range over four variables `A..D` joined by three binary
//! AND/OR operators in one of five fixed parenthesization shapes:
//!
//! | shape         | form                        |
//! |---------------|-----------------------------|
//! | `Balanced`    | `(A o B) o (C o D)`         |
//! | `LeftDeep`    | `((A o B) o C) o D`         |
//! | `RightDeep`   | `A o (B o (C o D))`         |
//! | `RightNested` | `A o ((B o C) o D)`         |
//! | `LeftNested`  | `(A o (B o C)) o D`         |
//!
//! Evaluation walks the tree. Text is read back with a small
//! recursive-descent parser where AND binds tighter than OR.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of truth-table rows (all assignments of 4 variables).
pub const ROW_COUNT: usize = 16;

/// Binary boolean operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    And,
    Or,
}

impl Operator {
    /// Both operators.
    pub const ALL: [Operator; 2] = [Operator::And, Operator::Or];

    /// Apply the operator.
    #[must_use]
    pub fn apply(self, lhs: bool, rhs: bool) -> bool {
        match self {
            Operator::And => lhs && rhs,
            Operator::Or => lhs || rhs,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::And => f.write_str("AND"),
            Operator::Or => f.write_str("OR"),
        }
    }
}

/// One of the four named variables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variable {
    A,
    B,
    C,
    D,
}

impl Variable {
    /// Variables in column order.
    pub const ALL: [Variable; 4] = [Variable::A, Variable::B, Variable::C, Variable::D];

    /// Column index, `A` = 0.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Variable::A),
            'B' => Some(Variable::B),
            'C' => Some(Variable::C),
            'D' => Some(Variable::D),
            _ => None,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = ['A', 'B', 'C', 'D'][self.index()];
        write!(f, "{name}")
    }
}

/// One truth-table row.
///
/// Rows are numbered `0..16` in standard binary order with the most
/// significant bit assigned to `A`: row 5 = `0101` = `A=0 B=1 C=0 D=1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Assignment(u8);

impl Assignment {
    /// Assignment for a row index (only the low 4 bits are used).
    #[must_use]
    pub const fn from_row(row: usize) -> Self {
        Self((row & 0xF) as u8)
    }

    /// Row index of this assignment.
    #[must_use]
    pub const fn row(self) -> usize {
        self.0 as usize
    }

    /// Value of a variable in this row.
    #[must_use]
    pub const fn value(self, var: Variable) -> bool {
        (self.0 >> (3 - var.index())) & 1 == 1
    }

    /// All 16 assignments in row order.
    pub fn all() -> impl Iterator<Item = Assignment> {
        (0..ROW_COUNT).map(Assignment::from_row)
    }
}

/// Fixed parenthesization shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    /// `(A o B) o (C o D)`
    Balanced,
    /// `((A o B) o C) o D`
    LeftDeep,
    /// `A o (B o (C o D))`
    RightDeep,
    /// `A o ((B o C) o D)`
    RightNested,
    /// `(A o (B o C)) o D`
    LeftNested,
}

impl Shape {
    /// All five shapes.
    pub const ALL: [Shape; 5] = [
        Shape::Balanced,
        Shape::LeftDeep,
        Shape::RightDeep,
        Shape::RightNested,
        Shape::LeftNested,
    ];
}

/// Boolean expression tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expr {
    /// Variable leaf.
    Var(Variable),
    /// Binary node.
    Binary {
        op: Operator,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    fn binary(op: Operator, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Build the expression for a shape, operators applied left to right.
    ///
    /// ```
    /// use timed_rounds::puzzle::{Expr, Operator, Shape};
    ///
    /// let expr = Expr::from_shape(Shape::Balanced, [Operator::And, Operator::Or, Operator::And]);
    /// assert_eq!(expr.to_string(), "(A AND B) OR (C AND D)");
    /// ```
    #[must_use]
    pub fn from_shape(shape: Shape, ops: [Operator; 3]) -> Self {
        use Variable::{A, B, C, D};
        let [o1, o2, o3] = ops;
        let v = Expr::Var;

        let bin = Self::binary;

        match shape {
            Shape::Balanced => bin(o2, bin(o1, v(A), v(B)), bin(o3, v(C), v(D))),
            Shape::LeftDeep => bin(o3, bin(o2, bin(o1, v(A), v(B)), v(C)), v(D)),
            Shape::RightDeep => bin(o1, v(A), bin(o2, v(B), bin(o3, v(C), v(D)))),
            Shape::RightNested => bin(o1, v(A), bin(o3, bin(o2, v(B), v(C)), v(D))),
            Shape::LeftNested => bin(o3, bin(o1, v(A), bin(o2, v(B), v(C))), v(D)),
        }
    }

    /// Evaluate under an assignment. Total for every well-formed tree.
    #[must_use]
    pub fn evaluate(&self, row: Assignment) -> bool {
        match self {
            Expr::Var(var) => row.value(*var),
            Expr::Binary { op, lhs, rhs } => op.apply(lhs.evaluate(row), rhs.evaluate(row)),
        }
    }

    /// Expected result for each of the 16 rows.
    #[must_use]
    pub fn truth_table(&self) -> [bool; ROW_COUNT] {
        let mut table = [false; ROW_COUNT];
        for row in Assignment::all() {
            table[row.row()] = self.evaluate(row);
        }
        table
    }

    /// Parse expression text such as `((A AND B) OR C) AND D`.
    ///
    /// Accepts `AND`/`OR` (any case) or `&&`/`||`, parentheses, and the
    /// variables `A..D`.
    pub fn parse(input: &str) -> Result<Expr, ParseError> {
        let tokens = tokenize(input)?;
        let operators = tokens.iter().filter(|(_, t)| matches!(t, Token::Op(_))).count();
        if operators > MAX_OPERATORS {
            return Err(ParseError::TooLong(operators));
        }
        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
        };
        let expr = parser.disjunction()?;
        match parser.peek() {
            None => Ok(expr),
            Some((offset, token)) => Err(ParseError::Unexpected {
                offset,
                found: token.to_string(),
            }),
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Var(_) => write!(f, "{self}"),
            Expr::Binary { .. } => write!(f, "({self})"),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Var(var) => write!(f, "{var}"),
            Expr::Binary { op, lhs, rhs } => {
                lhs.fmt_operand(f)?;
                write!(f, " {op} ")?;
                rhs.fmt_operand(f)
            }
        }
    }
}

/// Expression text could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, derive_more::Display)]
pub enum ParseError {
    /// A character that starts no token.
    #[display("unexpected character {found:?} at offset {offset}")]
    BadCharacter { offset: usize, found: char },

    /// A token in the wrong place.
    #[display("unexpected {found} at offset {offset}")]
    Unexpected { offset: usize, found: String },

    /// Input ended mid-expression.
    #[display("unexpected end of expression")]
    UnexpectedEnd,

    /// Parentheses nested deeper than `MAX_NESTING`.
    #[display("parentheses nested too deep at offset {offset}")]
    TooDeep { offset: usize },

    /// More operators than `MAX_OPERATORS`.
    #[display("expression has {_0} operators, at most {} allowed", MAX_OPERATORS)]
    TooLong(usize),
}

/// Deepest parenthesis nesting `Expr::parse` accepts.
pub const MAX_NESTING: usize = 16;

/// Most binary operators `Expr::parse` accepts.
pub const MAX_OPERATORS: usize = 32;

impl std::error::Error for ParseError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    Op(Operator),
    Var(Variable),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Open => f.write_str("'('"),
            Token::Close => f.write_str("')'"),
            Token::Op(op) => write!(f, "{op}"),
            Token::Var(var) => write!(f, "variable {var}"),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<(usize, Token)>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let token = match c {
            '(' => Token::Open,
            ')' => Token::Close,
            '&' | '|' => {
                chars.next();
                match chars.peek() {
                    Some(&(_, next)) if next == c => {}
                    _ => return Err(ParseError::BadCharacter { offset, found: c }),
                }
                if c == '&' {
                    Token::Op(Operator::And)
                } else {
                    Token::Op(Operator::Or)
                }
            }
            c if c.is_ascii_alphabetic() => {
                let mut word = String::new();
                while let Some(&(_, w)) = chars.peek() {
                    if !w.is_ascii_alphabetic() {
                        break;
                    }
                    word.push(w.to_ascii_uppercase());
                    chars.next();
                }
                let token = match word.as_str() {
                    "AND" => Token::Op(Operator::And),
                    "OR" => Token::Op(Operator::Or),
                    _ => {
                        let mut letters = word.chars();
                        match (letters.next().and_then(Variable::from_char), letters.next()) {
                            (Some(var), None) => Token::Var(var),
                            _ => {
                                return Err(ParseError::Unexpected {
                                    offset,
                                    found: format!("word {word:?}"),
                                })
                            }
                        }
                    }
                };
                tokens.push((offset, token));
                continue;
            }
            other => return Err(ParseError::BadCharacter { offset, found: other }),
        };

        chars.next();
        tokens.push((offset, token));
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<(usize, Token)> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<(usize, Token)> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    // disjunction := conjunction ("OR" conjunction)*
    fn disjunction(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.conjunction()?;
        while let Some((_, Token::Op(Operator::Or))) = self.peek() {
            self.pos += 1;
            let rhs = self.conjunction()?;
            expr = Expr::binary(Operator::Or, expr, rhs);
        }
        Ok(expr)
    }

    // conjunction := atom ("AND" atom)*
    fn conjunction(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.atom()?;
        while let Some((_, Token::Op(Operator::And))) = self.peek() {
            self.pos += 1;
            let rhs = self.atom()?;
            expr = Expr::binary(Operator::And, expr, rhs);
        }
        Ok(expr)
    }

    // atom := VAR | "(" disjunction ")"
    fn atom(&mut self) -> Result<Expr, ParseError> {
        match self.bump() {
            Some((_, Token::Var(var))) => Ok(Expr::Var(var)),
            Some((offset, Token::Open)) => {
                if self.depth == MAX_NESTING {
                    return Err(ParseError::TooDeep { offset });
                }
                self.depth += 1;
                let inner = self.disjunction()?;
                self.depth -= 1;
                match self.bump() {
                    Some((_, Token::Close)) => Ok(inner),
                    Some((offset, token)) => Err(ParseError::Unexpected {
                        offset,
                        found: token.to_string(),
                    }),
                    None => Err(ParseError::UnexpectedEnd),
                }
            }
            Some((offset, token)) => Err(ParseError::Unexpected {
                offset,
                found: token.to_string(),
            }),
            None => Err(ParseError::UnexpectedEnd),
        }
    }
}
