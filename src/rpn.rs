use std::{f64::consts::PI, fmt, sync::OnceLock};

use regex::Regex;

use crate::{stack::LinkedStack, Error, Result};

static TOKEN_RE: OnceLock<Regex> = OnceLock::new();

fn token_re() -> &'static Regex {
    TOKEN_RE.get_or_init(|| {
        Regex::new(
            r"\s*([0-9.]+|[+\-*^/qQ]|help|drop|dup|disp|swap|clear|top|pi|sin|cos|tan|asin|acos|atan|sqrt|abs)\s*",
        )
        .expect("Invalid RPN token pattern")
    })
}

pub const HELP: &str = "RPN calculator. Enter numbers, or any of the following operations:\n\
    \t+, -, *, /, ^, sin, cos, tan, asin, acos, atan, sqrt, abs, drop, dup, disp (or .), swap, \
    clear, top, pi, help, q";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),
    Binary(BinaryOp),
    Unary(UnaryFn),
    Drop,
    Dup,
    Disp,
    Swap,
    Clear,
    Top,
    Pi,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    /// Stand-in for a missing left operand. Chosen so `x +` and `x *` leave x unchanged.
    const fn identity(self) -> f64 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 0.0,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Pow => 1.0,
        }
    }

    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
            BinaryOp::Pow => lhs.powf(rhs),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryFn {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sqrt,
    Abs,
}

impl UnaryFn {
    fn apply(self, x: f64) -> f64 {
        match self {
            UnaryFn::Sin => x.sin(),
            UnaryFn::Cos => x.cos(),
            UnaryFn::Tan => x.tan(),
            UnaryFn::Asin => x.asin(),
            UnaryFn::Acos => x.acos(),
            UnaryFn::Atan => x.atan(),
            UnaryFn::Sqrt => x.sqrt(),
            UnaryFn::Abs => x.abs(),
        }
    }
}

impl Token {
    fn parse(s: &str) -> Result<Token> {
        let token = match s {
            "+" => Token::Binary(BinaryOp::Add),
            "-" => Token::Binary(BinaryOp::Sub),
            "*" => Token::Binary(BinaryOp::Mul),
            "/" => Token::Binary(BinaryOp::Div),
            "^" => Token::Binary(BinaryOp::Pow),
            "sin" => Token::Unary(UnaryFn::Sin),
            "cos" => Token::Unary(UnaryFn::Cos),
            "tan" => Token::Unary(UnaryFn::Tan),
            "asin" => Token::Unary(UnaryFn::Asin),
            "acos" => Token::Unary(UnaryFn::Acos),
            "atan" => Token::Unary(UnaryFn::Atan),
            "sqrt" => Token::Unary(UnaryFn::Sqrt),
            "abs" => Token::Unary(UnaryFn::Abs),
            "drop" => Token::Drop,
            "dup" => Token::Dup,
            "disp" | "." => Token::Disp,
            "swap" => Token::Swap,
            "clear" => Token::Clear,
            "top" => Token::Top,
            "pi" => Token::Pi,
            "help" => Token::Help,
            "q" | "Q" => Token::Quit,
            n => Token::Number(n.parse().map_err(|_| Error::InvalidNumber(n.to_string()))?),
        };
        Ok(token)
    }
}

/// Splits a line into tokens. Anything the token pattern doesn't recognize is skipped.
pub fn tokenize(line: &str) -> Result<Vec<Token>> {
    token_re()
        .captures_iter(line)
        .map(|c| Token::parse(&c[1]))
        .collect()
}

/// Output produced while evaluating a line.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// The top of the stack, or None if it was empty.
    Top(Option<f64>),
    /// Every value, top of the stack first.
    Stack(Vec<f64>),
    Help,
    Quit,
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Top(None) => write!(f, "empty"),
            Response::Top(Some(v)) => write!(f, "{}", v),
            Response::Stack(values) if values.is_empty() => write!(f, "empty"),
            Response::Stack(values) => {
                let values: Vec<String> = values.iter().map(f64::to_string).collect();
                write!(f, "{}", values.join(" "))
            }
            Response::Help => write!(f, "{}", HELP),
            Response::Quit => Ok(()),
        }
    }
}

#[derive(Debug)]
pub struct Calculator {
    values: LinkedStack<f64>,
    running: bool,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    pub fn new() -> Self {
        Calculator {
            values: LinkedStack::new(),
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn top(&self) -> Option<f64> {
        self.values.peek().copied()
    }

    /// Values from the top of the stack down.
    pub fn values(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }

    /// Evaluates one line of input. Tokens after `q` are ignored. A malformed number rejects
    /// the whole line before anything on it is evaluated.
    pub fn eval_line(&mut self, line: &str) -> Result<Vec<Response>> {
        let tokens = tokenize(line)?;
        let mut responses = Vec::new();
        for token in tokens {
            if let Some(response) = self.eval(token) {
                let quit = response == Response::Quit;
                responses.push(response);
                if quit {
                    break;
                }
            }
        }
        Ok(responses)
    }

    pub fn eval(&mut self, token: Token) -> Option<Response> {
        log::trace!("rpn token {:?}", token);
        match token {
            Token::Number(n) => self.values.push(n),
            Token::Binary(op) => {
                let rhs = self.values.pop().unwrap_or(0.0);
                let lhs = self.values.pop().unwrap_or(op.identity());
                self.values.push(op.apply(lhs, rhs));
            }
            Token::Unary(func) => {
                if let Some(top) = self.values.peek_mut() {
                    *top = func.apply(*top);
                }
            }
            Token::Drop => {
                self.values.pop();
            }
            Token::Dup => {
                if let Some(top) = self.top() {
                    self.values.push(top);
                }
            }
            Token::Swap => {
                if self.values.len() >= 2 {
                    let top = self.values.pop().unwrap_or_default();
                    let below = self.values.pop().unwrap_or_default();
                    self.values.push(top);
                    self.values.push(below);
                }
            }
            Token::Clear => self.values.clear(),
            Token::Pi => self.values.push(PI),
            Token::Top => return Some(Response::Top(self.top())),
            Token::Disp => return Some(Response::Stack(self.values())),
            Token::Help => return Some(Response::Help),
            Token::Quit => {
                self.running = false;
                return Some(Response::Quit);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(line: &str) -> Calculator {
        let mut calc = Calculator::new();
        calc.eval_line(line).unwrap();
        calc
    }

    #[test]
    fn arithmetic() {
        assert_eq!(eval("3 4 +").top(), Some(7.0));
        assert_eq!(eval("10 4 -").top(), Some(6.0));
        assert_eq!(eval("3 4 * 2 /").top(), Some(6.0));
        assert_eq!(eval("2 10 ^").top(), Some(1024.0));
        assert_eq!(eval("1 2 3 + +").values(), vec![6.0]);
    }

    #[test]
    fn missing_operands_use_identities() {
        assert_eq!(eval("5 -").top(), Some(-5.0));
        assert_eq!(eval("5 *").top(), Some(5.0));
        assert_eq!(eval("5 /").top(), Some(0.2));
        assert_eq!(eval("+").top(), Some(0.0));
        assert_eq!(eval("*").top(), Some(0.0));
    }

    #[test]
    fn tokens_need_no_spaces() {
        assert_eq!(eval("3 4+2*").top(), Some(14.0));
        assert_eq!(eval("2 3 swap-").top(), Some(1.0));
        // Unrecognized characters are skipped.
        assert_eq!(eval("1 x 2 +").top(), Some(3.0));
    }

    #[test]
    fn unary_functions() {
        assert_eq!(eval("16 sqrt").top(), Some(4.0));
        assert_eq!(eval("3 - abs").top(), Some(3.0));
        assert_eq!(eval("0 cos").top(), Some(1.0));
        let pi = eval("1 atan 4 *").top().unwrap();
        assert!((pi - PI).abs() < 1e-12);
        assert!(eval("sin sqrt").values().is_empty());
    }

    #[test]
    fn stack_commands() {
        assert_eq!(eval("1 2 swap").values(), vec![1.0, 2.0]);
        assert_eq!(eval("1 swap").values(), vec![1.0]);
        assert_eq!(eval("1 dup").values(), vec![1.0, 1.0]);
        assert!(eval("dup drop drop").values().is_empty());
        assert!(eval("1 2 3 clear").values().is_empty());
        assert_eq!(eval("pi").top(), Some(PI));
    }

    #[test]
    fn responses_in_order() {
        let mut calc = Calculator::new();
        let responses = calc.eval_line("top 1 2 disp . top help").unwrap();
        assert_eq!(
            responses,
            vec![
                Response::Top(None),
                Response::Stack(vec![2.0, 1.0]),
                Response::Stack(vec![2.0, 1.0]),
                Response::Top(Some(2.0)),
                Response::Help,
            ]
        );
        assert_eq!(responses[0].to_string(), "empty");
        assert_eq!(responses[1].to_string(), "2 1");
        assert_eq!(Response::Stack(vec![]).to_string(), "empty");
    }

    #[test]
    fn quit_stops_the_line() {
        let mut calc = Calculator::new();
        let responses = calc.eval_line("1 q 2 disp").unwrap();
        assert_eq!(responses, vec![Response::Quit]);
        assert!(!calc.is_running());
        assert_eq!(calc.values(), vec![1.0]);
    }

    #[test]
    fn malformed_number() {
        let mut calc = Calculator::new();
        match calc.eval_line("1 1.2.3 +") {
            Err(Error::InvalidNumber(n)) => assert_eq!(n, "1.2.3"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(calc.values().is_empty());
    }
}
