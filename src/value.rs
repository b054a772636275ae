// Runtime values and evaluation errors.
//
// Evaluation is dynamically checked even though the compiler already
// proved the DAG well-typed: library functions receive plain values
// and report a TypeError when handed something outside their match
// table. All errors propagate synchronously; nothing retries.

use std::fmt;
use std::sync::Arc;

use enumflags2::BitFlags;

use crate::types::{narrow, Type};
use crate::util::float_repr;


// All values an expression can produce at runtime. Shared interiors
// use Arc so the immutable expression bag can cross threads.
#[derive(Clone, Debug)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<String>),
    List(Arc<Vec<Value>>),
    Point(f64, f64),
}


// Runtime discriminant of a Value. Rust doesn't expose an enum's
// discriminant outside a pattern match, so we carry our own.
#[derive(BitFlags, Copy, Clone, Debug, PartialEq)]
#[repr(u8)]
pub enum TypeTag {
    Bool  = 0b000001,
    Int   = 0b000010,
    Float = 0b000100,
    Str   = 0b001000,
    List  = 0b010000,
    Point = 0b100000,
}


pub type TypeSet = BitFlags<TypeTag>;


// The result of any evaluation step.
pub type Result<T> = core::result::Result<T, Error>;


#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    TypeError {
        expect: TypeSet,
        got: TypeTag,
    },
    TypeMismatch(TypeTag, TypeTag),
    MissingInput(String),
    MissingLocal(usize),
    MissingArg(String),
    IndexError(i64),
    ValueError(String),
    // The composite evaluation failure: the failing callee's name,
    // its evaluated argument bindings, and the underlying error.
    Call {
        function: String,
        args: Vec<(String, Value)>,
        cause: Box<Error>,
    },
}


impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::TypeError { expect, got } => {
                write!(f, "expected one of {:?}, got {:?}", expect, got)
            }
            Error::TypeMismatch(a, b) => write!(f, "mismatched operands {:?} and {:?}", a, b),
            Error::MissingInput(symbol) => write!(f, "no input supplied for symbol {}", symbol),
            Error::MissingLocal(ndx) => write!(f, "no local argument bound at _{}", ndx),
            Error::MissingArg(name) => write!(f, "no argument named {}", name),
            Error::IndexError(ndx) => write!(f, "index {} out of range", ndx),
            Error::ValueError(reason) => write!(f, "{}", reason),
            Error::Call { function, args, cause } => {
                let bound: Vec<String> = args
                    .iter()
                    .map(|(name, val)| format!("{}={}", name, val.repr()))
                    .collect();
                write!(
                    f,
                    "while evaluating {}({}) found: {}",
                    function,
                    bound.join(", "),
                    cause
                )
            }
        }
    }
}


// Construct an Error::TypeError from a value.
fn expected(expect: TypeSet, got: &Value) -> Error {
    Error::TypeError { expect, got: got.get_type() }
}

// Construct an Error::TypeMismatch from a pair of values.
fn type_mismatch(a: &Value, b: &Value) -> Error {
    Error::TypeMismatch(a.get_type(), b.get_type())
}


// Flooring modulo: the result takes the sign of the divisor.
fn sign_mod_i(a: i64, b: i64) -> i64 {
    ((a % b) + b) % b
}

fn sign_mod_f(a: f64, b: f64) -> f64 {
    ((a % b) + b) % b
}


// Factors out the boiler plate in operator method implementations.
//
// Each operator names the white-list of operand patterns it accepts.
// Anything not in the match table is implicitly a runtime error.
macro_rules! operator {
    // Template for a unary operator
    (un $name:ident ($expect:expr) { $( $p:pat => $e:expr ),+ $(,)? } ) => {
        pub fn $name (&self) -> Result<Value> {
            use Value::*;
            match self {
                $($p => Ok($e)),+ ,
                value => Err(expected($expect, value))
            }
        }
    };

    // Template for a binary operator
    (bin $name:ident { $( $p:pat => $e:expr ),+ $(,)? } ) => {
        pub fn $name (&self, other: &Value) -> Result<Value> {
            use Value::*;
            #[allow(unreachable_patterns)]
            match (self, other) {
                $($p => Ok($e)),+ ,
                (a, b) => Err(type_mismatch(a, b))
            }
        }
    };
}


impl Value {
    pub fn string(s: &str) -> Value {
        Value::Str(Arc::new(String::from(s)))
    }

    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Arc::new(items))
    }

    pub fn get_type(&self) -> TypeTag {
        match self {
            Value::Bool(_) => TypeTag::Bool,
            Value::Int(_) => TypeTag::Int,
            Value::Float(_) => TypeTag::Float,
            Value::Str(_) => TypeTag::Str,
            Value::List(_) => TypeTag::List,
            Value::Point(_, _) => TypeTag::Point,
        }
    }

    // The static type a literal of this value would carry. Lists
    // narrow their element types to a single type or a union.
    pub fn infer_type(&self) -> Type {
        match self {
            Value::Bool(_) => Type::Bool,
            Value::Int(_) => Type::Int,
            Value::Float(_) => Type::Float,
            Value::Str(_) => Type::Str,
            Value::Point(_, _) => Type::Point,
            Value::List(items) => {
                Type::list(narrow(items.iter().map(|v| v.infer_type()).collect()))
            }
        }
    }

    operator! { bin add {
        (Int(a),   Int(b))   => Int(a + b),
        (Float(a), Float(b)) => Float(a + b),
        (Int(a),   Float(b)) => Float(*a as f64 + b),
        (Float(a), Int(b))   => Float(a + *b as f64),
    } }

    operator! { bin sub {
        (Int(a),   Int(b))   => Int(a - b),
        (Float(a), Float(b)) => Float(a - b),
        (Int(a),   Float(b)) => Float(*a as f64 - b),
        (Float(a), Int(b))   => Float(a - *b as f64),
    } }

    operator! { bin mul {
        (Int(a),   Int(b))   => Int(a * b),
        (Float(a), Float(b)) => Float(a * b),
        (Int(a),   Float(b)) => Float(*a as f64 * b),
        (Float(a), Int(b))   => Float(a * *b as f64),
    } }

    // True division always yields a float. A zero divisor yields 0.0
    // rather than an error.
    operator! { bin div {
        (Int(a),   Int(b))   => if *b == 0 { Float(0.0) } else { Float(*a as f64 / *b as f64) },
        (Float(a), Float(b)) => if *b == 0.0 { Float(0.0) } else { Float(a / b) },
        (Int(a),   Float(b)) => if *b == 0.0 { Float(0.0) } else { Float(*a as f64 / b) },
        (Float(a), Int(b))   => if *b == 0 { Float(0.0) } else { Float(a / *b as f64) },
    } }

    operator! { bin floordiv {
        (Int(a),   Int(b))   => if *b == 0 { Float(0.0) } else { Float((*a as f64 / *b as f64).floor()) },
        (Float(a), Float(b)) => if *b == 0.0 { Float(0.0) } else { Float((a / b).floor()) },
        (Int(a),   Float(b)) => if *b == 0.0 { Float(0.0) } else { Float((*a as f64 / b).floor()) },
        (Float(a), Int(b))   => if *b == 0 { Float(0.0) } else { Float((a / *b as f64).floor()) },
    } }

    operator! { bin modulo {
        (Int(a),   Int(b))   => if *b == 0 { Float(0.0) } else { Int(sign_mod_i(*a, *b)) },
        (Float(a), Float(b)) => if *b == 0.0 { Float(0.0) } else { Float(sign_mod_f(*a, *b)) },
        (Int(a),   Float(b)) => if *b == 0.0 { Float(0.0) } else { Float(sign_mod_f(*a as f64, *b)) },
        (Float(a), Int(b))   => if *b == 0 { Float(0.0) } else { Float(sign_mod_f(*a, *b as f64)) },
    } }

    operator! { bin min_of {
        (Int(a),   Int(b))   => Int(*a.min(b)),
        (Float(a), Float(b)) => Float(a.min(*b)),
        (Int(a),   Float(b)) => if (*a as f64) <= *b { Int(*a) } else { Float(*b) },
        (Float(a), Int(b))   => if *a <= (*b as f64) { Float(*a) } else { Int(*b) },
    } }

    operator! { bin max_of {
        (Int(a),   Int(b))   => Int(*a.max(b)),
        (Float(a), Float(b)) => Float(a.max(*b)),
        (Int(a),   Float(b)) => if (*a as f64) >= *b { Int(*a) } else { Float(*b) },
        (Float(a), Int(b))   => if *a >= (*b as f64) { Float(*a) } else { Int(*b) },
    } }

    operator! { bin lt {
        (Int(a),   Int(b))   => Bool(a < b),
        (Float(a), Float(b)) => Bool(a < b),
        (Int(a),   Float(b)) => Bool((*a as f64) < *b),
        (Float(a), Int(b))   => Bool(*a < (*b as f64)),
        (Str(a),   Str(b))   => Bool(a < b),
    } }

    operator! { bin le {
        (Int(a),   Int(b))   => Bool(a <= b),
        (Float(a), Float(b)) => Bool(a <= b),
        (Int(a),   Float(b)) => Bool((*a as f64) <= *b),
        (Float(a), Int(b))   => Bool(*a <= (*b as f64)),
        (Str(a),   Str(b))   => Bool(a <= b),
    } }

    operator! { bin gt {
        (Int(a),   Int(b))   => Bool(a > b),
        (Float(a), Float(b)) => Bool(a > b),
        (Int(a),   Float(b)) => Bool((*a as f64) > *b),
        (Float(a), Int(b))   => Bool(*a > (*b as f64)),
        (Str(a),   Str(b))   => Bool(a > b),
    } }

    operator! { bin ge {
        (Int(a),   Int(b))   => Bool(a >= b),
        (Float(a), Float(b)) => Bool(a >= b),
        (Int(a),   Float(b)) => Bool((*a as f64) >= *b),
        (Float(a), Int(b))   => Bool(*a >= (*b as f64)),
        (Str(a),   Str(b))   => Bool(a >= b),
    } }

    operator! { un neg (TypeTag::Int | TypeTag::Float) {
        Int(a) => Int(-a),
        Float(a) => Float(-a),
    } }

    operator! { un abs_of (TypeTag::Int | TypeTag::Float) {
        Int(a) => Int(a.abs()),
        Float(a) => Float(a.abs()),
    } }

    operator! { un pos (TypeTag::Int | TypeTag::Float) {
        Int(a) => Int(*a),
        Float(a) => Float(*a),
    } }

    // Literal rendering: what this value looks like in source text.
    pub fn repr(&self) -> String {
        match self {
            Value::Str(s) => format!("\"{}\"", s),
            other => format!("{}", other),
        }
    }
}


// Print form. Strings drop their quotes at the top level but keep
// them inside a list.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", float_repr(*x)),
            Value::Str(s) => write!(f, "{}", s),
            Value::Point(x, y) => write!(f, "Point({}, {})", float_repr(*x), float_repr(*y)),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.repr()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}


// Equality is total: mismatched variants compare unequal instead of
// failing, and ints compare numerically against floats.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        use Value::*;
        match (self, other) {
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Int(a), Float(b)) | (Float(b), Int(a)) => (*a as f64) == *b,
            (Str(a), Str(b)) => a == b,
            (List(a), List(b)) => a == b,
            (Point(x1, y1), Point(x2, y2)) => x1 == x2 && y1 == y2,
            (_, _) => false,
        }
    }
}


// Like core::convert::TryInto, except over our Result. Conversion
// failures carry the expected type set.
pub trait TryInto<T> {
    fn try_into(self) -> Result<T>;
}


// Factor out boilerplate for implementations of TryInto.
macro_rules! impl_try_into {
    ($variant:ident => $type:ty) => {
        impl TryInto<$type> for Value {
            fn try_into(self) -> Result<$type> {
                match self {
                    Value::$variant(value) => Ok(value),
                    v => Err(expected(BitFlags::from_flag(TypeTag::$variant), &v)),
                }
            }
        }
    };
}

impl_try_into! { Bool  => bool }
impl_try_into! { Int   => i64 }
impl_try_into! { Float => f64 }
impl_try_into! { Str   => Arc<String> }
impl_try_into! { List  => Arc<Vec<Value>> }


// Evaluation context: the writable stdout capture threaded through
// every eval call. IO library functions print here, never to the
// process stdout, so parallel evaluations stay independent.
#[derive(Debug, Default)]
pub struct EvalContext {
    stdout: String,
}


impl EvalContext {
    pub fn new() -> EvalContext {
        EvalContext { stdout: String::new() }
    }

    pub fn print(&mut self, value: &Value) {
        let text = format!("{}", value);
        self.stdout.push_str(&text);
    }

    pub fn println(&mut self, value: &Value) {
        self.print(value);
        self.stdout.push('\n');
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn into_stdout(self) -> String {
        self.stdout
    }
}
