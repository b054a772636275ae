// The built-in expression catalogue.
//
// Every entry is a template: a native function plus its declared
// signature and reifier assignment. Semantics are numeric-safe
// throughout: division and modulo by zero produce 0.0, string
// searches report -1 instead of failing, casts are total. The only
// operations that can fail at eval time are the ones where no
// sensible default exists (indexing, joining non-strings), and those
// surface as composite evaluation errors.

use std::sync::Arc;

use crate::collections::OrdMap;
use crate::expr::{Expr, ExprKind};
use crate::reify::Reifier;
use crate::types::Type;
use crate::value::{Error, EvalContext, Result, TryInto, Value};


pub fn numeric() -> Type {
    Type::union(vec![Type::Int, Type::Float])
}

pub fn comparable() -> Type {
    Type::union(vec![Type::Int, Type::Float, Type::Str])
}


// Argument access for native functions.

pub fn arg(args: &OrdMap<Value>, name: &str) -> Result<Value> {
    args.get(name)
        .cloned()
        .ok_or_else(|| Error::MissingArg(String::from(name)))
}

pub fn arg_into<T>(args: &OrdMap<Value>, name: &str) -> Result<T>
where
    Value: TryInto<T>,
{
    arg(args, name)?.try_into()
}


// First template with the given registered name, if any.
pub fn find(fns: &[Expr], name: &str) -> Option<Expr> {
    fns.iter()
        .find(|e| matches!(&e.kind, ExprKind::Call(call) if call.name == name))
        .cloned()
}


// Comparison Operations ******************************************************/

fn lt(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    arg(args, "a")?.lt(&arg(args, "b")?)
}

fn le(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    arg(args, "a")?.le(&arg(args, "b")?)
}

fn eq(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    Ok(Value::Bool(arg(args, "a")? == arg(args, "b")?))
}

fn ne(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    Ok(Value::Bool(arg(args, "a")? != arg(args, "b")?))
}

fn ge(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    arg(args, "a")?.ge(&arg(args, "b")?)
}

fn gt(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    arg(args, "a")?.gt(&arg(args, "b")?)
}


// Logical Operations *********************************************************/

fn not_(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let a: bool = arg_into(args, "a")?;
    Ok(Value::Bool(!a))
}

fn and_(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let a: bool = arg_into(args, "a")?;
    let b: bool = arg_into(args, "b")?;
    Ok(Value::Bool(a && b))
}

fn or_(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let a: bool = arg_into(args, "a")?;
    let b: bool = arg_into(args, "b")?;
    Ok(Value::Bool(a || b))
}


// Mathematical Operations ****************************************************/

fn abs_(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    arg(args, "a")?.abs_of()
}

fn add(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    arg(args, "a")?.add(&arg(args, "b")?)
}

fn sub(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    arg(args, "a")?.sub(&arg(args, "b")?)
}

fn mul(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    arg(args, "a")?.mul(&arg(args, "b")?)
}

fn div(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    arg(args, "a")?.div(&arg(args, "b")?)
}

fn floordiv(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    arg(args, "a")?.floordiv(&arg(args, "b")?)
}

fn mod_(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    arg(args, "a")?.modulo(&arg(args, "b")?)
}

fn neg(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    arg(args, "a")?.neg()
}

fn pos(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    arg(args, "a")?.pos()
}

fn round_(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let ndigits: i64 = arg_into(args, "ndigits")?;
    match arg(args, "number")? {
        Value::Int(a) => Ok(Value::Int(a)),
        Value::Float(x) => {
            let scale = 10f64.powi(ndigits as i32);
            Ok(Value::Float((x * scale).round() / scale))
        }
        v => Err(Error::TypeError {
            expect: crate::value::TypeTag::Int | crate::value::TypeTag::Float,
            got: v.get_type(),
        }),
    }
}

fn min_(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    arg(args, "a")?.min_of(&arg(args, "b")?)
}

fn max_(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    arg(args, "a")?.max_of(&arg(args, "b")?)
}

fn sum_(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let items: Arc<Vec<Value>> = arg_into(args, "coll")?;
    let mut total = Value::Int(0);
    for item in items.iter() {
        total = total.add(item)?;
    }
    Ok(total)
}


pub fn op_fns() -> Vec<Expr> {
    let b_same_as_a = Reifier::ArgsToSame {
        reference: String::from("a"),
        others: vec![String::from("b")],
    };
    let pass_a = Reifier::PassThrough(String::from("a"));
    let max_numeric = Reifier::MaxType(vec![Type::Int, Type::Float]);

    let comparison = || OrdMap::new().add("a", comparable()).add("b", comparable());
    let any_pair = || OrdMap::new().add("a", Type::Any).add("b", Type::Any);
    let bool_pair = || OrdMap::new().add("a", Type::Bool).add("b", Type::Bool);
    let unary = || OrdMap::new().add("a", numeric());
    let binary = || OrdMap::new().add("a", numeric()).add("b", numeric());

    vec![
        Expr::function("lt", lt, Type::Bool, comparison(), b_same_as_a.clone()),
        Expr::function("le", le, Type::Bool, comparison(), b_same_as_a.clone()),
        Expr::function("eq", eq, Type::Bool, any_pair(), Reifier::Noop),
        Expr::function("ne", ne, Type::Bool, any_pair(), Reifier::Noop),
        Expr::function("ge", ge, Type::Bool, comparison(), b_same_as_a.clone()),
        Expr::function("gt", gt, Type::Bool, comparison(), b_same_as_a),
        Expr::function("not", not_, Type::Bool, OrdMap::new().add("a", Type::Bool), Reifier::Noop),
        Expr::function("and", and_, Type::Bool, bool_pair(), Reifier::Noop),
        Expr::function("or", or_, Type::Bool, bool_pair(), Reifier::Noop),
        Expr::function("abs", abs_, numeric(), unary(), pass_a.clone()),
        Expr::function("add", add, numeric(), binary(), max_numeric.clone()),
        Expr::function("floordiv", floordiv, Type::Float, binary(), Reifier::Noop),
        Expr::function("mod", mod_, numeric(), binary(), max_numeric.clone()),
        Expr::function("mul", mul, numeric(), binary(), max_numeric.clone()),
        Expr::function("neg", neg, numeric(), unary(), pass_a.clone()),
        Expr::function("pos", pos, numeric(), unary(), pass_a),
        Expr::function("sub", sub, numeric(), binary(), max_numeric.clone()),
        Expr::function("div", div, Type::Float, binary(), Reifier::Noop),
        Expr::function(
            "round",
            round_,
            numeric(),
            OrdMap::new().add("number", numeric()).add("ndigits", Type::Int),
            max_numeric.clone(),
        ),
        Expr::function("min", min_, numeric(), binary(), max_numeric.clone()),
        Expr::function("max", max_, numeric(), binary(), max_numeric),
        Expr::function(
            "sum",
            sum_,
            numeric(),
            OrdMap::new().add("coll", Type::list(numeric())),
            Reifier::RetToElement(String::from("coll")),
        ),
    ]
}


// Casts **********************************************************************/

fn str_(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    Ok(Value::string(&format!("{}", arg(args, "a")?)))
}

fn int2float(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let i: i64 = arg_into(args, "i")?;
    Ok(Value::Float(i as f64))
}

fn float2int(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let f: f64 = arg_into(args, "f")?;
    Ok(Value::Int(f as i64))
}

fn int2bool(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let i: i64 = arg_into(args, "i")?;
    Ok(Value::Bool(i != 0))
}

fn float2bool(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let f: f64 = arg_into(args, "f")?;
    Ok(Value::Bool(f != 0.0))
}

fn bool2int(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let b: bool = arg_into(args, "b")?;
    Ok(Value::Int(b as i64))
}

fn bool2float(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let b: bool = arg_into(args, "b")?;
    Ok(Value::Float(if b { 1.0 } else { 0.0 }))
}


pub fn cast_fns() -> Vec<Expr> {
    vec![
        Expr::function("str", str_, Type::Str, OrdMap::new().add("a", Type::Any), Reifier::Noop),
        Expr::function("int2float", int2float, Type::Float, OrdMap::new().add("i", Type::Int), Reifier::Noop),
        Expr::function("float2int", float2int, Type::Int, OrdMap::new().add("f", Type::Float), Reifier::Noop),
        Expr::function("int2bool", int2bool, Type::Bool, OrdMap::new().add("i", Type::Int), Reifier::Noop),
        Expr::function("float2bool", float2bool, Type::Bool, OrdMap::new().add("f", Type::Float), Reifier::Noop),
        Expr::function("bool2int", bool2int, Type::Int, OrdMap::new().add("b", Type::Bool), Reifier::Noop),
        Expr::function("bool2float", bool2float, Type::Float, OrdMap::new().add("b", Type::Bool), Reifier::Noop),
    ]
}


// String Operations **********************************************************/

// Character index of a byte offset, -1 when absent.
fn char_index(s: &str, byte: Option<usize>) -> i64 {
    match byte {
        Some(ndx) => s[..ndx].chars().count() as i64,
        None => -1,
    }
}

fn str_add(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let s1: Arc<String> = arg_into(args, "s1")?;
    let s2: Arc<String> = arg_into(args, "s2")?;
    Ok(Value::string(&format!("{}{}", s1, s2)))
}

fn str_in(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let key: Arc<String> = arg_into(args, "key")?;
    let string: Arc<String> = arg_into(args, "string")?;
    Ok(Value::Bool(string.contains(key.as_str())))
}

fn str_eq(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let s1: Arc<String> = arg_into(args, "s1")?;
    let s2: Arc<String> = arg_into(args, "s2")?;
    Ok(Value::Bool(s1 == s2))
}

fn str_ne(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let s1: Arc<String> = arg_into(args, "s1")?;
    let s2: Arc<String> = arg_into(args, "s2")?;
    Ok(Value::Bool(s1 != s2))
}

fn str_getitem(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let s1: Arc<String> = arg_into(args, "s1")?;
    let ndx: i64 = arg_into(args, "ndx")?;
    let chars: Vec<char> = s1.chars().collect();
    let real = if ndx < 0 { ndx + chars.len() as i64 } else { ndx };
    if real < 0 || real >= chars.len() as i64 {
        Err(Error::IndexError(ndx))
    } else {
        Ok(Value::string(&chars[real as usize].to_string()))
    }
}

fn str_ge(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    arg(args, "s1")?.ge(&arg(args, "s2")?)
}

fn str_gt(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    arg(args, "s1")?.gt(&arg(args, "s2")?)
}

fn str_le(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    arg(args, "s1")?.le(&arg(args, "s2")?)
}

fn str_lt(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    arg(args, "s1")?.lt(&arg(args, "s2")?)
}

fn str_len(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let s: Arc<String> = arg_into(args, "s")?;
    Ok(Value::Int(s.chars().count() as i64))
}

fn str_mul(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let s: Arc<String> = arg_into(args, "s")?;
    let i: i64 = arg_into(args, "i")?;
    Ok(Value::string(&s.repeat(i.max(0) as usize)))
}


pub fn str_fns() -> Vec<Expr> {
    let str_pair = || OrdMap::new().add("s1", Type::Str).add("s2", Type::Str);
    vec![
        Expr::function("add", str_add, Type::Str, str_pair(), Reifier::Noop),
        Expr::function(
            "in",
            str_in,
            Type::Bool,
            OrdMap::new().add("key", Type::Str).add("string", Type::Str),
            Reifier::Noop,
        ),
        Expr::function("eq", str_eq, Type::Bool, str_pair(), Reifier::Noop),
        Expr::function(
            "getitem",
            str_getitem,
            Type::Str,
            OrdMap::new().add("s1", Type::Str).add("ndx", Type::Int),
            Reifier::Noop,
        ),
        Expr::function("ge", str_ge, Type::Bool, str_pair(), Reifier::Noop),
        Expr::function("gt", str_gt, Type::Bool, str_pair(), Reifier::Noop),
        Expr::function("len", str_len, Type::Int, OrdMap::new().add("s", Type::Str), Reifier::Noop),
        Expr::function("le", str_le, Type::Bool, str_pair(), Reifier::Noop),
        Expr::function("lt", str_lt, Type::Bool, str_pair(), Reifier::Noop),
        Expr::function(
            "mul",
            str_mul,
            Type::Str,
            OrdMap::new().add("s", Type::Str).add("i", Type::Int),
            Reifier::Noop,
        ),
        Expr::function("ne", str_ne, Type::Bool, str_pair(), Reifier::Noop),
    ]
}


// String methods. The receiver argument is always "self".

fn self_str(args: &OrdMap<Value>) -> Result<Arc<String>> {
    arg_into(args, "self")
}

fn m_capitalize(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let s = self_str(args)?;
    let mut chars = s.chars();
    let out = match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
    };
    Ok(Value::string(&out))
}

fn m_count(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let s = self_str(args)?;
    let sub: Arc<String> = arg_into(args, "sub")?;
    Ok(Value::Int(s.matches(sub.as_str()).count() as i64))
}

fn m_endswith(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let s = self_str(args)?;
    let suffix: Arc<String> = arg_into(args, "suffix")?;
    Ok(Value::Bool(s.ends_with(suffix.as_str())))
}

fn m_startswith(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let s = self_str(args)?;
    let prefix: Arc<String> = arg_into(args, "prefix")?;
    Ok(Value::Bool(s.starts_with(prefix.as_str())))
}

// Searches report -1 on absence rather than failing.
fn m_find(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let s = self_str(args)?;
    let sub: Arc<String> = arg_into(args, "sub")?;
    Ok(Value::Int(char_index(&s, s.find(sub.as_str()))))
}

fn m_rfind(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let s = self_str(args)?;
    let sub: Arc<String> = arg_into(args, "sub")?;
    Ok(Value::Int(char_index(&s, s.rfind(sub.as_str()))))
}

fn m_lower(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    Ok(Value::string(&self_str(args)?.to_lowercase()))
}

fn m_upper(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    Ok(Value::string(&self_str(args)?.to_uppercase()))
}

fn m_title(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let s = self_str(args)?;
    let mut out = String::new();
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    Ok(Value::string(&out))
}

fn m_swapcase(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let s = self_str(args)?;
    let mut out = String::new();
    for ch in s.chars() {
        if ch.is_uppercase() {
            out.extend(ch.to_lowercase());
        } else if ch.is_lowercase() {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
    }
    Ok(Value::string(&out))
}

fn m_strip(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    Ok(Value::string(self_str(args)?.trim()))
}

fn m_lstrip(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    Ok(Value::string(self_str(args)?.trim_start()))
}

fn m_rstrip(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    Ok(Value::string(self_str(args)?.trim_end()))
}

fn m_join(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let s = self_str(args)?;
    let items: Arc<Vec<Value>> = arg_into(args, "items")?;
    let mut parts: Vec<String> = Vec::new();
    for item in items.iter() {
        let part: Arc<String> = item.clone().try_into()?;
        parts.push(part.to_string());
    }
    Ok(Value::string(&parts.join(s.as_str())))
}

fn m_replace(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let s = self_str(args)?;
    let old: Arc<String> = arg_into(args, "old")?;
    let new: Arc<String> = arg_into(args, "new")?;
    Ok(Value::string(&s.replace(old.as_str(), new.as_str())))
}

fn m_split(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let s = self_str(args)?;
    let sep: Arc<String> = arg_into(args, "sep")?;
    if sep.is_empty() {
        return Err(Error::ValueError(String::from("empty separator")));
    }
    Ok(Value::list(
        s.split(sep.as_str()).map(Value::string).collect(),
    ))
}

fn m_splitlines(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let s = self_str(args)?;
    Ok(Value::list(s.lines().map(Value::string).collect()))
}

fn m_is_alpha(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let s = self_str(args)?;
    Ok(Value::Bool(!s.is_empty() && s.chars().all(char::is_alphabetic)))
}

fn m_is_digit(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let s = self_str(args)?;
    Ok(Value::Bool(!s.is_empty() && s.chars().all(char::is_numeric)))
}

fn m_is_space(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let s = self_str(args)?;
    Ok(Value::Bool(!s.is_empty() && s.chars().all(char::is_whitespace)))
}

fn m_is_lower(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let s = self_str(args)?;
    Ok(Value::Bool(
        s.chars().any(char::is_lowercase) && !s.chars().any(char::is_uppercase),
    ))
}

fn m_is_upper(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let s = self_str(args)?;
    Ok(Value::Bool(
        s.chars().any(char::is_uppercase) && !s.chars().any(char::is_lowercase),
    ))
}


pub fn string_methods() -> Vec<Expr> {
    let receiver = || OrdMap::new().add("self", Type::Str);
    let with_sub = || OrdMap::new().add("self", Type::Str).add("sub", Type::Str);
    vec![
        Expr::method("capitalize", m_capitalize, Type::Str, receiver(), Reifier::Noop),
        Expr::method("count", m_count, Type::Int, with_sub(), Reifier::Noop),
        Expr::method(
            "endswith",
            m_endswith,
            Type::Bool,
            OrdMap::new().add("self", Type::Str).add("suffix", Type::Str),
            Reifier::Noop,
        ),
        Expr::method(
            "startswith",
            m_startswith,
            Type::Bool,
            OrdMap::new().add("self", Type::Str).add("prefix", Type::Str),
            Reifier::Noop,
        ),
        Expr::method("find", m_find, Type::Int, with_sub(), Reifier::Noop),
        Expr::method("rfind", m_rfind, Type::Int, with_sub(), Reifier::Noop),
        Expr::method("lower", m_lower, Type::Str, receiver(), Reifier::Noop),
        Expr::method("upper", m_upper, Type::Str, receiver(), Reifier::Noop),
        Expr::method("title", m_title, Type::Str, receiver(), Reifier::Noop),
        Expr::method("swapcase", m_swapcase, Type::Str, receiver(), Reifier::Noop),
        Expr::method("strip", m_strip, Type::Str, receiver(), Reifier::Noop),
        Expr::method("lstrip", m_lstrip, Type::Str, receiver(), Reifier::Noop),
        Expr::method("rstrip", m_rstrip, Type::Str, receiver(), Reifier::Noop),
        Expr::method(
            "join",
            m_join,
            Type::Str,
            OrdMap::new().add("self", Type::Str).add("items", Type::list(Type::Str)),
            Reifier::Noop,
        ),
        Expr::method(
            "replace",
            m_replace,
            Type::Str,
            OrdMap::new()
                .add("self", Type::Str)
                .add("old", Type::Str)
                .add("new", Type::Str),
            Reifier::Noop,
        ),
        Expr::method(
            "split",
            m_split,
            Type::list(Type::Str),
            OrdMap::new().add("self", Type::Str).add("sep", Type::Str),
            Reifier::Noop,
        ),
        Expr::method("splitlines", m_splitlines, Type::list(Type::Str), receiver(), Reifier::Noop),
        Expr::method("is_alpha", m_is_alpha, Type::Bool, receiver(), Reifier::Noop),
        Expr::method("is_digit", m_is_digit, Type::Bool, receiver(), Reifier::Noop),
        Expr::method("is_space", m_is_space, Type::Bool, receiver(), Reifier::Noop),
        Expr::method("is_lower", m_is_lower, Type::Bool, receiver(), Reifier::Noop),
        Expr::method("is_upper", m_is_upper, Type::Bool, receiver(), Reifier::Noop),
    ]
}


// IO Operations **************************************************************/

fn print_tap(args: &OrdMap<Value>, ctx: &mut EvalContext) -> Result<Value> {
    let v = arg(args, "to_do")?;
    ctx.print(&v);
    Ok(v)
}

fn println_tap(args: &OrdMap<Value>, ctx: &mut EvalContext) -> Result<Value> {
    let v = arg(args, "to_do")?;
    ctx.println(&v);
    Ok(v)
}

fn print_do(args: &OrdMap<Value>, ctx: &mut EvalContext) -> Result<Value> {
    ctx.print(&arg(args, "to_print")?);
    arg(args, "to_do")
}

fn do_print(args: &OrdMap<Value>, ctx: &mut EvalContext) -> Result<Value> {
    ctx.print(&arg(args, "to_print")?);
    arg(args, "to_do")
}


pub fn io_fns() -> Vec<Expr> {
    let pass_do = Reifier::PassThrough(String::from("to_do"));
    vec![
        Expr::function(
            "print_tap",
            print_tap,
            Type::Any,
            OrdMap::new().add("to_do", Type::Any),
            pass_do.clone(),
        ),
        Expr::function(
            "println_tap",
            println_tap,
            Type::Any,
            OrdMap::new().add("to_do", Type::Any),
            pass_do.clone(),
        ),
        Expr::function(
            "print_do",
            print_do,
            Type::Any,
            OrdMap::new().add("to_print", Type::Any).add("to_do", Type::Any),
            pass_do.clone(),
        ),
        Expr::function(
            "do_print",
            do_print,
            Type::Any,
            OrdMap::new().add("to_do", Type::Any).add("to_print", Type::Any),
            pass_do,
        ),
    ]
}


// Collection Operations ******************************************************/

fn coll_len(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    match arg(args, "coll")? {
        Value::Str(s) => Ok(Value::Int(s.chars().count() as i64)),
        Value::List(items) => Ok(Value::Int(items.len() as i64)),
        v => Err(Error::TypeError {
            expect: crate::value::TypeTag::Str | crate::value::TypeTag::List,
            got: v.get_type(),
        }),
    }
}

fn coll_in(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let items: Arc<Vec<Value>> = arg_into(args, "coll")?;
    let el = arg(args, "el")?;
    Ok(Value::Bool(items.contains(&el)))
}

fn list_add(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let l1: Arc<Vec<Value>> = arg_into(args, "l1")?;
    let l2: Arc<Vec<Value>> = arg_into(args, "l2")?;
    let mut out = l1.as_ref().clone();
    out.extend(l2.iter().cloned());
    Ok(Value::list(out))
}

fn wrap(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    Ok(Value::list(vec![arg(args, "el")?]))
}


pub fn coll_fns() -> Vec<Expr> {
    vec![
        Expr::function(
            "len",
            coll_len,
            Type::Int,
            OrdMap::new().add("coll", Type::union(vec![Type::Str, Type::list(Type::Any)])),
            Reifier::Noop,
        ),
        Expr::function(
            "in",
            coll_in,
            Type::Bool,
            OrdMap::new().add("coll", Type::list(Type::Any)).add("el", Type::Any),
            Reifier::ArgsToElement {
                coll: String::from("coll"),
                args: vec![String::from("el")],
            },
        ),
        Expr::function(
            "add",
            list_add,
            Type::list(Type::Any),
            OrdMap::new()
                .add("l1", Type::list(Type::Any))
                .add("l2", Type::list(Type::Any)),
            Reifier::Chain(vec![
                Reifier::ArgsToSame {
                    reference: String::from("l1"),
                    others: vec![String::from("l2")],
                },
                Reifier::PassThrough(String::from("l1")),
            ]),
        ),
        Expr::function(
            "wrap",
            wrap,
            Type::list(Type::Any),
            OrdMap::new().add("el", Type::Any),
            Reifier::ListOf(String::from("el")),
        ),
    ]
}


// Control ********************************************************************/

// Strict in both branches; only the selection is conditional.
fn if_(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let cond: bool = arg_into(args, "cond")?;
    if cond {
        arg(args, "then")
    } else {
        arg(args, "else")
    }
}


pub fn control_fns() -> Vec<Expr> {
    vec![Expr::function(
        "if",
        if_,
        Type::Any,
        OrdMap::new()
            .add("cond", Type::Bool)
            .add("then", Type::Any)
            .add("else", Type::Any),
        Reifier::Chain(vec![
            Reifier::ArgsToSame {
                reference: String::from("then"),
                others: vec![String::from("else")],
            },
            Reifier::PassThrough(String::from("then")),
        ]),
    )]
}


// Constructors ***************************************************************/

fn point_new(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let x: f64 = arg_into(args, "x")?;
    let y: f64 = arg_into(args, "y")?;
    Ok(Value::Point(x, y))
}


pub fn point_constructor() -> Expr {
    Expr::constructor(
        "Point",
        point_new,
        Type::Point,
        OrdMap::new().add("x", Type::Float).add("y", Type::Float),
    )
}


// Every free function, in section order. Methods and constructors
// register separately.
pub fn catalogue() -> Vec<Expr> {
    let mut fns = op_fns();
    fns.extend(cast_fns());
    fns.extend(str_fns());
    fns.extend(io_fns());
    fns.extend(coll_fns());
    fns.extend(control_fns());
    fns
}
