// Expression nodes.
//
// An expression is a DAG node with a variant kind. Leaves (constants,
// inputs, locals) reify at construction; calls and higher-order forms
// reify once the compiler has attached type-checked children. A node
// is only ever evaluated after reification.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::collections::OrdMap;
use crate::reify::{Reifier, Signature};
use crate::types::{is_subtype, Type};
use crate::value::{Error, EvalContext, Result, TryInto, Value};


pub type Bindings = HashMap<String, Value>;

// A built-in callable: named evaluated arguments in, value out.
pub type NativeFn = fn(&OrdMap<Value>, &mut EvalContext) -> Result<Value>;


#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CallStyle {
    Function,
    Method,
    Constructor,
}


#[derive(Clone, Debug)]
pub struct CallExpr {
    pub name: String,
    pub fun: NativeFn,
    pub style: CallStyle,
    pub base: Signature,
    pub reified_sig: Signature,
    pub reifier: Reifier,
}


// The function pointer is ignored: two calls are the same expression
// when their names, styles, and reified signatures agree.
impl PartialEq for CallExpr {
    fn eq(&self, other: &CallExpr) -> bool {
        self.name == other.name
            && self.style == other.style
            && self.reified_sig == other.reified_sig
    }
}


#[derive(Copy, Clone, Debug, PartialEq)]
pub enum HofKind {
    Map,
    Filter,
}


#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Constant { value: Value, dtype: Type },
    Input { symbol: String, dtype: Type },
    Local { ndx: usize, dtype: Type },
    Call(CallExpr),
    Hof { kind: HofKind, dtype: Type },
}


#[derive(Clone, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub children: OrdMap<Expr>,
    pub reified: bool,
    pub depth: usize,
}


impl PartialEq for Expr {
    fn eq(&self, other: &Expr) -> bool {
        self.reified == other.reified
            && self.kind == other.kind
            && self.children == other.children
    }
}


impl Expr {
    fn leaf(kind: ExprKind) -> Expr {
        Expr {
            kind,
            children: OrdMap::new(),
            reified: false,
            depth: 1,
        }
    }

    pub fn constant(value: Value) -> Expr {
        let dtype = value.infer_type();
        Expr::constant_typed(value, dtype)
    }

    pub fn constant_typed(value: Value, dtype: Type) -> Expr {
        let mut expr = Expr::leaf(ExprKind::Constant { value, dtype });
        expr.reify(false);
        expr
    }

    pub fn input(symbol: &str, dtype: Type) -> Expr {
        let mut expr = Expr::leaf(ExprKind::Input {
            symbol: String::from(symbol),
            dtype,
        });
        expr.reify(false);
        expr
    }

    pub fn local(ndx: usize) -> Expr {
        Expr::local_typed(ndx, Type::Any)
    }

    pub fn local_typed(ndx: usize, dtype: Type) -> Expr {
        let mut expr = Expr::leaf(ExprKind::Local { ndx, dtype });
        expr.reify(false);
        expr
    }

    pub fn function(
        name: &str,
        fun: NativeFn,
        ret: Type,
        args: OrdMap<Type>,
        reifier: Reifier,
    ) -> Expr {
        Expr::call(name, fun, CallStyle::Function, ret, args, reifier)
    }

    // A method is a function whose first argument is its receiver,
    // named "self"; it renders as receiver.name(rest).
    pub fn method(
        name: &str,
        fun: NativeFn,
        ret: Type,
        args: OrdMap<Type>,
        reifier: Reifier,
    ) -> Expr {
        Expr::call(name, fun, CallStyle::Method, ret, args, reifier)
    }

    pub fn constructor(name: &str, fun: NativeFn, class: Type, args: OrdMap<Type>) -> Expr {
        Expr::call(name, fun, CallStyle::Constructor, class, args, Reifier::Noop)
    }

    fn call(
        name: &str,
        fun: NativeFn,
        style: CallStyle,
        ret: Type,
        args: OrdMap<Type>,
        reifier: Reifier,
    ) -> Expr {
        let base = Signature::new(ret, args);
        Expr::leaf(ExprKind::Call(CallExpr {
            name: String::from(name),
            fun,
            style,
            reified_sig: base.clone(),
            base,
            reifier,
        }))
    }

    pub fn map_expr() -> Expr {
        Expr::leaf(ExprKind::Hof {
            kind: HofKind::Map,
            dtype: Type::list(Type::Any),
        })
    }

    pub fn filter_expr() -> Expr {
        Expr::leaf(ExprKind::Hof {
            kind: HofKind::Filter,
            dtype: Type::list(Type::Any),
        })
    }

    pub fn dtype(&self) -> Type {
        match &self.kind {
            ExprKind::Constant { dtype, .. } => dtype.clone(),
            ExprKind::Input { dtype, .. } => dtype.clone(),
            ExprKind::Local { dtype, .. } => dtype.clone(),
            ExprKind::Call(call) => call.reified_sig.ret.clone(),
            ExprKind::Hof { dtype, .. } => dtype.clone(),
        }
    }

    pub fn arity(&self) -> usize {
        match &self.kind {
            ExprKind::Call(call) => call.reified_sig.args.len(),
            ExprKind::Hof { .. } => 2,
            _ => 0,
        }
    }

    pub fn add_child(&mut self, name: &str, child: Expr) {
        self.children.insert(name, child);
        self.update_depth();
    }

    pub fn add_children(&mut self, children: OrdMap<Expr>) {
        for (name, child) in children {
            self.children.insert(&name, child);
        }
        self.update_depth();
    }

    pub fn flush_children(&mut self) {
        self.children = OrdMap::new();
        self.update_depth();
    }

    fn update_depth(&mut self) {
        self.depth = 1 + self.children.values().map(|c| c.depth).max().unwrap_or(0);
    }

    pub fn reify(&mut self, include_children: bool) {
        if include_children {
            for child in self.children.values_mut() {
                child.reify(true);
            }
        }
        self.reify_kind();
        self.reified = true;
    }

    fn reify_kind(&mut self) {
        if let ExprKind::Hof { kind, .. } = &self.kind {
            let hof_kind = *kind;
            self.validate_hof();
            // Map narrows to a list of the body's type; Filter keeps
            // the sequence type it was given.
            let dtype = match hof_kind {
                HofKind::Map => {
                    Type::list(self.children.get("func").expect("hof missing func").dtype())
                }
                HofKind::Filter => self.children.get("seq").expect("hof missing seq").dtype(),
            };
            if let ExprKind::Hof { dtype: slot, .. } = &mut self.kind {
                *slot = dtype;
            }
        } else if matches!(self.kind, ExprKind::Call(_)) {
            if self.children.len() == self.arity() {
                self.validate_call();
            }
            let mut dtypes: OrdMap<Type> = OrdMap::new();
            for (name, child) in self.children.iter() {
                dtypes.insert(name, child.dtype());
            }
            if let ExprKind::Call(call) = &mut self.kind {
                let sig = Reifier::Required.reify(&call.base, &dtypes);
                call.reified_sig = call.reifier.reify(&sig, &dtypes);
            }
        }
    }

    // Contract checks. A failure here means a defective reifier, not
    // a recoverable compile state.
    fn validate_call(&self) {
        let call = match &self.kind {
            ExprKind::Call(c) => c,
            _ => return,
        };
        let expected: Vec<&String> = call.reified_sig.args.keys().collect();
        let actual: Vec<&String> = self.children.keys().collect();
        assert!(
            expected == actual,
            "incorrect arguments to {}: expected {:?}, found {:?}",
            call.name,
            expected,
            actual
        );
        for (name, child) in self.children.iter() {
            let want = call.reified_sig.args.get(name).expect("validated key");
            let got = child.dtype();
            assert!(
                is_subtype(&got, want),
                "incorrect {} argument type for {}: expected {}, got {}",
                call.name,
                name,
                want,
                got
            );
        }
    }

    fn validate_hof(&self) {
        let keys: Vec<&String> = self.children.keys().collect();
        assert!(
            keys.len() == 2 && keys[0] == "seq" && keys[1] == "func",
            "children of a higher-order expression must be 'seq' and 'func', found {:?}",
            keys
        );
        let seq_dtype = self.children.get("seq").expect("validated key").dtype();
        assert!(
            is_subtype(&seq_dtype, &Type::list(Type::Any)),
            "seq child of a higher-order expression must return a List, got {}",
            seq_dtype
        );
    }

    pub fn eval(&self, bindings: &Bindings, locals: &[Value], ctx: &mut EvalContext) -> Result<Value> {
        match &self.kind {
            ExprKind::Constant { value, .. } => Ok(value.clone()),

            ExprKind::Input { symbol, .. } => bindings
                .get(symbol)
                .cloned()
                .ok_or_else(|| Error::MissingInput(symbol.clone())),

            ExprKind::Local { ndx, .. } => {
                locals.get(*ndx).cloned().ok_or(Error::MissingLocal(*ndx))
            }

            ExprKind::Call(call) => {
                assert!(self.reified, "cannot eval a call expression that has not been reified");
                let mut argv: OrdMap<Value> = OrdMap::new();
                for (name, child) in self.children.iter() {
                    argv.insert(name, child.eval(bindings, locals, ctx)?);
                }
                // Only the callee's own failure is wrapped; a child
                // failure propagates from where it happened.
                (call.fun)(&argv, ctx).map_err(|cause| Error::Call {
                    function: call.name.clone(),
                    args: argv.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
                    cause: Box::new(cause),
                })
            }

            ExprKind::Hof { kind, .. } => {
                assert!(self.reified, "cannot eval a higher-order expression that has not been reified");
                let seq = self.children.get("seq").expect("validated key");
                let func = self.children.get("func").expect("validated key");
                let items: Arc<Vec<Value>> = seq.eval(bindings, locals, ctx)?.try_into()?;
                let mut result = Vec::new();
                match kind {
                    HofKind::Map => {
                        for el in items.iter() {
                            let scope = [el.clone()];
                            result.push(func.eval(bindings, &scope, ctx)?);
                        }
                    }
                    HofKind::Filter => {
                        for el in items.iter() {
                            let scope = [el.clone()];
                            let keep: bool = func.eval(bindings, &scope, ctx)?.try_into()?;
                            if keep {
                                result.push(el.clone());
                            }
                        }
                    }
                }
                Ok(Value::List(Arc::new(result)))
            }
        }
    }

    pub fn to_code(&self) -> String {
        match &self.kind {
            ExprKind::Constant { value, .. } => value.repr(),
            ExprKind::Input { symbol, .. } => symbol.clone(),
            ExprKind::Local { ndx, .. } => format!("_{}", ndx),

            ExprKind::Call(call) => {
                assert!(self.reified, "cannot render an unreified call expression as code");
                match call.style {
                    CallStyle::Method => {
                        let receiver = self
                            .children
                            .get("self")
                            .expect("method missing self")
                            .to_code();
                        let rest: Vec<String> = self
                            .children
                            .iter()
                            .filter(|(name, _)| name.as_str() != "self")
                            .map(|(_, child)| child.to_code())
                            .collect();
                        format!("{}.{}({})", receiver, call.name, rest.join(", "))
                    }
                    _ => {
                        let args: Vec<String> =
                            self.children.values().map(|c| c.to_code()).collect();
                        format!("{}({})", call.name, args.join(", "))
                    }
                }
            }

            ExprKind::Hof { kind, .. } => {
                assert!(self.reified, "cannot render an unreified higher-order expression as code");
                let name = match kind {
                    HofKind::Map => "map",
                    HofKind::Filter => "filter",
                };
                format!(
                    "{}(lambda _0: {}, {})",
                    name,
                    self.children.get("func").expect("validated key").to_code(),
                    self.children.get("seq").expect("validated key").to_code()
                )
            }
        }
    }

    // The shape of the expression before children are known.
    pub fn to_form(&self) -> String {
        match &self.kind {
            ExprKind::Constant { value, .. } => value.repr(),
            ExprKind::Input { symbol, .. } => symbol.clone(),
            ExprKind::Local { ndx, .. } => format!("_{}", ndx),

            ExprKind::Call(call) => match call.style {
                CallStyle::Method => {
                    let names: Vec<&str> = call
                        .reified_sig
                        .args
                        .keys()
                        .filter(|name| name.as_str() != "self")
                        .map(|name| name.as_str())
                        .collect();
                    format!("self.{}({})", call.name, names.join(", "))
                }
                _ => {
                    let names: Vec<&str> =
                        call.reified_sig.args.keys().map(|name| name.as_str()).collect();
                    format!("{}({})", call.name, names.join(", "))
                }
            },

            ExprKind::Hof { kind, .. } => match kind {
                HofKind::Map => String::from("map(lambda _0: func(_0), seq)"),
                HofKind::Filter => String::from("filter(lambda _0: func(_0), seq)"),
            },
        }
    }

    // Visit this node and every descendant, depth first.
    pub fn walk(&self, visit: &mut dyn FnMut(&Expr)) {
        visit(self);
        for child in self.children.values() {
            child.walk(visit);
        }
    }

    pub fn pprint(&self) {
        self.pprint_at(0);
    }

    fn pprint_at(&self, depth: usize) {
        println!("{}- {}", "| ".repeat(depth), self);
        for child in self.children.values() {
            child.pprint_at(depth + 1);
        }
    }

    fn kind_name(&self) -> &'static str {
        match &self.kind {
            ExprKind::Constant { .. } => "Constant",
            ExprKind::Input { .. } => "Input",
            ExprKind::Local { .. } => "Local",
            ExprKind::Call(call) => match call.style {
                CallStyle::Function => "Function",
                CallStyle::Method => "Method",
                CallStyle::Constructor => "Constructor",
            },
            ExprKind::Hof { kind: HofKind::Map, .. } => "Map",
            ExprKind::Hof { kind: HofKind::Filter, .. } => "Filter",
        }
    }
}


impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let body = if self.reified {
            self.to_code()
        } else {
            self.to_form()
        };
        write!(
            f,
            "{}<{}><dtype={},depth={}>",
            self.kind_name(),
            body,
            self.dtype(),
            self.depth
        )
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn numeric() -> Type {
        Type::union(vec![Type::Int, Type::Float])
    }

    fn add_native(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
        args.get("a").unwrap().add(args.get("b").unwrap())
    }

    fn first_native(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
        let items: Arc<Vec<Value>> = args.get("seq").unwrap().clone().try_into()?;
        items.first().cloned().ok_or(Error::IndexError(0))
    }

    fn point_native(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
        let x: f64 = args.get("x").unwrap().clone().try_into()?;
        let y: f64 = args.get("y").unwrap().clone().try_into()?;
        Ok(Value::Point(x, y))
    }

    fn add_fn() -> Expr {
        Expr::function(
            "add",
            add_native,
            numeric(),
            OrdMap::new().add("a", numeric()).add("b", numeric()),
            Reifier::MaxType(vec![Type::Int, Type::Float]),
        )
    }

    fn first_fn() -> Expr {
        Expr::function(
            "first",
            first_native,
            Type::Any,
            OrdMap::new().add("seq", Type::list(Type::Any)),
            Reifier::RetToElement(String::from("seq")),
        )
    }

    fn list_constant() -> Expr {
        Expr::constant_typed(
            Value::list(vec![
                Value::string("a"),
                Value::string("b"),
                Value::string("c"),
            ]),
            Type::list(Type::Str),
        )
    }

    fn ev(expr: &Expr) -> Result<Value> {
        let mut ctx = EvalContext::new();
        expr.eval(&Bindings::new(), &[], &mut ctx)
    }

    #[test]
    fn test_constant() {
        let five = Expr::constant(Value::Int(5));
        assert_eq!(five.dtype(), Type::Int);
        assert_eq!(five.arity(), 0);
        assert!(five.reified);
        assert_eq!(ev(&five), Ok(Value::Int(5)));
        assert_eq!(five.to_form(), "5");

        let list = list_constant();
        assert_eq!(list.dtype(), Type::list(Type::Str));
        assert_eq!(list.to_form(), "[\"a\", \"b\", \"c\"]");
    }

    #[test]
    fn test_input() {
        let x = Expr::input("x", Type::Float);
        assert_eq!(x.dtype(), Type::Float);
        assert_eq!(x.to_form(), "x");

        let mut bindings = Bindings::new();
        bindings.insert(String::from("x"), Value::Float(1.0));
        bindings.insert(String::from("b"), Value::Bool(true));
        let mut ctx = EvalContext::new();
        assert_eq!(x.eval(&bindings, &[], &mut ctx), Ok(Value::Float(1.0)));
        assert_eq!(ev(&x), Err(Error::MissingInput(String::from("x"))));
    }

    #[test]
    fn test_local() {
        let local = Expr::local_typed(0, Type::Int);
        assert_eq!(local.to_code(), "_0");
        let mut ctx = EvalContext::new();
        assert_eq!(
            local.eval(&Bindings::new(), &[Value::Int(9)], &mut ctx),
            Ok(Value::Int(9))
        );
        assert_eq!(ev(&local), Err(Error::MissingLocal(0)));
    }

    #[test]
    fn test_function_dtype() {
        assert_eq!(add_fn().dtype(), numeric());
        assert_eq!(first_fn().dtype(), Type::Any);

        let mut first = first_fn();
        first.add_child("seq", list_constant());
        first.reify(false);
        assert_eq!(first.dtype(), Type::Str);
        assert_eq!(ev(&first), Ok(Value::string("a")));
        assert_eq!(first.to_code(), "first([\"a\", \"b\", \"c\"])");
    }

    #[test]
    fn test_function_to_form() {
        assert_eq!(add_fn().to_form(), "add(a, b)");
        assert_eq!(first_fn().to_form(), "first(seq)");
    }

    #[test]
    fn test_function_reify_narrows_signature() {
        let mut add = add_fn();
        add.add_child("a", Expr::constant(Value::Int(5)));
        add.add_child("b", Expr::input("x", Type::Float));
        add.reify(false);
        assert_eq!(add.dtype(), Type::Float);
        assert_eq!(add.depth, 2);
        assert_eq!(add.to_code(), "add(5, x)");
        if let ExprKind::Call(call) = &add.kind {
            assert_eq!(call.reified_sig.args.get("a"), Some(&Type::Int));
            assert_eq!(call.reified_sig.args.get("b"), Some(&Type::Float));
        } else {
            panic!("not a call");
        }
    }

    #[test]
    #[should_panic(expected = "incorrect arguments")]
    fn test_validation_catches_wrong_keys() {
        let mut add = add_fn();
        add.add_child("a", Expr::constant(Value::Int(5)));
        add.add_child("c", Expr::constant(Value::Int(5)));
        add.reify(false);
    }

    #[test]
    #[should_panic(expected = "incorrect add argument type")]
    fn test_validation_catches_wrong_types() {
        let mut add = add_fn();
        add.add_child("a", Expr::constant(Value::Int(5)));
        add.add_child("b", Expr::constant(Value::string("nope")));
        add.reify(false);
    }

    #[test]
    fn test_method_to_code() {
        fn upper_native(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
            let s: Arc<String> = args.get("self").unwrap().clone().try_into()?;
            Ok(Value::string(&s.to_uppercase()))
        }
        let mut upper = Expr::method(
            "upper",
            upper_native,
            Type::Str,
            OrdMap::new().add("self", Type::Str),
            Reifier::Noop,
        );
        assert_eq!(upper.to_form(), "self.upper()");
        upper.add_child("self", Expr::input("s", Type::Str));
        upper.reify(false);
        assert_eq!(upper.to_code(), "s.upper()");
    }

    #[test]
    fn test_constructor() {
        let mut point = Expr::constructor(
            "Point",
            point_native,
            Type::Point,
            OrdMap::new().add("x", Type::Float).add("y", Type::Float),
        );
        assert_eq!(point.dtype(), Type::Point);
        assert_eq!(point.to_form(), "Point(x, y)");
        point.add_child("x", Expr::constant(Value::Float(1.0)));
        point.add_child("y", Expr::constant(Value::Float(2.0)));
        point.reify(false);
        assert_eq!(point.to_code(), "Point(1.0, 2.0)");
        assert_eq!(ev(&point), Ok(Value::Point(1.0, 2.0)));
    }

    #[test]
    fn test_eval_wraps_callee_failure() {
        fn boom(_args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
            Err(Error::IndexError(3))
        }
        let mut expr = Expr::function(
            "boom",
            boom,
            Type::Int,
            OrdMap::new().add("a", Type::Int),
            Reifier::Noop,
        );
        expr.add_child("a", Expr::constant(Value::Int(7)));
        expr.reify(false);
        assert_eq!(
            ev(&expr),
            Err(Error::Call {
                function: String::from("boom"),
                args: vec![(String::from("a"), Value::Int(7))],
                cause: Box::new(Error::IndexError(3)),
            })
        );
    }

    #[test]
    fn test_depth_tracking() {
        let mut outer = add_fn();
        let mut inner = add_fn();
        inner.add_child("a", Expr::constant(Value::Int(1)));
        inner.add_child("b", Expr::constant(Value::Int(2)));
        inner.reify(false);
        assert_eq!(inner.depth, 2);
        outer.add_child("a", inner);
        outer.add_child("b", Expr::constant(Value::Int(3)));
        outer.reify(false);
        assert_eq!(outer.depth, 3);

        outer.flush_children();
        assert_eq!(outer.depth, 1);
        assert!(outer.children.is_empty());
    }

    #[test]
    fn test_walk_visits_all_descendants() {
        let mut outer = add_fn();
        let mut inner = add_fn();
        inner.add_child("a", Expr::input("x", Type::Int));
        inner.add_child("b", Expr::constant(Value::Int(2)));
        inner.reify(false);
        outer.add_child("a", inner);
        outer.add_child("b", Expr::input("y", Type::Int));
        outer.reify(false);

        let mut constants = 0;
        let mut inputs = 0;
        let mut total = 0;
        outer.walk(&mut |e| {
            total += 1;
            match &e.kind {
                ExprKind::Constant { .. } => constants += 1,
                ExprKind::Input { .. } => inputs += 1,
                _ => {}
            }
        });
        assert_eq!(total, 5);
        assert_eq!(constants, 1);
        assert_eq!(inputs, 2);
    }

    #[test]
    fn test_display() {
        let mut add = add_fn();
        add.add_child("a", Expr::constant(Value::Int(5)));
        add.add_child("b", Expr::input("x", Type::Float));
        add.reify(false);
        assert_eq!(
            format!("{}", add),
            "Function<add(5, x)><dtype=float,depth=2>"
        );
        assert_eq!(
            format!("{}", add_fn()),
            "Function<add(a, b)><dtype=Union[int, float],depth=1>"
        );
    }

    #[test]
    fn test_hof_reification_asymmetry() {
        // Map narrows to a list of the body's type; Filter returns
        // its sequence type unchanged, nested lists included.
        let nested = Expr::input("xss", Type::list(Type::list(Type::Int)));

        let mut map = Expr::map_expr();
        map.add_child("seq", nested.clone());
        map.add_child("func", Expr::constant(Value::Bool(true)));
        map.reify(false);
        assert_eq!(map.dtype(), Type::list(Type::Bool));

        let mut filter = Expr::filter_expr();
        filter.add_child("seq", nested);
        filter.add_child("func", Expr::constant(Value::Bool(true)));
        filter.reify(false);
        assert_eq!(filter.dtype(), Type::list(Type::list(Type::Int)));
    }

    #[test]
    fn test_map_eval_binds_local() {
        let mut inc = Expr::function(
            "inc",
            |args, _ctx| args.get("a").unwrap().add(&Value::Int(1)),
            Type::Int,
            OrdMap::new().add("a", Type::Int),
            Reifier::Noop,
        );
        inc.add_child("a", Expr::local_typed(0, Type::Int));
        inc.reify(false);

        let mut map = Expr::map_expr();
        map.add_child(
            "seq",
            Expr::constant(Value::list(vec![Value::Int(1), Value::Int(2)])),
        );
        map.add_child("func", inc);
        map.reify(false);
        assert_eq!(
            ev(&map),
            Ok(Value::list(vec![Value::Int(2), Value::Int(3)]))
        );
    }

    #[test]
    fn test_equality() {
        assert_eq!(Expr::constant(Value::Int(5)), Expr::constant(Value::Int(5)));
        assert_ne!(Expr::constant(Value::Int(5)), Expr::constant(Value::Int(6)));
        assert_eq!(add_fn(), add_fn());

        let mut bound = add_fn();
        bound.add_child("a", Expr::constant(Value::Int(1)));
        bound.add_child("b", Expr::constant(Value::Int(2)));
        bound.reify(false);
        assert_ne!(bound, add_fn());
    }
}
