// (C) 2020 Brandon Lewis
//
// A type-directed stack machine that assembles expression graphs from
// linear code.
//
// This is the piece that turns an arbitrary, possibly nonsensical
// sequence of expression templates into a well-typed program, or into
// nothing at all.
//
// *Execution Model*
//
// The machine runs over a push sequence: a flat list whose elements
// are expression templates or nested blocks. It maintains two stacks.
// The dag stack holds reified, type-carrying subgraphs. The closure
// stack holds unrendered blocks waiting to become higher-order
// bodies.
//
// Leaves push themselves. A call pops one child per declared
// argument, scanning the dag stack top-down for the first entry whose
// type fits; the callee's reifier re-runs after every acquisition, so
// the requirement for a later argument can depend on the concrete
// types of earlier ones. A higher-order form pops a list-typed
// subgraph, then compiles one of the stashed blocks into a body over
// that list's element type using a fresh machine.
//
// *Validity*
//
// Infeasibility is not an error. A call that cannot find children, a
// block that cannot compile, a final stack with no entry of the
// requested type: each is a silent no-op or a None result. Random
// code is expected to be mostly infeasible; the machine's job is to
// extract whatever well-typed program is in there.
//
// By contrast, a reified node that fails validation indicates a
// defective reifier, and panics.
//
// *Bounds*
//
// No child deeper than MAX_DEPTH is ever admitted, which bounds both
// compile time and the evaluation cost of the result.

use std::fmt::Debug;

use crate::collections::OrdMap;
use crate::dag::Dag;
use crate::expr::{Expr, ExprKind, HofKind};
use crate::genome::Code;
use crate::reify::{Reifier, Signature};
use crate::types::{element_type, is_subtype, Type};


pub const MAX_DEPTH: usize = 50;


// A stack addressed from the top: position 0 is the most recently
// pushed element.
#[derive(Clone, Debug, PartialEq)]
pub struct PushStack<T> {
    items: Vec<T>,
}


impl<T> PushStack<T> {
    pub fn new() -> PushStack<T> {
        PushStack { items: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn push(&mut self, value: T) -> &mut Self {
        self.items.push(value);
        self
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    // Remove and return the element at `position`, counted from the top.
    pub fn pop_nth(&mut self, position: usize) -> Option<T> {
        if position < self.items.len() {
            let ndx = self.items.len() - 1 - position;
            Some(self.items.remove(ndx))
        } else {
            None
        }
    }

    pub fn top(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn nth(&self, position: usize) -> Option<&T> {
        if position < self.items.len() {
            self.items.get(self.items.len() - 1 - position)
        } else {
            None
        }
    }

    // Insert at `position` from the top; positions past the bottom clamp.
    pub fn insert(&mut self, position: usize, value: T) -> &mut Self {
        let ndx = self.items.len().saturating_sub(position);
        self.items.insert(ndx, value);
        self
    }

    pub fn set_nth(&mut self, position: usize, value: T) -> &mut Self {
        let ndx = self.items.len() - 1 - position;
        self.items[ndx] = value;
        self
    }

    pub fn flush(&mut self) -> &mut Self {
        self.items.clear();
        self
    }

    // Bottom to top.
    pub fn iter(&self) -> std::slice::Iter<T> {
        self.items.iter()
    }
}


impl<T: Debug> PushStack<T> {
    pub fn pprint(&self) {
        for el in self.items.iter().rev() {
            println!("\t{:?}", el);
        }
    }
}


// An unrendered block, stashed until a higher-order form claims it.
#[derive(Clone, Debug, PartialEq)]
pub struct Closure {
    pub body: Vec<Code>,
}


// The compiler state.
pub struct Push {
    dag_stack: PushStack<Expr>,
    closure_stack: PushStack<Closure>,
    allow_local_args: bool,
}


impl Push {
    pub fn new() -> Push {
        Push::with_locals(false)
    }

    fn with_locals(allow_local_args: bool) -> Push {
        Push {
            dag_stack: PushStack::new(),
            closure_stack: PushStack::new(),
            allow_local_args,
        }
    }

    // Topmost dag entry assignable to `typ` and still shallow enough
    // to grow on.
    fn pop_top_valid(&mut self, typ: &Type) -> Option<Expr> {
        let mut found = None;
        for (position, el) in self.dag_stack.iter().rev().enumerate() {
            if is_subtype(&el.dtype(), typ) && el.depth < MAX_DEPTH {
                found = Some(position);
                break;
            }
        }
        self.dag_stack.pop_nth(found?)
    }

    // One child per declared argument, popped in declaration order.
    // The reifier re-runs after every pop, so later requirements see
    // the concrete types already acquired. Any miss restores the
    // stack and fails the whole attempt.
    fn pop_children(&mut self, signature: &Signature, reifier: &Reifier) -> Option<OrdMap<Expr>> {
        let old_stack = self.dag_stack.clone();
        let mut children: OrdMap<Expr> = OrdMap::new();
        let mut reified_sig = signature.clone();
        let names: Vec<String> = signature.args.keys().cloned().collect();
        for child_name in &names {
            let typ = reified_sig
                .args
                .get(child_name)
                .expect("argument vanished during reification")
                .clone();
            let child = match self.pop_top_valid(&typ) {
                Some(child) => child,
                None => {
                    self.dag_stack = old_stack;
                    return None;
                }
            };
            children.insert(child_name, child);
            let mut dtypes: OrdMap<Type> = OrdMap::new();
            for (name, child) in children.iter() {
                dtypes.insert(name, child.dtype());
            }
            reified_sig = reifier.reify(&reified_sig, &dtypes);
        }
        Some(children)
    }

    // Scan the closure stack top-down for the first block that
    // compiles into a body of the required return type. Local
    // references in the block are normalized to the body's arity and
    // to the sequence's element type first, so over-indexed bodies
    // still type-check.
    fn pop_closure_as_dag(&mut self, el_type: &Type, n_args: usize, ret: &Type) -> Option<Dag> {
        let mut hit = None;
        for (position, closure) in self.closure_stack.iter().rev().enumerate() {
            let body: Vec<Code> = closure
                .body
                .iter()
                .map(|code| match code {
                    Code::Expr(e) => {
                        if let ExprKind::Local { ndx, .. } = &e.kind {
                            Code::Expr(Expr::local_typed(ndx % n_args, el_type.clone()))
                        } else {
                            Code::Expr(e.clone())
                        }
                    }
                    block => block.clone(),
                })
                .collect();
            if let Some(dag) = Push::with_locals(true).compile(&body, ret, false) {
                hit = Some((position, dag));
                break;
            }
        }
        let (position, dag) = hit?;
        self.closure_stack.pop_nth(position);
        Some(dag)
    }

    pub fn process(&mut self, code: &Code, verbose: bool) {
        if verbose {
            println!();
            println!("Processing: {:?}", code);
            println!("DAG Stack:");
            self.dag_stack.pprint();
            println!("Closure Stack:");
            self.closure_stack.pprint();
        }
        match code {
            Code::Block(items) => {
                self.closure_stack.push(Closure { body: items.clone() });
            }

            Code::Expr(expr) => match &expr.kind {
                ExprKind::Constant { .. } | ExprKind::Input { .. } => {
                    self.dag_stack.push(expr.clone());
                }

                // Locals only mean something inside a higher-order
                // body; anywhere else they vanish.
                ExprKind::Local { .. } => {
                    if self.allow_local_args {
                        self.dag_stack.push(expr.clone());
                    }
                }

                ExprKind::Call(call) => {
                    let children = match self.pop_children(&call.base, &call.reifier) {
                        Some(children) => children,
                        None => return,
                    };
                    let mut copy = expr.clone();
                    copy.add_children(children);
                    copy.reify(false);
                    self.dag_stack.push(copy);
                }

                ExprKind::Hof { kind, .. } => {
                    let old_dag_stack = self.dag_stack.clone();
                    let seq = match self.pop_top_valid(&Type::list(Type::Any)) {
                        Some(seq) => seq,
                        None => {
                            self.dag_stack = old_dag_stack;
                            return;
                        }
                    };
                    let el_type = element_type(&seq.dtype());
                    let old_closure_stack = self.closure_stack.clone();
                    let (n_args, ret) = match kind {
                        HofKind::Map => (1, Type::Any),
                        HofKind::Filter => (1, Type::Bool),
                    };
                    let func_dag = match self.pop_closure_as_dag(&el_type, n_args, &ret) {
                        Some(dag) => dag,
                        None => {
                            self.closure_stack = old_closure_stack;
                            self.dag_stack = old_dag_stack;
                            return;
                        }
                    };
                    let mut copy = expr.clone();
                    copy.add_child("seq", seq);
                    copy.add_child("func", func_dag.into_root());
                    copy.reify(false);
                    self.dag_stack.push(copy);
                }
            },
        }
    }

    pub fn compile(mut self, code: &[Code], output_type: &Type, verbose: bool) -> Option<Dag> {
        self.dag_stack.flush();
        for item in code {
            self.process(item, verbose);
        }
        if verbose {
            println!();
            println!("Final DAG Stack:");
            self.dag_stack.pprint();
            println!("Final Closure Stack:");
            self.closure_stack.pprint();
        }
        let root = self.pop_top_valid(output_type)?;
        Some(Dag::new(root))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{Bindings, NativeFn};
    use crate::value::{EvalContext, Result as EvalResult, Value};

    type Args = OrdMap<Value>;

    fn numeric() -> Type {
        Type::union(vec![Type::Int, Type::Float])
    }

    fn add_native(args: &Args, _ctx: &mut EvalContext) -> EvalResult<Value> {
        args.get("a").unwrap().add(args.get("b").unwrap())
    }

    fn inc_native(args: &Args, _ctx: &mut EvalContext) -> EvalResult<Value> {
        args.get("a").unwrap().add(&Value::Int(1))
    }

    fn odd_native(args: &Args, _ctx: &mut EvalContext) -> EvalResult<Value> {
        use crate::value::TryInto;
        let a: i64 = args.get("a").unwrap().clone().try_into()?;
        Ok(Value::Bool(a % 2 != 0))
    }

    fn pair_native(args: &Args, _ctx: &mut EvalContext) -> EvalResult<Value> {
        let n = args.get("n").unwrap().clone();
        let s = args.get("s").unwrap().clone();
        Ok(Value::list(vec![n, s]))
    }

    fn if_native(args: &Args, _ctx: &mut EvalContext) -> EvalResult<Value> {
        use crate::value::TryInto;
        let cond: bool = args.get("cond").unwrap().clone().try_into()?;
        Ok(if cond {
            args.get("then").unwrap().clone()
        } else {
            args.get("else").unwrap().clone()
        })
    }

    fn function(name: &str, fun: NativeFn, ret: Type, args: OrdMap<Type>, reifier: Reifier) -> Expr {
        Expr::function(name, fun, ret, args, reifier)
    }

    fn add_fn() -> Expr {
        function(
            "add",
            add_native,
            numeric(),
            OrdMap::new().add("a", numeric()).add("b", numeric()),
            Reifier::MaxType(vec![Type::Int, Type::Float]),
        )
    }

    fn inc_fn() -> Expr {
        function(
            "inc",
            inc_native,
            Type::Int,
            OrdMap::new().add("a", Type::Int),
            Reifier::Noop,
        )
    }

    fn odd_fn() -> Expr {
        function(
            "odd",
            odd_native,
            Type::Bool,
            OrdMap::new().add("a", Type::Int),
            Reifier::Noop,
        )
    }

    fn if_fn() -> Expr {
        function(
            "if",
            if_native,
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
        )
    }

    fn constant(v: Value) -> Code {
        Code::Expr(Expr::constant(v))
    }

    fn eval_dag(dag: &mut Dag, bindings: Bindings) -> EvalResult<Value> {
        dag.eval(&bindings)
    }

    mod stack {
        use crate::push::PushStack;

        #[test]
        fn test_push() {
            let mut stack = PushStack::new();
            stack.push(5).push(4);
            assert_eq!(stack.iter().cloned().collect::<Vec<i64>>(), vec![5, 4]);
        }

        #[test]
        fn test_nth() {
            let mut stack = PushStack::new();
            stack.push(5).push(4).push(3);
            assert_eq!(stack.nth(1), Some(&4));
        }

        #[test]
        fn test_nth_oob() {
            let mut stack = PushStack::new();
            stack.push(5);
            assert_eq!(stack.nth(1), None);
        }

        #[test]
        fn test_top() {
            let mut stack = PushStack::new();
            stack.push(5).push(-10);
            assert_eq!(stack.top(), Some(&-10));
            assert_eq!(PushStack::<i64>::new().top(), None);
        }

        #[test]
        fn test_pop_nth() {
            let mut stack = PushStack::new();
            stack.push("a").push("b").push("c");
            assert_eq!(stack.pop_nth(1), Some("b"));
            assert_eq!(stack.iter().cloned().collect::<Vec<&str>>(), vec!["a", "c"]);
            assert_eq!(stack.pop_nth(5), None);
        }

        #[test]
        fn test_insert() {
            let mut stack = PushStack::new();
            stack.push("a").push("b").push("c").insert(1, "z");
            assert_eq!(
                stack.iter().cloned().collect::<Vec<&str>>(),
                vec!["a", "b", "z", "c"]
            );
        }

        #[test]
        fn test_insert_oob() {
            let mut stack = PushStack::new();
            stack.push("a").push("b").push("c").insert(10, "z");
            assert_eq!(
                stack.iter().cloned().collect::<Vec<&str>>(),
                vec!["z", "a", "b", "c"]
            );
        }

        #[test]
        fn test_set_nth() {
            let mut stack = PushStack::new();
            stack.push("a").push("b").push("c").push("d").set_nth(1, "z");
            assert_eq!(
                stack.iter().cloned().collect::<Vec<&str>>(),
                vec!["a", "b", "z", "d"]
            );
        }

        #[test]
        #[should_panic]
        fn test_set_nth_oob() {
            let mut stack = PushStack::new();
            stack.push("a").push("b").push("c").set_nth(10, "z");
        }

        #[test]
        fn test_flush() {
            let mut stack = PushStack::new();
            stack.push(1).push(-1).flush();
            assert!(stack.is_empty());
        }
    }

    #[test]
    fn test_pop_top_valid_simple_type() {
        let mut push = Push::new();
        push.dag_stack.push(Expr::constant(Value::Int(7)));
        push.dag_stack.push(Expr::constant(Value::string("A")));

        let top_int = push.pop_top_valid(&Type::Int);
        assert_eq!(top_int, Some(Expr::constant(Value::Int(7))));
        assert_eq!(push.dag_stack.len(), 1);

        let top_list = push.pop_top_valid(&Type::list(Type::Any));
        assert_eq!(top_list, None);
        assert_eq!(push.dag_stack.len(), 1);
    }

    #[test]
    fn test_pop_top_valid_union_type() {
        let mut push = Push::new();
        push.dag_stack.push(Expr::constant(Value::Int(7)));
        push.dag_stack.push(Expr::constant(Value::string("A")));

        let top_num = push.pop_top_valid(&numeric());
        assert_eq!(top_num, Some(Expr::constant(Value::Int(7))));

        let top_any = push.pop_top_valid(&Type::Any);
        assert_eq!(top_any, Some(Expr::constant(Value::string("A"))));
        assert!(push.dag_stack.is_empty());
    }

    #[test]
    fn test_pop_children_type_driven_order() {
        // The numeric argument snubs the string on top of the stack.
        let mut push = Push::new();
        push.dag_stack.push(Expr::constant(Value::Int(7)));
        push.dag_stack.push(Expr::constant(Value::string("A")));

        let sig = Signature::new(
            Type::Any,
            OrdMap::new().add("n", numeric()).add("s", Type::Str),
        );
        let children = push.pop_children(&sig, &Reifier::Noop).unwrap();
        assert_eq!(children.get("n"), Some(&Expr::constant(Value::Int(7))));
        assert_eq!(children.get("s"), Some(&Expr::constant(Value::string("A"))));
        assert!(push.dag_stack.is_empty());
    }

    #[test]
    fn test_pop_children_not_enough() {
        let mut push = Push::new();
        push.dag_stack.push(Expr::constant(Value::Int(7)));
        let sig = Signature::new(
            Type::Any,
            OrdMap::new().add("n", numeric()).add("s", Type::Str),
        );
        assert_eq!(push.pop_children(&sig, &Reifier::Noop), None);
        assert_eq!(push.dag_stack.len(), 1);
    }

    #[test]
    fn test_pop_children_wrong_types() {
        let mut push = Push::new();
        push.dag_stack.push(Expr::constant(Value::Int(7)));
        push.dag_stack.push(Expr::constant(Value::string("A")));
        let sig = Signature::new(
            Type::Any,
            OrdMap::new()
                .add("l", Type::list(Type::Any))
                .add("s", Type::Str),
        );
        assert_eq!(push.pop_children(&sig, &Reifier::Noop), None);
        assert_eq!(push.dag_stack.len(), 2);
    }

    #[test]
    fn test_process_expr() {
        let x = Expr::input("x", Type::Float);
        let five = Expr::constant(Value::Int(5));

        let mut push = Push::new();
        push.process(&Code::Expr(x.clone()), false);
        push.process(&Code::Expr(five.clone()), false);
        assert_eq!(push.dag_stack.len(), 2);

        push.process(&Code::Expr(add_fn()), false);
        let mut expected = add_fn();
        expected.add_child("a", five);
        expected.add_child("b", x);
        expected.reify(false);
        assert_eq!(push.dag_stack.len(), 1);
        assert_eq!(push.dag_stack.top(), Some(&expected));
    }

    #[test]
    fn test_compile_addition() {
        // Arguments are assigned by scanning the stack top-down, so
        // the float input lands on `a` and the constant on `b`.
        let code = vec![
            constant(Value::Int(5)),
            Code::Expr(Expr::input("x", Type::Float)),
            Code::Expr(add_fn()),
        ];
        let mut dag = Push::new().compile(&code, &Type::Float, false).unwrap();
        assert_eq!(dag.return_type(), Type::Float);
        assert_eq!(dag.to_code(), "add(x, 5)");
        let mut bindings = Bindings::new();
        bindings.insert(String::from("x"), Value::Float(0.5));
        assert_eq!(eval_dag(&mut dag, bindings), Ok(Value::Float(5.5)));
        let mut bindings = Bindings::new();
        bindings.insert(String::from("x"), Value::Float(-5.0));
        assert_eq!(eval_dag(&mut dag, bindings), Ok(Value::Float(0.0)));
    }

    #[test]
    fn test_compile_is_deterministic() {
        let code = vec![
            constant(Value::Int(5)),
            Code::Expr(Expr::input("x", Type::Float)),
            Code::Expr(add_fn()),
        ];
        let first = Push::new().compile(&code, &Type::Float, false).unwrap();
        trace!("compiled: {}", first.to_code());
        for _ in 0..10 {
            let again = Push::new().compile(&code, &Type::Float, false).unwrap();
            assert_eq!(first.to_code(), again.to_code());
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_random_genomes_compile_or_fail_cleanly() {
        // Whatever a random draw produces, compile either returns
        // nothing or a fully-reified graph of the requested type
        // within the depth bound.
        use crate::genome::Spawner;
        use crate::soup::Soup;

        let soup = Soup::core();
        let mut spawner = Spawner::with_seed(&soup, 42);
        let mut compiled = 0;
        for _ in 0..200 {
            let code = spawner.spawn_code(5, 30);
            if let Some(dag) = Push::new().compile(&code, &numeric(), false) {
                compiled += 1;
                assert!(is_subtype(&dag.return_type(), &numeric()));
                let mut ok = true;
                let mut deepest = 0;
                dag.root().walk(&mut |e| {
                    ok &= e.reified;
                    deepest = deepest.max(e.depth);
                });
                assert!(ok);
                assert!(deepest <= MAX_DEPTH);
            }
        }
        trace!("{} of 200 random genomes compiled", compiled);
        assert!(compiled > 0);
    }

    #[test]
    fn test_compile_type_driven_pop() {
        let code = vec![
            constant(Value::Int(7)),
            constant(Value::string("A")),
            Code::Expr(function(
                "pair",
                pair_native,
                Type::list(Type::Any),
                OrdMap::new().add("n", numeric()).add("s", Type::Str),
                Reifier::Noop,
            )),
        ];
        let dag = Push::new()
            .compile(&code, &Type::list(Type::Any), false)
            .unwrap();
        assert_eq!(dag.to_code(), "pair(7, \"A\")");
    }

    #[test]
    fn test_infeasible_compile_returns_none() {
        let code = vec![constant(Value::Int(5)), Code::Expr(add_fn())];
        assert_eq!(Push::new().compile(&code, &Type::Float, false), None);
        assert_eq!(Push::new().compile(&code, &numeric(), false), None);
    }

    #[test]
    fn test_empty_sequence_returns_none() {
        assert_eq!(Push::new().compile(&[], &Type::Any, false), None);
    }

    #[test]
    fn test_wrong_output_type_returns_none() {
        let code = vec![constant(Value::Int(5))];
        assert_eq!(Push::new().compile(&code, &Type::Str, false), None);
    }

    #[test]
    fn test_local_input_discarded_outside_hof_body() {
        let code = vec![Code::Expr(Expr::local_typed(0, Type::Int))];
        assert_eq!(Push::new().compile(&code, &Type::Any, false), None);
    }

    #[test]
    fn test_depth_cap() {
        // 48 stacked adds stay under the cap.
        let mut code = vec![constant(Value::Int(1))];
        for _ in 0..48 {
            code.push(constant(Value::Int(1)));
            code.push(Code::Expr(add_fn()));
        }
        let dag = Push::new().compile(&code, &Type::Int, false).unwrap();
        assert_eq!(dag.root().depth, MAX_DEPTH - 1);

        // The 49th add consumes the depth-49 tree and produces a
        // depth-50 one, which nothing can reuse or extract.
        code.push(constant(Value::Int(1)));
        code.push(Code::Expr(add_fn()));
        assert_eq!(Push::new().compile(&code, &Type::Int, false), None);

        // The 50th add cannot take the capped tree as a child, so it
        // assembles nothing and the shallow constant wins extraction.
        code.push(constant(Value::Int(1)));
        code.push(Code::Expr(add_fn()));
        let dag = Push::new().compile(&code, &Type::Int, false).unwrap();
        assert_eq!(dag.to_code(), "1");
        assert!(dag.root().depth < MAX_DEPTH);
    }

    #[test]
    fn test_compile_map_over_list() {
        let code = vec![
            Code::Expr(Expr::input("xs", Type::list(Type::Int))),
            Code::Block(vec![
                Code::Expr(Expr::local(0)),
                Code::Expr(inc_fn()),
            ]),
            Code::Expr(Expr::map_expr()),
        ];
        let mut dag = Push::new()
            .compile(&code, &Type::list(Type::Int), false)
            .unwrap();
        assert_eq!(dag.to_code(), "map(lambda _0: inc(_0), xs)");
        assert_eq!(dag.return_type(), Type::list(Type::Int));

        let mut bindings = Bindings::new();
        bindings.insert(
            String::from("xs"),
            Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
        );
        assert_eq!(
            eval_dag(&mut dag, bindings),
            Ok(Value::list(vec![Value::Int(2), Value::Int(3), Value::Int(4)]))
        );
    }

    #[test]
    fn test_compile_filter_keeps_sequence_type() {
        let code = vec![
            Code::Expr(Expr::input("xs", Type::list(Type::Int))),
            Code::Block(vec![
                Code::Expr(Expr::local(0)),
                Code::Expr(odd_fn()),
            ]),
            Code::Expr(Expr::filter_expr()),
        ];
        let mut dag = Push::new()
            .compile(&code, &Type::list(Type::Int), false)
            .unwrap();
        assert_eq!(dag.to_code(), "filter(lambda _0: odd(_0), xs)");
        assert_eq!(dag.return_type(), Type::list(Type::Int));

        let mut bindings = Bindings::new();
        bindings.insert(
            String::from("xs"),
            Value::list(vec![Value::Int(5), Value::Int(10), Value::Int(15)]),
        );
        assert_eq!(
            eval_dag(&mut dag, bindings),
            Ok(Value::list(vec![Value::Int(5), Value::Int(15)]))
        );
    }

    #[test]
    fn test_hof_body_local_index_normalized() {
        // An over-indexed local wraps around to _0 instead of
        // spoiling the body.
        let code = vec![
            Code::Expr(Expr::input("xs", Type::list(Type::Int))),
            Code::Block(vec![
                Code::Expr(Expr::local(2)),
                Code::Expr(inc_fn()),
            ]),
            Code::Expr(Expr::map_expr()),
        ];
        let dag = Push::new()
            .compile(&code, &Type::list(Type::Int), false)
            .unwrap();
        assert_eq!(dag.to_code(), "map(lambda _0: inc(_0), xs)");
    }

    #[test]
    fn test_hof_without_closure_reverts_stacks() {
        let code = vec![
            Code::Expr(Expr::input("xs", Type::list(Type::Int))),
            Code::Expr(Expr::map_expr()),
        ];
        // No closure to claim: the map no-ops and the list survives
        // to the final extraction.
        let dag = Push::new()
            .compile(&code, &Type::list(Type::Int), false)
            .unwrap();
        assert_eq!(dag.to_code(), "xs");
    }

    #[test]
    fn test_hof_without_seq_leaves_closure_untouched() {
        let code = vec![
            Code::Block(vec![Code::Expr(Expr::local(0)), Code::Expr(inc_fn())]),
            Code::Expr(Expr::map_expr()),
        ];
        assert_eq!(Push::new().compile(&code, &Type::Any, false), None);
    }

    #[test]
    fn test_if_unifies_branch_types() {
        // then binds the float on top; else is then forced to float,
        // which the int constant cannot satisfy, so the if never
        // assembles and the bare float wins extraction.
        let code = vec![
            constant(Value::Bool(true)),
            constant(Value::Int(1)),
            constant(Value::Float(2.0)),
            Code::Expr(if_fn()),
        ];
        let dag = Push::new().compile(&code, &Type::Float, false).unwrap();
        assert_eq!(dag.to_code(), "2.0");

        // With both branches the same type the if assembles, its
        // return follows the branches, and evaluation picks `then`
        // (the topmost candidate at pop time).
        let code = vec![
            constant(Value::Bool(true)),
            constant(Value::Float(1.0)),
            constant(Value::Float(2.0)),
            Code::Expr(if_fn()),
        ];
        let mut dag = Push::new().compile(&code, &Type::Float, false).unwrap();
        assert_eq!(dag.return_type(), Type::Float);
        assert_eq!(dag.to_code(), "if(true, 2.0, 1.0)");
        assert_eq!(eval_dag(&mut dag, Bindings::new()), Ok(Value::Float(2.0)));
    }

    #[test]
    fn test_compiled_dag_is_fully_reified_and_bounded() {
        let code = vec![
            constant(Value::Int(5)),
            Code::Expr(Expr::input("x", Type::Float)),
            Code::Expr(add_fn()),
            constant(Value::Int(3)),
            Code::Expr(add_fn()),
        ];
        let dag = Push::new().compile(&code, &Type::Any, false).unwrap();
        let mut all_reified = true;
        let mut max_depth = 0;
        dag.root().walk(&mut |e| {
            all_reified &= e.reified;
            max_depth = max_depth.max(e.depth);
        });
        assert!(all_reified);
        assert!(max_depth <= MAX_DEPTH);
    }
}
