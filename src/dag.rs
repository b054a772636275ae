// The compiled program: a fully-reified expression graph plus the
// stdout its most recent evaluation produced.

use crate::expr::{Bindings, Expr, ExprKind};
use crate::types::Type;
use crate::value::{EvalContext, Result, Value};


#[derive(Clone, Debug)]
pub struct Dag {
    root: Expr,
    stdout_buffer: String,
}


impl Dag {
    pub fn new(mut root: Expr) -> Dag {
        root.reify(true);
        Dag {
            root,
            stdout_buffer: String::new(),
        }
    }

    pub fn root(&self) -> &Expr {
        &self.root
    }

    pub fn into_root(self) -> Expr {
        self.root
    }

    // Each eval starts from a fresh capture buffer; whatever the run
    // printed is readable afterwards even when evaluation failed.
    pub fn eval(&mut self, bindings: &Bindings) -> Result<Value> {
        let mut ctx = EvalContext::new();
        let ret = self.root.eval(bindings, &[], &mut ctx);
        self.stdout_buffer = ctx.into_stdout();
        ret
    }

    pub fn stdout(&self) -> &str {
        &self.stdout_buffer
    }

    pub fn return_type(&self) -> Type {
        self.root.dtype()
    }

    pub fn to_code(&self) -> String {
        self.root.to_code()
    }

    pub fn to_def(&self, name: &str, arg_names: &[&str]) -> String {
        format!(
            "def {}({}):\n    return {}",
            name,
            arg_names.join(", "),
            self.root.to_code()
        )
    }

    // Input symbols appearing anywhere in the graph, first-seen
    // order, deduped.
    pub fn input_symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = Vec::new();
        self.root.walk(&mut |e| {
            if let ExprKind::Input { symbol, .. } = &e.kind {
                if !symbols.contains(symbol) {
                    symbols.push(symbol.clone());
                }
            }
        });
        symbols
    }

    pub fn pprint(&self) {
        self.root.pprint();
    }
}


impl PartialEq for Dag {
    fn eq(&self, other: &Dag) -> bool {
        self.root == other.root
    }
}
