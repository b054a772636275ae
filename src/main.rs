// pushdag: a code-building program synthesis kernel.
//
// Copyright (C) 2020  Brandon Lewis
//
// This program is free software: you can redistribute it and/or
// modify it under the terms of the GNU Lesser General Public License
// as published by the Free Software Foundation, either version 3 of
// the License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public
// License along with this program.  If not, see
// <https://www.gnu.org/licenses/>.

// Compile and run a small hand-built program: split a text input,
// take the first word, repeat it, and report the result.

use std::env::args;
use std::sync::Arc;

use pushdag::collections::OrdMap;
use pushdag::expr::{Bindings, Expr};
use pushdag::genome::{linearize, Gene};
use pushdag::library;
use pushdag::push::Push;
use pushdag::reify::Reifier;
use pushdag::types::Type;
use pushdag::value::{Error, EvalContext, Result, Value};

fn first(args: &OrdMap<Value>, _ctx: &mut EvalContext) -> Result<Value> {
    let seq: Arc<Vec<Value>> = library::arg_into(args, "seq")?;
    seq.first().cloned().ok_or(Error::IndexError(0))
}

fn first_fn() -> Expr {
    Expr::function(
        "first",
        first,
        Type::Any,
        OrdMap::new().add("seq", Type::list(Type::Any)),
        Reifier::RetToElement(String::from("seq")),
    )
}

fn main() {
    let text = args().nth(1).unwrap_or_else(|| String::from("Hello World"));
    let times: i64 = args()
        .nth(2)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(3);

    let genome = vec![
        Gene::Expr(Expr::constant(Value::string(" "))),
        Gene::Expr(Expr::input("text", Type::Str)),
        Gene::Expr(library::find(&library::string_methods(), "split").unwrap()),
        Gene::Expr(Expr::constant(Value::Bool(false))),
        Gene::Expr(first_fn()),
        Gene::Expr(Expr::input("times", Type::Int)),
        Gene::Expr(library::find(&library::str_fns(), "mul").unwrap()),
        Gene::Expr(library::find(&library::op_fns(), "add").unwrap()),
    ];

    let code = linearize(&genome);
    let mut program = match Push::new().compile(&code, &Type::Str, true) {
        Some(dag) => dag,
        None => {
            println!("no program of type str could be compiled");
            return;
        }
    };

    println!();
    println!("Output type: {}", program.return_type());
    println!();
    program.pprint();

    println!();
    println!("Testing Program");
    let mut bindings = Bindings::new();
    bindings.insert(String::from("text"), Value::string(&text));
    bindings.insert(String::from("times"), Value::Int(times));
    match program.eval(&bindings) {
        Ok(result) => println!("{}", result),
        Err(e) => println!("evaluation failed: {}", e),
    }

    println!();
    println!("Program As Code");
    println!("{}", program.to_def("repeat_first_word", &["text", "times"]));

    // Show the runtime error surface too: indexing an empty string.
    let getitem = library::find(&library::str_fns(), "getitem").unwrap();
    let mut broken = getitem;
    broken.add_child("s1", Expr::constant(Value::string("")));
    broken.add_child("ndx", Expr::constant(Value::Int(0)));
    let mut dag = pushdag::dag::Dag::new(broken);
    if let Err(e) = dag.eval(&Bindings::new()) {
        println!();
        println!("Expected failure: {}", e);
    }
}
