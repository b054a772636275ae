// The soup: an immutable bag of units that genomes are drawn from.
//
// A unit is an OPEN or CLOSE marker, an expression template, or an
// ERC generator that mints a fresh constant at draw time. Once built,
// a soup never changes; draws hand out independent clones, so one
// soup can feed any number of concurrent spawners.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::expr::Expr;
use crate::genome::Gene;
use crate::library;
use crate::types::Type;
use crate::value::Value;


pub type ErcFn = fn(&mut StdRng) -> Value;


// Ephemeral random constant generator.
#[derive(Clone, Debug)]
pub struct ErcGenerator {
    pub name: &'static str,
    pub gen: ErcFn,
    pub type_override: Option<Type>,
}


impl ErcGenerator {
    pub fn create_constant(&self, rng: &mut StdRng) -> Expr {
        let value = (self.gen)(rng);
        match &self.type_override {
            Some(dtype) => Expr::constant_typed(value, dtype.clone()),
            None => Expr::constant(value),
        }
    }
}


#[derive(Clone, Debug)]
pub enum Unit {
    Open,
    Close,
    Expr(Expr),
    Erc(ErcGenerator),
}


#[derive(Clone, Debug)]
pub struct Soup {
    units: Vec<Unit>,
}


impl Soup {
    pub fn new() -> Soup {
        Soup { units: vec![Unit::Open, Unit::Close] }
    }

    pub fn constant(mut self, value: Value) -> Soup {
        self.units.push(Unit::Expr(Expr::constant(value)));
        self
    }

    pub fn constant_typed(mut self, value: Value, dtype: Type) -> Soup {
        self.units.push(Unit::Expr(Expr::constant_typed(value, dtype)));
        self
    }

    pub fn constants(mut self, values: Vec<Value>) -> Soup {
        for value in values {
            self = self.constant(value);
        }
        self
    }

    pub fn input(mut self, name: &str, dtype: Type) -> Soup {
        self.units.push(Unit::Expr(Expr::input(name, dtype)));
        self
    }

    pub fn function(mut self, template: Expr) -> Soup {
        self.units.push(Unit::Expr(template));
        self
    }

    pub fn functions(mut self, templates: Vec<Expr>) -> Soup {
        for template in templates {
            self.units.push(Unit::Expr(template));
        }
        self
    }

    pub fn hofs(mut self) -> Soup {
        self.units.push(Unit::Expr(Expr::map_expr()));
        self.units.push(Unit::Expr(Expr::filter_expr()));
        for ndx in 0..3 {
            self.units.push(Unit::Expr(Expr::local(ndx)));
        }
        self
    }

    pub fn erc(mut self, name: &'static str, gen: ErcFn, type_override: Option<Type>) -> Soup {
        self.units.push(Unit::Erc(ErcGenerator { name, gen, type_override }));
        self
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn size(&self) -> usize {
        self.units.len()
    }

    // Uniform draw. Generators resolve to fresh constants here, at
    // draw time, never later.
    pub fn random_unit(&self, rng: &mut StdRng) -> Gene {
        match self.units.choose(rng).expect("cannot draw from an empty soup") {
            Unit::Open => Gene::Open,
            Unit::Close => Gene::Close,
            Unit::Expr(template) => Gene::Expr(template.clone()),
            Unit::Erc(generator) => Gene::Expr(generator.create_constant(rng)),
        }
    }

    // The full built-in catalogue: every library function, the
    // String methods, map/filter with three locals, a spread of
    // small constants, and float/int generators.
    pub fn core() -> Soup {
        CORE_SOUP.clone()
    }
}


fn rand_float(rng: &mut StdRng) -> Value {
    Value::Float(rng.gen::<f64>())
}

fn rand_int(rng: &mut StdRng) -> Value {
    Value::Int(rng.gen_range(-100..=100))
}


lazy_static! {
    static ref CORE_SOUP: Soup = Soup::new()
        .functions(library::catalogue())
        .functions(library::string_methods())
        .hofs()
        .constants(vec![
            Value::Int(-1),
            Value::Int(0),
            Value::Int(1),
            Value::Int(2),
            Value::Int(10),
            Value::Bool(true),
            Value::Bool(false),
        ])
        .erc("rand_float", rand_float, None)
        .erc("rand_int", rand_int, None);
}
