// Signature reification: context-dependent narrowing of a callee's
// declared types using the concrete types of children selected so
// far. Reifiers are pure over (Signature, child-type map); they never
// look at runtime values.

use crate::collections::OrdMap;
use crate::types::{element_type, Type};


#[derive(Clone, Debug, PartialEq)]
pub struct Signature {
    pub ret: Type,
    pub args: OrdMap<Type>,
}


impl Signature {
    pub fn new(ret: Type, args: OrdMap<Type>) -> Signature {
        Signature { ret, args }
    }

    pub fn with_ret(&self, ret: Type) -> Signature {
        Signature { ret, args: self.args.clone() }
    }

    pub fn with_args(&self, args: OrdMap<Type>) -> Signature {
        Signature { ret: self.ret.clone(), args }
    }
}


#[derive(Clone, Debug, PartialEq)]
pub enum Reifier {
    Noop,
    // Copy every concrete child type into the argument map.
    Required,
    // Set the return type to the named child's concrete type.
    PassThrough(String),
    // Set the return type to the concrete child type sitting furthest
    // right in the given ordering. Any child type outside the
    // ordering makes this a no-op.
    MaxType(Vec<Type>),
    // Set the return type to the element type of the named collection.
    RetToElement(String),
    // Set the listed argument types to the element type of the named
    // collection.
    ArgsToElement { coll: String, args: Vec<String> },
    // Force the listed arguments to the reference child's concrete type.
    ArgsToSame { reference: String, others: Vec<String> },
    // Set the return type to List of the named child's concrete type.
    ListOf(String),
    // Left-to-right composition.
    Chain(Vec<Reifier>),
}


impl Reifier {
    pub fn reify(&self, signature: &Signature, children: &OrdMap<Type>) -> Signature {
        match self {
            Reifier::Noop => signature.clone(),

            Reifier::Required => {
                let mut args = signature.args.clone();
                for (name, dtype) in children.iter() {
                    args = args.add(name, dtype.clone());
                }
                signature.with_args(args)
            }

            Reifier::PassThrough(arg) => match children.get(arg) {
                Some(dtype) => signature.with_ret(dtype.clone()),
                None => signature.clone(),
            },

            Reifier::MaxType(ordering) => {
                // First maximal argument wins ties.
                let mut winner: Option<(usize, &Type)> = None;
                for (_name, dtype) in children.iter() {
                    match ordering.iter().position(|t| t == dtype) {
                        None => return signature.clone(),
                        Some(ndx) => {
                            if winner.map_or(true, |(best, _)| ndx > best) {
                                winner = Some((ndx, dtype));
                            }
                        }
                    }
                }
                match winner {
                    Some((_, dtype)) => signature.with_ret(dtype.clone()),
                    None => signature.clone(),
                }
            }

            Reifier::RetToElement(coll) => match children.get(coll) {
                Some(dtype) => signature.with_ret(element_type(dtype)),
                None => signature.clone(),
            },

            Reifier::ArgsToElement { coll, args } => match children.get(coll) {
                Some(dtype) => {
                    let el = element_type(dtype);
                    let mut new_args = signature.args.clone();
                    for name in args {
                        new_args = new_args.add(name, el.clone());
                    }
                    signature.with_args(new_args)
                }
                None => signature.clone(),
            },

            Reifier::ArgsToSame { reference, others } => match children.get(reference) {
                Some(dtype) => {
                    let mut new_args = signature.args.clone().add(reference, dtype.clone());
                    for name in others {
                        new_args = new_args.add(name, dtype.clone());
                    }
                    signature.with_args(new_args)
                }
                None => signature.clone(),
            },

            Reifier::ListOf(arg) => match children.get(arg) {
                Some(dtype) => signature.with_ret(Type::list(dtype.clone())),
                None => signature.clone(),
            },

            Reifier::Chain(reifiers) => {
                let mut sig = signature.clone();
                for r in reifiers {
                    sig = r.reify(&sig, children);
                }
                sig
            }
        }
    }
}
