use std::fmt;
use std::sync::Arc;


// Abstract over various memory management strategies.
pub type Node<T> = Arc<T>;
pub type Seq<T> = Vec<Node<T>>;


// Value-level description of a program type. Expressions carry these
// around so the compiler can check child compatibility without any
// help from the host language.
#[derive(Clone, Debug)]
pub enum Type {
    Any,
    Nothing,
    Bool,
    Int,
    Float,
    Str,
    Point,
    List(Node<Type>),
    Dict(Node<Type>, Node<Type>),
    Union(Seq<Type>),
}


impl Type {
    pub fn list(el: Type) -> Type {
        Type::List(Node::new(el))
    }

    pub fn dict(key: Type, val: Type) -> Type {
        Type::Dict(Node::new(key), Node::new(val))
    }

    pub fn union(alts: Vec<Type>) -> Type {
        Type::Union(alts.into_iter().map(Node::new).collect())
    }
}


// Union alternatives compare as sets. Everything else is structural.
impl PartialEq for Type {
    fn eq(&self, other: &Type) -> bool {
        use Type::*;
        match (self, other) {
            (Any, Any) => true,
            (Nothing, Nothing) => true,
            (Bool, Bool) => true,
            (Int, Int) => true,
            (Float, Float) => true,
            (Str, Str) => true,
            (Point, Point) => true,
            (List(a), List(b)) => a == b,
            (Dict(ka, va), Dict(kb, vb)) => ka == kb && va == vb,
            (Union(a), Union(b)) => {
                a.iter().all(|t| b.iter().any(|u| u.as_ref() == t.as_ref()))
                    && b.iter().all(|t| a.iter().any(|u| u.as_ref() == t.as_ref()))
            }
            _ => false,
        }
    }
}


impl Eq for Type {}


// The subtype relation. `Nothing` is bottom, `Any` is top, a union on
// the right is a join, containers are covariant in their arguments.
pub fn is_subtype(sub: &Type, sup: &Type) -> bool {
    use Type::*;
    match (sub, sup) {
        (Nothing, _) => true,
        (_, Any) => true,
        (Union(alts), _) => alts.iter().all(|t| is_subtype(t, sup)),
        (_, Union(alts)) => alts.iter().any(|t| is_subtype(sub, t)),
        (List(a), List(b)) => is_subtype(a, b),
        (Dict(ka, va), Dict(kb, vb)) => is_subtype(ka, kb) && is_subtype(va, vb),
        (a, b) => a == b,
    }
}


// First positional type argument of a container. Total: anything
// without one maps to `Any`, so higher-order forms can always ask.
pub fn element_type(t: &Type) -> Type {
    match t {
        Type::List(el) => el.as_ref().clone(),
        Type::Dict(key, _) => key.as_ref().clone(),
        Type::Str => Type::Str,
        _ => Type::Any,
    }
}


// Return the narrowest representation of the given set of types.
//
// An empty sequence reduces to Any, a single type to itself, and
// multiple distinct types to their union.
pub fn narrow(mut types: Vec<Type>) -> Type {
    let mut uniq: Vec<Type> = Vec::new();
    for t in types.drain(..) {
        if !uniq.contains(&t) {
            uniq.push(t);
        }
    }
    match uniq.len() {
        0 => Type::Any,
        1 => uniq.pop().unwrap(),
        _ => Type::Union(uniq.into_iter().map(Node::new).collect()),
    }
}


impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Type::Any => write!(f, "Any"),
            Type::Nothing => write!(f, "Nothing"),
            Type::Bool => write!(f, "bool"),
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::Str => write!(f, "str"),
            Type::Point => write!(f, "Point"),
            Type::List(el) => write!(f, "List[{}]", el),
            Type::Dict(key, val) => write!(f, "Dict[{}, {}]", key, val),
            Type::Union(alts) => {
                let parts: Vec<String> = alts.iter().map(|t| t.to_string()).collect();
                write!(f, "Union[{}]", parts.join(", "))
            }
        }
    }
}
