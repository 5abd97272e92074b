//! # env
//!
//! The evaluation environment: named variables and functions of arity 0, 1
//! and 2, each kept in its own [`indexmap::IndexMap`].
//!
//! Parsing only reads the environment. Binding a variable is the host's job
//! (see [`Environment::set_var`]).
//!
//! ## Example
//! ```rust
//! # use exprcalc::Environment;
//! let mut env = Environment::with_builtins();
//! assert_eq!(env.call("sqrt", &[16.0]).unwrap(), 4.0);
//! env.set_var("x", 2.5);
//! assert_eq!(env.var("x").unwrap(), 2.5);
//! assert!(env.var("y").is_err());
//! ```

use indexmap::IndexMap;
use smartstring::alias::String;
use std::f64::consts;
use thiserror::Error;

pub type Func0 = fn() -> f64;
pub type Func1 = fn(f64) -> f64;
pub type Func2 = fn(f64, f64) -> f64;

/// Lookup failures raised while evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvError {
    #[error("unknown variable {name}")]
    UnknownVariable { name: String },

    #[error("unknown function {name}")]
    UnknownFunction { name: String },

    /// The function exists, but not with this many arguments.
    #[error("function {name} does not take {given} argument(s)")]
    ArityMismatch { name: String, given: usize },
}

/// Variables and functions visible to an expression.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: IndexMap<String, f64>,
    funcs0: IndexMap<String, Func0>,
    funcs1: IndexMap<String, Func1>,
    funcs2: IndexMap<String, Func2>,
}

impl Environment {
    /// Creates an environment with no names at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an environment with the standard constants and math
    /// functions.
    ///
    /// | arity | names |
    /// |-------|-------|
    /// | const | `pi`, `e` |
    /// | 0     | `rand` |
    /// | 1     | `sin cos tan asin acos atan sqrt exp round ceil floor` |
    /// | 2     | `pow atan2 rand` |
    pub fn with_builtins() -> Self {
        let mut env = Self::new();
        env.set_var("pi", consts::PI);
        env.set_var("e", consts::E);

        env.define0("rand", rand::random::<f64>);

        env.define1("sin", f64::sin);
        env.define1("cos", f64::cos);
        env.define1("tan", f64::tan);
        env.define1("asin", f64::asin);
        env.define1("acos", f64::acos);
        env.define1("atan", f64::atan);
        env.define1("sqrt", f64::sqrt);
        env.define1("exp", f64::exp);
        env.define1("round", f64::round);
        env.define1("ceil", f64::ceil);
        env.define1("floor", f64::floor);

        env.define2("pow", f64::powf);
        env.define2("atan2", f64::atan2);
        env.define2("rand", |min, max| min + (max - min) * rand::random::<f64>());
        env
    }

    /// Returns the value of a variable.
    pub fn var(&self, name: &str) -> Result<f64, EnvError> {
        self.vars
            .get(name)
            .copied()
            .ok_or_else(|| EnvError::UnknownVariable { name: name.into() })
    }

    /// Binds `name` to `value`, replacing any previous binding.
    pub fn set_var(&mut self, name: impl AsRef<str>, value: f64) {
        self.vars.insert(String::from(name.as_ref()), value);
    }

    pub fn define0(&mut self, name: impl AsRef<str>, f: Func0) {
        self.funcs0.insert(String::from(name.as_ref()), f);
    }

    pub fn define1(&mut self, name: impl AsRef<str>, f: Func1) {
        self.funcs1.insert(String::from(name.as_ref()), f);
    }

    pub fn define2(&mut self, name: impl AsRef<str>, f: Func2) {
        self.funcs2.insert(String::from(name.as_ref()), f);
    }

    /// Is `name` bound to a function of any arity?
    pub fn is_function(&self, name: &str) -> bool {
        self.funcs0.contains_key(name)
            || self.funcs1.contains_key(name)
            || self.funcs2.contains_key(name)
    }

    /// Calls `name` with `args`, selecting the function by `args.len()`.
    pub fn call(&self, name: &str, args: &[f64]) -> Result<f64, EnvError> {
        let found = match *args {
            [] => self.funcs0.get(name).map(|f| f()),
            [x] => self.funcs1.get(name).map(|f| f(x)),
            [x, y] => self.funcs2.get(name).map(|f| f(x, y)),
            _ => None,
        };
        match found {
            Some(value) => Ok(value),
            None if self.is_function(name) => Err(EnvError::ArityMismatch {
                name: name.into(),
                given: args.len(),
            }),
            None => Err(EnvError::UnknownFunction { name: name.into() }),
        }
    }
}
