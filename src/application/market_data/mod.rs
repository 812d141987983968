pub mod unification;

pub use unification::unify;
