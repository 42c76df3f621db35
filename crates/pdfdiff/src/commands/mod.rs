mod compare;

pub use self::compare::compare;
