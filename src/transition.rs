pub(crate) mod kind;
pub(crate) mod random;
pub(crate) mod session;
