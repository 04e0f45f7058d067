//! Command implementations

pub(crate) mod inspect;
